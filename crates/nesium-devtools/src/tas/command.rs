//! Menu, accelerator and button commands of the TAS Editor.
//!
//! Dispatch only updates [`TasEditorConfig`] and the recent list. Everything
//! that touches the movie, the history or the emulator is returned as an
//! [`Effect`] for the host to carry out, together with the parts of the
//! window that need redrawing.

use std::path::PathBuf;

use bitflags::bitflags;
use tracing::debug;

use super::TasEditor;
use super::config::{ConfigToggle, LimitChange};
use super::window::WindowItem;
use crate::error::DevtoolsError;

/// Which marker note edit box owns keyboard focus, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoteEditFocus {
    #[default]
    None,
    Playback,
    Selection,
}

impl NoteEditFocus {
    #[inline]
    pub fn is_editing(self) -> bool {
        self != Self::None
    }
}

/// Host state that decides how an edit command is routed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiContext {
    pub note_edit: NoteEditFocus,
    /// A mouse drag selection is in progress in the piano roll.
    pub drag_selecting: bool,
    pub seeking: bool,
    pub pattern_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectOp {
    New,
    Open,
    Save,
    SaveAs,
    SaveCompact,
    Import,
    ExportFm2,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplicerOp {
    Cut,
    Copy,
    Paste,
    PasteInsert,
    DeleteFrames,
    Truncate,
    InsertFrames,
    InsertNumFrames,
    ClearFrames,
    CloneFrames,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOp {
    Clear,
    SelectAll,
    SelectBetweenMarkers,
    Undo,
    Redo,
    ReselectClipboard,
}

/// Standard text editing applied to the focused note edit box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEditOp {
    SelectAll,
    Cut,
    Copy,
    Paste,
    Undo,
    DeleteForward,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Multitrack {
    #[default]
    All,
    Player(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerOp {
    Set,
    Remove,
    Previous,
    Next,
    FindBestSimilar,
    FindNextSimilar,
}

/// Playback cursor moves bound to Shift+Home/End/PageUp/PageDown/Up/Down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOp {
    JumpToStart,
    JumpToEnd,
    /// Back to the previous marker.
    RewindFull,
    /// On to the next marker.
    ForwardFull,
    RewindFrame,
    ForwardFrame,
}

/// Moves the whole selection without changing its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    Up,
    Down,
    ToStart,
    ToEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PianoRollScroll {
    Top,
    Bottom,
    PageUp,
    PageDown,
    /// One button column.
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TasEditorCommand {
    Project(ProjectOp),
    OpenRecent(usize),
    SelectPattern(usize),

    Deselect,
    SelectAll,
    SelectBetweenMarkers,
    /// Ctrl+A: the focused note's text, otherwise the frames between markers.
    SelectBetweenMarkersOrNote,
    Transpose(Transpose),
    Cut,
    Copy,
    Paste,
    PasteInsert,
    Clear,
    DeleteFrames,
    Truncate,
    InsertFrames,
    InsertNumFrames,
    CloneFrames,
    Undo,
    Redo,
    SelectionUndo,
    SelectionRedo,
    ReselectClipboard,
    Markers(MarkerOp),

    JumpToPlayback,
    JumpToSelection,
    TogglePause,
    CancelSeeking,
    Playback(PlaybackOp),
    ScrollPianoRoll(PianoRollScroll),
    FindNote,
    RunManualLua,
    /// Client-area left click outside any control.
    LeftClick {
        x: i32,
        y: i32,
    },
    MiddleClick,

    Toggle(ConfigToggle),
    CycleSuperimpose,
    SetMultitrack(Multitrack),
    ToggleRecording,
    ToggleBranchesView,

    SetGreenzoneCapacity(u32),
    SetUndoLevels(u32),
    SetAutosavePeriod(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Project(ProjectOp),
    LoadRecentProject { slot: usize, path: PathBuf },
    Splicer(SplicerOp),
    Selection(SelectionOp),
    NoteEdit {
        target: NoteEditFocus,
        op: TextEditOp,
    },
    Markers(MarkerOp),
    TransposeSelection(Transpose),
    HistoryUndo,
    HistoryRedo,
    FollowPlayback,
    FollowSelection,
    TogglePause,
    CancelSeeking,
    Playback(PlaybackOp),
    ScrollPianoRoll(PianoRollScroll),
    /// Opens the Find Note dialog, or focuses it if already open.
    OpenFindNote,
    /// Runs the registered manual Lua function on the next window update.
    RunManualLua,
    MiddleButtonClick,
    StartDraggingPlaybackCursor,
    SetTurbo(bool),
    ResetPatternOffset,
    SetMultitrack(Multitrack),
    ToggleReadOnly,
    /// The greenzone must drop states beyond the new capacity.
    CleanGreenzone,
    HistorySizeChanged,
    RescheduleAutosave,
    SetBackgroundInput(bool),
}

bitflags! {
    /// Window parts that need repainting after a command.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Redraw: u16 {
        const CHECKED_ITEMS = 1 << 0;
        const PIANO_ROLL = 1 << 1;
        const BOOKMARKS_LIST = 1 << 2;
        const BOOKMARKS_CAPTION = 1 << 3;
        const RECENT_MENU = 1 << 4;
        const PATTERNS_MENU = 1 << 5;
        const TOOLTIPS = 1 << 6;
        const CAPTION = 1 << 7;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub effects: Vec<Effect>,
    pub redraw: Redraw,
}

impl Dispatch {
    fn effect(effect: Effect) -> Self {
        Self {
            effects: vec![effect],
            redraw: Redraw::empty(),
        }
    }

    fn redraw(redraw: Redraw) -> Self {
        Self {
            effects: Vec::new(),
            redraw,
        }
    }

    fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && self.redraw.is_empty()
    }
}

/// Sends an edit either to the focused note box or to the movie.
fn route_edit(ctx: &UiContext, note: TextEditOp, movie: Effect) -> Dispatch {
    if ctx.note_edit.is_editing() {
        Dispatch::effect(Effect::NoteEdit {
            target: ctx.note_edit,
            op: note,
        })
    } else {
        Dispatch::effect(movie)
    }
}

/// Selection changes are ignored while the mouse is dragging a selection.
fn selection(ctx: &UiContext, op: SelectionOp, follow: bool) -> Dispatch {
    if ctx.drag_selecting {
        return Dispatch::default();
    }
    let out = Dispatch::effect(Effect::Selection(op));
    if follow {
        out.with(Effect::FollowSelection)
    } else {
        out
    }
}

fn toggle_redraw(toggle: ConfigToggle) -> Redraw {
    let extra = match toggle {
        ConfigToggle::ShowLagFrames => Redraw::PIANO_ROLL | Redraw::BOOKMARKS_LIST,
        ConfigToggle::ShowMarkers
        | ConfigToggle::EnableHotChanges
        | ConfigToggle::BindMarkers
        | ConfigToggle::DrawInput => Redraw::PIANO_ROLL,
        ConfigToggle::BranchOnlyWhenRecording => Redraw::BOOKMARKS_CAPTION,
        ConfigToggle::Tooltips => Redraw::TOOLTIPS,
        _ => Redraw::empty(),
    };
    Redraw::CHECKED_ITEMS | extra
}

impl TasEditor {
    pub fn dispatch(
        &mut self,
        command: TasEditorCommand,
        ctx: &UiContext,
    ) -> Result<Dispatch, DevtoolsError> {
        use TasEditorCommand as C;

        debug!(?command, "tas editor command");
        let out = match command {
            C::Project(op) => Dispatch::effect(Effect::Project(op)),
            C::OpenRecent(slot) => {
                let path = self
                    .recent
                    .get(slot)
                    .ok_or(DevtoolsError::RecentSlotEmpty { slot })?
                    .to_path_buf();
                Dispatch::effect(Effect::LoadRecentProject { slot, path })
            }
            C::SelectPattern(index) => {
                if index >= ctx.pattern_count {
                    return Err(DevtoolsError::UnknownPattern {
                        index,
                        count: ctx.pattern_count,
                    });
                }
                self.config.current_pattern = index;
                Dispatch {
                    effects: vec![Effect::ResetPatternOffset],
                    redraw: Redraw::PATTERNS_MENU,
                }
            }

            C::Deselect => selection(ctx, SelectionOp::Clear, false),
            C::SelectAll if ctx.note_edit.is_editing() => {
                route_edit(ctx, TextEditOp::SelectAll, Effect::FollowSelection)
            }
            C::SelectAll => selection(ctx, SelectionOp::SelectAll, false),
            C::SelectBetweenMarkersOrNote if ctx.note_edit.is_editing() => {
                route_edit(ctx, TextEditOp::SelectAll, Effect::FollowSelection)
            }
            C::SelectBetweenMarkers | C::SelectBetweenMarkersOrNote => {
                selection(ctx, SelectionOp::SelectBetweenMarkers, false)
            }
            C::Transpose(_) if ctx.drag_selecting => Dispatch::default(),
            C::Transpose(t) => {
                Dispatch::effect(Effect::TransposeSelection(t)).with(Effect::FollowSelection)
            }
            C::Cut => route_edit(ctx, TextEditOp::Cut, Effect::Splicer(SplicerOp::Cut)),
            C::Copy => route_edit(ctx, TextEditOp::Copy, Effect::Splicer(SplicerOp::Copy)),
            C::Paste => route_edit(ctx, TextEditOp::Paste, Effect::Splicer(SplicerOp::Paste)),
            C::PasteInsert => route_edit(
                ctx,
                TextEditOp::Paste,
                Effect::Splicer(SplicerOp::PasteInsert),
            ),
            C::Clear => route_edit(
                ctx,
                TextEditOp::DeleteForward,
                Effect::Splicer(SplicerOp::ClearFrames),
            ),
            C::DeleteFrames => Dispatch::effect(Effect::Splicer(SplicerOp::DeleteFrames)),
            C::Truncate => Dispatch::effect(Effect::Splicer(SplicerOp::Truncate)),
            C::InsertFrames => Dispatch::effect(Effect::Splicer(SplicerOp::InsertFrames)),
            C::InsertNumFrames => Dispatch::effect(Effect::Splicer(SplicerOp::InsertNumFrames)),
            C::CloneFrames => Dispatch::effect(Effect::Splicer(SplicerOp::CloneFrames)),
            C::Undo => route_edit(ctx, TextEditOp::Undo, Effect::HistoryUndo),
            C::Redo => Dispatch::effect(Effect::HistoryRedo),
            C::SelectionUndo => selection(ctx, SelectionOp::Undo, true),
            C::SelectionRedo => selection(ctx, SelectionOp::Redo, true),
            C::ReselectClipboard => selection(ctx, SelectionOp::ReselectClipboard, true),
            C::Markers(MarkerOp::Previous | MarkerOp::Next) if ctx.drag_selecting => {
                Dispatch::default()
            }
            C::Markers(op) => Dispatch::effect(Effect::Markers(op)),

            C::JumpToPlayback => Dispatch::effect(Effect::FollowPlayback),
            C::JumpToSelection if ctx.drag_selecting => Dispatch::default(),
            C::JumpToSelection => Dispatch::effect(Effect::FollowSelection),
            C::TogglePause => Dispatch::effect(Effect::TogglePause),
            C::CancelSeeking => Dispatch::effect(Effect::CancelSeeking),
            C::Playback(op) => Dispatch::effect(Effect::Playback(op)),
            C::ScrollPianoRoll(scroll) => Dispatch::effect(Effect::ScrollPianoRoll(scroll)),
            C::FindNote => Dispatch::effect(Effect::OpenFindNote),
            C::RunManualLua => Dispatch::effect(Effect::RunManualLua),
            C::LeftClick { x, y } => {
                // The strip left of the piano roll counts as its first column.
                let on_margin = self
                    .window
                    .item_rect(&self.config, WindowItem::PianoRoll)
                    .is_some_and(|r| x > 0 && x <= r.x && y > r.y && y < r.y + r.height);
                if on_margin {
                    Dispatch::effect(Effect::StartDraggingPlaybackCursor)
                } else {
                    Dispatch::default()
                }
            }
            C::MiddleClick => Dispatch::effect(Effect::MiddleButtonClick),

            C::Toggle(toggle) => {
                let enabled = self.config.toggle(toggle);
                let mut out = Dispatch::redraw(toggle_redraw(toggle));
                match toggle {
                    ConfigToggle::TurboSeek if ctx.seeking => {
                        out.effects.push(Effect::SetTurbo(enabled));
                    }
                    ConfigToggle::PatternRecording => {
                        out.effects.push(Effect::ResetPatternOffset);
                    }
                    _ => {}
                }
                out
            }
            C::CycleSuperimpose => {
                self.config.superimpose = self.config.superimpose.cycle();
                Dispatch::redraw(Redraw::CHECKED_ITEMS)
            }
            C::SetMultitrack(target) => Dispatch::effect(Effect::SetMultitrack(target)),
            C::ToggleRecording => Dispatch {
                effects: vec![Effect::ToggleReadOnly],
                redraw: Redraw::CHECKED_ITEMS | Redraw::CAPTION,
            },
            C::ToggleBranchesView => {
                self.config.view_branches_tree = !self.config.view_branches_tree;
                Dispatch::redraw(Redraw::BOOKMARKS_CAPTION)
            }

            C::SetGreenzoneCapacity(capacity) => {
                match self.config.set_greenzone_capacity(capacity) {
                    LimitChange::Shrank => Dispatch::effect(Effect::CleanGreenzone),
                    _ => Dispatch::default(),
                }
            }
            C::SetUndoLevels(levels) => match self.config.set_undo_levels(levels) {
                LimitChange::Unchanged => Dispatch::default(),
                _ => Dispatch::effect(Effect::HistorySizeChanged),
            },
            C::SetAutosavePeriod(minutes) => {
                self.config.set_autosave_period(minutes);
                Dispatch::effect(Effect::RescheduleAutosave)
            }
        };
        Ok(out)
    }
}
