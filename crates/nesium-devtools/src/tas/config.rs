use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

pub const GREENZONE_CAPACITY_MIN: u32 = 1;
pub const GREENZONE_CAPACITY_MAX: u32 = 50_000;
pub const GREENZONE_CAPACITY_DEFAULT: u32 = 10_000;

pub const UNDO_LEVELS_MIN: u32 = 1;
pub const UNDO_LEVELS_MAX: u32 = 1_000;
pub const UNDO_LEVELS_DEFAULT: u32 = 100;

/// Minutes; 0 disables autosave.
pub const AUTOSAVE_PERIOD_MIN: u32 = 0;
pub const AUTOSAVE_PERIOD_MAX: u32 = 1_440;
pub const AUTOSAVE_PERIOD_DEFAULT: u32 = 15;

/// Windows reports this position for a minimized window.
pub const MINIMIZED_POSITION: i32 = -32_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl WindowRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Last known and last restored (non-maximized) placement of the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPlacement {
    pub current: WindowRect,
    pub saved: WindowRect,
    pub maximized: bool,
}

/// "Superimpose" check box: new input is OR-ed onto old input when checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Superimpose {
    #[default]
    Unchecked,
    Checked,
    /// Superimpose only while the recording key is held.
    Indeterminate,
}

impl Superimpose {
    pub fn cycle(self) -> Self {
        match self {
            Self::Unchecked => Self::Checked,
            Self::Checked => Self::Indeterminate,
            Self::Indeterminate => Self::Unchecked,
        }
    }
}

/// Boolean settings toggled from the TAS Editor check boxes and menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigToggle {
    FollowPlayback,
    RestorePosition,
    TurboSeek,
    ShowLagFrames,
    ShowMarkers,
    ShowBranchScreenshots,
    ShowBranchTooltips,
    JumpToUndo,
    FollowNoteContext,
    EnableHotChanges,
    BranchFullMovie,
    BranchOnlyWhenRecording,
    HudInBranchScreenshots,
    BindMarkers,
    EmptyMarkerNotes,
    CombineConsecutive,
    #[strum(to_string = "use-1p-for-recording")]
    Use1pForRecording,
    ColumnSetByKeys,
    SuperimposeAffectsPaste,
    PatternSkipsLag,
    DeselectOnDoubleClick,
    DrawInput,
    SilentAutosave,
    MuteTurbo,
    AutopauseAtFinish,
    Tooltips,
    PatternRecording,
    EnableAutoFunction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasEditorConfig {
    pub placement: WindowPlacement,

    pub follow_playback: bool,
    pub restore_position: bool,
    pub turbo_seek: bool,
    pub show_lag_frames: bool,
    pub show_markers: bool,
    pub show_branch_screenshots: bool,
    pub show_branch_tooltips: bool,
    pub jump_to_undo: bool,
    pub follow_note_context: bool,
    pub enable_hot_changes: bool,
    pub branch_full_movie: bool,
    pub branch_only_when_recording: bool,
    pub hud_in_branch_screenshots: bool,
    pub bind_markers: bool,
    pub empty_marker_notes: bool,
    pub combine_consecutive: bool,
    pub use_1p_for_recording: bool,
    pub column_set_by_keys: bool,
    pub superimpose_affects_paste: bool,
    pub pattern_skips_lag: bool,
    pub deselect_on_double_click: bool,
    pub draw_input: bool,
    pub silent_autosave: bool,
    pub mute_turbo: bool,
    pub autopause_at_finish: bool,
    pub tooltips: bool,
    pub pattern_recording: bool,
    pub enable_auto_function: bool,

    /// Bookmarks list vs. branches tree in the right-hand pane.
    pub view_branches_tree: bool,
    pub superimpose: Superimpose,
    pub current_pattern: usize,

    pub greenzone_capacity: u32,
    pub undo_levels: u32,
    pub autosave_period: u32,
}

impl Default for TasEditorConfig {
    fn default() -> Self {
        Self {
            placement: WindowPlacement::default(),
            follow_playback: true,
            restore_position: false,
            turbo_seek: false,
            show_lag_frames: true,
            show_markers: true,
            show_branch_screenshots: true,
            show_branch_tooltips: true,
            jump_to_undo: true,
            follow_note_context: true,
            enable_hot_changes: true,
            branch_full_movie: true,
            branch_only_when_recording: false,
            hud_in_branch_screenshots: true,
            bind_markers: true,
            empty_marker_notes: true,
            combine_consecutive: false,
            use_1p_for_recording: true,
            column_set_by_keys: false,
            superimpose_affects_paste: true,
            pattern_skips_lag: true,
            deselect_on_double_click: true,
            draw_input: true,
            silent_autosave: true,
            mute_turbo: false,
            autopause_at_finish: true,
            tooltips: true,
            pattern_recording: false,
            enable_auto_function: true,
            view_branches_tree: false,
            superimpose: Superimpose::Unchecked,
            current_pattern: 0,
            greenzone_capacity: GREENZONE_CAPACITY_DEFAULT,
            undo_levels: UNDO_LEVELS_DEFAULT,
            autosave_period: AUTOSAVE_PERIOD_DEFAULT,
        }
    }
}

/// What changed when a limit was set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitChange {
    Unchanged,
    Grew,
    Shrank,
}

impl LimitChange {
    fn between(old: u32, new: u32) -> Self {
        match new.cmp(&old) {
            std::cmp::Ordering::Less => Self::Shrank,
            std::cmp::Ordering::Equal => Self::Unchanged,
            std::cmp::Ordering::Greater => Self::Grew,
        }
    }
}

macro_rules! toggle_fields {
    ($($toggle:ident => $field:ident),* $(,)?) => {
        impl TasEditorConfig {
            pub fn get(&self, toggle: ConfigToggle) -> bool {
                match toggle {
                    $(ConfigToggle::$toggle => self.$field,)*
                }
            }

            fn toggle_slot(&mut self, toggle: ConfigToggle) -> &mut bool {
                match toggle {
                    $(ConfigToggle::$toggle => &mut self.$field,)*
                }
            }
        }
    };
}

toggle_fields! {
    FollowPlayback => follow_playback,
    RestorePosition => restore_position,
    TurboSeek => turbo_seek,
    ShowLagFrames => show_lag_frames,
    ShowMarkers => show_markers,
    ShowBranchScreenshots => show_branch_screenshots,
    ShowBranchTooltips => show_branch_tooltips,
    JumpToUndo => jump_to_undo,
    FollowNoteContext => follow_note_context,
    EnableHotChanges => enable_hot_changes,
    BranchFullMovie => branch_full_movie,
    BranchOnlyWhenRecording => branch_only_when_recording,
    HudInBranchScreenshots => hud_in_branch_screenshots,
    BindMarkers => bind_markers,
    EmptyMarkerNotes => empty_marker_notes,
    CombineConsecutive => combine_consecutive,
    Use1pForRecording => use_1p_for_recording,
    ColumnSetByKeys => column_set_by_keys,
    SuperimposeAffectsPaste => superimpose_affects_paste,
    PatternSkipsLag => pattern_skips_lag,
    DeselectOnDoubleClick => deselect_on_double_click,
    DrawInput => draw_input,
    SilentAutosave => silent_autosave,
    MuteTurbo => mute_turbo,
    AutopauseAtFinish => autopause_at_finish,
    Tooltips => tooltips,
    PatternRecording => pattern_recording,
    EnableAutoFunction => enable_auto_function,
}

impl TasEditorConfig {
    /// Flips `toggle` and returns the new value.
    pub fn toggle(&mut self, toggle: ConfigToggle) -> bool {
        let slot = self.toggle_slot(toggle);
        *slot = !*slot;
        *slot
    }

    pub fn set_greenzone_capacity(&mut self, capacity: u32) -> LimitChange {
        let capacity = capacity.clamp(GREENZONE_CAPACITY_MIN, GREENZONE_CAPACITY_MAX);
        let change = LimitChange::between(self.greenzone_capacity, capacity);
        self.greenzone_capacity = capacity;
        change
    }

    pub fn set_undo_levels(&mut self, levels: u32) -> LimitChange {
        let levels = levels.clamp(UNDO_LEVELS_MIN, UNDO_LEVELS_MAX);
        let change = LimitChange::between(self.undo_levels, levels);
        self.undo_levels = levels;
        change
    }

    pub fn set_autosave_period(&mut self, minutes: u32) -> LimitChange {
        let minutes = minutes.clamp(AUTOSAVE_PERIOD_MIN, AUTOSAVE_PERIOD_MAX);
        let change = LimitChange::between(self.autosave_period, minutes);
        self.autosave_period = minutes;
        change
    }
}
