//! Geometry, caption and tooltip bookkeeping for the TAS Editor window.
//!
//! The window toolkit owns the real controls. This module remembers how each
//! control is anchored to the window edges when the dialog is first laid out,
//! and recomputes control rectangles whenever the window size changes.

use bitflags::bitflags;

use super::config::{MINIMIZED_POSITION, TasEditorConfig, WindowRect};

pub const WINDOW_CAPTION_BASE: &str = "TAS Editor";

/// Tooltip text including a hotkey suffix is cut to this many characters.
pub const TOOLTIP_TEXT_MAX_LEN: usize = 127;

bitflags! {
    /// How a control follows the window when it is resized.
    ///
    /// Without flags a control keeps its distance to the left and top edges
    /// and its size.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Anchor: u8 {
        /// Keep the distance to the right edge instead of the left.
        const RIGHT = 1 << 0;
        /// Keep the distance to the bottom edge instead of the top.
        const BOTTOM = 1 << 1;
        /// Keep the right margin, growing with the window.
        const STRETCH_WIDTH = 1 << 2;
        /// Keep the bottom margin, growing with the window.
        const STRETCH_HEIGHT = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowItem {
    ProgressButton,
    BranchesButton,
    PianoRoll,
    PlaybackBox,
    RecorderBox,
    SplicerBox,
    LuaBox,
    BookmarksBox,
    HistoryBox,
    RewindFull,
    Rewind,
    PlayStop,
    Forward,
    ForwardFull,
    ProgressBar,
    FollowCursor,
    AutoRestorePlayback,
    BookmarksList,
    HistoryList,
    MultitrackAll,
    Multitrack1p,
    Multitrack2p,
    Multitrack3p,
    Multitrack4p,
    Superimpose,
    UsePattern,
    PrevMarker,
    FindBestSimilarMarker,
    FindNextSimilarMarker,
    NextMarker,
    JumpPlaybackButton,
    PlaybackMarkerEdit,
    PlaybackMarker,
    JumpSelectionButton,
    SelectionMarkerEdit,
    SelectionMarker,
    BranchesBitmap,
    TurboSeek,
    SelectionText,
    ClipboardText,
    Recording,
    RunManual,
    RunAuto,
}

/// Emulator commands whose key binding is appended to a tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyCommand {
    CancelSeeking,
    Pause,
    ToggleReadOnly,
}

#[derive(Debug, Clone, Copy)]
pub struct ItemDef {
    pub item: WindowItem,
    pub anchor: Anchor,
    pub tooltip: Option<&'static str>,
    pub hotkey: Option<HotkeyCommand>,
}

const fn def(item: WindowItem, anchor: Anchor, tooltip: Option<&'static str>) -> ItemDef {
    ItemDef {
        item,
        anchor,
        tooltip,
        hotkey: None,
    }
}

const fn with_hotkey(mut def: ItemDef, hotkey: HotkeyCommand) -> ItemDef {
    def.hotkey = Some(hotkey);
    def
}

const R: Anchor = Anchor::RIGHT;
const MARKER_NAV: Anchor = Anchor::RIGHT
    .union(Anchor::BOTTOM)
    .union(Anchor::STRETCH_HEIGHT);

pub const WINDOW_ITEMS: &[ItemDef] = {
    use WindowItem::*;
    &[
        with_hotkey(
            def(ProgressButton, R, Some("Click to abort seeking")),
            HotkeyCommand::CancelSeeking,
        ),
        def(
            BranchesButton,
            R,
            Some("Click to switch between the Bookmarks list and the Branches tree"),
        ),
        def(PianoRoll, Anchor::STRETCH_WIDTH.union(Anchor::STRETCH_HEIGHT), None),
        def(PlaybackBox, R, None),
        def(RecorderBox, R, None),
        def(SplicerBox, R, None),
        def(LuaBox, R, None),
        def(BookmarksBox, R, None),
        def(HistoryBox, R.union(Anchor::STRETCH_HEIGHT), None),
        def(
            RewindFull,
            R,
            Some("Send Playback to the previous Marker (Shift+Wheel up) (Shift+PageUp)"),
        ),
        def(
            Rewind,
            R,
            Some("Rewind one frame (Right button+Wheel up) (Alt+Wheel up) (Shift+Up)"),
        ),
        with_hotkey(
            def(PlayStop, R, Some("Pause/unpause emulation (Middle button)")),
            HotkeyCommand::Pause,
        ),
        def(
            Forward,
            R,
            Some("Advance one frame (Right button+Wheel down) (Alt+Wheel down) (Shift+Down)"),
        ),
        def(
            ForwardFull,
            R,
            Some("Send Playback to the next Marker (Shift+Wheel down) (Shift+PageDown)"),
        ),
        def(ProgressBar, R, None),
        def(FollowCursor, R, Some("The Piano Roll follows the Playback cursor")),
        def(
            AutoRestorePlayback,
            R,
            Some("After input above Playback changes, the cursor returns to where it was"),
        ),
        def(
            BookmarksList,
            R,
            Some("Right click sets a Bookmark, left click jumps to it or loads a Branch"),
        ),
        def(
            HistoryList,
            R.union(Anchor::STRETCH_HEIGHT),
            Some("Click to revert the movie to that point"),
        ),
        def(MultitrackAll, R, None),
        def(Multitrack1p, R, None),
        def(Multitrack2p, R, None),
        def(Multitrack3p, R, None),
        def(Multitrack4p, R, None),
        def(
            Superimpose,
            R,
            Some("Combine old input with new buttons instead of overwriting"),
        ),
        def(
            UsePattern,
            R,
            Some("Apply the current Autofire Pattern while recording"),
        ),
        def(
            PrevMarker,
            MARKER_NAV,
            Some("Send Selection to the previous Marker (Ctrl+Wheel up) (Ctrl+PageUp)"),
        ),
        def(
            FindBestSimilarMarker,
            MARKER_NAV,
            Some("Search for a similar Marker note"),
        ),
        def(FindNextSimilarMarker, MARKER_NAV, Some("Continue the search")),
        def(
            NextMarker,
            MARKER_NAV,
            Some("Send Selection to the next Marker (Ctrl+Wheel down) (Ctrl+PageDown)"),
        ),
        def(
            JumpPlaybackButton,
            Anchor::empty(),
            Some("Scroll the Piano Roll to the Playback cursor (tap Shift twice)"),
        ),
        def(
            PlaybackMarkerEdit,
            Anchor::STRETCH_WIDTH,
            Some("Click to edit text"),
        ),
        def(PlaybackMarker, Anchor::empty(), None),
        def(
            JumpSelectionButton,
            Anchor::BOTTOM.union(Anchor::STRETCH_HEIGHT),
            Some("Scroll the Piano Roll to the Selection (tap Ctrl twice)"),
        ),
        def(
            SelectionMarkerEdit,
            Anchor::BOTTOM
                .union(Anchor::STRETCH_WIDTH)
                .union(Anchor::STRETCH_HEIGHT),
            Some("Click to edit text"),
        ),
        def(
            SelectionMarker,
            Anchor::BOTTOM.union(Anchor::STRETCH_HEIGHT),
            None,
        ),
        def(
            BranchesBitmap,
            R,
            Some("Hierarchy of your Branches"),
        ),
        def(
            TurboSeek,
            R,
            Some("Uncheck to watch seeking in slow motion"),
        ),
        def(SelectionText, R, Some("Current size of the Selection")),
        def(
            ClipboardText,
            R,
            Some("Current size of the input in the Clipboard"),
        ),
        with_hotkey(
            def(Recording, R, Some("Switch input recording on/off")),
            HotkeyCommand::ToggleReadOnly,
        ),
        def(RunManual, R, Some("Run the Lua manual function")),
        def(
            RunAuto,
            R,
            Some("Enable the Lua auto function (the script must register it first)"),
        ),
    ]
};

pub fn item_def(item: WindowItem) -> Option<&'static ItemDef> {
    WINDOW_ITEMS.iter().find(|s| s.item == item)
}

/// A control position captured relative to the edges it is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ItemLayout {
    item: WindowItem,
    anchor: Anchor,
    /// Distance from the left edge, or from the right edge with `RIGHT`.
    x: i32,
    /// Distance from the top edge, or from the bottom edge with `BOTTOM`.
    y: i32,
    /// Fixed width, or the right margin with `STRETCH_WIDTH`.
    width: i32,
    /// Fixed height, or the bottom margin with `STRETCH_HEIGHT`.
    height: i32,
}

#[derive(Debug, Clone, Default)]
pub struct TasEditorWindow {
    min_width: i32,
    min_height: i32,
    layouts: Vec<ItemLayout>,
    ready_for_resizing: bool,
    focused: bool,
}

impl TasEditorWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the dialog's design-time layout.
    ///
    /// `dialog_size` becomes the minimum window size, and the configured
    /// sizes are raised to it. `controls` are client-area rectangles of the
    /// controls as created from the dialog template.
    pub fn calculate_items(
        &mut self,
        config: &mut TasEditorConfig,
        dialog_size: (i32, i32),
        controls: impl IntoIterator<Item = (WindowItem, WindowRect)>,
    ) {
        let (main_width, main_height) = dialog_size;
        self.min_width = main_width;
        self.min_height = main_height;

        let placement = &mut config.placement;
        for rect in [&mut placement.current, &mut placement.saved] {
            rect.width = rect.width.max(main_width);
            rect.height = rect.height.max(main_height);
        }

        self.layouts = controls
            .into_iter()
            .map(|(item, r)| {
                let anchor = item_def(item).map(|s| s.anchor).unwrap_or_default();
                ItemLayout {
                    item,
                    anchor,
                    x: if anchor.contains(Anchor::RIGHT) {
                        main_width - r.x
                    } else {
                        r.x
                    },
                    y: if anchor.contains(Anchor::BOTTOM) {
                        main_height - r.y
                    } else {
                        r.y
                    },
                    width: if anchor.contains(Anchor::STRETCH_WIDTH) {
                        main_width - (r.x + r.width)
                    } else {
                        r.width
                    },
                    height: if anchor.contains(Anchor::STRETCH_HEIGHT) {
                        main_height - (r.y + r.height)
                    } else {
                        r.height
                    },
                }
            })
            .collect();
        self.ready_for_resizing = true;
    }

    #[inline]
    pub fn is_ready_for_resizing(&self) -> bool {
        self.ready_for_resizing
    }

    /// Minimum tracking size reported to the window manager.
    pub fn min_track_size(&self) -> Option<(i32, i32)> {
        self.ready_for_resizing.then_some((self.min_width, self.min_height))
    }

    /// Control rectangles for the window's current size.
    pub fn resize_items(&self, config: &TasEditorConfig) -> Vec<(WindowItem, WindowRect)> {
        let WindowRect { width, height, .. } = config.placement.current;
        self.layouts
            .iter()
            .map(|l| {
                let x = if l.anchor.contains(Anchor::RIGHT) {
                    width - l.x
                } else {
                    l.x
                };
                let y = if l.anchor.contains(Anchor::BOTTOM) {
                    height - l.y
                } else {
                    l.y
                };
                let w = if l.anchor.contains(Anchor::STRETCH_WIDTH) {
                    (width - l.width) - x
                } else {
                    l.width
                };
                let h = if l.anchor.contains(Anchor::STRETCH_HEIGHT) {
                    (height - l.height) - y
                } else {
                    l.height
                };
                (l.item, WindowRect::new(x, y, w, h))
            })
            .collect()
    }

    /// Current rectangle of one control, once the layout is known.
    pub fn item_rect(&self, config: &TasEditorConfig, item: WindowItem) -> Option<WindowRect> {
        self.resize_items(config)
            .into_iter()
            .find_map(|(i, rect)| (i == item).then_some(rect))
    }

    /// Placement to apply when the window is created: the saved rectangle
    /// plus the maximized flag.
    pub fn initial_placement(&self, config: &TasEditorConfig) -> (WindowRect, bool) {
        let mut rect = config.placement.saved;
        rect.x = normalize_position(rect.x);
        rect.y = normalize_position(rect.y);
        (rect, config.placement.maximized)
    }

    /// Records a move or resize reported by the window manager.
    ///
    /// Size is kept at or above the minimum. The saved placement only
    /// follows while the window is not maximized, so restoring returns to it.
    pub fn moved_or_resized(
        &mut self,
        config: &mut TasEditorConfig,
        rect: WindowRect,
        maximized: bool,
    ) {
        let current = WindowRect {
            x: normalize_position(rect.x),
            y: normalize_position(rect.y),
            width: rect.width.max(self.min_width),
            height: rect.height.max(self.min_height),
        };
        let placement = &mut config.placement;
        placement.current = current;
        placement.maximized = maximized;
        if !maximized {
            placement.saved = current;
        }
    }

    /// Tracks keyboard focus; returns `true` when it changed.
    pub fn set_focus(&mut self, focused: bool) -> bool {
        let changed = self.focused != focused;
        self.focused = focused;
        changed
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused
    }
}

fn normalize_position(v: i32) -> i32 {
    if v == MINIMIZED_POSITION { 0 } else { v }
}

/// Builds the window title.
///
/// `recording` is the recorder's caption suffix, or `None` while the movie is
/// read-only.
pub fn caption(recording: Option<&str>, project_name: &str, changed: bool) -> String {
    let mut out = String::from(WINDOW_CAPTION_BASE);
    if let Some(suffix) = recording {
        out.push_str(suffix);
    }
    if !project_name.is_empty() {
        out.push_str(" - ");
        out.push_str(project_name);
    }
    if changed {
        out.push('*');
    }
    out
}

/// Tooltip text for `def`, with the bound key appended when there is one.
pub fn tooltip_text(def: &ItemDef, hotkey_name: Option<&str>) -> Option<String> {
    let base = def.tooltip?;
    let Some(key) = hotkey_name.filter(|_| def.hotkey.is_some()) else {
        return Some(base.to_string());
    };
    let full = format!("{base} (hotkey: {key})");
    Some(full.chars().take(TOOLTIP_TEXT_MAX_LEN).collect())
}

/// All tooltips, resolving hotkey names through `key_name`.
pub fn tooltip_texts(
    mut key_name: impl FnMut(HotkeyCommand) -> Option<String>,
) -> Vec<(WindowItem, String)> {
    WINDOW_ITEMS
        .iter()
        .filter_map(|def| {
            let key = def.hotkey.and_then(&mut key_name);
            tooltip_text(def, key.as_deref()).map(|text| (def.item, text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_window() -> (TasEditorWindow, TasEditorConfig) {
        let mut window = TasEditorWindow::new();
        let mut config = TasEditorConfig::default();
        window.calculate_items(
            &mut config,
            (800, 600),
            [
                (WindowItem::PianoRoll, WindowRect::new(10, 10, 500, 550)),
                (WindowItem::PlaybackBox, WindowRect::new(600, 20, 150, 80)),
                (WindowItem::HistoryList, WindowRect::new(600, 300, 150, 250)),
                (WindowItem::NextMarker, WindowRect::new(700, 570, 20, 20)),
                (WindowItem::JumpPlaybackButton, WindowRect::new(5, 5, 10, 10)),
            ],
        );
        (window, config)
    }

    fn rect_of(rects: &[(WindowItem, WindowRect)], item: WindowItem) -> WindowRect {
        rects.iter().find(|(i, _)| *i == item).unwrap().1
    }

    #[test]
    fn item_rect_tracks_resize() {
        let (mut window, mut config) = layout_window();
        assert_eq!(
            window.item_rect(&config, WindowItem::PianoRoll),
            Some(WindowRect::new(10, 10, 500, 550))
        );
        window.moved_or_resized(&mut config, WindowRect::new(0, 0, 1000, 700), false);
        assert_eq!(
            window.item_rect(&config, WindowItem::PianoRoll),
            Some(WindowRect::new(10, 10, 700, 650))
        );
        assert!(window.item_rect(&config, WindowItem::LuaBox).is_none());
        assert!(
            TasEditorWindow::new()
                .item_rect(&config, WindowItem::PianoRoll)
                .is_none()
        );
    }

    #[test]
    fn calculate_raises_sizes_to_minimum() {
        let (window, config) = layout_window();
        assert_eq!(window.min_track_size(), Some((800, 600)));
        assert_eq!(config.placement.current.width, 800);
        assert_eq!(config.placement.saved.height, 600);
        assert!(TasEditorWindow::new().min_track_size().is_none());
    }

    #[test]
    fn same_size_reproduces_design_layout() {
        let (window, config) = layout_window();
        let rects = window.resize_items(&config);
        assert_eq!(
            rect_of(&rects, WindowItem::PianoRoll),
            WindowRect::new(10, 10, 500, 550)
        );
        assert_eq!(
            rect_of(&rects, WindowItem::NextMarker),
            WindowRect::new(700, 570, 20, 20)
        );
    }

    #[test]
    fn anchors_follow_resize() {
        let (mut window, mut config) = layout_window();
        window.moved_or_resized(&mut config, WindowRect::new(0, 0, 1000, 700), false);
        let rects = window.resize_items(&config);

        assert_eq!(
            rect_of(&rects, WindowItem::PianoRoll),
            WindowRect::new(10, 10, 700, 650)
        );
        assert_eq!(
            rect_of(&rects, WindowItem::PlaybackBox),
            WindowRect::new(800, 20, 150, 80)
        );
        assert_eq!(
            rect_of(&rects, WindowItem::HistoryList),
            WindowRect::new(800, 300, 150, 350)
        );
        assert_eq!(
            rect_of(&rects, WindowItem::NextMarker),
            WindowRect::new(900, 670, 20, 20)
        );
        assert_eq!(
            rect_of(&rects, WindowItem::JumpPlaybackButton),
            WindowRect::new(5, 5, 10, 10)
        );
    }

    #[test]
    fn resize_clamps_to_minimum_and_tracks_saved_placement() {
        let (mut window, mut config) = layout_window();
        window.moved_or_resized(&mut config, WindowRect::new(40, 50, 300, 200), false);
        assert_eq!(config.placement.current, WindowRect::new(40, 50, 800, 600));
        assert_eq!(config.placement.saved, config.placement.current);

        window.moved_or_resized(&mut config, WindowRect::new(0, 0, 1920, 1080), true);
        assert!(config.placement.maximized);
        assert_eq!(config.placement.current.width, 1920);
        assert_eq!(config.placement.saved, WindowRect::new(40, 50, 800, 600));

        let (rect, maximized) = window.initial_placement(&config);
        assert_eq!(rect, WindowRect::new(40, 50, 800, 600));
        assert!(maximized);
    }

    #[test]
    fn minimized_sentinel_is_normalized() {
        let (mut window, mut config) = layout_window();
        config.placement.saved.x = MINIMIZED_POSITION;
        let (rect, _) = window.initial_placement(&config);
        assert_eq!(rect.x, 0);

        window.moved_or_resized(
            &mut config,
            WindowRect::new(MINIMIZED_POSITION, MINIMIZED_POSITION, 900, 600),
            false,
        );
        assert_eq!((config.placement.current.x, config.placement.current.y), (0, 0));
    }

    #[test]
    fn caption_parts() {
        assert_eq!(caption(None, "", false), "TAS Editor");
        assert_eq!(
            caption(Some(" (Recording All)"), "smb.fm3", true),
            "TAS Editor (Recording All) - smb.fm3*"
        );
    }

    #[test]
    fn tooltips_append_bound_hotkeys() {
        let texts = tooltip_texts(|cmd| match cmd {
            HotkeyCommand::Pause => Some("Pause".to_string()),
            _ => None,
        });
        let play = texts
            .iter()
            .find(|(item, _)| *item == WindowItem::PlayStop)
            .unwrap();
        assert_eq!(play.1, "Pause/unpause emulation (Middle button) (hotkey: Pause)");

        let recording = texts
            .iter()
            .find(|(item, _)| *item == WindowItem::Recording)
            .unwrap();
        assert_eq!(recording.1, "Switch input recording on/off");
        assert!(texts.iter().all(|(item, _)| *item != WindowItem::PianoRoll));
    }

    #[test]
    fn tooltip_with_long_key_is_clamped() {
        let def = item_def(WindowItem::ProgressButton).unwrap();
        let key = "K".repeat(200);
        let text = tooltip_text(def, Some(&key)).unwrap();
        assert_eq!(text.chars().count(), TOOLTIP_TEXT_MAX_LEN);

        let plain = item_def(WindowItem::Rewind).unwrap();
        assert!(!tooltip_text(plain, Some("X")).unwrap().contains("hotkey"));
    }

    #[test]
    fn focus_changes_are_reported() {
        let mut window = TasEditorWindow::new();
        assert!(window.set_focus(true));
        assert!(!window.set_focus(true));
        assert!(window.is_focused());
    }
}
