//! TAS Editor window model.
//!
//! [`TasEditor`] owns the editor configuration, the recent project list and
//! the window geometry. The movie engine (playback, greenzone, history,
//! splicer, selection, markers) lives elsewhere and is driven through the
//! [`Effect`]s returned by [`TasEditor::dispatch`].

pub mod command;
pub mod config;
pub mod recent;
pub mod window;

use std::path::Path;

use tracing::{info, warn};

pub use command::{
    Dispatch, Effect, MarkerOp, Multitrack, NoteEditFocus, PianoRollScroll, PlaybackOp, ProjectOp,
    Redraw, SelectionOp, SplicerOp, TasEditorCommand, TextEditOp, Transpose, UiContext,
};
pub use config::{ConfigToggle, LimitChange, Superimpose, TasEditorConfig, WindowRect};
pub use recent::RecentProjects;
pub use window::{TasEditorWindow, WindowItem};

#[derive(Debug, Clone, Default)]
pub struct TasEditor {
    config: TasEditorConfig,
    recent: RecentProjects,
    window: TasEditorWindow,
}

impl TasEditor {
    pub fn new(config: TasEditorConfig, recent: RecentProjects) -> Self {
        Self {
            config,
            recent,
            window: TasEditorWindow::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &TasEditorConfig {
        &self.config
    }

    #[inline]
    pub fn recent(&self) -> &RecentProjects {
        &self.recent
    }

    #[inline]
    pub fn window(&self) -> &TasEditorWindow {
        &self.window
    }

    /// Lays out the window from its dialog template. See
    /// [`TasEditorWindow::calculate_items`].
    pub fn init_window(
        &mut self,
        dialog_size: (i32, i32),
        controls: impl IntoIterator<Item = (WindowItem, WindowRect)>,
    ) -> (WindowRect, bool) {
        self.window.calculate_items(&mut self.config, dialog_size, controls);
        self.window.initial_placement(&self.config)
    }

    /// Records a move or resize and returns the new control rectangles.
    pub fn moved_or_resized(
        &mut self,
        rect: WindowRect,
        maximized: bool,
    ) -> Vec<(WindowItem, WindowRect)> {
        self.window.moved_or_resized(&mut self.config, rect, maximized);
        if self.window.is_ready_for_resizing() {
            self.window.resize_items(&self.config)
        } else {
            Vec::new()
        }
    }

    /// Background input is allowed only while the editor has focus.
    pub fn on_activate(&mut self, focused: bool) -> Option<Effect> {
        self.window
            .set_focus(focused)
            .then_some(Effect::SetBackgroundInput(focused))
    }

    pub fn caption(&self, recording: Option<&str>, project_name: &str, changed: bool) -> String {
        window::caption(recording, project_name, changed)
    }

    /// Tooltip texts, or nothing when tooltips are switched off.
    pub fn tooltips(
        &self,
        key_name: impl FnMut(window::HotkeyCommand) -> Option<String>,
    ) -> Vec<(WindowItem, String)> {
        if self.config.tooltips {
            window::tooltip_texts(key_name)
        } else {
            Vec::new()
        }
    }

    pub fn project_opened(&mut self, path: impl AsRef<Path>) -> Redraw {
        info!(path = %path.as_ref().display(), "project opened");
        self.recent.add(path);
        Redraw::RECENT_MENU | Redraw::CAPTION
    }

    pub fn project_saved(&mut self, path: impl AsRef<Path>) -> Redraw {
        self.recent.add(path);
        Redraw::RECENT_MENU | Redraw::CAPTION
    }

    /// Finishes a failed recent-project load. With `remove` the user agreed
    /// to drop the entry from the list.
    pub fn recent_project_failed(&mut self, slot: usize, remove: bool) -> Redraw {
        if !remove {
            return Redraw::empty();
        }
        match self.recent.remove(slot) {
            Some(path) => {
                warn!(slot, path = %path.display(), "removed unreadable recent project");
                Redraw::RECENT_MENU
            }
            None => Redraw::empty(),
        }
    }

    pub fn into_parts(self) -> (TasEditorConfig, RecentProjects) {
        (self.config, self.recent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_flow() {
        let mut ed = TasEditor::default();
        assert!(ed.project_opened("a.fm3").contains(Redraw::RECENT_MENU));
        ed.project_saved("b.fm3");
        assert_eq!(ed.recent().get(0), Some(Path::new("b.fm3")));

        assert!(ed.recent_project_failed(1, false).is_empty());
        assert_eq!(ed.recent().len(), 2);
        assert_eq!(ed.recent_project_failed(1, true), Redraw::RECENT_MENU);
        assert_eq!(ed.recent().len(), 1);
        assert!(ed.recent_project_failed(7, true).is_empty());
    }

    #[test]
    fn activation_toggles_background_input_once() {
        let mut ed = TasEditor::default();
        assert_eq!(ed.on_activate(true), Some(Effect::SetBackgroundInput(true)));
        assert_eq!(ed.on_activate(true), None);
        assert_eq!(ed.on_activate(false), Some(Effect::SetBackgroundInput(false)));
    }

    #[test]
    fn window_resize_flow() {
        let mut ed = TasEditor::default();
        assert!(
            ed.moved_or_resized(WindowRect::new(0, 0, 100, 100), false)
                .is_empty()
        );

        let (rect, maximized) = ed.init_window(
            (640, 480),
            [(WindowItem::PianoRoll, WindowRect::new(0, 0, 400, 480))],
        );
        assert!(!maximized);
        assert_eq!((rect.width, rect.height), (640, 480));

        let rects = ed.moved_or_resized(WindowRect::new(10, 10, 840, 480), false);
        assert_eq!(rects, [(WindowItem::PianoRoll, WindowRect::new(0, 0, 600, 480))]);
    }

    #[test]
    fn tooltips_follow_config() {
        let mut ed = TasEditor::default();
        assert!(!ed.tooltips(|_| None).is_empty());
        ed.dispatch(
            TasEditorCommand::Toggle(ConfigToggle::Tooltips),
            &UiContext::default(),
        )
        .unwrap();
        assert!(ed.tooltips(|_| None).is_empty());
    }
}
