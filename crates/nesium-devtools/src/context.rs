use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::debugger::DebuggerSession;
use crate::debugger::bookmarks::{Bookmark, BookmarkManager};
use crate::debugger::settings::DebuggerSettings;
use crate::error::DevtoolsError;
use crate::tas::{RecentProjects, TasEditor, TasEditorConfig};

/// Everything the developer tools remember between runs.
///
/// Encoding only; where the bytes are stored is up to the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevtoolsState {
    pub bookmarks: Vec<Bookmark>,
    pub debugger: DebuggerSettings,
    pub tas_editor: TasEditorConfig,
    pub recent_projects: RecentProjects,
}

impl DevtoolsState {
    pub fn to_postcard_bytes(&self) -> Result<Vec<u8>, DevtoolsError> {
        Ok(postcard::to_stdvec(self)?)
    }

    pub fn from_postcard_bytes(bytes: &[u8]) -> Result<Self, DevtoolsError> {
        Ok(postcard::from_bytes(bytes)?)
    }
}

/// Debugger and TAS Editor state owned by the application.
#[derive(Debug, Clone, Default)]
pub struct Devtools {
    pub debugger: DebuggerSession,
    pub tas_editor: TasEditor,
}

impl Devtools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the tools from a saved state. Bookmarks are re-added one by
    /// one, so their stored order does not matter.
    pub fn restore(state: DevtoolsState) -> Self {
        let DevtoolsState {
            bookmarks,
            debugger,
            tas_editor,
            recent_projects,
        } = state;

        let mut session = DebuggerSession::new(debugger);
        *session.bookmarks_mut() = bookmarks.into_iter().collect::<BookmarkManager>();
        debug!(
            bookmarks = session.bookmarks().len(),
            recent = recent_projects.len(),
            "devtools state restored"
        );

        Self {
            debugger: session,
            tas_editor: TasEditor::new(tas_editor, recent_projects),
        }
    }

    pub fn capture(&self) -> DevtoolsState {
        DevtoolsState {
            bookmarks: self.debugger.bookmark_rows(),
            debugger: self.debugger.settings().clone(),
            tas_editor: self.tas_editor.config().clone(),
            recent_projects: self.tas_editor.recent().clone(),
        }
    }

    pub fn save_bytes(&self) -> Result<Vec<u8>, DevtoolsError> {
        self.capture().to_postcard_bytes()
    }

    pub fn load_bytes(bytes: &[u8]) -> Result<Self, DevtoolsError> {
        DevtoolsState::from_postcard_bytes(bytes).map(Self::restore)
    }
}
