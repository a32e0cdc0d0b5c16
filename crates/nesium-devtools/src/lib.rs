//! Developer tooling models for the nesium NES emulator: the debugger's
//! bookmark list and assembly view, and the TAS Editor window's settings,
//! recent projects, layout and command dispatch.

pub mod context;
pub mod debugger;
pub mod error;
pub mod tas;

pub use context::{Devtools, DevtoolsState};
pub use debugger::bookmarks::{Bookmark, BookmarkManager};
pub use debugger::{
    DebuggerAction, DebuggerEffect, DebuggerSession, DebuggerUpdate, ExecutionCommand,
    parse_address,
};
pub use error::DevtoolsError as Error;
pub use tas::{TasEditor, TasEditorCommand};
