//! Debugger panel state and the actions the panel's widgets send to it.

pub mod asm_view;
pub mod bookmarks;
pub mod settings;

use bitflags::bitflags;
use strum::{Display, EnumIter, EnumString};
use tracing::debug;

use crate::error::DevtoolsError;
use asm_view::{AsmView, Disassembler};
use bookmarks::{Bookmark, BookmarkManager};
use settings::{DebuggerOption, DebuggerSettings, ThresholdKind};

/// Execution control buttons of the debugger toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ExecutionCommand {
    Run,
    StepInto,
    StepOut,
    StepOver,
    /// Run until the scanline changes.
    RunLine,
    #[strum(serialize = "run-128")]
    Run128Lines,
}

/// Work the emulator or another tool window has to carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebuggerEffect {
    Execute(ExecutionCommand),
    ResetCounters,
    ReloadSymbols,
    /// Opens the breakpoint dialog prefilled with `addr`.
    AddBreakpoint { addr: u16 },
    /// Opens the symbol dialog prefilled with `addr`.
    AddSymbol { addr: u16 },
    OpenHexEditor { addr: u16 },
}

/// Action sent from the debugger panel widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebuggerAction {
    /// "Add" button or dialog: bookmark `addr` with an optional name.
    AddBookmark { addr: u16, name: Option<String> },
    /// Context menu on the assembly view, at visible row `row`.
    AddBookmarkAtContext { row: usize, name: Option<String> },
    EditBookmark { addr: u16, name: String },
    DeleteBookmark { addr: u16 },
    ClearBookmarks,
    /// Text typed into the bookmark address field.
    SelectBookmarkAddress(String),
    /// Single click on a bookmark row.
    BookmarkClicked { addr: u16 },
    /// Double click on a bookmark row: jump the assembly view there.
    BookmarkDoubleClicked { addr: u16 },
    SeekTo { addr: u16 },
    SeekPc,
    SetOption { option: DebuggerOption, enabled: bool },
    SetThresholdEnabled { kind: ThresholdKind, enabled: bool },
    SetThresholdText { kind: ThresholdKind, text: String },
    Execute(ExecutionCommand),
    /// Zeroes the cycle and instruction counters.
    ResetCounters,
    ReloadSymbols,
    AddBreakpointAtContext { row: usize },
    AddSymbolAtContext { row: usize },
    OpenHexEditorAtContext { row: usize },
}

bitflags! {
    /// Parts of the panel that must be redrawn after an action.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct DebuggerUpdate: u8 {
        const BOOKMARKS = 1 << 0;
        const ASM_VIEW = 1 << 1;
        const SETTINGS = 1 << 2;
        /// The listing must be pulled again from the disassembler.
        const RELISTING = 1 << 3;
    }
}

/// State behind one debugger window.
///
/// Owned by the application and used from the UI thread only.
#[derive(Debug, Clone, Default)]
pub struct DebuggerSession {
    bookmarks: BookmarkManager,
    asm: AsmView,
    settings: DebuggerSettings,
    selected_bookmark_addr: Option<u16>,
    effects: Vec<DebuggerEffect>,
}

impl DebuggerSession {
    pub fn new(settings: DebuggerSettings) -> Self {
        let mut session = Self {
            settings,
            ..Default::default()
        };
        session.sync_view_options();
        session
    }

    #[inline]
    pub fn bookmarks(&self) -> &BookmarkManager {
        &self.bookmarks
    }

    /// Direct access for loaders that repopulate bookmarks.
    #[inline]
    pub fn bookmarks_mut(&mut self) -> &mut BookmarkManager {
        &mut self.bookmarks
    }

    #[inline]
    pub fn asm_view(&self) -> &AsmView {
        &self.asm
    }

    #[inline]
    pub fn asm_view_mut(&mut self) -> &mut AsmView {
        &mut self.asm
    }

    #[inline]
    pub fn settings(&self) -> &DebuggerSettings {
        &self.settings
    }

    #[inline]
    pub fn selected_bookmark_addr(&self) -> Option<u16> {
        self.selected_bookmark_addr
    }

    /// Rows for the bookmark list, in address order.
    pub fn bookmark_rows(&self) -> Vec<Bookmark> {
        self.bookmarks.to_vec()
    }

    /// Takes the effects queued by [`DebuggerSession::handle`] since the
    /// last call.
    pub fn drain_effects(&mut self) -> Vec<DebuggerEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn refresh(&mut self, source: &mut dyn Disassembler) {
        self.asm.refresh(source);
    }

    /// Called when execution stops on a breakpoint at `pc`.
    ///
    /// Pulls a fresh listing, scrolls to the PC and returns the bookmark at
    /// that address, if there is one.
    pub fn on_breakpoint_hit(&mut self, source: &mut dyn Disassembler) -> Option<&Bookmark> {
        self.asm.refresh(source);
        self.asm.scroll_to_pc();
        let pc = source.pc();
        let hit = self.bookmarks.get(pc);
        if let Some(bookmark) = hit {
            debug!("breakpoint at bookmark ${:04X} {:?}", pc, bookmark.name);
        }
        hit
    }

    pub fn handle(&mut self, action: DebuggerAction) -> Result<DebuggerUpdate, DevtoolsError> {
        debug!("debugger action: {:?}", action);
        let update = match action {
            DebuggerAction::AddBookmark { addr, name } => {
                self.bookmarks.add(addr, name.as_deref());
                DebuggerUpdate::BOOKMARKS
            }
            DebuggerAction::AddBookmarkAtContext { row, name } => {
                let addr = self.context_addr(row)?;
                self.bookmarks.add(addr, name.as_deref());
                DebuggerUpdate::BOOKMARKS
            }
            DebuggerAction::EditBookmark { addr, name } => {
                self.bookmarks.edit(addr, &name)?;
                DebuggerUpdate::BOOKMARKS
            }
            DebuggerAction::DeleteBookmark { addr } => {
                self.bookmarks.delete(addr)?;
                if self.selected_bookmark_addr == Some(addr) {
                    self.selected_bookmark_addr = None;
                }
                DebuggerUpdate::BOOKMARKS
            }
            DebuggerAction::ClearBookmarks => {
                self.bookmarks.clear();
                self.selected_bookmark_addr = None;
                DebuggerUpdate::BOOKMARKS
            }
            DebuggerAction::SelectBookmarkAddress(text) => {
                self.selected_bookmark_addr = Some(parse_address(&text)?);
                DebuggerUpdate::empty()
            }
            DebuggerAction::BookmarkClicked { addr } => {
                self.selected_bookmark_addr = Some(addr);
                DebuggerUpdate::empty()
            }
            DebuggerAction::BookmarkDoubleClicked { addr } => {
                if !self.bookmarks.contains(addr) {
                    return Err(DevtoolsError::NotFound { addr });
                }
                self.selected_bookmark_addr = Some(addr);
                self.asm.scroll_to_addr(addr);
                DebuggerUpdate::ASM_VIEW
            }
            DebuggerAction::SeekTo { addr } => {
                self.asm.scroll_to_addr(addr);
                DebuggerUpdate::ASM_VIEW
            }
            DebuggerAction::SeekPc => {
                self.asm.scroll_to_pc();
                DebuggerUpdate::ASM_VIEW
            }
            DebuggerAction::SetOption { option, enabled } => {
                if !self.settings.set(option, enabled) {
                    return Ok(DebuggerUpdate::empty());
                }
                self.sync_view_options();
                match option {
                    DebuggerOption::RomOffsets => {
                        DebuggerUpdate::SETTINGS | DebuggerUpdate::ASM_VIEW
                    }
                    DebuggerOption::SymbolicDebug | DebuggerOption::RegisterNames => {
                        DebuggerUpdate::SETTINGS | DebuggerUpdate::RELISTING
                    }
                    _ => DebuggerUpdate::SETTINGS,
                }
            }
            DebuggerAction::SetThresholdEnabled { kind, enabled } => {
                self.settings.threshold_mut(kind).enabled = enabled;
                DebuggerUpdate::SETTINGS
            }
            DebuggerAction::SetThresholdText { kind, text } => {
                if self.settings.threshold_mut(kind).set_limit_text(&text) {
                    DebuggerUpdate::SETTINGS
                } else {
                    DebuggerUpdate::empty()
                }
            }
            DebuggerAction::Execute(command) => {
                self.effects.push(DebuggerEffect::Execute(command));
                DebuggerUpdate::empty()
            }
            DebuggerAction::ResetCounters => {
                self.effects.push(DebuggerEffect::ResetCounters);
                DebuggerUpdate::empty()
            }
            DebuggerAction::ReloadSymbols => {
                self.effects.push(DebuggerEffect::ReloadSymbols);
                DebuggerUpdate::RELISTING
            }
            DebuggerAction::AddBreakpointAtContext { row } => {
                let addr = self.context_addr(row)?;
                self.effects.push(DebuggerEffect::AddBreakpoint { addr });
                DebuggerUpdate::empty()
            }
            DebuggerAction::AddSymbolAtContext { row } => {
                let addr = self.context_addr(row)?;
                self.effects.push(DebuggerEffect::AddSymbol { addr });
                DebuggerUpdate::empty()
            }
            DebuggerAction::OpenHexEditorAtContext { row } => {
                let addr = self.context_addr(row)?;
                self.effects.push(DebuggerEffect::OpenHexEditor { addr });
                DebuggerUpdate::empty()
            }
        };
        Ok(update)
    }

    pub fn into_parts(self) -> (BookmarkManager, DebuggerSettings) {
        (self.bookmarks, self.settings)
    }

    fn context_addr(&self, row: usize) -> Result<u16, DevtoolsError> {
        self.asm
            .context_addr(row)
            .ok_or_else(|| DevtoolsError::InvalidAddress(format!("row {row}")))
    }

    fn sync_view_options(&mut self) {
        self.asm.set_display_rom_offsets(self.settings.display_rom_offsets);
        self.asm.set_symbolic_debug(self.settings.symbolic_debug);
        self.asm.set_register_names(self.settings.register_names);
    }
}

/// Parses a CPU address typed by the user: hex, with optional `$` or `0x`.
pub fn parse_address(text: &str) -> Result<u16, DevtoolsError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix('$')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() {
        return Err(DevtoolsError::InvalidAddress(text.to_string()));
    }
    u16::from_str_radix(digits, 16).map_err(|_| DevtoolsError::InvalidAddress(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::asm_view::{AsmEntry, ListingOptions};
    use super::*;

    struct Listing {
        pc: u16,
    }

    impl Disassembler for Listing {
        fn listing(&mut self, _options: ListingOptions) -> Vec<AsmEntry> {
            (0..64u16)
                .map(|i| AsmEntry::instruction(0xC000 + i * 2, &[0xEA, 0xEA], "NOP"))
                .collect()
        }

        fn pc(&self) -> u16 {
            self.pc
        }
    }

    #[test]
    fn parse_address_accepts_prefixes() {
        assert_eq!(parse_address("C000").unwrap(), 0xC000);
        assert_eq!(parse_address(" $8010 ").unwrap(), 0x8010);
        assert_eq!(parse_address("0xfffa").unwrap(), 0xFFFA);
        assert!(matches!(
            parse_address("$"),
            Err(DevtoolsError::InvalidAddress(_))
        ));
        assert!(parse_address("10000").is_err());
        assert!(parse_address("zz").is_err());
    }

    #[test]
    fn bookmark_actions_report_list_updates() {
        let mut session = DebuggerSession::default();
        let update = session
            .handle(DebuggerAction::AddBookmark {
                addr: 0x8000,
                name: Some("entry".into()),
            })
            .unwrap();
        assert_eq!(update, DebuggerUpdate::BOOKMARKS);

        session
            .handle(DebuggerAction::EditBookmark {
                addr: 0x8000,
                name: "reset".into(),
            })
            .unwrap();
        assert_eq!(session.bookmark_rows(), vec![Bookmark::new(0x8000, "reset")]);

        let err = session
            .handle(DebuggerAction::DeleteBookmark { addr: 0x9000 })
            .unwrap_err();
        assert!(matches!(err, DevtoolsError::NotFound { addr: 0x9000 }));
        assert_eq!(session.bookmarks().len(), 1);
    }

    #[test]
    fn delete_clears_matching_selection() {
        let mut session = DebuggerSession::default();
        session.bookmarks_mut().add(0x10, None);
        session
            .handle(DebuggerAction::SelectBookmarkAddress("$10".into()))
            .unwrap();
        assert_eq!(session.selected_bookmark_addr(), Some(0x10));

        session
            .handle(DebuggerAction::DeleteBookmark { addr: 0x10 })
            .unwrap();
        assert_eq!(session.selected_bookmark_addr(), None);
    }

    #[test]
    fn context_menu_bookmark_uses_visible_row() {
        let mut session = DebuggerSession::default();
        session.asm_view_mut().set_view_size(8, 40);
        session.refresh(&mut Listing { pc: 0xC000 });
        session.asm_view_mut().set_line(10);

        session
            .handle(DebuggerAction::AddBookmarkAtContext {
                row: 2,
                name: Some("loop".into()),
            })
            .unwrap();
        assert_eq!(
            session.bookmarks().get(0xC018).map(|b| b.name.as_str()),
            Some("loop")
        );

        assert!(
            session
                .handle(DebuggerAction::AddBookmarkAtContext { row: 8, name: None })
                .is_err()
        );
    }

    #[test]
    fn double_click_jumps_to_bookmark() {
        let mut session = DebuggerSession::default();
        session.asm_view_mut().set_view_size(4, 40);
        session.refresh(&mut Listing { pc: 0xC000 });
        session.bookmarks_mut().add(0xC040, Some("far"));

        let update = session
            .handle(DebuggerAction::BookmarkDoubleClicked { addr: 0xC040 })
            .unwrap();
        assert_eq!(update, DebuggerUpdate::ASM_VIEW);
        assert!(session.asm_view().is_line_visible(32));
        assert_eq!(session.selected_bookmark_addr(), Some(0xC040));

        assert!(
            session
                .handle(DebuggerAction::BookmarkDoubleClicked { addr: 0xC042 })
                .is_err()
        );
    }

    #[test]
    fn options_flow_into_view() {
        let mut session = DebuggerSession::default();
        let update = session
            .handle(DebuggerAction::SetOption {
                option: DebuggerOption::SymbolicDebug,
                enabled: false,
            })
            .unwrap();
        assert!(update.contains(DebuggerUpdate::RELISTING));
        assert!(!session.asm_view().listing_options().symbolic_debug);

        let unchanged = session
            .handle(DebuggerAction::SetOption {
                option: DebuggerOption::SymbolicDebug,
                enabled: false,
            })
            .unwrap();
        assert!(unchanged.is_empty());
    }

    #[test]
    fn threshold_actions() {
        let mut session = DebuggerSession::default();
        session
            .handle(DebuggerAction::SetThresholdEnabled {
                kind: ThresholdKind::Instructions,
                enabled: true,
            })
            .unwrap();
        let update = session
            .handle(DebuggerAction::SetThresholdText {
                kind: ThresholdKind::Instructions,
                text: "1000".into(),
            })
            .unwrap();
        assert_eq!(update, DebuggerUpdate::SETTINGS);
        assert!(session.settings().instruction_break.is_exceeded(1001));

        let ignored = session
            .handle(DebuggerAction::SetThresholdText {
                kind: ThresholdKind::Instructions,
                text: "12x".into(),
            })
            .unwrap();
        assert!(ignored.is_empty());
        assert_eq!(session.settings().instruction_break.limit, 1000);
    }

    #[test]
    fn execution_buttons_queue_effects() {
        use strum::IntoEnumIterator;

        let mut session = DebuggerSession::default();
        for command in ExecutionCommand::iter() {
            let update = session.handle(DebuggerAction::Execute(command)).unwrap();
            assert!(update.is_empty());
        }
        let update = session.handle(DebuggerAction::ResetCounters).unwrap();
        assert!(update.is_empty());
        let update = session.handle(DebuggerAction::ReloadSymbols).unwrap();
        assert_eq!(update, DebuggerUpdate::RELISTING);

        assert_eq!(
            session.drain_effects(),
            [
                DebuggerEffect::Execute(ExecutionCommand::Run),
                DebuggerEffect::Execute(ExecutionCommand::StepInto),
                DebuggerEffect::Execute(ExecutionCommand::StepOut),
                DebuggerEffect::Execute(ExecutionCommand::StepOver),
                DebuggerEffect::Execute(ExecutionCommand::RunLine),
                DebuggerEffect::Execute(ExecutionCommand::Run128Lines),
                DebuggerEffect::ResetCounters,
                DebuggerEffect::ReloadSymbols,
            ]
        );
        assert!(session.drain_effects().is_empty());
        assert_eq!(
            "run-128".parse::<ExecutionCommand>().unwrap(),
            ExecutionCommand::Run128Lines
        );
    }

    #[test]
    fn context_menu_tools_resolve_row() {
        let mut session = DebuggerSession::default();
        session.asm_view_mut().set_view_size(8, 40);
        session.refresh(&mut Listing { pc: 0xC000 });
        session.asm_view_mut().set_line(4);

        session
            .handle(DebuggerAction::AddBreakpointAtContext { row: 0 })
            .unwrap();
        session
            .handle(DebuggerAction::AddSymbolAtContext { row: 1 })
            .unwrap();
        session
            .handle(DebuggerAction::OpenHexEditorAtContext { row: 7 })
            .unwrap();
        assert_eq!(
            session.drain_effects(),
            [
                DebuggerEffect::AddBreakpoint { addr: 0xC008 },
                DebuggerEffect::AddSymbol { addr: 0xC00A },
                DebuggerEffect::OpenHexEditor { addr: 0xC016 },
            ]
        );

        for action in [
            DebuggerAction::AddBreakpointAtContext { row: 8 },
            DebuggerAction::AddSymbolAtContext { row: 8 },
            DebuggerAction::OpenHexEditorAtContext { row: 8 },
        ] {
            assert!(matches!(
                session.handle(action),
                Err(DevtoolsError::InvalidAddress(_))
            ));
        }
        assert!(session.drain_effects().is_empty());
        assert!(session.bookmarks().is_empty());
    }

    #[test]
    fn breakpoint_hit_reports_bookmark() {
        let mut session = DebuggerSession::default();
        session.asm_view_mut().set_view_size(4, 40);
        session.bookmarks_mut().add(0xC020, Some("handler"));

        let hit = session.on_breakpoint_hit(&mut Listing { pc: 0xC020 }).cloned();
        assert_eq!(hit, Some(Bookmark::new(0xC020, "handler")));
        assert!(session.asm_view().is_line_visible(16));

        assert!(session.on_breakpoint_hit(&mut Listing { pc: 0xC000 }).is_none());
    }
}
