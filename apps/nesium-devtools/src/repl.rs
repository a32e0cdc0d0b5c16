use std::str::FromStr;

use anyhow::{Context, bail};
use nesium_devtools::debugger::settings::{DebuggerOption, ThresholdKind};
use nesium_devtools::tas::window::caption;
use nesium_devtools::tas::{ConfigToggle, Dispatch, TasEditorCommand, UiContext};
use nesium_devtools::{DebuggerAction, DebuggerUpdate, Devtools, ExecutionCommand, parse_address};
use tracing::debug;

use crate::listing::ByteListing;

/// Autofire patterns offered by the pattern menu.
const PATTERN_COUNT: usize = 4;

const HELP: &[&str] = &[
    "bm add <addr> [name]      bookmark an address (replaces an existing one)",
    "bm edit <addr> <name>     rename a bookmark",
    "bm del <addr>             delete a bookmark",
    "bm get <addr>             show one bookmark",
    "bm list | bm clear",
    "asm load <addr> <hex>     load bytes into the assembly view",
    "asm pc <addr>             stop at <addr> as if a breakpoint hit",
    "asm seek <addr> | asm show",
    "asm bp|sym|hex <row>      context menu on a visible row",
    "dbg <option> on|off       e.g. dbg rom-offsets on",
    "dbg run | step-into | step-out | step-over | run-line | run-128",
    "dbg reset-counters | dbg reload-symbols",
    "dbg break <cpu-cycles|instructions> on|off|<count>",
    "dbg show",
    "recent add <path> | recent rm <slot> | recent open <slot> | recent list",
    "tas toggle <name> | tas superimpose | tas pattern <n>",
    "tas greenzone <n> | tas undo <n> | tas autosave <minutes> | tas show",
    "state                     print saved state as hex",
    "load <hex>                restore saved state",
    "help | quit",
];

pub enum Outcome {
    Output(Vec<String>),
    Quit,
}

impl Outcome {
    fn line(text: impl Into<String>) -> Self {
        Self::Output(vec![text.into()])
    }

    fn none() -> Self {
        Self::Output(Vec::new())
    }
}

pub struct Repl {
    tools: Devtools,
    listing: ByteListing,
    view_lines: usize,
}

impl Repl {
    pub fn new(view_lines: usize) -> Self {
        let mut repl = Self {
            tools: Devtools::new(),
            listing: ByteListing::default(),
            view_lines,
        };
        repl.apply_view_size();
        repl
    }

    pub fn execute(&mut self, line: &str) -> anyhow::Result<Outcome> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Outcome::none());
        }
        debug!(line, "command");

        let (head, rest) = split_word(line);
        match head {
            "bm" => self.bookmark(rest),
            "asm" => self.asm(rest),
            "dbg" => self.debugger(rest),
            "recent" => self.recent(rest),
            "tas" => self.tas(rest),
            "state" => Ok(Outcome::line(hex::encode(self.tools.save_bytes()?))),
            "load" => {
                let bytes = hex::decode(rest.trim()).context("state must be hex")?;
                self.tools = Devtools::load_bytes(&bytes)?;
                self.apply_view_size();
                Ok(Outcome::line(format!(
                    "restored {} bookmarks",
                    self.tools.debugger.bookmarks().len()
                )))
            }
            "help" => Ok(Outcome::Output(
                HELP.iter().map(|s| s.to_string()).collect(),
            )),
            "quit" | "exit" => Ok(Outcome::Quit),
            other => bail!("unknown command `{other}` (try `help`)"),
        }
    }

    fn bookmark(&mut self, args: &str) -> anyhow::Result<Outcome> {
        let (sub, rest) = split_word(args);
        let (addr_text, name) = split_word(rest);
        let session = &mut self.tools.debugger;
        match sub {
            "add" => {
                let addr = parse_address(addr_text)?;
                let name = (!name.is_empty()).then(|| name.to_string());
                session.handle(DebuggerAction::AddBookmark { addr, name })?;
                self.relabel();
                Ok(Outcome::none())
            }
            "edit" => {
                let addr = parse_address(addr_text)?;
                session.handle(DebuggerAction::EditBookmark {
                    addr,
                    name: name.to_string(),
                })?;
                self.relabel();
                Ok(Outcome::none())
            }
            "del" => {
                let addr = parse_address(addr_text)?;
                session.handle(DebuggerAction::DeleteBookmark { addr })?;
                self.relabel();
                Ok(Outcome::none())
            }
            "get" => {
                let addr = parse_address(addr_text)?;
                let bookmark = session
                    .bookmarks()
                    .get(addr)
                    .with_context(|| format!("no bookmark at ${addr:04X}"))?;
                Ok(Outcome::line(format!("${:04X} {}", bookmark.addr, bookmark.name)))
            }
            "list" => Ok(Outcome::Output(
                session
                    .bookmark_rows()
                    .into_iter()
                    .map(|b| format!("${:04X} {}", b.addr, b.name))
                    .collect(),
            )),
            "clear" => {
                session.handle(DebuggerAction::ClearBookmarks)?;
                self.relabel();
                Ok(Outcome::none())
            }
            other => bail!("unknown bookmark command `{other}`"),
        }
    }

    fn asm(&mut self, args: &str) -> anyhow::Result<Outcome> {
        let (sub, rest) = split_word(args);
        let (addr_text, tail) = split_word(rest);
        match sub {
            "load" => {
                let origin = parse_address(addr_text)?;
                let bytes = hex::decode(tail.trim()).context("bytes must be hex")?;
                self.listing.load(origin, bytes)?;
                self.tools.debugger.refresh(&mut self.listing);
                Ok(self.render_asm())
            }
            "pc" => {
                self.listing.pc = parse_address(addr_text)?;
                let hit = self
                    .tools
                    .debugger
                    .on_breakpoint_hit(&mut self.listing)
                    .map(|b| format!("hit bookmark ${:04X} {}", b.addr, b.name));
                let mut out = hit.into_iter().collect::<Vec<_>>();
                if let Outcome::Output(lines) = self.render_asm() {
                    out.extend(lines);
                }
                Ok(Outcome::Output(out))
            }
            "seek" => {
                let addr = parse_address(addr_text)?;
                self.tools.debugger.handle(DebuggerAction::SeekTo { addr })?;
                Ok(self.render_asm())
            }
            "show" => Ok(self.render_asm()),
            "bp" | "sym" | "hex" => {
                let row = parse_number(addr_text)? as usize;
                let action = match sub {
                    "bp" => DebuggerAction::AddBreakpointAtContext { row },
                    "sym" => DebuggerAction::AddSymbolAtContext { row },
                    _ => DebuggerAction::OpenHexEditorAtContext { row },
                };
                self.tools.debugger.handle(action)?;
                Ok(self.debugger_effects())
            }
            other => bail!("unknown asm command `{other}`"),
        }
    }

    fn debugger(&mut self, args: &str) -> anyhow::Result<Outcome> {
        let (sub, rest) = split_word(args);
        let session = &mut self.tools.debugger;
        match sub {
            "show" => {
                let settings = session.settings();
                Ok(Outcome::Output(
                    [
                        DebuggerOption::RomOffsets,
                        DebuggerOption::SymbolicDebug,
                        DebuggerOption::RegisterNames,
                        DebuggerOption::AutoOpen,
                        DebuggerOption::DebFileAutoLoad,
                        DebuggerOption::BreakOnBadOpcodes,
                        DebuggerOption::IdaFont,
                    ]
                    .into_iter()
                    .map(|o| format!("{o} = {}", on_off(settings.get(o))))
                    .chain([ThresholdKind::CpuCycles, ThresholdKind::Instructions].map(
                        |k| {
                            let t = settings.threshold(k);
                            format!("break {k} = {} > {}", on_off(t.enabled), t.limit)
                        },
                    ))
                    .collect(),
                ))
            }
            "break" => {
                let (kind, value) = split_word(rest);
                let kind = ThresholdKind::from_str(kind)
                    .with_context(|| format!("unknown threshold `{kind}`"))?;
                let action = match value.trim() {
                    "on" => DebuggerAction::SetThresholdEnabled {
                        kind,
                        enabled: true,
                    },
                    "off" => DebuggerAction::SetThresholdEnabled {
                        kind,
                        enabled: false,
                    },
                    text => DebuggerAction::SetThresholdText {
                        kind,
                        text: text.to_string(),
                    },
                };
                let update = session.handle(action)?;
                if update.is_empty() {
                    bail!("threshold unchanged: `{}` is not a count", value.trim());
                }
                Ok(Outcome::none())
            }
            "reset-counters" | "reload-symbols" => {
                let action = if sub == "reset-counters" {
                    DebuggerAction::ResetCounters
                } else {
                    DebuggerAction::ReloadSymbols
                };
                if session.handle(action)?.contains(DebuggerUpdate::RELISTING) {
                    session.refresh(&mut self.listing);
                }
                Ok(self.debugger_effects())
            }
            name => {
                if let Ok(command) = ExecutionCommand::from_str(name) {
                    session.handle(DebuggerAction::Execute(command))?;
                    return Ok(self.debugger_effects());
                }
                let option = DebuggerOption::from_str(name)
                    .with_context(|| format!("unknown debugger option `{name}`"))?;
                let enabled = parse_on_off(rest)?;
                let update = session.handle(DebuggerAction::SetOption { option, enabled })?;
                if update.contains(DebuggerUpdate::RELISTING) {
                    session.refresh(&mut self.listing);
                }
                Ok(Outcome::none())
            }
        }
    }

    fn recent(&mut self, args: &str) -> anyhow::Result<Outcome> {
        let (sub, rest) = split_word(args);
        let ui = self.ui();
        let editor = &mut self.tools.tas_editor;
        match sub {
            "add" => {
                editor.project_opened(rest.trim());
                Ok(Outcome::none())
            }
            "rm" => {
                let slot = parse_slot(rest)?;
                if editor.recent_project_failed(slot, true).is_empty() {
                    bail!("recent project slot {slot} is empty");
                }
                Ok(Outcome::none())
            }
            "open" => {
                let slot = parse_slot(rest)?;
                let out = editor.dispatch(TasEditorCommand::OpenRecent(slot), &ui)?;
                Ok(describe(out))
            }
            "list" => {
                let labels = editor.recent().menu_labels();
                if labels.is_empty() {
                    return Ok(Outcome::line("(no recent projects)"));
                }
                Ok(Outcome::Output(
                    labels
                        .into_iter()
                        .enumerate()
                        .map(|(i, label)| format!("{}: {label}", i + 1))
                        .collect(),
                ))
            }
            other => bail!("unknown recent command `{other}`"),
        }
    }

    fn tas(&mut self, args: &str) -> anyhow::Result<Outcome> {
        let (sub, rest) = split_word(args);
        let command = match sub {
            "toggle" => {
                let name = rest.trim();
                TasEditorCommand::Toggle(
                    ConfigToggle::from_str(name)
                        .with_context(|| format!("unknown TAS Editor setting `{name}`"))?,
                )
            }
            "superimpose" => TasEditorCommand::CycleSuperimpose,
            "pattern" => TasEditorCommand::SelectPattern(parse_number(rest)? as usize),
            "greenzone" => TasEditorCommand::SetGreenzoneCapacity(parse_number(rest)?),
            "undo" => TasEditorCommand::SetUndoLevels(parse_number(rest)?),
            "autosave" => TasEditorCommand::SetAutosavePeriod(parse_number(rest)?),
            "show" => {
                let editor = &self.tools.tas_editor;
                let config = editor.config();
                let project = editor
                    .recent()
                    .get(0)
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                return Ok(Outcome::Output(vec![
                    caption(None, &project, false),
                    format!("superimpose = {:?}", config.superimpose),
                    format!("pattern = {}", config.current_pattern),
                    format!("greenzone = {}", config.greenzone_capacity),
                    format!("undo = {}", config.undo_levels),
                    format!("autosave = {}", config.autosave_period),
                ]));
            }
            other => bail!("unknown tas command `{other}`"),
        };

        let value = match &command {
            TasEditorCommand::Toggle(toggle) => Some(*toggle),
            _ => None,
        };
        let ui = self.ui();
        let out = self.tools.tas_editor.dispatch(command, &ui)?;
        let mut described = describe(out);
        if let (Some(toggle), Outcome::Output(lines)) = (value, &mut described) {
            let enabled = self.tools.tas_editor.config().get(toggle);
            lines.insert(0, format!("{toggle} = {}", on_off(enabled)));
        }
        Ok(described)
    }

    fn ui(&self) -> UiContext {
        UiContext {
            pattern_count: PATTERN_COUNT,
            ..UiContext::default()
        }
    }

    fn sync_labels(&mut self) {
        self.listing.labels = self
            .tools
            .debugger
            .bookmarks()
            .iter()
            .filter(|b| !b.name.is_empty())
            .map(|b| (b.addr, b.name.clone()))
            .collect();
    }

    /// Bookmark names label the listing, so it is pulled again after they
    /// change.
    fn relabel(&mut self) {
        self.sync_labels();
        self.tools.debugger.refresh(&mut self.listing);
    }

    fn apply_view_size(&mut self) {
        self.tools
            .debugger
            .asm_view_mut()
            .set_view_size(self.view_lines, 80);
        self.relabel();
    }

    fn debugger_effects(&mut self) -> Outcome {
        Outcome::Output(
            self.tools
                .debugger
                .drain_effects()
                .iter()
                .map(|e| format!("-> {e:?}"))
                .collect(),
        )
    }

    fn render_asm(&self) -> Outcome {
        Outcome::Output(
            self.tools
                .debugger
                .asm_view()
                .visible_lines()
                .map(|l| l.text)
                .collect(),
        )
    }
}

fn describe(out: Dispatch) -> Outcome {
    let mut lines: Vec<String> = out.effects.iter().map(|e| format!("-> {e:?}")).collect();
    if !out.redraw.is_empty() {
        lines.push(format!("redraw {:?}", out.redraw));
    }
    Outcome::Output(lines)
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

fn parse_on_off(s: &str) -> anyhow::Result<bool> {
    match s.trim() {
        "on" | "1" | "true" => Ok(true),
        "off" | "0" | "false" => Ok(false),
        other => bail!("expected on/off, got `{other}`"),
    }
}

fn parse_number(s: &str) -> anyhow::Result<u32> {
    s.trim()
        .parse()
        .with_context(|| format!("expected a number, got `{}`", s.trim()))
}

/// Slots are shown 1-based in the Recent menu.
fn parse_slot(s: &str) -> anyhow::Result<usize> {
    match parse_number(s)? {
        0 => bail!("slots start at 1"),
        n => Ok(n as usize - 1),
    }
}
