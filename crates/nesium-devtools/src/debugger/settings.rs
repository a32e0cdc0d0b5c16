use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// On/off options of the debugger panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum DebuggerOption {
    /// Show ROM file offsets instead of bank:address.
    RomOffsets,
    SymbolicDebug,
    RegisterNames,
    /// Open the debugger automatically when a game loads.
    AutoOpen,
    /// Load the game's `.deb` file (bookmarks, breakpoints) on open.
    DebFileAutoLoad,
    BreakOnBadOpcodes,
    IdaFont,
}

/// Break-after-N counters shown under the register pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ThresholdKind {
    CpuCycles,
    Instructions,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakThreshold {
    pub enabled: bool,
    pub limit: u64,
}

impl BreakThreshold {
    /// Applies text typed into the limit field. Non-numeric input is ignored.
    pub fn set_limit_text(&mut self, text: &str) -> bool {
        match text.trim().parse::<u64>() {
            Ok(limit) => {
                self.limit = limit;
                true
            }
            Err(_) => false,
        }
    }

    #[inline]
    pub fn is_exceeded(&self, count: u64) -> bool {
        self.enabled && count > self.limit
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebuggerSettings {
    pub display_rom_offsets: bool,
    pub symbolic_debug: bool,
    pub register_names: bool,
    pub auto_open: bool,
    pub deb_file_auto_load: bool,
    pub break_on_bad_opcodes: bool,
    pub ida_font: bool,
    pub cycle_break: BreakThreshold,
    pub instruction_break: BreakThreshold,
}

impl Default for DebuggerSettings {
    fn default() -> Self {
        Self {
            display_rom_offsets: false,
            symbolic_debug: true,
            register_names: true,
            auto_open: false,
            deb_file_auto_load: true,
            break_on_bad_opcodes: false,
            ida_font: false,
            cycle_break: BreakThreshold::default(),
            instruction_break: BreakThreshold::default(),
        }
    }
}

impl DebuggerSettings {
    pub fn get(&self, option: DebuggerOption) -> bool {
        match option {
            DebuggerOption::RomOffsets => self.display_rom_offsets,
            DebuggerOption::SymbolicDebug => self.symbolic_debug,
            DebuggerOption::RegisterNames => self.register_names,
            DebuggerOption::AutoOpen => self.auto_open,
            DebuggerOption::DebFileAutoLoad => self.deb_file_auto_load,
            DebuggerOption::BreakOnBadOpcodes => self.break_on_bad_opcodes,
            DebuggerOption::IdaFont => self.ida_font,
        }
    }

    /// Sets `option`, returning whether the value changed.
    pub fn set(&mut self, option: DebuggerOption, enabled: bool) -> bool {
        let slot = match option {
            DebuggerOption::RomOffsets => &mut self.display_rom_offsets,
            DebuggerOption::SymbolicDebug => &mut self.symbolic_debug,
            DebuggerOption::RegisterNames => &mut self.register_names,
            DebuggerOption::AutoOpen => &mut self.auto_open,
            DebuggerOption::DebFileAutoLoad => &mut self.deb_file_auto_load,
            DebuggerOption::BreakOnBadOpcodes => &mut self.break_on_bad_opcodes,
            DebuggerOption::IdaFont => &mut self.ida_font,
        };
        let changed = *slot != enabled;
        *slot = enabled;
        changed
    }

    pub fn threshold(&self, kind: ThresholdKind) -> &BreakThreshold {
        match kind {
            ThresholdKind::CpuCycles => &self.cycle_break,
            ThresholdKind::Instructions => &self.instruction_break,
        }
    }

    pub fn threshold_mut(&mut self, kind: ThresholdKind) -> &mut BreakThreshold {
        match kind {
            ThresholdKind::CpuCycles => &mut self.cycle_break,
            ThresholdKind::Instructions => &mut self.instruction_break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn option_names_round_trip() {
        for option in DebuggerOption::iter() {
            let name = option.to_string();
            assert_eq!(DebuggerOption::from_str(&name).unwrap(), option);
        }
        assert_eq!(
            DebuggerOption::from_str("deb-file-auto-load").unwrap(),
            DebuggerOption::DebFileAutoLoad
        );
    }

    #[test]
    fn set_reports_changes() {
        let mut settings = DebuggerSettings::default();
        assert!(settings.get(DebuggerOption::SymbolicDebug));
        assert!(!settings.set(DebuggerOption::SymbolicDebug, true));
        assert!(settings.set(DebuggerOption::RomOffsets, true));
        assert!(settings.display_rom_offsets);
    }

    #[test]
    fn threshold_text_parsing() {
        let mut t = BreakThreshold::default();
        assert!(t.set_limit_text(" 29780 "));
        assert_eq!(t.limit, 29780);
        assert!(!t.set_limit_text("abc"));
        assert_eq!(t.limit, 29780);

        assert!(!t.is_exceeded(40000));
        t.enabled = true;
        assert!(t.is_exceeded(40000));
        assert!(!t.is_exceeded(29780));
    }
}
