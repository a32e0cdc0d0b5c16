use anyhow::bail;
use nesium_devtools::debugger::asm_view::{AsmEntry, Disassembler, ListingOptions};

/// Byte dump shown as `.db` lines, one per byte, with bookmark-style labels
/// taken from `labels`.
#[derive(Debug, Default)]
pub struct ByteListing {
    origin: u16,
    bytes: Vec<u8>,
    pub labels: Vec<(u16, String)>,
    pub pc: u16,
}

impl ByteListing {
    /// Bytes must fit below $10000 so addresses stay ascending.
    pub fn load(&mut self, origin: u16, bytes: Vec<u8>) -> anyhow::Result<()> {
        if usize::from(origin) + bytes.len() > 0x10000 {
            bail!("{} bytes at ${origin:04X} run past $FFFF", bytes.len());
        }
        self.origin = origin;
        self.pc = origin;
        self.bytes = bytes;
        Ok(())
    }
}

impl Disassembler for ByteListing {
    fn listing(&mut self, options: ListingOptions) -> Vec<AsmEntry> {
        let mut entries = Vec::with_capacity(self.bytes.len());
        for (i, &b) in self.bytes.iter().enumerate() {
            let addr = self.origin + i as u16;
            if options.symbolic_debug {
                entries.extend(
                    self.labels
                        .iter()
                        .filter(|(a, _)| *a == addr)
                        .map(|(a, name)| AsmEntry::symbol_name(*a, name.clone())),
                );
            }
            entries.push(AsmEntry::instruction(addr, &[b], format!(".db ${b:02X}")));
        }
        entries
    }

    fn pc(&self) -> u16 {
        self.pc
    }
}
