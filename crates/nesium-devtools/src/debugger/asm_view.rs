//! Scrolling model for the disassembly pane.
//!
//! The listing itself comes from a [`Disassembler`]; this type only tracks
//! which lines are visible, where the PC is, and how each line is rendered.

use std::fmt::Write as _;

/// What a listing line represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AsmLineKind {
    #[default]
    Instruction,
    /// Label line emitted by the symbol resolver ahead of an instruction.
    SymbolName,
    /// Comment line emitted by the symbol resolver ahead of an instruction.
    SymbolComment,
}

/// One line of disassembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsmEntry {
    pub addr: u16,
    /// PRG bank mapped at `addr`, when known.
    pub bank: Option<u16>,
    /// Offset into the ROM file, when `addr` maps to PRG ROM.
    pub rom_offset: Option<u32>,
    /// Number of valid bytes in `opcode`.
    pub size: u8,
    pub opcode: [u8; 3],
    pub text: String,
    pub kind: AsmLineKind,
    /// Index of this entry in the view; assigned by [`AsmView::set_entries`].
    pub line: usize,
}

impl AsmEntry {
    pub fn instruction(addr: u16, bytes: &[u8], text: impl Into<String>) -> Self {
        let size = bytes.len().min(3);
        let mut opcode = [0u8; 3];
        opcode[..size].copy_from_slice(&bytes[..size]);
        Self {
            addr,
            size: size as u8,
            opcode,
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn symbol_name(addr: u16, name: impl Into<String>) -> Self {
        Self {
            addr,
            text: name.into(),
            kind: AsmLineKind::SymbolName,
            ..Default::default()
        }
    }

    pub fn symbol_comment(addr: u16, comment: impl Into<String>) -> Self {
        Self {
            addr,
            text: comment.into(),
            kind: AsmLineKind::SymbolComment,
            ..Default::default()
        }
    }

    pub fn with_bank(mut self, bank: u16) -> Self {
        self.bank = Some(bank);
        self
    }

    pub fn with_rom_offset(mut self, offset: u32) -> Self {
        self.rom_offset = Some(offset);
        self
    }

    #[inline]
    pub fn opcode_bytes(&self) -> &[u8] {
        &self.opcode[..usize::from(self.size).min(3)]
    }
}

/// Options forwarded to the disassembler when a listing is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOptions {
    pub symbolic_debug: bool,
    pub register_names: bool,
}

/// Source of disassembly listings (backed by the CPU core and symbol tables).
///
/// Listings must be in ascending address order.
pub trait Disassembler {
    fn listing(&mut self, options: ListingOptions) -> Vec<AsmEntry>;
    fn pc(&self) -> u16;
}

/// A rendered row of the visible window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleLine {
    pub line: usize,
    pub addr: u16,
    pub is_pc: bool,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct AsmView {
    entries: Vec<AsmEntry>,
    pc: u16,
    pc_line: Option<usize>,
    line_offset: usize,
    view_lines: usize,
    view_columns: usize,
    x_scroll: usize,
    max_line_len: usize,
    display_rom_offsets: bool,
    symbolic_debug: bool,
    register_names: bool,
}

impl Default for AsmView {
    fn default() -> Self {
        Self::new(32, 80)
    }
}

impl AsmView {
    pub fn new(view_lines: usize, view_columns: usize) -> Self {
        Self {
            entries: Vec::new(),
            pc: 0,
            pc_line: None,
            line_offset: 0,
            view_lines: view_lines.max(1),
            view_columns: view_columns.max(1),
            x_scroll: 0,
            max_line_len: 0,
            display_rom_offsets: false,
            symbolic_debug: true,
            register_names: true,
        }
    }

    /// Pulls a fresh listing and PC from `source`.
    pub fn refresh(&mut self, source: &mut dyn Disassembler) {
        let entries = source.listing(self.listing_options());
        let pc = source.pc();
        self.set_entries(entries, pc);
    }

    /// Replaces the listing. Line numbers are reassigned in order.
    pub fn set_entries(&mut self, mut entries: Vec<AsmEntry>, pc: u16) {
        for (line, entry) in entries.iter_mut().enumerate() {
            entry.line = line;
        }
        self.entries = entries;
        self.pc = pc;
        self.pc_line = self.find_pc_line();
        self.recompute_metrics();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.pc_line = None;
        self.line_offset = 0;
        self.x_scroll = 0;
        self.max_line_len = 0;
    }

    #[inline]
    pub fn entries(&self) -> &[AsmEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn pc_line(&self) -> Option<usize> {
        self.pc_line
    }

    #[inline]
    pub fn line_offset(&self) -> usize {
        self.line_offset
    }

    #[inline]
    pub fn x_scroll(&self) -> usize {
        self.x_scroll
    }

    #[inline]
    pub fn max_line_offset(&self) -> usize {
        self.entries.len().saturating_sub(self.view_lines)
    }

    #[inline]
    pub fn max_x_scroll(&self) -> usize {
        self.max_line_len.saturating_sub(self.view_columns)
    }

    pub fn listing_options(&self) -> ListingOptions {
        ListingOptions {
            symbolic_debug: self.symbolic_debug,
            register_names: self.register_names,
        }
    }

    pub fn set_display_rom_offsets(&mut self, enabled: bool) {
        self.display_rom_offsets = enabled;
        self.recompute_metrics();
    }

    /// Takes effect on the next [`Self::refresh`].
    pub fn set_symbolic_debug(&mut self, enabled: bool) {
        self.symbolic_debug = enabled;
    }

    /// Takes effect on the next [`Self::refresh`].
    pub fn set_register_names(&mut self, enabled: bool) {
        self.register_names = enabled;
    }

    /// Resizes the visible window, in text rows and columns.
    pub fn set_view_size(&mut self, lines: usize, columns: usize) {
        self.view_lines = lines.max(1);
        self.view_columns = columns.max(1);
        self.line_offset = self.line_offset.min(self.max_line_offset());
        self.x_scroll = self.x_scroll.min(self.max_x_scroll());
    }

    pub fn set_line(&mut self, line: usize) {
        self.line_offset = line.min(self.max_line_offset());
    }

    pub fn set_x_scroll(&mut self, column: usize) {
        self.x_scroll = column.min(self.max_x_scroll());
    }

    /// Finds the listing line for `addr`.
    ///
    /// Addresses before the first line map to line 0 and addresses after the
    /// last line map to the last line. Otherwise this is the first line whose
    /// address is at or after `addr`, so symbol lines sharing the address come
    /// first.
    pub fn line_for_addr(&self, addr: u16) -> Option<usize> {
        let first = self.entries.first()?;
        let last = self.entries.last()?;
        if addr < first.addr {
            return Some(0);
        }
        if addr > last.addr {
            return Some(self.entries.len() - 1);
        }
        Some(self.entries.partition_point(|e| e.addr < addr))
    }

    #[inline]
    pub fn is_line_visible(&self, line: usize) -> bool {
        line >= self.line_offset && line < self.line_offset + self.view_lines
    }

    /// Brings `addr` into view, centring it if it was off screen.
    ///
    /// Returns the target line, or `None` when there is nothing to show.
    pub fn scroll_to_addr(&mut self, addr: u16) -> Option<usize> {
        let line = self.line_for_addr(addr)?;
        self.reveal(line);
        Some(line)
    }

    pub fn scroll_to_pc(&mut self) -> Option<usize> {
        let line = self.pc_line?;
        self.reveal(line);
        Some(line)
    }

    /// Address under visible row `row` (e.g. for a context menu).
    pub fn context_addr(&self, row: usize) -> Option<u16> {
        if row >= self.view_lines {
            return None;
        }
        self.entries.get(self.line_offset + row).map(|e| e.addr)
    }

    pub fn format_line(&self, entry: &AsmEntry) -> String {
        match entry.kind {
            AsmLineKind::Instruction => {
                let mut out = String::with_capacity(40 + entry.text.len());
                out.push(if self.pc_line == Some(entry.line) {
                    '>'
                } else {
                    ' '
                });
                let _ = match (self.display_rom_offsets, entry.rom_offset, entry.bank) {
                    (true, Some(offset), _) => write!(out, "{offset:06X}"),
                    (_, _, Some(bank)) => write!(out, "{bank:02X}:{:04X}", entry.addr),
                    _ => write!(out, "{:04X}", entry.addr),
                };
                out.push(':');
                let bytes = entry.opcode_bytes();
                for i in 0..3 {
                    match bytes.get(i) {
                        Some(b) => {
                            let _ = write!(out, "{b:02X} ");
                        }
                        None => out.push_str("   "),
                    }
                }
                out.push(' ');
                out.push_str(&entry.text);
                out
            }
            AsmLineKind::SymbolName => format!("{}:", entry.text),
            AsmLineKind::SymbolComment => format!("; {}", entry.text),
        }
    }

    /// Renders the rows currently in view, with horizontal scroll applied.
    pub fn visible_lines(&self) -> impl Iterator<Item = VisibleLine> + '_ {
        let end = (self.line_offset + self.view_lines).min(self.entries.len());
        let start = self.line_offset.min(end);
        self.entries[start..end].iter().map(move |entry| {
            let text = self
                .format_line(entry)
                .chars()
                .skip(self.x_scroll)
                .take(self.view_columns)
                .collect();
            VisibleLine {
                line: entry.line,
                addr: entry.addr,
                is_pc: self.pc_line == Some(entry.line),
                text,
            }
        })
    }

    fn reveal(&mut self, line: usize) {
        if !self.is_line_visible(line) {
            self.set_line(line.saturating_sub(self.view_lines / 2));
        }
    }

    fn find_pc_line(&self) -> Option<usize> {
        let start = self.entries.partition_point(|e| e.addr < self.pc);
        self.entries[start..]
            .iter()
            .take_while(|e| e.addr == self.pc)
            .find(|e| e.kind == AsmLineKind::Instruction)
            .map(|e| e.line)
    }

    fn recompute_metrics(&mut self) {
        self.max_line_len = self
            .entries
            .iter()
            .map(|e| self.format_line(e).chars().count())
            .max()
            .unwrap_or(0);
        self.line_offset = self.line_offset.min(self.max_line_offset());
        self.x_scroll = self.x_scroll.min(self.max_x_scroll());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedListing {
        entries: Vec<AsmEntry>,
        pc: u16,
        last_options: Option<ListingOptions>,
    }

    impl Disassembler for FixedListing {
        fn listing(&mut self, options: ListingOptions) -> Vec<AsmEntry> {
            self.last_options = Some(options);
            self.entries.clone()
        }

        fn pc(&self) -> u16 {
            self.pc
        }
    }

    fn listing() -> Vec<AsmEntry> {
        vec![
            AsmEntry::instruction(0x8000, &[0x78], "SEI"),
            AsmEntry::instruction(0x8001, &[0xD8], "CLD"),
            AsmEntry::symbol_comment(0x8002, "wait for vblank"),
            AsmEntry::symbol_name(0x8002, "vwait"),
            AsmEntry::instruction(0x8002, &[0xAD, 0x02, 0x20], "LDA $2002"),
            AsmEntry::instruction(0x8005, &[0x10, 0xFB], "BPL vwait"),
            AsmEntry::instruction(0x8007, &[0xA9, 0x00], "LDA #$00"),
        ]
    }

    #[test]
    fn line_for_addr_clamps_and_searches() {
        let mut view = AsmView::new(4, 40);
        assert_eq!(view.line_for_addr(0x8000), None);

        view.set_entries(listing(), 0x8000);
        assert_eq!(view.line_for_addr(0x7FFF), Some(0));
        assert_eq!(view.line_for_addr(0xFFFF), Some(6));
        assert_eq!(view.line_for_addr(0x8001), Some(1));
        // Symbol lines sharing the address come first.
        assert_eq!(view.line_for_addr(0x8002), Some(2));
        // Between instructions: next line at or after.
        assert_eq!(view.line_for_addr(0x8003), Some(5));
    }

    #[test]
    fn pc_line_skips_symbol_lines() {
        let mut view = AsmView::new(4, 40);
        view.set_entries(listing(), 0x8002);
        assert_eq!(view.pc_line(), Some(4));

        view.set_entries(listing(), 0x9000);
        assert_eq!(view.pc_line(), None);
    }

    #[test]
    fn set_line_clamps_to_last_page() {
        let mut view = AsmView::new(4, 40);
        view.set_entries(listing(), 0x8000);
        view.set_line(100);
        assert_eq!(view.line_offset(), 3);

        view.set_view_size(10, 40);
        assert_eq!(view.line_offset(), 0);
    }

    #[test]
    fn scroll_to_pc_centres_offscreen_line() {
        let mut view = AsmView::new(2, 40);
        view.set_entries(listing(), 0x8005);
        assert_eq!(view.scroll_to_pc(), Some(5));
        assert_eq!(view.line_offset(), 4);

        view.scroll_to_addr(0x8007);
        assert_eq!(view.line_offset(), 5);
        // Already visible: no movement.
        view.scroll_to_addr(0x8005);
        assert_eq!(view.line_offset(), 5);
    }

    #[test]
    fn formats_instruction_and_symbol_lines() {
        let mut view = AsmView::new(8, 80);
        let mut entries = listing();
        entries[4] = entries[4].clone().with_bank(0x0F).with_rom_offset(0x3C012);
        view.set_entries(entries, 0x8002);

        let rows: Vec<String> = view.visible_lines().map(|l| l.text).collect();
        assert_eq!(rows[0], " 8000:78        SEI");
        assert_eq!(rows[2], "; wait for vblank");
        assert_eq!(rows[3], "vwait:");
        assert_eq!(rows[4], ">0F:8002:AD 02 20  LDA $2002");

        view.set_display_rom_offsets(true);
        let pc_row = view.visible_lines().find(|l| l.is_pc).unwrap();
        assert_eq!(pc_row.text, ">03C012:AD 02 20  LDA $2002");
    }

    #[test]
    fn horizontal_scroll_is_bounded() {
        let mut view = AsmView::new(8, 10);
        view.set_entries(listing(), 0);
        let widest = " 8002:AD 02 20  LDA $2002".len();
        view.set_x_scroll(usize::MAX);
        assert_eq!(view.x_scroll(), widest - 10);

        let first = view.visible_lines().next().unwrap();
        assert!(first.text.chars().count() <= 10);
    }

    #[test]
    fn refresh_uses_toggles_and_context_rows() {
        let mut source = FixedListing {
            entries: listing(),
            pc: 0x8001,
            last_options: None,
        };
        let mut view = AsmView::new(3, 40);
        view.set_symbolic_debug(false);
        view.refresh(&mut source);

        assert_eq!(
            source.last_options,
            Some(ListingOptions {
                symbolic_debug: false,
                register_names: true,
            })
        );
        assert_eq!(view.pc_line(), Some(1));
        view.set_line(2);
        assert_eq!(view.context_addr(0), Some(0x8002));
        assert_eq!(view.context_addr(3), None);

        view.clear();
        assert!(view.is_empty());
        assert_eq!(view.visible_lines().count(), 0);
    }
}
