// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Mem represents the CPU's memory
//!
//! Contains some handy utils for reading and writing

use crate::{
    error::{Error, Result},
    traits::Grab,
};
use std::{
    fmt::{Display, Formatter},
    ops::Range,
    slice::SliceIndex,
};

/// Size of Chip-8 memory, in bytes
pub const MEMORY_SIZE: usize = 0x1000;
/// Address at which programs are loaded, and execution begins
pub const PROGRAM_START: usize = 0x200;
/// Number of bytes in a single glyph of the font
pub const GLYPH_SIZE: usize = 5;

/// The built-in hexadecimal font, one 5-byte glyph per digit
#[rustfmt::skip]
pub const FONT: [u8; 16 * GLYPH_SIZE] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // A
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // B
    0xf0, 0x80, 0x80, 0x80, 0xf0, // C
    0xe0, 0x90, 0x90, 0x90, 0xe0, // D
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // E
    0xf0, 0x80, 0xf0, 0x80, 0x80, // F
];

/// Represents a named region in memory
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    /// Character ROM (but writable!)
    Charset,
    /// Program memory
    Program,
}

impl Region {
    /// The addresses covered by this [Region]
    pub fn range(self) -> Range<usize> {
        match self {
            Region::Charset => 0..FONT.len(),
            Region::Program => PROGRAM_START..MEMORY_SIZE,
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Region::Charset => "Charset",
                Region::Program => "Program",
            }
        )
    }
}

impl Grab<u8> for Mem {
    /// Gets a slice of [Mem] memory
    /// # Examples
    /// ```rust
    ///# use chirp8::*;
    ///     let mem = Mem::new();
    ///     assert_eq!(&[0xf0, 0x90], mem.grab(0..2).unwrap());
    /// ```
    #[inline(always)]
    fn grab<I>(&self, index: I) -> Option<&<I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.memory.get(index)
    }

    /// Gets a mutable slice of [Mem] memory
    #[inline(always)]
    fn grab_mut<I>(&mut self, index: I) -> Option<&mut <I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.memory.get_mut(index)
    }
}

/// Stores the 4 KiB of Chip-8 memory, with the font loaded at `0x000`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mem {
    memory: Vec<u8>,
}

impl Mem {
    /// Constructs a new mem, with the [FONT] already in place
    /// # Examples
    /// ```rust
    ///# use chirp8::*;
    ///     let mem = Mem::new();
    ///     assert_eq!(0x1000, mem.len());
    ///     assert_eq!(FONT, mem.get_region(Charset));
    /// ```
    pub fn new() -> Self {
        let mut memory = vec![0; MEMORY_SIZE];
        memory[Region::Charset.range()].copy_from_slice(&FONT);
        Mem { memory }
    }

    /// Gets the length of the mem' backing memory
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Returns true if the backing memory contains no elements
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Copies `data` into memory starting at `offset`.
    ///
    /// Returns [Error::Capacity] without touching memory if `data`
    /// would run past the end.
    /// # Examples
    /// ```rust
    ///# use chirp8::*;
    ///# fn main() -> Result<()> {
    ///     let mut mem = Mem::new();
    ///     mem.load(0x200, b"Hello, world!")?;
    ///     assert_eq!(b"Hello", mem.grab(0x200..0x205).unwrap());
    ///     mem.load(0x200, &[0; 0xe01]).expect_err("0xe01 bytes can't fit");
    ///#    Ok(())
    ///# }
    /// ```
    pub fn load(&mut self, offset: usize, data: &[u8]) -> Result<&mut Self> {
        let capacity = self.len().saturating_sub(offset);
        match self.grab_mut(offset..offset.saturating_add(data.len())) {
            Some(dest) => dest.copy_from_slice(data),
            None => {
                return Err(Error::Capacity {
                    len: data.len(),
                    capacity,
                })
            }
        }
        Ok(self)
    }

    /// Fills a [Region] with zeroes
    pub fn clear_region(&mut self, name: Region) -> &mut Self {
        self.memory[name.range()].fill(0);
        self
    }

    /// Gets a slice of a named [Region] of memory
    #[inline(always)]
    pub fn get_region(&self, name: Region) -> &[u8] {
        &self.memory[name.range()]
    }

    /// Reads the byte at `addr`, wrapping around the 12-bit address space
    #[inline(always)]
    pub fn read(&self, addr: usize) -> u8 {
        self.memory[addr % MEMORY_SIZE]
    }

    /// Writes a byte to `addr`, wrapping around the 12-bit address space
    #[inline(always)]
    pub fn write(&mut self, addr: usize, data: u8) {
        self.memory[addr % MEMORY_SIZE] = data;
    }
}

impl Default for Mem {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Mem {
    /// Hexdumps the program region, skipping rows of zeroes
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use owo_colors::{OwoColorize, Style};
        // Green phosphor style formatting, for taste
        let term: Style = Style::new().bold().green().on_black();
        for (row, line) in self.memory.chunks(16).enumerate() {
            if line.iter().all(|&byte| byte == 0) {
                continue;
            }
            write!(f, "{:>03x}{} ", (row * 16).style(term), ":".style(term))?;
            for (index, byte) in line.iter().enumerate() {
                write!(f, "{byte:02x}")?;
                write!(
                    f,
                    "{}",
                    match index {
                        0x7 => "  ",
                        _ if index % 2 == 1 => " ",
                        _ => "",
                    }
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_at_zero() {
        let mem = Mem::new();
        assert_eq!(&FONT, mem.get_region(Region::Charset));
        // Glyph for `A` starts at 0xA * 5
        assert_eq!(&[0xf0, 0x90, 0xf0, 0x90, 0x90], mem.grab(50..55).unwrap());
    }

    #[test]
    fn load_fits_exactly() {
        let mut mem = Mem::new();
        let rom = vec![0xa5; MEMORY_SIZE - PROGRAM_START];
        mem.load(PROGRAM_START, &rom).unwrap();
        assert_eq!(rom.as_slice(), mem.get_region(Region::Program));
    }

    #[test]
    fn load_one_byte_too_long() {
        let mut mem = Mem::new();
        let before = mem.clone();
        let rom = vec![0xa5; MEMORY_SIZE - PROGRAM_START + 1];
        match mem.load(PROGRAM_START, &rom) {
            Err(Error::Capacity { len, capacity }) => {
                assert_eq!(len, 0xe01);
                assert_eq!(capacity, 0xe00);
            }
            other => panic!("expected Error::Capacity, got {other:?}"),
        }
        assert_eq!(before, mem);
    }

    #[test]
    fn load_past_the_end() {
        let mut mem = Mem::new();
        mem.load(0x2000, &[1]).expect_err("0x2000 is outside of memory");
        mem.load(usize::MAX, &[1, 2]).expect_err("offset overflows");
    }

    #[test]
    fn read_write_wrap() {
        let mut mem = Mem::new();
        mem.write(0x1000 + 0x300, 0x42);
        assert_eq!(0x42, mem.read(0x300));
        assert_eq!(0x42, mem.read(0xf300));
    }

    #[test]
    fn clear_program() {
        let mut mem = Mem::new();
        mem.load(PROGRAM_START, &[0xff; 0x20]).unwrap();
        mem.clear_region(Region::Program);
        assert!(mem.get_region(Region::Program).iter().all(|&b| b == 0));
        assert_eq!(&FONT, mem.get_region(Region::Charset));
    }

    #[test]
    fn region_names() {
        assert_eq!("Charset", Region::Charset.to_string());
        assert_eq!("Program at 0x200", format!("{} at {PROGRAM_START:#x}", Region::Program));
    }

    #[test]
    fn display_skips_zero_rows() {
        let mut mem = Mem::new();
        mem.load(PROGRAM_START, &[0x12, 0x00]).unwrap();
        let dump = format!("{mem}");
        // the font occupies 5 rows, the program 1
        assert_eq!(6, dump.lines().count());
    }
}
