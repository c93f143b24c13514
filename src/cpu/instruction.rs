// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
#![allow(clippy::bad_bit_mask)]
//! Contains the definition of a Chip-8 [Insn]
//!
//! Operand fields follow the usual notation: `N` is the 12-bit address `nnn`,
//! `K` is the byte `kk`, `x` and `y` are register nibbles, and `n` is the low nibble.
//! Any word which matches none of the patterns fails to decode.

pub mod disassembler;

use imperative_rs::InstructionSet;
use std::fmt::Display;

#[allow(non_snake_case, missing_docs)]
#[derive(Clone, Copy, Debug, InstructionSet, PartialEq, Eq, Hash)]
/// A decoded Chip-8 instruction, carrying its operands
pub enum Insn {
    /// | 00E0 | Clear the display
    #[opcode = "0x00e0"]
    Cls,
    /// | 00EE | Return from subroutine
    #[opcode = "0x00ee"]
    Ret,
    /// | 1nnn | Jump to nnn
    #[opcode = "0x1NNN"]
    Jp { N: u16 },
    /// | 2nnn | Push pc, then jump to nnn
    #[opcode = "0x2NNN"]
    Call { N: u16 },
    /// | 3xkk | Skip next instruction if vX == kk
    #[opcode = "0x3xKK"]
    SeByte { x: usize, K: u8 },
    /// | 4xkk | Skip next instruction if vX != kk
    #[opcode = "0x4xKK"]
    SneByte { x: usize, K: u8 },
    /// | 5xyn | Skip next instruction if vX == vY. n is ignored.
    #[opcode = "0x5xyn"]
    Se { x: usize, y: usize, n: u8 },
    /// | 6xkk | vX = kk
    #[opcode = "0x6xKK"]
    LdByte { x: usize, K: u8 },
    /// | 7xkk | vX += kk, without touching vF
    #[opcode = "0x7xKK"]
    AddByte { x: usize, K: u8 },
    /// | 8xy0 | vX = vY
    #[opcode = "0x8xy0"]
    Ld { x: usize, y: usize },
    /// | 8xy1 | vX |= vY
    #[opcode = "0x8xy1"]
    Or { x: usize, y: usize },
    /// | 8xy2 | vX &= vY
    #[opcode = "0x8xy2"]
    And { x: usize, y: usize },
    /// | 8xy3 | vX ^= vY
    #[opcode = "0x8xy3"]
    Xor { x: usize, y: usize },
    /// | 8xy4 | vX += vY, vF = carry
    #[opcode = "0x8xy4"]
    Add { x: usize, y: usize },
    /// | 8xy5 | vX -= vY, vF = not borrow
    #[opcode = "0x8xy5"]
    Sub { x: usize, y: usize },
    /// | 8xy6 | vX >>= 1, vF = bit shifted out
    #[opcode = "0x8xy6"]
    Shr { x: usize, y: usize },
    /// | 8xy7 | vX = vY - vX, vF = not borrow
    #[opcode = "0x8xy7"]
    Subn { x: usize, y: usize },
    /// | 8xyE | vX <<= 1, vF = bit shifted out
    #[opcode = "0x8xye"]
    Shl { x: usize, y: usize },
    /// | 9xyn | Skip next instruction if vX != vY. n is ignored.
    #[opcode = "0x9xyn"]
    Sne { x: usize, y: usize, n: u8 },
    /// | Annn | I = nnn
    #[opcode = "0xaNNN"]
    LdI { N: u16 },
    /// | Bnnn | Jump to nnn + v0
    #[opcode = "0xbNNN"]
    JpV0 { N: u16 },
    /// | Cxkk | vX = random byte & kk
    #[opcode = "0xcxKK"]
    Rnd { x: usize, K: u8 },
    /// | Dxyn | Draw the n-byte sprite at I to (vX, vY), vF = collision
    #[opcode = "0xdxyn"]
    Drw { x: usize, y: usize, n: u8 },
    /// | Ex9E | Skip next instruction if key vX is held
    #[opcode = "0xex9e"]
    Skp { x: usize },
    /// | ExA1 | Skip next instruction if key vX is not held
    #[opcode = "0xexa1"]
    Sknp { x: usize },
    /// | Fx07 | vX = DT
    #[opcode = "0xfx07"]
    LdVxDt { x: usize },
    /// | Fx0A | Block until a key is pressed, vX = key
    #[opcode = "0xfx0a"]
    LdVxK { x: usize },
    /// | Fx15 | DT = vX
    #[opcode = "0xfx15"]
    LdDtVx { x: usize },
    /// | Fx18 | ST = vX
    #[opcode = "0xfx18"]
    LdStVx { x: usize },
    /// | Fx1E | I += vX
    #[opcode = "0xfx1e"]
    AddI { x: usize },
    /// | Fx29 | I = address of the glyph for vX
    #[opcode = "0xfx29"]
    LdF { x: usize },
    /// | Fx33 | Store the decimal digits of vX at I, I+1, I+2
    #[opcode = "0xfx33"]
    LdB { x: usize },
    /// | Fx55 | Store v0..=vX at I..=I+x
    #[opcode = "0xfx55"]
    LdIVx { x: usize },
    /// | Fx65 | Load v0..=vX from I..=I+x
    #[opcode = "0xfx65"]
    LdVxI { x: usize },
}

impl Insn {
    /// Decodes a single big-endian instruction word
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// assert_eq!(Some(Insn::Add { x: 0, y: 1 }), Insn::from_word(0x8014));
    /// assert_eq!(None, Insn::from_word(0x800f));
    /// assert_eq!(Some(Insn::Se { x: 1, y: 2, n: 3 }), Insn::from_word(0x5123));
    /// ```
    pub fn from_word(word: u16) -> Option<Insn> {
        match Insn::decode(&word.to_be_bytes()) {
            Ok((2, insn)) => Some(insn),
            _ => None,
        }
    }
}

impl Display for Insn {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insn::Cls            => write!(f, "cls"),
            Insn::Ret            => write!(f, "ret"),
            Insn::Jp { N }       => write!(f, "jp     {N:03x}"),
            Insn::Call { N }     => write!(f, "call   {N:03x}"),
            Insn::SeByte { x, K }  => write!(f, "se     v{x:X}, #{K:02x}"),
            Insn::SneByte { x, K } => write!(f, "sne    v{x:X}, #{K:02x}"),
            Insn::Se { x, y, .. } => write!(f, "se     v{x:X}, v{y:X}"),
            Insn::LdByte { x, K }  => write!(f, "ld     v{x:X}, #{K:02x}"),
            Insn::AddByte { x, K } => write!(f, "add    v{x:X}, #{K:02x}"),
            Insn::Ld { x, y }    => write!(f, "ld     v{x:X}, v{y:X}"),
            Insn::Or { x, y }    => write!(f, "or     v{x:X}, v{y:X}"),
            Insn::And { x, y }   => write!(f, "and    v{x:X}, v{y:X}"),
            Insn::Xor { x, y }   => write!(f, "xor    v{x:X}, v{y:X}"),
            Insn::Add { x, y }   => write!(f, "add    v{x:X}, v{y:X}"),
            Insn::Sub { x, y }   => write!(f, "sub    v{x:X}, v{y:X}"),
            Insn::Shr { x, .. }  => write!(f, "shr    v{x:X}"),
            Insn::Subn { x, y }  => write!(f, "subn   v{x:X}, v{y:X}"),
            Insn::Shl { x, .. }  => write!(f, "shl    v{x:X}"),
            Insn::Sne { x, y, .. } => write!(f, "sne    v{x:X}, v{y:X}"),
            Insn::LdI { N }      => write!(f, "ld     I, {N:03x}"),
            Insn::JpV0 { N }     => write!(f, "jp     v0, {N:03x}"),
            Insn::Rnd { x, K }   => write!(f, "rnd    v{x:X}, #{K:02x}"),
            Insn::Drw { x, y, n } => write!(f, "drw    v{x:X}, v{y:X}, #{n:x}"),
            Insn::Skp { x }      => write!(f, "skp    v{x:X}"),
            Insn::Sknp { x }     => write!(f, "sknp   v{x:X}"),
            Insn::LdVxDt { x }   => write!(f, "ld     v{x:X}, DT"),
            Insn::LdVxK { x }    => write!(f, "ld     v{x:X}, K"),
            Insn::LdDtVx { x }   => write!(f, "ld     DT, v{x:X}"),
            Insn::LdStVx { x }   => write!(f, "ld     ST, v{x:X}"),
            Insn::AddI { x }     => write!(f, "add    I, v{x:X}"),
            Insn::LdF { x }      => write!(f, "ld     F, v{x:X}"),
            Insn::LdB { x }      => write!(f, "ld     B, v{x:X}"),
            Insn::LdIVx { x }    => write!(f, "ld     [I], v{x:X}"),
            Insn::LdVxI { x }    => write!(f, "ld     v{x:X}, [I]"),
        }
    }
}
