// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! A disassembler for Chip-8 opcodes
use super::Insn;
use owo_colors::{OwoColorize, Style};

/// Disassembles Chip-8 instructions
pub trait Disassembler {
    /// Disassemble a single instruction
    fn once(&self, insn: u16) -> String;
}

/// Disassembles Chip-8 instructions, printing them in the provided [owo_colors::Style]s
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dis {
    /// Styles invalid instructions
    pub invalid: Style,
    /// Styles valid instruction
    pub normal: Style,
}

impl Dis {
    /// A disassembler which applies no styling at all, for plain-text output
    pub fn plain() -> Self {
        Self {
            invalid: Style::new(),
            normal: Style::new(),
        }
    }
}

impl Default for Dis {
    fn default() -> Self {
        Self {
            invalid: Style::new().bold().red(),
            normal: Style::new().green(),
        }
    }
}

impl Disassembler for Dis {
    fn once(&self, insn: u16) -> String {
        match Insn::from_word(insn) {
            Some(insn) => format!("{}", insn.style(self.normal)),
            None => format!("{}", format_args!("inval  {insn:04x}").style(self.invalid)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text() {
        let dis = Dis::plain();
        assert_eq!("ld     v0, #05", dis.once(0x6005));
        assert_eq!("add    v0, v1", dis.once(0x8014));
        assert_eq!("drw    vA, vB, #5", dis.once(0xdab5));
        assert_eq!("ld     [I], vF", dis.once(0xff55));
        assert_eq!("inval  f0ff", dis.once(0xf0ff));
    }

    #[test]
    fn styled_contains_mnemonic() {
        let dis = Dis::default();
        assert!(dis.once(0x00e0).contains("cls"));
        assert!(dis.once(0x5001).contains("se"));
        assert!(dis.once(0x500f).contains("v0, v0"));
        assert!(dis.once(0xe000).contains("inval  e000"));
        assert_ne!(dis.once(0x00e0), Dis::plain().once(0x00e0));
    }
}
