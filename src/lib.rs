// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE.txt for details)

#![warn(missing_docs)]
//! This crate implements a Chip-8 interpreter as if it were a real CPU architecture.
//!
//! The [CPU] fetches, decodes, and executes one instruction per [tick](CPU::tick),
//! drawing and reading keys through a [Device]. While a program [runs](CPU::run),
//! the delay and sound [Timers] count down on a thread of their own.
//!
//! ```rust
//! use chirp8::*;
//! # fn main() -> Result<()> {
//! let mut cpu = CPU::default();
//! let mut io = Headless::default().with_frame_limit(3);
//! cpu.load_program_bytes(&[
//!     0x60, 0x05, // ld  v0, #05
//!     0x61, 0x03, // ld  v1, #03
//!     0x80, 0x14, // add v0, v1
//! ])?;
//! cpu.run(&mut io)?;
//! assert_eq!(&[8, 3], &cpu.v()[..2]);
//! # Ok(())
//! # }
//! ```

pub mod cpu;
pub mod error;
pub mod io;
pub mod screen;
pub mod timer;
pub mod traits;

pub use cpu::{
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    mem::{Mem, Region::*, FONT, MEMORY_SIZE, PROGRAM_START},
    stack::{Stack, DEFAULT_STACK_LIMIT},
    CPU,
};
pub use error::{Error, Result};
pub use io::{Device, Headless};
pub use screen::Screen;
pub use timer::{TimerThread, Timers, TIMER_PERIOD};
pub use traits::Grab;
