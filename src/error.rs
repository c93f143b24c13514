// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for Chirp8

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Chirp8.
///
/// Every variant raised by the interpreter is fatal: the run loop stops the
/// timer thread and hands the error back to its caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Represents an opcode outside the Chip-8 instruction set
    #[error("illegal instruction {word:04x} at {addr:03x}")]
    IllegalInstruction {
        /// The offending word
        word: u16,
        /// The address it was fetched from
        addr: u16,
    },
    /// Tried to fetch an instruction from outside of memory
    #[error("address {addr:04x} is outside of memory")]
    OutOfBounds {
        /// The offending address
        addr: usize,
    },
    /// The program does not fit in the space reserved for it
    #[error("ROM of {len} bytes does not fit in the {capacity} bytes of program memory")]
    Capacity {
        /// Length of the rejected program
        len: usize,
        /// Bytes available at the load offset
        capacity: usize,
    },
    /// Returned from a subroutine with nothing on the stack
    #[error("return with an empty call stack at {addr:03x}")]
    StackUnderflow {
        /// Address of the offending `ret`
        addr: u16,
    },
    /// Called a subroutine past the configured stack depth
    #[error("call stack exceeded {limit} frames at {addr:03x}")]
    StackOverflow {
        /// The configured depth limit
        limit: usize,
        /// Address of the offending `call`
        addr: u16,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// The process was configured with values the interpreter can't use
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with it
        reason: String,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "minifb")]
    /// Error originated in [minifb]
    #[error(transparent)]
    MinifbError(#[from] minifb::Error),
}
