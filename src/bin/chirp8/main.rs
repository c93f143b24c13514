// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Chirp8: A chip-8 interpreter in Rust
//! Hello, world!

mod ui;

use chirp8::{error::Error, Device, Result, CPU};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{path::PathBuf, process::ExitCode};
use ui::*;

pub fn main() -> ExitCode {
    env_logger::init();
    let options = Arguments::parse_args_default_or_exit();
    match Config::try_from(options).and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.bold().red());
            ExitCode::from(exit_status(&e))
        }
    }
}

/// Builds the interpreter and window described by `config`, and runs the ROM to completion
fn run(config: Config) -> Result<()> {
    let mut cpu = CPU::new(config.stack_limit);
    cpu.debug = config.debug;
    cpu.load_program(&config.rom)?;
    let mut ui = UIBuilder::new(config.width, config.height, config.scale)
        .fullscreen(config.fullscreen)
        .build()?;
    ui.set_title(&config.rom.display().to_string());
    cpu.run(&mut ui)
}

/// Maps a fatal error onto the process exit status
fn exit_status(e: &Error) -> u8 {
    match e {
        Error::InvalidConfig { .. } => 1,
        Error::IoError(_) => 2,
        _ => 3,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM to run on Chirp8.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Enable live disassembly.")]
    pub debug: bool,
    #[options(help = "Open a borderless window on top of the desktop.")]
    pub fullscreen: bool,

    #[options(help = "Set the logical display width.", default = "64", meta = "W")]
    pub width: i64,
    #[options(
        short = "H",
        help = "Set the logical display height.",
        default = "32",
        meta = "H"
    )]
    pub height: i64,
    #[options(help = "Set the integer display scale.", default = "16", meta = "S")]
    pub scale: i64,

    #[options(
        short = "l",
        help = "Set the call stack depth limit (0 for unbounded).",
        default = "16",
        meta = "N"
    )]
    pub stack_limit: usize,
}

/// Validated process configuration
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Config {
    pub rom: PathBuf,
    pub debug: bool,
    pub fullscreen: bool,
    pub width: usize,
    pub height: usize,
    pub scale: usize,
    pub stack_limit: Option<usize>,
}

impl TryFrom<Arguments> for Config {
    type Error = Error;

    fn try_from(options: Arguments) -> Result<Self> {
        Ok(Config {
            width: positive("width", options.width)?,
            height: positive("height", options.height)?,
            scale: positive("scale", options.scale)?,
            stack_limit: match options.stack_limit {
                0 => None,
                limit => Some(limit),
            },
            debug: options.debug,
            fullscreen: options.fullscreen,
            rom: options.file,
        })
    }
}

fn positive(name: &str, value: i64) -> Result<usize> {
    match usize::try_from(value) {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(Error::InvalidConfig {
            reason: format!("{name} must be positive, got {value}"),
        }),
    }
}
