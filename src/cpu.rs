// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod instruction;
pub mod mem;
pub mod stack;

use self::{
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    mem::{Mem, Region::*, GLYPH_SIZE, MEMORY_SIZE, PROGRAM_START},
    stack::Stack,
};
use crate::{
    error::{Error, Result},
    io::Device,
    timer::{Timers, TIMER_PERIOD},
    traits::Grab,
};
use log::{debug, info, warn};
use owo_colors::OwoColorize;
use rand::{rngs::StdRng, RngCore, SeedableRng};
use std::fmt::Debug;

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Represents the internal state of the CPU interpreter
pub struct CPU {
    /// Set when live disassembly is enabled
    pub debug: bool,
    // memory
    mem: Mem,
    stack: Stack,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    timers: Timers,
    // Execution data
    cycle: usize,
    rng: Box<dyn RngCore>,
    disassembler: Dis,
}

// public interface
impl CPU {
    /// Constructs a new CPU, with the font loaded, and the provided stack limit.
    ///
    /// `None` leaves the call stack unbounded.
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let cpu = CPU::new(Some(12));
    /// assert_eq!(0x200, cpu.pc());
    /// assert_eq!(Some(12), cpu.stack().limit());
    /// ```
    pub fn new(stack_limit: Option<usize>) -> Self {
        CPU {
            stack: Stack::new(stack_limit),
            ..Default::default()
        }
    }

    /// Replaces the source of random numbers used by `Cxkk`
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// use rand::rngs::mock::StepRng;
    /// let cpu = CPU::default().with_rng(StepRng::new(0xff, 0));
    /// ```
    pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Loads a program into the CPU's program space
    pub fn load_program(&mut self, rom: impl AsRef<std::path::Path>) -> Result<&mut Self> {
        let rom = rom.as_ref();
        self.load_program_bytes(&std::fs::read(rom)?)?;
        info!("Loaded {}", rom.display());
        Ok(self)
    }

    /// Loads bytes into the CPU's program space
    ///
    /// If the program doesn't fit, returns [Error::Capacity] and leaves memory alone.
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// # fn main() -> Result<()> {
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x60, 0x05])?;
    /// assert_eq!(&[0x60, 0x05], cpu.mem().grab(0x200..0x202).unwrap());
    /// cpu.load_program_bytes(&[0; 0xe01]).expect_err("Too big for memory");
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_program_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        let capacity = Program.range().len();
        if rom.len() > capacity {
            return Err(Error::Capacity {
                len: rom.len(),
                capacity,
            });
        }
        self.mem.clear_region(Program);
        self.mem.load(PROGRAM_START, rom)?;
        info!("Loaded {} bytes into {Program} at {PROGRAM_START:03x}", rom.len());
        Ok(self)
    }

    /// Sets a general purpose register in the CPU.
    /// If the register doesn't exist, returns [None]
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x4, 0x41).unwrap();
    /// assert_eq!(0x41, cpu.v()[4]);
    /// assert!(cpu.set_v(0x10, 0).is_none());
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Option<()> {
        *self.v.get_mut(reg)? = value;
        Some(())
    }

    /// Gets a slice of the entire general purpose registers
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let cpu = CPU::default();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.timers.sound()
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.timers.delay()
    }

    /// Gets a handle to the CPU's timers, shared with the timer thread
    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Gets the call stack
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Gets the CPU's memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// Gets the number of cycles the CPU has executed
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Resets the registers, stack, timers, and cycle count.
    ///
    /// Does not touch memory, so the loaded program can be run again.
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0, 0xff);
    /// cpu.reset();
    /// assert_eq!(0, cpu.v()[0]);
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn reset(&mut self) {
        self.stack.clear();
        self.pc = PROGRAM_START as Adr;
        self.i = 0;
        self.v = [0; 16];
        self.timers.reset();
        self.cycle = 0;
    }

    /// Executes `steps` instructions, stopping at the first error
    pub fn multistep(&mut self, io: &mut impl Device, steps: usize) -> Result<&mut Self> {
        for _ in 0..steps {
            self.tick(io)?;
        }
        Ok(self)
    }

    /// Executes a single instruction
    ///
    /// Returns [Error::OutOfBounds] if the instruction at `pc` runs off the end of memory.
    ///
    /// Returns [Error::IllegalInstruction] if the instruction at `pc` is not a Chip-8 instruction.
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// let mut io = Headless::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.tick(&mut io)
    ///     .expect("0x00e0 (cls) should be a valid opcode.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// ```
    /// Returns [Error::IllegalInstruction] if the instruction is not implemented.
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// let mut io = Headless::default();
    /// cpu.load_program_bytes(&[
    ///     0xff, 0xff, // invalid!
    /// ]).unwrap();
    /// cpu.tick(&mut io)
    ///     .expect_err("Should return Error::IllegalInstruction { 0xffff }");
    /// ```
    pub fn tick(&mut self, io: &mut impl Device) -> Result<&mut Self> {
        let addr = self.pc;
        // fetch opcode
        let opcode: [u8; 2] = match self.mem.grab(addr as usize..addr as usize + 2) {
            Some(&[hi, lo]) => [hi, lo],
            _ => {
                return Err(Error::OutOfBounds {
                    addr: addr as usize,
                })
            }
        };
        let word = u16::from_be_bytes(opcode);
        self.pc = self.pc.wrapping_add(2);
        self.cycle += 1;

        // Print opcode disassembly:
        if self.debug {
            std::println!(
                "{:3} {:03x}: {:<36}",
                self.cycle.bright_black(),
                addr,
                self.disassembler.once(word)
            );
        }

        // decode opcode
        let insn = Insn::from_word(word).ok_or(Error::IllegalInstruction { word, addr })?;
        self.execute(io, insn, addr)?;
        Ok(self)
    }

    /// Runs the loaded program on `io` until it asks to exit, or an error occurs.
    ///
    /// The timers count down on their own thread for the duration of the run,
    /// and that thread is always stopped and joined before this returns.
    pub fn run(&mut self, io: &mut impl Device) -> Result<()> {
        let timer = self.timers.spawn(TIMER_PERIOD)?;
        let result = self.run_until_exit(io);
        timer.stop();
        match &result {
            Ok(()) => debug!("Exit requested after {} cycles", self.cycle),
            Err(e) => warn!("Stopped after {} cycles: {e}", self.cycle),
        }
        result
    }

    fn run_until_exit(&mut self, io: &mut impl Device) -> Result<()> {
        loop {
            self.tick(io)?;
            io.render()?;
            if io.exit_requested() {
                return Ok(());
            }
        }
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let cpu = CPU::default();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 0000, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        std::eprintln!("{}", self.registers());
    }

    fn registers(&self) -> String {
        format!(
            "PC: {:04x}, SP: {:04x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}",
            self.pc,
            self.stack.len(),
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x}{}",
                        match i % 4 {
                            3 => "\n",
                            _ => " ",
                        }
                    )
                })
                .collect::<String>(),
            self.delay(),
            self.sound(),
            self.cycle,
        )
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("debug", &self.debug)
            .field("stack", &self.stack)
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("timers", &self.timers)
            .field("cycle", &self.cycle)
            .field("disassembler", &self.disassembler)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new CPU with sane defaults
    ///
    /// | value  | default | description
    /// |--------|---------|------------
    /// | font   |`0x0000` | Location of font memory.
    /// | pc     |`0x0200` | Start location.
    /// | stack  |   `16`  | Maximum call depth.
    /// | rng    |`StdRng` | Seeded from the OS.
    ///
    /// # Examples
    /// ```rust
    /// use chirp8::*;
    /// let mut cpu = CPU::default();
    /// ```
    fn default() -> Self {
        CPU {
            debug: false,
            mem: Mem::new(),
            stack: Stack::default(),
            pc: PROGRAM_START as Adr,
            i: 0,
            v: [0; 16],
            timers: Timers::new(),
            cycle: 0,
            rng: Box::new(StdRng::from_entropy()),
            disassembler: Dis::default(),
        }
    }
}
