//! Running whole programs through Chirp8's public API
use chirp8::*;
use rand::rngs::mock::StepRng;
use std::time::{Duration, Instant};

fn setup_environment() -> (CPU, Headless) {
    (
        CPU::default().with_rng(StepRng::new(0, 0)),
        Headless::default(),
    )
}

fn program(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

mod load {
    use super::*;

    #[test]
    fn add_program() -> Result<()> {
        let (mut cpu, mut io) = setup_environment();
        cpu.load_program_bytes(&program(&[0x6005, 0x6103, 0x8014]))?;
        let start = cpu.pc();
        cpu.multistep(&mut io, 3)?;
        assert_eq!(8, cpu.v()[0]);
        assert_eq!(3, cpu.v()[1]);
        assert_eq!(0, cpu.v()[0xf]);
        assert_eq!(start + 6, cpu.pc());
        Ok(())
    }

    #[test]
    fn one_byte_too_long() {
        let (mut cpu, _) = setup_environment();
        let before = cpu.mem().clone();
        let rom = vec![0xff; MEMORY_SIZE - PROGRAM_START + 1];
        match cpu.load_program_bytes(&rom) {
            Err(Error::Capacity { len, capacity }) => assert_eq!((0xe01, 0xe00), (len, capacity)),
            other => panic!("expected Error::Capacity, got {other:?}"),
        }
        assert_eq!(&before, cpu.mem());
        assert!(cpu.mem().get_region(Program).iter().all(|&b| b == 0));
    }

    #[test]
    fn exactly_full() -> Result<()> {
        let (mut cpu, _) = setup_environment();
        cpu.load_program_bytes(&vec![0xa5; MEMORY_SIZE - PROGRAM_START])?;
        assert_eq!(Some(&0xa5), cpu.mem().grab(0xfff));
        assert_eq!(&FONT, cpu.mem().get_region(Charset));
        Ok(())
    }

    #[test]
    fn missing_file() {
        let (mut cpu, _) = setup_environment();
        match cpu.load_program("this/rom/does/not/exist.ch8") {
            Err(Error::IoError(_)) => {}
            other => panic!("expected Error::IoError, got {other:?}"),
        }
    }

    #[test]
    fn from_file() -> Result<()> {
        let path = std::env::temp_dir().join(format!("chirp8-{}.ch8", std::process::id()));
        std::fs::write(&path, program(&[0x6a42]))?;
        let (mut cpu, mut io) = setup_environment();
        let result = cpu.load_program(&path).map(|_| ());
        std::fs::remove_file(&path)?;
        result?;
        cpu.tick(&mut io)?;
        assert_eq!(0x42, cpu.v()[0xa]);
        Ok(())
    }
}

mod subroutines {
    use super::*;

    #[test]
    fn call_then_return() -> Result<()> {
        let (mut cpu, mut io) = setup_environment();
        // 200: call 206; 202: jp 202; 204: (padding); 206: ret
        cpu.load_program_bytes(&program(&[0x2206, 0x1202, 0x0000, 0x00ee]))?;
        let depth = cpu.stack().len();
        cpu.tick(&mut io)?;
        assert_eq!(0x206, cpu.pc());
        assert_eq!(depth + 1, cpu.stack().len());
        cpu.tick(&mut io)?;
        assert_eq!(0x202, cpu.pc());
        assert_eq!(depth, cpu.stack().len());
        Ok(())
    }

    #[test]
    fn runaway_recursion() {
        let mut cpu = CPU::new(Some(DEFAULT_STACK_LIMIT));
        let mut io = Headless::default();
        cpu.load_program_bytes(&program(&[0x2200])).unwrap();
        match cpu.run(&mut io) {
            Err(Error::StackOverflow { limit, addr }) => {
                assert_eq!((DEFAULT_STACK_LIMIT, 0x200), (limit, addr))
            }
            other => panic!("expected Error::StackOverflow, got {other:?}"),
        }
    }
}

mod display {
    use super::*;

    #[test]
    fn draw_twice_collides() -> Result<()> {
        let (mut cpu, mut io) = setup_environment();
        cpu.load_program_bytes(&program(&[
            0xa20a, // ld  I, 20a
            0x6010, // ld  v0, #10
            0xd001, // drw v0, v0, #1
            0x8f20, // ld  vF, v2 (v2 is 0: only the flag is observable)
            0xd001, // drw v0, v0, #1
            0xff00, // sprite row (and an illegal instruction if reached)
        ]))?;
        cpu.multistep(&mut io, 3)?;
        assert_eq!(0, cpu.v()[0xf]);
        assert!((0x10..0x18).all(|x| io.screen().lit(x, 0x10)));
        cpu.multistep(&mut io, 2)?;
        assert_eq!(1, cpu.v()[0xf]);
        assert_eq!(&Screen::default(), io.screen());
        Ok(())
    }

    #[test]
    fn font_glyph() -> Result<()> {
        let (mut cpu, mut io) = setup_environment();
        cpu.load_program_bytes(&program(&[0x600a, 0xf029, 0xd115]))?;
        cpu.multistep(&mut io, 3)?;
        assert_eq!(0x0a * 5, cpu.i());
        // "A" is f0 90 f0 90 90
        assert!((0..4).all(|x| io.screen().lit(x, 0)));
        assert!(io.screen().lit(0, 1) && !io.screen().lit(1, 1) && io.screen().lit(3, 1));
        Ok(())
    }
}

mod run {
    use super::*;

    #[test]
    fn exits_when_asked() -> Result<()> {
        let (mut cpu, _) = setup_environment();
        let mut io = Headless::default().with_frame_limit(100);
        cpu.load_program_bytes(&program(&[0x7001, 0x1200]))?;
        cpu.run(&mut io)?;
        assert_eq!(100, cpu.cycle());
        assert_eq!(50, cpu.v()[0]);
        Ok(())
    }

    #[test]
    fn exit_before_start() -> Result<()> {
        let (mut cpu, mut io) = setup_environment();
        io.request_exit();
        cpu.load_program_bytes(&program(&[0x1200]))?;
        cpu.run(&mut io)?;
        // the exit is noticed after the first instruction
        assert_eq!(1, cpu.cycle());
        Ok(())
    }

    #[test]
    fn stops_on_illegal_instruction() {
        let (mut cpu, mut io) = setup_environment();
        cpu.load_program_bytes(&program(&[0x6001, 0xf1ff])).unwrap();
        match cpu.run(&mut io) {
            Err(Error::IllegalInstruction { word, addr }) => {
                assert_eq!((0xf1ff, 0x202), (word, addr))
            }
            other => panic!("expected Error::IllegalInstruction, got {other:?}"),
        }
    }

    #[test]
    fn register_skips_ignore_low_nibble() -> Result<()> {
        let (mut cpu, io) = setup_environment();
        let mut io = io.with_frame_limit(2);
        // v0 == v1 == 0, so 5011 skips the ld and 9013 doesn't
        cpu.load_program_bytes(&program(&[0x5011, 0x6aff, 0x9013, 0x6b01]))?;
        cpu.run(&mut io)?;
        assert_eq!(0x206, cpu.pc());
        assert_eq!(0, cpu.v()[0xa]);
        cpu.multistep(&mut io, 1)?;
        assert_eq!(0x208, cpu.pc());
        assert_eq!(1, cpu.v()[0xb]);
        Ok(())
    }

    #[test]
    fn stops_at_end_of_memory() {
        let (mut cpu, mut io) = setup_environment();
        // jump to the very last byte
        cpu.load_program_bytes(&program(&[0x1fff])).unwrap();
        match cpu.run(&mut io) {
            Err(Error::OutOfBounds { addr }) => assert_eq!(0xfff, addr),
            other => panic!("expected Error::OutOfBounds, got {other:?}"),
        }
    }

    #[test]
    fn wait_for_key() -> Result<()> {
        let (mut cpu, mut io) = setup_environment();
        io.queue_key(0xc)?;
        cpu.load_program_bytes(&program(&[0xf30a, 0xe39e, 0x1200, 0x6401, 0xf40a]))?;
        io.press(0xc)?;
        cpu.run(&mut io)?;
        assert_eq!(0xc, cpu.v()[3]);
        assert_eq!(1, cpu.v()[4]);
        Ok(())
    }

    /// The timers keep counting down while the program runs
    #[test]
    fn timers_count_down() -> Result<()> {
        let (mut cpu, mut io) = setup_environment();
        cpu.load_program_bytes(&program(&[
            0x603c, // ld v0, #3c
            0xf018, // ld ST, v0
            0xf015, // ld DT, v0
            0xf107, // ld v1, DT
            0x3100, // se v1, #00
            0x1206, // jp 206
        ]))?;
        let start = Instant::now();
        // 0x20c is past the program: a zero word, which is illegal
        match cpu.run(&mut io) {
            Err(Error::IllegalInstruction { word: 0, addr: 0x20c }) => {}
            other => panic!("expected to run off the end of the program, got {other:?}"),
        }
        // 60 ticks at 60Hz
        assert!(start.elapsed() >= Duration::from_millis(500));
        assert_eq!((0, 0), (cpu.delay(), cpu.sound()));
        Ok(())
    }
}
