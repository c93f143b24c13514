// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE.txt for details)
#![allow(missing_docs)]
//! A [minifb] window which shows the frame buffer and reads the keypad.

use chirp8::{error::Result, Device, Screen};
use log::debug;
use minifb::*;
use std::time::Duration;

/// How long [Device::wait_for_key] sleeps between polls of the window
const KEY_POLL: Duration = Duration::from_millis(1);

#[derive(Clone, Debug)]
pub struct UIBuilder {
    pub width: usize,
    pub height: usize,
    pub scale: usize,
    pub name: Option<&'static str>,
    pub window_options: WindowOptions,
}

impl UIBuilder {
    pub fn new(width: usize, height: usize, scale: usize) -> Self {
        UIBuilder {
            width,
            height,
            scale,
            ..Default::default()
        }
    }
    /// Trades the decorated window for a borderless one kept above other windows
    pub fn fullscreen(mut self, fullscreen: bool) -> Self {
        if fullscreen {
            self.window_options.borderless = true;
            self.window_options.topmost = true;
            self.window_options.title = false;
        }
        self
    }
    pub fn build(&self) -> Result<UI> {
        let mut window = Window::new(
            self.name.unwrap_or_default(),
            self.width * self.scale,
            self.height * self.scale,
            self.window_options,
        )?;
        // The interpreter renders once per instruction, so don't cap it
        window.limit_update_rate(None);
        debug!(
            "Opened {}x{} window for a {}x{} screen",
            self.width * self.scale,
            self.height * self.scale,
            self.width,
            self.height
        );
        Ok(UI {
            window,
            screen: Screen::new(self.width, self.height),
            fb: FrameBuffer::new(self.width, self.height),
            keyboard: vec![],
            keys: [false; 16],
            exit: false,
        })
    }
}

impl Default for UIBuilder {
    fn default() -> Self {
        UIBuilder {
            width: 64,
            height: 32,
            scale: 16,
            name: Some("Chip-8 Interpreter"),
            window_options: WindowOptions {
                title: true,
                resize: false,
                scale: Scale::X1,
                scale_mode: ScaleMode::Stretch,
                none: false,
                ..Default::default()
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBufferFormat {
    pub fg: u32,
    pub bg: u32,
}

impl Default for FrameBufferFormat {
    fn default() -> Self {
        FrameBufferFormat {
            fg: 0x0011a434,
            bg: 0x001E2431,
        }
    }
}

/// The [Screen], translated into colors for [minifb]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBuffer {
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    format: FrameBufferFormat,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let format = FrameBufferFormat::default();
        FrameBuffer {
            buffer: vec![format.bg; width * height],
            width,
            height,
            format,
        }
    }
    /// Repaints the buffer from the pixels of `screen`
    pub fn update(&mut self, screen: &Screen) {
        for (color, &lit) in self.buffer.iter_mut().zip(screen.as_slice()) {
            *color = if lit { self.format.fg } else { self.format.bg };
        }
    }
    pub fn as_slice(&self) -> &[u32] {
        &self.buffer
    }
    pub fn render(&self, window: &mut Window) -> Result<()> {
        window.update_with_buffer(self.as_slice(), self.width, self.height)?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct UI {
    window: Window,
    screen: Screen,
    fb: FrameBuffer,
    /// Every key held as of the last poll
    keyboard: Vec<Key>,
    /// Chip-8 keypad state
    keys: [bool; 16],
    exit: bool,
}

impl UI {
    /// Re-reads the keyboard, returning the keypad keys that went down since the last poll
    fn poll_keys(&mut self) -> Vec<usize> {
        // minifb's get_keys_pressed is unreliable, so diff against the last poll instead
        let held = self.window.get_keys();
        let pressed = held
            .iter()
            .filter(|&key| !self.keyboard.contains(key))
            .filter_map(|&key| identify_key(key))
            .collect();
        if held.contains(&Key::Escape) || !self.window.is_open() {
            self.exit = true;
        }
        self.keys = [false; 16];
        for key in held.iter().filter_map(|&key| identify_key(key)) {
            self.keys[key] = true;
        }
        self.keyboard = held;
        pressed
    }
}

impl Device for UI {
    fn clear_display(&mut self) {
        self.screen.clear()
    }

    fn draw(&mut self, sprite: &[u8], x: u8, y: u8) -> bool {
        self.screen.draw(sprite, x as usize, y as usize)
    }

    fn key_pressed(&self, key: u8) -> bool {
        self.keys[key as usize % 16]
    }

    fn wait_for_key(&mut self) -> Option<u8> {
        loop {
            self.window.update();
            let pressed = self.poll_keys();
            if self.exit {
                return None;
            }
            if let Some(&key) = pressed.first() {
                return Some(key as u8);
            }
            std::thread::sleep(KEY_POLL);
        }
    }

    fn exit_requested(&mut self) -> bool {
        self.exit
    }

    fn render(&mut self) -> Result<()> {
        self.fb.update(&self.screen);
        self.fb.render(&mut self.window)?;
        self.poll_keys();
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title)
    }
}

/// Maps the COSMAC VIP keypad onto the left side of a QWERTY keyboard
pub fn identify_key(key: Key) -> Option<usize> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xc),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}
