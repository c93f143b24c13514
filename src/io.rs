// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The display and keypad the [CPU](crate::CPU) talks to
//!
//! Anything that can show a [Screen] and report key state can be a [Device].
//! [Headless] is a device with no window at all, driven entirely by code.

use crate::{
    error::{Error, Result},
    screen::Screen,
};
use std::collections::VecDeque;

/// Number of keys on the Chip-8 hex keypad
pub const KEY_COUNT: usize = 16;

/// The display/input device driven by the interpreter
pub trait Device {
    /// Turns every pixel of the frame buffer off
    fn clear_display(&mut self);
    /// XORs an 8-pixel-wide, `sprite.len()`-row sprite onto the frame buffer at
    /// (x, y), wrapping around the edges.
    ///
    /// Returns true if any lit pixel was turned off.
    fn draw(&mut self, sprite: &[u8], x: u8, y: u8) -> bool;
    /// Polls whether `key` is currently held, without blocking
    fn key_pressed(&self, key: u8) -> bool;
    /// Blocks until a key is pressed, returning it.
    ///
    /// Returns [None] instead if an exit was requested while waiting.
    fn wait_for_key(&mut self) -> Option<u8>;
    /// Checks whether the device wants the interpreter to stop, without blocking
    fn exit_requested(&mut self) -> bool;
    /// Shows the current frame buffer
    fn render(&mut self) -> Result<()>;
    /// Sets the title of whatever is showing the frame buffer
    fn set_title(&mut self, title: &str);
}

/// A [Device] with no window, for tests and batch runs.
///
/// Keys are pressed and released with [Headless::press] and [Headless::release].
/// Keys for `Fx0A` come from a queue; once the queue runs dry,
/// [wait_for_key](Device::wait_for_key) requests exit rather than waiting forever.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Headless {
    screen: Screen,
    keys: [bool; KEY_COUNT],
    queue: VecDeque<u8>,
    exit: bool,
    frames: usize,
    frame_limit: Option<usize>,
    title: String,
}

impl Headless {
    /// Constructs a headless device around the provided [Screen]
    pub fn new(screen: Screen) -> Self {
        Headless {
            screen,
            ..Default::default()
        }
    }

    /// Requests exit after `frames` calls to [render](Device::render)
    pub fn with_frame_limit(mut self, frames: usize) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut io = Headless::default();
    ///
    /// // press key `7`
    /// let did_press = io.press(0x7).unwrap();
    /// assert!(did_press);
    ///
    /// // press key `7` again, even though it's already pressed
    /// let did_press = io.press(0x7).unwrap();
    /// // it was already pressed, so nothing's changed.
    /// assert!(!did_press);
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        Ok(!std::mem::replace(keyref, true))
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    pub fn release(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        Ok(std::mem::replace(keyref, false))
    }

    /// Queues a key to be returned by the next [wait_for_key](Device::wait_for_key)
    pub fn queue_key(&mut self, key: usize) -> Result<&mut Self> {
        if key >= KEY_COUNT {
            return Err(Error::InvalidKey { key });
        }
        self.queue.push_back(key as u8);
        Ok(self)
    }

    /// Asks the interpreter to stop at its next opportunity
    pub fn request_exit(&mut self) {
        self.exit = true;
    }

    /// Gets the frame buffer
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Gets the number of frames rendered so far
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Gets the last title set on this device
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Device for Headless {
    fn clear_display(&mut self) {
        self.screen.clear()
    }

    fn draw(&mut self, sprite: &[u8], x: u8, y: u8) -> bool {
        self.screen.draw(sprite, x as usize, y as usize)
    }

    fn key_pressed(&self, key: u8) -> bool {
        self.keys[key as usize % KEY_COUNT]
    }

    fn wait_for_key(&mut self) -> Option<u8> {
        if self.exit {
            return None;
        }
        let key = self.queue.pop_front();
        // Nobody is left to press anything
        self.exit = key.is_none();
        key
    }

    fn exit_requested(&mut self) -> bool {
        self.exit
    }

    fn render(&mut self) -> Result<()> {
        self.frames += 1;
        if matches!(self.frame_limit, Some(limit) if self.frames >= limit) {
            self.exit = true;
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_owned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let mut io = Headless::default();
        assert!(io.press(0xa).unwrap());
        assert!(io.key_pressed(0xa));
        assert!(!io.key_pressed(0xb));
        assert!(io.release(0xa).unwrap());
        assert!(!io.release(0xa).unwrap());
        assert!(!io.key_pressed(0xa));
    }

    #[test]
    fn press_invalid_key() {
        let mut io = Headless::default();
        let io2 = io.clone();
        io.press(0x21345134)
            .expect_err("This should produce an Error::InvalidKey");
        io.release(0x10)
            .expect_err("This should produce an Error::InvalidKey");
        io.queue_key(0x10)
            .expect_err("This should produce an Error::InvalidKey");
        // no change has been made, everything is safe.
        assert_eq!(io, io2);
    }

    #[test]
    fn key_queue_then_exit() {
        let mut io = Headless::default();
        io.queue_key(0x3).unwrap().queue_key(0xf).unwrap();
        assert_eq!(Some(0x3), io.wait_for_key());
        assert_eq!(Some(0xf), io.wait_for_key());
        assert!(!io.exit_requested());
        assert_eq!(None, io.wait_for_key());
        assert!(io.exit_requested());
    }

    #[test]
    fn frame_limit() {
        let mut io = Headless::default().with_frame_limit(3);
        for _ in 0..2 {
            io.render().unwrap();
            assert!(!io.exit_requested());
        }
        io.render().unwrap();
        assert!(io.exit_requested());
        assert_eq!(3, io.frames());
    }

    #[test]
    fn draw_and_clear() {
        let mut io = Headless::new(Screen::new(16, 8));
        assert!(!io.draw(&[0xff], 0, 0));
        assert!(io.draw(&[0xff], 0, 0));
        io.draw(&[0x80], 17, 9);
        assert!(io.screen().lit(1, 1));
        io.clear_display();
        assert_eq!(&Screen::new(16, 8), io.screen());
    }

    #[test]
    fn title() {
        let mut io = Headless::default();
        io.set_title("roms/pong.ch8");
        assert_eq!("roms/pong.ch8", io.title());
    }
}
