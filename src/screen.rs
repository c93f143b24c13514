// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's screen memory

use std::fmt::{Display, Formatter, Result};

/// Logical width of the Chip-8 display
pub const SCREEN_WIDTH: usize = 64;
/// Logical height of the Chip-8 display
pub const SCREEN_HEIGHT: usize = 32;

/// A monochrome frame buffer, one `bool` per pixel, in row-major order
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Screen {
    pixels: Vec<bool>,
    width: usize,
    height: usize,
}

impl Screen {
    /// Constructs a blank `width` by `height` screen.
    ///
    /// A zero dimension is bumped up to 1, so drawing always has somewhere to go.
    pub fn new(width: usize, height: usize) -> Screen {
        let (width, height) = (width.max(1), height.max(1));
        Screen {
            pixels: vec![false; width * height],
            width,
            height,
        }
    }

    /// Gets the width of the screen, in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Gets the height of the screen, in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Turns every pixel off
    pub fn clear(&mut self) {
        self.pixels.fill(false)
    }

    /// Checks whether the pixel at (x, y) is lit. Coordinates wrap.
    pub fn lit(&self, x: usize, y: usize) -> bool {
        self.pixels[self.index(x, y)]
    }

    /// XORs an 8-pixel-wide sprite onto the screen at (x, y), one byte per row.
    ///
    /// The origin and every pixel of the sprite wrap around the edges.
    /// Returns true if any lit pixel was turned off.
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut screen = Screen::default();
    /// assert!(!screen.draw(&[0xff], 60, 0));
    /// assert!(screen.lit(0, 0)); // wrapped
    /// assert!(screen.draw(&[0x80], 60, 0));
    /// assert!(!screen.lit(60, 0));
    /// ```
    pub fn draw(&mut self, sprite: &[u8], x: usize, y: usize) -> bool {
        let mut collision = false;
        for (line, &row) in sprite.iter().enumerate() {
            for bit in 0..8 {
                if row & (0x80 >> bit) == 0 {
                    continue;
                }
                let index = self.index(x + bit, y + line);
                collision |= self.pixels[index];
                self.pixels[index] ^= true;
            }
        }
        collision
    }

    /// Gets the pixels as a flat slice, in row-major order
    pub fn as_slice(&self) -> &[bool] {
        &self.pixels
    }

    fn index(&self, x: usize, y: usize) -> usize {
        (y % self.height) * self.width + (x % self.width)
    }
}

impl Default for Screen {
    fn default() -> Self {
        Screen::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl Display for Screen {
    /// Prints the screen two rows per line, using half-block characters
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top = self.lit(x, y);
                let bottom = y + 1 < self.height && self.lit(x, y + 1);
                write!(
                    f,
                    "{}",
                    match (top, bottom) {
                        (true, true) => '█',
                        (true, false) => '▀',
                        (false, true) => '▄',
                        (false, false) => ' ',
                    }
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
