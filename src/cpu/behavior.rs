// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains implementations for each Chip-8 [Insn]

use super::*;

impl CPU {
    /// Executes a single [Insn], fetched from `addr`
    #[rustfmt::skip]
    #[inline(always)]
    pub(super) fn execute(&mut self, io: &mut impl Device, insn: Insn, addr: Adr) -> Result<()> {
        match insn {
            Insn::Cls                 => self.clear_screen(io),
            Insn::Ret                 => self.ret(addr)?,
            Insn::Jp      {       N } => self.jump(N),
            Insn::Call    {       N } => self.call(N, addr)?,
            Insn::SeByte  { x,    K } => self.skip_equals_immediate(x, K),
            Insn::SneByte { x,    K } => self.skip_not_equals_immediate(x, K),
            Insn::Se      { x, y, ..} => self.skip_equals(x, y),
            Insn::LdByte  { x,    K } => self.load_immediate(x, K),
            Insn::AddByte { x,    K } => self.add_immediate(x, K),
            Insn::Ld      { x, y    } => self.load(x, y),
            Insn::Or      { x, y    } => self.or(x, y),
            Insn::And     { x, y    } => self.and(x, y),
            Insn::Xor     { x, y    } => self.xor(x, y),
            Insn::Add     { x, y    } => self.add(x, y),
            Insn::Sub     { x, y    } => self.sub(x, y),
            Insn::Shr     { x, ..   } => self.shift_right(x),
            Insn::Subn    { x, y    } => self.backwards_sub(x, y),
            Insn::Shl     { x, ..   } => self.shift_left(x),
            Insn::Sne     { x, y, ..} => self.skip_not_equals(x, y),
            Insn::LdI     {       N } => self.load_i_immediate(N),
            Insn::JpV0    {       N } => self.jump_indexed(N),
            Insn::Rnd     { x,    K } => self.rand(x, K),
            Insn::Drw     { x, y, n } => self.draw(x, y, n, io),
            Insn::Skp     { x       } => self.skip_key_equals(x, io),
            Insn::Sknp    { x       } => self.skip_key_not_equals(x, io),
            Insn::LdVxDt  { x       } => self.load_delay_timer(x),
            Insn::LdVxK   { x       } => self.wait_for_key(x, io),
            Insn::LdDtVx  { x       } => self.store_delay_timer(x),
            Insn::LdStVx  { x       } => self.store_sound_timer(x),
            Insn::AddI    { x       } => self.add_i(x),
            Insn::LdF     { x       } => self.load_sprite(x),
            Insn::LdB     { x       } => self.bcd_convert(x),
            Insn::LdIVx   { x       } => self.store_dma(x),
            Insn::LdVxI   { x       } => self.load_dma(x),
        }
        Ok(())
    }
}

/// |`0nnn`| Screen and subroutine control
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`00e0`| Clear the display                  |
/// |`00ee`| Return from subroutine             |
impl CPU {
    /// |`00e0`| Clears the display
    #[inline(always)]
    pub(super) fn clear_screen(&mut self, io: &mut impl Device) {
        io.clear_display();
    }
    /// |`00ee`| Returns from subroutine
    #[inline(always)]
    pub(super) fn ret(&mut self, addr: Adr) -> Result<()> {
        self.pc = self.stack.pop().ok_or(Error::StackUnderflow { addr })?;
        Ok(())
    }
}

/// |`1nnn`| Sets pc to an absolute address
impl CPU {
    /// |`1nnn`| Sets the program counter to an absolute address
    #[inline(always)]
    pub(super) fn jump(&mut self, nnn: Adr) {
        self.pc = nnn;
    }
}

/// |`2nnn`| Pushes pc onto the stack, then jumps to nnn
impl CPU {
    /// |`2nnn`| Pushes pc onto the stack, then jumps to nnn
    #[inline(always)]
    pub(super) fn call(&mut self, nnn: Adr, addr: Adr) -> Result<()> {
        if self.stack.push(self.pc).is_err() {
            return Err(Error::StackOverflow {
                limit: self.stack.limit().unwrap_or(self.stack.len()),
                addr,
            });
        }
        self.pc = nnn;
        Ok(())
    }
}

/// |`3xkk`| Skips next instruction if register X == kk
impl CPU {
    /// |`3xkk`| Skips next instruction if register X == kk
    #[inline(always)]
    pub(super) fn skip_equals_immediate(&mut self, x: Reg, kk: u8) {
        if self.v[x] == kk {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`4xkk`| Skips next instruction if register X != kk
impl CPU {
    /// |`4xkk`| Skips next instruction if register X != kk
    #[inline(always)]
    pub(super) fn skip_not_equals_immediate(&mut self, x: Reg, kk: u8) {
        if self.v[x] != kk {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`5xyn`| Performs a register-register comparison
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`5XYn`| Skip next instruction if vX == vY  |
impl CPU {
    /// |`5xyn`| Skips next instruction if register X == register Y. The low nibble is ignored.
    #[inline(always)]
    pub(super) fn skip_equals(&mut self, x: Reg, y: Reg) {
        if self.v[x] == self.v[y] {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`6xkk`| Loads immediate byte kk into register vX
impl CPU {
    /// |`6xkk`| Loads immediate byte kk into register vX
    #[inline(always)]
    pub(super) fn load_immediate(&mut self, x: Reg, kk: u8) {
        self.v[x] = kk;
    }
}

/// |`7xkk`| Adds immediate byte kk to register vX
impl CPU {
    /// |`7xkk`| Adds immediate byte kk to register vX. Does not touch vF.
    #[inline(always)]
    pub(super) fn add_immediate(&mut self, x: Reg, kk: u8) {
        self.v[x] = self.v[x].wrapping_add(kk);
    }
}

/// |`8xyn`| Performs ALU operation
///
/// Operations which set vF write vX first, so vF holds the flag even when X is F.
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`8xy0`| X = Y                              |
/// |`8xy1`| X = X \| Y                         |
/// |`8xy2`| X = X & Y                          |
/// |`8xy3`| X = X ^ Y                          |
/// |`8xy4`| X = X + Y; Set vF=carry            |
/// |`8xy5`| X = X - Y; Set vF=!borrow          |
/// |`8xy6`| X = X >> 1; Set vF=bit shifted out |
/// |`8xy7`| X = Y - X; Set vF=!borrow          |
/// |`8xyE`| X = X << 1; Set vF=bit shifted out |
impl CPU {
    /// |`8xy0`| Loads the value of vY into vX
    #[inline(always)]
    pub(super) fn load(&mut self, x: Reg, y: Reg) {
        self.v[x] = self.v[y];
    }
    /// |`8xy1`| Performs bitwise or of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn or(&mut self, x: Reg, y: Reg) {
        self.v[x] |= self.v[y];
    }
    /// |`8xy2`| Performs bitwise and of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn and(&mut self, x: Reg, y: Reg) {
        self.v[x] &= self.v[y];
    }
    /// |`8xy3`| Performs bitwise xor of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn xor(&mut self, x: Reg, y: Reg) {
        self.v[x] ^= self.v[y];
    }
    /// |`8xy4`| Performs addition of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn add(&mut self, x: Reg, y: Reg) {
        let carry;
        (self.v[x], carry) = self.v[x].overflowing_add(self.v[y]);
        self.v[0xf] = carry.into();
    }
    /// |`8xy5`| Performs subtraction of vX and vY, and stores the result in vX
    ///
    /// vF is set when vX > vY, so equal operands clear it
    #[inline(always)]
    pub(super) fn sub(&mut self, x: Reg, y: Reg) {
        let flag = (self.v[x] > self.v[y]).into();
        self.v[x] = self.v[x].wrapping_sub(self.v[y]);
        self.v[0xf] = flag;
    }
    /// |`8xy6`| Performs bitwise right shift of vX
    #[inline(always)]
    pub(super) fn shift_right(&mut self, x: Reg) {
        let shift_out = self.v[x] & 1;
        self.v[x] >>= 1;
        self.v[0xf] = shift_out;
    }
    /// |`8xy7`| Performs subtraction of vY and vX, and stores the result in vX
    #[inline(always)]
    pub(super) fn backwards_sub(&mut self, x: Reg, y: Reg) {
        let flag = (self.v[y] > self.v[x]).into();
        self.v[x] = self.v[y].wrapping_sub(self.v[x]);
        self.v[0xf] = flag;
    }
    /// |`8xyE`| Performs bitwise left shift of vX
    #[inline(always)]
    pub(super) fn shift_left(&mut self, x: Reg) {
        let shift_out = self.v[x] >> 7;
        self.v[x] <<= 1;
        self.v[0xf] = shift_out;
    }
}

/// |`9xyn`| Performs a register-register comparison
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`9XYn`| Skip next instruction if vX != vY  |
impl CPU {
    /// |`9xyn`| Skip next instruction if X != y. The low nibble is ignored.
    #[inline(always)]
    pub(super) fn skip_not_equals(&mut self, x: Reg, y: Reg) {
        if self.v[x] != self.v[y] {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`Annn`| Load address nnn into index register I
impl CPU {
    /// |`Annn`| Load address nnn into index register I
    #[inline(always)]
    pub(super) fn load_i_immediate(&mut self, nnn: Adr) {
        self.i = nnn;
    }
}

/// |`Bnnn`| Jump to &adr + v0
impl CPU {
    /// |`Bnnn`| Jump to &adr + v0
    #[inline(always)]
    pub(super) fn jump_indexed(&mut self, nnn: Adr) {
        self.pc = nnn.wrapping_add(self.v[0] as Adr);
    }
}

/// |`Cxkk`| Stores a random number & the provided byte into vX
impl CPU {
    /// |`Cxkk`| Stores a random number & the provided byte into vX
    #[inline(always)]
    pub(super) fn rand(&mut self, x: Reg, kk: u8) {
        self.v[x] = self.rng.next_u32() as u8 & kk;
    }
}

/// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
impl CPU {
    /// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
    ///
    /// The sprite is read from I onward, wrapping around the end of memory.
    /// vF is set to 1 if any lit pixel was turned off, and 0 otherwise.
    #[inline(always)]
    pub(super) fn draw(&mut self, x: Reg, y: Reg, n: Nib, io: &mut impl Device) {
        let sprite: Vec<u8> = (0..n as usize)
            .map(|line| self.mem.read(self.i as usize + line))
            .collect();
        let collision = io.draw(&sprite, self.v[x], self.v[y]);
        self.v[0xf] = collision.into();
    }
}

/// |`Exbb`| Skips instruction on value of keypress
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`Ex9E`| Skip next instruction if key == vX |
/// |`ExA1`| Skip next instruction if key != vX |
impl CPU {
    /// |`Ex9E`| Skip next instruction if key == vX
    #[inline(always)]
    pub(super) fn skip_key_equals(&mut self, x: Reg, io: &mut impl Device) {
        if io.key_pressed(self.v[x]) {
            self.pc = self.pc.wrapping_add(2);
        }
    }
    /// |`ExA1`| Skip next instruction if key != vX
    #[inline(always)]
    pub(super) fn skip_key_not_equals(&mut self, x: Reg, io: &mut impl Device) {
        if !io.key_pressed(self.v[x]) {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`Fxbb`| Performs IO
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`Fx07`| Set vX to value in delay timer     |
/// |`Fx0A`| Wait for input, store key in vX    |
/// |`Fx15`| Set delay timer to the value in vX |
/// |`Fx18`| Set sound timer to the value in vX |
/// |`Fx1E`| Add vX to I                        |
/// |`Fx29`| Load sprite for character x into I |
/// |`Fx33`| BCD convert X into I`[0..3]`       |
/// |`Fx55`| DMA Stor from I to registers 0..=X |
/// |`Fx65`| DMA Load from I to registers 0..=X |
impl CPU {
    /// |`Fx07`| Get the current DT, and put it in vX
    #[inline(always)]
    pub(super) fn load_delay_timer(&mut self, x: Reg) {
        self.v[x] = self.timers.delay();
    }
    /// |`Fx0A`| Wait for key, then vX = K
    ///
    /// If the device asks to exit instead, vX is left alone.
    #[inline(always)]
    pub(super) fn wait_for_key(&mut self, x: Reg, io: &mut impl Device) {
        if let Some(key) = io.wait_for_key() {
            self.v[x] = key;
        }
    }
    /// |`Fx15`| Load vX into DT
    #[inline(always)]
    pub(super) fn store_delay_timer(&mut self, x: Reg) {
        self.timers.set_delay(self.v[x]);
    }
    /// |`Fx18`| Load vX into ST
    #[inline(always)]
    pub(super) fn store_sound_timer(&mut self, x: Reg) {
        self.timers.set_sound(self.v[x]);
    }
    /// |`Fx1E`| Add vX to I, within the 12-bit address space
    #[inline(always)]
    pub(super) fn add_i(&mut self, x: Reg) {
        self.i = self.i.wrapping_add(self.v[x] as Adr) % MEMORY_SIZE as Adr;
    }
    /// |`Fx29`| Load the address of the glyph for vX into I
    #[inline(always)]
    pub(super) fn load_sprite(&mut self, x: Reg) {
        self.i = self.v[x] as Adr * GLYPH_SIZE as Adr;
    }
    /// |`Fx33`| BCD convert X into I`[0..3]`
    #[inline(always)]
    pub(super) fn bcd_convert(&mut self, x: Reg) {
        let (i, v) = (self.i as usize, self.v[x]);
        self.mem.write(i, v / 100);
        self.mem.write(i + 1, v / 10 % 10);
        self.mem.write(i + 2, v % 10);
    }
    /// |`Fx55`| DMA Stor from registers 0..=X to I
    ///
    /// I is left unchanged.
    #[inline(always)]
    pub(super) fn store_dma(&mut self, x: Reg) {
        let i = self.i as usize;
        for (offset, &value) in self.v[..=x].iter().enumerate() {
            self.mem.write(i + offset, value);
        }
    }
    /// |`Fx65`| DMA Load from I to registers 0..=X
    ///
    /// I is left unchanged.
    #[inline(always)]
    pub(super) fn load_dma(&mut self, x: Reg) {
        let i = self.i as usize;
        for (offset, value) in self.v[..=x].iter_mut().enumerate() {
            *value = self.mem.read(i + offset);
        }
    }
}
