use super::Cpu8080;
use crate::flags::Condition;
use crate::Bus8080;

impl Cpu8080 {
    /// Read an 8-bit register or M (the byte at HL) by index.
    ///
    /// The encoding matches the 8080 opcode tables:
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=M, 7=A.
    #[inline]
    pub(super) fn read_reg<B: Bus8080>(&mut self, bus: &mut B, index: u8) -> u8 {
        match index & 0x07 {
            0 => self.regs.b,
            1 => self.regs.c,
            2 => self.regs.d,
            3 => self.regs.e,
            4 => self.regs.h,
            5 => self.regs.l,
            6 => bus.mem_read(self.regs.hl()),
            _ => self.regs.a,
        }
    }

    /// Write an 8-bit register or M by index, see `read_reg`.
    #[inline]
    pub(super) fn write_reg<B: Bus8080>(&mut self, bus: &mut B, index: u8, value: u8) {
        match index & 0x07 {
            0 => self.regs.b = value,
            1 => self.regs.c = value,
            2 => self.regs.d = value,
            3 => self.regs.e = value,
            4 => self.regs.h = value,
            5 => self.regs.l = value,
            6 => bus.mem_write(self.regs.hl(), value),
            _ => self.regs.a = value,
        }
    }

    #[inline]
    pub(super) fn fetch_byte<B: Bus8080>(&mut self, bus: &mut B) -> u8 {
        let b = bus.mem_read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        b
    }

    #[inline]
    pub(super) fn fetch_word<B: Bus8080>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch_byte(bus);
        let hi = self.fetch_byte(bus);
        u16::from_le_bytes([lo, hi])
    }

    pub(super) fn read_word<B: Bus8080>(&mut self, bus: &mut B, addr: u16) -> u16 {
        let lo = bus.mem_read(addr);
        let hi = bus.mem_read(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    pub(super) fn write_word<B: Bus8080>(&mut self, bus: &mut B, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        bus.mem_write(addr, lo);
        bus.mem_write(addr.wrapping_add(1), hi);
    }

    /// Push a word; the stack grows downward with the low byte at SP.
    pub(super) fn push<B: Bus8080>(&mut self, bus: &mut B, value: u16) {
        self.regs.sp = self.regs.sp.wrapping_sub(2);
        self.write_word(bus, self.regs.sp, value);
    }

    pub(super) fn pop<B: Bus8080>(&mut self, bus: &mut B) -> u16 {
        let value = self.read_word(bus, self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(2);
        value
    }

    /// JMP / Jcc. The address operand is consumed either way.
    pub(super) fn jump_if<B: Bus8080>(&mut self, bus: &mut B, cond: Option<Condition>) -> u32 {
        let addr = self.fetch_word(bus);
        if cond.map_or(true, |c| self.flags.test(c)) {
            self.regs.pc = addr;
        }
        10
    }

    /// CALL / Ccc.
    pub(super) fn call_if<B: Bus8080>(&mut self, bus: &mut B, cond: Option<Condition>) -> u32 {
        let addr = self.fetch_word(bus);
        if cond.map_or(true, |c| self.flags.test(c)) {
            self.push(bus, self.regs.pc);
            self.regs.pc = addr;
            17
        } else {
            11
        }
    }

    /// Rcc. Unconditional RET is 10 T-states and handled by the caller.
    pub(super) fn ret_if<B: Bus8080>(&mut self, bus: &mut B, cond: Condition) -> u32 {
        if self.flags.test(cond) {
            self.regs.pc = self.pop(bus);
            11
        } else {
            5
        }
    }
}
