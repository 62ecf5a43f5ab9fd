use super::Cpu8080;
use crate::flags::Flags;

impl Cpu8080 {
    #[inline]
    fn carry_in(&self) -> bool {
        self.flags.contains(Flags::CARRY)
    }

    /// Dispatch one of the eight accumulator operations encoded in bits 3-5
    /// of the 0x80-0xBF and 0xC6-0xFE (immediate) opcodes.
    pub(super) fn alu_op(&mut self, op: u8, value: u8) {
        match op & 0x07 {
            0 => self.add(value, false),
            1 => self.add(value, self.carry_in()),
            2 => self.sub(value, false),
            3 => self.sub(value, self.carry_in()),
            4 => self.ana(value),
            5 => self.xra(value),
            6 => self.ora(value),
            _ => self.cmp(value),
        }
    }

    /// ADD/ADC: A = A + value + carry.
    ///
    /// Carry comes out of a 9-bit sum, auxiliary carry out of a 5-bit sum of
    /// the low nibbles.
    pub(super) fn add(&mut self, value: u8, carry: bool) {
        let a = self.regs.a;
        let c = carry as u16;
        let full = a as u16 + value as u16 + c;
        let half = (a & 0x0f) as u16 + (value & 0x0f) as u16 + c;
        let result = full as u8;

        let mut f = Flags::szp(result);
        f.set(Flags::CARRY, full > 0xff);
        f.set(Flags::AUX_CARRY, half > 0x0f);
        self.flags.merge(Flags::ALU, f);
        self.regs.a = result;
    }

    /// Subtraction as the 8080 adder performs it: A + !value + !borrow.
    ///
    /// CY is the inverted carry out of bit 7 (a borrow). AC is the plain
    /// carry out of bit 3 of that addition, not a borrow.
    fn subtract(&mut self, value: u8, borrow: bool) -> u8 {
        let a = self.regs.a;
        let operand = !value;
        let c = (!borrow) as u16;
        let full = a as u16 + operand as u16 + c;
        let half = (a & 0x0f) as u16 + (operand & 0x0f) as u16 + c;
        let result = full as u8;

        let mut f = Flags::szp(result);
        f.set(Flags::CARRY, full <= 0xff);
        f.set(Flags::AUX_CARRY, half > 0x0f);
        self.flags.merge(Flags::ALU, f);
        result
    }

    /// SUB/SBB.
    pub(super) fn sub(&mut self, value: u8, borrow: bool) {
        self.regs.a = self.subtract(value, borrow);
    }

    /// CMP: flags of A - value, A unchanged.
    pub(super) fn cmp(&mut self, value: u8) {
        self.subtract(value, false);
    }

    /// ANA. The 8080 sets AC to bit 3 of (A | value); CY is cleared.
    pub(super) fn ana(&mut self, value: u8) {
        let result = self.regs.a & value;
        let mut f = Flags::szp(result);
        f.set(Flags::AUX_CARRY, (self.regs.a | value) & 0x08 != 0);
        self.flags.merge(Flags::ALU, f);
        self.regs.a = result;
    }

    /// XRA: AC and CY cleared.
    pub(super) fn xra(&mut self, value: u8) {
        let result = self.regs.a ^ value;
        self.flags.merge(Flags::ALU, Flags::szp(result));
        self.regs.a = result;
    }

    /// ORA: AC and CY cleared.
    pub(super) fn ora(&mut self, value: u8) {
        let result = self.regs.a | value;
        self.flags.merge(Flags::ALU, Flags::szp(result));
        self.regs.a = result;
    }

    /// INR. Carry is not affected.
    pub(super) fn inr(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        let mut f = Flags::szp(result);
        f.set(Flags::AUX_CARRY, value & 0x0f == 0x0f);
        self.flags.merge(Flags::SZP | Flags::AUX_CARRY, f);
        result
    }

    /// DCR. Carry is not affected; AC is the carry out of bit 3 of
    /// value + 0xFF, i.e. set unless the low nibble was zero.
    pub(super) fn dcr(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        let mut f = Flags::szp(result);
        f.set(Flags::AUX_CARRY, value & 0x0f != 0);
        self.flags.merge(Flags::SZP | Flags::AUX_CARRY, f);
        result
    }

    /// DAD: HL += value, only CY (the 17th bit) is affected.
    pub(super) fn dad(&mut self, value: u16) {
        let full = self.regs.hl() as u32 + value as u32;
        self.flags.set(Flags::CARRY, full > 0xffff);
        self.regs.set_hl(full as u16);
    }

    /// DAA, following the Intel 8080 manual.
    pub(super) fn daa(&mut self) {
        let a = self.regs.a;
        let low = a & 0x0f;
        let high = a >> 4;
        let mut correction = 0u8;
        let mut carry = self.carry_in();

        if self.flags.contains(Flags::AUX_CARRY) || low > 9 {
            correction |= 0x06;
        }
        if carry || high > 9 || (high >= 9 && low > 9) {
            correction |= 0x60;
            carry = true;
        }

        self.add(correction, false);
        self.flags.set(Flags::CARRY, carry);
    }

    pub(super) fn rlc(&mut self) {
        let bit7 = self.regs.a & 0x80 != 0;
        self.regs.a = self.regs.a.rotate_left(1);
        self.flags.set(Flags::CARRY, bit7);
    }

    pub(super) fn rrc(&mut self) {
        let bit0 = self.regs.a & 0x01 != 0;
        self.regs.a = self.regs.a.rotate_right(1);
        self.flags.set(Flags::CARRY, bit0);
    }

    pub(super) fn ral(&mut self) {
        let bit7 = self.regs.a & 0x80 != 0;
        self.regs.a = (self.regs.a << 1) | self.carry_in() as u8;
        self.flags.set(Flags::CARRY, bit7);
    }

    pub(super) fn rar(&mut self) {
        let bit0 = self.regs.a & 0x01 != 0;
        self.regs.a = (self.regs.a >> 1) | ((self.carry_in() as u8) << 7);
        self.flags.set(Flags::CARRY, bit0);
    }
}
