use bitflags::bitflags;

bitflags! {
    /// The 8080 flag byte, as seen in the low half of PSW.
    ///
    /// Layout (bit 7 to bit 0): `S Z 0 AC 0 P 1 CY`. Bit 1 reads as one and
    /// bits 3 and 5 read as zero; every constructor in this module keeps
    /// them that way.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        const SIGN = 0x80;
        const ZERO = 0x40;
        const AUX_CARRY = 0x10;
        const PARITY = 0x04;
        const ALWAYS_ONE = 0x02;
        const CARRY = 0x01;
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::ALWAYS_ONE
    }
}

/// Condition codes used by Jcc/Ccc/Rcc, in opcode encoding order
/// (bits 3-5 of the opcode).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    NotZero,
    Zero,
    NoCarry,
    Carry,
    ParityOdd,
    ParityEven,
    Plus,
    Minus,
}

impl Condition {
    #[inline]
    pub fn from_opcode(opcode: u8) -> Self {
        match (opcode >> 3) & 0x07 {
            0 => Condition::NotZero,
            1 => Condition::Zero,
            2 => Condition::NoCarry,
            3 => Condition::Carry,
            4 => Condition::ParityOdd,
            5 => Condition::ParityEven,
            6 => Condition::Plus,
            _ => Condition::Minus,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Condition::NotZero => "NZ",
            Condition::Zero => "Z",
            Condition::NoCarry => "NC",
            Condition::Carry => "C",
            Condition::ParityOdd => "PO",
            Condition::ParityEven => "PE",
            Condition::Plus => "P",
            Condition::Minus => "M",
        }
    }
}

/// Even parity of an 8-bit value, as the P flag reports it.
#[inline]
pub fn parity(value: u8) -> bool {
    value.count_ones() % 2 == 0
}

impl Flags {
    /// Flags derived from the result byte alone.
    pub const SZP: Flags = Flags::SIGN.union(Flags::ZERO).union(Flags::PARITY);
    /// Every flag an 8-bit ALU operation writes.
    pub const ALU: Flags = Flags::SZP.union(Flags::AUX_CARRY).union(Flags::CARRY);

    /// Unpack a PSW flag byte (POP PSW), forcing the fixed bits.
    #[inline]
    pub fn from_psw(value: u8) -> Self {
        Flags::from_bits_truncate(value) | Flags::ALWAYS_ONE
    }

    /// Pack into the PSW flag byte (PUSH PSW).
    #[inline]
    pub fn to_psw(self) -> u8 {
        (self | Flags::ALWAYS_ONE).bits()
    }

    /// Sign, zero and parity of `result`.
    #[inline]
    pub fn szp(result: u8) -> Self {
        let mut f = Flags::empty();
        f.set(Flags::SIGN, result & 0x80 != 0);
        f.set(Flags::ZERO, result == 0);
        f.set(Flags::PARITY, parity(result));
        f
    }

    /// Replace the flags selected by `mask` with the same flags of `values`.
    ///
    /// Bits outside `mask` are left alone; the fixed bits are forced.
    #[inline]
    pub fn merge(&mut self, mask: Flags, values: Flags) {
        *self = (*self - mask) | (values & mask) | Flags::ALWAYS_ONE;
    }

    /// Recompute the result-derived flags (S, Z, P) in `mask` from `result`.
    ///
    /// Carry and auxiliary carry depend on the operands rather than the
    /// result, so they are ignored here even when present in `mask`; the
    /// arithmetic helpers compute them and use [`Flags::merge`].
    #[inline]
    pub fn update(&mut self, result: u8, mask: Flags) {
        self.merge(mask & Flags::SZP, Flags::szp(result));
    }

    /// Evaluate a condition code against the current flags.
    #[inline]
    pub fn test(self, cond: Condition) -> bool {
        match cond {
            Condition::NotZero => !self.contains(Flags::ZERO),
            Condition::Zero => self.contains(Flags::ZERO),
            Condition::NoCarry => !self.contains(Flags::CARRY),
            Condition::Carry => self.contains(Flags::CARRY),
            Condition::ParityOdd => !self.contains(Flags::PARITY),
            Condition::ParityEven => self.contains(Flags::PARITY),
            Condition::Plus => !self.contains(Flags::SIGN),
            Condition::Minus => self.contains(Flags::SIGN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parity, Condition, Flags};

    #[test]
    fn psw_round_trip_forces_fixed_bits() {
        assert_eq!(Flags::from_psw(0x00).to_psw(), 0x02);
        assert_eq!(Flags::from_psw(0xff).to_psw(), 0xd7);
        assert_eq!(Flags::default().to_psw(), 0x02);
    }

    #[test]
    fn update_leaves_unmasked_bits_alone() {
        let mut f = Flags::CARRY | Flags::AUX_CARRY | Flags::ALWAYS_ONE;
        f.update(0x00, Flags::ZERO);
        assert!(f.contains(Flags::ZERO));
        assert!(f.contains(Flags::CARRY));
        assert!(f.contains(Flags::AUX_CARRY));
        assert!(!f.contains(Flags::PARITY));

        // Carry in the mask does not let `update` invent a carry value.
        f.update(0x81, Flags::SZP | Flags::CARRY);
        assert!(f.contains(Flags::SIGN));
        assert!(!f.contains(Flags::ZERO));
        assert!(f.contains(Flags::PARITY));
        assert!(f.contains(Flags::CARRY));
    }

    #[test]
    fn merge_only_touches_mask() {
        let mut f = Flags::SIGN | Flags::ALWAYS_ONE;
        f.merge(Flags::CARRY | Flags::SIGN, Flags::CARRY);
        assert_eq!(f, Flags::CARRY | Flags::ALWAYS_ONE);
    }

    #[test]
    fn parity_matches_popcount() {
        for v in 0..=255u8 {
            assert_eq!(parity(v), v.count_ones() % 2 == 0, "value {v:#04x}");
        }
    }

    #[test]
    fn conditions_follow_opcode_order() {
        let f = Flags::ZERO | Flags::PARITY | Flags::ALWAYS_ONE;
        let expected = [false, true, true, false, false, true, true, false];
        for (i, want) in expected.iter().enumerate() {
            let cond = Condition::from_opcode((i as u8) << 3);
            assert_eq!(f.test(cond), *want, "{}", cond.mnemonic());
        }
    }
}
