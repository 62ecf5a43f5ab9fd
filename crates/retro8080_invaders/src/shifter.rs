/// The external 16-bit barrel shifter (OUT 2, OUT 4, IN 3).
///
/// Each OUT 4 pushes a byte into the high half while the previous high byte
/// drops to the low half. IN 3 returns the 8-bit window that starts
/// `amount` bits below the top of the register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Shifter {
    data: u16,
    amount: u8,
}

impl Shifter {
    /// OUT 2: only the low three bits are wired.
    pub fn set_amount(&mut self, value: u8) {
        self.amount = value & 0x07;
    }

    /// OUT 4.
    pub fn push(&mut self, value: u8) {
        self.data = (self.data >> 8) | (u16::from(value) << 8);
    }

    /// IN 3.
    pub fn read(&self) -> u8 {
        (self.data >> (8 - self.amount)) as u8
    }

    pub fn amount(&self) -> u8 {
        self.amount
    }

    pub fn data(&self) -> u16 {
        self.data
    }
}
