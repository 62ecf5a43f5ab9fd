pub mod cpm;
pub mod cpu;
pub mod disasm;
pub mod flags;
pub mod regs;

pub use cpu::Cpu8080;
pub use flags::Flags;
pub use regs::{RegPair, Registers};

/// Simple bus interface for an Intel 8080-compatible CPU core.
///
/// The CPU uses this trait to access memory and IO ports without knowing
/// anything about the concrete machine. Every memory and port access of an
/// instruction goes through here, so a machine sees the exact access order
/// the program performs. Memory reads are expected to be free of side
/// effects; trace logging reads ahead of the program counter.
pub trait Bus8080 {
    fn mem_read(&mut self, addr: u16) -> u8;
    fn mem_write(&mut self, addr: u16, value: u8);

    fn io_read(&mut self, port: u8) -> u8;
    fn io_write(&mut self, port: u8, value: u8);
}

