//! Memory map and I/O ports of the Taito 8080 board.
//!
//! Only A0-A13 are decoded, so the 16 KiB map repeats through the whole
//! 64 KiB address space:
//!
//! | range         | contents                  |
//! |---------------|---------------------------|
//! | 0x0000-0x1FFF | ROM (writes are dropped)  |
//! | 0x2000-0x23FF | work RAM                  |
//! | 0x2400-0x3FFF | video RAM, 1bpp, rotated  |

use retro8080_cpu::Bus8080;

use crate::input::InputPorts;
use crate::shifter::Shifter;

pub const ADDRESS_MASK: u16 = 0x3fff;
pub const ROM_SIZE: usize = 0x2000;
pub const RAM_START: usize = 0x2000;
const RAM_SIZE: usize = 0x2000;
/// Start of the frame buffer.
pub const VRAM_START: usize = 0x2400;
/// 0x1c00 bytes = 224 columns of 256 pixels.
pub const VRAM_SIZE: usize = 0x1c00;

/// Value returned by IN 0; bits 1-3 are tied high on the board.
const IN0_VALUE: u8 = 0x0e;
/// Value floating on the data bus for unmapped reads.
const OPEN_BUS: u8 = 0xff;

pub struct InvadersBus {
    rom: Box<[u8; ROM_SIZE]>,
    rom_len: usize,
    ram: Box<[u8; RAM_SIZE]>,
    pub(crate) inputs: InputPorts,
    pub(crate) dip_bits: u8,
    shifter: Shifter,
    out_port3: u8,
    out_port5: u8,
    watchdog_count: u64,
}

impl Default for InvadersBus {
    fn default() -> Self {
        Self {
            rom: Box::new([0; ROM_SIZE]),
            rom_len: 0,
            ram: Box::new([0; RAM_SIZE]),
            inputs: InputPorts::default(),
            dip_bits: 0,
            shifter: Shifter::default(),
            out_port3: 0,
            out_port5: 0,
            watchdog_count: 0,
        }
    }
}

impl InvadersBus {
    /// Copy `image` into ROM. Callers check the size.
    pub(crate) fn load_rom(&mut self, image: &[u8]) {
        let len = image.len().min(ROM_SIZE);
        self.rom.fill(0);
        self.rom[..len].copy_from_slice(&image[..len]);
        self.rom_len = len;
    }

    /// Clear the I/O latches. ROM, RAM and the DIP switches are kept.
    pub(crate) fn reset_io(&mut self) {
        self.inputs = InputPorts::default();
        self.shifter = Shifter::default();
        self.out_port3 = 0;
        self.out_port5 = 0;
        self.watchdog_count = 0;
    }

    pub fn video_ram(&self) -> &[u8] {
        let start = VRAM_START - RAM_START;
        &self.ram[start..start + VRAM_SIZE]
    }

    /// Last values written to the sound latches (OUT 3, OUT 5).
    pub fn outputs(&self) -> (u8, u8) {
        (self.out_port3, self.out_port5)
    }

    pub fn shifter(&self) -> &Shifter {
        &self.shifter
    }

    /// Number of watchdog kicks (OUT 6) since reset.
    pub fn watchdog_count(&self) -> u64 {
        self.watchdog_count
    }

    fn port2(&self) -> u8 {
        self.dip_bits | self.inputs.port2()
    }
}

impl Bus8080 for InvadersBus {
    fn mem_read(&mut self, addr: u16) -> u8 {
        let addr = (addr & ADDRESS_MASK) as usize;
        if addr < RAM_START {
            if addr < self.rom_len {
                self.rom[addr]
            } else {
                OPEN_BUS
            }
        } else {
            self.ram[addr - RAM_START]
        }
    }

    fn mem_write(&mut self, addr: u16, value: u8) {
        let masked = (addr & ADDRESS_MASK) as usize;
        if masked < RAM_START {
            log::trace!("Dropped write of {value:02X} to ROM at {addr:04X}");
            return;
        }
        self.ram[masked - RAM_START] = value;
    }

    fn io_read(&mut self, port: u8) -> u8 {
        match port {
            0 => IN0_VALUE,
            1 => self.inputs.port1(),
            2 => self.port2(),
            3 => self.shifter.read(),
            _ => OPEN_BUS,
        }
    }

    fn io_write(&mut self, port: u8, value: u8) {
        match port {
            2 => self.shifter.set_amount(value),
            3 => self.out_port3 = value,
            4 => self.shifter.push(value),
            5 => self.out_port5 = value,
            6 => {
                self.watchdog_count += 1;
                log::trace!("Watchdog reset ({value:02X})");
            }
            _ => log::trace!("Ignored OUT {port:02X},{value:02X}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InvadersBus, VRAM_SIZE};
    use crate::input::Control;
    use retro8080_cpu::Bus8080;

    fn bus_with_rom(image: &[u8]) -> InvadersBus {
        let mut bus = InvadersBus::default();
        bus.load_rom(image);
        bus
    }

    #[test]
    fn rom_is_read_only() {
        let mut bus = bus_with_rom(&[0x31, 0x00, 0x24]);
        bus.mem_write(0x0000, 0xaa);
        assert_eq!(bus.mem_read(0x0000), 0x31);
        // Past the loaded image.
        assert_eq!(bus.mem_read(0x0003), 0xff);
        assert_eq!(bus.mem_read(0x1fff), 0xff);
    }

    #[test]
    fn ram_mirrors_every_16k() {
        let mut bus = bus_with_rom(&[0x00]);
        bus.mem_write(0x2000, 0x12);
        bus.mem_write(0x7fff, 0x34);
        assert_eq!(bus.mem_read(0x6000), 0x12);
        assert_eq!(bus.mem_read(0xa000), 0x12);
        assert_eq!(bus.mem_read(0x3fff), 0x34);
        assert_eq!(bus.mem_read(0x4000), 0x00);
    }

    #[test]
    fn video_ram_window() {
        let mut bus = InvadersBus::default();
        bus.mem_write(0x2400, 0x01);
        bus.mem_write(0x3fff, 0x80);
        bus.mem_write(0x23ff, 0x55);
        let vram = bus.video_ram();
        assert_eq!(vram.len(), VRAM_SIZE);
        assert_eq!(vram[0], 0x01);
        assert_eq!(vram[VRAM_SIZE - 1], 0x80);
    }

    #[test]
    fn shifter_through_ports() {
        let mut bus = InvadersBus::default();
        bus.io_write(4, 0x80);
        bus.io_write(4, 0x01);
        bus.io_write(2, 4);
        assert_eq!(bus.io_read(3), 0x18);
    }

    #[test]
    fn input_ports() {
        let mut bus = InvadersBus::default();
        bus.dip_bits = 0x81;
        bus.inputs.apply(Control::P2Fire, true);
        bus.inputs.apply(Control::Coin, true);
        assert_eq!(bus.io_read(0), 0x0e);
        assert_eq!(bus.io_read(1), 0x09);
        assert_eq!(bus.io_read(2), 0x91);
        assert_eq!(bus.io_read(7), 0xff);
    }

    #[test]
    fn output_latches_and_reset() {
        let mut bus = bus_with_rom(&[0x00]);
        bus.mem_write(0x2100, 0x42);
        bus.io_write(3, 0x02);
        bus.io_write(5, 0x10);
        bus.io_write(6, 0x00);
        bus.io_write(6, 0x00);
        bus.io_write(4, 0xff);
        assert_eq!(bus.outputs(), (0x02, 0x10));
        assert_eq!(bus.watchdog_count(), 2);

        bus.reset_io();
        assert_eq!(bus.outputs(), (0, 0));
        assert_eq!(bus.watchdog_count(), 0);
        assert_eq!(bus.shifter().data(), 0);
        assert_eq!(bus.io_read(1), 0x08);
        // Memory survives.
        assert_eq!(bus.mem_read(0x0000), 0x00);
        assert_eq!(bus.mem_read(0x2100), 0x42);
    }
}
