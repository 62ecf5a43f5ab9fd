use retro8080_common::key::Key;
use retro8080_cpu::Cpu8080;
use thiserror::Error;

use crate::bus::{InvadersBus, ROM_SIZE};
use crate::dip::DipConfig;
use crate::input::{Control, InputDevice, InputEvent};
use crate::timing::{ConfigError, ScanlineClock, TimingConfig};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RomError {
    #[error("ROM image is empty")]
    Empty,
    #[error("ROM image of {0} bytes does not fit the 8 KiB ROM window")]
    TooLarge(usize),
}

/// High-level representation of the Space Invaders machine state.
///
/// Holds the Intel 8080 CPU core and the bus state (memory, IO, video), and
/// keeps the CPU in step with the video beam one scanline at a time.
pub struct SpaceInvadersMachine {
    cpu: Cpu8080,
    bus: InvadersBus,
    timing: TimingConfig,
    dip_config: DipConfig,
    scanline_clock: ScanlineClock,
    scanline: u32,
    frame_count: u64,
}

impl Default for SpaceInvadersMachine {
    fn default() -> Self {
        Self::from_valid_config(TimingConfig::default(), DipConfig::default())
    }
}

impl SpaceInvadersMachine {
    /// Construct a machine in reset state. Invalid timing or DIP settings
    /// are rejected.
    pub fn new(timing: TimingConfig, dip_config: DipConfig) -> Result<Self, ConfigError> {
        timing.validate()?;
        dip_config.validate()?;
        log::debug!("Space Invaders timing: {timing:?}, DIP: {dip_config:?}");
        Ok(Self::from_valid_config(timing, dip_config))
    }

    fn from_valid_config(timing: TimingConfig, dip_config: DipConfig) -> Self {
        let mut bus = InvadersBus::default();
        bus.dip_bits = dip_config.port2_bits();
        Self {
            cpu: Cpu8080::new(),
            bus,
            scanline_clock: ScanlineClock::new(&timing),
            timing,
            dip_config,
            scanline: 0,
            frame_count: 0,
        }
    }

    /// Reset CPU, I/O latches and beam position. ROM and RAM are kept.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.bus.reset_io();
        self.bus.dip_bits = self.dip_config.port2_bits();
        self.scanline_clock.reset();
        self.scanline = 0;
        self.frame_count = 0;
    }

    /// Load a combined ROM image at 0x0000 and reset the machine.
    ///
    /// Images shorter than 8 KiB are accepted; the missing part reads as
    /// 0xFF.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), RomError> {
        if rom.is_empty() {
            return Err(RomError::Empty);
        }
        if rom.len() > ROM_SIZE {
            return Err(RomError::TooLarge(rom.len()));
        }
        if rom.len() < ROM_SIZE {
            log::warn!(
                "ROM image is {} bytes, expected {ROM_SIZE}; the rest reads as 0xFF",
                rom.len()
            );
        }
        self.bus.load_rom(rom);
        self.reset();
        log::info!("Loaded {} byte Space Invaders ROM", rom.len());
        Ok(())
    }

    /// Run the CPU for one scanline, then raise the interrupts triggered by
    /// that scanline.
    pub fn run_scanline(&mut self) {
        let cycles = self.scanline_clock.next_scanline();
        // `TimingConfig::validate` bounds cycles per scanline below i32::MAX.
        let cycles = i32::try_from(cycles).unwrap_or(i32::MAX);
        self.cpu.exec(&mut self.bus, cycles);

        let line = self.scanline;
        for trigger in &self.timing.triggers {
            if trigger.scanline == line {
                self.cpu.interrupt(&mut self.bus, trigger.vector);
            }
        }

        self.scanline += 1;
        if self.scanline == self.timing.scanlines_per_frame {
            self.scanline = 0;
            self.frame_count += 1;
        }
    }

    /// Run scanlines until the current frame is complete.
    pub fn step_frame(&mut self) {
        let remaining = self.timing.scanlines_per_frame - self.scanline;
        for _ in 0..remaining {
            self.run_scanline();
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        log::debug!(
            "{:?} {:?} {}",
            event.device,
            event.control,
            if event.pressed { "pressed" } else { "released" }
        );
        self.bus.inputs.apply(event.control, event.pressed);
    }

    /// Handle a logical key event mapped from the frontend.
    ///
    /// See [`Control::from_key`] for the layout; unmapped keys are ignored.
    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        if let Some(control) = Control::from_key(key) {
            self.handle_input(InputEvent::new(InputDevice::Keyboard, control, pressed));
        }
    }

    /// Expose the raw video RAM window used by the renderer.
    ///
    /// 0x1c00 bytes starting at 0x2400; each byte is 8 vertical pixels of a
    /// column, bottom pixel in bit 0.
    pub fn video_ram(&self) -> &[u8] {
        self.bus.video_ram()
    }

    /// Expose the current values of the sound output ports (OUT 3 and OUT 5).
    pub fn outputs(&self) -> (u8, u8) {
        self.bus.outputs()
    }

    pub fn cpu(&self) -> &Cpu8080 {
        &self.cpu
    }

    pub fn bus(&self) -> &InvadersBus {
        &self.bus
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn dip_config(&self) -> DipConfig {
        self.dip_config
    }

    /// Scanline the beam will draw next.
    pub fn scanline(&self) -> u32 {
        self.scanline
    }

    /// Frames completed since reset.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests;
