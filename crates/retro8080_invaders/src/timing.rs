use thiserror::Error;
use typed_builder::TypedBuilder;

/// 8080 clock on the Taito board.
pub const CPU_CLOCK_HZ: u64 = 2_000_000;
pub const FRAME_RATE_HZ: u32 = 60;
pub const SCANLINES_PER_FRAME: u32 = 262;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CPU clock must be non-zero")]
    ZeroClock,
    #[error("frame rate must be non-zero")]
    ZeroFrameRate,
    #[error("scanlines per frame must be non-zero")]
    ZeroScanlines,
    #[error("scanline cap per tick must be non-zero")]
    ZeroScanlineCap,
    #[error("CPU clock of {0} Hz is too fast for the scanline rate")]
    ClockTooFast(u64),
    #[error("interrupt trigger at scanline {scanline} is outside a {scanlines}-line frame")]
    TriggerOutOfRange { scanline: u32, scanlines: u32 },
    #[error("interrupt vector {0} is not an RST number (0-7)")]
    InvalidVector(u8),
    #[error("ships per credit must be 3-6, got {0}")]
    ShipsPerCredit(u8),
}

/// Raise `RST vector` once the CPU has run through `scanline`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterruptTrigger {
    pub scanline: u32,
    pub vector: u8,
}

impl InterruptTrigger {
    pub const fn new(scanline: u32, vector: u8) -> Self {
        Self { scanline, vector }
    }
}

/// The two video interrupts: RST 1 at mid-screen, RST 2 at the start of
/// vertical blank.
pub fn default_triggers() -> Vec<InterruptTrigger> {
    vec![InterruptTrigger::new(96, 1), InterruptTrigger::new(224, 2)]
}

#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct TimingConfig {
    #[builder(default = CPU_CLOCK_HZ)]
    pub cpu_clock_hz: u64,
    #[builder(default = FRAME_RATE_HZ)]
    pub frame_rate_hz: u32,
    #[builder(default = SCANLINES_PER_FRAME)]
    pub scanlines_per_frame: u32,
    #[builder(default = default_triggers())]
    pub triggers: Vec<InterruptTrigger>,
    /// Most scanlines one host tick may run; one frame when unset.
    #[builder(default, setter(strip_option))]
    pub max_scanlines_per_tick: Option<u32>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TimingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cpu_clock_hz == 0 {
            return Err(ConfigError::ZeroClock);
        }
        if self.frame_rate_hz == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        if self.scanlines_per_frame == 0 {
            return Err(ConfigError::ZeroScanlines);
        }
        if self.max_scanlines_per_tick == Some(0) {
            return Err(ConfigError::ZeroScanlineCap);
        }
        // The longest scanline is one cycle over the average, and the
        // scanline remainder stays below the rate.
        let rate = self.scanline_rate();
        if self.cpu_clock_hz / rate >= i32::MAX as u64
            || self.cpu_clock_hz.checked_add(rate).is_none()
        {
            return Err(ConfigError::ClockTooFast(self.cpu_clock_hz));
        }
        for trigger in &self.triggers {
            if trigger.scanline >= self.scanlines_per_frame {
                return Err(ConfigError::TriggerOutOfRange {
                    scanline: trigger.scanline,
                    scanlines: self.scanlines_per_frame,
                });
            }
            if trigger.vector > 7 {
                return Err(ConfigError::InvalidVector(trigger.vector));
            }
        }
        Ok(())
    }

    /// Scanlines per second.
    pub fn scanline_rate(&self) -> u64 {
        u64::from(self.frame_rate_hz) * u64::from(self.scanlines_per_frame)
    }

    pub fn scanline_cap(&self) -> u32 {
        self.max_scanlines_per_tick.unwrap_or(self.scanlines_per_frame)
    }
}

/// Hands out per-scanline cycle budgets whose running sum tracks
/// `clock * n / rate` exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanlineClock {
    clock_hz: u64,
    rate: u64,
    remainder: u64,
}

impl ScanlineClock {
    pub fn new(config: &TimingConfig) -> Self {
        Self {
            clock_hz: config.cpu_clock_hz,
            rate: config.scanline_rate(),
            remainder: 0,
        }
    }

    /// Cycles owed for the next scanline.
    pub fn next_scanline(&mut self) -> u64 {
        let total = self.remainder + self.clock_hz;
        self.remainder = total % self.rate;
        total / self.rate
    }

    pub fn reset(&mut self) {
        self.remainder = 0;
    }
}
