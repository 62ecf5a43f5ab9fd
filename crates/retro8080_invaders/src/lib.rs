pub mod app;
pub mod bus;
pub mod dip;
pub mod driver;
pub mod input;
pub mod machine;
pub mod shifter;
pub mod sound;
pub mod timing;

pub use app::SpaceInvadersApp;
pub use bus::{VRAM_SIZE, VRAM_START};
pub use dip::DipConfig;
pub use driver::{Clock, Driver, HostClock, ManualClock};
pub use input::{Control, InputDevice, InputEvent};
pub use machine::{RomError, SpaceInvadersMachine};
pub use timing::{ConfigError, InterruptTrigger, TimingConfig};

/// Logical screen width in pixels (Space Invaders is 224x256, rotated).
pub const SCREEN_WIDTH: usize = 224;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 256;
/// Default integer scaling factor for the SDL2 frontend.
pub const SCREEN_SCALE: u32 = 3;
