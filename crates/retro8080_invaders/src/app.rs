use crate::driver::{Driver, HostClock};
use crate::machine::SpaceInvadersMachine;
use crate::sound::SoundTriggers;
use crate::{SCREEN_HEIGHT, SCREEN_SCALE, SCREEN_WIDTH};
use retro8080_common::app::App;
use retro8080_common::color::Color;
use retro8080_common::key::Key;

/// Window-facing application wrapper for the Space Invaders machine.
///
/// Implements the shared `App` trait so that the SDL2 frontend
/// (`retro8080_sdl2`) can drive the machine. Each `update` runs whatever
/// scanlines the wall clock owes and redraws the screen.
pub struct SpaceInvadersApp {
    should_exit: bool,
    paused: bool,
    pub driver: Driver<HostClock>,
    sound: SoundTriggers,
}

impl SpaceInvadersApp {
    pub fn new(machine: SpaceInvadersMachine) -> Self {
        Self {
            should_exit: false,
            paused: false,
            driver: Driver::new(machine, HostClock::default()),
            sound: SoundTriggers::default(),
        }
    }

    pub fn machine_mut(&mut self) -> &mut SpaceInvadersMachine {
        self.driver.machine_mut()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        if self.paused && !paused {
            // Time spent paused is not owed to the machine.
            self.driver.resync();
        }
        self.paused = paused;
        log::debug!("Paused: {paused}");
    }
}

impl Default for SpaceInvadersApp {
    fn default() -> Self {
        Self::new(SpaceInvadersMachine::default())
    }
}

impl App for SpaceInvadersApp {
    fn init(&mut self) {
        log::info!("Space Invaders init");
        self.driver.resync();
    }

    fn update(&mut self, screen_state: &mut [u8]) {
        if !self.paused {
            if !self.driver.task() {
                self.should_exit = true;
            }
            let (out3, out5) = self.driver.machine().outputs();
            self.sound.update(out3, out5);
        }

        render_video(self.driver.machine().video_ram(), screen_state);

        if self.paused {
            overlay_pause_banner(screen_state);
        }
    }

    fn handle_key_event(&mut self, key: Key, is_pressed: bool) {
        if is_pressed {
            match key {
                Key::Escape => {
                    self.driver.shutdown();
                    self.should_exit = true;
                    return;
                }
                Key::P => {
                    self.set_paused(!self.paused);
                    return;
                }
                // Any other key will unpause if the game is currently paused.
                _ if self.paused => self.set_paused(false),
                _ => {}
            }
        }

        self.driver.machine_mut().handle_key(key, is_pressed);
    }

    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn exit(&mut self) {
        self.driver.shutdown();
        log::info!("Space Invaders exit");
    }

    fn width(&self) -> u32 {
        SCREEN_WIDTH as u32
    }

    fn height(&self) -> u32 {
        SCREEN_HEIGHT as u32
    }

    fn scale(&self) -> u32 {
        SCREEN_SCALE
    }

    fn title(&self) -> String {
        "Retro8080 Space Invaders".to_string()
    }
}

/// Colour of the overlay strip covering screen row `y` (0 at the top).
fn overlay_color(y: usize) -> Color {
    // Rows are counted from the bottom in video RAM.
    let iy = SCREEN_HEIGHT - 1 - y;
    if iy > 200 && iy < 220 {
        Color::RED
    } else if iy < 80 {
        Color::GREEN
    } else {
        Color::WHITE
    }
}

/// Rotate the 1bpp frame buffer into an upright RGB24 image.
///
/// Video RAM holds 224 columns of 32 bytes; within a column the first byte
/// is the bottom of the screen and bit 0 is the lowest pixel of each byte.
pub fn render_video(vram: &[u8], screen_state: &mut [u8]) {
    let width = SCREEN_WIDTH;
    let height = SCREEN_HEIGHT;
    debug_assert_eq!(vram.len(), width * height / 8);
    debug_assert_eq!(screen_state.len(), width * height * 3);

    for (i, &byte) in vram.iter().enumerate() {
        let x = i / (height / 8);
        let base = (i % (height / 8)) * 8;
        for b in 0..8 {
            let y = height - 1 - (base + b);
            let color = if byte & (1 << b) != 0 {
                overlay_color(y)
            } else {
                Color::BLACK
            };
            color.write_rgb24(screen_state, y * width + x);
        }
    }
}

/// Striped band at the top of the screen while paused.
fn overlay_pause_banner(screen_state: &mut [u8]) {
    let width = SCREEN_WIDTH;
    let banner_height = 12usize.min(SCREEN_HEIGHT);

    for y in 0..banner_height {
        let color = if y % 2 == 0 {
            Color::WHITE
        } else {
            Color::BLACK
        };
        for x in 0..width {
            color.write_rgb24(screen_state, y * width + x);
        }
    }
}
