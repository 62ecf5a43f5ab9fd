//! Discrete sound triggers.
//!
//! The board drives its analog sound circuits from two output latches. This
//! module only turns latch changes into start/stop events; playing them is
//! up to the host.

use std::collections::HashSet;

/// Logical sound identifiers for the discrete audio outputs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SoundType {
    Ufo,
    Fire,
    PlayerDies,
    InvaderDies,
    Invader1,
    Invader2,
    Invader3,
    Invader4,
    UfoHit,
}

/// Which output port and bit drive a sound.
#[derive(Clone, Copy, Debug)]
pub struct SoundInfo {
    pub sound_type: SoundType,
    pub port: u8,
    pub bit: u8,
}

impl SoundInfo {
    const fn new(sound_type: SoundType, port: u8, bit: u8) -> Self {
        Self {
            sound_type,
            port,
            bit,
        }
    }
}

pub const ALL_SOUNDS: &[SoundInfo] = &[
    // Port 3; the UFO sound repeats while its bit is held.
    SoundInfo::new(SoundType::Ufo, 3, 0),
    SoundInfo::new(SoundType::Fire, 3, 1),
    SoundInfo::new(SoundType::PlayerDies, 3, 2),
    SoundInfo::new(SoundType::InvaderDies, 3, 3),
    // Port 5: fleet movement and UFO hit.
    SoundInfo::new(SoundType::Invader1, 5, 0),
    SoundInfo::new(SoundType::Invader2, 5, 1),
    SoundInfo::new(SoundType::Invader3, 5, 2),
    SoundInfo::new(SoundType::Invader4, 5, 3),
    SoundInfo::new(SoundType::UfoHit, 5, 4),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SoundEvent {
    pub sound_type: SoundType,
    pub on: bool,
}

/// Watches the sound latches and reports bits that toggled.
#[derive(Default, Debug)]
pub struct SoundTriggers {
    active: HashSet<SoundType>,
}

impl SoundTriggers {
    /// Compare OUT 3 / OUT 5 against the previous call. A held bit produces
    /// a single `on` event, never one per frame.
    pub fn update(&mut self, out3: u8, out5: u8) -> Vec<SoundEvent> {
        let mut events = Vec::new();
        for info in ALL_SOUNDS {
            let value = match info.port {
                3 => out3,
                5 => out5,
                _ => 0,
            };

            let sound_type = info.sound_type;
            let on = value & (1 << info.bit) != 0;
            let was_playing = if on {
                !self.active.insert(sound_type)
            } else {
                self.active.remove(&sound_type)
            };

            if on ^ was_playing {
                log::debug!("Sound {sound_type:?} {}", if on { "on" } else { "off" });
                events.push(SoundEvent { sound_type, on });
            }
        }
        events
    }

    pub fn is_active(&self, sound_type: SoundType) -> bool {
        self.active.contains(&sound_type)
    }

    pub fn reset(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{SoundEvent, SoundTriggers, SoundType};

    #[test]
    fn reports_only_edges() {
        let mut triggers = SoundTriggers::default();
        assert!(triggers.update(0, 0).is_empty());

        assert_eq!(
            triggers.update(0x02, 0x00),
            vec![SoundEvent {
                sound_type: SoundType::Fire,
                on: true
            }]
        );
        // Held: nothing new.
        assert!(triggers.update(0x02, 0x00).is_empty());
        assert!(triggers.is_active(SoundType::Fire));

        let events = triggers.update(0x00, 0x11);
        assert_eq!(
            events,
            vec![
                SoundEvent {
                    sound_type: SoundType::Fire,
                    on: false
                },
                SoundEvent {
                    sound_type: SoundType::Invader1,
                    on: true
                },
                SoundEvent {
                    sound_type: SoundType::UfoHit,
                    on: true
                },
            ]
        );
    }

    #[test]
    fn unused_bits_are_ignored() {
        let mut triggers = SoundTriggers::default();
        // Port 3 bit 5 is the amplifier enable, port 5 bit 5 the screen flip.
        assert!(triggers.update(0x20, 0x20).is_empty());
    }
}
