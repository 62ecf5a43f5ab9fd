use retro8080_common::key::Key;

// Input port 1 (IN 1).
const IN1_BIT_COIN: u8 = 0;
const IN1_BIT_P2_START: u8 = 1;
const IN1_BIT_P1_START: u8 = 2;
const IN1_BIT_ALWAYS_ONE: u8 = 3;
const IN1_BIT_P1_SHOOT: u8 = 4;
const IN1_BIT_P1_LEFT: u8 = 5;
const IN1_BIT_P1_RIGHT: u8 = 6;

// Input port 2 (IN 2); the remaining bits are DIP switches.
const IN2_BIT_TILT: u8 = 2;
const IN2_BIT_P2_SHOOT: u8 = 4;
const IN2_BIT_P2_LEFT: u8 = 5;
const IN2_BIT_P2_RIGHT: u8 = 6;

/// Where an input event came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputDevice {
    Keyboard,
    Joystick,
}

/// A cabinet control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    Coin,
    P1Start,
    P2Start,
    P1Left,
    P1Right,
    P1Fire,
    P2Left,
    P2Right,
    P2Fire,
    Tilt,
}

impl Control {
    /// Default keyboard layout.
    ///
    /// - `C` coin, `Num1`/`Num2` one/two player start
    /// - `A`/`Left`, `D`/`Right`, `S`/`Space` player 1 move and fire
    /// - `J`, `L`, `K` player 2 move and fire
    /// - `T` tilt
    pub fn from_key(key: Key) -> Option<Control> {
        let control = match key {
            Key::C => Control::Coin,
            Key::Num1 => Control::P1Start,
            Key::Num2 => Control::P2Start,
            Key::A | Key::Left => Control::P1Left,
            Key::D | Key::Right => Control::P1Right,
            Key::S | Key::Space => Control::P1Fire,
            Key::J => Control::P2Left,
            Key::L => Control::P2Right,
            Key::K => Control::P2Fire,
            Key::T => Control::Tilt,
            _ => return None,
        };
        Some(control)
    }
}

/// A control changing state on some input device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub device: InputDevice,
    pub control: Control,
    pub pressed: bool,
}

impl InputEvent {
    pub fn new(device: InputDevice, control: Control, pressed: bool) -> Self {
        Self {
            device,
            control,
            pressed,
        }
    }
}

/// Control bits of input ports 1 and 2 (active high).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputPorts {
    port1: u8,
    port2: u8,
}

impl Default for InputPorts {
    fn default() -> Self {
        Self {
            port1: 1 << IN1_BIT_ALWAYS_ONE,
            port2: 0,
        }
    }
}

impl InputPorts {
    /// Apply a control change. Tilt latches on press and only clears on
    /// reset.
    pub fn apply(&mut self, control: Control, pressed: bool) {
        match control {
            Control::Coin => set_input_bit(&mut self.port1, IN1_BIT_COIN, pressed),
            Control::P1Start => set_input_bit(&mut self.port1, IN1_BIT_P1_START, pressed),
            Control::P2Start => set_input_bit(&mut self.port1, IN1_BIT_P2_START, pressed),
            Control::P1Left => set_input_bit(&mut self.port1, IN1_BIT_P1_LEFT, pressed),
            Control::P1Right => set_input_bit(&mut self.port1, IN1_BIT_P1_RIGHT, pressed),
            Control::P1Fire => set_input_bit(&mut self.port1, IN1_BIT_P1_SHOOT, pressed),
            Control::P2Left => set_input_bit(&mut self.port2, IN2_BIT_P2_LEFT, pressed),
            Control::P2Right => set_input_bit(&mut self.port2, IN2_BIT_P2_RIGHT, pressed),
            Control::P2Fire => set_input_bit(&mut self.port2, IN2_BIT_P2_SHOOT, pressed),
            Control::Tilt => {
                if pressed {
                    set_input_bit(&mut self.port2, IN2_BIT_TILT, true);
                }
            }
        }
    }

    pub fn port1(&self) -> u8 {
        self.port1
    }

    /// Control bits of port 2, without the DIP switches.
    pub fn port2(&self) -> u8 {
        self.port2
    }
}

fn set_input_bit(port: &mut u8, bit: u8, pressed: bool) {
    let mask = 1 << bit;
    if pressed {
        *port |= mask;
    } else {
        *port &= !mask;
    }
}

#[cfg(test)]
mod tests {
    use super::{Control, InputPorts};
    use crate::dip::DIP_MASK;
    use retro8080_common::key::Key;

    #[test]
    fn port1_bit3_is_always_set() {
        let mut ports = InputPorts::default();
        assert_eq!(ports.port1(), 0x08);
        ports.apply(Control::Coin, true);
        ports.apply(Control::Coin, false);
        assert_eq!(ports.port1(), 0x08);
    }

    #[test]
    fn controls_set_documented_bits() {
        let cases = [
            (Control::Coin, 0x01, 0x00),
            (Control::P2Start, 0x02, 0x00),
            (Control::P1Start, 0x04, 0x00),
            (Control::P1Fire, 0x10, 0x00),
            (Control::P1Left, 0x20, 0x00),
            (Control::P1Right, 0x40, 0x00),
            (Control::P2Fire, 0x00, 0x10),
            (Control::P2Left, 0x00, 0x20),
            (Control::P2Right, 0x00, 0x40),
        ];
        for (control, port1, port2) in cases {
            let mut ports = InputPorts::default();
            ports.apply(control, true);
            assert_eq!(ports.port1(), 0x08 | port1, "{control:?}");
            assert_eq!(ports.port2(), port2, "{control:?}");
            ports.apply(control, false);
            assert_eq!(ports, InputPorts::default(), "{control:?}");
        }
    }

    #[test]
    fn tilt_is_latched() {
        let mut ports = InputPorts::default();
        ports.apply(Control::Tilt, false);
        assert_eq!(ports.port2(), 0x00);
        ports.apply(Control::Tilt, true);
        ports.apply(Control::Tilt, false);
        assert_eq!(ports.port2(), 0x04);
    }

    #[test]
    fn control_bits_stay_clear_of_dip_switches() {
        let mut ports = InputPorts::default();
        for control in [
            Control::P2Left,
            Control::P2Right,
            Control::P2Fire,
            Control::Tilt,
        ] {
            ports.apply(control, true);
        }
        assert_eq!(ports.port2() & DIP_MASK, 0);
    }

    #[test]
    fn keyboard_layout() {
        assert_eq!(Control::from_key(Key::C), Some(Control::Coin));
        assert_eq!(Control::from_key(Key::Space), Some(Control::P1Fire));
        assert_eq!(Control::from_key(Key::Left), Some(Control::P1Left));
        assert_eq!(Control::from_key(Key::L), Some(Control::P2Right));
        assert_eq!(Control::from_key(Key::P), None);
        assert_eq!(Control::from_key(Key::None), None);
    }
}
