use crate::timing::ConfigError;

const SHIPS_MASK: u8 = 0x03;
const EXTRA_LIFE_BIT: u8 = 3;
const COIN_INFO_BIT: u8 = 7;

/// Bits of input port 2 that hold DIP switches rather than controls.
pub const DIP_MASK: u8 = SHIPS_MASK | (1 << EXTRA_LIFE_BIT) | (1 << COIN_INFO_BIT);

/// Cabinet DIP switches, as read by the game through IN 2.
///
/// - `ships_per_credit`: 3-6, encoded in bits 0-1 as `ships - 3`.
/// - `extra_life_at_1000`: bonus ship at 1000 points instead of 1500
///   (bit 3 set selects 1000).
/// - `show_coin_info`: the ROM hides the coin line in attract mode when
///   bit 7 is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DipConfig {
    pub ships_per_credit: u8,
    pub extra_life_at_1000: bool,
    pub show_coin_info: bool,
}

impl Default for DipConfig {
    fn default() -> Self {
        Self {
            ships_per_credit: 3,
            extra_life_at_1000: false,
            show_coin_info: true,
        }
    }
}

impl DipConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(3..=6).contains(&self.ships_per_credit) {
            return Err(ConfigError::ShipsPerCredit(self.ships_per_credit));
        }
        Ok(())
    }

    /// The DIP bits of port 2; every bit outside [`DIP_MASK`] is zero.
    pub fn port2_bits(&self) -> u8 {
        let mut bits = self.ships_per_credit.clamp(3, 6) - 3;
        if self.extra_life_at_1000 {
            bits |= 1 << EXTRA_LIFE_BIT;
        }
        if !self.show_coin_info {
            bits |= 1 << COIN_INFO_BIT;
        }
        bits
    }
}

#[cfg(test)]
mod tests {
    use super::{DipConfig, DIP_MASK};
    use crate::timing::ConfigError;

    #[test]
    fn default_is_three_ships_and_coin_info() {
        assert_eq!(DipConfig::default().port2_bits(), 0x00);
    }

    #[test]
    fn encodes_every_switch() {
        let dip = DipConfig {
            ships_per_credit: 6,
            extra_life_at_1000: true,
            show_coin_info: false,
        };
        assert_eq!(dip.port2_bits(), 0x8b);
        assert_eq!(dip.port2_bits() & !DIP_MASK, 0);

        let dip = DipConfig {
            ships_per_credit: 4,
            ..DipConfig::default()
        };
        assert_eq!(dip.port2_bits(), 0x01);
    }

    #[test]
    fn rejects_ship_count_out_of_range() {
        for ships in [0, 2, 7] {
            let dip = DipConfig {
                ships_per_credit: ships,
                ..DipConfig::default()
            };
            assert!(matches!(dip.validate(), Err(ConfigError::ShipsPerCredit(s)) if s == ships));
        }
        assert!(DipConfig::default().validate().is_ok());
    }
}
