//! Motor configuration from TOML.

use heapless::String;
use serde::Deserialize;

/// Complete motor configuration from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MotorConfig {
    /// Human-readable name (max 32 chars).
    #[serde(default = "default_name")]
    pub name: String<32>,

    /// Half-steps per full rotation (200 for a 1.8° motor).
    pub steps_per_rotation: u64,

    /// Speed the driver starts with; 0 leaves the motor halted.
    #[serde(default)]
    pub initial_rpm: u64,

    /// Exclusive upper bound for runtime speed changes. Unbounded if absent.
    #[serde(default)]
    pub max_safe_rpm: Option<u64>,

    /// Optional GPIO numbers for the five lines.
    #[serde(default)]
    pub pins: Option<PinAssignment>,
}

/// GPIO numbers (Broadcom numbering on a Raspberry Pi) for the driver lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PinAssignment {
    /// Enable line.
    pub enable: u8,
    /// Coil A, first terminal.
    pub coil_a1: u8,
    /// Coil A, second terminal.
    pub coil_a2: u8,
    /// Coil B, first terminal.
    pub coil_b1: u8,
    /// Coil B, second terminal.
    pub coil_b2: u8,
}

fn default_name() -> String<32> {
    String::try_from("motor").unwrap_or_default()
}

impl PinAssignment {
    /// Pin numbers in driver line order (enable, A1, B1, A2, B2).
    pub fn as_array(&self) -> [u8; 5] {
        [self.enable, self.coil_a1, self.coil_b1, self.coil_a2, self.coil_b2]
    }

    /// First pin number assigned to more than one line, if any.
    pub fn duplicate(&self) -> Option<u8> {
        let pins = self.as_array();
        (0..pins.len())
            .find(|&i| pins[i + 1..].contains(&pins[i]))
            .map(|i| pins[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_pin_detection() {
        let pins = PinAssignment {
            enable: 22,
            coil_a1: 17,
            coil_a2: 27,
            coil_b1: 23,
            coil_b2: 24,
        };
        assert_eq!(pins.duplicate(), None);
        assert_eq!(pins.as_array(), [22, 17, 23, 27, 24]);

        let clash = PinAssignment { coil_b2: 17, ..pins };
        assert_eq!(clash.duplicate(), Some(17));
    }
}
