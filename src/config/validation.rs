//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{MotorConfig, SystemConfig};

/// Validate a system configuration.
///
/// Checks, for every motor:
/// - steps per rotation is > 0
/// - initial RPM does not exceed max safe RPM
/// - no pin number is assigned to two lines
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (name, motor) in config.motors.iter() {
        validate_motor(name, motor)?;
    }
    Ok(())
}

fn validate_motor(name: &heapless::String<32>, config: &MotorConfig) -> Result<()> {
    if config.steps_per_rotation == 0 {
        return Err(Error::Config(ConfigError::ZeroStepCount(name.clone())));
    }

    if let Some(max) = config.max_safe_rpm {
        if config.initial_rpm > max {
            return Err(Error::Config(ConfigError::InitialRpmExceedsMax {
                motor: name.clone(),
                initial: config.initial_rpm,
                max,
            }));
        }
    }

    if let Some(pin) = config.pins.as_ref().and_then(|p| p.duplicate()) {
        return Err(Error::Config(ConfigError::DuplicatePin {
            motor: name.clone(),
            pin,
        }));
    }

    Ok(())
}
