//! Builder pattern for StepperDriver.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::MotorConfig;
use crate::delay::ThreadSleep;
use crate::error::{ArgumentError, Error, Result, StateError};
use crate::signal::Line;

use super::driver::StepperDriver;

/// Builder for creating StepperDriver instances.
///
/// All five lines and the step count are required. Initial RPM defaults to 0
/// (halted) and max safe RPM to unbounded.
pub struct DriverBuilder<EN, C, D = ThreadSleep>
where
    EN: OutputPin,
    C: OutputPin,
    D: DelayNs,
{
    enable: Option<EN>,
    coil_a1: Option<C>,
    coil_b1: Option<C>,
    coil_a2: Option<C>,
    coil_b2: Option<C>,
    delay: D,
    steps_in_rotation: u64,
    initial_rpm: u64,
    max_safe_rpm: u64,
}

impl<EN, C> Default for DriverBuilder<EN, C, ThreadSleep>
where
    EN: OutputPin,
    C: OutputPin,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<EN, C> DriverBuilder<EN, C, ThreadSleep>
where
    EN: OutputPin,
    C: OutputPin,
{
    /// Create a new builder that sleeps the driving thread between steps.
    pub fn new() -> Self {
        Self {
            enable: None,
            coil_a1: None,
            coil_b1: None,
            coil_a2: None,
            coil_b2: None,
            delay: ThreadSleep,
            steps_in_rotation: 0,
            initial_rpm: 0,
            max_safe_rpm: u64::MAX,
        }
    }
}

impl<EN, C, D> DriverBuilder<EN, C, D>
where
    EN: OutputPin,
    C: OutputPin,
    D: DelayNs,
{
    /// Set the enable line.
    pub fn set_enable_terminal(mut self, pin: EN) -> Self {
        self.enable = Some(pin);
        self
    }

    /// Set the first terminal of coil A.
    pub fn set_coil_a_terminal_1(mut self, pin: C) -> Self {
        self.coil_a1 = Some(pin);
        self
    }

    /// Set the first terminal of coil B.
    pub fn set_coil_b_terminal_1(mut self, pin: C) -> Self {
        self.coil_b1 = Some(pin);
        self
    }

    /// Set the second terminal of coil A.
    pub fn set_coil_a_terminal_2(mut self, pin: C) -> Self {
        self.coil_a2 = Some(pin);
        self
    }

    /// Set the second terminal of coil B.
    pub fn set_coil_b_terminal_2(mut self, pin: C) -> Self {
        self.coil_b2 = Some(pin);
        self
    }

    /// Set half-steps per full rotation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `steps` is zero.
    pub fn set_rotation_step_count(mut self, steps: u64) -> Result<Self> {
        if steps == 0 {
            log_warn!("rejected zero steps in rotation");
            return Err(ArgumentError::ZeroStepCount.into());
        }
        self.steps_in_rotation = steps;
        Ok(self)
    }

    /// Set the RPM the driver starts with.
    pub fn set_initial_rpm(mut self, rpm: u64) -> Self {
        self.initial_rpm = rpm;
        self
    }

    /// Set the exclusive upper bound for runtime RPM changes.
    pub fn set_max_safe_rpm(mut self, rpm: u64) -> Self {
        self.max_safe_rpm = rpm;
        self
    }

    /// Replace the delay provider used between steps.
    pub fn delay<D2: DelayNs>(self, delay: D2) -> DriverBuilder<EN, C, D2> {
        DriverBuilder {
            enable: self.enable,
            coil_a1: self.coil_a1,
            coil_b1: self.coil_b1,
            coil_a2: self.coil_a2,
            coil_b2: self.coil_b2,
            delay,
            steps_in_rotation: self.steps_in_rotation,
            initial_rpm: self.initial_rpm,
            max_safe_rpm: self.max_safe_rpm,
        }
    }

    /// Configure step count and speed limits from a MotorConfig.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the config has zero steps per
    /// rotation.
    pub fn from_config(self, config: &MotorConfig) -> Result<Self> {
        let builder = self
            .set_rotation_step_count(config.steps_per_rotation)?
            .set_initial_rpm(config.initial_rpm);
        Ok(match config.max_safe_rpm {
            Some(max) => builder.set_max_safe_rpm(max),
            None => builder,
        })
    }

    /// Build the StepperDriver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalState`] if a line or the step count is missing,
    /// or if the initial RPM exceeds the max safe RPM.
    pub fn build(self) -> Result<StepperDriver<EN, C, D>> {
        let enable = self.enable.ok_or_else(|| missing(Line::Enable))?;
        let coil_a1 = self.coil_a1.ok_or_else(|| missing(Line::CoilA1))?;
        let coil_b1 = self.coil_b1.ok_or_else(|| missing(Line::CoilB1))?;
        let coil_a2 = self.coil_a2.ok_or_else(|| missing(Line::CoilA2))?;
        let coil_b2 = self.coil_b2.ok_or_else(|| missing(Line::CoilB2))?;

        if self.steps_in_rotation == 0 {
            log_warn!("build failed: steps in rotation not set");
            return Err(StateError::MissingStepCount.into());
        }

        if self.initial_rpm > self.max_safe_rpm {
            log_warn!(
                "build failed: initial rpm {} > max safe rpm {}",
                self.initial_rpm,
                self.max_safe_rpm
            );
            return Err(StateError::InitialRpmExceedsMax {
                initial: self.initial_rpm,
                max: self.max_safe_rpm,
            }
            .into());
        }

        log_info!(
            "built driver: {} steps/rotation, {} rpm",
            self.steps_in_rotation,
            self.initial_rpm
        );

        Ok(StepperDriver::new(
            enable,
            [coil_a1, coil_b1, coil_a2, coil_b2],
            self.delay,
            self.steps_in_rotation,
            self.initial_rpm,
            self.max_safe_rpm,
        ))
    }
}

fn missing(line: Line) -> Error {
    log_warn!("build failed: {:?} not set", line);
    StateError::MissingLine(line).into()
}
