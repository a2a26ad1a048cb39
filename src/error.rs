//! Error types for halfstep.
//!
//! Two failure kinds surface from driver construction: malformed values
//! (`InvalidArgument`, raised by setters) and inconsistent or incomplete
//! wiring (`IllegalState`, raised by `build`). Configuration parsing has its
//! own kind. Driving operations never return errors.

use core::fmt;

use crate::signal::Line;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all halfstep operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A configuration value was malformed
    InvalidArgument(ArgumentError),
    /// The builder was asked to build with missing or inconsistent settings
    IllegalState(StateError),
    /// Configuration parsing or validation error
    Config(ConfigError),
}

/// Malformed argument errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// Steps per rotation must be > 0
    ZeroStepCount,
}

/// Builder state errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A required signal line was never assigned
    MissingLine(Line),
    /// Steps per rotation was never set
    MissingStepCount,
    /// Initial RPM is above the max safe RPM
    InitialRpmExceedsMax {
        /// Requested initial RPM
        initial: u64,
        /// Configured max safe RPM
        max: u64,
    },
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Motor name not found in configuration
    MotorNotFound(heapless::String<32>),
    /// Motor declares zero steps per rotation
    ZeroStepCount(heapless::String<32>),
    /// Motor's initial RPM is above its max safe RPM
    InitialRpmExceedsMax {
        /// Motor name
        motor: heapless::String<32>,
        /// Configured initial RPM
        initial: u64,
        /// Configured max safe RPM
        max: u64,
    },
    /// The same pin number is assigned to two lines of one motor
    DuplicatePin {
        /// Motor name
        motor: heapless::String<32>,
        /// Offending pin number
        pin: u8,
    },
    /// File I/O error
    #[cfg(feature = "config-file")]
    IoError(heapless::String<128>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(e) => write!(f, "Invalid argument: {}", e),
            Error::IllegalState(e) => write!(f, "Illegal state: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentError::ZeroStepCount => write!(f, "steps in rotation must be > 0"),
        }
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::MissingLine(line) => {
                write!(f, "{} must be assigned before the driver can be built", line)
            }
            StateError::MissingStepCount => {
                write!(f, "steps in rotation must be set before the driver can be built")
            }
            StateError::InitialRpmExceedsMax { initial, max } => {
                write!(f, "initial RPM {} must be <= max safe RPM {}", initial, max)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::MotorNotFound(name) => write!(f, "Motor '{}' not found", name),
            ConfigError::ZeroStepCount(name) => {
                write!(f, "Motor '{}' must have steps_per_rotation > 0", name)
            }
            ConfigError::InitialRpmExceedsMax { motor, initial, max } => write!(
                f,
                "Motor '{}' initial_rpm {} exceeds max_safe_rpm {}",
                motor, initial, max
            ),
            ConfigError::DuplicatePin { motor, pin } => {
                write!(f, "Motor '{}' assigns pin {} to more than one line", motor, pin)
            }
            #[cfg(feature = "config-file")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

// Conversion impls
impl From<ArgumentError> for Error {
    fn from(e: ArgumentError) -> Self {
        Error::InvalidArgument(e)
    }
}

impl From<StateError> for Error {
    fn from(e: StateError) -> Self {
        Error::IllegalState(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl std::error::Error for Error {}

impl std::error::Error for ArgumentError {}

impl std::error::Error for StateError {}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_line_names_the_line() {
        let err = Error::from(StateError::MissingLine(Line::CoilB2));
        assert_eq!(
            err.to_string(),
            "Illegal state: coil B terminal 2 must be assigned before the driver can be built"
        );
    }

    #[test]
    fn test_rpm_bound_message() {
        let err = Error::from(StateError::InitialRpmExceedsMax { initial: 250, max: 200 });
        assert!(err.to_string().contains("250"));
        assert!(err.to_string().contains("200"));
    }
}
