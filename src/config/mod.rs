//! Configuration module for halfstep.
//!
//! Motor parameters and pin assignments, loaded from TOML files (with the
//! `config-file` feature) or built in code.

mod motor;
mod system;
mod validation;
#[cfg(feature = "config-file")]
mod loader;

pub use motor::{MotorConfig, PinAssignment};
pub use system::SystemConfig;
pub use validation::validate_config;

#[cfg(feature = "config-file")]
pub use loader::{load_config, parse_config};
