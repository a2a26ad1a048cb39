//! # halfstep
//!
//! Half-step driver for bipolar stepper motors wired through four coil lines
//! and an enable line, with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **embedded-hal 1.0**: Uses `OutputPin` for the five lines, `DelayNs` for timing
//! - **Half-step waveform**: Fixed 4-phase coil pattern, direction-aware position tracking
//! - **RPM control**: Speed changes take effect at the next step, from any thread
//! - **Cooperative interrupts**: Stop a running drive from another thread
//! - **Safe teardown**: Dropping the driver de-energizes every line
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use halfstep::{Direction, DriverBuilder};
//!
//! let driver = DriverBuilder::new()
//!     .set_enable_terminal(en)
//!     .set_coil_a_terminal_1(a1)
//!     .set_coil_b_terminal_1(b1)
//!     .set_coil_a_terminal_2(a2)
//!     .set_coil_b_terminal_2(b2)
//!     .set_rotation_step_count(200)?
//!     .set_max_safe_rpm(200)
//!     .set_initial_rpm(60)
//!     .build()?;
//!
//! std::thread::scope(|s| {
//!     s.spawn(|| driver.drive(Direction::CounterClockwise));
//!     std::thread::sleep(std::time::Duration::from_secs(1));
//!     driver.interrupt();
//! });
//! ```
//!
//! ## Feature Flags
//!
//! - `config-file` (default): Enables file I/O and TOML parsing
//! - `defmt`: Routes logging through defmt instead of `log`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Config errors carry fixed-capacity message buffers
#![allow(clippy::result_large_err)]

#[macro_use]
mod logging;

// Core modules
pub mod config;
pub mod delay;
pub mod error;
pub mod motor;
pub mod signal;

// Re-exports for ergonomic API
pub use config::{validate_config, MotorConfig, PinAssignment, SystemConfig};
pub use delay::ThreadSleep;
pub use error::{Error, Result};
pub use motor::{Direction, DriverBuilder, StepperDriver, StopReason};
pub use signal::{Line, SignalRecorder};

// Configuration loading
#[cfg(feature = "config-file")]
pub use config::{load_config, parse_config};
