//! Motor module for halfstep.
//!
//! Provides the half-step driver, its builder and the waveform laws it runs.

mod builder;
mod driver;
pub mod waveform;

pub use builder::DriverBuilder;
pub use driver::{StepperDriver, StopReason};
pub use waveform::Direction;
