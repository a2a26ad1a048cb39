//! Signal output lines.
//!
//! The driver writes booleans to five lines through embedded-hal 1.0
//! [`OutputPin`]. Any HAL pin works; pass `&mut pin` to keep ownership with
//! the caller. [`SignalRecorder`] is an in-memory line for tests and demos.

use core::convert::Infallible;
use core::fmt;
use std::sync::Arc;

use embedded_hal::digital::{ErrorType, OutputPin, PinState};
use parking_lot::Mutex;

/// Role of a signal line on the driver board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// Driver enable line.
    Enable,
    /// Coil A, first terminal.
    CoilA1,
    /// Coil B, first terminal.
    CoilB1,
    /// Coil A, second terminal.
    CoilA2,
    /// Coil B, second terminal.
    CoilB2,
}

impl Line {
    /// Coil lines in the order the waveform pattern is written, MSB first.
    pub const COILS: [Line; 4] = [Line::CoilA1, Line::CoilB1, Line::CoilA2, Line::CoilB2];
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Line::Enable => "enable terminal",
            Line::CoilA1 => "coil A terminal 1",
            Line::CoilB1 => "coil B terminal 1",
            Line::CoilA2 => "coil A terminal 2",
            Line::CoilB2 => "coil B terminal 2",
        };
        f.write_str(name)
    }
}

/// Drive `pin` to the logical level `value`.
#[inline]
pub fn write_line<P: OutputPin>(pin: &mut P, value: bool) -> Result<(), P::Error> {
    pin.set_state(PinState::from(value))
}

/// In-memory output line that records every value written to it.
///
/// Clones share the same record, so a test can hand one clone to the driver
/// and inspect another, even from a different thread.
#[derive(Debug, Clone, Default)]
pub struct SignalRecorder {
    values: Arc<Mutex<Vec<bool>>>,
}

impl SignalRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every value written so far, oldest first.
    pub fn values(&self) -> Vec<bool> {
        self.values.lock().clone()
    }

    /// Number of writes recorded.
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }

    /// Most recent value written, if any.
    pub fn last(&self) -> Option<bool> {
        self.values.lock().last().copied()
    }

    /// Forget all recorded writes.
    pub fn clear(&self) {
        self.values.lock().clear();
    }

    fn record(&self, value: bool) {
        self.values.lock().push(value);
    }
}

impl ErrorType for SignalRecorder {
    type Error = Infallible;
}

impl OutputPin for SignalRecorder {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.record(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.record(true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_record() {
        let recorder = SignalRecorder::new();
        let mut handle = recorder.clone();

        assert!(recorder.is_empty());
        write_line(&mut handle, true).unwrap();
        write_line(&mut handle, false).unwrap();

        assert_eq!(recorder.values(), vec![true, false]);
        assert_eq!(recorder.last(), Some(false));

        recorder.clear();
        assert_eq!(handle.len(), 0);
    }

    #[test]
    fn test_line_names() {
        assert_eq!(Line::Enable.to_string(), "enable terminal");
        assert_eq!(Line::COILS[1].to_string(), "coil B terminal 1");
    }
}
