//! Half-step waveform, direction and timing laws.
//!
//! These are pure functions; [`StepperDriver`](super::StepperDriver) owns the
//! state they operate on.

/// Number of phases in the coil energization cycle.
pub const PHASE_COUNT: u8 = 4;

/// Pattern energized at phase 0, as (A1, B1, A2, B2) from MSB to LSB.
const BASE_PATTERN: u8 = 0b1100;

const MICROS_PER_MINUTE: u64 = 60_000_000;

/// Direction of motor rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise (walks the phase cycle backwards).
    Clockwise,
    /// Counter-clockwise (walks the phase cycle forwards).
    CounterClockwise,
}

impl Direction {
    /// The opposite direction.
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    #[inline]
    fn increments(self) -> bool {
        matches!(self, Direction::CounterClockwise)
    }
}

/// 4-bit coil pattern for `phase`: `0b1100` rotated right by `phase` within
/// the low nibble.
#[inline]
pub fn waveform_pattern(phase: u8) -> u8 {
    let shift = phase % PHASE_COUNT;
    ((BASE_PATTERN >> shift) | (BASE_PATTERN << (PHASE_COUNT - shift))) & 0b1111
}

/// Coil levels for `phase` in line order (A1, B1, A2, B2).
#[inline]
pub fn coil_levels(phase: u8) -> [bool; 4] {
    let pattern = waveform_pattern(phase);
    core::array::from_fn(|i| pattern & (0b1000 >> i) != 0)
}

/// Move a counter in `0..modulus` by one unit in `direction`, wrapping at
/// both ends.
///
/// `modulus` must be non-zero.
#[inline]
pub fn modded_step(value: u64, direction: Direction, modulus: u64) -> u64 {
    if direction.increments() {
        (value + 1) % modulus
    } else if value == 0 {
        modulus - 1
    } else {
        value - 1
    }
}

/// Delay between steps in microseconds for `rpm` on a motor with
/// `steps_in_rotation` steps per rotation.
///
/// With `s` steps per rotation and `x` µs per step the shaft turns
/// `1 / (s * x)` rotations per µs, i.e. `60e6 / (s * x)` RPM, so
/// `x = 60e6 / (rpm * s)`. Returns `None` for `rpm == 0`, which halts the
/// motor.
#[inline]
pub fn step_delay_us(rpm: u64, steps_in_rotation: u64) -> Option<u64> {
    if rpm == 0 {
        return None;
    }
    Some(MICROS_PER_MINUTE / rpm.saturating_mul(steps_in_rotation).max(1))
}

/// Whole steps covered by `angle_degrees`, truncated toward zero.
///
/// Returns the step magnitude and whether the requested direction must be
/// reversed (negative angle).
#[inline]
pub fn steps_for_angle(angle_degrees: f64, steps_in_rotation: u64) -> (u64, bool) {
    let steps = (angle_degrees * steps_in_rotation as f64) as i64 / 360;
    (steps.unsigned_abs(), steps < 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_follow_half_step_cycle() {
        assert_eq!(waveform_pattern(0), 0b1100);
        assert_eq!(waveform_pattern(1), 0b0110);
        assert_eq!(waveform_pattern(2), 0b0011);
        assert_eq!(waveform_pattern(3), 0b1001);
    }

    #[test]
    fn test_coil_levels_line_order() {
        assert_eq!(coil_levels(0), [true, true, false, false]);
        assert_eq!(coil_levels(1), [false, true, true, false]);
        assert_eq!(coil_levels(2), [false, false, true, true]);
        assert_eq!(coil_levels(3), [true, false, false, true]);
    }

    #[test]
    fn test_modded_step_wraps() {
        assert_eq!(modded_step(3, Direction::CounterClockwise, 4), 0);
        assert_eq!(modded_step(0, Direction::Clockwise, 4), 3);
        assert_eq!(modded_step(5, Direction::Clockwise, 200), 4);
        assert_eq!(modded_step(199, Direction::CounterClockwise, 200), 0);
    }

    #[test]
    fn test_step_delay() {
        // 60 RPM on 200 steps: one rotation per second, 5 ms per step
        assert_eq!(step_delay_us(60, 200), Some(5_000));
        assert_eq!(step_delay_us(23, 603), Some(4_326));
        assert_eq!(step_delay_us(0, 200), None);
        assert_eq!(step_delay_us(u64::MAX, 200), Some(0));
    }

    #[test]
    fn test_steps_for_angle() {
        assert_eq!(steps_for_angle(65.0, 603), (108, false));
        assert_eq!(steps_for_angle(-65.0, 603), (108, true));
        assert_eq!(steps_for_angle(90.0, 200), (50, false));
        assert_eq!(steps_for_angle(1.0, 200), (0, false));
        assert_eq!(steps_for_angle(-1.0, 200), (0, false));
    }

    #[test]
    fn test_reversed() {
        assert_eq!(Direction::Clockwise.reversed(), Direction::CounterClockwise);
        assert_eq!(Direction::CounterClockwise.reversed(), Direction::Clockwise);
    }
}
