//! Half-step stepper driver.
//!
//! Generic over embedded-hal 1.0 pin types and delay provider. Every method
//! takes `&self`: one thread runs [`step`](StepperDriver::step),
//! [`rotate_by`](StepperDriver::rotate_by) or [`drive`](StepperDriver::drive)
//! while others call [`interrupt`](StepperDriver::interrupt) or
//! [`set_rpm`](StepperDriver::set_rpm).

use core::sync::atomic::{AtomicU64, Ordering};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use parking_lot::{Mutex, RwLock};

use crate::delay::ThreadSleep;
use crate::signal::{write_line, Line};

use super::waveform::{self, Direction, PHASE_COUNT};

/// Why a driving operation stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopReason {
    /// [`StepperDriver::interrupt`] was called.
    Interrupted,
    /// RPM was zero at a step boundary.
    Halted,
    /// Writing a coil line failed; the step was not counted.
    LineFault(Line),
}

/// Coil lines plus the state only the driving thread touches.
struct CoilBank<C, D> {
    /// Coil lines in pattern order (A1, B1, A2, B2).
    pins: [C; 4],

    /// Suspends the driving thread between steps.
    delay: D,

    /// Phase written on the next step, `0..PHASE_COUNT`.
    waveform_step: u8,
}

/// Bipolar stepper driven through four coil lines and an enable line.
///
/// Generic over:
/// - `EN`: enable line (must implement `OutputPin`)
/// - `C`: coil lines (must implement `OutputPin`)
/// - `D`: delay provider (must implement `DelayNs`), [`ThreadSleep`] by default
///
/// Built with [`DriverBuilder`](super::DriverBuilder). Dropping the driver
/// writes `false` to all five lines.
pub struct StepperDriver<EN, C, D = ThreadSleep>
where
    EN: OutputPin,
    C: OutputPin,
    D: DelayNs,
{
    /// Enable line, shared with `interrupt()` for emergency stops.
    enable: Mutex<EN>,

    /// Held for the whole duration of a driving operation.
    coils: Mutex<CoilBank<C, D>>,

    steps_in_rotation: u64,

    /// Exclusive upper bound for `rpm`.
    max_safe_rpm: u64,

    rpm: AtomicU64,

    interrupted: RwLock<bool>,

    /// Position within one rotation, `0..steps_in_rotation`.
    rotation_step: AtomicU64,
}

impl<EN, C, D> StepperDriver<EN, C, D>
where
    EN: OutputPin,
    C: OutputPin,
    D: DelayNs,
{
    pub(crate) fn new(
        enable: EN,
        coils: [C; 4],
        delay: D,
        steps_in_rotation: u64,
        initial_rpm: u64,
        max_safe_rpm: u64,
    ) -> Self {
        Self {
            enable: Mutex::new(enable),
            coils: Mutex::new(CoilBank {
                pins: coils,
                delay,
                waveform_step: 0,
            }),
            steps_in_rotation,
            max_safe_rpm,
            rpm: AtomicU64::new(initial_rpm),
            interrupted: RwLock::new(false),
            rotation_step: AtomicU64::new(0),
        }
    }

    /// Drive `steps` half-steps in `direction`, blocking the calling thread.
    ///
    /// Returns `true` if every step was taken, `false` if the move was
    /// interrupted, halted by a zero RPM or stopped by a coil write failure.
    /// The enable line is raised before the first step and lowered afterwards
    /// in every case.
    pub fn step(&self, steps: u64, direction: Direction) -> bool {
        log_debug!("stepping {} steps {:?}", steps, direction);
        let result = self.with_motor_enabled(|bank| {
            (0..steps).try_for_each(|_| self.single_step(bank, direction))
        });
        match result {
            Ok(()) => true,
            Err(reason) => {
                log_debug!("step stopped early: {:?}", reason);
                false
            }
        }
    }

    /// Rotate by `angle_degrees` in `direction`, blocking the calling thread.
    ///
    /// The angle is converted to whole steps, truncated toward zero. A
    /// negative angle rotates the opposite way. Returns the same completion
    /// flag as [`step`](Self::step).
    pub fn rotate_by(&self, angle_degrees: f64, direction: Direction) -> bool {
        let (steps, reverse) = waveform::steps_for_angle(angle_degrees, self.steps_in_rotation);
        let direction = if reverse { direction.reversed() } else { direction };
        self.step(steps, direction)
    }

    /// Step in `direction` until interrupted, halted or faulted.
    ///
    /// Blocks the calling thread and reports why it stopped.
    pub fn drive(&self, direction: Direction) -> StopReason {
        log_debug!("driving {:?}", direction);
        let reason = self.with_motor_enabled(|bank| loop {
            if let Err(reason) = self.single_step(bank, direction) {
                break reason;
            }
        });
        log_debug!("drive stopped: {:?}", reason);
        reason
    }

    /// Stop the current operation and de-energize the motor.
    ///
    /// The enable line is lowered before this returns. The driving thread
    /// notices the request at its next step boundary.
    pub fn interrupt(&self) {
        let mut interrupted = self.interrupted.write();
        self.set_enabled(false);
        *interrupted = true;
        log_info!("interrupt requested");
    }

    /// Whether the last operation has been interrupted.
    pub fn is_interrupted(&self) -> bool {
        *self.interrupted.read()
    }

    /// Change the speed, effective from the next step.
    ///
    /// Returns `false` and leaves the speed unchanged if `rpm` is not below
    /// [`max_safe_rpm`](Self::max_safe_rpm). Zero halts any running
    /// operation at its next step.
    pub fn set_rpm(&self, rpm: u64) -> bool {
        if rpm >= self.max_safe_rpm {
            log_warn!("rejected rpm {} (max safe {})", rpm, self.max_safe_rpm);
            return false;
        }
        self.rpm.store(rpm, Ordering::Release);
        true
    }

    /// Current speed in rotations per minute.
    #[inline]
    pub fn rpm(&self) -> u64 {
        self.rpm.load(Ordering::Acquire)
    }

    /// Exclusive upper bound for the speed.
    #[inline]
    pub fn max_safe_rpm(&self) -> u64 {
        self.max_safe_rpm
    }

    /// Half-steps per full rotation.
    #[inline]
    pub fn steps_in_rotation(&self) -> u64 {
        self.steps_in_rotation
    }

    /// Position within one rotation, in steps from the start position.
    #[inline]
    pub fn position_steps(&self) -> u64 {
        self.rotation_step.load(Ordering::Acquire)
    }

    /// Position within one rotation, in `[0, 360)` degrees.
    #[inline]
    pub fn position_in_degrees(&self) -> f64 {
        (self.position_steps() as f64 * 360.0) / self.steps_in_rotation as f64
    }

    /// Run `f` with the coils locked and the motor enabled, clearing any
    /// previous interrupt first.
    fn with_motor_enabled<R>(&self, f: impl FnOnce(&mut CoilBank<C, D>) -> R) -> R {
        let mut bank = self.coils.lock();
        *self.interrupted.write() = false;
        self.set_enabled(true);
        let result = f(&mut *bank);
        self.set_enabled(false);
        result
    }

    /// One physical step: interrupt check, speed check and delay, coil
    /// writes, counter advance.
    fn single_step(&self, bank: &mut CoilBank<C, D>, direction: Direction) -> Result<(), StopReason> {
        if self.is_interrupted() {
            return Err(StopReason::Interrupted);
        }

        let delay_us = waveform::step_delay_us(self.rpm(), self.steps_in_rotation)
            .ok_or(StopReason::Halted)?;
        bank.delay.delay_us(u32::try_from(delay_us).unwrap_or(u32::MAX));

        let levels = waveform::coil_levels(bank.waveform_step);
        for ((pin, line), level) in bank.pins.iter_mut().zip(Line::COILS).zip(levels) {
            if write_line(pin, level).is_err() {
                log_warn!("failed to write {:?}", line);
                return Err(StopReason::LineFault(line));
            }
        }
        log_trace!("wrote phase {}", bank.waveform_step);

        bank.waveform_step =
            waveform::modded_step(u64::from(bank.waveform_step), direction, u64::from(PHASE_COUNT)) as u8;
        let next = waveform::modded_step(self.position_steps(), direction, self.steps_in_rotation);
        self.rotation_step.store(next, Ordering::Release);
        Ok(())
    }

    fn set_enabled(&self, enabled: bool) {
        if write_line(&mut *self.enable.lock(), enabled).is_err() {
            log_warn!("failed to write {:?}", Line::Enable);
        }
    }
}

impl<EN, C, D> Drop for StepperDriver<EN, C, D>
where
    EN: OutputPin,
    C: OutputPin,
    D: DelayNs,
{
    fn drop(&mut self) {
        if write_line(self.enable.get_mut(), false).is_err() {
            log_warn!("failed to write {:?} on shutdown", Line::Enable);
        }
        for (pin, line) in self.coils.get_mut().pins.iter_mut().zip(Line::COILS) {
            if write_line(pin, false).is_err() {
                log_warn!("failed to write {:?} on shutdown", line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SignalRecorder;

    /// Delay that returns immediately.
    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    /// Coil line whose writes always fail.
    struct BrokenPin;

    #[derive(Debug)]
    struct BrokenPinError;

    impl embedded_hal::digital::Error for BrokenPinError {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl embedded_hal::digital::ErrorType for BrokenPin {
        type Error = BrokenPinError;
    }

    impl OutputPin for BrokenPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Err(BrokenPinError)
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            Err(BrokenPinError)
        }
    }

    fn recorded_driver(
        steps: u64,
        rpm: u64,
    ) -> (StepperDriver<SignalRecorder, SignalRecorder, NoDelay>, SignalRecorder, [SignalRecorder; 4]) {
        let en = SignalRecorder::new();
        let coils: [SignalRecorder; 4] = Default::default();
        let driver = StepperDriver::new(en.clone(), coils.clone(), NoDelay, steps, rpm, u64::MAX);
        (driver, en, coils)
    }

    #[test]
    fn test_position_wraps_backwards() {
        let (driver, _en, _coils) = recorded_driver(200, 60);
        assert!(driver.step(1, Direction::Clockwise));
        assert_eq!(driver.position_steps(), 199);
        assert!((driver.position_in_degrees() - 358.2).abs() < 1e-9);
    }

    #[test]
    fn test_waveform_phase_persists_between_calls() {
        let (driver, _en, coils) = recorded_driver(200, 60);
        assert!(driver.step(1, Direction::CounterClockwise));
        assert!(driver.step(1, Direction::CounterClockwise));
        // second call continues at phase 1 instead of restarting at phase 0
        assert_eq!(coils[0].values(), vec![true, false]);
        assert_eq!(coils[2].values(), vec![false, true]);
    }

    #[test]
    fn test_step_clears_previous_interrupt() {
        let (driver, en, _coils) = recorded_driver(200, 60);
        driver.interrupt();
        assert!(driver.is_interrupted());
        assert!(driver.step(3, Direction::CounterClockwise));
        assert!(!driver.is_interrupted());
        assert_eq!(en.values(), vec![false, true, false]);
    }

    #[test]
    fn test_drive_reports_halt() {
        let (driver, en, coils) = recorded_driver(200, 0);
        assert_eq!(driver.drive(Direction::Clockwise), StopReason::Halted);
        assert_eq!(en.values(), vec![true, false]);
        assert!(coils.iter().all(SignalRecorder::is_empty));
    }

    #[test]
    fn test_coil_fault_stops_without_advancing() {
        let en = SignalRecorder::new();
        let driver = StepperDriver::new(
            en.clone(),
            [BrokenPin, BrokenPin, BrokenPin, BrokenPin],
            NoDelay,
            200,
            60,
            u64::MAX,
        );

        assert!(!driver.step(10, Direction::CounterClockwise));
        assert_eq!(driver.drive(Direction::CounterClockwise), StopReason::LineFault(Line::CoilA1));
        assert_eq!(driver.position_steps(), 0);
        assert_eq!(en.values(), vec![true, false, true, false]);
    }

    #[test]
    fn test_set_rpm_bound_is_exclusive() {
        let en = SignalRecorder::new();
        let coils: [SignalRecorder; 4] = Default::default();
        let driver = StepperDriver::new(en, coils, NoDelay, 200, 10, 100);

        assert!(!driver.set_rpm(100));
        assert_eq!(driver.rpm(), 10);
        assert!(driver.set_rpm(99));
        assert_eq!(driver.rpm(), 99);
        assert!(driver.set_rpm(0));
        assert_eq!(driver.rpm(), 0);
    }

    #[test]
    fn test_drop_lowers_all_lines() {
        let (driver, en, coils) = recorded_driver(200, 60);
        assert!(driver.step(1, Direction::CounterClockwise));
        drop(driver);

        assert_eq!(en.last(), Some(false));
        for coil in &coils {
            assert_eq!(coil.last(), Some(false));
        }
        // phase 0 leaves A1 high until shutdown
        assert_eq!(coils[0].values(), vec![true, false]);
    }

    #[test]
    fn test_driver_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<StepperDriver<SignalRecorder, SignalRecorder>>();
    }
}
