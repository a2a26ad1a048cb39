//! Basic drive example.
//!
//! Builds a driver from TOML configuration, drives it on one thread and
//! stops it from another, like a Ctrl-C handler would.
//!
//! This example records line writes in memory instead of touching real GPIO.
//! On a Raspberry Pi, pass HAL output pins (for example `rppal` pins with its
//! `hal` feature) using the numbers from the `pins` table.

use std::thread;
use std::time::Duration;

use halfstep::{parse_config, Direction, DriverBuilder, SignalRecorder};

const CONFIG: &str = r#"
[motors.demo]
name = "demo_motor"
steps_per_rotation = 200
initial_rpm = 60
max_safe_rpm = 200

[motors.demo.pins]
enable = 22
coil_a1 = 17
coil_a2 = 27
coil_b1 = 23
coil_b2 = 24
"#;

fn main() {
    println!("=== Basic Drive Example ===\n");

    let config = parse_config(CONFIG).expect("Failed to load config");
    let motor = config.motor("demo").expect("Motor 'demo' missing");

    if let Some(pins) = motor.pins {
        println!(
            "Pins: EN={} A1={} B1={} A2={} B2={}",
            pins.enable, pins.coil_a1, pins.coil_b1, pins.coil_a2, pins.coil_b2
        );
    }

    let en = SignalRecorder::new();
    let coil_a1 = SignalRecorder::new();

    let driver = DriverBuilder::new()
        .set_enable_terminal(en.clone())
        .set_coil_a_terminal_1(coil_a1.clone())
        .set_coil_b_terminal_1(SignalRecorder::new())
        .set_coil_a_terminal_2(SignalRecorder::new())
        .set_coil_b_terminal_2(SignalRecorder::new())
        .from_config(motor)
        .and_then(|builder| builder.build())
        .expect("Failed to build driver");

    println!(
        "Motor '{}': {} steps/rotation at {} rpm (max safe {})",
        motor.name,
        driver.steps_in_rotation(),
        driver.rpm(),
        driver.max_safe_rpm()
    );

    println!("\n=== Quarter Turn ===");
    driver.rotate_by(90.0, Direction::CounterClockwise);
    println!("Position: {:.1} degrees", driver.position_in_degrees());

    println!("\n=== Continuous Drive ===");
    let reason = thread::scope(|s| {
        let handle = s.spawn(|| driver.drive(Direction::Clockwise));

        thread::sleep(Duration::from_millis(500));
        println!("Speeding up to 120 rpm");
        driver.set_rpm(120);

        thread::sleep(Duration::from_millis(500));
        println!("Now exiting...");
        driver.interrupt();

        handle.join().expect("Drive thread panicked")
    });

    println!("Drive stopped: {:?}", reason);
    println!("Position: {:.1} degrees", driver.position_in_degrees());
    println!("Coil A1 writes: {}", coil_a1.len());

    drop(driver);
    println!("Enable line after shutdown: {:?}", en.last());
}
