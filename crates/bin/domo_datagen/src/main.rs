//! # domo-datagen
//!
//! Offline generator for the `sensor-data.json` time series consumed by
//! the domod simulation driver. Run it once before starting the server:
//!
//! ```text
//! cargo run -p domo-datagen
//! ```
//!
//! The output path and duration are env-tunable (`DOMO_SENSOR_DATA`,
//! `DOMO_SENSOR_HOURS`). The server never requires the file to exist; an
//! absent series just leaves the simulation idle.

use std::f64::consts::PI;

use anyhow::Context;
use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use rand::Rng;
use serde::Serialize;

/// File envelope, matching what the driver reads back.
#[derive(Serialize)]
struct Dataset {
    metadata: Metadata,
    #[serde(rename = "temperatureReadings")]
    temperature_readings: Vec<Reading>,
}

#[derive(Serialize)]
struct Metadata {
    generated_at: String,
    duration_hours: u32,
    total_readings: usize,
    devices: usize,
    description: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Reading {
    timestamp: String,
    device_id: String,
    name: String,
    current_temp: f64,
    target_temp: f64,
    humidity: i64,
}

/// Per-thermostat generation parameters.
struct Profile {
    device_id: &'static str,
    name: &'static str,
    base_temp: f64,
    target_temp: f64,
}

fn main() -> anyhow::Result<()> {
    let hours: u32 = std::env::var("DOMO_SENSOR_HOURS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(24);
    let path =
        std::env::var("DOMO_SENSOR_DATA").unwrap_or_else(|_| "sensor-data.json".to_string());

    let mut profiles = vec![
        Profile {
            device_id: "living-room/thermostat/wall-01",
            name: "Living Room Thermostat",
            base_temp: 22.0,
            target_temp: 22.0,
        },
        Profile {
            device_id: "bedroom/thermostat/wall-01",
            name: "Bedroom Thermostat",
            base_temp: 20.0,
            target_temp: 20.0,
        },
    ];

    let start = start_of_today();
    let mut rng = rand::rng();
    let mut readings = Vec::new();

    for minute in 0..i64::from(hours) * 60 {
        let at = start + Duration::minutes(minute);
        let hour_of_day = f64::from(at.hour()) + f64::from(at.minute()) / 60.0;

        for profile in &mut profiles {
            // cooler at night, warmest in the early evening
            let daily_cycle = ((hour_of_day - 6.0) * PI / 12.0).sin() * 1.2;
            let noise = rng.random_range(-0.3..=0.3);
            let mut current = profile.base_temp + daily_cycle + noise;

            // HVAC pulls the room toward the set-point
            let diff = profile.target_temp - current;
            if diff.abs() > 0.5 {
                current += diff * 0.02;
            }

            // occasional user adjustment of the set-point
            if rng.random_range(0.0..1.0) < 0.001 {
                profile.target_temp = profile.base_temp + rng.random_range(-2.0..=2.0);
            }

            readings.push(Reading {
                timestamp: at.to_rfc3339(),
                device_id: profile.device_id.to_string(),
                name: profile.name.to_string(),
                current_temp: round1(current),
                target_temp: round1(profile.target_temp),
                humidity: 45 + rng.random_range(-10..=10),
            });
        }
    }

    let dataset = Dataset {
        metadata: Metadata {
            generated_at: Utc::now().to_rfc3339(),
            duration_hours: hours,
            total_readings: readings.len(),
            devices: profiles.len(),
            description: "Temperature readings for the living room and bedroom thermostats"
                .to_string(),
        },
        temperature_readings: readings,
    };

    let json = serde_json::to_string_pretty(&dataset).context("serializing dataset")?;
    std::fs::write(&path, json).with_context(|| format!("writing {path}"))?;
    println!(
        "wrote {} readings to {path}",
        dataset.temperature_readings.len()
    );
    Ok(())
}

fn start_of_today() -> DateTime<Utc> {
    Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_round_to_one_decimal() {
        assert!((round1(21.04) - 21.0).abs() < 1e-9);
        assert!((round1(21.06) - 21.1).abs() < 1e-9);
    }

    #[test]
    fn should_start_at_midnight_utc() {
        let start = start_of_today();
        assert_eq!(start.hour(), 0);
        assert_eq!(start.minute(), 0);
    }
}
