//! Background simulation driver — replays a canned temperature series.
//!
//! The driver reads the offline-generated sensor file once at startup,
//! then, on a fixed period, pushes the next batch of readings through
//! [`DeviceRegistry::apply_patch`] exactly as a client-issued update would.
//! Subscribers cannot tell simulated changes from real ones, and nothing
//! that happens inside a tick can take the process down.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;
use serde::Deserialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use domo_domain::device::CurrentTemp;
use domo_domain::error::DomoError;
use domo_domain::id::DeviceId;
use domo_domain::patch::DevicePatch;
use domo_domain::telemetry::TelemetryRecord;
use domo_domain::time::now;

use crate::registry::DeviceRegistry;
use crate::telemetry_log::TelemetryLog;

/// One record from the offline-generated sensor series.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureReading {
    /// When the reading was synthesized.
    pub timestamp: String,
    /// Raw device identifier; validated when the reading is applied.
    pub device_id: String,
    /// Display name carried in the file; informational only.
    pub name: String,
    /// Measured temperature in degrees Celsius.
    pub current_temp: f64,
    /// Set-point at synthesis time.
    pub target_temp: f64,
    /// Relative humidity percentage.
    pub humidity: i64,
}

/// File envelope; `metadata` is ignored on read.
#[derive(Debug, Deserialize)]
struct SensorDataset {
    #[serde(rename = "temperatureReadings")]
    temperature_readings: Vec<serde_json::Value>,
}

/// Cyclic sequence of reading frames.
///
/// A frame is the run of consecutive records sharing one timestamp — one
/// synthesized instant across all thermostats — and the driver consumes one
/// frame per tick, wrapping around when the sequence is exhausted.
#[derive(Debug, Clone, Default)]
pub struct ReadingFeed {
    frames: Vec<Vec<TemperatureReading>>,
}

impl ReadingFeed {
    /// A feed with no readings; the driver degrades to a no-op on it.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Group a flat reading sequence into frames by timestamp runs.
    #[must_use]
    pub fn from_readings(readings: Vec<TemperatureReading>) -> Self {
        let mut frames: Vec<Vec<TemperatureReading>> = Vec::new();
        for reading in readings {
            match frames.last_mut() {
                Some(frame)
                    if frame
                        .first()
                        .is_some_and(|first| first.timestamp == reading.timestamp) =>
                {
                    frame.push(reading);
                }
                _ => frames.push(vec![reading]),
            }
        }
        Self { frames }
    }

    /// Load the sensor series from disk.
    ///
    /// A missing or unreadable file degrades to an empty feed — startup
    /// never depends on it. Individual malformed readings are skipped; the
    /// rest of the file is kept.
    #[must_use]
    pub fn load_or_empty(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no sensor series found, simulation will idle");
                return Self::empty();
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to read sensor series, simulation will idle");
                return Self::empty();
            }
        };

        let dataset: SensorDataset = match serde_json::from_str(&content) {
            Ok(dataset) => dataset,
            Err(err) => {
                warn!(path = %path.display(), %err, "sensor series unreadable, simulation will idle");
                return Self::empty();
            }
        };

        let mut readings = Vec::new();
        for value in dataset.temperature_readings {
            match serde_json::from_value::<TemperatureReading>(value) {
                Ok(reading) => readings.push(reading),
                Err(err) => debug!(%err, "skipping malformed sensor reading"),
            }
        }

        let feed = Self::from_readings(readings);
        info!(path = %path.display(), frames = feed.frame_count(), "loaded sensor series");
        feed
    }

    /// Whether the feed holds no frames at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of frames in one full cycle.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn frame(&self, index: usize) -> Option<&[TemperatureReading]> {
        self.frames.get(index).map(Vec::as_slice)
    }
}

/// Lifecycle of the driver's background task.
enum DriverState {
    Idle,
    Running {
        shutdown: watch::Sender<bool>,
        task: JoinHandle<()>,
    },
    Stopped,
}

/// Drives periodic thermostat updates from the reading feed.
pub struct SimulationDriver {
    registry: Arc<DeviceRegistry>,
    telemetry: Arc<TelemetryLog>,
    feed: ReadingFeed,
    period: Duration,
    state: Mutex<DriverState>,
}

impl SimulationDriver {
    /// Create a driver; nothing runs until [`start`](Self::start).
    #[must_use]
    pub fn new(
        registry: Arc<DeviceRegistry>,
        telemetry: Arc<TelemetryLog>,
        feed: ReadingFeed,
        period: Duration,
    ) -> Self {
        Self {
            registry,
            telemetry,
            feed,
            period,
            state: Mutex::new(DriverState::Idle),
        }
    }

    /// Spawn the periodic loop.
    ///
    /// Idempotent: calling it while running, or after [`stop`](Self::stop),
    /// is a logged no-op rather than a second concurrent loop. An empty
    /// feed logs once and performs no further work.
    pub fn start(&self) {
        let mut state = self.state.lock();
        match *state {
            DriverState::Running { .. } => {
                debug!("simulation already running, ignoring start");
                return;
            }
            DriverState::Stopped => {
                debug!("simulation already stopped, ignoring start");
                return;
            }
            DriverState::Idle => {}
        }

        if self.feed.is_empty() {
            info!("no sensor readings loaded, simulation disabled");
            *state = DriverState::Stopped;
            return;
        }

        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run_loop(
            Arc::clone(&self.registry),
            Arc::clone(&self.telemetry),
            self.feed.clone(),
            self.period,
            shutdown_rx,
        ));
        info!(
            period_secs = self.period.as_secs(),
            frames = self.feed.frame_count(),
            "simulation started"
        );
        *state = DriverState::Running { shutdown, task };
    }

    /// Signal shutdown and wait for the loop to observe it.
    ///
    /// Cancellation is observed at the loop's next suspension point (the
    /// timer wait), never mid-mutation; a tick in flight completes first.
    pub async fn stop(&self) {
        let running = {
            // don't hold the state lock across the await below
            let mut state = self.state.lock();
            match std::mem::replace(&mut *state, DriverState::Stopped) {
                DriverState::Running { shutdown, task } => Some((shutdown, task)),
                DriverState::Idle | DriverState::Stopped => None,
            }
        };

        if let Some((shutdown, task)) = running {
            let _ = shutdown.send(true);
            if let Err(err) = task.await {
                warn!(%err, "simulation task ended abnormally");
            }
            info!("simulation stopped");
        }
    }

    /// Whether the background task is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(*self.state.lock(), DriverState::Running { .. })
    }
}

async fn run_loop(
    registry: Arc<DeviceRegistry>,
    telemetry: Arc<TelemetryLog>,
    feed: ReadingFeed,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(period);
    let mut cursor = 0;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                run_tick(&registry, &telemetry, &feed, &mut cursor);
            }
            _ = shutdown.changed() => {
                debug!("simulation loop shutting down");
                return;
            }
        }
    }
}

/// One pass over the next frame. Failures never escape a tick.
fn run_tick(
    registry: &DeviceRegistry,
    telemetry: &TelemetryLog,
    feed: &ReadingFeed,
    cursor: &mut usize,
) {
    let Some(frame) = feed.frame(*cursor) else {
        return;
    };
    *cursor = (*cursor + 1) % feed.frame_count();

    let mut rng = rand::rng();
    for reading in frame {
        apply_reading(registry, telemetry, reading, &mut rng);
    }
}

fn apply_reading(
    registry: &DeviceRegistry,
    telemetry: &TelemetryLog,
    reading: &TemperatureReading,
    rng: &mut impl Rng,
) {
    let device_id = match DeviceId::parse(&reading.device_id) {
        Ok(id) => id,
        Err(err) => {
            debug!(raw = %reading.device_id, %err, "skipping reading with malformed device id");
            return;
        }
    };

    // Small bounded jitter so a replayed series doesn't look perfectly
    // canned; the result stays inside the thermostat's valid range.
    let jitter: f64 = rng.random_range(-0.5..=0.5);
    #[allow(clippy::cast_possible_truncation)]
    let value = ((reading.current_temp + jitter).round() as i32)
        .clamp(CurrentTemp::MIN.value(), CurrentTemp::MAX.value());

    let patch = DevicePatch {
        current_temp: Some(value),
        ..DevicePatch::default()
    };
    match registry.apply_patch(&device_id, &patch) {
        Ok(_) => {
            telemetry.append(TelemetryRecord {
                device_id: device_id.clone(),
                sensor_type: "temperature".to_string(),
                value: f64::from(value),
                unit: "celsius".to_string(),
                timestamp: now(),
            });
            debug!(device = %device_id, temp = value, "applied simulated reading");
        }
        Err(DomoError::NotFound(_)) => {
            debug!(device = %device_id, "reading matches no registered device");
        }
        Err(err) => {
            warn!(device = %device_id, %err, "failed to apply simulated reading");
        }
    }
}
