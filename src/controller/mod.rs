pub mod command;
pub mod console;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::config::{Config, SimulationConfig};
use crate::domain::{EnvironmentState, Gauges, Mood};
use crate::error::{PlantError, PlantResult};
use crate::simulation::{EnvironmentModel, StepOptions};

pub use command::Command;

/// Consistent view of the model, published after every mutation.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub state: EnvironmentState,
    pub mood: Mood,
    pub gauges: Gauges,
    /// Incremented once per mutation
    pub revision: u64,
    pub observed_at: DateTime<Utc>,
}

impl Snapshot {
    fn capture(model: &EnvironmentModel, revision: u64) -> Self {
        let state = model.state().clone();
        Self {
            mood: Mood::from(&state),
            gauges: state.gauges(),
            state,
            revision,
            observed_at: Utc::now(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub controller: Arc<PlantController>,
}

impl AppState {
    pub fn new(cfg: Config) -> Self {
        let controller = Arc::new(PlantController::from_config(&cfg.simulation));
        Self { cfg, controller }
    }
}

pub fn spawn_simulation_task(
    controller: Arc<PlantController>,
    cfg: &SimulationConfig,
) -> JoinHandle<()> {
    let period = Duration::from_millis(cfg.tick_millis.max(1));
    let options = StepOptions::new(cfg.delta_seconds, cfg.scale);
    tokio::spawn(async move {
        controller.run(period, options).await;
    })
}

/// Serializes every mutation of the model and publishes a snapshot after each.
pub struct PlantController {
    model: Mutex<EnvironmentModel>,
    snapshots: watch::Sender<Snapshot>,
}

impl PlantController {
    pub fn new(model: EnvironmentModel) -> Self {
        let (snapshots, _) = watch::channel(Snapshot::capture(&model, 0));
        Self {
            model: Mutex::new(model),
            snapshots,
        }
    }

    pub fn from_config(cfg: &SimulationConfig) -> Self {
        let model =
            EnvironmentModel::with_seed(cfg.random_seed).with_day_cycle(cfg.day_cycle_seconds);
        Self::new(model)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Receive a notification for every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.snapshots.receiver_count()
    }

    pub fn water(&self, amount: Option<f64>) -> Snapshot {
        self.mutate(|m| m.water(amount))
    }

    pub fn sleep(&self, target_lux: Option<f64>) -> Snapshot {
        self.mutate(|m| m.sleep(target_lux))
    }

    pub fn wake(&self, restore_lux: Option<f64>) -> Snapshot {
        self.mutate(|m| m.wake(restore_lux))
    }

    pub fn set_humidity(&self, value: f64) -> Snapshot {
        self.mutate(|m| m.set_humidity(value))
    }

    pub fn set_moisture(&self, value: f64) -> Snapshot {
        self.mutate(|m| m.set_moisture(value))
    }

    pub fn set_temperature(&self, value: f64) -> Snapshot {
        self.mutate(|m| m.set_temperature(value))
    }

    pub fn set_light_exposure(&self, value: f64) -> Snapshot {
        self.mutate(|m| m.set_light_exposure(value))
    }

    pub fn set_day_cycle_seconds(&self, secs: Option<f64>) -> Snapshot {
        self.mutate(|m| m.set_day_cycle_seconds(secs))
    }

    pub fn randomize(&self) -> Snapshot {
        self.mutate(|m| m.randomize())
    }

    /// One periodic simulation step.
    ///
    /// The state always advances. The error only reports that nobody was
    /// listening for the result.
    pub fn tick(&self, options: StepOptions) -> PlantResult<Snapshot> {
        let snapshot = self.mutate(|m| {
            m.simulate_step(options);
        });
        if self.snapshots.receiver_count() == 0 {
            return Err(PlantError::NoSubscribers);
        }
        Ok(snapshot)
    }

    pub fn apply(&self, command: Command) -> Snapshot {
        match command {
            Command::Water(amount) => self.water(amount),
            Command::Sleep(lux) => self.sleep(lux),
            Command::Wake(lux) => self.wake(lux),
            Command::SetHumidity(v) => self.set_humidity(v),
            Command::SetMoisture(v) => self.set_moisture(v),
            Command::SetTemperature(v) => self.set_temperature(v),
            Command::SetLightExposure(v) => self.set_light_exposure(v),
            Command::SetDayCycle(secs) => self.set_day_cycle_seconds(secs),
            Command::Randomize => self.randomize(),
            Command::Step(options) => self.mutate(|m| {
                m.simulate_step(options);
            }),
            Command::Status => self.snapshot(),
        }
    }

    /// Drive the simulation at a fixed real-time period until the task is aborted.
    pub async fn run(&self, period: Duration, options: StepOptions) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            match self.tick(options) {
                Ok(snapshot) => debug!(
                    revision = snapshot.revision,
                    sim_time_seconds = snapshot.state.sim_time_seconds,
                    light_exposure = snapshot.state.light_exposure,
                    "simulation tick"
                ),
                Err(e) => debug!(error = %e, "simulation tick unobserved"),
            }
        }
    }

    fn mutate<F>(&self, op: F) -> Snapshot
    where
        F: FnOnce(&mut EnvironmentModel),
    {
        let mut model = self.model.lock();
        let previous_mood = model.mood();
        op(&mut *model);

        let revision = self.snapshots.borrow().revision + 1;
        let snapshot = Snapshot::capture(&*model, revision);
        if snapshot.mood != previous_mood {
            info!(
                from = %previous_mood,
                to = %snapshot.mood,
                moisture = snapshot.state.moisture,
                temperature = snapshot.state.temperature,
                light_exposure = snapshot.state.light_exposure,
                "mood changed"
            );
        }
        self.snapshots.send_replace(snapshot.clone());
        snapshot
    }
}

/// Render a snapshot as a single JSON line.
pub fn describe(snapshot: &Snapshot) -> Result<String> {
    Ok(serde_json::to_string(snapshot)?)
}
