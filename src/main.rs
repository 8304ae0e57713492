use anyhow::Result;
use potchi_env::{config, controller, telemetry};
use config::Config;
use controller::console::{render, run_console};
use telemetry::init_tracing;
use tokio::io::BufReader;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::load()?;
    init_tracing(cfg.telemetry.json);

    let app_state = controller::AppState::new(cfg);
    let cfg = &app_state.cfg;
    let plant = app_state.controller.clone();

    info!(
        day_cycle_seconds = cfg.simulation.day_cycle_seconds,
        tick_millis = cfg.simulation.tick_millis,
        seeded = cfg.simulation.random_seed.is_some(),
        "starting Potchi environment"
    );
    info!("{}", render(&plant.snapshot()));

    // Keeps the tick loop observed for as long as the process runs
    let mut updates = plant.subscribe();
    let watcher = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            let line = controller::describe(&snapshot).unwrap_or_default();
            debug!(snapshot = %line, "state");
        }
    });

    let ticker = controller::spawn_simulation_task(plant.clone(), &cfg.simulation);

    if cfg.console.enabled {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        tokio::select! {
            res = run_console(plant.clone(), stdin, stdout) => {
                if let Err(e) = res {
                    warn!(error = %e, "console stopped");
                }
                telemetry::shutdown_signal().await;
            }
            _ = telemetry::shutdown_signal() => {}
        }
    } else {
        telemetry::shutdown_signal().await;
    }

    ticker.abort();
    watcher.abort();
    info!("{}", render(&plant.snapshot()));
    warn!("shutdown complete");
    Ok(())
}
