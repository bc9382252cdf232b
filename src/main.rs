mod app;
mod gpu;

use std::time::Duration;

use winit::event_loop::{ControlFlow, EventLoop};

use ripple_life::config::TICK_INTERVAL_MS;
use ripple_life::{SimConfig, Simulation};

use crate::app::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimConfig::from_env().inspect_err(|e| log::error!("Invalid configuration: {}", e))?;
    log::info!(
        "Grid {}x{}, rule {}, tick {} ms",
        config.width,
        config.height,
        config.rules,
        TICK_INTERVAL_MS
    );

    let simulation = Simulation::new(&config)?;
    let mut app = App::new(simulation, Duration::from_millis(TICK_INTERVAL_MS));

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut app)?;

    Ok(())
}
