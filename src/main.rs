use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use wall_core::WallConfig;
use wall_physics::{attach_device, WallPhysicsPlugin};

mod synthetic_device;

use synthetic_device::SyntheticDevice;

/// One full swing of the synthetic arm, in ticks (about three seconds).
const SWING_PERIOD_TICKS: u32 = 90;

fn main() -> AppExit {
    let config = WallConfig::default();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(config.tick_period())))
        .add_plugins(LogPlugin::default())
        .add_plugins(WallPhysicsPlugin::new(config));

    let device = match SyntheticDevice::open(SWING_PERIOD_TICKS) {
        Ok(device) => device,
        Err(e) => {
            error!("{}", e);
            return AppExit::error();
        }
    };

    info!("Calibrating...");
    if let Err(e) = attach_device(&mut app, Box::new(device)) {
        error!("Calibration failed: {}", e);
        return AppExit::error();
    }
    info!("Calibration done. Starting simulation loop...");

    app.run()
}
