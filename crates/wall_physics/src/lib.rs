use bevy::prelude::*;
use wall_core::{DeviceResult, JointSource, TickReport, WallConfig, WallSimulation};

/// Runs one simulation tick per app update.
///
/// Pair with `ScheduleRunnerPlugin::run_loop(config.tick_period())` for the
/// fixed-rate loop. Nothing ticks until a device is attached with
/// [`attach_device`].
pub struct WallPhysicsPlugin {
    pub config: WallConfig,
    /// Fixed jitter seed; entropy when `None`.
    pub seed: Option<u64>,
}

impl WallPhysicsPlugin {
    pub fn new(config: WallConfig) -> Self {
        Self { config, seed: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for WallPhysicsPlugin {
    fn default() -> Self {
        Self::new(WallConfig::default())
    }
}

impl Plugin for WallPhysicsPlugin {
    fn build(&self, app: &mut App) {
        let simulation = match self.seed {
            Some(seed) => WallSimulation::with_seed(self.config.clone(), seed),
            None => WallSimulation::new(self.config.clone()),
        };

        app.insert_resource(self.config.clone())
            .insert_resource(simulation)
            .init_resource::<LastTick>()
            .add_systems(
                Update,
                (
                    recognize_gesture,
                    spawn_forces,
                    resolve_collisions,
                    advance_forces,
                    update_lattice,
                    finish_tick,
                )
                    .chain()
                    .in_set(WallTickSet)
                    .run_if(resource_exists::<TrackingDevice>),
            );
    }
}

/// The chained tick phases.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct WallTickSet;

/// The tracker feeding the simulation.
#[derive(Resource)]
pub struct TrackingDevice(pub Box<dyn JointSource>);

/// Report of the most recently completed tick.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct LastTick(pub TickReport);

/// Calibrate the simulation against `device` and hand the device to the app.
///
/// Fails if the device never produces a calibration frame; the caller should
/// treat that as fatal before running the app.
pub fn attach_device(app: &mut App, mut device: Box<dyn JointSource>) -> DeviceResult<()> {
    let world = app.world_mut();
    world
        .resource_mut::<WallSimulation>()
        .calibrate(&mut *device)?;
    world.insert_resource(TrackingDevice(device));
    Ok(())
}

fn tick_millis(time: &Time) -> u64 {
    time.elapsed().as_millis() as u64
}

fn recognize_gesture(mut simulation: ResMut<WallSimulation>, mut device: ResMut<TrackingDevice>) {
    simulation.recognize(&mut *device.0);
}

fn spawn_forces(mut simulation: ResMut<WallSimulation>, time: Res<Time>) {
    simulation.spawn_forces(tick_millis(&time));
}

fn resolve_collisions(mut simulation: ResMut<WallSimulation>) {
    simulation.resolve_collisions();
}

fn advance_forces(mut simulation: ResMut<WallSimulation>, time: Res<Time>) {
    simulation.advance_forces(tick_millis(&time));
}

fn update_lattice(mut simulation: ResMut<WallSimulation>) {
    simulation.update_lattice();
}

fn finish_tick(
    mut simulation: ResMut<WallSimulation>,
    config: Res<WallConfig>,
    mut last: ResMut<LastTick>,
    mut exit: MessageWriter<AppExit>,
) {
    let report = simulation.finish_tick();
    last.0 = report;

    let interval = config.report_interval_ticks.max(1);
    if report.tick % interval == 0 {
        let stats = simulation.stats();
        info!(
            "Tick {}: forces={} spawned={} collisions={}",
            report.tick, report.live_forces, stats.total_spawned, stats.total_collisions
        );
    }

    if simulation.is_finished() {
        info!("Simulation finished after {} ticks", simulation.tick_count());
        exit.write(AppExit::Success);
    }
}
