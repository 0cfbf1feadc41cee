//! Per-frame driver: one control step per `Update`

use bevy::prelude::*;
use tracing::{debug, warn};

use crate::types::{Control, ControlSet, FrameState};

pub struct DriverPlugin;

impl Plugin for DriverPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameState>()
            .configure_sets(
                Update,
                (ControlSet::Input, ControlSet::Step, ControlSet::Apply).chain(),
            )
            .add_systems(Update, drive_frame.in_set(ControlSet::Step))
            .add_systems(Last, shutdown_on_exit);
    }
}

fn drive_frame(time: Res<Time>, mut control: ResMut<Control>, mut frame: ResMut<FrameState>) {
    let output = control.0.step(time.delta_secs());

    if let Some(sample) = &output.telemetry {
        match sample.to_json() {
            Ok(json) => debug!(target: "strider::telemetry", "{}", json),
            Err(e) => warn!("Failed to encode telemetry sample: {}", e),
        }
    }

    frame.last = Some(output);
}

fn shutdown_on_exit(mut exit: MessageReader<AppExit>, mut control: ResMut<Control>) {
    if exit.read().next().is_some() && control.0.is_running() {
        control.0.shutdown();
    }
}
