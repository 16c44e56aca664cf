//! Debug/performance tooling for native dev builds.
//!
//! Compiled only with the `dev_native` feature.

use crate::{
    game_loop::{Game, PresentedFrames},
    loading::LoadStatus,
};
use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;
use bevy::time::common_conditions::on_timer;
use iyes_perf_ui::prelude::*;
use std::time::Duration;

const REPORT_PERIOD: Duration = Duration::from_secs(5);

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        PerfUiPlugin,
    ));

    app.add_systems(Startup, spawn_perf_ui);
    app.add_systems(Update, report_state.run_if(on_timer(REPORT_PERIOD)));
}

fn spawn_perf_ui(mut commands: Commands) {
    commands.spawn(PerfUiAllEntries::default());
}

fn report_state(game: Res<Game>, frames: Res<PresentedFrames>, status: Res<LoadStatus>) {
    debug!(
        frames = frames.0,
        ready = game.0.is_ready(),
        clip = ?game.0.current_clip(),
        level = ?status.level,
        character = ?status.character,
        ads = ?status.ads,
        "client state"
    );
}
