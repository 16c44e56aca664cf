use bevy::prelude::*;
use controller::Config;

/// Optional overrides, read from the working directory.
const SETTINGS_FILE: &str = "settings.toml";

/// Asset paths and tunables for this session.
#[derive(Resource, Debug, Clone, Default)]
pub struct Settings(pub Config);

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(Settings(read_settings()));
    app.add_systems(Startup, clamp_frame_delta);
}

fn read_settings() -> Config {
    match Config::load(SETTINGS_FILE) {
        Ok(Some(config)) => {
            info!("using {SETTINGS_FILE}");
            config
        }
        Ok(None) => Config::default(),
        Err(err) => {
            error!("{err}, falling back to defaults");
            Config::default()
        }
    }
}

/// Bevy's animation players tick from virtual time, so the stall clamp is applied there too.
fn clamp_frame_delta(mut time: ResMut<Time<Virtual>>, settings: Res<Settings>) {
    // Never zero: `Tunables` floors it, and Bevy rejects a zero max delta.
    time.set_max_delta(settings.0.tunables.max_frame_delta());
}
