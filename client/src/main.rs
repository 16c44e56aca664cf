// Support configuring Bevy lints within code.
#![cfg_attr(bevy_lint, feature(register_tool), register_tool(bevy))]
// Disable console on Windows for non-dev builds.
#![cfg_attr(not(feature = "dev"), windows_subsystem = "windows")]

#[cfg(feature = "dev_native")]
mod debug_tools;

mod animation;
mod billboard;
mod camera;
mod character;
mod game_loop;
mod input;
mod level;
mod loading;
mod settings;

#[cfg(target_os = "macos")]
use bevy::window::CompositeAlphaMode;

use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;

fn main() -> AppExit {
    App::new().add_plugins(AppPlugin).run()
}

pub struct AppPlugin;
impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Window {
                        title: "Wet Intersection".to_string(),
                        fit_canvas_to_parent: true,
                        #[cfg(target_os = "macos")]
                        composite_alpha_mode: CompositeAlphaMode::PostMultiplied,
                        ..default()
                    }
                    .into(),
                    ..default()
                })
                .set(LogPlugin {
                    level: Level::INFO,
                    filter: "wgpu=error,naga=warn,client=debug,controller=debug".to_string(),
                    ..default()
                }),
        );

        // Settings first: every other plugin reads them at startup.
        app.add_plugins((
            settings::plugin,
            input::plugin,
            camera::plugin,
            level::plugin,
            character::plugin,
            billboard::plugin,
            loading::plugin,
            game_loop::plugin,
        ));

        #[cfg(feature = "dev_native")]
        app.add_plugins(debug_tools::plugin);
    }
}
