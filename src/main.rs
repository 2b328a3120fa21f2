use bevy::prelude::*;
use bevy::window::WindowResolution;

use spacehunter::config::load_game_config;
use spacehunter::controls::ControlsPlugin;
use spacehunter::rendering::RenderingPlugin;
use spacehunter::simulation::SimulationPlugin;

fn main() {
    let config = load_game_config();
    let (width, height) = (config.arena_width as u32, config.arena_height as u32);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Spacehunter".into(),
                resolution: WindowResolution::new(width, height),
                resizable: false,
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        // Inserted before the simulation plugin so it is not loaded twice.
        .insert_resource(config)
        .add_plugins((SimulationPlugin, ControlsPlugin, RenderingPlugin))
        .run();
}
