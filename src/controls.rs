//! Keyboard adapter: turns key state into simulation [`Command`]s.
//!
//! | Key                | Command                         |
//! |--------------------|---------------------------------|
//! | W / S              | thrust forward / reverse        |
//! | A / D              | strafe left / right             |
//! | ← / →, Q / E       | yaw counter-clockwise / clockwise |
//! | Space              | fire (hold for automatic fire)  |
//! | Tab                | cycle weapon                    |
//! | R                  | radar range                     |
//! | P / Escape         | pause                           |
//! | Enter              | start / new game                |
//! | M, K, U, B         | summon, dock, undock, supplies  |
//! | Backspace          | close the armoury               |
//! | F5 / F9            | save / restart from save        |
//!
//! Axis commands are only queued when the axis values change.

use bevy::prelude::*;

use crate::command::Command;
use crate::simulation::{SimSet, Simulation};

pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, keyboard_command_system.in_set(SimSet::Input));
    }
}

/// `(strafe, thrust, yaw)` from the held keys.
pub fn read_axes(keys: &ButtonInput<KeyCode>) -> (f32, f32, f32) {
    let axis = |neg: &[KeyCode], pos: &[KeyCode]| {
        let mut v = 0.0;
        if keys.any_pressed(neg.iter().copied()) {
            v -= 1.0;
        }
        if keys.any_pressed(pos.iter().copied()) {
            v += 1.0;
        }
        v
    };
    (
        axis(&[KeyCode::KeyA], &[KeyCode::KeyD]),
        axis(&[KeyCode::KeyW], &[KeyCode::KeyS]),
        axis(
            &[KeyCode::ArrowRight, KeyCode::KeyE],
            &[KeyCode::ArrowLeft, KeyCode::KeyQ],
        ),
    )
}

/// Discrete commands for keys pressed this frame.
pub fn read_commands(keys: &ButtonInput<KeyCode>) -> Vec<Command> {
    const BINDINGS: [(KeyCode, Command); 13] = [
        (KeyCode::Space, Command::Fire),
        (KeyCode::Tab, Command::CycleWeapon),
        (KeyCode::KeyR, Command::ToggleRadar),
        (KeyCode::KeyP, Command::Pause),
        (KeyCode::Escape, Command::Pause),
        (KeyCode::KeyM, Command::SummonSupplyShip),
        (KeyCode::KeyK, Command::Dock),
        (KeyCode::KeyU, Command::Undock),
        (KeyCode::KeyB, Command::GetSupplies),
        (KeyCode::Backspace, Command::Cancel),
        (KeyCode::F5, Command::Save),
        (KeyCode::F9, Command::Restart),
        (KeyCode::Enter, Command::Start),
    ];

    let mut commands: Vec<Command> = BINDINGS
        .iter()
        .filter(|(key, _)| keys.just_pressed(*key))
        .map(|(_, command)| command.clone())
        .collect();
    if keys.just_pressed(KeyCode::Enter) {
        commands.push(Command::NewGame);
    }
    if keys.just_pressed(KeyCode::Space) {
        commands.push(Command::AutoFire(true));
    }
    if keys.just_released(KeyCode::Space) {
        commands.push(Command::AutoFire(false));
    }
    commands
}

pub fn keyboard_command_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut sim: ResMut<Simulation>,
    mut last_axes: Local<(f32, f32, f32)>,
) {
    let axes = read_axes(&keys);
    if axes != *last_axes {
        let (x, y, yaw) = axes;
        sim.push_command(Command::Steer { x, y });
        sim.push_command(Command::Yaw(yaw));
        *last_axes = axes;
    }
    for command in read_commands(&keys) {
        sim.push_command(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_keys_map_to_axes() {
        let mut keys = ButtonInput::<KeyCode>::default();
        assert_eq!(read_axes(&keys), (0.0, 0.0, 0.0));
        keys.press(KeyCode::KeyW);
        keys.press(KeyCode::KeyD);
        keys.press(KeyCode::ArrowLeft);
        assert_eq!(read_axes(&keys), (1.0, -1.0, 1.0));
        keys.press(KeyCode::KeyS);
        assert_eq!(read_axes(&keys).1, 0.0);
    }

    #[test]
    fn space_fires_once_and_holds_the_trigger() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::Space);
        let commands = read_commands(&keys);
        assert!(commands.contains(&Command::Fire));
        assert!(commands.contains(&Command::AutoFire(true)));

        keys.clear();
        assert!(read_commands(&keys).is_empty());

        keys.release(KeyCode::Space);
        assert_eq!(read_commands(&keys), vec![Command::AutoFire(false)]);
    }
}
