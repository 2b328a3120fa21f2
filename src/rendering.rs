//! Demo renderer: gizmo outlines for every entity plus a text HUD.
//!
//! The simulation works in screen space (origin top-left, y down); Bevy's 2D
//! camera is centred with y up.  [`to_world`] converts between the two.

use bevy::prelude::*;

use crate::actor::Group;
use crate::combat::ExplosionSize;
use crate::kinematics::heading;
use crate::simulation::{GameState, Simulation, WarningColour};

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_camera, setup_hud))
            .add_systems(Update, (gizmo_rendering_system, hud_display_system));
    }
}

/// Marker for the HUD text node.
#[derive(Component)]
pub struct HudText;

/// Marker for the warning line.
#[derive(Component)]
pub struct WarningText;

/// Screen-space point to camera world space.
#[inline]
pub fn to_world(p: Vec2, arena: Vec2) -> Vec2 {
    Vec2::new(p.x - arena.x / 2.0, arena.y / 2.0 - p.y)
}

fn group_colour(group: Group) -> Color {
    match group {
        Group::Player => Color::srgb(0.2, 0.8, 1.0),
        Group::Enemies => Color::srgb(1.0, 0.3, 0.3),
        Group::PlayerWeapons => Color::srgb(1.0, 1.0, 0.4),
        Group::EnemyWeapons => Color::srgb(1.0, 0.5, 0.1),
        Group::Friends => Color::srgb(0.3, 1.0, 0.4),
        Group::Junk => Color::srgb(0.6, 0.55, 0.5),
        Group::Wreckage => Color::srgb(0.45, 0.45, 0.55),
    }
}

fn warning_colour(colour: WarningColour) -> Color {
    match colour {
        WarningColour::Red => Color::srgb(1.0, 0.25, 0.25),
        WarningColour::Amber => Color::srgb(1.0, 0.75, 0.2),
        WarningColour::Green => Color::srgb(0.3, 1.0, 0.4),
    }
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

pub fn setup_hud(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(0.95, 0.88, 0.45)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        },
        HudText,
    ));
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            bottom: Val::Px(10.0),
            ..default()
        },
        WarningText,
    ));
}

pub fn gizmo_rendering_system(mut gizmos: Gizmos, sim: Res<Simulation>) {
    let config = sim.config();
    let arena = Vec2::new(config.arena_width, config.arena_height);

    gizmos.rect_2d(
        Isometry2d::IDENTITY,
        arena,
        Color::srgba(1.0, 1.0, 1.0, 0.15),
    );

    for view in sim.entities() {
        let pos = to_world(view.pos, arena);
        let colour = group_colour(view.group);
        gizmos.circle_2d(pos, view.radius, colour);
        if matches!(view.group, Group::Player | Group::Enemies | Group::Friends) {
            let nose = heading(view.rot) * view.radius;
            gizmos.line_2d(pos, pos + Vec2::new(nose.x, -nose.y), colour);
        }
    }

    let now = sim.now_ms();
    for boom in sim.explosions() {
        let t = now.saturating_sub(boom.started_ms) as f32 / boom.size.lifetime_ms() as f32;
        let (max_radius, colour) = match boom.size {
            ExplosionSize::Small => (12.0, Color::srgb(1.0, 0.8, 0.3)),
            ExplosionSize::Large => (40.0, Color::srgb(1.0, 0.5, 0.1)),
            ExplosionSize::Death => (60.0, Color::srgb(1.0, 0.2, 0.2)),
        };
        gizmos.circle_2d(to_world(boom.pos, arena), max_radius * t.clamp(0.1, 1.0), colour);
    }
}

pub fn hud_display_system(
    sim: Res<Simulation>,
    mut hud_query: Query<&mut Text, (With<HudText>, Without<WarningText>)>,
    mut warning_query: Query<(&mut Text, &mut TextColor), With<WarningText>>,
) {
    if !sim.is_changed() {
        return;
    }
    let hud = sim.hud();

    if let Ok(mut text) = hud_query.single_mut() {
        let banner = match hud.state {
            GameState::NewGame => "  [ENTER] START",
            GameState::Paused => "  PAUSED",
            GameState::GameOver => "  GAME OVER - [ENTER] NEW GAME",
            GameState::Playing if hud.docked => "  DOCKED",
            GameState::Playing => "",
        };
        *text = Text::new(format!(
            "Score {}  High {}  Level {}  Lives {}  Shield {}  {} {}  Radar {}{}",
            hud.score,
            hud.highscore,
            hud.level,
            hud.lives,
            hud.shield,
            hud.weapon.name(),
            hud.ammo,
            hud.radar_range,
            banner,
        ));
    }

    if let Ok((mut text, mut colour)) = warning_query.single_mut() {
        match &hud.warning {
            Some(warning) => {
                *text = Text::new(warning.text.clone());
                *colour = TextColor(warning_colour(warning.colour));
            }
            None => *text = Text::new(""),
        }
    }
}
