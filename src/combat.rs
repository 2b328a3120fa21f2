//! Per-tick collision resolution.
//!
//! Group pairs are checked in a fixed order; a hit is a strict circle
//! overlap (`distance < r₁ + r₂`).
//!
//! | Striker            | Struck      | Effect                                                      |
//! |--------------------|-------------|-------------------------------------------------------------|
//! | player projectile  | enemy       | enemy −damage, round removed, player scores                 |
//! | enemy projectile   | player      | shield −damage, round removed                               |
//! | junk / wreckage    | player      | shield −damage, asteroids break up (negligible ignored)     |
//! | junk               | enemy       | enemy −damage, body breaks up                               |
//! | junk               | projectile  | round health −damage, body breaks up, player rounds score   |
//!
//! Dead or hidden entities are skipped.  Bodies created during the pass
//! (debris, wreckage) come back in the [`CombatReport`] and join the scene
//! only after the pass, so they cannot be struck on the tick they appear.

use crate::actor::{Actor, ActorKind};
use crate::config::GameConfig;
use crate::constants::*;
use crate::player::Player;
use crate::spacejunk::{JunkKind, PassiveBody};
use crate::weapon::Faction;
use bevy::prelude::*;
use rand::Rng;

// ── Explosions ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExplosionSize {
    /// Round or rock impact.
    Small,
    /// Enemy destroyed.
    Large,
    /// Player ship lost.
    Death,
}

impl ExplosionSize {
    pub fn lifetime_ms(self) -> u64 {
        match self {
            ExplosionSize::Small => EXPLOSION_SMALL_MS,
            ExplosionSize::Large => EXPLOSION_LARGE_MS,
            ExplosionSize::Death => EXPLOSION_DEATH_MS,
        }
    }

    pub fn sprite_key(self) -> &'static str {
        match self {
            ExplosionSize::Small => "explosion_small",
            ExplosionSize::Large => "explosion_large",
            ExplosionSize::Death => "explosion_death",
        }
    }
}

/// A transient explosion effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    pub pos: Vec2,
    pub size: ExplosionSize,
    pub started_ms: u64,
}

impl Explosion {
    #[inline]
    pub fn expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.started_ms) > self.size.lifetime_ms()
    }
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// Everything a resolution pass produced.
#[derive(Debug, Default)]
pub struct CombatReport {
    /// Points earned by the player.
    pub score: i64,
    /// Shield lost by the player.
    pub player_damage: i32,
    pub explosions: Vec<(Vec2, ExplosionSize)>,
    /// New debris for the junk group.
    pub debris: Vec<PassiveBody>,
    /// New wreckage from destroyed enemies.
    pub wreckage: Vec<PassiveBody>,
    pub enemies_destroyed: u32,
}

/// Entities visible to one resolution pass.
pub struct Arena<'a> {
    pub player: &'a mut Player,
    pub actors: &'a mut [Actor],
    pub junk: &'a mut [PassiveBody],
    pub wreckage: &'a mut [PassiveBody],
}

/// Run every group pair once.
pub fn resolve(arena: Arena<'_>, config: &GameConfig, rng: &mut impl Rng) -> CombatReport {
    let Arena {
        player,
        actors,
        junk,
        wreckage,
    } = arena;
    let mut report = CombatReport::default();

    projectiles_vs_enemies(actors, config, rng, &mut report);
    projectiles_vs_player(player, actors, &mut report);
    junk_vs_player(player, junk, rng, &mut report);
    junk_vs_player(player, wreckage, rng, &mut report);
    junk_vs_enemies(actors, junk, config, rng, &mut report);
    junk_vs_projectiles(actors, junk, rng, &mut report);

    if report.player_damage > 0 {
        player.shield -= report.player_damage;
    }
    report
}

fn is_enemy(actor: &Actor) -> bool {
    actor.alive && matches!(actor.kind, ActorKind::Enemy(_))
}

fn projectile_source(actor: &Actor) -> Option<Faction> {
    match &actor.kind {
        ActorKind::Projectile(p) if actor.alive => Some(p.source),
        _ => None,
    }
}

fn destroy_enemy(
    enemy: &Actor,
    config: &GameConfig,
    rng: &mut impl Rng,
    report: &mut CombatReport,
) {
    report
        .explosions
        .push((enemy.body.pos, ExplosionSize::Large));
    report.enemies_destroyed += 1;
    for _ in 0..config.wreckage_pieces {
        report
            .wreckage
            .push(PassiveBody::spawn_wreckage(enemy.body.pos, enemy.body.vel, rng));
    }
}

fn projectiles_vs_enemies(
    actors: &mut [Actor],
    config: &GameConfig,
    rng: &mut impl Rng,
    report: &mut CombatReport,
) {
    for e in 0..actors.len() {
        for p in 0..actors.len() {
            if !is_enemy(&actors[e]) {
                break;
            }
            if projectile_source(&actors[p]) != Some(Faction::Player) {
                continue;
            }
            let (pos, radius, damage) = {
                let round = &actors[p];
                (round.body.pos, round.body.radius, round.damage())
            };
            if !actors[e].body.overlaps(pos, radius) {
                continue;
            }
            actors[p].alive = false;
            if actors[e].take_damage(damage) {
                report.score += i64::from(config.enemy_bounty);
                destroy_enemy(&actors[e], config, rng, report);
            } else {
                report.score += i64::from(damage);
                report.explosions.push((pos, ExplosionSize::Small));
            }
        }
    }
}

fn projectiles_vs_player(player: &Player, actors: &mut [Actor], report: &mut CombatReport) {
    if player.is_hidden() {
        return;
    }
    for round in actors.iter_mut() {
        if projectile_source(round) != Some(Faction::Enemy) {
            continue;
        }
        if player.body.overlaps(round.body.pos, round.body.radius) {
            round.alive = false;
            report.player_damage += round.damage();
            report
                .explosions
                .push((round.body.pos, ExplosionSize::Small));
        }
    }
}

fn junk_vs_player(
    player: &Player,
    bodies: &mut [PassiveBody],
    rng: &mut impl Rng,
    report: &mut CombatReport,
) {
    if player.is_hidden() {
        return;
    }
    for body in bodies.iter_mut() {
        if !body.alive || body.is_negligible() {
            continue;
        }
        if player.body.overlaps(body.body.pos, body.body.radius) {
            report.player_damage += body.damage;
            report.explosions.push((body.body.pos, ExplosionSize::Small));
            // Only asteroids break up on the hull.
            if body.kind == JunkKind::Asteroid {
                report.debris.extend(body.disintegrate(rng));
            } else {
                body.alive = false;
            }
        }
    }
}

fn junk_vs_enemies(
    actors: &mut [Actor],
    junk: &mut [PassiveBody],
    config: &GameConfig,
    rng: &mut impl Rng,
    report: &mut CombatReport,
) {
    for enemy in actors.iter_mut() {
        for body in junk.iter_mut() {
            if !is_enemy(enemy) {
                break;
            }
            if !body.alive || !enemy.body.overlaps(body.body.pos, body.body.radius) {
                continue;
            }
            report.debris.extend(body.disintegrate(rng));
            if enemy.take_damage(body.damage) {
                destroy_enemy(enemy, config, rng, report);
            }
        }
    }
}

fn junk_vs_projectiles(
    actors: &mut [Actor],
    junk: &mut [PassiveBody],
    rng: &mut impl Rng,
    report: &mut CombatReport,
) {
    for round in actors.iter_mut() {
        for body in junk.iter_mut() {
            let Some(source) = projectile_source(round) else {
                break;
            };
            if !body.alive || !round.body.overlaps(body.body.pos, body.body.radius) {
                continue;
            }
            if source == Faction::Player {
                report.score += i64::from(body.damage);
            }
            report.explosions.push((body.body.pos, ExplosionSize::Small));
            report.debris.extend(body.disintegrate(rng));
            // A rock always costs the round at least one hit.
            round.take_damage(body.damage.max(1));
        }
    }
}
