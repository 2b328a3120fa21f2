//! The simulation context and its Bevy plugin.
//!
//! [`Simulation`] owns every entity, the RNG, the clock and the command queue.
//! One call to [`Simulation::tick`] advances the game by one frame:
//!
//! ```text
//! drain commands
//!   └─ (Playing only)
//!      hazards ─▶ scene snapshot ─▶ steer + integrate ─▶ enemy fire
//!      ─▶ merge spawns ─▶ combat ─▶ lifecycle ─▶ expire transients
//! ```
//!
//! Bodies spawned during a tick (fired rounds, storm asteroids, swarm
//! enemies) join the arena after the motion phase: they can be struck on
//! the tick they appear but are not integrated until the next one.
//!
//! The clock only runs while [`GameState::Playing`], so every timer freezes
//! while paused.

use std::collections::VecDeque;
use std::path::PathBuf;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorId, ActorKind, Group, PLAYER_ID};
use crate::armoury::Armoury;
use crate::combat::{self, Arena, Explosion, ExplosionSize};
use crate::command::Command;
use crate::constants::GATLING_TRACER_EVERY;
use crate::config::{load_game_config, GameConfig};
use crate::enemy::{entry_point, spawn_enemy};
use crate::error::{SimError, SimResult};
use crate::hazards::{level_for_score, HazardTimers};
use crate::instinct::{Scene, Steering};
use crate::player::{LifeLost, Player};
use crate::save::{self, SaveSnapshot, SAVE_VERSION};
use crate::spacejunk::PassiveBody;
use crate::supply::{check_docking, parking_spot, spawn_supply_ship, summon};
use crate::weapon::{Faction, FireOutcome, Payload, WeaponKind};

// ── States & messages ─────────────────────────────────────────────────────────

/// Top-level game state, mirrored into Bevy's state machine each frame.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Title screen; waiting for `Start`.
    #[default]
    NewGame,
    Playing,
    Paused,
    GameOver,
}

/// Notable moments for audio and UI collaborators.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum SimEvent {
    StateChanged(GameState),
    WeaponFired(WeaponKind),
    Explosion { pos: Vec2, size: ExplosionSize },
    EnemyDestroyed,
    PlayerDestroyed { lives_left: i32 },
    Respawned,
    LevelUp(u32),
    StormIncoming(u32),
    SwarmIncoming(u32),
    SupplyShipInbound,
    Docked,
    Undocked,
    Traded { cost: u32 },
    Saved,
}

/// Warning colour shown by the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningColour {
    Red,
    Amber,
    Green,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub text: String,
    pub colour: WarningColour,
    pub expires_ms: u64,
}

// ── Read-only views ───────────────────────────────────────────────────────────

/// What the renderer needs to draw one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityView {
    pub pos: Vec2,
    pub rot: f32,
    pub radius: f32,
    pub sprite: &'static str,
    pub group: Group,
}

/// Scalar state for the HUD.
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub state: GameState,
    pub score: u32,
    pub highscore: u32,
    pub level: u32,
    pub lives: i32,
    pub shield: i32,
    pub weapon: WeaponKind,
    pub ammo: u32,
    pub radar_range: u8,
    pub warning: Option<Warning>,
    pub docked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct InputAxes {
    x: f32,
    y: f32,
    yaw: f32,
    trigger_held: bool,
}

// ── Simulation ────────────────────────────────────────────────────────────────

#[derive(Resource)]
pub struct Simulation {
    config: GameConfig,
    rng: StdRng,
    ticks: u64,
    state: GameState,
    pub player: Player,
    actors: Vec<Actor>,
    junk: Vec<PassiveBody>,
    wreckage: Vec<PassiveBody>,
    explosions: Vec<Explosion>,
    spawned_actors: Vec<Actor>,
    spawned_junk: Vec<PassiveBody>,
    commands: VecDeque<Command>,
    events: Vec<SimEvent>,
    warning: Option<Warning>,
    input: InputAxes,
    radar_range: u8,
    highscore: u32,
    gatling_rounds: u32,
    supply_ship: Option<ActorId>,
    doing_supply: bool,
    armoury: Option<Armoury>,
    hazards: HazardTimers,
    next_id: u64,
}

impl Simulation {
    /// Build a fresh simulation.  A config that fails
    /// [`GameConfig::validate`] is replaced by the compiled defaults.
    pub fn new(config: GameConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!("Rejected game config: {e}; using defaults");
                GameConfig::default()
            }
        };
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            player: Player::new(&config),
            hazards: HazardTimers::new(&config),
            config,
            ticks: 0,
            state: GameState::NewGame,
            actors: Vec::new(),
            junk: Vec::new(),
            wreckage: Vec::new(),
            explosions: Vec::new(),
            spawned_actors: Vec::new(),
            spawned_junk: Vec::new(),
            commands: VecDeque::new(),
            events: Vec::new(),
            warning: None,
            input: InputAxes::default(),
            radar_range: 0,
            highscore: 0,
            gatling_rounds: 0,
            supply_ship: None,
            doing_supply: false,
            armoury: None,
            next_id: 1,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Simulation time in milliseconds.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        (self.ticks as f64 * self.config.ms_per_tick()) as u64
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn junk(&self) -> &[PassiveBody] {
        &self.junk
    }

    pub fn wreckage(&self) -> &[PassiveBody] {
        &self.wreckage
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn armoury(&self) -> Option<&Armoury> {
        self.armoury.as_ref()
    }

    pub fn highscore(&self) -> u32 {
        self.highscore
    }

    pub fn set_highscore(&mut self, highscore: u32) {
        self.highscore = self.highscore.max(highscore);
    }

    pub fn enemy_count(&self) -> usize {
        self.actors
            .iter()
            .filter(|a| a.alive && matches!(a.kind, ActorKind::Enemy(_)))
            .count()
    }

    pub fn supply_ship(&self) -> Option<&Actor> {
        let id = self.supply_ship?;
        self.actors.iter().find(|a| a.id == id)
    }

    /// Every visible entity, player first.
    pub fn entities(&self) -> Vec<EntityView> {
        let mut views = Vec::with_capacity(1 + self.actors.len() + self.junk.len());
        if !self.player.is_hidden() {
            views.push(EntityView {
                pos: self.player.body.pos,
                rot: self.player.body.rot,
                radius: self.player.body.radius,
                sprite: "player",
                group: Group::Player,
            });
        }
        views.extend(self.actors.iter().filter(|a| a.alive).map(|a| EntityView {
            pos: a.body.pos,
            rot: a.body.rot,
            radius: a.body.radius,
            sprite: a.sprite_key(),
            group: a.group(),
        }));
        for (bodies, group) in [(&self.junk, Group::Junk), (&self.wreckage, Group::Wreckage)] {
            views.extend(bodies.iter().filter(|b| b.alive).map(|b| EntityView {
                pos: b.body.pos,
                rot: b.body.rot,
                radius: b.body.radius,
                sprite: b.sprite_key(),
                group,
            }));
        }
        views
    }

    pub fn hud(&self) -> Hud {
        let (weapon, ammo) = self.player.ammo();
        Hud {
            state: self.state,
            score: self.player.score,
            highscore: self.highscore,
            level: self.player.level,
            lives: self.player.lives,
            shield: self.player.shield,
            weapon,
            ammo,
            radar_range: self.radar_range,
            warning: self.warning.clone(),
            docked: self.player.docked,
        }
    }

    // ── Command queue & events ────────────────────────────────────────────

    /// Queue a command for the next tick.
    pub fn push_command(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Take every event raised since the last call.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    fn warn(&mut self, text: impl Into<String>, colour: WarningColour) {
        let text = text.into();
        debug!("warning: {text}");
        self.warning = Some(Warning {
            text,
            colour,
            expires_ms: self.now_ms() + self.config.warning_duration_ms,
        });
    }

    fn set_state(&mut self, state: GameState) {
        if self.state != state {
            info!("Game state {:?} -> {:?}", self.state, state);
            self.state = state;
            self.events.push(SimEvent::StateChanged(state));
        }
    }

    fn next_id(&mut self) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        id
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance one frame.
    pub fn tick(&mut self) {
        self.drain_commands();
        if self.state != GameState::Playing {
            return;
        }
        self.ticks += 1;
        let now = self.now_ms();

        self.run_hazards(now);
        self.move_entities(now);
        self.enemy_fire(now);
        if self.input.trigger_held && !self.player.docked && !self.player.is_hidden() {
            let outcome = self.player.auto_shoot(now);
            self.handle_fire(outcome, now);
        }

        self.actors.append(&mut self.spawned_actors);
        self.junk.append(&mut self.spawned_junk);

        self.resolve_combat(now);
        self.lifecycle(now);
        self.expire_transients(now);
    }

    fn drain_commands(&mut self) {
        while let Some(command) = self.commands.pop_front() {
            self.apply_command(command);
        }
    }

    fn apply_command(&mut self, command: Command) {
        let now = self.now_ms();
        match command {
            Command::Start if self.state == GameState::NewGame => {
                self.hazards.restart(now);
                self.set_state(GameState::Playing);
            }
            Command::Pause => match self.state {
                GameState::Playing => self.set_state(GameState::Paused),
                GameState::Paused => self.set_state(GameState::Playing),
                _ => {}
            },
            Command::NewGame if self.state == GameState::GameOver => {
                self.reset_world();
                self.set_state(GameState::Playing);
            }
            Command::Restart => self.restart(),
            Command::Save => self.save_game(),
            Command::ToggleRadar => self.radar_range = (self.radar_range + 1) % 5,
            command if self.state == GameState::Playing => self.apply_play_command(command, now),
            _ => {}
        }
    }

    fn apply_play_command(&mut self, command: Command, now: u64) {
        match command {
            Command::Steer { x, y } => {
                self.input.x = x;
                self.input.y = y;
                if self.player.docked && (x != 0.0 || y != 0.0) {
                    self.warn("DOCKED", WarningColour::Amber);
                }
            }
            Command::Yaw(yaw) => self.input.yaw = yaw,
            Command::Fire => {
                if !self.player.docked && !self.player.is_hidden() {
                    let outcome = self.player.shoot();
                    self.handle_fire(outcome, now);
                }
            }
            Command::AutoFire(held) => self.input.trigger_held = held,
            Command::CycleWeapon => {
                if let Some(class) = self.player.cycle_weapon() {
                    if class == WeaponKind::Empty {
                        self.warn("WEAPONS COLD", WarningColour::Green);
                    } else {
                        self.warn(format!("{} Selected", class.name()), WarningColour::Amber);
                    }
                }
            }
            Command::SummonSupplyShip => self.summon_supply_ship(),
            Command::Dock => self.dock(),
            Command::Undock => self.undock(),
            Command::GetSupplies => {
                if self.player.docked {
                    self.armoury = Some(Armoury::open(self.player.payload.slots()));
                } else {
                    self.warn(SimError::NotDocked.to_string(), WarningColour::Red);
                }
            }
            Command::Substitute { slot, class } => {
                if let Some(armoury) = self.armoury.as_mut() {
                    if let Err(e) = armoury.substitute(slot, class) {
                        self.warn(e.to_string(), WarningColour::Red);
                    }
                }
            }
            Command::ResetArmoury => {
                if let Some(armoury) = self.armoury.as_mut() {
                    armoury.reset();
                }
            }
            Command::CommitArmoury => {
                if let Err(e) = self.commit_armoury() {
                    self.warn(e.to_string(), WarningColour::Red);
                }
            }
            Command::Cancel => self.armoury = None,
            Command::ApplyPayload(classes) => {
                if let Err(e) = self.apply_payload(&classes) {
                    self.warn(e.to_string(), WarningColour::Red);
                }
            }
            _ => {}
        }
    }

    // ── Phases ────────────────────────────────────────────────────────────

    fn run_hazards(&mut self, now: u64) {
        if self.doing_supply || self.armoury.is_some() {
            return;
        }
        let junk_count = self.junk.len();
        if let Some(count) = self
            .hazards
            .poll_storm(now, junk_count, &self.config, &mut self.rng)
        {
            info!("Asteroid storm: {count} asteroids");
            for _ in 0..count {
                let rock = PassiveBody::spawn_asteroid(&self.config, &mut self.rng);
                self.spawned_junk.push(rock);
            }
            self.events.push(SimEvent::StormIncoming(count));
        }

        let enemies = self.enemy_count();
        if let Some(count) =
            self.hazards
                .poll_swarm(now, enemies, self.player.level, &self.config, &mut self.rng)
        {
            info!("Enemy swarm: {count} ships");
            let center = self.config.arena_center();
            let half_width = self.config.arena_width / 2.0;
            for _ in 0..count {
                let id = self.next_id();
                let pos = entry_point(center, half_width, &mut self.rng);
                let max_speed = self.rng.gen_range(1..=self.config.enemy_max_speed.max(1)) as f32;
                let enemy = spawn_enemy(id, pos, max_speed, &mut self.rng);
                self.spawned_actors.push(enemy);
            }
            self.events.push(SimEvent::SwarmIncoming(count));
        }
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene::default();
        if !self.player.is_hidden() {
            scene.insert(PLAYER_ID, Group::Player, self.player.body.pos);
        }
        for actor in self.actors.iter().filter(|a| a.alive) {
            scene.insert(actor.id, actor.group(), actor.body.pos);
        }
        scene
    }

    fn move_entities(&mut self, now: u64) {
        let scene = self.scene();
        for actor in &mut self.actors {
            actor.steer(&scene, now, &mut self.rng);
            actor.step(&self.config);
        }

        let InputAxes { x, y, yaw, .. } = self.input;
        self.player.accelerate(x, y, yaw);
        if self.player.update(now, &self.config) {
            info!("New life spawned");
            self.events.push(SimEvent::Respawned);
        }

        for body in self.junk.iter_mut().chain(self.wreckage.iter_mut()) {
            body.step(&self.config);
        }
    }

    fn enemy_fire(&mut self, now: u64) {
        let mut launches = Vec::new();
        for actor in &mut self.actors {
            let ActorKind::Enemy(state) = &mut actor.kind else {
                continue;
            };
            if !actor.alive {
                continue;
            }
            state.payload.cool_off(
                now,
                self.config.wpn_cooloff_interval_ms,
                self.config.wpn_cooloff_rate,
            );
            if !self.config.enemy_shoots {
                continue;
            }
            let on_screen = self.config.on_screen(actor.body.pos);
            if let Some(kind) = state.update_fire(now, on_screen, &mut self.rng) {
                launches.push((kind, actor.body.pos, actor.body.rot, actor.body.vel));
            }
        }
        for (kind, pos, rot, vel) in launches {
            self.launch(kind, Faction::Enemy, pos, rot, vel, now);
        }
    }

    fn launch(
        &mut self,
        kind: WeaponKind,
        source: Faction,
        origin: Vec2,
        rot: f32,
        firer_vel: Vec2,
        now: u64,
    ) {
        let Some(launch) = kind.launch(origin, rot, firer_vel) else {
            return;
        };
        let tracer = kind == WeaponKind::Gatling && {
            self.gatling_rounds = self.gatling_rounds.wrapping_add(1);
            self.gatling_rounds % GATLING_TRACER_EVERY == 0
        };
        let id = self.next_id();
        self.spawned_actors
            .push(Actor::projectile(id, kind, source, launch, now, tracer));
        self.events.push(SimEvent::WeaponFired(kind));
    }

    fn handle_fire(&mut self, outcome: FireOutcome, now: u64) {
        match outcome {
            FireOutcome::Fired(kind) => {
                let body = &self.player.body;
                let (pos, rot, vel) = (body.pos, body.rot, body.vel);
                self.launch(kind, Faction::Player, pos, rot, vel, now);
            }
            FireOutcome::Overheated => self.warn("WEAPON OVERHEATED", WarningColour::Red),
            FireOutcome::OutOfAmmo { recharges: true } => {
                self.warn("OUT OF AMMUNITION - WAIT FOR RECHARGE", WarningColour::Red)
            }
            FireOutcome::OutOfAmmo { recharges: false } => {
                self.warn("OUT OF AMMUNITION", WarningColour::Red)
            }
            FireOutcome::EmptySlot | FireOutcome::NotReady => {}
        }
    }

    fn resolve_combat(&mut self, now: u64) {
        let report = combat::resolve(
            Arena {
                player: &mut self.player,
                actors: &mut self.actors,
                junk: &mut self.junk,
                wreckage: &mut self.wreckage,
            },
            &self.config,
            &mut self.rng,
        );

        self.player.add_score(report.score);
        for (pos, size) in report.explosions {
            self.explode(pos, size, now);
        }
        for _ in 0..report.enemies_destroyed {
            self.events.push(SimEvent::EnemyDestroyed);
        }
        self.junk.extend(report.debris);
        self.wreckage.extend(report.wreckage);
    }

    fn explode(&mut self, pos: Vec2, size: ExplosionSize, now: u64) {
        self.explosions.push(Explosion {
            pos,
            size,
            started_ms: now,
        });
        self.events.push(SimEvent::Explosion { pos, size });
    }

    fn lifecycle(&mut self, now: u64) {
        if self.player.is_destroyed() && !self.player.is_hidden() {
            self.player_destroyed(now);
        }

        self.actors.retain(|a| a.alive);
        self.junk.retain(|b| b.alive);
        self.wreckage.retain(|b| b.alive);
        if let Some(id) = self.supply_ship {
            if !self.actors.iter().any(|a| a.id == id) {
                debug!("Supply ship left the arena");
                self.supply_ship = None;
            }
        }

        let level = level_for_score(self.player.score);
        if level != self.player.level {
            if level > self.player.level {
                info!("Level {level} reached");
                self.events.push(SimEvent::LevelUp(level));
            }
            self.player.level = level;
        }
        self.highscore = self.highscore.max(self.player.score);
    }

    fn player_destroyed(&mut self, now: u64) {
        let pos = self.player.body.pos;
        self.explode(pos, ExplosionSize::Death, now);
        self.leave_supply_run();

        match self.player.lose_life(now, &self.config) {
            LifeLost::Respawning(lives) => {
                info!("Player destroyed, {lives} lives remaining");
                self.events.push(SimEvent::PlayerDestroyed { lives_left: lives });
                let text = if lives == 1 {
                    "1 LIFE REMAINING".to_string()
                } else {
                    format!("{lives} LIVES REMAINING")
                };
                self.warn(text, WarningColour::Red);
                self.clear_transients();
            }
            LifeLost::GameOver => {
                info!("Game over with score {}", self.player.score);
                self.events.push(SimEvent::PlayerDestroyed { lives_left: 0 });
                self.highscore = self.highscore.max(self.player.score);
                self.set_state(GameState::GameOver);
                self.save_game();
            }
        }
    }

    /// Clear enemies, rounds and hazards; the supply ship stays.
    fn clear_transients(&mut self) {
        self.actors
            .retain(|a| matches!(a.kind, ActorKind::SupplyShip));
        self.junk.clear();
        self.wreckage.clear();
        self.input.trigger_held = false;
    }

    fn expire_transients(&mut self, now: u64) {
        self.explosions.retain(|e| !e.expired(now));
        if self.warning.as_ref().is_some_and(|w| now > w.expires_ms) {
            self.warning = None;
        }
    }

    // ── Supply runs ───────────────────────────────────────────────────────

    fn summon_supply_ship(&mut self) {
        if self.player.docked {
            return;
        }
        let ship_id = match self.supply_ship {
            Some(id) => id,
            None => {
                let id = self.next_id();
                let spot = parking_spot(&self.config, &mut self.rng);
                self.actors.push(spawn_supply_ship(id, spot));
                self.supply_ship = Some(id);
                id
            }
        };
        if let Some(ship) = self.actors.iter_mut().find(|a| a.id == ship_id) {
            summon(ship);
        }
        self.doing_supply = true;
        info!("Supply ship summoned");
        self.warn("SUPPLY SHIP INBOUND", WarningColour::Green);
        self.events.push(SimEvent::SupplyShipInbound);
    }

    fn dock(&mut self) {
        if self.player.docked {
            return;
        }
        let Some(ship_pos) = self.supply_ship().map(|s| s.body.pos) else {
            return;
        };
        match check_docking(
            ship_pos,
            self.player.body.pos,
            self.player.weapons_hot,
            self.config.docking_proximity,
        ) {
            Ok(()) => {
                self.player.docked = true;
                self.player.accelerate(0.0, 0.0, 0.0);
                if let Some(id) = self.supply_ship {
                    if let Some(ship) = self.actors.iter_mut().find(|a| a.id == id) {
                        ship.steering = Steering::passive(Vec2::ZERO)
                            .with_profile(ship.steering.profile);
                        ship.body.vel = Vec2::ZERO;
                        ship.body.acc = Vec2::ZERO;
                    }
                }
                info!("Docked with supply ship");
                self.warn("DOCKED WITH SUPPLY SHIP", WarningColour::Green);
                self.events.push(SimEvent::Docked);
            }
            Err(refusal) => self.warn(refusal.warning(), WarningColour::Amber),
        }
    }

    fn undock(&mut self) {
        if !self.player.docked {
            return;
        }
        self.leave_supply_run();
        info!("Undocked");
        self.warn("SUPPLY SHIP UNDOCKED", WarningColour::Green);
        self.events.push(SimEvent::Undocked);
    }

    /// Release the player and send the ship back to a parking spot.
    fn leave_supply_run(&mut self) {
        self.player.docked = false;
        self.armoury = None;
        self.doing_supply = false;
        let spot = parking_spot(&self.config, &mut self.rng);
        if let Some(id) = self.supply_ship {
            if let Some(ship) = self.actors.iter_mut().find(|a| a.id == id) {
                ship.park(spot);
            }
        }
    }

    fn commit_armoury(&mut self) -> SimResult<()> {
        let Some(armoury) = self.armoury.as_ref() else {
            return Err(SimError::NotDocked);
        };
        let (slots, cost) = armoury.commit(self.player.score)?;
        self.player.payload.replace_slots(slots);
        self.player.add_score(-i64::from(cost));
        self.armoury = None;
        info!("Armoury trade committed for {cost} points");
        self.warn(
            format!("WEAPONS UPDATED, {cost} POINTS DEDUCTED"),
            WarningColour::Green,
        );
        self.events.push(SimEvent::Traded { cost });
        Ok(())
    }

    fn apply_payload(&mut self, classes: &[WeaponKind]) -> SimResult<()> {
        if !self.player.docked {
            return Err(SimError::NotDocked);
        }
        let mut armoury = Armoury::open(self.player.payload.slots());
        for (slot, class) in classes.iter().enumerate() {
            armoury.substitute(slot, *class)?;
        }
        self.armoury = Some(armoury);
        self.commit_armoury()
    }

    // ── Persistence ───────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SaveSnapshot {
        SaveSnapshot {
            version: SAVE_VERSION,
            saved_at_unix: save::current_unix_timestamp(),
            gamestate: self.state,
            highscore: self.highscore.max(self.player.score),
            score: self.player.score,
            lives: self.player.lives,
            level: self.player.level,
            shield: self.player.shield,
            selected_weapon: self.player.payload.selected_index(),
            weapons: self.player.payload.slots().to_vec(),
        }
    }

    /// Resume from `snapshot` in a clean arena.
    pub fn restore(&mut self, snapshot: &SaveSnapshot) {
        self.reset_world();
        self.set_highscore(snapshot.highscore);
        let mut payload = Payload::from_entries(snapshot.weapons.clone());
        payload.select(snapshot.selected_weapon);
        self.player.restore(
            snapshot.level,
            snapshot.score,
            snapshot.shield,
            snapshot.lives,
            payload,
        );
    }

    fn save_path(&self) -> PathBuf {
        PathBuf::from(&self.config.save_path)
    }

    fn save_game(&mut self) {
        let path = self.save_path();
        match save::write_snapshot(&path, &self.snapshot()) {
            Ok(()) => {
                info!("Saved game to {}", path.display());
                self.events.push(SimEvent::Saved);
            }
            Err(e) => {
                warn!("Failed to save game: {e}");
                self.warn("SAVE FAILED", WarningColour::Red);
            }
        }
    }

    /// Restore the saved game, or start fresh when there is nothing usable.
    fn restart(&mut self) {
        match save::load_snapshot(&self.save_path()) {
            Ok(Some(snapshot)) if snapshot.lives > 0 => {
                info!("Restarting from saved game");
                self.restore(&snapshot);
            }
            Ok(Some(snapshot)) => {
                self.set_highscore(snapshot.highscore);
                self.reset_world();
            }
            Ok(None) => self.reset_world(),
            Err(e) => {
                warn!("Ignoring unusable save: {e}");
                self.reset_world();
            }
        }
        self.set_state(GameState::Playing);
    }

    /// Fresh player and empty arena; the clock and high score carry on.
    fn reset_world(&mut self) {
        self.player = Player::new(&self.config);
        self.actors.clear();
        self.junk.clear();
        self.wreckage.clear();
        self.explosions.clear();
        self.spawned_actors.clear();
        self.spawned_junk.clear();
        self.warning = None;
        self.input = InputAxes::default();
        self.supply_ship = None;
        self.doing_supply = false;
        self.armoury = None;
        self.gatling_rounds = 0;
        let now = self.now_ms();
        self.hazards.restart(now);
    }

    /// Spawn a body directly into the arena, bypassing the generators.
    pub fn insert_actor(&mut self, build: impl FnOnce(ActorId) -> Actor) -> ActorId {
        let id = self.next_id();
        self.actors.push(build(id));
        id
    }

    pub fn insert_junk(&mut self, body: PassiveBody) {
        self.junk.push(body);
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Ordering of the per-frame simulation systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Input adapters queue commands.
    Input,
    Tick,
    /// Events and state are published to the rest of the app.
    Publish,
}

/// Runs one simulation tick per frame.
///
/// Uses the [`GameConfig`] resource if one was inserted before the plugin,
/// otherwise loads `assets/game.toml`.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<GameConfig>()
            .cloned()
            .unwrap_or_else(load_game_config);

        let sim = Simulation::new(config);
        let config = sim.config().clone();
        app.insert_resource(sim)
            .insert_resource(config)
            .init_state::<GameState>()
            .add_message::<SimEvent>()
            .configure_sets(Update, (SimSet::Input, SimSet::Tick, SimSet::Publish).chain())
            .add_systems(Startup, load_highscore_system)
            .add_systems(Update, tick_system.in_set(SimSet::Tick))
            .add_systems(
                Update,
                (publish_events_system, sync_state_system).in_set(SimSet::Publish),
            );
    }
}

fn load_highscore_system(mut sim: ResMut<Simulation>) {
    let path = sim.save_path();
    match save::load_snapshot(&path) {
        Ok(Some(snapshot)) => {
            info!("High score {} loaded", snapshot.highscore);
            sim.set_highscore(snapshot.highscore);
        }
        Ok(None) => {}
        Err(e) => warn!("Could not read {}: {e}", path.display()),
    }
}

pub fn tick_system(mut sim: ResMut<Simulation>) {
    sim.tick();
}

pub fn publish_events_system(mut sim: ResMut<Simulation>, mut events: MessageWriter<SimEvent>) {
    for event in sim.drain_events() {
        events.write(event);
    }
}

pub fn sync_state_system(
    sim: Res<Simulation>,
    state: Res<State<GameState>>,
    mut next: ResMut<NextState<GameState>>,
) {
    if *state.get() != sim.state() {
        next.set(sim.state());
    }
}
