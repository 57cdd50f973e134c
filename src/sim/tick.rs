//! Per-tick simulation step
//!
//! Speeds are per tick, not per second: the simulation advances one step per
//! rendered frame and timers compare wall-clock milliseconds carried in the
//! input.

use glam::Vec2;
use rand::Rng;

use super::ability::{AbilityState, Activation};
use super::collision::resolve_collisions;
use super::state::{Bullet, Enemy, GameEvent, GameState, MoveIntent, Powerup};
use crate::consts::*;

/// A one-shot input. Edges are applied in the order they arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Fire button clicked
    Fire,
    /// Rewind key pressed
    Rewind,
    /// Restart key pressed
    Restart,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Wall-clock time of this tick in milliseconds
    pub now_ms: u64,
    /// Held movement keys
    pub movement: MoveIntent,
    /// Aim point in playfield coordinates
    pub aim: Vec2,
    /// Fire key held (auto-fire, subject to cooldown)
    pub fire_held: bool,
    /// Edges seen since the previous tick, oldest first
    pub edges: Vec<Edge>,
}

impl TickInput {
    pub fn pressed(&self, edge: Edge) -> bool {
        self.edges.contains(&edge)
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    let now = input.now_ms;

    for &edge in &input.edges {
        apply_edge(state, edge, input.aim, now);
    }

    if state.is_game_over() {
        return;
    }

    if state.ability.is_rewinding() {
        advance_rewind(state, now);
    } else {
        advance_play(state, input, now);
    }
}

fn apply_edge(state: &mut GameState, edge: Edge, aim: Vec2, now: u64) {
    match edge {
        Edge::Restart => {
            if state.is_game_over() {
                state.restart(now);
            }
        }
        Edge::Rewind => {
            if state.is_game_over() {
                return;
            }
            match state.ability.try_activate(now, &state.history) {
                Activation::Started { frames } => {
                    state.push_event(GameEvent::RewindStarted { frames });
                }
                Activation::NotEnoughHistory { qualifying } => {
                    state.push_event(GameEvent::RewindRejected { qualifying });
                }
                Activation::NotReady => {}
            }
        }
        Edge::Fire => {
            if !state.is_game_over() && !state.ability.is_rewinding() {
                try_fire(state, aim, now);
            }
        }
    }
}

/// Normal gameplay step
fn advance_play(state: &mut GameState, input: &TickInput, now: u64) {
    if state.ability.update_charge(now) {
        state.push_event(GameEvent::AbilityReady);
    }

    if input.fire_held {
        try_fire(state, input.aim, now);
    }

    if now.saturating_sub(state.last_enemy_spawn_ms) >= ENEMY_SPAWN_INTERVAL_MS {
        let enemy = Enemy::spawn(&mut state.rng);
        log::debug!("Enemy spawned at {:?} (speed {:.2})", enemy.pos, enemy.speed);
        state.enemies.push(enemy);
        state.last_enemy_spawn_ms = now;
    }

    maybe_spawn_powerup(state, now);

    state.player.apply_move(input.movement);
    advance_projectiles_and_enemies(state);

    resolve_collisions(state, now);

    let snapshot = state.player_snapshot(now);
    state.history.record(snapshot);
}

/// Rewind animation step: the player follows the captured frames, everything
/// else keeps moving, nothing can hurt the player and nothing is recorded.
fn advance_rewind(state: &mut GameState, now: u64) {
    let Some(rewind) = state.ability.rewind() else {
        return;
    };
    let frame = rewind.current_frame(now);
    let finished = rewind.is_finished(now);
    let oldest = rewind.oldest();

    if let Some(frame) = frame {
        state.player.pos = frame.pos;
    }

    advance_projectiles_and_enemies(state);

    if finished {
        if let Some(oldest) = oldest {
            state.player.pos = oldest.pos;
            state.player.hp = oldest.hp;
        }
        state.ability = AbilityState::Idle;
        let snapshot = state.player_snapshot(now);
        state.history.reset_to(snapshot);
        state.push_event(GameEvent::RewindFinished);
        log::info!(
            "Rewind finished at {:?} with {} hp",
            state.player.pos,
            state.player.hp
        );
    }
}

fn advance_projectiles_and_enemies(state: &mut GameState) {
    for bullet in &mut state.bullets {
        bullet.update();
    }
    state.bullets.retain(|b| !b.off_screen());

    let target = state.player.pos;
    for enemy in &mut state.enemies {
        enemy.update(target);
    }
}

/// Fire toward `aim` if the cooldown has elapsed
fn try_fire(state: &mut GameState, aim: Vec2, now: u64) -> bool {
    if now.saturating_sub(state.last_shot_ms) < BULLET_COOLDOWN_MS {
        return false;
    }
    state.bullets.push(Bullet::new(state.player.pos, aim));
    state.last_shot_ms = now;
    state.push_event(GameEvent::Shot);
    true
}

/// A powerup may appear only while the ability is idle and none exists.
/// Every elapsed interval consumes one roll, successful or not.
fn maybe_spawn_powerup(state: &mut GameState, now: u64) {
    if !state.ability.is_idle() || !state.powerups.is_empty() {
        return;
    }
    if now.saturating_sub(state.last_powerup_roll_ms) < POWERUP_SPAWN_INTERVAL_MS {
        return;
    }
    if state.rng.random_bool(POWERUP_SPAWN_CHANCE) {
        let powerup = Powerup::spawn(&mut state.rng);
        log::debug!("Powerup spawned at {:?}", powerup.pos);
        state.powerups.push(powerup);
    }
    state.last_powerup_roll_ms = now;
}
