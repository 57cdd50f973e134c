//! Demo-mode autopilot
//!
//! Plays the game from the current state: dodges nearby enemies, shoots the
//! closest one, fetches the powerup when nothing is threatening and rewinds
//! after taking damage.

use glam::Vec2;

use super::ability::AbilityState;
use super::state::{GameState, MoveIntent};
use super::tick::{Edge, TickInput};
use crate::consts::*;
use crate::{normalize_or_zero, screen_size};

/// Enemies closer than this are dodged
const DANGER_RADIUS: f32 = 160.0;
/// Walls closer than this push the autopilot back toward the middle
const WALL_MARGIN: f32 = 70.0;
/// Threshold for turning a direction into 8-way key presses (~sin 22.5°)
const AXIS_THRESHOLD: f32 = 0.38;

/// Convert a desired direction into held movement keys
pub fn intent_toward(dir: Vec2) -> MoveIntent {
    let d = normalize_or_zero(dir);
    MoveIntent {
        up: d.y < -AXIS_THRESHOLD,
        down: d.y > AXIS_THRESHOLD,
        left: d.x < -AXIS_THRESHOLD,
        right: d.x > AXIS_THRESHOLD,
    }
}

/// Choose this tick's input for the current state
pub fn autopilot_input(state: &GameState, now_ms: u64) -> TickInput {
    let mut input = TickInput {
        now_ms,
        aim: state.player.pos,
        ..Default::default()
    };

    if state.is_game_over() {
        input.edges.push(Edge::Restart);
        return input;
    }

    let player = state.player.pos;

    let nearest = state
        .enemies
        .iter()
        .min_by(|a, b| {
            a.pos
                .distance_squared(player)
                .partial_cmp(&b.pos.distance_squared(player))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.pos);
    if let Some(target) = nearest {
        input.aim = target;
        input.fire_held = true;
    }

    // Inverse-square push away from every close enemy
    let mut flee = Vec2::ZERO;
    for enemy in &state.enemies {
        let away = player - enemy.pos;
        let dist = away.length();
        if dist > 0.0 && dist < DANGER_RADIUS {
            flee += away / (dist * dist);
        }
    }
    let threatened = flee != Vec2::ZERO;

    let desired = if threatened {
        flee.normalize_or_zero() + wall_push(player) * 0.8
    } else if let Some(powerup) = state.powerups.first() {
        powerup.pos - player
    } else {
        let center = screen_size() / 2.0;
        if player.distance(center) > 100.0 {
            center - player
        } else {
            Vec2::ZERO
        }
    };
    input.movement = intent_toward(desired);

    let hurt = state.player.hp < PLAYER_MAX_HP;
    let enough_history = state.history.window(now_ms, REWIND_DURATION_MS).count() >= 2;
    if matches!(state.ability, AbilityState::Ready) && hurt && enough_history {
        input.edges.push(Edge::Rewind);
    }

    input
}

/// Unit-ish vector pointing away from walls the player is close to
fn wall_push(pos: Vec2) -> Vec2 {
    let size = screen_size();
    let mut push = Vec2::ZERO;
    if pos.x < WALL_MARGIN {
        push.x += 1.0;
    }
    if pos.x > size.x - WALL_MARGIN {
        push.x -= 1.0;
    }
    if pos.y < WALL_MARGIN {
        push.y += 1.0;
    }
    if pos.y > size.y - WALL_MARGIN {
        push.y -= 1.0;
    }
    push
}
