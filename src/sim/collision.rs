//! Collision resolution and scoring
//!
//! Three passes run in a fixed order each normal tick:
//! bullets vs enemies, enemies vs player, player vs powerups. Each pass
//! marks hits first and compacts the entity lists afterwards, so an enemy
//! removed in the first pass is never seen by the second.

use super::state::{Bullet, Enemy, GameEvent, GamePhase, GameState, Player, Powerup};
use crate::consts::KILL_SCORE;

/// Summary of one collision step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub kills: u32,
    pub player_hits: u32,
    pub powerups_collected: u32,
    pub game_over: bool,
}

/// Run all collision passes against the session and apply their effects
pub fn resolve_collisions(state: &mut GameState, now_ms: u64) -> CollisionReport {
    let mut report = CollisionReport::default();

    report.kills = bullets_vs_enemies(&mut state.enemies, &mut state.bullets);
    if report.kills > 0 {
        state.score += u64::from(report.kills) * KILL_SCORE;
        for _ in 0..report.kills {
            state.push_event(GameEvent::EnemyKilled);
        }
    }

    let contact = enemies_vs_player(&mut state.enemies, &mut state.player);
    report.player_hits = contact.hits;
    for hp in contact.hp_after_hits {
        state.push_event(GameEvent::PlayerHit { hp });
    }
    if contact.killed {
        report.game_over = true;
        state.phase = GamePhase::GameOver;
        state.push_event(GameEvent::GameOver { score: state.score });
        log::info!("Game over with score {}", state.score);
        return report;
    }

    report.powerups_collected = player_vs_powerups(&mut state.powerups, &state.player);
    for _ in 0..report.powerups_collected {
        state.ability.begin_charge(now_ms, &mut state.history);
        state.push_event(GameEvent::PowerupCollected);
    }

    report
}

/// Each enemy consumes at most the first overlapping bullet (creation
/// order). Returns the number of enemies destroyed.
pub fn bullets_vs_enemies(enemies: &mut Vec<Enemy>, bullets: &mut Vec<Bullet>) -> u32 {
    let mut bullet_used = vec![false; bullets.len()];
    let mut enemy_dead = vec![false; enemies.len()];
    let mut kills = 0;

    for (ei, enemy) in enemies.iter().enumerate() {
        let hit = bullets
            .iter()
            .enumerate()
            .find(|(bi, bullet)| !bullet_used[*bi] && enemy.collides_with_bullet(bullet))
            .map(|(bi, _)| bi);
        if let Some(bi) = hit {
            bullet_used[bi] = true;
            enemy_dead[ei] = true;
            kills += 1;
        }
    }

    compact(enemies, &enemy_dead);
    compact(bullets, &bullet_used);
    kills
}

/// Outcome of the enemy-vs-player pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerContact {
    pub hits: u32,
    /// Player hp after each hit, in order
    pub hp_after_hits: Vec<i32>,
    /// The player's hp reached zero
    pub killed: bool,
}

/// Every overlapping enemy is destroyed and costs one hp. Stops at the hit
/// that ends the run; later enemies are left untouched.
pub fn enemies_vs_player(enemies: &mut Vec<Enemy>, player: &mut Player) -> PlayerContact {
    let mut contact = PlayerContact::default();
    let mut dead = vec![false; enemies.len()];

    for (i, enemy) in enemies.iter().enumerate() {
        if !enemy.collides_with_player(player) {
            continue;
        }
        dead[i] = true;
        player.hp -= 1;
        contact.hits += 1;
        contact.hp_after_hits.push(player.hp);
        if !player.is_alive() {
            contact.killed = true;
            break;
        }
    }

    compact(enemies, &dead);
    contact
}

/// Remove every powerup touching the player, returning how many were taken
pub fn player_vs_powerups(powerups: &mut Vec<Powerup>, player: &Player) -> u32 {
    let before = powerups.len();
    powerups.retain(|p| !p.collides_with_player(player));
    (before - powerups.len()) as u32
}

/// Drop the items whose mark is set, preserving the order of the rest
fn compact<T>(items: &mut Vec<T>, marked: &[bool]) {
    let mut i = 0;
    items.retain(|_| {
        let keep = !marked[i];
        i += 1;
        keep
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::ability::AbilityState;
    use glam::Vec2;

    fn bullet_at(x: f32, y: f32) -> Bullet {
        let mut b = Bullet::new(Vec2::ZERO, Vec2::X);
        b.pos = Vec2::new(x, y);
        b
    }

    #[test]
    fn test_bullet_kills_enemy_and_scores() {
        let mut state = GameState::new(1);
        state.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), 2.0));
        state
            .bullets
            .push(bullet_at(100.0 + ENEMY_RADIUS + BULLET_RADIUS - 0.5, 100.0));

        let report = resolve_collisions(&mut state, 0);

        assert_eq!(report.kills, 1);
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, 10);
        assert_eq!(state.pending_events(), &[GameEvent::EnemyKilled]);
    }

    #[test]
    fn test_touching_is_not_a_hit() {
        let mut enemies = vec![Enemy::new(Vec2::new(100.0, 100.0), 2.0)];
        let mut bullets = vec![bullet_at(100.0 + ENEMY_RADIUS + BULLET_RADIUS, 100.0)];
        assert_eq!(bullets_vs_enemies(&mut enemies, &mut bullets), 0);
        assert_eq!(enemies.len(), 1);
        assert_eq!(bullets.len(), 1);
    }

    #[test]
    fn test_one_bullet_per_enemy_first_match_wins() {
        let mut enemies = vec![Enemy::new(Vec2::new(100.0, 100.0), 2.0)];
        let mut bullets = vec![
            bullet_at(400.0, 400.0),
            bullet_at(101.0, 100.0),
            bullet_at(99.0, 100.0),
        ];
        assert_eq!(bullets_vs_enemies(&mut enemies, &mut bullets), 1);
        assert!(enemies.is_empty());
        // The first overlapping bullet was consumed, the second survives
        assert_eq!(bullets.len(), 2);
        assert_eq!(bullets[0].pos, Vec2::new(400.0, 400.0));
        assert_eq!(bullets[1].pos, Vec2::new(99.0, 100.0));
    }

    #[test]
    fn test_shared_bullet_is_not_reused() {
        // Two enemies overlapping a single bullet: only the first dies
        let mut enemies = vec![
            Enemy::new(Vec2::new(100.0, 100.0), 2.0),
            Enemy::new(Vec2::new(110.0, 100.0), 2.0),
        ];
        let mut bullets = vec![bullet_at(105.0, 100.0)];
        assert_eq!(bullets_vs_enemies(&mut enemies, &mut bullets), 1);
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].pos, Vec2::new(110.0, 100.0));
    }

    #[test]
    fn test_killed_enemy_does_not_hurt_player() {
        let mut state = GameState::new(1);
        let pos = state.player.pos;
        state.enemies.push(Enemy::new(pos, 2.0));
        state.bullets.push(bullet_at(pos.x, pos.y));

        let report = resolve_collisions(&mut state, 0);

        assert_eq!(report.kills, 1);
        assert_eq!(report.player_hits, 0);
        assert_eq!(state.player.hp, PLAYER_MAX_HP);
    }

    #[test]
    fn test_enemy_contact_costs_hp() {
        let mut state = GameState::new(1);
        let pos = state.player.pos;
        state.enemies.push(Enemy::new(pos + Vec2::new(10.0, 0.0), 2.0));
        state.enemies.push(Enemy::new(Vec2::new(5.0, 5.0), 2.0));

        let report = resolve_collisions(&mut state, 0);

        assert_eq!(report.player_hits, 1);
        assert_eq!(state.player.hp, PLAYER_MAX_HP - 1);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(
            state.pending_events(),
            &[GameEvent::PlayerHit { hp: PLAYER_MAX_HP - 1 }]
        );
    }

    #[test]
    fn test_lethal_hit_stops_processing() {
        let mut state = GameState::new(1);
        state.player.hp = 1;
        let pos = state.player.pos;
        state.enemies.push(Enemy::new(pos, 2.0));
        state.enemies.push(Enemy::new(pos, 2.0));
        state.powerups.push(Powerup::new(pos));

        let report = resolve_collisions(&mut state, 0);

        assert!(report.game_over);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.hp, 0);
        // Second enemy and the powerup were not processed
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.powerups.len(), 1);
        assert_eq!(state.ability, AbilityState::Idle);
    }

    #[test]
    fn test_powerup_pickup_starts_charging() {
        let mut state = GameState::new(1);
        state.history.push(state.player_snapshot(10));
        let pos = state.player.pos;
        state.powerups.push(Powerup::new(pos + Vec2::new(0.0, 20.0)));

        let report = resolve_collisions(&mut state, 250);

        assert_eq!(report.powerups_collected, 1);
        assert!(state.powerups.is_empty());
        assert_eq!(state.ability, AbilityState::Charging { start_ms: 250 });
        assert!(state.history.is_empty());
        assert_eq!(state.pending_events(), &[GameEvent::PowerupCollected]);
    }
}
