//! Rendering contract
//!
//! The simulation never draws. Once per frame the orchestrator hands a
//! read-only view of the session to a [`Renderer`] through [`render_frame`].

pub mod headless;

pub use headless::{DrawStyle, DrawnEntity, FrameRecord, HeadlessRenderer};

use glam::Vec2;

use crate::consts::PLAYER_MAX_HP;
use crate::sim::GameState;

/// What kind of entity a draw call is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Enemy,
    Powerup,
    Bullet,
}

/// Controls hint shown at the bottom of the HUD
pub const CONTROLS_HINT: &str = "WASD move, mouse aim, click/SPACE shoot, E rewind";

/// Drawing surface used by the game loop
pub trait Renderer {
    /// Start a new frame
    fn begin_frame(&mut self) {}

    /// Draw one entity. `glow` is only ever set for the rewinding player.
    fn draw_entity(&mut self, kind: EntityKind, pos: Vec2, radius: f32, glow: bool);

    /// Health, score and ability line
    fn render_hud(&mut self, hp: i32, max_hp: i32, score: u64, ability_status: &str);

    /// Overlay shown while waiting for a restart
    fn render_game_over(&mut self, score: u64);

    /// Present the frame
    fn end_frame(&mut self) {}
}

/// Draw the whole session: bullets, enemies, powerups, player, HUD, overlay
pub fn render_frame<R: Renderer + ?Sized>(
    renderer: &mut R,
    state: &GameState,
    now_ms: u64,
    glow_enabled: bool,
) {
    renderer.begin_frame();

    for bullet in &state.bullets {
        renderer.draw_entity(EntityKind::Bullet, bullet.pos, bullet.radius, false);
    }
    for enemy in &state.enemies {
        renderer.draw_entity(EntityKind::Enemy, enemy.pos, enemy.radius, false);
    }
    for powerup in &state.powerups {
        renderer.draw_entity(EntityKind::Powerup, powerup.pos, powerup.radius, false);
    }

    let glow = glow_enabled && state.ability.is_rewinding();
    renderer.draw_entity(
        EntityKind::Player,
        state.player.pos,
        state.player.radius,
        glow,
    );

    renderer.render_hud(
        state.player.hp,
        PLAYER_MAX_HP,
        state.score,
        &state.ability.status_text(now_ms),
    );

    if state.is_game_over() {
        renderer.render_game_over(state.score);
    }

    renderer.end_frame();
}

/// HUD text lines, top to bottom. The controls hint is always last.
pub fn hud_lines(hp: i32, max_hp: i32, score: u64, ability_status: &str) -> Vec<String> {
    let mut lines = vec![format!("HP: {}/{}", hp, max_hp), format!("Score: {}", score)];
    if !ability_status.is_empty() {
        lines.push(ability_status.to_string());
    }
    lines.push(CONTROLS_HINT.to_string());
    lines
}

/// Game-over overlay text lines, top to bottom
pub fn game_over_lines(score: u64) -> [String; 3] {
    [
        "GAME OVER".to_string(),
        format!("Score: {}", score),
        "Press R to restart or ESC to quit".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{AbilityState, Bullet, Enemy, GamePhase, Powerup, Rewind, RewindFrame};

    #[derive(Default)]
    struct CallLog {
        entities: Vec<(EntityKind, bool)>,
        hud: Vec<String>,
        game_over: Option<u64>,
    }

    impl Renderer for CallLog {
        fn draw_entity(&mut self, kind: EntityKind, _pos: Vec2, _radius: f32, glow: bool) {
            self.entities.push((kind, glow));
        }

        fn render_hud(&mut self, hp: i32, max_hp: i32, score: u64, ability_status: &str) {
            self.hud = hud_lines(hp, max_hp, score, ability_status);
        }

        fn render_game_over(&mut self, score: u64) {
            self.game_over = Some(score);
        }
    }

    #[test]
    fn test_frame_draw_order() {
        let mut state = GameState::new(1);
        state.bullets.push(Bullet::new(Vec2::ZERO, Vec2::X));
        state.enemies.push(Enemy::new(Vec2::ZERO, 2.0));
        state.powerups.push(Powerup::new(Vec2::new(50.0, 50.0)));

        let mut log = CallLog::default();
        render_frame(&mut log, &state, 0, true);

        let kinds: Vec<EntityKind> = log.entities.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                EntityKind::Bullet,
                EntityKind::Enemy,
                EntityKind::Powerup,
                EntityKind::Player
            ]
        );
        assert!(log.entities.iter().all(|(_, glow)| !glow));
        assert_eq!(
            log.hud,
            vec![
                "HP: 5/5".to_string(),
                "Score: 0".to_string(),
                CONTROLS_HINT.to_string()
            ]
        );
        assert_eq!(log.game_over, None);
    }

    #[test]
    fn test_player_glows_only_while_rewinding() {
        let mut state = GameState::new(1);
        let frame = RewindFrame {
            pos: state.player.pos,
            hp: 5,
        };
        state.ability = AbilityState::Rewinding(Rewind {
            start_ms: 0,
            frames: vec![frame, frame],
        });

        let mut log = CallLog::default();
        render_frame(&mut log, &state, 100, true);
        assert_eq!(log.entities.last(), Some(&(EntityKind::Player, true)));
        assert_eq!(log.hud[2], "REWIND ACTIVE");

        let mut log = CallLog::default();
        render_frame(&mut log, &state, 100, false);
        assert_eq!(log.entities.last(), Some(&(EntityKind::Player, false)));
    }

    #[test]
    fn test_game_over_overlay() {
        let mut state = GameState::new(1);
        state.phase = GamePhase::GameOver;
        state.score = 40;
        let mut log = CallLog::default();
        render_frame(&mut log, &state, 0, true);
        assert_eq!(log.game_over, Some(40));
        assert_eq!(game_over_lines(40)[1], "Score: 40");
    }
}
