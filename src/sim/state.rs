//! Game state and entity models
//!
//! Everything a session owns lives in [`GameState`]; subsystems receive it
//! explicitly instead of reaching for globals.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::ability::AbilityState;
use super::history::{HistoryBuffer, HistoryEntry};
use crate::consts::*;
use crate::{circles_overlap, clamp_to_bounds, normalize_or_zero, screen_size};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player ran out of hp, waiting for restart
    GameOver,
}

/// Something that happened during a tick that the outside world may react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A bullet was fired
    Shot,
    /// A bullet destroyed an enemy
    EnemyKilled,
    /// An enemy reached the player
    PlayerHit { hp: i32 },
    /// The rewind powerup was picked up
    PowerupCollected,
    /// Charging finished
    AbilityReady,
    /// Activation was refused for lack of history
    RewindRejected { qualifying: usize },
    /// Rewind animation began
    RewindStarted { frames: usize },
    /// Rewind animation ended and the player was restored
    RewindFinished,
    /// The run ended
    GameOver { score: u64 },
    /// A new run started
    Restarted,
}

/// Held movement keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    /// Raw (unnormalized) direction, screen coordinates (y grows downward)
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir
    }
}

/// The player's avatar
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Pixels per tick
    pub speed: f32,
    pub hp: i32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
            hp: PLAYER_MAX_HP,
        }
    }

    /// Spawn in the middle of the playfield
    pub fn centered() -> Self {
        Self::new(screen_size() / 2.0)
    }

    /// Move one tick along the intent, then clamp inside the playfield
    pub fn apply_move(&mut self, intent: MoveIntent) {
        let dir = normalize_or_zero(intent.direction());
        self.pos += dir * self.speed;
        self.pos = clamp_to_bounds(self.pos, self.radius, screen_size());
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// A projectile fired by the player
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Bullet {
    /// Fire from `origin` toward `aim`. A zero-length aim keeps the raw
    /// (zero) direction instead of dividing by zero.
    pub fn new(origin: Vec2, aim: Vec2) -> Self {
        let dir = aim - origin;
        let mut len = dir.length();
        if len == 0.0 {
            len = 1.0;
        }
        Self {
            pos: origin,
            vel: dir / len * BULLET_SPEED,
            radius: BULLET_RADIUS,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
    }

    /// True once the bullet has fully left the playfield
    pub fn off_screen(&self) -> bool {
        let size = screen_size();
        self.pos.x < -self.radius
            || self.pos.x > size.x + self.radius
            || self.pos.y < -self.radius
            || self.pos.y > size.y + self.radius
    }
}

/// Screen edge an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl SpawnSide {
    pub const ALL: [SpawnSide; 4] = [
        SpawnSide::Top,
        SpawnSide::Bottom,
        SpawnSide::Left,
        SpawnSide::Right,
    ];
}

/// A homing enemy
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub pos: Vec2,
    pub radius: f32,
    /// Pixels per tick
    pub speed: f32,
}

impl Enemy {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            radius: ENEMY_RADIUS,
            speed,
        }
    }

    /// Spawn just outside a random screen edge with a random speed
    pub fn spawn(rng: &mut Pcg32) -> Self {
        let side = SpawnSide::ALL[rng.random_range(0..SpawnSide::ALL.len())];
        let pos = Self::spawn_position(side, rng);
        let speed = rng.random_range(ENEMY_SPEED_MIN..=ENEMY_SPEED_MAX);
        Self::new(pos, speed)
    }

    fn spawn_position(side: SpawnSide, rng: &mut Pcg32) -> Vec2 {
        let offset = ENEMY_RADIUS * 2.0;
        let along_x = rng.random_range(0..=SCREEN_WIDTH as i32) as f32;
        let along_y = rng.random_range(0..=SCREEN_HEIGHT as i32) as f32;
        match side {
            SpawnSide::Top => Vec2::new(along_x, -offset),
            SpawnSide::Bottom => Vec2::new(along_x, SCREEN_HEIGHT + offset),
            SpawnSide::Left => Vec2::new(-offset, along_y),
            SpawnSide::Right => Vec2::new(SCREEN_WIDTH + offset, along_y),
        }
    }

    /// Pure pursuit: step straight toward `target`, recomputed every tick
    pub fn update(&mut self, target: Vec2) {
        let delta = target - self.pos;
        let dist = delta.length();
        if dist == 0.0 {
            return;
        }
        self.pos += delta / dist * self.speed;
    }

    pub fn collides_with_player(&self, player: &Player) -> bool {
        circles_overlap(self.pos, self.radius, player.pos, player.radius)
    }

    pub fn collides_with_bullet(&self, bullet: &Bullet) -> bool {
        circles_overlap(self.pos, self.radius, bullet.pos, bullet.radius)
    }
}

/// The time-rewind pickup
#[derive(Debug, Clone, PartialEq)]
pub struct Powerup {
    pub pos: Vec2,
    pub radius: f32,
}

impl Powerup {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: POWERUP_RADIUS,
        }
    }

    /// Random position fully inside the playfield
    pub fn spawn(rng: &mut Pcg32) -> Self {
        let r = POWERUP_RADIUS as i32;
        let x = rng.random_range(r..=SCREEN_WIDTH as i32 - r) as f32;
        let y = rng.random_range(r..=SCREEN_HEIGHT as i32 - r) as f32;
        Self::new(Vec2::new(x, y))
    }

    pub fn collides_with_player(&self, player: &Player) -> bool {
        circles_overlap(self.pos, self.radius, player.pos, player.radius)
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn RNG
    pub rng: Pcg32,
    pub score: u64,
    pub phase: GamePhase,
    pub player: Player,
    /// Creation order
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    /// Holds at most one powerup
    pub powerups: Vec<Powerup>,
    pub history: HistoryBuffer,
    pub ability: AbilityState,
    /// Timestamp of the last shot (ms)
    pub last_shot_ms: u64,
    /// Timestamp of the last enemy spawn (ms)
    pub last_enemy_spawn_ms: u64,
    /// Timestamp of the last powerup spawn opportunity (ms)
    pub last_powerup_roll_ms: u64,
    /// Events raised since the last drain
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            phase: GamePhase::Playing,
            player: Player::centered(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            powerups: Vec::new(),
            history: HistoryBuffer::new(),
            ability: AbilityState::Idle,
            last_shot_ms: 0,
            last_enemy_spawn_ms: 0,
            last_powerup_roll_ms: 0,
            events: Vec::new(),
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Start a new run. Spawn timers restart from `now_ms`; the shot
    /// cooldown and RNG carry over.
    pub fn restart(&mut self, now_ms: u64) {
        self.player = Player::centered();
        self.bullets.clear();
        self.enemies.clear();
        self.powerups.clear();
        self.score = 0;
        self.phase = GamePhase::Playing;
        self.ability = AbilityState::Idle;
        self.history.clear();
        self.last_enemy_spawn_ms = now_ms;
        self.last_powerup_roll_ms = now_ms;
        self.push_event(GameEvent::Restarted);
        log::info!("Run restarted (seed {})", self.seed);
    }

    /// Snapshot of the player for the history buffer
    pub fn player_snapshot(&self, now_ms: u64) -> HistoryEntry {
        HistoryEntry {
            timestamp_ms: now_ms,
            pos: self.player.pos,
            hp: self.player.hp,
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events raised since the last drain, without consuming them
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn intent(up: bool, down: bool, left: bool, right: bool) -> MoveIntent {
        MoveIntent {
            up,
            down,
            left,
            right,
        }
    }

    #[test]
    fn test_zero_intent_keeps_position() {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        player.apply_move(MoveIntent::default());
        assert_eq!(player.pos, Vec2::new(100.0, 100.0));

        // Opposing keys cancel out
        player.apply_move(intent(true, true, true, true));
        assert_eq!(player.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_diagonal_move_is_normalized() {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        player.apply_move(intent(true, false, false, true));
        let moved = player.pos - Vec2::new(100.0, 100.0);
        assert!((moved.length() - PLAYER_SPEED).abs() < 1e-4);
        assert!(moved.x > 0.0 && moved.y < 0.0);
    }

    #[test]
    fn test_player_clamped_at_wall() {
        let mut player = Player::new(Vec2::new(PLAYER_RADIUS + 1.0, 300.0));
        player.apply_move(intent(false, false, true, false));
        assert_eq!(player.pos.x, PLAYER_RADIUS);
        assert_eq!(player.hp, PLAYER_MAX_HP);
    }

    #[test]
    fn test_zero_length_bullet_is_defined() {
        let origin = Vec2::new(50.0, 50.0);
        let mut bullet = Bullet::new(origin, origin);
        assert!(bullet.vel.x.is_finite() && bullet.vel.y.is_finite());
        bullet.update();
        assert!(bullet.pos.x.is_finite() && bullet.pos.y.is_finite());
    }

    #[test]
    fn test_bullet_velocity_has_fixed_speed() {
        let bullet = Bullet::new(Vec2::ZERO, Vec2::new(30.0, 40.0));
        assert!((bullet.vel.length() - BULLET_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_bullet_off_screen_is_strict() {
        let mut bullet = Bullet::new(Vec2::ZERO, Vec2::X);
        bullet.pos = Vec2::new(-BULLET_RADIUS, 10.0);
        assert!(!bullet.off_screen());
        bullet.pos = Vec2::new(-BULLET_RADIUS - 0.1, 10.0);
        assert!(bullet.off_screen());
        bullet.pos = Vec2::new(10.0, SCREEN_HEIGHT + BULLET_RADIUS + 0.1);
        assert!(bullet.off_screen());
    }

    #[test]
    fn test_enemy_pursues_player() {
        let mut enemy = Enemy::new(Vec2::new(0.0, 0.0), 2.0);
        enemy.update(Vec2::new(10.0, 0.0));
        assert_eq!(enemy.pos, Vec2::new(2.0, 0.0));

        // Sitting on the target does not produce NaN
        let mut enemy = Enemy::new(Vec2::new(5.0, 5.0), 2.0);
        enemy.update(Vec2::new(5.0, 5.0));
        assert_eq!(enemy.pos, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_enemy_spawns_outside_screen() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let enemy = Enemy::spawn(&mut rng);
            let p = enemy.pos;
            let outside = p.x < 0.0 || p.y < 0.0 || p.x > SCREEN_WIDTH || p.y > SCREEN_HEIGHT;
            assert!(outside, "enemy spawned on screen at {p:?}");
            assert!((ENEMY_SPEED_MIN..=ENEMY_SPEED_MAX).contains(&enemy.speed));
        }
    }

    #[test]
    fn test_powerup_spawns_inside_screen() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..200 {
            let p = Powerup::spawn(&mut rng).pos;
            assert!(p.x >= POWERUP_RADIUS && p.x <= SCREEN_WIDTH - POWERUP_RADIUS);
            assert!(p.y >= POWERUP_RADIUS && p.y <= SCREEN_HEIGHT - POWERUP_RADIUS);
        }
    }

    #[test]
    fn test_restart_resets_session() {
        let mut state = GameState::new(3);
        state.score = 120;
        state.player.hp = 0;
        state.phase = GamePhase::GameOver;
        state.enemies.push(Enemy::new(Vec2::ZERO, 2.0));
        state.bullets.push(Bullet::new(Vec2::ZERO, Vec2::X));
        state.powerups.push(Powerup::new(Vec2::new(50.0, 50.0)));
        state.ability = AbilityState::Ready;
        state.history.push(state.player_snapshot(10));

        state.restart(9000);

        assert_eq!(state.score, 0);
        assert_eq!(state.player.hp, PLAYER_MAX_HP);
        assert!(state.bullets.is_empty() && state.enemies.is_empty() && state.powerups.is_empty());
        assert!(state.history.is_empty());
        assert_eq!(state.ability, AbilityState::Idle);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.last_enemy_spawn_ms, 9000);
        assert_eq!(state.last_powerup_roll_ms, 9000);
    }

    proptest! {
        #[test]
        fn prop_move_displacement_is_speed(
            x in 100.0f32..700.0,
            y in 100.0f32..500.0,
            up: bool, down: bool, left: bool, right: bool,
        ) {
            let intent = intent(up, down, left, right);
            let mut player = Player::new(Vec2::new(x, y));
            player.apply_move(intent);
            let moved = (player.pos - Vec2::new(x, y)).length();
            if intent.direction() == Vec2::ZERO {
                prop_assert_eq!(moved, 0.0);
            } else {
                prop_assert!((moved - PLAYER_SPEED).abs() < 1e-3);
            }
        }

        #[test]
        fn prop_player_stays_in_bounds(
            x in -50.0f32..850.0,
            y in -50.0f32..650.0,
            up: bool, down: bool, left: bool, right: bool,
        ) {
            let mut player = Player::new(Vec2::new(x, y));
            player.apply_move(intent(up, down, left, right));
            let p = player.pos;
            prop_assert!(p.x >= PLAYER_RADIUS && p.x <= SCREEN_WIDTH - PLAYER_RADIUS);
            prop_assert!(p.y >= PLAYER_RADIUS && p.y <= SCREEN_HEIGHT - PLAYER_RADIUS);
        }
    }
}
