//! Neon Arena entry point
//!
//! Runs the game headless with the autopilot at the controls, restarting
//! after every game over until the demo time runs out.

use std::time::{SystemTime, UNIX_EPOCH};

use neon_arena::Game;
use neon_arena::assets::AssetBundle;
use neon_arena::audio::{AudioManager, HeadlessBackend};
use neon_arena::consts::TARGET_FPS;
use neon_arena::game::{Autopilot, RunLimit};
use neon_arena::platform::{FramePacer, SystemClock};
use neon_arena::renderer::HeadlessRenderer;
use neon_arena::settings::Settings;

fn main() {
    env_logger::init();

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log::error!("{}", info);
        default_hook(info);
    }));

    log::info!("Neon Arena (headless) starting...");

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or_else(time_seed);

    let assets = AssetBundle::load(&settings);
    let audio = AudioManager::new(HeadlessBackend::open(), &settings);
    let renderer = HeadlessRenderer::new(assets, &settings);
    let mut game = Game::new(seed, &settings, renderer, audio);

    let limit = RunLimit {
        max_frames: None,
        max_ms: Some(settings.demo_seconds.saturating_mul(1000)),
    };
    let clock = SystemClock::new();
    let mut pacer = FramePacer::new(TARGET_FPS);
    let summary = game.run(&mut Autopilot, &clock, &mut pacer, limit);

    log::info!(
        "Demo finished: {} frames, {} games over, best score {}, final score {}",
        summary.frames,
        summary.games_over,
        summary.best_score,
        summary.final_score
    );
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
