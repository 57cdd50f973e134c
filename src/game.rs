//! Game loop orchestrator
//!
//! One frame = poll input, advance the simulation one tick, play the sounds
//! it asked for, draw. Everything runs on the calling thread.

use std::collections::VecDeque;

use crate::audio::AudioManager;
use crate::platform::{Clock, FramePacer, InputEvent, InputState};
use crate::renderer::{Renderer, render_frame};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, autopilot_input, tick};

/// Where a frame's input comes from
pub trait InputSource {
    /// Input for the tick at `now_ms`, or `None` to stop the loop
    fn next_input(&mut self, state: &GameState, now_ms: u64) -> Option<TickInput>;
}

/// Demo mode: the autopilot plays
#[derive(Debug, Default, Clone, Copy)]
pub struct Autopilot;

impl InputSource for Autopilot {
    fn next_input(&mut self, state: &GameState, now_ms: u64) -> Option<TickInput> {
        Some(autopilot_input(state, now_ms))
    }
}

/// Events pushed by a window layer, drained once per frame
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<InputEvent>,
    input: InputState,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }
}

impl InputSource for EventQueue {
    fn next_input(&mut self, _state: &GameState, now_ms: u64) -> Option<TickInput> {
        while let Some(event) = self.pending.pop_front() {
            self.input.handle(event);
        }
        if self.input.quit_requested() {
            return None;
        }
        Some(self.input.take_tick_input(now_ms))
    }
}

/// When [`Game::run`] should stop on its own
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunLimit {
    pub max_frames: Option<u64>,
    pub max_ms: Option<u64>,
}

/// Totals for a finished run loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    /// Runs that ended in game over
    pub games_over: u32,
    pub best_score: u64,
    pub final_score: u64,
}

/// Game instance holding all state
pub struct Game<R: Renderer> {
    state: GameState,
    audio: AudioManager,
    renderer: R,
    rewind_glow: bool,
    summary: RunSummary,
}

impl<R: Renderer> Game<R> {
    pub fn new(seed: u64, settings: &Settings, renderer: R, audio: AudioManager) -> Self {
        log::info!("Game initialized with seed: {}", seed);
        Self {
            state: GameState::new(seed),
            audio,
            renderer,
            rewind_glow: settings.rewind_glow,
            summary: RunSummary::default(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Run one complete frame for the given input
    pub fn frame(&mut self, input: &TickInput) {
        tick(&mut self.state, input);

        let events = self.state.drain_events();
        self.audio.play_events(&events);
        for event in &events {
            self.note_event(event);
        }

        render_frame(&mut self.renderer, &self.state, input.now_ms, self.rewind_glow);

        self.summary.frames += 1;
        self.summary.final_score = self.state.score;
        self.summary.best_score = self.summary.best_score.max(self.state.score);
    }

    fn note_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::GameOver { score } => {
                self.summary.games_over += 1;
                log::info!("Run {} over, score {}", self.summary.games_over, score);
            }
            GameEvent::PlayerHit { hp } => log::debug!("Player hit, {} hp left", hp),
            GameEvent::RewindRejected { qualifying } => {
                log::debug!("Rewind rejected with {} qualifying entries", qualifying)
            }
            _ => {}
        }
    }

    /// Drive frames at the pacer's rate until the source quits or the limit
    /// is reached
    pub fn run<S, C>(
        &mut self,
        source: &mut S,
        clock: &C,
        pacer: &mut FramePacer,
        limit: RunLimit,
    ) -> RunSummary
    where
        S: InputSource + ?Sized,
        C: Clock + ?Sized,
    {
        let start_ms = clock.now_ms();
        loop {
            let now_ms = clock.now_ms();
            if limit.max_ms.is_some_and(|max| now_ms.saturating_sub(start_ms) >= max) {
                log::info!("Time limit reached");
                break;
            }
            if limit.max_frames.is_some_and(|max| self.summary.frames >= max) {
                break;
            }

            let Some(input) = source.next_input(&self.state, now_ms) else {
                log::info!("Quit requested");
                break;
            };
            self.frame(&input);
            pacer.wait();
        }
        self.summary
    }
}
