//! Time-rewind ability state machine
//!
//! ```text
//!   Idle --pickup--> Charging --5s--> Ready --activate(>=2 entries)--> Rewinding --2s--> Idle
//! ```
//!
//! Illegal combinations (charging while ready, rewinding while charging)
//! cannot be represented.

use super::history::{HistoryBuffer, RewindFrame};
use crate::consts::{ABILITY_CHARGE_TIME_MS, REWIND_ANIM_DURATION_MS, REWIND_DURATION_MS};

/// Minimum number of qualifying history entries needed to rewind
pub const MIN_REWIND_FRAMES: usize = 2;

/// An in-progress rewind animation
#[derive(Debug, Clone, PartialEq)]
pub struct Rewind {
    pub start_ms: u64,
    /// Captured frames, oldest first. Never shorter than [`MIN_REWIND_FRAMES`].
    pub frames: Vec<RewindFrame>,
}

impl Rewind {
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.start_ms)
    }

    /// Animation progress in `[0, 1]`
    pub fn progress(&self, now_ms: u64) -> f32 {
        (self.elapsed_ms(now_ms) as f32 / REWIND_ANIM_DURATION_MS as f32).min(1.0)
    }

    /// Frame shown at `now_ms`: scrubs from the newest frame (t=0) back to the
    /// oldest (t=1) by index, without interpolating.
    pub fn frame_index(&self, now_ms: u64) -> usize {
        let last = self.frames.len().saturating_sub(1);
        let t = self.progress(now_ms);
        let idx = ((1.0 - t) * last as f32).round() as usize;
        idx.min(last)
    }

    pub fn current_frame(&self, now_ms: u64) -> Option<RewindFrame> {
        self.frames.get(self.frame_index(now_ms)).copied()
    }

    /// The frame the player is restored to when the animation ends
    pub fn oldest(&self) -> Option<RewindFrame> {
        self.frames.first().copied()
    }

    pub fn is_finished(&self, now_ms: u64) -> bool {
        self.elapsed_ms(now_ms) >= REWIND_ANIM_DURATION_MS
    }
}

/// Result of an activation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Rewind started with this many frames
    Started { frames: usize },
    /// Ready, but too little recent history; the charge is kept
    NotEnoughHistory { qualifying: usize },
    /// Not in the Ready state
    NotReady,
}

/// The single ability instance owned by a session
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AbilityState {
    #[default]
    Idle,
    Charging {
        start_ms: u64,
    },
    Ready,
    Rewinding(Rewind),
}

impl AbilityState {
    pub fn is_idle(&self) -> bool {
        matches!(self, AbilityState::Idle)
    }

    pub fn is_rewinding(&self) -> bool {
        matches!(self, AbilityState::Rewinding(_))
    }

    /// Powerup pickup: start charging and forget all recorded history
    pub fn begin_charge(&mut self, now_ms: u64, history: &mut HistoryBuffer) {
        if self.is_rewinding() {
            log::warn!("Ignoring powerup pickup during rewind");
            return;
        }
        history.clear();
        *self = AbilityState::Charging { start_ms: now_ms };
        log::info!("Rewind powerup collected, ability charging");
    }

    /// Advance Charging to Ready once the charge time has passed.
    /// Returns true on the tick the ability becomes ready.
    pub fn update_charge(&mut self, now_ms: u64) -> bool {
        if let AbilityState::Charging { start_ms } = *self
            && now_ms.saturating_sub(start_ms) >= ABILITY_CHARGE_TIME_MS
        {
            *self = AbilityState::Ready;
            log::info!("Rewind ability ready");
            return true;
        }
        false
    }

    /// Remaining charge time, if charging
    pub fn charge_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        match *self {
            AbilityState::Charging { start_ms } => {
                Some(ABILITY_CHARGE_TIME_MS.saturating_sub(now_ms.saturating_sub(start_ms)))
            }
            _ => None,
        }
    }

    /// Try to start a rewind from the Ready state
    pub fn try_activate(&mut self, now_ms: u64, history: &HistoryBuffer) -> Activation {
        if !matches!(self, AbilityState::Ready) {
            return Activation::NotReady;
        }

        let frames = history.rewind_frames(now_ms, REWIND_DURATION_MS);
        if frames.len() < MIN_REWIND_FRAMES {
            log::info!(
                "Rewind refused: only {} history entries, ability stays ready",
                frames.len()
            );
            return Activation::NotEnoughHistory {
                qualifying: frames.len(),
            };
        }

        let count = frames.len();
        *self = AbilityState::Rewinding(Rewind {
            start_ms: now_ms,
            frames,
        });
        log::info!("Rewind started with {} frames", count);
        Activation::Started { frames: count }
    }

    pub fn rewind(&self) -> Option<&Rewind> {
        match self {
            AbilityState::Rewinding(rewind) => Some(rewind),
            _ => None,
        }
    }

    /// HUD line describing the ability
    pub fn status_text(&self, now_ms: u64) -> String {
        match self {
            AbilityState::Idle => String::new(),
            AbilityState::Charging { .. } => {
                let remaining = self.charge_remaining_ms(now_ms).unwrap_or(0);
                format!("Ability charging: {:.1}s", remaining as f32 / 1000.0)
            }
            AbilityState::Ready => format!(
                "Ability ready: [E] rewind ({}s back)",
                REWIND_DURATION_MS / 1000
            ),
            AbilityState::Rewinding(_) => "REWIND ACTIVE".to_string(),
        }
    }
}
