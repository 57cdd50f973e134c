//! Time-windowed history of player snapshots
//!
//! The rewind ability replays entries out of this buffer. It is bounded by
//! time, not by entry count: anything older than the rewind reach plus
//! [`HISTORY_SLACK_MS`] is dropped on every prune.

use std::collections::VecDeque;

use glam::Vec2;

use crate::consts::{HISTORY_SLACK_MS, REWIND_DURATION_MS};

/// One recorded player snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry {
    pub timestamp_ms: u64,
    pub pos: Vec2,
    pub hp: i32,
}

/// A history entry with the timestamp stripped, used while rewinding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewindFrame {
    pub pos: Vec2,
    pub hp: i32,
}

impl From<&HistoryEntry> for RewindFrame {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            pos: entry.pos,
            hp: entry.hp,
        }
    }
}

/// Append-only ring of timestamped snapshots, oldest first
#[derive(Debug, Clone, Default)]
pub struct HistoryBuffer {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot. Timestamps never go backwards: an entry older than
    /// the newest one is stamped with the newest timestamp instead.
    pub fn push(&mut self, mut entry: HistoryEntry) {
        if let Some(last) = self.entries.back()
            && entry.timestamp_ms < last.timestamp_ms
        {
            log::debug!(
                "History timestamp went backwards ({} < {}), clamping",
                entry.timestamp_ms,
                last.timestamp_ms
            );
            entry.timestamp_ms = last.timestamp_ms;
        }
        self.entries.push_back(entry);
    }

    /// Drop every entry older than the retention window ending at `now_ms`
    pub fn prune(&mut self, now_ms: u64) {
        let cutoff = now_ms.saturating_sub(REWIND_DURATION_MS + HISTORY_SLACK_MS);
        while self
            .entries
            .front()
            .is_some_and(|e| e.timestamp_ms < cutoff)
        {
            self.entries.pop_front();
        }
    }

    /// Append then prune, the per-tick recording step
    pub fn record(&mut self, entry: HistoryEntry) {
        let now_ms = entry.timestamp_ms;
        self.push(entry);
        self.prune(now_ms);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the contents with a single entry
    pub fn reset_to(&mut self, entry: HistoryEntry) {
        self.entries.clear();
        self.entries.push_back(entry);
    }

    /// Entries whose timestamp lies in `[now_ms - span_ms, now_ms]`, oldest first
    pub fn window(&self, now_ms: u64, span_ms: u64) -> impl Iterator<Item = &HistoryEntry> {
        let start = now_ms.saturating_sub(span_ms);
        self.entries
            .iter()
            .filter(move |e| e.timestamp_ms >= start && e.timestamp_ms <= now_ms)
    }

    /// Rewind frames for the window ending at `now_ms`, sorted by timestamp
    pub fn rewind_frames(&self, now_ms: u64, span_ms: u64) -> Vec<RewindFrame> {
        let mut window: Vec<&HistoryEntry> = self.window(now_ms, span_ms).collect();
        // Already ordered by construction; the stable sort keeps ties in insertion order.
        window.sort_by_key(|e| e.timestamp_ms);
        window.into_iter().map(RewindFrame::from).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn oldest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn newest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}
