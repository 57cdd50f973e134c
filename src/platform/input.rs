//! Input events and per-tick input state
//!
//! Movement and the fire key are continuous (held) state; fire clicks,
//! rewind, restart and escape are edges that apply to exactly one tick.

use std::collections::HashSet;

use glam::Vec2;

use crate::screen_size;
use crate::sim::{Edge, MoveIntent, TickInput};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Space,
    E,
    R,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// A raw event from the window layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Window closed
    Quit,
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// Cursor position in playfield coordinates
    MouseMoved(Vec2),
    MouseDown(MouseButton),
}

/// Accumulates events between ticks
#[derive(Debug, Clone)]
pub struct InputState {
    held: HashSet<KeyCode>,
    aim: Vec2,
    /// Edges in arrival order
    edges: Vec<Edge>,
    quit: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            aim: screen_size() / 2.0,
            edges: Vec::new(),
            quit: false,
        }
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Quit => self.quit = true,
            InputEvent::KeyDown(key) => {
                self.held.insert(key);
                match key {
                    KeyCode::Escape => self.quit = true,
                    KeyCode::E => self.edges.push(Edge::Rewind),
                    KeyCode::R => self.edges.push(Edge::Restart),
                    _ => {}
                }
            }
            InputEvent::KeyUp(key) => {
                self.held.remove(&key);
            }
            InputEvent::MouseMoved(pos) => self.aim = pos,
            InputEvent::MouseDown(MouseButton::Left) => self.edges.push(Edge::Fire),
            InputEvent::MouseDown(_) => {}
        }
    }

    /// Quit or escape was seen
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    fn is_held(&self, a: KeyCode, b: KeyCode) -> bool {
        self.held.contains(&a) || self.held.contains(&b)
    }

    pub fn movement(&self) -> MoveIntent {
        MoveIntent {
            up: self.is_held(KeyCode::W, KeyCode::Up),
            down: self.is_held(KeyCode::S, KeyCode::Down),
            left: self.is_held(KeyCode::A, KeyCode::Left),
            right: self.is_held(KeyCode::D, KeyCode::Right),
        }
    }

    /// Build the input for a tick at `now_ms` and clear the edges
    pub fn take_tick_input(&mut self, now_ms: u64) -> TickInput {
        TickInput {
            now_ms,
            movement: self.movement(),
            aim: self.aim,
            fire_held: self.held.contains(&KeyCode::Space),
            edges: std::mem::take(&mut self.edges),
        }
    }
}
