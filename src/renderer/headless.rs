//! Windowless renderer
//!
//! Resolves each draw call to a sprite or a fallback circle and keeps the
//! last complete frame for inspection. HUD changes are written to the log.

use glam::Vec2;

use super::{EntityKind, Renderer, game_over_lines, hud_lines};
use crate::assets::AssetBundle;
use crate::settings::Settings;

/// How an entity ended up being drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStyle {
    /// Sprite scaled to this diameter
    Sprite { diameter: u32 },
    /// Filled circle in this color
    Circle { color: [u8; 3] },
}

/// One resolved draw call
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnEntity {
    pub kind: EntityKind,
    pub pos: Vec2,
    pub radius: f32,
    pub glow: bool,
    pub style: DrawStyle,
}

/// Everything drawn during one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameRecord {
    /// Clear color the frame started from
    pub background: [u8; 3],
    pub entities: Vec<DrawnEntity>,
    pub hud: Vec<String>,
    pub overlay: Option<[String; 3]>,
}

pub struct HeadlessRenderer {
    assets: AssetBundle,
    background: [u8; 3],
    colors: [[u8; 3]; 4],
    pending: FrameRecord,
    last_frame: FrameRecord,
    frames: u64,
    game_over_shown: bool,
}

impl HeadlessRenderer {
    pub fn new(assets: AssetBundle, settings: &Settings) -> Self {
        Self {
            assets,
            background: settings.background_color,
            colors: [
                settings.player.color,
                settings.enemy.color,
                settings.powerup.color,
                settings.bullet_color,
            ],
            pending: FrameRecord::default(),
            last_frame: FrameRecord::default(),
            frames: 0,
            game_over_shown: false,
        }
    }

    /// The most recently completed frame
    pub fn last_frame(&self) -> &FrameRecord {
        &self.last_frame
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    fn color(&self, kind: EntityKind) -> [u8; 3] {
        match kind {
            EntityKind::Player => self.colors[0],
            EntityKind::Enemy => self.colors[1],
            EntityKind::Powerup => self.colors[2],
            EntityKind::Bullet => self.colors[3],
        }
    }
}

impl Renderer for HeadlessRenderer {
    fn begin_frame(&mut self) {
        self.pending = FrameRecord {
            background: self.background,
            ..Default::default()
        };
    }

    fn draw_entity(&mut self, kind: EntityKind, pos: Vec2, radius: f32, glow: bool) {
        let style = match self.assets.sprite(kind) {
            Some(sprite) => DrawStyle::Sprite {
                diameter: sprite.diameter,
            },
            None => DrawStyle::Circle {
                color: self.color(kind),
            },
        };
        self.pending.entities.push(DrawnEntity {
            kind,
            pos,
            radius,
            glow,
            style,
        });
    }

    fn render_hud(&mut self, hp: i32, max_hp: i32, score: u64, ability_status: &str) {
        self.pending.hud = hud_lines(hp, max_hp, score, ability_status);
    }

    fn render_game_over(&mut self, score: u64) {
        self.pending.overlay = Some(game_over_lines(score));
    }

    fn end_frame(&mut self) {
        self.frames += 1;

        // Ability countdown changes every frame; only log the hp/score lines
        fn stable(hud: &[String]) -> &[String] {
            &hud[..hud.len().min(2)]
        }
        if stable(&self.pending.hud) != stable(&self.last_frame.hud) {
            log::info!("{}", self.pending.hud.join(" | "));
        }

        match (&self.pending.overlay, self.game_over_shown) {
            (Some(lines), false) => {
                log::info!("{}", lines.join(" - "));
                self.game_over_shown = true;
            }
            (None, true) => self.game_over_shown = false,
            _ => {}
        }

        self.last_frame = std::mem::take(&mut self.pending);
    }
}
