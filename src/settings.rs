//! Game settings
//!
//! Everything the game would otherwise hard-code lives here so a session can
//! be tuned from a JSON file. `Settings::default()` is the classic game.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::renderer::Color;

/// Built-in brick wall templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WallLayout {
    /// Sparse map with durabilities 0-3
    #[default]
    Classic,
    /// Dense map with durabilities 0-5
    Fortress,
}

impl WallLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            WallLayout::Classic => "Classic",
            WallLayout::Fortress => "Fortress",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(WallLayout::Classic),
            "fortress" => Some(WallLayout::Fortress),
            _ => None,
        }
    }
}

/// When a brick pays out its reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScoringRule {
    /// Every face hit pays
    #[default]
    PerHit,
    /// Only the hit that breaks the brick pays
    PerBreak,
}

/// Where a score-milestone bonus ball appears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BonusSpawn {
    /// Copy of the hitting ball as it was when the hit was detected
    #[default]
    CloneHitter,
    /// At the serve position, heading straight up
    FromServe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    pub screen_width: u32,
    pub screen_height: u32,
    /// Rasterizer threads (`None` = available parallelism)
    pub workers: Option<usize>,
    /// Pause after presenting each frame
    pub frame_delay_ms: u64,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    pub paddle_color: Color,
    pub lives: u32,
    /// Horizontal speeds by paddle segment, left to right
    pub speed_table: Vec<f32>,
    /// Width lost per bonus ball (0 disables)
    pub paddle_shrink_on_bonus: f32,
    pub min_paddle_width: f32,

    // === Balls ===
    pub ball_radius: f32,
    pub ball_serve_velocity: Vec2,
    pub ball_color: Color,
    pub bonus_ball_color: Color,
    /// Every positive multiple of this score spawns a bonus ball
    pub bonus_threshold: u32,
    pub bonus_spawn: BonusSpawn,

    // === Bricks ===
    pub layout: WallLayout,
    pub wall_center: Vec2,
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_gap: f32,
    pub brick_reward: u32,
    pub scoring: ScoringRule,
    /// Early-hit window on brick faces
    pub impact_tolerance: f32,

    // === HUD ===
    pub score_color: Color,
    pub life_color: Color,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            workers: None,
            frame_delay_ms: FRAME_DELAY_MS,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            paddle_color: Color::WHITE,
            lives: STARTING_LIVES,
            speed_table: PADDLE_SPEED_TABLE.to_vec(),
            paddle_shrink_on_bonus: 0.0,
            min_paddle_width: 20.0,

            ball_radius: BALL_RADIUS,
            ball_serve_velocity: Vec2::new(0.0, BALL_SERVE_SPEED),
            ball_color: Color::WHITE,
            bonus_ball_color: Color::CYAN,
            bonus_threshold: BONUS_BALL_THRESHOLD,
            bonus_spawn: BonusSpawn::CloneHitter,

            layout: WallLayout::Classic,
            wall_center: Vec2::new(WALL_CENTER_X, WALL_CENTER_Y),
            brick_width: BRICK_WIDTH,
            brick_height: BRICK_HEIGHT,
            brick_gap: BRICK_GAP,
            brick_reward: BRICK_REWARD,
            scoring: ScoringRule::PerHit,
            impact_tolerance: IMPACT_TOLERANCE,

            score_color: Color::WHITE,
            life_color: Color::RED,
        }
    }
}

impl Settings {
    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations the per-frame code does not guard against
    pub fn validate(&self) -> Result<()> {
        fn invalid(msg: &str) -> Result<()> {
            log::warn!("Rejected settings: {msg}");
            Err(Error::InvalidSettings(msg.to_string()))
        }

        if self.screen_width == 0 || self.screen_height == 0 {
            return invalid("screen dimensions must be non-zero");
        }
        if self.workers == Some(0) {
            return invalid("worker count must be at least 1");
        }
        if !(self.paddle_width >= 0.0 && self.paddle_width.is_finite()) {
            return invalid("paddle width must be a non-negative number");
        }
        if !(self.paddle_height > 0.0 && self.paddle_height.is_finite()) {
            return invalid("paddle height must be positive");
        }
        if !(self.paddle_speed >= 0.0 && self.paddle_speed.is_finite()) {
            return invalid("paddle speed must be a non-negative number");
        }
        if self.speed_table.is_empty() || self.speed_table.iter().any(|v| !v.is_finite()) {
            return invalid("speed table must hold at least one finite speed");
        }
        if !(self.paddle_shrink_on_bonus >= 0.0 && self.min_paddle_width >= 0.0) {
            return invalid("paddle shrink and minimum width must be non-negative");
        }
        if !(self.ball_radius > 0.0 && self.ball_radius.is_finite()) {
            return invalid("ball radius must be positive");
        }
        if !self.ball_serve_velocity.is_finite() {
            return invalid("ball serve velocity must be finite");
        }
        if self.bonus_threshold == 0 {
            return invalid("bonus threshold must be positive");
        }
        if !(self.brick_width > 0.0 && self.brick_height > 0.0 && self.brick_gap >= 0.0) {
            return invalid("brick dimensions must be positive");
        }
        if !(self.impact_tolerance >= 0.0 && self.impact_tolerance.is_finite()) {
            return invalid("impact tolerance must be a non-negative number");
        }

        // Geometry has to fit on screen
        let (w, h) = (self.screen_width as f32, self.screen_height as f32);
        if self.paddle_width > w || self.min_paddle_width > w {
            return invalid("paddle width must not exceed the screen width");
        }
        if self.paddle_height > h {
            return invalid("paddle height must not exceed the screen height");
        }
        if !self.paddle_shrink_on_bonus.is_finite() {
            return invalid("paddle shrink must be finite");
        }
        if self.brick_width > w || self.brick_height > h || self.brick_gap > w {
            return invalid("bricks must fit on screen");
        }
        if self.ball_radius > w.min(h) / 2.0 {
            return invalid("ball must fit on screen");
        }
        Ok(())
    }

    /// Where the paddle (re)spawns
    pub fn paddle_spawn(&self) -> Vec2 {
        Vec2::new(
            self.screen_width as f32 / 2.0,
            self.screen_height as f32 - PADDLE_BOTTOM_OFFSET,
        )
    }

    /// Where a served ball (re)spawns
    pub fn ball_serve_position(&self) -> Vec2 {
        Vec2::new(
            self.screen_width as f32 / 2.0,
            self.screen_height as f32 / 2.0 + BALL_SERVE_OFFSET,
        )
    }
}
