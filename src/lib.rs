//! Brick Breaker - A Breakout/Arkanoid arcade core
//!
//! Core modules:
//! - `sim`: Simulation (ball physics, brick collisions, game state machine)
//! - `renderer`: Parallel software rasterizer into a raw RGBA buffer
//! - `game`: Per-frame façade handed to the presentation layer
//! - `settings`: Data-driven game configuration

pub mod error;
pub mod game;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use game::Game;
pub use renderer::{Color, Position};
pub use settings::{BonusSpawn, ScoringRule, Settings, WallLayout};

/// Game configuration constants (default layout)
pub mod consts {
    /// Screen dimensions in pixels
    pub const SCREEN_WIDTH: u32 = 600;
    pub const SCREEN_HEIGHT: u32 = 800;
    /// Bytes per RGBA pixel
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Frame pacing delay after presentation (~60 fps)
    pub const FRAME_DELAY_MS: u64 = 16;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    pub const PADDLE_SPEED: f32 = 15.0;
    /// Paddle rests this far above the bottom edge
    pub const PADDLE_BOTTOM_OFFSET: f32 = 50.0;
    pub const STARTING_LIVES: u32 = 3;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 5.0;
    /// Serve position sits this far below the screen centre
    pub const BALL_SERVE_OFFSET: f32 = 100.0;
    pub const BALL_SERVE_SPEED: f32 = 10.0;

    /// Horizontal speeds handed out by paddle segment, left to right
    pub const PADDLE_SPEED_TABLE: [f32; 12] = [
        -11.0, -9.0, -7.0, -5.0, -3.0, -1.0, 1.0, 3.0, 5.0, 7.0, 9.0, 11.0,
    ];

    /// Early-hit tolerance for brick faces (movement is frame-discretized)
    pub const IMPACT_TOLERANCE: f32 = 5.0;
    /// Every multiple of this score spawns a bonus ball
    pub const BONUS_BALL_THRESHOLD: u32 = 50;

    /// Wall grid
    pub const WALL_COLUMNS: usize = 9;
    pub const WALL_ROWS: usize = 17;
    pub const BRICK_WIDTH: f32 = 50.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_GAP: f32 = 1.0;
    pub const BRICK_REWARD: u32 = 10;
    pub const WALL_CENTER_X: f32 = 300.0;
    pub const WALL_CENTER_Y: f32 = 200.0;

    /// Rectangles with fewer pixels than this are filled on the caller's thread
    pub const PARALLEL_MIN_PIXELS: usize = 256;
}
