//! Simulation module
//!
//! All gameplay logic lives here. Everything is driven by `tick` on a single
//! thread; the rasterizer only ever reads the session.
//! - Fixed per-frame step, no wall-clock time
//! - Stable iteration order (bricks in template order, balls in spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;
pub mod wall;

pub use collision::{BrickHit, Face, bounce_off_paddle, face_hit, impact_brick, touches_paddle};
pub use state::{Ball, BallId, Brick, GameEvent, GamePhase, Paddle, PaddleId, Rect, Session};
pub use tick::{FrameInput, autopilot, tick};
pub use wall::{Palette, Wall};
