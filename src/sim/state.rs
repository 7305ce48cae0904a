//! Game state and core simulation types
//!
//! Balls refer to their paddle through a `PaddleId` handle rather than a
//! reference, so the whole session is plain data and can be cloned or
//! serialized freely.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::wall::Wall;
use crate::renderer::{Color, WorkerPool};
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball waiting at the serve position for the go-ahead
    Start,
    /// Physics and collisions running
    Play,
    /// Out of lives, waiting for acknowledgment
    Lose,
    /// Wall cleared, waiting for acknowledgment
    Win,
}

/// Something that happened during a tick, for the orchestration layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    BrickHit { brick: usize, durability: u32 },
    BrickBroken { brick: usize },
    BonusBall { ball: BallId },
    BallLost { ball: BallId },
    LifeLost { lives: u32 },
    SessionEnded,
}

/// Stable identity of a ball for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(pub u32);

/// Handle to a paddle slot in the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaddleId(pub usize);

impl PaddleId {
    pub const PRIMARY: PaddleId = PaddleId(0);
}

/// Axis-aligned rectangle described by its centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            center,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.width / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.width / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.height / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.height / 2.0
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Paddle that owns this ball (scores and lives go there)
    pub owner: PaddleId,
}

impl Ball {
    /// Advance one frame: `pos += vel`
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    /// Reflect off the top and side edges of the screen
    pub fn bounce_off_edges(&mut self, screen_width: f32) {
        if self.pos.y - self.radius <= 0.0 {
            self.vel.y = -self.vel.y;
        }
        if self.pos.x - self.radius <= 0.0 || self.pos.x + self.radius >= screen_width {
            self.vel.x = -self.vel.x;
        }
    }

    /// True once the centre has dropped past the bottom edge
    pub fn has_exited(&self, screen_height: f32) -> bool {
        self.pos.y >= screen_height
    }

    /// Put the ball back at the serve position with the serve velocity
    pub fn serve(&mut self, settings: &Settings) {
        self.pos = settings.ball_serve_position();
        self.vel = settings.ball_serve_velocity;
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Lateral distance moved per frame while a direction is held
    pub speed: f32,
    pub color: Color,
    pub lives: u32,
    pub score: u32,
    /// Active balls, in spawn order
    pub balls: Vec<Ball>,
}

impl Paddle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.width, self.height)
    }

    /// Move left or right, keeping the paddle's extent on screen
    pub fn steer(&mut self, left: bool, right: bool, screen_width: f32) {
        let dx = match (left, right) {
            (true, false) => -self.speed,
            (false, true) => self.speed,
            _ => return,
        };
        let half = self.width / 2.0;
        let (min_x, max_x) = (half, screen_width - half);
        self.pos.x = if min_x <= max_x {
            (self.pos.x + dx).clamp(min_x, max_x)
        } else {
            screen_width / 2.0
        };
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }
}

/// A destructible brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    /// Hits left; 0 means already broken
    pub durability: u32,
    /// Score awarded per rewarding hit
    pub reward: u32,
}

impl Brick {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.width, self.height)
    }

    pub fn is_broken(&self) -> bool {
        self.durability == 0
    }
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub settings: Settings,
    pub phase: GamePhase,
    /// Paddle slots, addressed by `PaddleId`
    pub paddles: Vec<Paddle>,
    pub wall: Wall,
    /// Frozen copy of the wall taken right after construction
    snapshot: Wall,
    /// Paddles as they were at session start
    initial_paddles: Vec<Paddle>,
    /// Set once a win has been acknowledged
    pub finished: bool,
    /// Tick counter
    pub frame: u64,
    next_ball_id: u32,
}

impl Session {
    /// Build a new session: one paddle with one served ball, and a fresh wall
    pub fn new(settings: Settings, pool: &WorkerPool) -> Self {
        let wall = Wall::build(&settings, pool);
        let snapshot = wall.clone();

        let mut session = Self {
            phase: GamePhase::Start,
            paddles: Vec::new(),
            wall,
            snapshot,
            initial_paddles: Vec::new(),
            finished: false,
            frame: 0,
            next_ball_id: 1,
            settings,
        };

        let id = session.next_ball_id();
        let ball = Ball {
            id,
            pos: session.settings.ball_serve_position(),
            vel: session.settings.ball_serve_velocity,
            radius: session.settings.ball_radius,
            color: session.settings.ball_color,
            owner: PaddleId::PRIMARY,
        };
        let paddle = Paddle {
            pos: session.settings.paddle_spawn(),
            width: session.settings.paddle_width,
            height: session.settings.paddle_height,
            speed: session.settings.paddle_speed,
            color: session.settings.paddle_color,
            lives: session.settings.lives,
            score: 0,
            balls: vec![ball],
        };
        session.paddles.push(paddle);
        session.initial_paddles = session.paddles.clone();
        session
    }

    /// Allocate a new ball ID
    pub fn next_ball_id(&mut self) -> BallId {
        let id = BallId(self.next_ball_id);
        self.next_ball_id += 1;
        id
    }

    pub fn paddle(&self, id: PaddleId) -> Option<&Paddle> {
        self.paddles.get(id.0)
    }

    pub fn paddle_mut(&mut self, id: PaddleId) -> Option<&mut Paddle> {
        self.paddles.get_mut(id.0)
    }

    /// Score of the primary paddle
    pub fn score(&self) -> u32 {
        self.paddle(PaddleId::PRIMARY).map_or(0, |p| p.score)
    }

    /// Lives of the primary paddle
    pub fn lives(&self) -> u32 {
        self.paddle(PaddleId::PRIMARY).map_or(0, |p| p.lives)
    }

    pub fn ball_count(&self) -> usize {
        self.paddles.iter().map(|p| p.balls.len()).sum()
    }

    /// The frozen wall used by `restore_wall`
    pub fn wall_snapshot(&self) -> &Wall {
        &self.snapshot
    }

    /// Copy the snapshot back over the live wall
    pub fn restore_wall(&mut self) {
        self.wall.restore_from(&self.snapshot);
    }

    /// Return paddles, balls and wall to their session-start values
    pub fn reset_after_loss(&mut self) {
        self.paddles.clone_from(&self.initial_paddles);
        self.restore_wall();
        log::debug!("Session reset: paddles and wall restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pool() -> WorkerPool {
        WorkerPool::new(2).unwrap()
    }

    fn ball_at(x: f32, y: f32, vx: f32, vy: f32) -> Ball {
        Ball {
            id: BallId(1),
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, vy),
            radius: 5.0,
            color: Color::WHITE,
            owner: PaddleId::PRIMARY,
        }
    }

    #[test]
    fn test_new_session() {
        let session = Session::new(Settings::default(), &pool());
        assert_eq!(session.phase, GamePhase::Start);
        assert_eq!(session.paddles.len(), 1);
        assert_eq!(session.ball_count(), 1);
        assert_eq!(session.lives(), 3);
        assert_eq!(session.score(), 0);
        assert_eq!(session.paddles[0].pos, Vec2::new(300.0, 750.0));
        assert_eq!(session.paddles[0].balls[0].pos, Vec2::new(300.0, 500.0));
    }

    #[test]
    fn test_ball_ids_are_unique() {
        let mut session = Session::new(Settings::default(), &pool());
        let a = session.next_ball_id();
        let b = session.next_ball_id();
        assert_ne!(a, b);
        assert_ne!(a, session.paddles[0].balls[0].id);
    }

    #[test]
    fn test_top_bounce_inverts_y() {
        let mut ball = ball_at(100.0, 8.0, 0.0, -4.0);
        ball.integrate();
        ball.bounce_off_edges(600.0);
        assert_eq!(ball.vel.y, 4.0);
    }

    #[test]
    fn test_side_bounce_inverts_x() {
        let mut left = ball_at(7.0, 300.0, -3.0, 1.0);
        left.integrate();
        left.bounce_off_edges(600.0);
        assert_eq!(left.vel.x, 3.0);

        let mut right = ball_at(593.0, 300.0, 3.0, 1.0);
        right.integrate();
        right.bounce_off_edges(600.0);
        assert_eq!(right.vel.x, -3.0);
    }

    #[test]
    fn test_paddle_steer_clamps_to_screen() {
        let session = Session::new(Settings::default(), &pool());
        let mut paddle = session.paddles[0].clone();
        for _ in 0..100 {
            paddle.steer(true, false, 600.0);
        }
        assert_eq!(paddle.rect().left(), 0.0);
        for _ in 0..100 {
            paddle.steer(false, true, 600.0);
        }
        assert_eq!(paddle.rect().right(), 600.0);
    }

    #[test]
    fn test_paddle_steer_ignores_both_directions() {
        let session = Session::new(Settings::default(), &pool());
        let mut paddle = session.paddles[0].clone();
        paddle.steer(true, true, 600.0);
        assert_eq!(paddle.pos.x, 300.0);
    }

    #[test]
    fn test_paddle_wider_than_screen_stays_centred() {
        let session = Session::new(Settings::default(), &pool());
        let mut paddle = session.paddles[0].clone();
        paddle.width = 800.0;
        paddle.steer(false, true, 600.0);
        assert_eq!(paddle.pos.x, 300.0);
    }

    proptest! {
        #[test]
        fn prop_paddle_never_leaves_screen(
            moves in prop::collection::vec((any::<bool>(), any::<bool>()), 0..200),
            width in 1.0f32..600.0,
            speed in 0.0f32..80.0,
        ) {
            let session = Session::new(Settings::default(), &pool());
            let mut paddle = session.paddles[0].clone();
            paddle.width = width;
            paddle.speed = speed;
            for (left, right) in moves {
                paddle.steer(left, right, 600.0);
                prop_assert!(paddle.rect().left() >= -1e-3);
                prop_assert!(paddle.rect().right() <= 600.0 + 1e-3);
            }
        }
    }

    #[test]
    fn test_reset_after_loss_restores_everything() {
        let mut session = Session::new(Settings::default(), &pool());
        session.paddles[0].lives = 0;
        session.paddles[0].score = 120;
        session.paddles[0].width = 40.0;
        session.paddles[0].balls.clear();
        for brick in &mut session.wall.bricks {
            brick.durability = 0;
        }

        session.reset_after_loss();
        assert_eq!(session.lives(), 3);
        assert_eq!(session.score(), 0);
        assert_eq!(session.paddles[0].width, 100.0);
        assert_eq!(session.ball_count(), 1);
        assert_eq!(&session.wall, session.wall_snapshot());
    }

    #[test]
    fn test_session_serializes() {
        let session = Session::new(Settings::default(), &pool());
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back.paddles, session.paddles);
        assert_eq!(back.wall, session.wall);
    }
}
