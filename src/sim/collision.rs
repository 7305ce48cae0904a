//! Collision detection and response for balls against bricks and paddles
//!
//! Movement is frame-discretized, so brick faces register a hit slightly
//! before the ball actually reaches them (`tolerance`), and every hit snaps
//! the ball flush against the struck face to stop it sinking in.

use serde::{Deserialize, Serialize};

use super::state::{Ball, Brick, Rect};
use super::wall::Palette;

/// Which face of a brick was struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Face {
    Top,
    Bottom,
    Left,
    Right,
}

/// Outcome of a resolved brick hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrickHit {
    pub face: Face,
    /// Durability left after the hit
    pub durability: u32,
}

impl BrickHit {
    pub fn broke(&self) -> bool {
        self.durability == 0
    }
}

/// Find the face of `rect` the ball is striking, if any. At most one face
/// is reported; vertical faces (top/bottom) are tested first.
pub fn face_hit(ball: &Ball, rect: &Rect, tolerance: f32) -> Option<Face> {
    let (x, y, r) = (ball.pos.x, ball.pos.y, ball.radius);
    let center = rect.center;

    if x >= rect.left() && x <= rect.right() {
        if y - r - tolerance <= rect.bottom() && y - r >= center.y {
            return Some(Face::Bottom);
        }
        if y + r + tolerance >= rect.top() && y + r <= center.y {
            return Some(Face::Top);
        }
    }

    if y >= rect.top() && y <= rect.bottom() {
        if x + r + tolerance >= rect.left() && x + r <= center.x {
            return Some(Face::Left);
        }
        if x - r - tolerance <= rect.right() && x - r >= center.x {
            return Some(Face::Right);
        }
    }

    None
}

/// Reflect the ball off `face` and place it flush against that face
pub fn reflect_off_face(ball: &mut Ball, rect: &Rect, face: Face) {
    match face {
        Face::Bottom => {
            ball.vel.y = -ball.vel.y;
            ball.pos.y = rect.bottom() + ball.radius;
        }
        Face::Top => {
            ball.vel.y = -ball.vel.y;
            ball.pos.y = rect.top() - ball.radius;
        }
        Face::Left => {
            ball.vel.x = -ball.vel.x;
            ball.pos.x = rect.left() - ball.radius;
        }
        Face::Right => {
            ball.vel.x = -ball.vel.x;
            ball.pos.x = rect.right() + ball.radius;
        }
    }
}

/// Test a ball against one brick and resolve the hit: bounce, snap,
/// decrement durability, recolor. Broken bricks are inert.
pub fn impact_brick(
    ball: &mut Ball,
    brick: &mut Brick,
    palette: &Palette,
    tolerance: f32,
) -> Option<BrickHit> {
    if brick.is_broken() {
        return None;
    }
    let rect = brick.rect();
    let face = face_hit(ball, &rect, tolerance)?;

    reflect_off_face(ball, &rect, face);
    brick.durability -= 1;
    brick.color = palette.color(brick.durability);

    Some(BrickHit {
        face,
        durability: brick.durability,
    })
}

/// True if the ball's leading (bottom) edge is inside the paddle's vertical
/// band and its centre is within the paddle's horizontal span
pub fn touches_paddle(ball: &Ball, paddle: &Rect) -> bool {
    let leading = ball.pos.y + ball.radius;
    leading >= paddle.top()
        && leading <= paddle.bottom()
        && ball.pos.x >= paddle.left()
        && ball.pos.x <= paddle.right()
}

/// Pick the horizontal speed for a strike at `x`: the paddle is divided into
/// `speeds.len()` equal segments, leftmost segment first.
pub fn segment_speed(x: f32, paddle: &Rect, speeds: &[f32]) -> Option<f32> {
    let segment = paddle.width / speeds.len() as f32;
    speeds
        .iter()
        .enumerate()
        .find(|&(i, _)| x <= paddle.left() + segment * (i + 1) as f32)
        .map(|(_, &speed)| speed)
        .or(speeds.last().copied())
}

/// Bounce a ball off the paddle top: remap x-velocity by segment, invert
/// y-velocity, and sit the ball on the paddle surface
pub fn bounce_off_paddle(ball: &mut Ball, paddle: &Rect, speeds: &[f32]) {
    let Some(speed) = segment_speed(ball.pos.x, paddle, speeds) else {
        return;
    };
    ball.vel.x = speed;
    ball.vel.y = -ball.vel.y;
    ball.pos.y = paddle.top() - ball.radius;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PADDLE_SPEED_TABLE;
    use crate::renderer::Color;
    use crate::sim::state::{BallId, PaddleId};
    use glam::Vec2;

    fn ball(x: f32, y: f32, vx: f32, vy: f32) -> Ball {
        Ball {
            id: BallId(1),
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, vy),
            radius: 5.0,
            color: Color::WHITE,
            owner: PaddleId::PRIMARY,
        }
    }

    fn brick(durability: u32) -> Brick {
        Brick {
            pos: Vec2::new(100.0, 100.0),
            width: 50.0,
            height: 20.0,
            color: palette().color(durability),
            durability,
            reward: 10,
        }
    }

    fn palette() -> Palette {
        Palette::new(vec![
            Color::TRANSPARENT,
            Color::RED,
            Color::WHITE,
            Color::CYAN,
        ])
    }

    fn paddle() -> Rect {
        Rect::new(Vec2::new(300.0, 750.0), 120.0, 10.0)
    }

    #[test]
    fn test_bottom_face_hit() {
        // Brick bottom is y=110; ball top at 112 is inside the tolerance
        let mut b = ball(100.0, 117.0, 2.0, -10.0);
        let mut brk = brick(2);
        let hit = impact_brick(&mut b, &mut brk, &palette(), 5.0).unwrap();
        assert_eq!(hit.face, Face::Bottom);
        assert_eq!(b.vel, Vec2::new(2.0, 10.0));
        assert_eq!(b.pos.y, 115.0);
        assert_eq!(brk.durability, 1);
        assert_eq!(brk.color, Color::RED);
        assert!(!hit.broke());
    }

    #[test]
    fn test_top_face_hit() {
        let mut b = ball(90.0, 84.0, 0.0, 10.0);
        let mut brk = brick(1);
        let hit = impact_brick(&mut b, &mut brk, &palette(), 5.0).unwrap();
        assert_eq!(hit.face, Face::Top);
        assert_eq!(b.vel.y, -10.0);
        assert_eq!(b.pos.y, 85.0);
        assert!(hit.broke());
        assert_eq!(brk.color, Color::TRANSPARENT);
    }

    #[test]
    fn test_left_face_hit() {
        let mut b = ball(72.0, 102.0, 6.0, 1.0);
        let mut brk = brick(3);
        let hit = impact_brick(&mut b, &mut brk, &palette(), 5.0).unwrap();
        assert_eq!(hit.face, Face::Left);
        assert_eq!(b.vel.x, -6.0);
        assert_eq!(b.pos.x, 70.0);
    }

    #[test]
    fn test_right_face_hit() {
        let mut b = ball(128.0, 95.0, -6.0, 1.0);
        let mut brk = brick(3);
        let hit = impact_brick(&mut b, &mut brk, &palette(), 5.0).unwrap();
        assert_eq!(hit.face, Face::Right);
        assert_eq!(b.vel.x, 6.0);
        assert_eq!(b.pos.x, 130.0);
    }

    #[test]
    fn test_miss_outside_tolerance() {
        let mut b = ball(100.0, 130.0, 0.0, -10.0);
        let mut brk = brick(1);
        assert!(impact_brick(&mut b, &mut brk, &palette(), 5.0).is_none());
        assert_eq!(brk.durability, 1);
    }

    #[test]
    fn test_broken_brick_is_inert() {
        let mut b = ball(100.0, 117.0, 0.0, -10.0);
        let mut brk = brick(0);
        let before = b.clone();
        assert!(impact_brick(&mut b, &mut brk, &palette(), 5.0).is_none());
        assert_eq!(brk.durability, 0);
        assert_eq!(b, before);
    }

    #[test]
    fn test_durability_only_decreases() {
        let mut brk = brick(3);
        let mut last = brk.durability;
        for _ in 0..6 {
            let mut b = ball(100.0, 117.0, 0.0, -10.0);
            impact_brick(&mut b, &mut brk, &palette(), 5.0);
            assert!(brk.durability <= last);
            last = brk.durability;
        }
        assert_eq!(brk.durability, 0);
    }

    #[test]
    fn test_touches_paddle() {
        let p = paddle();
        assert!(touches_paddle(&ball(300.0, 741.0, 0.0, 10.0), &p));
        assert!(!touches_paddle(&ball(300.0, 730.0, 0.0, 10.0), &p));
        assert!(!touches_paddle(&ball(361.0, 741.0, 0.0, 10.0), &p));
    }

    #[test]
    fn test_leftmost_segment_gets_most_negative_speed() {
        let p = paddle();
        let x = p.left() + p.width / 12.0 * 0.5;
        assert_eq!(segment_speed(x, &p, &PADDLE_SPEED_TABLE), Some(-11.0));
        assert_eq!(segment_speed(p.left(), &p, &PADDLE_SPEED_TABLE), Some(-11.0));
    }

    #[test]
    fn test_rightmost_segment_gets_most_positive_speed() {
        let p = paddle();
        assert_eq!(segment_speed(p.right(), &p, &PADDLE_SPEED_TABLE), Some(11.0));
        assert_eq!(segment_speed(p.right() - 1.0, &p, &PADDLE_SPEED_TABLE), Some(11.0));
    }

    #[test]
    fn test_segments_are_ordered() {
        let p = paddle();
        let speeds: Vec<f32> = (0..12)
            .map(|i| p.left() + (i as f32 + 0.5) * p.width / 12.0)
            .map(|x| segment_speed(x, &p, &PADDLE_SPEED_TABLE).unwrap())
            .collect();
        assert_eq!(speeds, PADDLE_SPEED_TABLE.to_vec());
    }

    #[test]
    fn test_bounce_off_paddle() {
        let p = paddle();
        let mut b = ball(245.0, 742.0, 3.0, 10.0);
        bounce_off_paddle(&mut b, &p, &PADDLE_SPEED_TABLE);
        assert_eq!(b.vel, Vec2::new(-11.0, -10.0));
        assert_eq!(b.pos.y, 740.0);
    }

    #[test]
    fn test_empty_speed_table_leaves_ball() {
        let p = paddle();
        let mut b = ball(300.0, 742.0, 3.0, 10.0);
        bounce_off_paddle(&mut b, &p, &[]);
        assert_eq!(b.vel, Vec2::new(3.0, 10.0));
    }
}
