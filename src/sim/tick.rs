//! Per-frame simulation tick
//!
//! All paddle, ball and score mutation happens here on one thread, in a
//! fixed order: input transitions, brick collisions, ball motion, outcome
//! application, win check, paddle motion.

use glam::Vec2;

use super::collision::{bounce_off_paddle, impact_brick, touches_paddle};
use super::state::{Ball, BallId, GameEvent, GamePhase, PaddleId, Session};
use crate::settings::{BonusSpawn, ScoringRule};

/// Input snapshot for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    /// Launch from Start, acknowledge Lose/Win
    pub confirm: bool,
}

/// Advance the session by one frame, returning what happened
pub fn tick(session: &mut Session, input: &FrameInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if session.finished {
        return events;
    }
    session.frame += 1;

    if input.confirm {
        match session.phase {
            GamePhase::Start => set_phase(session, GamePhase::Play, &mut events),
            GamePhase::Lose => {
                session.reset_after_loss();
                set_phase(session, GamePhase::Start, &mut events);
            }
            GamePhase::Win => {
                session.finished = true;
                events.push(GameEvent::SessionEnded);
                log::info!("Session ended with score {}", session.score());
                return events;
            }
            GamePhase::Play => {}
        }
    }

    if session.phase == GamePhase::Play {
        resolve_brick_collisions(session, &mut events);
        move_balls(session, &mut events);

        if session.phase == GamePhase::Play && session.wall.all_broken() {
            set_phase(session, GamePhase::Win, &mut events);
        }
    }

    let width = session.settings.screen_width as f32;
    for paddle in &mut session.paddles {
        paddle.steer(input.left, input.right, width);
    }

    events
}

fn set_phase(session: &mut Session, to: GamePhase, events: &mut Vec<GameEvent>) {
    let from = session.phase;
    if from == to {
        return;
    }
    session.phase = to;
    events.push(GameEvent::PhaseChanged { from, to });
    log::info!("Phase {:?} -> {:?}", from, to);
}

/// Every ball against every live brick. Bonus balls earned here are
/// spawned after the pass, so they first collide next frame.
fn resolve_brick_collisions(session: &mut Session, events: &mut Vec<GameEvent>) {
    let mut bonus: Vec<(PaddleId, Ball)> = Vec::new();
    {
        let Session {
            settings,
            paddles,
            wall,
            ..
        } = &mut *session;

        for (index, brick) in wall.bricks.iter_mut().enumerate() {
            if brick.is_broken() {
                continue;
            }
            for (slot, paddle) in paddles.iter_mut().enumerate() {
                for ball in &mut paddle.balls {
                    let before = ball.clone();
                    let Some(hit) =
                        impact_brick(ball, brick, &wall.palette, settings.impact_tolerance)
                    else {
                        continue;
                    };

                    events.push(GameEvent::BrickHit {
                        brick: index,
                        durability: hit.durability,
                    });
                    if hit.broke() {
                        events.push(GameEvent::BrickBroken { brick: index });
                    }

                    let reward = match settings.scoring {
                        ScoringRule::PerHit => brick.reward,
                        ScoringRule::PerBreak if hit.broke() => brick.reward,
                        ScoringRule::PerBreak => 0,
                    };
                    if reward == 0 {
                        continue;
                    }
                    paddle.score = paddle.score.saturating_add(reward);
                    // A zero threshold disables bonus balls
                    if paddle.score.checked_rem(settings.bonus_threshold) == Some(0) {
                        bonus.push((PaddleId(slot), before));
                    }
                }
            }
        }
    }

    for (owner, hitter) in bonus {
        let id = spawn_bonus_ball(session, owner, &hitter);
        events.push(GameEvent::BonusBall { ball: id });
    }
}

/// Append a bonus ball for `owner`, shrinking the paddle if configured
fn spawn_bonus_ball(session: &mut Session, owner: PaddleId, hitter: &Ball) -> BallId {
    let id = session.next_ball_id();
    let settings = &session.settings;
    let (pos, vel) = match settings.bonus_spawn {
        BonusSpawn::CloneHitter => (hitter.pos, hitter.vel),
        BonusSpawn::FromServe => (settings.ball_serve_position(), -settings.ball_serve_velocity),
    };
    let ball = Ball {
        id,
        pos,
        vel,
        radius: hitter.radius,
        color: settings.bonus_ball_color,
        owner,
    };
    let (shrink, min_width) = (settings.paddle_shrink_on_bonus, settings.min_paddle_width);

    if let Some(paddle) = session.paddle_mut(owner) {
        paddle.balls.push(ball);
        if shrink > 0.0 && paddle.width > min_width {
            paddle.width = (paddle.width - shrink).max(min_width);
        }
        log::info!(
            "Bonus ball {:?} at score {} ({} in play)",
            id,
            paddle.score,
            paddle.balls.len()
        );
    }
    id
}

/// Integrate every ball, bounce off screen edges and the paddle, and settle
/// balls that fell past the bottom edge
fn move_balls(session: &mut Session, events: &mut Vec<GameEvent>) {
    let width = session.settings.screen_width as f32;
    let height = session.settings.screen_height as f32;
    let mut lives_out = false;

    for slot in 0..session.paddles.len() {
        let paddle_spawn = session.settings.paddle_spawn();
        let Session {
            settings, paddles, ..
        } = &mut *session;
        let paddle = &mut paddles[slot];
        let rect = paddle.rect();

        let mut lost: Vec<BallId> = Vec::new();
        let mut life_lost = false;
        let mut remaining = paddle.balls.len();

        for ball in &mut paddle.balls {
            ball.integrate();
            ball.bounce_off_edges(width);

            if ball.has_exited(height) {
                if remaining > 1 {
                    lost.push(ball.id);
                    remaining -= 1;
                } else {
                    ball.serve(settings);
                    life_lost = true;
                }
                continue;
            }

            if touches_paddle(ball, &rect) {
                bounce_off_paddle(ball, &rect, &settings.speed_table);
            }
        }

        if !lost.is_empty() {
            paddle.balls.retain(|b| !lost.contains(&b.id));
            for id in lost {
                log::debug!("Ball {:?} lost ({} left)", id, paddle.balls.len());
                events.push(GameEvent::BallLost { ball: id });
            }
        }

        if life_lost {
            paddle.pos = paddle_spawn;
            paddle.lives = paddle.lives.saturating_sub(1);
            events.push(GameEvent::LifeLost { lives: paddle.lives });
            log::info!("Life lost, {} remaining", paddle.lives);
            lives_out |= paddle.lives == 0;
        }
    }

    if events.iter().any(|e| matches!(e, GameEvent::LifeLost { .. })) {
        let to = if lives_out {
            GamePhase::Lose
        } else {
            GamePhase::Start
        };
        set_phase(session, to, events);
    }
}

/// Simple paddle AI: chase the lowest falling ball, launching and
/// acknowledging whenever asked
pub fn autopilot(session: &Session) -> FrameInput {
    let mut input = FrameInput {
        confirm: session.phase != GamePhase::Play,
        ..FrameInput::default()
    };
    let Some(paddle) = session.paddle(PaddleId::PRIMARY) else {
        return input;
    };

    let lowest = |falling: bool| {
        paddle
            .balls
            .iter()
            .filter(|b| !falling || b.vel.y > 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|b| b.pos)
    };
    let Some(target) = lowest(true).or_else(|| lowest(false)) else {
        return input;
    };

    // Oscillate the aim point along the paddle to vary the rebound angle
    let sway = (session.frame as f32 * 0.05).sin() * paddle.width * 0.35;
    let aim = Vec2::new(target.x - sway, target.y);
    let dead_zone = paddle.speed / 2.0;

    if aim.x < paddle.pos.x - dead_zone {
        input.left = true;
    } else if aim.x > paddle.pos.x + dead_zone {
        input.right = true;
    }
    input
}
