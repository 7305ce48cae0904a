//! Per-frame façade: advance the session, then draw it into the caller's
//! RGBA buffer
//!
//! The presentation layer owns the buffer and the window. Each call to
//! [`Game::frame`] ticks the simulation once and then rasterizes the result;
//! once `frame` returns the buffer is complete and safe to present.

use crate::consts::BYTES_PER_PIXEL;
use crate::error::Result;
use crate::renderer::{Rasterizer, WorkerPool, hud};
use crate::settings::Settings;
use crate::sim::{FrameInput, GameEvent, GamePhase, PaddleId, Session, tick};

pub struct Game {
    session: Session,
    raster: Rasterizer,
}

impl Game {
    /// Validate settings, spin up the worker pool and build a fresh session
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let pool = match settings.workers {
            Some(workers) => WorkerPool::new(workers)?,
            None => WorkerPool::with_available_parallelism()?,
        };
        let raster = Rasterizer::new(pool, settings.screen_width, settings.screen_height);
        let session = Session::new(settings, raster.pool());
        log::info!(
            "Game ready: {}x{}, {} workers, {} bricks",
            raster.width(),
            raster.height(),
            raster.pool().workers(),
            session.wall.remaining()
        );
        Ok(Self { session, raster })
    }

    /// Tick once and redraw. `buffer` must be `buffer_len()` bytes; a
    /// shorter buffer just loses whatever falls off its end.
    pub fn frame(&mut self, input: &FrameInput, buffer: &mut [u8]) -> Vec<GameEvent> {
        let events = tick(&mut self.session, input);
        for event in &events {
            log::trace!("{:?}", event);
        }
        self.draw(buffer);
        events
    }

    /// Rasterize the current session without advancing it
    pub fn draw(&self, buffer: &mut [u8]) {
        let raster = &self.raster;
        raster.clear(buffer);

        let session = &self.session;
        if session.finished || !matches!(session.phase, GamePhase::Start | GamePhase::Play) {
            return;
        }

        for brick in session.wall.bricks.iter().filter(|b| !b.is_broken()) {
            raster.fill_rect(buffer, brick.pos, brick.width, brick.height, brick.color);
        }

        for paddle in &session.paddles {
            for ball in &paddle.balls {
                raster.fill_circle(buffer, ball.pos, ball.radius, ball.color);
            }
        }

        let settings = &session.settings;
        for paddle in &session.paddles {
            raster.fill_rect(buffer, paddle.pos, paddle.width, paddle.height, paddle.color);
        }
        if let Some(paddle) = session.paddle(PaddleId::PRIMARY) {
            let origin = hud::score_origin(raster, paddle.score);
            hud::draw_score(raster, buffer, paddle.score, origin, settings.score_color);
            hud::draw_lives(raster, buffer, paddle.lives, settings.life_color);
        }
    }

    pub fn current_state(&self) -> GamePhase {
        self.session.phase
    }

    pub fn score(&self) -> u32 {
        self.session.score()
    }

    pub fn lives(&self) -> u32 {
        self.session.lives()
    }

    /// True once a win has been acknowledged
    pub fn is_finished(&self) -> bool {
        self.session.finished
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.session.settings
    }

    /// Bytes needed for one full frame
    pub fn buffer_len(&self) -> usize {
        self.raster.buffer_len()
    }

    /// A zeroed buffer sized for this game's screen
    pub fn new_buffer(&self) -> Vec<u8> {
        vec![0; self.buffer_len()]
    }

    /// Pixel count of the screen
    pub fn pixel_count(&self) -> usize {
        self.buffer_len() / BYTES_PER_PIXEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Color;
    use glam::Vec2;

    const CONFIRM: FrameInput = FrameInput {
        left: false,
        right: false,
        confirm: true,
    };

    fn game() -> Game {
        Game::new(Settings {
            workers: Some(4),
            ..Settings::default()
        })
        .unwrap()
    }

    fn pixel(game: &Game, buf: &[u8], x: u32, y: u32) -> Color {
        let i = (y * game.settings().screen_width + x) as usize * BYTES_PER_PIXEL;
        Color::rgba(buf[i], buf[i + 1], buf[i + 2], buf[i + 3])
    }

    #[test]
    fn test_new_game_defaults() {
        let game = game();
        assert_eq!(game.current_state(), GamePhase::Start);
        assert_eq!(game.lives(), 3);
        assert_eq!(game.score(), 0);
        assert_eq!(game.buffer_len(), 600 * 800 * 4);
        assert_eq!(game.pixel_count(), 480_000);
        assert!(!game.is_finished());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            workers: Some(0),
            ..Settings::default()
        };
        assert!(Game::new(settings).is_err());

        for json in [
            r#"{ "paddle_width": 1e30, "workers": 2 }"#,
            r#"{ "brick_width": 1e30, "workers": 2 }"#,
        ] {
            let settings: Settings = serde_json::from_str(json).unwrap();
            assert!(Game::new(settings).is_err(), "{json} should be rejected");
        }
    }

    #[test]
    fn test_start_frame_draws_scene() {
        let mut game = game();
        let mut buf = game.new_buffer();
        game.frame(&FrameInput::default(), &mut buf);

        // Paddle centre, ball centre, a live brick and empty background
        assert_eq!(pixel(&game, &buf, 300, 750), Color::WHITE);
        assert_eq!(pixel(&game, &buf, 300, 500), Color::WHITE);
        let brick = game.session().wall.brick(4, 0).unwrap().clone();
        assert_eq!(
            pixel(&game, &buf, brick.pos.x as u32, brick.pos.y as u32),
            brick.color
        );
        assert_eq!(pixel(&game, &buf, 300, 600), Color::TRANSPARENT);
        // Broken cells stay background
        assert_eq!(pixel(&game, &buf, 100, 40), Color::TRANSPARENT);
    }

    #[test]
    fn test_hud_drawn_near_bottom() {
        let mut game = game();
        let mut buf = game.new_buffer();
        game.frame(&FrameInput::default(), &mut buf);

        let red = buf
            .chunks_exact(BYTES_PER_PIXEL)
            .filter(|p| *p == Color::RED.as_bytes())
            .count();
        assert!(red > 0);
        // First heart's top row starts one cell in from the margin
        assert_eq!(pixel(&game, &buf, 14, 771), Color::RED);
    }

    #[test]
    fn test_frame_overwrites_stale_pixels() {
        let mut game = game();
        let mut buf = vec![0xAB; game.buffer_len()];
        game.frame(&FrameInput::default(), &mut buf);
        assert_eq!(pixel(&game, &buf, 300, 600), Color::TRANSPARENT);
    }

    #[test]
    fn test_lose_screen_is_blank() {
        let mut game = game();
        game.session_mut().phase = GamePhase::Lose;
        let mut buf = game.new_buffer();
        game.frame(&FrameInput::default(), &mut buf);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_win_acknowledged_finishes() {
        let mut game = game();
        game.session_mut().phase = GamePhase::Win;
        let mut buf = game.new_buffer();
        let events = game.frame(&CONFIRM, &mut buf);
        assert!(game.is_finished());
        assert_eq!(events, vec![GameEvent::SessionEnded]);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_ball_drawn_after_moving() {
        let mut game = game();
        let mut buf = game.new_buffer();
        game.frame(&CONFIRM, &mut buf);
        assert_eq!(game.current_state(), GamePhase::Play);
        assert_eq!(game.session().paddles[0].balls[0].pos, Vec2::new(300.0, 510.0));
        assert_eq!(pixel(&game, &buf, 300, 510), Color::WHITE);
        assert_eq!(pixel(&game, &buf, 300, 500), Color::TRANSPARENT);
    }

    #[test]
    fn test_short_buffer_is_tolerated() {
        let mut game = game();
        let mut buf = vec![0; 1000];
        game.frame(&FrameInput::default(), &mut buf);
    }
}
