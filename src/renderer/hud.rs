//! HUD bitmap stencils: score digits and life icons

use glam::Vec2;

use super::pixel::{Color, Position};
use super::raster::Rasterizer;

/// Digit glyph size in stencil cells
pub const DIGIT_COLUMNS: usize = 5;
pub const DIGIT_ROWS: usize = 7;
/// Horizontal advance between digits, in stencil cells
pub const DIGIT_ADVANCE: usize = 6;
/// Heart glyph size in stencil cells (square)
pub const HEART_SIZE: usize = 7;
/// Screen pixels per stencil cell
pub const HUD_SCALE: f32 = 3.0;
/// Distance between life icons
pub const LIFE_SPACING: f32 = 25.0;
/// Left margin of the first life icon
pub const LIFE_MARGIN: f32 = 10.0;

#[rustfmt::skip]
const DIGITS: [[u8; DIGIT_COLUMNS * DIGIT_ROWS]; 10] = [
    [0,1,1,1,0, 1,0,0,0,1, 1,0,0,0,1, 1,0,0,0,1, 1,0,0,0,1, 1,0,0,0,1, 0,1,1,1,0],
    [0,0,1,0,0, 0,1,1,0,0, 0,0,1,0,0, 0,0,1,0,0, 0,0,1,0,0, 0,0,1,0,0, 0,1,1,1,0],
    [0,1,1,1,0, 1,0,0,0,1, 0,0,0,0,1, 0,0,0,1,0, 0,0,1,0,0, 0,1,0,0,0, 1,1,1,1,1],
    [0,1,1,1,0, 1,0,0,0,1, 0,0,0,0,1, 0,1,1,1,0, 0,0,0,0,1, 1,0,0,0,1, 0,1,1,1,0],
    [0,0,1,1,0, 0,1,0,1,0, 1,0,0,1,0, 1,1,1,1,1, 0,0,0,1,0, 0,0,0,1,0, 0,0,0,1,0],
    [1,1,1,1,1, 1,0,0,0,0, 1,1,1,1,0, 0,0,0,0,1, 0,0,0,0,1, 1,0,0,0,1, 0,1,1,1,0],
    [0,1,1,1,0, 1,0,0,0,1, 1,0,0,0,0, 1,1,1,1,0, 1,0,0,0,1, 1,0,0,0,1, 0,1,1,1,0],
    [1,1,1,1,1, 0,0,0,0,1, 0,0,0,1,0, 0,0,1,0,0, 0,0,1,0,0, 0,0,1,0,0, 0,0,1,0,0],
    [0,1,1,1,0, 1,0,0,0,1, 1,0,0,0,1, 0,1,1,1,0, 1,0,0,0,1, 1,0,0,0,1, 0,1,1,1,0],
    [0,1,1,1,0, 1,0,0,0,1, 1,0,0,0,1, 0,1,1,1,1, 0,0,0,0,1, 1,0,0,0,1, 0,1,1,1,0],
];

#[rustfmt::skip]
const HEART: [u8; HEART_SIZE * HEART_SIZE] = [
    0,1,1,0,1,1,0,
    1,1,1,1,1,1,1,
    1,1,1,1,1,1,1,
    0,1,1,1,1,1,0,
    0,0,1,1,1,0,0,
    0,0,0,1,0,0,0,
    0,0,0,0,0,0,0,
];

/// Stamp a 0/1 stencil, `columns` cells wide, with its top-left at `origin`
pub fn stamp(
    raster: &Rasterizer,
    buffer: &mut [u8],
    stencil: &[u8],
    columns: usize,
    origin: Position,
    scale: f32,
    color: Color,
) {
    for (i, &cell) in stencil.iter().enumerate() {
        if cell == 0 {
            continue;
        }
        let cell_pos = Vec2::new((i % columns) as f32, (i / columns) as f32) * scale;
        raster.fill_block(buffer, origin + cell_pos, scale, color);
    }
}

/// Decimal digits of `value`, most significant first
pub fn digits(value: u32) -> Vec<u8> {
    value
        .to_string()
        .bytes()
        .map(|b| b - b'0')
        .collect()
}

/// Pixel width of a rendered score
pub fn score_width(value: u32) -> f32 {
    let n = digits(value).len();
    (n * DIGIT_ADVANCE - (DIGIT_ADVANCE - DIGIT_COLUMNS)) as f32 * HUD_SCALE
}

/// Draw `score` with the first digit's top-left at `origin`
pub fn draw_score(
    raster: &Rasterizer,
    buffer: &mut [u8],
    score: u32,
    origin: Position,
    color: Color,
) {
    for (i, digit) in digits(score).into_iter().enumerate() {
        let advance = Vec2::new((i * DIGIT_ADVANCE) as f32 * HUD_SCALE, 0.0);
        stamp(
            raster,
            buffer,
            &DIGITS[digit as usize],
            DIGIT_COLUMNS,
            origin + advance,
            HUD_SCALE,
            color,
        );
    }
}

/// Draw one heart per remaining life along the bottom-left edge
pub fn draw_lives(raster: &Rasterizer, buffer: &mut [u8], lives: u32, color: Color) {
    let y = raster.height() as f32 - 30.0;
    for life in 0..lives {
        let origin = Vec2::new(LIFE_MARGIN + life as f32 * LIFE_SPACING, y);
        stamp(raster, buffer, &HEART, HEART_SIZE, origin, HUD_SCALE, color);
    }
}

/// Top-left corner that right-aligns a score near the bottom-right corner
pub fn score_origin(raster: &Rasterizer, score: u32) -> Position {
    let height = DIGIT_ROWS as f32 * HUD_SCALE;
    Vec2::new(
        raster.width() as f32 - LIFE_MARGIN - score_width(score),
        raster.height() as f32 - 20.0 - height / 2.0,
    )
}
