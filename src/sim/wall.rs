//! Brick wall: fixed 9×17 templates, durability palettes, snapshot restore

use std::sync::{Mutex, PoisonError};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Brick;
use crate::consts::{WALL_COLUMNS, WALL_ROWS};
use crate::renderer::{Color, WorkerPool};
use crate::settings::{Settings, WallLayout};

type Template = [u8; WALL_COLUMNS * WALL_ROWS];

#[rustfmt::skip]
const CLASSIC: Template = [
    0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 2, 0, 0, 0, 0, 0, 0, 0,
    1, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 2, 2, 3, 0, 0,
    0, 0, 0, 0, 2, 2, 3, 0, 0,
    0, 0, 0, 0, 2, 2, 3, 0, 0,
    0, 0, 0, 0, 0, 0, 3, 0, 0,
    0, 0, 0, 1, 1, 1, 3, 0, 0,
    0, 0, 0, 1, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0,
    1, 0, 0, 0, 0, 0, 0, 0, 0,
];

#[rustfmt::skip]
const FORTRESS: Template = [
    0, 1, 2, 3, 4, 5, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0,
    1, 1, 1, 1, 1, 0, 0, 0, 0,
    1, 1, 1, 1, 1, 0, 0, 0, 0,
    1, 1, 1, 1, 1, 0, 0, 0, 0,
    1, 1, 1, 1, 1, 0, 0, 0, 0,
    1, 1, 1, 1, 1, 0, 0, 0, 0,
    1, 1, 1, 1, 1, 0, 5, 5, 0,
    1, 1, 1, 1, 1, 5, 5, 0, 5,
    1, 1, 1, 1, 1, 5, 5, 5, 5,
    1, 1, 1, 1, 1, 5, 5, 5, 5,
    1, 1, 1, 1, 1, 5, 5, 5, 5,
    1, 1, 1, 1, 1, 0, 0, 0, 0,
];

const CLASSIC_PALETTE: [Color; 4] = [
    Color::TRANSPARENT,
    Color::rgba(255, 0, 0, 255),   // red
    Color::rgba(128, 128, 128, 255), // grey
    Color::rgba(30, 240, 0, 255),  // bright green
];

const FORTRESS_PALETTE: [Color; 6] = [
    Color::TRANSPARENT,
    Color::rgba(255, 152, 152, 255),
    Color::rgba(255, 84, 84, 255),
    Color::rgba(255, 0, 0, 255),
    Color::rgba(190, 0, 0, 255),
    Color::rgba(120, 0, 0, 255),
];

impl WallLayout {
    fn template(&self) -> &'static Template {
        match self {
            WallLayout::Classic => &CLASSIC,
            WallLayout::Fortress => &FORTRESS,
        }
    }

    fn palette(&self) -> &'static [Color] {
        match self {
            WallLayout::Classic => &CLASSIC_PALETTE,
            WallLayout::Fortress => &FORTRESS_PALETTE,
        }
    }
}

/// Durability → display color. Entry 0 is the broken sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette(Vec<Color>);

impl Palette {
    pub fn new(colors: Vec<Color>) -> Self {
        Self(colors)
    }

    /// Color shown by a brick with `durability` hits left. Values past the
    /// end of the table use the last entry.
    pub fn color(&self, durability: u32) -> Color {
        self.0
            .get(durability as usize)
            .or(self.0.last())
            .copied()
            .unwrap_or(Color::TRANSPARENT)
    }

    /// Color of a broken brick (same as the background)
    pub fn broken(&self) -> Color {
        self.color(0)
    }
}

/// The full grid of bricks, stored row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub bricks: Vec<Brick>,
    pub palette: Palette,
    pub columns: usize,
    pub rows: usize,
}

impl Wall {
    /// Build the wall for the configured layout
    pub fn build(settings: &Settings, pool: &WorkerPool) -> Self {
        let layout = settings.layout;
        let wall = Self::from_template(
            layout.template(),
            WALL_COLUMNS,
            Palette::new(layout.palette().to_vec()),
            settings,
            pool,
        );
        log::debug!(
            "Built {} wall: {} bricks, {} live",
            layout.as_str(),
            wall.bricks.len(),
            wall.remaining()
        );
        wall
    }

    /// Build a wall from a row-major durability template.
    ///
    /// Cells are laid out in parallel; the shared brick list is the one
    /// lock-protected collection in the game. Bricks end up in template order.
    pub fn from_template(
        template: &[u8],
        columns: usize,
        palette: Palette,
        settings: &Settings,
        pool: &WorkerPool,
    ) -> Self {
        let columns = columns.max(1);
        let rows = template.len().div_ceil(columns);
        let built: Mutex<Vec<(usize, Brick)>> = Mutex::new(Vec::with_capacity(template.len()));

        pool.parallel_for(template.len(), |range| {
            for index in range {
                let durability = u32::from(template[index]);
                let brick = Brick {
                    pos: cell_center(settings, columns, rows, index / columns, index % columns),
                    width: settings.brick_width,
                    height: settings.brick_height,
                    color: palette.color(durability),
                    durability,
                    reward: settings.brick_reward,
                };
                built
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push((index, brick));
            }
        });

        let mut built = built.into_inner().unwrap_or_else(PoisonError::into_inner);
        built.sort_by_key(|(index, _)| *index);

        Self {
            bricks: built.into_iter().map(|(_, brick)| brick).collect(),
            palette,
            columns,
            rows,
        }
    }

    /// Bricks still standing
    pub fn remaining(&self) -> usize {
        self.bricks.iter().filter(|b| !b.is_broken()).count()
    }

    /// True when every brick shows the broken color
    pub fn all_broken(&self) -> bool {
        let broken = self.palette.broken();
        self.bricks.iter().all(|b| b.color == broken)
    }

    /// Overwrite brick state with the snapshot's
    pub fn restore_from(&mut self, snapshot: &Wall) {
        self.bricks.clone_from(&snapshot.bricks);
        log::debug!("Wall restored ({} live bricks)", self.remaining());
    }

    pub fn brick(&self, row: usize, column: usize) -> Option<&Brick> {
        if column >= self.columns {
            return None;
        }
        self.bricks.get(row * self.columns + column)
    }
}

/// Screen centre of cell (row, column) for a wall centred on
/// `settings.wall_center`, with `brick_gap` between neighbours
pub fn cell_center(
    settings: &Settings,
    columns: usize,
    rows: usize,
    row: usize,
    column: usize,
) -> Vec2 {
    let (w, h, gap) = (settings.brick_width, settings.brick_height, settings.brick_gap);
    let start = settings.wall_center
        - Vec2::new(w * columns as f32, h * rows as f32) / 2.0
        + Vec2::new(w, h) / 2.0;
    start + Vec2::new(column as f32 * (w + gap), row as f32 * (h + gap))
}
