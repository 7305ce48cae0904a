//! Software rendering into a raw RGBA pixel buffer
//!
//! Rectangles and clears are fanned out across a fixed worker pool; every
//! pixel goes through the bounds-checked writer in `pixel`.

pub mod hud;
pub mod pixel;
pub mod pool;
pub mod raster;

pub use pixel::{Color, Position, pixel_index, write_index, write_pixel};
pub use pool::{WorkerPool, partition};
pub use raster::Rasterizer;
