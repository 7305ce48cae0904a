//! Pixel primitives and the bounds-checked blit
//!
//! Buffer layout: row-major, top-left origin, 4 bytes per pixel in R,G,B,A
//! order, stride = `width * 4`. Every drawing routine funnels its writes
//! through [`write_index`], which silently drops anything outside the buffer.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::BYTES_PER_PIXEL;

/// Screen-space position (pixels, +y down)
pub type Position = Vec2;

/// An RGBA color, laid out exactly as it is stored in the pixel buffer
#[repr(C)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Background and broken-brick color
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const RED: Color = Color::rgba(255, 0, 0, 255);
    pub const CYAN: Color = Color::rgba(0, 255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// The four bytes written for this color
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Linear pixel index for `pos` on a screen `width` pixels wide.
///
/// Coordinates are floored. Rows are not clipped: an x past the right edge
/// lands on the next row, exactly as the flat index arithmetic implies.
#[inline]
pub fn pixel_index(pos: Position, width: u32) -> i64 {
    let x = pos.x.floor() as i64;
    let y = pos.y.floor() as i64;
    y.saturating_mul(width as i64).saturating_add(x)
}

/// Write one pixel by linear index. No-op unless the whole pixel fits.
#[inline]
pub fn write_index(buffer: &mut [u8], index: i64, color: Color) {
    let Ok(index) = usize::try_from(index) else {
        return;
    };
    let Some(start) = index.checked_mul(BYTES_PER_PIXEL) else {
        return;
    };
    let Some(end) = start.checked_add(BYTES_PER_PIXEL) else {
        return;
    };
    if let Some(pixel) = buffer.get_mut(start..end) {
        pixel.copy_from_slice(color.as_bytes());
    }
}

/// Write one pixel at a screen position. Off-screen writes are dropped.
#[inline]
pub fn write_pixel(buffer: &mut [u8], width: u32, pos: Position, color: Color) {
    if !pos.is_finite() {
        return;
    }
    write_index(buffer, pixel_index(pos, width), color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const W: u32 = 16;
    const H: u32 = 8;

    fn buffer() -> Vec<u8> {
        vec![0; (W * H) as usize * BYTES_PER_PIXEL]
    }

    #[test]
    fn test_color_bytes_are_rgba_order() {
        let c = Color::rgba(1, 2, 3, 4);
        assert_eq!(c.as_bytes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_write_pixel_in_bounds() {
        let mut buf = buffer();
        write_pixel(&mut buf, W, Vec2::new(3.0, 2.0), Color::RED);
        let i = ((2 * W + 3) as usize) * 4;
        assert_eq!(&buf[i..i + 4], &[255, 0, 0, 255]);
        assert_eq!(buf.iter().filter(|&&b| b != 0).count(), 2);
    }

    #[test]
    fn test_last_pixel_is_writable() {
        let mut buf = buffer();
        write_pixel(&mut buf, W, Vec2::new((W - 1) as f32, (H - 1) as f32), Color::WHITE);
        let n = buf.len();
        assert_eq!(&buf[n - 4..], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_negative_and_overflowing_writes_are_dropped() {
        let mut buf = buffer();
        write_pixel(&mut buf, W, Vec2::new(-1.0, 0.0), Color::WHITE);
        write_pixel(&mut buf, W, Vec2::new(0.0, H as f32), Color::WHITE);
        write_pixel(&mut buf, W, Vec2::new(f32::NAN, 1.0), Color::WHITE);
        write_pixel(&mut buf, W, Vec2::new(1.0, f32::MAX), Color::WHITE);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_x_past_edge_wraps_to_next_row() {
        let mut buf = buffer();
        write_pixel(&mut buf, W, Vec2::new(W as f32 + 2.0, 0.0), Color::WHITE);
        let i = ((W + 2) as usize) * 4;
        assert_eq!(buf[i + 3], 255);
    }

    #[test]
    fn test_short_buffer_drops_partial_pixel() {
        let mut buf = vec![0u8; 6];
        write_index(&mut buf, 1, Color::WHITE);
        assert!(buf.iter().all(|&b| b == 0));
        write_index(&mut buf, 0, Color::WHITE);
        assert_eq!(&buf[..4], &[255; 4]);
    }

    proptest! {
        #[test]
        fn prop_write_stays_in_bounds(x in -1.0e6f32..1.0e6, y in -1.0e6f32..1.0e6) {
            let mut buf = buffer();
            write_pixel(&mut buf, W, Vec2::new(x, y), Color::WHITE);

            let index = pixel_index(Vec2::new(x, y), W);
            let changed: Vec<usize> = buf
                .iter()
                .enumerate()
                .filter(|&(_, &b)| b != 0)
                .map(|(i, _)| i)
                .collect();

            if index >= 0 && (index as usize) < (W * H) as usize {
                let start = index as usize * 4;
                prop_assert_eq!(changed, (start..start + 4).collect::<Vec<_>>());
            } else {
                prop_assert!(changed.is_empty());
            }
        }
    }
}
