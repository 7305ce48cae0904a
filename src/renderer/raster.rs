//! Parallel software rasterizer
//!
//! Rectangles and full-buffer clears are split by linear pixel index across
//! the worker pool. Each worker receives its own disjoint `&mut` spans of the
//! buffer, so no locking is needed and the borrow checker proves the
//! partition is race-free. Circles are small and drawn serially.

use std::ops::Range;

use glam::Vec2;

use super::pixel::{Color, Position, write_index, write_pixel};
use super::pool::WorkerPool;
use crate::consts::{BYTES_PER_PIXEL, PARALLEL_MIN_PIXELS};

#[derive(Debug)]
pub struct Rasterizer {
    pool: WorkerPool,
    width: u32,
    height: u32,
}

impl Rasterizer {
    pub fn new(pool: WorkerPool, width: u32, height: u32) -> Self {
        Self {
            pool,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Size in bytes of a buffer covering the whole screen
    pub fn buffer_len(&self) -> usize {
        self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }

    /// Set every pixel to transparent black
    pub fn clear(&self, buffer: &mut [u8]) {
        let pixels = buffer.len() / BYTES_PER_PIXEL;
        let ranges = self.pool.partition(pixels);

        let mut jobs = Vec::with_capacity(ranges.len());
        let mut rest: &mut [u8] = buffer;
        for range in &ranges {
            let (span, tail) =
                std::mem::take(&mut rest).split_at_mut(range.len() * BYTES_PER_PIXEL);
            jobs.push(span);
            rest = tail;
        }

        self.pool
            .fan_out(jobs, |_, span| fill_span(span, Color::TRANSPARENT));
    }

    /// Fill an axis-aligned rectangle centred on `center`
    pub fn fill_rect(
        &self,
        buffer: &mut [u8],
        center: Position,
        width: f32,
        height: f32,
        color: Color,
    ) {
        if !center.is_finite() {
            return;
        }
        let w = width.max(0.0) as usize;
        let h = height.max(0.0) as usize;
        let Some(footprint) = w.checked_mul(h) else {
            log::warn!("Skipping {}x{} rectangle: footprint overflows", width, height);
            return;
        };
        if footprint == 0 {
            return;
        }

        let origin = center - Vec2::new(width, height) / 2.0;
        let sx = origin.x.floor() as i64;
        let sy = origin.y.floor() as i64;
        let stride = self.width as usize;

        // Rows wider than the screen would overlap once wrapped
        if footprint < PARALLEL_MIN_PIXELS || w > stride || self.pool.workers() == 1 {
            for j in 0..footprint {
                write_index(buffer, linear(sx, sy, stride, j % w, j / w), color);
            }
            return;
        }

        let pixels = buffer.len() / BYTES_PER_PIXEL;
        let ranges = self.pool.partition(footprint);
        let mut runs = Vec::new();
        for (job, range) in ranges.iter().enumerate() {
            footprint_runs(range, w, sx, sy, stride, pixels, |run| runs.push((job, run)));
        }

        let jobs: Vec<Vec<&mut [u8]>> = split_runs(buffer, runs, ranges.len())
            .into_iter()
            .filter(|spans| !spans.is_empty())
            .collect();

        self.pool.fan_out(jobs, |_, spans| {
            for span in spans {
                fill_span(span, color);
            }
        });
    }

    /// Fill a circle using the `dx² + dy² < r²` test over its bounding square
    pub fn fill_circle(&self, buffer: &mut [u8], center: Position, radius: f32, color: Color) {
        if !center.is_finite() || radius <= 0.0 {
            return;
        }
        let r = radius.ceil() as i32;
        let r2 = radius * radius;
        for dy in -r..r {
            for dx in -r..r {
                let (fx, fy) = (dx as f32, dy as f32);
                if fx * fx + fy * fy < r2 {
                    write_pixel(buffer, self.width, center + Vec2::new(fx, fy), color);
                }
            }
        }
    }

    /// Serial fill of a small block whose top-left corner is `origin`
    pub fn fill_block(&self, buffer: &mut [u8], origin: Position, size: f32, color: Color) {
        let n = size.max(0.0) as usize;
        for y in 0..n {
            for x in 0..n {
                write_pixel(buffer, self.width, origin + Vec2::new(x as f32, y as f32), color);
            }
        }
    }
}

/// Linear pixel index of footprint cell (x, y) for a rectangle at (sx, sy)
#[inline]
fn linear(sx: i64, sy: i64, stride: usize, x: usize, y: usize) -> i64 {
    sy.saturating_add(y as i64)
        .saturating_mul(stride as i64)
        .saturating_add(sx)
        .saturating_add(x as i64)
}

/// Convert a footprint index range into row runs of buffer pixels, clipped
/// to `0..pixels`. Runs come out in ascending buffer order.
fn footprint_runs(
    range: &Range<usize>,
    w: usize,
    sx: i64,
    sy: i64,
    stride: usize,
    pixels: usize,
    mut emit: impl FnMut(Range<usize>),
) {
    if range.is_empty() {
        return;
    }
    let first_row = range.start / w;
    let last_row = (range.end - 1) / w;
    for row in first_row..=last_row {
        let col_start = if row == first_row { range.start % w } else { 0 };
        let col_end = if row == last_row { (range.end - 1) % w + 1 } else { w };

        let start = linear(sx, sy, stride, col_start, row);
        let end = start.saturating_add((col_end - col_start) as i64);
        let start = start.clamp(0, pixels as i64) as usize;
        let end = end.clamp(0, pixels as i64) as usize;
        if start < end {
            emit(start..end);
        }
    }
}

/// Carve the buffer into per-job spans. Runs may arrive in any order; any
/// overlap is trimmed so each pixel belongs to one job only.
fn split_runs(
    buffer: &mut [u8],
    mut runs: Vec<(usize, Range<usize>)>,
    jobs: usize,
) -> Vec<Vec<&mut [u8]>> {
    runs.sort_by_key(|(_, run)| run.start);

    let mut out: Vec<Vec<&mut [u8]>> = (0..jobs).map(|_| Vec::new()).collect();
    let mut rest: &mut [u8] = buffer;
    let mut cursor = 0;
    for (job, run) in runs {
        let start = run.start.max(cursor);
        if start >= run.end {
            continue;
        }
        let tail = std::mem::take(&mut rest);
        let (_, tail) = tail.split_at_mut((start - cursor) * BYTES_PER_PIXEL);
        let (span, tail) = tail.split_at_mut((run.end - start) * BYTES_PER_PIXEL);
        if let Some(spans) = out.get_mut(job) {
            spans.push(span);
        }
        rest = tail;
        cursor = run.end;
    }
    out
}

/// Write `color` into every whole pixel of a span
fn fill_span(span: &mut [u8], color: Color) {
    let pixels = span.len() / BYTES_PER_PIXEL;
    for i in 0..pixels {
        write_index(span, i as i64, color);
    }
}
