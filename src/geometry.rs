/*
 * Geometry Module
 *
 * This module provides the small set of geometric helpers the engine needs
 * on top of glam's DVec2 vector arithmetic:
 * - Area: the axis-aligned rectangle boids wrap around in
 * - CellCoord: quantized grid cell coordinates for the spatial index
 * - magnitude clamping and toroidal wrapping used by the physics step
 */

use glam::DVec2;

use crate::{CELL_SIZE, HALF_WORLD_SIZE};

// An axis-aligned rectangle in world coordinates. The y axis grows downward
// (top < bottom), matching the windowing convention of the consumer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Area {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Area {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    // Visible area for a viewport of the given pixel dimensions, keeping at
    // least -HALF_WORLD_SIZE..HALF_WORLD_SIZE visible on each axis and
    // extending the longer axis to preserve aspect ratio.
    pub fn for_viewport(width: u32, height: u32) -> Self {
        let height = height.max(1);
        let width = width.max(1);

        if width > height {
            let relative_width = f64::from(width) / f64::from(height);
            Self {
                left: -relative_width * HALF_WORLD_SIZE,
                right: relative_width * HALF_WORLD_SIZE,
                top: -HALF_WORLD_SIZE,
                bottom: HALF_WORLD_SIZE,
            }
        } else {
            let relative_height = f64::from(height) / f64::from(width);
            Self {
                left: -HALF_WORLD_SIZE,
                right: HALF_WORLD_SIZE,
                top: -relative_height * HALF_WORLD_SIZE,
                bottom: relative_height * HALF_WORLD_SIZE,
            }
        }
    }

    // Map a pixel position inside a viewport of the given dimensions to the
    // world point it covers. Used to place the attractor under the cursor.
    pub fn viewport_to_world(&self, pixel_x: f64, pixel_y: f64, width: u32, height: u32) -> DVec2 {
        DVec2::new(
            pixel_x / f64::from(width.max(1)) * self.width() + self.left,
            pixel_y / f64::from(height.max(1)) * self.height() + self.top,
        )
    }
}

impl Default for Area {
    fn default() -> Self {
        Self {
            top: -HALF_WORLD_SIZE,
            bottom: HALF_WORLD_SIZE,
            left: -HALF_WORLD_SIZE,
            right: HALF_WORLD_SIZE,
        }
    }
}

// Integer grid cell coordinates, each axis the truncating division of the
// world coordinate by CELL_SIZE. Truncation (not flooring) matches the
// quantization used when the grid was built, so lookups stay consistent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

#[inline]
pub fn cell_of(position: DVec2) -> CellCoord {
    CellCoord {
        x: (position.x / CELL_SIZE) as i32,
        y: (position.y / CELL_SIZE) as i32,
    }
}

// Angle of the vector in radians, measured from the positive x axis.
#[inline]
pub fn heading(v: DVec2) -> f64 {
    v.y.atan2(v.x)
}

// Scale the vector down to the given magnitude if it exceeds it, preserving
// direction. Compares squared magnitudes so the common in-limit case avoids
// the square root.
#[inline]
pub fn clamp_magnitude(v: DVec2, limit: f64) -> DVec2 {
    let square_magnitude = v.length_squared();
    if square_magnitude > limit * limit {
        v * (limit / square_magnitude.sqrt())
    } else {
        v
    }
}

// Wrap a position into [left, right) x [top, bottom) of the area, so leaving
// one edge re-enters at the opposite edge. rem_euclid handles arbitrarily
// large offsets in either direction in one step. A degenerate area (zero or
// negative extent) leaves the position untouched rather than looping forever.
pub fn wrap_into(position: DVec2, area: &Area) -> DVec2 {
    let width = area.width();
    let height = area.height();
    if width <= 0.0 || height <= 0.0 {
        return position;
    }

    DVec2::new(
        area.left + (position.x - area.left).rem_euclid(width),
        area.top + (position.y - area.top).rem_euclid(height),
    )
}
