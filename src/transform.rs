//! The view transform: pan and zoom between screen and logical space.

use crate::geometry::{Point, GRID_CELL_SIZE};

/// Lower zoom bound.
pub const MIN_ZOOM: f32 = 0.2;
/// Upper zoom bound.
pub const MAX_ZOOM: f32 = 1.0;

/// Affine map from logical grid space to screen pixels:
/// `screen = translate + scale * logical`.
///
/// The translation is the pan offset in screen pixels and is unbounded (the
/// grid is conceptually infinite); the uniform scale is the zoom factor,
/// clamped to `[MIN_ZOOM, MAX_ZOOM]` whenever it is changed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    translate: Point,
    scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            translate: Point::ZERO,
            scale: 1.0,
        }
    }
}

impl ViewTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current pan offset in screen pixels.
    pub fn translate(&self) -> Point {
        self.translate
    }

    /// Current zoom factor.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Map a logical point to screen pixels.
    pub fn to_screen(&self, point: Point) -> Point {
        Point::new(
            self.translate.x + self.scale * point.x,
            self.translate.y + self.scale * point.y,
        )
    }

    /// Map a screen point back to logical space.
    ///
    /// A degenerate scale cannot be inverted; the point is then treated as
    /// already logical rather than panicking (the scale is always positive
    /// in practice).
    pub fn to_logical(&self, point: Point) -> Point {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return point;
        }
        Point::new(
            (point.x - self.translate.x) / self.scale,
            (point.y - self.translate.y) / self.scale,
        )
    }

    /// Accumulate a pan delta, in screen pixels. Never clamped.
    pub fn pan(&mut self, delta: Point) {
        self.translate = self.translate + delta;
    }

    /// Set the zoom factor, clamped to the valid range.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.scale = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Restore the identity transform (no pan, zoom 1).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The grid cell containing a logical point.
    pub fn logical_to_grid(&self, point: Point) -> (i32, i32) {
        (
            (point.x / GRID_CELL_SIZE).floor() as i32,
            (point.y / GRID_CELL_SIZE).floor() as i32,
        )
    }
}
