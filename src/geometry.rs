//! Fixed footprint geometry shared by rendering and hit testing.
//!
//! All nodes share one rectangular footprint derived from the grid cell
//! size; input ports sit in a row immediately above the node and the single
//! output port sits at the bottom-left. Everything here works in logical
//! (grid-space) pixels, before the view transform is applied.

use std::ops::{Add, Sub};

/// Size of one grid cell in logical pixels.
pub const GRID_CELL_SIZE: f32 = 40.0;
/// Width of every node body.
pub const NODE_WIDTH: f32 = GRID_CELL_SIZE * 4.0 - 10.0;
/// Height of every node body.
pub const NODE_HEIGHT: f32 = GRID_CELL_SIZE - 10.0;
/// Width of a port rectangle.
pub const PORT_WIDTH: f32 = 10.0;
/// Height of a port rectangle.
pub const PORT_HEIGHT: f32 = 3.0;
/// Horizontal gap between adjacent input ports.
pub const PORT_SPACING: f32 = 10.0;
/// Margin added on every side of a port rectangle when hit testing.
pub const PORT_HIT_MARGIN: f32 = 2.0;

/// A point or vector in either screen or logical space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// An axis-aligned rectangle with half-open containment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Containment test; points on the right/bottom edge are outside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Expand the rectangle by `margin` on every side.
    pub fn grown(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }
}

/// Top-left corner of a node's footprint in logical pixels.
///
/// Positions are stored in grid units and truncated toward zero before
/// scaling, so a node parked at (1.5, 0.9) draws in cell (1, 0).
pub fn node_origin(position: Point) -> Point {
    Point::new(
        position.x.trunc() * GRID_CELL_SIZE,
        position.y.trunc() * GRID_CELL_SIZE,
    )
}

/// The node body rectangle used for drawing and hit testing.
pub fn node_rect(position: Point) -> Rect {
    let origin = node_origin(position);
    Rect::new(origin.x, origin.y, NODE_WIDTH, NODE_HEIGHT)
}

/// Horizontal offset of the input port at `index`, relative to the node.
pub fn port_offset(index: usize) -> f32 {
    (PORT_WIDTH + PORT_SPACING) * index as f32
}

/// Hit rectangle for an input port, inflated by the hit margin.
pub fn input_port_rect(position: Point, index: usize) -> Rect {
    let origin = node_origin(position);
    Rect::new(
        origin.x + port_offset(index),
        origin.y - PORT_HEIGHT,
        PORT_WIDTH,
        PORT_HEIGHT,
    )
    .grown(PORT_HIT_MARGIN)
}

/// Hit rectangle for the output port, inflated by the hit margin.
pub fn output_port_rect(position: Point) -> Rect {
    let origin = node_origin(position);
    Rect::new(origin.x, origin.y + NODE_HEIGHT, PORT_WIDTH, PORT_HEIGHT).grown(PORT_HIT_MARGIN)
}
