// File: crates/matrix-core/src/geometry.rs
// Summary: Lightweight geometry helpers for pixel math.

use crate::types::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
    /// Rect of the given size centered on `c`.
    pub fn centered_on(c: Point, width: f32, height: f32) -> Self {
        Self { x: c.x - width / 2.0, y: c.y - height / 2.0, width, height }
    }
    pub fn right(&self) -> f32 { self.x + self.width }
    pub fn bottom(&self) -> f32 { self.y + self.height }
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    pub const fn vertical(x: f32, y1: f32, y2: f32) -> Self {
        Self { from: Point::new(x, y1), to: Point::new(x, y2) }
    }
    pub fn length(&self) -> f32 {
        ((self.to.x - self.from.x).powi(2) + (self.to.y - self.from.y).powi(2)).sqrt()
    }
}
