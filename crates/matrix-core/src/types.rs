// File: crates/matrix-core/src/types.rs
// Summary: Shared types and constants (margins, cell metrics, default sizes).

/// Default container width in pixels when the host reports none.
pub const WIDTH: f32 = 640.0;

/// Competitions drawn as columns, in preference order.
pub const DEFAULT_COMPETITIONS: [&str; 2] = ["UCL", "UEL"];

/// Record `value` marking a winner.
pub const WINNER_VALUE: i64 = 2;
/// Record `value` marking a runner-up.
pub const RUNNER_UP_VALUE: i64 = 1;

/// Message drawn in place of the chart when a render fails.
pub const ERROR_MESSAGE: &str = "Error rendering visualization. Please check console for details.";

/// Chart margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Insets {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Insets {
    pub const fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Total horizontal inset (left + right).
    pub fn hsum(&self) -> f32 { self.left + self.right }
    /// Total vertical inset (top + bottom).
    pub fn vsum(&self) -> f32 { self.top + self.bottom }
    pub fn is_valid(&self) -> bool {
        [self.left, self.right, self.top, self.bottom]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(20.0, 20.0, 40.0, 20.0)
    }
}

/// Cell metrics shared by dimension and position calculations.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CellMetrics {
    /// Height of a full year band cell (winner + runner-up halves).
    pub height: f32,
    /// Space between columns and between year bands.
    pub padding: f32,
    /// Extra offset pushing the runner-up half below the winner half.
    pub gap: f32,
    pub border_radius: f32,
    /// Floor for the adaptive cell width.
    pub min_width: f32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self { height: 120.0, padding: 20.0, gap: 4.0, border_radius: 8.0, min_width: 120.0 }
    }
}

/// Plain 2-D point in chart-group coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self { Self { x, y } }
}
