// File: crates/matrix-core/src/dimensions.rs
// Summary: Adaptive cell width and calculated chart height.

use crate::types::{CellMetrics, Insets};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    /// Container width after the optional max-width cap.
    pub actual_width: f32,
    pub cell_width: f32,
    pub cell_height: f32,
    pub cell_padding: f32,
    /// Height needed to fit every year band.
    pub calculated_height: f32,
}

/// `min(container, max)` when a cap is given, else the container width.
pub fn effective_width(container_width: f32, max_width: Option<f32>) -> f32 {
    match max_width {
        Some(max) => container_width.min(max),
        None => container_width,
    }
}

/// Cells stretch across the available width but never shrink below `cell.min_width`.
pub fn calculate_dimensions(
    container_width: f32,
    max_width: Option<f32>,
    columns: usize,
    years: usize,
    margin: &Insets,
    cell: &CellMetrics,
) -> Dimensions {
    let actual_width = effective_width(container_width, max_width);
    let columns = columns.max(1) as f32;
    let available = actual_width - margin.hsum();
    let total_padding = (columns - 1.0) * cell.padding;
    let cell_width = ((available - total_padding) / columns).max(cell.min_width);

    let rows = years.max(1) as f32;
    let calculated_height = margin.vsum() + rows * (cell.height + cell.padding) - cell.padding;

    Dimensions {
        actual_width,
        cell_width,
        cell_height: cell.height,
        cell_padding: cell.padding,
        calculated_height,
    }
}
