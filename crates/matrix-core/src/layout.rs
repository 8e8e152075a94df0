// File: crates/matrix-core/src/layout.rs
// Summary: Grid layout: positions, colors and labels for every cell, the center axis and year badges.

use crate::cells::{build_cells, Cell};
use crate::config::{ChartConfig, Mapping};
use crate::dimensions::{calculate_dimensions, Dimensions};
use crate::error::LayoutError;
use crate::geometry::{Rect, Segment};
use crate::palette::{country_acronym, ColorCache};
use crate::record::ResultRecord;
use crate::selection::{select, Selection};
use crate::text::{wrap_words, TextMeasure};
use crate::types::{CellMetrics, Point};

/// Left edge of a column. Fractional indices address points between columns.
pub fn column_x(comp_idx: f32, cell_width: f32, padding: f32) -> f32 {
    comp_idx * (cell_width + padding)
}

/// Top edge of a half cell: winners fill the top of the band, runners-up the
/// bottom, pushed down by `cell.gap`.
pub fn cell_y(year_idx: usize, row: usize, cell: &CellMetrics) -> f32 {
    let gap = if row == 1 { cell.gap } else { 0.0 };
    year_idx as f32 * (cell.height + cell.padding) + row as f32 * (cell.height / 2.0) + gap
}

/// Vertical middle of a year band.
pub fn band_middle(year_idx: usize, cell: &CellMetrics) -> f32 {
    year_idx as f32 * (cell.height + cell.padding) + cell.height / 2.0
}

#[derive(Clone, Debug, PartialEq)]
pub struct CellVisual {
    pub cell: Cell,
    pub rect: Rect,
    pub fill: &'static str,
    pub text_color: &'static str,
    pub acronym: String,
    pub acronym_at: Point,
    /// Wrapped team label, first line at `team_at`.
    pub team_lines: Vec<String>,
    pub team_at: Point,
}

#[derive(Clone, Debug, PartialEq)]
pub struct YearBadge {
    pub year: String,
    pub rect: Rect,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColumnHeader {
    pub competition: String,
    pub at: Point,
}

/// Everything needed to draw one render, in chart-group coordinates
/// (offset from the surface by `origin`).
#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
    pub selection: Selection,
    pub dimensions: Dimensions,
    pub width: f32,
    pub height: f32,
    pub origin: Point,
    pub cells: Vec<CellVisual>,
    pub axis: Segment,
    pub year_badges: Vec<YearBadge>,
    pub headers: Vec<ColumnHeader>,
}

/// Inputs of one layout pass.
#[derive(Clone, Copy, Debug)]
pub struct LayoutInput<'a> {
    pub records: &'a [ResultRecord],
    pub mapping: &'a Mapping,
    pub container_width: f32,
    pub max_width: Option<f32>,
    /// Overrides the calculated height.
    pub height: Option<f32>,
}

impl GridLayout {
    /// Lay out the grid. `Ok(None)` means there are no competitions or no years to show.
    pub fn compute(
        input: LayoutInput<'_>,
        config: &ChartConfig,
        colors: &mut ColorCache,
        measure: &dyn TextMeasure,
    ) -> Result<Option<Self>, LayoutError> {
        let selection = select(input.records, input.mapping, &config.competitions)?;
        if selection.is_empty() {
            return Ok(None);
        }

        let dims = calculate_dimensions(
            input.container_width,
            input.max_width,
            selection.competitions.len(),
            selection.years.len(),
            &config.margin,
            &config.cell,
        );
        if !dims.actual_width.is_finite() || !dims.cell_width.is_finite() {
            return Err(LayoutError::NonFiniteLayout { width: dims.actual_width });
        }

        let cells = build_cells(input.records, input.mapping, &selection, config.duplicates)?;
        let labels = &config.labels;
        let cell_metrics = &config.cell;
        let visuals = cells
            .into_iter()
            .map(|cell| {
                let x = column_x(cell.col as f32, dims.cell_width, dims.cell_padding);
                let y = cell_y(cell.year_idx, cell.row, cell_metrics);
                let rect = Rect::from_xywh(x, y, dims.cell_width, dims.cell_height / 2.0);
                let cx = x + dims.cell_width / 2.0;
                let label_y = y + dims.cell_height / 4.0;
                let country = cell.country.as_deref();
                let team_lines = wrap_words(
                    &cell.team_label(),
                    dims.cell_width - labels.wrap_inset,
                    labels.font_size,
                    measure,
                );
                CellVisual {
                    fill: colors.fill(country),
                    text_color: colors.text(country),
                    acronym: country_acronym(country),
                    acronym_at: Point::new(cx, label_y - labels.label_offset),
                    team_lines,
                    team_at: Point::new(cx, label_y + labels.label_offset),
                    rect,
                    cell,
                }
            })
            .collect();

        let center_col = (selection.competitions.len() as f32 - 1.0) / 2.0;
        let axis_x = column_x(center_col, dims.cell_width, dims.cell_padding) + dims.cell_width / 2.0;
        let last = selection.years.len() - 1;
        let axis = Segment::vertical(axis_x, band_middle(0, cell_metrics), band_middle(last, cell_metrics));

        let year_badges = selection
            .years
            .iter()
            .enumerate()
            .map(|(i, year)| YearBadge {
                year: year.clone(),
                rect: Rect::centered_on(
                    Point::new(axis_x, band_middle(i, cell_metrics)),
                    labels.badge_width,
                    labels.badge_height,
                ),
            })
            .collect();

        let headers = selection
            .competitions
            .iter()
            .enumerate()
            .map(|(i, comp)| ColumnHeader {
                competition: comp.clone(),
                at: Point::new(
                    column_x(i as f32, dims.cell_width, dims.cell_padding) + dims.cell_width / 2.0,
                    -labels.header_offset,
                ),
            })
            .collect();

        Ok(Some(Self {
            width: dims.actual_width,
            height: input.height.unwrap_or(dims.calculated_height),
            origin: Point::new(config.margin.left, config.margin.top),
            dimensions: dims,
            selection,
            cells: visuals,
            axis,
            year_badges,
            headers,
        }))
    }
}
