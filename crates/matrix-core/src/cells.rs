// File: crates/matrix-core/src/cells.rs
// Summary: Cell grid construction: one winner/runner-up cell per (competition, year) when a record exists.

use std::collections::HashMap;

use crate::config::{DuplicatePolicy, Mapping};
use crate::error::LayoutError;
use crate::record::ResultRecord;
use crate::selection::Selection;
use crate::types::{RUNNER_UP_VALUE, WINNER_VALUE};

/// One drawn result. `row` is 0 for the winner half of a year band, 1 for the runner-up.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub competition: String,
    pub year: String,
    pub value: i64,
    pub team: String,
    pub country: Option<String>,
    pub comp_idx: usize,
    pub year_idx: usize,
    pub row: usize,
    pub col: usize,
}

impl Cell {
    /// Stable identity across renders.
    pub fn key(&self) -> String {
        format!("{}_{}_{}", self.competition, self.year, self.row)
    }

    pub fn is_winner(&self) -> bool { self.row == 0 }

    /// Team label; the first year band flags its results with `[W]` / `[R]`.
    pub fn team_label(&self) -> String {
        if self.year_idx == 0 {
            format!("{} [{}]", self.team, if self.is_winner() { "W" } else { "R" })
        } else {
            self.team.clone()
        }
    }
}

fn role(value: i64) -> &'static str {
    if value == WINNER_VALUE { "winner" } else { "runner-up" }
}

/// Build cells in year-major, competition-minor order, winner before runner-up.
pub fn build_cells(
    records: &[ResultRecord],
    mapping: &Mapping,
    selection: &Selection,
    policy: DuplicatePolicy,
) -> Result<Vec<Cell>, LayoutError> {
    // (competition, year, value) -> index of the first matching record
    let mut first: HashMap<(&str, String, i64), usize> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        if record.value != WINNER_VALUE && record.value != RUNNER_UP_VALUE {
            continue;
        }
        if !selection.competitions.iter().any(|c| *c == record.competition) {
            continue;
        }
        let year = record.field_text(index, mapping.row_field())?;
        let key = (record.competition.as_str(), year, record.value);
        match first.get(&key) {
            Some(&earlier) if policy == DuplicatePolicy::Strict => {
                return Err(LayoutError::DuplicateResult {
                    competition: record.competition.clone(),
                    year: key.1,
                    role: role(record.value),
                    first: earlier,
                    second: index,
                });
            }
            Some(_) => {}
            None => {
                first.insert(key, index);
            }
        }
    }

    let mut cells = Vec::with_capacity(first.len());
    for (year_idx, year) in selection.years.iter().enumerate() {
        for (comp_idx, comp) in selection.competitions.iter().enumerate() {
            for (row, value) in [WINNER_VALUE, RUNNER_UP_VALUE].into_iter().enumerate() {
                let Some(&index) = first.get(&(comp.as_str(), year.clone(), value)) else {
                    continue;
                };
                let record = &records[index];
                cells.push(Cell {
                    competition: comp.clone(),
                    year: year.clone(),
                    value,
                    team: record.field_text(index, mapping.team_field())?,
                    country: record.country.clone(),
                    comp_idx,
                    year_idx,
                    row,
                    col: comp_idx,
                });
            }
        }
    }
    Ok(cells)
}
