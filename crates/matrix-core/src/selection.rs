// File: crates/matrix-core/src/selection.rs
// Summary: Picks the competition columns and the sorted distinct year rows from raw records.

use std::collections::BTreeSet;

use crate::config::Mapping;
use crate::error::LayoutError;
use crate::record::ResultRecord;

/// Ordered columns and rows of the grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub competitions: Vec<String>,
    pub years: Vec<String>,
}

impl Selection {
    /// Either axis empty means there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.competitions.is_empty() || self.years.is_empty()
    }
}

/// `preference` filtered to competitions that occur in `records`, order preserved.
/// A competition listed twice still yields a single column.
pub fn select_competitions(records: &[ResultRecord], preference: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    preference
        .iter()
        .filter(|c| seen.insert(c.as_str()))
        .filter(|c| records.iter().any(|r| &r.competition == *c))
        .cloned()
        .collect()
}

/// Distinct string-coerced row keys, ascending lexicographically.
pub fn select_years(records: &[ResultRecord], mapping: &Mapping) -> Result<Vec<String>, LayoutError> {
    let mut years = BTreeSet::new();
    for (index, record) in records.iter().enumerate() {
        years.insert(record.field_text(index, mapping.row_field())?);
    }
    Ok(years.into_iter().collect())
}

pub fn select(records: &[ResultRecord], mapping: &Mapping, preference: &[String]) -> Result<Selection, LayoutError> {
    Ok(Selection {
        competitions: select_competitions(records, preference),
        years: select_years(records, mapping)?,
    })
}
