// File: crates/matrix-core/src/error.rs
// Summary: Error types for input validation, layout computation and rendering.

use thiserror::Error;

/// Input rejected at the boundary. Rendering is skipped; nothing is drawn.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("render request has no `data` array")]
    MissingData,

    #[error("`data` must be an array of records, got {0}")]
    DataNotArray(&'static str),

    #[error("record {index} is malformed: {source}")]
    MalformedRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid mapping: {0}")]
    InvalidMapping(String),

    #[error("mount point has no usable width and no explicit width was given")]
    NoContainerWidth,

    #[error("invalid {field}: {reason}")]
    InvalidOption { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOption { field, reason: reason.into() }
    }
}

/// Data-shape problem found while building the grid.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("record {index} has no `{field}` field")]
    MissingField { index: usize, field: String },

    #[error("record {index} field `{field}` is not a scalar value")]
    NonScalarField { index: usize, field: String },

    #[error("duplicate {role} for {competition} {year}: records {first} and {second}")]
    DuplicateResult {
        competition: String,
        year: String,
        role: &'static str,
        first: usize,
        second: usize,
    },

    #[error("computed layout is not finite (width {width})")]
    NonFiniteLayout { width: f32 },
}

/// Failure during the compute or draw phase of a render.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("drawing surface failed: {0:#}")]
    Surface(#[from] anyhow::Error),
}
