// File: crates/matrix-core/src/config.rs
// Summary: Chart configuration (TOML, validated, explicit defaults) and the render request boundary.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ConfigError;
use crate::record::ResultRecord;
use crate::types::{CellMetrics, Insets, DEFAULT_COMPETITIONS};

/// Names one record field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRef {
    pub value: String,
}

/// Which record fields hold the row key (year) and the team name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub rows: FieldRef,
    pub columns: FieldRef,
}

impl Mapping {
    pub fn new(rows: impl Into<String>, columns: impl Into<String>) -> Self {
        Self {
            rows: FieldRef { value: rows.into() },
            columns: FieldRef { value: columns.into() },
        }
    }

    /// Field holding the year key.
    pub fn row_field(&self) -> &str { &self.rows.value }
    /// Field holding the team name.
    pub fn team_field(&self) -> &str { &self.columns.value }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows.value.trim().is_empty() {
            return Err(ConfigError::InvalidMapping("`rows.value` is empty".into()));
        }
        if self.columns.value.trim().is_empty() {
            return Err(ConfigError::InvalidMapping("`columns.value` is empty".into()));
        }
        Ok(())
    }
}

/// How repeated results for one (competition, year, value) are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// First record in input order wins; later ones are ignored.
    #[default]
    FirstMatch,
    /// Any duplicate fails the render.
    Strict,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    pub font_size: f32,
    pub year_font_size: f32,
    /// Horizontal room kept free when wrapping team names.
    pub wrap_inset: f32,
    pub line_height_em: f32,
    /// Vertical distance of acronym/team labels from the half-cell center.
    pub label_offset: f32,
    pub badge_width: f32,
    pub badge_height: f32,
    /// Competition headers sit this far above the first band.
    pub header_offset: f32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            year_font_size: 14.0,
            wrap_inset: 10.0,
            line_height_em: 1.1,
            label_offset: 8.0,
            badge_width: 40.0,
            badge_height: 25.0,
            header_offset: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartColors {
    pub axis: String,
    pub axis_opacity: f32,
    pub year_background: String,
    pub year_background_opacity: f32,
    pub year_text: String,
    /// Competition names above the columns.
    pub header_text: String,
}

impl Default for ChartColors {
    fn default() -> Self {
        Self {
            axis: "#bbb".into(),
            axis_opacity: 0.3,
            year_background: "#0F1826".into(),
            year_background_opacity: 0.85,
            year_text: "#999".into(),
            header_text: "#999".into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub duration_ms: u64,
    /// Added per element index when staggering enter transitions.
    pub delay_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self { duration_ms: 800, delay_ms: 50 }
    }
}

/// Styling and behavior knobs. Every field has a default so partial TOML files load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub margin: Insets,
    pub cell: CellMetrics,
    pub labels: LabelStyle,
    pub colors: ChartColors,
    pub animation: AnimationConfig,
    pub resize_debounce_ms: u64,
    /// Competitions drawn as columns, in preference order.
    pub competitions: Vec<String>,
    pub duplicates: DuplicatePolicy,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            margin: Insets::default(),
            cell: CellMetrics::default(),
            labels: LabelStyle::default(),
            colors: ChartColors::default(),
            animation: AnimationConfig::default(),
            resize_debounce_ms: 250,
            competitions: DEFAULT_COMPETITIONS.iter().map(|c| c.to_string()).collect(),
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl ChartConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!("loaded chart config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.margin.is_valid() {
            return Err(ConfigError::invalid("margin", "margins must be finite and non-negative"));
        }
        let c = &self.cell;
        if !(c.height.is_finite() && c.height > 0.0) {
            return Err(ConfigError::invalid("cell.height", format!("must be positive, got {}", c.height)));
        }
        if !(c.min_width.is_finite() && c.min_width > 0.0) {
            return Err(ConfigError::invalid("cell.min_width", format!("must be positive, got {}", c.min_width)));
        }
        for (field, v) in [("cell.padding", c.padding), ("cell.gap", c.gap), ("cell.border_radius", c.border_radius)] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(ConfigError::invalid(field, format!("must be non-negative, got {v}")));
            }
        }
        let l = &self.labels;
        if !(l.font_size > 0.0 && l.year_font_size > 0.0 && l.line_height_em > 0.0) {
            return Err(ConfigError::invalid("labels", "font sizes and line height must be positive"));
        }
        for (field, v) in [("labels.badge_width", l.badge_width), ("labels.badge_height", l.badge_height)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(ConfigError::invalid(field, format!("must be positive, got {v}")));
            }
        }
        for (field, v) in [
            ("labels.wrap_inset", l.wrap_inset),
            ("labels.label_offset", l.label_offset),
            ("labels.header_offset", l.header_offset),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(ConfigError::invalid(field, format!("must be non-negative, got {v}")));
            }
        }
        if self.competitions.is_empty() {
            return Err(ConfigError::invalid("competitions", "at least one competition is required"));
        }
        if self.competitions.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::invalid("competitions", "competition identifiers must be non-empty"));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.competitions.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(ConfigError::invalid("competitions", format!("`{dup}` is listed more than once")));
        }
        Ok(())
    }
}

/// Arguments of one render call.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderRequest {
    pub data: Vec<ResultRecord>,
    pub mapping: Mapping,
    /// Container width override; falls back to the surface's client width.
    pub width: Option<f32>,
    /// Final height override; falls back to the calculated height.
    pub height: Option<f32>,
    pub max_width: Option<f32>,
    /// Carried along untouched, reserved for styling.
    pub visual_options: Option<Value>,
}

impl RenderRequest {
    pub fn new(data: Vec<ResultRecord>, mapping: Mapping) -> Self {
        Self { data, mapping, width: None, height: None, max_width: None, visual_options: None }
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_max_width(mut self, max_width: f32) -> Self {
        self.max_width = Some(max_width);
        self
    }

    /// Build a request from a loosely-typed JSON object
    /// (`data`, `mapping`, `width`, `height`, `maxWidth`, `visualOptions`).
    pub fn from_json(raw: &Value) -> Result<Self, ConfigError> {
        let data = match raw.get("data") {
            None | Some(Value::Null) => return Err(ConfigError::MissingData),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    ResultRecord::deserialize(item)
                        .map_err(|source| ConfigError::MalformedRecord { index, source })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => return Err(ConfigError::DataNotArray(json_kind(other))),
        };
        let mapping = match raw.get("mapping") {
            None | Some(Value::Null) => {
                return Err(ConfigError::InvalidMapping("`mapping` is missing".into()))
            }
            Some(m) => Mapping::deserialize(m)
                .map_err(|e| ConfigError::InvalidMapping(e.to_string()))?,
        };
        let request = Self {
            data,
            mapping,
            width: optional_number(raw, "width")?,
            height: optional_number(raw, "height")?,
            max_width: optional_number(raw, "maxWidth")?,
            visual_options: raw.get("visualOptions").filter(|v| !v.is_null()).cloned(),
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mapping.validate()?;
        for (field, v) in [("width", self.width), ("height", self.height), ("maxWidth", self.max_width)] {
            if let Some(v) = v {
                if !(v.is_finite() && v > 0.0) {
                    return Err(ConfigError::invalid(field, format!("must be a positive number, got {v}")));
                }
            }
        }
        Ok(())
    }
}

fn optional_number(raw: &Value, key: &'static str) -> Result<Option<f32>, ConfigError> {
    match raw.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64().map(|v| v as f32)),
        Some(other) => Err(ConfigError::invalid(key, format!("expected a number, got {}", json_kind(other)))),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
