// File: crates/matrix-core/src/record.rs
// Summary: Result record model (competition, value, country + mapped fields) and field coercion.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::LayoutError;

/// One competition result as handed to the engine.
///
/// `competition`, `value` and `country` are fixed; the row key (year) and the
/// team name live in `fields` under the names given by the [`Mapping`](crate::config::Mapping).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(default)]
    pub competition: String,
    /// 2 = winner, 1 = runner-up, anything else is ignored.
    #[serde(default, deserialize_with = "lenient_value")]
    pub value: i64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl ResultRecord {
    pub fn new(competition: impl Into<String>, value: i64) -> Self {
        Self { competition: competition.into(), value, country: None, fields: BTreeMap::new() }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Raw field lookup; the fixed fields are reachable by name too.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "competition" => Some(Value::String(self.competition.clone())),
            "value" => Some(Value::from(self.value)),
            "country" => self.country.clone().map(Value::String),
            _ => self.fields.get(name).cloned(),
        }
    }

    /// Field coerced to text the way year keys and team names are compared.
    /// `index` is the record's position in the input, used in errors.
    pub fn field_text(&self, index: usize, name: &str) -> Result<String, LayoutError> {
        let value = self
            .field(name)
            .ok_or_else(|| LayoutError::MissingField { index, field: name.to_string() })?;
        coerce_scalar(&value)
            .ok_or_else(|| LayoutError::NonScalarField { index, field: name.to_string() })
    }
}

/// String form of a scalar JSON value; integral floats print without `.0`.
pub fn coerce_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (None, Some(u), _) => u.to_string(),
            (None, None, Some(f)) => format!("{f}"),
            _ => n.to_string(),
        }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

// Accepts 2, 2.0 or "2"; anything unparseable becomes 0 (ignored).
fn lenient_value<'de, D: Deserializer<'de>>(de: D) -> Result<i64, D::Error> {
    let raw = Value::deserialize(de)?;
    let parsed = match &raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(parsed.unwrap_or(0))
}
