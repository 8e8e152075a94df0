// File: crates/matrix-core/src/palette.rs
// Summary: Country fill/text colors, acronyms, and the per-engine color memo.

use std::collections::HashMap;

pub const DEFAULT_FILL: &str = "hwb(215 5% 90% / .9)";
pub const DEFAULT_TEXT: &str = "#54514F";

// (country, fill, text, acronym); keys are lowercase.
static COUNTRIES: [(&str, &str, &str, &str); 5] = [
    ("spain", "#8E0A27", "#9F8137", "ESP"),
    ("italy", "#2C5DA1", "#9FA3A8", "ITA"),
    ("england", "#ABB0B5", "#932027", "ENG"),
    ("france", "#0B3767", "#9F8137", "FRA"),
    ("germany", "#9F8137", "#060A0F", "GER"),
];

fn lookup(country: Option<&str>) -> Option<&'static (&'static str, &'static str, &'static str, &'static str)> {
    let key = country?.to_lowercase();
    COUNTRIES.iter().find(|(name, ..)| *name == key)
}

/// Cell fill for a country, case-insensitive; unknown or missing → [`DEFAULT_FILL`].
pub fn country_fill(country: Option<&str>) -> &'static str {
    lookup(country).map(|c| c.1).unwrap_or(DEFAULT_FILL)
}

/// Label color for a country, case-insensitive; unknown or missing → [`DEFAULT_TEXT`].
pub fn country_text(country: Option<&str>) -> &'static str {
    lookup(country).map(|c| c.2).unwrap_or(DEFAULT_TEXT)
}

/// Three-letter code; unknown countries use their first three characters uppercased.
pub fn country_acronym(country: Option<&str>) -> String {
    match country {
        None | Some("") => String::new(),
        Some(name) => match lookup(Some(name)) {
            Some(c) => c.3.to_string(),
            None => name.chars().take(3).collect::<String>().to_uppercase(),
        },
    }
}

/// Memo over the static color table, keyed `color_<country>` / `text_<country>`.
/// Clearing it only costs recomputation.
#[derive(Debug, Default)]
pub struct ColorCache {
    entries: HashMap<String, &'static str>,
}

impl ColorCache {
    pub fn new() -> Self { Self::default() }

    pub fn fill(&mut self, country: Option<&str>) -> &'static str {
        let key = format!("color_{}", country.unwrap_or_default());
        *self.entries.entry(key).or_insert_with(|| country_fill(country))
    }

    pub fn text(&mut self, country: Option<&str>) -> &'static str {
        let key = format!("text_{}", country.unwrap_or_default());
        *self.entries.entry(key).or_insert_with(|| country_text(country))
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn clear(&mut self) { self.entries.clear(); }
}
