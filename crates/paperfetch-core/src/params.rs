//! Paper parameter lists and configuration errors.

use serde::{Deserialize, Serialize};

/// Error raised before any download is dispatched. The only error that aborts a run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A parameter list has no values, so the product would be empty.
    #[error("no values given for {field}")]
    EmptyList { field: &'static str },
    /// A value cannot be used as part of a single URL path segment.
    #[error("invalid value {value:?} for {field}")]
    InvalidValue { field: &'static str, value: String },
    /// Base URL is not an absolute http(s) URL.
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    /// A numeric setting is out of range (e.g. negative backoff).
    #[error("invalid setting {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },
}

/// The six parameter lists whose Cartesian product names the papers to fetch.
///
/// Defaults match a single paper: 9701 summer 2023, question paper 2, zone 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperParams {
    pub codes: Vec<String>,
    pub seasons: Vec<String>,
    pub years: Vec<String>,
    pub paper_types: Vec<String>,
    pub component_numbers: Vec<String>,
    pub time_zones: Vec<String>,
}

impl Default for PaperParams {
    fn default() -> Self {
        Self {
            codes: vec!["9701".to_string()],
            seasons: vec!["s".to_string()],
            years: vec!["23".to_string()],
            paper_types: vec!["qp".to_string()],
            component_numbers: vec!["2".to_string()],
            time_zones: vec!["1".to_string()],
        }
    }
}

impl PaperParams {
    /// Named lists in generation order (outermost first).
    pub fn fields(&self) -> [(&'static str, &[String]); 6] {
        [
            ("codes", &self.codes),
            ("seasons", &self.seasons),
            ("years", &self.years),
            ("paper_types", &self.paper_types),
            ("component_numbers", &self.component_numbers),
            ("time_zones", &self.time_zones),
        ]
    }

    /// Number of combinations the lists expand to.
    pub fn combinations(&self) -> usize {
        self.fields()
            .iter()
            .map(|(_, values)| values.len())
            .product()
    }

    /// Rejects empty lists and values that would not survive as one URL path segment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, values) in self.fields() {
            if values.is_empty() {
                return Err(ConfigError::EmptyList { field });
            }
            if let Some(bad) = values.iter().find(|v| !is_segment_safe(v)) {
                return Err(ConfigError::InvalidValue {
                    field,
                    value: bad.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A value must land verbatim in both the URL path and the stored file name,
/// so anything the file-name sanitizer would rewrite is refused too.
fn is_segment_safe(value: &str) -> bool {
    !value.is_empty()
        && !value.chars().any(|c| {
            c.is_whitespace()
                || c.is_control()
                || matches!(
                    c,
                    '/' | '\\' | '?' | '#' | '%' | ':' | '*' | '"' | '<' | '>' | '|'
                )
        })
}
