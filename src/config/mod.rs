use crate::error::IntakeError;
use crate::utils::validation::AcceptPattern;
use serde::{Deserialize, Deserializer};
use std::env;

/// Default cap on the number of selected files
pub const DEFAULT_MAX_FILES: usize = 5;

/// Default per-file size ceiling: 10 MiB
pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

/// Intake configuration for one file selection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Hard cap on total accepted entries (default: 5)
    pub max_files: usize,

    /// Per-file size ceiling in bytes (default: 10 MiB)
    pub max_size: u64,

    /// Extension (`.pdf`), exact MIME (`application/pdf`) or wildcard (`image/*`)
    /// patterns. Empty accepts every type.
    #[serde(deserialize_with = "deserialize_patterns")]
    pub accepted_types: Vec<AcceptPattern>,

    /// Whether one gesture may carry more than one file (default: true)
    pub multiple: bool,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_size: DEFAULT_MAX_SIZE,
            accepted_types: Vec::new(),
            multiple: true,
        }
    }
}

impl IntakeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, falling back to the
    /// defaults for missing or malformed values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        Self {
            max_files: lookup("INTAKE_MAX_FILES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default.max_files),

            max_size: lookup("INTAKE_MAX_SIZE")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default.max_size),

            accepted_types: lookup("INTAKE_ACCEPTED_TYPES")
                .map(|v| parse_accepted_types(&v))
                .unwrap_or(default.accepted_types),

            multiple: lookup("INTAKE_MULTIPLE")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(default.multiple),
        }
    }

    /// Parse a JSON configuration document; omitted fields keep their defaults
    pub fn from_json(raw: &str) -> Result<Self, IntakeError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Images of any kind plus PDF documents, two files at most
    pub fn images_and_pdf() -> Self {
        Self {
            max_files: 2,
            accepted_types: parse_accepted_types("image/*,.pdf"),
            ..Self::default()
        }
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_accepted_types<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.accepted_types = patterns
            .into_iter()
            .filter_map(|p| AcceptPattern::parse(p.as_ref()))
            .collect();
        self
    }

    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }
}

/// Split a comma separated pattern list, dropping blank entries
pub fn parse_accepted_types(raw: &str) -> Vec<AcceptPattern> {
    raw.split(',').filter_map(AcceptPattern::parse).collect()
}

fn deserialize_patterns<'de, D>(deserializer: D) -> Result<Vec<AcceptPattern>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<String> = Vec::deserialize(deserializer)?;
    Ok(raw.iter().filter_map(|p| AcceptPattern::parse(p)).collect())
}
