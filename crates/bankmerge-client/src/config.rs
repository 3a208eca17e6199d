use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::{ClientError, ClientResult};

pub const OUTPUT_FILE_NAME: &str = "result.csv";
pub const CSV_SUFFIX: &str = ".csv";
pub const CANONICAL_DATE_FORMAT: &str = "%d %b %Y";
pub const WORKDIR_ENV: &str = "BANKMERGE_DIR";

/// Output column order. The result header is always exactly these names.
pub const CANONICAL_FIELDS: [&str; 6] = ["bank", "date", "type", "amount", "from", "to"];

const FIELD_MAPPING: [(&str, &str); 5] = [
    ("timestamp", "date"),
    ("date_readable", "date"),
    ("transaction", "type"),
    ("amounts", "amount"),
    ("euro", "amount"),
];

const DATE_FORMATS: [(&str, &str); 3] = [
    ("bank1.csv", "%b %d %Y"),
    ("bank2.csv", "%d-%m-%Y"),
    ("bank3.csv", "%d %b %Y"),
];

const FRACTIONAL_KEY: &str = "euro";
const CENTS_KEY: &str = "cents";

/// Process-wide lookup tables. Built once per run and never mutated.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub field_mapping: HashMap<String, String>,
    pub date_formats: HashMap<String, String>,
    pub fractional_key: String,
    pub cents_key: String,
    pub canonical_date_format: String,
    pub output_file_name: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            field_mapping: owned_pairs(&FIELD_MAPPING),
            date_formats: owned_pairs(&DATE_FORMATS),
            fractional_key: FRACTIONAL_KEY.to_string(),
            cents_key: CENTS_KEY.to_string(),
            canonical_date_format: CANONICAL_DATE_FORMAT.to_string(),
            output_file_name: OUTPUT_FILE_NAME.to_string(),
        }
    }
}

impl MergeConfig {
    pub fn date_format_for(&self, file_name: &str) -> Option<&str> {
        self.date_formats.get(file_name).map(String::as_str)
    }

    pub fn canonical_name_for(&self, raw_column: &str) -> Option<&str> {
        self.field_mapping.get(raw_column).map(String::as_str)
    }
}

pub fn resolve_work_dir(dir_override: Option<&Path>) -> ClientResult<PathBuf> {
    let candidate = match dir_override {
        Some(path) => path.to_path_buf(),
        None => {
            if let Some(env_path) = std::env::var_os(WORKDIR_ENV) {
                PathBuf::from(env_path)
            } else {
                std::env::current_dir()
                    .map_err(|error| ClientError::workdir_unavailable(&error.to_string()))?
            }
        }
    };

    if candidate.is_absolute() {
        return Ok(candidate);
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(&candidate))
        .map_err(|error| ClientError::workdir_unavailable(&error.to_string()))
}

fn owned_pairs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
