use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const MERGE_HELP_COMMAND: &str = "bankmerge --help";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::new(
            "invalid_argument",
            message,
            vec![format!("Run `{MERGE_HELP_COMMAND}` for usage.")],
        )
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn unknown_output_format(selector: &str, supported: &[&str]) -> Self {
        Self::invalid_argument_with_recovery(
            &format!("Output type `{selector}` is not recognized."),
            vec![
                format!("Pass one of: {}.", supported.join(", ")),
                "Omit `--type` to write the default CSV result.".to_string(),
            ],
        )
        .with_data(json!({
            "received_type": selector,
            "supported_types": supported,
        }))
    }

    pub fn unsupported_output_format(selector: &str) -> Self {
        Self::new(
            "unsupported_output_format",
            &format!("Output type `{selector}` is recognized but not implemented yet."),
            vec!["Rerun with `--type csv` or omit `--type`.".to_string()],
        )
        .with_data(json!({
            "received_type": selector,
            "implemented_types": ["csv"],
        }))
    }

    pub fn workdir_unavailable(detail: &str) -> Self {
        Self::new(
            "workdir_unavailable",
            &format!("Could not resolve the working directory: {detail}"),
            vec![
                "Pass `--dir <path>` or set `BANKMERGE_DIR` to a readable directory.".to_string(),
            ],
        )
    }

    pub fn workdir_unreadable(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "workdir_unreadable",
            &format!("Could not list `{location}`: {detail}"),
            vec![format!(
                "Verify `{location}` exists and is a readable directory."
            )],
        )
        .with_data(json!({
            "dir": location,
        }))
    }

    pub fn input_unreadable(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "input_unreadable",
            &format!("Could not read input file `{location}`: {detail}"),
            vec![
                "Verify the file exists and is readable.".to_string(),
                "Rerun bankmerge; the result file from this run is incomplete.".to_string(),
            ],
        )
        .with_data(json!({
            "file": location,
        }))
    }

    pub fn malformed_csv(file_name: &str, row: Option<u64>, detail: &str) -> Self {
        let position = match row {
            Some(value) => format!(" at row {value}"),
            None => String::new(),
        };
        Self::new(
            "malformed_csv",
            &format!("`{file_name}` is not valid CSV{position}: {detail}"),
            vec![
                format!("Fix or remove `{file_name}` from the working directory."),
                "Rerun bankmerge; the result file from this run is incomplete.".to_string(),
            ],
        )
        .with_data(json!({
            "file": file_name,
            "row": row,
        }))
    }

    pub fn date_parse_mismatch(file_name: &str, row: u64, value: &str, pattern: &str) -> Self {
        Self::new(
            "date_parse_mismatch",
            &format!(
                "`{file_name}` row {row}: date `{value}` does not match pattern `{pattern}`."
            ),
            vec![
                format!("Correct the date in `{file_name}` row {row}."),
                "Rerun bankmerge; the result file from this run is incomplete.".to_string(),
            ],
        )
        .with_data(json!({
            "file": file_name,
            "row": row,
            "value": value,
            "expected_pattern": pattern,
        }))
    }

    pub fn missing_field(file_name: &str, row: u64, field: &str) -> Self {
        Self::new(
            "missing_field",
            &format!("`{file_name}` row {row} has no `{field}` field."),
            vec![
                format!("Add a `{field}` column to `{file_name}`."),
                "Rerun bankmerge; the result file from this run is incomplete.".to_string(),
            ],
        )
        .with_data(json!({
            "file": file_name,
            "row": row,
            "field": field,
        }))
    }

    pub fn output_write_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "output_write_failed",
            &format!("Could not write result file `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or choose another directory with `--dir`."
            )],
        )
        .with_data(json!({
            "output_path": location,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
