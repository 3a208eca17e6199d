use serde::Serialize;

use crate::merge::OutputFormat;

#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub file_name: String,
    pub bank: String,
    pub date_format: Option<String>,
    pub rows_written: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeData {
    pub work_dir: String,
    pub output_path: String,
    pub format: OutputFormat,
    pub message: String,
    pub sources: Vec<SourceSummary>,
    pub rows_written: u64,
}
