use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{CSV_SUFFIX, MergeConfig};
use crate::{ClientError, ClientResult};

/// One bank export found in the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub file_name: String,
    pub path: PathBuf,
    /// File name without its extension, stamped onto every merged row.
    pub bank: String,
    pub date_format: Option<String>,
}

impl SourceFile {
    pub fn new(dir: &Path, file_name: &str, config: &MergeConfig) -> Self {
        Self {
            file_name: file_name.to_string(),
            path: dir.join(file_name),
            bank: bank_name(file_name),
            date_format: config.date_format_for(file_name).map(str::to_string),
        }
    }
}

/// Lists `*.csv` files directly inside `dir`, sorted by name.
///
/// Subdirectories are not descended into, and the configured result file is
/// left out so a rerun never reads its own previous output.
pub fn discover_sources(dir: &Path, config: &MergeConfig) -> ClientResult<Vec<SourceFile>> {
    let entries =
        fs::read_dir(dir).map_err(|error| ClientError::workdir_unreadable(dir, &error.to_string()))?;

    let mut sources = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|error| ClientError::workdir_unreadable(dir, &error.to_string()))?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            debug!(path = %path.display(), "skipping non-UTF-8 file name");
            continue;
        };
        if !file_name.ends_with(CSV_SUFFIX) {
            continue;
        }
        if file_name == config.output_file_name {
            debug!(file = %file_name, "skipping previous result file");
            continue;
        }

        sources.push(SourceFile::new(dir, &file_name, config));
    }

    sources.sort_by(|left, right| left.file_name.cmp(&right.file_name));
    Ok(sources)
}

fn bank_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name)
        .to_string()
}
