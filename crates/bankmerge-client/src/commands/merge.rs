use std::path::Path;

use crate::config::{MergeConfig, resolve_work_dir};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::MergeData;
use crate::merge::{self, OutputFormat};
use crate::ClientResult;

#[derive(Debug, Default)]
pub struct MergeRunOptions<'a> {
    /// Raw `--type` selector; `None` means CSV.
    pub format: Option<String>,
    pub dir_override: Option<&'a Path>,
}

pub fn run(format: Option<String>) -> ClientResult<SuccessEnvelope> {
    run_with_options(MergeRunOptions {
        format,
        dir_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: MergeRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let work_dir = resolve_work_dir(options.dir_override)?;
    let format = OutputFormat::from_selector(options.format.as_deref())?;
    let config = MergeConfig::default();

    let execution = merge::execute(&work_dir, format, &config)?;

    let data = MergeData {
        work_dir: work_dir.display().to_string(),
        output_path: execution.output_path.display().to_string(),
        format: execution.format,
        message: format!("You can check the result in {}", config.output_file_name),
        sources: execution.sources,
        rows_written: execution.rows_written,
    };

    success("merge", data)
}
