pub mod builder;
pub mod discover;
pub mod normalize;
pub mod parse;

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::ClientResult;
use crate::config::MergeConfig;
use crate::contracts::types::SourceSummary;

pub use builder::{CsvResultBuilder, OutputFormat, ResultBuilder, builder_for};
pub use discover::{SourceFile, discover_sources};
pub use normalize::{CanonicalRecord, Normalizer};
pub use parse::{RawRecord, SourceRows};

#[derive(Debug, Clone)]
pub(crate) struct MergeExecution {
    pub output_path: PathBuf,
    pub format: OutputFormat,
    pub sources: Vec<SourceSummary>,
    pub rows_written: u64,
}

/// Merges every source in `work_dir` into the configured result file.
///
/// Sources are processed one at a time and each input handle is closed
/// before the next source opens. The first failure aborts the run and
/// leaves the rows merged so far in place.
pub(crate) fn execute(
    work_dir: &Path,
    format: OutputFormat,
    config: &MergeConfig,
) -> ClientResult<MergeExecution> {
    let sources = discover::discover_sources(work_dir, config)?;
    info!(
        dir = %work_dir.display(),
        sources = sources.len(),
        "discovered bank exports"
    );

    let output_path = work_dir.join(&config.output_file_name);
    let mut builder = builder::builder_for(format, &output_path)?;
    let normalizer = Normalizer::new(config);

    let mut summaries = Vec::with_capacity(sources.len());
    let mut rows_written = 0;
    for source in &sources {
        let written = merge_source(&normalizer, source, builder.as_mut()).inspect_err(|error| {
            warn!(
                file = %source.file_name,
                code = %error.code,
                "aborting merge; result file is incomplete"
            );
        })?;
        info!(
            file = %source.file_name,
            bank = %source.bank,
            rows = written,
            "merged source"
        );

        rows_written += written;
        summaries.push(SourceSummary {
            file_name: source.file_name.clone(),
            bank: source.bank.clone(),
            date_format: source.date_format.clone(),
            rows_written: written,
        });
    }
    builder.finish()?;

    Ok(MergeExecution {
        output_path,
        format: builder.format(),
        sources: summaries,
        rows_written,
    })
}

fn merge_source(
    normalizer: &Normalizer<'_>,
    source: &SourceFile,
    builder: &mut dyn ResultBuilder,
) -> ClientResult<u64> {
    let rows = parse::open_source(source)?;
    let mut records = normalizer.normalize_rows(source, rows);
    builder.append(&mut records)
}
