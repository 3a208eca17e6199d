use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::CANONICAL_FIELDS;
use crate::merge::normalize::CanonicalRecord;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
    Xml,
}

impl OutputFormat {
    pub const SELECTORS: [&'static str; 3] = ["csv", "json", "xml"];

    /// Parses a `--type` selector. Matching ignores case and an absent
    /// selector means CSV; anything unrecognized is an error rather than a
    /// silent fallback.
    pub fn from_selector(selector: Option<&str>) -> ClientResult<Self> {
        let Some(raw) = selector else {
            return Ok(Self::Csv);
        };
        match raw.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            _ => Err(ClientError::unknown_output_format(raw, &Self::SELECTORS)),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

/// Serializes canonical records into one result artifact.
///
/// A builder is fed each source's records in turn and finished once after
/// the last source.
pub trait ResultBuilder {
    fn format(&self) -> OutputFormat;

    /// Appends records in arrival order and returns how many were written.
    /// Stops at the first error; anything appended before it stays written.
    fn append(
        &mut self,
        records: &mut dyn Iterator<Item = ClientResult<CanonicalRecord>>,
    ) -> ClientResult<u64>;

    fn finish(&mut self) -> ClientResult<()>;
}

/// Opens the builder for `format`, truncating any previous result at `path`.
pub fn builder_for(format: OutputFormat, path: &Path) -> ClientResult<Box<dyn ResultBuilder>> {
    match format {
        OutputFormat::Csv => Ok(Box::new(CsvResultBuilder::create(path)?)),
        OutputFormat::Json | OutputFormat::Xml => {
            Err(ClientError::unsupported_output_format(format.as_str()))
        }
    }
}

pub struct CsvResultBuilder<W: Write> {
    writer: csv::Writer<W>,
    path: PathBuf,
}

impl CsvResultBuilder<File> {
    pub fn create(path: &Path) -> ClientResult<Self> {
        let file = File::create(path)
            .map_err(|error| ClientError::output_write_failed(path, &error.to_string()))?;
        Self::from_writer(file, path)
    }
}

impl<W: Write> CsvResultBuilder<W> {
    /// Wraps `sink` and writes the canonical header immediately. `path` is
    /// only used to label errors.
    pub fn from_writer(sink: W, path: &Path) -> ClientResult<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(sink);
        writer
            .write_record(CANONICAL_FIELDS)
            .map_err(|error| ClientError::output_write_failed(path, &error.to_string()))?;

        Ok(Self {
            writer,
            path: path.to_path_buf(),
        })
    }

    #[cfg(test)]
    fn into_inner(self) -> ClientResult<W> {
        let path = self.path;
        self.writer
            .into_inner()
            .map_err(|error| ClientError::output_write_failed(&path, &error.error().to_string()))
    }

    fn write_failed(&self, error: impl std::fmt::Display) -> ClientError {
        ClientError::output_write_failed(&self.path, &error.to_string())
    }
}

impl<W: Write> ResultBuilder for CsvResultBuilder<W> {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn append(
        &mut self,
        records: &mut dyn Iterator<Item = ClientResult<CanonicalRecord>>,
    ) -> ClientResult<u64> {
        let mut written = 0;
        for record in records {
            let record = match record {
                Ok(value) => value,
                Err(error) => {
                    self.writer.flush().map_err(|err| self.write_failed(err))?;
                    return Err(error);
                }
            };
            self.writer
                .serialize(&record)
                .map_err(|error| self.write_failed(error))?;
            written += 1;
        }

        self.writer.flush().map_err(|error| self.write_failed(error))?;
        Ok(written)
    }

    fn finish(&mut self) -> ClientResult<()> {
        self.writer.flush().map_err(|error| self.write_failed(error))
    }
}
