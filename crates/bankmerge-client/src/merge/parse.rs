use std::fs::File;
use std::io::Read;

use crate::merge::discover::SourceFile;
use crate::{ClientError, ClientResult};

/// A row as the bank wrote it, keyed by that bank's own header names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Looks up a column by exact name. With duplicate headers the rightmost
    /// column wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn into_fields(self) -> Vec<(String, String)> {
        self.fields
    }
}

/// Streams numbered raw records out of one CSV source. Data rows count
/// from 1; the header row is not numbered.
pub struct SourceRows<R: Read> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
    file_name: String,
    row: u64,
}

impl<R: Read> std::fmt::Debug for SourceRows<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRows")
            .field("file_name", &self.file_name)
            .field("headers", &self.headers)
            .field("row", &self.row)
            .finish()
    }
}

pub fn open_source(source: &SourceFile) -> ClientResult<SourceRows<File>> {
    let file = File::open(&source.path)
        .map_err(|error| ClientError::input_unreadable(&source.path, &error.to_string()))?;
    rows_from_reader(&source.file_name, file)
}

pub fn rows_from_reader<R: Read>(file_name: &str, input: R) -> ClientResult<SourceRows<R>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|error| ClientError::malformed_csv(file_name, None, &error.to_string()))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<String>>();

    Ok(SourceRows {
        reader,
        headers,
        file_name: file_name.to_string(),
        row: 0,
    })
}

impl<R: Read> Iterator for SourceRows<R> {
    type Item = ClientResult<(u64, RawRecord)>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = csv::StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(false) => None,
            Ok(true) => {
                self.row += 1;
                // Short rows simply lack the trailing columns; surplus values
                // have no header and are dropped.
                let raw = RawRecord::from_pairs(
                    self.headers
                        .iter()
                        .zip(record.iter())
                        .map(|(header, value)| (header.as_str(), value)),
                );
                Some(Ok((self.row, raw)))
            }
            Err(error) => Some(Err(ClientError::malformed_csv(
                &self.file_name,
                Some(self.row + 1),
                &error.to_string(),
            ))),
        }
    }
}
