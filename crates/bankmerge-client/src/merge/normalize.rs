use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::MergeConfig;
use crate::merge::discover::SourceFile;
use crate::merge::parse::RawRecord;
use crate::{ClientError, ClientResult};

/// A transaction in the unified six-column schema.
///
/// Columns the mapping table does not know are kept in `extras` so callers
/// can inspect them, but they never reach a serialized result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanonicalRecord {
    pub bank: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: String,
    pub from: String,
    pub to: String,
    #[serde(skip)]
    pub extras: BTreeMap<String, String>,
}

impl CanonicalRecord {
    fn from_fields(mut fields: HashMap<String, String>) -> Self {
        let mut take = |name: &str| fields.remove(name).unwrap_or_default();
        let bank = take("bank");
        let date = take("date");
        let kind = take("type");
        let amount = take("amount");
        let from = take("from");
        let to = take("to");

        Self {
            bank,
            date,
            kind,
            amount,
            from,
            to,
            extras: fields.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    config: &'a MergeConfig,
}

impl<'a> Normalizer<'a> {
    pub fn new(config: &'a MergeConfig) -> Self {
        Self { config }
    }

    pub fn normalize_record(
        &self,
        source: &SourceFile,
        row: u64,
        raw: RawRecord,
    ) -> ClientResult<CanonicalRecord> {
        let cents = raw.get(&self.config.cents_key).map(str::to_string);

        let mut fields = HashMap::with_capacity(raw.len() + 1);
        for (key, value) in raw.into_fields() {
            let Some(canonical) = self.config.canonical_name_for(&key) else {
                fields.insert(key, value);
                continue;
            };

            if key == self.config.fractional_key {
                let Some(cents) = cents.as_deref() else {
                    return Err(ClientError::missing_field(
                        &source.file_name,
                        row,
                        &self.config.cents_key,
                    ));
                };
                fields.insert(canonical.to_string(), format!("{value}.{cents}"));
            } else {
                fields.insert(canonical.to_string(), value);
            }
        }
        fields.insert("bank".to_string(), source.bank.clone());

        if let Some(pattern) = source.date_format.as_deref() {
            let Some(value) = fields.get_mut("date") else {
                return Err(ClientError::missing_field(&source.file_name, row, "date"));
            };
            let reformatted = self.reformat_date(source, row, value, pattern)?;
            *value = reformatted;
        }

        Ok(CanonicalRecord::from_fields(fields))
    }

    /// Lazily normalizes one source's rows; the first error ends the stream.
    pub fn normalize_rows<'s, I>(
        &'s self,
        source: &'s SourceFile,
        rows: I,
    ) -> impl Iterator<Item = ClientResult<CanonicalRecord>> + 's
    where
        I: IntoIterator<Item = ClientResult<(u64, RawRecord)>>,
        I::IntoIter: 's,
    {
        let mut failed = false;
        rows.into_iter().map_while(move |row| {
            if failed {
                return None;
            }
            let result = row.and_then(|(number, raw)| self.normalize_record(source, number, raw));
            failed = result.is_err();
            Some(result)
        })
    }

    fn reformat_date(
        &self,
        source: &SourceFile,
        row: u64,
        value: &str,
        pattern: &str,
    ) -> ClientResult<String> {
        let parsed = NaiveDate::parse_from_str(value, pattern).map_err(|_| {
            ClientError::date_parse_mismatch(&source.file_name, row, value, pattern)
        })?;
        Ok(parsed
            .format(&self.config.canonical_date_format)
            .to_string())
    }
}
