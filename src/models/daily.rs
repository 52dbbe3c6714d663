use crate::utils::is_missing;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One row of the daily observations file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub city: String,
    pub date: NaiveDate,
    pub temperature_2m_mean: Option<f64>,
    pub precipitation_sum: Option<f64>,

    /// Passthrough cells, aligned with `DailyTable::extra_columns`
    #[serde(default)]
    pub extra: Vec<String>,
}

impl DailyRecord {
    pub fn new(
        city: impl Into<String>,
        date: NaiveDate,
        temperature_2m_mean: Option<f64>,
        precipitation_sum: Option<f64>,
    ) -> Self {
        Self {
            city: city.into(),
            date,
            temperature_2m_mean,
            precipitation_sum,
            extra: Vec::new(),
        }
    }

    pub fn with_extra(mut self, extra: Vec<String>) -> Self {
        self.extra = extra;
        self
    }
}

/// The extracted daily table, schema preserved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyTable {
    pub extra_columns: Vec<String>,
    pub records: Vec<DailyRecord>,
}

impl DailyTable {
    pub fn new(records: Vec<DailyRecord>) -> Self {
        Self {
            extra_columns: Vec::new(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn distinct_cities(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.city.as_str())
            .filter(|city| !is_missing(city))
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Earliest and latest observation date
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.date).min()?;
        let last = self.records.iter().map(|r| r.date).max()?;
        Some((first, last))
    }

    /// Look up a passthrough value by column name
    pub fn extra_value<'a>(&self, record: &'a DailyRecord, column: &str) -> Option<&'a str> {
        let index = self.extra_columns.iter().position(|c| c == column)?;
        record.extra.get(index).map(String::as_str)
    }
}
