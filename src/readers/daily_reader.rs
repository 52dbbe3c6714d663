use crate::error::{ProcessingError, Result};
use crate::models::{DailyRecord, DailyTable};
use crate::utils::constants::{
    COL_CITY, COL_DATE, COL_PRECIP_SUM, COL_TEMP_MEAN, DEFAULT_BUFFER_SIZE,
};
use crate::utils::{parse_date, parse_measurement};
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// Row count, distinct cities and date span of an extracted table
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractSummary {
    pub rows: usize,
    pub cities: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl ExtractSummary {
    pub fn from_table(table: &DailyTable) -> Self {
        let span = table.date_span();
        Self {
            rows: table.len(),
            cities: table.distinct_cities(),
            first_date: span.map(|(first, _)| first),
            last_date: span.map(|(_, last)| last),
        }
    }

    pub fn summary(&self) -> String {
        let span = match (self.first_date, self.last_date) {
            (Some(first), Some(last)) => format!("{}→{}", first, last),
            _ => "empty".to_string(),
        };
        format!(
            "[EXTRACT] rows={}, cities={}, span={}",
            self.rows, self.cities, span
        )
    }
}

/// Column positions of the required fields within a header row
struct ColumnLayout {
    date: usize,
    city: usize,
    temp_mean: usize,
    precip_sum: usize,
    extra: Vec<usize>,
}

impl ColumnLayout {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| ProcessingError::MissingColumn(name.to_string()))
        };

        let date = find(COL_DATE)?;
        let city = find(COL_CITY)?;
        let temp_mean = find(COL_TEMP_MEAN)?;
        let precip_sum = find(COL_PRECIP_SUM)?;

        let required = [date, city, temp_mean, precip_sum];
        let extra = (0..headers.len())
            .filter(|i| !required.contains(i))
            .collect();

        Ok(Self {
            date,
            city,
            temp_mean,
            precip_sum,
            extra,
        })
    }
}

pub struct DailyWeatherReader {
    delimiter: u8,
}

impl DailyWeatherReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read the daily observations file and log its summary
    pub fn extract(&self, path: &Path) -> Result<(DailyTable, ExtractSummary)> {
        let table = self.read_table(path)?;
        let summary = ExtractSummary::from_table(&table);
        info!("{}", summary.summary());
        Ok((table, summary))
    }

    /// Read the daily observations file into memory
    pub fn read_table(&self, path: &Path) -> Result<DailyTable> {
        if !path.exists() {
            return Err(ProcessingError::MissingInput {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file));

        let headers = reader.headers()?.clone();
        let layout = ColumnLayout::from_headers(&headers)?;
        debug!(
            "Columns: {}",
            headers.iter().collect::<Vec<_>>().join(", ")
        );

        let extra_columns = layout
            .extra
            .iter()
            .map(|&i| headers[i].trim().to_string())
            .collect();

        let mut records = Vec::new();
        for (row_index, row_result) in reader.records().enumerate() {
            let row = row_result?;
            // Header is line 1
            let line = row_index + 2;
            records.push(self.parse_row(&row, &layout, line)?);
        }

        Ok(DailyTable {
            extra_columns,
            records,
        })
    }

    fn parse_row(&self, row: &StringRecord, layout: &ColumnLayout, line: usize) -> Result<DailyRecord> {
        let field = |index: usize, name: &'static str| {
            row.get(index).ok_or_else(|| {
                ProcessingError::InvalidFormat(format!("Line {}: missing {} field", line, name))
            })
        };

        let raw_date = field(layout.date, COL_DATE)?;
        let date = parse_date(raw_date).map_err(|e| {
            ProcessingError::InvalidFormat(format!(
                "Line {}: invalid date '{}': {}",
                line, raw_date, e
            ))
        })?;

        // Cells past the end of a short row read as missing
        let cell = |index: usize| row.get(index).unwrap_or_default();

        let city = cell(layout.city).to_string();
        let temperature_2m_mean = parse_measurement(cell(layout.temp_mean), COL_TEMP_MEAN)?;
        let precipitation_sum = parse_measurement(cell(layout.precip_sum), COL_PRECIP_SUM)?;

        let extra = layout
            .extra
            .iter()
            .map(|&i| cell(i).to_string())
            .collect();

        Ok(DailyRecord::new(city, date, temperature_2m_mean, precipitation_sum).with_extra(extra))
    }
}

impl Default for DailyWeatherReader {
    fn default() -> Self {
        Self::new()
    }
}
