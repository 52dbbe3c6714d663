use crate::error::Result;
use crate::models::MonthlyAggregate;
use crate::utils::constants::OUT_COLUMNS;
use crate::utils::format_float;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write monthly aggregates with a header row to `path`
    pub fn write_records(&self, records: &[MonthlyAggregate], path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(records, BufWriter::new(file))
    }

    /// Write monthly aggregates to any sink
    pub fn write_to<W: Write>(&self, records: &[MonthlyAggregate], sink: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new().from_writer(sink);

        writer.write_record(OUT_COLUMNS)?;
        for record in records {
            writer.write_record([
                record.city.clone(),
                record.year.to_string(),
                record.month.to_string(),
                format_float(record.temp_mean),
                format_float(record.precip_sum),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
