use crate::error::{ProcessingError, Result};
use crate::models::MonthlyAggregate;
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::{Array, ArrayRef, Float64Array, Int16Array, Int8Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    /// Write monthly aggregates to a Parquet file; an empty slice still
    /// produces a file carrying the schema.
    pub fn write_records(&self, records: &[MonthlyAggregate], path: &Path) -> Result<()> {
        let schema = self.create_schema();

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
        if !records.is_empty() {
            let batch = self.records_to_batch(records, schema)?;
            writer.write(&batch)?;
        }
        writer.close()?;

        Ok(())
    }

    /// Arrow schema for the monthly summary
    fn create_schema(&self) -> Arc<Schema> {
        let fields = vec![
            Field::new("city", DataType::Utf8, false),
            Field::new("year", DataType::Int16, false),
            Field::new("month", DataType::Int8, false),
            // Null when the month had no temperature readings
            Field::new("temp_mean", DataType::Float64, true),
            Field::new("precip_sum", DataType::Float64, false),
        ];

        Arc::new(Schema::new(fields))
    }

    fn records_to_batch(
        &self,
        records: &[MonthlyAggregate],
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let cities: Vec<&str> = records.iter().map(|r| r.city.as_str()).collect();
        let years: Vec<i16> = records.iter().map(|r| r.year).collect();
        let months: Vec<i8> = records.iter().map(|r| r.month).collect();
        let temp_means: Vec<Option<f64>> = records
            .iter()
            .map(|r| r.has_temperature().then_some(r.temp_mean))
            .collect();
        let precip_sums: Vec<f64> = records.iter().map(|r| r.precip_sum).collect();

        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(cities)),
            Arc::new(Int16Array::from(years)),
            Arc::new(Int8Array::from(months)),
            Arc::new(Float64Array::from(temp_means)),
            Arc::new(Float64Array::from(precip_sums)),
        ];

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    /// Read up to `limit` monthly aggregates back from a Parquet file
    pub fn read_sample_records(&self, path: &Path, limit: usize) -> Result<Vec<MonthlyAggregate>> {
        let file = File::open(path)?;
        let parquet_reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(limit.clamp(1, 8192))
            .build()?;

        let mut records = Vec::new();

        for batch_result in parquet_reader {
            if records.len() >= limit {
                break;
            }
            let batch = batch_result?;

            let cities = column::<StringArray>(&batch, 0, "city")?;
            let years = column::<Int16Array>(&batch, 1, "year")?;
            let months = column::<Int8Array>(&batch, 2, "month")?;
            let temp_means = column::<Float64Array>(&batch, 3, "temp_mean")?;
            let precip_sums = column::<Float64Array>(&batch, 4, "precip_sum")?;

            let to_read = batch.num_rows().min(limit - records.len());
            for i in 0..to_read {
                records.push(MonthlyAggregate::new(
                    cities.value(i).to_string(),
                    years.value(i),
                    months.value(i),
                    if temp_means.is_null(i) {
                        f64::NAN
                    } else {
                        temp_means.value(i)
                    },
                    precip_sums.value(i),
                ));
            }
        }

        Ok(records)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let row_groups = metadata.num_row_groups();
        let total_rows = metadata.file_metadata().num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let row_group_sizes = (0..row_groups)
            .map(|i| metadata.row_group(i).num_rows())
            .collect();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, index: usize, name: &str) -> Result<&'a T> {
    batch
        .column(index)
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Invalid {} column type", name)))
}

#[derive(Debug, Clone)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups > 0 {
            self.total_rows as f64 / self.row_groups as f64
        } else {
            0.0
        };

        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression,
            avg_rows
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    fn sample_records() -> Vec<MonthlyAggregate> {
        vec![
            MonthlyAggregate::new("Leeds".to_string(), 2019, 12, 1.0, 2.2),
            MonthlyAggregate::new("London".to_string(), 2020, 1, 6.0, 2.0),
        ]
    }

    #[test]
    fn test_write_empty_records() -> Result<()> {
        let writer = ParquetWriter::new();
        let temp_file = NamedTempFile::new()?;

        writer.write_records(&[], temp_file.path())?;

        let info = writer.get_file_info(temp_file.path())?;
        assert_eq!(info.total_rows, 0);

        Ok(())
    }

    #[test]
    fn test_write_and_read_back() -> Result<()> {
        let writer = ParquetWriter::new();
        let temp_file = NamedTempFile::new()?;
        let records = sample_records();

        writer.write_records(&records, temp_file.path())?;

        let info = writer.get_file_info(temp_file.path())?;
        assert_eq!(info.total_rows, 2);
        assert_eq!(info.row_groups, 1);

        let read_back = writer.read_sample_records(temp_file.path(), 10)?;
        assert_eq!(read_back, records);

        let first_only = writer.read_sample_records(temp_file.path(), 1)?;
        assert_eq!(first_only.len(), 1);
        assert_eq!(first_only[0].city, "Leeds");

        Ok(())
    }

    #[test]
    fn test_different_compressions() -> Result<()> {
        let compressions = ["snappy", "gzip", "lz4", "zstd", "none"];

        for compression in &compressions {
            let writer = ParquetWriter::new().with_compression(compression)?;
            let temp_file = NamedTempFile::new()?;

            let result = writer.write_records(&sample_records(), temp_file.path());
            assert!(result.is_ok(), "Failed with compression: {}", compression);
        }

        Ok(())
    }

    #[test]
    fn test_missing_temperature_written_as_null() -> Result<()> {
        let writer = ParquetWriter::new();
        let temp_file = NamedTempFile::new()?;
        let records = vec![
            MonthlyAggregate::new("Hull".to_string(), 2020, 3, f64::NAN, 0.0),
            MonthlyAggregate::new("York".to_string(), 2020, 3, 7.5, 1.0),
        ];

        writer.write_records(&records, temp_file.path())?;

        let file = File::open(temp_file.path())?;
        let mut reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
        let batch = reader.next().expect("one batch")?;
        assert!(batch.schema().field(3).is_nullable());
        let temp_means = column::<Float64Array>(&batch, 3, "temp_mean")?;
        assert!(temp_means.is_null(0));
        assert_eq!(temp_means.value(1), 7.5);

        let read_back = writer.read_sample_records(temp_file.path(), 10)?;
        assert!(read_back[0].temp_mean.is_nan());
        assert_eq!(read_back[1], records[1]);

        Ok(())
    }

    #[test]
    fn test_column_type_mismatch_is_invalid_format() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        let schema = Arc::new(Schema::new(vec![
            Field::new("city", DataType::Int16, false),
            Field::new("year", DataType::Int16, false),
            Field::new("month", DataType::Int8, false),
            Field::new("temp_mean", DataType::Float64, true),
            Field::new("precip_sum", DataType::Float64, false),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int16Array::from(vec![1])),
            Arc::new(Int16Array::from(vec![2020])),
            Arc::new(Int8Array::from(vec![1])),
            Arc::new(Float64Array::from(vec![Some(6.0)])),
            Arc::new(Float64Array::from(vec![2.0])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns)?;
        let mut arrow_writer = ArrowWriter::try_new(File::create(temp_file.path())?, schema, None)?;
        arrow_writer.write(&batch)?;
        arrow_writer.close()?;

        let result = ParquetWriter::new().read_sample_records(temp_file.path(), 5);
        assert!(matches!(result, Err(ProcessingError::InvalidFormat(_))));

        Ok(())
    }

    #[test]
    fn test_unknown_compression() {
        let result = ParquetWriter::new().with_compression("brotli-9000");
        assert!(matches!(result, Err(ProcessingError::Config(_))));
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ParquetWriter::new();

        // A directory cannot be opened as a file
        let result = writer.write_records(&sample_records(), dir.path());
        assert!(matches!(result, Err(ProcessingError::Io(_))));
    }
}
