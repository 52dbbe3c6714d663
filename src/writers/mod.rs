pub mod csv_writer;
pub mod output_loader;
pub mod parquet_writer;

pub use csv_writer::CsvWriter;
pub use output_loader::{ColumnarOutcome, LoadReport, OutputLoader};
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};
