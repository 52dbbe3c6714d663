use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::MonthlyAggregate;
use crate::writers::csv_writer::CsvWriter;
use crate::writers::parquet_writer::{ParquetFileInfo, ParquetWriter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of the best-effort Parquet write
#[derive(Debug, Clone)]
pub enum ColumnarOutcome {
    Written { path: PathBuf, info: ParquetFileInfo },
    Skipped { reason: String },
}

impl ColumnarOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, ColumnarOutcome::Written { .. })
    }
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub csv_path: PathBuf,
    pub columnar: ColumnarOutcome,
}

/// Writes the monthly table into the output directory: CSV always, Parquet
/// when it can.
pub struct OutputLoader {
    output_dir: PathBuf,
    csv_path: PathBuf,
    parquet_path: PathBuf,
    compression: String,
    write_parquet: bool,
}

impl OutputLoader {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            csv_path: config.csv_path(),
            parquet_path: config.parquet_path(),
            compression: config.compression.clone(),
            write_parquet: config.write_parquet,
        }
    }

    pub fn load(&self, records: &[MonthlyAggregate]) -> Result<LoadReport> {
        fs::create_dir_all(&self.output_dir)?;

        CsvWriter::new().write_records(records, &self.csv_path)?;
        let columnar = self.write_columnar(records);

        info!("[LOAD] saved CSV → {}", file_name(&self.csv_path));
        if let ColumnarOutcome::Written { path, info } = &columnar {
            info!("[LOAD] saved PARQUET → {}", file_name(path));
            debug!("{}", info.summary());
        }

        Ok(LoadReport {
            csv_path: self.csv_path.clone(),
            columnar,
        })
    }

    /// Attempt the Parquet output, turning any failure into `Skipped`
    pub fn write_columnar(&self, records: &[MonthlyAggregate]) -> ColumnarOutcome {
        if !self.write_parquet {
            debug!("Parquet output disabled");
            return ColumnarOutcome::Skipped {
                reason: "disabled".to_string(),
            };
        }

        match self.try_write_parquet(records) {
            Ok(info) => ColumnarOutcome::Written {
                path: self.parquet_path.clone(),
                info,
            },
            Err(e) => {
                warn!("[LOAD] parquet skipped ({})", e);
                if self.parquet_path.is_file() {
                    // Partial file from the failed attempt
                    if let Err(cleanup) = fs::remove_file(&self.parquet_path) {
                        warn!(
                            "[LOAD] could not remove partial {} ({})",
                            self.parquet_path.display(),
                            cleanup
                        );
                    }
                }
                ColumnarOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn try_write_parquet(&self, records: &[MonthlyAggregate]) -> Result<ParquetFileInfo> {
        if self.parquet_path.is_file() {
            fs::remove_file(&self.parquet_path)?;
        }

        let writer = ParquetWriter::new().with_compression(&self.compression)?;
        writer.write_records(records, &self.parquet_path)?;
        writer.get_file_info(&self.parquet_path)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
