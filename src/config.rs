use crate::error::Result;
use crate::utils::constants::{
    COMPRESSION_SNAPPY, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR, INPUT_FILE, OUTPUT_CSV_FILE,
    OUTPUT_PARQUET_FILE,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Paths and output options for one pipeline run. `Default` reproduces the
/// fixed project layout, so a run needs no configuration at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub csv_file_name: String,
    pub parquet_file_name: String,
    pub compression: String,
    pub write_parquet: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: Path::new(DEFAULT_INPUT_DIR).join(INPUT_FILE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            csv_file_name: OUTPUT_CSV_FILE.to_string(),
            parquet_file_name: OUTPUT_PARQUET_FILE.to_string(),
            compression: COMPRESSION_SNAPPY.to_string(),
            write_parquet: true,
        }
    }
}

impl PipelineConfig {
    /// Layer a TOML file over the defaults; keys left out keep their default
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Point the run at a different root, keeping the `data/input` and
    /// `data/output` layout beneath it.
    pub fn rooted_at(root: &Path) -> Self {
        let defaults = Self::default();
        Self {
            input_path: root.join(&defaults.input_path),
            output_dir: root.join(&defaults.output_dir),
            ..defaults
        }
    }

    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_compression(mut self, compression: impl Into<String>) -> Self {
        self.compression = compression.into();
        self
    }

    pub fn with_write_parquet(mut self, write_parquet: bool) -> Self {
        self.write_parquet = write_parquet;
        self
    }

    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.csv_file_name)
    }

    pub fn parquet_path(&self) -> PathBuf {
        self.output_dir.join(&self.parquet_file_name)
    }
}
