use crate::config::PipelineConfig;
use crate::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "weather-etl")]
#[command(about = "Aggregate daily city weather observations into monthly summaries")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(long, help = "TOML file overriding the default paths and options")]
    pub config: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "Daily observations CSV [default: data/input/uk_weather_clean.csv]"
    )]
    pub input: Option<PathBuf>,

    #[arg(short, long, help = "Output directory [default: data/output]")]
    pub output_dir: Option<PathBuf>,

    #[arg(short, long, help = "Parquet compression (snappy, gzip, lz4, zstd, none)")]
    pub compression: Option<String>,

    #[arg(long, help = "Only write the CSV output")]
    pub no_parquet: bool,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide the progress spinner")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the monthly aggregation (the default when no command is given)
    Run,

    /// Display information about a monthly summary Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}

impl Cli {
    /// Resolve the run configuration: defaults, then the config file, then flags
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(input) = &self.input {
            config = config.with_input_path(input);
        }
        if let Some(output_dir) = &self.output_dir {
            config = config.with_output_dir(output_dir);
        }
        if let Some(compression) = &self.compression {
            config = config.with_compression(compression);
        }
        if self.no_parquet {
            config = config.with_write_parquet(false);
        }

        Ok(config)
    }
}
