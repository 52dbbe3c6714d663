use crate::config::PipelineConfig;
use crate::error::Result;
use crate::processors::MonthlyAggregator;
use crate::readers::{DailyWeatherReader, ExtractSummary};
use crate::utils::progress::ProgressReporter;
use crate::writers::{LoadReport, OutputLoader};
use tracing::info;

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub extract: ExtractSummary,
    pub monthly_rows: usize,
    pub load: LoadReport,
}

/// Extract → transform → load, once
pub struct Pipeline {
    config: PipelineConfig,
    progress: ProgressReporter,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            progress: ProgressReporter::silent(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn run(&self) -> Result<RunReport> {
        info!("Input → {}", self.config.input_path.display());
        info!("Output folder → {}", self.config.output_dir.display());

        self.progress.set_message("Extracting daily observations...");
        let (table, extract) = DailyWeatherReader::new().extract(&self.config.input_path)?;

        self.progress.set_message("Aggregating monthly summaries...");
        let monthly = MonthlyAggregator::new().aggregate(&table)?;

        self.progress.set_message("Writing outputs...");
        let load = OutputLoader::new(&self.config).load(&monthly)?;

        self.progress
            .finish_with_message(&format!("Wrote {} monthly rows", monthly.len()));
        info!("ETL run complete.");

        Ok(RunReport {
            extract,
            monthly_rows: monthly.len(),
            load,
        })
    }
}
