use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::utils::format_float;
use crate::utils::progress::ProgressReporter;
use crate::writers::{ColumnarOutcome, ParquetWriter};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None | Some(Commands::Run) => {
            let config = cli.pipeline_config()?;
            let progress = ProgressReporter::new_spinner("Starting ETL run...", cli.quiet);

            let report = Pipeline::new(config).with_progress(progress).run()?;

            println!("CSV: {}", report.load.csv_path.display());
            match &report.load.columnar {
                ColumnarOutcome::Written { path, info } => {
                    println!("Parquet: {}", path.display());
                    println!("\n{}", info.summary());
                }
                ColumnarOutcome::Skipped { reason } => {
                    println!("Parquet: skipped ({})", reason);
                }
            }
        }

        Some(Commands::Info { file, sample }) => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&file)?;
            println!("\n{}", file_info.summary());

            if sample > 0 {
                println!("\nSample Records (showing up to {} records):", sample);
                for (i, record) in writer.read_sample_records(&file, sample)?.iter().enumerate() {
                    let temp = if record.has_temperature() {
                        format!("{}°C", format_float(record.temp_mean))
                    } else {
                        "n/a".to_string()
                    };
                    println!(
                        "{}. {} {}-{:02}: temp_mean={}, precip_sum={}mm",
                        i + 1,
                        record.city,
                        record.year,
                        record.month,
                        temp,
                        format_float(record.precip_sum)
                    );
                }
            }
        }
    }

    Ok(())
}
