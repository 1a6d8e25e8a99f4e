use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use spotfield_stats::data::loader::{self, FileFormat};
use spotfield_stats::DataStatistics;

/// Compute cross-spotfield statistics of a measured dataset
#[derive(Parser, Debug)]
#[command(name = "spotfield-stats")]
#[command(version)]
struct Args {
    /// Dataset to analyze (.tsv, .txt or .json)
    input: PathBuf,

    /// Write the statistics to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format; defaults to the output file extension, or TSV on stdout
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Tsv,
    Json,
}

impl From<OutputFormat> for FileFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Tsv => FileFormat::Tsv,
            OutputFormat::Json => FileFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    run(&args).inspect_err(|e| log::error!("{e:#}"))
}

fn run(args: &Args) -> Result<()> {
    let data = loader::load_data(&args.input)?;
    let stats = DataStatistics::analyze(&data);
    let format = args.format.map(FileFormat::from);

    match &args.output {
        Some(path) => loader::save_statistics(path, &stats, format)?,
        None => {
            let text = loader::encode_statistics(&stats, format.unwrap_or(FileFormat::Tsv))?;
            std::io::stdout()
                .lock()
                .write_all(text.as_bytes())
                .context("writing statistics to stdout")?;
        }
    }
    Ok(())
}
