use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::dataset::Data;
use super::statistics::DataStatistics;

// ---------------------------------------------------------------------------
// FileFormat – picked from the file extension
// ---------------------------------------------------------------------------

/// Text encodings understood by the loader.
///
/// * `.tsv` / `.txt` – tab separated, one header line
/// * `.json`         – `{ "values": [ ... ] }`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Tsv,
    Json,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "tsv" | "txt" => Ok(FileFormat::Tsv),
            "json" => Ok(FileFormat::Json),
            other => bail!("Unsupported file extension: .{other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
pub fn load_data(path: &Path) -> Result<Data> {
    let format = FileFormat::from_path(path)?;
    let text = read(path)?;
    let data = match format {
        FileFormat::Tsv => Data::from_tsv(&text).context("parsing TSV dataset")?,
        FileFormat::Json => Data::from_json(&text).context("parsing JSON dataset")?,
    };
    log::info!(
        "Loaded {} datapoints in {} spotfields from {}",
        data.len(),
        data.spotfield_count(),
        path.display()
    );
    Ok(data)
}

pub fn encode_data(data: &Data, format: FileFormat) -> Result<String> {
    Ok(match format {
        FileFormat::Tsv => data.to_tsv(),
        FileFormat::Json => data.to_json().context("encoding dataset as JSON")?,
    })
}

/// Write a dataset in the format given by the extension of `path`.
pub fn save_data(path: &Path, data: &Data) -> Result<()> {
    let text = encode_data(data, FileFormat::from_path(path)?)?;
    write(path, &text)?;
    log::info!("Wrote {} datapoints to {}", data.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

pub fn load_statistics(path: &Path) -> Result<DataStatistics> {
    let format = FileFormat::from_path(path)?;
    let text = read(path)?;
    let stats = match format {
        FileFormat::Tsv => DataStatistics::from_tsv(&text).context("parsing TSV statistics")?,
        FileFormat::Json => {
            DataStatistics::from_json(&text).context("parsing JSON statistics")?
        }
    };
    log::info!("Loaded statistics for {} positions from {}", stats.len(), path.display());
    Ok(stats)
}

pub fn encode_statistics(stats: &DataStatistics, format: FileFormat) -> Result<String> {
    Ok(match format {
        FileFormat::Tsv => stats.to_tsv(),
        FileFormat::Json => stats.to_json().context("encoding statistics as JSON")?,
    })
}

/// Write statistics, honouring an explicit `format` over the extension.
pub fn save_statistics(
    path: &Path,
    stats: &DataStatistics,
    format: Option<FileFormat>,
) -> Result<()> {
    let format = match format {
        Some(format) => format,
        None => FileFormat::from_path(path)?,
    };
    write(path, &encode_statistics(stats, format)?)?;
    log::info!("Wrote statistics for {} positions to {}", stats.len(), path.display());
    Ok(())
}

// -- File helpers --

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn write(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}
