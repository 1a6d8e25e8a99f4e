//! Tab separated export of [`Data`] and [`DataStatistics`].
//!
//! Layout: one header line followed by one line per entry, every line ending
//! in `\n`. Floats are written in their shortest form that parses back to the
//! identical value (`2.0`, `0.1`, `1e-7`), so decoding an export reproduces
//! the exported values bit for bit. The header strings and column orders are
//! read by other tools and must not change. Empty lines are malformed rows.

use std::fmt;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{Error, FormatError, Result};

use super::dataset::Data;
use super::model::{checked_index, Datapoint, Measurepoint};
use super::statistics::{DataStatistics, DatapointStatistics, Spread};

pub const DATA_TSV_HEADER: &str =
    "spot\trow\tcol\tmin\tmax\tmean\tstd_deviation\tmean_minus_min\tnormalized_mean";

pub const STATISTICS_TSV_HEADER: &str = "row\tcol\
    \tadjusted_average\tadjusted_average_std_deviation\
    \trelative_adjusted_average_std_deviation\
    \tnormalized_average\tnormalized_average_std_deviation\
    \trelative_normalized_average_std_deviation";

const DATA_COLUMNS: [&str; 9] = [
    "spot",
    "row",
    "col",
    "min",
    "max",
    "mean",
    "std_deviation",
    "mean_minus_min",
    "normalized_mean",
];

const STATISTICS_COLUMNS: [&str; 8] = [
    "row",
    "col",
    "adjusted_average",
    "adjusted_average_std_deviation",
    "relative_adjusted_average_std_deviation",
    "normalized_average",
    "normalized_average_std_deviation",
    "relative_normalized_average_std_deviation",
];

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Streams a dataset as TSV through [`fmt::Display`].
pub struct DataTsv<'a>(&'a Data);

impl fmt::Display for DataTsv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{DATA_TSV_HEADER}")?;
        for dp in self.0.values() {
            let mp = dp.measurepoint();
            writeln!(
                f,
                "{}\t{}\t{}\t{:?}\t{:?}\t{:?}\t{:?}\t{:?}\t{:?}",
                mp.spot(),
                mp.row(),
                mp.col(),
                mp.min(),
                mp.max(),
                mp.mean(),
                mp.std_dev(),
                dp.mean_minus_min(),
                dp.normalized_mean()
            )?;
        }
        Ok(())
    }
}

/// Streams a statistics table as TSV through [`fmt::Display`].
pub struct StatisticsTsv<'a>(&'a DataStatistics);

impl fmt::Display for StatisticsTsv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{STATISTICS_TSV_HEADER}")?;
        for s in self.0.values() {
            writeln!(
                f,
                "{}\t{}\t{:?}\t{:?}\t{:?}\t{:?}\t{:?}\t{:?}",
                s.row(),
                s.col(),
                s.raw_avg(),
                s.std_dev_raw_avg(),
                s.rel_std_dev_raw_avg(),
                s.norm_avg(),
                s.std_dev_norm_avg(),
                s.rel_std_dev_norm_avg()
            )?;
        }
        Ok(())
    }
}

impl Data {
    /// TSV view that can be written with `write!` without building a string.
    pub fn tsv(&self) -> DataTsv<'_> {
        DataTsv(self)
    }

    pub fn to_tsv(&self) -> String {
        self.tsv().to_string()
    }

    /// Parse a dataset from TSV; the rows are validated like [`Data::of`].
    pub fn from_tsv(s: &str) -> Result<Self> {
        let values = read_rows(s, &DATA_COLUMNS)?
            .iter()
            .map(parse_datapoint)
            .collect::<Result<Vec<_>>>()?;
        Data::of(values)
    }
}

impl DataStatistics {
    pub fn tsv(&self) -> StatisticsTsv<'_> {
        StatisticsTsv(self)
    }

    pub fn to_tsv(&self) -> String {
        self.tsv().to_string()
    }

    pub fn from_tsv(s: &str) -> Result<Self> {
        let values = read_rows(s, &STATISTICS_COLUMNS)?
            .iter()
            .map(parse_statistics)
            .collect::<Result<Vec<_>>>()?;
        Ok(DataStatistics::from_values(values))
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// One data line together with the column names used in error messages.
struct Row<'c> {
    line: u64,
    record: StringRecord,
    columns: &'c [&'static str],
}

impl Row<'_> {
    fn field(&self, i: usize) -> &str {
        self.record.get(i).unwrap_or("")
    }

    fn invalid(&self, i: usize) -> FormatError {
        FormatError::InvalidNumber {
            line: self.line,
            column: self.columns[i],
            value: self.field(i).to_string(),
        }
    }

    fn index(&self, i: usize) -> Result<u32> {
        let value: i64 = self.field(i).parse().map_err(|_| self.invalid(i))?;
        Ok(checked_index(self.columns[i], value)?)
    }

    fn float(&self, i: usize) -> Result<f64> {
        Ok(self.field(i).parse::<f64>().map_err(|_| self.invalid(i))?)
    }
}

/// Check the header line and split the remaining lines into fields.
///
/// Quoting is disabled so a field is exactly the text between two tabs, and
/// the header comparison is therefore a comparison of the raw line. The
/// reader skips empty lines, so those are located in the raw text instead.
fn read_rows<'c>(s: &str, columns: &'c [&'static str]) -> Result<Vec<Row<'c>>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(s.as_bytes());
    let mut records = reader.records();

    let blank = s.lines().position(str::is_empty).map(|i| i as u64 + 1);
    if blank == Some(1) {
        return Err(FormatError::MissingHeader.into());
    }

    let header = records.next().transpose().map_err(FormatError::from)?;
    if !header.is_some_and(|h| h.iter().eq(columns.iter().copied())) {
        return Err(FormatError::MissingHeader.into());
    }

    let mut rows = Vec::new();
    for result in records {
        let record = result.map_err(FormatError::from)?;
        let line = record.position().map_or(0, |p| p.line());
        if let Some(blank) = blank.filter(|&b| b <= line) {
            return Err(blank_line(blank, columns));
        }
        if record.len() != columns.len() {
            return Err(FormatError::MalformedRow {
                line,
                expected: columns.len(),
                found: record.len(),
            }
            .into());
        }
        rows.push(Row {
            line,
            record,
            columns,
        });
    }

    // Trailing empty lines never produce a record
    if let Some(blank) = blank {
        return Err(blank_line(blank, columns));
    }
    Ok(rows)
}

fn blank_line(line: u64, columns: &[&'static str]) -> Error {
    FormatError::MalformedRow {
        line,
        expected: columns.len(),
        found: 1,
    }
    .into()
}

fn parse_datapoint(row: &Row<'_>) -> Result<Datapoint> {
    let measurepoint = Measurepoint::new(
        row.index(0)?,
        row.index(1)?,
        row.index(2)?,
        row.float(3)?,
        row.float(4)?,
        row.float(5)?,
        row.float(6)?,
    )?;
    Ok(Datapoint::new(measurepoint, row.float(7)?, row.float(8)?))
}

fn parse_statistics(row: &Row<'_>) -> Result<DatapointStatistics> {
    Ok(DatapointStatistics::new(
        row.index(0)?,
        row.index(1)?,
        Spread {
            average: row.float(2)?,
            std_dev: row.float(3)?,
            rel_std_dev: row.float(4)?,
        },
        Spread {
            average: row.float(5)?,
            std_dev: row.float(6)?,
            rel_std_dev: row.float(7)?,
        },
    ))
}
