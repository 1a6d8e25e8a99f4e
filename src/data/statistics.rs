use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::stats::{nan_to_zero, RunningStats};

use super::dataset::Data;
use super::json::{DataStatisticsRepr, DatapointStatisticsRepr};
use super::model::{approx, bits_eq, Datapoint, Position};

/// Relative deviations are reported in percent.
const PERCENT: f64 = 100.0;

// ---------------------------------------------------------------------------
// Spread – average and deviation of one value across spotfields
// ---------------------------------------------------------------------------

/// Average, population standard deviation and relative standard deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spread {
    pub average: f64,
    pub std_dev: f64,
    /// `100 * std_dev / average`, `0.0` when that is undefined.
    pub rel_std_dev: f64,
}

impl Spread {
    pub fn from_stats(stats: &RunningStats) -> Self {
        let average = stats.average();
        let std_dev = stats.standard_deviation();
        Self {
            average,
            std_dev,
            rel_std_dev: nan_to_zero(std_dev * PERCENT / average),
        }
    }
}

// ---------------------------------------------------------------------------
// DatapointStatistics – one spot position across all spotfields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "DatapointStatisticsRepr")]
pub struct DatapointStatistics {
    row: u32,
    col: u32,
    #[serde(rename = "adjusted_average")]
    raw_avg: f64,
    #[serde(rename = "adjusted_average_std_deviation")]
    std_dev_raw_avg: f64,
    #[serde(rename = "relative_adjusted_average_std_deviation")]
    rel_std_dev_raw_avg: f64,
    #[serde(rename = "normalized_average")]
    norm_avg: f64,
    #[serde(rename = "normalized_average_std_deviation")]
    std_dev_norm_avg: f64,
    #[serde(rename = "relative_normalized_average_std_deviation")]
    rel_std_dev_norm_avg: f64,
}

impl DatapointStatistics {
    /// `adjusted` summarizes `mean_minus_min`, `normalized` summarizes
    /// `normalized_mean`.
    pub fn new(row: u32, col: u32, adjusted: Spread, normalized: Spread) -> Self {
        Self {
            row,
            col,
            raw_avg: adjusted.average,
            std_dev_raw_avg: adjusted.std_dev,
            rel_std_dev_raw_avg: adjusted.rel_std_dev,
            norm_avg: normalized.average,
            std_dev_norm_avg: normalized.std_dev,
            rel_std_dev_norm_avg: normalized.rel_std_dev,
        }
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn col(&self) -> u32 {
        self.col
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    pub fn raw_avg(&self) -> f64 {
        self.raw_avg
    }

    pub fn std_dev_raw_avg(&self) -> f64 {
        self.std_dev_raw_avg
    }

    pub fn rel_std_dev_raw_avg(&self) -> f64 {
        self.rel_std_dev_raw_avg
    }

    pub fn norm_avg(&self) -> f64 {
        self.norm_avg
    }

    pub fn std_dev_norm_avg(&self) -> f64 {
        self.std_dev_norm_avg
    }

    pub fn rel_std_dev_norm_avg(&self) -> f64 {
        self.rel_std_dev_norm_avg
    }

    pub fn adjusted(&self) -> Spread {
        Spread {
            average: self.raw_avg,
            std_dev: self.std_dev_raw_avg,
            rel_std_dev: self.rel_std_dev_raw_avg,
        }
    }

    pub fn normalized(&self) -> Spread {
        Spread {
            average: self.norm_avg,
            std_dev: self.std_dev_norm_avg,
            rel_std_dev: self.rel_std_dev_norm_avg,
        }
    }

    fn fields(&self) -> [f64; 6] {
        [
            self.raw_avg,
            self.std_dev_raw_avg,
            self.rel_std_dev_raw_avg,
            self.norm_avg,
            self.std_dev_norm_avg,
            self.rel_std_dev_norm_avg,
        ]
    }

    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        self.position() == other.position()
            && self
                .fields()
                .iter()
                .zip(other.fields())
                .all(|(&a, b)| approx(a, b, eps))
    }
}

impl PartialEq for DatapointStatistics {
    fn eq(&self, other: &Self) -> bool {
        self.position() == other.position()
            && self
                .fields()
                .iter()
                .zip(other.fields())
                .all(|(&a, b)| bits_eq(a, b))
    }
}

impl Eq for DatapointStatistics {}

/// Statistics table order: by row, then column.
pub fn position_order(a: &DatapointStatistics, b: &DatapointStatistics) -> Ordering {
    a.position().cmp(&b.position())
}

// ---------------------------------------------------------------------------
// DataStatistics – the full cross-spotfield table
// ---------------------------------------------------------------------------

/// Per-position statistics across all spotfields, sorted by `(row, col)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DataStatisticsRepr")]
pub struct DataStatistics {
    values: Vec<DatapointStatistics>,
}

impl DataStatistics {
    /// Analyze a dataset.
    ///
    /// For each spot position the adjusted (`mean_minus_min`) and the
    /// normalized (`normalized_mean`) values of all spotfields are averaged,
    /// together with their absolute and relative standard deviation. The
    /// input is left untouched and the result is sorted by position.
    pub fn analyze(data: &Data) -> Self {
        let values = data
            .transposed()
            .iter()
            .map(|(position, group)| {
                let adjusted: RunningStats = group.iter().map(Datapoint::mean_minus_min).collect();
                let normalized: RunningStats =
                    group.iter().map(Datapoint::normalized_mean).collect();
                log::trace!(
                    "{position}: {} spotfields, adjusted avg {}, normalized avg {}",
                    group.len(),
                    adjusted.average(),
                    normalized.average()
                );
                DatapointStatistics::new(
                    position.row,
                    position.col,
                    Spread::from_stats(&adjusted),
                    Spread::from_stats(&normalized),
                )
            })
            .collect();
        Self::from_values(values)
    }

    /// Wrap already computed entries, sorting them by position.
    pub fn from_values(mut values: Vec<DatapointStatistics>) -> Self {
        values.sort_by(position_order);
        Self { values }
    }

    pub fn values(&self) -> &[DatapointStatistics] {
        &self.values
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&DatapointStatistics> {
        let target = Position::new(row, col);
        self.values
            .binary_search_by(|s| s.position().cmp(&target))
            .ok()
            .map(|i| &self.values[i])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a.approx_eq(b, eps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Measurepoint;

    fn dp(spot: u32, row: u32, col: u32, mean: f64, mmm: f64, norm: f64) -> Datapoint {
        Datapoint::new(
            Measurepoint::new(spot, row, col, 0.0, 20.0, mean, 1.0).unwrap(),
            mmm,
            norm,
        )
    }

    fn two_spotfields() -> Data {
        Data::of(vec![
            dp(0, 0, 0, 10.0, 10.0, 1.0),
            dp(0, 0, 1, 5.0, 5.0, 0.5),
            dp(1, 0, 0, 12.0, 10.0, 1.0),
            dp(1, 0, 1, 8.0, 6.0, 0.6),
        ])
        .unwrap()
    }

    #[test]
    fn averages_across_spotfields() {
        let stats = DataStatistics::analyze(&two_spotfields());
        assert_eq!(stats.len(), 2);
        let eps = 1e-9;

        let first = &stats.values()[0];
        assert_eq!(first.position(), Position::new(0, 0));
        assert!((first.raw_avg() - 10.0).abs() < eps);
        assert!(first.std_dev_raw_avg().abs() < eps);
        assert!(first.rel_std_dev_raw_avg().abs() < eps);
        assert!((first.norm_avg() - 1.0).abs() < eps);
        assert!(first.std_dev_norm_avg().abs() < eps);
        assert!(first.rel_std_dev_norm_avg().abs() < eps);

        let second = &stats.values()[1];
        assert_eq!(second.position(), Position::new(0, 1));
        assert!((second.raw_avg() - 5.5).abs() < eps);
        assert!((second.std_dev_raw_avg() - 0.5).abs() < eps);
        assert!((second.rel_std_dev_raw_avg() - 9.090_909_090_909).abs() < 1e-6);
        assert!((second.norm_avg() - 0.55).abs() < eps);
        assert!((second.std_dev_norm_avg() - 0.05).abs() < 1e-6);
        assert!((second.rel_std_dev_norm_avg() - 9.090_909_090_909).abs() < 1e-3);
    }

    #[test]
    fn zero_average_gives_zero_relative_deviation() {
        let data = Data::of(vec![dp(0, 0, 0, 1.0, 0.0, 0.0), dp(1, 0, 0, 1.0, 0.0, 0.0)]).unwrap();
        let stats = DataStatistics::analyze(&data);
        let only = &stats.values()[0];
        assert_eq!(only.rel_std_dev_raw_avg(), 0.0);
        assert_eq!(only.rel_std_dev_norm_avg(), 0.0);
    }

    #[test]
    fn empty_data_gives_empty_statistics() {
        let stats = DataStatistics::analyze(&Data::of(Vec::new()).unwrap());
        assert!(stats.is_empty());
    }

    #[test]
    fn analysis_is_repeatable() {
        let data = two_spotfields();
        assert_eq!(DataStatistics::analyze(&data), DataStatistics::analyze(&data));

        let other = Data::of(vec![dp(0, 0, 0, 2.2, 2.0, 0.5)]).unwrap();
        assert_ne!(DataStatistics::analyze(&data), DataStatistics::analyze(&other));
    }

    #[test]
    fn from_values_sorts_and_get_finds() {
        let spread = Spread {
            average: 1.0,
            std_dev: 0.0,
            rel_std_dev: 0.0,
        };
        let stats = DataStatistics::from_values(vec![
            DatapointStatistics::new(1, 0, spread, spread),
            DatapointStatistics::new(0, 2, spread, spread),
            DatapointStatistics::new(0, 1, spread, spread),
        ]);
        let positions: Vec<_> = stats.values().iter().map(|s| s.position()).collect();
        assert_eq!(
            positions,
            [Position::new(0, 1), Position::new(0, 2), Position::new(1, 0)]
        );
        assert_eq!(stats.get(0, 2).map(|s| s.col()), Some(2));
        assert!(stats.get(5, 5).is_none());
    }
}
