use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::stats::{nan_to_zero, RunningStats, StatefulDistinct};

use super::json::DataRepr;
use super::model::{identity_order, Datapoint, Measurepoint, Position, SpotKey};

/// Datapoints grouped by spot position, one entry per spotfield in spot order.
pub type TransposedView = BTreeMap<Position, Vec<Datapoint>>;

// ---------------------------------------------------------------------------
// Data – the validated measurement of a whole slide
// ---------------------------------------------------------------------------

/// The datapoints of a measurement.
///
/// Constructing a dataset guarantees that
/// * datapoints are sorted by spot, row, column,
/// * no two datapoints share a `(spot, row, col)` key,
/// * every spotfield has the same layout, i.e. each position occurs the same
///   number of times across the dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DataRepr")]
pub struct Data {
    values: Vec<Datapoint>,
    #[serde(skip_serializing)]
    transposed: TransposedView,
}

impl Data {
    /// Validate a list of datapoints in any order.
    pub fn of(mut values: Vec<Datapoint>) -> Result<Self> {
        values.sort_by(identity_order);
        ensure_distinct(&values)?;

        let transposed = transpose(&values);
        ensure_same_shape(&transposed)?;

        log::debug!(
            "Built dataset: {} datapoints at {} positions",
            values.len(),
            transposed.len()
        );
        Ok(Self { values, transposed })
    }

    /// Build a dataset from raw measurements, deriving the adjusted and
    /// normalized value of each measurement within its spotfield.
    ///
    /// `mean_minus_min` is the mean minus the smallest mean of the spotfield;
    /// `normalized_mean` divides that by the spotfield's mean range. A
    /// spotfield whose means are all equal normalizes to `0.0` throughout.
    pub fn from_measurepoints(values: Vec<Measurepoint>) -> Result<Self> {
        let mut spotfields: BTreeMap<u32, Vec<Measurepoint>> = BTreeMap::new();
        for mp in values {
            spotfields.entry(mp.spot()).or_default().push(mp);
        }

        let datapoints = spotfields
            .iter()
            .flat_map(|(&spot, members)| normalize_spotfield(spot, members))
            .collect();
        Self::of(datapoints)
    }

    /// All datapoints in `(spot, row, col)` order.
    pub fn values(&self) -> &[Datapoint] {
        &self.values
    }

    /// The datapoints superimposed as a single spotfield.
    pub fn transposed(&self) -> &TransposedView {
        &self.transposed
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of distinct spotfields.
    pub fn spotfield_count(&self) -> usize {
        let mut spots: Vec<u32> = self.values.iter().map(|dp| dp.key().spot).collect();
        spots.dedup();
        spots.len()
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

impl PartialEq for Data {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for Data {}

// ---------------------------------------------------------------------------
// Construction helpers
// ---------------------------------------------------------------------------

fn normalize_spotfield(spot: u32, members: &[Measurepoint]) -> Vec<Datapoint> {
    let means: RunningStats = members.iter().map(Measurepoint::mean).collect();
    let min_mean = means.min().unwrap_or(0.0);
    let max_mean = means.max().unwrap_or(0.0);
    let range = max_mean - min_mean;
    if range == 0.0 {
        log::debug!("Spotfield {spot} has a constant mean of {min_mean}, normalizing to 0");
    }

    members
        .iter()
        .map(|mp| {
            let mean_minus_min = mp.mean() - min_mean;
            Datapoint::new(*mp, mean_minus_min, nan_to_zero(mean_minus_min / range))
        })
        .collect()
}

/// `sorted` must already be in [`identity_order`].
fn ensure_distinct(sorted: &[Datapoint]) -> Result<()> {
    let mut distinct = StatefulDistinct::from_comparator(identity_order);
    let duplicates: Vec<SpotKey> = sorted
        .iter()
        .filter(|&dp| distinct.is_duplicate(dp))
        .map(Datapoint::key)
        .collect();
    match duplicates.first() {
        None => Ok(()),
        Some(&key) => {
            log::debug!("Rejecting dataset with {} duplicate keys", duplicates.len());
            Err(Error::DuplicateKey(key))
        }
    }
}

fn transpose(sorted: &[Datapoint]) -> TransposedView {
    let mut transposed = TransposedView::new();
    for dp in sorted {
        transposed.entry(dp.position()).or_default().push(*dp);
    }
    transposed
}

fn ensure_same_shape(transposed: &TransposedView) -> Result<()> {
    let mut groups = transposed.iter();
    let Some((_, first)) = groups.next() else {
        return Ok(());
    };
    let expected = first.len();
    for (&position, group) in groups {
        if group.len() != expected {
            return Err(Error::IrregularShape {
                position,
                expected,
                found: group.len(),
            });
        }
    }
    Ok(())
}
