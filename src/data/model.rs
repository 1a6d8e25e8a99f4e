use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

use super::json::{DatapointRepr, MeasurepointRepr};

// ---------------------------------------------------------------------------
// SpotKey / Position – identity of a measurement
// ---------------------------------------------------------------------------

/// Identity of a measurement: spotfield, row and column.
///
/// The derived ordering is lexicographic over `(spot, row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpotKey {
    pub spot: u32,
    pub row: u32,
    pub col: u32,
}

impl fmt::Display for SpotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(spot {}, row {}, col {})", self.spot, self.row, self.col)
    }
}

/// Position of a spot within its spotfield, ordered by `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: u32,
    pub col: u32,
}

impl Position {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row {}, col {})", self.row, self.col)
    }
}

/// Canonical dataset order: by spotfield, then row, then column.
pub fn identity_order(a: &Datapoint, b: &Datapoint) -> Ordering {
    a.key().cmp(&b.key())
}

/// Convert a signed index read from text into a spot/row/column index.
pub(crate) fn checked_index(field: &'static str, value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeIndex { field, value });
    }
    u32::try_from(value).map_err(|_| ValidationError::IndexOutOfRange { field, value })
}

/// Float equality on the bit pattern, so `NaN == NaN` and `0.0 != -0.0`.
pub(crate) fn bits_eq(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits()
}

pub(crate) fn approx(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() < eps
}

// ---------------------------------------------------------------------------
// Measurepoint – raw summary of one measured spot
// ---------------------------------------------------------------------------

/// Values measured within a single spot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "MeasurepointRepr")]
pub struct Measurepoint {
    /// Spotfield this spot belongs to.
    spot: u32,
    row: u32,
    col: u32,
    /// Smallest value measured within the spot area.
    min: f64,
    /// Largest value measured within the spot area.
    max: f64,
    mean: f64,
    #[serde(rename = "std_deviation")]
    std_dev: f64,
}

impl Measurepoint {
    /// Create a measurepoint, checking `min <= mean <= max`.
    ///
    /// NaN values compare false in both checks and are let through.
    pub fn new(
        spot: u32,
        row: u32,
        col: u32,
        min: f64,
        max: f64,
        mean: f64,
        std_dev: f64,
    ) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::MinExceedsMax { min, max });
        }
        if mean < min || mean > max {
            return Err(ValidationError::MeanOutOfRange { mean, min, max });
        }
        Ok(Self {
            spot,
            row,
            col,
            min,
            max,
            mean,
            std_dev,
        })
    }

    pub fn spot(&self) -> u32 {
        self.spot
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn col(&self) -> u32 {
        self.col
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    pub fn key(&self) -> SpotKey {
        SpotKey {
            spot: self.spot,
            row: self.row,
            col: self.col,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    /// Compare with an absolute per-field tolerance; indices must match exactly.
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        self.key() == other.key()
            && approx(self.min, other.min, eps)
            && approx(self.max, other.max, eps)
            && approx(self.mean, other.mean, eps)
            && approx(self.std_dev, other.std_dev, eps)
    }
}

impl PartialEq for Measurepoint {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
            && bits_eq(self.min, other.min)
            && bits_eq(self.max, other.max)
            && bits_eq(self.mean, other.mean)
            && bits_eq(self.std_dev, other.std_dev)
    }
}

impl Eq for Measurepoint {}

impl TryFrom<MeasurepointRepr> for Measurepoint {
    type Error = ValidationError;

    fn try_from(repr: MeasurepointRepr) -> Result<Self, Self::Error> {
        Measurepoint::new(
            checked_index("spot", repr.spot)?,
            checked_index("row", repr.row)?,
            checked_index("col", repr.col)?,
            repr.min,
            repr.max,
            repr.mean,
            repr.std_deviation,
        )
    }
}

// ---------------------------------------------------------------------------
// Datapoint – measurepoint plus values derived within its spotfield
// ---------------------------------------------------------------------------

/// A measurepoint together with its spotfield-relative values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "DatapointRepr")]
pub struct Datapoint {
    #[serde(flatten)]
    measurepoint: Measurepoint,
    /// Mean shifted so the smallest mean of the spotfield becomes zero.
    mean_minus_min: f64,
    /// `mean_minus_min` scaled into `[0, 1]` by the spotfield's mean range.
    normalized_mean: f64,
}

impl Datapoint {
    pub fn new(measurepoint: Measurepoint, mean_minus_min: f64, normalized_mean: f64) -> Self {
        Self {
            measurepoint,
            mean_minus_min,
            normalized_mean,
        }
    }

    pub fn measurepoint(&self) -> &Measurepoint {
        &self.measurepoint
    }

    pub fn mean_minus_min(&self) -> f64 {
        self.mean_minus_min
    }

    pub fn normalized_mean(&self) -> f64 {
        self.normalized_mean
    }

    pub fn key(&self) -> SpotKey {
        self.measurepoint.key()
    }

    pub fn position(&self) -> Position {
        self.measurepoint.position()
    }

    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        self.measurepoint.approx_eq(&other.measurepoint, eps)
            && approx(self.mean_minus_min, other.mean_minus_min, eps)
            && approx(self.normalized_mean, other.normalized_mean, eps)
    }
}

impl PartialEq for Datapoint {
    fn eq(&self, other: &Self) -> bool {
        self.measurepoint == other.measurepoint
            && bits_eq(self.mean_minus_min, other.mean_minus_min)
            && bits_eq(self.normalized_mean, other.normalized_mean)
    }
}

impl Eq for Datapoint {}

impl TryFrom<DatapointRepr> for Datapoint {
    type Error = ValidationError;

    fn try_from(repr: DatapointRepr) -> Result<Self, Self::Error> {
        Ok(Datapoint::new(
            repr.measurepoint.try_into()?,
            repr.mean_minus_min,
            repr.normalized_mean,
        ))
    }
}
