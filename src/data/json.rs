//! JSON encoding of [`Data`] and [`DataStatistics`].
//!
//! ```json
//! { "values": [ { "spot": 0, "row": 0, "col": 0,
//!                 "min": 1.1, "max": 3.5, "mean": 2.4, "std_deviation": 6.3,
//!                 "mean_minus_min": 2.4, "normalized_mean": 0.8 }, ... ] }
//! ```
//!
//! Decoding goes through the same constructors as every other entry point,
//! so a document with duplicate keys or a ragged layout is rejected.
//! JSON has no literal for NaN or infinity; those encode as `null` and do
//! not decode again.

use serde::Deserialize;

use crate::error::{Error, Result, ValidationError};

use super::dataset::Data;
use super::model::checked_index;
use super::statistics::{DataStatistics, DatapointStatistics, Spread};

// ---------------------------------------------------------------------------
// Unvalidated wire shapes
// ---------------------------------------------------------------------------

/// Indices are read signed so a negative value surfaces as a validation
/// error rather than a type mismatch.
#[derive(Debug, Deserialize)]
pub(crate) struct MeasurepointRepr {
    pub spot: i64,
    pub row: i64,
    pub col: i64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_deviation: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DatapointRepr {
    #[serde(flatten)]
    pub measurepoint: MeasurepointRepr,
    pub mean_minus_min: f64,
    pub normalized_mean: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DataRepr {
    pub values: Vec<DatapointRepr>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DatapointStatisticsRepr {
    pub row: i64,
    pub col: i64,
    pub adjusted_average: f64,
    pub adjusted_average_std_deviation: f64,
    pub relative_adjusted_average_std_deviation: f64,
    pub normalized_average: f64,
    pub normalized_average_std_deviation: f64,
    pub relative_normalized_average_std_deviation: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DataStatisticsRepr {
    pub values: Vec<DatapointStatisticsRepr>,
}

// ---------------------------------------------------------------------------
// Validation from wire shapes
// ---------------------------------------------------------------------------

impl TryFrom<DataRepr> for Data {
    type Error = Error;

    fn try_from(repr: DataRepr) -> Result<Self> {
        let values = repr
            .values
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, ValidationError>>()?;
        Data::of(values)
    }
}

impl TryFrom<DatapointStatisticsRepr> for DatapointStatistics {
    type Error = ValidationError;

    fn try_from(repr: DatapointStatisticsRepr) -> Result<Self, Self::Error> {
        Ok(DatapointStatistics::new(
            checked_index("row", repr.row)?,
            checked_index("col", repr.col)?,
            Spread {
                average: repr.adjusted_average,
                std_dev: repr.adjusted_average_std_deviation,
                rel_std_dev: repr.relative_adjusted_average_std_deviation,
            },
            Spread {
                average: repr.normalized_average,
                std_dev: repr.normalized_average_std_deviation,
                rel_std_dev: repr.relative_normalized_average_std_deviation,
            },
        ))
    }
}

impl TryFrom<DataStatisticsRepr> for DataStatistics {
    type Error = ValidationError;

    fn try_from(repr: DataStatisticsRepr) -> Result<Self, Self::Error> {
        let values = repr
            .values
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DataStatistics::from_values(values))
    }
}

// ---------------------------------------------------------------------------
// Public helpers
// ---------------------------------------------------------------------------

impl Data {
    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a JSON document produced by [`Data::to_json`].
    pub fn from_json(s: &str) -> Result<Self> {
        let repr: DataRepr = serde_json::from_str(s)?;
        Data::try_from(repr)
    }
}

impl DataStatistics {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let repr: DataStatisticsRepr = serde_json::from_str(s)?;
        Ok(DataStatistics::try_from(repr)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Datapoint, Measurepoint};

    fn dp(spot: u32, row: u32, col: u32, mean: f64, mmm: f64, norm: f64) -> Datapoint {
        Datapoint::new(
            Measurepoint::new(spot, row, col, 0.0, 10.0, mean, 0.5).unwrap(),
            mmm,
            norm,
        )
    }

    #[test]
    fn datapoint_fields_are_flattened() {
        let data = Data::of(vec![dp(0, 1, 2, 2.5, 0.0, 0.0)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&data.to_json().unwrap()).unwrap();
        let first = &value["values"][0];
        assert_eq!(first["spot"], 0);
        assert_eq!(first["row"], 1);
        assert_eq!(first["col"], 2);
        assert_eq!(first["mean"], 2.5);
        assert_eq!(first["std_deviation"], 0.5);
        assert_eq!(first["mean_minus_min"], 0.0);
        assert!(first.get("measurepoint").is_none());
    }

    #[test]
    fn statistics_use_long_field_names() {
        let data = Data::of(vec![dp(0, 0, 0, 1.0, 1.0, 1.0), dp(1, 0, 0, 2.0, 2.0, 1.0)]).unwrap();
        let stats = DataStatistics::analyze(&data);
        let value: serde_json::Value = serde_json::from_str(&stats.to_json().unwrap()).unwrap();
        let first = &value["values"][0];
        for field in [
            "row",
            "col",
            "adjusted_average",
            "adjusted_average_std_deviation",
            "relative_adjusted_average_std_deviation",
            "normalized_average",
            "normalized_average_std_deviation",
            "relative_normalized_average_std_deviation",
        ] {
            assert!(first.get(field).is_some(), "missing {field}");
        }
    }

    #[test]
    fn round_trips_exactly() {
        let data = Data::of(vec![
            dp(0, 0, 0, 2.4, 0.1 + 0.2, 1.0 / 3.0),
            dp(1, 0, 0, 2.25, 1e-300, 0.7),
        ])
        .unwrap();
        assert_eq!(Data::from_json(&data.to_json().unwrap()).unwrap(), data);

        let stats = DataStatistics::analyze(&data);
        assert_eq!(
            DataStatistics::from_json(&stats.to_json().unwrap()).unwrap(),
            stats
        );
    }

    #[test]
    fn decoding_revalidates() {
        let duplicate = r#"{"values": [
            {"spot": 1, "row": 0, "col": 1, "min": 0, "max": 10, "mean": 4, "std_deviation": 0,
             "mean_minus_min": 0, "normalized_mean": 0},
            {"spot": 1, "row": 0, "col": 1, "min": 0, "max": 10, "mean": 5, "std_deviation": 0,
             "mean_minus_min": 0, "normalized_mean": 0}
        ]}"#;
        assert!(matches!(
            Data::from_json(duplicate),
            Err(Error::DuplicateKey(_))
        ));

        let negative = r#"{"values": [
            {"spot": -1, "row": 0, "col": 1, "min": 0, "max": 10, "mean": 4, "std_deviation": 0,
             "mean_minus_min": 0, "normalized_mean": 0}
        ]}"#;
        assert!(matches!(
            Data::from_json(negative),
            Err(Error::Validation(ValidationError::NegativeIndex { field: "spot", .. }))
        ));

        assert!(matches!(Data::from_json("[]"), Err(Error::Format(_))));
    }

    #[test]
    fn serde_deserialize_validates_too() {
        let inverted = r#"{"spot": 0, "row": 0, "col": 0, "min": 5, "max": 1, "mean": 3,
                           "std_deviation": 0, "mean_minus_min": 0, "normalized_mean": 0}"#;
        assert!(serde_json::from_str::<Datapoint>(inverted).is_err());
    }
}
