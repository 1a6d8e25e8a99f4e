//! Spotfield measurement aggregation.
//!
//! Raw per-spot measurements ([`Measurepoint`]) are gathered into a validated
//! [`Data`] set, from which [`DataStatistics::analyze`] derives the
//! consistency of every spot position across all spotfields. Both results
//! export to TSV and JSON and import back to identical values.
//!
//! ```
//! use spotfield_stats::{Data, DataStatistics, Measurepoint};
//!
//! let points = vec![
//!     Measurepoint::new(0, 0, 0, 0.0, 10.0, 1.0, 0.1)?,
//!     Measurepoint::new(0, 0, 1, 0.0, 10.0, 3.0, 0.1)?,
//!     Measurepoint::new(1, 0, 0, 0.0, 10.0, 2.0, 0.1)?,
//!     Measurepoint::new(1, 0, 1, 0.0, 10.0, 6.0, 0.1)?,
//! ];
//! let data = Data::from_measurepoints(points)?;
//! let stats = DataStatistics::analyze(&data);
//! assert_eq!(stats.len(), 2);
//! assert_eq!(Data::from_tsv(&data.to_tsv())?, data);
//! # Ok::<(), spotfield_stats::Error>(())
//! ```

pub mod data;
pub mod error;
pub mod stats;

pub use data::{
    Data, DataStatistics, Datapoint, DatapointStatistics, Measurepoint, Position, SpotKey, Spread,
};
pub use error::{Error, FormatError, Result, ValidationError};
