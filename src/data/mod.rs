/// Data layer: measurement records, dataset validation, statistics and codecs.
///
/// Architecture:
/// ```text
///   Vec<Measurepoint> / Vec<Datapoint>
///        │
///        ▼
///   ┌──────────┐
///   │ dataset   │  sort → reject duplicates → transpose → check layout
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ statistics │  per (row, col): RunningStats over all spotfields
///   └────────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ tsv / json    │  export; import re-enters `dataset`
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  files by extension
///   └──────────┘
/// ```

pub mod dataset;
pub mod json;
pub mod loader;
pub mod model;
pub mod statistics;
pub mod tsv;

pub use dataset::{Data, TransposedView};
pub use model::{identity_order, Datapoint, Measurepoint, Position, SpotKey};
pub use statistics::{position_order, DataStatistics, DatapointStatistics, Spread};
pub use tsv::{DATA_TSV_HEADER, STATISTICS_TSV_HEADER};
