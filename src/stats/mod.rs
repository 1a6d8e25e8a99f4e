/// Streaming helpers shared by dataset construction and analysis.
pub mod distinct;
pub mod running;

pub use distinct::StatefulDistinct;
pub use running::RunningStats;

/// Replace an undefined ratio (`0/0`, `0·∞`, ...) with `0.0`.
///
/// Downstream consumers expect finite numbers for degenerate spotfields and
/// zero averages; infinities are passed through unchanged.
pub fn nan_to_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}
