//! Combinable running summary of a stream of `f64` values.
//!
//! Sums are accumulated with Kahan compensation so the average and the
//! population standard deviation stay accurate for long streams. Two
//! accumulators built over disjoint parts of a stream can be merged with
//! [`RunningStats::combine`], which is the only primitive needed to fold
//! partial results computed independently.

/// Kahan-compensated running summary: count, sum, sum of squares, min, max.
#[derive(Debug, Clone, Copy)]
pub struct RunningStats {
    count: u64,
    sum: CompensatedSum,
    sum_of_squares: CompensatedSum,
    min: f64,
    max: f64,
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningStats {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: CompensatedSum::default(),
            sum_of_squares: CompensatedSum::default(),
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Record a single value in O(1).
    pub fn accept(&mut self, value: f64) {
        self.count += 1;
        self.sum.add(value);
        self.sum_of_squares.add(value * value);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Merge the state of `other` into `self`.
    ///
    /// Combining is associative and commutative up to floating point
    /// rounding, so partial accumulators may be merged in any order.
    pub fn combine(&mut self, other: &RunningStats) -> &mut Self {
        self.count += other.count;
        self.sum.merge(&other.sum);
        self.sum_of_squares.merge(&other.sum_of_squares);
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum.value()
    }

    pub fn sum_of_squares(&self) -> f64 {
        self.sum_of_squares.value()
    }

    /// Smallest value seen, `None` before the first value.
    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    /// Largest value seen, `None` before the first value.
    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }

    /// Arithmetic mean, `0.0` when empty.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum() / self.count as f64
    }

    /// Population standard deviation, `0.0` when empty.
    ///
    /// Rounding can push `E[x²] − E[x]²` slightly below zero for constant
    /// streams; the variance is clamped at zero before taking the root.
    pub fn standard_deviation(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let n = self.count as f64;
        let average = self.average();
        let variance = self.sum_of_squares() / n - average * average;
        variance.max(0.0).sqrt()
    }
}

impl Extend<f64> for RunningStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.accept(value);
        }
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = RunningStats::new();
        stats.extend(iter);
        stats
    }
}

// ---------------------------------------------------------------------------
// CompensatedSum
// ---------------------------------------------------------------------------

/// Kahan sum with a plain sum kept alongside.
///
/// The compensation term turns into NaN once an infinite value is added; the
/// plain sum is then reported instead so that `inf` stays `inf`.
#[derive(Debug, Clone, Copy, Default)]
struct CompensatedSum {
    sum: f64,
    compensation: f64,
    simple: f64,
}

impl CompensatedSum {
    fn add(&mut self, value: f64) {
        self.simple += value;
        self.add_compensated(value);
    }

    fn merge(&mut self, other: &CompensatedSum) {
        self.simple += other.simple;
        self.add_compensated(other.sum);
        self.add_compensated(-other.compensation);
    }

    fn add_compensated(&mut self, value: f64) {
        let y = value - self.compensation;
        let t = self.sum + y;
        self.compensation = (t - self.sum) - y;
        self.sum = t;
    }

    fn value(&self) -> f64 {
        let corrected = self.sum - self.compensation;
        if corrected.is_nan() && self.simple.is_infinite() {
            self.simple
        } else {
            corrected
        }
    }
}
