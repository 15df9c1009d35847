//! Average mark over a filtered set of visits.

/// Scale for rounding to four decimal places.
const SCALE: f64 = 10_000.0;

/// Running sum and count of visit marks. The sum is widened so that any
/// number of `i64` marks accumulates without overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkAverage {
  sum:   i128,
  count: u64,
}

impl MarkAverage {
  pub fn push(&mut self, mark: i64) {
    self.sum += i128::from(mark);
    self.count += 1;
  }

  pub fn count(&self) -> u64 { self.count }

  /// The mean mark rounded half away from zero to four decimals, or `0.0`
  /// when nothing was pushed.
  pub fn value(&self) -> f64 {
    if self.count == 0 {
      return 0.0;
    }
    let mean = self.sum as f64 / self.count as f64;
    (mean * SCALE).round() / SCALE
  }
}

impl Extend<i64> for MarkAverage {
  fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
    for mark in iter {
      self.push(mark);
    }
  }
}

impl FromIterator<i64> for MarkAverage {
  fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
    let mut avg = Self::default();
    avg.extend(iter);
    avg
  }
}
