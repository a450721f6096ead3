// Copyright 2025 lapsight developers. All rights reserved.

/// Arithmetic mean. Empty input yields `0.0` so analyzers can degrade
/// to defaults instead of propagating errors (missing channels are not
/// fatal).
pub fn mean(values: &[f64]) -> f64 {
  if values.is_empty() {
    return 0.0;
  }
  values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (not sample variance). Empty input yields `0.0`.
pub fn variance(values: &[f64]) -> f64 {
  if values.is_empty() {
    return 0.0;
  }
  let mean = mean(values);
  values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>()
        / values.len() as f64
}

pub fn median(values: &[f64]) -> f64 {
  if values.is_empty() {
    return 0.0;
  }
  let mut sorted = values.to_vec();
  sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

  let mid = sorted.len() / 2;
  if sorted.len() % 2 == 0 {
    (sorted[mid - 1] + sorted[mid]) / 2.0
  } else {
    sorted[mid]
  }
}

/// Percentile with linear interpolation between closest ranks, i.e.
/// the rank is `pct / 100 * (len - 1)` and values between ranks are
/// interpolated. Empty input yields `0.0`.
pub fn percentile(values: &[f64], pct: f64) -> f64 {
  if values.is_empty() {
    return 0.0;
  }
  let mut sorted = values.to_vec();
  sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

  let rank = pct / 100.0 * (sorted.len() - 1) as f64;
  let lo = rank.floor() as usize;
  let hi = rank.ceil() as usize;
  if lo == hi {
    return sorted[lo];
  }
  sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

/// First-degree least-squares fit of `y` over `x`. Returns the slope;
/// degenerate inputs (fewer than two points, zero spread in `x`) fit a
/// flat line.
pub fn linear_slope(x: &[f64], y: &[f64]) -> f64 {
  let n = x.len().min(y.len());
  if n < 2 {
    return 0.0;
  }

  let n_f = n as f64;
  let sum_x = x[..n].iter().sum::<f64>();
  let sum_y = y[..n].iter().sum::<f64>();
  let sum_xy = x[..n].iter().zip(&y[..n]).map(|(a, b)| a * b).sum::<f64>();
  let sum_xx = x[..n].iter().map(|a| a * a).sum::<f64>();

  let denominator = n_f * sum_xx - sum_x * sum_x;
  if denominator.abs() < f64::EPSILON {
    return 0.0;
  }
  (n_f * sum_xy - sum_x * sum_y) / denominator
}

pub fn clamp_score(value: f64) -> f64 {
  value.clamp(0.0, 100.0)
}


#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;


  #[test]
  fn mean_test() {
    assert_eq!(0.0, mean(&[]));
    assert_eq!(2.0, mean(&[1.0, 2.0, 3.0]));
    assert_eq!(200.0, mean(&[200.0; 100]));
  }

  #[test]
  fn variance_test() {
    assert_eq!(0.0, variance(&[]));
    assert_eq!(0.0, variance(&[200.0; 100]));
    // population variance of {2, 4}: mean 3, ((−1)² + 1²) / 2 = 1
    assert_eq!(1.0, variance(&[2.0, 4.0]));
  }

  #[test]
  fn median_test() {
    assert_eq!(0.0, median(&[]));
    assert_eq!(2.0, median(&[3.0, 1.0, 2.0]));
    assert_eq!(2.5, median(&[4.0, 1.0, 2.0, 3.0]));
  }

  #[test]
  fn percentile_test() {
    assert_eq!(0.0, percentile(&[], 75.0));
    assert_eq!(3.0, percentile(&[1.0, 2.0, 3.0, 4.0, 5.0], 50.0));
    assert_eq!(5.0, percentile(&[1.0, 2.0, 3.0, 4.0, 5.0], 100.0));
    // rank 2.25 between 3.0 and 4.0
    assert_eq!(3.25, percentile(&[1.0, 2.0, 3.0, 4.0], 75.0));
    assert_eq!(200.0, percentile(&[200.0; 100], 75.0));
  }

  #[test]
  fn linear_slope_test() {
    assert_eq!(0.0, linear_slope(&[], &[]));
    assert_eq!(0.0, linear_slope(&[1.0], &[2.0]));
    assert_eq!(0.0, linear_slope(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]));

    let x = [1.0, 2.0, 3.0, 4.0, 5.0];
    let y = [90.0, 90.1, 90.2, 90.3, 90.4];
    assert!((linear_slope(&x, &y) - 0.1).abs() < 1e-9);
  }

  #[test]
  fn clamp_score_test() {
    assert_eq!(0.0, clamp_score(-12.5));
    assert_eq!(42.0, clamp_score(42.0));
    assert_eq!(100.0, clamp_score(512.0));
  }
}
