// Copyright 2025 lapsight developers. All rights reserved.

use crate::{stats, telemetry::LapTelemetry};
use serde::Serialize;


/// Percentile cut for the high-speed subset of a lap.
pub const HIGH_SPEED_PERCENTILE: f64 = 75.0;
/// Percentile cut for the low-speed subset of a lap.
pub const LOW_SPEED_PERCENTILE: f64 = 25.0;
/// Reference top speed the high-speed average is scaled against.
pub const REFERENCE_TOP_SPEED: f64 = 350.0;
/// Weight of the scaled high-speed average in the downforce index.
pub const SPEED_WEIGHT: f64 = 70.0;
/// Base contribution the speed variance is subtracted from.
pub const VARIANCE_BASE: f64 = 30.0;
/// Divisor scaling the variance term of the downforce index.
pub const VARIANCE_SCALE: f64 = 100.0;


/// Downforce estimate document for one lap.
///
/// The index is a fixed linear heuristic on a 0–100 scale, not a
/// calibrated aero model: high cornering speeds and low speed variance
/// read as high downforce.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownforceEstimate {
  pub driver:                  String,
  pub lap:                     u32,
  pub downforce_index:         f64,
  pub high_speed_avg:          f64,
  pub low_speed_avg:           f64,
  pub speed_variance:          f64,
  pub aerodynamic_efficiency:  f64,
}

impl DownforceEstimate {
  pub fn new(driver: String, lap: u32, telemetry: &LapTelemetry) -> Self {
    let speed = telemetry.speed();

    // the subsets are inclusive of the percentile values so a
    // constant-speed lap keeps the whole series rather than none of it
    let p_high = stats::percentile(speed, HIGH_SPEED_PERCENTILE);
    let p_low = stats::percentile(speed, LOW_SPEED_PERCENTILE);

    let high: Vec<f64> =
      speed.iter().cloned().filter(|s| *s >= p_high).collect();
    let low: Vec<f64> =
      speed.iter().cloned().filter(|s| *s <= p_low).collect();

    let high_speed_avg = if speed.is_empty() { 0.0 } else { stats::mean(&high) };
    let low_speed_avg = if speed.is_empty() { 0.0 } else { stats::mean(&low) };
    let speed_variance = stats::variance(speed);

    let downforce_index =
      stats::clamp_score(high_speed_avg / REFERENCE_TOP_SPEED * SPEED_WEIGHT
                         + (VARIANCE_BASE - speed_variance / VARIANCE_SCALE));

    Self { driver,
           lap,
           downforce_index,
           high_speed_avg,
           low_speed_avg,
           speed_variance,
           aerodynamic_efficiency: high_speed_avg / (speed_variance + 1.0) }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;


  fn lap(speed: Vec<f64>) -> LapTelemetry {
    LapTelemetry::new(Vec::new(),
                      speed,
                      Vec::new(),
                      Vec::new(),
                      Vec::new(),
                      Vec::new(),
                      Vec::new())
  }

  #[test]
  fn constant_speed_test() {
    let estimate =
      DownforceEstimate::new("VER".to_string(), 1, &lap(vec![200.0; 100]));

    assert_eq!(0.0, estimate.speed_variance);
    assert_eq!(200.0, estimate.high_speed_avg);
    assert_eq!(200.0, estimate.low_speed_avg);
    assert_eq!(200.0, estimate.aerodynamic_efficiency);
    // 200 / 350 * 70 + 30 = 70
    assert!((estimate.downforce_index - 70.0).abs() < 1e-9);
  }

  #[test]
  fn index_always_clamped_test() {
    // wildly varying speeds push the variance term far negative
    let speed: Vec<f64> =
      (0..200).map(|i| if i % 2 == 0 { 30.0 } else { 330.0 }).collect();
    let estimate = DownforceEstimate::new("VER".to_string(), 1, &lap(speed));

    assert!(estimate.downforce_index >= 0.0);
    assert!(estimate.downforce_index <= 100.0);
  }

  #[test]
  fn high_low_split_test() {
    let speed: Vec<f64> = (1..=100).map(|i| i as f64).collect();
    let estimate = DownforceEstimate::new("VER".to_string(), 1, &lap(speed));

    // top quartile of 1..=100 averages higher than the overall mean,
    // bottom quartile lower
    assert!(estimate.high_speed_avg > 75.0);
    assert!(estimate.low_speed_avg < 26.0);
    assert!(estimate.high_speed_avg > estimate.low_speed_avg);
  }

  #[test]
  fn empty_channel_test() {
    let estimate = DownforceEstimate::new("VER".to_string(), 1, &lap(vec![]));

    assert_eq!(0.0, estimate.high_speed_avg);
    assert_eq!(0.0, estimate.low_speed_avg);
    assert_eq!(0.0, estimate.speed_variance);
    assert_eq!(0.0, estimate.aerodynamic_efficiency);
    // index degrades to the bare variance base, still in range
    assert_eq!(VARIANCE_BASE, estimate.downforce_index);
  }
}
