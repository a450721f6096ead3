// Copyright 2025 lapsight developers. All rights reserved.

use crate::{session::LapRecord, stats};
use getset::Getters;
use serde::{Deserialize, Serialize};


/// Holds the sample series set of one lap: co-indexed channel arrays as
/// delivered by the telemetry provider.
///
/// All channels of a lap are co-indexed, i.e. index `i` refers to the
/// same instant in every array. A channel the provider did not record
/// is an empty vector; analyzers degrade to defaults on empty channels
/// instead of erroring out.
#[derive(Clone,
         Debug,
         Default,
         PartialEq,
         Getters,
         Serialize,
         Deserialize)]
#[getset(get = "pub")]
#[serde(default)]
pub struct LapTelemetry {
  distance: Vec<f64>,
  speed:    Vec<f64>,
  throttle: Vec<f64>,
  brake:    Vec<f64>,
  gear:     Vec<f64>,
  rpm:      Vec<f64>,
  drs:      Vec<f64>,
}

impl LapTelemetry {
  #[allow(clippy::too_many_arguments)]
  pub fn new(distance: Vec<f64>,
             speed: Vec<f64>,
             throttle: Vec<f64>,
             brake: Vec<f64>,
             gear: Vec<f64>,
             rpm: Vec<f64>,
             drs: Vec<f64>)
             -> Self {
    Self { distance,
           speed,
           throttle,
           brake,
           gear,
           rpm,
           drs }
  }

  pub fn is_empty(&self) -> bool {
    self.speed.is_empty()
  }

  /// Whole-lap aggregates over the raw channels. Empty channels
  /// contribute their zero defaults.
  pub fn metrics(&self, record: Option<&LapRecord>) -> LapMetrics {
    let max_speed = self.speed
                        .iter()
                        .cloned()
                        .fold(f64::NEG_INFINITY, f64::max);

    LapMetrics { max_speed:    if self.speed.is_empty() {
                   0.0
                 } else {
                   max_speed
                 },
                 avg_speed:    stats::mean(&self.speed),
                 avg_throttle: stats::mean(&self.throttle),
                 avg_brake:    stats::mean(&self.brake),
                 drs_usage:    stats::mean(&self.drs) * 100.0,
                 lap_time:     record.and_then(|r| r.lap_time())
                                     .unwrap_or(0.0),
                 sector1:      record.and_then(|r| r.sector1())
                                     .unwrap_or(0.0),
                 sector2:      record.and_then(|r| r.sector2())
                                     .unwrap_or(0.0),
                 sector3:      record.and_then(|r| r.sector3())
                                     .unwrap_or(0.0), }
  }
}


/// Whole-lap metrics as shown next to a telemetry trace. Times are
/// seconds; missing scalar fields report as `0` here (the lap list in
/// the session document is where absence is reported as `null`).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LapMetrics {
  pub max_speed:    f64,
  pub avg_speed:    f64,
  pub avg_throttle: f64,
  pub avg_brake:    f64,
  pub drs_usage:    f64,
  pub lap_time:     f64,
  pub sector1:      f64,
  pub sector2:      f64,
  pub sector3:      f64,
}


/// Channel arrays in output form: gear and DRS as integers, plus the
/// tire compound the lap was driven on.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TelemetryTrace {
  pub distance: Vec<f64>,
  pub speed:    Vec<f64>,
  pub throttle: Vec<f64>,
  pub brake:    Vec<f64>,
  pub gear:     Vec<i64>,
  pub rpm:      Vec<f64>,
  pub drs:      Vec<i64>,
  pub compound: String,
}

impl TelemetryTrace {
  pub fn new(telemetry: &LapTelemetry, compound: String) -> Self {
    Self { distance: telemetry.distance().clone(),
           speed: telemetry.speed().clone(),
           throttle: telemetry.throttle().clone(),
           brake: telemetry.brake().clone(),
           gear: telemetry.gear().iter().map(|g| *g as i64).collect(),
           rpm: telemetry.rpm().clone(),
           drs: telemetry.drs().iter().map(|d| *d as i64).collect(),
           compound }
  }
}


/// One driver's side of a telemetry comparison.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DriverLap {
  pub driver:    String,
  pub lap:       u32,
  pub telemetry: TelemetryTrace,
  pub metrics:   LapMetrics,
}

/// Telemetry comparison document for one or two drivers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TelemetryComparison {
  pub driver1: DriverLap,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub driver2: Option<DriverLap>,
}
