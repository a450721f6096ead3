// Copyright 2025 lapsight developers. All rights reserved.

use crate::{stats, telemetry::LapTelemetry};
use serde::Serialize;


/// Brake input above which a sample counts as part of a brake zone.
pub const ZONE_THRESHOLD: f64 = 10.0;
/// Zones must span more than this many samples to be retained.
pub const MIN_ZONE_SAMPLES: usize = 5;
/// At most this many zones are reported, in scan order.
pub const MAX_ZONES: usize = 10;
/// Zone duration assumes a fixed sample rate. The provider does not
/// expose per-sample timestamps, so this is a documented limitation
/// rather than a measurement.
pub const ASSUMED_SAMPLE_RATE_HZ: f64 = 100.0;


/// A maximal contiguous run of samples with brake input above
/// [`ZONE_THRESHOLD`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrakeZone {
  pub start_distance:   f64,
  pub end_distance:     f64,
  pub peak_brake_force: f64,
  pub avg_brake_force:  f64,
  pub speed_loss:       f64,
  pub duration:         f64,
}

/// Brake zones of one lap, first [`MAX_ZONES`] in scan order. A zone
/// still open at the last sample is dropped; zones only close on the
/// falling edge.
pub fn detect_brake_zones(telemetry: &LapTelemetry) -> Vec<BrakeZone> {
  let (brake, speed) = (telemetry.brake(), telemetry.speed());
  let distance = telemetry.distance();
  let len = brake.len().min(speed.len()).min(distance.len());

  let mut zones = Vec::new();
  let mut zone_start: Option<usize> = None;

  for i in 0..len {
    match zone_start {
      None if brake[i] > ZONE_THRESHOLD => zone_start = Some(i),
      Some(start) if brake[i] <= ZONE_THRESHOLD => {
        zone_start = None;
        if i - start > MIN_ZONE_SAMPLES {
          let forces = &brake[start..i];
          let peak = forces.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
          zones.push(BrakeZone { start_distance:   distance[start],
                                 end_distance:     distance[i - 1],
                                 peak_brake_force: peak,
                                 avg_brake_force:  stats::mean(forces),
                                 speed_loss:       speed[start]
                                                   - speed[i - 1],
                                 duration:         forces.len() as f64
                                                   / ASSUMED_SAMPLE_RATE_HZ, });
        }
      }
      _ => {}
    }
  }

  zones.truncate(MAX_ZONES);
  zones
}


/// Brake analysis document for one lap: the zones plus whole-lap brake
/// usage aggregates.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrakeAnalysis {
  pub driver:                   String,
  pub lap:                      u32,
  pub brake_zones:              Vec<BrakeZone>,
  pub total_brake_time_percent: f64,
  pub avg_brake_force:          f64,
}

impl BrakeAnalysis {
  pub fn new(driver: String, lap: u32, telemetry: &LapTelemetry) -> Self {
    let brake = telemetry.brake();

    let total_brake_time_percent = if brake.is_empty() {
      0.0
    } else {
      brake.iter().filter(|b| **b > 0.0).count() as f64
      / brake.len() as f64
      * 100.0
    };

    let braking: Vec<f64> =
      brake.iter().cloned().filter(|b| *b > 0.0).collect();
    let avg_brake_force = stats::mean(&braking);

    Self { driver,
           lap,
           brake_zones: detect_brake_zones(telemetry),
           total_brake_time_percent,
           avg_brake_force }
  }
}
