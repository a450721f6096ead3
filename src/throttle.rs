// Copyright 2025 lapsight developers. All rights reserved.

use crate::telemetry::LapTelemetry;
use serde::Serialize;


/// Throttle input at or above this counts as full throttle.
pub const FULL_THROTTLE: f64 = 95.0;
/// Throttle input at or below this counts as coasting.
pub const COAST_THROTTLE: f64 = 20.0;
/// Crossing this level from below marks a throttle application point.
pub const APPLICATION_LEVEL: f64 = 50.0;
/// At most this many application points are reported, in scan order.
pub const MAX_APPLICATION_POINTS: usize = 15;


/// A spot where the driver went back on the throttle: an upward
/// crossing of [`APPLICATION_LEVEL`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottlePoint {
  pub distance:       f64,
  pub throttle_level: f64,
}

/// Throttle application points of one lap, capped at
/// [`MAX_APPLICATION_POINTS`]. The first and last sample are never
/// reported as crossings.
pub fn application_points(telemetry: &LapTelemetry) -> Vec<ThrottlePoint> {
  let (throttle, distance) = (telemetry.throttle(), telemetry.distance());
  let len = throttle.len().min(distance.len());

  let mut points = Vec::new();
  for i in 1..len.saturating_sub(1) {
    if throttle[i - 1] < APPLICATION_LEVEL && throttle[i] >= APPLICATION_LEVEL
    {
      points.push(ThrottlePoint { distance:       distance[i],
                                  throttle_level: throttle[i], });
      if points.len() == MAX_APPLICATION_POINTS {
        break;
      }
    }
  }
  points
}


/// Throttle trace document for one lap: the mutually exclusive
/// full / partial / coast coverage split plus application points.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleTrace {
  pub driver:                      String,
  pub lap:                         u32,
  pub full_throttle_pct:           f64,
  pub partial_throttle_pct:        f64,
  pub coast_pct:                   f64,
  pub throttle_application_points: Vec<ThrottlePoint>,
}

impl ThrottleTrace {
  pub fn new(driver: String, lap: u32, telemetry: &LapTelemetry) -> Self {
    let throttle = telemetry.throttle();

    let (mut full, mut partial, mut coast) = (0usize, 0usize, 0usize);
    for t in throttle {
      if *t >= FULL_THROTTLE {
        full += 1;
      } else if *t > COAST_THROTTLE {
        partial += 1;
      } else {
        coast += 1;
      }
    }

    let pct = |count: usize| {
      if throttle.is_empty() {
        0.0
      } else {
        count as f64 / throttle.len() as f64 * 100.0
      }
    };

    Self { driver,
           lap,
           full_throttle_pct: pct(full),
           partial_throttle_pct: pct(partial),
           coast_pct: pct(coast),
           throttle_application_points: application_points(telemetry) }
  }
}
