// Copyright 2025 lapsight developers. All rights reserved.

use crate::telemetry::LapTelemetry;
use serde::Serialize;
use std::collections::BTreeMap;


/// Lowest gear bucket reported.
pub const GEAR_MIN: i64 = 1;
/// Highest gear bucket reported. Samples outside 1..=8 (neutral,
/// reverse, glitches) fall into no bucket, so the reported
/// percentages may sum below 100.
pub const GEAR_MAX: i64 = 8;


/// Percentage of lap samples spent in each gear, keyed `gear1` through
/// `gear8`.
pub fn gear_usage(telemetry: &LapTelemetry) -> BTreeMap<String, f64> {
  let gear = telemetry.gear();

  let mut usage = BTreeMap::new();
  for g in GEAR_MIN..=GEAR_MAX {
    let pct = if gear.is_empty() {
      0.0
    } else {
      gear.iter().filter(|sample| **sample == g as f64).count() as f64
      / gear.len() as f64
      * 100.0
    };
    usage.insert(format!("gear{}", g), pct);
  }
  usage
}


/// Gear usage document for one lap.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GearUsage {
  pub driver:     String,
  pub lap:        u32,
  pub gear_usage: BTreeMap<String, f64>,
}

impl GearUsage {
  pub fn new(driver: String, lap: u32, telemetry: &LapTelemetry) -> Self {
    Self { driver,
           lap,
           gear_usage: gear_usage(telemetry) }
  }
}
