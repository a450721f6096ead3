// Copyright 2025 lapsight developers. All rights reserved.

use crate::{session::SessionData, stats};
use serde::Serialize;


/// Minimum number of timed laps before a fuel-effect fit is attempted.
pub const MIN_LAPS_FOR_FUEL_FIT: usize = 5;


/// Pace aggregates of one driver over a session.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaceEntry {
  pub driver:      String,
  pub avg_pace:    f64,
  pub median_pace: f64,
  pub best_pace:   f64,
  pub total_laps:  usize,
}

/// Race-pace comparison document. Drivers without a single timed lap
/// are left out rather than reported with zeros.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RacePace {
  pub pace_comparison: Vec<PaceEntry>,
}

impl RacePace {
  pub fn new(session: &SessionData, drivers: &[String]) -> Self {
    let mut pace_comparison = Vec::new();

    for driver in drivers {
      let times: Vec<f64> = session.timed_laps(driver)
                                   .iter()
                                   .filter_map(|lap| lap.lap_time())
                                   .collect();
      if times.is_empty() {
        continue;
      }

      let best = times.iter().cloned().fold(f64::INFINITY, f64::min);
      pace_comparison.push(PaceEntry { driver:      driver.clone(),
                                       avg_pace:    stats::mean(&times),
                                       median_pace: stats::median(&times),
                                       best_pace:   best,
                                       total_laps:  times.len(), });
    }

    Self { pace_comparison }
  }
}


/// Fuel effect document for one driver.
///
/// The per-lap effect is the slope of a first-degree least-squares fit
/// of lap time over lap number; expected seconds gained per lap as
/// fuel burns off, typically negative. Below
/// [`MIN_LAPS_FOR_FUEL_FIT`] timed laps no fit is attempted and both
/// fields are zero.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelEffect {
  pub driver:              String,
  pub fuel_effect_per_lap: f64,
  pub total_fuel_effect:   f64,
}

impl FuelEffect {
  pub fn new(driver: &str, session: &SessionData) -> Self {
    let timed = session.timed_laps(driver);
    let lap_numbers: Vec<f64> =
      timed.iter().map(|lap| lap.lap_number() as f64).collect();
    let times: Vec<f64> =
      timed.iter().filter_map(|lap| lap.lap_time()).collect();

    if times.len() < MIN_LAPS_FOR_FUEL_FIT {
      return Self { driver:              driver.to_string(),
                    fuel_effect_per_lap: 0.0,
                    total_fuel_effect:   0.0, };
    }

    let slope = stats::linear_slope(&lap_numbers, &times);
    Self { driver:              driver.to_string(),
           fuel_effect_per_lap: slope,
           total_fuel_effect:   slope * times.len() as f64, }
  }
}
