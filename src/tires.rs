// Copyright 2025 lapsight developers. All rights reserved.

use crate::{session::{LapRecord, SessionData},
            stats,
            telemetry::LapTelemetry};
use serde::Serialize;


/// Tire ages below this count as optimal.
pub const OPTIMAL_AGE: u32 = 10;
/// Tire ages below this (and at or above [`OPTIMAL_AGE`]) count as
/// degraded; anything older is critical.
pub const DEGRADED_AGE: u32 = 20;
/// Assumed usable tire life in laps.
pub const REFERENCE_LIFE: u32 = 30;
/// Temperature impact per lap of age, percent.
pub const TEMP_IMPACT_PER_LAP: f64 = 2.5;


/// Tire condition bucket from age alone. Fixed linear heuristics, not
/// a calibrated wear model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TirePerformance {
  Optimal,
  Degraded,
  Critical,
}

impl TirePerformance {
  fn from_age(age: u32) -> Self {
    if age < OPTIMAL_AGE {
      Self::Optimal
    } else if age < DEGRADED_AGE {
      Self::Degraded
    } else {
      Self::Critical
    }
  }
}

/// Tire analysis document for one lap.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TireAnalysis {
  pub driver:                   String,
  pub lap:                      u32,
  pub compound:                 String,
  pub tire_age:                 u32,
  pub avg_speed:                f64,
  pub degradation_rate:         f64,
  pub estimated_life_remaining: u32,
  pub performance:              TirePerformance,
  pub temp_impact:              f64,
  pub wear_level:               f64,
}

impl TireAnalysis {
  pub fn new(record: &LapRecord,
             session: &SessionData,
             telemetry: &LapTelemetry)
             -> Self {
    let tire_age = record.tire_age().unwrap_or(0);

    // degradation across the driver's timed laps on the same compound
    let same_compound_times: Vec<f64> =
      session.driver_laps(record.driver())
             .iter()
             .filter(|lap| lap.compound() == record.compound())
             .filter_map(|lap| lap.lap_time())
             .collect();
    let degradation_rate = if same_compound_times.len() > 1 {
      (same_compound_times[same_compound_times.len() - 1]
       - same_compound_times[0])
      / same_compound_times.len() as f64
    } else {
      0.0
    };

    Self { driver: record.driver().clone(),
           lap: record.lap_number(),
           compound: record.compound_name(),
           tire_age,
           avg_speed: stats::mean(telemetry.speed()),
           degradation_rate,
           estimated_life_remaining: REFERENCE_LIFE.saturating_sub(tire_age),
           performance: TirePerformance::from_age(tire_age),
           temp_impact: (tire_age as f64 * TEMP_IMPACT_PER_LAP).min(100.0),
           wear_level: (tire_age as f64 / REFERENCE_LIFE as f64 * 100.0)
                         .min(100.0) }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;


  fn lap(number: u32, time: f64, compound: &str, age: u32) -> LapRecord {
    LapRecord::new("VER".to_string(),
                   number,
                   Some(time),
                   None,
                   None,
                   None,
                   Some(compound.to_string()),
                   Some(age),
                   false)
  }

  fn telemetry(speed: Vec<f64>) -> LapTelemetry {
    LapTelemetry::new(Vec::new(),
                      speed,
                      Vec::new(),
                      Vec::new(),
                      Vec::new(),
                      Vec::new(),
                      Vec::new())
  }

  #[test]
  fn analysis_test() {
    let laps = vec![lap(1, 90.0, "SOFT", 1),
                    lap(2, 90.2, "SOFT", 2),
                    lap(3, 90.9, "SOFT", 3),
                    lap(4, 95.0, "MEDIUM", 1)];
    let session = SessionData::new(2024,
                                   "Spa".to_string(),
                                   "R".to_string(),
                                   laps.clone());

    let analysis =
      TireAnalysis::new(&laps[2], &session, &telemetry(vec![180.0, 220.0]));

    assert_eq!("SOFT", analysis.compound);
    assert_eq!(3, analysis.tire_age);
    assert_eq!(200.0, analysis.avg_speed);
    // (90.9 - 90.0) / 3 over the three SOFT laps
    assert!((analysis.degradation_rate - 0.3).abs() < 1e-9);
    assert_eq!(27, analysis.estimated_life_remaining);
    assert_eq!(TirePerformance::Optimal, analysis.performance);
    assert_eq!(7.5, analysis.temp_impact);
    assert_eq!(10.0, analysis.wear_level);
  }

  #[test]
  fn performance_buckets_test() {
    assert_eq!(TirePerformance::Optimal, TirePerformance::from_age(9));
    assert_eq!(TirePerformance::Degraded, TirePerformance::from_age(10));
    assert_eq!(TirePerformance::Degraded, TirePerformance::from_age(19));
    assert_eq!(TirePerformance::Critical, TirePerformance::from_age(20));
  }

  #[test]
  fn worn_out_tire_test() {
    let laps = vec![lap(41, 96.0, "HARD", 41)];
    let session = SessionData::new(2024,
                                   "Spa".to_string(),
                                   "R".to_string(),
                                   laps.clone());

    let analysis =
      TireAnalysis::new(&laps[0], &session, &telemetry(Vec::new()));

    assert_eq!(0, analysis.estimated_life_remaining);
    assert_eq!(100.0, analysis.temp_impact);
    assert_eq!(100.0, analysis.wear_level);
    assert_eq!(TirePerformance::Critical, analysis.performance);
    assert_eq!(0.0, analysis.avg_speed);
    // single same-compound lap: no trend
    assert_eq!(0.0, analysis.degradation_rate);
  }

  #[test]
  fn missing_age_defaults_test() {
    let record = LapRecord::new("VER".to_string(),
                                1,
                                Some(90.0),
                                None,
                                None,
                                None,
                                None,
                                None,
                                false);
    let session = SessionData::new(2024,
                                   "Spa".to_string(),
                                   "R".to_string(),
                                   vec![record.clone()]);

    let analysis =
      TireAnalysis::new(&record, &session, &telemetry(Vec::new()));

    assert_eq!(0, analysis.tire_age);
    assert_eq!("UNKNOWN", analysis.compound);
    assert_eq!(TirePerformance::Optimal, analysis.performance);
    assert_eq!(REFERENCE_LIFE, analysis.estimated_life_remaining);
  }
}
