// Copyright 2025 lapsight developers. All rights reserved.

use crate::{stats, telemetry::LapTelemetry, throttle};
use serde::Serialize;


/// Fraction of the brake-energy proxy assumed recoverable.
pub const RECOVERY_FACTOR: f64 = 0.65;
/// Divisor scaling the raw brake × speed sum into the energy proxy.
pub const BRAKE_ENERGY_SCALE: f64 = 1000.0;
/// Full-throttle share above which ERS deployment reads as high.
pub const ERS_HIGH_THRESHOLD: f64 = 70.0;
/// Full-throttle share above which ERS deployment reads as medium.
pub const ERS_MEDIUM_THRESHOLD: f64 = 50.0;


#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErsDeployment {
  High,
  Medium,
  Low,
}

impl ErsDeployment {
  fn from_full_throttle_pct(pct: f64) -> Self {
    if pct > ERS_HIGH_THRESHOLD {
      Self::High
    } else if pct > ERS_MEDIUM_THRESHOLD {
      Self::Medium
    } else {
      Self::Low
    }
  }
}

/// Power-unit stress and energy document for one lap. All indices are
/// fixed linear heuristics on a 0–100 scale; the brake energy proxy is
/// `sum(brake × speed) / 1000` over co-indexed samples.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyEstimate {
  pub driver:                    String,
  pub lap:                       u32,
  pub full_throttle_pct:         f64,
  pub lift_and_coast_pct:        f64,
  pub estimated_brake_energy:    f64,
  pub estimated_energy_recovery: f64,
  pub efficiency_score:          f64,
  pub ers_deployment:            ErsDeployment,
  pub pu_stress:                 f64,
  pub fuel_efficiency:           f64,
}

impl EnergyEstimate {
  pub fn new(driver: String, lap: u32, telemetry: &LapTelemetry) -> Self {
    let throttle_channel = telemetry.throttle();

    let pct = |count: usize| {
      if throttle_channel.is_empty() {
        0.0
      } else {
        count as f64 / throttle_channel.len() as f64 * 100.0
      }
    };
    let full_throttle_pct =
      pct(throttle_channel.iter()
                          .filter(|t| **t >= throttle::FULL_THROTTLE)
                          .count());
    let lift_and_coast_pct =
      pct(throttle_channel.iter()
                          .filter(|t| **t <= throttle::COAST_THROTTLE)
                          .count());

    let estimated_brake_energy = telemetry.brake()
                                          .iter()
                                          .zip(telemetry.speed())
                                          .map(|(b, s)| b * s)
                                          .sum::<f64>()
                                 / BRAKE_ENERGY_SCALE;
    let estimated_energy_recovery = estimated_brake_energy * RECOVERY_FACTOR;

    let pu_stress = stats::clamp_score(full_throttle_pct * 0.8
                                       + (100.0 - lift_and_coast_pct) * 0.2);
    let efficiency_score =
      stats::clamp_score((100.0 - lift_and_coast_pct) * 0.6
                         + estimated_energy_recovery / 100.0 * 0.4);
    let fuel_efficiency = 0.8 + lift_and_coast_pct / 100.0 * 0.3;

    Self { driver,
           lap,
           full_throttle_pct,
           lift_and_coast_pct,
           estimated_brake_energy,
           estimated_energy_recovery,
           efficiency_score,
           ers_deployment:
             ErsDeployment::from_full_throttle_pct(full_throttle_pct),
           pu_stress,
           fuel_efficiency }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;


  fn lap(throttle: Vec<f64>, brake: Vec<f64>, speed: Vec<f64>)
         -> LapTelemetry {
    LapTelemetry::new(Vec::new(),
                      speed,
                      throttle,
                      brake,
                      Vec::new(),
                      Vec::new(),
                      Vec::new())
  }

  #[test]
  fn estimate_test() {
    // 8 of 10 samples full throttle, 2 coasting
    let throttle = vec![100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0,
                        100.0, 0.0, 0.0];
    let brake = vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 100.0, 100.0];
    let speed = vec![250.0, 250.0, 250.0, 250.0, 250.0, 250.0, 250.0, 250.0,
                     200.0, 100.0];

    let estimate = EnergyEstimate::new("VER".to_string(), 1,
                                       &lap(throttle, brake, speed));

    assert_eq!(80.0, estimate.full_throttle_pct);
    assert_eq!(20.0, estimate.lift_and_coast_pct);
    // (100 * 200 + 100 * 100) / 1000 = 30
    assert_eq!(30.0, estimate.estimated_brake_energy);
    assert_eq!(19.5, estimate.estimated_energy_recovery);
    assert_eq!(ErsDeployment::High, estimate.ers_deployment);
    // 0.8 * 80 + 0.2 * 80 = 80
    assert_eq!(80.0, estimate.pu_stress);
    // 0.6 * 80 + 0.4 * 0.195 = 48.078
    assert!((estimate.efficiency_score - 48.078).abs() < 1e-9);
    assert!((estimate.fuel_efficiency - 0.86).abs() < 1e-9);
  }

  #[test]
  fn ers_deployment_buckets_test() {
    assert_eq!(ErsDeployment::High,
               ErsDeployment::from_full_throttle_pct(70.1));
    assert_eq!(ErsDeployment::Medium,
               ErsDeployment::from_full_throttle_pct(70.0));
    assert_eq!(ErsDeployment::Medium,
               ErsDeployment::from_full_throttle_pct(50.1));
    assert_eq!(ErsDeployment::Low,
               ErsDeployment::from_full_throttle_pct(50.0));
  }

  #[test]
  fn scores_clamped_test() {
    // everything full throttle, no coasting: stress capped at 100
    let estimate = EnergyEstimate::new("VER".to_string(),
                                       1,
                                       &lap(vec![100.0; 50],
                                            vec![100.0; 50],
                                            vec![350.0; 50]));

    assert_eq!(100.0, estimate.pu_stress);
    assert!(estimate.efficiency_score <= 100.0);
    assert!(estimate.efficiency_score >= 0.0);
  }

  #[test]
  fn empty_channels_test() {
    let estimate =
      EnergyEstimate::new("VER".to_string(), 1, &LapTelemetry::default());

    assert_eq!(0.0, estimate.full_throttle_pct);
    assert_eq!(0.0, estimate.lift_and_coast_pct);
    assert_eq!(0.0, estimate.estimated_brake_energy);
    assert_eq!(ErsDeployment::Low, estimate.ers_deployment);
    // no coasting recorded still reads as a full-commitment lap
    assert_eq!(20.0, estimate.pu_stress);
    assert_eq!(60.0, estimate.efficiency_score);
  }
}
