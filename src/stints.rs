// Copyright 2025 lapsight developers. All rights reserved.

use crate::{session::{LapRecord, SessionData},
            stats};
use getset::{CopyGetters, Getters};
use serde::Serialize;


/// Stints shorter than this report a degradation rate of zero; two
/// laps are not a trend.
pub const MIN_STINT_FOR_TREND: usize = 3;


/// One lap of a stint: lap number and lap time in seconds.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StintLap {
  pub lap_number: u32,
  pub time:       f64,
}

/// A maximal run of consecutive laps on one compound.
///
/// The degradation rate is a linear-trend proxy, `(last lap time −
/// first lap time) / lap count`, not a regression fit — a documented
/// simplification.
#[derive(Clone, Debug, PartialEq, CopyGetters, Getters, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stint {
  #[getset(get = "pub")]
  compound:     String,
  #[getset(get = "pub")]
  laps:         Vec<StintLap>,
  #[getset(get_copy = "pub")]
  avg_lap_time: f64,
  #[getset(get_copy = "pub")]
  degradation:  f64,
}

impl Stint {
  fn new(compound: String, laps: Vec<StintLap>) -> Self {
    let times: Vec<f64> = laps.iter().map(|lap| lap.time).collect();
    Self { compound,
           avg_lap_time: stats::mean(&times),
           degradation: degradation_rate(&times),
           laps }
  }

  pub fn len(&self) -> usize {
    self.laps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.laps.is_empty()
  }
}

/// Linear-trend proxy over a stint's lap times.
pub fn degradation_rate(times: &[f64]) -> f64 {
  if times.len() < MIN_STINT_FOR_TREND {
    return 0.0;
  }
  (times[times.len() - 1] - times[0]) / times.len() as f64
}

/// Partitions a driver's lap records into stints. A new stint starts
/// whenever the compound differs from the previous retained lap's
/// compound; laps missing compound or lap time are skipped and not
/// counted.
pub fn partition_stints(laps: &[&LapRecord]) -> Vec<Stint> {
  let mut stints = Vec::new();
  let mut current: Option<(String, Vec<StintLap>)> = None;

  for lap in laps {
    let (compound, time) = match (lap.compound(), lap.lap_time()) {
      (Some(compound), Some(time)) => (compound.to_uppercase(), time),
      _ => continue,
    };

    let same_compound =
      matches!(&current, Some((c, _)) if *c == compound);
    let stint_lap = StintLap { lap_number: lap.lap_number(),
                               time };

    if same_compound {
      if let Some((_, stint_laps)) = current.as_mut() {
        stint_laps.push(stint_lap);
      }
    } else {
      if let Some((c, stint_laps)) = current.take() {
        stints.push(Stint::new(c, stint_laps));
      }
      current = Some((compound, vec![stint_lap]));
    }
  }

  if let Some((c, stint_laps)) = current.take() {
    stints.push(Stint::new(c, stint_laps));
  }
  stints
}


/// Tire degradation document for one driver.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TireDegradation {
  pub driver: String,
  pub stints: Vec<Stint>,
}

impl TireDegradation {
  pub fn new(driver: &str, session: &SessionData) -> Self {
    Self { driver: driver.to_string(),
           stints: partition_stints(&session.driver_laps(driver)), }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;


  fn lap(number: u32, time: Option<f64>, compound: Option<&str>)
         -> LapRecord {
    LapRecord::new("VER".to_string(),
                   number,
                   time,
                   None,
                   None,
                   None,
                   compound.map(str::to_string),
                   Some(number),
                   false)
  }

  #[test]
  fn two_stint_partition_test() {
    // [SOFT]×5 then [MEDIUM]×5, lap times increasing
    let laps: Vec<LapRecord> =
      (1..=10).map(|n| {
                let compound = if n <= 5 { "SOFT" } else { "MEDIUM" };
                lap(n, Some(90.0 + n as f64 * 0.1), Some(compound))
              })
              .collect();
    let refs: Vec<&LapRecord> = laps.iter().collect();

    let stints = partition_stints(&refs);

    assert_eq!(2, stints.len());
    assert_eq!("SOFT", stints[0].compound());
    assert_eq!("MEDIUM", stints[1].compound());
    assert_eq!(5, stints[0].len());
    assert_eq!(5, stints[1].len());

    // concatenated stints reproduce the original lap sequence
    let lap_numbers: Vec<u32> = stints.iter()
                                      .flat_map(|s| s.laps())
                                      .map(|l| l.lap_number)
                                      .collect();
    assert_eq!((1..=10).collect::<Vec<u32>>(), lap_numbers);

    // degradation from first/last time of each stint
    assert!((stints[0].degradation() - (90.5 - 90.1) / 5.0).abs() < 1e-9);
    assert!((stints[1].degradation() - (91.0 - 90.6) / 5.0).abs() < 1e-9);
    assert!((stints[0].avg_lap_time() - 90.3).abs() < 1e-9);
  }

  #[test]
  fn short_stint_zero_degradation_test() {
    let laps = vec![lap(1, Some(92.0), Some("SOFT")),
                    lap(2, Some(95.0), Some("SOFT"))];
    let refs: Vec<&LapRecord> = laps.iter().collect();

    let stints = partition_stints(&refs);
    assert_eq!(1, stints.len());
    assert_eq!(0.0, stints[0].degradation());
  }

  #[test]
  fn invalid_laps_skipped_test() {
    let laps = vec![lap(1, Some(92.0), Some("SOFT")),
                    lap(2, None, Some("SOFT")), // no time: skipped
                    lap(3, Some(92.4), None), // no compound: skipped
                    lap(4, Some(92.2), Some("SOFT")),
                    lap(5, Some(92.6), Some("SOFT"))];
    let refs: Vec<&LapRecord> = laps.iter().collect();

    let stints = partition_stints(&refs);
    assert_eq!(1, stints.len());
    assert_eq!(3, stints[0].len());
    assert_eq!(vec![1, 4, 5],
               stints[0].laps()
                        .iter()
                        .map(|l| l.lap_number)
                        .collect::<Vec<u32>>());
  }

  #[test]
  fn compound_case_insensitive_test() {
    let laps = vec![lap(1, Some(92.0), Some("soft")),
                    lap(2, Some(92.1), Some("SOFT"))];
    let refs: Vec<&LapRecord> = laps.iter().collect();

    assert_eq!(1, partition_stints(&refs).len());
  }

  #[test]
  fn no_valid_laps_test() {
    let laps = vec![lap(1, None, None)];
    let refs: Vec<&LapRecord> = laps.iter().collect();
    assert_eq!(Vec::<Stint>::new(), partition_stints(&refs));
  }

  #[test]
  fn degradation_rate_test() {
    assert_eq!(0.0, degradation_rate(&[]));
    assert_eq!(0.0, degradation_rate(&[90.0, 91.0]));
    assert!((degradation_rate(&[90.0, 90.5, 91.2]) - 0.4).abs() < 1e-9);
  }
}
