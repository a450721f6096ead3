// Copyright 2025 lapsight developers. All rights reserved.

use crate::{provider::TelemetryProvider, stats};
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};
use tracing::debug;


/// Index of the course position where trap speed is sampled, as a
/// fraction of total lap distance.
pub const SPEED_TRAP_POSITION: f64 = 0.7;
/// Number of drivers probed for the top-speed / speed-trap statistics.
/// Telemetry loads are expensive, so the summary only looks at the
/// first few drivers.
pub const SUMMARY_PROBE_DRIVERS: usize = 3;


/// Scalar fields of one timed lap. Immutable once fetched; the sample
/// series set of the lap is obtained separately through the provider.
#[derive(Clone,
         Debug,
         PartialEq,
         CopyGetters,
         Getters,
         Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LapRecord {
  #[getset(get = "pub")]
  driver:           String,
  #[getset(get_copy = "pub")]
  lap_number:       u32,
  #[getset(get_copy = "pub")]
  lap_time:         Option<f64>,
  #[getset(get_copy = "pub")]
  sector1:          Option<f64>,
  #[getset(get_copy = "pub")]
  sector2:          Option<f64>,
  #[getset(get_copy = "pub")]
  sector3:          Option<f64>,
  #[getset(get = "pub")]
  compound:         Option<String>,
  #[getset(get_copy = "pub")]
  tire_age:         Option<u32>,
  #[getset(get_copy = "pub")]
  is_personal_best: bool,
}

impl Default for LapRecord {
  fn default() -> Self {
    Self { driver:           String::new(),
           lap_number:       0,
           lap_time:         None,
           sector1:          None,
           sector2:          None,
           sector3:          None,
           compound:         None,
           tire_age:         None,
           is_personal_best: false, }
  }
}

impl LapRecord {
  #[allow(clippy::too_many_arguments)]
  pub fn new(driver: String,
             lap_number: u32,
             lap_time: Option<f64>,
             sector1: Option<f64>,
             sector2: Option<f64>,
             sector3: Option<f64>,
             compound: Option<String>,
             tire_age: Option<u32>,
             is_personal_best: bool)
             -> Self {
    Self { driver,
           lap_number,
           lap_time,
           sector1,
           sector2,
           sector3,
           compound,
           tire_age,
           is_personal_best }
  }

  /// A lap counts as timed when it carries a positive lap time.
  pub fn is_timed(&self) -> bool {
    self.lap_time.map(|t| t > 0.0).unwrap_or(false)
  }

  /// Compound in output form: upper-cased, `UNKNOWN` when the provider
  /// did not record one.
  pub fn compound_name(&self) -> String {
    self.compound
        .as_deref()
        .map(str::to_uppercase)
        .unwrap_or_else(|| "UNKNOWN".to_string())
  }
}


/// All lap records of one session, in provider order.
#[derive(Clone, Debug, PartialEq, CopyGetters, Getters)]
pub struct SessionData {
  #[getset(get_copy = "pub")]
  year:         i32,
  #[getset(get = "pub")]
  event:        String,
  #[getset(get = "pub")]
  session_type: String,
  #[getset(get = "pub")]
  drivers:      Vec<String>,
  #[getset(get = "pub")]
  laps:         Vec<LapRecord>,
}

impl SessionData {
  pub fn new(year: i32,
             event: String,
             session_type: String,
             laps: Vec<LapRecord>)
             -> Self {
    // driver list in order of first appearance
    let mut drivers: Vec<String> = Vec::new();
    for lap in &laps {
      if !drivers.contains(lap.driver()) {
        drivers.push(lap.driver().clone());
      }
    }

    Self { year,
           event,
           session_type,
           drivers,
           laps }
  }

  /// Copy of this session restricted to the given drivers. An empty
  /// selection keeps everything.
  pub fn filtered(&self, selected: &[String]) -> Self {
    if selected.is_empty() {
      return self.clone();
    }
    let laps = self.laps
                   .iter()
                   .filter(|lap| selected.contains(lap.driver()))
                   .cloned()
                   .collect();
    Self::new(self.year, self.event.clone(), self.session_type.clone(), laps)
  }

  pub fn driver_laps(&self, driver: &str) -> Vec<&LapRecord> {
    self.laps.iter().filter(|lap| lap.driver() == driver).collect()
  }

  pub fn lap(&self, driver: &str, lap_number: u32) -> Option<&LapRecord> {
    self.laps
        .iter()
        .find(|lap| lap.driver() == driver && lap.lap_number() == lap_number)
  }

  /// Laps of one driver that carry a lap time, in session order.
  pub fn timed_laps(&self, driver: &str) -> Vec<&LapRecord> {
    self.laps
        .iter()
        .filter(|lap| lap.driver() == driver && lap.lap_time().is_some())
        .collect()
  }
}


// SESSION DOCUMENT -------------------------------------------------------- //

/// One row of the lap list in the session document. Missing sector
/// times serialize as `null`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LapRow {
  pub driver:           String,
  pub lap_number:       u32,
  pub lap_time:         f64,
  pub sector1:          Option<f64>,
  pub sector2:          Option<f64>,
  pub sector3:          Option<f64>,
  pub compound:         String,
  pub is_personal_best: bool,
}

impl LapRow {
  fn from_record(record: &LapRecord) -> Self {
    Self { driver:           record.driver().clone(),
           lap_number:       record.lap_number(),
           lap_time:         record.lap_time().unwrap_or(0.0),
           sector1:          record.sector1(),
           sector2:          record.sector2(),
           sector3:          record.sector3(),
           compound:         record.compound_name(),
           is_personal_best: record.is_personal_best(), }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FastestLap {
  pub time:   f64,
  pub driver: String,
}

/// A speed observation attributed to a driver (top speed, trap speed).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpeedMark {
  pub value:  f64,
  pub driver: String,
}

impl Default for SpeedMark {
  fn default() -> Self {
    Self { value:  0.0,
           driver: "N/A".to_string(), }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatistics {
  pub fastest_lap:  FastestLap,
  pub top_speed:    SpeedMark,
  pub speed_trap:   SpeedMark,
  pub total_laps:   u32,
  pub avg_lap_time: f64,
}

impl SessionStatistics {
  /// Computes session statistics, probing telemetry of the fastest lap
  /// of at most [`SUMMARY_PROBE_DRIVERS`] drivers for top speed and
  /// trap speed. Per-driver telemetry failures are skipped.
  pub fn compute(session: &SessionData,
                 provider: &dyn TelemetryProvider)
                 -> Self {
    let timed: Vec<&LapRecord> =
      session.laps().iter().filter(|lap| lap.lap_time().is_some()).collect();

    let fastest_lap =
      timed.iter()
           .min_by(|a, b| {
             a.lap_time().partial_cmp(&b.lap_time()).unwrap()
           })
           .map(|lap| FastestLap { time:   lap.lap_time().unwrap_or(0.0),
                                   driver: lap.driver().clone(), })
           .unwrap_or(FastestLap { time:   0.0,
                                   driver: "N/A".to_string(), });

    let times: Vec<f64> = timed.iter().filter_map(|lap| lap.lap_time())
                               .collect();
    let avg_lap_time = stats::mean(&times);

    let total_laps = session.laps()
                            .iter()
                            .map(|lap| lap.lap_number())
                            .max()
                            .unwrap_or(0);

    let mut top_speed = SpeedMark::default();
    let mut speed_trap = SpeedMark::default();

    for driver in session.drivers().iter().take(SUMMARY_PROBE_DRIVERS) {
      let driver_laps = session.timed_laps(driver);
      let fastest = driver_laps.iter().min_by(|a, b| {
                                 a.lap_time()
                                  .partial_cmp(&b.lap_time())
                                  .unwrap()
                               });
      let fastest = match fastest {
        Some(lap) => *lap,
        None => continue,
      };

      let telemetry = match provider.lap_telemetry(session.year(),
                                                   session.event(),
                                                   session.session_type(),
                                                   driver,
                                                   fastest.lap_number())
      {
        Ok(telemetry) => telemetry,
        Err(err) => {
          debug!(%driver, %err, "skipping summary telemetry probe");
          continue;
        }
      };

      let speed = telemetry.speed();
      if speed.is_empty() {
        continue;
      }

      let max_speed = speed.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
      if max_speed > top_speed.value {
        top_speed = SpeedMark { value:  max_speed,
                                driver: driver.clone(), };
      }

      let distance = telemetry.distance();
      if distance.is_empty() {
        continue;
      }
      let total_distance =
        distance.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
      let trap_distance = total_distance * SPEED_TRAP_POSITION;
      let trap_idx =
        distance.iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                  (*a - trap_distance).abs()
                                      .partial_cmp(&(*b - trap_distance).abs())
                                      .unwrap()
                })
                .map(|(i, _)| i)
                .unwrap_or(0);
      if trap_idx < speed.len() && speed[trap_idx] > speed_trap.value {
        speed_trap = SpeedMark { value:  speed[trap_idx],
                                 driver: driver.clone(), };
      }
    }

    Self { fastest_lap,
           top_speed,
           speed_trap,
           total_laps,
           avg_lap_time }
  }
}

/// The complete session document emitted by the `session` command.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionDocument {
  pub year:       i32,
  pub gp:         String,
  pub session:    String,
  pub drivers:    Vec<String>,
  pub laps:       Vec<LapRow>,
  pub statistics: SessionStatistics,
}

impl SessionDocument {
  pub fn build(session: &SessionData,
               provider: &dyn TelemetryProvider)
               -> Self {
    let laps = session.laps()
                      .iter()
                      .filter(|lap| lap.is_timed())
                      .map(LapRow::from_record)
                      .collect();

    Self { year:       session.year(),
           gp:         session.event().clone(),
           session:    session.session_type().clone(),
           drivers:    session.drivers().clone(),
           laps,
           statistics: SessionStatistics::compute(session, provider), }
  }
}
