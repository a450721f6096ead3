// Copyright 2025 lapsight developers. All rights reserved.

use crate::{stats, telemetry::LapTelemetry};
use serde::Serialize;


// All thresholds are empirically tuned, not physically derived. Speeds
// are km/h, distances are meters, windows are sample counts.

/// First sample index considered by the scan.
pub const SCAN_START: usize = 30;
/// The scan stops this many samples before the end of the lap.
pub const SCAN_TAIL: usize = 40;
/// Samples averaged to establish the approach speed.
pub const APPROACH_WINDOW: usize = 10;
/// Minimum drop from approach speed to current speed to call a corner
/// candidate.
pub const MIN_SPEED_DROP: f64 = 40.0;
/// Minimum distance past the previous apex before a new corner may
/// start.
pub const MIN_CORNER_SPACING: f64 = 150.0;
/// Lookback window for the brake point.
pub const BRAKE_LOOKBACK: usize = 35;
/// Brake input counting as significant brake application.
pub const BRAKE_POINT_FORCE: f64 = 25.0;
/// Lookahead window for the apex.
pub const APEX_WINDOW: usize = 40;
/// Lookahead window for the corner exit, starting at the apex.
pub const EXIT_WINDOW: usize = 40;
/// Throttle input marking the corner exit.
pub const EXIT_THROTTLE: f64 = 60.0;
/// Speed gained over apex speed marking the corner exit.
pub const EXIT_SPEED_GAIN: f64 = 15.0;
/// Minimum brake-point-to-apex speed delta for an accepted corner.
pub const MIN_SPEED_DELTA: f64 = 25.0;
/// Samples skipped past the exit of an accepted corner to suppress
/// duplicate detections.
pub const POST_EXIT_SKIP: usize = 20;
/// Step width for rejected candidates and non-candidates.
pub const REJECT_STEP: usize = 5;
/// Below this index the scan advances one sample at a time.
pub const WARMUP_END: usize = 20;
/// Apex speeds below this classify as a slow corner.
pub const SLOW_APEX_SPEED: f64 = 100.0;
/// Apex speeds below this (and at or above [`SLOW_APEX_SPEED`])
/// classify as a medium corner.
pub const MEDIUM_APEX_SPEED: f64 = 180.0;


#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CornerClass {
  Slow,
  Medium,
  Fast,
}

impl CornerClass {
  fn from_apex_speed(speed: f64) -> Self {
    if speed < SLOW_APEX_SPEED {
      Self::Slow
    } else if speed < MEDIUM_APEX_SPEED {
      Self::Medium
    } else {
      Self::Fast
    }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrakePoint {
  pub distance:    f64,
  pub speed:       f64,
  pub brake_force: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Apex {
  pub distance:  f64,
  pub min_speed: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerExit {
  pub distance: f64,
  pub speed:    f64,
  pub throttle: f64,
}

/// One detected corner: brake point, apex and exit, numbered
/// sequentially from 1 within the lap.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerEvent {
  pub corner_number: usize,
  pub brake_point:   BrakePoint,
  pub apex:          Apex,
  pub exit:          CornerExit,
  pub speed_delta:   f64,
  #[serde(rename = "type")]
  pub class:         CornerClass,
}


/// Greedy single-pass corner scan over one lap's sample buffer.
///
/// The scan is a lazy, finite, restartable sequence: each `next` call
/// advances the cursor until the next accepted corner or the end of
/// the scan window. Accepted corners advance the cursor past their
/// exit; later corners never revise earlier ones.
pub struct CornerScan<'a> {
  distance:           &'a [f64],
  speed:              &'a [f64],
  brake:              &'a [f64],
  throttle:           &'a [f64],
  len:                usize,
  cursor:             usize,
  last_apex_distance: f64,
  accepted:           usize,
}

impl<'a> CornerScan<'a> {
  pub fn new(telemetry: &'a LapTelemetry) -> Self {
    let (distance, speed) = (telemetry.distance(), telemetry.speed());
    let (brake, throttle) = (telemetry.brake(), telemetry.throttle());

    // a lap missing any required channel yields no corners
    let len = if distance.is_empty()
                 || speed.is_empty()
                 || brake.is_empty()
                 || throttle.is_empty()
    {
      0
    } else {
      distance.len()
              .min(speed.len())
              .min(brake.len())
              .min(throttle.len())
    };

    Self { distance,
           speed,
           brake,
           throttle,
           len,
           cursor: SCAN_START,
           last_apex_distance: -MIN_CORNER_SPACING,
           accepted: 0 }
  }

  fn candidate_at(&self, i: usize) -> bool {
    let approach = stats::mean(&self.speed[i - APPROACH_WINDOW..i]);
    approach - self.speed[i] > MIN_SPEED_DROP
    && self.distance[i] - self.last_apex_distance > MIN_CORNER_SPACING
  }

  fn corner_at(&self, i: usize) -> Option<(CornerEvent, usize)> {
    // brake point: first significant brake application in the lookback
    // window, the candidate index itself when none is found
    let mut brake_idx = i;
    for j in i.saturating_sub(BRAKE_LOOKBACK)..i {
      if self.brake[j] > BRAKE_POINT_FORCE {
        brake_idx = j;
        break;
      }
    }

    // apex: minimum speed in the lookahead window, first occurrence
    // wins on ties
    let mut apex_idx = i;
    for j in i..(i + APEX_WINDOW).min(self.len) {
      if self.speed[j] < self.speed[apex_idx] {
        apex_idx = j;
      }
    }

    // exit: throttle reapplied and speed recovering, apex itself when
    // neither happens within the window
    let mut exit_idx = apex_idx;
    for j in apex_idx..(apex_idx + EXIT_WINDOW).min(self.len) {
      if self.throttle[j] > EXIT_THROTTLE
         && self.speed[j] > self.speed[apex_idx] + EXIT_SPEED_GAIN
      {
        exit_idx = j;
        break;
      }
    }

    let speed_delta = self.speed[brake_idx] - self.speed[apex_idx];
    if speed_delta <= MIN_SPEED_DELTA {
      return None;
    }

    let brake_point = BrakePoint { distance:    self.distance[brake_idx],
                                   speed:       self.speed[brake_idx],
                                   brake_force: self.brake[brake_idx], };
    let apex = Apex { distance:  self.distance[apex_idx],
                      min_speed: self.speed[apex_idx], };
    let exit = CornerExit { distance: self.distance[exit_idx],
                            speed:    self.speed[exit_idx],
                            throttle: self.throttle[exit_idx], };

    let event = CornerEvent { corner_number: self.accepted + 1,
                              brake_point,
                              apex,
                              exit,
                              speed_delta,
                              class: CornerClass::from_apex_speed(
                                       self.speed[apex_idx]) };
    Some((event, exit_idx))
  }
}

impl Iterator for CornerScan<'_> {
  type Item = CornerEvent;

  fn next(&mut self) -> Option<CornerEvent> {
    while self.cursor + SCAN_TAIL < self.len {
      let i = self.cursor;
      if i <= WARMUP_END {
        self.cursor += 1;
        continue;
      }

      if self.candidate_at(i) {
        if let Some((event, exit_idx)) = self.corner_at(i) {
          self.accepted += 1;
          self.last_apex_distance = event.apex.distance;
          self.cursor = exit_idx + POST_EXIT_SKIP;
          return Some(event);
        }
      }
      self.cursor += REJECT_STEP;
    }
    None
  }
}

/// All corners of one lap, in course order.
pub fn detect_corners(telemetry: &LapTelemetry) -> Vec<CornerEvent> {
  CornerScan::new(telemetry).collect()
}


/// Corner analysis document for one lap.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CornerAnalysis {
  pub driver:  String,
  pub lap:     u32,
  pub corners: Vec<CornerEvent>,
}

impl CornerAnalysis {
  pub fn new(driver: String, lap: u32, telemetry: &LapTelemetry) -> Self {
    Self { driver,
           lap,
           corners: detect_corners(telemetry) }
  }
}
