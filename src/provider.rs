// Copyright 2025 lapsight developers. All rights reserved.

use crate::{session::{LapRecord, SessionData},
            telemetry::LapTelemetry};
use chrono::NaiveDate;
use eyre::{ensure, Result, WrapErr};
use getset::Getters;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{fs::File,
          io::BufReader,
          path::{Path, PathBuf}};
use tracing::debug;


/// Environment variable overriding the cache root directory.
pub const CACHE_ENV: &str = "LAPSIGHT_CACHE";
/// Default cache root, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "telemetry_cache";

/// Event format marker for pre-season testing; filtered out of event
/// listings.
const TESTING_FORMAT: &str = "testing";


/// One event of a season schedule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
  pub name:     String,
  pub location: String,
  pub country:  String,
  pub round:    u32,
  #[serde(default)]
  pub date:     Option<NaiveDate>,
  #[serde(default, skip_serializing)]
  pub format:   String,
}


/// Source of raw session and telemetry data. The provider owns all
/// caching of raw data; everything it hands out is treated as
/// read-only by the analyzers.
pub trait TelemetryProvider {
  /// Race-weekend events of a season, testing excluded.
  fn event_schedule(&self, year: i32) -> Result<Vec<EventInfo>>;

  /// All lap records of one session.
  fn session(&self,
             year: i32,
             event: &str,
             session_type: &str)
             -> Result<SessionData>;

  /// The co-indexed channel arrays of one lap. Channels absent from
  /// the cache come back as empty vectors, not as errors.
  fn lap_telemetry(&self,
                   year: i32,
                   event: &str,
                   session_type: &str,
                   driver: &str,
                   lap: u32)
                   -> Result<LapTelemetry>;
}


/// Reads the provider's on-disk JSON cache:
///
/// ```text
/// <root>/<year>/schedule.json
/// <root>/<year>/<event>/<session>/laps.json
/// <root>/<year>/<event>/<session>/telemetry_<DRIVER>_<lap>.json
/// ```
#[derive(Debug, Getters)]
pub struct DiskProvider {
  #[getset(get = "pub")]
  root: PathBuf,
}

impl DiskProvider {
  pub fn new(root: PathBuf) -> Self {
    Self { root }
  }

  /// Cache root from `LAPSIGHT_CACHE`, falling back to
  /// [`DEFAULT_CACHE_DIR`].
  pub fn from_env() -> Self {
    let root = std::env::var(CACHE_ENV).map(PathBuf::from)
                                       .unwrap_or_else(|_| {
                                         PathBuf::from(DEFAULT_CACHE_DIR)
                                       });
    Self::new(root)
  }

  fn session_dir(&self, year: i32, event: &str, session_type: &str)
                 -> PathBuf {
    self.root
        .join(year.to_string())
        .join(event)
        .join(session_type)
  }

  fn read_json<T>(&self, path: &Path) -> Result<T>
    where T: DeserializeOwned
  {
    debug!(path = %path.display(), "reading cache document");
    let file = File::open(path).wrap_err_with(|| {
                                 format!("no cached data at '{}'",
                                         path.display())
                               })?;
    serde_json::from_reader(BufReader::new(file)).wrap_err_with(|| {
      format!("malformed cache document '{}'", path.display())
    })
  }
}

impl TelemetryProvider for DiskProvider {
  fn event_schedule(&self, year: i32) -> Result<Vec<EventInfo>> {
    let path = self.root.join(year.to_string()).join("schedule.json");
    let events: Vec<EventInfo> =
      self.read_json(&path)
          .wrap_err_with(|| format!("failed to fetch {} schedule", year))?;

    Ok(events.into_iter()
             .filter(|event| event.format != TESTING_FORMAT)
             .collect())
  }

  fn session(&self,
             year: i32,
             event: &str,
             session_type: &str)
             -> Result<SessionData> {
    let path = self.session_dir(year, event, session_type).join("laps.json");
    let laps: Vec<LapRecord> =
      self.read_json(&path).wrap_err_with(|| {
                             format!("failed to fetch session data for {} \
                                      {} {}",
                                     year, event, session_type)
                           })?;
    ensure!(!laps.is_empty(),
            "session {} {} {} contains no laps",
            year,
            event,
            session_type);

    Ok(SessionData::new(year,
                        event.to_string(),
                        session_type.to_string(),
                        laps))
  }

  fn lap_telemetry(&self,
                   year: i32,
                   event: &str,
                   session_type: &str,
                   driver: &str,
                   lap: u32)
                   -> Result<LapTelemetry> {
    let path = self.session_dir(year, event, session_type)
                   .join(format!("telemetry_{}_{}.json", driver, lap));
    self.read_json(&path).wrap_err_with(|| {
                           format!("no lap data found for {} lap {}",
                                   driver, lap)
                         })
  }
}
