// Copyright 2025 lapsight developers. All rights reserved.

use clap::{Parser, Subcommand};
use eyre::{eyre, Result};
use lapsight::{aero::DownforceEstimate,
               brakes::BrakeAnalysis,
               corners::CornerAnalysis,
               energy::EnergyEstimate,
               gears::GearUsage,
               pace::{FuelEffect, RacePace},
               provider::{DiskProvider, TelemetryProvider},
               session::SessionDocument,
               stints::TireDegradation,
               telemetry::{DriverLap, TelemetryComparison, TelemetryTrace},
               throttle::ThrottleTrace,
               tires::TireAnalysis};
use tracing::info;
use tracing_subscriber::EnvFilter;


/// Derives per-lap and per-corner performance signals from cached race
/// telemetry and prints them as JSON documents.
#[derive(Debug, Parser)]
#[command(name = "lapsight", version, about)]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Session document: lap list, entry list and summary statistics
  Session {
    year:         i32,
    event:        String,
    session_type: String,
    /// Restrict the document to these drivers
    drivers:      Vec<String>,
  },
  /// Telemetry comparison for one or two laps
  Telemetry {
    year:         i32,
    event:        String,
    session_type: String,
    driver1:      String,
    lap1:         u32,
    #[arg(requires = "lap2")]
    driver2:      Option<String>,
    lap2:         Option<u32>,
  },
  /// Race-weekend events of a season
  Events { year: i32 },
  /// Stint partition and per-stint degradation for one driver
  TireDegradation {
    year:         i32,
    event:        String,
    session_type: String,
    driver:       String,
  },
  /// Pace aggregates for one or more drivers
  RacePace {
    year:         i32,
    event:        String,
    session_type: String,
    #[arg(required = true)]
    drivers:      Vec<String>,
  },
  /// Corner boundaries (brake point, apex, exit) of one lap
  CornerAnalysis {
    year:         i32,
    event:        String,
    session_type: String,
    driver:       String,
    lap:          u32,
  },
  /// Time share per gear over one lap
  GearUsage {
    year:         i32,
    event:        String,
    session_type: String,
    driver:       String,
    lap:          u32,
  },
  /// Lap-time trend attributed to fuel burn
  FuelEffect {
    year:         i32,
    event:        String,
    session_type: String,
    driver:       String,
  },
  /// Downforce index estimated from the speed trace
  DownforceAnalysis {
    year:         i32,
    event:        String,
    session_type: String,
    driver:       String,
    lap:          u32,
  },
  /// Brake zones and whole-lap brake usage
  BrakeAnalysis {
    year:         i32,
    event:        String,
    session_type: String,
    driver:       String,
    lap:          u32,
  },
  /// Throttle coverage split and application points
  ThrottleTrace {
    year:         i32,
    event:        String,
    session_type: String,
    driver:       String,
    lap:          u32,
  },
  /// Tire condition and wear heuristics for one lap
  TireAnalysis {
    year:         i32,
    event:        String,
    session_type: String,
    driver:       String,
    lap:          u32,
  },
  /// Power-unit stress and energy recovery estimates for one lap
  EnergyAnalysis {
    year:         i32,
    event:        String,
    session_type: String,
    driver:       String,
    lap:          u32,
  },
}


fn main() -> Result<()> {
  color_eyre::install()?;
  tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env())
                           .with_writer(std::io::stderr)
                           .init();

  let cli = Cli::parse();
  let provider = DiskProvider::from_env();

  let document = dispatch(&cli.command, &provider)?;
  println!("{}", document);
  Ok(())
}

fn dispatch(command: &Command, provider: &dyn TelemetryProvider)
            -> Result<String> {
  let document = match command {
    Command::Session { year,
                       event,
                       session_type,
                       drivers, } => {
      info!(year, %event, %session_type, "building session document");
      let session = provider.session(*year, event, session_type)?
                            .filtered(drivers);
      serde_json::to_string(&SessionDocument::build(&session, provider))?
    }

    Command::Telemetry { year,
                         event,
                         session_type,
                         driver1,
                         lap1,
                         driver2,
                         lap2, } => {
      let session = provider.session(*year, event, session_type)?;

      let load = |driver: &str, lap: u32| -> Result<DriverLap> {
        let record =
          session.lap(driver, lap).ok_or_else(|| {
                                     eyre!("no lap data found for {} lap {}",
                                           driver,
                                           lap)
                                   })?;
        let telemetry = provider.lap_telemetry(*year,
                                               event,
                                               session_type,
                                               driver,
                                               lap)?;
        Ok(DriverLap { driver:    driver.to_string(),
                       lap,
                       telemetry: TelemetryTrace::new(&telemetry,
                                                      record.compound_name()),
                       metrics:   telemetry.metrics(Some(record)), })
      };

      // a failure on either driver aborts the whole comparison
      let driver1 = load(driver1, *lap1)?;
      let driver2 = match (driver2, lap2) {
        (Some(driver), Some(lap)) => Some(load(driver, *lap)?),
        _ => None,
      };
      serde_json::to_string(&TelemetryComparison { driver1, driver2 })?
    }

    Command::Events { year } => {
      serde_json::to_string(&provider.event_schedule(*year)?)?
    }

    Command::TireDegradation { year,
                               event,
                               session_type,
                               driver, } => {
      let session = provider.session(*year, event, session_type)?;
      serde_json::to_string(&TireDegradation::new(driver, &session))?
    }

    Command::RacePace { year,
                        event,
                        session_type,
                        drivers, } => {
      let session = provider.session(*year, event, session_type)?;
      serde_json::to_string(&RacePace::new(&session, drivers))?
    }

    Command::CornerAnalysis { year,
                              event,
                              session_type,
                              driver,
                              lap, } => {
      let telemetry =
        provider.lap_telemetry(*year, event, session_type, driver, *lap)?;
      serde_json::to_string(&CornerAnalysis::new(driver.clone(),
                                                 *lap,
                                                 &telemetry))?
    }

    Command::GearUsage { year,
                         event,
                         session_type,
                         driver,
                         lap, } => {
      let telemetry =
        provider.lap_telemetry(*year, event, session_type, driver, *lap)?;
      serde_json::to_string(&GearUsage::new(driver.clone(),
                                            *lap,
                                            &telemetry))?
    }

    Command::FuelEffect { year,
                          event,
                          session_type,
                          driver, } => {
      let session = provider.session(*year, event, session_type)?;
      serde_json::to_string(&FuelEffect::new(driver, &session))?
    }

    Command::DownforceAnalysis { year,
                                 event,
                                 session_type,
                                 driver,
                                 lap, } => {
      let telemetry =
        provider.lap_telemetry(*year, event, session_type, driver, *lap)?;
      serde_json::to_string(&DownforceEstimate::new(driver.clone(),
                                                    *lap,
                                                    &telemetry))?
    }

    Command::BrakeAnalysis { year,
                             event,
                             session_type,
                             driver,
                             lap, } => {
      let telemetry =
        provider.lap_telemetry(*year, event, session_type, driver, *lap)?;
      serde_json::to_string(&BrakeAnalysis::new(driver.clone(),
                                                *lap,
                                                &telemetry))?
    }

    Command::ThrottleTrace { year,
                             event,
                             session_type,
                             driver,
                             lap, } => {
      let telemetry =
        provider.lap_telemetry(*year, event, session_type, driver, *lap)?;
      serde_json::to_string(&ThrottleTrace::new(driver.clone(),
                                                *lap,
                                                &telemetry))?
    }

    Command::TireAnalysis { year,
                            event,
                            session_type,
                            driver,
                            lap, } => {
      let session = provider.session(*year, event, session_type)?;
      let record =
        session.lap(driver, *lap).ok_or_else(|| {
                                    eyre!("no lap data found for {} lap {}",
                                          driver,
                                          lap)
                                  })?;
      let telemetry =
        provider.lap_telemetry(*year, event, session_type, driver, *lap)?;
      serde_json::to_string(&TireAnalysis::new(record, &session, &telemetry))?
    }

    Command::EnergyAnalysis { year,
                              event,
                              session_type,
                              driver,
                              lap, } => {
      let telemetry =
        provider.lap_telemetry(*year, event, session_type, driver, *lap)?;
      serde_json::to_string(&EnergyEstimate::new(driver.clone(),
                                                 *lap,
                                                 &telemetry))?
    }
  };

  Ok(document)
}


#[cfg(test)]
mod tests {
  use super::*;
  use clap::CommandFactory;


  #[test]
  fn cli_definition_test() {
    Cli::command().debug_assert();
  }

  #[test]
  fn parse_corner_analysis_test() {
    let cli = Cli::parse_from(["lapsight", "corner-analysis", "2024",
                               "Monza", "R", "VER", "12"]);
    match cli.command {
      Command::CornerAnalysis { year, driver, lap, .. } => {
        assert_eq!(2024, year);
        assert_eq!("VER", driver);
        assert_eq!(12, lap);
      }
      other => panic!("parsed unexpected command: {:?}", other),
    }
  }

  #[test]
  fn parse_telemetry_comparison_test() {
    let one = Cli::parse_from(["lapsight", "telemetry", "2024", "Monza",
                               "R", "VER", "12"]);
    match one.command {
      Command::Telemetry { driver2: None, lap2: None, .. } => {}
      other => panic!("parsed unexpected command: {:?}", other),
    }

    let two = Cli::parse_from(["lapsight", "telemetry", "2024", "Monza",
                               "R", "VER", "12", "LEC", "14"]);
    match two.command {
      Command::Telemetry { driver2: Some(driver2),
                           lap2: Some(14),
                           .. } => assert_eq!("LEC", driver2),
      other => panic!("parsed unexpected command: {:?}", other),
    }

    // a second driver without a lap number is a usage error
    let missing = Cli::try_parse_from(["lapsight", "telemetry", "2024",
                                       "Monza", "R", "VER", "12", "LEC"]);
    assert!(missing.is_err());
  }

  #[test]
  fn parse_race_pace_requires_driver_test() {
    let missing =
      Cli::try_parse_from(["lapsight", "race-pace", "2024", "Monza", "R"]);
    assert!(missing.is_err());
  }
}
