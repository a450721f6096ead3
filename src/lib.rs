// Copyright 2025 lapsight developers. All rights reserved.

pub mod aero;
pub mod brakes;
pub mod corners;
pub mod energy;
pub mod gears;
pub mod pace;
pub mod provider;
pub mod session;
pub mod stats;
pub mod stints;
pub mod telemetry;
pub mod throttle;
pub mod tires;

pub use aero::DownforceEstimate;
pub use brakes::{BrakeAnalysis, BrakeZone};
pub use corners::{CornerAnalysis, CornerEvent, CornerScan};
pub use energy::EnergyEstimate;
pub use gears::GearUsage;
pub use pace::{FuelEffect, RacePace};
pub use provider::{DiskProvider, EventInfo, TelemetryProvider};
pub use session::{LapRecord, SessionData, SessionDocument};
pub use stints::{Stint, TireDegradation};
pub use telemetry::{LapTelemetry, TelemetryComparison};
pub use throttle::ThrottleTrace;
pub use tires::TireAnalysis;
