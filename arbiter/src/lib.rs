pub mod advisory;
pub mod arbiter;
pub mod board;
pub mod error;
pub mod event;
pub mod flight;
pub mod geometry;
pub mod kinematics;
pub mod runway;
pub mod strip;
pub mod thresholds;

pub use advisory::TrafficAdvisory;
pub use arbiter::Arbiter;
pub use board::{RunwayFlags, RunwayStripBoard};
pub use error::ProgrammerError;
pub use event::{DeclineReason, Event};
pub use flight::{Flight, FlightKind, Kinematics};
pub use geometry::*;
pub use runway::{Runway, RunwayEnd};
pub use strip::{FlightStrip, KinematicsSource, Listener};
pub use thresholds::TimingThresholds;

pub const NAUTICALMILES_TO_FEET: f32 = 6076.115;
pub const KNOT_TO_FEET_PER_SECOND: f32 = 1.68781;
