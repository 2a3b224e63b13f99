use glam::Vec2;
use internment::Intern;
use serde::{Deserialize, Serialize};

/// The role a flight plays when it checks in with the arbiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightKind {
  Arrival,
  Departure,
  Crossing,
}

/// The minimum kinematic surface the arbiter consumes, per spec §6.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
  pub pos: Vec2,
  pub altitude_agl_ft: f32,
  pub ground_speed_kt: f32,
  pub vertical_speed_fpm: f32,
  pub on_ground: bool,
}

/// An external flight as seen by the arbiter: identity, aircraft type for
/// advisory composition, and a current kinematic snapshot.
///
/// The arbiter does not own a flight's lifetime; it only reads this snapshot
/// when it re-evaluates the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
  pub id: Intern<String>,
  pub aircraft_type: Intern<String>,
  pub kind: FlightKind,
  pub kinematics: Kinematics,
}

impl Flight {
  pub fn new(
    id: impl Into<String>,
    aircraft_type: impl Into<String>,
    kind: FlightKind,
    kinematics: Kinematics,
  ) -> Self {
    Self {
      id: Intern::from(id.into()),
      aircraft_type: Intern::from(aircraft_type.into()),
      kind,
      kinematics,
    }
  }
}
