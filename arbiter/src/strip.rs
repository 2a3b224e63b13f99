use std::fmt;

use internment::Intern;

use crate::{
  event::Event,
  flight::{Flight, FlightKind, Kinematics},
};

/// A single-consumer sink for one strip's events, in order. The arbiter
/// calls this synchronously once per state transition; implementations
/// MUST NOT call back into the arbiter that owns them (spec §5).
pub trait Listener: fmt::Debug {
  fn send(&mut self, event: Event);
}

/// Supplies a flight's current kinematic snapshot on demand. The board
/// re-reads this every re-evaluation rather than caching stale numbers,
/// since the arbiter does not own the flight's lifetime (spec §3).
pub trait KinematicsSource: fmt::Debug {
  fn kinematics(&self) -> Kinematics;
}

#[derive(Debug, Clone, Copy)]
struct FixedKinematics(Kinematics);

impl KinematicsSource for FixedKinematics {
  fn kinematics(&self) -> Kinematics {
    self.0
  }
}

/// A per-flight record tracking one check-in with the arbiter (C2).
///
/// `id`, `aircraft_type`, and `kind` are stable for the life of the strip;
/// `kinematics_source` is read fresh on every probe. Equality is by flight
/// identity.
pub struct FlightStrip {
  pub id: Intern<String>,
  pub aircraft_type: Intern<String>,
  pub kind: FlightKind,
  kinematics_source: Box<dyn KinematicsSource>,
  pub listener: Box<dyn Listener>,
  pub last_event: Option<Event>,
}

impl fmt::Debug for FlightStrip {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FlightStrip")
      .field("id", &self.id)
      .field("aircraft_type", &self.aircraft_type)
      .field("kind", &self.kind)
      .field("kinematics", &self.kinematics_source.kinematics())
      .field("last_event", &self.last_event)
      .finish()
  }
}

impl PartialEq for FlightStrip {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl FlightStrip {
  /// Builds a strip from a one-shot kinematic snapshot; its kinematics
  /// will not change across ticks unless replaced with [`Self::with_source`].
  pub fn new(flight: Flight, listener: Box<dyn Listener>) -> Self {
    Self {
      id: flight.id,
      aircraft_type: flight.aircraft_type,
      kind: flight.kind,
      kinematics_source: Box::new(FixedKinematics(flight.kinematics)),
      listener,
      last_event: None,
    }
  }

  /// Builds a strip backed by a live kinematics handle, e.g. a reference
  /// into the host's flight registry updated every tick.
  pub fn with_source(
    id: Intern<String>,
    aircraft_type: Intern<String>,
    kind: FlightKind,
    kinematics_source: Box<dyn KinematicsSource>,
    listener: Box<dyn Listener>,
  ) -> Self {
    Self {
      id,
      aircraft_type,
      kind,
      kinematics_source,
      listener,
      last_event: None,
    }
  }

  /// A fresh snapshot of the flight this strip tracks.
  pub fn flight(&self) -> Flight {
    Flight {
      id: self.id,
      aircraft_type: self.aircraft_type,
      kind: self.kind,
      kinematics: self.kinematics_source.kinematics(),
    }
  }

  /// Delivers `event` unless it is semantically equal to the last one sent.
  pub fn emit(&mut self, event: Event) {
    if self.last_event.as_ref() == Some(&event) {
      return;
    }
    self.listener.send(event.clone());
    self.last_event = Some(event);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::flight::{FlightKind, Kinematics};

  #[derive(Debug, Default)]
  pub struct RecordingListener {
    pub events: Vec<Event>,
  }

  impl Listener for RecordingListener {
    fn send(&mut self, event: Event) {
      self.events.push(event);
    }
  }

  fn flight() -> Flight {
    Flight::new(
      "F1",
      "A320",
      FlightKind::Arrival,
      Kinematics {
        pos: glam::Vec2::ZERO,
        altitude_agl_ft: 0.0,
        ground_speed_kt: 0.0,
        vertical_speed_fpm: 0.0,
        on_ground: false,
      },
    )
  }

  #[test]
  fn test_emit_suppresses_duplicate() {
    let mut strip = FlightStrip::new(flight(), Box::<RecordingListener>::default());

    strip.emit(Event::Continue {
      number_in_line: 1,
      traffic: vec![],
    });
    strip.emit(Event::Continue {
      number_in_line: 1,
      traffic: vec![],
    });

    assert_eq!(
      strip.last_event,
      Some(Event::Continue {
        number_in_line: 1,
        traffic: vec![]
      })
    );
  }

  #[test]
  fn test_strip_equality_by_id() {
    let a = FlightStrip::new(flight(), Box::<RecordingListener>::default());
    let mut other = flight();
    other.id = Intern::from("F1".to_string());
    let b = FlightStrip::new(other, Box::<RecordingListener>::default());
    assert_eq!(a, b);
  }

  #[test]
  fn test_flight_reflects_source() {
    let strip = FlightStrip::new(flight(), Box::<RecordingListener>::default());
    assert_eq!(strip.flight().id, strip.id);
  }
}
