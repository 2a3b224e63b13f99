//! A small scripted set of flights to give the arbiter something to
//! arbitrate when run standalone. Kinematics advance linearly each tick;
//! nothing here reacts to the arbiter's clearances, so the demo always
//! plays out the same way regardless of what gets cleared.

use std::{cell::RefCell, rc::Rc};

use glam::Vec2;
use internment::Intern;

use arbiter::{
  Event, Flight, FlightKind, Kinematics, KinematicsSource, Listener, RunwayEnd,
  NAUTICALMILES_TO_FEET,
};

#[derive(Debug, Clone)]
struct SharedKinematics(Rc<RefCell<Kinematics>>);

impl KinematicsSource for SharedKinematics {
  fn kinematics(&self) -> Kinematics {
    *self.0.borrow()
  }
}

/// One synthetic aircraft: an identity plus a closed-form motion law applied
/// every tick. `inbound` flights descend toward the runway end; `ground`
/// flights taxi at a fixed ground speed along their heading.
pub struct SyntheticFlight {
  pub id: Intern<String>,
  pub aircraft_type: Intern<String>,
  pub kind: FlightKind,
  state: Rc<RefCell<Kinematics>>,
  velocity_fps: Vec2,
  vertical_speed_fpm: f32,
}

impl SyntheticFlight {
  fn arrival(id: &str, aircraft_type: &str, end: &RunwayEnd, miles_out: f32) -> Self {
    let approach_dir = (end.threshold - end.far_end()).normalize();
    let pos = end.threshold - approach_dir * miles_out * NAUTICALMILES_TO_FEET;
    let ground_speed_kt = 140.0;
    let vertical_speed_fpm = -800.0;
    Self {
      id: Intern::from(id.to_string()),
      aircraft_type: Intern::from(aircraft_type.to_string()),
      kind: FlightKind::Arrival,
      state: Rc::new(RefCell::new(Kinematics {
        pos,
        altitude_agl_ft: miles_out * NAUTICALMILES_TO_FEET / 6.0,
        ground_speed_kt,
        vertical_speed_fpm,
        on_ground: false,
      })),
      velocity_fps: approach_dir * (ground_speed_kt * arbiter::KNOT_TO_FEET_PER_SECOND),
      vertical_speed_fpm,
    }
  }

  fn departure(id: &str, aircraft_type: &str, end: &RunwayEnd) -> Self {
    let hold_point = end.threshold - (end.far_end() - end.threshold).normalize() * 400.0;
    Self {
      id: Intern::from(id.to_string()),
      aircraft_type: Intern::from(aircraft_type.to_string()),
      kind: FlightKind::Departure,
      state: Rc::new(RefCell::new(Kinematics {
        pos: hold_point,
        altitude_agl_ft: 0.0,
        ground_speed_kt: 0.0,
        vertical_speed_fpm: 0.0,
        on_ground: true,
      })),
      velocity_fps: Vec2::ZERO,
      vertical_speed_fpm: 0.0,
    }
  }

  fn crossing(id: &str, aircraft_type: &str, end: &RunwayEnd) -> Self {
    let along = (end.far_end() - end.threshold).normalize();
    let lateral = Vec2::new(-along.y, along.x);
    let hold_point =
      end.threshold + along * (end.length_ft * 0.5) + lateral * (end.width_ft * 2.0);
    Self {
      id: Intern::from(id.to_string()),
      aircraft_type: Intern::from(aircraft_type.to_string()),
      kind: FlightKind::Crossing,
      state: Rc::new(RefCell::new(Kinematics {
        pos: hold_point,
        altitude_agl_ft: 0.0,
        ground_speed_kt: 0.0,
        vertical_speed_fpm: 0.0,
        on_ground: true,
      })),
      velocity_fps: Vec2::ZERO,
      vertical_speed_fpm: 0.0,
    }
  }

  pub fn snapshot(&self) -> Flight {
    Flight {
      id: self.id,
      aircraft_type: self.aircraft_type,
      kind: self.kind,
      kinematics: *self.state.borrow(),
    }
  }

  pub fn kinematics_source(&self) -> Box<dyn KinematicsSource> {
    Box::new(SharedKinematics(self.state.clone()))
  }

  /// Advances this flight's position by `dt_secs` along its fixed velocity.
  /// Arrivals only; ground traffic in this demo scenario holds its position
  /// for the whole run, since nothing here reacts to the arbiter's events.
  pub fn step(&self, dt_secs: f32) {
    if self.kind != FlightKind::Arrival {
      return;
    }
    let mut k = self.state.borrow_mut();
    if k.on_ground {
      return;
    }
    k.pos += self.velocity_fps * dt_secs;
    k.altitude_agl_ft = (k.altitude_agl_ft + self.vertical_speed_fpm / 60.0 * dt_secs).max(0.0);
    if k.altitude_agl_ft <= 0.0 {
      k.on_ground = true;
      k.ground_speed_kt = 110.0;
      k.vertical_speed_fpm = 0.0;
    }
  }
}

/// Logs every event through `tracing`, tagged with the flight's id.
#[derive(Debug)]
pub struct TracingListener(pub Intern<String>);

impl Listener for TracingListener {
  fn send(&mut self, event: Event) {
    tracing::info!(flight = %self.0, ?event, "event");
  }
}

/// Builds the default demo traffic sample: two arrivals spaced apart, one
/// departure holding short, one crosser waiting for a gap.
pub fn default_scenario(end: &RunwayEnd) -> Vec<SyntheticFlight> {
  vec![
    SyntheticFlight::arrival("UAL100", "A320", end, 12.0),
    SyntheticFlight::arrival("DAL200", "B738", end, 25.0),
    SyntheticFlight::departure("SWA300", "B738", end),
    SyntheticFlight::crossing("JBU400", "E190", end),
  ]
}
