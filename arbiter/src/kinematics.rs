//! C1: Kinematic probes. Pure functions over a flight's current state and a
//! runway end; deterministic, stateless, no side effects.

use crate::{
  NAUTICALMILES_TO_FEET,
  flight::Flight,
  runway::RunwayEnd,
  thresholds::RWY_INFINITY,
};

/// Ground speed, in knots, below which a landing roll is considered
/// "rollout" rather than still decelerating at speed.
pub const ROLLOUT_SPEED_KT: f32 = 40.0;

/// Ground speed, in knots, at or below which a flight is considered
/// stationary for vacate detection.
const VACATED_SPEED_EPSILON_KT: f32 = 2.0;

/// Seconds until touchdown, or `RWY_INFINITY` if the flight is not on a
/// descending final approach.
pub fn seconds_to_touchdown(flight: &Flight) -> f32 {
  let k = &flight.kinematics;
  if k.on_ground || k.vertical_speed_fpm >= 0.0 {
    return RWY_INFINITY;
  }
  (k.altitude_agl_ft / k.vertical_speed_fpm.abs()) * 60.0
}

/// Great-circle (here: planar) distance from the flight to the runway end's
/// threshold, in nautical miles.
pub fn distance_nm_on_final(flight: &Flight, end: &RunwayEnd) -> f32 {
  flight.kinematics.pos.distance(end.threshold) / NAUTICALMILES_TO_FEET
}

/// True if the flight is on the ground, on the runway strip, and slow
/// enough to be considered rolling out rather than still on touchdown speed.
pub fn is_on_rollout(flight: &Flight, end: &RunwayEnd) -> bool {
  let k = &flight.kinematics;
  k.on_ground
    && end.contains(k.pos)
    && k.ground_speed_kt <= ROLLOUT_SPEED_KT
}

/// True if the flight has come to rest clear of the runway strip.
pub fn has_vacated(flight: &Flight, end: &RunwayEnd) -> bool {
  let k = &flight.kinematics;
  k.on_ground
    && k.ground_speed_kt <= VACATED_SPEED_EPSILON_KT
    && !end.contains(k.pos)
}

/// True if the flight occupies the runway strip without the board having
/// authorized it to be there. The arbiter itself decides what "authorized"
/// means by checking its board slots; this probe only answers the
/// geometric half of the question.
pub fn is_on_runway(flight: &Flight, end: &RunwayEnd) -> bool {
  flight.kinematics.on_ground && end.contains(flight.kinematics.pos)
}

/// True once a cleared departure has left the runway strip behind: either
/// airborne, or back on the ground clear of it (an aborted takeoff that
/// rolled out and taxied clear). `has_vacated` alone never fires for a
/// normal takeoff, since it requires `on_ground`.
pub fn has_departed(flight: &Flight, end: &RunwayEnd) -> bool {
  !flight.kinematics.on_ground || has_vacated(flight, end)
}

/// True if the flight is physically on the runway strip and `authorized`
/// (as judged by the caller's board state) is false.
pub fn is_incursion(flight: &Flight, end: &RunwayEnd, authorized: bool) -> bool {
  is_on_runway(flight, end) && !authorized
}

#[cfg(test)]
mod tests {
  use glam::Vec2;
  use internment::Intern;

  use super::*;
  use crate::flight::{FlightKind, Kinematics};

  fn end() -> RunwayEnd {
    RunwayEnd {
      runway_id: Intern::from("09/27".to_string()),
      heading: 90.0,
      threshold: Vec2::new(0.0, 0.0),
      width_ft: 150.0,
      length_ft: 9000.0,
      elevation_ft: 400.0,
    }
  }

  fn flight(kinematics: Kinematics) -> Flight {
    Flight::new("F1", "A320", FlightKind::Arrival, kinematics)
  }

  mod seconds_to_touchdown {
    use super::*;

    #[test]
    fn test_on_final() {
      let f = flight(Kinematics {
        pos: Vec2::new(0.0, -10000.0),
        altitude_agl_ft: 1500.0,
        ground_speed_kt: 140.0,
        vertical_speed_fpm: -1000.0,
        on_ground: false,
      });
      assert_eq!(seconds_to_touchdown(&f), 90.0);
    }

    #[test]
    fn test_on_ground_returns_infinity() {
      let f = flight(Kinematics {
        pos: Vec2::ZERO,
        altitude_agl_ft: 0.0,
        ground_speed_kt: 0.0,
        vertical_speed_fpm: 0.0,
        on_ground: true,
      });
      assert_eq!(seconds_to_touchdown(&f), RWY_INFINITY);
    }

    #[test]
    fn test_climbing_returns_infinity() {
      let f = flight(Kinematics {
        pos: Vec2::ZERO,
        altitude_agl_ft: 3000.0,
        ground_speed_kt: 180.0,
        vertical_speed_fpm: 500.0,
        on_ground: false,
      });
      assert_eq!(seconds_to_touchdown(&f), RWY_INFINITY);
    }
  }

  #[test]
  fn test_distance_nm_on_final() {
    let f = flight(Kinematics {
      pos: Vec2::new(0.0, -NAUTICALMILES_TO_FEET * 5.0),
      altitude_agl_ft: 1500.0,
      ground_speed_kt: 140.0,
      vertical_speed_fpm: -800.0,
      on_ground: false,
    });
    let distance = distance_nm_on_final(&f, &end());
    assert!((distance - 5.0).abs() < 0.01);
  }

  mod is_on_rollout {
    use super::*;

    #[test]
    fn test_slow_on_runway() {
      let f = flight(Kinematics {
        pos: Vec2::new(100.0, 0.0),
        altitude_agl_ft: 0.0,
        ground_speed_kt: 30.0,
        vertical_speed_fpm: 0.0,
        on_ground: true,
      });
      assert!(is_on_rollout(&f, &end()));
    }

    #[test]
    fn test_fast_not_rollout() {
      let f = flight(Kinematics {
        pos: Vec2::new(100.0, 0.0),
        altitude_agl_ft: 0.0,
        ground_speed_kt: 120.0,
        vertical_speed_fpm: 0.0,
        on_ground: true,
      });
      assert!(!is_on_rollout(&f, &end()));
    }
  }

  mod is_incursion {
    use super::*;

    #[test]
    fn test_unauthorized_on_strip_is_incursion() {
      let f = flight(Kinematics {
        pos: Vec2::new(100.0, 0.0),
        altitude_agl_ft: 0.0,
        ground_speed_kt: 20.0,
        vertical_speed_fpm: 0.0,
        on_ground: true,
      });
      assert!(is_incursion(&f, &end(), false));
      assert!(!is_incursion(&f, &end(), true));
    }

    #[test]
    fn test_off_strip_never_incursion() {
      let f = flight(Kinematics {
        pos: Vec2::new(0.0, 500.0),
        altitude_agl_ft: 0.0,
        ground_speed_kt: 20.0,
        vertical_speed_fpm: 0.0,
        on_ground: true,
      });
      assert!(!is_incursion(&f, &end(), false));
    }
  }

  mod has_departed {
    use super::*;

    #[test]
    fn test_airborne_has_departed() {
      let f = flight(Kinematics {
        pos: Vec2::new(100.0, 0.0),
        altitude_agl_ft: 50.0,
        ground_speed_kt: 160.0,
        vertical_speed_fpm: 500.0,
        on_ground: false,
      });
      assert!(has_departed(&f, &end()));
    }

    #[test]
    fn test_still_rolling_has_not_departed() {
      let f = flight(Kinematics {
        pos: Vec2::new(100.0, 0.0),
        altitude_agl_ft: 0.0,
        ground_speed_kt: 120.0,
        vertical_speed_fpm: 0.0,
        on_ground: true,
      });
      assert!(!has_departed(&f, &end()));
    }

    #[test]
    fn test_aborted_takeoff_clear_of_strip_has_departed() {
      let f = flight(Kinematics {
        pos: Vec2::new(0.0, 500.0),
        altitude_agl_ft: 0.0,
        ground_speed_kt: 5.0,
        vertical_speed_fpm: 0.0,
        on_ground: true,
      });
      assert!(has_departed(&f, &end()));
    }
  }

  mod has_vacated {
    use super::*;

    #[test]
    fn test_clear_of_strip() {
      let f = flight(Kinematics {
        pos: Vec2::new(0.0, 500.0),
        altitude_agl_ft: 0.0,
        ground_speed_kt: 5.0,
        vertical_speed_fpm: 0.0,
        on_ground: true,
      });
      assert!(has_vacated(&f, &end()));
    }

    #[test]
    fn test_still_rolling_not_vacated() {
      let f = flight(Kinematics {
        pos: Vec2::new(100.0, 0.0),
        altitude_agl_ft: 0.0,
        ground_speed_kt: 30.0,
        vertical_speed_fpm: 0.0,
        on_ground: true,
      });
      assert!(!has_vacated(&f, &end()));
    }
  }
}
