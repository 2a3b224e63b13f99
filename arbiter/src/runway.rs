use glam::Vec2;
use internment::Intern;
use serde::{Deserialize, Serialize};

use crate::geometry::{closest_point_on_line, inverse_degrees, move_point};

/// A physical runway: two ends sharing a centerline, width, and elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runway {
  pub id: Intern<String>,
  pub center: Vec2,
  pub heading: f32,
  pub reciprocal_heading: f32,
  pub length_ft: f32,
  pub width_ft: f32,
  pub elevation_ft: f32,
}

impl Runway {
  pub fn new(
    id: Intern<String>,
    center: Vec2,
    heading: f32,
    length_ft: f32,
    width_ft: f32,
    elevation_ft: f32,
  ) -> Self {
    Self {
      id,
      center,
      heading,
      reciprocal_heading: inverse_degrees(heading),
      length_ft,
      width_ft,
      elevation_ft,
    }
  }

  /// The endpoint an arbiter can be bound to, approaching on `heading`.
  pub fn end(&self, heading: f32) -> RunwayEnd {
    let threshold =
      move_point(self.center, inverse_degrees(heading), self.length_ft * 0.5);
    RunwayEnd {
      runway_id: self.id,
      heading,
      threshold,
      width_ft: self.width_ft,
      length_ft: self.length_ft,
      elevation_ft: self.elevation_ft,
    }
  }
}

/// One endpoint of a runway: the direction an arbiter is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunwayEnd {
  pub runway_id: Intern<String>,
  pub heading: f32,
  pub threshold: Vec2,
  pub width_ft: f32,
  pub length_ft: f32,
  pub elevation_ft: f32,
}

impl RunwayEnd {
  /// The far end of the runway strip, departing on this end's heading.
  pub fn far_end(&self) -> Vec2 {
    move_point(self.threshold, self.heading, self.length_ft)
  }

  /// True if `point` falls within the rectangular runway strip.
  pub fn contains(&self, point: Vec2) -> bool {
    let far = self.far_end();
    let along = far - self.threshold;
    let len = along.length();
    if len <= f32::EPSILON {
      return false;
    }
    let closest = closest_point_on_line(point, self.threshold, far);
    let projected = (closest - self.threshold).dot(along / len);
    if projected < 0.0 || projected > len {
      return false;
    }
    point.distance(closest) <= self.width_ft * 0.5
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn runway() -> Runway {
    Runway::new(
      Intern::from("09/27".to_string()),
      Vec2::new(0.0, 0.0),
      90.0,
      9000.0,
      150.0,
      400.0,
    )
  }

  #[test]
  fn test_end_heading() {
    let rwy = runway();
    let end = rwy.end(90.0);
    assert_eq!(end.heading, 90.0);
  }

  #[test]
  fn test_contains_threshold_point() {
    let rwy = runway();
    let end = rwy.end(90.0);
    assert!(end.contains(end.threshold));
  }

  #[test]
  fn test_contains_far_outside() {
    let rwy = runway();
    let end = rwy.end(90.0);
    assert!(!end.contains(end.threshold + Vec2::new(0.0, 1000.0)));
  }
}
