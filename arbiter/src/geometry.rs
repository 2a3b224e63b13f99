use std::f32::consts::PI;

use glam::Vec2;

pub fn move_point(point: Vec2, degrees: f32, length: f32) -> Vec2 {
  // Convert degrees to radians
  let radians = degrees * (PI / 180.0);

  // Calculate x and y components
  let x = length * radians.sin();
  let y = length * radians.cos();

  // Create and return the new Vec2
  point + Vec2::new(x, y)
}

pub fn add_degrees(degrees: f32, add: f32) -> f32 {
  (degrees + add) % 360.0
}

pub fn inverse_degrees(degrees: f32) -> f32 {
  add_degrees(degrees, 180.0)
}

/// Projects `point` onto the line through `line_start`/`line_end`.
pub fn closest_point_on_line(
  point: Vec2,
  line_start: Vec2,
  line_end: Vec2,
) -> Vec2 {
  let line_dir = line_end - line_start;
  let line_dir_normalized = line_dir.normalize();
  let point_vector = point - line_start;
  let projection = point_vector.dot(line_dir_normalized);
  line_start + line_dir_normalized * projection
}

#[cfg(test)]
mod tests {
  use super::*;

  mod closest_point_on_line {
    use super::*;

    #[test]
    fn test_point_off_axis() {
      let closest = closest_point_on_line(
        Vec2::new(5.0, 3.0),
        Vec2::new(0.0, 0.0),
        Vec2::new(10.0, 0.0),
      );
      assert_eq!(closest, Vec2::new(5.0, 0.0));
    }
  }

  #[test]
  fn test_inverse_degrees() {
    assert_eq!(inverse_degrees(90.0), 270.0);
    assert_eq!(inverse_degrees(270.0), 90.0);
  }
}
