use serde::{Deserialize, Serialize};

/// Tunables governing when the arbiter may promote, hold, or send a flight
/// around. See spec §3/§4.3/§4.4 for the meaning of each field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingThresholds {
  pub luaw_auth_before_landing_min: f32,
  pub takeoff_before_landing_min: f32,
  pub clear_to_land_max: f32,
  pub go_around_min: f32,
  pub cross_before_landing_min: f32,
}

/// Sentinel meaning "no arrival in sight" for `seconds_to_touchdown`.
pub const RWY_INFINITY: f32 = f32::INFINITY;

impl Default for TimingThresholds {
  fn default() -> Self {
    Self {
      luaw_auth_before_landing_min: 100.0,
      takeoff_before_landing_min: 90.0,
      clear_to_land_max: 90.0,
      go_around_min: 15.0,
      cross_before_landing_min: 120.0,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_thresholds() {
    let t = TimingThresholds::default();
    assert_eq!(t.luaw_auth_before_landing_min, 100.0);
    assert_eq!(t.takeoff_before_landing_min, 90.0);
    assert_eq!(t.go_around_min, 15.0);
  }
}
