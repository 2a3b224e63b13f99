use serde::{Deserialize, Serialize};

use crate::advisory::TrafficAdvisory;

/// Why a `HoldShort` or `GoAround` was issued instead of a clearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclineReason {
  TrafficLanding,
  TrafficDeparting,
  TrafficCrossing,
  WaitInLine,
  RunwayNotVacated,
}

/// The tagged event the arbiter delivers to a flight's listener (C6).
///
/// Shared semantics: `number_in_line` is meaningful for `Continue` and the
/// first `ClearedToLand`; `immediate` is false outside the variants that
/// define it; `traffic` carries 0-2 advisories in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[serde(tag = "type", content = "value")]
pub enum Event {
  Continue {
    number_in_line: u32,
    traffic: Vec<TrafficAdvisory>,
  },
  ClearedToLand {
    number_in_line: u32,
    traffic: Vec<TrafficAdvisory>,
  },
  ClearedForTakeoff {
    immediate: bool,
    traffic: Vec<TrafficAdvisory>,
  },
  AuthorizedLineUpAndWait {
    traffic: Vec<TrafficAdvisory>,
  },
  ClearedToCross {
    immediate: bool,
    traffic: Vec<TrafficAdvisory>,
  },
  HoldShort {
    reason: DeclineReason,
  },
  GoAround {
    reason: DeclineReason,
  },
}

impl Event {
  pub fn traffic(&self) -> &[TrafficAdvisory] {
    match self {
      Event::Continue { traffic, .. }
      | Event::ClearedToLand { traffic, .. }
      | Event::ClearedForTakeoff { traffic, .. }
      | Event::AuthorizedLineUpAndWait { traffic }
      | Event::ClearedToCross { traffic, .. } => traffic,
      Event::HoldShort { .. } | Event::GoAround { .. } => &[],
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_equality_is_semantic() {
    let a = Event::Continue {
      number_in_line: 1,
      traffic: vec![],
    };
    let b = Event::Continue {
      number_in_line: 1,
      traffic: vec![],
    };
    assert_eq!(a, b);

    let c = Event::Continue {
      number_in_line: 2,
      traffic: vec![],
    };
    assert_ne!(a, c);
  }

  #[test]
  fn test_traffic_cap_two() {
    let event = Event::ClearedToLand {
      number_in_line: 1,
      traffic: vec![
        TrafficAdvisory::LandingAhead {
          aircraft_type: "A320".into(),
          miles: 2,
        },
        TrafficAdvisory::CrossingRunway,
      ],
    };
    assert!(event.traffic().len() <= 2);
  }
}
