//! C4: Advisory composer. Given an outbound strip and the current board,
//! produces the ordered, capped list of traffic advisories that accompany
//! its event.

use internment::Intern;
use serde::{Deserialize, Serialize};

use crate::{
  board::RunwayStripBoard, flight::FlightKind, kinematics, runway::RunwayEnd,
};

const MAX_ADVISORIES: usize = 2;

/// Supplemental traffic information appended to a clearance or hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[serde(tag = "type", content = "value")]
pub enum TrafficAdvisory {
  LandingAhead {
    aircraft_type: Intern<String>,
    miles: u32,
  },
  CrossingRunway,
  DepartingAhead {
    aircraft_type: Intern<String>,
  },
  TrafficOnFinal {
    aircraft_type: Intern<String>,
    miles: u32,
  },
  LandedOnRunway {
    aircraft_type: Intern<String>,
  },
}

fn miles_on_final(board: &RunwayStripBoard, end: &RunwayEnd, id: Intern<String>) -> u32 {
  let strip = board
    .cleared_to_land
    .iter()
    .chain(board.arrivals_line.iter())
    .find(|s| s.id == id);
  let Some(strip) = strip else {
    return 1;
  };
  let snapshot = strip.flight();
  (kinematics::distance_nm_on_final(&snapshot, end).floor() as i64).max(1) as u32
}

/// Composes the advisory list for a strip identified by `outbound_id`
/// about to receive an event, per spec §4.2's six ordered rules.
pub fn compose(
  board: &RunwayStripBoard,
  end: &RunwayEnd,
  outbound_id: Intern<String>,
  outbound_kind: FlightKind,
) -> Vec<TrafficAdvisory> {
  let mut advisories = Vec::new();

  // Rule 1: another strip is cleared to land.
  if let Some(landing) = &board.cleared_to_land {
    if landing.id != outbound_id {
      advisories.push(TrafficAdvisory::LandingAhead {
        aircraft_type: landing.aircraft_type,
        miles: miles_on_final(board, end, landing.id),
      });
    }
  }

  // Rule 2: a strip in arrivals_line precedes this one (only meaningful
  // when outbound is itself an arrival in that line).
  if advisories.len() < MAX_ADVISORIES && outbound_kind == FlightKind::Arrival {
    if let Some(preceding) = board
      .arrivals_line
      .iter()
      .take_while(|s| s.id != outbound_id)
      .last()
    {
      advisories.push(TrafficAdvisory::LandingAhead {
        aircraft_type: preceding.aircraft_type,
        miles: miles_on_final(board, end, preceding.id),
      });
    }
  }

  // Rule 3: a crossing is in progress or cleared, and outbound isn't one.
  if advisories.len() < MAX_ADVISORIES
    && outbound_kind != FlightKind::Crossing
    && (!board.crossing.is_empty() || !board.cleared_to_cross.is_empty())
  {
    advisories.push(TrafficAdvisory::CrossingRunway);
  }

  // Rule 4: a departure is lined up or rolling, and outbound isn't one
  // (mirrors rule 5's symmetric treatment of arrival/crosser outbound).
  if advisories.len() < MAX_ADVISORIES && outbound_kind != FlightKind::Departure {
    let departing = board
      .authorized_luaw
      .as_ref()
      .or(board.cleared_to_takeoff.as_ref());
    if let Some(departing) = departing {
      advisories.push(TrafficAdvisory::DepartingAhead {
        aircraft_type: departing.aircraft_type,
      });
    }
  }

  // Rule 5: a landing is cleared (or the nearest arrival is still inbound),
  // and outbound is a departure or crosser.
  if advisories.len() < MAX_ADVISORIES && outbound_kind != FlightKind::Arrival {
    let nearest = board.cleared_to_land.as_ref().or(board.arrivals_line.first());
    if let Some(landing) = nearest {
      advisories.push(TrafficAdvisory::TrafficOnFinal {
        aircraft_type: landing.aircraft_type,
        miles: miles_on_final(board, end, landing.id),
      });
    }
  }

  // Rule 6: a landing just touched down but hasn't vacated, for another arrival.
  if advisories.len() < MAX_ADVISORIES && outbound_kind == FlightKind::Arrival {
    if let Some(landing) = &board.cleared_to_land {
      let snapshot = landing.flight();
      if landing.id != outbound_id && kinematics::is_on_rollout(&snapshot, end) {
        advisories.push(TrafficAdvisory::LandedOnRunway {
          aircraft_type: landing.aircraft_type,
        });
      }
    }
  }

  advisories.truncate(MAX_ADVISORIES);
  advisories
}
