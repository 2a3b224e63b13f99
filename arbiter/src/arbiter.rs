//! C5: the arbiter state machine. The decision core: consumes check-in
//! calls and clock ticks, mutates the board (C3), emits events (C6) through
//! each strip's listener (C2), composing advisories (C4) along the way.

use internment::Intern;

use crate::{
  advisory,
  board::RunwayStripBoard,
  error::ProgrammerError,
  event::{DeclineReason, Event},
  flight::{Flight, FlightKind},
  kinematics,
  runway::RunwayEnd,
  strip::{FlightStrip, KinematicsSource, Listener},
  thresholds::TimingThresholds,
};

/// A margin added to `clear_to_land_max` when deciding whether a takeoff
/// clearance must be flagged `immediate` because an arrival is close behind.
const IMMEDIATE_TAKEOFF_MARGIN_SEC: f32 = 15.0;

/// Owns exactly one runway end and serializes landings, takeoffs, and
/// crossings against it. See spec §4.4/§5 for the re-evaluation contract.
#[derive(Debug)]
pub struct Arbiter {
  board: RunwayStripBoard,
  thresholds: TimingThresholds,
  end: RunwayEnd,
  last_tick: Option<f32>,
  in_progress: bool,
}

impl Arbiter {
  pub fn new(end: RunwayEnd, thresholds: TimingThresholds) -> Self {
    Self {
      board: RunwayStripBoard::new(),
      thresholds,
      end,
      last_tick: None,
      in_progress: false,
    }
  }

  pub fn board(&self) -> &RunwayStripBoard {
    &self.board
  }

  fn contains(&self, id: Intern<String>) -> bool {
    self.board.arrivals_line.iter().any(|s| s.id == id)
      || self.board.departures_line.iter().any(|s| s.id == id)
      || self.board.crossings_line.iter().any(|s| s.id == id)
      || self
        .board
        .cleared_to_land
        .as_ref()
        .is_some_and(|s| s.id == id)
      || self
        .board
        .cleared_to_takeoff
        .as_ref()
        .is_some_and(|s| s.id == id)
      || self
        .board
        .authorized_luaw
        .as_ref()
        .is_some_and(|s| s.id == id)
      || self.board.cleared_to_cross.iter().any(|s| s.id == id)
      || self.board.crossing.iter().any(|s| s.id == id)
  }

  fn enter(&mut self) -> Result<(), ProgrammerError> {
    if self.in_progress {
      return Err(ProgrammerError::ReentrantCall);
    }
    self.in_progress = true;
    Ok(())
  }

  fn exit(&mut self) {
    self.in_progress = false;
  }

  pub fn check_in_arrival(
    &mut self,
    flight: Flight,
    listener: Box<dyn Listener>,
  ) -> Result<(), ProgrammerError> {
    self.enter()?;
    if self.contains(flight.id) {
      self.exit();
      return Err(ProgrammerError::DoubleCheckIn(flight.id));
    }
    tracing::debug!(flight = %flight.id, "check-in arrival");
    self.board.insert_arrival(FlightStrip::new(flight, listener));
    self.reevaluate();
    self.exit();
    Ok(())
  }

  pub fn check_in_departure(
    &mut self,
    flight: Flight,
    listener: Box<dyn Listener>,
  ) -> Result<(), ProgrammerError> {
    self.enter()?;
    if self.contains(flight.id) {
      self.exit();
      return Err(ProgrammerError::DoubleCheckIn(flight.id));
    }
    tracing::debug!(flight = %flight.id, "check-in departure");
    self
      .board
      .insert_departure(FlightStrip::new(flight, listener));
    self.reevaluate();
    self.exit();
    Ok(())
  }

  pub fn check_in_crossing(
    &mut self,
    flight: Flight,
    listener: Box<dyn Listener>,
  ) -> Result<(), ProgrammerError> {
    self.enter()?;
    if self.contains(flight.id) {
      self.exit();
      return Err(ProgrammerError::DoubleCheckIn(flight.id));
    }
    tracing::debug!(flight = %flight.id, "check-in crossing");
    self
      .board
      .insert_crossing(FlightStrip::new(flight, listener));
    self.reevaluate();
    self.exit();
    Ok(())
  }

  /// Like [`Self::check_in_arrival`], but the strip reads kinematics from
  /// `kinematics_source` on every re-evaluation instead of a frozen
  /// snapshot. Intended for a host whose flight registry updates in place
  /// between ticks.
  pub fn check_in_arrival_live(
    &mut self,
    id: Intern<String>,
    aircraft_type: Intern<String>,
    kinematics_source: Box<dyn KinematicsSource>,
    listener: Box<dyn Listener>,
  ) -> Result<(), ProgrammerError> {
    self.enter()?;
    if self.contains(id) {
      self.exit();
      return Err(ProgrammerError::DoubleCheckIn(id));
    }
    tracing::debug!(flight = %id, "check-in arrival (live)");
    self.board.insert_arrival(FlightStrip::with_source(
      id,
      aircraft_type,
      FlightKind::Arrival,
      kinematics_source,
      listener,
    ));
    self.reevaluate();
    self.exit();
    Ok(())
  }

  /// Like [`Self::check_in_departure`], with a live kinematics source.
  pub fn check_in_departure_live(
    &mut self,
    id: Intern<String>,
    aircraft_type: Intern<String>,
    kinematics_source: Box<dyn KinematicsSource>,
    listener: Box<dyn Listener>,
  ) -> Result<(), ProgrammerError> {
    self.enter()?;
    if self.contains(id) {
      self.exit();
      return Err(ProgrammerError::DoubleCheckIn(id));
    }
    tracing::debug!(flight = %id, "check-in departure (live)");
    self.board.insert_departure(FlightStrip::with_source(
      id,
      aircraft_type,
      FlightKind::Departure,
      kinematics_source,
      listener,
    ));
    self.reevaluate();
    self.exit();
    Ok(())
  }

  /// Like [`Self::check_in_crossing`], with a live kinematics source.
  pub fn check_in_crossing_live(
    &mut self,
    id: Intern<String>,
    aircraft_type: Intern<String>,
    kinematics_source: Box<dyn KinematicsSource>,
    listener: Box<dyn Listener>,
  ) -> Result<(), ProgrammerError> {
    self.enter()?;
    if self.contains(id) {
      self.exit();
      return Err(ProgrammerError::DoubleCheckIn(id));
    }
    tracing::debug!(flight = %id, "check-in crossing (live)");
    self.board.insert_crossing(FlightStrip::with_source(
      id,
      aircraft_type,
      FlightKind::Crossing,
      kinematics_source,
      listener,
    ));
    self.reevaluate();
    self.exit();
    Ok(())
  }

  pub fn progress_to(&mut self, timestamp: f32) -> Result<(), ProgrammerError> {
    self.enter()?;
    if let Some(last) = self.last_tick {
      if timestamp < last {
        self.exit();
        return Err(ProgrammerError::NonMonotonicTimestamp {
          last,
          given: timestamp,
        });
      }
    }
    self.last_tick = Some(timestamp);
    self.reevaluate();
    self.exit();
    Ok(())
  }

  fn reevaluate(&mut self) {
    self.detect_vacated();
    self.warn_on_incursions();
    self.advance_arrivals();
    self.advance_departures();
    self.advance_crossings();
    self.emit_continues();
  }

  /// Logs any queued (not yet authorized) strip whose flight is physically
  /// on the runway strip. This does not change board state; it is a
  /// diagnostic for a world that is feeding the arbiter inconsistent
  /// kinematics (e.g. a departure rolling before its clearance).
  fn warn_on_incursions(&self) {
    for strip in self
      .board
      .arrivals_line
      .iter()
      .chain(self.board.departures_line.iter())
      .chain(self.board.crossings_line.iter())
    {
      if kinematics::is_incursion(&strip.flight(), &self.end, false) {
        tracing::warn!(flight = %strip.id, "unauthorized aircraft on runway strip");
      }
    }
  }

  /// Phase 1: retire strips whose aircraft has vacated the runway strip,
  /// and promote crossers who have physically entered it.
  fn detect_vacated(&mut self) {
    let mut to_retire = Vec::new();

    if let Some(strip) = &self.board.cleared_to_land {
      if kinematics::has_vacated(&strip.flight(), &self.end) {
        to_retire.push(strip.id);
      }
    }
    if let Some(strip) = &self.board.cleared_to_takeoff {
      if kinematics::has_departed(&strip.flight(), &self.end) {
        to_retire.push(strip.id);
      }
    }
    for strip in &self.board.crossing {
      if kinematics::has_vacated(&strip.flight(), &self.end) {
        to_retire.push(strip.id);
      }
    }
    for id in to_retire {
      tracing::debug!(flight = %id, "runway vacated, retiring strip");
      self.board.retire(id);
    }

    let entering: Vec<Intern<String>> = self
      .board
      .cleared_to_cross
      .iter()
      .filter(|s| kinematics::is_on_runway(&s.flight(), &self.end))
      .map(|s| s.id)
      .collect();
    for id in entering {
      self.board.mark_entered_crossing(id);
    }
  }

  /// Phase 2: decide the fate of the nearest arrival.
  fn advance_arrivals(&mut self) {
    let Some(head) = self.board.arrivals_line.first() else {
      return;
    };
    let id = head.id;
    let seconds = kinematics::seconds_to_touchdown(&head.flight());

    let can_land = self.board.cleared_to_land.is_none()
      && self.board.cleared_to_takeoff.is_none()
      && self.board.crossing.is_empty()
      && self.board.authorized_luaw.is_none();

    if seconds <= self.thresholds.go_around_min && !can_land {
      tracing::info!(flight = %id, "runway not clear, sending around");
      if let Some(mut strip) = self.board.retire(id) {
        strip.emit(Event::GoAround {
          reason: DeclineReason::RunwayNotVacated,
        });
      }
      return;
    }

    if seconds <= self.thresholds.clear_to_land_max
      && can_land
      && self.board.promote_to_land(id)
    {
      let traffic = advisory::compose(&self.board, &self.end, id, FlightKind::Arrival);
      if let Some(strip) = &mut self.board.cleared_to_land {
        tracing::info!(flight = %id, "cleared to land");
        strip.emit(Event::ClearedToLand {
          number_in_line: 1,
          traffic,
        });
      }
    }
  }

  /// Phase 3: decide the fate of the head of `departures_line` plus any
  /// existing LUAW authorization.
  ///
  /// A departure reaches `ClearedForTakeoff` only by way of
  /// `authorized_luaw` first: LUAW models physically lining up on the
  /// runway, and only a strip already in position can be released to roll.
  /// A fresh `departures_line` head can only be promoted to LUAW.
  fn advance_departures(&mut self) {
    if let Some(id) = self.board.authorized_luaw.as_ref().map(|s| s.id) {
      if self.board.promote_to_takeoff(id, &self.thresholds) {
        let immediate = self.board.next_arrival_seconds()
          <= self.thresholds.clear_to_land_max + IMMEDIATE_TAKEOFF_MARGIN_SEC
          || !self.board.crossings_line.is_empty()
          || !self.board.cleared_to_cross.is_empty();
        let traffic =
          advisory::compose(&self.board, &self.end, id, FlightKind::Departure);
        if let Some(strip) = &mut self.board.cleared_to_takeoff {
          tracing::info!(flight = %id, immediate, "cleared for takeoff");
          strip.emit(Event::ClearedForTakeoff { immediate, traffic });
        }
      }
    } else if let Some(id) =
      self.board.departures_line.first().map(|s| s.id)
    {
      if self.board.promote_to_luaw(id, &self.thresholds) {
        let traffic =
          advisory::compose(&self.board, &self.end, id, FlightKind::Departure);
        if let Some(strip) = &mut self.board.authorized_luaw {
          tracing::info!(flight = %id, "authorized line up and wait");
          strip.emit(Event::AuthorizedLineUpAndWait { traffic });
        }
      }
    }

    // Whatever remains queued (not just promoted out) gets told why.
    let reason = self.departure_hold_reason();
    for strip in &mut self.board.departures_line {
      strip.emit(Event::HoldShort { reason });
    }
  }

  fn departure_hold_reason(&self) -> DeclineReason {
    if self.board.cleared_to_land.is_some()
      || self.board.next_arrival_seconds() <= self.thresholds.takeoff_before_landing_min
    {
      DeclineReason::TrafficLanding
    } else if self.board.cleared_to_takeoff.is_some() {
      DeclineReason::TrafficDeparting
    } else if !self.board.crossing.is_empty() || !self.board.cleared_to_cross.is_empty()
    {
      DeclineReason::TrafficCrossing
    } else {
      DeclineReason::WaitInLine
    }
  }

  /// Phase 4: decide the fate of each taxiing flight requesting a crossing.
  fn advance_crossings(&mut self) {
    let candidates: Vec<Intern<String>> = self
      .board
      .crossings_line
      .iter()
      .map(|s| s.id)
      .collect();

    for id in candidates {
      if self.board.promote_to_cross(id, &self.thresholds) {
        let traffic =
          advisory::compose(&self.board, &self.end, id, FlightKind::Crossing);
        let immediate = !traffic.is_empty();
        if let Some(strip) =
          self.board.cleared_to_cross.iter_mut().find(|s| s.id == id)
        {
          tracing::info!(flight = %id, immediate, "cleared to cross");
          strip.emit(Event::ClearedToCross { immediate, traffic });
        }
      } else {
        let reason = if self.board.cleared_to_land.is_some()
          || self.board.next_arrival_seconds()
            <= self.thresholds.cross_before_landing_min
        {
          DeclineReason::TrafficLanding
        } else {
          DeclineReason::TrafficDeparting
        };
        if let Some(strip) =
          self.board.crossings_line.iter_mut().find(|s| s.id == id)
        {
          strip.emit(Event::HoldShort { reason });
        }
      }
    }
  }

  /// Phase 5: tell every not-yet-cleared arrival its current position.
  fn emit_continues(&mut self) {
    let end = self.end;
    let board_snapshot_ids: Vec<Intern<String>> = self
      .board
      .arrivals_line
      .iter()
      .map(|s| s.id)
      .collect();

    for (index, id) in board_snapshot_ids.into_iter().enumerate() {
      let number_in_line = (index + 1) as u32;
      let traffic = advisory::compose(&self.board, &end, id, FlightKind::Arrival);
      if let Some(strip) =
        self.board.arrivals_line.iter_mut().find(|s| s.id == id)
      {
        strip.emit(Event::Continue {
          number_in_line,
          traffic,
        });
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use glam::Vec2;
  use internment::Intern;

  use super::*;
  use crate::flight::Kinematics;

  #[derive(Debug, Clone, Default)]
  struct RecordingListener(Rc<RefCell<Vec<Event>>>);

  impl Listener for RecordingListener {
    fn send(&mut self, event: Event) {
      self.0.borrow_mut().push(event);
    }
  }

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

  fn arrival_at(id: &str, seconds_to_touchdown: f32) -> Flight {
    Flight::new(
      id,
      "A320",
      FlightKind::Arrival,
      Kinematics {
        pos: Vec2::new(0.0, -5000.0),
        altitude_agl_ft: (seconds_to_touchdown / 60.0) * 1000.0,
        ground_speed_kt: 140.0,
        vertical_speed_fpm: -1000.0,
        on_ground: false,
      },
    )
  }

  fn departure_ready(id: &str) -> Flight {
    Flight::new(
      id,
      "B738",
      FlightKind::Departure,
      Kinematics {
        pos: Vec2::new(-500.0, 0.0),
        altitude_agl_ft: 0.0,
        ground_speed_kt: 0.0,
        vertical_speed_fpm: 0.0,
        on_ground: true,
      },
    )
  }

  #[test]
  fn test_s1_vacated_runway_late_check_in() {
    let mut arbiter = Arbiter::new(end(), TimingThresholds::default());
    let listener = RecordingListener::default();
    let events = listener.0.clone();

    arbiter
      .check_in_arrival(arrival_at("F1", 89.0), Box::new(listener))
      .unwrap();

    assert_eq!(
      *events.borrow(),
      vec![Event::ClearedToLand {
        number_in_line: 1,
        traffic: vec![],
      }]
    );
  }

  #[test]
  fn test_s4_occupied_runway_forces_go_around() {
    let mut arbiter = Arbiter::new(end(), TimingThresholds::default());

    // F1 lands and is still rolling out on the runway (not yet vacated).
    arbiter
      .check_in_arrival(
        arrival_at("F1", 89.0),
        Box::new(RecordingListener::default()),
      )
      .unwrap();

    let listener = RecordingListener::default();
    let events = listener.0.clone();
    arbiter
      .check_in_arrival(arrival_at("F2", 14.0), Box::new(listener))
      .unwrap();

    assert_eq!(
      *events.borrow(),
      vec![Event::GoAround {
        reason: DeclineReason::RunwayNotVacated,
      }]
    );
  }

  #[test]
  fn test_double_check_in_errors() {
    let mut arbiter = Arbiter::new(end(), TimingThresholds::default());
    arbiter
      .check_in_arrival(
        arrival_at("F1", 200.0),
        Box::new(RecordingListener::default()),
      )
      .unwrap();

    let result = arbiter.check_in_arrival(
      arrival_at("F1", 200.0),
      Box::new(RecordingListener::default()),
    );
    assert_eq!(
      result,
      Err(ProgrammerError::DoubleCheckIn(Intern::from("F1".to_string())))
    );
  }

  #[test]
  fn test_nonmonotonic_timestamp_errors() {
    let mut arbiter = Arbiter::new(end(), TimingThresholds::default());
    arbiter.progress_to(10.0).unwrap();
    let result = arbiter.progress_to(5.0);
    assert_eq!(
      result,
      Err(ProgrammerError::NonMonotonicTimestamp {
        last: 10.0,
        given: 5.0
      })
    );
  }

  #[test]
  fn test_luaw_then_clear_for_takeoff() {
    let mut arbiter = Arbiter::new(end(), TimingThresholds::default());

    arbiter
      .check_in_arrival(
        arrival_at("F1", 120.0),
        Box::new(RecordingListener::default()),
      )
      .unwrap();

    let listener = RecordingListener::default();
    let events = listener.0.clone();
    arbiter
      .check_in_departure(departure_ready("F2"), Box::new(listener))
      .unwrap();

    assert!(matches!(
      events.borrow().last(),
      Some(Event::AuthorizedLineUpAndWait { .. })
    ));
  }

  #[test]
  fn test_fifo_fairness_for_departures() {
    let mut arbiter = Arbiter::new(end(), TimingThresholds::default());

    let a_listener = RecordingListener::default();
    let a_events = a_listener.0.clone();
    arbiter
      .check_in_departure(departure_ready("A"), Box::new(a_listener))
      .unwrap();

    let b_listener = RecordingListener::default();
    arbiter
      .check_in_departure(departure_ready("B"), Box::new(b_listener))
      .unwrap();

    assert!(matches!(
      a_events.borrow().last(),
      Some(Event::ClearedForTakeoff { .. })
    ));
  }
}
