//! C3: Runway strip board. A fixed set of slots holding every strip known
//! to one arbiter, grouped by role, plus a small bitset of runway state.

use bitflags::bitflags;
use internment::Intern;

use crate::{
  kinematics::seconds_to_touchdown, strip::FlightStrip,
  thresholds::{RWY_INFINITY, TimingThresholds},
};

bitflags! {
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
  pub struct RunwayFlags: u8 {
    const VACATED          = 0b0000_0001;
    const CLEARED_LANDING   = 0b0000_0010;
    const CLEARED_TAKEOFF   = 0b0000_0100;
    const CLEARED_CROSSING  = 0b0000_1000;
    const AUTHORIZED_LUAW   = 0b0001_0000;
  }
}

#[derive(Debug, Default)]
pub struct RunwayStripBoard {
  pub arrivals_line: Vec<FlightStrip>,
  pub departures_line: Vec<FlightStrip>,
  pub crossings_line: Vec<FlightStrip>,
  pub cleared_to_land: Option<FlightStrip>,
  pub cleared_to_takeoff: Option<FlightStrip>,
  pub authorized_luaw: Option<FlightStrip>,
  pub cleared_to_cross: Vec<FlightStrip>,
  pub crossing: Vec<FlightStrip>,
  pub flags: RunwayFlags,
}

impl RunwayStripBoard {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends to `arrivals_line`, sorted by seconds-to-touchdown ascending;
  /// ties keep insertion order (stable sort with the new strip pushed last).
  pub fn insert_arrival(&mut self, strip: FlightStrip) {
    self.arrivals_line.push(strip);
    self.arrivals_line.sort_by(|a, b| {
      seconds_to_touchdown(&a.flight())
        .partial_cmp(&seconds_to_touchdown(&b.flight()))
        .unwrap_or(std::cmp::Ordering::Equal)
    });
  }

  pub fn insert_departure(&mut self, strip: FlightStrip) {
    self.departures_line.push(strip);
  }

  pub fn insert_crossing(&mut self, strip: FlightStrip) {
    self.crossings_line.push(strip);
  }

  /// Seconds-to-touchdown of the closest arrival still in line, or
  /// `RWY_INFINITY` if none are checked in.
  pub fn next_arrival_seconds(&self) -> f32 {
    self
      .arrivals_line
      .first()
      .map(|s| seconds_to_touchdown(&s.flight()))
      .unwrap_or(RWY_INFINITY)
  }

  fn find_arrival_index(&self, id: Intern<String>) -> Option<usize> {
    self.arrivals_line.iter().position(|s| s.id == id)
  }

  fn find_departure_index(&self, id: Intern<String>) -> Option<usize> {
    self.departures_line.iter().position(|s| s.id == id)
  }

  fn find_crossing_index(&self, id: Intern<String>) -> Option<usize> {
    self.crossings_line.iter().position(|s| s.id == id)
  }

  /// Whether `id` is the arbiter's current LUAW or takeoff-line departure.
  fn is_luaw(&self, id: Intern<String>) -> bool {
    self
      .authorized_luaw
      .as_ref()
      .is_some_and(|s| s.id == id)
  }

  pub fn promote_to_land(&mut self, id: Intern<String>) -> bool {
    if self.cleared_to_land.is_some()
      || self.cleared_to_takeoff.is_some()
      || !self.crossing.is_empty()
      || self.authorized_luaw.is_some()
    {
      return false;
    }
    let Some(index) = self.find_arrival_index(id) else {
      return false;
    };
    let strip = self.arrivals_line.remove(index);
    self.cleared_to_land = Some(strip);
    self.flags.insert(RunwayFlags::CLEARED_LANDING);
    true
  }

  pub fn promote_to_takeoff(
    &mut self,
    id: Intern<String>,
    thresholds: &TimingThresholds,
  ) -> bool {
    if self.cleared_to_land.is_some() || !self.crossing.is_empty() {
      return false;
    }
    if self.next_arrival_seconds() <= thresholds.takeoff_before_landing_min {
      return false;
    }
    let strip = if self.is_luaw(id) {
      self.authorized_luaw.take().unwrap()
    } else if let Some(index) = self.find_departure_index(id) {
      self.departures_line.remove(index)
    } else {
      return false;
    };
    self.flags.remove(RunwayFlags::AUTHORIZED_LUAW);
    self.cleared_to_takeoff = Some(strip);
    self.flags.insert(RunwayFlags::CLEARED_TAKEOFF);
    true
  }

  /// Lining up on the runway is permitted alongside an active crossing;
  /// only the later release to takeoff must wait for the runway to clear.
  pub fn promote_to_luaw(
    &mut self,
    id: Intern<String>,
    thresholds: &TimingThresholds,
  ) -> bool {
    if self.cleared_to_land.is_some()
      || self.authorized_luaw.is_some()
      || self.cleared_to_takeoff.is_some()
    {
      return false;
    }
    if self.next_arrival_seconds() <= thresholds.luaw_auth_before_landing_min {
      return false;
    }
    let Some(index) = self.find_departure_index(id) else {
      return false;
    };
    let strip = self.departures_line.remove(index);
    self.authorized_luaw = Some(strip);
    self.flags.insert(RunwayFlags::AUTHORIZED_LUAW);
    true
  }

  pub fn promote_to_cross(
    &mut self,
    id: Intern<String>,
    thresholds: &TimingThresholds,
  ) -> bool {
    if self.cleared_to_land.is_some() || self.cleared_to_takeoff.is_some() {
      return false;
    }
    if self.next_arrival_seconds() <= thresholds.cross_before_landing_min {
      return false;
    }
    let Some(index) = self.find_crossing_index(id) else {
      return false;
    };
    let strip = self.crossings_line.remove(index);
    self.cleared_to_cross.push(strip);
    self.flags.insert(RunwayFlags::CLEARED_CROSSING);
    true
  }

  /// Moves a strip from `cleared_to_cross` into `crossing` once its
  /// aircraft has actually entered the runway strip.
  pub fn mark_entered_crossing(&mut self, id: Intern<String>) -> bool {
    let Some(index) =
      self.cleared_to_cross.iter().position(|s| s.id == id)
    else {
      return false;
    };
    let strip = self.cleared_to_cross.remove(index);
    self.crossing.push(strip);
    true
  }

  /// Removes a strip from every collection it could be in and clears the
  /// flags that referred solely to it.
  pub fn retire(&mut self, id: Intern<String>) -> Option<FlightStrip> {
    if let Some(index) = self.find_arrival_index(id) {
      return Some(self.arrivals_line.remove(index));
    }
    if let Some(index) = self.find_departure_index(id) {
      return Some(self.departures_line.remove(index));
    }
    if let Some(index) = self.find_crossing_index(id) {
      return Some(self.crossings_line.remove(index));
    }
    if self
      .cleared_to_land
      .as_ref()
      .is_some_and(|s| s.id == id)
    {
      self.flags.remove(RunwayFlags::CLEARED_LANDING);
      self.flags.insert(RunwayFlags::VACATED);
      return self.cleared_to_land.take();
    }
    if self
      .cleared_to_takeoff
      .as_ref()
      .is_some_and(|s| s.id == id)
    {
      self.flags.remove(RunwayFlags::CLEARED_TAKEOFF);
      self.flags.insert(RunwayFlags::VACATED);
      return self.cleared_to_takeoff.take();
    }
    if self.is_luaw(id) {
      self.flags.remove(RunwayFlags::AUTHORIZED_LUAW);
      return self.authorized_luaw.take();
    }
    if let Some(index) =
      self.cleared_to_cross.iter().position(|s| s.id == id)
    {
      let strip = self.cleared_to_cross.remove(index);
      if self.cleared_to_cross.is_empty() && self.crossing.is_empty() {
        self.flags.remove(RunwayFlags::CLEARED_CROSSING);
      }
      return Some(strip);
    }
    if let Some(index) = self.crossing.iter().position(|s| s.id == id) {
      let strip = self.crossing.remove(index);
      if self.cleared_to_cross.is_empty() && self.crossing.is_empty() {
        self.flags.remove(RunwayFlags::CLEARED_CROSSING);
        self.flags.insert(RunwayFlags::VACATED);
      }
      return Some(strip);
    }
    None
  }
}
