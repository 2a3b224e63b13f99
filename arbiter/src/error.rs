use internment::Intern;
use thiserror::Error;

/// Fail-loudly errors per spec §7: programmer mistakes at the call site,
/// never domain declines. Callers are expected to fix the offending call,
/// not recover from it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProgrammerError {
  #[error("arbiter call re-entered while another call was in progress")]
  ReentrantCall,

  #[error("progress_to called with timestamp {given} behind last tick {last}")]
  NonMonotonicTimestamp { last: f32, given: f32 },

  #[error("flight {0} is already checked in with this arbiter")]
  DoubleCheckIn(Intern<String>),
}
