//! Worker lifecycle state

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// State of a stream worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Loop is running and reads are succeeding (or have not failed enough)
    Running,
    /// Consecutive read failures crossed the configured threshold; the loop
    /// keeps retrying and returns to `Running` on the next good read
    Degraded,
    /// Loop has been told to stop or has exited
    Stopped,
}

impl WorkerState {
    fn as_u8(self) -> u8 {
        match self {
            WorkerState::Running => 0,
            WorkerState::Degraded => 1,
            WorkerState::Stopped => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => WorkerState::Running,
            1 => WorkerState::Degraded,
            _ => WorkerState::Stopped,
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkerState::Running => "running",
            WorkerState::Degraded => "degraded",
            WorkerState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Lock-free cell holding a [`WorkerState`]
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new(state: WorkerState) -> Self {
        Self(AtomicU8::new(state.as_u8()))
    }

    pub(crate) fn get(&self) -> WorkerState {
        WorkerState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: WorkerState) {
        self.0.store(state.as_u8(), Ordering::Release);
    }

    /// Move from `from` to `to`; false if the current state was not `from`
    pub(crate) fn transition(&self, from: WorkerState, to: WorkerState) -> bool {
        self.0
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_round_trips_states() {
        let cell = StateCell::new(WorkerState::Running);
        assert_eq!(cell.get(), WorkerState::Running);

        cell.set(WorkerState::Degraded);
        assert_eq!(cell.get(), WorkerState::Degraded);
    }

    #[test]
    fn test_transition_requires_expected_state() {
        let cell = StateCell::new(WorkerState::Stopped);

        // A stopped worker never becomes degraded
        assert!(!cell.transition(WorkerState::Running, WorkerState::Degraded));
        assert_eq!(cell.get(), WorkerState::Stopped);

        cell.set(WorkerState::Running);
        assert!(cell.transition(WorkerState::Running, WorkerState::Degraded));
        assert_eq!(cell.get(), WorkerState::Degraded);
    }

    #[test]
    fn test_display() {
        assert_eq!(WorkerState::Degraded.to_string(), "degraded");
    }
}
