/// Run phase definitions for the batch harvester
///
/// A run moves `Idle -> (BatchRunning -> Checkpointing)* -> Done`.
use std::fmt;

/// Represents the current phase of a harvest run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    /// Candidates loaded, nothing dispatched yet
    Idle,

    /// A batch has been dispatched and is draining
    BatchRunning,

    /// A drained batch's aggregate is being written out
    Checkpointing,

    /// Every batch drained and checkpointed
    Done,
}

impl RunPhase {
    /// Returns true if the run may move from this phase to `next`
    pub fn can_transition_to(&self, next: RunPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::BatchRunning)
                | (Self::Idle, Self::Checkpointing)
                | (Self::BatchRunning, Self::Checkpointing)
                | (Self::Checkpointing, Self::BatchRunning)
                | (Self::Checkpointing, Self::Done)
        )
    }

    /// Returns true once the run has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::BatchRunning => "batch_running",
            Self::Checkpointing => "checkpointing",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
