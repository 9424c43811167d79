//! Error types raised while stepping a Wator world.
//!
//! Configuration errors live with the configuration in `wator-engine`;
//! this module only covers what can go wrong once a world is running.

use std::error::Error;
use std::fmt;

use crate::animal::Species;
use crate::id::Position;

/// An internal-consistency violation detected during the update phase.
///
/// Any of these means the locking or scheduling discipline was broken.
/// They are fatal: the step is aborted and the world refuses to continue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsistencyFault {
    /// An animal was evaluated a second time before the commit phase.
    DoubleMove {
        /// Cell the animal occupied when the second evaluation began.
        at: Position,
        /// Species of the offending animal.
        species: Species,
    },
    /// A move or spawn targeted a cell that was not free (and did not
    /// hold the prey being eaten).
    OccupiedTarget {
        /// Cell of the moving or spawning animal.
        from: Position,
        /// Cell that was expected to be free.
        to: Position,
    },
    /// The scheduled cell lost its occupant while it was being evaluated.
    MissingAnimal {
        /// Cell that should have held the animal.
        at: Position,
    },
}

impl fmt::Display for ConsistencyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DoubleMove { at, species } => {
                write!(f, "{} at {at} evaluated twice in one step", species.name())
            }
            Self::OccupiedTarget { from, to } => {
                write!(f, "move from {from} targeted occupied cell {to}")
            }
            Self::MissingAnimal { at } => write!(f, "no animal at {at} during evaluation"),
        }
    }
}

impl Error for ConsistencyFault {}

/// Errors from `execute_step()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// The update phase detected a consistency fault. The grid may have
    /// been partially mutated before the fault was noticed.
    Consistency(ConsistencyFault),
    /// A previous step failed; the world no longer executes steps.
    Halted,
    /// A worker thread panicked during the update or commit phase.
    WorkerPanicked,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Consistency(fault) => write!(f, "consistency fault: {fault}"),
            Self::Halted => write!(f, "world halted after an earlier fault"),
            Self::WorkerPanicked => write!(f, "step worker panicked"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Consistency(fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<ConsistencyFault> for StepError {
    fn from(fault: ConsistencyFault) -> Self {
        Self::Consistency(fault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_error_wraps_fault_as_source() {
        let fault = ConsistencyFault::MissingAnimal {
            at: Position::new(4, 2),
        };
        let err: StepError = fault.clone().into();
        assert_eq!(err, StepError::Consistency(fault));
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "consistency fault: no animal at (4, 2) during evaluation"
        );
    }

    #[test]
    fn halted_has_no_source() {
        assert!(StepError::Halted.source().is_none());
    }
}
