use thiserror::Error;

use crate::search::classifier::PropagationOutcome;
use crate::search::SearchPhase;
use crate::tle::ParseTleError;

#[derive(Error, Debug)]
pub enum OrbitFinderError {
    #[error("Error during the TLE parsing: {0}")]
    TleParsing(ParseTleError),

    #[error("Invalid TLE epoch: {0}")]
    InvalidTleEpoch(String),

    #[error("Invalid search target: {0}")]
    InvalidTarget(String),

    #[error("Invalid orbit finder parameter: {0}")]
    InvalidFinderParameter(String),

    #[error("Propagator rejected the element set: {0}")]
    PropagatorInit(String),

    #[error("Failed to find a solution for {phase}: propagation produced a non-finite position")]
    PropagationBreakdown { phase: SearchPhase },

    #[error(
        "Failed to find a solution for {phase}: sweep exhausted after {samples} propagations (last outcome: {last})"
    )]
    SweepExhausted {
        phase: SearchPhase,
        last: PropagationOutcome,
        samples: usize,
    },
}

impl OrbitFinderError {
    /// The search phase that failed, if the error comes from one of the sweeps.
    pub fn phase(&self) -> Option<SearchPhase> {
        match self {
            OrbitFinderError::PropagationBreakdown { phase }
            | OrbitFinderError::SweepExhausted { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

impl From<ParseTleError> for OrbitFinderError {
    fn from(err: ParseTleError) -> Self {
        OrbitFinderError::TleParsing(err)
    }
}

impl PartialEq for OrbitFinderError {
    fn eq(&self, other: &Self) -> bool {
        use OrbitFinderError::*;
        match (self, other) {
            (TleParsing(a), TleParsing(b)) => a == b,
            (InvalidTleEpoch(a), InvalidTleEpoch(b)) => a == b,
            (InvalidTarget(a), InvalidTarget(b)) => a == b,
            (InvalidFinderParameter(a), InvalidFinderParameter(b)) => a == b,

            // propagator messages come from a foreign crate: equal if same variant
            (PropagatorInit(_), PropagatorInit(_)) => true,

            (PropagationBreakdown { phase: a }, PropagationBreakdown { phase: b }) => a == b,
            (
                SweepExhausted {
                    phase: pa,
                    last: la,
                    samples: sa,
                },
                SweepExhausted {
                    phase: pb,
                    last: lb,
                    samples: sb,
                },
            ) => pa == pb && la == lb && sa == sb,

            _ => false,
        }
    }
}
