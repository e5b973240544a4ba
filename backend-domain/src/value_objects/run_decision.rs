// Personal-best write decision

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunDecision {
    /// No record yet for the zone: store the observed time, zero included.
    InsertFirst,
    /// Stored best is the zero placeholder and a real time arrived.
    ReplacePlaceholder,
    /// Strict improvement; earlier bests stay as history.
    InsertImprovement,
    Skip,
}

impl RunDecision {
    pub fn writes(&self) -> bool {
        !matches!(self, RunDecision::Skip)
    }
}
