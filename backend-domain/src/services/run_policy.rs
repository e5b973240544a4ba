// Run recorder policy
// Which write, if any, a freshly observed best time calls for.

use crate::value_objects::RunDecision;

pub fn decide_run(existing: Option<i64>, observed: i64) -> RunDecision {
    match existing {
        None => RunDecision::InsertFirst,
        Some(0) if observed > 0 => RunDecision::ReplacePlaceholder,
        Some(best) if observed > 0 && observed < best => RunDecision::InsertImprovement,
        Some(_) => RunDecision::Skip,
    }
}
