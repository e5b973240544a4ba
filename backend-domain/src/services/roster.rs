// Roster reconciliation helpers

use std::collections::BTreeSet;

use crate::entities::PlayerRecord;

/// Distinct identities of this cycle's roster in first-seen order.
pub fn roster_identities(players: &[PlayerRecord]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    players
        .iter()
        .filter(|player| seen.insert(player.identity.as_str()))
        .map(|player| player.identity.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(identity: &str) -> PlayerRecord {
        PlayerRecord {
            identity: identity.to_string(),
            ..PlayerRecord::default()
        }
    }

    #[test]
    fn keeps_first_seen_order() {
        let players = vec![player("b"), player("a"), player("b")];
        assert_eq!(roster_identities(&players), vec!["b".to_string(), "a".to_string()]);
    }
}
