// Capture state machine
// Finds the player and run dumps the game script prints between tag lines.

use std::collections::HashMap;

use crate::entities::{PlayerRecord, RecordSchema, ServerRunEvent};
use crate::services::sanitizer::parse_record;

pub const PLAYER_OPEN_TAG: &str = "[playerinfojson]";
pub const PLAYER_CLOSE_TAG: &str = "[/playerinfojson]";
pub const RUN_OPEN_TAG: &str = "[runinfojson]";
pub const RUN_CLOSE_TAG: &str = "[/runinfojson]";
pub const RUN_PREFIX: &str = "{'uniqId': '";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Player,
    Run,
}

#[derive(Debug, Clone)]
pub struct CaptureFailure {
    pub kind: RecordKind,
    pub line_number: usize,
    pub reason: String,
    pub line: String,
}

#[derive(Debug, Default)]
pub struct CaptureOutput {
    pub players: Vec<PlayerRecord>,
    pub runs: Vec<ServerRunEvent>,
    pub failures: Vec<CaptureFailure>,
    /// Session key -> identity for every player parsed in this scan.
    pub session_identities: HashMap<String, String>,
}

impl CaptureOutput {
    pub fn failures_of(&self, kind: RecordKind) -> usize {
        self.failures.iter().filter(|failure| failure.kind == kind).count()
    }
}

/// Scan state for one stream in one cycle.
///
/// The two capture flags are independent. Entering a player block moves the
/// current roster into the carry-forward source and starts a new one;
/// closing a block only lowers the flag.
pub struct CaptureStateMachine<'a> {
    schema: &'a RecordSchema,
    player_prefix: String,
    players_enabled: bool,
    occurred: i64,
    capture_players: bool,
    capture_runs: bool,
    line_number: usize,
    roster: Vec<PlayerRecord>,
    carry_forward: Vec<PlayerRecord>,
    seed: Option<Vec<PlayerRecord>>,
    output: CaptureOutput,
}

impl<'a> CaptureStateMachine<'a> {
    /// `previous_roster` is the carry-forward source of the first player block.
    pub fn new(schema: &'a RecordSchema, occurred: i64, previous_roster: Vec<PlayerRecord>) -> Self {
        Self {
            schema,
            player_prefix: schema.player_prefix(),
            players_enabled: true,
            occurred,
            capture_players: false,
            capture_runs: false,
            line_number: 0,
            roster: Vec::new(),
            carry_forward: Vec::new(),
            seed: Some(previous_roster),
            output: CaptureOutput::default(),
        }
    }

    /// Variant for streams that only carry run dumps.
    pub fn runs_only(schema: &'a RecordSchema, occurred: i64) -> Self {
        let mut machine = Self::new(schema, occurred, Vec::new());
        machine.players_enabled = false;
        machine
    }

    pub fn feed_line(&mut self, line: &str) {
        self.line_number += 1;

        if self.capture_players && line.starts_with(&self.player_prefix) {
            self.capture_player(line);
        }
        if self.capture_runs && line.starts_with(RUN_PREFIX) {
            self.capture_run(line);
        }

        if line.contains(PLAYER_OPEN_TAG) {
            if self.players_enabled {
                self.capture_players = true;
                let previous = std::mem::take(&mut self.roster);
                self.carry_forward = match self.seed.take() {
                    Some(seed) => seed,
                    None => previous,
                };
            }
        } else if line.contains(PLAYER_CLOSE_TAG) {
            self.capture_players = false;
        }

        if line.contains(RUN_OPEN_TAG) {
            self.capture_runs = true;
        } else if line.contains(RUN_CLOSE_TAG) {
            self.capture_runs = false;
        }
    }

    pub fn scan<I, S>(mut self, lines: I) -> CaptureOutput
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.feed_line(line.as_ref());
        }
        self.finish()
    }

    pub fn finish(mut self) -> CaptureOutput {
        self.output.players = self.roster;
        self.output
    }

    fn capture_player(&mut self, line: &str) {
        let parsed = parse_record(line)
            .and_then(|value| PlayerRecord::from_value(value, self.schema));
        match parsed {
            Ok(player) => {
                if let Some(session_key) = &player.session_key {
                    self.output
                        .session_identities
                        .insert(session_key.clone(), player.identity.clone());
                }
                match self
                    .roster
                    .iter_mut()
                    .find(|existing| existing.identity == player.identity)
                {
                    Some(existing) => *existing = player,
                    None => self.roster.push(player),
                }
            }
            Err(err) => {
                self.record_failure(RecordKind::Player, err.to_string(), line);
                for previous in &self.carry_forward {
                    let present = self
                        .roster
                        .iter()
                        .any(|player| player.identity == previous.identity);
                    if !present {
                        self.roster.push(previous.clone());
                    }
                }
            }
        }
    }

    fn capture_run(&mut self, line: &str) {
        let parsed = parse_record(line).and_then(|value| {
            ServerRunEvent::from_value(value, &self.schema.identity_field, self.occurred)
        });
        match parsed {
            Ok(run) => self.output.runs.push(run),
            Err(err) => self.record_failure(RecordKind::Run, err.to_string(), line),
        }
    }

    fn record_failure(&mut self, kind: RecordKind, reason: String, line: &str) {
        self.output.failures.push(CaptureFailure {
            kind,
            line_number: self.line_number,
            reason,
            line: line.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guid_schema() -> RecordSchema {
        RecordSchema {
            identity_field: "guid".to_string(),
            session_key_field: "guid".to_string(),
            zones: vec!["easy".to_string(), "hard".to_string()],
        }
    }

    fn identities(players: &[PlayerRecord]) -> Vec<&str> {
        players.iter().map(|player| player.identity.as_str()).collect()
    }

    #[test]
    fn captures_player_between_tags() {
        let schema = guid_schema();
        let lines = [
            "0:00 [playerinfojson]",
            "{'guid': 'abc', 'berries': '10', 'name': 'Bob'}",
            "0:00 [/playerinfojson]",
        ];
        let output = CaptureStateMachine::new(&schema, 1_000, Vec::new()).scan(lines);
        assert_eq!(output.players.len(), 1);
        assert_eq!(output.players[0].identity, "abc");
        assert_eq!(output.players[0].stats.berries, 10);
        assert!(output.failures.is_empty());
    }

    #[test]
    fn ignores_records_outside_of_tags() {
        let schema = guid_schema();
        let lines = [
            "{'guid': 'early'}",
            "[playerinfojson]",
            "[/playerinfojson]",
            "{'guid': 'late'}",
        ];
        let output = CaptureStateMachine::new(&schema, 0, Vec::new()).scan(lines);
        assert!(output.players.is_empty());
    }

    #[test]
    fn new_block_replaces_roster() {
        let schema = guid_schema();
        let lines = [
            "[playerinfojson]",
            "{'guid': 'a'}",
            "{'guid': 'b'}",
            "[/playerinfojson]",
            "[playerinfojson]",
            "{'guid': 'c'}",
            "[/playerinfojson]",
        ];
        let output = CaptureStateMachine::new(&schema, 0, Vec::new()).scan(lines);
        assert_eq!(identities(&output.players), vec!["c"]);
    }

    #[test]
    fn malformed_line_carries_previous_block_forward() {
        let schema = guid_schema();
        let lines = [
            "[playerinfojson]",
            "{'guid': 'a', 'name': 'first'}",
            "{'guid': 'b'}",
            "[/playerinfojson]",
            "[playerinfojson]",
            "{'guid': 'a', 'name': 'second'}",
            "{'guid': 'c', 'name': 'O'Brien'}",
            "[/playerinfojson]",
        ];
        let output = CaptureStateMachine::new(&schema, 0, Vec::new()).scan(lines);
        assert_eq!(identities(&output.players), vec!["a", "b"]);
        assert_eq!(output.players[0].name, "second");
        assert_eq!(output.failures_of(RecordKind::Player), 1);
        assert_eq!(output.failures[0].line_number, 7);
    }

    #[test]
    fn first_block_carries_previous_cycle_roster() {
        let schema = guid_schema();
        let seed = CaptureStateMachine::new(&schema, 0, Vec::new())
            .scan(["[playerinfojson]", "{'guid': 'x'}", "{'guid': 'y'}"])
            .players;
        let lines = ["[playerinfojson]", "{'guid': 'broken", "[/playerinfojson]"];
        let output = CaptureStateMachine::new(&schema, 0, seed).scan(lines);
        assert_eq!(identities(&output.players), vec!["x", "y"]);
    }

    #[test]
    fn flags_interleave_independently() {
        let schema = guid_schema();
        let lines = [
            "[runinfojson]",
            "[playerinfojson]",
            "{'uniqId': 'r1', 'guid': 'a', 'zone': 'easy', 'time': '1500'}",
            "{'guid': 'a'}",
            "[/runinfojson]",
            "{'uniqId': 'r2', 'guid': 'a', 'zone': 'easy', 'time': '1400'}",
            "{'guid': 'b'}",
            "[/playerinfojson]",
        ];
        let output = CaptureStateMachine::new(&schema, 42, Vec::new()).scan(lines);
        assert_eq!(output.runs.len(), 1);
        assert_eq!(output.runs[0].uniq_id, "r1");
        assert_eq!(output.runs[0].time, 1500);
        assert_eq!(output.runs[0].occurred, 42);
        assert_eq!(identities(&output.players), vec!["a", "b"]);
    }

    #[test]
    fn malformed_run_is_dropped() {
        let schema = guid_schema();
        let lines = ["[runinfojson]", "{'uniqId': 'r1', 'time': }", "[/runinfojson]"];
        let output = CaptureStateMachine::new(&schema, 0, Vec::new()).scan(lines);
        assert!(output.runs.is_empty());
        assert_eq!(output.failures_of(RecordKind::Run), 1);
        assert!(output.players.is_empty());
    }

    #[test]
    fn runs_only_ignores_player_blocks() {
        let schema = guid_schema();
        let lines = ["[playerinfojson]", "{'guid': 'a'}", "[/playerinfojson]"];
        let output = CaptureStateMachine::runs_only(&schema, 0).scan(lines);
        assert!(output.players.is_empty());
    }

    #[test]
    fn maps_session_keys_to_identities() {
        let schema = RecordSchema::default();
        let lines = [
            "[playerinfojson]",
            "{'buid': 'b1', 'guid': 'g1'}",
            "[/playerinfojson]",
        ];
        let output = CaptureStateMachine::new(&schema, 0, Vec::new()).scan(lines);
        assert_eq!(output.session_identities.get("g1").map(String::as_str), Some("b1"));
    }
}
