// Chat extractor
// Pulls `say;` lines out of the gameplay stream.

use std::collections::HashMap;

use crate::entities::ChatMessage;
use crate::utils::sha256_hex;
use crate::value_objects::{ChatKind, FingerprintMode};

#[derive(Debug, Default)]
pub struct ChatOutput {
    pub messages: Vec<ChatMessage>,
    pub rejected: usize,
}

pub struct ChatExtractor<'a> {
    now: i64,
    mode: FingerprintMode,
    in_server: String,
    session_identities: &'a HashMap<String, String>,
    line_number: usize,
    second_line: Option<String>,
    previous_line: Option<String>,
    output: ChatOutput,
}

impl<'a> ChatExtractor<'a> {
    pub fn new(
        now: i64,
        mode: FingerprintMode,
        roster_identities: &[String],
        session_identities: &'a HashMap<String, String>,
    ) -> Self {
        Self {
            now,
            mode,
            in_server: roster_identities.join(" ").trim().to_string(),
            session_identities,
            line_number: 0,
            second_line: None,
            previous_line: None,
            output: ChatOutput::default(),
        }
    }

    pub fn feed_line(&mut self, line: &str) {
        self.line_number += 1;
        if self.line_number == 2 {
            self.second_line = Some(line.to_string());
        }

        if let Some(kind) = ChatKind::detect(line) {
            match parse_chat_fields(line) {
                Some((session_key, name, message)) => {
                    let context = match self.mode {
                        FingerprintMode::SecondLine => self.second_line.as_deref(),
                        FingerprintMode::PrecedingLine => self.previous_line.as_deref(),
                    }
                    .unwrap_or("");
                    let hash = sha256_hex(&format!("{line}{context}"));
                    // Offsetting by the number already emitted keeps timestamps unique.
                    let occurred = self.now + self.output.messages.len() as i64;
                    let identity = self.session_identities.get(&session_key).cloned();
                    self.output.messages.push(ChatMessage {
                        message,
                        session_key,
                        identity,
                        name,
                        occurred,
                        in_server: self.in_server.clone(),
                        kind,
                        hash,
                    });
                }
                None => self.output.rejected += 1,
            }
        }

        self.previous_line = Some(line.to_string());
    }

    pub fn scan<I, S>(mut self, lines: I) -> ChatOutput
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.feed_line(line.as_ref());
        }
        self.finish()
    }

    pub fn finish(self) -> ChatOutput {
        self.output
    }
}

/// Returns (session key, name, message) from `<prefix>;<key>;<slot>;<name>;<message>`.
pub fn parse_chat_fields(line: &str) -> Option<(String, String, String)> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() < 4 {
        return None;
    }
    let prefix_len: usize = fields[..4].iter().map(|field| field.len() + 1).sum();
    let body = line.get(prefix_len..).unwrap_or("").trim();
    Some((
        fields[1].to_string(),
        fields[3].to_string(),
        strip_leading_marker(body).to_string(),
    ))
}

fn strip_leading_marker(body: &str) -> &str {
    let mut chars = body.chars();
    match chars.next() {
        Some(first) if !first.is_ascii_alphanumeric() && chars.next().is_some() => {
            &body[first.len_utf8()..]
        }
        _ => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(lines: &[&str], mode: FingerprintMode) -> ChatOutput {
        let identities = HashMap::from([("abc".to_string(), "b-abc".to_string())]);
        let roster = vec!["b-abc".to_string(), "b-eve".to_string()];
        ChatExtractor::new(1_000, mode, &roster, &identities).scan(lines.iter().copied())
    }

    #[test]
    fn extracts_say_line() {
        let output = extract(&["header", "12:00 say;abc;1;Bob;!Hello there"], FingerprintMode::SecondLine);
        assert_eq!(output.messages.len(), 1);
        let message = &output.messages[0];
        assert_eq!(message.message, "Hello there");
        assert_eq!(message.session_key, "abc");
        assert_eq!(message.identity.as_deref(), Some("b-abc"));
        assert_eq!(message.name, "Bob");
        assert_eq!(message.kind, ChatKind::Say);
        assert_eq!(message.in_server, "b-abc b-eve");
    }

    #[test]
    fn classifies_team_and_special() {
        let output = extract(
            &[
                "1:00 say_team;abc;1;Bob;gg",
                "1:01 say_special;zzz;2;Eve;hi",
            ],
            FingerprintMode::SecondLine,
        );
        assert_eq!(output.messages[0].kind, ChatKind::SayTeam);
        assert_eq!(output.messages[1].kind, ChatKind::SaySpecial);
        assert_eq!(output.messages[1].identity, None);
    }

    #[test]
    fn keeps_single_character_bodies() {
        assert_eq!(parse_chat_fields("say;a;1;B;?").map(|f| f.2), Some("?".to_string()));
        assert_eq!(parse_chat_fields("say;a;1;B;").map(|f| f.2), Some(String::new()));
        assert_eq!(parse_chat_fields("say;a;1;B").map(|f| f.2), Some(String::new()));
        assert_eq!(parse_chat_fields("say;a;1;B;x;y").map(|f| f.2), Some("x;y".to_string()));
        assert!(parse_chat_fields("say;a;1").is_none());
    }

    #[test]
    fn timestamps_increase_within_a_cycle() {
        let output = extract(
            &["say;a;1;A;one", "say;a;1;A;two", "say;a;1;A;three"],
            FingerprintMode::SecondLine,
        );
        let occurred: Vec<i64> = output.messages.iter().map(|m| m.occurred).collect();
        assert_eq!(occurred, vec![1_000, 1_001, 1_002]);
    }

    #[test]
    fn second_line_fingerprint_matches_reprocessed_file() {
        let lines = ["start", "0:00 InitGame", "1:00 say;a;1;A;hi", "1:01 say;a;1;A;hi"];
        let first = extract(&lines, FingerprintMode::SecondLine);
        let second = extract(&lines, FingerprintMode::SecondLine);
        let hashes: Vec<&str> = first.messages.iter().map(|m| m.hash.as_str()).collect();
        assert_eq!(
            hashes,
            second.messages.iter().map(|m| m.hash.as_str()).collect::<Vec<_>>()
        );
        assert_ne!(hashes[0], hashes[1]);
        assert_eq!(hashes[0], sha256_hex("1:00 say;a;1;A;hi0:00 InitGame"));
    }

    #[test]
    fn preceding_line_fingerprint_uses_previous_line() {
        let lines = ["start", "1:00 say;a;1;A;hi", "1:00 say;a;1;A;hi"];
        let output = extract(&lines, FingerprintMode::PrecedingLine);
        assert_eq!(output.messages[0].hash, sha256_hex("1:00 say;a;1;A;histart"));
        assert_eq!(
            output.messages[1].hash,
            sha256_hex("1:00 say;a;1;A;hi1:00 say;a;1;A;hi")
        );
    }

    #[test]
    fn rejects_chat_lines_without_fields() {
        let output = extract(&["say;broken"], FingerprintMode::SecondLine);
        assert!(output.messages.is_empty());
        assert_eq!(output.rejected, 1);
    }
}
