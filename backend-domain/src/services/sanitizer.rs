// Record sanitizer
// Turns the single-quoted dict text the game script prints into strict JSON.

use serde_json::Value;

use crate::error::RecordError;

/// Backslash escapes are left as written; serde_json rejects the ones JSON lacks.
pub fn sanitize_record(line: &str) -> String {
    line.chars()
        .filter(|ch| !('\u{0}'..='\u{1f}').contains(ch))
        .map(|ch| if ch == '\'' { '"' } else { ch })
        .collect()
}

pub fn parse_record(line: &str) -> Result<Value, RecordError> {
    let sanitized = sanitize_record(line);
    let value: Value = serde_json::from_str(&sanitized)?;
    if !value.is_object() {
        return Err(RecordError::NotAnObject);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_single_quotes() {
        let value = parse_record("{'guid': 'abc', 'berries': '10'}").expect("record");
        assert_eq!(value["guid"], "abc");
        assert_eq!(value["berries"], "10");
    }

    #[test]
    fn strips_control_characters() {
        let value = parse_record("{'name': 'Bo\u{1}b\u{1f}', 'x': '1'}\r").expect("record");
        assert_eq!(value["name"], "Bob");
    }

    #[test]
    fn escaped_quote_survives_conversion() {
        assert_eq!(sanitize_record(r"{'motto': 'it\'s'}"), r#"{"motto": "it\"s"}"#);
        let value = parse_record(r"{'motto': 'it\'s'}").expect("record");
        assert_eq!(value["motto"], "it\"s");
    }

    #[test]
    fn keeps_json_escapes_intact() {
        let value = parse_record(r"{'guid': 'abc', 'name': 'Jos\u00e9', 'path': 'a\/b\n'}").expect("record");
        assert_eq!(value["name"], "José");
        assert_eq!(value["path"], "a/b\n");
        let value = parse_record(r"{'dir': 'C:\\maps'}").expect("record");
        assert_eq!(value["dir"], "C:\\maps");
    }

    #[test]
    fn rejects_escapes_json_lacks() {
        assert!(parse_record(r"{'guid': 'abc', 'name': 'a\xb'}").is_err());
        assert!(parse_record(r"{'guid': 'abc', 'name': 'x\&y'}").is_err());
        assert!(parse_record(r"{'guid': 'abc', 'name': 'tail\").is_err());
    }

    #[test]
    fn rejects_broken_lines() {
        assert!(parse_record("{'guid': 'abc', 'name': 'O'Brien'}").is_err());
        assert!(parse_record("{'guid': 'abc'").is_err());
        assert!(matches!(parse_record("'just text'"), Err(RecordError::NotAnObject)));
    }
}
