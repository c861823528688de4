//! Pulls a `{"command": "..."}` object out of a free-text model response.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::debug;

/// First `{` to last `}` on a single line.
static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{.*\}").expect("JSON object pattern is valid"));

#[derive(Deserialize)]
struct CommandResponse {
    command: String,
}

/// The command the model proposed, or `None` if the response has no usable
/// JSON object with a string `command` field.
pub fn extract_command(response: &str) -> Option<String> {
    let Some(found) = JSON_OBJECT.find(response) else {
        debug!("no JSON object in model response");
        return None;
    };

    match serde_json::from_str::<CommandResponse>(found.as_str()) {
        Ok(parsed) => Some(parsed.command),
        Err(err) => {
            debug!(%err, candidate = found.as_str(), "model response is not a command object");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_object() {
        assert_eq!(
            extract_command(r#"{"command": "ls -la"}"#).as_deref(),
            Some("ls -la")
        );
    }

    #[test]
    fn test_object_surrounded_by_prose() {
        let response = "Sure! Here you go:\n{\"command\": \"df -h\"}\nLet me know.";
        assert_eq!(extract_command(response).as_deref(), Some("df -h"));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let response = r#"{"command": "du -sh .", "explanation": "disk usage"}"#;
        assert_eq!(extract_command(response).as_deref(), Some("du -sh ."));
    }

    #[test]
    fn test_escaped_quotes_survive() {
        let response = r#"{"command": "grep \"error\" app.log"}"#;
        assert_eq!(
            extract_command(response).as_deref(),
            Some(r#"grep "error" app.log"#)
        );
    }

    #[test]
    fn test_no_object_is_none() {
        assert!(extract_command("I can't help with that.").is_none());
        assert!(extract_command("").is_none());
    }

    #[test]
    fn test_malformed_or_wrong_shape_is_none() {
        assert!(extract_command(r#"{"command": "ls""#).is_none());
        assert!(extract_command(r#"{"cmd": "ls"}"#).is_none());
        assert!(extract_command(r#"{"command": 42}"#).is_none());
    }

    #[test]
    fn test_multiline_object_is_not_matched() {
        let response = "{\n  \"command\": \"ls\"\n}";
        assert!(extract_command(response).is_none());
    }
}
