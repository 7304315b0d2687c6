//! Decoder for the simulation's delimited result format.
//!
//! The simulation reports the outcome of an action as
//!
//! ```text
//! <status-text>:<response-text>|<coord1>|<coord2>|<json>
//! ```
//!
//! Only the first segment is split on a colon, and every segment after the
//! first is optional. Decoding is total: missing or empty segments become
//! absent fields, so callers must check presence before showing them.

use serde::{Deserialize, Serialize};

/// Segment separator.
pub const SEGMENT_SEPARATOR: char = '|';

/// Separates the status text from the response text in the first segment.
pub const RESPONSE_SEPARATOR: char = ':';

/// Literal the simulation puts in the first segment when an action worked.
pub const SUCCESS_MARKER: &str = "successfully";

/// Outcome of a simulation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Success,
    Failure,
}

/// Structured view of one simulation result string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    /// Absent only for plain text messages
    pub status: Option<CommandStatus>,
    pub action: Option<String>,
    pub response_text: Option<String>,
    /// Object state segments (position, rotation), at most two
    pub coordinates: Vec<String>,
    pub raw_json: Option<String>,
}

impl CommandResult {
    /// Decode a raw result string. Never fails.
    pub fn decode(raw: &str) -> Self {
        if !raw.contains(SEGMENT_SEPARATOR) && !raw.contains(RESPONSE_SEPARATOR) {
            return Self {
                response_text: present(raw),
                ..Self::default()
            };
        }

        let mut segments = raw.split(SEGMENT_SEPARATOR);
        let first = segments.next().unwrap_or_default();

        let (head, response_text) = match first.split_once(RESPONSE_SEPARATOR) {
            Some((head, rest)) => (head, present(rest)),
            None => (first, None),
        };

        let status = if first.contains(SUCCESS_MARKER) {
            CommandStatus::Success
        } else {
            CommandStatus::Failure
        };

        let coordinates = segments
            .by_ref()
            .take(2)
            .filter_map(present)
            .collect();
        let raw_json = segments.next().and_then(present);

        Self {
            status: Some(status),
            action: head.split_whitespace().next().map(str::to_string),
            response_text,
            coordinates,
            raw_json,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(CommandStatus::Success)
    }

    /// True for plain text that carried no result structure at all.
    pub fn is_plain_text(&self) -> bool {
        self.status.is_none()
    }
}

/// Decode a raw result string. See [`CommandResult::decode`].
pub fn decode(raw: &str) -> CommandResult {
    CommandResult::decode(raw)
}

/// The first segment of a result string, used as the one-line summary.
pub fn headline(raw: &str) -> &str {
    raw.split(SEGMENT_SEPARATOR).next().unwrap_or(raw)
}

fn present(segment: &str) -> Option<String> {
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_result() {
        let result = decode(r#"Moved successfully:Engine panel removed|pos:1,2,3|rot:0,0,0|{"id":4}"#);

        assert_eq!(result.status, Some(CommandStatus::Success));
        assert_eq!(result.action.as_deref(), Some("Moved"));
        assert_eq!(result.response_text.as_deref(), Some("Engine panel removed"));
        assert_eq!(result.coordinates, vec!["pos:1,2,3", "rot:0,0,0"]);
        assert_eq!(result.raw_json.as_deref(), Some(r#"{"id":4}"#));
        assert!(result.is_success());
    }

    #[test]
    fn decodes_failure_without_segments() {
        let result = decode("Failed to find object:Engine panel");

        assert_eq!(result.status, Some(CommandStatus::Failure));
        assert_eq!(result.action.as_deref(), Some("Failed"));
        assert_eq!(result.response_text.as_deref(), Some("Engine panel"));
        assert!(result.coordinates.is_empty());
        assert!(result.raw_json.is_none());
    }

    #[test]
    fn plain_text_is_response_only() {
        let result = decode("Hello operator");

        assert_eq!(result.response_text.as_deref(), Some("Hello operator"));
        assert!(result.status.is_none());
        assert!(result.action.is_none());
        assert!(result.coordinates.is_empty());
        assert!(result.raw_json.is_none());
        assert!(result.is_plain_text());
    }

    #[test]
    fn missing_trailing_segments_are_absent() {
        let result = decode("Spawned successfully:wrench|pos:0,1,0");
        assert_eq!(result.coordinates, vec!["pos:0,1,0"]);
        assert!(result.raw_json.is_none());

        let result = decode("Rotated successfully:prop|");
        assert!(result.coordinates.is_empty());
    }

    #[test]
    fn first_segment_without_colon_has_no_response_text() {
        let result = decode("Removed successfully|pos:1,1,1");
        assert_eq!(result.action.as_deref(), Some("Removed"));
        assert!(result.response_text.is_none());
        assert!(result.is_success());
    }

    #[test]
    fn only_first_colon_splits() {
        let result = decode("Moved successfully:note: check torque|a|b");
        assert_eq!(result.response_text.as_deref(), Some("note: check torque"));
    }

    #[test]
    fn success_marker_is_case_sensitive() {
        let result = decode("Moved SUCCESSFULLY:panel|x");
        assert_eq!(result.status, Some(CommandStatus::Failure));
    }

    #[test]
    fn extra_segments_after_json_are_ignored() {
        let result = decode("Moved successfully:a|b|c|{}|extra");
        assert_eq!(result.coordinates, vec!["b", "c"]);
        assert_eq!(result.raw_json.as_deref(), Some("{}"));
    }

    #[test]
    fn degenerate_inputs_do_not_panic() {
        for raw in ["", "|", ":", "||||", " :|", "|:|:"] {
            let _ = decode(raw);
        }
        assert_eq!(decode(""), CommandResult::default());
        assert!(decode(" :x").action.is_none());
    }

    #[test]
    fn headline_is_first_segment() {
        assert_eq!(headline("Moved successfully:a|b|c"), "Moved successfully:a");
        assert_eq!(headline("Hello operator"), "Hello operator");
    }
}
