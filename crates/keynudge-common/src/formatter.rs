use crate::shortcut::{ShortcutIdentity, ShortcutRecord};
use serde::{Deserialize, Serialize};

pub const ACKNOWLEDGE_LABEL: &str = "Got it, don't show again";
pub const DISMISS_LABEL: &str = "Dismiss";

/// The user's answer to a presented suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    /// Stop showing this shortcut. Commits it to the learned ledger.
    Acknowledge,
    Dismiss,
}

impl Response {
    pub fn label(&self) -> &'static str {
        match self {
            Response::Acknowledge => ACKNOWLEDGE_LABEL,
            Response::Dismiss => DISMISS_LABEL,
        }
    }
}

/// A suggestion ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub identity: ShortcutIdentity,
    pub interaction_type: String,
    pub message: String,
    pub options: [Response; 2],
}

impl Suggestion {
    pub fn from_record(record: &ShortcutRecord) -> Self {
        Self {
            identity: record.identity(),
            interaction_type: record.interaction_type.clone(),
            message: format_message(&record.shortcut_keys, &record.action_description),
            options: [Response::Acknowledge, Response::Dismiss],
        }
    }
}

pub fn format_message(keys: &str, action: &str) -> String {
    format!("Try {} to {}", keys, normalize_action(action))
}

/// Strip quotes and line breaks, trim, and lowercase the first character so
/// the description reads as the tail of a sentence.
pub fn normalize_action(action: &str) -> String {
    let cleaned: String = action
        .chars()
        .filter(|c| !matches!(c, '"' | '\n' | '\r'))
        .collect();
    let cleaned = cleaned.trim();

    let mut chars = cleaned.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_initial_only() {
        assert_eq!(normalize_action("Save the File"), "save the File");
    }

    #[test]
    fn normalize_strips_quotes_and_newlines() {
        assert_eq!(
            normalize_action("\"Open\n the \"terminal\"\r\n"),
            "open the terminal"
        );
    }

    #[test]
    fn normalize_empty() {
        assert_eq!(normalize_action("  \"\" "), "");
    }

    #[test]
    fn message_contains_keys_and_action() {
        let record = ShortcutRecord::new("fileSave", "Ctrl+S", "Save the file");
        let suggestion = Suggestion::from_record(&record);
        assert_eq!(suggestion.message, "Try Ctrl+S to save the file");
        assert_eq!(suggestion.options, [Response::Acknowledge, Response::Dismiss]);
    }
}
