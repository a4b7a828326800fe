use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between keys and action in the encoded identity.
pub const IDENTITY_SEPARATOR: char = '|';

/// One row of the shortcut catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutRecord {
    pub interaction_type: String,
    pub shortcut_keys: String,
    pub action_description: String,
    /// Informational only, never consulted when recommending.
    pub implemented: bool,
}

impl ShortcutRecord {
    pub fn new(
        interaction_type: impl Into<String>,
        shortcut_keys: impl Into<String>,
        action_description: impl Into<String>,
    ) -> Self {
        Self {
            interaction_type: interaction_type.into(),
            shortcut_keys: shortcut_keys.into(),
            action_description: action_description.into(),
            implemented: true,
        }
    }

    pub fn identity(&self) -> ShortcutIdentity {
        ShortcutIdentity::new(&self.shortcut_keys, &self.action_description)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("shortcut keys {0:?} contain the reserved '|' separator")]
    SeparatorInKeys(String),
    #[error("encoded identity {0:?} has no '|' separator")]
    MissingSeparator(String),
}

/// The `(keys, action)` pair that identifies a shortcut for learned and
/// session tracking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShortcutIdentity {
    pub keys: String,
    pub action: String,
}

impl ShortcutIdentity {
    pub fn new(keys: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            keys: keys.into(),
            action: action.into(),
        }
    }

    /// Encode as `keys|action`.
    ///
    /// The action may itself contain pipes since decoding splits on the first
    /// one, but the keys may not.
    pub fn encode(&self) -> Result<String, IdentityError> {
        if self.keys.contains(IDENTITY_SEPARATOR) {
            return Err(IdentityError::SeparatorInKeys(self.keys.clone()));
        }
        Ok(format!("{}{}{}", self.keys, IDENTITY_SEPARATOR, self.action))
    }

    pub fn decode(encoded: &str) -> Result<Self, IdentityError> {
        match encoded.split_once(IDENTITY_SEPARATOR) {
            Some((keys, action)) => Ok(Self::new(keys, action)),
            None => Err(IdentityError::MissingSeparator(encoded.to_string())),
        }
    }
}

impl fmt::Display for ShortcutIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.keys, self.action)
    }
}
