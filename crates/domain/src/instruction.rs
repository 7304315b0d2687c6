//! Operator instructions and the editable draft they are composed in.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A validated, trimmed, non-empty operator instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserInstruction(String);

impl UserInstruction {
    /// Trim the text and reject it if nothing is left.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Instruction cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserInstruction {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UserInstruction> for String {
    fn from(value: UserInstruction) -> Self {
        value.0
    }
}

/// Instruction text being composed before it is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionDraft {
    text: String,
}

impl InstructionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Insert an object name picked from an inventory list.
    ///
    /// After a trailing space the name is trimmed; otherwise it is appended
    /// exactly as listed.
    pub fn insert_object(&mut self, name: &str) {
        if self.text.ends_with(' ') {
            self.text.push_str(name.trim());
        } else {
            self.text.push_str(name);
        }
    }

    /// Take the draft text, leaving the draft empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}
