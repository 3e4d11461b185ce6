//! The diagnostic message type and its text rendering.

use std::fmt;

use hocon_origin::Origin;
use serde::Serialize;

/// A bulleted line under the problem statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Detail {
    /// Something specific about what went wrong (`✖`).
    Fact(String),
    /// Where the failure happened, e.g. one step of a substitution chain (`ℹ`).
    Context(String),
}

impl Detail {
    pub fn text(&self) -> &str {
        match self {
            Detail::Fact(text) | Detail::Context(text) => text,
        }
    }

    fn bullet(&self) -> char {
        match self {
            Detail::Fact(_) => '✖',
            Detail::Context(_) => 'ℹ',
        }
    }
}

/// An error report for a person or a tool.
///
/// The text form reads top to bottom as
///
/// ```text
/// Error [H-1-5]: Cyclic Substitution
///   at app.conf: 3
/// `${a}` can't be resolved because it refers back to itself
/// ℹ while resolving `${b}`
/// ? a hint
/// ```
///
/// and the JSON form is the serde serialization of the struct.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticMessage {
    /// Catalog code such as `H-1-4`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub title: String,
    /// One sentence on what must hold or what can't be done.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<Detail>,
    /// Suggestions; the ones proposing an action end with `?`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
    /// The value the report is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Origin>,
}

impl DiagnosticMessage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
            location: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn to_json(&self) -> serde_json::Value {
        // every field is a string, a list of strings or an origin
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Error")?;
        if let Some(code) = &self.code {
            write!(f, " [{code}]")?;
        }
        write!(f, ": {}", self.title)?;
        if let Some(location) = &self.location {
            write!(f, "\n  at {}", location.description())?;
        }
        if let Some(problem) = &self.problem {
            write!(f, "\n{problem}")?;
        }
        for detail in &self.details {
            write!(f, "\n{} {}", detail.bullet(), detail.text())?;
        }
        for hint in &self.hints {
            write!(f, "\n? {hint}")?;
        }
        Ok(())
    }
}
