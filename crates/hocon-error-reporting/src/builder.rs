//! Fluent construction of diagnostic messages.

use crate::diagnostic::{Detail, DiagnosticMessage};
use hocon_origin::Origin;

/// Builds a [`DiagnosticMessage`] one part at a time.
///
/// ```
/// use hocon_error_reporting::DiagnosticMessageBuilder;
///
/// let error = DiagnosticMessageBuilder::error("Wrong Type")
///     .with_code("H-1-2")
///     .problem("`server.port` must be of type number")
///     .add_detail("`server.port` has type string")
///     .add_hint("Use a numeric literal?")
///     .build();
///
/// assert_eq!(error.code.as_deref(), Some("H-1-2"));
/// assert_eq!(error.details.len(), 1);
/// assert_eq!(error.hints.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    message: DiagnosticMessage,
}

impl DiagnosticMessageBuilder {
    pub fn error(title: impl Into<String>) -> Self {
        Self {
            message: DiagnosticMessage::new(title),
        }
    }

    /// Set the catalog code (`H-<subsystem>-<number>`).
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.message.code = Some(code.into());
        self
    }

    pub fn problem(mut self, statement: impl Into<String>) -> Self {
        self.message.problem = Some(statement.into());
        self
    }

    pub fn add_detail(mut self, detail: impl Into<String>) -> Self {
        self.message.details.push(Detail::Fact(detail.into()));
        self
    }

    pub fn add_context(mut self, context: impl Into<String>) -> Self {
        self.message.details.push(Detail::Context(context.into()));
        self
    }

    pub fn add_hint(mut self, hint: impl Into<String>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    pub fn with_location(mut self, location: Origin) -> Self {
        self.message.location = Some(location);
        self
    }

    pub fn build(self) -> DiagnosticMessage {
        self.message
    }
}
