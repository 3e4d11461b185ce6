//! Errors reported by the value model, resolver and accessors.

use crate::value::ValueType;
use hocon_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, get_error_info};
use hocon_origin::Origin;
use thiserror::Error;

fn at(origin: &Option<Origin>) -> String {
    match origin {
        Some(origin) => format!("{}: ", origin.description()),
        None => String::new(),
    }
}

fn null_note(set_to_null: &bool) -> &'static str {
    if *set_to_null { " (it is set to null)" } else { "" }
}

fn wrong_type(path: &Option<String>, expected: &ValueType, found: &ValueType) -> String {
    match path {
        Some(path) => format!("'{path}' has type {found} rather than {expected}"),
        None => format!("Cannot concatenate {expected} with {found}"),
    }
}

fn join_trace(trace: &[String]) -> String {
    trace.join(", ")
}

/// A user-visible configuration error.
///
/// Every variant carries the origin of the offending value when one is
/// known, and `Display` puts its description in front of the message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// No value at the requested path.
    #[error("{}No configuration setting found for key '{path}'{}", at(.origin), null_note(.set_to_null))]
    Missing {
        path: String,
        /// The path exists but holds `null`
        set_to_null: bool,
        origin: Option<Origin>,
    },

    /// The value exists but cannot be read as the requested type, or two
    /// adjacent values can't be concatenated (`path` is `None`).
    #[error("{}{}", at(.origin), wrong_type(.path, .expected, .found))]
    WrongType {
        path: Option<String>,
        expected: ValueType,
        found: ValueType,
        origin: Option<Origin>,
    },

    /// A value was read before its substitutions were resolved.
    #[error("{}{message}", at(.origin))]
    NotResolved {
        path: Option<String>,
        message: String,
        origin: Option<Origin>,
    },

    /// A mandatory substitution has no referent.
    #[error("{}Could not resolve substitution to a value: {expression}", at(.origin))]
    UnresolvedSubstitution {
        /// The substitution as written, e.g. `${a.b}`
        expression: String,
        origin: Option<Origin>,
    },

    /// A substitution that can only be satisfied by itself.
    #[error("{}{expression} is part of a cycle of substitutions involving {}", at(.origin), join_trace(.trace))]
    CyclicSubstitution {
        expression: String,
        /// Substitutions in progress when the cycle was detected, outermost first
        trace: Vec<String>,
        origin: Option<Origin>,
    },

    /// A malformed path expression.
    #[error("{}Invalid path '{path}': {message}", at(.origin))]
    BadPath {
        path: String,
        message: String,
        origin: Option<Origin>,
    },

    /// A malformed or out-of-range value.
    #[error("{}Invalid value at '{path}': {message}", at(.origin))]
    BadValue {
        path: String,
        message: String,
        origin: Option<Origin>,
    },
}

impl ConfigError {
    pub fn origin(&self) -> Option<&Origin> {
        match self {
            ConfigError::Missing { origin, .. }
            | ConfigError::WrongType { origin, .. }
            | ConfigError::NotResolved { origin, .. }
            | ConfigError::UnresolvedSubstitution { origin, .. }
            | ConfigError::CyclicSubstitution { origin, .. }
            | ConfigError::BadPath { origin, .. }
            | ConfigError::BadValue { origin, .. } => origin.as_ref(),
        }
    }

    /// Stable error code from the diagnostic catalog.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Missing { .. } => "H-1-1",
            ConfigError::WrongType { .. } => "H-1-2",
            ConfigError::NotResolved { .. } => "H-1-3",
            ConfigError::UnresolvedSubstitution { .. } => "H-1-4",
            ConfigError::CyclicSubstitution { .. } => "H-1-5",
            ConfigError::BadPath { .. } => "H-1-6",
            ConfigError::BadValue { .. } => "H-1-7",
        }
    }

    /// Convert to a structured diagnostic.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let code = self.code();
        let title = get_error_info(code)
            .map(|info| info.title.clone())
            .unwrap_or_else(|| "Configuration Error".to_string());

        let mut builder = DiagnosticMessageBuilder::error(title).with_code(code);
        if let Some(origin) = self.origin() {
            builder = builder.with_location(origin.clone());
        }

        builder = match self {
            ConfigError::Missing {
                path, set_to_null, ..
            } => {
                let builder = builder.problem(format!("No value was found at `{path}`"));
                if *set_to_null {
                    builder.add_detail(format!("`{path}` is set to `null`"))
                } else {
                    builder.add_hint("Check the spelling of the path, or add a fallback?")
                }
            }
            ConfigError::WrongType {
                path: Some(path),
                expected,
                found,
                ..
            } => builder
                .problem(format!("`{path}` must be of type {expected}"))
                .add_detail(format!("`{path}` has type {found}")),
            ConfigError::WrongType {
                path: None,
                expected,
                found,
                ..
            } => builder
                .problem(format!("A {expected} can't be concatenated with a {found}"))
                .add_hint("Only strings, numbers, booleans and null join into strings; lists join lists and objects join objects"),
            ConfigError::NotResolved { message, .. } => builder
                .problem(message.clone())
                .add_hint("Resolve the configuration before reading values?"),
            ConfigError::UnresolvedSubstitution { expression, .. } => builder
                .problem(format!("`{expression}` has no value in the document"))
                .add_hint("Define the referenced setting, or make it optional with `${?...}`?"),
            ConfigError::CyclicSubstitution {
                expression, trace, ..
            } => {
                let mut builder = builder
                    .problem(format!("`{expression}` can't be resolved because it refers back to itself"));
                for step in trace {
                    builder = builder.add_context(format!("while resolving `{step}`"));
                }
                builder
            }
            ConfigError::BadPath { path, message, .. } => builder
                .problem(format!("`{path}` is not a valid path expression"))
                .add_detail(message.clone()),
            ConfigError::BadValue { path, message, .. } => builder
                .problem(format!("The value at `{path}` is invalid"))
                .add_detail(message.clone()),
        };

        builder.build()
    }

    /// The same error with `origin` filled in if it had none.
    pub fn with_origin_if_missing(mut self, new_origin: &Origin) -> Self {
        match &mut self {
            ConfigError::Missing { origin, .. }
            | ConfigError::WrongType { origin, .. }
            | ConfigError::NotResolved { origin, .. }
            | ConfigError::UnresolvedSubstitution { origin, .. }
            | ConfigError::CyclicSubstitution { origin, .. }
            | ConfigError::BadPath { origin, .. }
            | ConfigError::BadValue { origin, .. } => {
                if origin.is_none() {
                    *origin = Some(new_origin.clone());
                }
            }
        }
        self
    }
}
