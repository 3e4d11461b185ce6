//! Structured diagnostics for configuration errors.
//!
//! A [`DiagnosticMessage`] follows a tidyverse-style layout: a short title,
//! an optional problem statement, bulleted details and hints, plus an
//! optional [`Origin`](hocon_origin::Origin) pointing at the offending value.
//! Messages render to plain text for terminals and to JSON for tools.
//!
//! ```
//! use hocon_error_reporting::DiagnosticMessageBuilder;
//!
//! let msg = DiagnosticMessageBuilder::error("Unresolved substitution")
//!     .with_code("H-1-4")
//!     .problem("Could not resolve `${db.host}`")
//!     .add_hint("Define `db.host` or make the substitution optional with `${?db.host}`?")
//!     .build();
//!
//! assert!(msg.to_text().starts_with("Error [H-1-4]: Unresolved substitution"));
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_error_info, get_subsystem};
pub use diagnostic::{Detail, DiagnosticMessage};
