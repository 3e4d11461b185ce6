//! Provenance tracking for configuration values.
//!
//! Every value in a configuration tree carries an [`Origin`] describing where
//! it came from: a file and line range, an environment snapshot, or a
//! synthetic description. Origins are diagnostics only; they never take part
//! in value equality.
//!
//! # Example
//!
//! ```rust
//! use hocon_origin::Origin;
//!
//! let a = Origin::file("app.conf").with_line(3);
//! let b = Origin::file("app.conf").with_line(7);
//!
//! let merged = Origin::merge(&a, &b);
//! assert_eq!(merged.description(), "app.conf: 3-7");
//! ```

pub mod origin;
pub mod types;

pub use origin::{Origin, OriginKind};
pub use types::{Location, Range};
