//! # hocon-yaml
//!
//! YAML documents as configuration value trees.
//!
//! Plain scalars are typed the way YAML 1.1 readers usually type them.
//! Quoted scalars stay strings. A plain scalar containing `${path}` or
//! `${?path}` becomes a substitution, so YAML files can take part in
//! resolution like any other source.
//!
//! Two tags add configuration semantics:
//!
//! - `!append` on a mapping value appends it to whatever the same key
//!   holds in lower-priority layers (`key += value`).
//! - `!concat` on a sequence joins its items into one value.
//!
//! Aliases and non-scalar keys have no configuration equivalent and are
//! rejected.
//!
//! ## Example
//!
//! ```rust
//! use hocon_config::Config;
//!
//! let defaults = hocon_yaml::parse_file("server:\n  host: localhost\n  port: 8080\n", "defaults.yaml").unwrap();
//! let app = hocon_yaml::parse_file("url: http://${server.host}:${server.port}/\n", "app.yaml").unwrap();
//!
//! let config = Config::from_value(app)
//!     .unwrap()
//!     .with_fallback(&defaults)
//!     .resolve()
//!     .unwrap();
//! assert_eq!(config.get_string("url").unwrap(), "http://localhost:8080/");
//! ```

mod error;
mod parser;

pub use error::{Result, YamlError};
pub use parser::{parse, parse_file};
