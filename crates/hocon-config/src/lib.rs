//! Layered configuration values with fallback merging and substitution
//! resolution.
//!
//! Configuration arrives in layers (defaults, a file, overrides) that are
//! stacked with [`Value::with_fallback`]: objects merge key by key and the
//! first layer wins. Values may contain `${path}` substitutions, which can
//! point anywhere in the merged tree, including at what a key held in a
//! lower layer (`path = ${path}":/extra"`). Merging therefore never looks
//! inside substitutions; it keeps undecidable merges as delayed-merge
//! stacks and leaves the rest to [`resolve`](Value::resolve).
//!
//! # Architecture
//!
//! - [`Value`]: an immutable, cheaply cloned tree node with an [`Origin`]
//! - [`merge`]: `with_fallback` and value concatenation
//! - [`resolve`]: the substitution resolver ([`ResolveOptions`])
//! - [`Config`]: typed accessors over a root object
//! - [`render`]: HOCON-ish or JSON text ([`RenderOptions`])
//! - [`convert`] and [`properties`]: JSON and `.properties` producers
//!
//! # Example
//!
//! ```rust
//! use hocon_config::{Config, Origin, Path, ResolveOptions, Value};
//!
//! let o = Origin::generic("example");
//! let defaults = Value::object(
//!     [
//!         ("host".to_string(), Value::string("localhost", o.clone())),
//!         ("port".to_string(), Value::int(80, o.clone())),
//!     ]
//!     .into_iter()
//!     .collect(),
//!     o.clone(),
//! );
//! let app = Value::object(
//!     [(
//!         "url".to_string(),
//!         Value::concatenate(vec![
//!             Value::string("http://", o.clone()),
//!             Value::reference(Path::new("host"), false, o.clone()),
//!         ])
//!         .unwrap()
//!         .unwrap(),
//!     )]
//!     .into_iter()
//!     .collect(),
//!     o,
//! );
//!
//! let config = Config::from_value(app.with_fallback(&defaults))
//!     .unwrap()
//!     .resolve_with_options(&ResolveOptions::default())
//!     .unwrap();
//! assert_eq!(config.get_string("url").unwrap(), "http://localhost");
//! assert_eq!(config.get_i64("port").unwrap(), 80);
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod external;
pub mod merge;
pub mod path;
pub mod properties;
pub mod render;
pub mod resolve;
pub mod transform;
pub mod value;

pub use config::Config;
pub use convert::{from_json, parse_json, to_json};
pub use error::ConfigError;
pub use external::{EnvSnapshot, ExternalLookup, NoExternal};
pub use path::Path;
pub use properties::parse_properties;
pub use render::RenderOptions;
pub use resolve::{ResolveOptions, resolve_against, resolve_with_external};
pub use transform::transform;
pub use value::{Number, SubstitutionExpression, Value, ValueKind, ValueType};

// Re-export for convenience
pub use hocon_origin::Origin;
