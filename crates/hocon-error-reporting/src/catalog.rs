//! Error code catalog and lookup.
//!
//! Maps error codes (like "H-1-4") to their metadata. The catalog is embedded
//! at compile time from `error_catalog.json`.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata for an error code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    /// Subsystem name (e.g., "resolve", "lookup", "yaml")
    pub subsystem: String,

    /// Short title for the error
    pub title: String,

    /// Default message
    pub message_template: String,

    /// URL to documentation (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<String>,

    /// When this error was introduced (version)
    pub since_version: String,
}

/// Global error catalog, parsed lazily from the embedded JSON.
///
/// # Panics
///
/// Panics if the embedded JSON is invalid, which can only happen if the
/// catalog file was edited incorrectly.
pub static ERROR_CATALOG: Lazy<HashMap<String, ErrorCodeInfo>> = Lazy::new(|| {
    let json_data = include_str!("../error_catalog.json");
    serde_json::from_str(json_data).expect("Invalid error catalog JSON")
});

/// Look up error code information.
///
/// ```
/// use hocon_error_reporting::catalog::get_error_info;
///
/// let info = get_error_info("H-1-5").unwrap();
/// assert_eq!(info.title, "Cyclic Substitution");
/// ```
pub fn get_error_info(code: &str) -> Option<&ErrorCodeInfo> {
    ERROR_CATALOG.get(code)
}

/// Get the subsystem name for an error code.
pub fn get_subsystem(code: &str) -> Option<&str> {
    ERROR_CATALOG.get(code).map(|info| info.subsystem.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        assert!(!ERROR_CATALOG.is_empty());
    }

    #[test]
    fn test_internal_error_exists() {
        let info = get_error_info("H-0-1").unwrap();
        assert_eq!(info.subsystem, "internal");
        assert_eq!(info.title, "Internal Error");
        assert!(info.docs_url.is_none());
    }

    #[test]
    fn test_get_subsystem() {
        assert_eq!(get_subsystem("H-1-4"), Some("resolve"));
        assert_eq!(get_subsystem("H-1-1"), Some("lookup"));
        assert_eq!(get_subsystem("H-999-999"), None);
    }

    #[test]
    fn test_codes_are_well_formed() {
        for code in ERROR_CATALOG.keys() {
            let parts: Vec<_> = code.split('-').collect();
            assert_eq!(parts.len(), 3, "bad code {code}");
            assert_eq!(parts[0], "H");
            assert!(parts[1].parse::<u32>().is_ok());
            assert!(parts[2].parse::<u32>().is_ok());
        }
    }
}
