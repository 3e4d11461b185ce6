//! Reading configuration files into value trees.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use hocon_config::{Config, Value, parse_json, parse_properties};
use tracing::debug;

use crate::report::{config_error, yaml_error};

/// Source format, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Properties,
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Format> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "properties" => Some(Format::Properties),
            _ => None,
        }
    }
}

/// Load one file. The file name becomes the origin of every value in it.
pub fn load_file(path: &Path) -> Result<Value> {
    let Some(format) = Format::from_path(path) else {
        bail!(
            "Unsupported file type: {} (expected .json, .yaml, .yml or .properties)",
            path.display()
        );
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path.display().to_string();
    debug!(file = %name, ?format, "loading configuration file");

    match format {
        Format::Json => parse_json(&content, &name).map_err(|e| config_error(&e)),
        Format::Properties => parse_properties(&content, &name).map_err(|e| config_error(&e)),
        Format::Yaml => hocon_yaml::parse_file(&content, &name).map_err(|e| yaml_error(&e)),
    }
}

/// Load files and layer them. Earlier files win over later ones.
pub fn load_layers(paths: &[impl AsRef<Path>]) -> Result<Config> {
    let mut layers = Vec::with_capacity(paths.len());
    for path in paths {
        layers.push(load_file(path.as_ref())?);
    }
    let mut layers = layers.into_iter();
    let Some(first) = layers.next() else {
        bail!("No configuration files given");
    };
    let config = Config::from_value(first).map_err(|e| config_error(&e))?;
    Ok(config.with_fallbacks(layers))
}
