//! Get command implementation.
//!
//! Prints a single value from the resolved configuration. Strings are
//! printed bare, anything else as compact JSON.

use std::path::PathBuf;

use anyhow::Result;
use hocon_config::{EnvSnapshot, ResolveOptions, to_json};

use crate::loader::load_layers;
use crate::report::config_error;

/// Arguments for the get command
#[derive(Debug, Default)]
pub struct GetArgs {
    /// Path expression, e.g. `server.port`
    pub path: String,
    pub files: Vec<PathBuf>,
    pub no_env: bool,
}

pub fn run(args: &GetArgs) -> Result<String> {
    let config = load_layers(&args.files)?;
    let options = ResolveOptions::new().with_environment_fallback(!args.no_env);
    let env = EnvSnapshot::from_vars(std::env::vars());
    let resolved = config
        .resolve_with_external(&options, &env)
        .map_err(|e| config_error(&e))?;

    let value = resolved.get_value(&args.path).map_err(|e| config_error(&e))?;
    if let Some(s) = value.as_str() {
        return Ok(s.to_string());
    }
    let json: serde_json::Value = to_json(&value).map_err(|e| config_error(&e))?;
    Ok(json.to_string())
}

/// Execute the get command
pub fn execute(args: GetArgs) -> Result<()> {
    println!("{}", run(&args)?);
    Ok(())
}
