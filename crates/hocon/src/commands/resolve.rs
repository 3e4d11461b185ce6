//! Resolve command implementation.
//!
//! Layers the given files (earlier files win), resolves substitutions and
//! prints the result.

use std::path::PathBuf;

use anyhow::Result;
use hocon_config::{EnvSnapshot, Path, RenderOptions, ResolveOptions};
use tracing::{debug, info};

use crate::loader::load_layers;
use crate::report::config_error;

/// Arguments for the resolve command
#[derive(Debug, Default)]
pub struct ResolveArgs {
    pub files: Vec<PathBuf>,
    /// Leave unresolvable substitutions in place instead of failing
    pub allow_unresolved: bool,
    /// Don't fall back to environment variables
    pub no_env: bool,
    /// Only resolve below this path
    pub restrict: Option<String>,
    pub json: bool,
    pub comments: bool,
    pub origin_comments: bool,
    pub concise: bool,
}

impl ResolveArgs {
    pub fn resolve_options(&self) -> Result<ResolveOptions> {
        let mut options = ResolveOptions::new()
            .with_allow_unresolved(self.allow_unresolved)
            .with_environment_fallback(!self.no_env);
        if let Some(restrict) = &self.restrict {
            let path = Path::parse(restrict).map_err(|e| config_error(&e))?;
            options = options.with_restrict_to_path(path);
        }
        Ok(options)
    }

    pub fn render_options(&self) -> RenderOptions {
        if self.concise {
            return RenderOptions::concise();
        }
        RenderOptions::defaults()
            .with_json(self.json)
            .with_comments(self.comments)
            .with_origin_comments(self.origin_comments)
    }
}

/// Resolve the layered files and return the rendered text.
pub fn run(args: &ResolveArgs) -> Result<String> {
    let config = load_layers(&args.files)?;
    let options = args.resolve_options()?;
    let env = EnvSnapshot::from_vars(std::env::vars());
    debug!(vars = env.len(), "captured environment");

    let resolved = config
        .resolve_with_external(&options, &env)
        .map_err(|e| config_error(&e))?;
    if !resolved.is_resolved() {
        info!("configuration still contains unresolved substitutions");
    }
    Ok(resolved.render(&args.render_options()))
}

/// Execute the resolve command
pub fn execute(args: ResolveArgs) -> Result<()> {
    let rendered = run(&args)?;
    println!("{}", rendered.trim_end());
    Ok(())
}
