//! Turning failures into diagnostics for a person or a tool.

use anyhow::Error;
use clap::ValueEnum;
use hocon_config::ConfigError;
use hocon_error_reporting::DiagnosticMessage;
use hocon_yaml::YamlError;

/// How errors are printed on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ErrorFormat {
    /// Readable multi-line report
    #[default]
    Text,
    /// One JSON object per error
    Json,
}

/// An error that carries its structured diagnostic.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Diagnosed(pub DiagnosticMessage);

pub fn config_error(err: &ConfigError) -> Error {
    Error::new(Diagnosed(err.to_diagnostic()))
}

pub fn yaml_error(err: &YamlError) -> Error {
    Error::new(Diagnosed(err.to_diagnostic()))
}

/// The diagnostic behind `err`. Errors that never had one (I/O, usage)
/// get a bare title made of their context chain.
pub fn diagnostic(err: &Error) -> DiagnosticMessage {
    match err.downcast_ref::<Diagnosed>() {
        Some(Diagnosed(message)) => message.clone(),
        None => DiagnosticMessage::new(format!("{err:#}")),
    }
}

pub fn render(err: &Error, format: ErrorFormat) -> String {
    let message = diagnostic(err);
    match format {
        ErrorFormat::Text => message.to_text(),
        ErrorFormat::Json => message.to_json().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use hocon_config::Path;

    fn unresolved() -> Error {
        config_error(&ConfigError::UnresolvedSubstitution {
            expression: "${db.host}".into(),
            origin: None,
        })
    }

    #[test]
    fn test_text_keeps_the_catalog_code() {
        let text = render(&unresolved(), ErrorFormat::Text);
        assert!(text.starts_with("Error [H-1-4]: "), "{text}");
        assert!(text.contains("`${db.host}` has no value in the document"));
    }

    #[test]
    fn test_json_is_one_object() {
        let rendered = render(&unresolved(), ErrorFormat::Json);
        assert!(!rendered.contains('\n'));
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(json["code"], "H-1-4");
        assert_eq!(json["problem"], "`${db.host}` has no value in the document");
        assert!(json["hints"][0].as_str().unwrap().ends_with('?'));
    }

    #[test]
    fn test_plain_errors_get_a_title() {
        let err = Err::<(), _>(std::io::Error::other("disk on fire"))
            .context("Failed to read app.yaml")
            .unwrap_err();
        assert_eq!(
            render(&err, ErrorFormat::Text),
            "Error: Failed to read app.yaml: disk on fire"
        );
        let json: serde_json::Value =
            serde_json::from_str(&render(&err, ErrorFormat::Json)).unwrap();
        assert_eq!(json, serde_json::json!({"title": "Failed to read app.yaml: disk on fire"}));
    }

    #[test]
    fn test_diagnostic_is_recovered_from_the_error() {
        let err = Path::parse("a..b").map_err(|e| config_error(&e)).unwrap_err();
        assert_eq!(diagnostic(&err).code.as_deref(), Some("H-1-6"));
    }
}
