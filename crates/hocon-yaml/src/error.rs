//! Error types for YAML producers.

use hocon_config::ConfigError;
use hocon_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, get_error_info};
use hocon_origin::Origin;
use thiserror::Error;

/// Result type alias for hocon-yaml operations.
pub type Result<T> = std::result::Result<T, YamlError>;

/// Errors that can occur while turning YAML into a value tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum YamlError {
    /// YAML syntax error
    #[error("{}: {message}", .origin.description())]
    Parse { message: String, origin: Origin },

    /// Valid YAML with no configuration equivalent (aliases, complex keys,
    /// misplaced tags)
    #[error("{}: {message}", .origin.description())]
    Unsupported { message: String, origin: Origin },

    /// A substitution or value inside a scalar was malformed
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl YamlError {
    pub fn code(&self) -> &'static str {
        match self {
            YamlError::Parse { .. } => "H-2-1",
            YamlError::Unsupported { .. } => "H-2-2",
            YamlError::Config(err) => err.code(),
        }
    }

    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let (message, origin) = match self {
            YamlError::Parse { message, origin } | YamlError::Unsupported { message, origin } => {
                (message, origin)
            }
            YamlError::Config(err) => return err.to_diagnostic(),
        };
        let code = self.code();
        let title = get_error_info(code)
            .map(|info| info.title.clone())
            .unwrap_or_else(|| "YAML Error".to_string());
        DiagnosticMessageBuilder::error(title)
            .with_code(code)
            .problem(message.clone())
            .with_location(origin.clone())
            .build()
    }

    pub(crate) fn from_scan(err: &yaml_rust2::ScanError, base: &Origin) -> Self {
        YamlError::Parse {
            message: err.info().to_string(),
            origin: base.clone().with_line(err.marker().line() + 1),
        }
    }
}
