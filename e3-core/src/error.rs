//! Error types with clear, actionable messages

use std::path::PathBuf;
use thiserror::Error;

/// Failures the CLI reports to the user by kind
#[derive(Error, Debug)]
pub enum E3Error {
    /// One or more of the e3 environment variables is unset or empty
    #[error("You need to source an e3 environment, or set the variables {}.\n\nMissing: {}", .required.join(", "), .missing.join(", "))]
    MissingEnvironment {
        required: Vec<&'static str>,
        missing: Vec<&'static str>,
    },

    /// The catalog configuration could not be used
    #[error("Invalid catalog configuration: {0}")]
    InvalidConfig(String),

    /// An explicitly requested configuration file does not exist
    #[error("Configuration file not found: {}", .path.display())]
    ConfigNotFound { path: PathBuf },

    /// The catalog service answered with a non-success status
    #[error("Catalog request failed: HTTP {status} from {url}\n{body}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },

    /// A named module has no directory under siteMods
    #[error("Module {name} is not installed in {}", .sitemods.display())]
    ModuleNotInstalled { name: String, sitemods: PathBuf },
}

impl E3Error {
    /// Whether the user named something that does not exist locally
    pub fn is_not_found(&self) -> bool {
        matches!(self, E3Error::ModuleNotInstalled { .. })
    }
}
