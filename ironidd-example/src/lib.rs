/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Common utilities shared across examples.

use std::env;
use std::path::PathBuf;

/// Default dictionary directory, relative to the crate.
pub const DEFAULT_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data");

/// Default root dictionary source.
pub const DEFAULT_SOURCE: &str = "sample.idd";

/// Example configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ExampleConfig {
    /// Directory dictionary sources are read from.
    pub root: PathBuf,
    /// Root source name.
    pub source: String,
    /// Whether warnings fail the check.
    pub strict: bool,
}

impl ExampleConfig {
    /// Reads `IDD_ROOT`, `IDD_SOURCE` and `IDD_STRICT`, with defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            root: env::var("IDD_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_ROOT)),
            source: env::var("IDD_SOURCE").unwrap_or_else(|_| DEFAULT_SOURCE.to_string()),
            strict: env::var("IDD_STRICT")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}

/// Initializes logging for examples.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}
