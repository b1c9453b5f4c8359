// Configuration loading

pub mod error;
pub mod job;
pub mod settings;

pub use error::ConfigError;
pub use job::ReconJob;
pub use settings::Settings;

use serde::{Deserialize, Serialize};

/// How a summary is rendered on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Text => write!(f, "text"),
        }
    }
}
