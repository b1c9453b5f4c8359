// Reconciliation job files (*.recon.toml)

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::OutputFormat;

// ---------------------------------------------------------------------------
// Top-level job
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconJob {
    #[serde(default)]
    pub name: String,
    pub system: SystemInput,
    #[serde(default)]
    pub banks: Vec<BankInput>,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemInput {
    pub file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BankInput {
    pub file: PathBuf,
    /// Batch name; defaults to the file stem.
    #[serde(default)]
    pub name: Option<String>,
}

/// Either bound may be left to the command line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowConfig {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
    pub file: Option<PathBuf>,
    pub strict: Option<bool>,
}

impl BankInput {
    /// `name` if set, else the file stem, else `bank`.
    pub fn effective_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match self.file.file_stem().map(|s| s.to_string_lossy()) {
            Some(stem) if !stem.is_empty() => stem.into_owned(),
            _ => "bank".to_string(),
        }
    }
}

impl ReconJob {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let job: ReconJob =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        job.validate()?;
        Ok(job)
    }

    /// Read, parse and validate a job file. Relative input and output paths
    /// are resolved against the job file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut job = Self::from_toml(&text)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        job.resolve_paths(base);
        Ok(job)
    }

    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.system.file);
        for bank in &mut self.banks {
            resolve(&mut bank.file);
        }
        if let Some(out) = &mut self.output.file {
            resolve(out);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.system.file.as_os_str().is_empty() {
            return Err(ConfigError::Validation("system.file must not be empty".into()));
        }

        if self.banks.is_empty() {
            return Err(ConfigError::Validation("at least one [[banks]] entry is required".into()));
        }

        let mut seen = HashSet::new();
        for (i, bank) in self.banks.iter().enumerate() {
            if bank.file.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("banks[{i}].file must not be empty")));
            }
            if matches!(&bank.name, Some(n) if n.trim().is_empty()) {
                return Err(ConfigError::Validation(format!("banks[{i}].name must not be empty")));
            }
            let name = bank.effective_name();
            if !seen.insert(name.clone()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate bank name '{name}' (set `name` to disambiguate)"
                )));
            }
        }

        if let (Some(start), Some(end)) = (self.window.start, self.window.end) {
            if end < start {
                return Err(ConfigError::Validation(format!(
                    "window.end ({end}) is before window.start ({start})"
                )));
            }
        }

        Ok(())
    }
}
