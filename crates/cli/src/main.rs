// bankrecon CLI - reconcile an internal ledger export against bank statements

mod exit_codes;
mod recon;

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bankrecon_config::Settings;
use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "bankrecon")]
#[command(about = "Reconcile internal transactions against bank statements")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log filter for stderr diagnostics (e.g. `info`, `bankrecon_io=debug`)
    #[arg(long, global = true, env = "BANKRECON_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a system CSV against one or more bank CSVs
    #[command(after_help = "\
Examples:
  bankrecon run --system system.csv --bank bank_bca.csv --bank bank_bni.csv \\
      --start 2024-02-01 --end 2024-02-29
  bankrecon run --job february.recon.toml --format text
  bankrecon run --job february.recon.toml --output result.json --strict")]
    Run(recon::RunArgs),

    /// Validate a job file without running it
    #[command(after_help = "\
Examples:
  bankrecon validate february.recon.toml")]
    Validate {
        /// Path to the .recon.toml job file
        job: std::path::PathBuf,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  bankrecon-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

/// Stderr-only subscriber so stdout stays a clean report channel.
fn init_logging(level: &str) -> bool {
    let (filter, valid) = match EnvFilter::try_new(level) {
        Ok(f) => (f, true),
        Err(_) => (EnvFilter::new("warn"), false),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
    valid
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = Settings::try_load();
    let level = cli
        .log_level
        .clone()
        .or_else(|| settings.as_ref().ok().and_then(|s| s.log_level.clone()))
        .unwrap_or_else(|| "warn".to_string());
    if !init_logging(&level) {
        tracing::warn!(level = %level, "invalid log filter, using warn");
    }
    let settings = settings.unwrap_or_else(|e| {
        tracing::warn!(path = %Settings::config_path().display(), "{e}; using default settings");
        Settings::default()
    });

    let result = match cli.command {
        Commands::Run(args) => recon::cmd_run(args, &settings),
        Commands::Validate { job } => recon::cmd_validate(job),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
