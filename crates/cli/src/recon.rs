//! `bankrecon run` / `bankrecon validate`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use tracing::info;

use bankrecon_config::{ConfigError, OutputFormat, ReconJob, Settings};
use bankrecon_io::csv::{read_bank_statement, read_system_transactions, source_name_from_path};
use bankrecon_io::{report, DateWindow};
use bankrecon_recon::{reconcile, Summary};

use crate::exit_codes::{
    EXIT_DIFFERENCES, EXIT_ERROR, EXIT_INPUT, EXIT_INVALID_CONFIG, EXIT_OUTPUT,
};
use crate::CliError;

#[derive(Args)]
pub struct RunArgs {
    /// Job file supplying defaults for every option below
    #[arg(long)]
    pub job: Option<PathBuf>,

    /// System transactions CSV (trxID,amount,type,transactionTime)
    #[arg(long)]
    pub system: Option<PathBuf>,

    /// Bank statement CSV (unique_identifier,amount,date); repeatable
    #[arg(long = "bank")]
    pub banks: Vec<PathBuf>,

    /// First day of the window (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Last day of the window (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    /// Report format on stdout
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Shorthand for --format json
    #[arg(long, conflicts_with = "format")]
    pub json: bool,

    /// Also write the JSON report to this file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Exit 6 when anything is unmatched or differs
    #[arg(long)]
    pub strict: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Json,
    Text,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Text => OutputFormat::Text,
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn config_err(e: ConfigError) -> CliError {
    CliError::new(EXIT_INVALID_CONFIG, e.to_string())
}

/// Fully resolved run, after CLI > job > settings > defaults.
#[derive(Debug)]
struct RunPlan {
    system: PathBuf,
    banks: Vec<(PathBuf, String)>,
    window: DateWindow,
    format: OutputFormat,
    output: Option<PathBuf>,
    strict: bool,
}

fn plan(args: RunArgs, settings: &Settings) -> Result<RunPlan, CliError> {
    let job = args.job.as_deref().map(ReconJob::load).transpose().map_err(config_err)?;

    let system = args
        .system
        .or_else(|| job.as_ref().map(|j| j.system.file.clone()))
        .ok_or_else(|| {
            CliError::usage("missing --system").with_hint("pass --system <csv> or --job <file>")
        })?;

    let banks: Vec<(PathBuf, String)> = if !args.banks.is_empty() {
        args.banks
            .into_iter()
            .map(|p| {
                let name = source_name_from_path(&p);
                (p, name)
            })
            .collect()
    } else {
        job.as_ref()
            .map(|j| j.banks.iter().map(|b| (b.file.clone(), b.effective_name())).collect())
            .unwrap_or_default()
    };
    if banks.is_empty() {
        return Err(CliError::usage("missing --bank").with_hint("pass at least one --bank <csv>"));
    }

    let job_window = job.as_ref().map(|j| j.window.clone()).unwrap_or_default();
    let start = args
        .start
        .or(job_window.start)
        .ok_or_else(|| CliError::usage("missing --start"))?;
    let end = args.end.or(job_window.end).ok_or_else(|| CliError::usage("missing --end"))?;
    let window = DateWindow::new(start, end).map_err(|e| CliError::usage(e.to_string()))?;

    let job_output = job.map(|j| j.output).unwrap_or_default();
    let format = if args.json {
        OutputFormat::Json
    } else {
        args.format
            .map(OutputFormat::from)
            .or(job_output.format)
            .unwrap_or(settings.output_format)
    };
    let strict = args.strict || job_output.strict.unwrap_or(settings.strict);

    Ok(RunPlan {
        system,
        banks,
        window,
        format,
        output: args.output.or(job_output.file),
        strict,
    })
}

fn load_and_reconcile(plan: &RunPlan) -> Result<Summary, CliError> {
    let input_err = |e: bankrecon_io::LoadError| CliError::new(EXIT_INPUT, e.to_string());

    let system = read_system_transactions(&plan.system).map_err(input_err)?;
    let batches = plan
        .banks
        .iter()
        .map(|(path, name)| read_bank_statement(path, name))
        .collect::<Result<Vec<_>, _>>()
        .map_err(input_err)?;

    let system = plan.window.filter_internal(system);
    let batches = plan.window.filter_batches(batches);
    info!(window = %plan.window, system = system.len(), banks = batches.len(), "reconciling");

    Ok(reconcile(&system, &batches))
}

pub fn cmd_run(args: RunArgs, settings: &Settings) -> Result<(), CliError> {
    let plan = plan(args, settings)?;
    let summary = load_and_reconcile(&plan)?;

    let json_str = report::to_json(&summary)
        .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = plan.output {
        write_report(path, &json_str)?;
        eprintln!("wrote {}", path.display());
    }

    match plan.format {
        OutputFormat::Json => print!("{json_str}"),
        OutputFormat::Text => print!("{}", report::human_summary(&summary)),
    }

    eprintln!("{}", report::one_line(&summary));

    if plan.strict && !summary.is_clean() {
        return Err(CliError::new(EXIT_DIFFERENCES, "differences found (--strict)"));
    }
    Ok(())
}

fn write_report(path: &Path, contents: &str) -> Result<(), CliError> {
    std::fs::write(path, contents).map_err(|e| {
        CliError::new(EXIT_OUTPUT, format!("cannot write {}: {e}", path.display()))
    })
}

pub fn cmd_validate(job_path: PathBuf) -> Result<(), CliError> {
    let job = ReconJob::load(&job_path).map_err(config_err)?;

    let name = if job.name.is_empty() { "(unnamed)" } else { job.name.as_str() };
    eprintln!("valid: job '{}' with {} bank(s)", name, job.banks.len());

    for path in std::iter::once(&job.system.file).chain(job.banks.iter().map(|b| &b.file)) {
        if !path.exists() {
            eprintln!("  warning: {} does not exist", path.display());
        }
    }
    Ok(())
}
