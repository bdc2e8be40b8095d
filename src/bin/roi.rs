//! ROI CLI - Command-line interface for Synheart ROI
//!
//! Commands:
//! - show: Project a dashboard view from synthetic or recorded samples
//! - generate: Emit synthetic samples
//! - validate: Validate a recorded sample file
//! - doctor: Diagnose configuration and environment

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use synheart_roi::dashboard::{ViewContent, ViewProjection};
use synheart_roi::insights::format_thousands;
use synheart_roi::source::{generate, parse_ndjson_lines, validate_samples};
use synheart_roi::types::HealthSample;
use synheart_roi::{
    DashboardConfig, DashboardEncoder, DashboardState, FixtureSource, HealthSampleSource,
    InvestmentLedger, RangePolicy, RoiError, SyntheticSource, ViewMode, PRODUCER_NAME,
    ROI_VERSION,
};

/// ROI - Health return-on-investment dashboard engine
#[derive(Parser)]
#[command(name = "roi")]
#[command(author = "Synheart AI Inc")]
#[command(version = ROI_VERSION)]
#[command(about = "Compute health ROI dashboard views", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project a dashboard view
    Show {
        /// View to project
        #[arg(long, default_value = "dashboard")]
        view: ViewArg,

        /// Seed for synthetic samples (ignored when --samples is given)
        #[arg(long)]
        seed: Option<u64>,

        /// Recorded samples file (use - for stdin)
        #[arg(long)]
        samples: Option<PathBuf>,

        /// Samples input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// JSON array of investments replacing the starter set
        #[arg(long)]
        investments: Option<PathBuf>,

        /// Configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Out-of-range handling for scores and radar values
        #[arg(long)]
        range_policy: Option<PolicyArg>,

        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Emit synthetic samples
    Generate {
        /// Generator seed
        #[arg(long, default_value = "1")]
        seed: u64,

        /// Number of days
        #[arg(long, default_value = "30")]
        days: usize,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: SampleFormat,
    },

    /// Validate a recorded sample file
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and environment
    Doctor {
        /// Check configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    Dashboard,
    Investments,
    Trends,
    Insights,
}

impl From<ViewArg> for ViewMode {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Dashboard => ViewMode::Dashboard,
            ViewArg::Investments => ViewMode::Investments,
            ViewArg::Trends => ViewMode::Trends,
            ViewArg::Insights => ViewMode::Insights,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Saturate,
    Passthrough,
}

impl From<PolicyArg> for RangePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Saturate => RangePolicy::Saturate,
            PolicyArg::Passthrough => RangePolicy::Passthrough,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one sample per line)
    Ndjson,
    /// JSON array of samples
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Text,
    /// Compact JSON payload
    Json,
    /// Pretty-printed JSON payload
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SampleFormat {
    Ndjson,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "synheart_roi=info,roi=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), RoiCliError> {
    match cli.command {
        Commands::Show {
            view,
            seed,
            samples,
            input_format,
            investments,
            config,
            range_policy,
            output_format,
        } => cmd_show(
            view.into(),
            seed,
            samples.as_deref(),
            input_format,
            investments.as_deref(),
            config.as_deref(),
            range_policy.map(Into::into),
            output_format,
        ),

        Commands::Generate {
            seed,
            days,
            output_format,
        } => cmd_generate(seed, days, output_format),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_show(
    view: ViewMode,
    seed: Option<u64>,
    samples: Option<&Path>,
    input_format: InputFormat,
    investments: Option<&Path>,
    config: Option<&Path>,
    range_policy: Option<RangePolicy>,
    output_format: OutputFormat,
) -> Result<(), RoiCliError> {
    let mut config = match config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(policy) = range_policy {
        config.range_policy = policy;
    }
    if seed.is_some() {
        config.seed = seed;
    }

    let source: Box<dyn HealthSampleSource> = match samples {
        Some(path) => {
            let data = read_input(path)?;
            let fixture = match input_format {
                InputFormat::Ndjson => FixtureSource::parse_ndjson(&data)?,
                InputFormat::Json => FixtureSource::parse_array(&data)?,
            };
            info!(samples = fixture.len(), path = %path.display(), "loaded recorded samples");
            Box::new(fixture)
        }
        None => {
            let seed = config.seed.unwrap_or(1);
            info!(seed, "using synthetic samples");
            Box::new(SyntheticSource::new(seed))
        }
    };

    let mut state = DashboardState::new(source.as_ref(), config)?;

    if let Some(path) = investments {
        let ledger = InvestmentLedger::from_json(&read_input(path)?)?;
        debug!(count = ledger.len(), "loaded investments");
        state = state.with_ledger(ledger);
    }

    let encoder = DashboardEncoder::new();
    match output_format {
        OutputFormat::Text => {
            let projection = state.project_view(view)?;
            print!("{}", render_text(view, &projection));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&encoder.encode_view(&state, view)?)?);
        }
        OutputFormat::JsonPretty => {
            println!(
                "{}",
                serde_json::to_string_pretty(&encoder.encode_view(&state, view)?)?
            );
        }
    }

    Ok(())
}

fn cmd_generate(seed: u64, days: usize, output_format: SampleFormat) -> Result<(), RoiCliError> {
    let samples = generate(seed, days);

    match output_format {
        SampleFormat::Ndjson => {
            for sample in &samples {
                println!("{}", serde_json::to_string(sample)?);
            }
        }
        SampleFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&samples)?);
        }
    }

    Ok(())
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), RoiCliError> {
    let data = read_input(input)?;

    let samples: Vec<HealthSample> = match input_format {
        InputFormat::Ndjson => parse_ndjson_lines(&data)?,
        InputFormat::Json => serde_json::from_str(&data)?,
    };

    let defaults = DashboardConfig::default();
    let error = validate_samples(&samples).err().map(|e| e.to_string());
    let report = ValidationReport {
        total_samples: samples.len(),
        first_day: samples.first().map(|s| s.day),
        last_day: samples.last().map(|s| s.day),
        covers_dashboard_window: samples.len() >= defaults.window_days,
        error,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total samples: {}", report.total_samples);
        if let (Some(first), Some(last)) = (report.first_day, report.last_day) {
            println!("Days:          {} - {}", first, last);
        }
        println!(
            "30-day window: {}",
            if report.covers_dashboard_window { "yes" } else { "no" }
        );
        if let Some(err) = &report.error {
            println!("\nError: {}", err);
        }
    }

    if report.error.is_some() {
        Err(RoiCliError::ValidationFailed)
    } else {
        Ok(())
    }
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), RoiCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "roi_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("ROI version {}", ROI_VERSION),
    });

    if let Some(config_path) = config {
        if config_path.exists() {
            match DashboardConfig::load(config_path) {
                Ok(config) => checks.push(DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Ok,
                    message: format!(
                        "Config valid ({} day window, {} day average, {:?} policy)",
                        config.window_days, config.rolling_window, config.range_policy
                    ),
                }),
                Err(e) => checks.push(DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Error,
                    message: e.to_string(),
                }),
            }
        } else {
            checks.push(DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Warning,
                message: "Config file does not exist".to_string(),
            });
        }
    }

    // Smoke-test the full projection path with a synthetic window
    let smoke = DashboardState::new(&SyntheticSource::new(1), DashboardConfig::default())
        .and_then(|state| state.health_score());
    checks.push(match smoke {
        Ok(score) => DoctorCheck {
            name: "pipeline".to_string(),
            status: CheckStatus::Ok,
            message: format!("Synthetic dashboard computed (health score {})", score),
        },
        Err(e) => DoctorCheck {
            name: "pipeline".to_string(),
            status: CheckStatus::Error,
            message: e.to_string(),
        },
    });

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (samples can be piped with --samples -)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: ROI_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("ROI Doctor Report");
        println!("=================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(RoiCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn read_input(path: &Path) -> Result<String, RoiCliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn signed(value: i64) -> String {
    if value > 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

fn render_text(view: ViewMode, projection: &ViewProjection) -> String {
    let mut out = String::new();
    out.push_str(&format!("Health ROI - {}\n", view));
    out.push_str(&format!("Health Score: {}\n\n", projection.health_score));

    match &projection.content {
        ViewContent::Dashboard(dashboard) => {
            for card in &dashboard.cards {
                let value = if card.unit == "steps" {
                    format_thousands(card.value)
                } else {
                    format!("{} {}", card.value, card.unit)
                };
                out.push_str(&format!(
                    "{:<14} {:>12}  {:>5}%  ({})\n",
                    card.title,
                    value,
                    signed(card.trend_percent),
                    card.subtitle
                ));
            }
            out.push_str("\nHealth Overview\n");
            for point in &dashboard.radar {
                out.push_str(&format!(
                    "  {:<14} {:>5.0}%\n",
                    point.category.label(),
                    point.value
                ));
            }
        }
        ViewContent::Investments(investments) => {
            out.push_str(&format!(
                "Monthly Investment: ${}\n",
                investments.total_monthly_cost
            ));
            out.push_str(&format!(
                "Weekly Time:        {} hrs\n",
                investments.total_weekly_time
            ));
            out.push_str(&format!(
                "Health Score Gain:  {}\n\n",
                signed(investments.score_gain)
            ));
            for inv in &investments.investments {
                out.push_str(&format!(
                    "  #{:<3} {:<20} {:<14} ${}/mo  {}h/wk{}\n",
                    inv.id,
                    inv.name,
                    inv.category,
                    inv.monthly_cost,
                    inv.weekly_time_hours,
                    if inv.active { "" } else { "  (paused)" }
                ));
            }
        }
        ViewContent::Trends(trends) => {
            for series in [&trends.activity, &trends.recovery] {
                out.push_str(&format!("{}\n", series.label));
                for point in &series.points {
                    out.push_str(&format!("  day {:>2}: {:.1}\n", point.day, point.value));
                }
            }
        }
        ViewContent::Insights(insights) => {
            out.push_str(&format!(
                "Monthly Investment: ${}\nHealth Score Improvement: {} points\n\n",
                insights.monthly_investment,
                signed(insights.score_gain)
            ));
            for metric in &insights.metrics {
                out.push_str(&format!(
                    "{:<24} {} {} -> {} {}  ({}%)\n",
                    metric.label,
                    metric.baseline,
                    metric.unit,
                    metric.current,
                    metric.unit,
                    signed(metric.rounded_improvement())
                ));
            }
            out.push('\n');
            for insight in &insights.insights {
                out.push_str(&format!("{} {}\n", insight.headline, insight.message));
            }
        }
    }

    out
}

// Error types

#[derive(Debug)]
enum RoiCliError {
    Io(io::Error),
    Compute(RoiError),
    Json(serde_json::Error),
    ValidationFailed,
    DoctorFailed,
}

impl From<io::Error> for RoiCliError {
    fn from(e: io::Error) -> Self {
        RoiCliError::Io(e)
    }
}

impl From<RoiError> for RoiCliError {
    fn from(e: RoiError) -> Self {
        RoiCliError::Compute(e)
    }
}

impl From<serde_json::Error> for RoiCliError {
    fn from(e: serde_json::Error) -> Self {
        RoiCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<RoiCliError> for CliError {
    fn from(e: RoiCliError) -> Self {
        match e {
            RoiCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            RoiCliError::Compute(e) => {
                let (code, hint) = match &e {
                    RoiError::InsufficientHistory { .. } => (
                        "INSUFFICIENT_HISTORY",
                        "Provide at least as many samples as the dashboard window",
                    ),
                    RoiError::InvalidInvestment(_) | RoiError::InvestmentNotFound(_) => {
                        ("INVESTMENT_ERROR", "Check the investments file")
                    }
                    RoiError::InvalidSample { .. } => {
                        ("INVALID_SAMPLE", "Run 'roi validate' for details")
                    }
                    RoiError::InvalidConfig(_) => ("CONFIG_ERROR", "Run 'roi doctor --config'"),
                    RoiError::ParseError(_) | RoiError::JsonError(_) => {
                        ("PARSE_ERROR", "Check input format")
                    }
                    RoiError::DivisionByZero(_) => ("COMPUTE_ERROR", "Check baseline values"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            RoiCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            RoiCliError::ValidationFailed => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: "Sample file failed validation".to_string(),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            RoiCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_samples: usize,
    first_day: Option<u32>,
    last_day: Option<u32>,
    covers_dashboard_window: bool,
    error: Option<String>,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
