//! Rapport CLI - command-line interface for the interest scoring engine
//!
//! Commands:
//! - analyze: Score a chat export
//! - config: Print the default configuration as TOML
//! - doctor: Diagnose configuration and environment

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rapport::adapters::{self, Platform};
use rapport::insights::insights;
use rapport::{
    AnalysisError, AnalyzerConfig, InterestAnalyzer, ReportEncoder, ScoreReport, SignalKind,
    PRODUCER_NAME, RAPPORT_VERSION, SCHEMA_VERSION,
};

/// Rapport - score how interested someone is from an exported chat log
#[derive(Parser)]
#[command(name = "rapport")]
#[command(version = RAPPORT_VERSION)]
#[command(about = "Score conversational interest from chat exports", long_about = None)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a chat export
    Analyze {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Name of the person whose interest is scored, as it appears in the export
        #[arg(long)]
        them: String,

        /// Your own name, as it appears in the export
        #[arg(long)]
        me: String,

        /// Export format (messenger, instagram, whatsapp, imessage, json, csv); detected when omitted
        #[arg(long)]
        platform: Option<String>,

        /// Configuration file (TOML, or JSON with a .json extension)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the default configuration as TOML
    Config,

    /// Diagnose configuration and environment
    Doctor {
        /// Configuration file to validate
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable report
    Text,
    /// Report payload as compact JSON
    Json,
    /// Report payload as pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

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

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "rapport=debug" } else { "rapport=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run(cli: Cli) -> Result<(), RapportCliError> {
    match cli.command {
        Commands::Analyze {
            input,
            them,
            me,
            platform,
            config,
            format,
        } => cmd_analyze(
            &input,
            &them,
            &me,
            platform.as_deref(),
            config.as_deref(),
            format,
        ),
        Commands::Config => cmd_config(),
        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),
    }
}

fn cmd_analyze(
    input: &Path,
    them: &str,
    me: &str,
    platform: Option<&str>,
    config: Option<&Path>,
    format: OutputFormat,
) -> Result<(), RapportCliError> {
    let content = read_input(input)?;
    let platform = match platform {
        Some(name) => name.parse::<Platform>()?,
        None => adapters::detect_platform(&input.to_string_lossy(), &content),
    };
    info!(platform = %platform, input = %input.display(), "loading chat export");

    let records = adapters::parse(platform, &content)?;
    if records.is_empty() {
        return Err(RapportCliError::NoMessages);
    }

    let config = match config {
        Some(path) => AnalyzerConfig::from_path(path)?,
        None => AnalyzerConfig::default(),
    };
    let analyzer = InterestAnalyzer::new(config)?;
    let report = analyzer.analyze_records(records, me, them)?;

    match format {
        OutputFormat::Text => print!("{}", render_text(&report, them, platform)),
        OutputFormat::Json => {
            let payload = ReportEncoder::new().encode(report, me, them);
            println!("{}", serde_json::to_string(&payload)?);
        }
        OutputFormat::JsonPretty => {
            println!("{}", ReportEncoder::new().encode_to_json(report, me, them)?);
        }
    }
    Ok(())
}

fn cmd_config() -> Result<(), RapportCliError> {
    print!("{}", AnalyzerConfig::default().to_toml_string()?);
    Ok(())
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), RapportCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "rapport_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Rapport version {RAPPORT_VERSION}"),
    });

    checks.push(DoctorCheck {
        name: "schema_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Report schema: {SCHEMA_VERSION}"),
    });

    // Defaults always pass; a provided file is loaded and compiled like a real run
    let config_check = match config {
        None => DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Ok,
            message: "Using built-in defaults".to_string(),
        },
        Some(path) if !path.exists() => DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Warning,
            message: format!("Config file {} does not exist", path.display()),
        },
        Some(path) => match AnalyzerConfig::from_path(path).and_then(InterestAnalyzer::new) {
            Ok(analyzer) => DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Ok,
                message: format!(
                    "Config valid (weights sum to {:.3})",
                    analyzer.config().weights.total()
                ),
            },
            Err(e) => DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Error,
                message: e.to_string(),
            },
        },
    };
    checks.push(config_check);

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (pass an export with --input)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (--input - ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: RAPPORT_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Rapport Doctor Report");
        println!("=====================");
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
        Err(RapportCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn read_input(input: &Path) -> Result<String, RapportCliError> {
    if input == Path::new("-") {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn render_text(report: &ScoreReport, them: &str, platform: Platform) -> String {
    let rule = "=".repeat(60);
    let mut out = String::new();

    out.push_str(&format!("\n{rule}\nINTEREST ANALYSIS: {them} ({platform})\n{rule}\n\n"));
    out.push_str(&format!(
        "Overall score: {:.1}/100  [{}]\n{}\n\n",
        report.composite,
        report.label,
        report.label.description()
    ));

    out.push_str("Signal breakdown:\n");
    for signal in &report.signals {
        let marker = if signal.is_insufficient() { "  (not enough data)" } else { "" };
        out.push_str(&format!(
            "  {:<25} {:>5.1}  x{:.2}{}\n",
            signal.kind.title(),
            signal.score,
            signal.weight,
            marker
        ));
    }

    let summary = &report.summary;
    out.push_str(&format!(
        "\nMessages: {} total, {} from {them}, {} from you\n",
        summary.message_count, summary.their_message_count, summary.my_message_count
    ));
    out.push_str(&format!(
        "Span: {} to {}\n",
        summary.first_message_at.format("%Y-%m-%d %H:%M"),
        summary.last_message_at.format("%Y-%m-%d %H:%M")
    ));
    if let Some(response) = report.signal(SignalKind::ResponseTime) {
        if let Some(median) = response.detail.get("median_minutes") {
            out.push_str(&format!("Median reply time: {:.1} min\n", median.as_f64()));
        }
    }

    let remarks = insights(report);
    if !remarks.is_empty() {
        out.push_str("\nInsights:\n");
        for remark in remarks {
            out.push_str(&format!("  - {}\n", remark.message));
        }
    }

    out.push_str(&format!(
        "\n{rule}\nThis is data analysis, not a verdict. Use it as one data point.\n{rule}\n"
    ));
    out
}

// Error types

#[derive(Debug)]
enum RapportCliError {
    Io(io::Error),
    Analysis(AnalysisError),
    Json(serde_json::Error),
    NoMessages,
    DoctorFailed,
}

impl From<io::Error> for RapportCliError {
    fn from(e: io::Error) -> Self {
        RapportCliError::Io(e)
    }
}

impl From<AnalysisError> for RapportCliError {
    fn from(e: AnalysisError) -> Self {
        RapportCliError::Analysis(e)
    }
}

impl From<serde_json::Error> for RapportCliError {
    fn from(e: serde_json::Error) -> Self {
        RapportCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<RapportCliError> for CliError {
    fn from(e: RapportCliError) -> Self {
        match e {
            RapportCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            RapportCliError::Analysis(e) => {
                let (code, hint) = match &e {
                    AnalysisError::InvalidInput(_) => (
                        "INVALID_INPUT",
                        "Ensure --me and --them exactly match the names in the export",
                    ),
                    AnalysisError::ParseError(_) => (
                        "PARSE_ERROR",
                        "Check that the file format matches --platform",
                    ),
                    AnalysisError::JsonError(_) => ("JSON_ERROR", "Check JSON syntax"),
                    AnalysisError::ConfigError(_) => (
                        "CONFIG_ERROR",
                        "Run 'rapport config' for a valid starting point",
                    ),
                    AnalysisError::UnsupportedPlatform(_) => (
                        "UNSUPPORTED_PLATFORM",
                        "Use messenger, instagram, whatsapp, json or imessage",
                    ),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            RapportCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            RapportCliError::NoMessages => CliError {
                code: "NO_MESSAGES".to_string(),
                message: "No messages found in input".to_string(),
                hint: Some("Check the file format matches your platform".to_string()),
            },
            RapportCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

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
