//! photogate: check an image against a named profile.

mod output;

use clap::{Parser, Subcommand, ValueEnum};
use output::Printer;
use photogate_core::config::{Config, InputConfig, OutputConfig, OutputFormat};
use photogate_core::error::{exit_codes, Error, ErrorCode, ResultExt};
use photogate_image::{ImageValidator, RuleRegistry, ValidationReport};
use photogate_telemetry::{metrics, names, Event, LogGuard, TelemetryConfig, Timer};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "photogate")]
#[command(about = "Check images against fixed format, size, and transparency profiles")]
#[command(version)]
struct Cli {
    /// Configuration file (default: .photogate.toml, then the user config dir)
    #[arg(long, global = true, env = "PHOTOGATE_CONFIG")]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one image against a profile
    Check {
        /// Image file, or `-` to read stdin
        path: PathBuf,

        /// Profile name, e.g. 生活照 or 证件照
        #[arg(short = 't', long = "type", value_name = "PROFILE")]
        image_type: String,

        /// Output format (overrides the config file)
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Print collected metrics to stderr when done
        #[arg(long)]
        metrics: bool,
    },
    /// List the built-in profiles
    Profiles {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            output::print_error(&err, OutputConfig::default().color);
            return exit(err.code.exit_code());
        }
    };
    let color = config.schema.output.color;

    let _guard = match init_logging(&config, cli.verbose) {
        Ok(guard) => guard,
        Err(err) => {
            output::print_warning(&format!("logging disabled: {err:#}"), color);
            None
        }
    };
    for warning in &config.warnings {
        tracing::warn!(path = ?config.path, "{warning}");
    }

    let validator = ImageValidator::new(RuleRegistry::builtin());

    match cli.command {
        Commands::Check {
            path,
            image_type,
            format,
            metrics: show_metrics,
        } => {
            let format = format.map_or(config.schema.output.format, OutputFormat::from);
            let printer = Printer::new(format, color);
            let code = check(&validator, &config, &printer, &path, &image_type);
            if show_metrics {
                output::print_metrics(&metrics().export_json());
            }
            code
        }
        Commands::Profiles { json } => {
            let format = if json { OutputFormat::Json } else { config.schema.output.format };
            Printer::new(format, color).profiles(validator.rules());
            exit(exit_codes::SUCCESS)
        }
    }
}

fn init_logging(config: &Config, verbose: bool) -> anyhow::Result<Option<LogGuard>> {
    let logging = &config.schema.logging;
    photogate_telemetry::init_with_config(TelemetryConfig {
        log_level: if verbose { "debug".to_string() } else { logging.level.clone() },
        json: logging.json,
        log_directory: config.log_directory(),
        ..TelemetryConfig::default()
    })
}

/// Screen, validate, and print one upload.
fn check(
    validator: &ImageValidator,
    config: &Config,
    printer: &Printer,
    path: &Path,
    image_type: &str,
) -> ExitCode {
    if let Err(rejection) = screen_image_type(image_type, validator.rules()) {
        return reject(printer, &rejection);
    }

    let data = match read_input(path, &config.schema.input) {
        Ok(data) => data,
        Err(err) if err.code == ErrorCode::InputTooLarge => return reject(printer, &err),
        Err(err) => {
            tracing::error!(code = %err.code, error = %err.detail(), "Failed to read input");
            printer.report(&ValidationReport::rejected(
                "server error",
                format!("error detail: {}", err.detail()),
            ));
            return exit(err.code.exit_code());
        }
    };

    if data.is_empty() {
        return reject(printer, &Error::empty_input());
    }

    let timer = Timer::start(names::VALIDATE_DURATION_MS);
    let report = validator.validate(&data, image_type);
    let elapsed = timer.stop();

    metrics().increment(names::VALIDATIONS_TOTAL);
    metrics().increment(if report.success() {
        names::VALIDATIONS_PASSED
    } else {
        names::VALIDATIONS_FAILED
    });

    Event::new(
        "validation",
        serde_json::json!({
            "profile": image_type,
            "bytes": data.len(),
            "success": report.success(),
            "violations": report.errors().len(),
            "duration_ms": elapsed.as_millis() as u64,
        }),
    )
    .log();

    printer.report(&report);

    if report.success() {
        exit(exit_codes::SUCCESS)
    } else {
        exit(exit_codes::VALIDATION_FAILED)
    }
}

/// Print a rejection as a failed report and pick its exit status.
fn reject(printer: &Printer, rejection: &Error) -> ExitCode {
    metrics().increment(names::INPUT_REJECTED);
    tracing::warn!(
        code = %rejection.code,
        category = rejection.code.category(),
        reason = %rejection.message,
        "Input rejected"
    );
    printer.report(&ValidationReport::rejected(
        rejection.message.clone(),
        rejection.suggestion.clone().unwrap_or_default(),
    ));
    exit(rejection.code.exit_code())
}

/// A blank profile name is refused before any bytes are read. Unknown names
/// go through to the validator so its report lists the known ones.
fn screen_image_type(image_type: &str, rules: &RuleRegistry) -> photogate_core::Result<()> {
    if image_type.trim().is_empty() {
        let known: Vec<&str> = rules.known_names().collect();
        return Err(Error::missing_image_type(&known));
    }
    Ok(())
}

/// Read a file or stdin without ever holding more than the size limit.
fn read_input(path: &Path, limits: &InputConfig) -> photogate_core::Result<Vec<u8>> {
    if path == Path::new("-") {
        return read_capped(std::io::stdin().lock(), limits).context("While reading stdin");
    }

    let context = format!("While reading {}", path.display());
    let size = std::fs::metadata(path)
        .map_err(Error::from)
        .context(context.clone())?
        .len();
    if limits.exceeds_limit(size) {
        return Err(Error::input_too_large(Some(size), limits.max_bytes));
    }

    let file = std::fs::File::open(path)
        .map_err(Error::from)
        .context(context.clone())?;
    // the file may have grown since it was measured
    read_capped(file, limits).context(context)
}

fn read_capped(reader: impl Read, limits: &InputConfig) -> photogate_core::Result<Vec<u8>> {
    let mut data = Vec::new();
    match limits.read_cap() {
        Some(cap) => reader.take(cap).read_to_end(&mut data)?,
        None => {
            let mut reader = reader;
            reader.read_to_end(&mut data)?
        }
    };
    if limits.exceeds_limit(data.len() as u64) {
        return Err(Error::input_too_large(None, limits.max_bytes));
    }
    Ok(data)
}

fn exit(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn limit(max_bytes: u64) -> InputConfig {
        InputConfig { max_bytes }
    }

    #[test]
    fn test_blank_type_is_rejected() {
        let rules = RuleRegistry::builtin();
        let err = screen_image_type("  ", &rules).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingImageType);
        assert_eq!(
            err.suggestion.as_deref(),
            Some("provide an image type, one of: 生活照, 证件照")
        );
    }

    #[test]
    fn test_unknown_type_is_not_screened() {
        let rules = RuleRegistry::builtin();
        assert!(screen_image_type("passport", &rules).is_ok());
    }

    #[test]
    fn test_read_capped_within_limit() {
        let data = read_capped(Cursor::new(b"12345".to_vec()), &limit(5)).unwrap();
        assert_eq!(data, b"12345");
    }

    #[test]
    fn test_read_capped_stops_after_limit() {
        let mut source = Cursor::new(vec![7u8; 1024]);
        let err = read_capped(&mut source, &limit(4)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InputTooLarge);
        // only one byte past the limit was consumed
        assert_eq!(source.position(), 5);
    }

    #[test]
    fn test_read_capped_unlimited() {
        let data = read_capped(Cursor::new(vec![1u8; 4096]), &limit(0)).unwrap();
        assert_eq!(data.len(), 4096);
    }

    #[test]
    fn test_oversized_file_is_refused_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        std::fs::write(&path, vec![0u8; 64]).unwrap();

        let err = read_input(&path, &limit(16)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InputTooLarge);
        assert_eq!(
            err.suggestion.as_deref(),
            Some("file is 64 bytes, limit is 16 bytes")
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_input(Path::new("/no/such/photo.png"), &limit(16)).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert_eq!(err.code.exit_code(), exit_codes::FAILURE);
        assert!(err.detail().starts_with("While reading /no/such/photo.png: "));
    }

    #[test]
    fn test_cli_parses_check() {
        let cli = Cli::try_parse_from(["photogate", "check", "a.png", "--type", "生活照", "-f", "json"])
            .unwrap();
        match cli.command {
            Commands::Check { image_type, format, .. } => {
                assert_eq!(image_type, "生活照");
                assert!(matches!(format, Some(Format::Json)));
            }
            Commands::Profiles { .. } => panic!("expected check"),
        }
    }
}
