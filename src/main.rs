//! langsniff CLI entry point

use std::process::ExitCode;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use langsniff::cli::{format_reports, Report};
use langsniff::{Cli, Detector, DetectorConfig, ProfileStore, ProfileStoreBuilder};

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .init();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run(cli: &Cli) -> langsniff::Result<String> {
    // 1. Configuration
    let mut config = match &cli.config {
        Some(path) => DetectorConfig::load(path)?,
        None => DetectorConfig::load_default()?,
    };
    if cli.no_exact_check {
        config.exact_check = false;
    }

    // 2. Profiles
    let builder = ProfileStore::builder().limits(&config.limits);
    let store = match &cli.profiles {
        Some(path) => builder.add_path(path)?.build()?,
        None => builtin_profiles(builder)?,
    };

    let detector = Detector::with_config(store, config)?;

    // 3. Detect
    let inputs = cli.read_inputs()?;
    let snippets: Vec<&str> = inputs.iter().map(|(_, code)| code.as_str()).collect();
    let results = detector.detect_batch(&snippets);

    let reports: Vec<Report> = inputs
        .iter()
        .zip(results)
        .map(|((source, code), result)| {
            let report = Report::new(source.as_str(), result, cli.threshold);
            if cli.scores {
                report.with_scores(detector.scores(code))
            } else {
                report
            }
        })
        .collect();

    format_reports(&reports, cli.format)
}

#[cfg(feature = "embedded-profiles")]
fn builtin_profiles(builder: ProfileStoreBuilder) -> langsniff::Result<ProfileStore> {
    builder.add_builtin()?.build()
}

#[cfg(not(feature = "embedded-profiles"))]
fn builtin_profiles(_builder: ProfileStoreBuilder) -> langsniff::Result<ProfileStore> {
    Err(langsniff::LangSniffError::SourceNotFound {
        path: "built-in profiles are disabled; pass --profiles".to_string(),
    })
}
