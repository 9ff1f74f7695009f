use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use talkscore::analysis::{self, AnalysisError, AnalysisSettings, CacheConfig};
use talkscore::fetch::FailedRecording;
use talkscore::input::{self, STDIN_SOURCE};
use talkscore::output::{self, ScoredInput};
use talkscore::scoring::{calculate_score, ScoreResult};

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_RATE_LIMIT: i32 = 3;
const EXIT_CONFIG: i32 = 4;
const EXIT_INPUT: i32 = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// One JSON object per input
    Json,
    /// score, band and source separated by tabs
    Tsv,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score analysis results stored as JSON
    Score {
        /// JSON files or glob patterns; "-" or nothing reads standard input
        inputs: Vec<String>,
    },
    /// Upload recordings to the analysis service and score them
    Analyze {
        /// Audio files or glob patterns
        #[arg(required = true)]
        audio: Vec<String>,

        /// Analysis endpoint (overrides TALKSCORE_ENDPOINT and the config file)
        #[arg(long)]
        endpoint: Option<String>,

        /// Save each raw analysis as <DIR>/<name>.analysis.json
        #[arg(long, value_name = "DIR")]
        save_dir: Option<PathBuf>,

        /// Skip the analysis cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Create a config file interactively
    Init,
    /// Remove cached analysis responses
    ClearCache,
}

#[derive(Parser, Debug)]
#[command(name = "talkscore")]
#[command(about = "Score speaking practice from speech analysis metrics", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and per-metric breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/talkscore/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "talkscore=debug,warn" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Exit code for a failed input: upload errors by kind, everything else is bad input
fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<AnalysisError>() {
        Some(AnalysisError::Unauthorized) => EXIT_AUTH,
        Some(AnalysisError::RateLimited) => EXIT_RATE_LIMIT,
        Some(_) => EXIT_NETWORK,
        None => EXIT_INPUT,
    }
}

/// Exit code when nothing in a batch succeeded: decided by the first input that failed
fn batch_exit_code(failed: &[FailedRecording]) -> i32 {
    failed
        .first()
        .map(|f| exit_code_for(&f.error))
        .unwrap_or(EXIT_INPUT)
}

fn print_results(results: &[(String, ScoreResult)], format: OutputFormat, verbose: bool) {
    let scored: Vec<ScoredInput> = results
        .iter()
        .map(|(source, result)| ScoredInput { source, result })
        .collect();

    match format {
        OutputFormat::Text => {
            let use_colors = output::should_use_colors();
            println!("{}", output::format_reports(&scored, verbose, use_colors));
        }
        OutputFormat::Tsv => println!("{}", output::format_tsv(&scored)),
        OutputFormat::Json => match output::format_json(&scored) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to render JSON: {:#}", e);
                std::process::exit(EXIT_INPUT);
            }
        },
    }
}

/// Expand CLI arguments into input sources; a lone "-" (or nothing) means stdin.
/// Patterns that fail to expand are returned as failures.
fn collect_sources(patterns: &[String]) -> (Vec<String>, Vec<(String, anyhow::Error)>) {
    if patterns.is_empty() {
        return (vec![STDIN_SOURCE.to_string()], Vec::new());
    }

    let mut sources = Vec::new();
    let mut failed = Vec::new();
    for pattern in patterns {
        if pattern == STDIN_SOURCE {
            sources.push(STDIN_SOURCE.to_string());
            continue;
        }
        match input::expand_patterns(std::slice::from_ref(pattern)) {
            Ok(paths) => sources.extend(paths.iter().map(|p| p.display().to_string())),
            Err(e) => failed.push((pattern.clone(), e)),
        }
    }
    (sources, failed)
}

#[tokio::main]
async fn main() {
    // Already-installed is fine; a provider is all rustls 0.23+ needs.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();

    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = cli.command {
        if let Err(e) = talkscore::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match talkscore::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = talkscore::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let scoring = config.scoring();

    match cli.command {
        // Handled before the config is loaded
        Commands::Init => {}
        Commands::ClearCache => {
            let cache_path = analysis::cache::get_cache_path();
            if let Err(e) = analysis::cache::clear_cache(&cache_path) {
                eprintln!("Failed to clear cache: {:#}", e);
                std::process::exit(EXIT_INPUT);
            }
            println!("Cleared analysis cache at {}", cache_path.display());
        }
        Commands::Score { inputs } => {
            let (sources, mut failed) = collect_sources(&inputs);
            let mut results = Vec::new();

            for source in sources {
                let value = if source == STDIN_SOURCE {
                    input::read_json_stdin()
                } else {
                    input::read_json_file(&PathBuf::from(&source))
                };
                match value {
                    Ok(value) => {
                        let result = calculate_score(&value, &scoring);
                        tracing::debug!(source = %source, score = result.score, "scored");
                        results.push((source, result));
                    }
                    Err(e) => failed.push((source, e)),
                }
            }

            for (source, error) in &failed {
                eprintln!("{}: {:#}", source, error);
            }
            if results.is_empty() {
                std::process::exit(EXIT_INPUT);
            }

            print_results(&results, cli.format, cli.verbose);
        }
        Commands::Analyze {
            audio,
            endpoint,
            save_dir,
            no_cache,
        } => {
            let Some(endpoint) = talkscore::config::resolve_endpoint(endpoint.as_deref(), &config)
            else {
                eprintln!("No analysis endpoint configured.");
                eprintln!("Pass --endpoint, set TALKSCORE_ENDPOINT, or add to ~/.config/talkscore/config.yaml:");
                eprintln!("  endpoint: \"https://api.example.com/v1/analyze\"");
                std::process::exit(EXIT_CONFIG);
            };
            if let Err(e) = talkscore::config::validate_endpoint(&endpoint) {
                eprintln!("Invalid endpoint: {}", e);
                std::process::exit(EXIT_CONFIG);
            }

            let (paths, pattern_failures) = input::expand_each(&audio);

            let client = match analysis::create_client(config.timeout()) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Failed to create HTTP client: {:#}", e);
                    std::process::exit(EXIT_NETWORK);
                }
            };

            let settings = AnalysisSettings {
                endpoint,
                api_key: analysis::get_api_key_from_env(),
                retries: config.retries(),
            };
            let cache_config = CacheConfig { enabled: !no_cache };

            let (scored, failed) = talkscore::fetch::analyze_and_score(
                &client,
                &settings,
                &scoring,
                &paths,
                &cache_config,
                save_dir.as_deref(),
            )
            .await;

            let failed = talkscore::fetch::failures_in_input_order(pattern_failures, failed);
            for failure in &failed {
                eprintln!("{}: {:#}", failure.source, failure.error);
            }
            if scored.is_empty() {
                std::process::exit(batch_exit_code(&failed));
            }

            let results: Vec<(String, ScoreResult)> = scored
                .into_iter()
                .map(|s| (s.source, s.result))
                .collect();
            print_results(&results, cli.format, cli.verbose);
        }
    }

    tracing::debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}
