// LogMixer - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Filter rules loading
// 4. The merge run and process exit status

use clap::Parser;
use logmixer::app::merge::{self, MergeRequest};
use logmixer::core::discovery::DiscoveryConfig;
use logmixer::core::segment::SegmentConfig;
use logmixer::platform::config::{self, PlatformPaths};
use logmixer::util::{self, constants};
use std::path::PathBuf;
use std::process::ExitCode;

/// LogMixer - merge timestamped multi-line log files into one
/// chronologically ordered file.
#[derive(Parser, Debug)]
#[command(name = "logmixer", version, about)]
struct Cli {
    /// Directory searched recursively for *.log and *.txt files.
    #[arg(short = 'p', long = "path", default_value = constants::DEFAULT_INPUT_DIR)]
    path: PathBuf,

    /// Merged output file (created or truncated).
    #[arg(short = 'o', long = "out", default_value = constants::DEFAULT_OUTPUT_FILE)]
    out: PathBuf,

    /// YAML filter rules file [default: <config dir>/filters.yaml].
    #[arg(short = 'f', long = "filters")]
    filters: Option<PathBuf>,

    /// Worker threads for segmentation (0 = one per CPU core).
    /// Overrides [merge] worker_threads from config.toml.
    #[arg(short = 'j', long = "jobs")]
    jobs: Option<usize>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let platform_paths = PlatformPaths::resolve();
    let (app_config, config_warnings) = config::load_config(&platform_paths.config_file());

    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "LogMixer starting"
    );

    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
    }

    let filters_path = cli
        .filters
        .clone()
        .unwrap_or_else(|| platform_paths.filters_file());
    let (filter, _filter_warnings) = config::load_filter_config(&filters_path);

    let request = MergeRequest {
        input_dir: cli.path.clone(),
        output_file: cli.out.clone(),
        filter,
        discovery: DiscoveryConfig {
            max_depth: app_config.max_depth,
            include_patterns: app_config.include_patterns.clone(),
            exclude_patterns: app_config.exclude_patterns.clone(),
            exclude_paths: Vec::new(),
        },
        segment: SegmentConfig {
            max_line_bytes: app_config.max_line_bytes,
        },
        worker_threads: cli.jobs.unwrap_or(app_config.worker_threads),
    };

    match merge::run_merge(&request) {
        Ok(summary) => {
            if !summary.warnings.is_empty() {
                tracing::warn!(
                    count = summary.warnings.len(),
                    "Some sources could not be fully read"
                );
            }
            println!("Done. Written to {}", cli.out.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Merge failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
