use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use research_digest::batch::{read_inputs, write_jsonl, BatchSummary};
use research_digest::config::{find_config_file, load_config, load_env_config, ApiKeys, Config};
use research_digest::Extractor;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default file written by `init-config`
const DEFAULT_CONFIG_FILE: &str = "research-digest.toml";

/// Research Digest - Extract text and metadata from AI research papers, repositories, models and posts
#[derive(Parser, Debug)]
#[command(name = "research-digest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "hongkongkiwi")]
#[command(about = "Extract text and metadata from AI research sources", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the configuration file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a URL or identifier without fetching it
    #[command(alias = "r")]
    Resolve {
        /// URL or identifier (e.g. https://github.com/openai/gym, 1611.07004)
        input: String,
    },

    /// Extract one document and print its record as JSON
    #[command(alias = "x")]
    Extract {
        /// URL or identifier
        input: String,
    },

    /// Extract every line of a file, writing JSON Lines
    #[command(alias = "b")]
    Batch {
        /// Input file with one URL or identifier per line (`#` starts a comment)
        file: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Write a configuration file with default values
    InitConfig {
        /// Where to write the file
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Load configuration from file if specified or found in default locations
fn load_configuration(cli: &Cli) -> Result<(Config, Option<PathBuf>)> {
    let path = cli.config.clone().or_else(find_config_file);
    let mut config = match &path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => load_env_config().context("Failed to load config from the environment")?,
    };

    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
    }

    Ok((config, path))
}

fn init_tracing(cli: &Cli, config: &Config) {
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("research_digest={}", log_level)),
    );

    // Logs go to stderr so stdout stays machine-readable
    let registry = tracing_subscriber::registry().with(env_filter);
    if config.logging.format.as_deref() == Some("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}

fn batch_progress(len: usize, quiet: bool) -> indicatif::ProgressBar {
    if quiet {
        return indicatif::ProgressBar::hidden();
    }

    let pb = indicatif::ProgressBar::new(len as u64);
    pb.set_style(
        indicatif::ProgressStyle::with_template(
            "{msg}\n{spinner:.cyan} {wide_bar:.cyan/blue} {pos}/{len}",
        )
        .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
        .progress_chars("█  "),
    );
    pb.set_message("Extracting documents");
    pb
}

async fn run_batch(
    extractor: &Extractor,
    file: &Path,
    out: Option<&Path>,
    quiet: bool,
) -> Result<BatchSummary> {
    let reader = BufReader::new(
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?,
    );
    let inputs = read_inputs(reader)?;
    tracing::info!("Processing {} inputs from {}", inputs.len(), file.display());

    let pb = batch_progress(inputs.len(), quiet);
    let items = extractor
        .extract_batch_with(&inputs, |item| {
            pb.set_message(item.input.clone());
            pb.inc(1);
        })
        .await;
    pb.finish_and_clear();

    match out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_jsonl(io::BufWriter::new(file), &items)?;
        }
        None => write_jsonl(io::stdout().lock(), &items)?,
    }

    Ok(BatchSummary::from_items(&items))
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    // Tokens picked up from the environment are not written to disk
    let config = Config {
        api_keys: ApiKeys::none(),
        ..Config::default()
    };
    config.save(path)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_path) = load_configuration(&cli)?;
    init_tracing(&cli, &config);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    match &cli.command {
        Commands::Resolve { input } => {
            let reference = research_digest::resolve(input)?;
            print_json(&reference, cli.pretty)?;
        }

        Commands::Extract { input } => {
            let extractor = Extractor::new(&config)?;
            let record = extractor.extract(input).await?;
            print_json(&record, cli.pretty)?;
        }

        Commands::Batch { file, out } => {
            let extractor = Extractor::new(&config)?;
            let summary = run_batch(&extractor, file, out.as_deref(), cli.quiet).await?;
            if !cli.quiet {
                eprintln!(
                    "Processed {} inputs: {} succeeded, {} failed",
                    summary.total, summary.succeeded, summary.failed
                );
            }
        }

        Commands::InitConfig { path, force } => {
            init_config(path, *force)?;
            if !cli.quiet {
                eprintln!("Wrote default configuration to {}", path.display());
            }
        }
    }

    Ok(())
}
