use clap::Parser;
use log::{error, info};
use parley::ProviderKind;
use parley::core::config::{self, ResolvedConfig};
use parley::inference::CompletionProvider;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

const LOG_FILE: &str = "parley.log";

#[derive(Parser)]
#[command(name = "parley", about = "Terminal chat client for streaming LLM backends")]
struct Args {
    /// LLM provider to use (overrides config file and PARLEY_PROVIDER)
    #[arg(short, long, value_enum)]
    provider: Option<ProviderKind>,

    /// Model name (overrides config file and PARLEY_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Path to the config file (default: ~/.parley/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level written to parley.log (overrides general.log_level)
    #[arg(long)]
    log_level: Option<LevelFilter>,
}

/// Installs the file logger with a provisional level so config loading is logged.
/// The logger itself passes everything; `log::max_level` does the filtering and is
/// narrowed once the config is resolved.
fn init_logging(provisional: LevelFilter) {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(LOG_FILE) {
        let _ = WriteLogger::init(LevelFilter::Trace, log_config, log_file);
    }
    log::set_max_level(provisional);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    init_logging(args.log_level.unwrap_or(LevelFilter::Debug));

    let file_config = config::load_config(args.config.as_deref())?;
    let resolved: ResolvedConfig = config::resolve(&file_config, args.provider, args.model.as_deref());

    log::set_max_level(args.log_level.unwrap_or(resolved.log_level));
    info!(
        "parley starting up: provider={}, model={}, base={}",
        resolved.provider,
        resolved.model_name,
        resolved.api_base()
    );

    let provider: Arc<dyn CompletionProvider> = match resolved.responses_provider() {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            error!("Cannot start: {}", e);
            return Err(e.into());
        }
    };
    let summarizer = resolved.summarizer()?;

    parley::tui::run(&resolved, provider, summarizer)?;
    Ok(())
}
