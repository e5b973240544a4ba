use anyhow::Result;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use backend_infrastructure::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "trials-backend")]
#[command(about = "Berry Trials log ingestion backend", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// Run a single ingestion cycle and exit
    #[arg(long)]
    once: bool,
}

fn init_tracing(config: &AppConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (writer, guard, ansi) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "trials-backend.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard), false)
        }
        None => (BoxMakeWriter::new(std::io::stdout), None, true),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi);
    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(config) = args.config {
        std::env::set_var("TRIALS_CONFIG", config);
    }

    let config = AppConfig::load().await?;
    // Dropping the guard flushes buffered file output.
    let _guard = init_tracing(&config);

    if args.once {
        return backend_bootstrap::run_once(config).await;
    }
    backend_bootstrap::run_standalone(config).await
}
