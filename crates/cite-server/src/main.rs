//! Citation service - Entry Point

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cite_server::{config::Config, config::defaults, server::CiteServer};

#[derive(Parser, Debug)]
#[command(name = "cite-server")]
#[command(about = "Citation formatting service for CSL styles")]
#[command(version)]
struct Cli {
    /// Directory containing <style>.csl files
    #[arg(long, default_value = defaults::STYLES_DIR, env = "CITE_STYLES_DIR")]
    styles_dir: PathBuf,

    /// HTTP server port
    #[arg(long, default_value_t = defaults::PORT, env = "PORT")]
    port: u16,

    /// Locale used to render citations
    #[arg(long, default_value = defaults::LOCALE, env = "CITE_LOCALE")]
    locale: String,

    /// Bearer token required by POST /styles/reload (open when unset)
    #[arg(long, env = "CITE_ADMIN_TOKEN")]
    admin_token: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        styles_dir = %cli.styles_dir.display(),
        "Starting citation service"
    );

    let admin_token = cli.admin_token.filter(|t| !t.is_empty());
    let config = Config::new(cli.styles_dir, admin_token).with_locale(cli.locale)?;

    let server = CiteServer::new(config);
    server.run(cli.port).await
}
