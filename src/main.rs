use anyhow::Result;
use clap::Parser;
use grantflow::server;
use grantflow::settings::Settings;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about)]
struct ServerArgs {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(short, long)]
    port: Option<u16>,
    #[clap(short, long)]
    database: Option<String>,
    #[clap(long)]
    cors_origin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();
    let mut settings = Settings::from_env();
    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(database) = args.database {
        settings.database_path = database;
    }

    let log_level = args.log_level.or_else(|| settings.log_level.clone());
    setup_logging(&log_level);

    info!("Starting server on port {}", settings.port);
    server::start_server(settings, args.cors_origin.as_deref()).await?;

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("{}", log_level)))
        .without_time()
        .init();
}
