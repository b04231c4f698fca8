use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};
use voice_agent_api::{config, server};

/// Builds the log filter. `RUST_LOG` directives win; otherwise the configured
/// level, which must be a plain level name.
fn log_filter(configured_level: &str, rust_log: Option<&str>) -> Result<EnvFilter> {
    if let Some(directives) = rust_log.filter(|d| !d.is_empty()) {
        return EnvFilter::try_new(directives)
            .map_err(|e| anyhow::anyhow!("Invalid RUST_LOG '{}': {}", directives, e));
    }

    let level = configured_level.parse::<LevelFilter>().map_err(|_| {
        anyhow::anyhow!(
            "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
            configured_level
        )
    })?;
    Ok(EnvFilter::default().add_directive(level.into()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; a malformed one is not
    let dotenv = match config::read_dotenv(config::DOTENV_PATH) {
        Ok(dotenv) => dotenv,
        Err(e) => {
            eprintln!("Failed to read {}: {}", config::DOTENV_PATH, e);
            std::process::exit(1);
        }
    };

    let config = match config::load(dotenv.as_ref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let rust_log = std::env::var("RUST_LOG")
        .ok()
        .or_else(|| dotenv.as_ref().and_then(|vars| vars.get("RUST_LOG").cloned()));

    let filter = match log_filter(&config.server.logs.level, rust_log.as_deref()) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    info!(
        "Starting LLM Voice Agent API v{} with log filter: {}",
        env!("CARGO_PKG_VERSION"),
        rust_log.as_deref().unwrap_or(&config.server.logs.level)
    );
    match &dotenv {
        Some(vars) => info!("Loaded {} variables from {}", vars.len(), config::DOTENV_PATH),
        None => info!("No .env file found, using system environment variables"),
    }

    server::run(config).await?;

    Ok(())
}
