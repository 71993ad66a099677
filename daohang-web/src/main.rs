//! Dao-Hang Web Server
//!
//! A personal navigation homepage with a single-admin editing panel.

use anyhow::Context;
use clap::Parser;
use daohang_core::{init_logging, DaohangConfig, LogFormat, LoggingConfig};
use daohang_web::server::DaohangServerBuilder;
use daohang_web::WebConfig;
use tracing::info;

/// Dao-Hang Web Server - navigation homepage and admin panel
#[derive(Parser)]
#[command(name = "daohang-web")]
#[command(about = "A personal navigation homepage")]
#[command(version)]
struct Args {
    /// Server host to bind to (overrides DAOHANG_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on (overrides DAOHANG_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Development logging: pretty output with source locations and timings
    #[arg(long)]
    dev: bool,

    /// TOML configuration file; environment variables are applied on top
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            format: if self.json_logs {
                LogFormat::Json
            } else if self.dev {
                LogFormat::Pretty
            } else {
                LogFormat::Compact
            },
            include_location: self.dev,
            enable_performance_monitoring: self.dev,
            ..LoggingConfig::default()
        }
    }

    fn web_config(&self) -> WebConfig {
        let mut config = WebConfig::from_env();
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config
    }
}

fn load_settings(path: Option<&str>) -> anyhow::Result<DaohangConfig> {
    let settings = match path {
        Some(path) => DaohangConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path))?,
        None => DaohangConfig::default(),
    };

    let settings = settings.apply_env()?;
    settings.validate()?;
    Ok(settings)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.logging_config()).map_err(|e| anyhow::anyhow!(e))?;

    let settings = load_settings(args.config.as_deref())?;
    let config = args.web_config();

    info!(
        site_name = settings.site.site_name(),
        backend = ?settings.storage.backend,
        "Configuration loaded"
    );

    let server = DaohangServerBuilder::new()
        .config(config)
        .settings(settings)
        .build()
        .await?;

    server.start().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        use clap::Parser;

        // Test default values
        let args = Args::parse_from(["daohang-web"]);
        assert_eq!(args.host, None);
        assert_eq!(args.port, None);
        assert!(!args.dev);
        assert_eq!(args.log_level, "info");

        // Test custom values
        let args = Args::parse_from([
            "daohang-web",
            "--host",
            "0.0.0.0",
            "--port",
            "3000",
            "--dev",
            "--config",
            "daohang.toml",
        ]);
        assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(args.port, Some(3000));
        assert!(args.dev);
        assert_eq!(args.config.as_deref(), Some("daohang.toml"));
    }

    #[test]
    fn test_logging_format_selection() {
        let args = Args::parse_from(["daohang-web", "--json-logs"]);
        assert!(matches!(args.logging_config().format, LogFormat::Json));

        let args = Args::parse_from(["daohang-web", "--dev"]);
        let logging = args.logging_config();
        assert!(matches!(logging.format, LogFormat::Pretty));
        assert!(logging.include_location);
        assert!(logging.enable_performance_monitoring);

        let args = Args::parse_from(["daohang-web"]);
        let logging = args.logging_config();
        assert!(matches!(logging.format, LogFormat::Compact));
        assert!(!logging.include_location);
    }
}
