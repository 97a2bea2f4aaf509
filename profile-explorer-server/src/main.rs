mod api;
mod config;
mod webserver;

use crate::api::AppState;
use crate::config::ServerConfig;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use profile_explorer_lib::store::seed_profiles;
use profile_explorer_lib::{MockProfileStore, OsmLinkRenderer, ProfileDirectory, StaticGeocoder};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "profile-explorer")]
#[command(about = "Profile directory API server", long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Start the profile directory API server")]
    Start(StartArgs),
}

#[derive(Args, Debug, Default)]
struct StartArgs {
    #[arg(long, value_name = "API_SERVER_PORT")]
    api_server_port: Option<u16>,

    #[arg(long, value_name = "API_SERVER_HOSTNAME")]
    api_server_hostname: Option<String>,

    /// Artificial delay added to every store call
    #[arg(long, value_name = "MILLISECONDS")]
    latency_ms: Option<u64>,

    /// Start with an empty directory instead of the demo profiles
    #[arg(long)]
    no_seed: bool,

    /// Origin allowed to call the API; repeat for several
    #[arg(long = "allow-origin", value_name = "ORIGIN")]
    allowed_origins: Vec<String>,

    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

impl StartArgs {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(port) = self.api_server_port {
            config.api_server_port = port;
        }
        if let Some(hostname) = self.api_server_hostname {
            config.api_server_hostname = hostname;
        }
        if let Some(latency_ms) = self.latency_ms {
            config.latency_ms = latency_ms;
        }
        if self.no_seed {
            config.seed = false;
        }
        if !self.allowed_origins.is_empty() {
            config.allowed_origins = self.allowed_origins;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start(args) => {
            let mut config = ServerConfig::load(cli.config.as_deref())?;
            args.apply(&mut config);

            // Set up tracing
            let collector = tracing_subscriber::fmt()
                .with_max_level(config.log_level()?)
                .finish();
            tracing::subscriber::set_global_default(collector)
                .context("There was a problem setting up tracing")?;

            let addr = config.socket_addr()?;
            let cors = webserver::cors_layer(&config.allowed_origins)?;

            let store = if config.seed {
                MockProfileStore::new()
            } else {
                MockProfileStore::empty()
            }
            .with_latency(config.latency());

            // Create tokio async runtime
            let rt = tokio::runtime::Runtime::new()?;

            rt.block_on(async move {
                println!("Starting profile explorer...");
                let directory = Arc::new(ProfileDirectory::mount(store).await);

                let state = AppState::new(
                    directory,
                    // No live geocoding provider is wired in; the demo
                    // addresses resolve from a fixed table.
                    Arc::new(StaticGeocoder::from_profiles(&seed_profiles())),
                    Arc::new(OsmLinkRenderer::default()),
                );
                let app = webserver::router(state).layer(cors);

                println!("API server listening on {} (Press Ctrl+C to exit)", addr);
                webserver::start_webserver(addr, app).await
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "profile-explorer",
            "start",
            "--api-server-port",
            "9000",
            "--no-seed",
            "--allow-origin",
            "http://a.test",
            "--allow-origin",
            "http://b.test",
        ]);
        let Commands::Start(args) = cli.command;

        let mut config = ServerConfig::default();
        args.apply(&mut config);

        assert_eq!(config.api_server_port, 9000);
        assert_eq!(config.api_server_hostname, "0.0.0.0");
        assert!(!config.seed);
        assert_eq!(config.allowed_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn no_flags_keep_config() {
        let mut config = ServerConfig {
            latency_ms: 10,
            ..Default::default()
        };
        StartArgs::default().apply(&mut config);
        assert_eq!(
            config,
            ServerConfig {
                latency_ms: 10,
                ..Default::default()
            }
        );
    }
}
