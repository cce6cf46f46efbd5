use clap::Parser;
use common::config::AppConfig;

#[derive(Debug, Parser)]
#[command(author, version, about = "Tariff tracker HTTP API")]
pub struct Cli {
    /// Port to listen on; overrides API_PORT.
    #[arg(long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(port) = self.port {
            config.api.port = port;
        }
        config
    }
}
