use clap::{Parser, Subcommand};
use garden_core::Config;
use std::path::PathBuf;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "garden-web", version, about = "Garden planner web server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the web server.
    Serve {
        /// Config file path; defaults to the platform config directory.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured bind address, e.g. "0.0.0.0:8000".
        #[arg(long)]
        bind: Option<String>,
    },

    /// Store the OpenWeather API key in the config file.
    Configure {
        /// OpenWeather API key.
        #[arg(long)]
        api_key: String,

        /// Config file path; defaults to the platform config directory.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { config, bind } => {
                let mut cfg = Config::load(config.as_deref())?
                    .with_env_api_key(std::env::var("OPENWEATHER_KEY").ok());
                if let Some(bind) = bind {
                    cfg.bind_addr = bind;
                }
                crate::app::serve(cfg).await
            }
            Command::Configure { api_key, config } => {
                let mut cfg = Config::load(config.as_deref())?;
                cfg.openweather_api_key = Some(api_key);
                cfg.save(config.as_deref())?;

                let path = match config {
                    Some(p) => p,
                    None => Config::default_config_path()?,
                };
                println!("API key saved to {}", path.display());
                Ok(())
            }
        }
    }
}
