use std::path::{Path, PathBuf};

mod config;
mod health;
mod regulations;
mod report;

use clap::ArgAction;
use config::Config;
use health::Health;
use regulations::Regulations;
use report::Report;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the configuration file
    #[arg(short, long, default_value = ".licensing.toml", global = true)]
    config: PathBuf,

    /// Root URL of the licensing service, overriding the configuration file
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let mut config = load_config(&self.config)?;
        if let Some(url) = self.base_url {
            config.set_base_url(url);
        }
        tracing::debug!(?config, "effective configuration");

        self.command
            .unwrap_or_else(|| Command::Report(Report::default()))
            .run(&self.config, config)
            .await
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Request a licensing report for a business (default)
    ///
    /// Missing fields are asked for interactively when stdin is a terminal.
    Report(Report),

    /// Check that the licensing service is up
    Health(Health),

    /// List every regulation the service knows about
    Regulations(Regulations),

    /// Show or modify configuration settings
    Config(Config),
}

impl Command {
    async fn run(self, config_path: &Path, config: licensing::Config) -> anyhow::Result<()> {
        match self {
            Self::Report(command) => command.run(&config).await?,
            Self::Health(command) => command.run(&config).await?,
            Self::Regulations(command) => command.run(&config).await?,
            Self::Config(command) => command.run(config_path, config)?,
        }
        Ok(())
    }
}

/// Output format shared by the read-only commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

/// Loads the configuration file, falling back to defaults when there is none.
fn load_config(path: &Path) -> anyhow::Result<licensing::Config> {
    if path.exists() {
        licensing::Config::load(path).map_err(|e| anyhow::anyhow!("{e}"))
    } else {
        tracing::debug!(path = %path.display(), "no configuration file, using defaults");
        Ok(licensing::Config::default())
    }
}
