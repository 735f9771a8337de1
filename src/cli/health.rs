use anyhow::Context;
use clap::Parser;
use licensing::{
    HttpClient,
    render::terminal::{Style, Tone},
};
use tracing::instrument;

use super::OutputFormat;

#[derive(Debug, Parser, Default)]
#[command(about = "Check that the licensing service is up")]
pub struct Health {
    /// Output format (pretty, json)
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Health {
    #[instrument(level = "debug", skip_all)]
    pub async fn run(self, config: &licensing::Config) -> anyhow::Result<()> {
        let client = HttpClient::new(config.base_url())?;
        let status = client
            .health()
            .await
            .with_context(|| format!("licensing service at {} is unreachable", client.base_url()))?;

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
            OutputFormat::Pretty => {
                let style = Style::detect();
                if status.is_alive() {
                    println!(
                        "{} Service is up at {}",
                        style.paint("✓", Tone::Success),
                        client.base_url()
                    );
                } else {
                    println!(
                        "{} Service at {} reported '{}'",
                        style.paint("✗", Tone::Danger),
                        client.base_url(),
                        status.status
                    );
                }
                println!(
                    "  {} {}",
                    style.paint("Regulations loaded:", Tone::Muted),
                    status.regulations_loaded
                );
            }
        }

        if !status.is_alive() {
            anyhow::bail!("licensing service is not alive");
        }
        Ok(())
    }
}
