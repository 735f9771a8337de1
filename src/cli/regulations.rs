use std::io;

use anyhow::Context;
use clap::Parser;
use licensing::{
    HttpClient,
    render::{
        RegulationView,
        terminal::{self, Style, Tone},
    },
};
use tracing::instrument;

use super::OutputFormat;

#[derive(Debug, Parser, Default)]
#[command(about = "List every regulation the service knows about")]
pub struct Regulations {
    /// Output format (pretty, json)
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Regulations {
    #[instrument(level = "debug", skip_all)]
    pub async fn run(self, config: &licensing::Config) -> anyhow::Result<()> {
        let client = HttpClient::new(config.base_url())?;
        let catalog = client
            .regulations()
            .await
            .context("failed to fetch the regulation catalog")?;

        if self.output == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&catalog)?);
            return Ok(());
        }

        let style = Style::detect();
        if catalog.regulations.is_empty() {
            println!("The service has no regulations loaded.");
            return Ok(());
        }

        let views: Vec<RegulationView> = catalog
            .regulations
            .iter()
            .enumerate()
            .map(|(i, regulation)| RegulationView::new(i + 1, regulation))
            .collect();
        terminal::write_regulations(&views, &mut io::stdout().lock(), style)?;

        if let Some(source) = &catalog.source_file {
            let extracted = catalog
                .extraction_date
                .as_deref()
                .map_or_else(String::new, |date| format!(" ({date})"));
            println!(
                "{}",
                style.paint(&format!("Source: {source}{extracted}"), Tone::Muted)
            );
        }
        Ok(())
    }
}
