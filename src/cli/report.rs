use std::{
    io::{self, IsTerminal, Write},
    process,
    time::Duration,
};

use clap::Parser;
use indicatif::ProgressBar;
use licensing::{
    ExportAction, Exporter, Field, Form, HttpClient, PrintSettings, ReportView, Submission,
    render::{
        html,
        terminal::{self, Style, Tone},
    },
};
use tracing::instrument;

const LOADING_MESSAGE: &str = "מייצר דוח מותאם אישית...";

#[derive(Debug, Parser, Default)]
#[command(about = "Request a licensing report for a business")]
pub struct Report {
    /// Floor area in square metres
    #[arg(long, value_name = "SQM")]
    size: Option<String>,

    /// Number of seats
    #[arg(long, value_name = "COUNT")]
    seats: Option<String>,

    /// The kitchen uses gas
    #[arg(long)]
    gas: bool,

    /// Meat is served
    #[arg(long)]
    meat: bool,

    /// Never prompt; missing numbers are sent as zero
    #[arg(long)]
    no_prompt: bool,

    /// Output format (pretty, json, html)
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,

    /// Write a printable copy and hand it to the print command
    #[arg(long)]
    print: bool,

    /// Write a printable copy for saving as PDF
    #[arg(long)]
    pdf: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
    Html,
}

impl Report {
    #[instrument(level = "debug", skip_all)]
    pub async fn run(self, config: &licensing::Config) -> anyhow::Result<()> {
        let client = HttpClient::new(config.base_url())?;

        let mut form = Form::new();
        self.fill(&mut form)?;

        let spinner = (self.output == OutputFormat::Pretty && io::stderr().is_terminal())
            .then(loading_spinner);
        let state = form.submit(&client).await?;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        let response = match state {
            Submission::Success(response) => response,
            Submission::Failed(message) => {
                eprintln!("{message}");
                process::exit(1);
            }
            Submission::Idle | Submission::Submitting => {
                anyhow::bail!("report request did not resolve")
            }
        };

        let view = ReportView::from_response(response);
        let mut stdout = io::stdout().lock();
        match self.output {
            OutputFormat::Pretty => terminal::write_report(&view, &mut stdout, Style::detect())?,
            OutputFormat::Json => writeln!(stdout, "{}", serde_json::to_string_pretty(response)?)?,
            OutputFormat::Html => writeln!(
                stdout,
                "{}",
                html::document(&view, &PrintSettings::today())
            )?,
        }
        drop(stdout);

        let exporter = Exporter::new(config.output_dir.clone(), config.print_command.clone());
        let style = Style::detect();
        for action in self.export_actions() {
            let path = exporter.export(&view, action)?;
            eprintln!(
                "{} {}",
                style.paint("✓", Tone::Success),
                style.paint(&path.display().to_string(), Tone::Muted)
            );
        }

        Ok(())
    }

    /// Copies flags into the form, asking for whatever is missing.
    fn fill(&self, form: &mut Form) -> anyhow::Result<()> {
        let interactive = !self.no_prompt && io::stdin().is_terminal();
        // Without either flag the business may still have gas or meat.
        let ask_flags = interactive && !self.gas && !self.meat;

        for field in Field::ALL {
            if field.is_numeric() {
                let given = match field {
                    Field::Size => self.size.as_deref(),
                    _ => self.seats.as_deref(),
                };
                match given {
                    Some(value) => form.set_field(field, value),
                    None if interactive => {
                        let value = dialoguer::Input::<String>::new()
                            .with_prompt(field.label())
                            .allow_empty(true)
                            .interact_text()?;
                        form.set_field(field, value);
                    }
                    None => {}
                }
            } else if ask_flags {
                let answer = dialoguer::Confirm::new()
                    .with_prompt(field.label())
                    .default(false)
                    .interact()?;
                form.set_field(field, answer);
            } else {
                let given = match field {
                    Field::UsesGas => self.gas,
                    _ => self.meat,
                };
                form.set_field(field, given);
            }
        }

        tracing::debug!(input = ?form.input(), "form filled");
        Ok(())
    }

    fn export_actions(&self) -> impl Iterator<Item = ExportAction> {
        [
            (self.print, ExportAction::Print),
            (self.pdf, ExportAction::Pdf),
        ]
        .into_iter()
        .filter_map(|(requested, action)| requested.then_some(action))
    }
}

fn loading_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(LOADING_MESSAGE);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
