use std::{
    fs, io,
    path::{Path, PathBuf},
    process,
};

use chrono::NaiveDate;
use tracing::instrument;

use crate::render::{ReportView, html};

/// Running header printed at the top of every page.
pub const PRINT_HEADER: &str = "דוח רישוי עסק למסעדה";

/// Page setup for the print pipeline.
pub const PRINT_STYLESHEET: &str = r#"
@page {
    size: A4;
    margin: 1in;
    @top-center {
        content: "דוח רישוי עסק למסעדה";
        font-size: 14pt;
        font-weight: bold;
    }
}
@media print {
    body { -webkit-print-color-adjust: exact !important; }
    .page-break { page-break-before: always; }
}
"#;

/// Title and stylesheet handed to the print pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintSettings {
    /// Document title, also used for the file name.
    pub title: String,
    /// The date shown on the printed header.
    pub date: String,
    /// Print stylesheet.
    pub stylesheet: &'static str,
}

impl PrintSettings {
    /// Settings for a report printed on `date`.
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        let date = date.format("%-d.%-m.%Y").to_string();
        Self {
            title: format!("דוח רישוי עסק - {date}"),
            date,
            stylesheet: PRINT_STYLESHEET,
        }
    }

    /// Settings for a report printed today.
    #[must_use]
    pub fn today() -> Self {
        Self::for_date(chrono::Local::now().date_naive())
    }
}

/// The two export controls.
///
/// There is no separate PDF path: both go through the same print pipeline,
/// and producing a PDF is up to the configured print command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportAction {
    /// Print the report.
    Print,
    /// Save the report as PDF.
    Pdf,
}

/// Why an export failed.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The printable document could not be written.
    #[error("failed to write printable report to {path}")]
    Io {
        /// Where the document was being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The print command could not be started.
    #[error("failed to launch print command '{program}'")]
    Launch {
        /// The program that failed to start.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Hands rendered reports to the external print pipeline.
#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
    print_command: Option<Vec<String>>,
}

impl Exporter {
    /// Creates an exporter that writes documents into `output_dir`.
    ///
    /// When `print_command` is set, its first element is the program and the
    /// rest are leading arguments; the document path is appended.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, print_command: Option<Vec<String>>) -> Self {
        Self {
            output_dir: output_dir.into(),
            print_command: print_command.filter(|command| !command.is_empty()),
        }
    }

    /// Where documents are written.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Exports `view` with today's print settings.
    ///
    /// # Errors
    ///
    /// See [`Exporter::export_with`].
    pub fn export(&self, view: &ReportView, action: ExportAction) -> Result<PathBuf, ExportError> {
        self.export_with(view, action, &PrintSettings::today())
    }

    /// Writes the printable document and starts the print command, if any.
    ///
    /// The print command is not waited for. Returns the document path.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written or the print
    /// command cannot be started.
    #[instrument(level = "debug", skip(self, view))]
    pub fn export_with(
        &self,
        view: &ReportView,
        action: ExportAction,
        settings: &PrintSettings,
    ) -> Result<PathBuf, ExportError> {
        let path = self
            .output_dir
            .join(format!("{}.html", file_stem(&settings.title)));
        let io_error = |source| ExportError::Io {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.output_dir).map_err(io_error)?;
        fs::write(&path, html::document(view, settings)).map_err(io_error)?;
        tracing::info!(?action, path = %path.display(), "wrote printable report");

        if let Some((program, args)) = self.print_command.as_deref().and_then(<[String]>::split_first)
        {
            let mut child = process::Command::new(program)
                .args(args)
                .arg(&path)
                .spawn()
                .map_err(|source| {
                    tracing::error!(%program, error = %source, "print error");
                    ExportError::Launch {
                        program: program.clone(),
                        source,
                    }
                })?;
            std::thread::spawn(move || child.wait());
        }

        Ok(path)
    }
}

fn file_stem(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
