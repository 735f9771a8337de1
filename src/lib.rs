//! Licensing requirements reports for food-service businesses.
//!
//! A business describes itself through a small [`Form`]; the form submits
//! the description to the licensing service and the returned report is
//! turned into a [`ReportView`] that can be drawn in a terminal or exported
//! as a printable document.

pub mod domain;
pub use domain::{BusinessInput, Importance, Regulation, Report, ReportResponse, StructuredReport};

/// HTTP access to the licensing service.
pub mod client;
pub use client::{FetchError, HttpClient, ReportService};

mod config;
pub use config::{Config, DEFAULT_BASE_URL};

/// Print and PDF export of rendered reports.
pub mod export;
pub use export::{ExportAction, Exporter, PrintSettings};

/// Input collection and the submission lifecycle.
pub mod form;
pub use form::{FETCH_FAILED_MESSAGE, Field, FieldValue, Form, Submission};

/// Report rendering for terminals and printable documents.
pub mod render;
pub use render::ReportView;
