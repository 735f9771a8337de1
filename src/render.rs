//! Report rendering.
//!
//! A [`ReportResponse`](crate::ReportResponse) is first turned into a
//! [`ReportView`], which decides what is shown and in which order. The
//! [`terminal`] and [`html`] writers only decide how it looks.

mod view;
pub use view::{
    Body, FALLBACK_NOTICE, FeatureBadge, HeaderSummary, Overview, RegulationView, ReportView,
    RequirementCard, StructuredView,
};

/// Classification of free-text reports.
pub mod text;
pub use text::{FactKind, Line, Span};

mod format;
pub use format::{amount, cost_range, days, quantity};

/// Printable HTML documents.
pub mod html;

/// Colored terminal output.
pub mod terminal;
pub use terminal::Style;
