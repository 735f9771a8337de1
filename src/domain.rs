//! Wire data model for the licensing service.
//!
//! Every type here mirrors a JSON payload exchanged with the service. The
//! only value this crate produces itself is [`BusinessInput`]; everything
//! else is received, rendered as-is and dropped.

mod input;
pub use input::BusinessInput;

/// Report payloads returned by the service.
pub mod report;
pub use report::{
    CostEstimate, Importance, Report, ReportResponse, Requirement, StructuredReport,
};

mod regulation;
pub use regulation::{HealthStatus, Regulation, RegulationCatalog};
