use serde::{Deserialize, Deserializer, Serialize};

/// A raw legal requirement as extracted by the licensing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regulation {
    /// Identifier assigned during extraction.
    pub id: u64,

    /// Free-text tag such as `health` or `fire_safety`.
    pub category: String,

    /// The legal text, verbatim.
    pub hebrew_text: String,

    /// Where in the source document the text was found, e.g. `10-48`.
    #[serde(deserialize_with = "page_reference")]
    pub source_page: String,

    /// Free-text priority such as `critical` or `high`.
    pub priority: String,
}

impl Regulation {
    /// Whether the service flagged this regulation as critical.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.priority == "critical"
    }
}

/// Page references are usually ranges, but plain page numbers turn up too.
fn page_reference<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PageReference {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match PageReference::deserialize(deserializer)? {
        PageReference::Text(text) => text,
        PageReference::Number(number) => number.to_string(),
    })
}

/// Liveness report from the service's health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `alive` when the service is up.
    pub status: String,

    /// Number of regulations the service has loaded.
    #[serde(default)]
    pub regulations_loaded: usize,
}

impl HealthStatus {
    /// Whether the service reported itself alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.status == "alive"
    }
}

/// The full set of regulations known to the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulationCatalog {
    /// Every extracted regulation, in extraction order.
    #[serde(default)]
    pub regulations: Vec<Regulation>,

    /// The document the regulations were extracted from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,

    /// When the extraction ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_date: Option<String>,
}
