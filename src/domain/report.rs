use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{BusinessInput, Regulation};

/// A closed cost range in shekels.
///
/// The service is trusted: nothing checks that `min <= max`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Lower bound.
    #[serde(default)]
    pub min: f64,

    /// Upper bound.
    #[serde(default)]
    pub max: f64,

    /// Free-text remarks about the estimate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// How pressing a requirement is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Importance {
    /// Must be satisfied before the business can open.
    Critical,
    /// Should be satisfied early.
    Important,
    /// Nice to have.
    #[default]
    Recommended,
}

impl Importance {
    /// The label the service uses on the wire.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "קריטי",
            Self::Important => "חשוב",
            Self::Recommended => "רצוי",
        }
    }

    /// Reads a wire label.
    ///
    /// English names are accepted as well, including the extractor's
    /// `high` priority. Anything unrecognised gets the neutral
    /// [`Importance::Recommended`] treatment.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "קריטי" | "critical" => Self::Critical,
            "חשוב" | "important" | "high" => Self::Important,
            _ => Self::Recommended,
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Importance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Importance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

/// One licensing obligation, explained in plain language.
///
/// Every field has a default: a requirement the service only partly filled
/// in is still shown, with blanks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirement {
    /// Identifier assigned by the service.
    pub id: u64,

    /// Short title.
    pub title: String,

    /// The legal text the requirement was derived from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,

    /// Severity.
    pub importance: Importance,

    /// Free-text category, e.g. fire safety or sanitation.
    pub category: String,

    /// What has to be done, in plain language.
    pub plain_explanation: String,

    /// Practical advice, in order.
    #[serde(default)]
    pub practical_tips: Vec<String>,

    /// Expected cost of compliance.
    pub estimated_cost: CostEstimate,

    /// Expected time to comply.
    pub estimated_time_days: f64,

    /// Professionals that need to be involved, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_professionals: Option<Vec<String>>,
}

/// The itemised report variant.
///
/// Any JSON object decodes as a structured report; missing fields are
/// blank or absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredReport {
    /// A short overview of the business and its main obligations.
    #[serde(default)]
    pub summary: String,

    /// Aggregate cost of every requirement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_estimated_cost: Option<CostEstimate>,

    /// Aggregate time for every requirement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_estimated_days: Option<f64>,

    /// The requirements, most important first.
    #[serde(default)]
    pub requirements: Vec<Requirement>,

    /// Recommended order of action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<Vec<String>>,

    /// Caveats the business owner should know about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub important_notes: Option<Vec<String>>,

    /// Set when the service could not produce a proper report.
    ///
    /// The service sends either a boolean or the failure message itself.
    #[serde(
        default,
        deserialize_with = "flag_or_message",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub error: bool,
}

fn flag_or_message<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Marker {
        Flag(bool),
        Message(String),
    }

    Ok(match Option::<Marker>::deserialize(deserializer)? {
        Some(Marker::Flag(flag)) => flag,
        Some(Marker::Message(message)) => !message.is_empty(),
        None => false,
    })
}

/// The report body.
///
/// The service sends either an object or a plain string; the variant is
/// decided once, when the payload is decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Report {
    /// An itemised report.
    Structured(StructuredReport),
    /// A markdown-like free-text report.
    Text(String),
}

/// Everything the service returns for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportResponse {
    /// Echo of the submitted input.
    pub user_input: BusinessInput,

    /// Number of regulations the service knows about.
    pub total_regulations: usize,

    /// Number of regulations that apply to this business.
    pub relevant_regulations: usize,

    /// The report itself.
    pub report: Report,

    /// The applicable regulations, verbatim.
    #[serde(default)]
    pub raw_regulations: Vec<Regulation>,
}
