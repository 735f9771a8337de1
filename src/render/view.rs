use super::text::{self, Line};
use crate::domain::{
    CostEstimate, Importance, Regulation, Report, ReportResponse, Requirement, StructuredReport,
};

/// What to show for one report, independent of the output medium.
///
/// Building a view is a pure function of the response; optional sections
/// that the service left out or sent empty are `None` here and simply not
/// drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    /// The summary card at the top.
    pub header: HeaderSummary,
    /// The report itself.
    pub body: Body,
    /// The applicable regulations, verbatim.
    pub regulations: Vec<RegulationView>,
}

impl ReportView {
    /// Builds the view for a service response.
    #[must_use]
    pub fn from_response(response: &ReportResponse) -> Self {
        let body = match &response.report {
            Report::Structured(report) => Body::Structured(StructuredView::from_report(report)),
            Report::Text(text) => Body::Text(text::classify(text)),
        };

        Self {
            header: HeaderSummary::from_response(response),
            body,
            regulations: response
                .raw_regulations
                .iter()
                .enumerate()
                .map(|(i, regulation)| RegulationView::new(i + 1, regulation))
                .collect(),
        }
    }
}

/// A badge describing the business in the summary card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureBadge {
    /// The kitchen uses gas.
    Gas,
    /// Meat is served.
    Meat,
}

impl FeatureBadge {
    /// The badge text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gas => "משתמש בגז למטבח",
            Self::Meat => "מגיש בשר",
        }
    }
}

/// Counts and the echoed business description.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderSummary {
    /// Regulations that apply to this business.
    pub relevant_regulations: usize,
    /// Regulations the service knows about.
    pub total_regulations: usize,
    /// Floor area in square metres.
    pub size: f64,
    /// Seating capacity.
    pub seats: f64,
    /// One badge per flag that is set, gas first.
    pub badges: Vec<FeatureBadge>,
}

impl HeaderSummary {
    fn from_response(response: &ReportResponse) -> Self {
        let input = &response.user_input;
        let badges = [
            (input.uses_gas, FeatureBadge::Gas),
            (input.serves_meat, FeatureBadge::Meat),
        ]
        .into_iter()
        .filter_map(|(set, badge)| set.then_some(badge))
        .collect();

        Self {
            relevant_regulations: response.relevant_regulations,
            total_regulations: response.total_regulations,
            size: input.size,
            seats: input.seats,
            badges,
        }
    }
}

/// The two shapes a report body can take.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// An itemised report.
    Structured(StructuredView),
    /// Classified lines of a free-text report.
    Text(Vec<Line>),
}

/// Shown with a structured report the service flagged as a fallback.
pub const FALLBACK_NOTICE: &str = "לא ניתן היה להפיק דוח מלא. המידע המוצג עשוי להיות חלקי.";

/// The itemised report, section by section.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredView {
    /// The summary banner.
    pub summary: String,
    /// Total cost and time, if either was given.
    pub overview: Option<Overview>,
    /// One card per requirement, in order.
    pub requirements: Vec<RequirementCard>,
    /// Recommended order of action.
    pub next_steps: Option<Vec<String>>,
    /// Caveats.
    pub notes: Option<Vec<String>>,
    /// Whether the service flagged the report as a fallback; writers then
    /// show [`FALLBACK_NOTICE`] under the summary.
    pub error: bool,
}

impl StructuredView {
    fn from_report(report: &StructuredReport) -> Self {
        Self {
            summary: report.summary.clone(),
            overview: Overview::from_report(report),
            requirements: report
                .requirements
                .iter()
                .enumerate()
                .map(|(i, requirement)| RequirementCard::new(i + 1, requirement))
                .collect(),
            next_steps: non_empty(report.next_steps.as_deref()),
            notes: non_empty(report.important_notes.as_deref()),
            error: report.error,
        }
    }
}

/// Aggregate cost and time. At least one of the two is present.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    /// Total cost.
    pub cost: Option<CostEstimate>,
    /// Total days. Zero counts as not given.
    pub days: Option<f64>,
}

impl Overview {
    fn from_report(report: &StructuredReport) -> Option<Self> {
        let cost = report.total_estimated_cost.clone();
        let days = report
            .total_estimated_days
            .filter(|days| *days != 0.0 && !days.is_nan());

        (cost.is_some() || days.is_some()).then_some(Self { cost, days })
    }
}

/// One requirement card.
#[derive(Debug, Clone, PartialEq)]
pub struct RequirementCard {
    /// 1-based position in the report.
    pub position: usize,
    /// Title.
    pub title: String,
    /// Severity badge.
    pub importance: Importance,
    /// Category tag.
    pub category: String,
    /// Plain-language explanation.
    pub explanation: String,
    /// Practical tips, if there are any.
    pub tips: Option<Vec<String>>,
    /// Cost fact.
    pub cost: CostEstimate,
    /// Time fact.
    pub days: f64,
    /// Required professionals, if there are any.
    pub professionals: Option<Vec<String>>,
}

impl RequirementCard {
    fn new(position: usize, requirement: &Requirement) -> Self {
        Self {
            position,
            title: requirement.title.clone(),
            importance: requirement.importance,
            category: requirement.category.clone(),
            explanation: requirement.plain_explanation.clone(),
            tips: non_empty(Some(requirement.practical_tips.as_slice())),
            cost: requirement.estimated_cost.clone(),
            days: requirement.estimated_time_days,
            professionals: non_empty(requirement.required_professionals.as_deref()),
        }
    }
}

/// One raw regulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegulationView {
    /// 1-based position in the list.
    pub position: usize,
    /// The legal text.
    pub text: String,
    /// Display name of the category.
    pub category: String,
    /// Whether to show the critical badge.
    pub critical: bool,
    /// Page badge text.
    pub page: String,
}

impl RegulationView {
    /// Builds the view of one regulation at the given 1-based position.
    #[must_use]
    pub fn new(position: usize, regulation: &Regulation) -> Self {
        Self {
            position,
            text: regulation.hebrew_text.clone(),
            category: category_label(&regulation.category).to_string(),
            critical: regulation.is_critical(),
            page: format!("עמוד {}", regulation.source_page),
        }
    }
}

fn category_label(category: &str) -> &str {
    match category {
        "health" => "בריאות",
        "fire_safety" => "כיבוי אש",
        other => other,
    }
}

fn non_empty(items: Option<&[String]>) -> Option<Vec<String>> {
    items.filter(|items| !items.is_empty()).map(<[String]>::to_vec)
}
