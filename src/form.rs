//! The business description form and its submission state machine.
//!
//! A [`Form`] holds the four editable fields and a [`Submission`] state.
//! Fields can be edited at any time; submitting moves the form into
//! [`Submission::Submitting`] and refuses further submissions until the
//! pending request resolves.

use std::{fmt, str::FromStr};

use tracing::instrument;

use crate::{
    client::{FetchError, ReportService},
    domain::{BusinessInput, ReportResponse},
};

/// The message shown for every failed report request, whatever the cause.
pub const FETCH_FAILED_MESSAGE: &str = "שגיאה בקבלת הדוח. אנא נסה שוב.";

/// One of the four form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Floor area in square metres.
    Size,
    /// Seating capacity.
    Seats,
    /// Gas usage in the kitchen.
    UsesGas,
    /// Meat service.
    ServesMeat,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Self; 4] = [Self::Size, Self::Seats, Self::UsesGas, Self::ServesMeat];

    /// The label shown next to the field.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Size => "גודל המסעדה (מ\"ר)",
            Self::Seats => "מספר מקומות ישיבה",
            Self::UsesGas => "משתמש בגז למטבח",
            Self::ServesMeat => "מגיש בשר",
        }
    }

    /// Whether the field holds a number rather than a yes/no flag.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Size | Self::Seats)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Size => "size",
            Self::Seats => "seats",
            Self::UsesGas => "usesGas",
            Self::ServesMeat => "servesMeat",
        })
    }
}

impl FromStr for Field {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "size" => Ok(Self::Size),
            "seats" => Ok(Self::Seats),
            "usesGas" | "uses-gas" | "uses_gas" => Ok(Self::UsesGas),
            "servesMeat" | "serves-meat" | "serves_meat" => Ok(Self::ServesMeat),
            _ => Err(UnknownFieldError(s.to_string())),
        }
    }
}

/// Returned when a field name is not one of the four form fields.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown field '{0}': expected size, seats, usesGas or servesMeat")]
pub struct UnknownFieldError(String);

/// A raw value as entered by the user, before coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Text typed into an input.
    Text(String),
    /// A checkbox state.
    Flag(bool),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl FieldValue {
    /// Numeric-input coercion: blank is zero, garbage is `NaN`.
    ///
    /// Only decimal notation counts as a number, so `inf` and `nan` spelled
    /// out are garbage too.
    fn to_number(&self) -> f64 {
        match self {
            Self::Flag(flag) => f64::from(u8::from(*flag)),
            Self::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    0.0
                } else if !text.chars().all(is_number_char) {
                    f64::NAN
                } else {
                    text.parse().unwrap_or(f64::NAN)
                }
            }
        }
    }

    fn to_flag(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Text(text) => !text.is_empty(),
        }
    }
}

const fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')
}

/// Where the form is in its request lifecycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Submission {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// A request is in flight.
    Submitting,
    /// The last request produced a report.
    Success(Box<ReportResponse>),
    /// The last request failed; holds the message to show.
    Failed(String),
}

impl Submission {
    /// Whether a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub const fn can_submit(&self) -> bool {
        !self.is_loading()
    }

    /// The error message to show, if the last request failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// The report to display, if the last request succeeded.
    #[must_use]
    pub fn report(&self) -> Option<&ReportResponse> {
        match self {
            Self::Success(response) => Some(response),
            _ => None,
        }
    }
}

/// Returned when a submission is refused.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SubmitError {
    /// Another request has not resolved yet.
    #[error("a report request is already in flight")]
    InFlight,
}

/// The business description form.
#[derive(Debug, Default)]
pub struct Form {
    input: BusinessInput,
    state: Submission,
}

impl Form {
    /// Creates an empty form: zero size and seats, both flags off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current field values.
    #[must_use]
    pub const fn input(&self) -> &BusinessInput {
        &self.input
    }

    /// The current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &Submission {
        &self.state
    }

    /// Updates one field.
    ///
    /// Numeric fields coerce their value the way a numeric input does; flags
    /// pass through unchanged. Nothing is range checked.
    pub fn set_field(&mut self, field: Field, value: impl Into<FieldValue>) {
        let value = value.into();
        match field {
            Field::Size => self.input.size = value.to_number(),
            Field::Seats => self.input.seats = value.to_number(),
            Field::UsesGas => self.input.uses_gas = value.to_flag(),
            Field::ServesMeat => self.input.serves_meat = value.to_flag(),
        }
        tracing::trace!(%field, ?value, "field updated");
    }

    /// Starts a submission and returns the payload to send.
    ///
    /// Any previous report or error is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::InFlight`] while a request is pending.
    pub fn begin_submit(&mut self) -> Result<BusinessInput, SubmitError> {
        if self.state.is_loading() {
            return Err(SubmitError::InFlight);
        }
        self.state = Submission::Submitting;
        Ok(self.input)
    }

    /// Resolves the pending submission.
    ///
    /// Failures collapse to [`FETCH_FAILED_MESSAGE`]; the cause is logged.
    pub fn complete(&mut self, result: Result<ReportResponse, FetchError>) {
        if !self.state.is_loading() {
            tracing::warn!("ignoring a response that arrived with no request in flight");
            return;
        }

        self.state = match result {
            Ok(response) => Submission::Success(Box::new(response)),
            Err(e) => {
                tracing::error!(error = %e, cause = ?std::error::Error::source(&e), "report request failed");
                Submission::Failed(FETCH_FAILED_MESSAGE.to_string())
            }
        };
    }

    /// Submits the form through `service` and waits for the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::InFlight`] while a request is pending.
    #[instrument(level = "debug", skip_all)]
    pub async fn submit<S: ReportService>(
        &mut self,
        service: &S,
    ) -> Result<&Submission, SubmitError> {
        let payload = self.begin_submit()?;
        tracing::info!(?payload, "requesting licensing report");
        let result = service.fetch_report(&payload).await;
        self.complete(result);
        Ok(&self.state)
    }
}
