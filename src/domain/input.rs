use serde::{Deserialize, Deserializer, Serialize};

/// The attributes of a business that the licensing service evaluates.
///
/// Numbers are kept as `f64` so that whatever the form coerced, including
/// `NaN` from unparseable text, reaches the service unchanged. Non-finite
/// values travel as JSON `null`, and `null` reads back as `NaN`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BusinessInput {
    /// Floor area in square metres.
    #[serde(deserialize_with = "number_or_nan")]
    pub size: f64,

    /// Seating capacity.
    #[serde(deserialize_with = "number_or_nan")]
    pub seats: f64,

    /// Whether the kitchen cooks with gas.
    pub uses_gas: bool,

    /// Whether meat is served.
    pub serves_meat: bool,
}

fn number_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(|value| value.unwrap_or(f64::NAN))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_with_service_field_names() {
        let input = BusinessInput {
            size: 150.0,
            seats: 40.0,
            uses_gas: true,
            serves_meat: false,
        };

        let value = serde_json::to_value(input).unwrap();

        assert_eq!(
            value,
            json!({"size": 150.0, "seats": 40.0, "usesGas": true, "servesMeat": false})
        );
    }

    #[test]
    fn non_numeric_size_is_sent_as_null() {
        let input = BusinessInput {
            size: f64::NAN,
            ..BusinessInput::default()
        };

        let value = serde_json::to_value(input).unwrap();

        assert!(value["size"].is_null());
        assert_eq!(value["seats"], json!(0.0));
    }

    #[test]
    fn null_echo_reads_back_as_nan() {
        let input: BusinessInput = serde_json::from_value(
            json!({"size": null, "seats": 12, "usesGas": false, "servesMeat": true}),
        )
        .unwrap();

        assert!(input.size.is_nan());
        assert!((input.seats - 12.0).abs() < f64::EPSILON);
        assert!(input.serves_meat);
    }

    #[test]
    fn missing_fields_default_to_zero_and_false() {
        let input: BusinessInput = serde_json::from_value(json!({"size": 80})).unwrap();

        assert!((input.size - 80.0).abs() < f64::EPSILON);
        assert!(input.seats.abs() < f64::EPSILON);
        assert!(!input.uses_gas);
        assert!(!input.serves_meat);
    }
}
