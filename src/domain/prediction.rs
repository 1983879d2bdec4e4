//! What `/predict` answers with.

use serde::Serialize;

/// Class label the artifact uses for an approved loan.
pub const APPROVED_CLASS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    #[serde(rename = "aprovado")]
    Approved,
    #[serde(rename = "negado")]
    Denied,
}

impl Decision {
    /// Anything other than the approved class is a denial.
    pub fn from_class(class: i64) -> Self {
        if class == APPROVED_CLASS {
            Decision::Approved
        } else {
            Decision::Denied
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Decision::Approved => "aprovado",
            Decision::Denied => "negado",
        }
    }
}

/// Response body of a successful prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionResult {
    pub prediction_status: Decision,
    pub probability_approved: String,
}

impl PredictionResult {
    pub fn new(class: i64, probability_approved: f64) -> Self {
        Self {
            prediction_status: Decision::from_class(class),
            probability_approved: format_percentage(probability_approved),
        }
    }
}

/// `0.0751` -> `"7.51%"`.
pub fn format_percentage(p: f64) -> String {
    format!("{:.2}%", p * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_has_two_decimals() {
        assert_eq!(format_percentage(0.0), "0.00%");
        assert_eq!(format_percentage(1.0), "100.00%");
        assert_eq!(format_percentage(0.0751), "7.51%");
        assert_eq!(format_percentage(0.5), "50.00%");
    }

    #[test]
    fn only_class_one_is_approved() {
        assert_eq!(Decision::from_class(1), Decision::Approved);
        assert_eq!(Decision::from_class(0), Decision::Denied);
        assert_eq!(Decision::from_class(2), Decision::Denied);
    }

    #[test]
    fn result_serializes_to_wire_shape() {
        let value = serde_json::to_value(PredictionResult::new(0, 0.125)).unwrap();
        assert_eq!(value["prediction_status"], "negado");
        assert_eq!(value["probability_approved"], "12.50%");
    }
}
