use rand::Rng;
use serde_json::Value;

use crate::coerce::{to_number, to_text};

pub const POSITIVE_RECOMMENDATION: &str = "You show significant risk factors. We strongly recommend scheduling an appointment with a cardiologist for comprehensive evaluation.";
pub const NEGATIVE_RECOMMENDATION: &str = "Your heart health appears to be good! Continue maintaining a healthy lifestyle with regular exercise and balanced diet.";

/// Outcome shown to the user, either from the backend or simulated.
///
/// Backend bodies are taken as-is: a missing field is kept as `None` and a
/// mistyped one is coerced, so bad bodies show up degraded in the rendered
/// view rather than failing.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionResult {
    pub prediction: Option<Value>,
    pub confidence: Option<f64>,
    pub recommendation: Option<String>,
}

impl PredictionResult {
    pub fn new(positive: bool, confidence: f64, recommendation: impl Into<String>) -> Self {
        Self {
            prediction: Some(Value::from(u8::from(positive))),
            confidence: Some(confidence),
            recommendation: Some(recommendation.into()),
        }
    }

    /// Reads a response body without validating its shape. A present
    /// `confidence` is coerced to a number (null is 0); a null
    /// `recommendation` counts as missing.
    pub fn from_value(body: &Value) -> Self {
        let recommendation = match body.get("recommendation") {
            None | Some(Value::Null) => None,
            Some(other) => Some(to_text(other)),
        };
        Self {
            prediction: body.get("prediction").cloned(),
            confidence: body.get("confidence").map(to_number),
            recommendation,
        }
    }

    /// Only the number 1 counts as a detection.
    pub fn is_positive(&self) -> bool {
        self.prediction
            .as_ref()
            .and_then(Value::as_f64)
            .is_some_and(|p| p == 1.0)
    }
}

/// Simulated result used when the backend cannot be reached.
pub fn synthesize_fallback<R: Rng>(rng: &mut R) -> PredictionResult {
    let positive = rng.gen::<f64>() > 0.5;
    let confidence = rng.gen::<f64>() * 50.0 + 50.0;
    let recommendation = if positive {
        POSITIVE_RECOMMENDATION
    } else {
        NEGATIVE_RECOMMENDATION
    };
    PredictionResult::new(positive, confidence, recommendation)
}
