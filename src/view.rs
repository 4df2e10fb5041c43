use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::coerce::format_number;
use crate::prediction::PredictionResult;

/// View state shared between the handler, its in-flight submissions and
/// pending notification timers.
pub type SharedView = Arc<Mutex<ResultView>>;

/// Locks the view. A panic while the lock was held leaves plain display
/// state behind, so a poisoned lock is still usable.
pub fn lock(view: &SharedView) -> MutexGuard<'_, ResultView> {
    view.lock().unwrap_or_else(PoisonError::into_inner)
}

pub const POSITIVE_ICON_CLASS: &str = "result-icon positive-result";
pub const NEGATIVE_ICON_CLASS: &str = "result-icon negative-result";
pub const POSITIVE_ICON: &str = "\u{2764}\u{fe0f}\u{200d}\u{1fa79}";
pub const NEGATIVE_ICON: &str = "\u{2764}\u{fe0f}";
pub const POSITIVE_HEADLINE: &str = "Heart Disease Detected";
pub const NEGATIVE_HEADLINE: &str = "No Heart Disease";
pub const POSITIVE_COLOR: &str = "var(--secondary)";
pub const NEGATIVE_COLOR: &str = "var(--primary)";

pub const BACKEND_UNREACHABLE_ALERT: &str =
    "Backend connection failed. Using simulated prediction for demonstration.";
pub const NOTIFICATION_TEXT: &str = "Prediction complete!";

/// Everything the page shows, held as plain state so rendering can be
/// checked without a front end.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultView {
    pub loading_visible: bool,
    pub result_visible: bool,
    pub notification_visible: bool,
    pub icon_class: String,
    pub icon_symbol: String,
    pub headline: String,
    pub headline_color: String,
    pub confidence_text: String,
    pub recommendation: String,
    /// Alerts raised since the front end last drained them.
    pub alerts: Vec<String>,
}

impl ResultView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedView {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Loading on, previous result off.
    pub fn begin_submission(&mut self) {
        self.loading_visible = true;
        self.result_visible = false;
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.alerts.push(message.into());
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }
}

pub fn render_result(view: &mut ResultView, result: &PredictionResult) {
    let (class, icon, headline, color) = if result.is_positive() {
        (POSITIVE_ICON_CLASS, POSITIVE_ICON, POSITIVE_HEADLINE, POSITIVE_COLOR)
    } else {
        (NEGATIVE_ICON_CLASS, NEGATIVE_ICON, NEGATIVE_HEADLINE, NEGATIVE_COLOR)
    };
    view.icon_class = class.to_string();
    view.icon_symbol = icon.to_string();
    view.headline = headline.to_string();
    view.headline_color = color.to_string();
    view.confidence_text = confidence_line(result.confidence);
    view.recommendation = result.recommendation.clone().unwrap_or_default();
    view.result_visible = true;
}

/// `Confidence: N%` with N rounded half away from zero. A missing value
/// prints as `NaN`; huge values switch to exponent form.
pub fn confidence_line(confidence: Option<f64>) -> String {
    let rounded = confidence.unwrap_or(f64::NAN).round();
    format!("Confidence: {}%", format_number(rounded))
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.loading_visible {
            writeln!(f, "Analyzing...")?;
        }
        if self.result_visible {
            writeln!(f, "{}  {}", self.icon_symbol, self.headline)?;
            writeln!(f, "{}", self.confidence_text)?;
            writeln!(f, "{}", self.recommendation)?;
        }
        if self.notification_visible {
            writeln!(f, "[{}]", NOTIFICATION_TEXT)?;
        }
        Ok(())
    }
}
