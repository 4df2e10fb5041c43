use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{error, info, warn};

use crate::client::PredictionClient;
use crate::input::{FeatureVector, FormData};
use crate::notification::Notifier;
use crate::prediction::{synthesize_fallback, PredictionResult};
use crate::view::{self, render_result, SharedView, BACKEND_UNREACHABLE_ALERT};

#[derive(Clone, Debug, PartialEq)]
pub enum SubmissionOutcome {
    /// The backend answered and its result was rendered.
    Predicted(PredictionResult),
    /// The backend failed and a simulated result was rendered.
    Simulated(PredictionResult),
    /// A newer submission started before this one finished; the view was
    /// left alone.
    Superseded,
}

/// Turns form submissions into rendered results.
///
/// Submissions may overlap. Each takes a generation number when it starts
/// and only the newest one may touch the view when it completes.
pub struct SubmissionHandler {
    client: PredictionClient,
    view: SharedView,
    notifier: Notifier,
    rng: Mutex<StdRng>,
    generation: AtomicU64,
}

impl SubmissionHandler {
    pub fn new(client: PredictionClient, view: SharedView, notifier: Notifier) -> Self {
        Self::with_rng(client, view, notifier, StdRng::from_entropy())
    }

    pub fn with_rng(
        client: PredictionClient,
        view: SharedView,
        notifier: Notifier,
        rng: StdRng,
    ) -> Self {
        Self {
            client,
            view,
            notifier,
            rng: Mutex::new(rng),
            generation: AtomicU64::new(0),
        }
    }

    pub fn view(&self) -> &SharedView {
        &self.view
    }

    pub async fn submit(&self, form: &FormData) -> SubmissionOutcome {
        let features = FeatureVector::from(form);
        let nan_fields = features
            .names()
            .filter(|name| features.get(name).is_some_and(f64::is_nan))
            .count();
        if nan_fields > 0 {
            warn!("[cardioml] {} field(s) are not numbers and will be sent as null", nan_fields);
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        view::lock(&self.view).begin_submission();
        info!(
            "[cardioml] Submission #{} with {} features to {}",
            generation,
            features.len(),
            self.client.url()
        );

        let response = self.client.predict(&features).await;

        // Checked and applied under the view lock so a newer submission
        // cannot start rendering in between.
        let mut page = view::lock(&self.view);
        if self.generation.load(Ordering::SeqCst) != generation {
            info!("[cardioml] Discarding stale response for submission #{}", generation);
            return SubmissionOutcome::Superseded;
        }
        page.loading_visible = false;

        match response {
            Ok(body) => {
                let result = PredictionResult::from_value(&body);
                render_result(&mut page, &result);
                drop(page);
                self.notifier.flash();
                info!(
                    "[cardioml] Submission #{} rendered: {}",
                    generation, body
                );
                SubmissionOutcome::Predicted(result)
            }
            Err(e) => {
                error!("[cardioml] Submission #{} failed: {}", generation, e);
                page.alert(BACKEND_UNREACHABLE_ALERT);
                let result = {
                    let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                    synthesize_fallback(&mut *rng)
                };
                render_result(&mut page, &result);
                SubmissionOutcome::Simulated(result)
            }
        }
    }
}
