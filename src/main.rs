use std::process::ExitCode;
use tracing::info;

use cardioml::client::PredictionClient;
use cardioml::config::Config;
use cardioml::handler::{SubmissionHandler, SubmissionOutcome};
use cardioml::input::{FormData, FEATURE_NAMES};
use cardioml::notification::Notifier;
use cardioml::view::{self, ResultView};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let form = FormData::from_pairs(std::env::args().skip(1));
    if form.is_empty() {
        eprintln!("usage: cardioml NAME=VALUE...");
        eprintln!("fields read by the backend: {}", FEATURE_NAMES.join(", "));
        return Ok(ExitCode::from(2));
    }

    let config = Config::from_env();
    info!("[cardioml] Prediction endpoint: {}", config.predict_url);
    if let Some(timeout) = config.request_timeout {
        info!("[cardioml] Request timeout: {}s", timeout.as_secs());
    }

    let client = PredictionClient::new(&config.predict_url, config.request_timeout)?;
    let shared = ResultView::shared();
    let notifier = Notifier::new(shared.clone(), config.notification_delay);
    let handler = match config.fallback_seed {
        Some(seed) => {
            info!("[cardioml] Seeding simulated results with {}", seed);
            SubmissionHandler::with_rng(client, shared.clone(), notifier, StdRng::seed_from_u64(seed))
        }
        None => SubmissionHandler::new(client, shared.clone(), notifier),
    };

    let outcome = handler.submit(&form).await;

    let mut page = view::lock(&shared);
    for alert in page.take_alerts() {
        println!("! {}", alert);
    }
    print!("{}", page);

    Ok(match outcome {
        SubmissionOutcome::Predicted(_) => ExitCode::SUCCESS,
        SubmissionOutcome::Simulated(_) | SubmissionOutcome::Superseded => ExitCode::FAILURE,
    })
}
