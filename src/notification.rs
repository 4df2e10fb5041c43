use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::view::{self, SharedView};

/// Shows the notification toast and hides it again after `delay`.
#[derive(Clone)]
pub struct Notifier {
    view: SharedView,
    delay: Duration,
}

impl Notifier {
    pub fn new(view: SharedView, delay: Duration) -> Self {
        Self { view, delay }
    }

    /// Every call schedules its own hide. An earlier pending hide is not
    /// cancelled, so it can cut a later flash short.
    pub fn flash(&self) -> JoinHandle<()> {
        view::lock(&self.view).notification_visible = true;

        let view = self.view.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            view::lock(&view).notification_visible = false;
            debug!("[cardioml] Notification hidden");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ResultView;

    fn visible(view: &SharedView) -> bool {
        view::lock(view).notification_visible
    }

    #[tokio::test(start_paused = true)]
    async fn hides_after_the_delay() {
        let view = ResultView::shared();
        let notifier = Notifier::new(view.clone(), Duration::from_millis(3000));

        notifier.flash();
        assert!(visible(&view));

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert!(visible(&view));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!visible(&view));
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_flashes_end_hidden() {
        let view = ResultView::shared();
        let notifier = Notifier::new(view.clone(), Duration::from_millis(3000));

        let first = notifier.flash();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let second = notifier.flash();
        assert!(visible(&view));

        // the first timer fires two seconds into the second flash
        first.await.unwrap();
        assert!(!visible(&view));

        second.await.unwrap();
        assert!(!visible(&view));
    }
}
