//! Host-event subscriptions held by the session manager.

use std::fmt;

/// A host-provided disposable released exactly once.
///
/// The release closure runs on explicit [`dispose`](Subscription::dispose)
/// or, failing that, on drop, so subscriptions are returned to the host on
/// every exit path.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wraps a release closure.
    #[must_use]
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Releases the subscription now.
    pub fn dispose(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Subscription")
            .field("released", &self.release.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rstest::rstest;

    use super::*;

    fn counting_subscription(counter: &Arc<AtomicUsize>) -> Subscription {
        let counter = Arc::clone(counter);
        Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[rstest]
    fn releases_on_dispose() {
        let counter = Arc::new(AtomicUsize::new(0));
        let subscription = counting_subscription(&counter);

        subscription.dispose();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn releases_on_drop() {
        let counter = Arc::new(AtomicUsize::new(0));
        drop(counting_subscription(&counter));

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn never_releases_twice() {
        let counter = Arc::new(AtomicUsize::new(0));
        let subscription = counting_subscription(&counter);

        subscription.dispose();
        // Drop already ran inside dispose; the counter must not move again.

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
