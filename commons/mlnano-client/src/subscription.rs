use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ClientError;

type Release = Box<dyn FnOnce() + Send + 'static>;

/// A live push feed. Events are read with [`Subscription::next`]; the feed is
/// released once, either by [`Subscription::unsubscribe`] or on drop.
pub struct Subscription<T> {
    events: mpsc::Receiver<Result<T, ClientError>>,
    release: Option<Release>,
}

impl<T> Subscription<T> {
    pub fn new(
        events: mpsc::Receiver<Result<T, ClientError>>,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            events,
            release: Some(Box::new(release)),
        }
    }

    /// Release by cancelling the token the producer task watches.
    pub fn with_cancellation(
        events: mpsc::Receiver<Result<T, ClientError>>,
        token: CancellationToken,
    ) -> Self {
        Self::new(events, move || token.cancel())
    }

    /// Next event, or `None` once the feed has ended.
    pub async fn next(&mut self) -> Option<Result<T, ClientError>> {
        self.events.recv().await
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            self.events.close();
            release();
            debug!("subscription released");
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.release_now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_release_runs_once_on_unsubscribe() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = released.clone();
        let (_tx, rx) = mpsc::channel::<Result<u32, ClientError>>(4);
        let sub = Subscription::new(rx, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        sub.unsubscribe();
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_release_runs_on_drop() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = released.clone();
        let (_tx, rx) = mpsc::channel::<Result<u32, ClientError>>(4);
        {
            let _sub = Subscription::new(rx, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_events_flow_until_sender_closes() {
        let (tx, rx) = mpsc::channel(4);
        let mut sub = Subscription::new(rx, || {});
        tx.send(Ok(7u32)).await.unwrap();
        drop(tx);
        assert_eq!(sub.next().await.unwrap().unwrap(), 7);
        assert!(sub.next().await.is_none());
    }

    #[tokio::test]
    async fn test_cancellation_token_cancelled_on_release() {
        let token = CancellationToken::new();
        let (_tx, rx) = mpsc::channel::<Result<u32, ClientError>>(1);
        let sub = Subscription::with_cancellation(rx, token.clone());
        assert!(!token.is_cancelled());
        drop(sub);
        assert!(token.is_cancelled());
    }
}
