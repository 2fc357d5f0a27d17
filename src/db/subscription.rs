// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cancellable handle over a live stream of snapshots.

use futures_util::stream::BoxStream;
use futures_util::{Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle};
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Live sequence of full snapshots.
///
/// Each item replaces the previous one; there is no diff contract. Dropping
/// the handle (or calling [`Subscription::unsubscribe`]) stops delivery and
/// aborts any producer task, so a torn-down view never receives another
/// update.
pub struct Subscription<T> {
    stream: BoxStream<'static, T>,
    _guard: Option<AbortOnDrop>,
}

struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl<T: Send + 'static> Subscription<T> {
    /// Wrap a channel whose sender is owned by the store.
    pub fn from_receiver(rx: mpsc::UnboundedReceiver<T>) -> Self {
        Self {
            stream: receiver_stream(rx),
            _guard: None,
        }
    }

    /// Wrap a channel fed by a dedicated producer task.
    pub fn with_producer(rx: mpsc::UnboundedReceiver<T>, producer: JoinHandle<()>) -> Self {
        Self {
            stream: receiver_stream(rx),
            _guard: Some(AbortOnDrop(producer.abort_handle())),
        }
    }

    /// Wait for the next snapshot. `None` once the source has closed.
    pub async fn next(&mut self) -> Option<T> {
        self.stream.next().await
    }

    /// Transform every snapshot, keeping the same cancellation guard.
    pub fn map<U, F>(self, f: F) -> Subscription<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        Subscription {
            stream: self.stream.map(f).boxed(),
            _guard: self._guard,
        }
    }

    /// Stop receiving updates.
    pub fn unsubscribe(self) {
        tracing::debug!("Subscription released");
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.stream.as_mut().poll_next(cx)
    }
}

fn receiver_stream<T: Send + 'static>(rx: mpsc::UnboundedReceiver<T>) -> BoxStream<'static, T> {
    UnboundedReceiverStream::new(rx).boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_map_preserves_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut sub = Subscription::from_receiver(rx).map(|n: u32| n * 10);

        tx.send(1).unwrap();
        tx.send(2).unwrap();
        drop(tx);

        assert_eq!(sub.next().await, Some(10));
        assert_eq!(sub.next().await, Some(20));
        assert_eq!(sub.next().await, None);
    }

    #[tokio::test]
    async fn test_drop_aborts_producer() {
        let (tx, rx) = mpsc::unbounded_channel::<u32>();
        let (alive_tx, alive_rx) = tokio::sync::oneshot::channel::<()>();
        let producer = tokio::spawn(async move {
            let _tx = tx;
            let _alive = alive_tx;
            std::future::pending::<()>().await;
        });

        let sub = Subscription::with_producer(rx, producer);
        sub.unsubscribe();

        // The producer's captures are dropped only when the task is aborted
        let closed = tokio::time::timeout(std::time::Duration::from_secs(1), alive_rx).await;
        assert!(matches!(closed, Ok(Err(_))));
    }
}
