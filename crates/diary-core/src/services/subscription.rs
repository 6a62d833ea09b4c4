//! Push-updated query results with explicit teardown.

use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::Result;

/// A live query result that is re-evaluated whenever its source tables change.
///
/// Each subscription owns its refresh task. The task stops when the
/// subscription is dropped or [`Subscription::unsubscribe`] is called.
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> Subscription<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Run `query` once for the initial value, then again after every change
    /// signalled on `changes`.
    pub(crate) async fn spawn<F, Fut>(mut changes: watch::Receiver<u64>, query: F) -> Result<Self>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        changes.borrow_and_update();
        let initial = query().await?;
        let (sender, receiver) = watch::channel(initial);

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = sender.closed() => break,
                    changed = changes.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        match query().await {
                            Ok(value) => {
                                sender.send_if_modified(|current| {
                                    if *current == value {
                                        false
                                    } else {
                                        *current = value;
                                        true
                                    }
                                });
                            }
                            Err(error) => {
                                tracing::warn!("Failed to refresh subscription: {error}");
                            }
                        }
                    }
                }
            }
        });

        Ok(Self { receiver, task })
    }

    /// Latest value.
    pub fn current(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Wait for the next value that differs from the last one seen.
    ///
    /// Returns `None` once the source has shut down.
    pub async fn next(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// A receiver for consumers that want to await changes themselves.
    ///
    /// Stops receiving updates once this subscription is torn down.
    pub fn receiver(&self) -> watch::Receiver<T> {
        self.receiver.clone()
    }

    /// Stop refreshing and release the query task.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
