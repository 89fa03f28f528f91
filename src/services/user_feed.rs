//! Shared live query over the user list.
//!
//! The first subscriber starts a background task that requeries the store on
//! every change notification and publishes immutable snapshots through a
//! watch channel. When the last subscription is dropped, a grace timer runs
//! before the task is torn down, so a brief teardown/resubscribe cycle keeps
//! the same feed alive.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, Notify, broadcast, watch};

use crate::{db::UserStore, error::Result, models::User};

#[derive(Clone)]
pub struct UserFeed {
    inner: Arc<FeedInner>,
}

struct FeedInner {
    store: Arc<UserStore>,
    grace: Duration,
    state: Mutex<Option<ActiveFeed>>,
    epochs: AtomicU64,
}

#[derive(Clone)]
struct ActiveFeed {
    rx: watch::Receiver<Vec<User>>,
    subscribers: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
    epoch: u64,
}

impl UserFeed {
    pub fn new(store: Arc<UserStore>, grace: Duration) -> Self {
        Self {
            inner: Arc::new(FeedInner {
                store,
                grace,
                state: Mutex::new(None),
                epochs: AtomicU64::new(0),
            }),
        }
    }

    /// Subscribe to the live user list, starting the feed if it is dormant.
    pub async fn subscribe(&self) -> Result<UsersSubscription> {
        let mut state = self.inner.state.lock().await;

        if state.is_none() {
            *state = Some(self.start_feed().await?);
        }

        let active = state.as_ref().expect("feed was just started").clone();
        active.subscribers.fetch_add(1, Ordering::SeqCst);

        Ok(UsersSubscription {
            rx: active.rx.clone(),
            feed: self.inner.clone(),
            subscribers: active.subscribers,
            epoch: active.epoch,
        })
    }

    /// Whether the background task is currently running.
    pub async fn is_active(&self) -> bool {
        self.inner.state.lock().await.is_some()
    }

    async fn start_feed(&self) -> Result<ActiveFeed> {
        let changes = self.inner.store.changes();
        let snapshot = self.inner.store.list_users().await?;
        let (tx, rx) = watch::channel(snapshot);
        let shutdown = Arc::new(Notify::new());
        let epoch = self.inner.epochs.fetch_add(1, Ordering::SeqCst);

        tokio::spawn(run_feed(
            self.inner.store.clone(),
            changes,
            tx,
            shutdown.clone(),
        ));

        Ok(ActiveFeed {
            rx,
            subscribers: Arc::new(AtomicUsize::new(0)),
            shutdown,
            epoch,
        })
    }
}

async fn run_feed(
    store: Arc<UserStore>,
    mut changes: broadcast::Receiver<()>,
    tx: watch::Sender<Vec<User>>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            _ = shutdown.notified() => break,
            received = changes.recv() => match received {
                // A lagged receiver only means we missed intermediate
                // invalidations; the next snapshot absorbs them.
                Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                    match store.list_users().await {
                        Ok(users) => {
                            let _ = tx.send(users);
                        }
                        Err(err) => tracing::warn!("user feed requery failed: {err}"),
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
}

/// Handle on the live user list. Dropping the last subscription starts the
/// idle-grace timer.
pub struct UsersSubscription {
    rx: watch::Receiver<Vec<User>>,
    feed: Arc<FeedInner>,
    subscribers: Arc<AtomicUsize>,
    epoch: u64,
}

impl UsersSubscription {
    /// The most recent snapshot.
    pub fn snapshot(&self) -> Vec<User> {
        self.rx.borrow().clone()
    }

    /// Wait for the next snapshot.
    pub async fn changed(&mut self) -> std::result::Result<(), watch::error::RecvError> {
        self.rx.changed().await
    }
}

impl Drop for UsersSubscription {
    fn drop(&mut self) {
        if self.subscribers.fetch_sub(1, Ordering::SeqCst) != 1 {
            return;
        }

        // Last subscriber gone: tear the feed down after the grace period,
        // unless somebody resubscribed to this epoch in the meantime.
        let feed = self.feed.clone();
        let subscribers = self.subscribers.clone();
        let epoch = self.epoch;

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                tokio::time::sleep(feed.grace).await;

                let mut state = feed.state.lock().await;
                let idle = state
                    .as_ref()
                    .is_some_and(|active| active.epoch == epoch)
                    && subscribers.load(Ordering::SeqCst) == 0;

                if idle {
                    if let Some(active) = state.take() {
                        active.shutdown.notify_waiters();
                    }
                }
            });
        }
    }
}
