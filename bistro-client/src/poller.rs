//! Cancellable fixed-interval refresh loops
//!
//! Each screen that needs fresh data owns a [`PollHandle`]. Dropping the
//! handle stops the loop, so tearing down a screen cannot leak a timer.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Refresh interval used by the kitchen and table boards
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Spawner for polling loops
pub struct Poller;

impl Poller {
    /// Run `task` now and then once per `interval` until the handle is
    /// cancelled or dropped.
    ///
    /// A tick that fires while `task` is still running is skipped rather
    /// than queued, so at most one refresh per loop is in flight.
    pub fn spawn<F, Fut>(name: impl Into<String>, interval: Duration, mut task: F) -> PollHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        let interval = if interval.is_zero() {
            tracing::warn!(poller = %name, "Zero poll interval, using default");
            DEFAULT_POLL_INTERVAL
        } else {
            interval
        };

        let token = CancellationToken::new();
        let loop_token = token.clone();
        let loop_name = name.clone();

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tracing::debug!(
                poller = %loop_name,
                interval_secs = interval.as_secs(),
                "Poller started"
            );

            loop {
                tokio::select! {
                    biased;
                    _ = loop_token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                tokio::select! {
                    biased;
                    _ = loop_token.cancelled() => break,
                    _ = task() => {}
                }
            }

            tracing::debug!(poller = %loop_name, "Poller stopped");
        });

        PollHandle {
            name,
            token,
            join: Some(join),
        }
    }
}

/// Owner of a running poll loop. Cancels the loop on drop.
pub struct PollHandle {
    name: String,
    token: CancellationToken,
    join: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop the loop. An in-flight refresh is abandoned.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancel and wait for the loop task to exit
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                tracing::warn!(poller = %self.name, error = %e, "Poller task failed");
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl std::fmt::Debug for PollHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollHandle")
            .field("name", &self.name)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}
