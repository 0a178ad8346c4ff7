//! Recurring badge refresh for the active environment.
//!
//! A [`BadgePoller`] runs as its own task: refresh immediately, then once per
//! interval. Each refresh rebuilds the cache-busted badge URL and fetches the
//! badge to read its status text. The task stops when its [`PollHandle`] is
//! cancelled or dropped, including in the middle of a fetch.

use crate::badge;
use crate::events::AppEvent;
use crate::traits::CiClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time;

pub struct BadgePoller {
    client: Arc<dyn CiClient>,
    environment: String,
    badge_url: String,
    generation: u64,
    interval: Duration,
    tx: mpsc::UnboundedSender<AppEvent>,
    cancel_rx: watch::Receiver<bool>,
}

/// Owning handle of a running poll. Cancels the task on drop.
pub struct PollHandle {
    environment: String,
    cancel_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl BadgePoller {
    pub fn spawn(
        client: Arc<dyn CiClient>,
        environment: String,
        badge_url: String,
        generation: u64,
        interval: Duration,
        tx: mpsc::UnboundedSender<AppEvent>,
    ) -> PollHandle {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let poller = Self {
            client,
            environment: environment.clone(),
            badge_url,
            generation,
            interval,
            tx,
            cancel_rx,
        };
        tracing::info!(%environment, interval_secs = interval.as_secs(), "badge polling started");
        let task = tokio::spawn(poller.run());
        PollHandle {
            environment,
            cancel_tx,
            task,
        }
    }

    async fn run(mut self) {
        loop {
            if *self.cancel_rx.borrow() {
                break;
            }
            if self.refresh_once().await == PollOutcome::Stop {
                break;
            }
            tokio::select! {
                () = time::sleep(self.interval) => {},
                _ = self.cancel_rx.changed() => break,
            }
        }
        tracing::info!(environment = %self.environment, "badge polling stopped");
    }

    async fn refresh_once(&mut self) -> PollOutcome {
        let url = badge::refresh_url(&self.badge_url);
        if self
            .tx
            .send(AppEvent::BadgeRefreshed {
                environment: self.environment.clone(),
                generation: self.generation,
                url: url.clone(),
            })
            .is_err()
        {
            return PollOutcome::Stop;
        }

        let fetched = tokio::select! {
            res = self.client.fetch_badge(&url) => res,
            _ = self.cancel_rx.changed() => return PollOutcome::Stop,
        };
        let status = match fetched {
            Ok(svg) => badge::parse_status(&svg),
            Err(e) => {
                tracing::warn!(environment = %self.environment, "badge fetch failed: {e}");
                None
            }
        };
        if self
            .tx
            .send(AppEvent::BadgeStatus {
                environment: self.environment.clone(),
                generation: self.generation,
                status,
            })
            .is_err()
        {
            return PollOutcome::Stop;
        }
        PollOutcome::Continue
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PollOutcome {
    Continue,
    Stop,
}
