//! Deployment trigger and status poll.
//!
//! [`Deployer`] owns the only piece of long-lived async state: the badge poll
//! for the active environment. Every trigger bumps a generation counter; events
//! tagged with an older generation come from a superseded trigger or a
//! cancelled poll and are dropped by the UI loop.

use crate::config::DeployConfig;
use crate::events::AppEvent;
use crate::poller::{BadgePoller, PollHandle};
use crate::traits::{CiClient, Notifier};
use crate::trigger;
use std::sync::Arc;
use tokio::sync::mpsc;

/// What the host hands the widget at startup.
pub struct Host {
    pub config: DeployConfig,
    pub notifier: Arc<dyn Notifier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Trigger accepted; polling has (re)started.
    Accepted,
    /// Trigger refused or unreachable; nothing is polling.
    Failed,
    /// Result belongs to a superseded trigger and was ignored.
    Stale,
}

pub struct Deployer {
    config: DeployConfig,
    notifier: Arc<dyn Notifier>,
    client: Arc<dyn CiClient>,
    tx: mpsc::UnboundedSender<AppEvent>,
    poll: Option<PollHandle>,
    generation: u64,
}

impl Deployer {
    pub fn new(host: Host, client: Arc<dyn CiClient>, tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            config: host.config,
            notifier: host.notifier,
            client,
            tx,
            poll: None,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn is_polling(&self) -> bool {
        self.poll.as_ref().is_some_and(|p| !p.is_finished())
    }

    pub fn polling_environment(&self) -> Option<&str> {
        self.poll.as_ref().map(PollHandle::environment)
    }

    /// Start the pipeline for `environment`.
    ///
    /// Any running poll is cancelled first. Returns `false` when the request
    /// could not even be built; the error notification has then already fired.
    pub fn trigger_deployment(&mut self, environment: &str) -> bool {
        self.cancel_poll();
        self.generation += 1;
        let generation = self.generation;

        let request = match self
            .config
            .environment(environment)
            .and_then(trigger::build_request)
        {
            Ok(request) => request,
            Err(e) => {
                tracing::error!(%environment, "invalid trigger configuration: {e}");
                self.notifier.error(&self.config.messages.error);
                return false;
            }
        };

        tracing::info!(%environment, url = %request.url, with_form = request.form.is_some(), "triggering pipeline");
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client
                .trigger_pipeline(&request)
                .await
                .map_err(|e| e.to_string());
            if tx
                .send(AppEvent::TriggerFinished {
                    environment: request.environment,
                    generation,
                    result,
                })
                .is_err()
            {
                tracing::warn!("trigger: channel closed");
            }
        });
        true
    }

    /// Apply the outcome of a trigger request sent by [`Self::trigger_deployment`].
    pub fn handle_trigger_finished(
        &mut self,
        environment: &str,
        generation: u64,
        result: &Result<(), String>,
    ) -> TriggerOutcome {
        if !self.is_current(generation) {
            tracing::debug!(%environment, generation, "ignoring stale trigger result");
            return TriggerOutcome::Stale;
        }
        match result {
            Ok(()) => {
                tracing::info!(%environment, "pipeline triggered");
                self.notifier.success(&self.config.messages.success);
                self.start_poll(environment);
                TriggerOutcome::Accepted
            }
            Err(e) => {
                tracing::error!(%environment, "pipeline trigger failed: {e}");
                self.notifier.error(&self.config.messages.error);
                TriggerOutcome::Failed
            }
        }
    }

    /// Restart the poll for the environment currently being watched, which
    /// refreshes the badge right away. No-op when nothing is polling.
    ///
    /// The restarted poll runs under a new generation so events still queued
    /// from the old one are dropped.
    pub fn refresh_now(&mut self) -> bool {
        let Some(environment) = self.polling_environment().map(str::to_string) else {
            return false;
        };
        self.generation += 1;
        self.start_poll(&environment);
        true
    }

    /// Stop watching on user request. A trigger still in flight is abandoned:
    /// its result arrives stale and never starts a poll.
    pub fn stop(&mut self) {
        self.cancel_poll();
        self.generation += 1;
        tracing::info!(generation = self.generation, "watching stopped");
    }

    pub fn cancel_poll(&mut self) {
        if let Some(handle) = self.poll.take() {
            tracing::debug!(environment = handle.environment(), "cancelling badge poll");
            handle.cancel();
        }
    }

    fn start_poll(&mut self, environment: &str) {
        self.cancel_poll();
        let Ok(env) = self.config.environment(environment) else {
            tracing::warn!(%environment, "cannot poll unknown environment");
            return;
        };
        self.poll = Some(BadgePoller::spawn(
            self.client.clone(),
            env.name.clone(),
            env.badge_url.clone(),
            self.generation,
            self.config.poll_interval,
            self.tx.clone(),
        ));
    }
}

impl Drop for Deployer {
    fn drop(&mut self) {
        self.cancel_poll();
    }
}
