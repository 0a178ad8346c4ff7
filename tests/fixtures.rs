#![allow(dead_code)]

use async_trait::async_trait;
use color_eyre::eyre::{eyre, Result};
use deployw::config::{DeployConfig, EnvironmentConfig, Messages, TriggerTarget};
use deployw::deploy::{Deployer, Host};
use deployw::error::TriggerError;
use deployw::events::AppEvent;
use deployw::traits::{CiClient, Notifier};
use deployw::trigger::TriggerRequest;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

pub const BADGE_SVG: &str = r#"<svg><text>pipeline</text><text>running</text></svg>"#;

#[derive(Debug, Clone, Copy)]
pub enum FakeResponse {
    Accept,
    Status(u16),
    Network,
}

/// Records every request and answers with a scripted response.
pub struct FakeClient {
    pub requests: Mutex<Vec<TriggerRequest>>,
    pub badge_fetches: Mutex<Vec<String>>,
    response: Mutex<FakeResponse>,
}

impl FakeClient {
    pub fn new(response: FakeResponse) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            badge_fetches: Mutex::new(Vec::new()),
            response: Mutex::new(response),
        })
    }

    pub fn set_response(&self, response: FakeResponse) {
        *self.response.lock().unwrap() = response;
    }

    pub fn requests(&self) -> Vec<TriggerRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn badge_fetches(&self) -> Vec<String> {
        self.badge_fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl CiClient for FakeClient {
    async fn trigger_pipeline(&self, request: &TriggerRequest) -> Result<(), TriggerError> {
        self.requests.lock().unwrap().push(request.clone());
        let response = *self.response.lock().unwrap();
        match response {
            FakeResponse::Accept => Ok(()),
            FakeResponse::Status(code) => Err(TriggerError::Status(code)),
            FakeResponse::Network => Err(TriggerError::Transport("connection refused".to_string())),
        }
    }

    async fn fetch_badge(&self, url: &str) -> Result<String> {
        self.badge_fetches.lock().unwrap().push(url.to_string());
        if url.contains("broken") {
            return Err(eyre!("404"));
        }
        Ok(BADGE_SVG.to_string())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub successes: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn success_count(&self) -> usize {
        self.successes.lock().unwrap().len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().unwrap().len()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

pub fn form_env(name: &str, git_ref: &str, variables: Option<&str>) -> EnvironmentConfig {
    EnvironmentConfig {
        name: name.to_string(),
        label: format!("{name} environment"),
        badge_url: format!("https://gitlab.example.com/site/badges/{git_ref}/pipeline.svg"),
        target: TriggerTarget::Form {
            base_url: "https://gitlab.example.com/api/v4".to_string(),
            project_id: "42".to_string(),
            token: "trigger-token".to_string(),
            git_ref: git_ref.to_string(),
            variables: variables.map(str::to_string),
        },
    }
}

pub fn url_env(name: &str) -> EnvironmentConfig {
    EnvironmentConfig {
        name: name.to_string(),
        label: format!("{name} environment"),
        badge_url: format!("https://gitlab.example.com/site/badges/{name}/pipeline.svg"),
        target: TriggerTarget::Url {
            url: format!("https://gitlab.example.com/api/v4/projects/42/ref/{name}/trigger/pipeline?token=t"),
        },
    }
}

pub fn three_env_config() -> DeployConfig {
    DeployConfig::new(vec![
        url_env("staging"),
        form_env("preprod", "develop", Some("PREVIEW=0&FOO=bar")),
        form_env("production", "master", Some("PREVIEW=0&")),
    ])
    .unwrap()
}

/// Config without load-time validation, for values only caught at trigger time.
pub fn unchecked_config(environments: Vec<EnvironmentConfig>) -> DeployConfig {
    DeployConfig {
        environments,
        poll_interval: Duration::from_secs(10),
        request_timeout: Duration::from_secs(30),
        messages: Messages::default(),
    }
}

pub struct Harness {
    pub deployer: Deployer,
    pub client: Arc<FakeClient>,
    pub notifier: Arc<RecordingNotifier>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

pub fn harness(config: DeployConfig, response: FakeResponse) -> Harness {
    let client = FakeClient::new(response);
    let notifier = Arc::new(RecordingNotifier::default());
    let (tx, rx) = mpsc::unbounded_channel();
    let deployer = Deployer::new(
        Host {
            config,
            notifier: notifier.clone(),
        },
        client.clone(),
        tx,
    );
    Harness {
        deployer,
        client,
        notifier,
        rx,
    }
}

impl Harness {
    pub async fn next_event(&mut self) -> AppEvent {
        tokio::time::timeout(Duration::from_secs(3600), self.rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("channel closed")
    }

    /// `true` if no event shows up within a full minute of (paused) time.
    pub async fn stays_quiet(&mut self) -> bool {
        tokio::time::timeout(Duration::from_secs(60), self.rx.recv())
            .await
            .is_err()
    }

    /// Trigger and feed the result back, as the UI loop does. Badge events
    /// still queued from an earlier poll are skipped.
    pub async fn trigger_and_settle(&mut self, environment: &str) -> deployw::deploy::TriggerOutcome {
        assert!(self.deployer.trigger_deployment(environment));
        loop {
            match self.next_event().await {
                AppEvent::TriggerFinished {
                    environment,
                    generation,
                    result,
                } => {
                    return self
                        .deployer
                        .handle_trigger_finished(&environment, generation, &result)
                }
                AppEvent::BadgeRefreshed { .. } | AppEvent::BadgeStatus { .. } => {}
                other => panic!("expected TriggerFinished, got {other:?}"),
            }
        }
    }
}
