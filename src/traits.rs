use crate::error::TriggerError;
use crate::trigger::TriggerRequest;
use async_trait::async_trait;
use color_eyre::eyre::Result;

/// Outbound calls to the CI system.
#[async_trait]
pub trait CiClient: Send + Sync {
    /// Send the trigger. `Ok` means the CI answered 2xx; the body is ignored.
    async fn trigger_pipeline(&self, request: &TriggerRequest) -> Result<(), TriggerError>;
    /// Fetch the badge image body (SVG text).
    async fn fetch_badge(&self, url: &str) -> Result<String>;
}

/// User-facing notification surface provided by the host.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}
