//! Collaborator seams for everything interactive or presentational:
//! decisions, progress, preview rendering. The core stays headless; UIs
//! implement these traits.

use async_trait::async_trait;

/// Decisions the original workflow asked the user for (overwrite a table,
/// create a backup, pick a schema). Injected so the core never blocks on a
/// surface it does not own.
#[async_trait]
pub trait DecisionPolicy: Send + Sync {
    async fn confirm(&self, question: &str) -> bool;
    /// Pick one schema out of the candidates, or None to decline.
    async fn choose_schema(&self, candidates: &[String]) -> Option<String>;
}

/// Non-interactive default: declines everything.
pub struct NoInteraction;

#[async_trait]
impl DecisionPolicy for NoInteraction {
    async fn confirm(&self, _question: &str) -> bool {
        false
    }

    async fn choose_schema(&self, _candidates: &[String]) -> Option<String> {
        None
    }
}

/// Progress channel for an external progress UI.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn report(&self, percent: u8, message: &str);
}

pub struct NullProgress;

#[async_trait]
impl ProgressSink for NullProgress {
    async fn report(&self, _percent: u8, _message: &str) {}
}

/// Regenerates the stored preview artifact after a successful export with a
/// file blob. External renderer; failures are the caller's to log.
#[async_trait]
pub trait PreviewRenderer: Send + Sync {
    async fn render(&self, file_id: i32, filename: &str);
}

pub struct NullRenderer;

#[async_trait]
impl PreviewRenderer for NullRenderer {
    async fn render(&self, _file_id: i32, _filename: &str) {}
}
