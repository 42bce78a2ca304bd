//! Chat completion seam.
//!
//! `CompletionClient` is what the runtime talks to; `ProviderCompletionClient`
//! adapts any `flexibot_llms::Provider` to it.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use flexibot_core::ChatMessage;
use flexibot_llms::{GenerateOptions, Provider, StreamEvent};
use flexibot_observability::record_duration;
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info};

use crate::context::{build_generate_request, estimate_tokens};
use crate::error::{Result, RuntimeError};

/// Sends an ordered message list to a chat model and returns its reply.
///
/// Implementations must not retry; any failure is reported as
/// `RuntimeError::UpstreamFailed`. Failures are logged by the caller.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], model: &str) -> Result<String>;

    /// Like `complete`, also pushing text deltas into `sink` as they arrive.
    ///
    /// The default sends the whole reply as one delta.
    async fn complete_streaming(
        &self,
        messages: &[ChatMessage],
        model: &str,
        sink: mpsc::UnboundedSender<String>,
    ) -> Result<String> {
        let text = self.complete(messages, model).await?;
        let _ = sink.send(text.clone());
        Ok(text)
    }
}

/// `CompletionClient` backed by a provider (Groq by default).
pub struct ProviderCompletionClient {
    provider: Arc<dyn Provider>,
    options: GenerateOptions,
}

impl ProviderCompletionClient {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            options: GenerateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    fn span(&self, messages: &[ChatMessage], model: &str) -> tracing::Span {
        flexibot_observability::completion_span!(
            self.provider.provider_id(),
            model,
            messages.len()
        )
    }
}

#[async_trait]
impl CompletionClient for ProviderCompletionClient {
    async fn complete(&self, messages: &[ChatMessage], model: &str) -> Result<String> {
        let request = build_generate_request(model, messages, self.options.clone());

        async {
            debug!(estimated_tokens = estimate_tokens(messages), "Sending completion request");
            let start = Instant::now();
            let result = self.provider.generate(request).await;
            record_duration("duration_ms", start.elapsed());

            match result {
                Ok(response) => {
                    let text = response.text();
                    tracing::Span::current().record("output.chars", text.chars().count());
                    info!(
                        prompt_tokens = response.usage.prompt_tokens,
                        completion_tokens = response.usage.completion_tokens,
                        "Completion received"
                    );
                    Ok(text)
                }
                Err(e) => Err(RuntimeError::from(e)),
            }
        }
        .instrument(self.span(messages, model))
        .await
    }

    async fn complete_streaming(
        &self,
        messages: &[ChatMessage],
        model: &str,
        sink: mpsc::UnboundedSender<String>,
    ) -> Result<String> {
        let request = build_generate_request(model, messages, self.options.clone());

        async {
            debug!(estimated_tokens = estimate_tokens(messages), "Streaming completion request");
            let start = Instant::now();

            let mut stream = match self.provider.stream(request).await {
                Ok(s) => s,
                Err(e) => return Err(RuntimeError::from(e)),
            };

            let mut text = String::new();
            while let Some(event) = stream.next().await {
                match event {
                    Ok(StreamEvent::Start { id }) => debug!(stream.id = %id, "Completion stream started"),
                    Ok(StreamEvent::TextDelta { delta, .. }) => {
                        text.push_str(&delta);
                        // Receiver gone means the caller stopped rendering; keep collecting
                        let _ = sink.send(delta);
                    }
                    Ok(StreamEvent::Finish { usage, reason }) => info!(
                        prompt_tokens = usage.prompt_tokens,
                        completion_tokens = usage.completion_tokens,
                        reason = ?reason.unified,
                        "Completion stream finished"
                    ),
                    Ok(StreamEvent::Error { message }) => {
                        return Err(RuntimeError::UpstreamFailed(message));
                    }
                    Err(e) => return Err(RuntimeError::from(e)),
                }
            }

            record_duration("duration_ms", start.elapsed());
            tracing::Span::current().record("output.chars", text.chars().count());
            Ok(text)
        }
        .instrument(self.span(messages, model))
        .await
    }
}
