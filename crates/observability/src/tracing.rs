//! Span helpers shared by the runtime and the CLI

/// Create a span around one chat completion
///
/// `output.chars` and `duration_ms` start empty and are filled in once the
/// call returns.
///
/// # Example
///
/// ```rust
/// use flexibot_observability::completion_span;
///
/// let span = completion_span!("groq", "llama3-8b-8192", 4);
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! completion_span {
    ($provider:expr, $model:expr, $message_count:expr) => {
        tracing::info_span!(
            "llm.completion",
            llm.provider = $provider,
            llm.model = $model,
            llm.messages = $message_count,
            output.chars = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Create a span for a session-level operation (send, vision, transcribe)
///
/// # Example
///
/// ```rust
/// use flexibot_observability::session_span;
///
/// let span = session_span!("5b0c...", "send");
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! session_span {
    ($session_id:expr, $operation:expr) => {
        tracing::info_span!(
            "session.operation",
            session.id = $session_id,
            operation = $operation,
            turns = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Record an error on the current span
///
/// # Example
///
/// ```rust,ignore
/// use flexibot_observability::record_error;
///
/// if let Err(e) = client.complete(&messages, model).await {
///     record_error(&e);
///     return Err(e);
/// }
/// ```
pub fn record_error<E: std::error::Error>(error: &E) {
    let span = tracing::Span::current();
    span.record("error", true);
    span.record("error.message", error.to_string());
    tracing::error!(error = %error, "Operation failed");
}

/// Record a duration in milliseconds on the current span
///
/// # Example
///
/// ```rust
/// use flexibot_observability::record_duration;
/// use std::time::Instant;
///
/// let start = Instant::now();
/// record_duration("duration_ms", start.elapsed());
/// ```
pub fn record_duration(key: &str, duration: std::time::Duration) {
    let span = tracing::Span::current();
    span.record(key, duration.as_millis() as u64);
}
