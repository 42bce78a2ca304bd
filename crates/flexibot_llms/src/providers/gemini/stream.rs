//! Gemini streaming support (`streamGenerateContent?alt=sse`)

use super::convert::{parse_finish_reason, to_usage};
use super::types::{GeminiResponse, error_message};
use crate::error::{Error, Result};
use crate::types::{FinishReason, GenerateStream, StreamEvent, Usage};
use futures::stream::StreamExt;
use reqwest_eventsource::{Event, EventSource};

#[derive(Debug, Default)]
struct StreamState {
    usage: Usage,
    finish_reason: Option<FinishReason>,
}

/// Create a stream from Gemini EventSource.
///
/// Gemini has no response id and no `[DONE]` sentinel; a fresh id is minted
/// and the stream ends when the server closes the connection. A stream that
/// closes before any chunk carried a `finishReason` is truncated and ends in
/// an error.
pub async fn create_stream(mut event_source: EventSource) -> Result<GenerateStream> {
    let id = uuid::Uuid::new_v4().to_string();

    let stream = async_stream::stream! {
        let mut state = StreamState::default();
        let mut failed = false;

        yield Ok(StreamEvent::start(id.clone()));

        while let Some(event) = event_source.next().await {
            match event {
                Ok(Event::Open) => continue,
                Ok(Event::Message(message)) => {
                    match serde_json::from_str::<GeminiResponse>(&message.data) {
                        Ok(chunk) => {
                            for stream_event in process_chunk(&id, chunk, &mut state) {
                                yield Ok(stream_event);
                            }
                        }
                        Err(e) => {
                            yield Err(Error::stream_error(format!("Failed to parse chunk: {}", e)));
                            failed = true;
                            break;
                        }
                    }
                }
                Err(reqwest_eventsource::Error::StreamEnded) => break,
                Err(reqwest_eventsource::Error::InvalidStatusCode(status, response)) => {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unable to read error body".to_string());
                    yield Err(Error::api_error("Gemini", status.as_u16(), error_message(&body)));
                    failed = true;
                    break;
                }
                Err(e) => {
                    yield Err(Error::stream_error(format!("Stream error: {}", e)));
                    failed = true;
                    break;
                }
            }
        }

        event_source.close();
        if !failed {
            match state.finish_reason {
                Some(reason) => {
                    yield Ok(StreamEvent::finish(state.usage, reason));
                }
                None => {
                    yield Err(Error::stream_error("stream ended before finishReason"));
                }
            }
        }
    };

    Ok(GenerateStream::new(Box::pin(stream)))
}

fn process_chunk(id: &str, chunk: GeminiResponse, state: &mut StreamState) -> Vec<StreamEvent> {
    let mut events = Vec::new();

    if let Some(usage) = chunk.usage_metadata.as_ref() {
        state.usage = to_usage(usage);
    }

    if let Some(candidate) = chunk.candidates.first() {
        if let Some(text) = candidate.text().filter(|t| !t.is_empty()) {
            events.push(StreamEvent::text_delta(id, text));
        }
        if candidate.finish_reason.is_some() {
            state.finish_reason = Some(parse_finish_reason(&candidate.finish_reason));
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FinishReasonKind;

    #[test]
    fn test_process_chunk_text_and_finish() {
        let mut state = StreamState::default();
        let chunk: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"It is a dog."}]},"finishReason":"STOP"}],
                "usageMetadata":{"promptTokenCount":5,"candidatesTokenCount":4,"totalTokenCount":9}}"#,
        )
        .unwrap();

        let events = process_chunk("s1", chunk, &mut state);
        assert_eq!(events, vec![StreamEvent::text_delta("s1", "It is a dog.")]);
        assert_eq!(state.usage.total_tokens, 9);
        assert_eq!(
            state.finish_reason.map(|r| r.unified),
            Some(FinishReasonKind::Stop)
        );
    }

    #[test]
    fn test_process_chunk_without_candidates() {
        let mut state = StreamState::default();
        let chunk: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(process_chunk("s1", chunk, &mut state).is_empty());
    }
}
