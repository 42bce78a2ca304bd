//! Groq streaming support

use super::convert::{parse_finish_reason, to_usage};
use super::types::{GroqStreamChunk, error_message};
use crate::error::{Error, Result};
use crate::types::{FinishReason, GenerateStream, StreamEvent, Usage};
use futures::stream::StreamExt;
use reqwest_eventsource::{Event, EventSource};

/// Per-stream bookkeeping carried across chunks
#[derive(Debug, Default)]
struct StreamState {
    id: Option<String>,
    usage: Usage,
    finish_reason: Option<FinishReason>,
}

impl StreamState {
    fn finish_event(&mut self) -> StreamEvent {
        StreamEvent::finish(
            std::mem::take(&mut self.usage),
            self.finish_reason.take().unwrap_or_else(FinishReason::other),
        )
    }
}

/// Create a stream from Groq EventSource
pub async fn create_stream(mut event_source: EventSource) -> Result<GenerateStream> {
    let stream = async_stream::stream! {
        let mut state = StreamState::default();
        let mut failed = false;
        let mut done = false;

        while let Some(event) = event_source.next().await {
            match event {
                Ok(Event::Open) => {
                    continue;
                }
                Ok(Event::Message(message)) => {
                    if message.data == "[DONE]" {
                        done = true;
                        break;
                    }

                    match serde_json::from_str::<GroqStreamChunk>(&message.data) {
                        Ok(chunk) => {
                            for stream_event in process_chunk(chunk, &mut state) {
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
                Err(reqwest_eventsource::Error::StreamEnded) => {
                    break;
                }
                Err(reqwest_eventsource::Error::InvalidStatusCode(status, response)) => {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unable to read error body".to_string());
                    yield Err(Error::api_error("Groq", status.as_u16(), error_message(&body)));
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
            if !done {
                yield Err(Error::stream_error("stream ended before [DONE]"));
            } else if state.id.is_some() {
                yield Ok(state.finish_event());
            }
        }
    };

    Ok(GenerateStream::new(Box::pin(stream)))
}

/// Convert one chunk into unified events, updating the stream state
fn process_chunk(chunk: GroqStreamChunk, state: &mut StreamState) -> Vec<StreamEvent> {
    let mut events = Vec::new();

    if state.id.is_none() {
        events.push(StreamEvent::start(chunk.id.clone()));
        state.id = Some(chunk.id.clone());
    }

    if let Some(usage) = chunk
        .x_groq
        .as_ref()
        .and_then(|x| x.usage.as_ref())
        .or(chunk.usage.as_ref())
    {
        state.usage = to_usage(usage);
    }

    for choice in chunk.choices {
        if let Some(content) = choice.delta.content {
            if !content.is_empty() {
                events.push(StreamEvent::text_delta(chunk.id.clone(), content));
            }
        }
        if choice.finish_reason.is_some() {
            state.finish_reason = Some(parse_finish_reason(&choice.finish_reason));
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FinishReasonKind;

    fn chunk(data: &str) -> GroqStreamChunk {
        serde_json::from_str(data).unwrap()
    }

    #[test]
    fn test_first_chunk_emits_start() {
        let mut state = StreamState::default();
        let events = process_chunk(
            chunk(r#"{"id":"c1","choices":[{"index":0,"delta":{"role":"assistant","content":""}}]}"#),
            &mut state,
        );

        assert_eq!(events, vec![StreamEvent::start("c1")]);
        assert_eq!(state.id.as_deref(), Some("c1"));
    }

    #[test]
    fn test_process_text_delta() {
        let mut state = StreamState {
            id: Some("c1".into()),
            ..Default::default()
        };
        let events = process_chunk(
            chunk(r#"{"id":"c1","choices":[{"index":0,"delta":{"content":"Hello"}}]}"#),
            &mut state,
        );

        assert_eq!(events.len(), 1);
        if let StreamEvent::TextDelta { delta, .. } = &events[0] {
            assert_eq!(delta, "Hello");
        } else {
            panic!("Expected TextDelta event");
        }
    }

    #[test]
    fn test_final_chunk_records_usage_and_reason() {
        let mut state = StreamState {
            id: Some("c1".into()),
            ..Default::default()
        };
        let events = process_chunk(
            chunk(
                r#"{"id":"c1","choices":[{"index":0,"delta":{},"finish_reason":"length"}],
                   "x_groq":{"id":"req","usage":{"prompt_tokens":4,"completion_tokens":6,"total_tokens":10}}}"#,
            ),
            &mut state,
        );
        assert!(events.is_empty());

        match state.finish_event() {
            StreamEvent::Finish { usage, reason } => {
                assert_eq!(usage.total_tokens, 10);
                assert_eq!(reason.unified, FinishReasonKind::Length);
            }
            other => panic!("Expected Finish event, got {:?}", other),
        }
    }
}
