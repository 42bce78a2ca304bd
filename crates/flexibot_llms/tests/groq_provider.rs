use flexibot_llms::providers::groq::GroqConfig;
use flexibot_llms::{
    Error, GenerateRequest, GroqProvider, Message, Provider, StreamEvent, TranscriptionRequest,
};
use futures::StreamExt;
use mockito::Matcher;

fn provider(server: &mockito::Server) -> GroqProvider {
    GroqProvider::new(GroqConfig::new("gsk_test").with_base_url(server.url())).unwrap()
}

fn chat_request() -> GenerateRequest {
    GenerateRequest::new(
        "llama3-8b-8192",
        vec![
            Message::system("You are helpful."),
            Message::user("h1"),
            Message::assistant("a1"),
            Message::user("What is Rust?"),
        ],
    )
}

#[tokio::test]
async fn generate_sends_messages_in_order() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer gsk_test")
        .match_body(Matcher::PartialJsonString(
            r#"{"model":"llama3-8b-8192","messages":[
                {"role":"system","content":"You are helpful."},
                {"role":"user","content":"h1"},
                {"role":"assistant","content":"a1"},
                {"role":"user","content":"What is Rust?"}]}"#
                .to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id":"chatcmpl-1","model":"llama3-8b-8192",
                "choices":[{"index":0,"message":{"role":"assistant","content":"A language."},"finish_reason":"stop"}],
                "usage":{"prompt_tokens":20,"completion_tokens":3,"total_tokens":23}}"#,
        )
        .create_async()
        .await;

    let response = provider(&server).generate(chat_request()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.text(), "A language.");
    assert_eq!(response.usage.total_tokens, 23);
}

#[tokio::test]
async fn generate_maps_http_errors() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#)
        .create_async()
        .await;

    let err = provider(&server).generate(chat_request()).await.unwrap_err();

    assert!(err.is_auth_error());
    match err {
        Error::Api { provider, message, .. } => {
            assert_eq!(provider, "Groq");
            assert_eq!(message, "Invalid API Key");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn stream_yields_deltas_then_finish() {
    let body = concat!(
        "data: {\"id\":\"c1\",\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"content\":\"\"}}]}\n\n",
        "data: {\"id\":\"c1\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\"Hel\"}}]}\n\n",
        "data: {\"id\":\"c1\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\"lo\"}}]}\n\n",
        "data: {\"id\":\"c1\",\"choices\":[{\"index\":0,\"delta\":{},\"finish_reason\":\"stop\"}],\"x_groq\":{\"usage\":{\"prompt_tokens\":3,\"completion_tokens\":2,\"total_tokens\":5}}}\n\n",
        "data: [DONE]\n\n",
    );

    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJsonString(r#"{"stream":true}"#.to_string()))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let mut stream = provider(&server).stream(chat_request()).await.unwrap();
    let mut text = String::new();
    let mut events = Vec::new();
    while let Some(event) = stream.next().await {
        let event = event.unwrap();
        if let StreamEvent::TextDelta { delta, .. } = &event {
            text.push_str(delta);
        }
        events.push(event);
    }

    assert_eq!(text, "Hello");
    assert!(matches!(events.first(), Some(StreamEvent::Start { .. })));
    match events.last() {
        Some(StreamEvent::Finish { usage, .. }) => assert_eq!(usage.total_tokens, 5),
        other => panic!("expected finish, got {other:?}"),
    }
}

#[tokio::test]
async fn list_models_reads_ids() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/models")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"object":"list","data":[{"id":"llama3-8b-8192"},{"id":"whisper-large-v3"}]}"#)
        .create_async()
        .await;

    let models = provider(&server).list_models().await.unwrap();
    assert_eq!(models, vec!["llama3-8b-8192", "whisper-large-v3"]);
}

#[tokio::test]
async fn transcribe_posts_multipart_form() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/audio/transcriptions")
        .match_header("authorization", "Bearer gsk_test")
        .match_header("content-type", Matcher::Regex("^multipart/form-data".to_string()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("whisper-large-v3".to_string()),
            Matcher::Regex(r#"filename="note.wav""#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"text":"hello from the microphone"}"#)
        .create_async()
        .await;

    let request = TranscriptionRequest::new("whisper-large-v3", "note.wav", b"RIFF....WAVE".to_vec());
    let transcription = provider(&server).transcribe(request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(transcription.text, "hello from the microphone");
}

#[tokio::test]
async fn transcribe_rejects_empty_audio() {
    let server = mockito::Server::new_async().await;
    let request = TranscriptionRequest::new("whisper-large-v3", "empty.wav", Vec::new());
    assert!(provider(&server).transcribe(request).await.is_err());
}

#[tokio::test]
async fn stream_without_done_is_an_error() {
    let body = "data: {\"id\":\"c1\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\"The answer is\"}}]}\n\n";

    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let results: Vec<_> = provider(&server)
        .stream(chat_request())
        .await
        .unwrap()
        .collect()
        .await;

    assert!(results.iter().all(|r| !matches!(r, Ok(StreamEvent::Finish { .. }))));
    match results.last() {
        Some(Err(Error::Stream(message))) => assert!(message.contains("[DONE]")),
        other => panic!("expected stream error, got {other:?}"),
    }
}
