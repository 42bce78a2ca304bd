//! Prompt assembly and conversion to provider requests.

use flexibot_core::ChatMessage;
use flexibot_llms::{ContentPart, GenerateOptions, GenerateRequest, Message};

use crate::error::{Result, RuntimeError};
use crate::vision::ImageInput;

/// The ordered message list for one request: system, context, user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    messages: Vec<ChatMessage>,
}

impl Prompt {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The final user message.
    pub fn user_input(&self) -> &str {
        self.messages.last().map(ChatMessage::text).unwrap_or_default()
    }
}

/// Assemble `[system, ...context, user_input]`.
///
/// The system message is always present, even when empty. Fails with
/// `InvalidInput` when `user_input` is empty or whitespace.
pub fn build(system_instruction: &str, context: &[ChatMessage], user_input: &str) -> Result<Prompt> {
    if user_input.trim().is_empty() {
        return Err(RuntimeError::invalid_input("message must not be empty"));
    }

    let mut messages = Vec::with_capacity(context.len() + 2);
    messages.push(ChatMessage::system(system_instruction));
    messages.extend(context.iter().cloned());
    messages.push(ChatMessage::user(user_input));

    Ok(Prompt { messages })
}

fn to_llm_message(message: &ChatMessage) -> Message {
    match message {
        ChatMessage::System(text) => Message::system(text.as_str()),
        ChatMessage::User(text) => Message::user(text.as_str()),
        ChatMessage::Assistant(text) => Message::assistant(text.as_str()),
    }
}

/// Build a provider request from chat messages.
pub fn build_generate_request(
    model: &str,
    messages: &[ChatMessage],
    options: GenerateOptions,
) -> GenerateRequest {
    GenerateRequest::new(model, messages.iter().map(to_llm_message).collect())
        .with_options(options)
}

/// Build a single-message multimodal request: question text plus one image.
pub fn build_vision_request(
    model: &str,
    question: &str,
    image: &ImageInput,
    options: GenerateOptions,
) -> Result<GenerateRequest> {
    if question.trim().is_empty() {
        return Err(RuntimeError::invalid_input(
            "a question is required to analyze an image",
        ));
    }

    let message = Message::user(vec![
        ContentPart::text(question),
        ContentPart::image(image.mime_type(), image.bytes()),
    ]);

    Ok(GenerateRequest::new(model, vec![message]).with_options(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexibot_llms::Role;

    #[test]
    fn test_build_without_context() {
        let prompt = build("", &[], "hello").unwrap();
        assert_eq!(
            prompt.messages(),
            &[ChatMessage::system(""), ChatMessage::user("hello")]
        );
        assert_eq!(prompt.user_input(), "hello");
    }

    #[test]
    fn test_build_length_is_context_plus_two() {
        for n in 0..8 {
            let context: Vec<ChatMessage> = (0..n)
                .map(|i| {
                    if i % 2 == 0 {
                        ChatMessage::user(format!("u{i}"))
                    } else {
                        ChatMessage::assistant(format!("a{i}"))
                    }
                })
                .collect();
            let prompt = build("sys", &context, "next").unwrap();
            assert_eq!(prompt.len(), 1 + context.len() + 1);
            assert_eq!(&prompt.messages()[1..=n], context.as_slice());
        }
    }

    #[test]
    fn test_build_rejects_empty_input() {
        assert!(build("sys", &[], "").unwrap_err().is_invalid_input());
        assert!(build("sys", &[], "  \n\t").unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_build_generate_request() {
        let prompt = build("be brief", &[ChatMessage::user("h1"), ChatMessage::assistant("a1")], "q").unwrap();
        let request = build_generate_request(
            "llama3-8b-8192",
            prompt.messages(),
            GenerateOptions::new().max_tokens(32),
        );

        assert_eq!(request.model, "llama3-8b-8192");
        let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::User]);
        assert_eq!(request.options.max_tokens, Some(32));
    }

    #[test]
    fn test_build_vision_request() {
        let image = ImageInput::from_bytes("cat.png", b"png".to_vec()).unwrap();
        let request =
            build_vision_request("gemini-1.5-flash", "what is it?", &image, GenerateOptions::new()).unwrap();

        assert_eq!(request.messages.len(), 1);
        assert!(request.messages[0].has_image());
        assert_eq!(request.messages[0].text().as_deref(), Some("what is it?"));
    }

    #[test]
    fn test_build_vision_request_requires_question() {
        let image = ImageInput::from_bytes("cat.png", b"png".to_vec()).unwrap();
        let err = build_vision_request("m", " ", &image, GenerateOptions::new()).unwrap_err();
        assert!(err.is_invalid_input());
    }
}
