//! Conversion between unified types and Groq types

use super::types::{GroqMessage, GroqRequest, GroqResponse, GroqUsage};
use crate::error::{Error, Result};
use crate::types::{
    FinishReason, FinishReasonKind, GenerateRequest, GenerateResponse, Message, ResponseContent,
    Role, Usage,
};
use serde_json::json;

/// Convert unified request to Groq request
pub fn to_groq_request(req: &GenerateRequest, stream: bool) -> Result<GroqRequest> {
    let messages = req
        .messages
        .iter()
        .map(to_groq_message)
        .collect::<Result<Vec<_>>>()?;

    Ok(GroqRequest {
        model: req.model.clone(),
        messages,
        temperature: req.options.temperature,
        top_p: req.options.top_p,
        max_tokens: req.options.max_tokens,
        stop: req.options.stop_sequences.clone(),
        stream: if stream { Some(true) } else { None },
    })
}

/// Convert unified message to Groq message
fn to_groq_message(msg: &Message) -> Result<GroqMessage> {
    if msg.has_image() {
        return Err(Error::unsupported(
            "Groq chat models accept text only; send images to a vision provider",
        ));
    }

    let role = match msg.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    };

    Ok(GroqMessage {
        role: role.to_string(),
        content: msg.text().unwrap_or_default(),
    })
}

/// Convert Groq response to unified response
pub fn from_groq_response(resp: GroqResponse) -> Result<GenerateResponse> {
    let choice = resp
        .choices
        .first()
        .ok_or_else(|| Error::invalid_response("No choices in Groq response"))?;

    let text = choice
        .message
        .content
        .clone()
        .ok_or_else(|| Error::invalid_response("No content in Groq response"))?;

    Ok(GenerateResponse {
        content: vec![ResponseContent::Text { text }],
        usage: resp.usage.as_ref().map(to_usage).unwrap_or_default(),
        finish_reason: parse_finish_reason(&choice.finish_reason),
        metadata: Some(json!({
            "id": resp.id,
            "model": resp.model,
        })),
    })
}

pub fn to_usage(usage: &GroqUsage) -> Usage {
    Usage {
        prompt_tokens: usage.prompt_tokens,
        completion_tokens: usage.completion_tokens,
        total_tokens: usage.total_tokens,
    }
}

/// Parse Groq finish reason to unified finish reason
pub fn parse_finish_reason(reason: &Option<String>) -> FinishReason {
    match reason.as_deref() {
        Some("stop") => FinishReason::with_raw(FinishReasonKind::Stop, "stop"),
        Some("length") => FinishReason::with_raw(FinishReasonKind::Length, "length"),
        Some("content_filter") => {
            FinishReason::with_raw(FinishReasonKind::ContentFilter, "content_filter")
        }
        Some(raw) => FinishReason::with_raw(FinishReasonKind::Other, raw),
        None => FinishReason::other(),
    }
}
