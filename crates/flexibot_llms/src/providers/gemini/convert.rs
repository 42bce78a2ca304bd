//! Conversion between unified types and Gemini types

use super::types::{
    GeminiContent, GeminiPart, GeminiRequest, GeminiResponse, GeminiUsage, GenerationConfig,
    InlineData,
};
use crate::error::{Error, Result};
use crate::types::{
    ContentPart, FinishReason, FinishReasonKind, GenerateOptions, GenerateRequest,
    GenerateResponse, Message, ResponseContent, Role, Usage,
};
use serde_json::json;

/// Convert unified request to Gemini request.
///
/// System messages are folded into `systemInstruction`; assistant turns use
/// the `model` role.
pub fn to_gemini_request(req: &GenerateRequest) -> Result<GeminiRequest> {
    let mut system_parts = Vec::new();
    let mut contents = Vec::new();

    for msg in &req.messages {
        match msg.role {
            Role::System => {
                if let Some(text) = msg.text().filter(|t| !t.is_empty()) {
                    system_parts.push(GeminiPart::Text { text });
                }
            }
            Role::User | Role::Assistant => contents.push(to_gemini_content(msg)),
        }
    }

    if contents.is_empty() {
        return Err(Error::provider_error(
            "Gemini request must include at least one user or assistant message",
        ));
    }

    let system_instruction = if system_parts.is_empty() {
        None
    } else {
        Some(GeminiContent {
            role: None,
            parts: system_parts,
        })
    };

    Ok(GeminiRequest {
        contents,
        system_instruction,
        generation_config: to_generation_config(&req.options),
    })
}

fn to_gemini_content(msg: &Message) -> GeminiContent {
    let role = match msg.role {
        Role::Assistant => "model",
        _ => "user",
    };

    let parts = msg
        .parts()
        .into_iter()
        .map(|part| match part {
            ContentPart::Text { text } => GeminiPart::Text { text },
            ContentPart::Image { mime_type, data } => GeminiPart::InlineData {
                inline_data: InlineData { mime_type, data },
            },
        })
        .collect();

    GeminiContent {
        role: Some(role.to_string()),
        parts,
    }
}

fn to_generation_config(options: &GenerateOptions) -> Option<GenerationConfig> {
    if options.max_tokens.is_none()
        && options.temperature.is_none()
        && options.top_p.is_none()
        && options.stop_sequences.is_none()
    {
        return None;
    }

    Some(GenerationConfig {
        max_output_tokens: options.max_tokens,
        temperature: options.temperature,
        top_p: options.top_p,
        stop_sequences: options.stop_sequences.clone(),
    })
}

/// Convert Gemini response to unified response
pub fn from_gemini_response(resp: GeminiResponse) -> Result<GenerateResponse> {
    let candidate = resp
        .candidates
        .first()
        .ok_or_else(|| Error::invalid_response("Gemini returned no candidates"))?;

    let text = candidate
        .text()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::invalid_response("Gemini returned no text in the response candidates"))?;

    Ok(GenerateResponse {
        content: vec![ResponseContent::Text { text }],
        usage: resp.usage_metadata.as_ref().map(to_usage).unwrap_or_default(),
        finish_reason: parse_finish_reason(&candidate.finish_reason),
        metadata: resp.model_version.map(|v| json!({ "model_version": v })),
    })
}

pub fn to_usage(usage: &GeminiUsage) -> Usage {
    Usage {
        prompt_tokens: usage.prompt_token_count,
        completion_tokens: usage.candidates_token_count,
        total_tokens: usage.total_token_count,
    }
}

pub fn parse_finish_reason(reason: &Option<String>) -> FinishReason {
    match reason.as_deref() {
        Some("STOP") => FinishReason::with_raw(FinishReasonKind::Stop, "STOP"),
        Some("MAX_TOKENS") => FinishReason::with_raw(FinishReasonKind::Length, "MAX_TOKENS"),
        Some(raw @ ("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT")) => {
            FinishReason::with_raw(FinishReasonKind::ContentFilter, raw)
        }
        Some(raw) => FinishReason::with_raw(FinishReasonKind::Other, raw),
        None => FinishReason::other(),
    }
}
