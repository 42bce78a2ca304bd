//! Advisory checks on a model reply.
//!
//! Feedback is informational only and never changes the session.

use std::collections::HashSet;

use serde::Serialize;

const MIN_RESPONSE_CHARS: usize = 20;
const MAX_RESPONSE_CHARS: usize = 2000;

const APOLOGY_MARKERS: &[&str] = &[
    "i'm sorry",
    "i am sorry",
    "i apologize",
    "as an ai",
    "i cannot",
    "i can't",
    "i am unable",
    "i'm unable",
];

const STOP_WORDS: &[&str] = &[
    "about", "after", "also", "been", "before", "being", "could", "does", "from", "have",
    "into", "just", "like", "more", "much", "other", "should", "some", "than", "that", "their",
    "them", "then", "there", "these", "they", "this", "those", "very", "were", "what", "when",
    "where", "which", "while", "will", "with", "would", "your",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackNote {
    Empty,
    TooShort,
    TooLong,
    Apologetic,
    EchoesInput,
    OffTopic,
}

impl FeedbackNote {
    pub fn message(&self) -> &'static str {
        match self {
            FeedbackNote::Empty => "The response is empty.",
            FeedbackNote::TooShort => "The response is very short; it may lack detail.",
            FeedbackNote::TooLong => "The response is very long; consider asking for a summary.",
            FeedbackNote::Apologetic => "The response apologizes or declines; try rephrasing.",
            FeedbackNote::EchoesInput => "The response repeats the question verbatim.",
            FeedbackNote::OffTopic => "The response shares no key words with the question.",
        }
    }
}

impl std::fmt::Display for FeedbackNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub notes: Vec<FeedbackNote>,
}

impl Feedback {
    /// No issues found.
    pub fn is_clean(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn has(&self, note: FeedbackNote) -> bool {
        self.notes.contains(&note)
    }
}

pub fn evaluate(user_input: &str, response: &str) -> Feedback {
    let mut notes = Vec::new();
    let trimmed = response.trim();

    if trimmed.is_empty() {
        notes.push(FeedbackNote::Empty);
        return Feedback { notes };
    }

    let chars = trimmed.chars().count();
    if chars < MIN_RESPONSE_CHARS {
        notes.push(FeedbackNote::TooShort);
    } else if chars > MAX_RESPONSE_CHARS {
        notes.push(FeedbackNote::TooLong);
    }

    let lower = trimmed.to_lowercase();
    if APOLOGY_MARKERS.iter().any(|m| lower.contains(m)) {
        notes.push(FeedbackNote::Apologetic);
    }

    let question = user_input.trim().to_lowercase();
    if !question.is_empty() && lower.contains(&question) && question.len() >= MIN_RESPONSE_CHARS {
        notes.push(FeedbackNote::EchoesInput);
    }

    let asked = content_words(&question);
    if !asked.is_empty() && asked.is_disjoint(&content_words(&lower)) {
        notes.push(FeedbackNote::OffTopic);
    }

    Feedback { notes }
}

/// Lowercase alphanumeric words of four or more characters, minus stop words.
fn content_words(text: &str) -> HashSet<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 4 && !STOP_WORDS.contains(w))
        .collect()
}
