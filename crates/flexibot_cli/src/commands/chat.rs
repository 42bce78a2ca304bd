//! `flexibot chat`: the interactive loop.

use anyhow::Result;
use flexibot_constant::app;
use flexibot_runtime::{AudioInput, ImageInput};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::Chat;
use crate::output;

/// One line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Message(&'a str),
    Help,
    History,
    Config,
    Image { path: &'a str, question: &'a str },
    Voice(&'a str),
    Exit,
    Unknown(&'a str),
}

fn parse(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Message(line);
    };

    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map(|(n, r)| (n, r.trim()))
        .unwrap_or((command, ""));

    match name {
        "help" | "?" => Input::Help,
        "history" => Input::History,
        "config" => Input::Config,
        "exit" | "quit" => Input::Exit,
        "image" => {
            let (path, question) = rest
                .split_once(char::is_whitespace)
                .map(|(p, q)| (p, q.trim()))
                .unwrap_or((rest, ""));
            Input::Image { path, question }
        }
        "voice" => Input::Voice(rest),
        _ => Input::Unknown(line),
    }
}

pub async fn handle(mut chat: Chat) -> Result<()> {
    output::header(app::DISPLAY_NAME);
    output::dim(app::GREETING);
    output::dim("Type /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        output::prompt("You");
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse(&line) {
            Input::Empty => continue,
            Input::Exit => break,
            Input::Help => help(),
            Input::History => history(&chat),
            Input::Config => show_config(&chat),
            Input::Message(text) => report(chat.respond(text).await),
            Input::Image { path, question } => report(image(&mut chat, path, question).await),
            Input::Voice(path) => report(voice(&mut chat, path).await),
            Input::Unknown(command) => {
                output::warning(&format!("Unknown command '{command}'. Type /help."))
            }
        }
    }

    output::dim("Goodbye!");
    Ok(())
}

/// Failed turns leave the session as it was, so the loop carries on.
fn report(result: Result<()>) {
    if let Err(e) = result {
        output::error(&e.to_string());
    }
}

async fn image(chat: &mut Chat, path: &str, question: &str) -> Result<()> {
    if path.is_empty() {
        anyhow::bail!("usage: /image <path> <question>");
    }
    let image = ImageInput::from_path(path).await?;
    chat.describe(question, &image).await
}

async fn voice(chat: &mut Chat, path: &str) -> Result<()> {
    if path.is_empty() {
        anyhow::bail!("usage: /voice <path>");
    }
    let clip = AudioInput::from_path(path).await?;
    let spinner = output::spinner("Listening...");
    let result = chat.runtime.transcribe(&clip).await;
    output::spinner_clear(&spinner);

    let text = result?;
    output::kv("You (voice):", &text);
    chat.respond(&text).await
}

fn help() {
    output::header("Commands");
    output::kv("/image <path> <question>", "ask about a jpg or png image");
    output::kv("/voice <path>", "transcribe an audio file and send it");
    output::kv("/history", "show the turns so far");
    output::kv("/config", "show the session settings");
    output::kv("/exit", "leave the chat");
}

fn history(chat: &Chat) {
    let turns = chat.session.turns().all();
    if output::is_json() {
        output::data("history", &turns);
        return;
    }
    if turns.is_empty() {
        output::dim("No turns yet.");
        return;
    }

    let window = chat.session.config.memory_window.get();
    let first_in_window = turns.len().saturating_sub(window);
    let mut table = output::table();
    output::table_header(&mut table, &["#", "You", "FlexiBot", "In context"]);
    for (i, turn) in turns.iter().enumerate() {
        let index = (i + 1).to_string();
        let in_context = if i >= first_in_window { "yes" } else { "" };
        output::table_row(
            &mut table,
            &[index.as_str(), turn.human(), turn.assistant(), in_context],
        );
    }
    println!("{table}");
}

fn show_config(chat: &Chat) {
    let config = &chat.session.config;
    output::kv("session", chat.session.id.as_str());
    output::kv("model", config.model.as_str());
    output::kv("memory length", &config.memory_window.get().to_string());
    output::kv("typing delay", &format!("{}ms", config.typing_delay.as_millis()));
    output::kv("system prompt", &config.system_prompt);
    output::kv("stream", &chat.stream.to_string());
    output::kv("feedback", &chat.feedback.to_string());
    output::kv("vision", if chat.runtime.has_vision() { "enabled" } else { "disabled" });
    output::kv("providers", &chat.runtime.provider_ids().join(", "));
}
