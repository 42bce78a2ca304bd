//! Terminal output helpers, dual-mode: styled text for humans, structured JSON for machines.
//!
//! Uses:
//! - `console` for colors (respects NO_COLOR, auto-disables when piped)
//! - `comfy-table` for structured data
//! - `indicatif` for spinners

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use console::style;
use flexibot_runtime::Feedback;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tokio::sync::mpsc;

use crate::cli::OutputFormat;

// ── Global format flag ─────────────────────────────────────────────

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn init(format: OutputFormat) {
    if matches!(format, OutputFormat::Json) {
        JSON_MODE.store(true, Ordering::Relaxed);
    }
}

pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

// ── JSON envelope ──────────────────────────────────────────────────

#[derive(Serialize)]
struct Msg<'a> {
    level: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a JsonValue>,
}

fn render_json(level: &str, message: &str, data: Option<&JsonValue>) -> String {
    let msg = Msg {
        level,
        message,
        data,
    };
    serde_json::to_string(&msg).unwrap_or_else(|_| {
        serde_json::json!({ "level": level, "message": message }).to_string()
    })
}

fn emit_json(level: &str, message: &str, data: Option<&JsonValue>) {
    println!("{}", render_json(level, message, data));
}

// ── Public helpers ─────────────────────────────────────────────────

pub fn header(text: &str) {
    if is_json() {
        emit_json("info", text, None);
    } else {
        println!("{}", style(text).bold().cyan());
    }
}

pub fn success(text: &str) {
    if is_json() {
        emit_json("success", text, None);
    } else {
        println!("{} {}", style("✓").green(), style(text).bright());
    }
}

pub fn error(text: &str) {
    if is_json() {
        eprintln!("{}", render_json("error", text, None));
    } else {
        eprintln!("{} {}", style("✗").red(), style(text).bright());
    }
}

pub fn warning(text: &str) {
    if is_json() {
        emit_json("warning", text, None);
    } else {
        println!("{} {}", style("!").yellow(), style(text).bright());
    }
}

pub fn dim(text: &str) {
    if is_json() {
        emit_json("info", text, None);
    } else {
        println!("{}", style(text).dim());
    }
}

/// Print a key-value pair with styled key.
pub fn kv(key: &str, value: &str) {
    if is_json() {
        let data = serde_json::json!({ key: value });
        emit_json("info", key, Some(&data));
    } else {
        println!("  {} {}", style(key).cyan().bold(), value);
    }
}

/// Emit an arbitrary serializable value as structured output.
pub fn data<T: Serialize>(label: &str, value: &T) {
    if is_json() {
        let json_val = serde_json::to_value(value).unwrap_or(JsonValue::Null);
        emit_json("data", label, Some(&json_val));
    } else {
        let formatted =
            serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{label}: <?>"));
        println!("{formatted}");
    }
}

/// Prompt shown before reading a line of chat input.
pub fn prompt(label: &str) {
    if is_json() {
        return;
    }
    print!("{} ", style(format!("{label} ›")).bold().green());
    let _ = std::io::stdout().flush();
}

// ── Replies ────────────────────────────────────────────────────────

/// Render a finished reply under `title`, typewriter style in text mode.
pub async fn reply(title: &str, text: &str, delay: Duration) {
    if is_json() {
        let data = serde_json::json!({ "title": title });
        emit_json("response", text, Some(&data));
    } else {
        println!("{}", style(title).bold().magenta());
        typewrite(text, delay).await;
    }
}

/// Print `text` one character at a time, then a newline.
pub async fn typewrite(text: &str, delay: Duration) {
    type_chars(text, delay).await;
    println!();
}

async fn type_chars(text: &str, delay: Duration) {
    let mut stdout = std::io::stdout();
    for ch in text.chars() {
        print!("{ch}");
        let _ = stdout.flush();
        tokio::time::sleep(delay).await;
    }
}

/// Typewrite deltas as they arrive. Returns the concatenated text once the
/// sender side closes. Nothing is printed in JSON mode.
pub async fn typewrite_stream(
    title: String,
    mut deltas: mpsc::UnboundedReceiver<String>,
    delay: Duration,
) -> String {
    let mut full = String::new();
    let mut started = false;
    while let Some(delta) = deltas.recv().await {
        if !is_json() {
            if !started {
                println!("{}", style(&title).bold().magenta());
                started = true;
            }
            type_chars(&delta, delay).await;
        }
        full.push_str(&delta);
    }
    if started {
        println!();
    }
    full
}

/// Advisory notes on a reply.
pub fn feedback(feedback: &Feedback) {
    if is_json() {
        let data = serde_json::to_value(feedback).unwrap_or(JsonValue::Null);
        emit_json("feedback", "", Some(&data));
    } else if feedback.is_clean() {
        success("Feedback: looks good.");
    } else {
        for note in &feedback.notes {
            warning(note.message());
        }
    }
}

// ── Tables ─────────────────────────────────────────────────────────

/// Create a styled table for listing items.
pub fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Add a header row to the table.
pub fn table_header(table: &mut Table, columns: &[&str]) {
    table.set_header(
        columns
            .iter()
            .map(|c| {
                Cell::new(c)
                    .fg(Color::Cyan)
                    .add_attribute(comfy_table::Attribute::Bold)
            })
            .collect::<Vec<_>>(),
    );
}

/// Add a row to the table; the first column is highlighted.
pub fn table_row(table: &mut Table, cells: &[&str]) {
    let row = cells.iter().enumerate().map(|(i, c)| {
        let cell = Cell::new(c);
        if i == 0 { cell.fg(Color::Green) } else { cell }
    });
    table.add_row(row.collect::<Vec<_>>());
}

/// Print a table (JSON mode emits the given items instead).
pub fn table_print(table: &Table, items: JsonValue) {
    if is_json() {
        let data = serde_json::json!({ "items": items });
        emit_json("list", "", Some(&data));
    } else {
        println!("{table}");
    }
}

// ── Spinners ───────────────────────────────────────────────────────

/// Create a spinner for async operations. Hidden in JSON mode.
pub fn spinner(message: &str) -> ProgressBar {
    if is_json() {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Clear a spinner without leaving a line behind.
pub fn spinner_clear(spinner: &ProgressBar) {
    spinner.finish_and_clear();
}
