//! End-to-end checks on the `flexibot` binary. No network access is needed.

use std::path::Path;
use std::process::{Command, Output};

/// Run the binary in `dir` with a clean credential environment.
fn flexibot(dir: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_flexibot");
    Command::new(bin)
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env_remove("GROQ_API_KEY")
        .env_remove("GOOGLE_API_KEY")
        .env_remove("GROQ_BASE_URL")
        .env_remove("RUST_LOG")
        .env_remove("FLEXIBOT_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run flexibot")
}

#[test]
fn chat_without_groq_key_fails_before_greeting() {
    let dir = tempfile::tempdir().unwrap();
    let out = flexibot(dir.path(), &["chat"]);

    assert!(!out.status.success(), "chat should fail without GROQ_API_KEY");
    let stderr = String::from_utf8_lossy(&out.stderr);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stderr.contains("GROQ_API_KEY"), "stderr: {stderr}");
    assert!(!stdout.contains("Hi! I'm FlexiBot"), "stdout: {stdout}");
}

#[test]
fn ask_without_groq_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = flexibot(dir.path(), &["ask", "hello"]);

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("GROQ_API_KEY"));
}

#[test]
fn key_from_dotenv_in_parent_directory_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("project").join("src");
    std::fs::create_dir_all(&nested).unwrap();
    // Port 9 (discard) is closed, so the request fails upstream instead of at startup.
    std::fs::write(
        dir.path().join(".env"),
        "GROQ_API_KEY=gsk_test\nGROQ_BASE_URL=http://127.0.0.1:9/openai/v1\n",
    )
    .unwrap();

    let out = flexibot(&nested, &["ask", "hello"]);

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(!stderr.contains("GROQ_API_KEY is not set"), "stderr: {stderr}");
    assert!(stderr.contains("Upstream error"), "stderr: {stderr}");
}

#[test]
fn key_from_home_env_file_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join(".flexibot");
    std::fs::create_dir_all(&data_dir).unwrap();
    std::fs::write(
        data_dir.join("env"),
        "GROQ_API_KEY=gsk_test\nGROQ_BASE_URL=http://127.0.0.1:9/openai/v1\n",
    )
    .unwrap();

    let out = flexibot(dir.path(), &["ask", "hello"]);

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(!stderr.contains("GROQ_API_KEY is not set"), "stderr: {stderr}");
}

#[test]
fn blank_prompt_is_rejected_as_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".env"), "GROQ_API_KEY=gsk_test\n").unwrap();

    let out = flexibot(dir.path(), &["ask", "   "]);

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid input"));
}

#[test]
fn image_question_without_google_key_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".env"), "GROQ_API_KEY=gsk_test\n").unwrap();
    std::fs::write(dir.path().join("cat.png"), b"\x89PNG fake").unwrap();

    let out = flexibot(dir.path(), &["ask", "what is this?", "--image", "cat.png"]);

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("GOOGLE_API_KEY"));
}

#[test]
fn out_of_range_memory_length_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let out = flexibot(dir.path(), &["chat", "--memory-length", "11"]);

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("memory-length"));
}

#[test]
fn models_lists_chat_models_without_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let out = flexibot(dir.path(), &["models"]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    for model in ["llama3-8b-8192", "mixtral-8x7b-32768", "gemma-7b-it", "whisper-large-v3"] {
        assert!(stdout.contains(model), "missing {model} in: {stdout}");
    }
}

#[test]
fn models_json_output_is_machine_readable() {
    let dir = tempfile::tempdir().unwrap();
    let out = flexibot(dir.path(), &["models", "--output", "json"]);

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let list = stdout
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|v| v["level"] == "list")
        .expect("no list record");

    let items = list["data"]["items"].as_array().unwrap();
    let default_chat: Vec<_> = items
        .iter()
        .filter(|i| i["role"] == "chat" && i["default"] == true)
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(default_chat, vec!["llama3-8b-8192"]);
}
