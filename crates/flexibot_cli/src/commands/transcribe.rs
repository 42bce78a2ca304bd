//! `flexibot transcribe`: speech-to-text for an audio file.

use std::path::PathBuf;

use anyhow::Result;
use flexibot_runtime::{AudioInput, ChatRuntime, Credentials, RuntimeConfig};

use crate::output;

pub const TRANSCRIPT_TITLE: &str = "Transcript:";

pub async fn handle(audio: PathBuf, language: Option<String>) -> Result<()> {
    let credentials = Credentials::from_env()?;
    let mut config = RuntimeConfig::from_env();
    if let Some(language) = language {
        config = config.with_transcription_language(language);
    }
    let runtime = ChatRuntime::from_config(&config, &credentials)?;

    let clip = AudioInput::from_path(&audio).await?;
    let spinner = output::spinner(&format!("Transcribing {}...", clip.file_name()));
    let result = runtime.transcribe(&clip).await;
    output::spinner_clear(&spinner);

    let text = result?;
    output::reply(TRANSCRIPT_TITLE, &text, config.typing_delay.as_duration()).await;
    Ok(())
}
