//! `flexibot ask`: one question, optionally about an image.

use std::path::PathBuf;

use anyhow::Result;
use flexibot_runtime::ImageInput;

use super::Chat;

pub async fn handle(mut chat: Chat, prompt: String, image: Option<PathBuf>) -> Result<()> {
    match image {
        Some(path) => {
            let image = ImageInput::from_path(&path).await?;
            chat.describe(&prompt, &image).await
        }
        None => chat.respond(&prompt).await,
    }
}
