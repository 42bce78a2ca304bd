//! Command dispatch.

pub mod ask;
pub mod chat;
pub mod models;
pub mod transcribe;

use std::time::Duration;

use anyhow::Result;
use flexibot_core::Session;
use flexibot_runtime::{ChatRuntime, Credentials, ImageInput, RuntimeConfig, evaluate};
use tokio::sync::mpsc;
use tracing::debug;

use crate::cli::{Cli, Command, SessionArgs};
use crate::output;

pub const RESPONSE_TITLE: &str = "FlexiBot Response:";
pub const VISION_TITLE: &str = "FlexiBot Vision:";

pub async fn handle(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Models { remote } => models::handle(remote).await,
        Command::Chat { settings } => chat::handle(Chat::connect(settings)?).await,
        Command::Ask {
            prompt,
            image,
            settings,
        } => ask::handle(Chat::connect(settings)?, prompt, image).await,
        Command::Transcribe { audio, language } => transcribe::handle(audio, language).await,
    }
}

/// Resolved settings plus a fresh session, shared by `chat` and `ask`.
pub struct Chat {
    pub runtime: ChatRuntime,
    pub session: Session,
    pub stream: bool,
    pub feedback: bool,
}

impl Chat {
    /// Fails before anything is printed when `GROQ_API_KEY` is missing.
    pub fn connect(settings: SessionArgs) -> Result<Self> {
        let credentials = Credentials::from_env()?;
        let config = settings.apply(RuntimeConfig::from_env())?;
        let runtime = ChatRuntime::from_config(&config, &credentials)?;
        debug!(
            model = %config.model,
            memory_length = config.memory_window.get(),
            vision = runtime.has_vision(),
            "Chat session ready"
        );

        Ok(Self {
            runtime,
            session: Session::new(config.session_config()),
            stream: settings.stream,
            feedback: settings.feedback,
        })
    }

    fn delay(&self) -> Duration {
        self.session.config.typing_delay.as_duration()
    }

    /// Send `input`, render the reply and, if enabled, its feedback.
    pub async fn respond(&mut self, input: &str) -> Result<()> {
        let delay = self.delay();

        if self.stream {
            let (tx, rx) = mpsc::unbounded_channel();
            let (result, _) = tokio::join!(
                self.runtime.send_streaming(&mut self.session, input, tx),
                output::typewrite_stream(RESPONSE_TITLE.to_string(), rx, delay),
            );
            let reply = result?;
            if output::is_json() {
                output::reply(RESPONSE_TITLE, &reply, delay).await;
            }
            self.show_feedback(input, &reply);
        } else {
            let spinner = output::spinner("Thinking...");
            let result = self.runtime.send(&mut self.session, input).await;
            output::spinner_clear(&spinner);
            let reply = result?;
            output::reply(RESPONSE_TITLE, &reply, delay).await;
            self.show_feedback(input, &reply);
        }
        Ok(())
    }

    /// Ask about an image. The answer is shown but not remembered.
    pub async fn describe(&mut self, question: &str, image: &ImageInput) -> Result<()> {
        let spinner = output::spinner("Looking at the image...");
        let result = self
            .runtime
            .analyze_image(&mut self.session, question, image)
            .await;
        output::spinner_clear(&spinner);
        let answer = result?;
        output::reply(VISION_TITLE, &answer, self.delay()).await;
        Ok(())
    }

    fn show_feedback(&self, input: &str, reply: &str) {
        if self.feedback {
            output::feedback(&evaluate(input, reply));
        }
    }
}
