//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use flexibot_constant::settings::{
    MEMORY_LENGTH_MAX, MEMORY_LENGTH_MIN, TYPING_DELAY_MS_MAX, TYPING_DELAY_MS_MIN,
};
use flexibot_core::{ChatModel, MemoryWindow, TypingDelay};
use flexibot_runtime::RuntimeConfig;

/// Terminal chatbot on Groq with windowed conversational memory
#[derive(Parser)]
#[command(name = "flexibot", about, version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format: text (human-readable) or json (machine-readable)
    #[arg(short, long, global = true, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal output for humans
    #[default]
    Text,
    /// Structured JSON for machine consumption
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start an interactive chat session
    Chat {
        #[command(flatten)]
        settings: SessionArgs,
    },
    /// Ask a single question, optionally about an image
    Ask {
        /// The question to send
        prompt: String,
        /// Image (jpg, jpeg, png) to ask the question about
        #[arg(long)]
        image: Option<PathBuf>,
        #[command(flatten)]
        settings: SessionArgs,
    },
    /// List the selectable models
    Models {
        /// Query Groq for the models it currently serves (needs GROQ_API_KEY)
        #[arg(long)]
        remote: bool,
    },
    /// Transcribe an audio file to text
    Transcribe {
        /// Audio file (wav, mp3, m4a, ...)
        audio: PathBuf,
        /// ISO-639-1 language hint
        #[arg(long)]
        language: Option<String>,
    },
}

/// Session settings shared by `chat` and `ask`. Unset flags fall back to
/// `FLEXIBOT_*` environment values, then defaults.
#[derive(Args, Clone, Debug, Default)]
pub struct SessionArgs {
    /// Chat model (llama3-8b-8192, mixtral-8x7b-32768, gemma-7b-it)
    #[arg(short, long, value_parser = parse_model)]
    pub model: Option<ChatModel>,

    /// Number of previous turns kept as context
    #[arg(
        short = 'k',
        long,
        value_parser = clap::value_parser!(u64)
            .range(MEMORY_LENGTH_MIN as u64..=MEMORY_LENGTH_MAX as u64)
    )]
    pub memory_length: Option<u64>,

    /// Milliseconds between rendered characters
    #[arg(
        long,
        value_parser = clap::value_parser!(u64).range(TYPING_DELAY_MS_MIN..=TYPING_DELAY_MS_MAX)
    )]
    pub typing_speed: Option<u64>,

    /// System prompt prepended to every request
    #[arg(short, long)]
    pub system_prompt: Option<String>,

    /// Render the reply as it streams in
    #[arg(long)]
    pub stream: bool,

    /// Show advisory feedback on each reply
    #[arg(long)]
    pub feedback: bool,
}

fn parse_model(s: &str) -> Result<ChatModel, String> {
    s.parse::<ChatModel>().map_err(|e| e.to_string())
}

impl SessionArgs {
    /// Overlay the flags onto a config loaded from the environment.
    pub fn apply(&self, mut config: RuntimeConfig) -> anyhow::Result<RuntimeConfig> {
        if let Some(model) = self.model {
            config = config.with_model(model);
        }
        if let Some(k) = self.memory_length {
            config = config.with_memory_window(MemoryWindow::new(k as usize)?);
        }
        if let Some(ms) = self.typing_speed {
            config = config.with_typing_delay(TypingDelay::from_millis(ms)?);
        }
        if let Some(prompt) = &self.system_prompt {
            config = config.with_system_prompt(prompt.clone());
        }
        Ok(config)
    }
}
