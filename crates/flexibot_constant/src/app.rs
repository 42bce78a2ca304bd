//! Application metadata constants

pub const NAME: &str = "flexibot";
pub const DISPLAY_NAME: &str = "FlexiBot";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = "Terminal chatbot with windowed conversational memory, vision and speech";

/// Banner printed when an interactive chat starts.
pub const GREETING: &str = "Hi! I'm FlexiBot, your responsive and friendly chatbot. I can help with questions, \
provide information, or just chat for fun. Additionally, I can analyze images as well. Let's begin!";

/// Directory name for FlexiBot data within the home directory
pub const DATA_DIR: &str = ".flexibot";
/// Env file inside DATA_DIR
pub const ENV_FILE: &str = "env";
