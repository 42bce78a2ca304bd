//! CLI entry point for FlexiBot.

mod cli;
mod commands;
mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use flexibot_constant::app;
use flexibot_observability::ObservabilityConfig;

use crate::cli::Cli;

const VERBOSE_FILTER: &str =
    "warn,flexibot=debug,flexibot_runtime=debug,flexibot_llms=debug,flexibot_core=debug";

/// Nearest `.env` in `start` or one of its ancestors.
fn find_dotenv(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .take(32)
        .map(|dir| dir.join(".env"))
        .find(|candidate| candidate.is_file())
}

/// Load env files. dotenvy never overrides a variable that is already set, so
/// precedence is: process env, then the nearest project `.env`, then
/// `~/.flexibot/env`.
fn load_flexibot_config() {
    if let Some(env_file) = std::env::current_dir().ok().as_deref().and_then(find_dotenv) {
        let _ = dotenvy::from_path(&env_file);
    }
    if let Some(home) = dirs::home_dir() {
        let config_path = home.join(app::DATA_DIR).join(app::ENV_FILE);
        if config_path.is_file() {
            let _ = dotenvy::from_path(&config_path);
        }
    }
}

fn init_logging(verbose: bool) {
    let mut config = ObservabilityConfig::from_env()
        .with_version(app::VERSION)
        .with_resource_attribute("app.name", app::NAME);
    if verbose {
        config = config.with_log_level(VERBOSE_FILTER);
    }

    if let Err(e) = flexibot_observability::init(config) {
        output::warning(&format!("Logging disabled: {e}"));
    }
}

#[tokio::main]
async fn main() {
    load_flexibot_config();
    let cli = Cli::parse();
    output::init(cli.output);
    init_logging(cli.verbose);

    let result = commands::handle(cli).await;
    flexibot_observability::shutdown();

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_dotenv_walks_up() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join(".env"), "GROQ_API_KEY=x\n").unwrap();

        assert_eq!(find_dotenv(&nested), Some(root.path().join(".env")));
    }

    #[test]
    fn test_find_dotenv_prefers_nearest() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("project");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join(".env"), "A=1\n").unwrap();
        std::fs::write(nested.join(".env"), "A=2\n").unwrap();

        assert_eq!(find_dotenv(&nested), Some(nested.join(".env")));
    }
}
