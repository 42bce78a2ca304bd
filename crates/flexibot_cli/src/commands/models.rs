//! `flexibot models`: the selectable chat models and the auxiliary defaults.

use anyhow::Result;
use flexibot_core::ChatModel;
use flexibot_llms::{GroqProvider, Provider};
use flexibot_runtime::{Credentials, RuntimeConfig};

use crate::output;

struct ModelInfo {
    id: String,
    role: &'static str,
    provider: &'static str,
    default: bool,
}

fn known_models(config: &RuntimeConfig) -> Vec<ModelInfo> {
    let mut models: Vec<ModelInfo> = ChatModel::ALL
        .iter()
        .map(|model| ModelInfo {
            id: model.as_str().to_string(),
            role: "chat",
            provider: "groq",
            default: *model == ChatModel::default(),
        })
        .collect();

    models.push(ModelInfo {
        id: config.vision_model.clone(),
        role: "vision",
        provider: "gemini",
        default: true,
    });
    models.push(ModelInfo {
        id: config.transcription_model.clone(),
        role: "transcription",
        provider: "groq",
        default: true,
    });
    models
}

pub async fn handle(remote: bool) -> Result<()> {
    if remote {
        return list_remote().await;
    }

    let config = RuntimeConfig::from_env();
    let models = known_models(&config);

    let mut table = output::table();
    output::table_header(&mut table, &["Model", "Role", "Provider", "Default"]);
    for m in &models {
        output::table_row(
            &mut table,
            &[m.id.as_str(), m.role, m.provider, if m.default { "yes" } else { "" }],
        );
    }

    let items = models
        .iter()
        .map(|m| {
            serde_json::json!({
                "name": m.id,
                "role": m.role,
                "provider": m.provider,
                "default": m.default,
            })
        })
        .collect();
    output::table_print(&table, serde_json::Value::Array(items));

    if std::env::var(Credentials::GOOGLE_API_KEY_ENV).is_err() {
        output::dim("Set GOOGLE_API_KEY to enable image questions.");
    }
    Ok(())
}

async fn list_remote() -> Result<()> {
    Credentials::from_env()?;
    let provider = GroqProvider::from_env()?;

    let spinner = output::spinner("Fetching models from Groq...");
    let result = provider.list_models().await;
    output::spinner_clear(&spinner);
    let mut ids = result?;
    ids.sort();

    let mut table = output::table();
    output::table_header(&mut table, &["Model", "Selectable"]);
    for id in &ids {
        let selectable = ChatModel::IDS.contains(&id.as_str());
        output::table_row(&mut table, &[id.as_str(), if selectable { "yes" } else { "" }]);
    }

    let items = ids
        .iter()
        .map(|id| serde_json::json!({ "name": id, "selectable": ChatModel::IDS.contains(&id.as_str()) }))
        .collect();
    output::table_print(&table, serde_json::Value::Array(items));
    Ok(())
}
