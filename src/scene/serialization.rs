use crate::scene::ViewerConfig;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, SerializationError>;

pub fn save_config_to_file(config: &ViewerConfig, path: &Path) -> Result<()> {
    validate(config)?;
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_config_from_file(path: &Path) -> Result<ViewerConfig> {
    let config: ViewerConfig = read_json(path)?;
    validate(&config)?;
    log::info!(
        "Loaded viewer config from {} ({} meshes)",
        path.display(),
        config.meshes.len()
    );
    Ok(config)
}

pub fn validate(config: &ViewerConfig) -> Result<()> {
    if config.meshes.is_empty() {
        return Err(SerializationError::Invalid(
            "mesh catalog is empty".to_string(),
        ));
    }

    let mut names = HashSet::new();
    for entry in &config.meshes {
        if !names.insert(entry.name.as_str()) {
            return Err(SerializationError::Invalid(format!(
                "duplicate mesh name '{}'",
                entry.name
            )));
        }
        if let Some(offset) = entry.offset {
            if !offset.is_finite() {
                return Err(SerializationError::Invalid(format!(
                    "mesh '{}' has a non-finite offset",
                    entry.name
                )));
            }
        }
    }
    Ok(())
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
