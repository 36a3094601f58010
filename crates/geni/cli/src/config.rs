//! Configuration file loading.

use std::path::{Path, PathBuf};

use anyhow::Context;
use geni_kernel::GeniConfig;
use geni_types::TaskSpec;

/// Environment variables consulted for the API key, in order.
pub const API_KEY_VARS: &[&str] = &["GENI_API_KEY", "OPENAI_API_KEY", "ANTHROPIC_API_KEY"];

/// Load configuration from `path`, or from the default location.
///
/// A missing file yields the defaults.
pub fn load(path: Option<&Path>) -> anyhow::Result<GeniConfig> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok(GeniConfig::default()),
        },
    };

    if !config_path.exists() {
        return Ok(GeniConfig::default());
    }
    let contents = std::fs::read_to_string(&config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;
    toml::from_str(&contents).with_context(|| format!("parsing {}", config_path.display()))
}

/// `<config dir>/geni/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("geni").join("config.toml"))
}

/// Fill in the API key from the environment when the file has none.
pub fn apply_api_key(config: &mut GeniConfig, lookup: impl Fn(&str) -> Option<String>) {
    if config.llm.api_key.is_some() {
        return;
    }
    config.llm.api_key = API_KEY_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|key| !key.trim().is_empty());
}

/// Read a task from JSON, or TOML when the file ends in `.toml`.
pub fn load_task(path: &Path) -> anyhow::Result<TaskSpec> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading task {}", path.display()))?;
    let task = if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str(&contents).with_context(|| format!("parsing task {}", path.display()))?
    } else {
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing task {}", path.display()))?
    };
    Ok(task)
}
