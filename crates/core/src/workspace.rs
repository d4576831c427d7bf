use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use billed_types::config::AppConfig;
use billed_types::session::UserSession;
use tracing::info;

/// Dotfolder name under `$HOME`.
const DOTFOLDER: &str = ".billed";

/// Overrides the dotfolder location.
const HOME_ENV: &str = "BILLED_HOME";

const CONFIG_FILE: &str = "config.toml";
const SESSION_FILE: &str = "session.json";

/// Resolve the root path: `$BILLED_HOME`, or `$HOME/.billed/`.
pub fn root_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DOTFOLDER))
}

/// Ensure the dotfolder exists and holds a config file. Idempotent.
///
/// ```text
/// $HOME/.billed/
/// ├── config.toml
/// └── session.json  (written by `billed session set`)
/// ```
pub fn init_workspace() -> Result<()> {
    init_workspace_at(&root_dir()?)
}

fn init_workspace_at(root: &Path) -> Result<()> {
    if !root.exists() {
        fs::create_dir_all(root)
            .with_context(|| format!("Failed to create directory: {}", root.display()))?;
        info!("created directory: {}", root.display());
    }

    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        write_config(&config_path, &AppConfig::default())?;
        info!("created default config: {}", config_path.display());
    }
    Ok(())
}

/// Load the config from disk. If the config is outdated (missing fields),
/// regenerate with defaults while preserving `api.base_url`.
pub fn load_config() -> Result<AppConfig> {
    load_config_at(&root_dir()?)
}

fn load_config_at(root: &Path) -> Result<AppConfig> {
    let config_path = root.join(CONFIG_FILE);
    let raw = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    match AppConfig::from_toml_str(&raw) {
        Ok(config) => Ok(config),
        Err(_) => {
            info!("config.toml outdated, migrating to new schema");
            let mut new_config = AppConfig::default();

            if let Ok(old) = raw.parse::<toml::Table>() {
                if let Some(url) = old
                    .get("api")
                    .and_then(|v| v.as_table())
                    .and_then(|api| api.get("base_url"))
                    .and_then(|v| v.as_str())
                {
                    new_config.api.base_url = url.to_string();
                }
            }

            write_config(&config_path, &new_config)?;
            info!("config migrated successfully");
            Ok(new_config)
        }
    }
}

/// Write the config back to disk.
pub fn save_config(config: &AppConfig) -> Result<()> {
    write_config(&root_dir()?.join(CONFIG_FILE), config)
}

fn write_config(path: &Path, config: &AppConfig) -> Result<()> {
    let toml_str = config
        .to_toml_string()
        .context("Failed to serialize config")?;
    fs::write(path, &toml_str).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Read the stored user record. `None` when nobody is connected.
pub fn load_session() -> Result<Option<UserSession>> {
    load_session_at(&root_dir()?)
}

fn load_session_at(root: &Path) -> Result<Option<UserSession>> {
    let path = root.join(SESSION_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let session = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid session record in {}", path.display()))?;
    Ok(Some(session))
}

pub fn save_session(session: &UserSession) -> Result<()> {
    save_session_at(&root_dir()?, session)
}

fn save_session_at(root: &Path, session: &UserSession) -> Result<()> {
    let path = root.join(SESSION_FILE);
    let json = serde_json::to_string_pretty(session).context("Failed to serialize session")?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Forget the stored user record. Returns true if one was removed.
pub fn clear_session() -> Result<bool> {
    clear_session_at(&root_dir()?)
}

fn clear_session_at(root: &Path) -> Result<bool> {
    let path = root.join(SESSION_FILE);
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))?;
    Ok(true)
}
