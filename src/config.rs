use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Shipped defaults, also used to seed the user's config file.
pub const DEFAULT_CONFIG: &str = include_str!("../storyforge.toml");

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub gemini_model: String,
    pub gemini_api_key: Option<String>,
    pub api_base_url: String,
    pub prompt_for_api_key: bool,
    pub custom_prompt_path: Option<String>,
    pub log_dir: String,
    pub advance_delay_ms: u64,
    pub show_scene: bool,
}

impl Settings {
    /// Layers, lowest priority first: shipped defaults, the user's global
    /// config, `./storyforge.toml`, an explicit `--config` file, then
    /// `STORYFORGE_*` environment variables.
    pub fn load(extra: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Ok(user_config_path) = get_user_config_path() {
            builder = builder.add_source(File::from(user_config_path).required(false));
        }

        builder = builder.add_source(File::with_name("storyforge.toml").required(false));

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(Environment::with_prefix("STORYFORGE").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    #[cfg(test)]
    pub fn defaults() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// The configured key wins over `GEMINI_API_KEY`. Blank values count as unset.
    pub fn api_key(&self) -> Option<String> {
        resolve_api_key(
            self.gemini_api_key.as_deref(),
            std::env::var("GEMINI_API_KEY").ok().as_deref(),
        )
    }

    pub fn log_dir(&self) -> PathBuf {
        expand(&self.log_dir)
    }

    pub fn custom_prompt_path(&self) -> Option<PathBuf> {
        self.custom_prompt_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(expand)
    }
}

fn resolve_api_key(configured: Option<&str>, from_env: Option<&str>) -> Option<String> {
    configured
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .or_else(|| from_env.map(str::trim).filter(|k| !k.is_empty()))
        .map(str::to_string)
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

pub fn get_user_config_path() -> anyhow::Result<PathBuf> {
    let mut path = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("could not determine home directory"))?;
    path.push(".config");
    path.push("storyforge");
    path.push("storyforge.toml");
    Ok(path)
}

/// Writes the shipped defaults to the user's config path if nothing is there yet.
pub fn ensure_user_config() -> anyhow::Result<PathBuf> {
    let path = get_user_config_path()?;
    seed_config(&path)?;
    Ok(path)
}

fn seed_config(path: &Path) -> anyhow::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_CONFIG)?;
    Ok(true)
}

pub fn save_api_key(api_key: &str) -> Result<(), anyhow::Error> {
    update_user_config(&get_user_config_path()?, "gemini_api_key", toml::Value::String(api_key.to_string()))
}

pub fn disable_api_key_prompt() -> Result<(), anyhow::Error> {
    update_user_config(&get_user_config_path()?, "prompt_for_api_key", toml::Value::Boolean(false))
}

fn update_user_config(path: &Path, key: &str, value: toml::Value) -> Result<(), anyhow::Error> {
    let config_str = fs::read_to_string(path).unwrap_or_default();
    let mut doc = config_str.parse::<toml::Table>()?;

    doc.insert(key.to_string(), value);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, doc.to_string())?;

    Ok(())
}
