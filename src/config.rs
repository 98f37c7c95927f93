// src/config.rs
use crate::text::{BlockFormat, LangMode};
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Параметры шифрования по умолчанию
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CipherConfig {
    /// Режим языка сообщений: "c" (кириллица) или "l" (латиница)
    #[serde(default)]
    pub lang: LangMode,

    /// Формат вывода шифртекста: "bin" или "hex"
    #[serde(default)]
    pub format: BlockFormat,

    /// Путь к файлу ключа (hex), используется если ключ не задан явно
    #[serde(default)]
    pub key_path: Option<PathBuf>,
}

/// Настройки интерактивного режима
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractiveConfig {
    /// Спрашивать режим языка на каждой итерации
    #[serde(default = "default_prompt_lang")]
    pub prompt_lang: bool,

    /// Печатать битовое представление открытого текста перед шифрованием
    #[serde(default = "default_echo_cleartext")]
    pub echo_cleartext: bool,
}

fn default_prompt_lang() -> bool {
    true
}
fn default_echo_cleartext() -> bool {
    true
}

/// Основная конфигурация
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub cipher: CipherConfig,

    #[serde(default)]
    pub interactive: InteractiveConfig,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            lang: LangMode::default(),
            format: BlockFormat::default(),
            key_path: None,
        }
    }
}

impl Default for InteractiveConfig {
    fn default() -> Self {
        Self {
            prompt_lang: default_prompt_lang(),
            echo_cleartext: default_echo_cleartext(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found")]
    NotFound,
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Config {
    /// Загружает конфигурацию из стандартных путей или указанного файла
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound);
            }
        }

        for path in get_config_paths(config_path) {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_file(&path);
            }
        }

        Err(ConfigError::NotFound)
    }

    /// Как `load`, но отсутствие файла в стандартных путях не ошибка
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match Self::load(config_path) {
            Err(ConfigError::NotFound) if config_path.is_none() => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Загружает конфигурацию из конкретного файла
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Валидирует конфигурацию
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(key_path) = &self.cipher.key_path {
            if key_path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("key_path must not be empty".to_string()));
            }
        }

        Ok(())
    }

    /// Сохраняет конфигурацию в файл
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    /// Сводка конфигурации для вывода
    pub fn info(&self) -> HashMap<String, String> {
        let mut info = HashMap::new();

        info.insert("lang".to_string(), self.cipher.lang.to_string());
        info.insert("format".to_string(), format!("{:?}", self.cipher.format).to_lowercase());
        info.insert(
            "key_path".to_string(),
            self.cipher
                .key_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
        info.insert("prompt_lang".to_string(), self.interactive.prompt_lang.to_string());
        info.insert("echo_cleartext".to_string(), self.interactive.echo_cleartext.to_string());

        info
    }
}

/// Возвращает список путей для поиска конфигурации
fn get_config_paths(custom_path: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. Пользовательский путь (если указан)
    if let Some(path) = custom_path {
        paths.push(path.to_path_buf());
        return paths;
    }

    // 2. /etc/gost89/config.toml
    paths.push(PathBuf::from("/etc/gost89/config.toml"));

    // 3. ~/.config/gost89/config.toml
    if let Some(home) = dirs::config_dir() {
        paths.push(home.join("gost89/config.toml"));
    }

    // 4. Текущая директория
    paths.push(PathBuf::from("config.toml"));

    paths
}

/// Путь к конфигурации по умолчанию
pub fn default_config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("gost89/config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

/// Создает конфигурационный файл со значениями по умолчанию
pub fn init_config(output_path: Option<&Path>, force: bool) -> Result<PathBuf> {
    let config = Config::default();
    let save_path = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);

    if save_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists: {} (use --force to overwrite)",
            save_path.display()
        );
    }

    println!("Creating configuration file at: {}", save_path.display());
    println!("  Language mode: {}", config.cipher.lang);
    println!("  Output format: {:?}", config.cipher.format);
    println!("  Prompt language: {}", config.interactive.prompt_lang);
    println!("  Echo cleartext: {}", config.interactive.echo_cleartext);

    config
        .save(&save_path)
        .context("Failed to save configuration")?;

    println!("Configuration saved successfully!");
    Ok(save_path)
}
