use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::db::DB_FILE;
use crate::error::{AppError, Result};

/// Which `/forecast` a deployment answers with. Exactly one per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMode {
    /// Language-model narrative.
    Ai,
    /// Average expense times thirty.
    Average,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_llm_base_url")]
    pub llm_base_url: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_forecast_mode")]
    pub forecast_mode: ForecastMode,
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_currency() -> String {
    "₸".to_string()
}

fn default_forecast_mode() -> ForecastMode {
    ForecastMode::Ai
}

fn default_poll_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            model: default_model(),
            llm_base_url: default_llm_base_url(),
            currency: default_currency(),
            forecast_mode: default_forecast_mode(),
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }
}

impl Settings {
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(DB_FILE)
    }

    pub fn backups_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("backups")
    }

    /// Timestamped default target for `spendbot backup`.
    pub fn backup_path(&self, at: chrono::DateTime<chrono::Local>) -> PathBuf {
        self.backups_dir()
            .join(format!("expenses-{}.db", at.format("%Y%m%d-%H%M%S")))
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("spendbot")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("spendbot")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| AppError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

// ---------------------------------------------------------------------------
// Secrets
// ---------------------------------------------------------------------------

pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Credentials needed to run the bot. Never written to settings.json.
#[derive(Clone)]
pub struct Secrets {
    pub telegram_token: String,
    pub openai_api_key: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("telegram_token", &"***")
            .field("openai_api_key", &"***")
            .finish()
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(AppError::MissingSecret(name))
}

pub fn secrets_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Secrets> {
    Ok(Secrets {
        telegram_token: required(&lookup, TELEGRAM_TOKEN)?,
        openai_api_key: required(&lookup, OPENAI_API_KEY)?,
    })
}

/// Read both secrets from the process environment. Call after `.env` has
/// been loaded.
pub fn load_secrets() -> Result<Secrets> {
    secrets_from(|name| std::env::var(name).ok())
}

/// Only the language-model key, for CLI commands that never talk to Telegram.
pub fn load_openai_key() -> Result<String> {
    required(&|name: &str| std::env::var(name).ok(), OPENAI_API_KEY)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            data_dir: "/tmp/test".to_string(),
            currency: "$".to_string(),
            forecast_mode: ForecastMode::Average,
            ..Settings::default()
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: Settings = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.data_dir, "/tmp/test");
        assert_eq!(loaded.currency, "$");
        assert_eq!(loaded.forecast_mode, ForecastMode::Average);
    }

    #[test]
    fn test_backup_path_is_timestamped_under_data_dir() {
        use chrono::TimeZone;

        let settings = Settings {
            data_dir: "/srv/spendbot".to_string(),
            ..Settings::default()
        };
        let at = chrono::Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            settings.backup_path(at),
            PathBuf::from("/srv/spendbot/backups/expenses-20240309-070501.db")
        );
        assert_eq!(settings.db_path(), PathBuf::from("/srv/spendbot/expenses.db"));
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.model, "gpt-4o-mini");
        assert_eq!(s.currency, "₸");
        assert_eq!(s.forecast_mode, ForecastMode::Ai);
        assert_eq!(s.poll_timeout_secs, 30);
        assert!(s.db_path().ends_with("expenses.db"));
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"data_dir": "/tmp/test", "forecast_mode": "average"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.forecast_mode, ForecastMode::Average);
        assert_eq!(s.model, "gpt-4o-mini");
        assert_eq!(s.llm_base_url, "https://api.openai.com");
    }

    #[test]
    fn test_unknown_forecast_mode_is_rejected() {
        let json = r#"{"data_dir": "/tmp/test", "forecast_mode": "crystal-ball"}"#;
        assert!(serde_json::from_str::<Settings>(json).is_err());
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_secrets_present() {
        let s = secrets_from(env(&[(TELEGRAM_TOKEN, "123:abc"), (OPENAI_API_KEY, " sk-1 ")])).unwrap();
        assert_eq!(s.telegram_token, "123:abc");
        assert_eq!(s.openai_api_key, "sk-1");
        assert!(!format!("{s:?}").contains("sk-1"));
    }

    #[test]
    fn test_missing_telegram_token_is_fatal() {
        let err = secrets_from(env(&[(OPENAI_API_KEY, "sk-1")])).unwrap_err();
        assert!(matches!(err, AppError::MissingSecret(TELEGRAM_TOKEN)));
    }

    #[test]
    fn test_blank_openai_key_is_fatal() {
        let err = secrets_from(env(&[(TELEGRAM_TOKEN, "t"), (OPENAI_API_KEY, "  ")])).unwrap_err();
        assert!(matches!(err, AppError::MissingSecret(OPENAI_API_KEY)));
        assert!(err.to_string().contains("OPENAI_API_KEY is not set"));
    }
}
