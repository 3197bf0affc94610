use crate::adapters::registry::DEFAULT_TABLE;
use crate::core::i18n::DEFAULT_FALLBACK_LOCALE;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{LawMateError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_required_field, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    pub i18n: Option<I18nConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub url: Option<String>,
    pub access_key: Option<String>,
    pub table: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
    pub default_locale: Option<String>,
    pub fallback_locale: Option<String>,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LawMateError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| LawMateError::config(format!("TOML parsing error: {}", e)))
    }

    /// 從環境變數載入（LAWMATE_API_URL 等）
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            backend: BackendConfig {
                base_url: var("LAWMATE_API_URL"),
                timeout_seconds: var("LAWMATE_TIMEOUT_SECONDS").and_then(|v| v.parse().ok()),
            },
            registry: RegistryConfig {
                url: var("LAWMATE_REGISTRY_URL"),
                access_key: var("LAWMATE_REGISTRY_KEY"),
                table: var("LAWMATE_REGISTRY_TABLE"),
            },
            i18n: None,
            logging: None,
        }
    }

    /// 替換環境變數 (例如 ${LAWMATE_API_URL})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| LawMateError::config(format!("Invalid placeholder pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn default_locale(&self) -> &str {
        self.i18n
            .as_ref()
            .and_then(|i| i.default_locale.as_deref())
            .unwrap_or(DEFAULT_FALLBACK_LOCALE)
    }

    pub fn fallback_locale(&self) -> &str {
        self.i18n
            .as_ref()
            .and_then(|i| i.fallback_locale.as_deref())
            .unwrap_or(DEFAULT_FALLBACK_LOCALE)
    }

    pub fn translations_file(&self) -> Option<&str> {
        self.i18n.as_ref().and_then(|i| i.file.as_deref())
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for AppConfig {
    fn backend_url(&self) -> Option<&str> {
        self.backend.base_url.as_deref()
    }

    fn registry_url(&self) -> Option<&str> {
        self.registry.url.as_deref()
    }

    fn registry_key(&self) -> Option<&str> {
        self.registry.access_key.as_deref()
    }

    fn registry_table(&self) -> &str {
        self.registry.table.as_deref().unwrap_or(DEFAULT_TABLE)
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.backend.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for AppConfig {
    /// 缺少任何必要設定都是致命錯誤
    fn validate(&self) -> Result<()> {
        let base_url = validate_required_field("backend.base_url", &self.backend.base_url)?;
        validate_url("backend.base_url", base_url)?;

        let registry_url = validate_required_field("registry.url", &self.registry.url)?;
        validate_url("registry.url", registry_url)?;

        let key = validate_required_field("registry.access_key", &self.registry.access_key)?;
        validate_non_empty_string("registry.access_key", key)?;

        if let Some(timeout) = self.backend.timeout_seconds {
            validate_range("backend.timeout_seconds", timeout, 1, 300)?;
        }

        Ok(())
    }
}
