use crate::utils::error::{LawMateError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_FALLBACK_LOCALE: &str = "en-US";

const BUILTIN_TABLE: &str = include_str!("../../locales/lawmate.toml");

#[derive(Debug, Deserialize)]
struct LocaleFile {
    fallback_locale: Option<String>,
    #[serde(default)]
    locales: HashMap<String, HashMap<String, String>>,
}

/// locale → (key → 字串)，啟動時載入一次
#[derive(Debug, Clone)]
pub struct Translations {
    fallback_locale: String,
    locales: HashMap<String, HashMap<String, String>>,
}

impl Translations {
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_TABLE)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: LocaleFile = toml::from_str(content)
            .map_err(|e| LawMateError::config(format!("Translation table parsing error: {}", e)))?;

        let fallback_locale = file
            .fallback_locale
            .unwrap_or_else(|| DEFAULT_FALLBACK_LOCALE.to_string());
        if !file.locales.contains_key(&fallback_locale) {
            return Err(LawMateError::InvalidConfigValueError {
                field: "fallback_locale".to_string(),
                value: fallback_locale,
                reason: "Fallback locale has no translation table".to_string(),
            });
        }

        tracing::debug!("Loaded translations for {} locale(s)", file.locales.len());
        Ok(Self {
            fallback_locale,
            locales: file.locales,
        })
    }

    pub fn with_fallback(mut self, locale: impl Into<String>) -> Result<Self> {
        let locale = locale.into();
        if !self.locales.contains_key(&locale) {
            return Err(LawMateError::InvalidConfigValueError {
                field: "i18n.fallback_locale".to_string(),
                value: locale,
                reason: "Fallback locale has no translation table".to_string(),
            });
        }
        self.fallback_locale = locale;
        Ok(self)
    }

    pub fn fallback_locale(&self) -> &str {
        &self.fallback_locale
    }

    pub fn supports(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }

    /// 查詢順序：指定 locale → fallback locale → key 本身
    pub fn translate<'a>(&'a self, locale: &str, key: &'a str) -> &'a str {
        [locale, self.fallback_locale.as_str()]
            .iter()
            .find_map(|l| self.locales.get(*l).and_then(|table| table.get(key)))
            .map(String::as_str)
            .unwrap_or(key)
    }
}
