use std::{env, str::FromStr};
use thiserror::Error;

pub const API_URL_VAR: &str = "IN_ORBIT_API_URL";
pub const LOCALE_VAR: &str = "IN_ORBIT_LOCALE";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set to the goals API base url")]
    MissingApiUrl(&'static str),

    #[error("unsupported locale '{0}', expected 'en' or 'pt-BR'")]
    UnknownLocale(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    PtBr,
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            "pt" | "pt-br" | "pt_br" => Ok(Self::PtBr),
            other => Err(ConfigError::UnknownLocale(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub port: u16,
    pub locale: Locale,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = env::var(API_URL_VAR).ok();
        let port = env::var("PORT").ok();
        let locale = env::var(LOCALE_VAR).ok();
        Self::resolve(api_url.as_deref(), port.as_deref(), locale.as_deref())
    }

    fn resolve(
        api_url: Option<&str>,
        port: Option<&str>,
        locale: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let api_url = api_url
            .map(|value| value.trim().trim_end_matches('/'))
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingApiUrl(API_URL_VAR))?
            .to_string();

        let port = port
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let locale = match locale {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => Locale::default(),
        };

        Ok(Self {
            api_url,
            port,
            locale,
        })
    }
}
