//! Runtime configuration from environment variables.
//!
//! Env:
//! - GSLT_APIKEY_FILE: path of the API key file (default: APIKEY)
//! - GSLT_BASE_URL: IGameServersService base URL (default: the public Steam endpoint)
//!
//! A `.env` file is honoured when the binary loads it with `dotenvy` first.

use std::path::PathBuf;

use crate::client::DEFAULT_BASE_URL;
use crate::credential::DEFAULT_APIKEY_FILE;

pub const APIKEY_FILE_VAR: &str = "GSLT_APIKEY_FILE";
pub const BASE_URL_VAR: &str = "GSLT_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub apikey_file: PathBuf,
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            apikey_file: PathBuf::from(DEFAULT_APIKEY_FILE),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            apikey_file: get(APIKEY_FILE_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.apikey_file),
            base_url: get(BASE_URL_VAR).unwrap_or(defaults.base_url),
        }
    }

    /// False when the API key would go somewhere other than Steam.
    pub fn uses_default_base_url(&self) -> bool {
        self.base_url.trim_end_matches('/') == DEFAULT_BASE_URL.trim_end_matches('/')
    }
}
