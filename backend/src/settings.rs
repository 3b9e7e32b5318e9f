//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `RECIPE_*` environment variables and config
//! files, in increasing order of precedence for the later sources as
//! OrthoConfig defines. Connection and path settings are optional; the
//! numeric tuning values carry attribute defaults so an empty source set loads.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{DEFAULT_PASSWORD_MIN_LENGTH, PasswordPolicy};
use crate::outbound::security::DEFAULT_BCRYPT_COST;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MEDIA_ROOT: &str = "media";

/// Invalid settings detected after loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
    #[error("password minimum length must be at least 1")]
    InvalidPasswordMinLength,
}

/// Runtime configuration for the server and admin binaries.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECIPE")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; without it the server keeps data in memory.
    pub database_url: Option<String>,
    /// Directory uploaded images are written under.
    pub media_root: Option<PathBuf>,
    /// Minimum length for passwords chosen through the API.
    #[ortho_config(default = 5)]
    pub password_min_length: usize,
    /// bcrypt work factor.
    #[ortho_config(default = 12)]
    pub bcrypt_cost: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bind_addr: None,
            database_url: None,
            media_root: None,
            password_min_length: DEFAULT_PASSWORD_MIN_LENGTH,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| {
            SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            }
        })
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn media_root(&self) -> PathBuf {
        self.media_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT))
    }

    pub fn password_policy(&self) -> Result<PasswordPolicy, SettingsError> {
        match self.password_min_length {
            0 => Err(SettingsError::InvalidPasswordMinLength),
            length => Ok(PasswordPolicy::new(length)),
        }
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }
}
