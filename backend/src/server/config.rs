//! Server settings loaded via OrthoConfig, plus the assembled server config.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;

use hacktrack::outbound::chat::DEFAULT_CHAT_MODEL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ADMIN_NAME: &str = "HackTrack Admin";

/// Deployment settings read from `HACKTRACK_*` variables, config files and
/// command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HACKTRACK")]
pub struct HackTrackSettings {
    /// Listen address.
    #[ortho_config(default = DEFAULT_BIND_ADDR.to_owned())]
    pub bind_addr: String,
    /// PostgreSQL URL. Without one the server keeps state in memory.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    #[ortho_config(default = DEFAULT_POOL_SIZE)]
    pub db_pool_size: u32,
    /// OpenAI-compatible chat completions endpoint.
    pub chat_api_url: Option<String>,
    /// Bearer token for the chat gateway.
    pub chat_api_key: Option<String>,
    /// Model requested from the chat gateway.
    pub chat_model: Option<String>,
    /// Chat gateway request timeout in seconds.
    #[ortho_config(default = DEFAULT_CHAT_TIMEOUT_SECS)]
    pub chat_timeout_secs: u64,
    /// Email of the admin account ensured at startup.
    pub admin_email: Option<String>,
    /// Initial password for the bootstrap admin.
    pub admin_password: Option<String>,
    /// Display name for the bootstrap admin.
    pub admin_name: Option<String>,
}

/// Chat gateway connection details.
pub struct ChatGatewaySettings<'a> {
    pub url: &'a str,
    pub api_key: &'a str,
    pub model: &'a str,
    pub timeout: Duration,
}

/// Credentials for the bootstrap admin.
pub struct BootstrapAdmin<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
}

impl HackTrackSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured address does not parse.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_str();
        raw.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind address {raw}: {err}"),
            )
        })
    }

    /// Pool size, never below one.
    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size.max(1)
    }

    /// Gateway settings when both URL and key are present.
    pub fn chat_gateway(&self) -> Option<ChatGatewaySettings<'_>> {
        let url = self.chat_api_url.as_deref()?;
        let api_key = self.chat_api_key.as_deref()?;
        Some(ChatGatewaySettings {
            url,
            api_key,
            model: self.chat_model.as_deref().unwrap_or(DEFAULT_CHAT_MODEL),
            timeout: Duration::from_secs(self.chat_timeout_secs),
        })
    }

    /// Bootstrap admin when both email and password are present.
    pub fn bootstrap_admin(&self) -> Option<BootstrapAdmin<'_>> {
        Some(BootstrapAdmin {
            email: self.admin_email.as_deref()?,
            password: self.admin_password.as_deref()?,
            name: self.admin_name.as_deref().unwrap_or(DEFAULT_ADMIN_NAME),
        })
    }
}

/// Everything `create_server` needs besides the HTTP state.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Construct a server configuration from session settings and address.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
        }
    }
}
