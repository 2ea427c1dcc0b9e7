//! Runtime configuration loaded via OrthoConfig.
//!
//! Values are layered from defaults, an optional configuration file,
//! `CRUD_*` environment variables, and command-line flags. [`Settings::resolve`]
//! turns the raw values into checked runtime parameters; any invalid value
//! fails startup.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use actix_web::cookie::Key;
use ortho_config::OrthoConfig;
use pagination::{PaginationConfigError, PaginationGuard};
use serde::Deserialize;
use tracing::warn;
use url::Url;
use zeroize::Zeroize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_KEY_FILE: &str = "/var/run/secrets/session_key";
/// Smallest accepted session key file, in bytes.
pub const SESSION_KEY_MIN_LEN: usize = 64;

/// Raw configuration values.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CRUD")]
pub struct Settings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Largest page size any listing may return.
    #[ortho_config(default = 100)]
    pub page_ceiling: u32,
    /// Page size used when a client does not ask for one.
    #[ortho_config(default = 20)]
    pub page_default_limit: u32,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// Fall back to a random session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub allow_ephemeral: bool,
    /// Moderation service endpoint; the fixture gateway is used when unset.
    pub moderation_url: Option<String>,
    /// Moderation request timeout in milliseconds.
    #[ortho_config(default = 2000)]
    pub moderation_timeout_ms: u64,
}

/// Errors raised while resolving [`Settings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address is not a socket address.
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        /// Offending value.
        value: String,
        /// Parser failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// Page bounds are inconsistent.
    #[error("invalid pagination settings: {0}")]
    Pagination(#[from] PaginationConfigError),
    /// The session key file could not be read and ephemeral keys are off.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        /// Key file location.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The session key file is too short to derive a key from.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        /// Key file location.
        path: PathBuf,
        /// Bytes found.
        length: usize,
        /// Bytes required.
        min_len: usize,
    },
    /// The moderation endpoint is not an absolute URL.
    #[error("invalid moderation URL '{value}': {source}")]
    ModerationUrl {
        /// Offending value.
        value: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// A zero timeout would fail every moderation call.
    #[error("moderation timeout must be greater than zero")]
    ZeroTimeout,
}

/// Remote moderation endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationTarget {
    /// Endpoint receiving review requests.
    pub url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Checked runtime parameters.
pub struct RuntimeSettings {
    /// Listener address.
    pub bind_addr: SocketAddr,
    /// Pagination guard shared by every listing.
    pub guard: PaginationGuard,
    /// Session signing key.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// Remote moderation endpoint, if configured.
    pub moderation: Option<ModerationTarget>,
}

impl Settings {
    /// Configured listener address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Pagination guard built from the configured bounds.
    pub fn pagination_guard(&self) -> Result<PaginationGuard, SettingsError> {
        Ok(PaginationGuard::new(
            self.page_ceiling,
            self.page_default_limit,
        )?)
    }

    /// Session key file location.
    pub fn session_key_file(&self) -> &Path {
        self.session_key_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_KEY_FILE))
    }

    /// Load the session key, falling back to a random one when allowed.
    pub fn session_key(&self) -> Result<Key, SettingsError> {
        let path = self.session_key_file();
        match std::fs::read(path) {
            Ok(mut bytes) => {
                let length = bytes.len();
                if length < SESSION_KEY_MIN_LEN {
                    bytes.zeroize();
                    return Err(SettingsError::KeyTooShort {
                        path: path.to_path_buf(),
                        length,
                        min_len: SESSION_KEY_MIN_LEN,
                    });
                }
                let key = Key::derive_from(&bytes);
                bytes.zeroize();
                Ok(key)
            }
            Err(source) if self.allow_ephemeral => {
                warn!(path = %path.display(), error = %source, "using temporary session key");
                Ok(Key::generate())
            }
            Err(source) => Err(SettingsError::KeyRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Moderation endpoint, if one is configured.
    pub fn moderation(&self) -> Result<Option<ModerationTarget>, SettingsError> {
        let Some(raw) = self.moderation_url.as_deref() else {
            return Ok(None);
        };
        if self.moderation_timeout_ms == 0 {
            return Err(SettingsError::ZeroTimeout);
        }
        let url = Url::parse(raw).map_err(|source| SettingsError::ModerationUrl {
            value: raw.to_owned(),
            source,
        })?;
        Ok(Some(ModerationTarget {
            url,
            timeout: Duration::from_millis(self.moderation_timeout_ms),
        }))
    }

    /// Check every value and produce runtime parameters.
    ///
    /// # Errors
    /// Returns the first [`SettingsError`] encountered.
    pub fn resolve(&self) -> Result<RuntimeSettings, SettingsError> {
        Ok(RuntimeSettings {
            bind_addr: self.bind_addr()?,
            guard: self.pagination_guard()?,
            key: self.session_key()?,
            cookie_secure: self.cookie_secure,
            moderation: self.moderation()?,
        })
    }
}
