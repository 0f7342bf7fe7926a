// ── Runtime provider configuration ──
//
// Describes how to reach one NIOS Grid Master and how plans are shaped.
// Carries credentials but never touches disk; `nios-config` builds one from
// profiles and hands it to `Provider::new`.

use std::path::PathBuf;
use std::time::Duration;

use nios_api::{TlsMode, TransportConfig, WapiClient};
use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

pub const DEFAULT_WAPI_VERSION: &str = "2.13.6";
pub const DEFAULT_PAGE_SIZE: u32 = 1000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (appliances ship with self-signed certs).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => Self::System,
            TlsVerification::CustomCa(path) => Self::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => Self::DangerAcceptInvalid,
        }
    }
}

/// Configuration for one provider instance.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Grid Master URL (e.g., `https://gm.example.com`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub wapi_version: String,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// When set, plans keep server-computed values from prior state instead
    /// of marking them unknown until apply.
    pub suppress_computed_plan: bool,
    /// `_max_results` per page for data source searches.
    pub page_size: u32,
}

impl ProviderConfig {
    pub fn new(url: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            url,
            username: username.into(),
            password,
            wapi_version: DEFAULT_WAPI_VERSION.to_owned(),
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            suppress_computed_plan: false,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
            cookie_jar: None,
        }
        .with_cookie_jar()
    }

    /// Build the WAPI client for this configuration.
    pub fn connect(&self) -> Result<WapiClient, CoreError> {
        if self.username.is_empty() {
            return Err(CoreError::Config {
                message: "username must not be empty".into(),
            });
        }
        if self.page_size == 0 {
            return Err(CoreError::Config {
                message: "page_size must be at least 1".into(),
            });
        }

        WapiClient::new(
            self.url.as_str(),
            &self.wapi_version,
            &self.username,
            &self.password,
            &self.transport(),
        )
        .map_err(CoreError::from)
    }
}
