//! Configuration for the NIOS provider.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `nios_core::ProviderConfig`. The plugin binary loads a
//! profile here and hands the result to `nios_core::Provider::new`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use nios_core::config::{DEFAULT_PAGE_SIZE, DEFAULT_WAPI_VERSION};
use nios_core::{ProviderConfig, TlsVerification};

const KEYRING_SERVICE: &str = "nios-provider";
const ENV_PREFIX: &str = "NIOS_";
const USERNAME_ENV: &str = "NIOS_USERNAME";
const PASSWORD_ENV: &str = "NIOS_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named Grid Master profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

/// Values a profile falls back to.
#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_wapi_version")]
    pub wapi_version: String,

    #[serde(default)]
    pub insecure: bool,

    /// Seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub suppress_computed_plan: bool,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            wapi_version: default_wapi_version(),
            insecure: false,
            timeout: default_timeout(),
            suppress_computed_plan: false,
            page_size: default_page_size(),
        }
    }
}

fn default_wapi_version() -> String {
    DEFAULT_WAPI_VERSION.into()
}
fn default_timeout() -> u64 {
    60
}
fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// A named Grid Master profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Grid Master base URL (e.g., "https://gm.example.com").
    pub url: String,

    pub username: Option<String>,

    /// Plaintext password; prefer keyring or env var.
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    pub wapi_version: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    pub insecure: Option<bool>,

    pub timeout: Option<u64>,

    pub suppress_computed_plan: Option<bool>,

    pub page_size: Option<u32>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "infoblox", "nios-provider").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("nios-provider");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Layer defaults, the TOML file at `path` (if present), and `NIOS_*`
/// environment variables. Nested keys use `__`, e.g.
/// `NIOS_PROFILES__LAB__URL`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Profile selection ───────────────────────────────────────────────

/// Pick `name`, or the configured default profile.
pub fn select_profile<'a>(
    cfg: &'a Config,
    name: Option<&'a str>,
) -> Result<(&'a str, &'a Profile), ConfigError> {
    let name = name
        .or(cfg.default_profile.as_deref())
        .ok_or_else(|| ConfigError::Validation {
            field: "default_profile".into(),
            reason: "no profile named and no default_profile set".into(),
        })?;

    cfg.profiles
        .get(name)
        .map(|profile| (name, profile))
        .ok_or_else(|| ConfigError::UnknownProfile {
            profile: name.into(),
        })
}

// ── Credential resolution ───────────────────────────────────────────

pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var(USERNAME_ENV).ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve the password: env var, then system keyring, then plaintext.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env, then the global env var
    let env_names = profile
        .password_env
        .as_deref()
        .into_iter()
        .chain([PASSWORD_ENV]);
    for env_name in env_names {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .and_then(|entry| entry.set_password(password))
        .map_err(|e| ConfigError::Validation {
            field: "password".into(),
            reason: format!("keyring unavailable: {e}"),
        })
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ProviderConfig` from a profile, falling back to `defaults`.
pub fn profile_to_provider_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ProviderConfig, ConfigError> {
    let url: url::Url = profile.url.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {}", profile.url),
    })?;

    let page_size = profile.page_size.unwrap_or(defaults.page_size);
    if page_size == 0 {
        return Err(ConfigError::Validation {
            field: "page_size".into(),
            reason: "must be at least 1".into(),
        });
    }

    let username = resolve_username(profile, profile_name)?;
    let password = resolve_password(profile, profile_name)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = ProviderConfig::new(url, username, password);
    config.wapi_version = profile
        .wapi_version
        .clone()
        .unwrap_or_else(|| defaults.wapi_version.clone());
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.suppress_computed_plan = profile
        .suppress_computed_plan
        .unwrap_or(defaults.suppress_computed_plan);
    config.page_size = page_size;
    Ok(config)
}

/// Load config and build the `ProviderConfig` for `profile_name` (or the
/// default profile).
pub fn load_provider_config(profile_name: Option<&str>) -> Result<ProviderConfig, ConfigError> {
    let cfg = load_config()?;
    let (name, profile) = select_profile(&cfg, profile_name)?;
    profile_to_provider_config(profile, name, &cfg.defaults)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "lab"

[defaults]
timeout = 30
suppress_computed_plan = true

[profiles.lab]
url = "https://gm.lab.example.com"
username = "admin"
password = "infoblox"
insecure = true

[profiles.prod]
url = "https://gm.example.com"
username = "svc-terraform"
password_env = "PROD_NIOS_PASSWORD"
wapi_version = "2.12.3"
ca_cert = "/etc/ssl/nios-ca.pem"
page_size = 250
"#;

    #[test]
    fn profile_defaults_fill_missing_values() {
        Jail::expect_with(|jail| {
            jail.create_file("nios.toml", SAMPLE)?;
            let cfg = load_config_from(Path::new("nios.toml")).unwrap();

            let (name, profile) = select_profile(&cfg, None).unwrap();
            assert_eq!(name, "lab");
            let provider = profile_to_provider_config(profile, name, &cfg.defaults).unwrap();

            assert_eq!(provider.url.as_str(), "https://gm.lab.example.com/");
            assert_eq!(provider.username, "admin");
            assert_eq!(provider.password.expose_secret(), "infoblox");
            assert_eq!(provider.wapi_version, DEFAULT_WAPI_VERSION);
            assert_eq!(provider.tls, TlsVerification::DangerAcceptInvalid);
            assert_eq!(provider.timeout, Duration::from_secs(30));
            assert!(provider.suppress_computed_plan);
            assert_eq!(provider.page_size, DEFAULT_PAGE_SIZE);
            Ok(())
        });
    }

    #[test]
    fn password_env_wins_over_plaintext_and_profile_overrides_apply() {
        Jail::expect_with(|jail| {
            jail.create_file("nios.toml", SAMPLE)?;
            jail.set_env("PROD_NIOS_PASSWORD", "from-env");
            let cfg = load_config_from(Path::new("nios.toml")).unwrap();

            let (name, profile) = select_profile(&cfg, Some("prod")).unwrap();
            let provider = profile_to_provider_config(profile, name, &cfg.defaults).unwrap();

            assert_eq!(provider.password.expose_secret(), "from-env");
            assert_eq!(provider.wapi_version, "2.12.3");
            assert_eq!(
                provider.tls,
                TlsVerification::CustomCa(PathBuf::from("/etc/ssl/nios-ca.pem"))
            );
            assert_eq!(provider.page_size, 250);
            Ok(())
        });
    }

    #[test]
    fn env_vars_override_file_values() {
        Jail::expect_with(|jail| {
            jail.create_file("nios.toml", SAMPLE)?;
            jail.set_env("NIOS_DEFAULT_PROFILE", "prod");
            jail.set_env("NIOS_PROFILES__LAB__URL", "https://gm2.lab.example.com");
            let cfg = load_config_from(Path::new("nios.toml")).unwrap();

            assert_eq!(cfg.default_profile.as_deref(), Some("prod"));
            assert_eq!(cfg.profiles["lab"].url, "https://gm2.lab.example.com");
            Ok(())
        });
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let cfg = load_config_from(Path::new("absent.toml")).unwrap();
            assert!(cfg.profiles.is_empty());
            assert_eq!(cfg.defaults.page_size, DEFAULT_PAGE_SIZE);
            assert!(matches!(
                select_profile(&cfg, None),
                Err(ConfigError::UnknownProfile { .. })
            ));
            Ok(())
        });
    }

    #[test]
    fn invalid_url_is_a_validation_error() {
        let profile = Profile {
            url: "not a url".into(),
            username: Some("admin".into()),
            password: Some("x".into()),
            ..Profile::default()
        };
        let err = profile_to_provider_config(&profile, "bad", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "url"));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let profile = Profile {
            url: "https://gm.example.com".into(),
            page_size: Some(0),
            ..Profile::default()
        };
        let err = profile_to_provider_config(&profile, "p", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "page_size"));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                url: "https://gm.example.com".into(),
                username: Some("admin".into()),
                ..Profile::default()
            },
        );

        save_config_to(&cfg, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let loaded: Config = toml::from_str(&written).unwrap();

        assert_eq!(loaded.profiles["default"].url, "https://gm.example.com");
        assert_eq!(loaded.default_profile.as_deref(), Some("default"));
    }
}
