//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! API keys are loaded from `ESP_ACCOUNT_API_KEY` / `ESP_SUBACCOUNT_API_KEY`
//! or from key files, never stored in the TOML directly.

use common::{Credentials, Secret};
use esp_client::http::DEFAULT_BASE_URL;
use esp_workflow::WorkflowSettings;
use esp_workflow::settings::DEFAULT_WARMUP_INTERVAL_HOURS;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Used when neither `--config` nor `CONFIG_PATH` is given and it exists.
pub const DEFAULT_CONFIG_FILE: &str = "esp-workflow-demo.toml";

/// Root configuration
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Prometheus text snapshot written here after the run
    #[serde(default)]
    pub metrics_file: Option<PathBuf>,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

/// Remote service connection settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub account_key_file: Option<PathBuf>,
    pub subaccount_key_file: Option<PathBuf>,
    #[serde(skip)]
    pub account_key: Option<Secret<String>>,
    #[serde(skip)]
    pub subaccount_key: Option<Secret<String>>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            account_key_file: None,
            subaccount_key_file: None,
            account_key: None,
            subaccount_key: None,
        }
    }
}

/// Values the workflow sends
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub from_email: String,
    pub from_name: String,
    pub to_email: String,
    pub domain: String,
    pub webhook_url: String,
    pub sub_account_name: Option<String>,
    pub ip_pool_prefix: String,
    pub warmup_interval_hours: u32,
    pub message_lookup_delay_secs: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        let defaults = WorkflowSettings::default();
        Self {
            from_email: defaults.from_email,
            from_name: defaults.from_name,
            to_email: defaults.to_email,
            domain: defaults.domain,
            webhook_url: defaults.webhook_url,
            sub_account_name: defaults.sub_account_name,
            ip_pool_prefix: defaults.ip_pool_prefix,
            warmup_interval_hours: defaults.warmup_interval_hours.get(),
            message_lookup_delay_secs: defaults.message_lookup_delay.as_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.finish()
    }

    /// Built-in defaults plus environment variables, for runs without a file.
    pub fn from_env() -> common::Result<Self> {
        Config::default().finish()
    }

    /// Overlay env vars, validate and resolve API keys.
    ///
    /// Key resolution order per credential:
    /// 1. `ESP_ACCOUNT_API_KEY` / `ESP_SUBACCOUNT_API_KEY`
    /// 2. `account_key_file` / `subaccount_key_file`
    fn finish(mut self) -> common::Result<Self> {
        overlay(&mut self.api.base_url, "ESP_BASE_URL");
        overlay(&mut self.workflow.from_email, "ESP_FROM_EMAIL");
        overlay(&mut self.workflow.to_email, "ESP_TO_EMAIL");
        overlay(&mut self.workflow.domain, "ESP_DOMAIN");
        overlay(&mut self.workflow.webhook_url, "ESP_WEBHOOK_URL");

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.workflow.warmup_interval_hours == 0 {
            return Err(common::Error::Config(
                "warmup_interval_hours must be greater than 0".into(),
            ));
        }

        self.api.account_key =
            resolve_key("ESP_ACCOUNT_API_KEY", self.api.account_key_file.as_deref())?;
        self.api.subaccount_key = resolve_key(
            "ESP_SUBACCOUNT_API_KEY",
            self.api.subaccount_key_file.as_deref(),
        )?;

        Ok(self)
    }

    /// Both credentials; an unresolved key becomes empty and is flagged as a
    /// placeholder at startup.
    pub fn credentials(&self) -> Credentials {
        let key = |key: &Option<Secret<String>>| {
            key.clone().unwrap_or_else(|| Secret::new(String::new()))
        };
        Credentials::new(key(&self.api.account_key), key(&self.api.subaccount_key))
    }

    pub fn settings(&self) -> WorkflowSettings {
        let workflow = &self.workflow;
        WorkflowSettings {
            from_email: workflow.from_email.clone(),
            from_name: workflow.from_name.clone(),
            to_email: workflow.to_email.clone(),
            domain: workflow.domain.clone(),
            webhook_url: workflow.webhook_url.clone(),
            sub_account_name: workflow
                .sub_account_name
                .clone()
                .filter(|name| !name.trim().is_empty()),
            ip_pool_prefix: workflow.ip_pool_prefix.clone(),
            warmup_interval_hours: NonZeroU32::new(workflow.warmup_interval_hours)
                .unwrap_or(DEFAULT_WARMUP_INTERVAL_HOURS),
            message_lookup_delay: Duration::from_secs(workflow.message_lookup_delay_secs),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Resolve config file path from CLI arg, CONFIG_PATH env var or the
    /// default file in the working directory. `None` means run on defaults.
    pub fn resolve_path(cli_path: Option<&str>) -> Option<PathBuf> {
        if let Some(p) = cli_path {
            return Some(PathBuf::from(p));
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return Some(PathBuf::from(p));
        }
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.is_file().then_some(default)
    }
}

fn overlay(field: &mut String, var: &str) {
    if let Ok(value) = std::env::var(var)
        && !value.trim().is_empty()
    {
        *field = value.trim().to_owned();
    }
}

fn resolve_key(var: &str, key_file: Option<&Path>) -> common::Result<Option<Secret<String>>> {
    if let Ok(key) = std::env::var(var) {
        return Ok(Secret::from_trimmed(&key));
    }
    let Some(path) = key_file else {
        return Ok(None);
    };
    let contents = std::fs::read_to_string(path).map_err(|source| common::Error::KeyFile {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Secret::from_trimmed(&contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize tests that mutate environment variables, preventing
    /// data races when tests run in parallel.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: &[&str] = &[
        "ESP_ACCOUNT_API_KEY",
        "ESP_SUBACCOUNT_API_KEY",
        "ESP_BASE_URL",
        "ESP_FROM_EMAIL",
        "ESP_TO_EMAIL",
        "ESP_DOMAIN",
        "ESP_WEBHOOK_URL",
        "CONFIG_PATH",
    ];

    /// SAFETY: Callers must hold ENV_MUTEX to prevent concurrent env mutation.
    unsafe fn set_env(key: &str, val: &str) {
        unsafe { std::env::set_var(key, val) };
    }

    unsafe fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) };
    }

    /// SAFETY: Callers must hold ENV_MUTEX.
    unsafe fn clear_env() {
        for var in ENV_VARS {
            unsafe { remove_env(var) };
        }
    }

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn valid_toml() -> &'static str {
        r#"
metrics_file = "/tmp/esp-metrics.prom"

[api]
base_url = "https://esp.internal.test"
timeout_secs = 10

[workflow]
from_email = "ops@mail.acme.test"
from_name = "Acme Ops"
to_email = "qa@acme.test"
domain = "mail.acme.test"
webhook_url = "https://hooks.acme.test/esp"
sub_account_name = "acme-eu"
warmup_interval_hours = 48
message_lookup_delay_secs = 2
"#
    }

    #[test]
    fn test_load_valid_config() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { clear_env() };
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, valid_toml());

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.base_url, "https://esp.internal.test");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(
            config.metrics_file.as_deref(),
            Some(Path::new("/tmp/esp-metrics.prom"))
        );
        assert!(config.api.account_key.is_none());

        let settings = config.settings();
        assert_eq!(settings.from_name, "Acme Ops");
        assert_eq!(settings.sub_account_name.as_deref(), Some("acme-eu"));
        assert_eq!(settings.warmup_interval_hours.get(), 48);
        assert_eq!(settings.message_lookup_delay, Duration::from_secs(2));
        assert_eq!(settings.ip_pool_prefix, "demo-pool");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { clear_env() };
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "");

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.metrics_file.is_none());

        let settings = config.settings();
        let defaults = WorkflowSettings::default();
        assert_eq!(settings.domain, defaults.domain);
        assert_eq!(settings.message_lookup_delay, defaults.message_lookup_delay);
        assert!(settings.sub_account_name.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "not valid {{{{ toml");

        let result = Config::load(&path);
        assert!(matches!(result, Err(common::Error::Toml(_))));
    }

    #[test]
    fn test_env_overlays_file_values() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { clear_env() };
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, valid_toml());

        unsafe {
            set_env("ESP_BASE_URL", "http://127.0.0.1:9000");
            set_env("ESP_DOMAIN", "mail.override.test");
            set_env("ESP_TO_EMAIL", "  ");
        }
        let config = Config::load(&path).unwrap();
        unsafe { clear_env() };

        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.workflow.domain, "mail.override.test");
        assert_eq!(
            config.workflow.to_email, "qa@acme.test",
            "blank env values must not override the file"
        );
    }

    #[test]
    fn test_api_keys_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe {
            clear_env();
            set_env("ESP_ACCOUNT_API_KEY", "acct-123");
            set_env("ESP_SUBACCOUNT_API_KEY", "sub-456\n");
        }
        let config = Config::from_env().unwrap();
        unsafe { clear_env() };

        let credentials = config.credentials();
        assert_eq!(
            credentials.resolve(common::Scope::Account).expose(),
            "acct-123"
        );
        assert_eq!(
            credentials.resolve(common::Scope::SubAccount).expose(),
            "sub-456"
        );
        assert!(credentials.placeholder_scopes().is_empty());
    }

    #[test]
    fn test_missing_keys_become_placeholders() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { clear_env() };

        let config = Config::from_env().unwrap();
        assert_eq!(
            config.credentials().placeholder_scopes(),
            vec![common::Scope::Account, common::Scope::SubAccount]
        );
    }

    #[test]
    fn test_api_keys_from_files() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { clear_env() };
        let dir = tempfile::tempdir().unwrap();
        let account_path = dir.path().join("account_key");
        let sub_path = dir.path().join("subaccount_key");
        std::fs::write(&account_path, "acct-file-1\n").unwrap();
        std::fs::write(&sub_path, "sub-file-2").unwrap();

        let path = write_config(
            &dir,
            &format!(
                r#"
[api]
account_key_file = "{}"
subaccount_key_file = "{}"
"#,
                account_path.display(),
                sub_path.display()
            ),
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.api.account_key.as_ref().unwrap().expose(),
            "acct-file-1"
        );
        assert_eq!(
            config.api.subaccount_key.as_ref().unwrap().expose(),
            "sub-file-2"
        );
    }

    #[test]
    fn test_api_key_env_overrides_nonexistent_file() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { clear_env() };
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
[api]
account_key_file = "/nonexistent/path/account_key"
"#,
        );

        unsafe { set_env("ESP_ACCOUNT_API_KEY", "acct-env-wins") };
        let config = Config::load(&path).unwrap();
        unsafe { clear_env() };

        assert_eq!(
            config.api.account_key.as_ref().unwrap().expose(),
            "acct-env-wins",
            "env var must take precedence over a missing key file"
        );
    }

    #[test]
    fn test_key_file_nonexistent_returns_error() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { clear_env() };
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
[api]
subaccount_key_file = "/nonexistent/path/subaccount_key"
"#,
        );

        let result = Config::load(&path);
        match result {
            Err(common::Error::KeyFile { path, .. }) => {
                assert_eq!(path, "/nonexistent/path/subaccount_key");
            }
            other => panic!("expected KeyFile error, got {other:?}"),
        }
    }

    #[test]
    fn test_key_file_whitespace_only_yields_none() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { clear_env() };
        let dir = tempfile::tempdir().unwrap();
        let key_path = dir.path().join("account_key");
        std::fs::write(&key_path, "  \n  ").unwrap();
        let path = write_config(
            &dir,
            &format!("[api]\naccount_key_file = \"{}\"\n", key_path.display()),
        );

        let config = Config::load(&path).unwrap();
        assert!(config.api.account_key.is_none());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { clear_env() };
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[api]\nbase_url = \"esp.example.com\"\n");

        let err = Config::load(&path).unwrap_err().to_string();
        assert!(
            err.contains("base_url must start with http"),
            "error message should explain the issue, got: {err}"
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { clear_env() };
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[api]\ntimeout_secs = 0\n");

        assert!(Config::load(&path).is_err(), "timeout_secs = 0 must be rejected");
    }

    #[test]
    fn test_zero_warmup_rejected() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { clear_env() };
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[workflow]\nwarmup_interval_hours = 0\n");

        let err = Config::load(&path).unwrap_err().to_string();
        assert!(err.contains("warmup_interval_hours"), "got: {err}");
    }

    #[test]
    fn test_blank_sub_account_name_disables_creation() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { clear_env() };
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[workflow]\nsub_account_name = \"  \"\n");

        let config = Config::load(&path).unwrap();
        assert!(config.settings().sub_account_name.is_none());
    }

    #[test]
    fn test_resolve_path_cli_arg() {
        let path = Config::resolve_path(Some("/custom/path.toml"));
        assert_eq!(path, Some(PathBuf::from("/custom/path.toml")));
    }

    #[test]
    fn test_resolve_path_env_var() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { set_env("CONFIG_PATH", "/env/path.toml") };
        let path = Config::resolve_path(None);
        unsafe { remove_env("CONFIG_PATH") };
        assert_eq!(path, Some(PathBuf::from("/env/path.toml")));
    }

    #[test]
    fn test_resolve_path_cli_overrides_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { set_env("CONFIG_PATH", "/env/should-lose.toml") };
        let path = Config::resolve_path(Some("/cli/wins.toml"));
        unsafe { remove_env("CONFIG_PATH") };
        assert_eq!(
            path,
            Some(PathBuf::from("/cli/wins.toml")),
            "CLI arg must take precedence over CONFIG_PATH env var"
        );
    }

    #[test]
    fn test_resolve_path_without_default_file_is_none() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { remove_env("CONFIG_PATH") };
        if !Path::new(DEFAULT_CONFIG_FILE).exists() {
            assert_eq!(Config::resolve_path(None), None);
        }
    }
}
