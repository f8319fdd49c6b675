//! Server settings loaded via OrthoConfig.
//!
//! Every field can come from the command line, a configuration file, or a
//! `REGISTRY_`-prefixed environment variable. Unset fields fall back to the
//! defaults below.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_APP_NAME: &str = "registry";
const DEFAULT_POOL_MAX_LIFETIME_SECS: u64 = 300;
const DEFAULT_POOL_CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Configuration values for the HTTP server and its storage.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REGISTRY")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the server keeps data in memory.
    pub database_url: Option<String>,
    /// Maximum number of pooled connections.
    #[ortho_config(default = 20)]
    pub pool_max_size: u32,
    /// Seconds before a pooled connection is recycled. Zero disables recycling.
    pub pool_max_lifetime_secs: Option<u64>,
    /// Seconds to wait for a pooled connection.
    pub pool_connection_timeout_secs: Option<u64>,
    /// Seconds a request may spend in a service call.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
    /// Name shown in page titles.
    pub app_name: Option<String>,
    /// Public URL advertised in logs, when it differs from the bind address.
    pub base_url: Option<String>,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn app_name(&self) -> &str {
        self.app_name.as_deref().unwrap_or(DEFAULT_APP_NAME)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Pool settings, or `None` when no database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref().filter(|url| !url.is_empty())?;
        let lifetime = self
            .pool_max_lifetime_secs
            .unwrap_or(DEFAULT_POOL_MAX_LIFETIME_SECS);
        Some(
            PoolConfig::new(url)
                .with_max_size(self.pool_max_size)
                .with_max_lifetime((lifetime > 0).then(|| Duration::from_secs(lifetime)))
                .with_connection_timeout(Duration::from_secs(
                    self.pool_connection_timeout_secs
                        .unwrap_or(DEFAULT_POOL_CONNECTION_TIMEOUT_SECS),
                )),
        )
    }

    /// URL clients should use to reach the server.
    ///
    /// Prefers `base_url`; otherwise derives `http://localhost` with the bound
    /// port, omitting port 80.
    pub fn public_url(&self, port: u16) -> String {
        match self.base_url.as_deref().filter(|url| !url.is_empty()) {
            Some(url) => url.trim_end_matches('/').to_owned(),
            None if port == 80 => "http://localhost".to_owned(),
            None => format!("http://localhost:{port}"),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "REGISTRY_BIND_ADDR",
        "REGISTRY_DATABASE_URL",
        "REGISTRY_POOL_MAX_SIZE",
        "REGISTRY_POOL_MAX_LIFETIME_SECS",
        "REGISTRY_POOL_CONNECTION_TIMEOUT_SECS",
        "REGISTRY_REQUEST_TIMEOUT_SECS",
        "REGISTRY_APP_NAME",
        "REGISTRY_BASE_URL",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("registry")]).expect("config should load")
    }

    /// Every variable, unset unless named in `overrides`.
    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), DEFAULT_BIND_ADDR);
        assert_eq!(settings.app_name(), DEFAULT_APP_NAME);
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
        assert_eq!(settings.pool_max_size, 20);
        assert!(settings.pool_config().is_none());
        assert!(settings.base_url.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("REGISTRY_BIND_ADDR", "127.0.0.1:8080"),
            ("REGISTRY_DATABASE_URL", "postgres://localhost/registry"),
            ("REGISTRY_POOL_MAX_SIZE", "5"),
            ("REGISTRY_REQUEST_TIMEOUT_SECS", "3"),
            ("REGISTRY_APP_NAME", "anagrafe"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "127.0.0.1:8080");
        assert_eq!(settings.app_name(), "anagrafe");
        assert_eq!(settings.request_timeout(), Duration::from_secs(3));
        let pool = settings.pool_config().expect("database configured");
        assert_eq!(pool.database_url(), "postgres://localhost/registry");
        assert_eq!(settings.pool_max_size, 5);
    }

    #[rstest]
    #[case(None, 5000, "http://localhost:5000")]
    #[case(None, 80, "http://localhost")]
    #[case(Some("https://registry.example.it/"), 5000, "https://registry.example.it")]
    fn public_url_prefers_base_url(
        #[case] base_url: Option<&str>,
        #[case] port: u16,
        #[case] expected: &str,
    ) {
        let settings = ServerSettings {
            bind_addr: None,
            database_url: None,
            pool_max_size: 20,
            pool_max_lifetime_secs: None,
            pool_connection_timeout_secs: None,
            request_timeout_secs: 30,
            app_name: None,
            base_url: base_url.map(str::to_owned),
        };
        assert_eq!(settings.public_url(port), expected);
    }

    #[rstest]
    fn empty_database_url_means_in_memory() {
        let _guard = lock_env(env_with(&[("REGISTRY_DATABASE_URL", "")]));

        assert!(load_from_empty_args().pool_config().is_none());
    }
}
