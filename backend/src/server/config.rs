//! Runtime configuration loaded via OrthoConfig, plus the resolved server
//! configuration handed to [`super::create_server`].

use std::ffi::OsString;
use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use color_eyre::eyre::{Result, eyre};
use ortho_config::OrthoConfig;
use serde::Deserialize;

use cinema_backend::domain::OperationDeadline;
use cinema_backend::outbound::persistence::{DbPool, PoolConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Settings read from `CINEMA_*` environment variables, configuration files
/// and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CINEMA")]
pub struct AppSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. The in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Per-operation deadline in milliseconds; `0` disables it.
    pub operation_timeout_ms: Option<u64>,
    /// Skip embedded migrations at start-up.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

impl AppSettings {
    /// Parsed bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Configured database URL; blank values count as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool settings for the configured database, if any.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url().map(|url| {
            PoolConfig::new(url).with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE))
        })
    }

    pub fn operation_deadline(&self) -> OperationDeadline {
        match self
            .operation_timeout_ms
            .unwrap_or(DEFAULT_OPERATION_TIMEOUT_MS)
        {
            0 => OperationDeadline::unbounded(),
            millis => OperationDeadline::after(Duration::from_millis(millis)),
        }
    }

    pub fn run_migrations(&self) -> bool {
        !self.skip_migrations
    }
}

/// Load [`AppSettings`] from the environment, configuration files and the
/// command-line `args` (program name first).
pub fn load_settings(args: impl IntoIterator<Item = OsString>) -> Result<AppSettings> {
    let args: Vec<OsString> = args.into_iter().collect();
    AppSettings::load_from_iter(args).map_err(|err| eyre!("failed to load configuration: {err}"))
}

/// Resolved configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) deadline: OperationDeadline,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, deadline: OperationDeadline) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            deadline,
        }
    }

    /// Attach a database connection pool; without one the server runs on
    /// the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}

#[cfg(test)]
mod tests {
    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 5] = [
        "CINEMA_BIND_ADDR",
        "CINEMA_DATABASE_URL",
        "CINEMA_POOL_MAX_SIZE",
        "CINEMA_OPERATION_TIMEOUT_MS",
        "CINEMA_SKIP_MIGRATIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        load_settings([OsString::from("cinema-backend")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address parses"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("valid literal")
        );
        assert!(settings.database_url().is_none());
        assert!(settings.pool_config().is_none());
        assert_eq!(
            settings.operation_deadline().timeout(),
            Some(Duration::from_millis(DEFAULT_OPERATION_TIMEOUT_MS))
        );
        assert!(settings.run_migrations());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CINEMA_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "CINEMA_DATABASE_URL",
                Some("postgres://localhost/cinema".to_owned()),
            ),
            ("CINEMA_POOL_MAX_SIZE", Some("4".to_owned())),
            ("CINEMA_OPERATION_TIMEOUT_MS", Some("0".to_owned())),
            ("CINEMA_SKIP_MIGRATIONS", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("address parses"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("valid literal")
        );
        assert_eq!(
            settings.pool_config().map(|pool| pool.database_url().to_owned()),
            Some("postgres://localhost/cinema".to_owned())
        );
        assert_eq!(settings.pool_max_size, Some(4));
        assert!(settings.operation_deadline().timeout().is_none());
        assert!(!settings.run_migrations());
    }

    #[rstest]
    fn blank_database_url_selects_memory_store() {
        let _guard = lock_env([
            ("CINEMA_BIND_ADDR", None),
            ("CINEMA_DATABASE_URL", Some("   ".to_owned())),
            ("CINEMA_POOL_MAX_SIZE", None),
            ("CINEMA_OPERATION_TIMEOUT_MS", None),
            ("CINEMA_SKIP_MIGRATIONS", None),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.database_url().is_none());
    }

    #[rstest]
    fn malformed_bind_address_is_an_error() {
        let _guard = lock_env([
            ("CINEMA_BIND_ADDR", Some("not an address".to_owned())),
            ("CINEMA_DATABASE_URL", None),
            ("CINEMA_POOL_MAX_SIZE", None),
            ("CINEMA_OPERATION_TIMEOUT_MS", None),
            ("CINEMA_SKIP_MIGRATIONS", None),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.bind_addr().is_err());
    }
}
