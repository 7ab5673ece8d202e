use std::str::FromStr;

use crate::auth::jwt::JwtConfig;
use crate::auth::password::hash_password;

/// Default cap on uploaded image size (5 MiB).
pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Configuration that could not be parsed from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is required")]
    Missing { name: &'static str },

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error("Failed to hash ADMIN_PASSWORD: {0}")]
    PasswordHash(String),
}

/// Server configuration loaded from environment variables.
///
/// All fields except `database_url` have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub database_url: String,
    /// Pool size (default: `10`).
    pub db_max_connections: u32,
    /// Largest accepted upload in bytes.
    pub upload_max_bytes: usize,
    pub log_format: LogFormat,
    /// Argon2 PHC string for the admin password. `None` disables login.
    pub admin_password_hash: Option<String>,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DATABASE_URL`         | **required**               |
    /// | `DB_MAX_CONNECTIONS`   | `10`                       |
    /// | `UPLOAD_MAX_BYTES`     | `5242880`                  |
    /// | `LOG_FORMAT`           | `pretty` (or `json`)       |
    /// | `ADMIN_PASSWORD_HASH`  | --                         |
    /// | `ADMIN_PASSWORD`       | --                         |
    ///
    /// `ADMIN_PASSWORD_HASH` wins over `ADMIN_PASSWORD`. See
    /// [`JwtConfig::from_lookup`] for the token settings.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ServerConfig::from_env`] but reading through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&var, "PORT", 3000u16)?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_or(&var, "REQUEST_TIMEOUT_SECS", 30u64)?;

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing {
            name: "DATABASE_URL",
        })?;
        let db_max_connections = parse_or(&var, "DB_MAX_CONNECTIONS", 10u32)?;
        let upload_max_bytes = parse_or(&var, "UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES)?;

        let log_format = match var("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase) {
            None => LogFormat::Pretty,
            Some(v) if v == "pretty" => LogFormat::Pretty,
            Some(v) if v == "json" => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    value: other,
                })
            }
        };

        let admin_password_hash = match (var("ADMIN_PASSWORD_HASH"), lookup("ADMIN_PASSWORD")) {
            (Some(hash), _) => {
                argon2::PasswordHash::new(&hash).map_err(|_| ConfigError::Invalid {
                    name: "ADMIN_PASSWORD_HASH",
                    value: "<redacted>".into(),
                })?;
                Some(hash)
            }
            (None, Some(password)) if !password.is_empty() => Some(
                hash_password(&password).map_err(|e| ConfigError::PasswordHash(e.to_string()))?,
            ),
            _ => None,
        };

        let jwt = JwtConfig::from_lookup(&var)?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            db_max_connections,
            upload_max_bytes,
            log_format,
            admin_password_hash,
            jwt,
        })
    }
}

/// Parse `name` if set, otherwise fall back to `default`.
pub(crate) fn parse_or<T, F>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;
    use crate::auth::password::verify_password;

    fn load(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| env.get(name).cloned())
    }

    const DB: (&str, &str) = ("DATABASE_URL", "postgres://localhost/senso");

    #[test]
    fn defaults_apply() {
        let config = load(&[DB]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.upload_max_bytes, DEFAULT_UPLOAD_MAX_BYTES);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.admin_password_hash.is_none());
    }

    #[test]
    fn database_url_required() {
        assert_matches!(
            load(&[]),
            Err(ConfigError::Missing {
                name: "DATABASE_URL"
            })
        );
    }

    #[test]
    fn invalid_port_rejected() {
        assert_matches!(
            load(&[DB, ("PORT", "eighty")]),
            Err(ConfigError::Invalid { name: "PORT", .. })
        );
    }

    #[test]
    fn cors_origins_split_and_trimmed() {
        let config = load(&[
            DB,
            ("CORS_ORIGINS", "https://senso.example, https://admin.senso.example,"),
        ])
        .unwrap();
        assert_eq!(
            config.cors_origins,
            vec!["https://senso.example", "https://admin.senso.example"]
        );
    }

    #[test]
    fn log_format_parsed() {
        let config = load(&[DB, ("LOG_FORMAT", "JSON")]).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);

        assert_matches!(
            load(&[DB, ("LOG_FORMAT", "xml")]),
            Err(ConfigError::Invalid {
                name: "LOG_FORMAT",
                ..
            })
        );
    }

    #[test]
    fn plaintext_admin_password_is_hashed() {
        let config = load(&[DB, ("ADMIN_PASSWORD", "hunter2")]).unwrap();
        let hash = config.admin_password_hash.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter2", &hash).unwrap());
    }

    #[test]
    fn admin_password_hash_preferred() {
        let hash = hash_password("from-hash").unwrap();
        let config = load(&[
            DB,
            ("ADMIN_PASSWORD_HASH", hash.as_str()),
            ("ADMIN_PASSWORD", "ignored"),
        ])
        .unwrap();
        assert_eq!(config.admin_password_hash.as_deref(), Some(hash.as_str()));
    }

    #[test]
    fn malformed_admin_password_hash_rejected() {
        assert_matches!(
            load(&[DB, ("ADMIN_PASSWORD_HASH", "not-a-phc-string")]),
            Err(ConfigError::Invalid {
                name: "ADMIN_PASSWORD_HASH",
                ..
            })
        );
    }
}
