//! Process configuration from the environment.
//!
//! A `.env` file in the working directory is read first when present;
//! variables already set in the environment win over it.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `HOST` | `0.0.0.0` | listen address |
//! | `PORT` | `4000` | listen port |
//! | `SALT` | required | password-hash salt handed to the user collaborator |
//! | `LOG_LEVEL` | `info` | fallback filter when `RUST_LOG` is unset |

use std::net::SocketAddr;

use crate::error::Error;
use crate::logger::parse_level;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub salt: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(Error::Config { key: ".env", reason: e.to_string() });
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|e| Error::Config {
                key: "PORT",
                reason: format!("`{raw}` is not a port: {e}"),
            })?,
            None => 4000,
        };
        let salt = lookup("SALT")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Config { key: "SALT", reason: "must be set".to_owned() })?;
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_owned());
        parse_level(&log_level).map_err(|e| Error::Config { key: "LOG_LEVEL", reason: e.to_string() })?;

        Ok(Self { host, port, salt, log_level })
    }

    pub fn addr(&self) -> Result<SocketAddr, Error> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|source| Error::Addr { addr, source })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, Error> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = config(&[("SALT", "s")]).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.addr().unwrap().to_string(), "0.0.0.0:4000");
    }

    #[test]
    fn salt_is_required() {
        assert!(matches!(config(&[]), Err(Error::Config { key: "SALT", .. })));
        assert!(matches!(config(&[("SALT", "")]), Err(Error::Config { key: "SALT", .. })));
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = config(&[("SALT", "s"), ("PORT", "http")]).unwrap_err();
        assert!(matches!(err, Error::Config { key: "PORT", .. }));
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let err = config(&[("SALT", "s"), ("LOG_LEVEL", "loud")]).unwrap_err();
        assert!(matches!(err, Error::Config { key: "LOG_LEVEL", .. }));
    }

    #[test]
    fn bad_host_fails_at_addr() {
        let config = config(&[("SALT", "s"), ("HOST", "not a host")]).unwrap();
        assert!(matches!(config.addr(), Err(Error::Addr { .. })));
    }
}
