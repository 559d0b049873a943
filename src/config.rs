//! Runtime settings read from the environment.
//!
//! The binary loads an optional `.env` file first, so every variable
//! below may also live there:
//!
//! * `QUOTE_ENV`: `dev` (default), `staging` or `prod`.  Selects the
//!   log format and default log filter.
//! * `QUOTE_BIND_ADDR`: listen address, `127.0.0.1:3000` by default.
//! * `QUOTE_RATE_TABLE_DIR`: directory of per-tenant rate table JSON
//!   files, `rate_tables` by default.  A missing directory is not an
//!   error; every tenant then prices with the built-in rates.

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    /// Directory holding per-tenant rate table JSON files.
    pub rate_table_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup so tests need not
    /// touch the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Environment::parse(&lookup("QUOTE_ENV").unwrap_or_else(|| "dev".to_string()));
        let bind_addr = lookup("QUOTE_BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string())
            .parse()
            .context("QUOTE_BIND_ADDR must be a socket address such as 127.0.0.1:3000")?;
        let rate_table_dir =
            PathBuf::from(lookup("QUOTE_RATE_TABLE_DIR").unwrap_or_else(|| "rate_tables".to_string()));

        Ok(Settings {
            env,
            bind_addr,
            rate_table_dir,
        })
    }
}
