use std::{env, net::SocketAddr};

use anyhow::{Context, Result, anyhow, bail};
use tracing::info;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Memory,
}

impl StorageBackend {
    pub fn label(&self) -> &'static str {
        match self {
            StorageBackend::Postgres { .. } => "postgres",
            StorageBackend::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("STORAGE_BACKEND").unwrap_or_else(|| "postgres".to_string());
        let storage = match backend.trim() {
            "postgres" => {
                let database_url =
                    lookup("DATABASE_URL").context("DATABASE_URL env var is missing")?;
                let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
                    Some(raw) => raw
                        .trim()
                        .parse::<u32>()
                        .with_context(|| format!("invalid DATABASE_MAX_CONNECTIONS: {raw}"))?,
                    None => DEFAULT_MAX_CONNECTIONS,
                };
                if max_connections == 0 {
                    bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
                }
                StorageBackend::Postgres {
                    database_url,
                    max_connections,
                }
            }
            "memory" => {
                info!("STORAGE_BACKEND=memory, feedback will not survive a restart");
                StorageBackend::Memory
            }
            other => return Err(anyhow!("unknown STORAGE_BACKEND: {other}")),
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("invalid PORT: {raw}"))?,
            None => DEFAULT_PORT,
        };
        let host = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = format!("{}:{port}", host.trim())
            .parse()
            .with_context(|| format!("invalid BIND_ADDR: {host}"))?;

        Ok(Self { storage, bind_addr })
    }
}
