use anyhow::{anyhow, Context};

pub const DEFAULT_HOST: &str = "http://localhost:3000";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientConfig {
    /// Scheme, host and port of the server, without trailing slash
    pub host: String,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> anyhow::Result<ClientConfig> {
        let host = host.into();
        let host = host.trim().trim_end_matches('/');
        if !host.starts_with("http://") && !host.starts_with("https://") {
            return Err(anyhow!("host {host:?} is not an http(s) url"));
        }
        Ok(ClientConfig {
            host: String::from(host),
        })
    }

    /// Reads `COMMENT_STATUS_HOST`, falling back to the local default server
    pub fn from_env() -> anyhow::Result<ClientConfig> {
        match std::env::var("COMMENT_STATUS_HOST") {
            Ok(host) => ClientConfig::new(host).context("parsing COMMENT_STATUS_HOST"),
            Err(std::env::VarError::NotPresent) => ClientConfig::new(DEFAULT_HOST),
            Err(e) => Err(e).context("retrieving COMMENT_STATUS_HOST environment variable"),
        }
    }
}

/// UI strings for the status toggle
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Labels {
    pub resolve: String,
    pub reactivate: String,
    pub failed_to_update: String,
}

impl Default for Labels {
    fn default() -> Labels {
        Labels {
            resolve: String::from("Resolve"),
            reactivate: String::from("Reactivate"),
            failed_to_update: String::from("Failed to update comment status"),
        }
    }
}
