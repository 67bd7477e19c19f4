use crate::humanize::ByteSize;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub edge: EdgeConfig,
    #[serde(default)]
    pub origin: OriginConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Scheme used to rebuild the public request URL (TLS ends in front of us)
    #[serde(default = "default_public_scheme")]
    pub public_scheme: String,
    /// Honor `X-Forwarded-Proto` from the terminating proxy
    #[serde(default)]
    pub trust_forwarded_proto: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            public_scheme: default_public_scheme(),
            trust_forwarded_proto: false,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_public_scheme() -> String {
    "https".to_string()
}

/// Hostname rules for shards, referers and origins
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EdgeConfig {
    #[serde(default = "default_root_domain")]
    pub root_domain: String,
    /// Redirect target for `index.html`; `https://<root_domain>/` when unset
    pub site_root: Option<String>,
    #[serde(default = "default_origin_suffix")]
    pub origin_suffix: String,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            root_domain: default_root_domain(),
            site_root: None,
            origin_suffix: default_origin_suffix(),
        }
    }
}

fn default_root_domain() -> String {
    crate::edge::EdgeRules::default().root_domain().to_string()
}

fn default_origin_suffix() -> String {
    crate::edge::EdgeRules::default().origin_suffix().to_string()
}

/// Outbound origin client
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OriginConfig {
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// 0 disables redirect following
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Upper bound on a buffered origin body
    #[serde(default = "default_origin_max_body_bytes")]
    pub max_body_bytes: ByteSize,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            max_body_bytes: default_origin_max_body_bytes(),
        }
    }
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_request_timeout_ms() -> u64 {
    60_000
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    concat!("shardgate/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_origin_max_body_bytes() -> ByteSize {
    ByteSize(512 * 1024 * 1024) // 512 MB
}

/// Cache backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheProvider {
    #[default]
    Memory,
    Local,
    Disabled,
}

/// Response cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub provider: CacheProvider,
    /// Directory for the `local` provider
    pub path: Option<PathBuf>,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: ByteSize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: CacheProvider::Memory,
            path: None,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_max_body_bytes() -> ByteSize {
    ByteSize(64 * 1024 * 1024) // 64 MB
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            log_format: LogFormat::Text,
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}
