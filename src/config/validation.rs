use super::models::{CacheProvider, Config};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("edge.root_domain '{0}' is not a valid domain name")]
    InvalidRootDomain(String),

    #[error("edge.origin_suffix '{0}' is not a valid domain name")]
    InvalidOriginSuffix(String),

    #[error("edge.site_root '{0}' must be an absolute http(s) URL")]
    InvalidSiteRoot(String),

    #[error("server.public_scheme must be 'http' or 'https', got '{0}'")]
    InvalidPublicScheme(String),

    #[error("Timeout must be positive: {field} = 0")]
    ZeroTimeout { field: &'static str },

    #[error("cache.path is required when cache.provider = \"local\"")]
    MissingCachePath,

    #[error("{field} must be positive")]
    ZeroMaxBodyBytes { field: &'static str },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_server(config)?;
    validate_edge(config)?;
    validate_origin(config)?;
    validate_cache(config)?;
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    match config.server.public_scheme.as_str() {
        "http" | "https" => Ok(()),
        other => Err(ValidationError::InvalidPublicScheme(other.to_string())),
    }
}

fn validate_edge(config: &Config) -> Result<(), ValidationError> {
    let edge = &config.edge;

    if !is_domain_name(edge.root_domain.trim().trim_end_matches('.')) {
        return Err(ValidationError::InvalidRootDomain(edge.root_domain.clone()));
    }

    if !is_domain_name(edge.origin_suffix.trim_matches('.')) {
        return Err(ValidationError::InvalidOriginSuffix(edge.origin_suffix.clone()));
    }

    if let Some(site_root) = &edge.site_root {
        let valid = Url::parse(site_root)
            .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
            .unwrap_or(false);
        if !valid {
            return Err(ValidationError::InvalidSiteRoot(site_root.clone()));
        }
    }

    Ok(())
}

fn validate_origin(config: &Config) -> Result<(), ValidationError> {
    if config.origin.connect_timeout_ms == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "origin.connect_timeout_ms",
        });
    }

    if config.origin.request_timeout_ms == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "origin.request_timeout_ms",
        });
    }

    if config.origin.max_body_bytes.as_u64() == 0 {
        return Err(ValidationError::ZeroMaxBodyBytes {
            field: "origin.max_body_bytes",
        });
    }

    Ok(())
}

fn validate_cache(config: &Config) -> Result<(), ValidationError> {
    if config.cache.provider == CacheProvider::Local && config.cache.path.is_none() {
        return Err(ValidationError::MissingCachePath);
    }

    if config.cache.max_body_bytes.as_u64() == 0 {
        return Err(ValidationError::ZeroMaxBodyBytes {
            field: "cache.max_body_bytes",
        });
    }

    Ok(())
}

/// Dot-separated labels of ASCII letters, digits and inner hyphens, at least two labels
fn is_domain_name(name: &str) -> bool {
    let labels: Vec<&str> = name.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
