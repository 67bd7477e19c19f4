use regex::Regex;

use crate::config::EdgeConfig;

pub const DEFAULT_ROOT_DOMAIN: &str = "vicdn.cc";
pub const DEFAULT_ORIGIN_SUFFIX: &str = "pages.dev";

/// Deployment constants shared by every pipeline stage.
#[derive(Debug, Clone)]
pub struct EdgeRules {
    root_domain: String,
    host_pattern: Regex,
    site_root: String,
    origin_suffix: String,
}

impl EdgeRules {
    pub fn new(
        root_domain: &str,
        site_root: Option<&str>,
        origin_suffix: &str,
    ) -> Result<Self, regex::Error> {
        let root_domain = root_domain.trim().trim_end_matches('.').to_ascii_lowercase();
        let host_pattern = Regex::new(&format!(
            r"(?i)^x([0-9]{{3}})\.{}$",
            regex::escape(&root_domain)
        ))?;
        let site_root = site_root
            .map(str::to_owned)
            .unwrap_or_else(|| format!("https://{root_domain}/"));

        Ok(Self {
            root_domain,
            host_pattern,
            site_root,
            origin_suffix: origin_suffix.trim_matches('.').to_ascii_lowercase(),
        })
    }

    pub fn from_config(config: &EdgeConfig) -> Result<Self, regex::Error> {
        Self::new(
            &config.root_domain,
            config.site_root.as_deref(),
            &config.origin_suffix,
        )
    }

    pub fn root_domain(&self) -> &str {
        &self.root_domain
    }

    pub fn host_pattern(&self) -> &Regex {
        &self.host_pattern
    }

    /// Redirect target for `index.html`.
    pub fn site_root(&self) -> &str {
        &self.site_root
    }

    pub fn origin_suffix(&self) -> &str {
        &self.origin_suffix
    }

    /// Root domain as a single DNS label: `vicdn.cc` becomes `vicdn-cc`.
    pub fn dashed_root(&self) -> String {
        self.root_domain.replace('.', "-")
    }
}

impl Default for EdgeRules {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_DOMAIN, None, DEFAULT_ORIGIN_SUFFIX)
            .expect("default host pattern compiles")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let rules = EdgeRules::default();
        assert_eq!(rules.root_domain(), "vicdn.cc");
        assert_eq!(rules.site_root(), "https://vicdn.cc/");
        assert_eq!(rules.origin_suffix(), "pages.dev");
        assert_eq!(rules.dashed_root(), "vicdn-cc");
    }

    #[test]
    fn test_root_domain_is_normalized() {
        let rules = EdgeRules::new(" Media.Example.ORG. ", None, ".pages.dev").unwrap();
        assert_eq!(rules.root_domain(), "media.example.org");
        assert_eq!(rules.dashed_root(), "media-example-org");
        assert_eq!(rules.origin_suffix(), "pages.dev");
    }

    #[test]
    fn test_root_domain_dots_are_literal_in_pattern() {
        let rules = EdgeRules::default();
        assert!(rules.host_pattern().is_match("x001.vicdn.cc"));
        assert!(!rules.host_pattern().is_match("x001.vicdnXcc"));
    }

    #[test]
    fn test_explicit_site_root() {
        let rules = EdgeRules::new("vicdn.cc", Some("https://www.vicdn.cc/home"), "pages.dev")
            .unwrap();
        assert_eq!(rules.site_root(), "https://www.vicdn.cc/home");
    }
}
