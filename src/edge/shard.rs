use std::fmt;

use super::rules::EdgeRules;

/// Three ASCII digits naming one origin shard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShardId(String);

impl ShardId {
    /// Extract the shard from a hostname shaped `x<3 digits>.<root domain>`.
    ///
    /// Any other shape, including the bare root domain, yields `None`.
    pub fn from_host(host: &str, rules: &EdgeRules) -> Option<Self> {
        rules
            .host_pattern()
            .captures(host)
            .and_then(|caps| caps.get(1))
            .map(|digits| Self(digits.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shard(host: &str) -> Option<String> {
        ShardId::from_host(host, &EdgeRules::default()).map(|s| s.as_str().to_string())
    }

    #[test]
    fn test_valid_shard_hosts() {
        assert_eq!(shard("x001.vicdn.cc").as_deref(), Some("001"));
        assert_eq!(shard("x999.vicdn.cc").as_deref(), Some("999"));
        assert_eq!(shard("X042.VICDN.CC").as_deref(), Some("042"));
    }

    #[test]
    fn test_rejects_root_and_other_subdomains() {
        for host in [
            "vicdn.cc",
            "www.vicdn.cc",
            "x01.vicdn.cc",
            "x0001.vicdn.cc",
            "y001.vicdn.cc",
            "x001.cdn.vicdn.cc",
            "a.x001.vicdn.cc",
            "x001.vicdn.cc.evil.com",
            "x001.evil.cc",
            "",
        ] {
            assert_eq!(shard(host), None, "{host}");
        }
    }

    #[test]
    fn test_rejects_non_ascii_digits() {
        // Arabic-Indic digits must not count as a shard number
        assert_eq!(shard("x\u{0661}\u{0662}\u{0663}.vicdn.cc"), None);
    }
}
