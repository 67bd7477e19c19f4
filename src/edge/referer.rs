use url::Url;

use super::classify::PathClassification;
use super::error::EdgeError;
use super::request::RefererHeader;
use super::rules::EdgeRules;

/// Hotlink protection.
///
/// Manifests require a Referer; every other kind may omit it. A Referer that
/// is present must parse as an absolute URL whose host is the root domain or
/// one of its subdomains.
pub fn check_referer(
    classification: PathClassification,
    referer: RefererHeader<'_>,
    rules: &EdgeRules,
) -> Result<(), EdgeError> {
    let raw = match referer {
        RefererHeader::Absent if classification == PathClassification::Manifest => {
            return Err(EdgeError::ForbiddenReferer(
                "manifest requested without referer".into(),
            ));
        }
        RefererHeader::Absent => return Ok(()),
        RefererHeader::Unreadable => {
            return Err(EdgeError::ForbiddenReferer("unreadable referer header".into()));
        }
        RefererHeader::Present(raw) => raw,
    };

    let parsed = Url::parse(raw)
        .map_err(|e| EdgeError::ForbiddenReferer(format!("malformed referer: {e}")))?;
    let host = parsed.host_str().unwrap_or_default();

    if is_allowed_host(host, rules.root_domain()) {
        Ok(())
    } else {
        Err(EdgeError::ForbiddenReferer(format!(
            "referer host '{host}' is not allowed"
        )))
    }
}

fn is_allowed_host(host: &str, root_domain: &str) -> bool {
    host == root_domain
        || host
            .strip_suffix(root_domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
