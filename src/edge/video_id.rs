use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::classify::{NormalizedPath, PathClassification};
use super::error::EdgeError;

static THUMBNAIL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^((?:tv|mv)-[0-9]+-[0-9]+-[0-9]+)-index")
        .expect("thumbnail prefix pattern compiles")
});

const MAX_LABEL_LEN: usize = 63;

/// Content identifier addressing one origin deployment. Always a single
/// DNS label (`[A-Za-z0-9-]`, 1 to 63 characters), so it can only ever name
/// a subdomain of the origin suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `tv-1-2-3-index.png` yields `tv-1-2-3`.
pub fn parse_thumbnail_prefix(path: &str) -> Option<&str> {
    THUMBNAIL_PREFIX
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Derive the Video ID from the path. The classification must come from the
/// same path; extensions are not re-checked here.
pub fn extract_video_id(
    path: &NormalizedPath,
    classification: PathClassification,
) -> Result<VideoId, EdgeError> {
    let raw = path.as_str();
    let id = match classification {
        PathClassification::Manifest => strip_suffix_len(raw, ".m3u8".len()),
        PathClassification::ImageJpg | PathClassification::Subtitle => {
            strip_suffix_len(raw, ".jpg".len())
        }
        PathClassification::ThumbnailPng => parse_thumbnail_prefix(raw).ok_or_else(|| {
            EdgeError::BadRequestShape(format!("thumbnail path '{raw}' has no video prefix"))
        })?,
        PathClassification::Unknown => {
            return Err(EdgeError::BadRequestShape(format!(
                "unsupported extension in '{raw}'"
            )));
        }
    };

    if !is_dns_label(id) {
        return Err(EdgeError::BadRequestShape(format!(
            "video id '{id}' is not a host label"
        )));
    }

    Ok(VideoId(id.to_string()))
}

fn is_dns_label(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_LABEL_LEN
        && !id.starts_with('-')
        && !id.ends_with('-')
        && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

fn strip_suffix_len(raw: &str, len: usize) -> &str {
    raw.get(..raw.len().saturating_sub(len)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(path: &str) -> Result<String, EdgeError> {
        let path = NormalizedPath::new(path);
        extract_video_id(&path, path.classification()).map(|id| id.as_str().to_string())
    }

    #[test]
    fn test_manifest_strips_extension() {
        assert_eq!(extract("/abc123.m3u8").unwrap(), "abc123");
        assert_eq!(extract("/AbC123.M3U8").unwrap(), "AbC123");
    }

    #[test]
    fn test_jpg_and_vtt_strip_four_characters() {
        assert_eq!(extract("/abc123.jpg").unwrap(), "abc123");
        assert_eq!(extract("/abc123.vtt").unwrap(), "abc123");
        assert_eq!(extract("/abc123.JPG").unwrap(), "abc123");
    }

    #[test]
    fn test_thumbnail_prefix() {
        assert_eq!(extract("/tv-1-2-3-index.png").unwrap(), "tv-1-2-3");
        assert_eq!(extract("/MV-10-200-3000-index-0001.png").unwrap(), "MV-10-200-3000");
    }

    #[test]
    fn test_thumbnail_without_prefix_rejected() {
        for path in ["/movie.png", "/xv-1-2-3-index.png", "/tv-1-2-index.png", "/a/tv-1-2-3-index.png"] {
            let err = extract(path).unwrap_err();
            assert!(matches!(err, EdgeError::BadRequestShape(_)), "{path}");
        }
    }

    #[test]
    fn test_unknown_classification_rejected() {
        let err = extract("/clip.mp4").unwrap_err();
        assert!(matches!(err, EdgeError::BadRequestShape(_)));
    }

    #[test]
    fn test_bare_extension_rejected() {
        for path in ["/.m3u8", "/.jpg", "/.vtt"] {
            let err = extract(path).unwrap_err();
            assert!(matches!(err, EdgeError::BadRequestShape(_)), "{path}");
        }
    }

    #[test]
    fn test_ids_outside_host_label_alphabet_rejected() {
        for path in [
            "/evil.com/x.m3u8",
            "/a@evil.com/x.jpg",
            "/169.254.169.254/latest.vtt",
            "/evil.com:8080.m3u8",
            "/dir/abc.jpg",
            "/abc_123.jpg",
            "/abc%2Fdef.vtt",
            "/-abc.jpg",
            "/abc-.m3u8",
        ] {
            let err = extract(path).unwrap_err();
            assert!(matches!(err, EdgeError::BadRequestShape(_)), "{path}");
        }
    }

    #[test]
    fn test_label_length_limit() {
        let longest = format!("/{}.jpg", "a".repeat(63));
        assert_eq!(extract(&longest).unwrap().len(), 63);

        let too_long = format!("/{}.jpg", "a".repeat(64));
        assert!(extract(&too_long).is_err());
    }

    #[test]
    fn test_parse_thumbnail_prefix_directly() {
        assert_eq!(parse_thumbnail_prefix("tv-7-8-9-index"), Some("tv-7-8-9"));
        assert_eq!(parse_thumbnail_prefix("tv-7-8-9"), None);
    }
}
