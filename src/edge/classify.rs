/// Content kind derived from the trailing file extension of the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClassification {
    /// `.m3u8` playback manifest
    Manifest,
    /// `.jpg` poster image
    ImageJpg,
    /// `.vtt` subtitle track
    Subtitle,
    /// `.png` thumbnail sprite
    ThumbnailPng,
    Unknown,
}

impl PathClassification {
    /// Classify an already lower-cased path.
    pub fn from_lower_path(lower: &str) -> Self {
        if lower.ends_with(".m3u8") {
            Self::Manifest
        } else if lower.ends_with(".png") {
            Self::ThumbnailPng
        } else if lower.ends_with(".jpg") {
            Self::ImageJpg
        } else if lower.ends_with(".vtt") {
            Self::Subtitle
        } else {
            Self::Unknown
        }
    }
}

/// Request path with leading slashes removed, plus a lower-cased copy used
/// for extension matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPath {
    original: String,
    lower: String,
}

impl NormalizedPath {
    pub fn new(raw_path: &str) -> Self {
        let original = raw_path.trim_start_matches('/').to_string();
        let lower = original.to_ascii_lowercase();
        Self { original, lower }
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn lower(&self) -> &str {
        &self.lower
    }

    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    pub fn classification(&self) -> PathClassification {
        PathClassification::from_lower_path(&self.lower)
    }

    pub fn is_index(&self) -> bool {
        self.lower == "index.html"
    }
}
