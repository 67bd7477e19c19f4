use std::fmt;

use super::classify::NormalizedPath;
use super::rules::EdgeRules;
use super::shard::ShardId;
use super::video_id::VideoId;

/// Upstream location for one validated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginDescriptor {
    pub url: String,
    pub shard: ShardId,
    pub video_id: VideoId,
}

impl OriginDescriptor {
    /// `https://<video>.x<shard>-<root-dashed>.<suffix>/<path>`
    pub fn build(
        video_id: &VideoId,
        shard: &ShardId,
        path: &NormalizedPath,
        rules: &EdgeRules,
    ) -> Self {
        let url = format!(
            "https://{video}.x{shard}-{root}.{suffix}/{path}",
            video = video_id,
            shard = shard,
            root = rules.dashed_root(),
            suffix = rules.origin_suffix(),
            path = path.as_str(),
        );

        Self {
            url,
            shard: shard.clone(),
            video_id: video_id.clone(),
        }
    }
}

impl fmt::Display for OriginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::video_id::extract_video_id;

    fn origin_for(host: &str, path: &str) -> String {
        let rules = EdgeRules::default();
        let shard = ShardId::from_host(host, &rules).unwrap();
        let path = NormalizedPath::new(path);
        let video_id = extract_video_id(&path, path.classification()).unwrap();
        OriginDescriptor::build(&video_id, &shard, &path, &rules).url
    }

    #[test]
    fn test_manifest_origin() {
        assert_eq!(
            origin_for("x001.vicdn.cc", "/abc123.m3u8"),
            "https://abc123.x001-vicdn-cc.pages.dev/abc123.m3u8"
        );
    }

    #[test]
    fn test_thumbnail_origin_keeps_full_path() {
        assert_eq!(
            origin_for("x042.vicdn.cc", "/tv-1-2-3-index-0004.png"),
            "https://tv-1-2-3.x042-vicdn-cc.pages.dev/tv-1-2-3-index-0004.png"
        );
    }

    #[test]
    fn test_original_case_is_kept() {
        assert_eq!(
            origin_for("X007.vicdn.cc", "/Clip.VTT"),
            "https://Clip.x007-vicdn-cc.pages.dev/Clip.VTT"
        );
    }

    #[test]
    fn test_origin_host_is_exactly_the_naming_scheme() {
        for (host, path, expected) in [
            ("x001.vicdn.cc", "/abc123.m3u8", "abc123.x001-vicdn-cc.pages.dev"),
            ("x002.vicdn.cc", "/AbC-9.jpg", "abc-9.x002-vicdn-cc.pages.dev"),
            ("x003.vicdn.cc", "/mv-1-2-3-index-0001.png", "mv-1-2-3.x003-vicdn-cc.pages.dev"),
        ] {
            let url = url::Url::parse(&origin_for(host, path)).unwrap();
            assert_eq!(url.host_str(), Some(expected), "{path}");
        }
    }

    #[test]
    fn test_distinct_shards_map_to_distinct_hosts() {
        let a = origin_for("x001.vicdn.cc", "/abc.jpg");
        let b = origin_for("x002.vicdn.cc", "/abc.jpg");
        assert_ne!(a, b);
    }

    #[test]
    fn test_custom_domain_and_suffix() {
        let rules = EdgeRules::new("media.example.org", None, "origin.example.net").unwrap();
        let shard = ShardId::from_host("x100.media.example.org", &rules).unwrap();
        let path = NormalizedPath::new("/v1.m3u8");
        let video_id = extract_video_id(&path, path.classification()).unwrap();
        let origin = OriginDescriptor::build(&video_id, &shard, &path, &rules);
        assert_eq!(
            origin.url,
            "https://v1.x100-media-example-org.origin.example.net/v1.m3u8"
        );
    }
}
