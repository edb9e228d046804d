use std::sync::OnceLock;

use regex::Regex;

/// Whether embedded media is a still image or a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// `![alt](src)` image and video embeds.
pub struct Media;

impl Media {
    /// Target extensions rendered as video instead of image or link.
    pub const VIDEO_EXTENSIONS: [&'static str; 4] = [".mp4", ".mov", ".webm", ".ogv"];

    fn pattern() -> &'static Regex {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        PATTERN.get_or_init(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("Invalid media regex"))
    }

    pub fn is_video_source(src: &str) -> bool {
        let lower = src.to_ascii_lowercase();
        Self::VIDEO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
    }

    /// Returns `(kind, alt, src)` for the first embed on the line.
    ///
    /// An embed anywhere on a line makes the whole line a media block; the
    /// surrounding text is not rendered.
    pub fn detect(line: &str) -> Option<(MediaKind, &str, &str)> {
        let caps = Self::pattern().captures(line)?;
        let alt = caps.get(1)?.as_str();
        let src = caps.get(2)?.as_str();
        let kind = if Self::is_video_source(src) || alt.to_lowercase().contains("video") {
            MediaKind::Video
        } else {
            MediaKind::Image
        };
        Some((kind, alt, src))
    }
}
