//! YouTube media references
//!
//! Submitters paste anything from a bare video id to a full share link. We keep
//! only the 11-character id and rebuild embed/thumbnail URLs from it.

use url::Url;

const ID_LEN: usize = 11;

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_video_id(s: &str) -> bool {
    s.len() == ID_LEN && s.chars().all(is_id_char)
}

/// Take an id from the start of `s` if exactly 11 id characters precede a
/// non-id character (or the end).
fn leading_id(s: &str) -> Option<&str> {
    let end = s.find(|c: char| !is_id_char(c)).unwrap_or(s.len());
    let candidate = &s[..end.min(s.len())];
    if candidate.len() >= ID_LEN && is_video_id(&candidate[..ID_LEN]) {
        Some(&candidate[..ID_LEN])
    } else {
        None
    }
}

/// Extract the video id from a bare id or any common YouTube link shape.
pub fn extract_youtube_id(input: &str) -> Option<String> {
    let s = input.trim();

    if is_video_id(s) {
        return Some(s.to_string());
    }

    if let Ok(url) = Url::parse(s) {
        let host = url.host_str().unwrap_or_default();
        let segments = url
            .path_segments()
            .map(|segs| segs.filter(|p| !p.is_empty()).collect::<Vec<_>>())
            .unwrap_or_default();

        if host.contains("youtu.be") {
            return segments
                .first()
                .filter(|id| is_video_id(id))
                .map(|id| id.to_string());
        }

        if host.contains("youtube.com") {
            if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
                if is_video_id(&v) {
                    return Some(v.into_owned());
                }
            }
            if let Some(pos) = segments.iter().position(|p| *p == "embed") {
                return segments
                    .get(pos + 1)
                    .filter(|id| is_video_id(id))
                    .map(|id| id.to_string());
            }
        }
    }

    // Odd pastes: scan for known fragments
    for marker in ["youtu.be/", "?v=", "&v=", "/embed/"] {
        if let Some(pos) = s.find(marker) {
            if let Some(id) = leading_id(&s[pos + marker.len()..]) {
                return Some(id.to_string());
            }
        }
    }

    None
}

const EMBED_PARAMS: &str = "controls=0&modestbranding=1&rel=0&iv_load_policy=3&playsinline=1";

/// Privacy-enhanced embed URL with player chrome disabled.
pub fn embed_url(id: &str) -> String {
    format!("https://www.youtube-nocookie.com/embed/{}?{}", id, EMBED_PARAMS)
}

pub fn thumbnail_url(id: &str) -> String {
    format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn test_bare_id() {
        assert_eq!(extract_youtube_id(ID).as_deref(), Some(ID));
        assert_eq!(extract_youtube_id("  dQw4w9WgXcQ ").as_deref(), Some(ID));
    }

    #[test]
    fn test_link_shapes() {
        for link in [
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ&t=42",
        ] {
            assert_eq!(extract_youtube_id(link).as_deref(), Some(ID), "{}", link);
        }
    }

    #[test]
    fn test_odd_pastes() {
        assert_eq!(
            extract_youtube_id("watch this: youtu.be/dQw4w9WgXcQ !").as_deref(),
            Some(ID)
        );
        assert_eq!(
            extract_youtube_id("youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some(ID)
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(extract_youtube_id(""), None);
        assert_eq!(extract_youtube_id("not a video"), None);
        assert_eq!(extract_youtube_id("https://youtu.be/short"), None);
        assert_eq!(extract_youtube_id("https://www.youtube.com/embed/"), None);
    }

    #[test]
    fn test_urls() {
        assert!(embed_url(ID).starts_with("https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ?"));
        assert_eq!(thumbnail_url(ID), "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg");
    }
}
