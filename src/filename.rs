//! Target filename derivation from the URL path.

/// Name used when the URL path has no usable final segment.
pub const FALLBACK_FILENAME: &str = "downloaded_image.jpg";

/// Derives the name an image is saved under: the text after the last `/` of
/// the URL path, or [`FALLBACK_FILENAME`] when that is empty, `.` or `..`
/// (or the URL does not parse).
///
/// Query strings and fragments never become part of the name.
pub fn derive_filename(url: &str) -> String {
    basename(url).unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

fn basename(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().rsplit('/').next()?;
    match segment {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_path_segment() {
        assert_eq!(derive_filename("https://example.com/a/b/cat.png"), "cat.png");
        assert_eq!(derive_filename("http://example.com/photo"), "photo");
    }

    #[test]
    fn query_and_fragment_ignored() {
        assert_eq!(
            derive_filename("https://cdn.example.com/img/dog.jpg?w=200&h=100#top"),
            "dog.jpg"
        );
    }

    #[test]
    fn root_or_trailing_slash_falls_back() {
        assert_eq!(derive_filename("https://example.com"), FALLBACK_FILENAME);
        assert_eq!(derive_filename("https://example.com/"), FALLBACK_FILENAME);
        assert_eq!(derive_filename("https://example.com/gallery/"), FALLBACK_FILENAME);
    }

    #[test]
    fn unparseable_url_falls_back() {
        assert_eq!(derive_filename("not a url"), FALLBACK_FILENAME);
    }

    #[test]
    fn percent_encoding_is_kept_verbatim() {
        assert_eq!(
            derive_filename("https://example.com/my%20pic.gif"),
            "my%20pic.gif"
        );
    }
}
