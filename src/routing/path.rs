//! Raw request path handling.
//!
//! Matching works on the percent-encoded path exactly as it arrived.
//! [`normalize`] only escapes bytes that may never appear literally in a
//! path; existing `%XX` escapes pass through untouched (no decoding, no
//! change of hex-digit case).

use std::borrow::Cow;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Bytes that are escaped when they show up literally in a path.
/// `%` is deliberately absent so existing escapes are kept byte-for-byte.
const PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[must_use]
pub fn normalize(path: &str) -> Cow<'_, str> {
    if path.is_empty() {
        return Cow::Borrowed("/");
    }
    utf8_percent_encode(path, PATH_ESCAPE).into()
}

/// Iterate the segments of an absolute path. `/` has no segments and a
/// trailing slash yields a final empty segment (`/a/` -> `a`, ``).
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.strip_prefix('/')
        .filter(|rest| !rest.is_empty())
        .into_iter()
        .flat_map(|rest| rest.split('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_paths_are_untouched() {
        assert!(matches!(normalize("/foo%20bar"), Cow::Borrowed(_)));
        assert_eq!(normalize("/foo%2fbar"), "/foo%2fbar");
        assert_eq!(normalize("/foo%2Fbar"), "/foo%2Fbar");
    }

    #[test]
    fn literal_space_is_escaped() {
        assert_eq!(normalize("/foo bar/something"), "/foo%20bar/something");
    }

    #[test]
    fn non_ascii_is_escaped_as_utf8() {
        assert_eq!(normalize("/caf\u{e9}"), "/caf%C3%A9");
    }

    #[test]
    fn empty_path_is_root() {
        assert_eq!(normalize(""), "/");
    }

    #[test]
    fn segment_iteration() {
        assert_eq!(segments("/").count(), 0);
        assert_eq!(segments("/a/b").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(segments("/a/").collect::<Vec<_>>(), vec!["a", ""]);
        assert_eq!(segments("relative").count(), 0);
    }
}
