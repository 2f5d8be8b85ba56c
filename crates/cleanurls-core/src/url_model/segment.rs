//! Path segment encoding and `<slug>-<id>` segments.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone when encoding a short name into a path segment.
///
/// Matches `rawurlencode`: everything except `A-Z a-z 0-9 - _ . ~` is escaped,
/// so `short#course` becomes `short%23course` and `/` can never split a name.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a short name for use as a single path segment.
pub fn encode_segment(name: &str) -> String {
    utf8_percent_encode(name, SEGMENT).to_string()
}

/// Decode a raw path segment. Invalid UTF-8 is replaced rather than rejected.
pub fn decode_segment(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Percent-encode a short name for a single path segment, or `None` when the
/// name would become a `.` or `..` segment that clients collapse away.
pub fn name_segment(name: &str) -> Option<String> {
    if name == "." || name == ".." {
        return None;
    }
    Some(encode_segment(name))
}

/// Builds a `<slug>-<id>` segment (or just `<id>` if the name slugs to nothing).
///
/// Used for categories and course modules, whose names need not be unique;
/// the id suffix is what identifies them.
pub fn slug_segment(name: &str, id: i64) -> String {
    let slug = slug::slugify(name);
    if slug.is_empty() {
        id.to_string()
    } else {
        format!("{slug}-{id}")
    }
}

/// Extracts the id from a `<slug>-<id>` segment.
pub fn id_from_slug_segment(segment: &str) -> Option<i64> {
    let tail = match segment.rsplit_once('-') {
        Some((_, tail)) => tail,
        None => segment,
    };
    if tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    tail.parse::<i64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_hash_and_slash() {
        assert_eq!(encode_segment("short#course"), "short%23course");
        assert_eq!(encode_segment("a/b"), "a%2Fb");
        assert_eq!(encode_segment("Full!course@name"), "Full%21course%40name");
    }

    #[test]
    fn keeps_unreserved_characters() {
        assert_eq!(encode_segment("abc-DEF_1.2~x"), "abc-DEF_1.2~x");
    }

    #[test]
    fn encodes_spaces_and_non_ascii() {
        assert_eq!(encode_segment("a b"), "a%20b");
        assert_eq!(encode_segment("café"), "caf%C3%A9");
        assert_eq!(decode_segment("caf%C3%A9"), "café");
    }

    #[test]
    fn dot_names_have_no_segment() {
        assert_eq!(name_segment("."), None);
        assert_eq!(name_segment(".."), None);
        assert_eq!(name_segment("..."), Some("...".to_string()));
        assert_eq!(name_segment("a.b"), Some("a.b".to_string()));
    }

    #[test]
    fn slug_segment_collapses_punctuation() {
        assert_eq!(slug_segment("Computer Science", 4), "computer-science-4");
        assert_eq!(slug_segment("  A!test@FORUM#5 ", 9), "a-test-forum-5-9");
        assert_eq!(slug_segment("sciences", 3), "sciences-3");
        assert_eq!(slug_segment("???", 7), "7");
    }

    #[test]
    fn id_comes_from_the_last_dash() {
        assert_eq!(id_from_slug_segment("sciences-3"), Some(3));
        assert_eq!(id_from_slug_segment("a-test-forum-5-12"), Some(12));
        assert_eq!(id_from_slug_segment("7"), Some(7));
        assert_eq!(id_from_slug_segment("sciences"), None);
        assert_eq!(id_from_slug_segment("sciences-"), None);
        assert_eq!(id_from_slug_segment("x-+4"), None);
        assert_eq!(id_from_slug_segment("x-0"), None);
    }
}
