//! Char-boundary arithmetic for caret offsets.
//!
//! Selection offsets inside text nodes are UTF-8 byte offsets. Everything
//! that moves or splices at an offset goes through these helpers so a caret
//! never lands inside a multi-byte char.

use std::borrow::Cow;

/// Moves `index` back to the nearest char boundary, clamped to `s.len()`.
///
/// ```
/// use editor::clamp_to_char_boundary;
///
/// let s = "añb"; // 'ñ' is 2 bytes
/// assert_eq!(clamp_to_char_boundary(s, 2), 1);
/// assert_eq!(clamp_to_char_boundary(s, 3), 3);
/// assert_eq!(clamp_to_char_boundary(s, 99), 4);
/// ```
#[inline]
pub fn clamp_to_char_boundary(s: &str, index: usize) -> usize {
    let mut index = index.min(s.len());
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Start of the char before `i`, or 0.
pub fn prev_char_boundary(s: &str, i: usize) -> usize {
    let i = clamp_to_char_boundary(s, i);
    s[..i].char_indices().next_back().map(|(idx, _)| idx).unwrap_or(0)
}

/// End of the char starting at `i`, or `s.len()`.
pub fn next_char_boundary(s: &str, i: usize) -> usize {
    let i = clamp_to_char_boundary(s, i);
    s[i..].chars().next().map(|c| i + c.len_utf8()).unwrap_or(s.len())
}

/// CRLF and lone CR become LF.
pub fn normalize_newlines(s: &str) -> Cow<'_, str> {
    if !s.contains('\r') {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Replaces `start..end` (clamped, in either order) with `insert`.
/// Returns the new text and the offset just past the insertion.
pub fn splice(s: &str, start: usize, end: usize, insert: &str) -> (String, usize) {
    let a = clamp_to_char_boundary(s, start.min(end));
    let b = clamp_to_char_boundary(s, start.max(end));
    let mut out = String::with_capacity(s.len() - (b - a) + insert.len());
    out.push_str(&s[..a]);
    out.push_str(insert);
    out.push_str(&s[b..]);
    (out, a + insert.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_step_over_whole_chars() {
        let s = "a€b";
        assert_eq!(prev_char_boundary(s, 5), 4);
        assert_eq!(prev_char_boundary(s, 4), 1);
        assert_eq!(prev_char_boundary(s, 0), 0);
        assert_eq!(next_char_boundary(s, 1), 4);
        assert_eq!(next_char_boundary(s, 5), 5);
        assert_eq!(next_char_boundary(s, 2), 4);
    }

    #[test]
    fn newlines_normalize() {
        assert!(matches!(normalize_newlines("a\nb"), Cow::Borrowed(_)));
        assert_eq!(normalize_newlines("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn splice_replaces_and_reports_caret() {
        assert_eq!(splice("hello", 5, 5, "!"), ("hello!".to_string(), 6));
        assert_eq!(splice("hello", 4, 1, "EL"), ("hELo".to_string(), 3));
        assert_eq!(splice("a€b", 2, 2, "x"), ("ax€b".to_string(), 2));
    }
}
