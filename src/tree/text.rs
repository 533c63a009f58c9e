//! Character-offset helpers.
//!
//! All offsets in the tree count Unicode scalar values, not bytes.

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte index of the `char_idx`-th character, clamped to the string end.
pub fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

pub fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let start = byte_index(s, start);
    let end = byte_index(s, end).max(start);
    &s[start..end]
}

/// Insert `text` at character offset `at` (clamped).
pub fn splice(s: &str, at: usize, text: &str) -> String {
    let at = byte_index(s, at);
    let mut out = String::with_capacity(s.len() + text.len());
    out.push_str(&s[..at]);
    out.push_str(text);
    out.push_str(&s[at..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_index_counts_chars() {
        assert_eq!(byte_index("héllo", 2), 3);
        assert_eq!(byte_index("héllo", 99), 6);
    }

    #[test]
    fn test_char_slice_handles_multibyte() {
        assert_eq!(char_slice("añob", 1, 3), "ño");
        assert_eq!(char_slice("abc", 2, 1), "");
    }

    #[test]
    fn test_splice_inserts_at_char_offset() {
        assert_eq!(splice("día", 1, "X"), "dXía");
        assert_eq!(splice("ab", 5, "c"), "abc");
    }
}
