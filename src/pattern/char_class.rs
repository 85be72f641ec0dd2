//! Character comparison and search helpers.
//!
//! Positions are byte offsets into `&str`; counts are in characters.
//! Case-insensitive comparison folds one character at a time, so matched
//! lengths are always reported in the haystack's own bytes.

use std::iter;

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Test whether two characters are equal under the given case mode.
pub fn chars_eq(a: char, b: char, nocase: bool) -> bool {
    a == b || (nocase && fold(a) == fold(b))
}

/// Test whether `c` is a member of the character set `set`.
pub fn set_contains(set: &str, c: char, nocase: bool) -> bool {
    set.chars().any(|member| chars_eq(member, c, nocase))
}

/// If `text` starts with `prefix`, return the byte length of that prefix in `text`.
pub fn prefix_len(text: &str, prefix: &str, nocase: bool) -> Option<usize> {
    let mut chars = text.char_indices();
    for expected in prefix.chars() {
        let (_, c) = chars.next()?;
        if !chars_eq(c, expected, nocase) {
            return None;
        }
    }
    Some(chars.next().map_or(text.len(), |(i, _)| i))
}

/// If `text` ends with `suffix`, return the byte offset where it starts.
pub fn suffix_start(text: &str, suffix: &str, nocase: bool) -> Option<usize> {
    let mut chars = text.char_indices().rev();
    let mut start = text.len();
    for expected in suffix.chars().rev() {
        let (i, c) = chars.next()?;
        if !chars_eq(c, expected, nocase) {
            return None;
        }
        start = i;
    }
    Some(start)
}

pub fn text_eq(a: &str, b: &str, nocase: bool) -> bool {
    prefix_len(a, b, nocase) == Some(a.len())
}

/// Find the first occurrence of `needle` at or after byte `from`.
///
/// Returns the byte range of the occurrence.
pub fn find(haystack: &str, needle: &str, from: usize, nocase: bool) -> Option<(usize, usize)> {
    let tail = haystack.get(from..)?;
    if !nocase {
        return tail
            .find(needle)
            .map(|i| (from + i, from + i + needle.len()));
    }
    boundaries(tail).find_map(|i| {
        prefix_len(&tail[i..], needle, true).map(|len| (from + i, from + i + len))
    })
}

/// Replace every non-overlapping occurrence of `from` with `to`.
pub fn replace_all(text: &str, from: &str, to: &str, nocase: bool) -> String {
    if from.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    while let Some((start, end)) = find(text, from, cursor, nocase) {
        out.push_str(&text[cursor..start]);
        out.push_str(to);
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Byte offset reached by advancing `count` characters from byte `from`.
pub fn advance(text: &str, from: usize, count: usize) -> Option<usize> {
    let tail = text.get(from..)?;
    boundaries(tail).nth(count).map(|i| from + i)
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Every char boundary of `text`, including its end.
fn boundaries(text: &str) -> impl Iterator<Item = usize> + '_ {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(iter::once(text.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nocase_equality() {
        assert!(chars_eq('a', 'A', true));
        assert!(!chars_eq('a', 'A', false));
        assert!(chars_eq('É', 'é', true));
    }

    #[test]
    fn prefix_and_suffix() {
        assert_eq!(prefix_len("Hello world", "hello", true), Some(5));
        assert_eq!(prefix_len("Hello world", "hello", false), None);
        assert_eq!(prefix_len("hi", "hello", false), None);
        assert_eq!(suffix_start("Hello world", "WORLD", true), Some(6));
        assert_eq!(suffix_start("Hello world", "", true), Some(11));
    }

    #[test]
    fn find_respects_start_and_case() {
        assert_eq!(find("abcabc", "bc", 0, false), Some((1, 3)));
        assert_eq!(find("abcabc", "bc", 2, false), Some((4, 6)));
        assert_eq!(find("abcABC", "BC", 0, true), Some((1, 3)));
        assert_eq!(find("abc", "x", 0, true), None);
        assert_eq!(find("abc", "", 3, true), Some((3, 3)));
    }

    #[test]
    fn find_multibyte() {
        assert_eq!(find("héllo wörld", "Wö", 0, true), Some((7, 10)));
    }

    #[test]
    fn replace_all_occurrences() {
        assert_eq!(replace_all("a-b-c", "-", "+", false), "a+b+c");
        assert_eq!(replace_all("Foo foo", "FOO", "x", true), "x x");
        assert_eq!(replace_all("abc", "", "x", false), "abc");
    }

    #[test]
    fn advance_counts_chars() {
        assert_eq!(advance("héllo", 0, 2), Some(3));
        assert_eq!(advance("héllo", 0, 5), Some(6));
        assert_eq!(advance("héllo", 0, 6), None);
        assert_eq!(advance("héllo", 3, 0), Some(3));
    }

    #[test]
    fn set_membership() {
        assert!(set_contains("<>[]", '>', false));
        assert!(!set_contains("abc", 'B', false));
        assert!(set_contains("abc", 'B', true));
    }
}
