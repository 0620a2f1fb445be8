//! Truncated previews of non-sensitive strings.

use std::borrow::Cow;

/// Joins the head and tail of a shortened preview.
pub const PREVIEW_ELLIPSIS: char = '…';

/// Shorten `value` to `head + "…" + tail`, each half `window / 2` characters.
///
/// Values of at most `window` characters are returned as-is. Lengths are
/// counted in `char`s, so a preview never splits a UTF-8 sequence.
///
/// A preview bounds log verbosity; it does not hide anything. A short secret
/// under a key the vocabulary does not recognize is logged verbatim.
pub fn preview(value: &str, window: usize) -> Cow<'_, str> {
    if value.chars().count() <= window {
        return Cow::Borrowed(value);
    }

    let half = window / 2;
    let head_end = value
        .char_indices()
        .nth(half)
        .map_or(value.len(), |(idx, _)| idx);
    let tail_start = if half == 0 {
        value.len()
    } else {
        value
            .char_indices()
            .rev()
            .nth(half - 1)
            .map_or(0, |(idx, _)| idx)
    };

    let mut out =
        String::with_capacity(head_end + PREVIEW_ELLIPSIS.len_utf8() + value.len() - tail_start);
    out.push_str(&value[..head_end]);
    out.push(PREVIEW_ELLIPSIS);
    out.push_str(&value[tail_start..]);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_value_unchanged() {
        assert_eq!(preview("short", 16), "short");
        assert!(matches!(preview("short", 16), Cow::Borrowed(_)));
    }

    #[test]
    fn test_exactly_window_unchanged() {
        assert_eq!(preview("0123456789abcdef", 16), "0123456789abcdef");
    }

    #[test]
    fn test_long_value_head_and_tail() {
        assert_eq!(
            preview("abcdefghijklmnopqrstuvwxyz", 16),
            "abcdefgh…stuvwxyz"
        );
    }

    #[test]
    fn test_one_over_window() {
        assert_eq!(preview("0123456789abcdefg", 16), "01234567…9abcdefg");
    }

    #[test]
    fn test_multibyte_boundaries() {
        let value = "ääääääääääööööööööööü";
        let out = preview(value, 16);
        assert_eq!(out, "ääääääää…öööööööü");
    }

    #[test]
    fn test_preview_is_stable() {
        let once = preview("abcdefghijklmnopqrstuvwxyz", 16).into_owned();
        assert_eq!(preview(&once, 16), once);
    }

    #[test]
    fn test_odd_window() {
        assert_eq!(preview("abcdefghijklmnop", 15), "abcdefg…jklmnop");
    }

    #[test]
    fn test_empty() {
        assert_eq!(preview("", 16), "");
    }
}
