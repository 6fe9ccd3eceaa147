//! Bounding extracted text to the model's input window.

/// Keep at most `max_chars` characters from the start of `text`.
///
/// The cut lands on the last whitespace at or before the bound so words stay
/// whole; only a prefix with no whitespace at all is cut mid-word. Lengths
/// are counted in `char`s, never bytes.
pub fn truncate(text: &str, max_chars: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };

    let (head, rest) = text.split_at(cut);

    // The bound already sits on a word boundary.
    if rest.starts_with(char::is_whitespace) {
        return head.trim_end().to_string();
    }

    match head.rfind(char::is_whitespace) {
        Some(boundary) => head[..boundary].trim_end().to_string(),
        None => head.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(truncate("hello world", 100), "hello world");
        assert_eq!(truncate("hello world", 11), "hello world");
        assert_eq!(truncate("", 5), "");
    }

    #[test]
    fn test_cuts_at_last_whitespace() {
        assert_eq!(truncate("hello wonderful world", 12), "hello");
        assert_eq!(truncate("one two three four", 9), "one two");
    }

    #[test]
    fn test_bound_on_word_boundary_keeps_last_word() {
        // the character right after the bound is a space
        assert_eq!(truncate("hello world again", 11), "hello world");
    }

    #[test]
    fn test_single_long_word_is_hard_cut() {
        assert_eq!(truncate("supercalifragilistic", 5), "super");
    }

    #[test]
    fn test_zero_bound() {
        assert_eq!(truncate("anything", 0), "");
    }

    #[test]
    fn test_multibyte_text_counts_chars() {
        let text = "ünïcödé wörds ëvérywhere";
        let out = truncate(text, 10);
        assert_eq!(out, "ünïcödé");
        assert!(out.chars().count() <= 10);
    }

    #[test]
    fn test_never_exceeds_bound_and_never_splits_words() {
        let text = "The quick brown fox jumps over the lazy dog while the cat watches quietly";
        let words: Vec<&str> = text.split_whitespace().collect();

        for bound in 0..=text.len() + 5 {
            let out = truncate(text, bound);
            assert!(out.chars().count() <= bound, "bound {bound} gave {out:?}");
            assert!(text.starts_with(&out));
            if bound >= 3 {
                // whitespace is available before every bound past the first word
                for word in out.split_whitespace() {
                    assert!(words.contains(&word), "split word {word:?} at bound {bound}");
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "alpha beta gamma delta epsilon";
        assert_eq!(truncate(text, 14), truncate(text, 14));
    }
}
