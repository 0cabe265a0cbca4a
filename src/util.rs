/// Truncates on a char boundary to at most `max` characters
///
/// Used both for response snippets and for log output; upstream bodies are
/// arbitrary HTML, so byte slicing is not safe.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_chars("hola", 10), "hola");
        assert_eq!(truncate_chars("hola", 4), "hola");
    }

    #[test]
    fn long_text_is_cut_at_char_boundary() {
        assert_eq!(truncate_chars("ñandú ñandú", 6), "ñandú ");
    }
}
