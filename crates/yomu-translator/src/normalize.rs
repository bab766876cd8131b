use unicode_normalization::UnicodeNormalization;

/// Canonicalize OCR output before caching and sending.
///
/// NFKC normalization, then newlines and runs of whitespace collapse
/// to single spaces, then trim. This exact transform defines cache-key
/// equality, so any change here invalidates cached translations.
pub fn normalize(text: &str) -> String {
    let text: String = text.trim().nfkc().collect();

    let mut out = String::with_capacity(text.len());
    let mut in_whitespace = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            in_whitespace = true;
        } else {
            if in_whitespace && !out.is_empty() {
                out.push(' ');
            }
            in_whitespace = false;
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn collapses_newlines_and_runs() {
        assert_eq!(normalize("hello\nworld"), "hello world");
        assert_eq!(normalize("a  \t b\r\n  c"), "a b c");
    }

    #[test]
    fn trims_edges() {
        assert_eq!(normalize("  spaced  "), "spaced");
        assert_eq!(normalize("\n\n"), "");
    }

    #[test]
    fn applies_nfkc() {
        // Full-width latin compat characters fold to ASCII under NFKC
        assert_eq!(normalize("ＡＢＣ"), "ABC");
    }

    #[test]
    fn identical_after_reflow_means_identical_key() {
        assert_eq!(normalize("line one\nline two"), normalize("line one line two"));
    }
}
