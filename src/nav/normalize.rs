//! Label text normalization.

/// Collapses whitespace runs to a single space, trims both ends, and
/// lowercases.
///
/// Used for every label comparison so that markup formatting (line breaks,
/// indentation, capitalisation) never causes a false negative.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn collapses_inner_whitespace() {
        assert_eq!(normalize("Tour\n      Packages"), "tour packages");
    }

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(normalize("  \tAbout US  "), "about us");
    }

    #[test]
    fn empty_and_blank_inputs_become_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn is_idempotent() {
        for input in ["  Tailor-made   Tours ", "ETHIOPIA", "a\u{a0}b", "Contact\n", ""] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input:?}");
        }
    }
}
