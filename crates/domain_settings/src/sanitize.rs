//! Input sanitisation for values posted from the settings form

/// Cleans a single-line text value
///
/// Line breaks, tabs and other control characters are removed, runs of
/// whitespace collapse to one space, and the result is trimmed.
pub fn sanitize_text_field(input: &str) -> String {
    input
        .split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cleans a multi-line text value
///
/// Newlines and tabs survive; every other control character is dropped and
/// the whole value is trimmed.
pub fn sanitize_textarea_field(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_field_trims_and_collapses() {
        assert_eq!(sanitize_text_field("  pat-na1-abc \n"), "pat-na1-abc");
        assert_eq!(sanitize_text_field("a\t\tb\r\nc"), "a b c");
        assert_eq!(sanitize_text_field("x\u{0007}y"), "x y");
        assert_eq!(sanitize_text_field("   "), "");
    }

    #[test]
    fn test_textarea_keeps_newlines() {
        let input = "\n{\n\t\"email\": \"email\"\u{0000}\n}\n";
        assert_eq!(sanitize_textarea_field(input), "{\n\t\"email\": \"email\"\n}");
    }
}
