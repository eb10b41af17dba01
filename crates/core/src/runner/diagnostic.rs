//! Picks the line of tool stderr worth showing to a user.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Fallback excerpt length when no line looks like an error.
pub const EXCERPT_LEN: usize = 300;

static ERROR_LINE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i)error|invalid").ok());

/// Returns the last stderr line mentioning an error, else the start of the
/// output. `None` when stderr is blank.
pub fn extract_diagnostic(stderr: &str) -> Option<String> {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(re) = ERROR_LINE.as_ref() {
        if let Some(line) = trimmed
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| re.is_match(line))
        {
            return Some(line.to_string());
        }
    }

    Some(trimmed.chars().take(EXCERPT_LEN).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_error_line_wins() {
        let stderr = "Input #0, matroska\n\
                      [mp3 @ 0x1] error while decoding\n\
                      Stream mapping:\n\
                      Conversion failed: Invalid argument\n\
                      bye\n";
        assert_eq!(
            extract_diagnostic(stderr),
            Some("Conversion failed: Invalid argument".to_string())
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            extract_diagnostic("ok\nERROR: no such file\n"),
            Some("ERROR: no such file".to_string())
        );
    }

    #[test]
    fn test_falls_back_to_excerpt() {
        let long = "x".repeat(EXCERPT_LEN + 50);
        assert_eq!(extract_diagnostic(&long).unwrap().len(), EXCERPT_LEN);
        assert_eq!(
            extract_diagnostic("  just a warning  "),
            Some("just a warning".to_string())
        );
    }

    #[test]
    fn test_blank_is_none() {
        assert_eq!(extract_diagnostic(" \n\t"), None);
    }
}
