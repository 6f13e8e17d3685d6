// Filename extraction from Content-Disposition

use std::sync::OnceLock;

use regex::Regex;

fn filename_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // `filename`, optional suffix such as `*`, then a double-quoted,
        // single-quoted or bare value
        Regex::new(r#"filename[^;=\n]*=("[^"]*"|'[^']*'|[^;\n]*)"#)
            .expect("filename pattern is valid")
    })
}

/// Pull the suggested filename out of a Content-Disposition value.
///
/// Takes the first `filename...=` token and removes every quote character
/// from its value. Returns an empty string when there is no usable token,
/// so callers can fall back to a default name.
pub fn extract_filename(content_disposition: &str) -> String {
    filename_pattern()
        .captures(content_disposition)
        .and_then(|caps| caps.get(1))
        .map(|value| value.as_str().replace(['"', '\''], ""))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_filename() {
        assert_eq!(
            extract_filename("attachment; filename=\"converted.xlsx\""),
            "converted.xlsx"
        );
    }

    #[test]
    fn test_bare_filename() {
        assert_eq!(extract_filename("attachment; filename=converted.xlsx"), "converted.xlsx");
    }

    #[test]
    fn test_single_quoted_filename() {
        assert_eq!(extract_filename("attachment; filename='report.xlsx'"), "report.xlsx");
    }

    #[test]
    fn test_filename_followed_by_params() {
        assert_eq!(
            extract_filename("attachment; filename=data.xlsx; size=1024"),
            "data.xlsx"
        );
    }

    #[test]
    fn test_quoted_value_may_contain_semicolon() {
        assert_eq!(extract_filename("attachment; filename=\"a;b.xlsx\""), "a;b.xlsx");
    }

    #[test]
    fn test_extended_filename_is_taken_verbatim() {
        // Quotes are stripped but the charset prefix is not decoded
        assert_eq!(
            extract_filename("attachment; filename*=UTF-8''data.xlsx"),
            "UTF-8data.xlsx"
        );
    }

    #[test]
    fn test_first_token_wins() {
        assert_eq!(
            extract_filename("attachment; filename=\"first.xlsx\"; filename*=UTF-8''second.xlsx"),
            "first.xlsx"
        );
    }

    #[test]
    fn test_no_filename_token() {
        assert_eq!(extract_filename("attachment"), "");
        assert_eq!(extract_filename("inline; name=\"x\""), "");
    }

    #[test]
    fn test_empty_header() {
        assert_eq!(extract_filename(""), "");
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(extract_filename("attachment; filename="), "");
        assert_eq!(extract_filename("attachment; filename=\"\""), "");
    }
}
