//! Validation utilities and regex patterns

use regex::Regex;
use std::sync::LazyLock;
use validator::ValidationError;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #FF0000)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Validate an API endpoint URL
pub fn validate_api_url(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("empty_api_url"));
    }

    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::new("invalid_api_url")),
    }
}

/// Validate file path (basic check for valid path characters)
pub fn validate_file_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::new("empty_file_path"));
    }

    // Note: Colon is allowed for Windows drive letters (C:\)
    let invalid_chars = ['<', '>', '"', '|', '?', '*'];
    if path.chars().any(|c| invalid_chars.contains(&c)) {
        return Err(ValidationError::new("invalid_file_path_characters"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_regex() {
        // Valid hex colors
        assert!(HEX_COLOR_REGEX.is_match("#FFFFFF"));
        assert!(HEX_COLOR_REGEX.is_match("#000000"));
        assert!(HEX_COLOR_REGEX.is_match("#2E51A2"));
        assert!(HEX_COLOR_REGEX.is_match("#abc123"));
        assert!(HEX_COLOR_REGEX.is_match("#ABC123"));

        // Invalid hex colors
        assert!(!HEX_COLOR_REGEX.is_match("FFFFFF"));   // Missing #
        assert!(!HEX_COLOR_REGEX.is_match("#FFF"));     // Too short
        assert!(!HEX_COLOR_REGEX.is_match("#FFFFFFF")); // Too long
        assert!(!HEX_COLOR_REGEX.is_match("#GGGGGG"));  // Invalid characters
        assert!(!HEX_COLOR_REGEX.is_match("#FF FF F")); // Spaces
        assert!(!HEX_COLOR_REGEX.is_match(""));         // Empty
    }

    #[test]
    fn test_validate_api_url() {
        // Valid URLs
        assert!(validate_api_url("https://graphql.anilist.co").is_ok());
        assert!(validate_api_url("http://localhost:8080/graphql").is_ok());
        assert!(validate_api_url("https://example.com/api/v2").is_ok());

        // Invalid URLs
        assert!(validate_api_url("").is_err());                    // Empty
        assert!(validate_api_url("not_a_url").is_err());           // No scheme
        assert!(validate_api_url("ftp://example.com").is_err());   // Wrong scheme
        assert!(validate_api_url("graphql.anilist.co").is_err());  // Missing scheme
    }

    #[test]
    fn test_validate_file_path() {
        // Valid file paths
        assert!(validate_file_path("/var/log/aniwrap.log").is_ok());
        assert!(validate_file_path("./charts").is_ok());
        assert!(validate_file_path("C:\\Users\\me\\charts").is_ok());
        assert!(validate_file_path("aniwrap.log").is_ok());

        // Invalid file paths
        assert!(validate_file_path("").is_err());               // Empty
        assert!(validate_file_path("file<name.txt").is_err());  // Invalid character <
        assert!(validate_file_path("file>name.txt").is_err());  // Invalid character >
        assert!(validate_file_path("file|name.txt").is_err());  // Invalid character |
        assert!(validate_file_path("file?name.txt").is_err());  // Invalid character ?
        assert!(validate_file_path("file*name.txt").is_err());  // Invalid character *
    }
}
