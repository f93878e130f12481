// src/utils.rs

/// Collapse newlines and runs of whitespace into single spaces.
pub fn clean_text(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a user id for file system usage
pub fn normalize_user_id(id: &str) -> String {
    id.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(
            clean_text("  Senior\n  Rust   Engineer  "),
            "Senior Rust Engineer"
        );
        assert_eq!(clean_text("\n\n"), "");
        assert_eq!(clean_text("one\ntwo\tthree"), "one two three");
    }

    #[test]
    fn test_normalize_user_id() {
        assert_eq!(normalize_user_id("User One"), "user_one");
        assert_eq!(normalize_user_id("u-123_a"), "u-123_a");
        assert_eq!(normalize_user_id("user@mail"), "user_mail");
    }
}
