/// Case-insensitive substring test. An empty needle matches anything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Leanne Graham", "graham"));
        assert!(contains_ignore_case("Leanne Graham", "LEANNE"));
        assert!(contains_ignore_case("Leanne Graham", "nne gr"));
        assert!(!contains_ignore_case("Leanne Graham", "bret"));
        // Empty needle matches everything
        assert!(contains_ignore_case("anything", ""));
        assert!(contains_ignore_case("", ""));
        assert!(!contains_ignore_case("", "x"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
    }
}
