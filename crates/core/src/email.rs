//! Structural email checks and extraction from free text.

use std::sync::OnceLock;

use regex_lite::Regex;

/// Anchored pattern: local-part@domain with an alphabetic top-level segment.
fn address_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("valid email regex")
    })
}

/// Unanchored variant used to pull addresses out of page bodies.
fn embedded_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}")
            .expect("valid email regex")
    })
}

/// File extensions that look like a TLD but come from asset names such as
/// `logo@2x.png`.
const ASSET_SUFFIXES: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".ico", ".css", ".js",
];

/// Structural validity check. No DNS or network access.
pub fn is_valid_email(s: &str) -> bool {
    let s = s.trim();
    if !address_pattern().is_match(s) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && !domain.split('.').any(|label| label.starts_with('-') || label.ends_with('-'))
}

/// The portion of an address before `@`.
pub fn local_part(address: &str) -> &str {
    address.split('@').next().unwrap_or(address)
}

/// Extract distinct, valid, lowercased addresses from a page body in order of
/// first appearance. `mailto:` links are covered by the same pattern.
pub fn extract_emails(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for m in embedded_pattern().find_iter(text) {
        let candidate = m.as_str().trim_matches('.').to_lowercase();
        if ASSET_SUFFIXES.iter().any(|ext| candidate.ends_with(ext)) {
            continue;
        }
        if is_valid_email(&candidate) && !found.contains(&candidate) {
            found.push(candidate);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_simple_addresses() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("jane.doe+gh@mail.example.org"));
        assert!(is_valid_email("12345+octocat@users.noreply.github.com"));
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@b.c"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane..doe@example.com"));
        assert!(!is_valid_email(".jane@example.com"));
        assert!(!is_valid_email("jane@-example.com"));
        assert!(!is_valid_email("jane doe@example.com"));
    }

    #[test]
    fn test_local_part() {
        assert_eq!(local_part("jane.doe@example.com"), "jane.doe");
        assert_eq!(local_part("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn test_extract_from_html() {
        let html = r#"
            <p>Reach me at <a href="mailto:Jane@Example.com">Jane@Example.com</a>.</p>
            <img src="/img/logo@2x.png">
            <footer>press@example.org</footer>
        "#;
        assert_eq!(
            extract_emails(html),
            vec!["jane@example.com".to_string(), "press@example.org".to_string()]
        );
    }

    #[test]
    fn test_extract_nothing() {
        assert!(extract_emails("<html><body>no contact here</body></html>").is_empty());
    }
}
