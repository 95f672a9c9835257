//! Input validators and name derivation helpers
//!
//! Every user-supplied identity value (app name, package identifier,
//! deep-link scheme, universal-link domain) is checked against a fixed
//! pattern before it is written into the generated project.

use regex::Regex;
use std::sync::LazyLock;

static APP_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9 _-]{2,49}$").expect("valid pattern"));

static PACKAGE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*(\.[a-z][a-z0-9]*)+$").expect("valid pattern"));

static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]{2,19}$").expect("valid pattern"));

static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9]([a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,}$").expect("valid pattern")
});

/// App names start with a letter and are 3-50 characters; letters, digits,
/// spaces, hyphens, and underscores are allowed after the first character.
pub fn is_valid_app_name(name: &str) -> bool {
    APP_NAME_RE.is_match(name)
}

/// Package identifiers are reverse-DNS: at least two dot-separated segments,
/// each a lowercase letter followed by lowercase alphanumerics.
pub fn is_valid_package_id(id: &str) -> bool {
    PACKAGE_ID_RE.is_match(id)
}

/// Deep-link schemes are 3-20 characters, lowercase alphanumeric or hyphen,
/// starting with a letter.
pub fn is_valid_scheme(scheme: &str) -> bool {
    SCHEME_RE.is_match(scheme)
}

/// Universal-link domains are one or more lowercase labels followed by an
/// alphabetic TLD of at least two characters.
pub fn is_valid_domain(domain: &str) -> bool {
    DOMAIN_RE.is_match(domain)
}

/// Derive a URL- and filename-safe slug from an app name.
///
/// Lowercases, maps spaces and underscores to hyphens, drops everything else
/// that is not alphanumeric, and collapses hyphen runs.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        let mapped = match ch {
            'A'..='Z' => Some(ch.to_ascii_lowercase()),
            'a'..='z' | '0'..='9' => Some(ch),
            ' ' | '_' | '-' => Some('-'),
            _ => None,
        };
        if let Some(c) = mapped {
            if c == '-' && slug.ends_with('-') {
                continue;
            }
            slug.push(c);
        }
    }
    slug.trim_matches('-').to_string()
}

/// Default reverse-DNS package identifier for an app name:
/// `com.` plus the slug with hyphens removed.
pub fn default_package_id(name: &str) -> String {
    format!("com.{}", slugify(name).replace('-', ""))
}

/// Default deep-link scheme for an app name: the slug truncated to the
/// scheme length limit. Falls back to `"app"` when the derived candidate
/// cannot satisfy the scheme rules.
pub fn default_scheme(name: &str) -> String {
    let mut candidate = slugify(name);
    candidate.truncate(20);
    let candidate = candidate.trim_matches('-').to_string();
    if is_valid_scheme(&candidate) {
        candidate
    } else {
        "app".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_name_accepts_typical_names() {
        assert!(is_valid_app_name("MyApp"));
        assert!(is_valid_app_name("My App 2"));
        assert!(is_valid_app_name("my-app_beta"));
    }

    #[test]
    fn test_app_name_length_bounds() {
        assert!(!is_valid_app_name("ab"));
        assert!(is_valid_app_name("abc"));
        assert!(is_valid_app_name(&format!("a{}", "b".repeat(49))));
        assert!(!is_valid_app_name(&format!("a{}", "b".repeat(50))));
    }

    #[test]
    fn test_app_name_must_start_with_letter() {
        assert!(!is_valid_app_name("1password"));
        assert!(!is_valid_app_name(" leading"));
        assert!(!is_valid_app_name("-dash"));
    }

    #[test]
    fn test_package_id_requires_two_segments() {
        assert!(!is_valid_package_id("myapp"));
        assert!(is_valid_package_id("com.myapp"));
        assert!(is_valid_package_id("com.acme.myapp"));
        assert!(is_valid_package_id("io.app2.v3"));
    }

    #[test]
    fn test_package_id_rejects_bad_segments() {
        assert!(!is_valid_package_id("Com.MyApp"));
        assert!(!is_valid_package_id("com.2fast"));
        assert!(!is_valid_package_id("com..myapp"));
        assert!(!is_valid_package_id("com.myapp."));
        assert!(!is_valid_package_id(".com.myapp"));
        assert!(!is_valid_package_id("com.my-app"));
    }

    #[test]
    fn test_scheme_rules() {
        assert!(is_valid_scheme("myapp"));
        assert!(is_valid_scheme("my-app"));
        assert!(!is_valid_scheme("my"));
        assert!(is_valid_scheme("abc"));
        assert!(!is_valid_scheme("3app"));
        assert!(!is_valid_scheme("MyApp"));
        assert!(!is_valid_scheme("a".repeat(21).as_str()));
        assert!(is_valid_scheme("a".repeat(20).as_str()));
    }

    #[test]
    fn test_domain_rules() {
        assert!(is_valid_domain("example.com"));
        assert!(is_valid_domain("links.example.co"));
        assert!(is_valid_domain("my-app.dev"));
        assert!(!is_valid_domain("example"));
        assert!(!is_valid_domain("example."));
        assert!(!is_valid_domain(".com"));
        assert!(!is_valid_domain("exa mple.com"));
        assert!(!is_valid_domain("-bad.com"));
        assert!(!is_valid_domain("example.c"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My App"), "my-app");
        assert_eq!(slugify("My  Cool_App"), "my-cool-app");
        assert_eq!(slugify("Shop! v2"), "shop-v2");
        assert_eq!(slugify("--Edge--"), "edge");
    }

    #[test]
    fn test_default_package_id() {
        assert_eq!(default_package_id("My App"), "com.myapp");
        assert_eq!(default_package_id("Shop v2"), "com.shopv2");
    }

    #[test]
    fn test_default_scheme() {
        assert_eq!(default_scheme("My App"), "my-app");
        assert_eq!(
            default_scheme("A Very Long Application Name Indeed"),
            "a-very-long-applicat"
        );
        // Derived candidate too short, falls back
        assert_eq!(default_scheme("A _"), "app");
    }
}
