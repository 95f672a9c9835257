//! app.json (Expo manifest) editing
//!
//! All edits happen under the `expo` root object: identity fields, stripping
//! of author-account fields carried over from the scaffolder, platform
//! package identifiers, the deep-link scheme, and universal links.

use crate::error::ManifestError;
use serde_json::{json, Map, Value};

/// Author-account fields the scaffolder may leave behind; never valid for a
/// freshly provisioned project.
const STRIPPED_FIELDS: &[&str] = &["owner", "extra", "updates"];

fn expo_root(doc: &mut Value) -> Result<&mut Map<String, Value>, ManifestError> {
    doc.as_object_mut()
        .ok_or(ManifestError::NotAnObject)?
        .get_mut("expo")
        .and_then(Value::as_object_mut)
        .ok_or(ManifestError::MissingExpoRoot)
}

/// Get or create a nested object under `key`; a non-object value is replaced
fn ensure_object<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let entry = map.entry(key.to_string()).or_insert_with(|| json!({}));
    if !entry.is_object() {
        *entry = json!({});
    }
    entry.as_object_mut().expect("entry was just made an object")
}

fn ensure_array<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Vec<Value> {
    let entry = map.entry(key.to_string()).or_insert_with(|| json!([]));
    if !entry.is_array() {
        *entry = json!([]);
    }
    entry.as_array_mut().expect("entry was just made an array")
}

/// Set the display name and slug
pub fn set_identity(doc: &mut Value, app_name: &str, slug: &str) -> Result<(), ManifestError> {
    let expo = expo_root(doc)?;
    expo.insert("name".to_string(), Value::String(app_name.to_string()));
    expo.insert("slug".to_string(), Value::String(slug.to_string()));
    Ok(())
}

/// Remove author-account fields. Returns the names actually removed.
pub fn strip_account_fields(doc: &mut Value) -> Result<Vec<&'static str>, ManifestError> {
    let expo = expo_root(doc)?;
    let mut removed = Vec::new();
    for field in STRIPPED_FIELDS {
        if expo.remove(*field).is_some() {
            removed.push(*field);
        }
    }
    Ok(removed)
}

/// Write the package identifier for both platforms, creating the `ios` and
/// `android` objects when absent.
pub fn set_package_identifiers(doc: &mut Value, package_id: &str) -> Result<(), ManifestError> {
    let expo = expo_root(doc)?;

    let ios = ensure_object(expo, "ios");
    ios.insert(
        "bundleIdentifier".to_string(),
        Value::String(package_id.to_string()),
    );

    let android = ensure_object(expo, "android");
    android.insert("package".to_string(), Value::String(package_id.to_string()));

    Ok(())
}

/// Set the custom deep-link scheme
pub fn set_scheme(doc: &mut Value, scheme: &str) -> Result<(), ManifestError> {
    let expo = expo_root(doc)?;
    expo.insert("scheme".to_string(), Value::String(scheme.to_string()));
    Ok(())
}

/// Enable HTTPS-based app invocation for a domain: an `applinks:` entry in
/// `ios.associatedDomains` and an auto-verified VIEW intent filter in
/// `android.intentFilters`. Both additions are idempotent per domain.
pub fn add_universal_links(doc: &mut Value, domain: &str) -> Result<(), ManifestError> {
    let expo = expo_root(doc)?;

    let ios = ensure_object(expo, "ios");
    let associated = ensure_array(ios, "associatedDomains");
    let applink = Value::String(format!("applinks:{}", domain));
    if !associated.contains(&applink) {
        associated.push(applink);
    }

    let android = ensure_object(expo, "android");
    let filters = ensure_array(android, "intentFilters");
    if !filters.iter().any(|f| filter_matches_domain(f, domain)) {
        filters.push(intent_filter(domain));
    }

    Ok(())
}

fn intent_filter(domain: &str) -> Value {
    json!({
        "action": "VIEW",
        "autoVerify": true,
        "data": [
            { "scheme": "https", "host": domain }
        ],
        "category": ["BROWSABLE", "DEFAULT"]
    })
}

fn filter_matches_domain(filter: &Value, domain: &str) -> bool {
    filter["data"]
        .as_array()
        .map(|entries| entries.iter().any(|d| d["host"] == domain))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scaffolded_app_json() -> Value {
        json!({
            "expo": {
                "name": "placeholder",
                "slug": "placeholder",
                "version": "1.0.0",
                "owner": "template-author",
                "extra": { "eas": { "projectId": "abc123" } },
                "updates": { "url": "https://u.expo.dev/abc123" },
                "ios": { "supportsTablet": true }
            }
        })
    }

    #[test]
    fn test_set_identity() {
        let mut doc = scaffolded_app_json();
        set_identity(&mut doc, "My App", "my-app").unwrap();
        assert_eq!(doc["expo"]["name"], "My App");
        assert_eq!(doc["expo"]["slug"], "my-app");
    }

    #[test]
    fn test_strip_account_fields() {
        let mut doc = scaffolded_app_json();
        let removed = strip_account_fields(&mut doc).unwrap();
        assert_eq!(removed, vec!["owner", "extra", "updates"]);
        assert!(doc["expo"].get("owner").is_none());
        assert!(doc["expo"].get("extra").is_none());
        // Unrelated fields survive
        assert_eq!(doc["expo"]["version"], "1.0.0");
    }

    #[test]
    fn test_strip_is_idempotent() {
        let mut doc = scaffolded_app_json();
        strip_account_fields(&mut doc).unwrap();
        let removed = strip_account_fields(&mut doc).unwrap();
        assert!(removed.is_empty());
    }

    #[test]
    fn test_set_package_identifiers_creates_platform_objects() {
        let mut doc = json!({ "expo": { "name": "x" } });
        set_package_identifiers(&mut doc, "com.acme.myapp").unwrap();
        assert_eq!(doc["expo"]["ios"]["bundleIdentifier"], "com.acme.myapp");
        assert_eq!(doc["expo"]["android"]["package"], "com.acme.myapp");
    }

    #[test]
    fn test_set_package_identifiers_preserves_platform_fields() {
        let mut doc = scaffolded_app_json();
        set_package_identifiers(&mut doc, "com.acme.myapp").unwrap();
        assert_eq!(doc["expo"]["ios"]["supportsTablet"], true);
        assert_eq!(doc["expo"]["ios"]["bundleIdentifier"], "com.acme.myapp");
    }

    #[test]
    fn test_set_scheme() {
        let mut doc = scaffolded_app_json();
        set_scheme(&mut doc, "my-app").unwrap();
        assert_eq!(doc["expo"]["scheme"], "my-app");
    }

    #[test]
    fn test_add_universal_links() {
        let mut doc = scaffolded_app_json();
        add_universal_links(&mut doc, "example.com").unwrap();

        let domains = doc["expo"]["ios"]["associatedDomains"].as_array().unwrap();
        assert_eq!(domains, &vec![json!("applinks:example.com")]);

        let filters = doc["expo"]["android"]["intentFilters"].as_array().unwrap();
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0]["action"], "VIEW");
        assert_eq!(filters[0]["autoVerify"], true);
        assert_eq!(filters[0]["data"][0]["host"], "example.com");
        assert_eq!(filters[0]["category"], json!(["BROWSABLE", "DEFAULT"]));
    }

    #[test]
    fn test_add_universal_links_is_idempotent() {
        let mut doc = scaffolded_app_json();
        add_universal_links(&mut doc, "example.com").unwrap();
        add_universal_links(&mut doc, "example.com").unwrap();

        assert_eq!(
            doc["expo"]["ios"]["associatedDomains"].as_array().unwrap().len(),
            1
        );
        assert_eq!(
            doc["expo"]["android"]["intentFilters"].as_array().unwrap().len(),
            1
        );
    }

    #[test]
    fn test_missing_expo_root() {
        let mut doc = json!({ "name": "not-an-expo-manifest" });
        let err = set_scheme(&mut doc, "my-app").unwrap_err();
        assert!(matches!(err, ManifestError::MissingExpoRoot));
    }
}
