//! package.json overlay merging

use crate::error::ManifestError;
use serde_json::Value;

/// Deep-merge an overlay into a package.json document.
///
/// Objects are merged recursively; scalars and arrays from the overlay
/// replace the target's value. Keys absent from the target are inserted,
/// so an absent intermediate object is effectively initialized empty first.
pub fn merge_overlay(target: &mut Value, overlay: &Value) {
    match (target, overlay) {
        (Value::Object(target_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match target_map.get_mut(key) {
                    Some(existing) => merge_overlay(existing, overlay_value),
                    None => {
                        target_map.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
        }
        (target, overlay) => *target = overlay.clone(),
    }
}

/// Set the package name to the project slug
pub fn set_name(package: &mut Value, slug: &str) -> Result<(), ManifestError> {
    let map = package.as_object_mut().ok_or(ManifestError::NotAnObject)?;
    map.insert("name".to_string(), Value::String(slug.to_string()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_recurses_into_objects() {
        let mut package = json!({
            "name": "placeholder",
            "scripts": { "start": "expo start", "test": "jest" }
        });
        let overlay = json!({
            "scripts": { "lint": "eslint .", "test": "jest --ci" }
        });

        merge_overlay(&mut package, &overlay);

        assert_eq!(package["scripts"]["start"], "expo start");
        assert_eq!(package["scripts"]["lint"], "eslint .");
        // Overlay wins on conflicts
        assert_eq!(package["scripts"]["test"], "jest --ci");
    }

    #[test]
    fn test_merge_initializes_absent_objects() {
        let mut package = json!({ "name": "x" });
        let overlay = json!({ "jest": { "preset": "jest-expo" } });

        merge_overlay(&mut package, &overlay);

        assert_eq!(package["jest"]["preset"], "jest-expo");
    }

    #[test]
    fn test_merge_replaces_arrays_and_scalars() {
        let mut package = json!({ "keywords": ["old"], "private": false });
        let overlay = json!({ "keywords": ["expo", "starter"], "private": true });

        merge_overlay(&mut package, &overlay);

        assert_eq!(package["keywords"], json!(["expo", "starter"]));
        assert_eq!(package["private"], json!(true));
    }

    #[test]
    fn test_set_name() {
        let mut package = json!({ "name": "whatever" });
        set_name(&mut package, "my-app").unwrap();
        assert_eq!(package["name"], "my-app");
    }

    #[test]
    fn test_set_name_rejects_non_object() {
        let mut package = json!([1, 2, 3]);
        assert!(set_name(&mut package, "my-app").is_err());
    }
}
