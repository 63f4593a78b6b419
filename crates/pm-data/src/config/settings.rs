//! Property pane settings

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::DataError;

pub const DEFAULT_STYLE: &str = "mapbox://styles/mapbox/dark-v9?optimize=true";
pub const DEFAULT_LAYER_TYPE: &str = "circle";

/// The `api` settings object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiSettings {
    /// Engine access token; nothing renders without one
    pub access_token: String,
    /// Style URL
    pub style: String,
    /// Layer type of the points layers, e.g. `circle`
    pub layer_type: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            style: DEFAULT_STYLE.to_string(),
            layer_type: DEFAULT_LAYER_TYPE.to_string(),
        }
    }
}

/// All settings objects of the visual
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapboxSettings {
    pub api: ApiSettings,
}

impl MapboxSettings {
    /// Parse the host's `metadata.objects`; missing values take defaults
    pub fn parse(objects: &Value) -> Result<Self, DataError> {
        if objects.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(objects.clone())?)
    }

    pub fn access_token(&self) -> Option<&str> {
        let token = self.api.access_token.trim();
        (!token.is_empty()).then_some(token)
    }

    /// Property values to show in the property pane for `object_name`
    pub fn enumerate_object_instances(&self, object_name: &str) -> Option<Map<String, Value>> {
        match serde_json::to_value(self).ok()?.get(object_name)? {
            Value::Object(properties) => Some(properties.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_with_defaults() {
        let settings = MapboxSettings::parse(&json!({"api": {"accessToken": "pk.abc"}})).unwrap();
        assert_eq!(settings.access_token(), Some("pk.abc"));
        assert_eq!(settings.api.style, DEFAULT_STYLE);
        assert_eq!(settings.api.layer_type, "circle");

        let empty = MapboxSettings::parse(&Value::Null).unwrap();
        assert_eq!(empty, MapboxSettings::default());
        assert_eq!(empty.access_token(), None);
    }

    #[test]
    fn test_blank_token_counts_as_missing() {
        let settings = MapboxSettings::parse(&json!({"api": {"accessToken": "  "}})).unwrap();
        assert_eq!(settings.access_token(), None);
    }

    #[test]
    fn test_enumerate_object_instances() {
        let settings = MapboxSettings::parse(&json!({"api": {"layerType": "heatmap"}})).unwrap();
        let api = settings.enumerate_object_instances("api").unwrap();
        assert_eq!(api["layerType"], json!("heatmap"));
        assert_eq!(api["style"], json!(DEFAULT_STYLE));
        assert!(settings.enumerate_object_instances("legend").is_none());
    }
}
