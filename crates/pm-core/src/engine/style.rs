//! Style layer descriptions

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Paint properties of a layer, keyed by property name
pub type Paint = serde_json::Map<String, Value>;

/// Geometry variant a style layer draws
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayerKind {
    Circle,
    Heatmap,
    Symbol,
    FillExtrusion,
    Other(String),
}

impl LayerKind {
    pub fn as_str(&self) -> &str {
        match self {
            LayerKind::Circle => "circle",
            LayerKind::Heatmap => "heatmap",
            LayerKind::Symbol => "symbol",
            LayerKind::FillExtrusion => "fill-extrusion",
            LayerKind::Other(name) => name,
        }
    }
}

impl From<&str> for LayerKind {
    fn from(name: &str) -> Self {
        match name {
            "circle" => LayerKind::Circle,
            "heatmap" => LayerKind::Heatmap,
            "symbol" => LayerKind::Symbol,
            "fill-extrusion" => LayerKind::FillExtrusion,
            other => LayerKind::Other(other.to_string()),
        }
    }
}

impl From<String> for LayerKind {
    fn from(name: String) -> Self {
        LayerKind::from(name.as_str())
    }
}

impl From<LayerKind> for String {
    fn from(kind: LayerKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A style layer as handed to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub id: String,
    pub source: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    #[serde(rename = "source-layer", default, skip_serializing_if = "Option::is_none")]
    pub source_layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minzoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paint: Option<Paint>,
}

impl LayerSpec {
    pub fn new(id: impl Into<String>, source: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            kind,
            source_layer: None,
            filter: None,
            minzoom: None,
            paint: None,
        }
    }

    pub fn with_source_layer(mut self, source_layer: impl Into<String>) -> Self {
        self.source_layer = Some(source_layer.into());
        self
    }

    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_minzoom(mut self, minzoom: f64) -> Self {
        self.minzoom = Some(minzoom);
        self
    }

    pub fn with_paint(mut self, paint: Paint) -> Self {
        self.paint = Some(paint);
        self
    }

    /// Paint property by name, if set
    pub fn paint_property(&self, name: &str) -> Option<&Value> {
        self.paint.as_ref().and_then(|paint| paint.get(name))
    }
}
