//! Style layers for the plotted points and the building extrusions

use pm_core::{LayerKind, LayerSpec, Paint};
use pm_data::{Column, Role};
use serde_json::json;

use super::features::{COLOR_PROPERTY, SIZE_PROPERTY};
use super::partition::PointsLayerSet;

/// Id of the 3-D buildings layer
pub const BUILDINGS_LAYER: &str = "3d-buildings";

const MIN_RADIUS: f64 = 2.0;
const MAX_RADIUS: f64 = 20.0;

/// Attach data-driven paint to a points layer.
///
/// Only circle layers are decorated. A category column colors points by
/// their resolved `color` property; a size column with a positive maximum
/// scales the radius from 2 px at size 1 to 20 px at `max_size`.
pub fn decorate(mut layer: LayerSpec, columns: &[Column], max_size: f64) -> LayerSpec {
    if layer.kind != LayerKind::Circle {
        return layer;
    }

    let has = |role: Role| columns.iter().any(|c| c.has_role(role));
    let mut paint = layer.paint.take().unwrap_or_default();

    if has(Role::Category) {
        paint.insert(
            "circle-color".to_string(),
            json!({ "property": COLOR_PROPERTY, "type": "identity" }),
        );
    }
    if has(Role::Size) && max_size > 0.0 {
        paint.insert(
            "circle-radius".to_string(),
            json!({
                "property": SIZE_PROPERTY,
                "stops": [[1.0, MIN_RADIUS], [max_size, MAX_RADIUS]],
            }),
        );
    }

    if !paint.is_empty() {
        layer.paint = Some(paint);
    }
    layer
}

/// One decorated layer per points source
pub fn points_layers(
    set: &PointsLayerSet,
    kind: &LayerKind,
    columns: &[Column],
    max_size: f64,
) -> Vec<LayerSpec> {
    (0..set.fan_out())
        .map(|part| {
            let base = LayerSpec::new(set.layer_id(part), set.source_id(part), kind.clone());
            decorate(base, columns, max_size)
        })
        .collect()
}

/// Extruded buildings from the base style's vector tiles, from zoom 15
pub fn buildings_layer() -> LayerSpec {
    let mut paint = Paint::new();
    paint.insert("fill-extrusion-color".to_string(), json!("#aaa"));
    paint.insert(
        "fill-extrusion-height".to_string(),
        json!({ "type": "identity", "property": "height" }),
    );
    paint.insert(
        "fill-extrusion-base".to_string(),
        json!({ "type": "identity", "property": "min_height" }),
    );
    paint.insert("fill-extrusion-opacity".to_string(), json!(0.5));

    LayerSpec::new(BUILDINGS_LAYER, "composite", LayerKind::FillExtrusion)
        .with_source_layer("building")
        .with_filter(json!(["==", "extrude", "true"]))
        .with_minzoom(15.0)
        .with_paint(paint)
}
