//! Point features built from records

use geo::BoundingRect;
use geo_types::{MultiPoint, Point};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoValue};
use pm_core::{Bounds, LngLat};
use pm_data::{MaxSizeScope, Record};
use serde_json::{Number, Value};
use tracing::debug;

use super::classify::Classification;

/// Feature property holding the resolved color
pub const COLOR_PROPERTY: &str = "color";
/// Feature property holding the tooltip text
pub const TOOLTIP_PROPERTY: &str = "tooltip";
/// Feature property holding the size measure
pub const SIZE_PROPERTY: &str = "size";

/// A plotted point
#[derive(Debug, Clone, PartialEq)]
pub struct PointFeature {
    pub position: LngLat,
    pub color: Option<String>,
    pub tooltip: Option<String>,
    pub size: Option<f64>,
}

impl PointFeature {
    /// GeoJSON point feature; `color` and `tooltip` are written as null when
    /// absent, `size` is left out.
    pub fn to_geojson(&self) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert(
            COLOR_PROPERTY.to_string(),
            self.color.clone().map_or(Value::Null, Value::String),
        );
        properties.insert(
            TOOLTIP_PROPERTY.to_string(),
            self.tooltip.clone().map_or(Value::Null, Value::String),
        );
        if let Some(size) = self.size.and_then(Number::from_f64) {
            properties.insert(SIZE_PROPERTY.to_string(), Value::Number(size));
        }

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoValue::Point(vec![
                self.position.lng,
                self.position.lat,
            ]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }

    /// Read back a feature returned by an engine query. Only point
    /// geometries are accepted.
    pub fn from_geojson(feature: &Feature) -> Option<Self> {
        let position = match &feature.geometry.as_ref()?.value {
            GeoValue::Point(coords) if coords.len() >= 2 => LngLat::new(coords[0], coords[1]),
            _ => return None,
        };
        let property = |name: &str| feature.properties.as_ref().and_then(|p| p.get(name));

        Some(Self {
            position,
            color: property(COLOR_PROPERTY)
                .and_then(Value::as_str)
                .map(str::to_string),
            tooltip: property(TOOLTIP_PROPERTY).and_then(|v| match v {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            }),
            size: property(SIZE_PROPERTY).and_then(Value::as_f64),
        })
    }
}

/// Features of one update plus the largest size seen
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureSet {
    pub features: Vec<PointFeature>,
    pub max_size: f64,
}

impl FeatureSet {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Build point features from records.
///
/// Rows without a valid position are dropped. `scope` decides whether
/// dropped rows still count toward `max_size`. Without a classification
/// nothing is plotted.
pub fn build_features(
    records: &[Record],
    classification: Option<&Classification>,
    scope: MaxSizeScope,
) -> FeatureSet {
    let Some(classification) = classification else {
        return FeatureSet::default();
    };

    let mut set = FeatureSet::default();
    let mut dropped = 0usize;

    for record in records {
        let position = record.position();
        if scope == MaxSizeScope::AllRows || position.is_some() {
            if let Some(size) = record.size() {
                set.max_size = set.max_size.max(size);
            }
        }

        let Some((lng, lat)) = position else {
            dropped += 1;
            continue;
        };

        set.features.push(PointFeature {
            position: LngLat::new(lng, lat),
            color: record
                .category
                .as_ref()
                .and_then(|value| classification.color_for(value)),
            tooltip: record.category.as_ref().map(ToString::to_string),
            size: record.size(),
        });
    }

    debug!(
        "Built {} features, dropped {} rows, max size {}",
        set.features.len(),
        dropped,
        set.max_size
    );
    set
}

pub fn feature_collection(features: &[PointFeature]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: features.iter().map(PointFeature::to_geojson).collect(),
        foreign_members: None,
    }
}

/// Bounding box of all features with every edge clamped to the latitude
/// range [-90, 90], longitudes included.
pub fn data_bounds(features: &[PointFeature]) -> Option<Bounds> {
    let points: MultiPoint<f64> = features
        .iter()
        .map(|f| Point::new(f.position.lng, f.position.lat))
        .collect::<Vec<_>>()
        .into();
    let rect = points.bounding_rect()?;
    let clamp = |v: f64| v.clamp(-90.0, 90.0);

    Some(Bounds::new(
        clamp(rect.min().x),
        clamp(rect.min().y),
        clamp(rect.max().x),
        clamp(rect.max().y),
    ))
}
