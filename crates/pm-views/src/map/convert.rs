//! Data view to map data conversion

use geojson::FeatureCollection;
use pm_core::{Bounds, LayerKind, LayerSpec};
use pm_data::{records, Column, DataView, MapboxSettings, RenderConfig, RoleMapping};
use tracing::debug;

use super::classify::Classification;
use super::features::{build_features, data_bounds, feature_collection, PointFeature};
use super::layers::points_layers;
use super::legend::{render_legend, Legend};
use super::partition::{partition, PointsLayerSet};
use crate::ViewError;

/// Everything one update renders, rebuilt from scratch each time
#[derive(Debug, Clone, PartialEq)]
pub struct MapboxData {
    pub settings: MapboxSettings,
    pub columns: Vec<Column>,
    pub features: Vec<PointFeature>,
    pub max_size: f64,
    /// Absent when the legend column has no usable values
    pub legend: Option<Legend>,
    pub classification: Option<Classification>,
}

impl MapboxData {
    /// One feature collection per points source, in source order
    pub fn partitions(&self, set: &PointsLayerSet) -> Vec<FeatureCollection> {
        partition(&self.features, set.fan_out())
            .into_iter()
            .map(feature_collection)
            .collect()
    }

    /// Decorated points layers of the configured layer type
    pub fn layers(&self, set: &PointsLayerSet) -> Vec<LayerSpec> {
        let kind = LayerKind::from(self.settings.api.layer_type.as_str());
        points_layers(set, &kind, &self.columns, self.max_size)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        data_bounds(&self.features)
    }
}

/// Convert the host's data view into map data
pub fn convert(view: &DataView, config: &RenderConfig) -> Result<MapboxData, ViewError> {
    let settings = MapboxSettings::parse(&view.metadata.objects)?;
    let columns = view.table.columns.clone();
    let mapping = RoleMapping::resolve(&columns)?;
    let rows = records(&view.table.rows, &mapping)?;

    let classification = Classification::classify(&view.table.rows, mapping.legend);
    let set = build_features(&rows, classification.as_ref(), config.max_size_scope);

    let legend = match &classification {
        Some(classification) => {
            let mut legend = Legend::default();
            render_legend(
                &mut legend,
                &classification.colors(),
                &classification.labels(),
                &config.legend_title,
            )?;
            Some(legend)
        }
        None => None,
    };

    debug!(
        "Converted {} rows into {} features ({:?} classification)",
        view.table.rows.len(),
        set.features.len(),
        classification.as_ref().map(Classification::kind)
    );

    Ok(MapboxData {
        settings,
        columns,
        features: set.features,
        max_size: set.max_size,
        legend,
        classification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm_data::{CellValue, DataError, Role, Table};
    use serde_json::Value;

    fn view(columns: Vec<Column>, rows: Vec<Vec<f64>>) -> DataView {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(CellValue::Number).collect())
            .collect();
        DataView::new(Table { columns, rows }, Value::Null)
    }

    fn lat_lon_size() -> Vec<Column> {
        vec![
            Column::new("lat", [Role::Latitude]),
            Column::new("lon", [Role::Longitude]),
            Column::new("size", [Role::Size]),
        ]
    }

    #[test]
    fn test_end_to_end_all_rows() {
        let view = view(lat_lon_size(), vec![vec![10.0, 20.0, 5.0], vec![91.0, 20.0, 3.0]]);
        let data = convert(&view, &RenderConfig::default()).unwrap();

        assert_eq!(data.features.len(), 1);
        assert_eq!(data.features[0].position.lng, 20.0);
        assert_eq!(data.features[0].position.lat, 10.0);
        assert_eq!(data.features[0].size, Some(5.0));
        assert_eq!(data.max_size, 5.0);
    }

    #[test]
    fn test_end_to_end_plotted_rows() {
        let config = RenderConfig {
            max_size_scope: pm_data::MaxSizeScope::PlottedRows,
            ..Default::default()
        };
        let first = view(lat_lon_size(), vec![vec![10.0, 20.0, 5.0], vec![91.0, 20.0, 3.0]]);
        let data = convert(&first, &config).unwrap();

        assert_eq!(data.features.len(), 1);
        assert_eq!(data.max_size, 5.0);

        let second = view(lat_lon_size(), vec![vec![10.0, 20.0, 5.0], vec![91.0, 20.0, 9.0]]);
        assert_eq!(convert(&second, &config).unwrap().max_size, 5.0);
        assert_eq!(convert(&second, &RenderConfig::default()).unwrap().max_size, 9.0);
    }

    #[test]
    fn test_legend_matches_classes() {
        let view = view(
            lat_lon_size(),
            vec![vec![1.0, 1.0, 5.0], vec![2.0, 2.0, 3.0], vec![3.0, 3.0, 9.0]],
        );
        let data = convert(&view, &RenderConfig::default()).unwrap();
        let legend = data.legend.unwrap();
        let classification = data.classification.unwrap();

        assert_eq!(legend.title, "Measure");
        assert_eq!(legend.entries.len(), classification.class_count());
        assert_eq!(legend.entries[0].label, "3");
    }

    #[test]
    fn test_partitions_and_layers() {
        let rows = (0..5).map(|i| vec![i as f64, i as f64, 1.0 + i as f64]).collect();
        let data = convert(&view(lat_lon_size(), rows), &RenderConfig::default()).unwrap();
        let set = PointsLayerSet::default();

        let parts = data.partitions(&set);
        assert_eq!(parts[0].features.len(), 2);
        assert_eq!(parts[1].features.len(), 3);

        let layers = data.layers(&set);
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].kind, LayerKind::Circle);
        assert!(layers[0].paint_property("circle-radius").is_some());
        assert!(layers[0].paint_property("circle-color").is_none());
    }

    #[test]
    fn test_no_measure_means_no_legend() {
        let columns = vec![
            Column::new("lat", [Role::Latitude]),
            Column::new("lon", [Role::Longitude]),
        ];
        let data = convert(&view(columns, vec![vec![1.0, 2.0]]), &RenderConfig::default()).unwrap();
        assert!(data.features.is_empty());
        assert!(data.legend.is_none());
        assert_eq!(data.bounds(), None);
    }

    #[test]
    fn test_missing_longitude_fails() {
        let columns = vec![
            Column::new("lat", [Role::Latitude]),
            Column::new("size", [Role::Size]),
        ];
        let result = convert(&view(columns, vec![vec![1.0, 2.0]]), &RenderConfig::default());
        assert!(matches!(
            result,
            Err(ViewError::Data(DataError::MissingRole(Role::Longitude)))
        ));
    }
}
