//! Map views for the point map visual
//!
//! Turns a data view into classified point features, partitioned sources,
//! decorated layers and a legend.

pub mod map;

pub use map::{
    buildings_layer, convert, decorate, partition, render_legend, Classification,
    ClassificationKind, FeatureSet, Legend, LegendEntry, LegendModel, LegendTarget, MapboxData,
    PointFeature, PointsLayerSet,
};

use pm_data::DataError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("Legend needs one label per color, got {colors} colors and {labels} labels")]
    LegendShape { colors: usize, labels: usize },
}
