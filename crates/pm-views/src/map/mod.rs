//! Thematic point map: classification, features, layers and legend

pub mod classify;
pub mod convert;
pub mod features;
pub mod layers;
pub mod legend;
pub mod partition;
pub mod utils;

pub use classify::{CategoricalScale, Classification, ClassificationKind, Domain, QuantileScale};
pub use convert::{convert, MapboxData};
pub use features::{build_features, data_bounds, feature_collection, FeatureSet, PointFeature};
pub use layers::{buildings_layer, decorate, points_layers, BUILDINGS_LAYER};
pub use legend::{render_legend, Legend, LegendEntry, LegendModel, LegendTarget};
pub use partition::{partition, PointsLayerSet};
