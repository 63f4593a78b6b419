//! Rendering and interaction configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::DataError;

/// Which rows contribute to the maximum size used for radius scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxSizeScope {
    /// Every row, including rows dropped for invalid coordinates
    #[default]
    AllRows,
    /// Only rows that become features
    PlottedRows,
}

/// Pointer interaction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Debounce wait for hover and click handlers, in milliseconds
    pub debounce_ms: u64,
    /// Half width of the feature query window, in pixels
    pub query_radius_px: f64,
    /// Zoom level after clicking a feature
    pub click_zoom: f64,
    /// Camera animation duration, in milliseconds
    pub ease_duration_ms: u64,
    /// Padding around the data when fitting bounds, in pixels
    pub fit_padding: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 16,
            query_radius_px: 5.0,
            click_zoom: 15.0,
            ease_duration_ms: 500,
            fit_padding: 25.0,
        }
    }
}

impl InteractionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn ease_duration(&self) -> Duration {
        Duration::from_millis(self.ease_duration_ms)
    }
}

/// Configuration of the render pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Number of sources/layers the points are spread over
    pub fan_out: usize,
    pub max_size_scope: MaxSizeScope,
    pub legend_title: String,
    /// Tile buffer of the GeoJSON sources, in pixels
    pub source_buffer: u32,
    /// Basemap layer the points are inserted beneath
    pub label_anchor_layer: String,
    /// Add the 3-D building extrusion layer
    pub show_buildings: bool,
    /// Camera position when the map is created, `[lng, lat]`
    pub initial_center: [f64; 2],
    pub initial_zoom: f64,
    pub interaction: InteractionConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fan_out: 2,
            max_size_scope: MaxSizeScope::AllRows,
            legend_title: "Measure".to_string(),
            source_buffer: 10,
            label_anchor_layer: "waterway-label".to_string(),
            show_buildings: true,
            initial_center: [-74.50, 40.0],
            initial_zoom: 0.0,
            interaction: InteractionConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Load a JSON config file; absent keys take defaults
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        let config: RenderConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if self.fan_out == 0 {
            return Err(DataError::InvalidConfig("fan_out must be at least 1".to_string()));
        }
        if !self.interaction.query_radius_px.is_finite() || self.interaction.query_radius_px < 0.0 {
            return Err(DataError::InvalidConfig(
                "interaction.query_radius_px must be a non-negative number".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&self.initial_center[1]) {
            return Err(DataError::InvalidConfig(
                "initial_center latitude must lie in [-90, 90]".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.fan_out, 2);
        assert_eq!(config.interaction.debounce(), Duration::from_millis(16));
        assert_eq!(config.max_size_scope, MaxSizeScope::AllRows);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: RenderConfig = serde_json::from_str(
            r#"{"fan_out": 4, "max_size_scope": "plotted_rows", "interaction": {"click_zoom": 12}}"#,
        )
        .unwrap();
        assert_eq!(config.fan_out, 4);
        assert_eq!(config.max_size_scope, MaxSizeScope::PlottedRows);
        assert_eq!(config.interaction.click_zoom, 12.0);
        assert_eq!(config.interaction.query_radius_px, 5.0);
        assert_eq!(config.legend_title, "Measure");
    }

    #[test]
    fn test_zero_fan_out_is_rejected() {
        let config = RenderConfig {
            fan_out: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DataError::InvalidConfig(_))));
    }
}
