//! The map engine seam
//!
//! The rendering engine is a black box: it owns sources, style layers,
//! the camera, popups and event listeners. Everything the visual needs
//! from it goes through [`MapEngine`].

mod headless;
mod style;

pub use headless::{Camera, HeadlessMap, Popup};
pub use style::{LayerKind, LayerSpec, Paint};

use std::time::Duration;

use geojson::{Feature, FeatureCollection};
use serde::{Deserialize, Serialize};

use crate::events::MapEventKind;
use crate::MapError;

/// Geographic position, longitude first as GeoJSON orders it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// Pixel position on the map canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Square query window of `radius` pixels around this point
    pub fn around(self, radius: f64) -> ScreenBox {
        ScreenBox {
            min: ScreenPoint::new(self.x - radius, self.y - radius),
            max: ScreenPoint::new(self.x + radius, self.y + radius),
        }
    }
}

/// Axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenBox {
    pub min: ScreenPoint,
    pub max: ScreenPoint,
}

impl ScreenBox {
    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Geographic bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Bounds {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self { west, south, east, north }
    }

    /// `[west, south, east, north]`, the GeoJSON bbox order
    pub fn to_array(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }

    pub fn center(&self) -> LngLat {
        LngLat::new((self.west + self.east) / 2.0, (self.south + self.north) / 2.0)
    }
}

/// Camera animation request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EaseOptions {
    pub center: Option<LngLat>,
    pub zoom: Option<f64>,
    pub pitch: Option<f64>,
    pub bearing: Option<f64>,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitBoundsOptions {
    /// Padding in pixels on every side
    pub padding: f64,
}

/// A GeoJSON source as handed to the engine
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonSource {
    pub data: FeatureCollection,
    /// Tile buffer around each tile, in pixels
    pub buffer: u32,
}

impl GeoJsonSource {
    pub fn new(data: FeatureCollection, buffer: u32) -> Self {
        Self { data, buffer }
    }

    /// Source description as the engine's style spec writes it
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "geojson",
            "data": self.data,
            "buffer": self.buffer,
        })
    }
}

/// Mouse cursor shown over the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

/// Operations the visual needs from a map rendering engine
pub trait MapEngine {
    /// Set the access token used for style and tile requests
    fn set_access_token(&mut self, token: &str);

    /// Add the zoom/rotate control to the canvas
    fn add_navigation_control(&mut self);

    /// Move the camera without animation
    fn jump_to(&mut self, center: LngLat, zoom: f64);

    /// Load a style by URL
    fn set_style(&mut self, url: &str);

    /// Whether the engine has finished loading and rendering
    fn is_loaded(&self) -> bool;

    fn has_source(&self, id: &str) -> bool;

    fn add_source(&mut self, id: &str, source: GeoJsonSource) -> Result<(), MapError>;

    /// Replace the data of an existing GeoJSON source
    fn set_source_data(&mut self, id: &str, data: FeatureCollection) -> Result<(), MapError>;

    fn has_layer(&self, id: &str) -> bool;

    /// Add a layer, below `before` when given
    fn add_layer(&mut self, layer: &LayerSpec, before: Option<&str>) -> Result<(), MapError>;

    fn remove_layer(&mut self, id: &str) -> Result<(), MapError>;

    /// Rendered features of `layers` inside a pixel box, topmost first
    fn query_rendered_features(
        &self,
        area: ScreenBox,
        layers: &[String],
    ) -> Result<Vec<Feature>, MapError>;

    /// Geographic position under a pixel
    fn unproject(&self, point: ScreenPoint) -> LngLat;

    fn ease_to(&mut self, options: EaseOptions);

    fn fit_bounds(&mut self, bounds: Bounds, options: FitBoundsOptions);

    /// Register a persistent listener
    fn on(&mut self, kind: MapEventKind);

    /// Register a listener removed after its first delivery
    fn once(&mut self, kind: MapEventKind);

    /// Remove every listener of `kind`
    fn off(&mut self, kind: MapEventKind);

    fn listens(&self, kind: MapEventKind) -> bool;

    fn set_cursor(&mut self, cursor: Cursor);

    /// Show the shared popup with literal HTML content
    fn show_popup(&mut self, at: LngLat, html: &str);

    fn hide_popup(&mut self);

    /// Tear down the map and release its resources
    fn remove(&mut self);
}
