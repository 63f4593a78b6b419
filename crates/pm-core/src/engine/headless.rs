//! In-memory map engine
//!
//! Keeps sources, layers, camera and listeners in plain data structures and
//! projects points with a flat equirectangular camera. Used by the CLI and
//! by tests, where the host loop delivers events through [`HeadlessMap::emit`].

use geojson::{Feature, FeatureCollection};
use indexmap::IndexMap;
use tracing::debug;

use super::{
    Bounds, Cursor, EaseOptions, FitBoundsOptions, GeoJsonSource, LayerKind, LayerSpec, LngLat,
    MapEngine, ScreenBox, ScreenPoint,
};
use crate::events::{ListenerMode, MapEventKind};
use crate::MapError;

/// World width in pixels at zoom 0
const TILE_SIZE: f64 = 512.0;
const MAX_ZOOM: f64 = 22.0;

/// Layer ids present in the base style before any data is added
const BASE_LAYERS: &[&str] = &["background", "waterway-label", "place-label"];
/// Vector source the base style ships with
const BASE_SOURCE: &str = "composite";

/// Camera state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: LngLat,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: LngLat::new(0.0, 0.0),
            zoom: 0.0,
            pitch: 0.0,
            bearing: 0.0,
        }
    }
}

/// The popup currently on screen
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub at: LngLat,
    pub html: String,
}

#[derive(Debug, Clone)]
enum SourceState {
    Vector,
    GeoJson(GeoJsonSource),
}

/// Headless map engine
#[derive(Debug)]
pub struct HeadlessMap {
    width: f64,
    height: f64,
    access_token: Option<String>,
    navigation_controls: usize,
    style_url: Option<String>,
    loaded: bool,
    removed: bool,
    sources: IndexMap<String, SourceState>,
    layers: Vec<LayerSpec>,
    camera: Camera,
    listeners: Vec<(MapEventKind, ListenerMode)>,
    cursor: Cursor,
    popup: Option<Popup>,
    eases: Vec<EaseOptions>,
    fits: Vec<(Bounds, FitBoundsOptions)>,
    fail_queries: bool,
}

impl HeadlessMap {
    /// Create a map with a canvas of `width` x `height` pixels
    pub fn new(width: f64, height: f64) -> Self {
        let mut map = Self {
            width,
            height,
            access_token: None,
            navigation_controls: 0,
            style_url: None,
            loaded: false,
            removed: false,
            sources: IndexMap::new(),
            layers: Vec::new(),
            camera: Camera::default(),
            listeners: Vec::new(),
            cursor: Cursor::Default,
            popup: None,
            eases: Vec::new(),
            fits: Vec::new(),
            fail_queries: false,
        };
        map.reset_style();
        map
    }

    fn reset_style(&mut self) {
        self.sources.clear();
        self.sources.insert(BASE_SOURCE.to_string(), SourceState::Vector);
        self.layers = BASE_LAYERS
            .iter()
            .map(|id| LayerSpec::new(*id, BASE_SOURCE, LayerKind::Symbol))
            .collect();
    }

    /// Deliver an event of `kind`.
    ///
    /// Returns whether any listener was registered for it; one-shot
    /// listeners are consumed. A `load` also marks the map as loaded.
    pub fn emit(&mut self, kind: MapEventKind) -> bool {
        if kind == MapEventKind::Load {
            self.loaded = true;
        }
        let listening = self.listens(kind);
        self.listeners
            .retain(|(k, mode)| !(*k == kind && *mode == ListenerMode::Once));
        listening
    }

    /// Override the loaded flag, e.g. to simulate tiles still in flight
    pub fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    /// Make every `query_rendered_features` call fail
    pub fn set_fail_queries(&mut self, fail: bool) {
        self.fail_queries = fail;
    }

    /// Pixel position of a geographic point under the current camera
    pub fn project(&self, at: LngLat) -> ScreenPoint {
        let scale = self.pixels_per_degree();
        ScreenPoint::new(
            self.width / 2.0 + (at.lng - self.camera.center.lng) * scale,
            self.height / 2.0 - (at.lat - self.camera.center.lat) * scale,
        )
    }

    fn pixels_per_degree(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.camera.zoom) / 360.0
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn navigation_controls(&self) -> usize {
        self.navigation_controls
    }

    pub fn style_url(&self) -> Option<&str> {
        self.style_url.as_deref()
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    /// Every `ease_to` request so far
    pub fn eases(&self) -> &[EaseOptions] {
        &self.eases
    }

    /// Every `fit_bounds` request so far
    pub fn fits(&self) -> &[(Bounds, FitBoundsOptions)] {
        &self.fits
    }

    /// Layer ids in render order, bottom first
    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.id.as_str()).collect()
    }

    pub fn layer(&self, id: &str) -> Option<&LayerSpec> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Data of a GeoJSON source
    pub fn source_data(&self, id: &str) -> Option<&FeatureCollection> {
        match self.sources.get(id) {
            Some(SourceState::GeoJson(source)) => Some(&source.data),
            _ => None,
        }
    }

    /// GeoJSON sources with their data, in insertion order
    pub fn geojson_sources(&self) -> impl Iterator<Item = (&str, &GeoJsonSource)> {
        self.sources.iter().filter_map(|(id, state)| match state {
            SourceState::GeoJson(source) => Some((id.as_str(), source)),
            SourceState::Vector => None,
        })
    }

    /// Number of listeners registered for `kind`
    pub fn listener_count(&self, kind: MapEventKind) -> usize {
        self.listeners.iter().filter(|(k, _)| *k == kind).count()
    }

    fn layer_index(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    fn features_in(&self, layer: &LayerSpec, area: ScreenBox, out: &mut Vec<Feature>) {
        let Some(SourceState::GeoJson(source)) = self.sources.get(&layer.source) else {
            return;
        };
        for feature in &source.data.features {
            let Some(geometry) = &feature.geometry else {
                continue;
            };
            if let geojson::Value::Point(position) = &geometry.value {
                if position.len() < 2 {
                    continue;
                }
                let at = self.project(LngLat::new(position[0], position[1]));
                if area.contains(at) {
                    out.push(feature.clone());
                }
            }
        }
    }
}

impl Default for HeadlessMap {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl MapEngine for HeadlessMap {
    fn set_access_token(&mut self, token: &str) {
        self.access_token = Some(token.to_string());
    }

    fn add_navigation_control(&mut self) {
        self.navigation_controls += 1;
    }

    fn jump_to(&mut self, center: LngLat, zoom: f64) {
        self.camera.center = center;
        self.camera.zoom = zoom.clamp(0.0, MAX_ZOOM);
    }

    fn set_style(&mut self, url: &str) {
        // Identical style URLs are diffed away; a new style drops user data.
        if self.style_url.as_deref() != Some(url) {
            debug!("Loading style {}", url);
            self.style_url = Some(url.to_string());
            self.reset_style();
        }
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn add_source(&mut self, id: &str, source: GeoJsonSource) -> Result<(), MapError> {
        if self.sources.contains_key(id) {
            return Err(MapError::DuplicateSource(id.to_string()));
        }
        self.sources.insert(id.to_string(), SourceState::GeoJson(source));
        Ok(())
    }

    fn set_source_data(&mut self, id: &str, data: FeatureCollection) -> Result<(), MapError> {
        match self.sources.get_mut(id) {
            Some(SourceState::GeoJson(source)) => {
                source.data = data;
                Ok(())
            }
            Some(SourceState::Vector) => Err(MapError::NotGeoJson(id.to_string())),
            None => Err(MapError::SourceNotFound(id.to_string())),
        }
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layer_index(id).is_some()
    }

    fn add_layer(&mut self, layer: &LayerSpec, before: Option<&str>) -> Result<(), MapError> {
        if self.has_layer(&layer.id) {
            return Err(MapError::DuplicateLayer(layer.id.clone()));
        }
        if !self.sources.contains_key(&layer.source) {
            return Err(MapError::SourceNotFound(layer.source.clone()));
        }
        match before {
            Some(anchor) => {
                let index = self
                    .layer_index(anchor)
                    .ok_or_else(|| MapError::LayerNotFound(anchor.to_string()))?;
                self.layers.insert(index, layer.clone());
            }
            None => self.layers.push(layer.clone()),
        }
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> Result<(), MapError> {
        let index = self
            .layer_index(id)
            .ok_or_else(|| MapError::LayerNotFound(id.to_string()))?;
        self.layers.remove(index);
        Ok(())
    }

    fn query_rendered_features(
        &self,
        area: ScreenBox,
        layers: &[String],
    ) -> Result<Vec<Feature>, MapError> {
        if self.fail_queries {
            return Err(MapError::QueryFailed("queries disabled".to_string()));
        }
        for id in layers {
            if !self.has_layer(id) {
                return Err(MapError::LayerNotFound(id.clone()));
            }
        }

        let mut hits = Vec::new();
        // Topmost layer first
        for layer in self.layers.iter().rev() {
            if layers.iter().any(|id| *id == layer.id) {
                self.features_in(layer, area, &mut hits);
            }
        }
        Ok(hits)
    }

    fn unproject(&self, point: ScreenPoint) -> LngLat {
        let scale = self.pixels_per_degree();
        LngLat::new(
            self.camera.center.lng + (point.x - self.width / 2.0) / scale,
            self.camera.center.lat - (point.y - self.height / 2.0) / scale,
        )
    }

    fn ease_to(&mut self, options: EaseOptions) {
        if let Some(center) = options.center {
            self.camera.center = center;
        }
        if let Some(zoom) = options.zoom {
            self.camera.zoom = zoom.clamp(0.0, MAX_ZOOM);
        }
        if let Some(pitch) = options.pitch {
            self.camera.pitch = pitch;
        }
        if let Some(bearing) = options.bearing {
            self.camera.bearing = bearing;
        }
        self.eases.push(options);
    }

    fn fit_bounds(&mut self, bounds: Bounds, options: FitBoundsOptions) {
        let usable_w = (self.width - 2.0 * options.padding).max(1.0);
        let usable_h = (self.height - 2.0 * options.padding).max(1.0);
        let span_lng = (bounds.east - bounds.west).abs();
        let span_lat = (bounds.north - bounds.south).abs();

        let base = TILE_SIZE / 360.0;
        let zoom_for = |span: f64, usable: f64| {
            if span > 0.0 {
                (usable / (span * base)).log2()
            } else {
                MAX_ZOOM
            }
        };
        let zoom = zoom_for(span_lng, usable_w).min(zoom_for(span_lat, usable_h));

        self.camera.center = bounds.center();
        self.camera.zoom = zoom.clamp(0.0, MAX_ZOOM);
        self.fits.push((bounds, options));
    }

    fn on(&mut self, kind: MapEventKind) {
        self.listeners.push((kind, ListenerMode::Persistent));
    }

    fn once(&mut self, kind: MapEventKind) {
        self.listeners.push((kind, ListenerMode::Once));
    }

    fn off(&mut self, kind: MapEventKind) {
        self.listeners.retain(|(k, _)| *k != kind);
    }

    fn listens(&self, kind: MapEventKind) -> bool {
        self.listeners.iter().any(|(k, _)| *k == kind)
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn show_popup(&mut self, at: LngLat, html: &str) {
        self.popup = Some(Popup {
            at,
            html: html.to_string(),
        });
    }

    fn hide_popup(&mut self) {
        self.popup = None;
    }

    fn remove(&mut self) {
        self.removed = true;
        self.loaded = false;
        self.style_url = None;
        self.listeners.clear();
        self.popup = None;
        self.sources.clear();
        self.layers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::{Geometry, Value};

    fn point(lng: f64, lat: f64) -> Feature {
        Feature {
            geometry: Some(Geometry::new(Value::Point(vec![lng, lat]))),
            ..Default::default()
        }
    }

    fn collection(features: Vec<Feature>) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    #[test]
    fn test_once_listener_is_consumed() {
        let mut map = HeadlessMap::default();
        map.once(MapEventKind::Load);
        map.on(MapEventKind::StyleLoad);

        assert!(map.emit(MapEventKind::Load));
        assert!(map.is_loaded());
        assert!(!map.emit(MapEventKind::Load));

        assert!(map.emit(MapEventKind::StyleLoad));
        assert!(map.emit(MapEventKind::StyleLoad));
        map.off(MapEventKind::StyleLoad);
        assert!(!map.listens(MapEventKind::StyleLoad));
    }

    #[test]
    fn test_add_layer_before_anchor() {
        let mut map = HeadlessMap::default();
        map.add_source("points", GeoJsonSource::new(collection(vec![]), 10)).unwrap();
        let layer = LayerSpec::new("dots", "points", LayerKind::Circle);
        map.add_layer(&layer, Some("waterway-label")).unwrap();

        assert_eq!(map.layer_ids(), vec!["background", "dots", "waterway-label", "place-label"]);
        assert!(matches!(
            map.add_layer(&layer, None),
            Err(MapError::DuplicateLayer(_))
        ));
        assert!(matches!(
            map.add_layer(&LayerSpec::new("x", "missing", LayerKind::Circle), None),
            Err(MapError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_project_unproject_round_trip() {
        let mut map = HeadlessMap::default();
        map.jump_to(LngLat::new(10.0, 20.0), 3.0);
        let at = LngLat::new(12.5, 18.0);
        let back = map.unproject(map.project(at));
        assert!((back.lng - at.lng).abs() < 1e-9);
        assert!((back.lat - at.lat).abs() < 1e-9);
    }

    #[test]
    fn test_query_hits_points_in_box() {
        let mut map = HeadlessMap::default();
        map.add_source(
            "points",
            GeoJsonSource::new(collection(vec![point(0.0, 0.0), point(100.0, 50.0)]), 10),
        )
        .unwrap();
        map.add_layer(&LayerSpec::new("dots", "points", LayerKind::Circle), None)
            .unwrap();

        let center = map.project(LngLat::new(0.0, 0.0));
        let hits = map
            .query_rendered_features(center.around(5.0), &["dots".to_string()])
            .unwrap();
        assert_eq!(hits.len(), 1);

        assert!(map
            .query_rendered_features(center.around(5.0), &["nope".to_string()])
            .is_err());

        map.set_fail_queries(true);
        assert!(map
            .query_rendered_features(center.around(5.0), &["dots".to_string()])
            .is_err());
    }

    #[test]
    fn test_fit_bounds_centers_camera() {
        let mut map = HeadlessMap::default();
        map.fit_bounds(
            Bounds::new(-10.0, -5.0, 10.0, 5.0),
            FitBoundsOptions { padding: 25.0 },
        );
        let camera = map.camera();
        assert_eq!(camera.center, LngLat::new(0.0, 0.0));
        assert!(camera.zoom > 0.0);
        assert_eq!(map.fits().len(), 1);
    }

    #[test]
    fn test_new_style_drops_user_layers() {
        let mut map = HeadlessMap::default();
        map.set_style("mapbox://styles/a");
        map.add_source("points", GeoJsonSource::new(collection(vec![]), 10)).unwrap();
        map.set_style("mapbox://styles/a");
        assert!(map.has_source("points"));
        map.set_style("mapbox://styles/b");
        assert!(!map.has_source("points"));
        assert!(map.has_layer("waterway-label"));
    }

    #[test]
    fn test_remove_tears_everything_down() {
        let mut map = HeadlessMap::default();
        map.set_style("mapbox://styles/a");
        map.emit(MapEventKind::Load);
        map.on(MapEventKind::Click);
        map.remove();

        assert!(map.is_removed());
        assert!(!map.is_loaded());
        assert!(!map.listens(MapEventKind::Click));
        assert!(map.layer_ids().is_empty());

        map.set_style("mapbox://styles/a");
        assert!(map.has_layer("waterway-label"));
    }
}
