//! Drives the map engine: load lifecycle, source and layer upserts,
//! hover tooltips, click-to-zoom and camera fitting.

use std::time::Instant;

use pm_core::{
    Cursor, Debouncer, EaseOptions, FitBoundsOptions, GeoJsonSource, LoadLifecycle, LoadState,
    MapEngine, MapError, MapEvent, MapEventKind, RenderTrigger, ScreenPoint,
};
use pm_data::{InteractionConfig, RenderConfig};
use pm_views::map::layers::BUILDINGS_LAYER;
use pm_views::map::utils::markup::tooltip_html;
use pm_views::{buildings_layer, MapboxData, PointFeature, PointsLayerSet};
use tracing::{debug, info, warn};

/// Listeners the render step keeps attached
const PERSISTENT_LISTENERS: [MapEventKind; 3] = [
    MapEventKind::MouseMove,
    MapEventKind::Click,
    MapEventKind::StyleLoad,
];

pub struct InteractionController {
    interaction: InteractionConfig,
    source_buffer: u32,
    label_anchor_layer: String,
    show_buildings: bool,
    points: PointsLayerSet,
    lifecycle: LoadLifecycle,
    data: Option<MapboxData>,
    hover: Debouncer<ScreenPoint>,
    click: Debouncer<ScreenPoint>,
}

impl InteractionController {
    pub fn new(config: &RenderConfig) -> Self {
        let wait = config.interaction.debounce();
        Self {
            interaction: config.interaction.clone(),
            source_buffer: config.source_buffer,
            label_anchor_layer: config.label_anchor_layer.clone(),
            show_buildings: config.show_buildings,
            points: PointsLayerSet::new(config.fan_out),
            lifecycle: LoadLifecycle::new(),
            data: None,
            hover: Debouncer::trailing(wait),
            click: Debouncer::leading(wait),
        }
    }

    pub fn state(&self) -> LoadState {
        self.lifecycle.state()
    }

    pub fn points(&self) -> &PointsLayerSet {
        &self.points
    }

    /// Data of the latest update
    pub fn data(&self) -> Option<&MapboxData> {
        self.data.as_ref()
    }

    /// Take a freshly converted update.
    ///
    /// The data replaces whatever was there before; it is rendered now or
    /// when the engine signals readiness.
    pub fn update<M: MapEngine>(
        &mut self,
        map: &mut M,
        data: MapboxData,
    ) -> Result<RenderTrigger, MapError> {
        self.data = Some(data);
        let trigger = self.lifecycle.on_update(map.is_loaded());
        match trigger {
            RenderTrigger::Immediate => self.render(map)?,
            RenderTrigger::AwaitSignal(kind) => {
                debug!("Rendering deferred until '{}'", kind);
                map.once(kind);
            }
            RenderTrigger::Queued => debug!("Render already pending, data replaced"),
        }
        Ok(trigger)
    }

    /// Deliver an engine event. Returns whether a render happened.
    pub fn handle_event<M: MapEngine>(
        &mut self,
        map: &mut M,
        event: MapEvent,
        now: Instant,
    ) -> Result<bool, MapError> {
        match event {
            MapEvent::Load | MapEvent::StyleLoad | MapEvent::SourceData => {
                if self.lifecycle.on_signal(event.kind()) {
                    self.render(map)?;
                    return Ok(true);
                }
            }
            MapEvent::MouseMove(point) => {
                self.hover.call(now, point);
            }
            MapEvent::Click(point) => {
                if let Some(point) = self.click.call(now, point) {
                    self.click_at(map, point)?;
                }
            }
        }
        Ok(false)
    }

    /// Flush the trailing hover debouncer
    pub fn tick<M: MapEngine>(&mut self, map: &mut M, now: Instant) {
        if let Some(point) = self.hover.poll(now) {
            self.hover_at(map, point);
        }
    }

    /// Forget the lifecycle and any pending pointer input
    pub fn reset(&mut self) {
        self.lifecycle.reset();
        self.hover.cancel();
        self.click.cancel();
        self.data = None;
    }

    fn render<M: MapEngine>(&self, map: &mut M) -> Result<(), MapError> {
        let Some(data) = &self.data else {
            return Ok(());
        };

        for (part, collection) in data.partitions(&self.points).into_iter().enumerate() {
            let id = self.points.source_id(part);
            if map.has_source(&id) {
                map.set_source_data(&id, collection)?;
            } else {
                map.add_source(&id, GeoJsonSource::new(collection, self.source_buffer))?;
            }
        }

        let anchor = map
            .has_layer(&self.label_anchor_layer)
            .then_some(self.label_anchor_layer.as_str());
        if anchor.is_none() {
            warn!(
                "Anchor layer '{}' missing, adding points on top",
                self.label_anchor_layer
            );
        }

        if self.show_buildings && !map.has_layer(BUILDINGS_LAYER) {
            map.add_layer(&buildings_layer(), anchor)?;
        }

        for layer in data.layers(&self.points) {
            if map.has_layer(&layer.id) {
                map.remove_layer(&layer.id)?;
                map.add_layer(&layer, None)?;
            } else {
                map.add_layer(&layer, anchor)?;
            }
        }

        for kind in PERSISTENT_LISTENERS {
            if !map.listens(kind) {
                map.on(kind);
            }
        }

        if let Some(bounds) = data.bounds() {
            map.ease_to(EaseOptions {
                pitch: Some(0.0),
                bearing: Some(0.0),
                duration: self.interaction.ease_duration(),
                ..Default::default()
            });
            map.fit_bounds(
                bounds,
                FitBoundsOptions {
                    padding: self.interaction.fit_padding,
                },
            );
        }

        info!(
            "Rendered {} features across {} layers",
            data.features.len(),
            self.points.fan_out()
        );
        Ok(())
    }

    fn query<M: MapEngine>(
        &self,
        map: &M,
        point: ScreenPoint,
    ) -> Result<Option<PointFeature>, MapError> {
        let area = point.around(self.interaction.query_radius_px);
        let features = map.query_rendered_features(area, &self.points.layer_ids())?;
        Ok(features.iter().find_map(PointFeature::from_geojson))
    }

    fn hover_at<M: MapEngine>(&self, map: &mut M, point: ScreenPoint) {
        match self.query(map, point) {
            Ok(Some(feature)) => {
                map.set_cursor(Cursor::Pointer);
                let at = map.unproject(point);
                map.show_popup(at, &tooltip_html(feature.tooltip.as_deref().unwrap_or("null")));
            }
            Ok(None) => {
                map.set_cursor(Cursor::Default);
                map.hide_popup();
            }
            Err(err) => {
                debug!("Hover query failed: {}", err);
                map.set_cursor(Cursor::Default);
                map.hide_popup();
            }
        }
    }

    fn click_at<M: MapEngine>(&self, map: &mut M, point: ScreenPoint) -> Result<(), MapError> {
        if let Some(feature) = self.query(map, point)? {
            map.ease_to(EaseOptions {
                center: Some(feature.position),
                zoom: Some(self.interaction.click_zoom),
                duration: self.interaction.ease_duration(),
                ..Default::default()
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm_core::HeadlessMap;
    use pm_data::{CellValue, Column, DataView, Role, Table};
    use serde_json::Value;

    fn data(rows: Vec<Vec<f64>>) -> MapboxData {
        let columns = vec![
            Column::new("lat", [Role::Latitude]),
            Column::new("lon", [Role::Longitude]),
            Column::new("size", [Role::Size]),
        ];
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(CellValue::Number).collect())
            .collect();
        let view = DataView::new(Table { columns, rows }, Value::Null);
        pm_views::convert(&view, &RenderConfig::default()).unwrap()
    }

    #[test]
    fn test_first_update_waits_for_load() {
        let mut map = HeadlessMap::default();
        let mut controller = InteractionController::new(&RenderConfig::default());

        let trigger = controller.update(&mut map, data(vec![vec![1.0, 2.0, 3.0]])).unwrap();
        assert_eq!(trigger, RenderTrigger::AwaitSignal(MapEventKind::Load));
        assert_eq!(controller.state(), LoadState::Loading);
        assert!(!map.has_source("points-data-1"));

        assert!(map.emit(MapEventKind::Load));
        let rendered = controller
            .handle_event(&mut map, MapEvent::Load, Instant::now())
            .unwrap();
        assert!(rendered);
        assert_eq!(controller.state(), LoadState::Ready);
        assert!(map.has_source("points-data-1"));
        assert!(map.has_layer("points-2"));
        assert!(map.has_layer(BUILDINGS_LAYER));
    }

    #[test]
    fn test_layers_sit_below_labels_then_move_on_top() {
        let mut map = HeadlessMap::default();
        map.set_loaded(true);
        let mut controller = InteractionController::new(&RenderConfig::default());
        controller.update(&mut map, data(vec![vec![1.0, 2.0, 3.0]])).unwrap();
        map.emit(MapEventKind::Load);
        controller
            .handle_event(&mut map, MapEvent::Load, Instant::now())
            .unwrap();

        assert_eq!(
            map.layer_ids(),
            vec![
                "background",
                "3d-buildings",
                "points-1",
                "points-2",
                "waterway-label",
                "place-label"
            ]
        );

        let trigger = controller.update(&mut map, data(vec![vec![4.0, 5.0, 6.0]])).unwrap();
        assert_eq!(trigger, RenderTrigger::Immediate);
        assert_eq!(
            map.layer_ids(),
            vec![
                "background",
                "3d-buildings",
                "waterway-label",
                "place-label",
                "points-1",
                "points-2"
            ]
        );
    }

    #[test]
    fn test_buildings_can_be_disabled() {
        let config = RenderConfig {
            show_buildings: false,
            ..Default::default()
        };
        let mut map = HeadlessMap::default();
        let mut controller = InteractionController::new(&config);
        controller.update(&mut map, data(vec![vec![1.0, 2.0, 3.0]])).unwrap();
        map.emit(MapEventKind::Load);
        controller
            .handle_event(&mut map, MapEvent::Load, Instant::now())
            .unwrap();
        assert!(!map.has_layer(BUILDINGS_LAYER));
    }

    #[test]
    fn test_pointer_events_before_render_are_harmless() {
        let mut map = HeadlessMap::default();
        let mut controller = InteractionController::new(&RenderConfig::default());
        let now = Instant::now();

        controller
            .handle_event(&mut map, MapEvent::MouseMove(ScreenPoint::new(1.0, 1.0)), now)
            .unwrap();
        controller.tick(&mut map, now + std::time::Duration::from_millis(50));
        assert_eq!(map.cursor(), Cursor::Default);
        assert!(map.popup().is_none());
    }
}
