//! The map visual: host updates in, map engine and legend out

use std::time::Instant;

use pm_core::{HeadlessMap, LngLat, MapEngine, MapEvent, MapEventKind, RenderTrigger};
use pm_data::{MapboxSettings, RenderConfig, UpdateOptions};
use pm_views::{convert, render_legend, LegendTarget, MapboxData};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::interaction::InteractionController;
use crate::VisualError;

/// What an update did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "event", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// Sources and layers were written to the map
    Rendered,
    /// Rendering waits for the named engine signal
    Deferred(MapEventKind),
    /// A render is already pending and will pick up this data
    Queued,
    /// No access token is configured; the map was not touched
    MissingToken,
    /// Fewer than two columns are bound
    NotEnoughColumns,
    /// The host sent no data view
    NoData,
}

impl From<RenderTrigger> for UpdateOutcome {
    fn from(trigger: RenderTrigger) -> Self {
        match trigger {
            RenderTrigger::Immediate => UpdateOutcome::Rendered,
            RenderTrigger::AwaitSignal(kind) => UpdateOutcome::Deferred(kind),
            RenderTrigger::Queued => UpdateOutcome::Queued,
        }
    }
}

pub struct MapVisual<M: MapEngine, L: LegendTarget> {
    map: M,
    legend: L,
    config: RenderConfig,
    settings: MapboxSettings,
    controller: InteractionController,
    initialized: bool,
}

impl<M: MapEngine, L: LegendTarget> MapVisual<M, L> {
    pub fn new(map: M, legend: L, config: RenderConfig) -> Result<Self, VisualError> {
        config.validate()?;
        Ok(Self {
            controller: InteractionController::new(&config),
            map,
            legend,
            config,
            settings: MapboxSettings::default(),
            initialized: false,
        })
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn legend(&self) -> &L {
        &self.legend
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Data of the latest successful conversion
    pub fn data(&self) -> Option<&MapboxData> {
        self.controller.data()
    }

    /// Handle a host update. Failures are logged here and returned.
    pub fn update(&mut self, options: &UpdateOptions) -> Result<UpdateOutcome, VisualError> {
        self.try_update(options).map_err(|err| {
            error!("Update failed: {}", err);
            err
        })
    }

    fn try_update(&mut self, options: &UpdateOptions) -> Result<UpdateOutcome, VisualError> {
        let Some(view) = options.primary() else {
            warn!("Update without a data view");
            return Ok(UpdateOutcome::NoData);
        };
        if view.metadata.columns.len() < 2 {
            return Ok(UpdateOutcome::NotEnoughColumns);
        }

        let data = convert(view, &self.config)?;
        self.settings = data.settings.clone();

        if let Some(classification) = &data.classification {
            render_legend(
                &mut self.legend,
                &classification.colors(),
                &classification.labels(),
                &self.config.legend_title,
            )?;
        }

        let Some(token) = data.settings.access_token().map(str::to_string) else {
            warn!("No access token configured, nothing rendered");
            return Ok(UpdateOutcome::MissingToken);
        };

        if !self.initialized {
            self.map.set_access_token(&token);
            self.map.add_navigation_control();
            let [lng, lat] = self.config.initial_center;
            self.map.jump_to(LngLat::new(lng, lat), self.config.initial_zoom);
            self.initialized = true;
            info!("Map initialized");
        }
        self.map.set_style(&data.settings.api.style);

        let trigger = self.controller.update(&mut self.map, data)?;
        Ok(trigger.into())
    }

    /// Deliver an engine event the map has a listener for
    pub fn handle_event(&mut self, event: MapEvent, now: Instant) -> Result<bool, VisualError> {
        self.controller
            .handle_event(&mut self.map, event, now)
            .map_err(|err| {
                error!("Handling '{}' failed: {}", event.kind(), err);
                VisualError::from(err)
            })
    }

    /// Flush debounced pointer input up to `now`
    pub fn tick(&mut self, now: Instant) {
        self.controller.tick(&mut self.map, now);
    }

    /// Property pane values of a settings object
    pub fn enumerate_object_instances(&self, object_name: &str) -> Option<Map<String, Value>> {
        self.settings.enumerate_object_instances(object_name)
    }

    /// Tear down the map; a later update starts from scratch
    pub fn destroy(&mut self) {
        self.map.remove();
        self.controller.reset();
        self.initialized = false;
        info!("Map destroyed");
    }
}

impl<L: LegendTarget> MapVisual<HeadlessMap, L> {
    /// Fire an event on the headless map and deliver it if anything listens.
    /// Returns whether a render happened.
    pub fn emit(&mut self, event: MapEvent, now: Instant) -> Result<bool, VisualError> {
        if !self.map.emit(event.kind()) {
            return Ok(false);
        }
        self.handle_event(event, now)
    }
}
