//! Core abstractions for the point map visual
//!
//! This crate provides the map engine seam, its events, the load
//! lifecycle state machine and the pointer debouncer.

pub mod debounce;
pub mod engine;
pub mod events;
pub mod state;

use thiserror::Error;

// Re-export commonly used types
pub use debounce::{DebounceEdge, Debouncer};
pub use engine::{
    Bounds, Cursor, EaseOptions, FitBoundsOptions, GeoJsonSource, HeadlessMap, LayerKind,
    LayerSpec, LngLat, MapEngine, Paint, ScreenBox, ScreenPoint,
};
pub use events::{ListenerMode, MapEvent, MapEventKind};
pub use state::{LoadLifecycle, LoadState, RenderTrigger};

/// Errors raised by a map engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("Source '{0}' does not exist")]
    SourceNotFound(String),

    #[error("Source '{0}' already exists")]
    DuplicateSource(String),

    #[error("Source '{0}' is not a GeoJSON source")]
    NotGeoJson(String),

    #[error("Layer '{0}' does not exist")]
    LayerNotFound(String),

    #[error("Layer '{0}' already exists")]
    DuplicateLayer(String),

    #[error("Feature query failed: {0}")]
    QueryFailed(String),
}
