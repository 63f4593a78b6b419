//! Map engine events

use serde::{Deserialize, Serialize};

use crate::engine::ScreenPoint;

/// Event types a map engine can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapEventKind {
    /// The engine finished its first full load
    #[serde(rename = "load")]
    Load,
    /// A style finished loading (after `set_style`)
    #[serde(rename = "style.load")]
    StyleLoad,
    /// Source data changed or settled
    #[serde(rename = "sourcedata")]
    SourceData,
    #[serde(rename = "mousemove")]
    MouseMove,
    #[serde(rename = "click")]
    Click,
}

impl MapEventKind {
    /// Name of the event as the engine knows it
    pub fn name(&self) -> &'static str {
        match self {
            MapEventKind::Load => "load",
            MapEventKind::StyleLoad => "style.load",
            MapEventKind::SourceData => "sourcedata",
            MapEventKind::MouseMove => "mousemove",
            MapEventKind::Click => "click",
        }
    }

    /// Lifecycle signals, as opposed to pointer input
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            MapEventKind::Load | MapEventKind::StyleLoad | MapEventKind::SourceData
        )
    }
}

impl std::fmt::Display for MapEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A concrete event delivered by the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    Load,
    StyleLoad,
    SourceData,
    /// Pointer moved over the canvas
    MouseMove(ScreenPoint),
    /// Pointer clicked on the canvas
    Click(ScreenPoint),
}

impl MapEvent {
    pub fn kind(&self) -> MapEventKind {
        match self {
            MapEvent::Load => MapEventKind::Load,
            MapEvent::StyleLoad => MapEventKind::StyleLoad,
            MapEvent::SourceData => MapEventKind::SourceData,
            MapEvent::MouseMove(_) => MapEventKind::MouseMove,
            MapEvent::Click(_) => MapEventKind::Click,
        }
    }

    /// The event for a lifecycle signal; pointer kinds need a position
    pub fn signal(kind: MapEventKind) -> Option<Self> {
        match kind {
            MapEventKind::Load => Some(MapEvent::Load),
            MapEventKind::StyleLoad => Some(MapEvent::StyleLoad),
            MapEventKind::SourceData => Some(MapEvent::SourceData),
            MapEventKind::MouseMove | MapEventKind::Click => None,
        }
    }
}

/// How long a listener stays registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerMode {
    /// Removed after the first delivery
    Once,
    /// Stays until `off`
    Persistent,
}
