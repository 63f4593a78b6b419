//! Map load lifecycle
//!
//! Decides, for each dataset update and each engine lifecycle signal,
//! whether the render step runs now, waits for a signal, or is already
//! queued behind one.

use crate::events::MapEventKind;

/// Where the map is in its load lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No dataset has been seen yet
    #[default]
    Uninitialized,
    /// Waiting for the engine's one-shot `load`
    Loading,
    /// A refresh arrived while the engine was busy; waiting for `sourcedata`
    Settling,
    /// Rendered at least once and idle
    Ready,
}

/// What an update has to do to get rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTrigger {
    /// Render right away
    Immediate,
    /// Subscribe once to this signal and render when it fires
    AwaitSignal(MapEventKind),
    /// A render is already queued behind a signal; it picks up the newest data
    Queued,
}

/// State machine over the engine's load signals
#[derive(Debug, Clone, Default)]
pub struct LoadLifecycle {
    state: LoadState,
}

impl LoadLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// A new dataset arrived
    pub fn on_update(&mut self, engine_loaded: bool) -> RenderTrigger {
        match self.state {
            LoadState::Uninitialized => {
                self.state = LoadState::Loading;
                RenderTrigger::AwaitSignal(MapEventKind::Load)
            }
            LoadState::Loading | LoadState::Settling => RenderTrigger::Queued,
            LoadState::Ready if engine_loaded => RenderTrigger::Immediate,
            LoadState::Ready => {
                self.state = LoadState::Settling;
                RenderTrigger::AwaitSignal(MapEventKind::SourceData)
            }
        }
    }

    /// A lifecycle signal fired; returns whether to render
    pub fn on_signal(&mut self, kind: MapEventKind) -> bool {
        if !kind.is_lifecycle() || self.state == LoadState::Uninitialized {
            return false;
        }
        self.state = LoadState::Ready;
        true
    }

    /// Forget everything, e.g. after the map was torn down
    pub fn reset(&mut self) {
        self.state = LoadState::Uninitialized;
    }
}
