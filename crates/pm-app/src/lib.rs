//! Point map visual
//!
//! Wires host updates through conversion into a map engine and a legend,
//! and drives pointer interaction.

pub mod interaction;
pub mod visual;

pub use interaction::InteractionController;
pub use visual::{MapVisual, UpdateOutcome};

use pm_core::MapError;
use pm_data::DataError;
use pm_views::ViewError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisualError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("View error: {0}")]
    View(#[from] ViewError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),
}
