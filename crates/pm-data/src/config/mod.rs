//! Settings and render configuration

pub mod render;
pub mod settings;

pub use render::*;
pub use settings::*;
