pub mod colors;
pub mod markup;
pub mod stats;
