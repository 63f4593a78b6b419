//! Color utilities for the map

use colorous::{Color, SET2, YELLOW_GREEN_BLUE};

/// Number of visual classes a classification produces at most
pub const CLASS_COUNT: usize = 8;

/// `#rrggbb` form of a color
pub fn hex(color: Color) -> String {
    format!("#{:x}", color)
}

/// Sequential blue-green-yellow color at `t` in [0, 1]; light for low values
pub fn sequential_color(t: f64) -> String {
    hex(YELLOW_GREEN_BLUE.eval_continuous(t.clamp(0.0, 1.0)))
}

/// `n` evenly spaced sequential colors, ascending
pub fn sequential_colors(n: usize) -> Vec<String> {
    match n {
        0 => Vec::new(),
        1 => vec![sequential_color(0.0)],
        _ => (0..n)
            .map(|i| sequential_color(i as f64 / (n - 1) as f64))
            .collect(),
    }
}

/// Qualitative color for a category index.
///
/// Only the first eight indices have a color; there is no wrapping.
pub fn qualitative_color(index: usize) -> Option<String> {
    SET2.get(index).copied().map(hex)
}
