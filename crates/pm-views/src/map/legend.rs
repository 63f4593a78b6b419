//! Legend model and its HTML rendering

use std::sync::Arc;

use itertools::Itertools;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::utils::markup::escape_html;
use crate::ViewError;

/// One swatch of the legend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub color: String,
    pub label: String,
}

/// A titled list of color swatches
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// Clear `target` and draw this legend into it
    pub fn draw<T: LegendTarget + ?Sized>(&self, target: &mut T) {
        target.clear();
        target.set_title(&self.title);
        for entry in &self.entries {
            target.push_entry(entry.clone());
        }
    }

    /// Legend markup: a title element and one key/value row per entry
    pub fn to_html(&self) -> String {
        let title = format!(
            "<div id=\"legend-title\" class=\"legend-title\">{}</div>",
            escape_html(&self.title)
        );
        let rows = self
            .entries
            .iter()
            .enumerate()
            .map(|(p, entry)| {
                format!(
                    "<div><span class=\"legend-key\" id=\"legend-points-id-{p}\" style=\"background-color: {}\"></span>\
                     <span id=\"legend-points-value-{p}\">{}</span></div>",
                    escape_html(&entry.color),
                    escape_html(&entry.label),
                )
            })
            .join("");
        format!("{}{}", title, rows)
    }
}

/// Where a legend is drawn
pub trait LegendTarget {
    /// Remove the title and every entry
    fn clear(&mut self);

    fn set_title(&mut self, title: &str);

    fn push_entry(&mut self, entry: LegendEntry);
}

impl LegendTarget for Legend {
    fn clear(&mut self) {
        self.title.clear();
        self.entries.clear();
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn push_entry(&mut self, entry: LegendEntry) {
        self.entries.push(entry);
    }
}

/// Shared legend handle; clones see the same legend
#[derive(Debug, Clone, Default)]
pub struct LegendModel {
    inner: Arc<RwLock<Legend>>,
}

impl LegendModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current legend
    pub fn snapshot(&self) -> Legend {
        self.inner.read().clone()
    }

    pub fn to_html(&self) -> String {
        self.inner.read().to_html()
    }
}

impl LegendTarget for LegendModel {
    fn clear(&mut self) {
        self.inner.write().clear();
    }

    fn set_title(&mut self, title: &str) {
        self.inner.write().set_title(title);
    }

    fn push_entry(&mut self, entry: LegendEntry) {
        self.inner.write().push_entry(entry);
    }
}

/// Pair colors with labels
pub fn legend_entries(colors: &[String], labels: &[String]) -> Result<Vec<LegendEntry>, ViewError> {
    if colors.len() != labels.len() {
        return Err(ViewError::LegendShape {
            colors: colors.len(),
            labels: labels.len(),
        });
    }
    Ok(colors
        .iter()
        .zip(labels)
        .map(|(color, label)| LegendEntry {
            color: color.clone(),
            label: label.clone(),
        })
        .collect())
}

/// Clear `target` and draw `title` followed by one entry per color/label
/// pair. Mismatched lengths leave the target untouched.
pub fn render_legend<T: LegendTarget + ?Sized>(
    target: &mut T,
    colors: &[String],
    labels: &[String],
    title: &str,
) -> Result<(), ViewError> {
    let legend = Legend {
        title: title.to_string(),
        entries: legend_entries(colors, labels)?,
    };
    legend.draw(target);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_replaces_previous_legend() {
        let mut legend = Legend::default();
        render_legend(&mut legend, &strings(&["#111", "#222"]), &strings(&["a", "b"]), "Old").unwrap();
        render_legend(&mut legend, &strings(&["#333"]), &strings(&["c"]), "Measure").unwrap();

        assert_eq!(legend.title, "Measure");
        assert_eq!(
            legend.entries,
            vec![LegendEntry {
                color: "#333".to_string(),
                label: "c".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_legend_has_title_only() {
        let mut legend = Legend::default();
        render_legend(&mut legend, &[], &[], "Measure").unwrap();
        assert_eq!(legend.title, "Measure");
        assert!(legend.entries.is_empty());
        assert_eq!(
            legend.to_html(),
            "<div id=\"legend-title\" class=\"legend-title\">Measure</div>"
        );
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let mut legend = Legend::default();
        let result = render_legend(&mut legend, &strings(&["#111"]), &strings(&["a", "b"]), "Measure");
        assert!(matches!(
            result,
            Err(ViewError::LegendShape { colors: 1, labels: 2 })
        ));
        assert_eq!(legend, Legend::default());
    }

    #[test]
    fn test_shared_model() {
        let model = LegendModel::new();
        let mut writer = model.clone();
        render_legend(&mut writer, &strings(&["#66c2a5"]), &strings(&["<north>"]), "Measure").unwrap();

        assert_eq!(model.snapshot().entries.len(), 1);
        let html = model.to_html();
        assert!(html.contains("id=\"legend-points-id-0\""));
        assert!(html.contains("background-color: #66c2a5"));
        assert!(html.contains("<span id=\"legend-points-value-0\">&lt;north&gt;</span>"));
    }
}
