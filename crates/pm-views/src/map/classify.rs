//! Classification of the legend measure into visual classes
//!
//! A numeric measure is binned into [`CLASS_COUNT`] quantile classes on a
//! sequential palette; a categorical measure maps its first-seen distinct
//! values onto a qualitative palette.

use indexmap::IndexSet;
use pm_data::{CategoryKey, CellValue};
use serde::{Deserialize, Serialize};

use super::utils::colors::{qualitative_color, sequential_color, sequential_colors, CLASS_COUNT};
use super::utils::stats::quantile_limits;

/// Values found in the legend column
#[derive(Debug, Clone, PartialEq)]
pub enum Domain {
    /// Every numeric value, in row order
    Numeric(Vec<f64>),
    /// Distinct text and boolean values, first occurrence first
    Categorical(IndexSet<CategoryKey>),
    Empty,
}

impl Domain {
    /// Scan one column of `rows`. Numeric values win over categories.
    pub fn scan(rows: &[Vec<CellValue>], column: usize) -> Self {
        let mut numbers = Vec::new();
        let mut categories = IndexSet::new();

        for cell in rows.iter().filter_map(|row| row.get(column)) {
            if let Some(n) = cell.as_number() {
                numbers.push(n);
            } else if let Some(key) = cell.category_key() {
                categories.insert(key);
            }
        }

        if !numbers.is_empty() {
            Domain::Numeric(numbers)
        } else if !categories.is_empty() {
            Domain::Categorical(categories)
        } else {
            Domain::Empty
        }
    }
}

/// Quantile classes over a numeric domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileScale {
    /// `CLASS_COUNT + 1` non-decreasing class limits
    pub limits: Vec<f64>,
    /// One color per class, light to dark
    pub colors: Vec<String>,
}

impl QuantileScale {
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            limits: quantile_limits(values, CLASS_COUNT),
            colors: sequential_colors(CLASS_COUNT),
        }
    }

    /// Continuous color for `value`: its position among the limits drives
    /// the gradient, so each limit sits on an even step of the palette.
    pub fn color_at(&self, value: f64) -> String {
        sequential_color(self.position(value))
    }

    fn position(&self, value: f64) -> f64 {
        let segments = self.limits.len().saturating_sub(1);
        if segments == 0 {
            return 0.0;
        }
        if value <= self.limits[0] {
            return 0.0;
        }
        if value >= self.limits[segments] {
            return 1.0;
        }
        for (i, pair) in self.limits.windows(2).enumerate() {
            let (lower, upper) = (pair[0], pair[1]);
            if value <= upper {
                let fraction = if upper > lower {
                    (value - lower) / (upper - lower)
                } else {
                    0.0
                };
                return (i as f64 + fraction) / segments as f64;
            }
        }
        1.0
    }

    /// `(lower, upper)` limits of each class
    pub fn classes(&self) -> Vec<(f64, f64)> {
        self.limits.windows(2).map(|w| (w[0], w[1])).collect()
    }

    /// Lower limit of each class, shortest number formatting
    pub fn labels(&self) -> Vec<String> {
        self.classes()
            .iter()
            .map(|(lower, _)| lower.to_string())
            .collect()
    }
}

/// Category buckets in first-seen order
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalScale {
    pub categories: IndexSet<CategoryKey>,
}

impl CategoricalScale {
    pub fn new(categories: IndexSet<CategoryKey>) -> Self {
        Self { categories }
    }

    /// Categories that receive a color
    pub fn class_count(&self) -> usize {
        self.categories.len().min(CLASS_COUNT)
    }

    pub fn color_for(&self, key: &CategoryKey) -> Option<String> {
        self.categories
            .get_index_of(key)
            .and_then(qualitative_color)
    }

    pub fn colors(&self) -> Vec<String> {
        (0..self.class_count()).filter_map(qualitative_color).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.categories
            .iter()
            .take(self.class_count())
            .map(ToString::to_string)
            .collect()
    }
}

/// Kind of classification, for logging and output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationKind {
    Numeric,
    Categorical,
}

/// Classes and colors derived from the legend measure
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Numeric(QuantileScale),
    Categorical(CategoricalScale),
}

impl Classification {
    /// Classify the legend column of `rows`. No legend column or no usable
    /// values gives no classification.
    pub fn classify(rows: &[Vec<CellValue>], legend_column: Option<usize>) -> Option<Self> {
        match Domain::scan(rows, legend_column?) {
            Domain::Numeric(values) => Some(Classification::Numeric(QuantileScale::from_values(&values))),
            Domain::Categorical(categories) => {
                Some(Classification::Categorical(CategoricalScale::new(categories)))
            }
            Domain::Empty => None,
        }
    }

    pub fn kind(&self) -> ClassificationKind {
        match self {
            Classification::Numeric(_) => ClassificationKind::Numeric,
            Classification::Categorical(_) => ClassificationKind::Categorical,
        }
    }

    /// Number of visual classes
    pub fn class_count(&self) -> usize {
        match self {
            Classification::Numeric(scale) => scale.classes().len(),
            Classification::Categorical(scale) => scale.class_count(),
        }
    }

    /// One color per class
    pub fn colors(&self) -> Vec<String> {
        match self {
            Classification::Numeric(scale) => scale.colors.clone(),
            Classification::Categorical(scale) => scale.colors(),
        }
    }

    /// One legend label per class
    pub fn labels(&self) -> Vec<String> {
        match self {
            Classification::Numeric(scale) => scale.labels(),
            Classification::Categorical(scale) => scale.labels(),
        }
    }

    /// Color of a feature whose category cell holds `value`
    pub fn color_for(&self, value: &CellValue) -> Option<String> {
        match self {
            Classification::Numeric(scale) => value.as_f64().map(|v| scale.color_at(v)),
            Classification::Categorical(scale) => {
                value.category_key().and_then(|key| scale.color_for(&key))
            }
        }
    }
}
