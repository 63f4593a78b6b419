//! Cell values and role-keyed records

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::{Role, RoleMapping};
use crate::DataError;

/// A raw cell as delivered by the host
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Parse a text cell the way a CSV export would carry it
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Null;
        }
        if let Ok(number) = trimmed.parse::<f64>() {
            if number.is_finite() {
                return CellValue::Number(number);
            }
        }
        match trimmed {
            "true" => CellValue::Bool(true),
            "false" => CellValue::Bool(false),
            _ => CellValue::Text(raw.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Strictly numeric cells only
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value, also parsing numeric text
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            CellValue::Bool(_) | CellValue::Null => None,
        }
    }

    /// Category key for text and boolean cells
    pub fn category_key(&self) -> Option<CategoryKey> {
        match self {
            CellValue::Text(s) => Some(CategoryKey::Text(s.clone())),
            CellValue::Bool(b) => Some(CategoryKey::Bool(*b)),
            CellValue::Number(_) | CellValue::Null => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("null"),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// A distinct categorical value.
///
/// Text and booleans never compare equal, so `"true"` and `true` are two
/// categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryKey {
    Text(String),
    Bool(bool),
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryKey::Text(s) => f.write_str(s),
            CategoryKey::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// A row keyed by role. Null cells are stored as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub latitude: Option<CellValue>,
    pub longitude: Option<CellValue>,
    pub category: Option<CellValue>,
    pub size: Option<CellValue>,
}

impl Record {
    pub fn set(&mut self, role: Role, value: CellValue) {
        let value = (!value.is_null()).then_some(value);
        match role {
            Role::Latitude => self.latitude = value,
            Role::Longitude => self.longitude = value,
            Role::Category => self.category = value,
            Role::Size => self.size = value,
        }
    }

    /// `(longitude, latitude)` when both are numeric and inside the valid ranges
    pub fn position(&self) -> Option<(f64, f64)> {
        let lat = self.latitude.as_ref()?.as_f64()?;
        let lon = self.longitude.as_ref()?.as_f64()?;
        ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)).then_some((lon, lat))
    }

    pub fn size(&self) -> Option<f64> {
        self.size.as_ref().and_then(CellValue::as_number)
    }
}

/// Turn positional rows into records
pub fn records(rows: &[Vec<CellValue>], mapping: &RoleMapping) -> Result<Vec<Record>, DataError> {
    rows.iter()
        .enumerate()
        .map(|(row_idx, row)| {
            if row.len() != mapping.column_count() {
                return Err(DataError::RowShape {
                    row: row_idx,
                    expected: mapping.column_count(),
                    found: row.len(),
                });
            }
            let mut record = Record::default();
            for (col_idx, cell) in row.iter().enumerate() {
                if let Some(role) = mapping.key(col_idx) {
                    record.set(role, cell.clone());
                }
            }
            Ok(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Column;

    #[test]
    fn test_cell_values_from_json() {
        let row: Vec<CellValue> = serde_json::from_str(r#"[1.5, "a", true, null]"#).unwrap();
        assert_eq!(
            row,
            vec![
                CellValue::Number(1.5),
                CellValue::Text("a".to_string()),
                CellValue::Bool(true),
                CellValue::Null
            ]
        );
    }

    #[test]
    fn test_infer_from_text() {
        assert_eq!(CellValue::infer("42"), CellValue::Number(42.0));
        assert_eq!(CellValue::infer(" "), CellValue::Null);
        assert_eq!(CellValue::infer("false"), CellValue::Bool(false));
        assert_eq!(CellValue::infer("NaN"), CellValue::Text("NaN".to_string()));
        assert_eq!(CellValue::infer("north"), CellValue::Text("north".to_string()));
    }

    #[test]
    fn test_number_display_is_shortest() {
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(4.5).to_string(), "4.5");
    }

    #[test]
    fn test_category_keys_keep_types_apart() {
        let text = CellValue::Text("true".to_string()).category_key();
        let flag = CellValue::Bool(true).category_key();
        assert_ne!(text, flag);
        assert_eq!(CellValue::Number(1.0).category_key(), None);
    }

    #[test]
    fn test_position_checks_ranges() {
        let mut record = Record::default();
        record.set(Role::Latitude, CellValue::Number(10.0));
        record.set(Role::Longitude, CellValue::Text("20".to_string()));
        assert_eq!(record.position(), Some((20.0, 10.0)));

        record.set(Role::Latitude, CellValue::Number(90.5));
        assert_eq!(record.position(), None);

        record.set(Role::Latitude, CellValue::Number(-90.0));
        record.set(Role::Longitude, CellValue::Number(-180.0));
        assert_eq!(record.position(), Some((-180.0, -90.0)));

        record.set(Role::Longitude, CellValue::Null);
        assert_eq!(record.position(), None);
    }

    #[test]
    fn test_records_reject_short_rows() {
        let columns = vec![
            Column::new("lat", [Role::Latitude]),
            Column::new("lon", [Role::Longitude]),
        ];
        let mapping = RoleMapping::resolve(&columns).unwrap();
        let rows = vec![
            vec![CellValue::Number(1.0), CellValue::Number(2.0)],
            vec![CellValue::Number(1.0)],
        ];
        assert!(matches!(
            records(&rows, &mapping),
            Err(DataError::RowShape { row: 1, expected: 2, found: 1 })
        ));
    }
}
