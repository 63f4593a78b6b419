use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::dataview::{DataView, UpdateOptions};
use crate::DataError;

/// Load host update options from a JSON file.
///
/// Accepts either full update options (`{"dataViews": [...]}`) or a single
/// data view.
pub fn load_update_options(path: &Path) -> Result<UpdateOptions, DataError> {
    let text = std::fs::read_to_string(path)?;
    let options = parse_update_options(&text)?;
    info!(
        "Loaded {} data view(s) from {}",
        options.data_views.len(),
        path.display()
    );
    Ok(options)
}

pub fn parse_update_options(text: &str) -> Result<UpdateOptions, DataError> {
    let value: Value = serde_json::from_str(text)?;
    if value.get("dataViews").is_some() {
        Ok(serde_json::from_value(value)?)
    } else {
        let view: DataView = serde_json::from_value(value)?;
        Ok(UpdateOptions::single(view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: &str = r#"{
        "metadata": {"columns": []},
        "table": {"columns": [], "rows": []}
    }"#;

    #[test]
    fn test_single_view_is_wrapped() {
        let options = parse_update_options(VIEW).unwrap();
        assert_eq!(options.data_views.len(), 1);
        assert!(options.data_views[0].metadata.objects.is_null());
    }

    #[test]
    fn test_update_options_pass_through() {
        let text = format!(r#"{{"dataViews": [{VIEW}, {VIEW}]}}"#);
        let options = parse_update_options(&text).unwrap();
        assert_eq!(options.data_views.len(), 2);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_update_options("{\"metadata\": 3}"),
            Err(DataError::Json(_))
        ));
    }
}
