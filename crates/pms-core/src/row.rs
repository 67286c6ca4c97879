use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One spreadsheet row as delivered by the script endpoint.
///
/// Keys keep their delivery order, so positional lookups mirror the column
/// order of the sheet for named-header rows. Horizontal-category stages key
/// their cells `col_0`, `col_1`, ….
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(Map<String, Value>);

impl RawRow {
    pub fn new(cells: Map<String, Value>) -> Self {
        Self(cells)
    }

    /// Accepts objects as-is and turns arrays into `col_N` keyed rows.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            Value::Array(cells) => Some(Self(
                cells
                    .into_iter()
                    .enumerate()
                    .map(|(idx, cell)| (column_key(idx), cell))
                    .collect(),
            )),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn column(&self, index: usize) -> Option<&Value> {
        self.0.get(&column_key(index))
    }

    pub fn position(&self, index: usize) -> Option<&Value> {
        self.0.values().nth(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub fn column_key(index: usize) -> String {
    format!("col_{index}")
}

/// Decodes a `data` payload into rows, dropping anything that is not a row.
pub fn rows_from_values(values: Vec<Value>) -> Vec<RawRow> {
    values.into_iter().filter_map(RawRow::from_value).collect()
}

/// Trimmed text of a cell that carries something.
///
/// Null, `false`, zero and blank strings count as absent.
pub fn present_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::Bool(false) => return None,
        Value::Bool(true) => "true".to_string(),
        Value::Number(number) => {
            if number.as_f64() == Some(0.0) {
                return None;
            }
            number.to_string()
        }
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Normalises a display value: blank, `-` and `null` become `None`.
pub fn clean_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "null" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn clean_cell(value: Option<&Value>) -> Option<String> {
    value.and_then(present_text).and_then(|text| clean_text(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_rows_are_keyed_by_column() {
        let row = RawRow::from_value(json!(["1", "x", "Acme"])).unwrap();
        assert_eq!(row.column(2), Some(&json!("Acme")));
        assert_eq!(row.position(2), Some(&json!("Acme")));
        assert!(RawRow::from_value(json!("scalar")).is_none());
    }

    #[test]
    fn position_follows_delivery_order() {
        let row: RawRow = serde_json::from_str(r#"{"S.No":1,"Date":"2/3/2024","Party Name":"Acme"}"#)
            .unwrap();
        assert_eq!(row.position(2), Some(&json!("Acme")));
        assert_eq!(row.position(3), None);
    }

    #[test]
    fn falsy_cells_are_absent() {
        assert_eq!(present_text(&json!(null)), None);
        assert_eq!(present_text(&json!(false)), None);
        assert_eq!(present_text(&json!(0)), None);
        assert_eq!(present_text(&json!("   ")), None);
        assert_eq!(present_text(&json!(12)), Some("12".into()));
        assert_eq!(present_text(&json!("  Done ")), Some("Done".into()));
    }

    #[test]
    fn cleaning_drops_placeholders() {
        assert_eq!(clean_text("-"), None);
        assert_eq!(clean_text(" null "), None);
        assert_eq!(clean_text(""), None);
        assert_eq!(clean_cell(Some(&json!(" 3 "))), Some("3".into()));
        assert_eq!(clean_cell(None), None);
    }
}
