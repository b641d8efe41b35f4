//! A decoded row of a text-protocol query.

use std::sync::Arc;

use super::column::{Column, ColumnInfo};
use super::value::{ColumnValue, SpatialValue};

/// A row of query results.
#[derive(Debug, Clone)]
pub struct Row {
    values: Vec<ColumnValue>,
    column_info: Arc<ColumnInfo>,
}

impl Row {
    /// Pair decoded values with the column info shared by every row.
    pub fn new(values: Vec<ColumnValue>, column_info: Arc<ColumnInfo>) -> Self {
        Self {
            values,
            column_info,
        }
    }

    /// Get value by column index (0-based).
    pub fn get(&self, index: usize) -> Option<&ColumnValue> {
        self.values.get(index)
    }

    /// Get value by column name.
    pub fn get_by_name(&self, name: &str) -> Option<&ColumnValue> {
        self.column_info
            .find_by_name(name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Spatial value of the named column; `None` for text and null columns.
    pub fn spatial(&self, name: &str) -> Option<&SpatialValue> {
        self.get_by_name(name).and_then(ColumnValue::as_spatial)
    }

    /// Get the number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get column information.
    pub fn columns(&self) -> &[Column] {
        &self.column_info.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoxValue;

    fn make_row() -> Row {
        let column_info = Arc::new(ColumnInfo::new(vec![
            Column::new("name", 25),
            Column::new("extent", 17003),
        ]));
        Row::new(
            vec![
                ColumnValue::Text("test".to_string()),
                ColumnValue::Spatial(SpatialValue::Box(BoxValue::new(
                    vec![1.0, 2.0],
                    vec![5.0, 6.0],
                ))),
            ],
            column_info,
        )
    }

    #[test]
    fn test_row_access() {
        let row = make_row();

        assert_eq!(row.len(), 2);
        assert_eq!(row.get(0), Some(&ColumnValue::Text("test".to_string())));
        assert_eq!(row.get_by_name("NAME"), row.get_by_name("name"));
        assert!(row.spatial("extent").and_then(|v| v.as_box()).is_some());
        assert_eq!(row.spatial("name"), None);
    }

    #[test]
    fn test_row_columns() {
        let row = make_row();
        let columns = row.columns();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[1].type_oid, 17003);
        assert_eq!(row.get(2), None);
    }
}
