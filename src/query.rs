//! Text-format queries decoded through a type parser table.
//!
//! PostgreSQL returns PostGIS values as text (hex EWKB, `BOX(...)`, array
//! literals) over the simple query protocol. `query` runs a statement that
//! way and hands every column to the decoder bound to its type OID.

use std::sync::Arc;

use tokio_postgres::{Client, SimpleQueryMessage};
use tracing::debug;

use crate::constants::LOG_TARGET;
use crate::error::Result;
use crate::parsers::TypeParsers;
use crate::types::{Column, ColumnInfo, ColumnValue, Row};

/// Result of a query execution.
#[derive(Debug)]
pub struct QueryResult {
    /// Column information.
    pub columns: Arc<ColumnInfo>,
    /// Rows returned.
    pub rows: Vec<Row>,
}

impl QueryResult {
    /// Get the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the result is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.column_names()
    }

    /// Iterate over rows.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }
}

impl IntoIterator for QueryResult {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Execute a single statement and decode its rows with `parsers`.
///
/// The statement is prepared first to learn the column type OIDs, then run
/// over the simple query protocol so values arrive as text. Columns without
/// a bound decoder are returned as [`ColumnValue::Text`].
pub async fn query(client: &Client, parsers: &TypeParsers, sql: &str) -> Result<QueryResult> {
    let statement = client.prepare(sql).await?;
    let columns = Arc::new(ColumnInfo::new(
        statement.columns().iter().map(Column::from).collect(),
    ));

    let messages = client.simple_query(sql).await?;

    let mut rows = Vec::new();
    for message in messages {
        let SimpleQueryMessage::Row(raw) = message else {
            continue;
        };

        let mut values = Vec::with_capacity(columns.len());
        for (index, column) in columns.columns.iter().enumerate() {
            let text = raw.try_get(index)?;
            let value = match parsers.parse(column.type_oid, text) {
                Some(decoded) => ColumnValue::from(decoded?),
                None => match text {
                    Some(text) => ColumnValue::Text(text.to_string()),
                    None => ColumnValue::Null,
                },
            };
            values.push(value);
        }
        rows.push(Row::new(values, columns.clone()));
    }

    debug!(
        target: LOG_TARGET,
        columns = columns.len(),
        rows = rows.len(),
        "decoded text query"
    );
    Ok(QueryResult { columns, rows })
}
