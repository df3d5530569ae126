//! Records written to the table and their DynamoDB AttributeValue form.

use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::schema::TableSchema;

/// A movie keyed by release year (partition) and title (sort).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieItem {
    pub year: i64,
    pub title: String,
}

impl MovieItem {
    pub fn new(year: i64, title: impl Into<String>) -> Self {
        Self {
            year,
            title: title.into(),
        }
    }

    /// Convert to an item map keyed by the schema's attribute names.
    ///
    /// The year is written as `N` and the title as `S`.
    pub fn to_item(&self, schema: &TableSchema) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (
                schema.partition_key.name.clone(),
                AttributeValue::N(self.year.to_string()),
            ),
            (
                schema.sort_key.name.clone(),
                AttributeValue::S(self.title.clone()),
            ),
        ])
    }
}

impl fmt::Display for MovieItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.year)
    }
}
