//! Table schema: key attributes and provisioned throughput.
//!
//! Attribute definitions and the key schema are both derived from the same
//! [`KeyAttribute`] values, so a key can never be declared with one type in
//! one list and another type in the other.

use aws_sdk_dynamodb::types::{
    AttributeDefinition, KeySchemaElement, KeyType, ProvisionedThroughput, ScalarAttributeType,
};
use serde::{Deserialize, Serialize};

use crate::errors::{LifecycleError, Result};

/// Scalar type of a key attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarType {
    /// `N`
    Number,
    /// `S`
    String,
    /// `B`
    Binary,
}

impl ScalarType {
    fn to_sdk(self) -> ScalarAttributeType {
        match self {
            ScalarType::Number => ScalarAttributeType::N,
            ScalarType::String => ScalarAttributeType::S,
            ScalarType::Binary => ScalarAttributeType::B,
        }
    }
}

/// A named, typed key attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAttribute {
    pub name: String,
    pub scalar_type: ScalarType,
}

impl KeyAttribute {
    pub fn new(name: impl Into<String>, scalar_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            scalar_type,
        }
    }

    fn definition(&self) -> Result<AttributeDefinition> {
        Ok(AttributeDefinition::builder()
            .attribute_name(&self.name)
            .attribute_type(self.scalar_type.to_sdk())
            .build()?)
    }

    fn key_element(&self, key_type: KeyType) -> Result<KeySchemaElement> {
        Ok(KeySchemaElement::builder()
            .attribute_name(&self.name)
            .key_type(key_type)
            .build()?)
    }
}

/// Schema for a table with a partition key, a sort key and provisioned capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub partition_key: KeyAttribute,
    pub sort_key: KeyAttribute,
    pub read_capacity_units: i64,
    pub write_capacity_units: i64,
}

impl TableSchema {
    /// Movies table: `Year` (N, HASH), `Title` (S, RANGE), 10/10 capacity.
    pub fn movies() -> Self {
        Self {
            partition_key: KeyAttribute::new("Year", ScalarType::Number),
            sort_key: KeyAttribute::new("Title", ScalarType::String),
            read_capacity_units: 10,
            write_capacity_units: 10,
        }
    }

    pub fn with_partition_key(mut self, name: impl Into<String>) -> Self {
        self.partition_key.name = name.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.partition_key.name.is_empty() || self.sort_key.name.is_empty() {
            return Err(LifecycleError::Validation(
                "key attribute names must not be empty".to_string(),
            ));
        }
        if self.partition_key.name == self.sort_key.name {
            return Err(LifecycleError::Validation(format!(
                "partition key and sort key must differ, both are '{}'",
                self.partition_key.name
            )));
        }
        if self.read_capacity_units < 1 || self.write_capacity_units < 1 {
            return Err(LifecycleError::Validation(
                "provisioned capacity units must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn attribute_definitions(&self) -> Result<Vec<AttributeDefinition>> {
        Ok(vec![
            self.partition_key.definition()?,
            self.sort_key.definition()?,
        ])
    }

    pub fn key_schema(&self) -> Result<Vec<KeySchemaElement>> {
        Ok(vec![
            self.partition_key.key_element(KeyType::Hash)?,
            self.sort_key.key_element(KeyType::Range)?,
        ])
    }

    pub fn provisioned_throughput(&self) -> Result<ProvisionedThroughput> {
        Ok(ProvisionedThroughput::builder()
            .read_capacity_units(self.read_capacity_units)
            .write_capacity_units(self.write_capacity_units)
            .build()?)
    }
}

impl Default for TableSchema {
    fn default() -> Self {
        Self::movies()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movies_schema_declares_every_key_in_both_lists() {
        let schema = TableSchema::movies();
        schema.validate().unwrap();

        let definitions = schema.attribute_definitions().unwrap();
        let keys = schema.key_schema().unwrap();
        assert_eq!(definitions.len(), keys.len());

        for key in &keys {
            let definition = definitions
                .iter()
                .find(|d| d.attribute_name() == key.attribute_name())
                .expect("key attribute missing from definitions");
            let expected = if key.attribute_name() == "Year" {
                ScalarAttributeType::N
            } else {
                ScalarAttributeType::S
            };
            assert_eq!(definition.attribute_type(), &expected);
        }

        assert_eq!(keys[0].key_type(), &KeyType::Hash);
        assert_eq!(keys[1].key_type(), &KeyType::Range);
    }

    #[test]
    fn throughput_is_ten_by_ten() {
        let throughput = TableSchema::movies().provisioned_throughput().unwrap();
        assert_eq!(throughput.read_capacity_units(), 10);
        assert_eq!(throughput.write_capacity_units(), 10);
    }

    #[test]
    fn renamed_partition_key_flows_into_both_lists() {
        let schema = TableSchema::movies().with_partition_key("ReleaseYear");
        let definitions = schema.attribute_definitions().unwrap();
        let keys = schema.key_schema().unwrap();
        assert_eq!(definitions[0].attribute_name(), "ReleaseYear");
        assert_eq!(keys[0].attribute_name(), "ReleaseYear");
    }

    #[test]
    fn rejects_duplicate_key_names() {
        let mut schema = TableSchema::movies();
        schema.sort_key.name = "Year".to_string();
        assert!(matches!(schema.validate(), Err(LifecycleError::Validation(_))));
    }

    #[test]
    fn rejects_zero_capacity() {
        let mut schema = TableSchema::movies();
        schema.write_capacity_units = 0;
        assert!(schema.validate().is_err());
    }
}
