//! Schema definitions for blocks.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShuffleError};
use crate::types::DataType;

/// Shared schema handle. A source block and all its cloned-empty outputs
/// point at the same schema.
pub type SchemaRef = Arc<Schema>;

/// Ordered list of fields describing the columns of a block.
///
/// Position is the correspondence key between a source block and its
/// partitioned outputs, so field order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Creates a new schema with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if two fields share a name.
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        let schema = Schema { fields };
        schema.validate()?;
        Ok(schema)
    }

    /// Creates a schema with no fields.
    #[must_use]
    pub fn empty() -> Self {
        Schema { fields: Vec::new() }
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ShuffleError::SchemaError(format!(
                    "Duplicate column name '{}'",
                    field.name
                )));
            }
        }
        Ok(())
    }

    /// Returns the fields in positional order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the field at `index`.
    #[must_use]
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Finds the position of a field by name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Converts to an Arrow schema.
    #[must_use]
    pub fn to_arrow(&self) -> arrow::datatypes::Schema {
        arrow::datatypes::Schema::new(
            self.fields
                .iter()
                .map(|f| arrow::datatypes::Field::new(&f.name, f.data_type.to_arrow(), f.nullable))
                .collect::<Vec<_>>(),
        )
    }

    /// Converts from an Arrow schema.
    ///
    /// # Errors
    ///
    /// Returns an error if a field has an unsupported Arrow type, an empty
    /// name, or a duplicate name.
    pub fn from_arrow(schema: &arrow::datatypes::Schema) -> Result<Self> {
        let fields = schema
            .fields()
            .iter()
            .map(|f| {
                let data_type =
                    DataType::from_arrow(f.data_type()).ok_or_else(|| ShuffleError::TypeError {
                        expected: "a supported column type".into(),
                        actual: f.data_type().to_string(),
                    })?;
                Field::new(f.name().clone(), data_type, f.is_nullable())
            })
            .collect::<Result<Vec<_>>>()?;
        Schema::new(fields)
    }
}

/// Definition of a single column in a block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Column data type.
    pub data_type: DataType,
    /// Whether the column carries a null map.
    pub nullable: bool,
}

impl Field {
    /// Creates a new field.
    ///
    /// # Errors
    ///
    /// Returns an error if the column name is empty.
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ShuffleError::SchemaError("Column name cannot be empty".into()));
        }
        Ok(Field {
            name,
            data_type,
            nullable,
        })
    }
}
