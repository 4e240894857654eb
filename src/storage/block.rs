//! Blocks: ordered sets of equal-length, named, typed columns.

use std::sync::Arc;

use crate::catalog::{Field, Schema, SchemaRef};
use crate::error::{Result, ShuffleError};
use crate::executor::vectorized::Filter;
use crate::storage::Column;

/// An in-memory table fragment.
///
/// Each column is exclusively owned by its block. The schema is shared, so
/// [`Block::clone_empty`] outputs point at the same [`Schema`] as their
/// source.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    schema: SchemaRef,
    columns: Vec<Column>,
}

impl Block {
    /// Creates a block, validating the columns against the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the column count, a column type or nullability
    /// disagrees with the schema, or if the columns differ in length.
    pub fn try_new(schema: SchemaRef, columns: Vec<Column>) -> Result<Self> {
        if schema.len() != columns.len() {
            return Err(ShuffleError::SchemaMismatch(format!(
                "schema has {} fields but {} columns were given",
                schema.len(),
                columns.len()
            )));
        }
        for (field, column) in schema.fields().iter().zip(&columns) {
            check_column_type(field, column)?;
        }
        let block = Block { schema, columns };
        block.check_lengths()?;
        Ok(block)
    }

    /// Creates a block from `(name, column)` pairs, deriving the schema from
    /// the columns.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate or empty names or unequal lengths.
    pub fn from_columns<S: Into<String>>(
        columns: impl IntoIterator<Item = (S, Column)>,
    ) -> Result<Self> {
        let (fields, columns): (Vec<_>, Vec<_>) = columns
            .into_iter()
            .map(|(name, column)| {
                Field::new(name, column.data_type(), column.is_nullable()).map(|f| (f, column))
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .unzip();
        Block::try_new(Arc::new(Schema::new(fields)?), columns)
    }

    /// Creates a block with no columns and no rows.
    #[must_use]
    pub fn empty() -> Self {
        Block {
            schema: Arc::new(Schema::empty()),
            columns: Vec::new(),
        }
    }

    /// Returns a block with the same schema and zero rows in every column.
    #[must_use]
    pub fn clone_empty(&self) -> Self {
        let columns = self
            .schema
            .fields()
            .iter()
            .map(|f| Column::new_empty(f.data_type, f.nullable))
            .collect();
        Block {
            schema: Arc::clone(&self.schema),
            columns,
        }
    }

    /// Returns the shared schema.
    #[must_use]
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Returns the number of rows (the length of the first column).
    ///
    /// A block without columns has no rows. Arrow batches that carry a row
    /// count but no columns are rejected on conversion for this reason.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns the columns in positional order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns a column by position.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Returns a column by name.
    #[must_use]
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.schema.index_of(name).and_then(|i| self.columns.get(i))
    }

    /// Returns the field and column at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ShuffleError::ColumnIndexOutOfBounds`] past the last column.
    pub fn get_by_position(&self, index: usize) -> Result<(&Field, &Column)> {
        match (self.schema.field(index), self.columns.get(index)) {
            (Some(field), Some(column)) => Ok((field, column)),
            _ => Err(ShuffleError::ColumnIndexOutOfBounds {
                index,
                columns: self.columns.len(),
            }),
        }
    }

    /// Replaces the column at `index`, returning the previous one.
    ///
    /// Only the type is checked. Lengths may diverge while a block is being
    /// populated column by column; call [`Block::check_lengths`] once done.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of bounds or the column type or
    /// nullability differs from the field.
    pub fn replace_column(&mut self, index: usize, column: Column) -> Result<Column> {
        let field = self
            .schema
            .field(index)
            .ok_or(ShuffleError::ColumnIndexOutOfBounds {
                index,
                columns: self.columns.len(),
            })?;
        check_column_type(field, &column)?;
        Ok(std::mem::replace(&mut self.columns[index], column))
    }

    /// Checks that every column has the same length as the first.
    ///
    /// # Errors
    ///
    /// Returns [`ShuffleError::ColumnLengthMismatch`] for the first column
    /// that differs.
    pub fn check_lengths(&self) -> Result<()> {
        let expected = self.num_rows();
        for (field, column) in self.schema.fields().iter().zip(&self.columns) {
            if column.len() != expected {
                return Err(ShuffleError::ColumnLengthMismatch {
                    column: field.name.clone(),
                    expected,
                    actual: column.len(),
                });
            }
        }
        Ok(())
    }

    /// Returns the logical size of all columns in bytes.
    #[must_use]
    pub fn bytes(&self) -> usize {
        self.columns.iter().map(Column::bytes).sum()
    }

    /// Returns a new block holding only the rows selected by `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error on a filter length mismatch or allocation failure.
    pub fn filter(&self, filter: &Filter) -> Result<Self> {
        filter.check_len(self.num_rows())?;
        let mut out = self.clone_empty();
        for (index, column) in self.columns.iter().enumerate() {
            out.replace_column(index, column.filter(filter)?)?;
        }
        Ok(out)
    }
}

fn check_column_type(field: &Field, column: &Column) -> Result<()> {
    if field.data_type != column.data_type() || field.nullable != column.is_nullable() {
        return Err(ShuffleError::SchemaMismatch(format!(
            "column '{}' is declared {}{} but holds {}{}",
            field.name,
            field.data_type,
            if field.nullable { " NULL" } else { "" },
            column.data_type(),
            if column.is_nullable() { " NULL" } else { "" },
        )));
    }
    Ok(())
}
