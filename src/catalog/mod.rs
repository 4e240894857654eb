//! Block schemas: ordered, named, typed fields.

mod schema;

pub use schema::{Field, Schema, SchemaRef};
