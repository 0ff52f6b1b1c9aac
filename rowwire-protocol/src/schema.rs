//! Conversion between in-memory schema and its wire representation.
use crate::error::{Error, Result};
use rowwire_catalog::{ColumnSchema, Schema};
use rowwire_datatype::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire representation of a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchemaPB {
    pub name: String,
    pub ty: DataType,
    pub is_key: bool,
    pub is_nullable: bool,
}

impl fmt::Display for ColumnSchemaPB {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name: \"{}\" type: {} is_key: {} is_nullable: {}",
            self.name, self.ty, self.is_key, self.is_nullable
        )
    }
}

/// Wire representation of a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMessage {
    pub columns: Vec<ColumnSchemaPB>,
}

impl From<&Schema> for SchemaMessage {
    #[inline]
    fn from(schema: &Schema) -> Self {
        SchemaMessage {
            columns: schema_to_column_pbs(schema),
        }
    }
}

impl TryFrom<&SchemaMessage> for Schema {
    type Error = Error;
    #[inline]
    fn try_from(msg: &SchemaMessage) -> Result<Self> {
        column_pbs_to_schema(&msg.columns)
    }
}

/// Convert column to its wire representation.
/// Key flag is not known by a single column, and is left false.
#[inline]
pub fn column_schema_to_pb(col: &ColumnSchema) -> ColumnSchemaPB {
    ColumnSchemaPB {
        name: col.name().to_string(),
        ty: col.ty(),
        is_key: false,
        is_nullable: col.is_nullable(),
    }
}

#[inline]
pub fn column_schema_from_pb(pb: &ColumnSchemaPB) -> ColumnSchema {
    ColumnSchema::new(&pb.name, pb.ty, pb.is_nullable)
}

/// Build schema from wire columns.
///
/// Key columns must form a prefix of the column list.
pub fn column_pbs_to_schema(pbs: &[ColumnSchemaPB]) -> Result<Schema> {
    let mut columns = Vec::with_capacity(pbs.len());
    let mut num_key_columns = 0;
    let mut is_handling_key = true;
    for pb in pbs {
        columns.push(column_schema_from_pb(pb));
        if pb.is_key {
            if !is_handling_key {
                return Err(Error::invalid_argument(format!(
                    "Got out-of-order key column: {}",
                    pb
                )));
            }
            num_key_columns += 1;
        } else {
            is_handling_key = false;
        }
    }
    let schema = Schema::new(columns, num_key_columns)?;
    Ok(schema)
}

/// Convert schema to wire columns.
pub fn schema_to_column_pbs(schema: &Schema) -> Vec<ColumnSchemaPB> {
    schema
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let mut pb = column_schema_to_pb(col);
            pb.is_key = schema.is_key_column(idx);
            pb
        })
        .collect()
}
