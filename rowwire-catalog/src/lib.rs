pub mod error;

use crate::error::{Error, Result};
use indexmap::IndexMap;
use rowwire_datatype::DataType;
use smol_str::SmolStr;
use std::fmt;

/// ColumnSchema describes a single column.
/// It is immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnSchema {
    name: SmolStr,
    ty: DataType,
    nullable: bool,
}

impl ColumnSchema {
    #[inline]
    pub fn new(name: &str, ty: DataType, nullable: bool) -> Self {
        ColumnSchema {
            name: SmolStr::new(name),
            ty,
            nullable,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ty(&self) -> DataType {
        self.ty
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

impl fmt::Display for ColumnSchema {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{} {}]",
            self.name,
            self.ty,
            if self.nullable { "NULLABLE" } else { "NOT NULL" }
        )
    }
}

/// Schema is an ordered list of columns, in which the first
/// `num_key_columns` columns form the primary key.
///
/// Rows of a schema are laid out as:
///
/// | field       | length(B)                                 |
/// |-------------|-------------------------------------------|
/// | null_bitmap | (nullable column count + 7) / 8           |
/// | c_0         | fixed length of type, or 16 for var-len   |
/// | c_1         | same as above                             |
/// | ...         | ...                                       |
/// | c_n         | same as above                             |
///
/// The layout is computed once when schema is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<ColumnSchema>,
    num_key_columns: usize,
    name_to_index: IndexMap<SmolStr, usize>,
    // offset of each column slot, relative to row start.
    col_offsets: Vec<usize>,
    // position of each nullable column in null bitmap.
    null_bits: Vec<Option<usize>>,
    null_bitmap_size: usize,
    row_size: usize,
}

impl Schema {
    /// Create a new schema.
    /// Fails if key column number exceeds column number,
    /// or any column name appears more than once.
    pub fn new(columns: Vec<ColumnSchema>, num_key_columns: usize) -> Result<Self> {
        if num_key_columns > columns.len() {
            return Err(Error::TooManyKeyColumns {
                num_key_columns,
                num_columns: columns.len(),
            });
        }
        let mut name_to_index = IndexMap::with_capacity(columns.len());
        for (i, col) in columns.iter().enumerate() {
            if name_to_index.insert(col.name.clone(), i).is_some() {
                return Err(Error::DuplicateColumnName(col.name.clone()));
            }
        }
        let mut null_bits = Vec::with_capacity(columns.len());
        let mut n_nullable = 0;
        for col in &columns {
            if col.nullable {
                null_bits.push(Some(n_nullable));
                n_nullable += 1;
            } else {
                null_bits.push(None);
            }
        }
        let null_bitmap_size = (n_nullable + 7) / 8;
        let mut col_offsets = Vec::with_capacity(columns.len());
        let mut offset = null_bitmap_size;
        for col in &columns {
            col_offsets.push(offset);
            offset += col.ty.size();
        }
        Ok(Schema {
            columns,
            num_key_columns,
            name_to_index,
            col_offsets,
            null_bits,
            null_bitmap_size,
            row_size: offset,
        })
    }

    #[inline]
    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    #[inline]
    pub fn column(&self, idx: usize) -> &ColumnSchema {
        &self.columns[idx]
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn num_key_columns(&self) -> usize {
        self.num_key_columns
    }

    #[inline]
    pub fn is_key_column(&self, idx: usize) -> bool {
        idx < self.num_key_columns
    }

    /// Returns index of column with given name.
    #[inline]
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    #[inline]
    pub fn has_nullables(&self) -> bool {
        self.null_bitmap_size > 0
    }

    /// Returns byte number of null bitmap at the head of each row.
    #[inline]
    pub fn null_bitmap_size(&self) -> usize {
        self.null_bitmap_size
    }

    /// Returns position of the column in null bitmap,
    /// None if the column is not nullable.
    #[inline]
    pub fn null_bit(&self, idx: usize) -> Option<usize> {
        self.null_bits[idx]
    }

    /// Returns offset of the column slot relative to row start.
    #[inline]
    pub fn column_offset(&self, idx: usize) -> usize {
        self.col_offsets[idx]
    }

    /// Returns total byte number of one row.
    #[inline]
    pub fn row_size(&self) -> usize {
        self.row_size
    }

    /// Returns indexes of all columns whose values are stored
    /// out of row.
    #[inline]
    pub fn indirect_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.ty.is_indirect())
            .map(|(i, _)| i)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Schema [")?;
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                writeln!(f, ",")?;
            }
            write!(f, "\t{}", col)?;
        }
        writeln!(f)?;
        write!(f, "] key: [")?;
        for (i, col) in self.columns[..self.num_key_columns].iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", col.name)?;
        }
        write!(f, "]")
    }
}
