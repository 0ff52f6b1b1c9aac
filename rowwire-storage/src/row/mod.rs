pub mod builder;
pub mod indirect;

use crate::row::indirect::IndirectRef;
use rowwire_catalog::Schema;
use rowwire_datatype::{ByteRepr, Typed};
use std::fmt;
use std::str::Utf8Error;

/// ContiguousRow is a read-only view of a row stored in
/// contiguous memory.
/// The row does not own the memory, neither the values
/// referenced by its variable-length columns.
#[derive(Clone, Copy)]
pub struct ContiguousRow<'a> {
    schema: &'a Schema,
    data: &'a [u8],
}

impl<'a> ContiguousRow<'a> {
    /// Create a row view on given memory.
    ///
    /// # Safety
    ///
    /// Every non-null variable-length column of the row must hold
    /// a materialized reference, pointing to memory which is alive
    /// and unmodified for lifetime 'a.
    #[inline]
    pub unsafe fn new_unchecked(schema: &'a Schema, data: &'a [u8]) -> Self {
        debug_assert!(data.len() == schema.row_size());
        ContiguousRow { schema, data }
    }

    #[inline]
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Returns all bytes of the row.
    #[inline]
    pub fn row_data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn row_size(&self) -> usize {
        self.data.len()
    }

    /// Returns offset of the cell of given column.
    #[inline]
    pub fn cell_offset(&self, col_idx: usize) -> usize {
        self.schema.column_offset(col_idx)
    }

    /// Returns bytes of the cell of given column.
    #[inline]
    pub fn cell(&self, col_idx: usize) -> &'a [u8] {
        cell(self.schema, self.data, col_idx)
    }

    /// Returns whether column by given index is null.
    #[inline]
    pub fn is_null(&self, col_idx: usize) -> bool {
        is_null(self.schema, self.data, col_idx)
    }

    /// Returns fixed-length value by given column index,
    /// or None if the value is null.
    #[inline]
    pub fn get<T: Typed + ByteRepr>(&self, col_idx: usize) -> Option<T> {
        debug_assert!(self.schema.column(col_idx).ty() == T::ty());
        if self.is_null(col_idx) {
            return None;
        }
        Some(T::from_bytes(self.cell(col_idx)))
    }

    /// Returns variable-length value by given column index,
    /// or None if the value is null.
    #[inline]
    pub fn get_bytes(&self, col_idx: usize) -> Option<&'a [u8]> {
        debug_assert!(self.schema.column(col_idx).ty().is_indirect());
        if self.is_null(col_idx) {
            return None;
        }
        let r = IndirectRef::read_materialized(self.cell(col_idx));
        // SAFETY:
        //
        // Constructor requires every non-null reference to be
        // materialized and alive for lifetime 'a.
        Some(unsafe { r.as_bytes() })
    }

    /// Returns string value by given column index.
    #[inline]
    pub fn get_str(&self, col_idx: usize) -> Result<Option<&'a str>, Utf8Error> {
        self.get_bytes(col_idx).map(std::str::from_utf8).transpose()
    }
}

impl fmt::Debug for ContiguousRow<'_> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContiguousRow")
            .field("row_size", &self.data.len())
            .finish()
    }
}

/// ContiguousRowMut is a mutable view of a row stored in
/// contiguous memory.
/// It only writes bytes of the row, so no variable-length
/// value can be read through it.
pub struct ContiguousRowMut<'a> {
    schema: &'a Schema,
    data: &'a mut [u8],
}

impl<'a> ContiguousRowMut<'a> {
    #[inline]
    pub fn new(schema: &'a Schema, data: &'a mut [u8]) -> Self {
        debug_assert!(data.len() == schema.row_size());
        ContiguousRowMut { schema, data }
    }

    #[inline]
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    #[inline]
    pub fn row_data(&self) -> &[u8] {
        self.data
    }

    #[inline]
    pub fn cell_offset(&self, col_idx: usize) -> usize {
        self.schema.column_offset(col_idx)
    }

    #[inline]
    pub fn cell(&self, col_idx: usize) -> &[u8] {
        cell(self.schema, self.data, col_idx)
    }

    /// Returns mutable bytes of the cell of given column.
    #[inline]
    pub fn cell_mut(&mut self, col_idx: usize) -> &mut [u8] {
        let offset = self.schema.column_offset(col_idx);
        let len = self.schema.column(col_idx).ty().size();
        &mut self.data[offset..offset + len]
    }

    #[inline]
    pub fn is_null(&self, col_idx: usize) -> bool {
        is_null(self.schema, self.data, col_idx)
    }

    /// Set or clear null flag of given column.
    /// Marking a column null also zeroes its cell, so no stale
    /// bytes are left behind.
    #[inline]
    pub fn set_null(&mut self, col_idx: usize, null: bool) {
        set_null_bit(self.schema, self.data, col_idx, null);
        if null {
            self.zero_cell(col_idx);
        }
    }

    /// Fill the cell of given column with zeros.
    #[inline]
    pub fn zero_cell(&mut self, col_idx: usize) {
        self.cell_mut(col_idx).fill(0);
    }

    /// Update fixed-length value and clear its null flag.
    #[inline]
    pub fn set<T: Typed + ByteRepr>(&mut self, col_idx: usize, val: T) {
        debug_assert!(self.schema.column(col_idx).ty() == T::ty());
        self.cell_mut(col_idx).copy_from_slice(&val.to_bytes());
        if self.schema.column(col_idx).is_nullable() {
            set_null_bit(self.schema, self.data, col_idx, false);
        }
    }

    /// Returns reference descriptor of given variable-length column,
    /// interpreted as relative offset.
    #[inline]
    pub fn indirect_offset(&self, col_idx: usize) -> IndirectRef {
        debug_assert!(self.schema.column(col_idx).ty().is_indirect());
        IndirectRef::read_offset(self.cell(col_idx))
    }

    /// Overwrite reference descriptor of given variable-length column.
    #[inline]
    pub fn set_indirect(&mut self, col_idx: usize, r: IndirectRef) {
        debug_assert!(self.schema.column(col_idx).ty().is_indirect());
        r.write(self.cell_mut(col_idx));
    }
}

#[inline]
fn cell<'a>(schema: &Schema, data: &'a [u8], col_idx: usize) -> &'a [u8] {
    let offset = schema.column_offset(col_idx);
    let len = schema.column(col_idx).ty().size();
    &data[offset..offset + len]
}

/// Returns whether the column is null in given row.
/// Non-nullable column is never null.
#[inline]
pub(crate) fn is_null(schema: &Schema, data: &[u8], col_idx: usize) -> bool {
    match schema.null_bit(col_idx) {
        Some(bit) => data[bit / 8] & (1 << (bit % 8)) != 0,
        None => false,
    }
}

#[inline]
pub(crate) fn set_null_bit(schema: &Schema, data: &mut [u8], col_idx: usize, null: bool) {
    let bit = schema.null_bit(col_idx);
    debug_assert!(bit.is_some(), "column must be nullable");
    if let Some(bit) = bit {
        if null {
            data[bit / 8] |= 1 << (bit % 8);
        } else {
            data[bit / 8] &= !(1 << (bit % 8));
        }
    }
}
