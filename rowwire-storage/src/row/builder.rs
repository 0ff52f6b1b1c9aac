use crate::row::indirect::IndirectRef;
use crate::row::{set_null_bit, ContiguousRow, ContiguousRowMut};
use rowwire_catalog::Schema;
use rowwire_datatype::{ByteRepr, Typed};

/// RowBuilder fills a single row column by column.
///
/// Values of variable-length columns are copied into boxed
/// buffers owned by the builder, so their addresses are stable
/// until the builder is reset or dropped.
/// The builder can be reused for next row after [`RowBuilder::reset`].
pub struct RowBuilder<'a> {
    schema: &'a Schema,
    data: Box<[u8]>,
    payloads: Vec<Box<[u8]>>,
    col_idx: usize,
}

impl<'a> RowBuilder<'a> {
    #[inline]
    pub fn new(schema: &'a Schema) -> Self {
        RowBuilder {
            schema,
            data: vec![0u8; schema.row_size()].into_boxed_slice(),
            payloads: vec![],
            col_idx: 0,
        }
    }

    #[inline]
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Reset the builder to build next row.
    /// Null flags and variable-length descriptors are cleared.
    /// Cells of fixed-length columns keep bytes of previous row
    /// until overwritten.
    #[inline]
    pub fn reset(&mut self) {
        self.data[..self.schema.null_bitmap_size()].fill(0);
        let mut row = ContiguousRowMut::new(self.schema, &mut self.data);
        for col_idx in self.schema.indirect_columns() {
            row.zero_cell(col_idx);
        }
        self.payloads.clear();
        self.col_idx = 0;
    }

    /// Add fixed-length value to current column.
    #[inline]
    pub fn add_val<T: Typed + ByteRepr>(&mut self, val: T) {
        debug_assert!(self.col_idx < self.schema.num_columns());
        let col_idx = self.col_idx;
        ContiguousRowMut::new(self.schema, &mut self.data).set(col_idx, val);
        self.col_idx += 1;
    }

    #[inline]
    pub fn add_u8(&mut self, val: u8) {
        self.add_val(val)
    }

    #[inline]
    pub fn add_i8(&mut self, val: i8) {
        self.add_val(val)
    }

    #[inline]
    pub fn add_u16(&mut self, val: u16) {
        self.add_val(val)
    }

    #[inline]
    pub fn add_i16(&mut self, val: i16) {
        self.add_val(val)
    }

    #[inline]
    pub fn add_u32(&mut self, val: u32) {
        self.add_val(val)
    }

    #[inline]
    pub fn add_i32(&mut self, val: i32) {
        self.add_val(val)
    }

    #[inline]
    pub fn add_u64(&mut self, val: u64) {
        self.add_val(val)
    }

    #[inline]
    pub fn add_i64(&mut self, val: i64) {
        self.add_val(val)
    }

    #[inline]
    pub fn add_f32(&mut self, val: f32) {
        self.add_val(val)
    }

    #[inline]
    pub fn add_f64(&mut self, val: f64) {
        self.add_val(val)
    }

    #[inline]
    pub fn add_bool(&mut self, val: bool) {
        self.add_val(val)
    }

    /// Add string value to current column.
    #[inline]
    pub fn add_string(&mut self, val: &str) {
        self.add_var(val.as_bytes())
    }

    /// Add binary value to current column.
    #[inline]
    pub fn add_binary(&mut self, val: &[u8]) {
        self.add_var(val)
    }

    #[inline]
    fn add_var(&mut self, val: &[u8]) {
        debug_assert!(self.col_idx < self.schema.num_columns());
        debug_assert!(self.schema.column(self.col_idx).ty().is_indirect());
        let payload: Box<[u8]> = val.into();
        let r = IndirectRef::of(&payload);
        self.payloads.push(payload);
        let col_idx = self.col_idx;
        let mut row = ContiguousRowMut::new(self.schema, &mut self.data);
        row.set_indirect(col_idx, r);
        if self.schema.column(col_idx).is_nullable() {
            set_null_bit(self.schema, &mut self.data, col_idx, false);
        }
        self.col_idx += 1;
    }

    /// Add null to current column.
    /// Only the null flag is set, the cell is left as is.
    #[inline]
    pub fn add_null(&mut self) {
        debug_assert!(self.col_idx < self.schema.num_columns());
        debug_assert!(self.schema.column(self.col_idx).is_nullable());
        set_null_bit(self.schema, &mut self.data, self.col_idx, true);
        self.col_idx += 1;
    }

    /// Returns the row built so far.
    #[inline]
    pub fn row(&self) -> ContiguousRow<'_> {
        debug_assert!(self.col_idx == self.schema.num_columns());
        // SAFETY:
        //
        // Every variable-length descriptor is either zeroed(empty)
        // or points to a payload owned by this builder, which is
        // not changed while the row is borrowed.
        unsafe { ContiguousRow::new_unchecked(self.schema, &self.data) }
    }
}
