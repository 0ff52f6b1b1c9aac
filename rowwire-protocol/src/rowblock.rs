//! Row block is the transfer unit of rows.
//!
//! Encoded rows are concatenated in `rows`, each keeping the layout
//! of its schema. Payloads of variable-length columns are appended to
//! `indirect_data`, and the slot holds offset and length into it.
//! Decoder turns the offsets back into addresses in place, so rows can
//! be read without copying.
use crate::error::{Error, Result};
use rowwire_catalog::Schema;
use rowwire_storage::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowBlockMessage {
    pub rows: Vec<u8>,
    pub indirect_data: Vec<u8>,
}

/// Append one row to the row block.
///
/// Null cells are zeroed in the block regardless of what the source
/// row holds, and variable-length values are copied into indirect data.
pub fn add_row_to_row_block(row: &ContiguousRow<'_>, block: &mut RowBlockMessage) {
    let schema = row.schema();
    let offset = block.rows.len();
    block.rows.extend_from_slice(row.row_data());
    let mut copied = ContiguousRowMut::new(schema, &mut block.rows[offset..]);
    for (col_idx, col) in schema.columns().iter().enumerate() {
        if col.is_nullable() && copied.is_null(col_idx) {
            copied.zero_cell(col_idx);
            continue;
        }
        if col.ty().is_indirect() {
            let payload = row.get_bytes(col_idx).unwrap_or_default();
            let r = IndirectRef::Offset {
                offset: block.indirect_data.len() as u64,
                len: payload.len() as u64,
            };
            block.indirect_data.extend_from_slice(payload);
            copied.set_indirect(col_idx, r);
        }
    }
}

/// Validate the row block and return views of all rows in it.
///
/// Rows are fixed up in place, so the block must not be decoded twice.
/// On error, the block is left partially fixed up and should be discarded.
pub fn extract_rows_from_row_block<'a>(
    schema: &'a Schema,
    block: &'a mut RowBlockMessage,
) -> Result<Vec<ContiguousRow<'a>>> {
    let mut decoder = RowBlockDecoder::new(schema, block);
    decoder.check_size()?;
    decoder.fix_up_offsets()?;
    decoder.into_rows()
}

/// RowBlockEncoder appends rows of one schema into an owned block.
pub struct RowBlockEncoder<'a> {
    schema: &'a Schema,
    block: RowBlockMessage,
    num_rows: usize,
}

impl<'a> RowBlockEncoder<'a> {
    #[inline]
    pub fn new(schema: &'a Schema) -> Self {
        RowBlockEncoder {
            schema,
            block: RowBlockMessage::default(),
            num_rows: 0,
        }
    }

    #[inline]
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    #[inline]
    pub fn append(&mut self, row: &ContiguousRow<'_>) {
        debug_assert!(row.schema() == self.schema);
        add_row_to_row_block(row, &mut self.block);
        self.num_rows += 1;
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[inline]
    pub fn finish(self) -> RowBlockMessage {
        self.block
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    Unvalidated,
    SizeChecked,
    OffsetsFixedUp,
    Ready,
    Rejected,
}

impl fmt::Display for DecodeState {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// RowBlockDecoder validates a received row block step by step.
///
/// Steps must be called in order: `check_size`, `fix_up_offsets`
/// and `into_rows`. Any failure moves the decoder to
/// [`DecodeState::Rejected`], and no row can be read afterwards.
pub struct RowBlockDecoder<'a> {
    schema: &'a Schema,
    block: &'a mut RowBlockMessage,
    state: DecodeState,
}

impl<'a> RowBlockDecoder<'a> {
    #[inline]
    pub fn new(schema: &'a Schema, block: &'a mut RowBlockMessage) -> Self {
        RowBlockDecoder {
            schema,
            block,
            state: DecodeState::Unvalidated,
        }
    }

    #[inline]
    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Returns number of rows in the block.
    /// Only meaningful after size check.
    #[inline]
    pub fn num_rows(&self) -> usize {
        let row_size = self.schema.row_size();
        if row_size == 0 {
            0
        } else {
            self.block.rows.len() / row_size
        }
    }

    /// Check that row data consists of whole rows.
    pub fn check_size(&mut self) -> Result<()> {
        self.expect_state(DecodeState::Unvalidated)?;
        let row_size = self.schema.row_size();
        let n = self.block.rows.len();
        let valid = if row_size == 0 {
            n == 0
        } else {
            n % row_size == 0
        };
        if !valid {
            self.state = DecodeState::Rejected;
            return Err(Error::corruption(format!(
                "Row block has {} bytes of data which is not a multiple of row size {}",
                n, row_size
            )));
        }
        self.state = DecodeState::SizeChecked;
        Ok(())
    }

    /// Replace offsets of all non-null variable-length cells with
    /// addresses into indirect data.
    pub fn fix_up_offsets(&mut self) -> Result<()> {
        self.expect_state(DecodeState::SizeChecked)?;
        let schema = self.schema;
        let row_size = schema.row_size();
        if row_size > 0 {
            let block = &mut *self.block;
            let indirect = &block.indirect_data;
            for col_idx in schema.indirect_columns() {
                let col = schema.column(col_idx);
                for (row_idx, data) in block.rows.chunks_exact_mut(row_size).enumerate() {
                    let mut row = ContiguousRowMut::new(schema, data);
                    if col.is_nullable() && row.is_null(col_idx) {
                        continue;
                    }
                    let r = row.indirect_offset(col_idx);
                    match r.materialize(indirect) {
                        Some(m) => row.set_indirect(col_idx, m),
                        None => {
                            self.state = DecodeState::Rejected;
                            let (offset, len) = match r {
                                IndirectRef::Offset { offset, len } => (offset, len),
                                IndirectRef::Materialized { addr, len } => {
                                    (addr as u64, len as u64)
                                }
                            };
                            return Err(Error::corruption(format!(
                                "Row #{} contained bad indirect slice for column {}: ({}, {})",
                                row_idx, col, offset, len
                            )));
                        }
                    }
                }
            }
        }
        self.state = DecodeState::OffsetsFixedUp;
        Ok(())
    }

    /// Returns views of all rows, borrowing the whole block.
    pub fn into_rows(mut self) -> Result<Vec<ContiguousRow<'a>>> {
        self.expect_state(DecodeState::OffsetsFixedUp)?;
        self.state = DecodeState::Ready;
        let RowBlockDecoder { schema, block, .. } = self;
        let block: &'a RowBlockMessage = block;
        let row_size = schema.row_size();
        if row_size == 0 {
            return Ok(vec![]);
        }
        let rows: Vec<_> = block
            .rows
            .chunks_exact(row_size)
            .map(|data| {
                // SAFETY:
                //
                // All non-null variable-length cells are materialized
                // and point into indirect data, which is borrowed
                // immutably together with rows for lifetime 'a.
                unsafe { ContiguousRow::new_unchecked(schema, data) }
            })
            .collect();
        log::debug!(
            "extracted {} rows from row block, indirect data {} bytes",
            rows.len(),
            block.indirect_data.len()
        );
        Ok(rows)
    }

    #[inline]
    fn expect_state(&mut self, expected: DecodeState) -> Result<()> {
        if self.state != expected {
            let actual = self.state;
            self.state = DecodeState::Rejected;
            return Err(Error::runtime_error(format!(
                "Row block decoder in state {}, expected {}",
                actual, expected
            )));
        }
        Ok(())
    }
}
