//! Row format of rowwire.
//!
//! A row is a fixed-size byte region laid out by its schema.
//! Values of fixed-length columns are stored inline, values of
//! variable-length columns are stored elsewhere and referenced
//! by a descriptor in the row.
pub mod row;

pub mod prelude {
    pub use crate::row::builder::RowBuilder;
    pub use crate::row::indirect::IndirectRef;
    pub use crate::row::{ContiguousRow, ContiguousRowMut};
}
