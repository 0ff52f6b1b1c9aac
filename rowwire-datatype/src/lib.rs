#[macro_use]
mod macros;
pub mod byte_repr;
pub mod error;

pub use byte_repr::ByteRepr;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the reference descriptor stored in the slot of
/// a variable-length column: 8-byte offset(or address) and 8-byte length.
pub const INDIRECT_SLOT_SIZE: usize = 16;

/// DataType is the fixed catalog of column types supported
/// by the row format.
/// The discriminant is the type id on the wire, so the order
/// of variants must not change.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DataType {
    UInt8 = 0,
    Int8 = 1,
    UInt16 = 2,
    Int16 = 3,
    UInt32 = 4,
    Int32 = 5,
    UInt64 = 6,
    Int64 = 7,
    String = 8,
    Bool = 9,
    Float = 10,
    Double = 11,
    Binary = 12,
}

impl DataType {
    /// Returns the type id used on the wire.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Returns number of bytes one value of this type occupies
    /// inside a row.
    /// Variable-length types store a reference descriptor instead
    /// of the value itself.
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            DataType::UInt8 | DataType::Int8 | DataType::Bool => 1,
            DataType::UInt16 | DataType::Int16 => 2,
            DataType::UInt32 | DataType::Int32 | DataType::Float => 4,
            DataType::UInt64 | DataType::Int64 | DataType::Double => 8,
            DataType::String | DataType::Binary => INDIRECT_SLOT_SIZE,
        }
    }

    /// Returns whether the value is stored out of row and
    /// referenced by the slot.
    #[inline]
    pub const fn is_indirect(self) -> bool {
        matches!(self, DataType::String | DataType::Binary)
    }

    #[inline]
    pub const fn to_lower(self) -> &'static str {
        match self {
            DataType::UInt8 => "uint8",
            DataType::Int8 => "int8",
            DataType::UInt16 => "uint16",
            DataType::Int16 => "int16",
            DataType::UInt32 => "uint32",
            DataType::Int32 => "int32",
            DataType::UInt64 => "uint64",
            DataType::Int64 => "int64",
            DataType::String => "string",
            DataType::Bool => "bool",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::Binary => "binary",
        }
    }
}

impl TryFrom<u8> for DataType {
    type Error = Error;
    #[inline]
    fn try_from(src: u8) -> Result<Self> {
        let ty = match src {
            0 => DataType::UInt8,
            1 => DataType::Int8,
            2 => DataType::UInt16,
            3 => DataType::Int16,
            4 => DataType::UInt32,
            5 => DataType::Int32,
            6 => DataType::UInt64,
            7 => DataType::Int64,
            8 => DataType::String,
            9 => DataType::Bool,
            10 => DataType::Float,
            11 => DataType::Double,
            12 => DataType::Binary,
            _ => return Err(Error::InvalidTypeId(src)),
        };
        Ok(ty)
    }
}

impl From<DataType> for u8 {
    #[inline]
    fn from(src: DataType) -> Self {
        src.id()
    }
}

impl fmt::Display for DataType {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_lower())
    }
}

pub trait Typed {
    /// Returns type of data
    fn ty() -> DataType;
}

impl_typed!(u8, DataType::UInt8);
impl_typed!(i8, DataType::Int8);
impl_typed!(u16, DataType::UInt16);
impl_typed!(i16, DataType::Int16);
impl_typed!(u32, DataType::UInt32);
impl_typed!(i32, DataType::Int32);
impl_typed!(u64, DataType::UInt64);
impl_typed!(i64, DataType::Int64);
impl_typed!(f32, DataType::Float);
impl_typed!(f64, DataType::Double);
impl_typed!(bool, DataType::Bool);
impl_typed!(str, DataType::String);
impl_typed!([u8], DataType::Binary);
