use smallvec::{smallvec, SmallVec};

/// ByteRepr converts fixed-length values between memory and
/// the byte format stored in row slots.
/// Native byte order is used, same as a plain memory copy of the value.
pub trait ByteRepr: Default + Copy {
    /// Convert value to byte vector.
    fn to_bytes(&self) -> SmallVec<[u8; 16]>;

    /// Convert bytes to value.
    /// Length of input must equal to size of the value.
    fn from_bytes(bs: &[u8]) -> Self;
}

macro_rules! impl_num_for_byte_repr {
    ($ty:ty) => {
        impl ByteRepr for $ty {
            #[inline]
            fn to_bytes(&self) -> SmallVec<[u8; 16]> {
                self.to_ne_bytes().into_iter().collect()
            }

            #[inline]
            fn from_bytes(bs: &[u8]) -> Self {
                let mut arr = [0u8; std::mem::size_of::<$ty>()];
                arr.copy_from_slice(bs);
                <$ty>::from_ne_bytes(arr)
            }
        }
    };
}

impl_num_for_byte_repr!(i8);
impl_num_for_byte_repr!(i16);
impl_num_for_byte_repr!(u16);
impl_num_for_byte_repr!(i32);
impl_num_for_byte_repr!(u32);
impl_num_for_byte_repr!(i64);
impl_num_for_byte_repr!(u64);
impl_num_for_byte_repr!(f32);
impl_num_for_byte_repr!(f64);

impl ByteRepr for u8 {
    #[inline]
    fn to_bytes(&self) -> SmallVec<[u8; 16]> {
        smallvec![*self]
    }

    #[inline]
    fn from_bytes(bs: &[u8]) -> Self {
        bs[0]
    }
}

// Any non-zero byte reads as true, the row format does not
// validate content of fixed-length columns.
impl ByteRepr for bool {
    #[inline]
    fn to_bytes(&self) -> SmallVec<[u8; 16]> {
        smallvec![*self as u8]
    }

    #[inline]
    fn from_bytes(bs: &[u8]) -> Self {
        bs[0] != 0
    }
}
