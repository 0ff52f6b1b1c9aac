use bytemuck::{Pod, Zeroable};
use rowwire_datatype::INDIRECT_SLOT_SIZE;
use std::mem;

const _: () = assert!(mem::size_of::<RawIndirect>() == INDIRECT_SLOT_SIZE);

/// Raw 16 bytes stored in the slot of a variable-length column.
/// The first word is either an offset or an address, depending
/// on the phase of the row.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
struct RawIndirect {
    word: u64,
    len: u64,
}

/// IndirectRef is the reference descriptor of a variable-length value.
///
/// The slot itself carries no tag. Rows in a row block being assembled
/// or just received hold offsets into the indirect buffer of that block.
/// Rows that can be read hold addresses of memory kept alive by the
/// owner of the row.
/// Conversion from offset to address happens only through
/// [`IndirectRef::materialize`], which checks bounds first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndirectRef {
    /// Relative position within the indirect buffer.
    Offset { offset: u64, len: u64 },
    /// Address of the value in memory.
    Materialized { addr: usize, len: usize },
}

impl IndirectRef {
    /// Create a materialized reference of given bytes.
    #[inline]
    pub fn of(data: &[u8]) -> Self {
        IndirectRef::Materialized {
            addr: data.as_ptr() as usize,
            len: data.len(),
        }
    }

    /// Interpret slot as relative offset into indirect buffer.
    #[inline]
    pub fn read_offset(slot: &[u8]) -> Self {
        let raw = read_raw(slot);
        IndirectRef::Offset {
            offset: raw.word,
            len: raw.len,
        }
    }

    /// Interpret slot as materialized address.
    #[inline]
    pub fn read_materialized(slot: &[u8]) -> Self {
        let raw = read_raw(slot);
        IndirectRef::Materialized {
            addr: raw.word as usize,
            len: raw.len as usize,
        }
    }

    /// Write the descriptor into slot.
    #[inline]
    pub fn write(&self, slot: &mut [u8]) {
        let raw = match *self {
            IndirectRef::Offset { offset, len } => RawIndirect { word: offset, len },
            IndirectRef::Materialized { addr, len } => RawIndirect {
                word: addr as u64,
                len: len as u64,
            },
        };
        slot[..INDIRECT_SLOT_SIZE].copy_from_slice(bytemuck::bytes_of(&raw));
    }

    /// Returns length of referenced value.
    #[allow(clippy::len_without_is_empty)]
    #[inline]
    pub fn len(&self) -> u64 {
        match *self {
            IndirectRef::Offset { len, .. } => len,
            IndirectRef::Materialized { len, .. } => len as u64,
        }
    }

    /// Convert relative offset to address into given indirect buffer.
    /// Returns None if the referenced range overflows or is
    /// out of bound of the buffer.
    /// A materialized reference is returned as is.
    #[inline]
    pub fn materialize(self, indirect: &[u8]) -> Option<Self> {
        match self {
            IndirectRef::Offset { offset, len } => {
                let end = offset.checked_add(len)?;
                if end > indirect.len() as u64 {
                    return None;
                }
                // both are within buffer length, so fit in usize.
                let data = &indirect[offset as usize..end as usize];
                Some(IndirectRef::of(data))
            }
            m @ IndirectRef::Materialized { .. } => Some(m),
        }
    }

    /// Returns bytes referenced by a materialized descriptor.
    ///
    /// # Safety
    ///
    /// Caller must guarantee the descriptor is materialized and
    /// the referenced memory is alive and unmodified for lifetime 'a.
    #[inline]
    pub unsafe fn as_bytes<'a>(&self) -> &'a [u8] {
        match *self {
            IndirectRef::Materialized { len: 0, .. } => &[],
            IndirectRef::Materialized { addr, len } => {
                std::slice::from_raw_parts(addr as *const u8, len)
            }
            IndirectRef::Offset { .. } => unreachable!("offset must be materialized before read"),
        }
    }
}

#[inline]
fn read_raw(slot: &[u8]) -> RawIndirect {
    bytemuck::pod_read_unaligned(&slot[..INDIRECT_SLOT_SIZE])
}
