//! Packed size/alignment fields
//!
//! A field stores the size in bits 0..28 and log2 of the alignment in bits 28..32.

use super::error::{Bnd2Error, Result};

pub const SIZE_MASK: u32 = 0x0FFF_FFFF;
const ALIGNMENT_SHIFT: u32 = 28;
const MAX_ALIGNMENT: u32 = 1 << 15;

/// Required alignment of each of the three streams, both inside a resource and for the pool bases
pub const STREAM_ALIGNMENTS: [u32; 3] = [0x10, 0x80, 0x80];

/// Pack a size and alignment into one field. An empty stream is always encoded as 0.
pub fn pack(size: u32, alignment: u32) -> Result<u32> {
    if size == 0 {
        return Ok(0);
    }
    if !alignment.is_power_of_two() || alignment > MAX_ALIGNMENT {
        return Err(Bnd2Error::InvalidAlignment(alignment));
    }
    if size > SIZE_MASK {
        return Err(Bnd2Error::SizeOverflow {
            what: "stream size",
            size: size as u64,
        });
    }

    Ok(size | (alignment.trailing_zeros() << ALIGNMENT_SHIFT))
}

/// Returns (size, alignment)
pub fn unpack(field: u32) -> (u32, u32) {
    (field & SIZE_MASK, 1 << (field >> ALIGNMENT_SHIFT))
}

pub fn align_offset(offset: usize, alignment: usize) -> usize {
    offset.next_multiple_of(alignment)
}

/// Zero-pad a buffer up to the next multiple of `alignment`
pub fn pad_to(buf: &mut Vec<u8>, alignment: usize) {
    buf.resize(align_offset(buf.len(), alignment), 0);
}
