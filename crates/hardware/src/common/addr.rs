//! Address decomposition.
//!
//! This module splits a raw 64-bit address into the fields a set-associative
//! cache looks at. It provides the following:
//! 1. **Free decoder:** [`decode`] maps `(address, block_bits, set_bits)` to `(set_index, tag)`.
//! 2. **Validated layout:** [`AddressLayout`] fixes the bit widths once and rejects
//!    layouts wider than the address.
//! 3. **Field view:** [`DecodedAddr`] carries tag, set index and block offset together.
//!
//! ```text
//!  63                      b+s         b          0
//! +-------------------------+-----------+----------+
//! |           tag           | set index |  offset  |
//! +-------------------------+-----------+----------+
//! ```

use super::error::ConfigError;

/// Width of a trace address in bits.
pub const ADDRESS_BITS: u32 = u64::BITS;

/// Returns a mask with the low `bits` bits set.
#[inline(always)]
const fn low_mask(bits: u32) -> u64 {
    if bits >= ADDRESS_BITS {
        u64::MAX
    } else {
        (1 << bits) - 1
    }
}

/// Logical right shift that yields zero once every bit has been shifted out.
#[inline(always)]
const fn shift_out(value: u64, bits: u32) -> u64 {
    if bits >= ADDRESS_BITS {
        0
    } else {
        value >> bits
    }
}

/// Decodes `address` into `(set_index, tag)`.
///
/// The block offset (the low `block_bits` bits) does not take part in the
/// hit/miss decision and is discarded. No range checking is done here: a
/// layout wider than 64 bits simply produces a zero tag. Use
/// [`AddressLayout::new`] to reject such layouts up front.
///
/// # Arguments
///
/// * `address` - The raw address from the trace.
/// * `block_bits` - Number of block-offset bits (`b`).
/// * `set_bits` - Number of set-index bits (`s`).
///
/// # Returns
///
/// The pair `(set_index, tag)`.
#[inline]
pub const fn decode(address: u64, block_bits: u32, set_bits: u32) -> (u64, u64) {
    let set_index = shift_out(address, block_bits) & low_mask(set_bits);
    let tag = shift_out(address, block_bits.saturating_add(set_bits));
    (set_index, tag)
}

/// The three fields of a decoded address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecodedAddr {
    /// High-order bits identifying the block within its set.
    pub tag: u64,
    /// Index of the set the address maps to.
    pub set_index: u64,
    /// Byte offset within the block.
    pub offset: u64,
}

/// Bit layout of an address for a given cache organization.
///
/// Construction checks that the offset and set-index fields together fit in
/// a 64-bit address, so every `decode` call is well defined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressLayout {
    block_bits: u32,
    set_bits: u32,
}

impl AddressLayout {
    /// Creates a layout with `block_bits` offset bits and `set_bits` index bits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AddressBitsOverflow`] when
    /// `block_bits + set_bits` exceeds [`ADDRESS_BITS`].
    pub const fn new(block_bits: u32, set_bits: u32) -> Result<Self, ConfigError> {
        match block_bits.checked_add(set_bits) {
            Some(width) if width <= ADDRESS_BITS => Ok(Self {
                block_bits,
                set_bits,
            }),
            _ => Err(ConfigError::AddressBitsOverflow {
                block_bits,
                set_bits,
            }),
        }
    }

    /// Number of block-offset bits.
    #[inline(always)]
    pub const fn block_bits(&self) -> u32 {
        self.block_bits
    }

    /// Number of set-index bits.
    #[inline(always)]
    pub const fn set_bits(&self) -> u32 {
        self.set_bits
    }

    /// Number of bits left over for the tag.
    #[inline(always)]
    pub const fn tag_bits(&self) -> u32 {
        ADDRESS_BITS - self.block_bits - self.set_bits
    }

    /// Mask selecting the block offset.
    #[inline(always)]
    pub const fn offset_mask(&self) -> u64 {
        low_mask(self.block_bits)
    }

    /// Mask selecting the set index once the offset has been shifted out.
    #[inline(always)]
    pub const fn set_mask(&self) -> u64 {
        low_mask(self.set_bits)
    }

    /// Splits `address` into tag, set index and offset.
    #[inline]
    pub const fn decode(&self, address: u64) -> DecodedAddr {
        let (set_index, tag) = decode(address, self.block_bits, self.set_bits);
        DecodedAddr {
            tag,
            set_index,
            offset: address & self.offset_mask(),
        }
    }
}
