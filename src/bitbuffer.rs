//! Append-only bit sequence used to build segment payloads and the final data codewords.

use crate::error::QrError;

/// An appendable sequence of bits (0s and 1s), packed most significant bit first
/// into 32-bit words. Bits past the current length are always zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitBuffer {
    data: Vec<u32>,
    length: usize,
}

impl BitBuffer {
    /// Creates an empty bit buffer.
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(64),
            length: 0,
        }
    }

    /// Returns the number of bits appended so far.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the bit at the given index, where index 0 is the first bit appended.
    #[cfg(test)]
    pub(crate) fn get_bit(&self, index: usize) -> bool {
        assert!(index < self.length, "Bit index out of range");
        (self.data[index >> 5] >> (31 - (index & 31))) & 1 != 0
    }

    /// Returns the packed words covering the current length. The unused low bits of
    /// the last word are zero.
    pub fn words(&self) -> &[u32] {
        &self.data[..(self.length + 31) / 32]
    }

    /// Consumes the buffer, returning the packed words and the bit length.
    pub fn into_words(mut self) -> (Vec<u32>, usize) {
        self.data.truncate((self.length + 31) / 32);
        (self.data, self.length)
    }

    /// Packs the bits into bytes, most significant bit first.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::State`] if the length is not a multiple of 8.
    pub fn to_bytes(&self) -> Result<Vec<u8>, QrError> {
        if self.length % 8 != 0 {
            return Err(QrError::state("Data is not a whole number of bytes"));
        }
        Ok((0..self.length / 8)
            .map(|i| (self.data[i >> 2] >> (24 - ((i & 3) << 3))) as u8)
            .collect())
    }

    /// Appends the given number of low-order bits of the given value, most significant
    /// bit first.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidArgument`] if `len > 31` or `val` has bits set at or
    /// above position `len`, and [`QrError::State`] if the buffer would overflow.
    pub fn append_bits(&mut self, mut val: u32, mut len: u8) -> Result<(), QrError> {
        if len > 31 || (val >> len) != 0 {
            return Err(QrError::invalid("Value out of range"));
        }
        if usize::from(len) > usize::MAX - self.length {
            return Err(QrError::state("Maximum length reached"));
        }
        if len == 0 {
            return Ok(());
        }
        self.reserve_bits(usize::from(len));

        let mut remain = 32 - (self.length & 31) as u8;
        if remain < len {
            self.data[self.length >> 5] |= val >> (len - remain);
            self.length += usize::from(remain);
            debug_assert_eq!(self.length & 31, 0);
            len -= remain;
            val &= (1u32 << len) - 1;
            remain = 32;
        }
        self.data[self.length >> 5] |= val << (remain - len);
        self.length += usize::from(len);
        Ok(())
    }

    /// Appends the first `len` bits of the given packed words (same layout as
    /// [`BitBuffer::words`]).
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidArgument`] if `len` exceeds the capacity of `vals` or
    /// the last word has bits set beyond `len`.
    pub fn append_words(&mut self, vals: &[u32], len: usize) -> Result<(), QrError> {
        if len == 0 {
            return Ok(());
        }
        if len > vals.len().saturating_mul(32) {
            return Err(QrError::invalid("Value out of range"));
        }
        let wholewords: usize = len / 32;
        let tailbits: u8 = (len % 32) as u8;
        if tailbits > 0 && vals[wholewords] << tailbits != 0 {
            return Err(QrError::invalid("Last word must have low bits clear"));
        }
        if len > usize::MAX - self.length {
            return Err(QrError::state("Maximum length reached"));
        }
        self.reserve_bits(len);

        let shift: usize = self.length % 32;
        if shift == 0 {
            let start = self.length / 32;
            let count = (len + 31) / 32;
            self.data[start..start + count].copy_from_slice(&vals[..count]);
            self.length += len;
        } else {
            for &word in &vals[..wholewords] {
                self.data[self.length >> 5] |= word >> shift;
                self.length += 32;
                self.data[self.length >> 5] = word << (32 - shift);
            }
            if tailbits > 0 {
                self.append_bits(vals[wholewords] >> (32 - tailbits), tailbits)?;
            }
        }
        Ok(())
    }

    // Grows the word storage geometrically so that `extra` more bits fit.
    fn reserve_bits(&mut self, extra: usize) {
        let needed: usize = (self.length + extra + 31) / 32;
        if needed > self.data.len() {
            let newlen = needed.max(self.data.len() * 2);
            self.data.resize(newlen, 0);
        }
    }
}
