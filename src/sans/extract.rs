//! Bit-aligned extraction of field values from captured frame bytes.

use tinyvec::ArrayVec;

use super::{
    kind::{MAX_WIDTH, Value},
    spec::FieldSpec,
};

/// Bytes a field can touch: its widest aligned value plus one byte of
/// carry when it does not start on a byte boundary.
pub type Bytes = ArrayVec<[u8; MAX_WIDTH + 1]>;

/// Shift a field's bits down to bit 0 of the first byte.
///
/// `r` holds the frame bytes from the field's first to last byte. The result
/// is `ceil(bit_width / 8)` bytes, least significant first, with any bits
/// past the field's width cleared.
pub fn align(r: &[u8], bit_offset: usize, bit_width: usize) -> Bytes {
    let shift = (bit_offset % 8) as u32;
    let mask = match bit_width % 8 {
        0 => 0xFF,
        rem => 0xFF >> (8 - rem),
    };
    let len = bit_width.div_ceil(8);

    (0..len)
        .map(|i| {
            let low = r[i] >> shift;

            match r.get(i + 1) {
                // Last input byte, no carry to merge.
                None => low & mask,
                Some(&next) => {
                    // Widen so a zero shift leaves no carry instead of overflowing.
                    let carry = (u16::from(next) << (8 - shift)) as u8;

                    if i + 1 == len {
                        (low | carry) & mask
                    } else {
                        low | carry
                    }
                }
            }
        })
        .collect()
}

/// A field's latest decoded value, with the bytes it was decoded from.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    raw: Bytes,
    aligned: Bytes,
    value: Value,
}

impl Extraction {
    /// The extraction of a field before any frame has been captured.
    pub fn empty(spec: &FieldSpec) -> Self {
        let mut raw = Bytes::new();
        raw.resize(spec.byte_len(), 0);
        let mut aligned = Bytes::new();
        aligned.resize(spec.aligned_len(), 0);

        Self {
            raw,
            aligned,
            value: spec.kind().zero(),
        }
    }

    /// Extract a field from the frame bytes spanning its first to last byte.
    ///
    /// # Panics
    ///
    /// Panics if `r` is not exactly as long as the field's byte span. A
    /// verified template always supplies the right span.
    pub fn new(spec: &FieldSpec, r: &[u8]) -> Self {
        assert_eq!(
            r.len(),
            spec.byte_len(),
            "captured span for `{}` does not match its byte length",
            spec.name(),
        );

        let aligned = align(r, spec.bit_offset(), spec.bit_width());
        let value = spec.kind().decode(&aligned);

        Self {
            raw: r.iter().copied().collect(),
            aligned,
            value,
        }
    }

    pub fn value(&self) -> Value {
        self.value
    }

    /// Frame bytes as captured, before alignment.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Field bytes shifted to bit 0, least significant first.
    pub fn aligned(&self) -> &[u8] {
        &self.aligned
    }
}
