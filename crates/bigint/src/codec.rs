//! Fixed-length two's-complement byte codecs.
//!
//! Length is always the caller's choice. Decoding fills the value from the
//! least significant byte upward, 8 source bits against 31-bit payload
//! words; encoding pumps bytes out of an accumulator the same way. The
//! encoded bytes depend only on the value: a NaN source encodes as all
//! zeros, and the work done is a function of the two lengths alone.

use lockstep_primitives::ctbool::CtBool;
use lockstep_primitives::scalar::{u32_eq, u32_eq0};

use crate::repr::{signext, top_index, word_count, NAN_FLAG, WORD_MASK};
use crate::CtInt;

/// Generic decoder. `be` selects byte order, `sig` a signed interpretation,
/// `trunc` reduction modulo 2^width instead of a NaN range check.
fn gendec(x: &mut [u32], src: &[u8], be: bool, sig: bool, trunc: bool) {
  x[0] &= WORD_MASK;
  let h = x[0];
  let len = word_count(h);
  for u in 1..=len {
    x[u] = 0;
  }
  if src.is_empty() {
    // No bytes carry no sign: the signed decode of nothing is undefined,
    // the unsigned decode is zero.
    if sig {
      x[0] |= NAN_FLAG;
    }
    return;
  }
  let hk = top_index(h);

  // Value of the virtual bytes beyond the source: sign replication for a
  // signed decode, zero otherwise.
  let ssb: u32 = if sig {
    let top_byte = if be { src[0] } else { src[src.len() - 1] };
    ((top_byte >> 7) as u32).wrapping_neg() & 0xFF
  } else {
    0
  };

  // u:k is the next bit position to fill (word index, bit index); v counts
  // source bytes from the least significant end.
  let mut u = 0usize;
  let mut k = 0u32;
  let mut v = 0usize;

  // in_range accumulates the non-truncating range check. ssx becomes the
  // expected extension byte (0x00 or 0xFF) once the sign bit of x is known.
  let mut in_range = CtBool::TRUE;
  let mut ssx = 0u32;

  // Bits that spilled past the top word, to be checked against the sign.
  let mut extra_bits = 0u32;
  let mut extra_bits_len = 0u32;

  while u < len || v < src.len() {
    let b: u32 = if v < src.len() {
      (if be { src[src.len() - 1 - v] } else { src[v] }) as u32
    } else {
      ssb
    };
    v += 1;

    if u < len {
      if k <= 23 {
        x[1 + u] |= b << k;
      } else {
        x[1 + u] |= (b << k) & WORD_MASK;
        if u + 1 < len {
          x[2 + u] |= b >> (31 - k);
        } else {
          extra_bits = b >> (31 - k);
          extra_bits_len = k - 23;
        }
      }

      k += 8;
      if k >= 31 {
        k -= 31;
        u += 1;
        if u == len {
          ssx = ((x[len] >> hk) & 1).wrapping_neg() & 0xFF;
        }
      }
    } else {
      // All words are filled; the remaining bytes must match the extension
      // pattern.
      in_range = in_range.and(u32_eq(b, ssx));
    }
  }

  let top = x[len];
  let top2 = signext(top, hk + 1) & WORD_MASK;
  if trunc {
    x[len] = top2;
  } else {
    in_range = in_range.and(u32_eq(top, top2));
    if extra_bits_len > 0 {
      in_range = in_range.and(u32_eq(extra_bits, ssx >> (8 - extra_bits_len)));
    }
    if !sig {
      // An unsigned decode must also land nonnegative.
      in_range = in_range.and(u32_eq0(ssx));
    }
    x[0] |= in_range.not().to_u32() << 31;
  }
}

/// Generic encoder.
fn genenc(dst: &mut [u8], x: &[u32], be: bool) {
  let mask = (x[0] >> 31).wrapping_sub(1);
  let h = x[0] & WORD_MASK;
  let len = word_count(h);

  let ssx = ((x[len] >> top_index(h)) & 1).wrapping_neg() >> 1;
  let mut acc = x[1];
  let mut acc_len = 31u32;
  let mut u = 1usize;
  let dst_len = dst.len();
  for v in 0..dst_len {
    let b: u32;
    if acc_len >= 8 {
      b = acc & 0xFF;
      acc >>= 8;
      acc_len -= 8;
    } else {
      let mut t = acc;
      if u < len {
        acc = x[1 + u];
        u += 1;
      } else {
        acc = ssx;
      }
      t |= acc << acc_len;
      acc >>= 8 - acc_len;
      acc_len += 23;
      b = t;
    }
    let b = (b & mask) as u8;
    if be {
      dst[dst_len - 1 - v] = b;
    } else {
      dst[v] = b;
    }
  }
}

impl CtInt {
  /// Decodes a signed big-endian value; NaN if it does not fit the width.
  pub fn decode_be_signed(&mut self, src: &[u8]) {
    gendec(&mut self.w, src, true, true, false);
  }

  /// Decodes an unsigned big-endian value; NaN if it does not fit the width
  /// as a nonnegative value.
  pub fn decode_be_unsigned(&mut self, src: &[u8]) {
    gendec(&mut self.w, src, true, false, false);
  }

  /// Decodes a signed big-endian value reduced modulo 2^width.
  pub fn decode_be_signed_trunc(&mut self, src: &[u8]) {
    gendec(&mut self.w, src, true, true, true);
  }

  /// Decodes an unsigned big-endian value reduced modulo 2^width.
  pub fn decode_be_unsigned_trunc(&mut self, src: &[u8]) {
    gendec(&mut self.w, src, true, false, true);
  }

  /// Decodes a signed little-endian value; NaN if it does not fit the width.
  pub fn decode_le_signed(&mut self, src: &[u8]) {
    gendec(&mut self.w, src, false, true, false);
  }

  /// Decodes an unsigned little-endian value; NaN if it does not fit the
  /// width as a nonnegative value.
  pub fn decode_le_unsigned(&mut self, src: &[u8]) {
    gendec(&mut self.w, src, false, false, false);
  }

  /// Decodes a signed little-endian value reduced modulo 2^width.
  pub fn decode_le_signed_trunc(&mut self, src: &[u8]) {
    gendec(&mut self.w, src, false, true, true);
  }

  /// Decodes an unsigned little-endian value reduced modulo 2^width.
  pub fn decode_le_unsigned_trunc(&mut self, src: &[u8]) {
    gendec(&mut self.w, src, false, false, true);
  }

  /// Encodes as big-endian two's complement into the whole of `dst`,
  /// sign-extending or truncating as needed. NaN encodes as all zeros.
  pub fn encode_be(&self, dst: &mut [u8]) {
    genenc(dst, &self.w, true);
  }

  /// Encodes as little-endian two's complement into the whole of `dst`.
  pub fn encode_le(&self, dst: &mut [u8]) {
    genenc(dst, &self.w, false);
  }
}
