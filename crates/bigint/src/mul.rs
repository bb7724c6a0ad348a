//! Multiplication.
//!
//! Schoolbook columns over the 31-bit words, using the widening multiply
//! primitive and a 64-bit carry accumulator. The full 2L columns are
//! computed; the upper half is only checked against the predicted sign
//! pattern, which is how overflow is detected without ever branching on
//! values.

use lockstep_primitives::ctbool::CtBool;
use lockstep_primitives::mul::mulu32w;
use lockstep_primitives::scalar::{u32_eq0, u32_mux};

use crate::cmp::val_eq0_words;
use crate::repr::{set_nan, signext, size_tag, top_index, word_count, WORD_MASK};
use crate::scratch::with_scratch;
use crate::CtInt;

// UNDONE: switch to Karatsuba above a few dozen words; the column loop is
// quadratic and dominates wide-operand profiles.

/// Truncating product of `a` and `b` into `d`, which must be distinct from
/// both. Returns true exactly when the truncation kept the value intact.
/// Ignores the NaN flags and assumes equal shapes.
fn genmul_separate(d: &mut [u32], a: &[u32], b: &[u32]) -> CtBool {
  let h = d[0] & WORD_MASK;
  let len = word_count(h);
  let ssa = (a[len] >> 30).wrapping_neg() >> 1;
  let ssb = (b[len] >> 30).wrapping_neg() >> 1;
  let mut only0 = CtBool::TRUE;
  let mut only1 = CtBool::TRUE;
  let a_nan = CtBool::from_u32(a[0] >> 31);
  let b_nan = CtBool::from_u32(b[0] >> 31);
  let opz = val_eq0_words(a).and(a_nan.not()).or(val_eq0_words(b).and(b_nan.not()));

  let mut cc = 0u64;
  for u in 0..(len << 1) {
    let mut zd = cc;
    cc = 0;
    for v in 0..=u {
      let wa = if v < len { a[1 + v] } else { ssa };
      let wb = if v + len > u { b[1 + u - v] } else { ssb };
      let zr = mulu32w(wa, wb);
      zd += zr & (WORD_MASK as u64);
      cc += zr >> 31;
    }
    cc += zd >> 31;
    let wd = (zd as u32) & WORD_MASK;
    if u < len {
      d[1 + u] = wd;
    } else {
      only0 = only0.and(u32_eq0(wd));
      only1 = only1.and(u32_eq0(wd ^ WORD_MASK));
    }
  }

  // Predicted sign: XOR of the operand signs, forced to zero when either
  // operand is zero. All upper words, and the top-word bits above the sign
  // position, must match its extension pattern.
  let mut ssd = ssa ^ ssb;
  ssd &= opz.to_u32().wrapping_sub(1);
  let upper_ok = u32_mux(CtBool::from_u32(ssd & 1), only1.to_u32(), only0.to_u32());
  CtBool::from_u32(upper_ok).and(u32_eq0((d[len] ^ ssd) >> top_index(h)))
}

/// Truncating product with shape checks, NaN propagation, and scratch for
/// the aliased form (`a = None` meaning `d` itself).
pub(crate) fn genmul(d: &mut [u32], a: Option<&[u32]>, b: &[u32]) -> CtBool {
  let h = d[0] & WORD_MASK;
  if a.is_some_and(|a| h != a[0] & WORD_MASK) || h != b[0] & WORD_MASK {
    set_nan(d);
    return CtBool::FALSE;
  }
  d[0] = a.map_or(d[0], |a| a[0]) | b[0];

  match a {
    Some(a) => genmul_separate(d, a, b),
    None => {
      // The destination is one of the sources: compute into scratch.
      let len = word_count(h);
      let res = with_scratch(1 + len, |t| {
        t[0] = h;
        let r = genmul_separate(t, d, b);
        d[1..=len].copy_from_slice(&t[1..=len]);
        r
      });
      match res {
        Some(r) => r,
        None => {
          set_nan(d);
          CtBool::FALSE
        }
      }
    }
  }
}

impl CtInt {
  /// `self = a * b`; NaN on shape mismatch, NaN input, or overflow.
  /// @Oblivious
  pub fn mul(&mut self, a: &CtInt, b: &CtInt) {
    let r = genmul(&mut self.w, Some(&a.w), &b.w);
    self.w[0] |= (r.to_u32() ^ 1) << 31;
  }

  /// `self = a * b` reduced modulo 2^width.
  /// @Oblivious
  pub fn mul_trunc(&mut self, a: &CtInt, b: &CtInt) {
    genmul(&mut self.w, Some(&a.w), &b.w);
    let h = size_tag(&self.w);
    let len = word_count(h);
    self.w[len] = signext(self.w[len], top_index(h) + 1) & WORD_MASK;
  }

  /// `self *= b`; NaN on shape mismatch, NaN input, overflow, or scratch
  /// exhaustion.
  /// @Oblivious
  pub fn mul_assign(&mut self, b: &CtInt) {
    let r = genmul(&mut self.w, None, &b.w);
    self.w[0] |= (r.to_u32() ^ 1) << 31;
  }

  /// `self *= b` reduced modulo 2^width; NaN on scratch exhaustion.
  /// @Oblivious
  pub fn mul_assign_trunc(&mut self, b: &CtInt) {
    genmul(&mut self.w, None, &b.w);
    let h = size_tag(&self.w);
    let len = word_count(h);
    self.w[len] = signext(self.w[len], top_index(h) + 1) & WORD_MASK;
  }
}
