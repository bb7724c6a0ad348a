//! Copies, swaps, and multiplexing between whole values.

use lockstep_primitives::ctbool::CtBool;
use lockstep_primitives::scalar::u32_mux;

use crate::repr::{set_nan, shape_differs, size_tag, word_count};
use crate::CtInt;

/// Conditional copy of a whole value, header included. Shapes must already
/// match; the NaN flag rides along with the payload.
pub(crate) fn cond_copy_words(ctl: CtBool, d: &mut [u32], s: &[u32]) {
  debug_assert!(!shape_differs(d, s));
  let n = 1 + word_count(size_tag(d));
  for u in 0..n {
    d[u] = u32_mux(ctl, s[u], d[u]);
  }
}

impl CtInt {
  /// Sets `self` to a copy of `s`. Shape mismatch makes `self` NaN.
  pub fn copy_from(&mut self, s: &CtInt) {
    if shape_differs(&self.w, &s.w) {
      set_nan(&mut self.w);
      return;
    }
    self.w.copy_from_slice(&s.w);
  }

  /// Sets `self` to a copy of `s` if `ctl` is true, and leaves it unchanged
  /// otherwise; either way every word is rewritten. Shape mismatch makes
  /// `self` NaN.
  /// @Oblivious
  pub fn cond_copy_from(&mut self, ctl: CtBool, s: &CtInt) {
    if shape_differs(&self.w, &s.w) {
      set_nan(&mut self.w);
      return;
    }
    cond_copy_words(ctl, &mut self.w, &s.w);
  }

  /// Exchanges the two values. Shape mismatch makes both NaN.
  pub fn swap_with(&mut self, other: &mut CtInt) {
    if shape_differs(&self.w, &other.w) {
      set_nan(&mut self.w);
      set_nan(&mut other.w);
      return;
    }
    self.w.swap_with_slice(&mut other.w);
  }

  /// Exchanges the two values if `ctl` is true; every word of both is
  /// rewritten either way. Shape mismatch makes both NaN.
  /// @Oblivious
  pub fn cond_swap_with(&mut self, ctl: CtBool, other: &mut CtInt) {
    if shape_differs(&self.w, &other.w) {
      set_nan(&mut self.w);
      set_nan(&mut other.w);
      return;
    }
    let m = ctl.mask32();
    for u in 0..self.w.len() {
      let t = (self.w[u] ^ other.w[u]) & m;
      self.w[u] ^= t;
      other.w[u] ^= t;
    }
  }

  /// Sets `self` to `a` if `ctl` is true, to `b` otherwise. Shape mismatch
  /// anywhere makes `self` NaN.
  /// @Oblivious
  pub fn mux(&mut self, ctl: CtBool, a: &CtInt, b: &CtInt) {
    if shape_differs(&self.w, &a.w) || shape_differs(&self.w, &b.w) {
      set_nan(&mut self.w);
      return;
    }
    for u in 0..self.w.len() {
      self.w[u] = u32_mux(ctl, a.w[u], b.w[u]);
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::CtInt;
  use lockstep_primitives::ctbool::CtBool;

  #[test]
  fn test_copy_and_shape_mismatch() {
    let mut a = CtInt::new(40);
    a.set_s32(-7);
    let mut d = CtInt::new(40);
    d.copy_from(&a);
    assert_eq!(d.to_s32(), -7);

    let mut bad = CtInt::new(41);
    bad.set_s32(1);
    bad.copy_from(&a);
    assert!(bad.is_nan().declassify());
  }

  #[test]
  fn test_cond_copy() {
    let mut a = CtInt::new(64);
    a.set_s64(123);
    let mut d = CtInt::new(64);
    d.set_s64(-5);
    d.cond_copy_from(CtBool::FALSE, &a);
    assert_eq!(d.to_s64(), -5);
    d.cond_copy_from(CtBool::TRUE, &a);
    assert_eq!(d.to_s64(), 123);
  }

  #[test]
  fn test_swap() {
    let mut a = CtInt::new(50);
    let mut b = CtInt::new(50);
    a.set_s32(3);
    b.set_s32(-9);
    a.swap_with(&mut b);
    assert_eq!(a.to_s32(), -9);
    assert_eq!(b.to_s32(), 3);

    a.cond_swap_with(CtBool::FALSE, &mut b);
    assert_eq!(a.to_s32(), -9);
    assert_eq!(b.to_s32(), 3);
    a.cond_swap_with(CtBool::TRUE, &mut b);
    assert_eq!(a.to_s32(), 3);
    assert_eq!(b.to_s32(), -9);
  }

  #[test]
  fn test_swap_propagates_nan_on_mismatch() {
    let mut a = CtInt::new(10);
    let mut b = CtInt::new(11);
    a.set_s32(1);
    b.set_s32(2);
    a.swap_with(&mut b);
    assert!(a.is_nan().declassify());
    assert!(b.is_nan().declassify());
  }

  #[test]
  fn test_mux() {
    let mut a = CtInt::new(33);
    let mut b = CtInt::new(33);
    a.set_s32(10);
    b.set_s32(20);
    let mut d = CtInt::new(33);
    d.mux(CtBool::TRUE, &a, &b);
    assert_eq!(d.to_s32(), 10);
    d.mux(CtBool::FALSE, &a, &b);
    assert_eq!(d.to_s32(), 20);
    // NaN selection keeps the NaN of the selected side.
    let n = CtInt::new(33);
    d.mux(CtBool::TRUE, &n, &b);
    assert!(d.is_nan().declassify());
    d.mux(CtBool::FALSE, &n, &b);
    assert!(!d.is_nan().declassify());
  }
}
