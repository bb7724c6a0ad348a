//! Euclidean division and remainder.
//!
//! The quotient truncates toward zero, the remainder takes the sign of the
//! dividend; [`CtInt::rem_euclid`] then lifts the remainder into `[0, |b|)`.
//! The computation runs on absolute values with a bit-by-bit shift-subtract
//! loop and restores signs at the end, so the work done depends only on the
//! width.

use lockstep_primitives::ctbool::CtBool;
use lockstep_primitives::scalar::{s32_mux, u32_eq, u32_eq0};

use crate::addsub::{gen_addsub, gen_neg};
use crate::cmp::leq_words;
use crate::convert::{set_s32_words, set_u32_words, set_zero_words};
use crate::repr::{set_nan, size_tag, top_index, word_count, WORD_MASK};
use crate::scratch::with_scratch;
use crate::select::cond_copy_words;
use crate::shift::genlsh;
use crate::CtInt;

fn lsh_words(d: &mut [u32], src: &[u32], n: u32) {
  let r = genlsh(d, Some(src), n / 31, n % 31, CtBool::TRUE);
  d[0] |= (r.to_u32() ^ 1) << 31;
}

/// Core division. Requirements: `r`, `t1`, `t2` and the present `q` are
/// mutually distinct, share `a` and `b`'s shape, and have clean headers.
///
/// Strategy: take absolute values, divide nonnegative quantities, put the
/// signs back. The minimum representable value has no absolute value, so
/// `|b|` is added to such an `a` up front and the quotient is compensated by
/// one afterward; a `b` at the minimum is handled by forced outcomes at the
/// end. A shifted divisor that overflows into NaN compares as "greater than
/// the remainder" and therefore subtracts nothing, which is exactly right.
fn gendiv_inner(
  mut q: Option<&mut [u32]>,
  r: &mut [u32],
  a: &[u32],
  b: &[u32],
  t1: &mut [u32],
  t2: &mut [u32],
  modr: bool,
) {
  let h = b[0] & WORD_MASK;
  let hk = top_index(h);
  let mut n = h - (h >> 5);
  let mut ud = (h >> 5) as usize;
  let mut um = h & 31;
  let len = word_count(h);

  // Status harvest, before any storage is touched:
  //   a_isnan / b_isnan    NaN flags
  //   a_isminv / b_isminv  operand equals the minimum representable value
  //   b_iszero / b_ismone  divisor equals 0 / -1
  let a_isnan = CtBool::from_u32(a[0] >> 31);
  let b_isnan = CtBool::from_u32(b[0] >> 31);
  let mut a_isminv = CtBool::TRUE;
  let mut b_isminv = CtBool::TRUE;
  let mut b_iszero = CtBool::TRUE;
  let mut b_ismone = CtBool::TRUE;
  for u in 0..(len - 1) {
    a_isminv = a_isminv.and(u32_eq0(a[1 + u]));
    b_isminv = b_isminv.and(u32_eq0(b[1 + u]));
    b_iszero = b_iszero.and(u32_eq0(b[1 + u]));
    b_ismone = b_ismone.and(u32_eq(b[1 + u], WORD_MASK));
  }
  let minv_top = (u32::MAX << hk) & WORD_MASK;
  a_isminv = a_isminv.and(u32_eq(a[len], minv_top));
  b_isminv = b_isminv.and(u32_eq(b[len], minv_top));
  b_iszero = b_iszero.and(u32_eq0(b[len]));
  b_ismone = b_ismone.and(u32_eq(b[len], WORD_MASK));

  let sa = a[len] >> 30;
  let sb = b[len] >> 30;

  // t2 = |b| (NaN when b is the minimum value; resolved at the end).
  gen_neg::<false>(t2, Some(b));
  cond_copy_words(u32_eq0(sb), t2, b);

  // r = |a|, or |a + |b|| when a is the minimum value.
  gen_addsub::<false, false>(t1, Some(a), Some(&*t2));
  cond_copy_words(a_isminv.not(), t1, a);
  gen_neg::<false>(r, Some(&*t1));
  cond_copy_words(CtBool::from_u32(t1[len] >> 30).not(), r, t1);

  if let Some(q) = q.as_deref_mut() {
    q[0] &= WORD_MASK;
    for u in 1..=len {
      q[u] = 0;
    }
  }

  // One quotient bit per width bit, top down.
  while n > 0 {
    n -= 1;
    lsh_words(t1, t2, n);
    let e = leq_words(t1, r);
    gen_addsub::<true, false>(t1, Some(&*r), None);
    cond_copy_words(e, r, t1);
    if let Some(q) = q.as_deref_mut() {
      if um == 0 {
        um = 30;
        ud -= 1;
      } else {
        um -= 1;
      }
      q[1 + ud] |= e.to_u32() << um;
    }
  }

  // Sign restoration and the minimum-value compensations.
  if let Some(q) = q.as_deref_mut() {
    // If b is the minimum value the loop saw only NaN shifts, so force the
    // quotient to zero first.
    set_zero_words(t1);
    cond_copy_words(b_isminv, q, t1);

    gen_neg::<false>(t1, Some(&*q));
    cond_copy_words(CtBool::from_u32(sa ^ sb), q, t1);

    // The +-1 compensation for a at the minimum. Applying it after the sign
    // flip matters: +1 before the flip could graze the maximum and turn
    // into NaN where the true quotient is exactly the minimum value.
    let p = a_isminv.to_u32() as i32;
    set_s32_words(t1, s32_mux(CtBool::from_u32(sa ^ sb), -p, p));
    gen_addsub::<false, false>(q, None, Some(&*t1));
  }
  gen_neg::<false>(t1, Some(&*r));
  cond_copy_words(CtBool::from_u32(sa), r, t1);

  // b at the minimum value: quotient is 0 (or 1 when a is also at the
  // minimum, with remainder 0); r already holds a copy of a otherwise.
  set_zero_words(t1);
  if let Some(q) = q.as_deref_mut() {
    cond_copy_words(b_isminv.and(a_isminv.not()), q, t1);
  }
  cond_copy_words(b_isminv.and(a_isminv), r, t1);
  if let Some(q) = q.as_deref_mut() {
    set_u32_words(t1, 1);
    cond_copy_words(b_isminv.and(a_isminv), q, t1);
  }

  // NaN conditions: any NaN input or a zero divisor poisons both outputs;
  // minimum over -1 has an unrepresentable quotient and a zero remainder.
  let both_nan = a_isnan.or(b_isnan).or(b_iszero);
  let half_nan = a_isminv.and(b_ismone);
  if let Some(q) = q.as_deref_mut() {
    q[0] |= both_nan.or(half_nan).to_u32() << 31;
  }
  r[0] |= both_nan.to_u32() << 31;
  set_zero_words(t1);
  cond_copy_words(half_nan, r, t1);

  if modr {
    // Lift a negative remainder by |b|. Since |r| < |b|, this cannot
    // overflow; when b is the minimum value, adding |b| is just a sign-bit
    // flip on the stored pattern.
    let sr = r[len] >> 30;
    gen_addsub::<false, false>(t1, Some(&*r), Some(&*t2));
    cond_copy_words(CtBool::from_u32(sr).and(b_isminv.not()), r, t1);
    r[len] ^= ((sr & b_isminv.to_u32()).wrapping_neg() << hk) & WORD_MASK;
  }
}

/// Scratch orchestration: two temporaries, plus a third standing in for an
/// absent remainder output.
pub(crate) fn gendiv(
  mut q: Option<&mut [u32]>,
  mut r: Option<&mut [u32]>,
  a: &[u32],
  b: &[u32],
  modr: bool,
) {
  let h = a[0] & WORD_MASK;
  let wlen = ((h + 63) >> 5) as usize;
  let ok = match r.as_deref_mut() {
    Some(rw) => with_scratch(2 * wlen, |s| {
      let (t1, t2) = s.split_at_mut(wlen);
      t1[0] = h;
      t2[0] = h;
      gendiv_inner(q.as_deref_mut(), rw, a, b, t1, t2, modr);
    }),
    None => with_scratch(3 * wlen, |s| {
      let (tr, rest) = s.split_at_mut(wlen);
      let (t1, t2) = rest.split_at_mut(wlen);
      tr[0] = h;
      t1[0] = h;
      t2[0] = h;
      gendiv_inner(q.as_deref_mut(), tr, a, b, t1, t2, modr);
    }),
  };
  if ok.is_none() {
    if let Some(w) = q.as_deref_mut() {
      set_nan(w);
    }
    if let Some(w) = r.as_deref_mut() {
      set_nan(w);
    }
  }
}

impl CtInt {
  /// Computes `a / b` into `q` and `a % b` into `r`, either of which may be
  /// absent. The quotient truncates toward zero; the remainder has the sign
  /// of `a` and magnitude below `|b|`.
  ///
  /// NaN inputs or a zero `b` make both outputs NaN. Dividing the minimum
  /// value by -1 makes `q` NaN with `r` zero. An output whose shape differs
  /// from `a` becomes NaN and receives nothing else.
  /// @Oblivious
  pub fn divrem(q: Option<&mut CtInt>, r: Option<&mut CtInt>, a: &CtInt, b: &CtInt) {
    let qw: Option<&mut [u32]> = q.map(|q| &mut q.w[..]);
    let rw: Option<&mut [u32]> = r.map(|r| &mut r.w[..]);
    let h = size_tag(&a.w);
    if h != size_tag(&b.w) {
      if let Some(w) = qw {
        set_nan(w);
      }
      if let Some(w) = rw {
        set_nan(w);
      }
      return;
    }
    let qw = match qw {
      Some(w) => {
        if size_tag(w) != h {
          set_nan(w);
          None
        } else {
          Some(w)
        }
      }
      None => None,
    };
    let rw = match rw {
      Some(w) => {
        if size_tag(w) != h {
          set_nan(w);
          None
        } else {
          Some(w)
        }
      }
      None => None,
    };
    if qw.is_none() && rw.is_none() {
      return;
    }
    gendiv(qw, rw, &a.w, &b.w, false);
  }

  /// `self = a / b`, truncating toward zero.
  /// @Oblivious
  pub fn div(&mut self, a: &CtInt, b: &CtInt) {
    CtInt::divrem(Some(self), None, a, b);
  }

  /// `self = a % b`, with the sign of `a`.
  /// @Oblivious
  pub fn rem(&mut self, a: &CtInt, b: &CtInt) {
    CtInt::divrem(None, Some(self), a, b);
  }

  /// `self = a mod b`, the nonnegative remainder in `[0, |b|)`.
  /// @Oblivious
  pub fn rem_euclid(&mut self, a: &CtInt, b: &CtInt) {
    let h = size_tag(&self.w);
    if h != size_tag(&a.w) || h != size_tag(&b.w) {
      set_nan(&mut self.w);
      return;
    }
    gendiv(None, Some(&mut self.w[..]), &a.w, &b.w, true);
  }
}
