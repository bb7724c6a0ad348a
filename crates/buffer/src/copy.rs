//! Conditional copies with a constant memory trace.

use assume::assume;
use lockstep_primitives::ctbool::CtBool;
use std::ops::Range;

/// Copies `src` into `dst` if `ctl` is true, leaves `dst` unchanged otherwise.
///
/// Both outcomes read and rewrite every destination byte, so the memory trace
/// does not depend on `ctl`.
///
/// # Requires
/// * `dst.len() == src.len()`
///
/// # Oblivious
/// * Leaks: `dst.len()`
pub fn cond_copy(ctl: CtBool, dst: &mut [u8], src: &[u8]) {
  assert!(dst.len() == src.len());
  assume!(unsafe: dst.len() == src.len());
  let m = ctl.mask32() as u8;
  for u in 0..dst.len() {
    dst[u] ^= (src[u] ^ dst[u]) & m;
  }
}

/// Conditional copy between two ranges of the same buffer.
///
/// If `ctl` is true, the bytes at `src` are copied to `dst..dst + src.len()`
/// with the semantics of [`slice::copy_within`]: the destination receives a
/// snapshot of the source as it was on entry, even when the ranges overlap.
/// If `ctl` is false, the buffer is unchanged. Every destination byte is read
/// and rewritten in both cases.
///
/// The iteration direction is chosen by comparing the two offsets, which are
/// public; nothing about the contents leaks.
///
/// # Oblivious
/// * Leaks: `src`, `dst`, `buf.len()`
pub fn cond_copy_within(ctl: CtBool, buf: &mut [u8], src: Range<usize>, dst: usize) {
  assert!(src.start <= src.end && src.end <= buf.len());
  let len = src.end - src.start;
  assert!(dst <= buf.len() - len);
  let m = ctl.mask32() as u8;
  if dst <= src.start {
    for u in 0..len {
      let w = (buf[src.start + u] ^ buf[dst + u]) & m;
      buf[dst + u] ^= w;
    }
  } else {
    for u in (0..len).rev() {
      let w = (buf[src.start + u] ^ buf[dst + u]) & m;
      buf[dst + u] ^= w;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_cond_copy() {
    let src = [1u8, 2, 3, 4, 5];
    let mut dst = [9u8; 5];
    cond_copy(CtBool::FALSE, &mut dst, &src);
    assert_eq!(dst, [9u8; 5]);
    cond_copy(CtBool::TRUE, &mut dst, &src);
    assert_eq!(dst, src);
  }

  #[test]
  fn test_overlap_forward() {
    // Copying [0..4] one position up must behave like memmove.
    let mut buf = [1u8, 2, 3, 4, 5];
    cond_copy_within(CtBool::TRUE, &mut buf, 0..4, 1);
    assert_eq!(buf, [1, 1, 2, 3, 4]);

    let mut buf = [1u8, 2, 3, 4, 5];
    cond_copy_within(CtBool::FALSE, &mut buf, 0..4, 1);
    assert_eq!(buf, [1, 2, 3, 4, 5]);
  }

  #[test]
  fn test_overlap_backward() {
    let mut buf = [1u8, 2, 3, 4, 5];
    cond_copy_within(CtBool::TRUE, &mut buf, 1..5, 0);
    assert_eq!(buf, [2, 3, 4, 5, 5]);

    let mut buf = [1u8, 2, 3, 4, 5];
    cond_copy_within(CtBool::FALSE, &mut buf, 1..5, 0);
    assert_eq!(buf, [1, 2, 3, 4, 5]);
  }

  #[test]
  fn test_within_matches_copy_within() {
    for srclo in 0..6 {
      for len in 0..(6 - srclo) {
        for dst in 0..=(6 - len) {
          let base: Vec<u8> = (10..16).collect();
          let mut expected = base.clone();
          expected.copy_within(srclo..srclo + len, dst);
          let mut got = base.clone();
          cond_copy_within(CtBool::TRUE, &mut got, srclo..srclo + len, dst);
          assert_eq!(got, expected, "src {srclo} len {len} dst {dst}");
          let mut untouched = base.clone();
          cond_copy_within(CtBool::FALSE, &mut untouched, srclo..srclo + len, dst);
          assert_eq!(untouched, base);
        }
      }
    }
  }
}
