//! Constant-time equality and ordering of byte buffers.

use assume::assume;
use lockstep_primitives::ctbool::CtBool;
use lockstep_primitives::scalar::{u32_eq0, u32_gt};

/// Byte-wise equality. All bytes are examined whatever the outcome.
///
/// # Requires
/// * `a.len() == b.len()`
///
/// # Oblivious
/// * Leaks: `a.len()`
pub fn array_eq(a: &[u8], b: &[u8]) -> CtBool {
  assert!(a.len() == b.len());
  assume!(unsafe: a.len() == b.len());
  let mut r = 0u32;
  for u in 0..a.len() {
    r |= (a[u] ^ b[u]) as u32;
  }
  u32_eq0(r)
}

/// Byte-wise inequality.
/// @Oblivious
pub fn array_neq(a: &[u8], b: &[u8]) -> CtBool {
  array_eq(a, b).not()
}

/// Lexicographic comparison on unsigned byte values: -1, 0 or 1.
///
/// All byte pairs are examined; the position of the first difference does not
/// influence timing or access pattern. The running result is merged with each
/// per-byte verdict using its low bit as a mask (the low bit of -1 and 1 is
/// set, the low bit of 0 is not), so a decided result is carried through the
/// remainder of the scan without a branch.
///
/// # Requires
/// * `a.len() == b.len()`
///
/// # Oblivious
/// * Leaks: `a.len()`
pub fn array_cmp(a: &[u8], b: &[u8]) -> i32 {
  assert!(a.len() == b.len());
  assume!(unsafe: a.len() == b.len());
  let mut r = 0u32;
  for u in 0..a.len() {
    let x = a[u] as u32;
    let y = b[u] as u32;
    let z = u32_gt(x, y).to_u32() | u32_gt(y, x).mask32();
    let decided = (r & 1).wrapping_neg();
    r = (r & decided) | (z & !decided);
  }
  r as i32
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::Rng;

  #[test]
  fn test_eq() {
    assert!(array_eq(b"", b"").declassify());
    assert!(array_eq(b"abc", b"abc").declassify());
    assert!(!array_eq(b"abc", b"abd").declassify());
    assert!(array_neq(b"abc", b"abd").declassify());
    assert!(!array_neq(b"abc", b"abc").declassify());
  }

  #[test]
  fn test_cmp() {
    assert_eq!(array_cmp(b"", b""), 0);
    assert_eq!(array_cmp(b"abc", b"abc"), 0);
    assert_eq!(array_cmp(b"abc", b"abd"), -1);
    assert_eq!(array_cmp(b"abd", b"abc"), 1);
    assert_eq!(array_cmp(b"\x00\xFF", b"\x01\x00"), -1);
    assert_eq!(array_cmp(b"\xFF\x00", b"\x00\xFF"), 1);
    // The first difference decides, whatever follows.
    assert_eq!(array_cmp(b"az", b"ba"), -1);
  }

  #[test]
  fn test_cmp_antisymmetric_random() {
    for _ in 0..200 {
      let n = rand::rng().random_range(0..24);
      let a: Vec<u8> = (0..n).map(|_| rand::rng().random_range(0..4)).collect();
      let b: Vec<u8> = (0..n).map(|_| rand::rng().random_range(0..4)).collect();
      let c = array_cmp(&a, &b);
      assert_eq!(c, -array_cmp(&b, &a));
      assert_eq!(c == 0, array_eq(&a, &b).declassify());
      let expected = match a.cmp(&b) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
      };
      assert_eq!(c, expected);
    }
  }
}
