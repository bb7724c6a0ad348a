//! Conditional exchange of two buffers.

use assume::assume;
use lockstep_primitives::ctbool::CtBool;

/// Exchanges the contents of `a` and `b` if `ctl` is true; otherwise leaves
/// both unchanged. Every byte of both buffers is read and rewritten in both
/// cases.
///
/// # Requires
/// * `a.len() == b.len()`
///
/// # Oblivious
/// * Leaks: `a.len()`
pub fn cond_swap(ctl: CtBool, a: &mut [u8], b: &mut [u8]) {
  assert!(a.len() == b.len());
  assume!(unsafe: a.len() == b.len());
  let m = ctl.mask32() as u8;
  for u in 0..a.len() {
    let x = (a[u] ^ b[u]) & m;
    a[u] ^= x;
    b[u] ^= x;
  }
}
