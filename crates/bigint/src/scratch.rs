//! Scratch acquisition for operations that need temporaries.
//!
//! Policy: a fixed stack buffer serves requests up to
//! [`SCRATCH_STACK_BYTES`]; larger requests fall back to a transient heap
//! allocation, released before the operation returns. The `heap-scratch`
//! feature removes the fallback for tiny-system builds, in which case an
//! oversized request fails and the caller must produce NaN.
//!
//! Functions needing several temporaries treat the budget as the aggregate
//! across all of them.

use static_assertions::const_assert;

/// Stack scratch budget, in bytes.
pub const SCRATCH_STACK_BYTES: usize = 4096;

const STACK_WORDS: usize = SCRATCH_STACK_BYTES / 4;

const_assert!(SCRATCH_STACK_BYTES >= 64);
const_assert!(SCRATCH_STACK_BYTES % 4 == 0);

/// Runs `f` with a zeroed scratch buffer of `words` 32-bit words.
///
/// Returns `None` when the request exceeds the stack budget and the heap
/// fallback is compiled out (or in principle unavailable); the caller is
/// expected to turn that into NaN outputs.
pub(crate) fn with_scratch<R>(words: usize, f: impl FnOnce(&mut [u32]) -> R) -> Option<R> {
  if words <= STACK_WORDS {
    let mut buf = [0u32; STACK_WORDS];
    return Some(f(&mut buf[..words]));
  }
  heap_scratch(words, f)
}

#[cfg(feature = "heap-scratch")]
fn heap_scratch<R>(words: usize, f: impl FnOnce(&mut [u32]) -> R) -> Option<R> {
  let mut buf = vec![0u32; words];
  Some(f(&mut buf))
}

#[cfg(not(feature = "heap-scratch"))]
fn heap_scratch<R>(_words: usize, _f: impl FnOnce(&mut [u32]) -> R) -> Option<R> {
  None
}
