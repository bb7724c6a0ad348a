#![allow(missing_docs)]

#[allow(unused_imports)]
use criterion::{
  criterion_group, criterion_main,
  measurement::{Measurement, WallTime},
  Criterion,
};

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use criterion_cycles_per_byte::CyclesPerByte;
use lockstep_bigint::CtInt;
use seq_macro::seq;
use std::hint::black_box;

const WIDTHS: [u32; 4] = [64, 256, 1024, 4096];

pub fn benchmark_arith<T: Measurement + 'static>(c: &mut Criterion<T>) {
  seq!(W_IDX in 0..4 {{
    let width = WIDTHS[W_IDX];
    let mut a = CtInt::new(width);
    let mut b = CtInt::new(width);
    a.set_s64(0x0123_4567_89AB_CDEF);
    b.set_s64(-0x0000_0F0F_F0F0_0F0F);
    let mut d = CtInt::new(width);

    c.bench_function(&format!("add/{width}"), |bench| {
      bench.iter(|| {
        d.add_trunc(black_box(&a), black_box(&b));
      })
    });

    c.bench_function(&format!("mul_trunc/{width}"), |bench| {
      bench.iter(|| {
        d.mul_trunc(black_box(&a), black_box(&b));
      })
    });

    c.bench_function(&format!("shl_prot/{width}"), |bench| {
      bench.iter(|| {
        d.shl_trunc_prot(black_box(&a), black_box(17));
      })
    });

    let mut q = CtInt::new(width);
    let mut r = CtInt::new(width);
    c.bench_function(&format!("divrem/{width}"), |bench| {
      bench.iter(|| {
        CtInt::divrem(Some(&mut q), Some(&mut r), black_box(&a), black_box(&b));
      })
    });
  }});
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
criterion_group!(
  name = benches_cycles;
  config = Criterion::default().with_measurement(CyclesPerByte).warm_up_time(std::time::Duration::from_millis(500)).measurement_time(std::time::Duration::from_secs(1));
  targets = benchmark_arith<CyclesPerByte>
);

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
criterion_group!(
  name = benches_cycles;
  config = Criterion::default().warm_up_time(std::time::Duration::from_millis(500)).measurement_time(std::time::Duration::from_secs(1));
  targets = benchmark_arith<WallTime>
);

criterion_main!(benches_cycles);
