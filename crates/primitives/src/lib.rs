//! Branch-free base primitives shared by the constant-time crates.

pub mod ctbool;

pub mod scalar;

pub mod mul;
