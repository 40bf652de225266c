//! This library models a computation as a Rank-1 Constraint System and drives
//! it through a zkSNARK backend.
//!
//! Circuits allocate variables and add `A · B = C` constraints to a
//! [`r1cs::ConstraintSystem`], fill in an [`r1cs::Assignment`], and hand both
//! to a [`traits::snark::SnarkBackend`] once the witness has been checked
//! against every constraint. A Groth16 backend over BN254 is provided in
//! [`provider`].
#![deny(future_incompatible, nonstandard_style, rust_2018_idioms)]
#![warn(missing_docs)]
#![allow(non_snake_case)]
#![allow(clippy::upper_case_acronyms)]
#![forbid(unsafe_code)]

// public modules
pub mod circuit;
pub mod digest;
pub mod errors;
pub mod pipeline;
pub mod provider;
pub mod r1cs;
pub mod storage;
pub mod traits;

/// Enter an `info` span and start a timer, return `(EnteredSpan, Instant)`.
macro_rules! start_span {
    ($name:expr $(, $($fmt:tt)+)?) => {{
        let span = info_span!($name $(, $($fmt)+)?).entered();
        (span, Instant::now())
    }};
}
pub(crate) use start_span;
