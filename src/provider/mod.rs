//! This module implements the proving backends

mod ark_serde;
pub mod groth16;

pub use groth16::{Groth16Backend, Groth16Proof, Groth16ProvingKey, Groth16VerifyingKey};
