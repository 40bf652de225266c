//! This module defines the contract of a zkSNARK backend for R1CS.
use crate::{errors::R1CSError, r1cs::ConstraintSystem};
use ff::PrimeField;
use serde::{Deserialize, Serialize};

/// The keys produced by [`SnarkBackend::generate`]
#[derive(Clone, Debug)]
pub struct Keypair<PK, VK> {
  /// The prover's key
  pub pk: PK,
  /// The verifier's key
  pub vk: VK,
}

/// A proving system that consumes a constraint system and its partitioned
/// witness.
///
/// A backend value is the capability to use the system: whatever one-time
/// parameter setup the underlying curve library needs happens in
/// [`SnarkBackend::init`], and every operation borrows the value it returned.
pub trait SnarkBackend<F: PrimeField>: Sized {
  /// A type that represents the prover's key
  type ProvingKey;

  /// A type that represents the verifier's key
  type VerifyingKey: Serialize + for<'de> Deserialize<'de>;

  /// A type that represents a proof
  type Proof: Clone + Serialize + for<'de> Deserialize<'de>;

  /// Performs the backend's one-time setup
  fn init() -> Result<Self, R1CSError>;

  /// Produces the keys for the prover and the verifier. Key generation is
  /// randomized: two calls on the same system yield different keys.
  fn generate(
    &self,
    cs: &ConstraintSystem<F>,
  ) -> Result<Keypair<Self::ProvingKey, Self::VerifyingKey>, R1CSError>;

  /// Produces a proof that `(primary, auxiliary)` satisfies the system the
  /// key was generated for
  fn prove(
    &self,
    pk: &Self::ProvingKey,
    primary: &[F],
    auxiliary: &[F],
  ) -> Result<Self::Proof, R1CSError>;

  /// Checks `proof` against the public input. A well-formed proof that does
  /// not verify yields `Ok(false)`.
  fn verify(
    &self,
    vk: &Self::VerifyingKey,
    primary: &[F],
    proof: &Self::Proof,
  ) -> Result<bool, R1CSError>;
}
