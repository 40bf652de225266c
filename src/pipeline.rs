//! The end-to-end flow: build, check the witness, generate keys, prove,
//! verify and persist.
//!
//! The witness check is a gate: no backend operation runs unless every
//! constraint holds.
use crate::{
  digest::ShapeDigest,
  errors::R1CSError,
  r1cs::{Assignment, ConstraintSystem},
  start_span, storage,
  traits::{
    circuit::Circuit,
    snark::{Keypair, SnarkBackend},
  },
};
use ff::PrimeField;
use serde::Serialize;
use std::{env, path::PathBuf, time::Instant};
use tracing::{info, info_span};

/// Environment variable overriding [`PipelineConfig::vk_path`]
pub const VK_PATH_ENV: &str = "R1CS_VK_PATH";
/// Environment variable overriding [`PipelineConfig::proof_path`]
pub const PROOF_PATH_ENV: &str = "R1CS_PROOF_PATH";

/// Where the pipeline writes its artifacts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
  /// Destination of the verification key
  pub vk_path: PathBuf,
  /// Destination of the proof
  pub proof_path: PathBuf,
}

impl Default for PipelineConfig {
  fn default() -> Self {
    PipelineConfig {
      vk_path: PathBuf::from("build/vk_data"),
      proof_path: PathBuf::from("build/proof_data"),
    }
  }
}

impl PipelineConfig {
  /// Defaults, overridden by `R1CS_VK_PATH` and `R1CS_PROOF_PATH` when set
  pub fn from_env() -> Self {
    let defaults = PipelineConfig::default();
    PipelineConfig {
      vk_path: env::var_os(VK_PATH_ENV).map_or(defaults.vk_path, PathBuf::from),
      proof_path: env::var_os(PROOF_PATH_ENV).map_or(defaults.proof_path, PathBuf::from),
    }
  }
}

/// What the pipeline reports once verification has run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineReport<F> {
  /// Number of constraints in the system
  pub num_constraints: usize,
  /// Public input, in variable order
  pub primary_input: Vec<F>,
  /// Private input, in variable order
  pub auxiliary_input: Vec<F>,
  /// Outcome of verification
  pub verified: bool,
  /// Digest of the constraint system
  pub digest: ShapeDigest,
}

/// The report together with the artifacts the backend produced
pub struct PipelineOutput<F: PrimeField, B: SnarkBackend<F>> {
  /// Summary of the run
  pub report: PipelineReport<F>,
  /// Keys generated for the constraint system
  pub keypair: Keypair<B::ProvingKey, B::VerifyingKey>,
  /// Proof for the witness
  pub proof: B::Proof,
}

/// Synthesizes `circuit` and computes its witness
pub fn build<F, C>(circuit: &C) -> Result<(ConstraintSystem<F>, Assignment<F>), R1CSError>
where
  F: PrimeField,
  C: Circuit<F>,
{
  let mut cs = ConstraintSystem::new();
  let wires = circuit.synthesize(&mut cs)?;
  let witness = circuit.assign(&wires)?;
  info!(
    num_cons = cs.num_constraints(),
    num_vars = cs.num_variables(),
    num_public = ?cs.public_count(),
    "circuit synthesized"
  );
  Ok((cs, witness))
}

/// Checks the witness, then generates keys, proves and verifies
pub fn prove_and_verify<F, B>(
  backend: &B,
  cs: &ConstraintSystem<F>,
  witness: &Assignment<F>,
) -> Result<PipelineOutput<F, B>, R1CSError>
where
  F: PrimeField + Serialize,
  B: SnarkBackend<F>,
{
  let (_span, t) = start_span!("prove_and_verify", num_cons = cs.num_constraints());

  cs.validate()?;
  cs.check(witness)?;
  let primary_input = witness.primary_input(cs)?;
  let auxiliary_input = witness.auxiliary_input(cs)?;
  let digest = cs.digest()?;
  info!(digest = %hex::encode(digest), "witness satisfies all constraints");

  let keypair = backend.generate(cs)?;
  let proof = backend.prove(&keypair.pk, &primary_input, &auxiliary_input)?;
  let verified = backend.verify(&keypair.vk, &primary_input, &proof)?;
  info!(elapsed_ms = %t.elapsed().as_millis(), verified, "prove_and_verify");

  Ok(PipelineOutput {
    report: PipelineReport {
      num_constraints: cs.num_constraints(),
      primary_input,
      auxiliary_input,
      verified,
      digest,
    },
    keypair,
    proof,
  })
}

/// Runs [`prove_and_verify`] and writes the verification key and proof to
/// the paths in `config`
pub fn run<F, B>(
  backend: &B,
  cs: &ConstraintSystem<F>,
  witness: &Assignment<F>,
  config: &PipelineConfig,
) -> Result<PipelineReport<F>, R1CSError>
where
  F: PrimeField + Serialize,
  B: SnarkBackend<F>,
{
  let output = prove_and_verify(backend, cs, witness)?;
  let digest = output.report.digest;
  storage::write_verification_key(&config.vk_path, &digest, &output.keypair.vk)?;
  storage::write_proof(&config.proof_path, &digest, &output.proof)?;
  Ok(output.report)
}
