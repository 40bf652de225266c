//! Groth16 over BN254, backed by arkworks.
//!
//! The constraint system is lowered onto an arkworks constraint system with
//! the same variable order: index 0 maps to `Variable::One`, indices `1..=k`
//! become instance variables and the rest witness variables. Field elements
//! cross over through their little-endian canonical encoding; both libraries
//! use the same BN254 scalar field.
use crate::{
  errors::R1CSError,
  provider::ark_serde::ArkCompressed,
  r1cs::{ConstraintSystem, LinearCombination, R1CSMatrices},
  start_span,
  traits::snark::{Keypair, SnarkBackend},
};
use ark_bn254::{Bn254, Fr as ArkFr};
use ark_ff::PrimeField as ArkPrimeField;
use ark_groth16::Groth16;
use ark_relations::r1cs::{
  ConstraintSynthesizer, ConstraintSystemRef, LinearCombination as ArkLinearCombination,
  SynthesisError, Variable as ArkVariable,
};
use ark_snark::SNARK;
use ff::{Field, PrimeField};
use halo2curves::bn256::Fr;
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::{iter, time::Instant};
use tracing::{info, info_span};

pub(crate) fn to_ark(f: &Fr) -> ArkFr {
  ArkFr::from_le_bytes_mod_order(f.to_repr().as_ref())
}

fn backend_error(e: SynthesisError) -> R1CSError {
  R1CSError::Backend {
    reason: e.to_string(),
  }
}

/// The prover's key, bundled with the constraint system it was generated for
#[derive(Clone)]
pub struct Groth16ProvingKey {
  inner: ark_groth16::ProvingKey<Bn254>,
  shape: ConstraintSystem<Fr>,
  matrices: R1CSMatrices<Fr>,
  num_public: usize,
}

/// The verifier's key
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Groth16VerifyingKey {
  #[serde_as(as = "ArkCompressed<ark_groth16::VerifyingKey<Bn254>>")]
  inner: ark_groth16::VerifyingKey<Bn254>,
  num_public: usize,
}

impl Groth16VerifyingKey {
  /// Number of public inputs the key expects
  pub fn num_public(&self) -> usize {
    self.num_public
  }
}

/// A Groth16 proof
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Groth16Proof {
  #[serde_as(as = "ArkCompressed<ark_groth16::Proof<Bn254>>")]
  inner: ark_groth16::Proof<Bn254>,
}

/// Capability to run Groth16 over BN254; obtained through [`SnarkBackend::init`]
#[derive(Clone, Copy, Debug)]
pub struct Groth16Backend {
  _init: (),
}

struct Lowered<'a> {
  cs: &'a ConstraintSystem<Fr>,
  num_public: usize,
  witness: Option<(&'a [Fr], &'a [Fr])>,
}

impl ConstraintSynthesizer<ArkFr> for Lowered<'_> {
  fn generate_constraints(self, ark_cs: ConstraintSystemRef<ArkFr>) -> Result<(), SynthesisError> {
    let n = self.cs.num_variables();
    let mut vars = Vec::with_capacity(n + 1);
    vars.push(ArkVariable::One);

    for i in 0..n {
      let assigned = self.witness.map(|(primary, auxiliary)| {
        if i < self.num_public {
          primary[i]
        } else {
          auxiliary[i - self.num_public]
        }
      });
      let value = || {
        assigned
          .map(|f| to_ark(&f))
          .ok_or(SynthesisError::AssignmentMissing)
      };
      let var = if i < self.num_public {
        ark_cs.new_input_variable(value)?
      } else {
        ark_cs.new_witness_variable(value)?
      };
      vars.push(var);
    }

    for constraint in self.cs.constraints() {
      ark_cs.enforce_constraint(
        lower(constraint.a(), &vars)?,
        lower(constraint.b(), &vars)?,
        lower(constraint.c(), &vars)?,
      )?;
    }
    Ok(())
  }
}

fn lower(
  lc: &LinearCombination<Fr>,
  vars: &[ArkVariable],
) -> Result<ArkLinearCombination<ArkFr>, SynthesisError> {
  lc.terms()
    .iter()
    .map(|(var, coeff)| {
      vars
        .get(var.index())
        .map(|v| (to_ark(coeff), *v))
        .ok_or(SynthesisError::AssignmentMissing)
    })
    .collect::<Result<Vec<_>, _>>()
    .map(ArkLinearCombination)
}

impl SnarkBackend<Fr> for Groth16Backend {
  type ProvingKey = Groth16ProvingKey;
  type VerifyingKey = Groth16VerifyingKey;
  type Proof = Groth16Proof;

  fn init() -> Result<Self, R1CSError> {
    info!(curve = "bn254", "groth16 backend ready");
    Ok(Groth16Backend { _init: () })
  }

  fn generate(
    &self,
    cs: &ConstraintSystem<Fr>,
  ) -> Result<Keypair<Groth16ProvingKey, Groth16VerifyingKey>, R1CSError> {
    cs.validate()?;
    let num_public = cs.require_public_count()?;
    let matrices = cs.to_matrices()?;

    let (_span, t) = start_span!("groth16_generate", num_cons = cs.num_constraints());
    let circuit = Lowered {
      cs,
      num_public,
      witness: None,
    };
    let (pk, vk) =
      Groth16::<Bn254>::circuit_specific_setup(circuit, &mut OsRng).map_err(backend_error)?;
    info!(elapsed_ms = %t.elapsed().as_millis(), "groth16_generate");

    Ok(Keypair {
      pk: Groth16ProvingKey {
        inner: pk,
        shape: cs.clone(),
        matrices,
        num_public,
      },
      vk: Groth16VerifyingKey {
        inner: vk,
        num_public,
      },
    })
  }

  fn prove(
    &self,
    pk: &Groth16ProvingKey,
    primary: &[Fr],
    auxiliary: &[Fr],
  ) -> Result<Groth16Proof, R1CSError> {
    let num_aux = pk.shape.num_variables() - pk.num_public;
    if primary.len() != pk.num_public {
      return Err(R1CSError::InvalidInputLength {
        expected: pk.num_public,
        actual: primary.len(),
      });
    }
    if auxiliary.len() != num_aux {
      return Err(R1CSError::InvalidWitnessLength {
        expected: num_aux,
        actual: auxiliary.len(),
      });
    }

    let z = iter::once(Fr::ONE)
      .chain(primary.iter().copied())
      .chain(auxiliary.iter().copied())
      .collect::<Vec<_>>();
    if !pk.matrices.is_sat(&z)? {
      return Err(R1CSError::Backend {
        reason: "witness does not satisfy the constraint system".to_string(),
      });
    }

    let (_span, t) = start_span!("groth16_prove", num_cons = pk.shape.num_constraints());
    let circuit = Lowered {
      cs: &pk.shape,
      num_public: pk.num_public,
      witness: Some((primary, auxiliary)),
    };
    let proof = Groth16::<Bn254>::prove(&pk.inner, circuit, &mut OsRng).map_err(backend_error)?;
    info!(elapsed_ms = %t.elapsed().as_millis(), "groth16_prove");

    Ok(Groth16Proof { inner: proof })
  }

  fn verify(
    &self,
    vk: &Groth16VerifyingKey,
    primary: &[Fr],
    proof: &Groth16Proof,
  ) -> Result<bool, R1CSError> {
    if primary.len() != vk.num_public {
      return Err(R1CSError::InvalidInputLength {
        expected: vk.num_public,
        actual: primary.len(),
      });
    }

    let (_span, t) = start_span!("groth16_verify");
    let inputs = primary.iter().map(to_ark).collect::<Vec<_>>();
    let verified =
      Groth16::<Bn254>::verify(&vk.inner, &inputs, &proof.inner).map_err(backend_error)?;
    info!(elapsed_ms = %t.elapsed().as_millis(), verified, "groth16_verify");

    Ok(verified)
  }
}
