//! This module defines the trait a circuit implements to be driven through the pipeline.
use crate::{
  errors::R1CSError,
  r1cs::{Assignment, ConstraintSystem},
};
use ff::PrimeField;

/// A circuit lays out its variables and constraints, then fills in a witness
/// for the variables it allocated.
pub trait Circuit<F: PrimeField> {
  /// Handles to the variables allocated by `synthesize`
  type Wires;

  /// Allocates variables, fixes the public input size and adds constraints
  fn synthesize(&self, cs: &mut ConstraintSystem<F>) -> Result<Self::Wires, R1CSError>;

  /// Computes the witness for the wires returned by `synthesize`
  fn assign(&self, wires: &Self::Wires) -> Result<Assignment<F>, R1CSError>;
}
