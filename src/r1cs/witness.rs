//! The witness table: concrete field values for the variables of a constraint system.
use super::{ConstraintSystem, variable::Variable};
use crate::errors::R1CSError;
use ff::PrimeField;
use tracing::debug;

/// Maps variable indices to field values.
///
/// Slot 0 always holds `F::ONE`. Other slots may stay empty until the
/// witness is checked or partitioned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment<F: PrimeField> {
  values: Vec<Option<F>>,
}

impl<F: PrimeField> Default for Assignment<F> {
  fn default() -> Self {
    Assignment {
      values: vec![Some(F::ONE)],
    }
  }
}

impl<F: PrimeField> Assignment<F> {
  /// Largest variable index the table accepts
  pub const MAX_INDEX: usize = (1 << 26) - 1;

  /// Create a table holding only the constant wire
  pub fn new() -> Self {
    Assignment::default()
  }

  /// Assigns `value` to `var`, replacing any previous value.
  pub fn set(&mut self, var: Variable, value: F) -> Result<(), R1CSError> {
    let slot = self.slot_mut(var)?;
    if let Some(prev) = slot.replace(value) {
      if prev != value {
        debug!(index = var.index(), "overwriting witness value");
      }
    }
    Ok(())
  }

  /// Assigns `value` to `var` unless a different value is already present.
  pub fn set_once(&mut self, var: Variable, value: F) -> Result<(), R1CSError> {
    let slot = self.slot_mut(var)?;
    match *slot {
      Some(prev) if prev != value => Err(R1CSError::ConflictingAssignment { index: var.index() }),
      _ => {
        *slot = Some(value);
        Ok(())
      }
    }
  }

  /// Returns the value of `var`
  pub fn get(&self, var: Variable) -> Result<F, R1CSError> {
    self
      .values
      .get(var.index())
      .copied()
      .flatten()
      .ok_or(R1CSError::UnassignedVariable { index: var.index() })
  }

  /// Returns true if `var` holds a value
  pub fn is_assigned(&self, var: Variable) -> bool {
    matches!(self.values.get(var.index()), Some(Some(_)))
  }

  /// One past the highest index that has ever been assigned
  pub fn len(&self) -> usize {
    self.values.len()
  }

  /// Always false: the constant wire is assigned from construction
  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// Values of the public variables `1..=k`, in index order
  pub fn primary_input(&self, cs: &ConstraintSystem<F>) -> Result<Vec<F>, R1CSError> {
    let k = cs.require_public_count()?;
    self.collect(1..=k)
  }

  /// Values of the private variables `k+1..=n`, in index order
  pub fn auxiliary_input(&self, cs: &ConstraintSystem<F>) -> Result<Vec<F>, R1CSError> {
    let k = cs.require_public_count()?;
    self.collect(k + 1..=cs.num_variables())
  }

  /// Values of every variable `0..=n`, constant wire first
  pub fn full_assignment(&self, cs: &ConstraintSystem<F>) -> Result<Vec<F>, R1CSError> {
    self.collect(0..=cs.num_variables())
  }

  fn collect(&self, indices: impl Iterator<Item = usize>) -> Result<Vec<F>, R1CSError> {
    indices
      .map(|i| self.get(Variable::new_unchecked(i)))
      .collect()
  }

  fn slot_mut(&mut self, var: Variable) -> Result<&mut Option<F>, R1CSError> {
    if var.is_one() {
      return Err(R1CSError::ConstantWireAssignment);
    }
    let index = var.index();
    if index > Self::MAX_INDEX {
      return Err(R1CSError::InvalidIndex {
        index,
        max: Self::MAX_INDEX,
      });
    }
    if index >= self.values.len() {
      self.values.resize(index + 1, None);
    }
    Ok(&mut self.values[index])
  }
}
