//! Variables and the registry that issues them.
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A slot in the computation, identified purely by its index.
///
/// Index 0 is the constant wire and is only reachable through [`Variable::ONE`];
/// the registry hands out indices starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Variable(usize);

impl Variable {
  /// The constant "one" wire
  pub const ONE: Variable = Variable(0);

  /// Builds a variable from a raw index without consulting a registry.
  /// Referencing an index the registry never issued is reported when the
  /// constraint system is validated or evaluated.
  pub const fn new_unchecked(index: usize) -> Self {
    Variable(index)
  }

  /// Returns the index of the variable
  pub const fn index(&self) -> usize {
    self.0
  }

  /// Returns true for the constant wire
  pub const fn is_one(&self) -> bool {
    self.0 == 0
  }
}

/// Issues fresh variables and keeps their debug labels.
#[derive(Clone, Debug)]
pub struct VariableRegistry {
  // labels[i] belongs to variable i; labels[0] is the constant wire
  labels: Vec<String>,
}

impl Default for VariableRegistry {
  fn default() -> Self {
    VariableRegistry {
      labels: vec![String::from("ONE")],
    }
  }
}

impl VariableRegistry {
  /// Create a registry that holds only the constant wire
  pub fn new() -> Self {
    VariableRegistry::default()
  }

  /// Returns a fresh variable with the next available index.
  /// The label is only used in diagnostics.
  pub fn allocate(&mut self, label: impl Into<String>) -> Variable {
    let label = label.into();
    let var = Variable(self.labels.len());
    trace!(index = var.index(), label = %label, "allocate");
    self.labels.push(label);
    var
  }

  /// Total number of variables, including the constant wire
  pub fn count(&self) -> usize {
    self.labels.len()
  }

  /// Returns true if `var` was issued by this registry or is the constant wire
  pub fn contains(&self, var: Variable) -> bool {
    var.index() < self.labels.len()
  }

  /// Returns the debug label of `var`, if it was issued by this registry
  pub fn label(&self, var: Variable) -> Option<&str> {
    self.labels.get(var.index()).map(String::as_str)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_allocation_is_sequential() {
    let mut registry = VariableRegistry::new();
    assert_eq!(registry.count(), 1);

    let indices: Vec<usize> = ["a", "b", "c", "d"]
      .iter()
      .map(|l| registry.allocate(*l).index())
      .collect();

    assert_eq!(indices, vec![1, 2, 3, 4]);
    assert_eq!(registry.count(), 5);
  }

  #[test]
  fn test_allocation_is_reproducible() {
    let run = || {
      let mut registry = VariableRegistry::new();
      (0..16)
        .map(|i| registry.allocate(format!("v{i}")))
        .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
  }

  #[test]
  fn test_constant_wire_is_never_issued() {
    let mut registry = VariableRegistry::new();
    let v = registry.allocate("ONE");
    assert_ne!(v, Variable::ONE);
    assert!(Variable::ONE.is_one());
    assert_eq!(registry.label(Variable::ONE), Some("ONE"));
  }

  #[test]
  fn test_labels_do_not_affect_identity() {
    let mut r1 = VariableRegistry::new();
    let mut r2 = VariableRegistry::new();
    assert_eq!(r1.allocate("x"), r2.allocate("y"));
    assert_eq!(r1.label(Variable::new_unchecked(1)), Some("x"));
    assert_eq!(r2.label(Variable::new_unchecked(1)), Some("y"));
  }

  #[test]
  fn test_contains() {
    let mut registry = VariableRegistry::new();
    let v = registry.allocate("v");
    assert!(registry.contains(v));
    assert!(registry.contains(Variable::ONE));
    assert!(!registry.contains(Variable::new_unchecked(2)));
    assert_eq!(registry.label(Variable::new_unchecked(2)), None);
  }
}
