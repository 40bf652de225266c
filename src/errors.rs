//! This module defines errors returned by the library.
use thiserror::Error;

/// Errors returned by the constraint-system builder, the witness table and the proving pipeline
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum R1CSError {
  /// returned if a linear combination references a variable the registry never issued
  #[error("UndeclaredVariable: constraint {constraint} references variable {index}")]
  UndeclaredVariable {
    /// Position of the offending constraint
    constraint: usize,
    /// The undeclared variable index
    index: usize,
  },
  /// returned if an evaluation or an input view needs a witness slot that has no value
  #[error("UnassignedVariable: variable {index} has no value")]
  UnassignedVariable {
    /// The unassigned variable index
    index: usize,
  },
  /// returned if the public/private boundary is unset or set inconsistently
  #[error("InvalidPartition: {reason}")]
  InvalidPartition {
    /// The reason for the partition failure
    reason: String,
  },
  /// returned if the supplied witness falsifies a constraint
  #[error("ConstraintViolation: constraint {index} ({annotation}) is unsatisfied: {a} * {b} != {c}")]
  ConstraintViolation {
    /// Position of the first failing constraint
    index: usize,
    /// Diagnostic annotation of the failing constraint
    annotation: String,
    /// Evaluation of the A combination
    a: String,
    /// Evaluation of the B combination
    b: String,
    /// Evaluation of the C combination
    c: String,
  },
  /// returned by `set_once` when a different value is already present
  #[error("ConflictingAssignment: variable {index} already holds a different value")]
  ConflictingAssignment {
    /// The variable index that was assigned twice
    index: usize,
  },
  /// returned when a witness value is assigned to an index beyond the table's capacity
  #[error("InvalidIndex: variable {index} exceeds the largest assignable index {max}")]
  InvalidIndex {
    /// The rejected variable index
    index: usize,
    /// The largest index the witness table accepts
    max: usize,
  },
  /// returned when a caller tries to assign the constant wire
  #[error("ConstantWireAssignment")]
  ConstantWireAssignment,
  /// returned if the supplied public input is not of the right length
  #[error("InvalidInputLength: expected {expected}, got {actual}")]
  InvalidInputLength {
    /// Length implied by the partition
    expected: usize,
    /// Length that was supplied
    actual: usize,
  },
  /// returned if the supplied witness is not of the right length
  #[error("InvalidWitnessLength: expected {expected}, got {actual}")]
  InvalidWitnessLength {
    /// Length implied by the partition
    expected: usize,
    /// Length that was supplied
    actual: usize,
  },
  /// returned when there is an error creating a digest
  #[error("DigestError: {reason}")]
  DigestError {
    /// The reason for the digest error
    reason: String,
  },
  /// returned by the proving backend; propagated unmodified
  #[error("BackendError: {reason}")]
  Backend {
    /// The reason reported by the backend
    reason: String,
  },
  /// returned when persisting or loading keys and proofs fails
  #[error("StorageError: {reason}")]
  Storage {
    /// The reason for the storage failure
    reason: String,
  },
}

impl From<std::io::Error> for R1CSError {
  fn from(err: std::io::Error) -> Self {
    R1CSError::Storage {
      reason: err.to_string(),
    }
  }
}

impl From<bincode::Error> for R1CSError {
  fn from(err: bincode::Error) -> Self {
    R1CSError::Storage {
      reason: err.to_string(),
    }
  }
}
