//! This module defines the R1CS builder: variables, linear combinations,
//! constraints, the public/private partition and witness validation.
use crate::{
  digest::{DigestComputer, ShapeDigest, SimpleDigestible},
  errors::R1CSError,
};
use ff::PrimeField;
use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::{debug, warn};

mod lc;
mod sparse;
mod variable;
mod witness;

pub use lc::LinearCombination;
pub use sparse::{R1CSMatrices, SparseMatrix};
pub use variable::{Variable, VariableRegistry};
pub use witness::Assignment;

/// A single `A · B = C` constraint
#[derive(Clone, Debug, Serialize)]
pub struct Constraint<F> {
  a: LinearCombination<F>,
  b: LinearCombination<F>,
  c: LinearCombination<F>,
  #[serde(skip)]
  annotation: Option<String>,
}

impl<F: PrimeField> Constraint<F> {
  /// The A combination
  pub fn a(&self) -> &LinearCombination<F> {
    &self.a
  }

  /// The B combination
  pub fn b(&self) -> &LinearCombination<F> {
    &self.b
  }

  /// The C combination
  pub fn c(&self) -> &LinearCombination<F> {
    &self.c
  }

  /// The diagnostic annotation, if one was given
  pub fn annotation(&self) -> Option<&str> {
    self.annotation.as_deref()
  }

  fn lcs(&self) -> [&LinearCombination<F>; 3] {
    [&self.a, &self.b, &self.c]
  }

  fn evaluate(&self, witness: &Assignment<F>) -> Result<(F, F, F), R1CSError> {
    Ok((
      self.a.evaluate(witness)?,
      self.b.evaluate(witness)?,
      self.c.evaluate(witness)?,
    ))
  }
}

/// A falsified constraint together with its evaluated sides
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unsatisfied<F> {
  /// Position of the constraint
  pub index: usize,
  /// Annotation of the constraint, if any
  pub annotation: Option<String>,
  /// Evaluation of A
  pub a: F,
  /// Evaluation of B
  pub b: F,
  /// Evaluation of C
  pub c: F,
}

impl<F: PrimeField> From<Unsatisfied<F>> for R1CSError {
  fn from(u: Unsatisfied<F>) -> Self {
    R1CSError::ConstraintViolation {
      index: u.index,
      annotation: u.annotation.unwrap_or_else(|| "unnamed".to_string()),
      a: format!("{:?}", u.a),
      b: format!("{:?}", u.b),
      c: format!("{:?}", u.c),
    }
  }
}

/// Ordered R1CS constraints over the variables of a registry, with the
/// boundary between public (`1..=k`) and private (`k+1..=n`) variables.
#[derive(Clone, Debug)]
pub struct ConstraintSystem<F: PrimeField> {
  registry: VariableRegistry,
  constraints: Vec<Constraint<F>>,
  num_public: Option<usize>,
  digest: OnceCell<ShapeDigest>,
}

impl<F: PrimeField> Default for ConstraintSystem<F> {
  fn default() -> Self {
    ConstraintSystem {
      registry: VariableRegistry::new(),
      constraints: vec![],
      num_public: None,
      digest: OnceCell::new(),
    }
  }
}

impl<F: PrimeField> ConstraintSystem<F> {
  /// Create an empty constraint system
  pub fn new() -> Self {
    ConstraintSystem::default()
  }

  /// Allocates a fresh variable; see [`VariableRegistry::allocate`]
  pub fn allocate(&mut self, label: impl Into<String>) -> Variable {
    self.digest.take();
    self.registry.allocate(label)
  }

  /// Appends `a · b = c`. Variable references are checked at validation or
  /// evaluation time, not here.
  pub fn add_constraint(
    &mut self,
    a: LinearCombination<F>,
    b: LinearCombination<F>,
    c: LinearCombination<F>,
  ) {
    self.push(a, b, c, None);
  }

  /// Appends `a · b = c` under a diagnostic annotation
  pub fn enforce(
    &mut self,
    annotation: impl Into<String>,
    a: LinearCombination<F>,
    b: LinearCombination<F>,
    c: LinearCombination<F>,
  ) {
    self.push(a, b, c, Some(annotation.into()));
  }

  fn push(
    &mut self,
    a: LinearCombination<F>,
    b: LinearCombination<F>,
    c: LinearCombination<F>,
    annotation: Option<String>,
  ) {
    self.digest.take();
    self.constraints.push(Constraint {
      a,
      b,
      c,
      annotation,
    });
  }

  /// Fixes the number of public variables. Setting the same value twice is
  /// accepted; a conflicting value or one above the variable count is not.
  pub fn set_public_count(&mut self, k: usize) -> Result<(), R1CSError> {
    let n = self.num_variables();
    if k > n {
      return Err(R1CSError::InvalidPartition {
        reason: format!("public input size {k} exceeds the {n} allocated variables"),
      });
    }
    match self.num_public {
      Some(prev) if prev != k => Err(R1CSError::InvalidPartition {
        reason: format!("public input size already set to {prev}, cannot change it to {k}"),
      }),
      _ => {
        self.digest.take();
        self.num_public = Some(k);
        Ok(())
      }
    }
  }

  /// The number of public variables, if the partition has been fixed
  pub fn public_count(&self) -> Option<usize> {
    self.num_public
  }

  pub(crate) fn require_public_count(&self) -> Result<usize, R1CSError> {
    self.num_public.ok_or_else(|| R1CSError::InvalidPartition {
      reason: "public input size was never set".to_string(),
    })
  }

  /// Number of constraints
  pub fn num_constraints(&self) -> usize {
    self.constraints.len()
  }

  /// Number of variables, excluding the constant wire
  pub fn num_variables(&self) -> usize {
    self.registry.count() - 1
  }

  /// The constraints in insertion order
  pub fn constraints(&self) -> &[Constraint<F>] {
    &self.constraints
  }

  /// The registry that issued this system's variables
  pub fn registry(&self) -> &VariableRegistry {
    &self.registry
  }

  fn check_declared(&self, index: usize, constraint: &Constraint<F>) -> Result<(), R1CSError> {
    constraint
      .lcs()
      .into_iter()
      .flat_map(|lc| lc.terms())
      .find(|(var, _)| !self.registry.contains(*var))
      .map_or(Ok(()), |(var, _)| {
        Err(R1CSError::UndeclaredVariable {
          constraint: index,
          index: var.index(),
        })
      })
  }

  /// Checks that the system is ready to be handed to a backend: every
  /// referenced variable was allocated and the partition is fixed.
  pub fn validate(&self) -> Result<(), R1CSError> {
    for (i, constraint) in self.constraints.iter().enumerate() {
      self.check_declared(i, constraint)?;
    }
    self.require_public_count()?;
    Ok(())
  }

  /// Returns the first constraint `witness` falsifies, if any
  pub fn first_unsatisfied(
    &self,
    witness: &Assignment<F>,
  ) -> Result<Option<Unsatisfied<F>>, R1CSError> {
    for (i, constraint) in self.constraints.iter().enumerate() {
      if let Some(u) = self.evaluate_constraint(i, constraint, witness)? {
        return Ok(Some(u));
      }
    }
    Ok(None)
  }

  /// Returns every constraint `witness` falsifies, in order
  pub fn all_unsatisfied(&self, witness: &Assignment<F>) -> Result<Vec<Unsatisfied<F>>, R1CSError> {
    let mut failures = vec![];
    for (i, constraint) in self.constraints.iter().enumerate() {
      failures.extend(self.evaluate_constraint(i, constraint, witness)?);
    }
    Ok(failures)
  }

  /// Returns true iff `witness` satisfies every constraint.
  /// Undeclared or unassigned variables are errors rather than `false`.
  pub fn is_satisfied(&self, witness: &Assignment<F>) -> Result<bool, R1CSError> {
    Ok(self.first_unsatisfied(witness)?.is_none())
  }

  /// Fails with [`R1CSError::ConstraintViolation`] describing the first
  /// falsified constraint. Must pass before a witness reaches a prover.
  pub fn check(&self, witness: &Assignment<F>) -> Result<(), R1CSError> {
    match self.first_unsatisfied(witness)? {
      None => Ok(()),
      Some(u) => {
        warn!(
          index = u.index,
          annotation = u.annotation.as_deref().unwrap_or("unnamed"),
          "witness does not satisfy constraint"
        );
        Err(u.into())
      }
    }
  }

  fn evaluate_constraint(
    &self,
    index: usize,
    constraint: &Constraint<F>,
    witness: &Assignment<F>,
  ) -> Result<Option<Unsatisfied<F>>, R1CSError> {
    self.check_declared(index, constraint)?;
    let (a, b, c) = constraint.evaluate(witness).inspect_err(|e| {
      debug!(constraint = index, error = %e, "cannot evaluate constraint");
    })?;
    if a * b == c {
      Ok(None)
    } else {
      Ok(Some(Unsatisfied {
        index,
        annotation: constraint.annotation.clone(),
        a,
        b,
        c,
      }))
    }
  }

  /// Exports the A, B, C matrices in CSR form
  pub fn to_matrices(&self) -> Result<R1CSMatrices<F>, R1CSError> {
    let cols = self.registry.count();
    let mut A = SparseMatrix::empty(cols);
    let mut B = SparseMatrix::empty(cols);
    let mut C = SparseMatrix::empty(cols);

    for (i, constraint) in self.constraints.iter().enumerate() {
      self.check_declared(i, constraint)?;
      A.push_row(&constraint.a);
      B.push_row(&constraint.b);
      C.push_row(&constraint.c);
    }

    Ok(R1CSMatrices {
      num_cons: self.num_constraints(),
      num_vars: self.num_variables(),
      num_io: self.num_public.unwrap_or(0),
      A,
      B,
      C,
    })
  }
}

#[derive(Serialize)]
struct ShapeView<'a, F> {
  num_variables: usize,
  num_public: Option<usize>,
  constraints: &'a [Constraint<F>],
}

impl<F: Serialize> SimpleDigestible for ShapeView<'_, F> {}

impl<F: PrimeField + Serialize> ConstraintSystem<F> {
  /// SHA3-256 digest of the structure: variable count, partition and
  /// constraints. Labels and annotations are not part of it.
  pub fn digest(&self) -> Result<ShapeDigest, R1CSError> {
    self
      .digest
      .get_or_try_init(|| {
        let shape = ShapeView {
          num_variables: self.num_variables(),
          num_public: self.num_public,
          constraints: &self.constraints,
        };
        DigestComputer::new(&shape)
          .digest()
          .map_err(|e| R1CSError::DigestError {
            reason: e.to_string(),
          })
      })
      .cloned()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use ff::Field;
  use halo2curves::bn256::Fr;

  // x * y = z, z + 1 = w
  fn small_system() -> (ConstraintSystem<Fr>, [Variable; 4]) {
    let mut cs = ConstraintSystem::new();
    let w = cs.allocate("w");
    let x = cs.allocate("x");
    let y = cs.allocate("y");
    let z = cs.allocate("z");
    cs.set_public_count(1).unwrap();
    cs.enforce("mul", x.into(), y.into(), z.into());
    cs.add_constraint(
      LinearCombination::from(z).add_constant(Fr::ONE),
      LinearCombination::constant(Fr::ONE),
      w.into(),
    );
    (cs, [w, x, y, z])
  }

  fn assign(vars: &[Variable], values: &[u64]) -> Assignment<Fr> {
    let mut w = Assignment::new();
    for (v, x) in vars.iter().zip(values) {
      w.set(*v, Fr::from(*x)).unwrap();
    }
    w
  }

  #[test]
  fn test_counts() {
    let (cs, _) = small_system();
    assert_eq!(cs.num_constraints(), 2);
    assert_eq!(cs.num_variables(), 4);
    assert_eq!(cs.public_count(), Some(1));
    assert_eq!(cs.constraints()[0].annotation(), Some("mul"));
    assert_eq!(cs.constraints()[1].annotation(), None);
    assert!(cs.validate().is_ok());
  }

  #[test]
  fn test_satisfied() {
    let (cs, vars) = small_system();
    let w = assign(&vars, &[13, 3, 4, 12]);
    assert!(cs.is_satisfied(&w).unwrap());
    assert!(cs.check(&w).is_ok());
    assert!(cs.all_unsatisfied(&w).unwrap().is_empty());
  }

  #[test]
  fn test_unsatisfied_reports_first_failure() {
    let (cs, vars) = small_system();
    let w = assign(&vars, &[13, 3, 5, 12]);
    assert!(!cs.is_satisfied(&w).unwrap());

    let u = cs.first_unsatisfied(&w).unwrap().unwrap();
    assert_eq!(u.index, 0);
    assert_eq!(u.annotation.as_deref(), Some("mul"));
    assert_eq!((u.a, u.b, u.c), (Fr::from(3), Fr::from(5), Fr::from(12)));

    match cs.check(&w) {
      Err(R1CSError::ConstraintViolation {
        index, annotation, ..
      }) => {
        assert_eq!(index, 0);
        assert_eq!(annotation, "mul");
      }
      other => panic!("unexpected result {other:?}"),
    }
  }

  #[test]
  fn test_all_unsatisfied() {
    let (cs, vars) = small_system();
    let w = assign(&vars, &[14, 3, 5, 12]);
    let failures = cs.all_unsatisfied(&w).unwrap();
    assert_eq!(
      failures.iter().map(|u| u.index).collect::<Vec<_>>(),
      vec![0, 1]
    );
  }

  #[test]
  fn test_unassigned_is_an_error() {
    let (cs, vars) = small_system();
    let w = assign(&vars[..2], &[13, 3]);
    assert_eq!(
      cs.is_satisfied(&w),
      Err(R1CSError::UnassignedVariable { index: 3 })
    );
  }

  #[test]
  fn test_undeclared_variable() {
    let (mut cs, vars) = small_system();
    let ghost = Variable::new_unchecked(9);
    cs.add_constraint(ghost.into(), ghost.into(), ghost.into());

    let expected = Err(R1CSError::UndeclaredVariable {
      constraint: 2,
      index: 9,
    });
    assert_eq!(cs.validate(), expected);
    assert_eq!(cs.to_matrices().map(|_| ()), expected);

    // even if the witness happens to hold a value for it
    let mut w = assign(&vars, &[13, 3, 4, 12]);
    w.set(ghost, Fr::ONE).unwrap();
    assert_eq!(cs.is_satisfied(&w).map(|_| ()), expected);
  }

  #[test]
  fn test_partition_rules() {
    let mut cs = ConstraintSystem::<Fr>::new();
    cs.allocate("a");
    cs.allocate("b");

    assert!(matches!(
      cs.validate(),
      Err(R1CSError::InvalidPartition { .. })
    ));
    assert!(matches!(
      cs.set_public_count(3),
      Err(R1CSError::InvalidPartition { .. })
    ));
    cs.set_public_count(2).unwrap();
    cs.set_public_count(2).unwrap();
    assert!(matches!(
      cs.set_public_count(1),
      Err(R1CSError::InvalidPartition { .. })
    ));
    assert_eq!(cs.public_count(), Some(2));
  }

  #[test]
  fn test_zero_public_inputs() {
    let mut cs = ConstraintSystem::<Fr>::new();
    let a = cs.allocate("a");
    cs.set_public_count(0).unwrap();

    let w = assign(&[a], &[5]);
    assert!(w.primary_input(&cs).unwrap().is_empty());
    assert_eq!(w.auxiliary_input(&cs).unwrap(), vec![Fr::from(5)]);
  }

  #[test]
  fn test_matrices_agree_with_evaluation() {
    let (cs, vars) = small_system();
    let m = cs.to_matrices().unwrap();
    assert_eq!(m.num_cons, 2);
    assert_eq!(m.num_vars, 4);
    assert_eq!(m.num_io, 1);

    let good = assign(&vars, &[13, 3, 4, 12]);
    let bad = assign(&vars, &[13, 3, 5, 12]);
    for w in [good, bad] {
      let z = w.full_assignment(&cs).unwrap();
      assert_eq!(m.is_sat(&z).unwrap(), cs.is_satisfied(&w).unwrap());
    }
  }

  #[test]
  fn test_digest_ignores_labels() {
    let (cs1, _) = small_system();

    let mut cs2 = ConstraintSystem::<Fr>::new();
    let w = cs2.allocate("out");
    let x = cs2.allocate("left");
    let y = cs2.allocate("right");
    let z = cs2.allocate("product");
    cs2.set_public_count(1).unwrap();
    cs2.add_constraint(x.into(), y.into(), z.into());
    cs2.enforce(
      "increment",
      LinearCombination::from(z).add_constant(Fr::ONE),
      LinearCombination::constant(Fr::ONE),
      w.into(),
    );

    assert_eq!(cs1.digest().unwrap(), cs2.digest().unwrap());
  }

  #[test]
  fn test_digest_tracks_structure() {
    let (mut cs, vars) = small_system();
    let before = cs.digest().unwrap();
    // cached value is reused
    assert_eq!(cs.digest().unwrap(), before);

    cs.add_constraint(vars[1].into(), vars[1].into(), vars[2].into());
    assert_ne!(cs.digest().unwrap(), before);
  }
}
