//! Linear combinations over the variables of a constraint system.
use super::{variable::Variable, witness::Assignment};
use crate::errors::R1CSError;
use ff::PrimeField;
use itertools::{EitherOrBoth, Itertools};
use serde::Serialize;
use std::ops::{Add, Mul, Neg, Sub};

/// `Σ coeff_i · var_i`, with constants carried by [`Variable::ONE`].
///
/// Terms are kept sorted by variable index, with no repeated variable and no
/// zero coefficient, so two combinations denoting the same sum compare equal.
/// Combinators never mutate their inputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LinearCombination<F> {
  terms: Vec<(Variable, F)>,
}

impl<F: PrimeField> Default for LinearCombination<F> {
  fn default() -> Self {
    Self::zero()
  }
}

impl<F: PrimeField> LinearCombination<F> {
  /// The empty combination
  pub fn zero() -> Self {
    LinearCombination { terms: Vec::new() }
  }

  /// `1 · var`
  pub fn from_variable(var: Variable) -> Self {
    LinearCombination {
      terms: vec![(var, F::ONE)],
    }
  }

  /// `c · ONE`
  pub fn constant(c: F) -> Self {
    Self::from_variable(Variable::ONE).scale(c)
  }

  /// Builds a canonical combination from arbitrary terms, summing repeated
  /// variables and dropping zero coefficients.
  pub fn from_terms(terms: impl IntoIterator<Item = (Variable, F)>) -> Self {
    let mut terms = terms.into_iter().collect::<Vec<_>>();
    terms.sort_by_key(|(var, _)| *var);

    let terms = terms
      .into_iter()
      .coalesce(|(v1, c1), (v2, c2)| {
        if v1 == v2 {
          Ok((v1, c1 + c2))
        } else {
          Err(((v1, c1), (v2, c2)))
        }
      })
      .filter(|(_, c)| !c.is_zero_vartime())
      .collect();

    LinearCombination { terms }
  }

  /// The terms in ascending variable order
  pub fn terms(&self) -> &[(Variable, F)] {
    &self.terms
  }

  /// Number of non-zero terms
  pub fn len(&self) -> usize {
    self.terms.len()
  }

  /// Returns true if no term survives
  pub fn is_zero(&self) -> bool {
    self.terms.is_empty()
  }

  /// Multiplies every coefficient by `c`
  pub fn scale(&self, c: F) -> Self {
    if c.is_zero_vartime() {
      return Self::zero();
    }
    LinearCombination {
      terms: self.terms.iter().map(|(var, coeff)| (*var, *coeff * c)).collect(),
    }
  }

  /// Term-wise sum; coefficients of shared variables are added and zeros pruned
  pub fn add(&self, other: &Self) -> Self {
    self.merge(other)
  }

  /// `self - other`
  pub fn sub(&self, other: &Self) -> Self {
    self.merge(&other.scale(-F::ONE))
  }

  /// `self + c`, e.g. `x - 8` is `x.add_constant(-F::from(8))`
  pub fn add_constant(&self, c: F) -> Self {
    self.merge(&Self::constant(c))
  }

  /// `Σ coeff_i · witness[var_i]`
  pub fn evaluate(&self, witness: &Assignment<F>) -> Result<F, R1CSError> {
    self
      .terms
      .iter()
      .try_fold(F::ZERO, |acc, (var, coeff)| -> Result<F, R1CSError> {
        Ok(acc + *coeff * witness.get(*var)?)
      })
  }

  fn merge(&self, other: &Self) -> Self {
    let terms = self
      .terms
      .iter()
      .merge_join_by(other.terms.iter(), |(l, _), (r, _)| l.cmp(r))
      .filter_map(|pair| match pair {
        EitherOrBoth::Both((var, l), (_, r)) => {
          let sum = *l + *r;
          (!sum.is_zero_vartime()).then_some((*var, sum))
        }
        EitherOrBoth::Left(term) | EitherOrBoth::Right(term) => Some(*term),
      })
      .collect();

    LinearCombination { terms }
  }
}

impl<F: PrimeField> From<Variable> for LinearCombination<F> {
  fn from(var: Variable) -> Self {
    Self::from_variable(var)
  }
}

impl<'a, F: PrimeField> Add<&'a LinearCombination<F>> for &'a LinearCombination<F> {
  type Output = LinearCombination<F>;

  fn add(self, rhs: &'a LinearCombination<F>) -> LinearCombination<F> {
    self.merge(rhs)
  }
}

impl<'a, F: PrimeField> Sub<&'a LinearCombination<F>> for &'a LinearCombination<F> {
  type Output = LinearCombination<F>;

  fn sub(self, rhs: &'a LinearCombination<F>) -> LinearCombination<F> {
    self.merge(&rhs.scale(-F::ONE))
  }
}

impl<F: PrimeField> Mul<F> for &LinearCombination<F> {
  type Output = LinearCombination<F>;

  fn mul(self, rhs: F) -> LinearCombination<F> {
    self.scale(rhs)
  }
}

impl<F: PrimeField> Neg for &LinearCombination<F> {
  type Output = LinearCombination<F>;

  fn neg(self) -> LinearCombination<F> {
    self.scale(-F::ONE)
  }
}

impl<F: PrimeField> Add<Variable> for &LinearCombination<F> {
  type Output = LinearCombination<F>;

  fn add(self, rhs: Variable) -> LinearCombination<F> {
    self.merge(&LinearCombination::from_variable(rhs))
  }
}

impl<F: PrimeField> Sub<Variable> for &LinearCombination<F> {
  type Output = LinearCombination<F>;

  fn sub(self, rhs: Variable) -> LinearCombination<F> {
    self.merge(&LinearCombination::from_variable(rhs).scale(-F::ONE))
  }
}

impl Variable {
  /// `var - c`
  pub fn sub_constant<F: PrimeField>(self, c: F) -> LinearCombination<F> {
    LinearCombination::from_variable(self).add_constant(-c)
  }
}

impl<F: PrimeField> Sub<F> for Variable {
  type Output = LinearCombination<F>;

  fn sub(self, rhs: F) -> LinearCombination<F> {
    self.sub_constant(rhs)
  }
}
