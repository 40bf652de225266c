//! Compressed sparse row (CSR) matrices for the A, B, C sides of an R1CS.
//!
//! Row `i` of each matrix holds the terms of constraint `i`; column `j` is the
//! variable with index `j`, so column 0 is the constant wire and a full
//! assignment `z = (1, primary, auxiliary)` multiplies the matrices directly.
use super::lc::LinearCombination;
use crate::errors::R1CSError;
use ff::PrimeField;
use rayon::prelude::*;

/// A CSR matrix over `F`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseMatrix<F> {
  pub(crate) data: Vec<F>,
  pub(crate) indices: Vec<usize>,
  pub(crate) indptr: Vec<usize>,
  pub(crate) cols: usize,
}

impl<F: PrimeField> SparseMatrix<F> {
  /// An empty matrix with `cols` columns and no rows
  pub fn empty(cols: usize) -> Self {
    SparseMatrix {
      data: vec![],
      indices: vec![],
      indptr: vec![0],
      cols,
    }
  }

  pub(crate) fn push_row(&mut self, lc: &LinearCombination<F>) {
    for (var, coeff) in lc.terms() {
      self.indices.push(var.index());
      self.data.push(*coeff);
    }
    self.indptr.push(self.data.len());
  }

  /// Number of rows
  pub fn num_rows(&self) -> usize {
    self.indptr.len() - 1
  }

  /// Number of columns
  pub fn num_cols(&self) -> usize {
    self.cols
  }

  /// Number of stored entries
  pub fn nnz(&self) -> usize {
    self.data.len()
  }

  /// The `(column, value)` entries of row `i`
  pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, &F)> + '_ {
    let range = self.indptr[i]..self.indptr[i + 1];
    self.indices[range.clone()]
      .iter()
      .copied()
      .zip(self.data[range].iter())
  }

  /// All `(row, column, value)` entries in row-major order
  pub fn iter(&self) -> impl Iterator<Item = (usize, usize, F)> + '_ {
    (0..self.num_rows()).flat_map(move |r| self.row(r).map(move |(c, v)| (r, c, *v)))
  }

  /// Computes `M · z`
  pub fn multiply_vec(&self, z: &[F]) -> Result<Vec<F>, R1CSError> {
    if z.len() != self.cols {
      return Err(R1CSError::InvalidWitnessLength {
        expected: self.cols,
        actual: z.len(),
      });
    }

    Ok(
      (0..self.num_rows())
        .into_par_iter()
        .map(|r| self.row(r).fold(F::ZERO, |acc, (c, v)| acc + *v * z[c]))
        .collect(),
    )
  }
}

/// The matrices of a constraint system together with its dimensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct R1CSMatrices<F> {
  /// Number of constraints (rows)
  pub num_cons: usize,
  /// Number of variables, excluding the constant wire
  pub num_vars: usize,
  /// Number of public inputs
  pub num_io: usize,
  /// Left-hand side
  pub A: SparseMatrix<F>,
  /// Right-hand side
  pub B: SparseMatrix<F>,
  /// Output side
  pub C: SparseMatrix<F>,
}

impl<F: PrimeField> R1CSMatrices<F> {
  /// Computes `(Az, Bz, Cz)`
  pub fn multiply_vec(&self, z: &[F]) -> Result<(Vec<F>, Vec<F>, Vec<F>), R1CSError> {
    let (Az, (Bz, Cz)) = rayon::join(
      || self.A.multiply_vec(z),
      || rayon::join(|| self.B.multiply_vec(z), || self.C.multiply_vec(z)),
    );

    Ok((Az?, Bz?, Cz?))
  }

  /// Checks `Az ∘ Bz = Cz` for a full assignment `z`
  pub fn is_sat(&self, z: &[F]) -> Result<bool, R1CSError> {
    let (Az, Bz, Cz) = self.multiply_vec(z)?;
    Ok(
      (0..self.num_cons)
        .into_par_iter()
        .all(|i| Az[i] * Bz[i] == Cz[i]),
    )
  }
}
