//! The demonstration circuit `f(x1, x2) = (x1 - 8)^2 + (x2 - 3)^3`.
//!
//! `out` is the only public variable; the inputs and intermediates are
//! private:
//!
//! ```text
//! (x1 - 8) * 1 = T1
//!  T1 * T1     = T2
//! (x2 - 3) * 1 = T3
//!  T3 * T3     = T4
//!  T3 * T4     = T5
//! (T5 + T2) * 1 = out
//! ```
use crate::{
  errors::R1CSError,
  r1cs::{Assignment, ConstraintSystem, LinearCombination, Variable},
  traits::circuit::Circuit,
};
use ff::PrimeField;

/// Proves knowledge of `x1, x2` with `(x1 - 8)^2 + (x2 - 3)^3 = out`
#[derive(Clone, Debug)]
pub struct SumOfPowersCircuit<F> {
  x1: F,
  x2: F,
}

/// Variables allocated by [`SumOfPowersCircuit`], in allocation order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SumOfPowersWires {
  /// Public result
  pub out: Variable,
  /// First private input
  pub x1: Variable,
  /// Second private input
  pub x2: Variable,
  /// `x1 - 8`
  pub t1: Variable,
  /// `T1^2`
  pub t2: Variable,
  /// `x2 - 3`
  pub t3: Variable,
  /// `T3^2`
  pub t4: Variable,
  /// `T3 * T4`
  pub t5: Variable,
}

impl<F: PrimeField> SumOfPowersCircuit<F> {
  /// Create the circuit for the given private inputs
  pub fn new(x1: u64, x2: u64) -> Self {
    SumOfPowersCircuit {
      x1: F::from(x1),
      x2: F::from(x2),
    }
  }

  /// `f(x1, x2)` computed directly in the field
  pub fn output(&self) -> F {
    let t1 = self.x1 - F::from(8);
    let t3 = self.x2 - F::from(3);
    t1.square() + t3.square() * t3
  }
}

impl<F: PrimeField> Circuit<F> for SumOfPowersCircuit<F> {
  type Wires = SumOfPowersWires;

  fn synthesize(&self, cs: &mut ConstraintSystem<F>) -> Result<SumOfPowersWires, R1CSError> {
    let wires = SumOfPowersWires {
      out: cs.allocate("out"),
      x1: cs.allocate("x1"),
      x2: cs.allocate("x2"),
      t1: cs.allocate("T1"),
      t2: cs.allocate("T2"),
      t3: cs.allocate("T3"),
      t4: cs.allocate("T4"),
      t5: cs.allocate("T5"),
    };
    cs.set_public_count(1)?;

    let one = LinearCombination::constant(F::ONE);
    let SumOfPowersWires {
      out,
      x1,
      x2,
      t1,
      t2,
      t3,
      t4,
      t5,
    } = wires;

    cs.enforce(
      "x1 - 8 = T1",
      x1 - F::from(8),
      one.clone(),
      t1.into(),
    );
    cs.enforce("T1 * T1 = T2", t1.into(), t1.into(), t2.into());
    cs.enforce(
      "x2 - 3 = T3",
      x2 - F::from(3),
      one.clone(),
      t3.into(),
    );
    cs.enforce("T3 * T3 = T4", t3.into(), t3.into(), t4.into());
    cs.enforce("T3 * T4 = T5", t3.into(), t4.into(), t5.into());
    cs.enforce(
      "T5 + T2 = out",
      &LinearCombination::from(t5) + t2,
      one,
      out.into(),
    );

    Ok(wires)
  }

  fn assign(&self, wires: &SumOfPowersWires) -> Result<Assignment<F>, R1CSError> {
    let t1 = self.x1 - F::from(8);
    let t2 = t1.square();
    let t3 = self.x2 - F::from(3);
    let t4 = t3.square();
    let t5 = t3 * t4;

    let mut witness = Assignment::new();
    for (var, value) in [
      (wires.x1, self.x1),
      (wires.x2, self.x2),
      (wires.t1, t1),
      (wires.t2, t2),
      (wires.t3, t3),
      (wires.t4, t4),
      (wires.t5, t5),
      (wires.out, t5 + t2),
    ] {
      witness.set_once(var, value)?;
    }
    Ok(witness)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use halo2curves::bn256::Fr;

  fn synthesize(circuit: &SumOfPowersCircuit<Fr>) -> (ConstraintSystem<Fr>, SumOfPowersWires) {
    let mut cs = ConstraintSystem::new();
    let wires = circuit.synthesize(&mut cs).unwrap();
    (cs, wires)
  }

  #[test]
  fn test_layout() {
    let (cs, wires) = synthesize(&SumOfPowersCircuit::new(11, 5));
    assert_eq!(cs.num_constraints(), 6);
    assert_eq!(cs.num_variables(), 8);
    assert_eq!(cs.public_count(), Some(1));
    assert_eq!(wires.out.index(), 1);
    assert_eq!(wires.t5.index(), 8);
    assert_eq!(cs.registry().label(wires.x1), Some("x1"));
    assert!(cs.validate().is_ok());
  }

  #[test]
  fn test_assignment_matches_reference_values() {
    let circuit = SumOfPowersCircuit::<Fr>::new(11, 5);
    let (cs, wires) = synthesize(&circuit);
    let witness = circuit.assign(&wires).unwrap();

    let expected = [
      (wires.x1, 11),
      (wires.t1, 3),
      (wires.t2, 9),
      (wires.x2, 5),
      (wires.t3, 2),
      (wires.t4, 4),
      (wires.t5, 8),
      (wires.out, 17),
    ];
    for (var, value) in expected {
      assert_eq!(witness.get(var).unwrap(), Fr::from(value));
    }
    assert_eq!(circuit.output(), Fr::from(17));
    assert!(cs.is_satisfied(&witness).unwrap());
  }

  #[test]
  fn test_inputs_below_offsets() {
    // x1 - 8 and x2 - 3 wrap around the field
    let circuit = SumOfPowersCircuit::<Fr>::new(6, 1);
    let (cs, wires) = synthesize(&circuit);
    let witness = circuit.assign(&wires).unwrap();

    // (-2)^2 + (-2)^3 = -4
    assert_eq!(circuit.output(), -Fr::from(4));
    assert_eq!(witness.get(wires.out).unwrap(), -Fr::from(4));
    assert!(cs.is_satisfied(&witness).unwrap());
  }
}
