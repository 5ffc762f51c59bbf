// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Field-arithmetic gadgets over allocated numbers.
use bellpepper_core::{
  boolean::AllocatedBit, num::AllocatedNum, ConstraintSystem, SynthesisError,
};
use ff::PrimeField;

/// Allocate a number fixed to a constant value.
pub fn alloc_constant<F, CS>(mut cs: CS, value: F) -> Result<AllocatedNum<F>, SynthesisError>
where
  F: PrimeField,
  CS: ConstraintSystem<F>,
{
  let num = AllocatedNum::alloc(cs.namespace(|| "constant"), || Ok(value))?;
  cs.enforce(
    || "constant is fixed",
    |lc| lc + num.get_variable(),
    |lc| lc + CS::one(),
    |lc| lc + (value, CS::one()),
  );
  Ok(num)
}

/// Allocate `a - b`.
#[allow(dead_code)]
pub fn sub<F, CS>(
  mut cs: CS,
  a: &AllocatedNum<F>,
  b: &AllocatedNum<F>,
) -> Result<AllocatedNum<F>, SynthesisError>
where
  F: PrimeField,
  CS: ConstraintSystem<F>,
{
  let diff = AllocatedNum::alloc(cs.namespace(|| "sub"), || {
    let a = a.get_value().ok_or(SynthesisError::AssignmentMissing)?;
    let b = b.get_value().ok_or(SynthesisError::AssignmentMissing)?;
    Ok(a - b)
  })?;
  cs.enforce(
    || "subtraction",
    |lc| lc + a.get_variable() - b.get_variable(),
    |lc| lc + CS::one(),
    |lc| lc + diff.get_variable(),
  );
  Ok(diff)
}

/// Assert `a == b`.
pub fn enforce_equal<F, CS>(mut cs: CS, a: &AllocatedNum<F>, b: &AllocatedNum<F>)
where
  F: PrimeField,
  CS: ConstraintSystem<F>,
{
  cs.enforce(
    || "equality",
    |lc| lc + a.get_variable(),
    |lc| lc + CS::one(),
    |lc| lc + b.get_variable(),
  );
}

/// Assert `pred * (a - b) == 0`: the equality holds wherever the predicate is
/// nonzero and is vacuous where it is zero.
pub fn enforce_predicated_equal<F, CS>(
  mut cs: CS,
  pred: &AllocatedNum<F>,
  a: &AllocatedNum<F>,
  b: &AllocatedNum<F>,
) where
  F: PrimeField,
  CS: ConstraintSystem<F>,
{
  cs.enforce(
    || "predicated equality",
    |lc| lc + pred.get_variable(),
    |lc| lc + a.get_variable() - b.get_variable(),
    |lc| lc,
  );
}

/// Decide whether `a - shift` is zero, yielding a bit.
///
/// Uses the inverse-hint form: with `x = a - shift` and result bit `y`,
/// `x * inv = 1 - y` and `x * y = 0`.
pub fn is_zero<F, CS>(
  mut cs: CS,
  a: &AllocatedNum<F>,
  shift: F,
) -> Result<AllocatedBit, SynthesisError>
where
  F: PrimeField,
  CS: ConstraintSystem<F>,
{
  let x_value = a.get_value().map(|v| v - shift);
  let y = AllocatedBit::alloc(
    cs.namespace(|| "is_zero"),
    x_value.map(|x| x.is_zero_vartime()),
  )?;
  let inv = AllocatedNum::alloc(cs.namespace(|| "inverse hint"), || {
    let x = x_value.ok_or(SynthesisError::AssignmentMissing)?;
    Ok(Option::from(x.invert()).unwrap_or(F::ZERO))
  })?;
  cs.enforce(
    || "inverse relation",
    |lc| lc + a.get_variable() - (shift, CS::one()),
    |lc| lc + inv.get_variable(),
    |lc| lc + CS::one() - y.get_variable(),
  );
  cs.enforce(
    || "zero relation",
    |lc| lc + a.get_variable() - (shift, CS::one()),
    |lc| lc + y.get_variable(),
    |lc| lc,
  );
  Ok(y)
}

/// Select `t` when the condition bit is set, `f` otherwise.
pub fn select<F, CS>(
  mut cs: CS,
  condition: &AllocatedBit,
  t: &AllocatedNum<F>,
  f: &AllocatedNum<F>,
) -> Result<AllocatedNum<F>, SynthesisError>
where
  F: PrimeField,
  CS: ConstraintSystem<F>,
{
  let result = AllocatedNum::alloc(cs.namespace(|| "select"), || {
    let c = condition
      .get_value()
      .ok_or(SynthesisError::AssignmentMissing)?;
    let t = t.get_value().ok_or(SynthesisError::AssignmentMissing)?;
    let f = f.get_value().ok_or(SynthesisError::AssignmentMissing)?;
    Ok(if c { t } else { f })
  })?;
  // (t - f) * condition = result - f
  cs.enforce(
    || "selection",
    |lc| lc + t.get_variable() - f.get_variable(),
    |lc| lc + condition.get_variable(),
    |lc| lc + result.get_variable() - f.get_variable(),
  );
  Ok(result)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{builder::R1csBuilder, provider::bn254::Scalar};
  use ff::Field;

  #[test]
  fn test_is_zero() {
    let mut cs = R1csBuilder::<Scalar>::new();
    let a = alloc_constant(&mut cs, Scalar::from(7u64)).unwrap();
    let hit = is_zero(&mut cs, &a, Scalar::from(7u64)).unwrap();
    let miss = is_zero(&mut cs, &a, Scalar::from(8u64)).unwrap();
    assert_eq!(hit.get_value(), Some(true));
    assert_eq!(miss.get_value(), Some(false));
    assert!(cs.is_sat().unwrap());
  }

  #[test]
  fn test_select() {
    let mut cs = R1csBuilder::<Scalar>::new();
    let a = alloc_constant(&mut cs, Scalar::from(3u64)).unwrap();
    let t = alloc_constant(&mut cs, Scalar::from(10u64)).unwrap();
    let f = alloc_constant(&mut cs, Scalar::from(20u64)).unwrap();
    let cond = is_zero(&mut cs, &a, Scalar::from(3u64)).unwrap();
    let picked = select(&mut cs, &cond, &t, &f).unwrap();
    assert_eq!(picked.get_value(), Some(Scalar::from(10u64)));
    assert!(cs.is_sat().unwrap());
  }

  #[test]
  fn test_sub_and_equal() {
    let mut cs = R1csBuilder::<Scalar>::new();
    let a = alloc_constant(&mut cs, Scalar::from(30u64)).unwrap();
    let b = alloc_constant(&mut cs, Scalar::from(12u64)).unwrap();
    let d = sub(&mut cs, &a, &b).unwrap();
    let expected = alloc_constant(&mut cs, Scalar::from(18u64)).unwrap();
    enforce_equal(&mut cs, &d, &expected);
    assert!(cs.is_sat().unwrap());
  }

  #[test]
  fn test_predicated_equality_is_vacuous_when_predicate_is_zero() {
    let mut cs = R1csBuilder::<Scalar>::new();
    let zero = alloc_constant(&mut cs, Scalar::ZERO).unwrap();
    let a = alloc_constant(&mut cs, Scalar::from(1u64)).unwrap();
    let b = alloc_constant(&mut cs, Scalar::from(2u64)).unwrap();
    enforce_predicated_equal(&mut cs, &zero, &a, &b);
    assert!(cs.is_sat().unwrap());

    let one = alloc_constant(&mut cs, Scalar::ONE).unwrap();
    enforce_predicated_equal(&mut cs, &one, &a, &b);
    assert!(!cs.is_sat().unwrap());
  }
}
