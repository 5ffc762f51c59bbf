// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Bit decomposition and bitwise gadgets.
use bellpepper_core::{
  boolean::AllocatedBit, num::AllocatedNum, ConstraintSystem, LinearCombination, SynthesisError,
};
use ff::PrimeFieldBits;

/// Decompose a number into `n_bits` LSB-first bits and constrain the
/// recomposition to equal the number.
pub fn num_to_bits_le<F, CS>(
  mut cs: CS,
  num: &AllocatedNum<F>,
  n_bits: usize,
) -> Result<Vec<AllocatedBit>, SynthesisError>
where
  F: PrimeFieldBits,
  CS: ConstraintSystem<F>,
{
  let bit_values: Vec<Option<bool>> = match num.get_value() {
    Some(value) => {
      let bits = value.to_le_bits();
      (0..n_bits).map(|i| Some(i < bits.len() && bits[i])).collect()
    }
    None => vec![None; n_bits],
  };

  let bits = bit_values
    .into_iter()
    .enumerate()
    .map(|(i, b)| AllocatedBit::alloc(cs.namespace(|| format!("bit {i}")), b))
    .collect::<Result<Vec<_>, _>>()?;

  let mut recomposed = LinearCombination::<F>::zero();
  let mut coeff = F::ONE;
  for bit in &bits {
    recomposed = recomposed + (coeff, bit.get_variable());
    coeff = coeff.double();
  }
  cs.enforce(
    || "recomposition",
    |_| recomposed,
    |lc| lc + CS::one(),
    |lc| lc + num.get_variable(),
  );

  Ok(bits)
}

/// Recompose LSB-first bits into a number.
pub fn bits_to_num<F, CS>(
  mut cs: CS,
  bits: &[AllocatedBit],
) -> Result<AllocatedNum<F>, SynthesisError>
where
  F: PrimeFieldBits,
  CS: ConstraintSystem<F>,
{
  let computed = bits.iter().rev().try_fold(F::ZERO, |acc, bit| {
    bit
      .get_value()
      .map(|b| acc.double() + if b { F::ONE } else { F::ZERO })
  });

  let num = AllocatedNum::alloc(cs.namespace(|| "packed"), || {
    computed.ok_or(SynthesisError::AssignmentMissing)
  })?;

  let mut recomposed = LinearCombination::<F>::zero();
  let mut coeff = F::ONE;
  for bit in bits {
    recomposed = recomposed + (coeff, bit.get_variable());
    coeff = coeff.double();
  }
  cs.enforce(
    || "packing",
    |_| recomposed,
    |lc| lc + CS::one(),
    |lc| lc + num.get_variable(),
  );

  Ok(num)
}

/// Constrain a number to `[0, 2^n_bits)` by decomposition.
pub fn range_check<F, CS>(
  cs: CS,
  num: &AllocatedNum<F>,
  n_bits: usize,
) -> Result<(), SynthesisError>
where
  F: PrimeFieldBits,
  CS: ConstraintSystem<F>,
{
  num_to_bits_le(cs, num, n_bits)?;
  Ok(())
}

/// Bitwise AND over `n_bits`-wide operands.
pub fn uint_and<F, CS>(
  mut cs: CS,
  a: &AllocatedNum<F>,
  b: &AllocatedNum<F>,
  n_bits: usize,
) -> Result<AllocatedNum<F>, SynthesisError>
where
  F: PrimeFieldBits,
  CS: ConstraintSystem<F>,
{
  let a_bits = num_to_bits_le(cs.namespace(|| "lhs bits"), a, n_bits)?;
  let b_bits = num_to_bits_le(cs.namespace(|| "rhs bits"), b, n_bits)?;
  let out_bits = a_bits
    .iter()
    .zip(b_bits.iter())
    .enumerate()
    .map(|(i, (x, y))| AllocatedBit::and(cs.namespace(|| format!("and {i}")), x, y))
    .collect::<Result<Vec<_>, _>>()?;
  bits_to_num(cs.namespace(|| "and packed"), &out_bits)
}

/// Bitwise XOR over `n_bits`-wide operands.
pub fn uint_xor<F, CS>(
  mut cs: CS,
  a: &AllocatedNum<F>,
  b: &AllocatedNum<F>,
  n_bits: usize,
) -> Result<AllocatedNum<F>, SynthesisError>
where
  F: PrimeFieldBits,
  CS: ConstraintSystem<F>,
{
  let a_bits = num_to_bits_le(cs.namespace(|| "lhs bits"), a, n_bits)?;
  let b_bits = num_to_bits_le(cs.namespace(|| "rhs bits"), b, n_bits)?;
  let out_bits = a_bits
    .iter()
    .zip(b_bits.iter())
    .enumerate()
    .map(|(i, (x, y))| AllocatedBit::xor(cs.namespace(|| format!("xor {i}")), x, y))
    .collect::<Result<Vec<_>, _>>()?;
  bits_to_num(cs.namespace(|| "xor packed"), &out_bits)
}
