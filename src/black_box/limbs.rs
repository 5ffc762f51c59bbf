// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Byte-array and scalar repacking into 64-bit limbs.
//!
//! ACIR carries foreign-field operands as big-endian bytes, while the curve
//! gadgets consume four 64-bit limbs per element. The byte order is reversed
//! so byte 0 becomes the most significant, each byte expands to 8 LSB-first
//! bits, and the resulting 256-bit vector recomposes into four limbs.
use super::function_input::FunctionInput;
use crate::{
  errors::AcirError,
  gadgets::{bits_to_num, num_to_bits_le},
  witness::WitnessMap,
};
use bellpepper_core::{num::AllocatedNum, ConstraintSystem};
use ff::PrimeFieldBits;

const LIMB_BITS: usize = 64;
const N_LIMBS: usize = 4;

/// Repack 32 big-endian byte inputs into four 64-bit limbs, least
/// significant limb first.
pub fn bytes_to_limbs<F, CS>(
  cs: &mut CS,
  bytes: &[FunctionInput<F>],
  witnesses: &WitnessMap<F>,
) -> Result<Vec<AllocatedNum<F>>, AcirError>
where
  F: PrimeFieldBits,
  CS: ConstraintSystem<F>,
{
  assert_eq!(bytes.len(), 32, "limb packing expects 32 bytes");

  let mut bit_array = Vec::with_capacity(N_LIMBS * LIMB_BITS);
  for i in 0..32 {
    let byte = bytes[31 - i].to_variable(cs, witnesses)?;
    bit_array.extend(num_to_bits_le(&mut *cs, &byte, 8)?);
  }

  let mut limbs = Vec::with_capacity(N_LIMBS);
  for chunk in bit_array.chunks(LIMB_BITS) {
    limbs.push(bits_to_num(&mut *cs, chunk)?);
  }
  Ok(limbs)
}

/// Split a single field-element input into four 64-bit limbs, least
/// significant limb first.
pub fn scalar_to_limbs<F, CS>(
  cs: &mut CS,
  input: &FunctionInput<F>,
  witnesses: &WitnessMap<F>,
) -> Result<Vec<AllocatedNum<F>>, AcirError>
where
  F: PrimeFieldBits,
  CS: ConstraintSystem<F>,
{
  let variable = input.to_variable(cs, witnesses)?;
  let bits = num_to_bits_le(&mut *cs, &variable, N_LIMBS * LIMB_BITS)?;
  let mut limbs = Vec::with_capacity(N_LIMBS);
  for chunk in bits.chunks(LIMB_BITS) {
    limbs.push(bits_to_num(&mut *cs, chunk)?);
  }
  Ok(limbs)
}
