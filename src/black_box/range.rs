// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! The range-check black box.
use super::function_input::FunctionInput;
use crate::{
  builder::ConstraintBuilder,
  errors::AcirError,
  wire::{self, WireReader},
  witness::{bound_var, WitnessMap, WitnessTree},
};
use ff::{PrimeField, PrimeFieldBits};
use std::io::Read;

/// Constrains an input to `[0, 2^n_bits)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Range<F: PrimeField> {
  /// The checked input.
  pub input: FunctionInput<F>,
  /// The permitted width in bits.
  pub n_bits: u32,
}

impl<F: PrimeField> Range<F> {
  /// Decode the input and width in wire order.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(Range {
      input: FunctionInput::decode(r)?,
      n_bits: r.read_u32()?,
    })
  }

  /// Re-encode in wire order.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    self.input.encode(buf);
    wire::put_u32(buf, self.n_bits);
  }

  /// Insert the checked witness, if the input is one.
  pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    self.input.fill_witness_tree(tree, base);
  }
}

impl<F: PrimeFieldBits> Range<F> {
  /// Emit the range check. Constant inputs emit nothing.
  pub fn define<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
  ) -> Result<(), AcirError> {
    let w = match &self.input {
      FunctionInput::Constant(_) => return Ok(()),
      FunctionInput::Witness(w) => w,
    };
    let variable = bound_var(witnesses, w)?.clone();
    cs.range_check(&variable, self.n_bits)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    builder::R1csBuilder, field::FieldElement, gadgets::alloc_constant, provider::bn254::Scalar,
    witness::Witness,
  };

  fn four_bit_check() -> Range<Scalar> {
    Range {
      input: FunctionInput::Witness(Witness(1)),
      n_bits: 4,
    }
  }

  #[test]
  fn test_decode_round_trip() {
    let check = four_bit_check();
    let mut buf = Vec::new();
    check.encode(&mut buf);
    let mut r = WireReader::new(buf.as_slice());
    assert_eq!(Range::<Scalar>::decode(&mut r).unwrap(), check);
  }

  #[test]
  fn test_in_range_and_out_of_range() {
    let mut cs = R1csBuilder::new();
    let mut witnesses = WitnessMap::new();
    witnesses.insert(Witness(1), alloc_constant(&mut cs, Scalar::from(15u64)).unwrap());
    four_bit_check().define(&mut cs, &witnesses).unwrap();
    assert!(cs.is_sat().unwrap());

    let mut cs = R1csBuilder::new();
    let mut witnesses = WitnessMap::new();
    witnesses.insert(Witness(1), alloc_constant(&mut cs, Scalar::from(16u64)).unwrap());
    four_bit_check().define(&mut cs, &witnesses).unwrap();
    assert!(!cs.is_sat().unwrap());
  }

  #[test]
  fn test_constant_input_emits_nothing() {
    let check = Range::<Scalar> {
      input: FunctionInput::Constant(FieldElement::from(99999)),
      n_bits: 4,
    };
    let mut cs = R1csBuilder::new();
    check.define(&mut cs, &WitnessMap::new()).unwrap();
    assert_eq!(cs.num_constraints(), 0);
  }
}
