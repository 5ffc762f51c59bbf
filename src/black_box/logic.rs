// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Bitwise AND and XOR black boxes.
use super::function_input::FunctionInput;
use crate::{
  builder::ConstraintBuilder,
  errors::AcirError,
  gadgets::enforce_equal,
  wire::{self, WireReader},
  witness::{bound_var, Witness, WitnessMap, WitnessTree},
};
use ff::{PrimeField, PrimeFieldBits};
use std::io::Read;

/// `output = lhs & rhs` over `n_bits`-wide operands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct And<F: PrimeField> {
  /// Left operand.
  pub lhs: FunctionInput<F>,
  /// Right operand.
  pub rhs: FunctionInput<F>,
  /// Operand width in bits.
  pub n_bits: u32,
  /// The witness holding the result.
  pub output: Witness,
}

/// `output = lhs ^ rhs` over `n_bits`-wide operands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Xor<F: PrimeField> {
  /// Left operand.
  pub lhs: FunctionInput<F>,
  /// Right operand.
  pub rhs: FunctionInput<F>,
  /// Operand width in bits.
  pub n_bits: u32,
  /// The witness holding the result.
  pub output: Witness,
}

macro_rules! logic_impl {
  ($name:ident) => {
    impl<F: PrimeField> $name<F> {
      /// Decode operands, width and output in wire order.
      pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
        Ok($name {
          lhs: FunctionInput::decode(r)?,
          rhs: FunctionInput::decode(r)?,
          n_bits: r.read_u32()?,
          output: Witness::decode(r)?,
        })
      }

      /// Re-encode in wire order.
      pub fn encode(&self, buf: &mut Vec<u8>) {
        self.lhs.encode(buf);
        self.rhs.encode(buf);
        wire::put_u32(buf, self.n_bits);
        self.output.encode(buf);
      }

      /// Insert the operand and output witnesses.
      pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
        self.lhs.fill_witness_tree(tree, base);
        self.rhs.fill_witness_tree(tree, base);
        tree.insert(self.output.offset(base));
      }
    }
  };
}

logic_impl!(And);
logic_impl!(Xor);

impl<F: PrimeFieldBits> And<F> {
  /// Constrain the output witness to the bitwise AND of the operands.
  pub fn define<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
  ) -> Result<(), AcirError> {
    let lhs = self.lhs.to_variable(cs, witnesses)?;
    let rhs = self.rhs.to_variable(cs, witnesses)?;
    let output = bound_var(witnesses, &self.output)?.clone();
    let conjunction = cs.uint_and(&lhs, &rhs, self.n_bits)?;
    enforce_equal(&mut *cs, &conjunction, &output);
    Ok(())
  }
}

impl<F: PrimeFieldBits> Xor<F> {
  /// Constrain the output witness to the bitwise XOR of the operands.
  pub fn define<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
  ) -> Result<(), AcirError> {
    let lhs = self.lhs.to_variable(cs, witnesses)?;
    let rhs = self.rhs.to_variable(cs, witnesses)?;
    let output = bound_var(witnesses, &self.output)?.clone();
    let disjunction = cs.uint_xor(&lhs, &rhs, self.n_bits)?;
    enforce_equal(&mut *cs, &disjunction, &output);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{builder::R1csBuilder, gadgets::alloc_constant, provider::bn254::Scalar};

  fn bind(cs: &mut R1csBuilder<Scalar>, values: &[(u32, u64)]) -> WitnessMap<Scalar> {
    values
      .iter()
      .map(|(w, v)| (Witness(*w), alloc_constant(&mut *cs, Scalar::from(*v)).unwrap()))
      .collect()
  }

  fn and_gate() -> And<Scalar> {
    And {
      lhs: FunctionInput::Witness(Witness(1)),
      rhs: FunctionInput::Witness(Witness(2)),
      n_bits: 8,
      output: Witness(3),
    }
  }

  #[test]
  fn test_decode_round_trip() {
    let gate = and_gate();
    let mut buf = Vec::new();
    gate.encode(&mut buf);
    let mut r = WireReader::new(buf.as_slice());
    assert_eq!(And::<Scalar>::decode(&mut r).unwrap(), gate);
  }

  #[test]
  fn test_and_satisfied_and_violated() {
    // 0xF0 & 0x0F = 0x00
    let mut cs = R1csBuilder::new();
    let witnesses = bind(&mut cs, &[(1, 0xf0), (2, 0x0f), (3, 0x00)]);
    and_gate().define(&mut cs, &witnesses).unwrap();
    assert!(cs.is_sat().unwrap());

    let mut cs = R1csBuilder::new();
    let witnesses = bind(&mut cs, &[(1, 0xf0), (2, 0x0f), (3, 0x01)]);
    and_gate().define(&mut cs, &witnesses).unwrap();
    assert!(!cs.is_sat().unwrap());
  }

  #[test]
  fn test_xor() {
    let gate = Xor::<Scalar> {
      lhs: FunctionInput::Witness(Witness(1)),
      rhs: FunctionInput::Witness(Witness(2)),
      n_bits: 8,
      output: Witness(3),
    };
    let mut cs = R1csBuilder::new();
    let witnesses = bind(&mut cs, &[(1, 0xf0), (2, 0xff), (3, 0x0f)]);
    gate.define(&mut cs, &witnesses).unwrap();
    assert!(cs.is_sat().unwrap());
  }

  #[test]
  fn test_witness_collection() {
    let mut tree = WitnessTree::new();
    and_gate().fill_witness_tree(&mut tree, 5);
    let indices: Vec<u32> = tree.iter().map(|w| w.0).collect();
    assert_eq!(indices, vec![6, 7, 8]);
  }
}
