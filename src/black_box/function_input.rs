// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Arguments to black box gadgets: either a field constant or a witness
//! reference.
use crate::{
  errors::AcirError,
  field::FieldElement,
  gadgets,
  wire::{self, WireReader},
  witness::{bound_var, Witness, WitnessMap, WitnessTree},
};
use bellpepper_core::{num::AllocatedNum, ConstraintSystem};
use ff::PrimeField;
use std::io::Read;

/// A single gadget argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FunctionInput<F: PrimeField> {
  /// A literal field value.
  Constant(FieldElement<F>),
  /// A reference to a circuit unknown.
  Witness(Witness),
}

impl<F: PrimeField> FunctionInput<F> {
  /// Decode a `u32` kind tag followed by the payload.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    let kind = r.read_u32()?;
    match kind {
      0 => Ok(FunctionInput::Constant(FieldElement::decode(r)?)),
      1 => Ok(FunctionInput::Witness(Witness::decode(r)?)),
      other => Err(AcirError::UnknownFunctionInputKind(other)),
    }
  }

  /// Re-encode the tag and payload.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    match self {
      FunctionInput::Constant(c) => {
        wire::put_u32(buf, 0);
        c.encode(buf);
      }
      FunctionInput::Witness(w) => {
        wire::put_u32(buf, 1);
        w.encode(buf);
      }
    }
  }

  /// Whether this input references a witness.
  pub fn is_witness(&self) -> bool {
    matches!(self, FunctionInput::Witness(_))
  }

  /// Resolve the input to a builder variable: constants allocate a fixed
  /// variable, witness references resolve through the bound map.
  pub fn to_variable<CS: ConstraintSystem<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
  ) -> Result<AllocatedNum<F>, AcirError> {
    match self {
      FunctionInput::Constant(c) => Ok(gadgets::alloc_constant(&mut *cs, c.to_scalar())?),
      FunctionInput::Witness(w) => Ok(bound_var(witnesses, w)?.clone()),
    }
  }

  /// Insert the referenced witness, if any, re-based by the circuit offset.
  pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    if let FunctionInput::Witness(w) = self {
      tree.insert(w.offset(base));
    }
  }
}

/// Decode a run of exactly `count` function inputs with no length prefix.
pub fn decode_fixed<F: PrimeField, R: Read>(
  r: &mut WireReader<R>,
  count: usize,
) -> Result<Vec<FunctionInput<F>>, AcirError> {
  (0..count).map(|_| FunctionInput::decode(r)).collect()
}

/// Encode a run of function inputs with no length prefix.
pub fn encode_fixed<F: PrimeField>(inputs: &[FunctionInput<F>], buf: &mut Vec<u8>) {
  for input in inputs {
    input.encode(buf);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::provider::bn254::Scalar;

  #[test]
  fn test_decode_round_trip() {
    for input in [
      FunctionInput::<Scalar>::Constant(FieldElement::from(1234)),
      FunctionInput::<Scalar>::Witness(Witness(1234)),
    ] {
      let mut buf = Vec::new();
      input.encode(&mut buf);
      let mut r = WireReader::new(buf.as_slice());
      assert_eq!(FunctionInput::<Scalar>::decode(&mut r).unwrap(), input);
    }
  }

  #[test]
  fn test_unknown_kind() {
    let mut buf = Vec::new();
    wire::put_u32(&mut buf, 2);
    let mut r = WireReader::new(buf.as_slice());
    assert!(matches!(
      FunctionInput::<Scalar>::decode(&mut r),
      Err(AcirError::UnknownFunctionInputKind(2))
    ));
  }

  #[test]
  fn test_witness_tree_collection() {
    let mut tree = WitnessTree::new();
    FunctionInput::<Scalar>::Witness(Witness(4)).fill_witness_tree(&mut tree, 10);
    FunctionInput::<Scalar>::Constant(FieldElement::from(9)).fill_witness_tree(&mut tree, 10);
    assert_eq!(tree.len(), 1);
    assert!(tree.contains(&Witness(14)));
  }
}
