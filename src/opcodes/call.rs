// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Calls into other circuits of the same program.
//!
//! The callee is emitted into the same builder by the circuit walk; the
//! opcode itself only names the callee and the caller-side witnesses its
//! inputs and outputs stitch to.
use crate::{
  errors::AcirError,
  expression::Expression,
  wire::{self, WireReader},
  witness::{Witness, WitnessTree},
};
use ff::PrimeField;
use std::io::Read;

/// A call site targeting a circuit by index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call<F: PrimeField> {
  /// The callee circuit index.
  pub id: u32,
  /// Caller witnesses feeding the callee's parameters, in order.
  pub inputs: Vec<Witness>,
  /// Caller witnesses receiving the callee's return values, in order.
  pub outputs: Vec<Witness>,
  /// Whether the call executes; retained for the solver, not constrained.
  pub predicate: Expression<F>,
}

impl<F: PrimeField> Call<F> {
  /// Decode the callee index, witness vectors and predicate in wire order.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(Call {
      id: r.read_u32()?,
      inputs: r.read_vec(Witness::decode)?,
      outputs: r.read_vec(Witness::decode)?,
      predicate: Expression::decode(r)?,
    })
  }

  /// Re-encode in wire order.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    wire::put_u32(buf, self.id);
    wire::put_u64(buf, self.inputs.len() as u64);
    for w in &self.inputs {
      w.encode(buf);
    }
    wire::put_u64(buf, self.outputs.len() as u64);
    for w in &self.outputs {
      w.encode(buf);
    }
    self.predicate.encode(buf);
  }

  /// Insert the stitched witnesses and any the predicate references.
  pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    for w in self.inputs.iter().chain(&self.outputs) {
      tree.insert(w.offset(base));
    }
    self.predicate.fill_witness_tree(tree, base);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{field::FieldElement, provider::bn254::Scalar};

  fn sample() -> Call<Scalar> {
    Call {
      id: 1,
      inputs: vec![Witness(1), Witness(2)],
      outputs: vec![Witness(3)],
      predicate: Expression::from_constant(FieldElement::one()),
    }
  }

  #[test]
  fn test_decode_round_trip() {
    let call = sample();
    let mut buf = Vec::new();
    call.encode(&mut buf);
    let mut r = WireReader::new(buf.as_slice());
    assert_eq!(Call::<Scalar>::decode(&mut r).unwrap(), call);
  }

  #[test]
  fn test_witness_collection() {
    let mut tree = WitnessTree::new();
    sample().fill_witness_tree(&mut tree, 10);
    let indices: Vec<u32> = tree.iter().map(|w| w.0).collect();
    assert_eq!(indices, vec![11, 12, 13]);
  }
}
