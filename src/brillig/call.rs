// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! The constrained-side call into an unconstrained Brillig function.
//!
//! The call itself is never emitted to the constraint system, but its
//! output witnesses are real circuit unknowns and its input expressions
//! reference real witnesses, so both participate in the witness walk.
use crate::{
  errors::AcirError,
  expression::Expression,
  wire::{self, WireReader},
  witness::{Witness, WitnessTree},
};
use ff::PrimeField;
use std::io::Read;

/// An argument passed into a Brillig function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrilligInputs<F: PrimeField> {
  /// A single expression.
  Single(Expression<F>),
  /// A fixed-length array of expressions.
  Array(Vec<Expression<F>>),
  /// A reference to an in-circuit memory block.
  MemoryArray(u32),
}

impl<F: PrimeField> BrilligInputs<F> {
  fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    let kind = r.read_u32()?;
    match kind {
      0 => Ok(BrilligInputs::Single(Expression::decode(r)?)),
      1 => Ok(BrilligInputs::Array(r.read_vec(Expression::decode)?)),
      2 => Ok(BrilligInputs::MemoryArray(r.read_u32()?)),
      other => Err(AcirError::UnknownBrilligOp(other)),
    }
  }

  fn encode(&self, buf: &mut Vec<u8>) {
    match self {
      BrilligInputs::Single(e) => {
        wire::put_u32(buf, 0);
        e.encode(buf);
      }
      BrilligInputs::Array(items) => {
        wire::put_u32(buf, 1);
        wire::put_u64(buf, items.len() as u64);
        for e in items {
          e.encode(buf);
        }
      }
      BrilligInputs::MemoryArray(block) => {
        wire::put_u32(buf, 2);
        wire::put_u32(buf, *block);
      }
    }
  }

  fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    match self {
      BrilligInputs::Single(e) => e.fill_witness_tree(tree, base),
      BrilligInputs::Array(items) => {
        for e in items {
          e.fill_witness_tree(tree, base);
        }
      }
      BrilligInputs::MemoryArray(_) => {}
    }
  }
}

/// A destination for Brillig results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrilligOutputs {
  /// A single witness.
  Simple(Witness),
  /// A fixed-length array of witnesses.
  Array(Vec<Witness>),
}

impl BrilligOutputs {
  fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    let kind = r.read_u32()?;
    match kind {
      0 => Ok(BrilligOutputs::Simple(Witness::decode(r)?)),
      1 => Ok(BrilligOutputs::Array(r.read_vec(Witness::decode)?)),
      other => Err(AcirError::UnknownBrilligOp(other)),
    }
  }

  fn encode(&self, buf: &mut Vec<u8>) {
    match self {
      BrilligOutputs::Simple(w) => {
        wire::put_u32(buf, 0);
        w.encode(buf);
      }
      BrilligOutputs::Array(items) => {
        wire::put_u32(buf, 1);
        wire::put_u64(buf, items.len() as u64);
        for w in items {
          w.encode(buf);
        }
      }
    }
  }

  fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    match self {
      BrilligOutputs::Simple(w) => {
        tree.insert(w.offset(base));
      }
      BrilligOutputs::Array(items) => {
        for w in items {
          tree.insert(w.offset(base));
        }
      }
    }
  }
}

/// A call site into an unconstrained function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrilligCall<F: PrimeField> {
  /// Index of the unconstrained function in the program.
  pub id: u32,
  /// Arguments, evaluated by the solver before the function runs.
  pub inputs: Vec<BrilligInputs<F>>,
  /// Witnesses the function's results land in.
  pub outputs: Vec<BrilligOutputs>,
  /// Whether the call executes; retained for the solver, not constrained.
  pub predicate: Expression<F>,
}

impl<F: PrimeField> BrilligCall<F> {
  /// Decode the function id, arguments, destinations and predicate.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(BrilligCall {
      id: r.read_u32()?,
      inputs: r.read_vec(BrilligInputs::decode)?,
      outputs: r.read_vec(BrilligOutputs::decode)?,
      predicate: Expression::decode(r)?,
    })
  }

  /// Re-encode in wire order.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    wire::put_u32(buf, self.id);
    wire::put_u64(buf, self.inputs.len() as u64);
    for input in &self.inputs {
      input.encode(buf);
    }
    wire::put_u64(buf, self.outputs.len() as u64);
    for output in &self.outputs {
      output.encode(buf);
    }
    self.predicate.encode(buf);
  }

  /// Insert the witnesses referenced by arguments, destinations and
  /// predicate.
  pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    for input in &self.inputs {
      input.fill_witness_tree(tree, base);
    }
    for output in &self.outputs {
      output.fill_witness_tree(tree, base);
    }
    self.predicate.fill_witness_tree(tree, base);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{expression::LinearTerm, field::FieldElement, provider::bn254::Scalar};

  fn sample() -> BrilligCall<Scalar> {
    BrilligCall {
      id: 2,
      inputs: vec![
        BrilligInputs::Single(Expression {
          mul_terms: vec![],
          linear_combinations: vec![LinearTerm {
            coefficient: FieldElement::one(),
            witness: Witness(3),
          }],
          constant: FieldElement::zero(),
        }),
        BrilligInputs::MemoryArray(7),
      ],
      outputs: vec![
        BrilligOutputs::Simple(Witness(8)),
        BrilligOutputs::Array(vec![Witness(9), Witness(10)]),
      ],
      predicate: Expression::from_constant(FieldElement::one()),
    }
  }

  #[test]
  fn test_decode_round_trip() {
    let call = sample();
    let mut buf = Vec::new();
    call.encode(&mut buf);
    let mut r = WireReader::new(buf.as_slice());
    assert_eq!(BrilligCall::<Scalar>::decode(&mut r).unwrap(), call);
  }

  #[test]
  fn test_witness_collection() {
    let mut tree = WitnessTree::new();
    sample().fill_witness_tree(&mut tree, 100);
    let indices: Vec<u32> = tree.iter().map(|w| w.0).collect();
    assert_eq!(indices, vec![103, 108, 109, 110]);
  }
}
