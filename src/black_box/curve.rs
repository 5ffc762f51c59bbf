// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Embedded-curve black boxes: unified addition and multi-scalar
//! multiplication over Grumpkin.
//!
//! Points arrive as (x, y, is_infinite) triples and scalars as (lo, hi)
//! pairs; the gadget consumes the affine coordinates and the low scalar
//! limb. Output assertions are gated by the predicate, coordinate by
//! coordinate.
use super::function_input::{self, FunctionInput};
use crate::{
  builder::{ConstraintBuilder, GadgetKind},
  errors::AcirError,
  gadgets::enforce_predicated_equal,
  wire::WireReader,
  witness::{bound_var, Witness, WitnessMap, WitnessTree},
};
use ff::{PrimeField, PrimeFieldBits};
use std::io::Read;

/// `outputs = Σ scalars[i] * points[i]` on the embedded curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiScalarMul<F: PrimeField> {
  /// Point coordinates, in (x, y, is_infinite) groups.
  pub points: Vec<FunctionInput<F>>,
  /// Scalars, in (lo, hi) limb pairs.
  pub scalars: Vec<FunctionInput<F>>,
  /// Gates the output assertions.
  pub predicate: FunctionInput<F>,
  /// The (x, y, is_infinite) witnesses of the expected sum.
  pub outputs: [Witness; 3],
}

impl<F: PrimeField> MultiScalarMul<F> {
  /// Decode both vectors, the predicate and the fixed output triple.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(MultiScalarMul {
      points: r.read_vec(FunctionInput::decode)?,
      scalars: r.read_vec(FunctionInput::decode)?,
      predicate: FunctionInput::decode(r)?,
      outputs: [Witness::decode(r)?, Witness::decode(r)?, Witness::decode(r)?],
    })
  }

  /// Re-encode in wire order.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    crate::wire::put_u64(buf, self.points.len() as u64);
    function_input::encode_fixed(&self.points, buf);
    crate::wire::put_u64(buf, self.scalars.len() as u64);
    function_input::encode_fixed(&self.scalars, buf);
    self.predicate.encode(buf);
    for w in &self.outputs {
      w.encode(buf);
    }
  }

  /// Insert operand and output witnesses.
  pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    for input in self.points.iter().chain(&self.scalars) {
      input.fill_witness_tree(tree, base);
    }
    for w in &self.outputs {
      tree.insert(w.offset(base));
    }
  }
}

impl<F: PrimeFieldBits> MultiScalarMul<F> {
  /// Invoke the MSM gadget and assert the predicated coordinate equalities.
  pub fn define<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
  ) -> Result<(), AcirError> {
    let n_points = self.points.len() / 3;
    let mut operands = Vec::with_capacity(3 * n_points);
    for point in self.points.chunks_exact(3) {
      operands.push(point[0].to_variable(cs, witnesses)?);
      operands.push(point[1].to_variable(cs, witnesses)?);
    }
    for scalar in self.scalars.chunks_exact(2) {
      operands.push(scalar[0].to_variable(cs, witnesses)?);
    }

    let sum = cs.invoke_gadget(GadgetKind::MultiScalarMul { points: n_points }, &operands, 2)?;
    let pred = self.predicate.to_variable(cs, witnesses)?;
    enforce_predicated_equal(&mut *cs, &pred, &sum[0], bound_var(witnesses, &self.outputs[0])?);
    enforce_predicated_equal(&mut *cs, &pred, &sum[1], bound_var(witnesses, &self.outputs[1])?);
    Ok(())
  }
}

/// Unified addition of two embedded-curve points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbeddedCurveAdd<F: PrimeField> {
  /// The first addend as an (x, y, is_infinite) triple.
  pub input1: Vec<FunctionInput<F>>,
  /// The second addend as an (x, y, is_infinite) triple.
  pub input2: Vec<FunctionInput<F>>,
  /// Gates the output assertions.
  pub predicate: FunctionInput<F>,
  /// The (x, y, is_infinite) witnesses of the expected sum.
  pub outputs: [Witness; 3],
}

impl<F: PrimeField> EmbeddedCurveAdd<F> {
  /// Decode both fixed triples, the predicate and the output triple.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(EmbeddedCurveAdd {
      input1: function_input::decode_fixed(r, 3)?,
      input2: function_input::decode_fixed(r, 3)?,
      predicate: FunctionInput::decode(r)?,
      outputs: [Witness::decode(r)?, Witness::decode(r)?, Witness::decode(r)?],
    })
  }

  /// Re-encode in wire order.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    function_input::encode_fixed(&self.input1, buf);
    function_input::encode_fixed(&self.input2, buf);
    self.predicate.encode(buf);
    for w in &self.outputs {
      w.encode(buf);
    }
  }

  /// Insert operand and output witnesses.
  pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    for input in self.input1.iter().chain(&self.input2) {
      input.fill_witness_tree(tree, base);
    }
    for w in &self.outputs {
      tree.insert(w.offset(base));
    }
  }
}

impl<F: PrimeFieldBits> EmbeddedCurveAdd<F> {
  /// Invoke the unified-addition gadget and assert the predicated
  /// coordinate equalities.
  pub fn define<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
  ) -> Result<(), AcirError> {
    let operands = vec![
      self.input1[0].to_variable(cs, witnesses)?,
      self.input1[1].to_variable(cs, witnesses)?,
      self.input2[0].to_variable(cs, witnesses)?,
      self.input2[1].to_variable(cs, witnesses)?,
    ];
    let sum = cs.invoke_gadget(GadgetKind::EmbeddedCurveAdd, &operands, 2)?;
    let pred = self.predicate.to_variable(cs, witnesses)?;
    enforce_predicated_equal(&mut *cs, &pred, &sum[0], bound_var(witnesses, &self.outputs[0])?);
    enforce_predicated_equal(&mut *cs, &pred, &sum[1], bound_var(witnesses, &self.outputs[1])?);
    Ok(())
  }
}
