// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Per-circuit decoding and two-pass constraint emission.
//!
//! Emission order is part of the contract: callees are emitted before the
//! caller binds its own witnesses, because subcircuits consume their slice
//! of the global witness namespace first. The post-order walk in
//! [`crate::program`] numbers witnesses the same way, which keeps the two
//! in agreement.
use crate::{
  builder::ConstraintBuilder,
  errors::AcirError,
  gadgets::{alloc_constant, enforce_equal},
  opcodes::{AssertionPayload, MemoryBlocks, Opcode, OpcodeLocation},
  wire::{self, WireReader},
  witness::{bound_var, Witness, WitnessMap, WitnessTree},
};
use bellpepper_core::num::AllocatedNum;
use ff::{PrimeField, PrimeFieldBits};
use std::{
  collections::{BTreeMap, HashMap},
  io::Read,
};
use tracing::debug;

/// A single circuit of a program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Circuit<F: PrimeField> {
  /// The circuit's name.
  pub name: String,
  /// The largest local witness index the circuit uses.
  pub current_witness_index: u32,
  /// The opcodes, in emission order.
  pub opcodes: Vec<Opcode<F>>,
  /// Local indices of the circuit's private parameters.
  pub private_parameters: WitnessTree,
  /// Local indices of the circuit's public parameters.
  pub public_parameters: WitnessTree,
  /// Local indices of the circuit's return values.
  pub return_values: WitnessTree,
  /// Failure messages keyed by opcode location; retained for debugging.
  pub assert_messages: BTreeMap<OpcodeLocation, AssertionPayload<F>>,
}

/// Caller-side variable vectors for each call site, keyed by opcode index.
type CallConnections<F> = HashMap<usize, (Vec<AllocatedNum<F>>, Vec<AllocatedNum<F>>)>;

fn resolve<F: PrimeField>(circuits: &[Circuit<F>], id: u32) -> Result<&Circuit<F>, AcirError> {
  circuits
    .get(id as usize)
    .ok_or(AcirError::SubcircuitNotFound(id))
}

fn enter<F: PrimeField>(
  circuits: &[Circuit<F>],
  stack: &mut Vec<u32>,
  id: u32,
) -> Result<(), AcirError> {
  resolve(circuits, id)?;
  if stack.contains(&id) {
    return Err(AcirError::CircularCall(id));
  }
  stack.push(id);
  Ok(())
}

impl<F: PrimeField> Circuit<F> {
  /// Decode a circuit from the wire.
  ///
  /// The assert-message map is optional on the wire: artifacts may end
  /// right after the return-value set, in which case the map is empty.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    let name = r.read_string()?;
    let current_witness_index = r.read_u32()?;
    let opcodes = r.read_vec(Opcode::decode)?;
    let private_parameters = r.read_vec(Witness::decode)?.into_iter().collect();
    let public_parameters = r.read_vec(Witness::decode)?.into_iter().collect();
    let return_values = r.read_vec(Witness::decode)?.into_iter().collect();

    let mut assert_messages = BTreeMap::new();
    match r.read_u64_or_eof()? {
      None => debug!(circuit = %name, "no assert messages in artifact"),
      Some(count) => {
        for _ in 0..count {
          let location = OpcodeLocation::decode(r)?;
          let payload = AssertionPayload::decode(r)?;
          assert_messages.insert(location, payload);
        }
      }
    }

    Ok(Circuit {
      name,
      current_witness_index,
      opcodes,
      private_parameters,
      public_parameters,
      return_values,
      assert_messages,
    })
  }

  /// Re-encode the circuit, always including the assert-message count.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    wire::put_string(buf, &self.name);
    wire::put_u32(buf, self.current_witness_index);
    wire::put_u64(buf, self.opcodes.len() as u64);
    for opcode in &self.opcodes {
      opcode.encode(buf);
    }
    for set in [
      &self.private_parameters,
      &self.public_parameters,
      &self.return_values,
    ] {
      wire::put_u64(buf, set.len() as u64);
      for w in set {
        w.encode(buf);
      }
    }
    wire::put_u64(buf, self.assert_messages.len() as u64);
    for (location, payload) in &self.assert_messages {
      location.encode(buf);
      payload.encode(buf);
    }
  }

  /// Post-order witness collection: callees claim their slice of the global
  /// namespace first, then this circuit's opcodes and parameter sets insert
  /// at the remaining base.
  ///
  /// Returns `(next, base)`: the global index after this circuit's slice,
  /// and the base its own witnesses were re-based by.
  pub fn fill_witness_tree(
    &self,
    circuits: &[Circuit<F>],
    tree: &mut WitnessTree,
    start: u32,
    stack: &mut Vec<u32>,
  ) -> Result<(u32, u32), AcirError> {
    let mut g = start;
    for opcode in &self.opcodes {
      if let Opcode::Call(call) = opcode {
        enter(circuits, stack, call.id)?;
        let (next, _) = resolve(circuits, call.id)?.fill_witness_tree(circuits, tree, g, stack)?;
        stack.pop();
        g = next;
      }
    }

    let base = g;
    for opcode in &self.opcodes {
      opcode.fill_witness_tree(tree, base);
    }
    for set in [
      &self.private_parameters,
      &self.public_parameters,
      &self.return_values,
    ] {
      for w in set {
        tree.insert(w.offset(base));
      }
    }

    Ok((base + self.current_witness_index + 1, base))
  }
}

impl<F: PrimeFieldBits> Circuit<F> {
  /// Emit the circuit and everything it calls.
  ///
  /// Returns the variables bound to this circuit's private parameters and
  /// return values, in ascending index order, so call sites can stitch
  /// against them.
  pub fn define<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
    circuits: &[Circuit<F>],
    index: &mut u32,
    stack: &mut Vec<u32>,
  ) -> Result<(Vec<AllocatedNum<F>>, Vec<AllocatedNum<F>>), AcirError> {
    let connections = self.define_subcircuits(cs, witnesses, circuits, index, stack)?;
    let current = self.bind_current_witnesses(cs, witnesses, index)?;

    let mut memory = MemoryBlocks::new();
    for opcode in &self.opcodes {
      opcode.define(cs, &current, &mut memory)?;
    }

    self.stitch_calls(cs, &current, &connections)?;

    let inputs = self.collect_witnesses(&self.private_parameters, &current)?;
    let outputs = self.collect_witnesses(&self.return_values, &current)?;
    Ok((inputs, outputs))
  }

  /// Recursively emit every callee, in opcode order, collecting its
  /// parameter and return variables per call site.
  fn define_subcircuits<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
    circuits: &[Circuit<F>],
    index: &mut u32,
    stack: &mut Vec<u32>,
  ) -> Result<CallConnections<F>, AcirError> {
    let mut connections = CallConnections::new();
    for (i, opcode) in self.opcodes.iter().enumerate() {
      let Opcode::Call(call) = opcode else {
        continue;
      };
      enter(circuits, stack, call.id)?;
      let callee = resolve(circuits, call.id)?;
      let (inputs, outputs) = callee.define(cs, witnesses, circuits, index, stack)?;
      stack.pop();

      if inputs.len() > call.inputs.len() || outputs.len() > call.outputs.len() {
        return Err(AcirError::CallArityMismatch { id: call.id });
      }
      connections.insert(i, (inputs, outputs));
    }
    Ok(connections)
  }

  /// Bind local indices 0..=`current_witness_index` to the global variables
  /// at this circuit's base, then advance the global index past the slice.
  /// Local indices the program never mentions bind to literal zero.
  fn bind_current_witnesses<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
    index: &mut u32,
  ) -> Result<WitnessMap<F>, AcirError> {
    let base = *index;
    let mut current = WitnessMap::new();
    for i in 0..=self.current_witness_index {
      match witnesses.get(&Witness(i + base)) {
        Some(variable) => {
          current.insert(Witness(i), variable.clone());
        }
        None => {
          current.insert(Witness(i), alloc_constant(&mut *cs, F::ZERO)?);
        }
      }
    }
    *index += self.current_witness_index + 1;
    Ok(current)
  }

  /// Assert that each call site's witnesses agree with the callee's
  /// parameter and return variables.
  fn stitch_calls<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    current: &WitnessMap<F>,
    connections: &CallConnections<F>,
  ) -> Result<(), AcirError> {
    for (i, opcode) in self.opcodes.iter().enumerate() {
      let Opcode::Call(call) = opcode else {
        continue;
      };
      let (inputs, outputs) = connections
        .get(&i)
        .ok_or(AcirError::SubcircuitNotFound(call.id))?;
      for (callee_var, w) in inputs.iter().zip(&call.inputs) {
        enforce_equal(&mut *cs, bound_var(current, w)?, callee_var);
      }
      for (callee_var, w) in outputs.iter().zip(&call.outputs) {
        enforce_equal(&mut *cs, bound_var(current, w)?, callee_var);
      }
    }
    Ok(())
  }

  /// The variables bound to a parameter set, in ascending index order.
  fn collect_witnesses(
    &self,
    set: &WitnessTree,
    current: &WitnessMap<F>,
  ) -> Result<Vec<AllocatedNum<F>>, AcirError> {
    set
      .iter()
      .map(|w| bound_var(current, w).cloned())
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    expression::Expression, field::FieldElement, opcodes::AssertionPayload,
    provider::bn254::Scalar,
  };

  fn minimal() -> Circuit<Scalar> {
    Circuit {
      name: "main".into(),
      current_witness_index: 2,
      opcodes: vec![Opcode::Arithmetic(Expression::from_constant(
        FieldElement::zero(),
      ))],
      private_parameters: [Witness(0), Witness(1)].into_iter().collect(),
      public_parameters: WitnessTree::new(),
      return_values: [Witness(2)].into_iter().collect(),
      assert_messages: BTreeMap::new(),
    }
  }

  #[test]
  fn test_decode_round_trip() {
    let mut circuit = minimal();
    circuit.assert_messages.insert(
      OpcodeLocation::Acir(0),
      AssertionPayload {
        error_selector: 1,
        payload: vec![],
      },
    );
    let mut buf = Vec::new();
    circuit.encode(&mut buf);
    let mut r = WireReader::new(buf.as_slice());
    let decoded = Circuit::<Scalar>::decode(&mut r).unwrap();
    assert_eq!(decoded, circuit);

    let mut again = Vec::new();
    decoded.encode(&mut again);
    assert_eq!(again, buf);
  }

  #[test]
  fn test_missing_assert_messages_tolerated() {
    let circuit = minimal();
    let mut buf = Vec::new();
    circuit.encode(&mut buf);
    buf.truncate(buf.len() - 8); // drop the (zero) assert-message count
    let mut r = WireReader::new(buf.as_slice());
    let decoded = Circuit::<Scalar>::decode(&mut r).unwrap();
    assert_eq!(decoded, circuit);
  }

  #[test]
  fn test_witness_tree_includes_parameter_sets() {
    let circuit = minimal();
    let mut tree = WitnessTree::new();
    let mut stack = vec![0];
    let (next, base) = circuit
      .fill_witness_tree(&[circuit.clone()], &mut tree, 10, &mut stack)
      .unwrap();
    assert_eq!(base, 10);
    assert_eq!(next, 13);
    let indices: Vec<u32> = tree.iter().map(|w| w.0).collect();
    assert_eq!(indices, vec![10, 11, 12]);
  }
}
