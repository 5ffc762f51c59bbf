// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! The top-level opcode family and opcode addressing.

mod assertion;
mod call;
mod memory;

pub use assertion::{AssertionPayload, ExpressionOrMemory};
pub use call::Call;
pub use memory::{MemoryBlocks, MemoryInit, MemoryOp};

use crate::{
  black_box::BlackBoxFunc,
  builder::ConstraintBuilder,
  brillig::BrilligCall,
  errors::AcirError,
  expression::Expression,
  wire::{self, WireReader},
  witness::{WitnessMap, WitnessTree},
};
use ff::{PrimeField, PrimeFieldBits};
use std::io::Read;

/// A single constrained opcode, tagged 0 through 5 on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Opcode<F: PrimeField> {
  /// Kind 0: an expression asserted equal to zero.
  Arithmetic(Expression<F>),
  /// Kind 1: a black box gadget invocation.
  BlackBox(BlackBoxFunc<F>),
  /// Kind 2: a memory read or write.
  MemoryOp(MemoryOp<F>),
  /// Kind 3: a memory block initialization.
  MemoryInit(MemoryInit<F>),
  /// Kind 4: a call into unconstrained code.
  BrilligCall(BrilligCall<F>),
  /// Kind 5: a call into another circuit.
  Call(Call<F>),
}

impl<F: PrimeField> Opcode<F> {
  /// Decode a `u32` kind tag and the per-variant payload.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    let kind = r.read_u32()?;
    match kind {
      0 => Ok(Opcode::Arithmetic(Expression::decode(r)?)),
      1 => Ok(Opcode::BlackBox(BlackBoxFunc::decode(r)?)),
      2 => Ok(Opcode::MemoryOp(MemoryOp::decode(r)?)),
      3 => Ok(Opcode::MemoryInit(MemoryInit::decode(r)?)),
      4 => Ok(Opcode::BrilligCall(BrilligCall::decode(r)?)),
      5 => Ok(Opcode::Call(Call::decode(r)?)),
      other => Err(AcirError::UnknownOpcode(other)),
    }
  }

  /// Re-encode the kind tag and payload.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    match self {
      Opcode::Arithmetic(e) => {
        wire::put_u32(buf, 0);
        e.encode(buf);
      }
      Opcode::BlackBox(b) => {
        wire::put_u32(buf, 1);
        b.encode(buf);
      }
      Opcode::MemoryOp(m) => {
        wire::put_u32(buf, 2);
        m.encode(buf);
      }
      Opcode::MemoryInit(m) => {
        wire::put_u32(buf, 3);
        m.encode(buf);
      }
      Opcode::BrilligCall(b) => {
        wire::put_u32(buf, 4);
        b.encode(buf);
      }
      Opcode::Call(c) => {
        wire::put_u32(buf, 5);
        c.encode(buf);
      }
    }
  }

  /// Insert every witness this opcode touches, re-based by the circuit
  /// offset.
  pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    match self {
      Opcode::Arithmetic(e) => e.fill_witness_tree(tree, base),
      Opcode::BlackBox(b) => b.fill_witness_tree(tree, base),
      Opcode::MemoryOp(m) => m.fill_witness_tree(tree, base),
      Opcode::MemoryInit(m) => m.fill_witness_tree(tree, base),
      Opcode::BrilligCall(b) => b.fill_witness_tree(tree, base),
      Opcode::Call(c) => c.fill_witness_tree(tree, base),
    }
  }
}

impl<F: PrimeFieldBits> Opcode<F> {
  /// Emit the opcode's constraints against the circuit's bound witnesses.
  ///
  /// Brillig calls constrain nothing, and circuit calls are handled by the
  /// enclosing circuit walk (recursion and stitching), so both are no-ops
  /// here.
  pub fn define<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
    memory: &mut MemoryBlocks,
  ) -> Result<(), AcirError> {
    match self {
      Opcode::Arithmetic(e) => e.assert_zero(cs, witnesses),
      Opcode::BlackBox(b) => b.define(cs, witnesses),
      Opcode::MemoryOp(m) => m.define(cs, witnesses, memory),
      Opcode::MemoryInit(m) => m.define(cs, witnesses, memory),
      Opcode::BrilligCall(_) | Opcode::Call(_) => Ok(()),
    }
  }
}

/// Addresses an opcode for assertion payloads and debug information.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum OpcodeLocation {
  /// An index into the constrained opcode stream.
  Acir(u64),
  /// An opcode inside an unconstrained function.
  Brillig {
    /// The call site in the constrained stream.
    acir_index: u64,
    /// The opcode within the Brillig body.
    brillig_index: u64,
  },
}

impl OpcodeLocation {
  /// Decode a `u32` tag and the location payload.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    let kind = r.read_u32()?;
    match kind {
      0 => Ok(OpcodeLocation::Acir(r.read_u64()?)),
      1 => Ok(OpcodeLocation::Brillig {
        acir_index: r.read_u64()?,
        brillig_index: r.read_u64()?,
      }),
      other => Err(AcirError::UnknownOpcodeLocation(other)),
    }
  }

  /// Re-encode the tag and payload.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    match self {
      OpcodeLocation::Acir(i) => {
        wire::put_u32(buf, 0);
        wire::put_u64(buf, *i);
      }
      OpcodeLocation::Brillig {
        acir_index,
        brillig_index,
      } => {
        wire::put_u32(buf, 1);
        wire::put_u64(buf, *acir_index);
        wire::put_u64(buf, *brillig_index);
      }
    }
  }
}
