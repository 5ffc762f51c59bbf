// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! This module defines errors returned by the library.
use bellpepper_core::SynthesisError;
use thiserror::Error;

/// Errors returned while decoding an ACIR artifact or emitting its constraints
#[derive(Debug, Error)]
pub enum AcirError {
  /// returned if a required envelope field is missing or has the wrong type
  #[error("MalformedEnvelope: {reason}")]
  MalformedEnvelope {
    /// What was missing or mistyped
    reason: String,
  },
  /// returned if the bytecode stream ends before a read completes
  #[error("TruncatedInput")]
  TruncatedInput,
  /// returned if the decoder encounters an unregistered opcode tag
  #[error("UnknownOpcode: {0}")]
  UnknownOpcode(u32),
  /// returned if the decoder encounters an unregistered black box function tag
  #[error("UnknownBlackBox: {0}")]
  UnknownBlackBox(u32),
  /// returned if the decoder encounters an unregistered Brillig opcode tag
  #[error("UnknownBrilligOp: {0}")]
  UnknownBrilligOp(u32),
  /// returned if the decoder encounters an unregistered opcode location tag
  #[error("UnknownOpcodeLocation: {0}")]
  UnknownOpcodeLocation(u32),
  /// returned if a function input tag is neither constant nor witness
  #[error("UnknownFunctionInputKind: {0}")]
  UnknownFunctionInputKind(u32),
  /// returned if emission references a witness index with no bound variable
  #[error("WitnessNotBound: {0}")]
  WitnessNotBound(u32),
  /// returned if a callee consumes or produces more values than its call site supplies
  #[error("CallArityMismatch: subcircuit {id}")]
  CallArityMismatch {
    /// The callee circuit index
    id: u32,
  },
  /// returned if a call opcode targets a circuit index outside the program
  #[error("SubcircuitNotFound: {0}")]
  SubcircuitNotFound(u32),
  /// returned if the call graph contains direct or indirect recursion
  #[error("CircularCall: {0}")]
  CircularCall(u32),
  /// returned if a memory operation selector is neither a read nor a write
  #[error("UnknownMemoryOp: {0}")]
  UnknownMemoryOp(u64),
  /// returned if a memory operation references a block with no initializer
  #[error("MemoryBlockNotFound: {0}")]
  MemoryBlockNotFound(u32),
  /// returned if recursive aggregation sees a proof system other than Groth16
  #[error("UnsupportedProofType: {0}")]
  UnsupportedProofType(u32),
  /// returned when the constraint builder rejects a gadget invocation
  #[error("GadgetError: {0}")]
  Gadget(#[from] SynthesisError),
  /// returned when the underlying byte source fails
  #[error("IoError: {0}")]
  Io(#[from] std::io::Error),
}
