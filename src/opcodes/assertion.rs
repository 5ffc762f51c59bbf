// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Assertion payloads: the failure messages a circuit attaches to opcode
//! locations. Decoded and retained for debugging, never constrained.
use crate::{
  errors::AcirError,
  expression::Expression,
  wire::{self, WireReader},
};
use ff::PrimeField;
use std::io::Read;

/// A payload item: a value to report or a memory block to dump.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpressionOrMemory<F: PrimeField> {
  /// A reportable expression.
  Expression(Expression<F>),
  /// A memory block id.
  Memory(u32),
}

impl<F: PrimeField> ExpressionOrMemory<F> {
  fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    let kind = r.read_u32()?;
    match kind {
      0 => Ok(ExpressionOrMemory::Expression(Expression::decode(r)?)),
      1 => Ok(ExpressionOrMemory::Memory(r.read_u32()?)),
      other => Err(AcirError::UnknownOpcode(other)),
    }
  }

  fn encode(&self, buf: &mut Vec<u8>) {
    match self {
      ExpressionOrMemory::Expression(e) => {
        wire::put_u32(buf, 0);
        e.encode(buf);
      }
      ExpressionOrMemory::Memory(block) => {
        wire::put_u32(buf, 1);
        wire::put_u32(buf, *block);
      }
    }
  }
}

/// The message attached to a failing assertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssertionPayload<F: PrimeField> {
  /// Selects the error format in the caller's error registry.
  pub error_selector: u64,
  /// The values reported alongside the failure.
  pub payload: Vec<ExpressionOrMemory<F>>,
}

impl<F: PrimeField> AssertionPayload<F> {
  /// Decode the selector and payload items.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(AssertionPayload {
      error_selector: r.read_u64()?,
      payload: r.read_vec(ExpressionOrMemory::decode)?,
    })
  }

  /// Re-encode in wire order.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    wire::put_u64(buf, self.error_selector);
    wire::put_u64(buf, self.payload.len() as u64);
    for item in &self.payload {
      item.encode(buf);
    }
  }
}
