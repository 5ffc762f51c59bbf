// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Witness indices and the collections built over them.
use crate::{
  errors::AcirError,
  wire::{self, WireReader},
};
use bellpepper_core::num::AllocatedNum;
use ff::PrimeField;
use std::{
  collections::{BTreeMap, BTreeSet},
  io::Read,
};

/// A circuit unknown, named by an unsigned 32-bit index.
///
/// Within a single circuit, indices run from 0 to `current_witness_index`;
/// across a program they are re-based by a per-circuit offset into one flat
/// namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Witness(pub u32);

impl Witness {
  /// Decode a little-endian `u32` index.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(Witness(r.read_u32()?))
  }

  /// Re-encode the index.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    wire::put_u32(buf, self.0);
  }

  /// Re-base this index by a circuit offset.
  pub fn offset(&self, base: u32) -> Self {
    Witness(self.0 + base)
  }
}

/// The ordered set of witness indices collected by the program walk.
///
/// Insertion is idempotent and iteration ascends, which is all the walk
/// relies on.
pub type WitnessTree = BTreeSet<Witness>;

/// Builder variables keyed by their global witness index.
pub type WitnessMap<F> = BTreeMap<Witness, AllocatedNum<F>>;

/// Concrete witness values supplied for test instrumentation; the compile
/// itself never solves for these.
pub type WitnessAssignments<F> = BTreeMap<Witness, F>;

/// Look a witness up in a variable map, surfacing the index on failure.
pub fn bound_var<'a, F: PrimeField>(
  witnesses: &'a WitnessMap<F>,
  w: &Witness,
) -> Result<&'a AllocatedNum<F>, AcirError> {
  witnesses.get(w).ok_or(AcirError::WitnessNotBound(w.0))
}
