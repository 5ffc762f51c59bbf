// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Recursive Groth16 proof aggregation.
//!
//! The artifact flattens the verification key, proof and public inputs into
//! vectors of field encodings. Layout, in elements:
//!
//! - verification key: alpha in G1 (2), beta in G2 (4), gamma in G2 (4),
//!   delta in G2 (4), then `public_inputs + 1` G1 points (2 each), then any
//!   number of Pedersen commitment-key pairs in G2 (8 each). The verifier
//!   negates gamma and delta.
//! - proof: Ar in G1 (2), Krs in G1 (2), Bs in G2 (4), the commitment
//!   proof-of-knowledge in G1 (2), then G1 commitments (2 each).
//!
//! Every element is split into four 64-bit limbs before it reaches the
//! verifier gadget. Only Groth16 over BN254 (`proof_type == 0`) is
//! supported.
use super::{
  function_input::{self, FunctionInput},
  limbs::scalar_to_limbs,
};
use crate::{
  builder::{ConstraintBuilder, GadgetKind},
  errors::AcirError,
  wire::{self, WireReader},
  witness::{WitnessMap, WitnessTree},
};
use bellpepper_core::SynthesisError;
use ff::{PrimeField, PrimeFieldBits};
use std::io::Read;

/// Elements ahead of the K points in a verification key: alpha, beta,
/// gamma, delta.
const VK_FIXED_ELEMENTS: usize = 14;
/// Elements in a proof ahead of the commitment list.
const PROOF_FIXED_ELEMENTS: usize = 10;

/// An in-circuit Groth16 verification claim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecursiveAggregation<F: PrimeField> {
  /// The flattened verification key.
  pub verification_key: Vec<FunctionInput<F>>,
  /// The flattened proof.
  pub proof: Vec<FunctionInput<F>>,
  /// The public inputs of the verified statement.
  pub public_inputs: Vec<FunctionInput<F>>,
  /// A hash binding the verification key; carried but not constrained here.
  pub key_hash: FunctionInput<F>,
  /// The proof system of the aggregated proof; 0 is Groth16 over BN254.
  pub proof_type: u32,
  /// Gates the validity assertion.
  pub predicate: FunctionInput<F>,
}

impl<F: PrimeField> RecursiveAggregation<F> {
  /// Decode the three vectors, key hash, proof type and predicate in wire
  /// order.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(RecursiveAggregation {
      verification_key: r.read_vec(FunctionInput::decode)?,
      proof: r.read_vec(FunctionInput::decode)?,
      public_inputs: r.read_vec(FunctionInput::decode)?,
      key_hash: FunctionInput::decode(r)?,
      proof_type: r.read_u32()?,
      predicate: FunctionInput::decode(r)?,
    })
  }

  /// Re-encode in wire order.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    wire::put_u64(buf, self.verification_key.len() as u64);
    function_input::encode_fixed(&self.verification_key, buf);
    wire::put_u64(buf, self.proof.len() as u64);
    function_input::encode_fixed(&self.proof, buf);
    wire::put_u64(buf, self.public_inputs.len() as u64);
    function_input::encode_fixed(&self.public_inputs, buf);
    self.key_hash.encode(buf);
    wire::put_u32(buf, self.proof_type);
    self.predicate.encode(buf);
  }

  /// Insert every witness-backed operand.
  pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    for input in self
      .verification_key
      .iter()
      .chain(&self.proof)
      .chain(&self.public_inputs)
    {
      input.fill_witness_tree(tree, base);
    }
    self.key_hash.fill_witness_tree(tree, base);
  }
}

impl<F: PrimeFieldBits> RecursiveAggregation<F> {
  /// Emit the verification claim.
  pub fn define<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
  ) -> Result<(), AcirError> {
    match self.proof_type {
      0 => self.aggregate_groth16(cs, witnesses),
      other => Err(AcirError::UnsupportedProofType(other)),
    }
  }

  /// Validate the flattened shapes, pack everything into limbs, and assert
  /// `pred * (1 - valid) = 0` on the verifier gadget's validity bit.
  fn aggregate_groth16<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
  ) -> Result<(), AcirError> {
    let n_k = self.public_inputs.len() + 1;
    let vk_prefix = VK_FIXED_ELEMENTS + 2 * n_k;
    if self.verification_key.len() < vk_prefix
      || (self.verification_key.len() - vk_prefix) % 8 != 0
    {
      return Err(SynthesisError::MalformedVerifyingKey.into());
    }
    if self.proof.len() < PROOF_FIXED_ELEMENTS
      || (self.proof.len() - PROOF_FIXED_ELEMENTS) % 2 != 0
    {
      return Err(SynthesisError::MalformedVerifyingKey.into());
    }

    let mut operands = Vec::with_capacity(
      4 * (self.verification_key.len() + self.proof.len() + self.public_inputs.len()),
    );
    for input in self
      .verification_key
      .iter()
      .chain(&self.proof)
      .chain(&self.public_inputs)
    {
      operands.extend(scalar_to_limbs(cs, input, witnesses)?);
    }

    let valid = cs.invoke_gadget(
      GadgetKind::Groth16Verify {
        public_inputs: self.public_inputs.len(),
      },
      &operands,
      1,
    )?;

    let pred = self.predicate.to_variable(cs, witnesses)?;
    cs.enforce(
      || "aggregated proof verifies",
      |lc| lc + pred.get_variable(),
      |lc| lc + CS::one() - valid[0].get_variable(),
      |lc| lc,
    );
    Ok(())
  }
}
