// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Black box function calls: fixed-shape gadget invocations embedded in the
//! opcode stream.
//!
//! Each variant decodes its own operand layout, compares structurally,
//! enumerates the witnesses it touches, and emits constraints through the
//! builder seam.

mod curve;
mod ecdsa;
mod function_input;
mod hashes;
mod limbs;
mod logic;
mod range;
mod recursion;

pub use curve::{EmbeddedCurveAdd, MultiScalarMul};
pub use ecdsa::EcdsaVerify;
pub use function_input::FunctionInput;
pub use hashes::{Aes128Encrypt, Hash32, Keccakf1600, Poseidon2Permutation, Sha256Compression};
pub use limbs::{bytes_to_limbs, scalar_to_limbs};
pub use logic::{And, Xor};
pub use range::Range;
pub use recursion::RecursiveAggregation;

use crate::{
  builder::{ConstraintBuilder, GadgetKind},
  errors::AcirError,
  wire::{self, WireReader},
  witness::{WitnessMap, WitnessTree},
};
use ff::{PrimeField, PrimeFieldBits};
use std::io::Read;

/// The supported black box function family, tagged 0 through 13 on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlackBoxFunc<F: PrimeField> {
  /// Kind 0: AES-128 encryption.
  Aes128Encrypt(Aes128Encrypt<F>),
  /// Kind 1: bitwise AND.
  And(And<F>),
  /// Kind 2: bitwise XOR.
  Xor(Xor<F>),
  /// Kind 3: range check.
  Range(Range<F>),
  /// Kind 4: Blake2s hash.
  Blake2s(Hash32<F>),
  /// Kind 5: Blake3 hash.
  Blake3(Hash32<F>),
  /// Kind 6: ECDSA over secp256k1.
  EcdsaSecp256k1(EcdsaVerify<F>),
  /// Kind 7: ECDSA over secp256r1.
  EcdsaSecp256r1(EcdsaVerify<F>),
  /// Kind 8: multi-scalar multiplication on the embedded curve.
  MultiScalarMul(MultiScalarMul<F>),
  /// Kind 9: unified embedded-curve addition.
  EmbeddedCurveAdd(EmbeddedCurveAdd<F>),
  /// Kind 10: the Keccak-f[1600] permutation.
  Keccakf1600(Keccakf1600<F>),
  /// Kind 11: recursive Groth16 aggregation.
  RecursiveAggregation(RecursiveAggregation<F>),
  /// Kind 12: the Poseidon2 permutation.
  Poseidon2Permutation(Poseidon2Permutation<F>),
  /// Kind 13: the SHA-256 compression function.
  Sha256Compression(Sha256Compression<F>),
}

impl<F: PrimeField> BlackBoxFunc<F> {
  /// Decode a `u32` kind tag and the per-variant payload.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    let kind = r.read_u32()?;
    match kind {
      0 => Ok(BlackBoxFunc::Aes128Encrypt(Aes128Encrypt::decode(r)?)),
      1 => Ok(BlackBoxFunc::And(And::decode(r)?)),
      2 => Ok(BlackBoxFunc::Xor(Xor::decode(r)?)),
      3 => Ok(BlackBoxFunc::Range(Range::decode(r)?)),
      4 => Ok(BlackBoxFunc::Blake2s(Hash32::decode(r)?)),
      5 => Ok(BlackBoxFunc::Blake3(Hash32::decode(r)?)),
      6 => Ok(BlackBoxFunc::EcdsaSecp256k1(EcdsaVerify::decode(r)?)),
      7 => Ok(BlackBoxFunc::EcdsaSecp256r1(EcdsaVerify::decode(r)?)),
      8 => Ok(BlackBoxFunc::MultiScalarMul(MultiScalarMul::decode(r)?)),
      9 => Ok(BlackBoxFunc::EmbeddedCurveAdd(EmbeddedCurveAdd::decode(r)?)),
      10 => Ok(BlackBoxFunc::Keccakf1600(Keccakf1600::decode(r)?)),
      11 => Ok(BlackBoxFunc::RecursiveAggregation(
        RecursiveAggregation::decode(r)?,
      )),
      12 => Ok(BlackBoxFunc::Poseidon2Permutation(
        Poseidon2Permutation::decode(r)?,
      )),
      13 => Ok(BlackBoxFunc::Sha256Compression(Sha256Compression::decode(r)?)),
      other => Err(AcirError::UnknownBlackBox(other)),
    }
  }

  /// Re-encode the kind tag and payload.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    match self {
      BlackBoxFunc::Aes128Encrypt(f) => {
        wire::put_u32(buf, 0);
        f.encode(buf);
      }
      BlackBoxFunc::And(f) => {
        wire::put_u32(buf, 1);
        f.encode(buf);
      }
      BlackBoxFunc::Xor(f) => {
        wire::put_u32(buf, 2);
        f.encode(buf);
      }
      BlackBoxFunc::Range(f) => {
        wire::put_u32(buf, 3);
        f.encode(buf);
      }
      BlackBoxFunc::Blake2s(f) => {
        wire::put_u32(buf, 4);
        f.encode(buf);
      }
      BlackBoxFunc::Blake3(f) => {
        wire::put_u32(buf, 5);
        f.encode(buf);
      }
      BlackBoxFunc::EcdsaSecp256k1(f) => {
        wire::put_u32(buf, 6);
        f.encode(buf);
      }
      BlackBoxFunc::EcdsaSecp256r1(f) => {
        wire::put_u32(buf, 7);
        f.encode(buf);
      }
      BlackBoxFunc::MultiScalarMul(f) => {
        wire::put_u32(buf, 8);
        f.encode(buf);
      }
      BlackBoxFunc::EmbeddedCurveAdd(f) => {
        wire::put_u32(buf, 9);
        f.encode(buf);
      }
      BlackBoxFunc::Keccakf1600(f) => {
        wire::put_u32(buf, 10);
        f.encode(buf);
      }
      BlackBoxFunc::RecursiveAggregation(f) => {
        wire::put_u32(buf, 11);
        f.encode(buf);
      }
      BlackBoxFunc::Poseidon2Permutation(f) => {
        wire::put_u32(buf, 12);
        f.encode(buf);
      }
      BlackBoxFunc::Sha256Compression(f) => {
        wire::put_u32(buf, 13);
        f.encode(buf);
      }
    }
  }

  /// Insert every witness this call touches, re-based by the circuit
  /// offset.
  pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    match self {
      BlackBoxFunc::Aes128Encrypt(f) => f.fill_witness_tree(tree, base),
      BlackBoxFunc::And(f) => f.fill_witness_tree(tree, base),
      BlackBoxFunc::Xor(f) => f.fill_witness_tree(tree, base),
      BlackBoxFunc::Range(f) => f.fill_witness_tree(tree, base),
      BlackBoxFunc::Blake2s(f) | BlackBoxFunc::Blake3(f) => f.fill_witness_tree(tree, base),
      BlackBoxFunc::EcdsaSecp256k1(f) | BlackBoxFunc::EcdsaSecp256r1(f) => {
        f.fill_witness_tree(tree, base)
      }
      BlackBoxFunc::MultiScalarMul(f) => f.fill_witness_tree(tree, base),
      BlackBoxFunc::EmbeddedCurveAdd(f) => f.fill_witness_tree(tree, base),
      BlackBoxFunc::Keccakf1600(f) => f.fill_witness_tree(tree, base),
      BlackBoxFunc::RecursiveAggregation(f) => f.fill_witness_tree(tree, base),
      BlackBoxFunc::Poseidon2Permutation(f) => f.fill_witness_tree(tree, base),
      BlackBoxFunc::Sha256Compression(f) => f.fill_witness_tree(tree, base),
    }
  }
}

impl<F: PrimeFieldBits> BlackBoxFunc<F> {
  /// Emit the constraints realizing this call.
  pub fn define<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
  ) -> Result<(), AcirError> {
    match self {
      BlackBoxFunc::Aes128Encrypt(f) => f.define(cs, witnesses),
      BlackBoxFunc::And(f) => f.define(cs, witnesses),
      BlackBoxFunc::Xor(f) => f.define(cs, witnesses),
      BlackBoxFunc::Range(f) => f.define(cs, witnesses),
      BlackBoxFunc::Blake2s(f) => f.define(cs, GadgetKind::Blake2s, witnesses),
      BlackBoxFunc::Blake3(f) => f.define(cs, GadgetKind::Blake3, witnesses),
      BlackBoxFunc::EcdsaSecp256k1(f) => f.define(cs, GadgetKind::EcdsaSecp256k1, witnesses),
      BlackBoxFunc::EcdsaSecp256r1(f) => f.define(cs, GadgetKind::EcdsaSecp256r1, witnesses),
      BlackBoxFunc::MultiScalarMul(f) => f.define(cs, witnesses),
      BlackBoxFunc::EmbeddedCurveAdd(f) => f.define(cs, witnesses),
      BlackBoxFunc::Keccakf1600(f) => f.define(cs, witnesses),
      BlackBoxFunc::RecursiveAggregation(f) => f.define(cs, witnesses),
      BlackBoxFunc::Poseidon2Permutation(f) => f.define(cs, witnesses),
      BlackBoxFunc::Sha256Compression(f) => f.define(cs, witnesses),
    }
  }
}
