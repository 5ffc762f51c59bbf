// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! The constraint-builder seam between the emission walk and the proving
//! backend.
//!
//! [`ConstraintBuilder`] extends bellpepper's `ConstraintSystem` with the
//! capabilities the emitters rely on: ordered public/secret declaration,
//! in-circuit lookup tables with an explicit length, bit-level integer
//! operations, and the cryptographic gadget family. Arithmetic, bit and
//! lookup capabilities have concrete lowerings; the cryptographic gadgets
//! are recorded as typed deferred calls for the backend gadget library.

mod r1cs;

pub use r1cs::{CompiledR1cs, DeferredGadget, R1csBuilder};

use crate::gadgets;
use bellpepper_core::{num::AllocatedNum, ConstraintSystem, SynthesisError};
use ff::PrimeFieldBits;
use serde::{Deserialize, Serialize};

/// Handle for an in-circuit lookup table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableId(pub usize);

/// The cryptographic capabilities a backend gadget library must lower.
///
/// Input conventions, in variable order:
/// - `Aes128Encrypt`: 16 iv bytes, 16 key bytes, then the message bytes;
///   outputs one variable per ciphertext byte.
/// - `Blake2s`/`Blake3`: message bytes; 32 output bytes.
/// - `Keccakf1600`: state lanes in, permuted lanes out (same count).
/// - `Sha256Compression`: 16 message words then 8 state words; 8 outputs.
/// - `Poseidon2Permutation`: state elements in, permuted elements out.
/// - `EcdsaSecp256k1`/`EcdsaSecp256r1`: four 64-bit limbs each for qx, qy,
///   r, s and the hashed message (20 variables); one validity-bit output.
/// - `EmbeddedCurveAdd`: x1, y1, x2, y2 on the embedded curve; outputs x, y.
/// - `MultiScalarMul`: `points` x/y pairs followed by `points` scalars;
///   outputs x, y.
/// - `Groth16Verify`: verification key, proof, then public-input limbs, four
///   64-bit limbs per encoded element; one validity-bit output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GadgetKind {
  /// AES-128 encryption in CBC mode.
  Aes128Encrypt,
  /// The Blake2s hash.
  Blake2s,
  /// The Blake3 hash.
  Blake3,
  /// The Keccak-f[1600] permutation.
  Keccakf1600,
  /// The SHA-256 compression function.
  Sha256Compression,
  /// The 4-wide Poseidon2 permutation.
  Poseidon2Permutation,
  /// ECDSA signature validity over secp256k1.
  EcdsaSecp256k1,
  /// ECDSA signature validity over secp256r1.
  EcdsaSecp256r1,
  /// Unified addition on the embedded (Grumpkin) curve.
  EmbeddedCurveAdd,
  /// Multi-scalar multiplication on the embedded curve.
  MultiScalarMul {
    /// Number of points (and scalars) in the sum.
    points: usize,
  },
  /// Groth16 proof verification over BN254.
  Groth16Verify {
    /// Number of public inputs carried by the verified statement.
    public_inputs: usize,
  },
}

/// The builder API the emission walk drives.
pub trait ConstraintBuilder<F: PrimeFieldBits>: ConstraintSystem<F> {
  /// Declare a public variable. The backend requires every public variable
  /// to be declared before the first secret one.
  fn public_var(&mut self, name: &str, value: Option<F>) -> Result<AllocatedNum<F>, SynthesisError> {
    AllocatedNum::alloc_input(self.namespace(|| format!("public {name}")), || {
      value.ok_or(SynthesisError::AssignmentMissing)
    })
  }

  /// Declare a secret variable.
  fn secret_var(&mut self, name: &str, value: Option<F>) -> Result<AllocatedNum<F>, SynthesisError> {
    AllocatedNum::alloc(self.namespace(|| format!("secret {name}")), || {
      value.ok_or(SynthesisError::AssignmentMissing)
    })
  }

  /// Constrain a variable to `[0, 2^n_bits)`.
  fn range_check(&mut self, num: &AllocatedNum<F>, n_bits: u32) -> Result<(), SynthesisError> {
    gadgets::range_check(self.namespace(|| "range check"), num, n_bits as usize)
  }

  /// Bitwise AND over `n_bits`-wide operands.
  fn uint_and(
    &mut self,
    a: &AllocatedNum<F>,
    b: &AllocatedNum<F>,
    n_bits: u32,
  ) -> Result<AllocatedNum<F>, SynthesisError> {
    gadgets::uint_and(self.namespace(|| "uint and"), a, b, n_bits as usize)
  }

  /// Bitwise XOR over `n_bits`-wide operands.
  fn uint_xor(
    &mut self,
    a: &AllocatedNum<F>,
    b: &AllocatedNum<F>,
    n_bits: u32,
  ) -> Result<AllocatedNum<F>, SynthesisError> {
    gadgets::uint_xor(self.namespace(|| "uint xor"), a, b, n_bits as usize)
  }

  /// Allocate a fresh, empty lookup table.
  fn table_new(&mut self) -> TableId;

  /// Append a value to a table, returning the table length before insertion.
  fn table_insert(&mut self, table: TableId, value: &AllocatedNum<F>) -> usize;

  /// The current number of entries in a table.
  fn table_len(&self, table: TableId) -> usize;

  /// The variable stored at a fixed slot, if the slot exists.
  fn table_slot(&self, table: TableId, slot: usize) -> Option<AllocatedNum<F>>;

  /// Look a table up at a variable index, constraining the result to equal
  /// the entry the index selects. An index outside the table is
  /// unsatisfiable.
  fn table_lookup(
    &mut self,
    table: TableId,
    index: &AllocatedNum<F>,
  ) -> Result<AllocatedNum<F>, SynthesisError>;

  /// Invoke a cryptographic gadget, allocating `n_outputs` result variables
  /// for the backend to constrain.
  fn invoke_gadget(
    &mut self,
    kind: GadgetKind,
    inputs: &[AllocatedNum<F>],
    n_outputs: usize,
  ) -> Result<Vec<AllocatedNum<F>>, SynthesisError>;
}
