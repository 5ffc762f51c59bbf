// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Hash, permutation and cipher black boxes.
//!
//! All of these share one emission shape: marshal the operands into builder
//! variables, invoke the matching gadget capability, and assert each gadget
//! output equal to its output witness.
use super::function_input::{self, FunctionInput};
use crate::{
  builder::{ConstraintBuilder, GadgetKind},
  errors::AcirError,
  gadgets::enforce_equal,
  wire::{self, WireReader},
  witness::{bound_var, Witness, WitnessMap, WitnessTree},
};
use bellpepper_core::num::AllocatedNum;
use ff::{PrimeField, PrimeFieldBits};
use std::io::Read;

fn marshal<F, CS>(
  cs: &mut CS,
  inputs: &[FunctionInput<F>],
  witnesses: &WitnessMap<F>,
) -> Result<Vec<AllocatedNum<F>>, AcirError>
where
  F: PrimeFieldBits,
  CS: ConstraintBuilder<F>,
{
  inputs.iter().map(|i| i.to_variable(cs, witnesses)).collect()
}

fn assert_outputs<F, CS>(
  cs: &mut CS,
  computed: &[AllocatedNum<F>],
  outputs: &[Witness],
  witnesses: &WitnessMap<F>,
) -> Result<(), AcirError>
where
  F: PrimeFieldBits,
  CS: ConstraintBuilder<F>,
{
  for (value, w) in computed.iter().zip(outputs.iter()) {
    let bound = bound_var(witnesses, w)?;
    enforce_equal(&mut *cs, value, bound);
  }
  Ok(())
}

fn decode_witnesses<R: Read>(r: &mut WireReader<R>, count: usize) -> Result<Vec<Witness>, AcirError> {
  (0..count).map(|_| Witness::decode(r)).collect()
}

/// AES-128 encryption: `outputs = AES(key, iv, inputs)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Aes128Encrypt<F: PrimeField> {
  /// Plaintext bytes.
  pub inputs: Vec<FunctionInput<F>>,
  /// The 16-byte initialization vector.
  pub iv: Vec<FunctionInput<F>>,
  /// The 16-byte key.
  pub key: Vec<FunctionInput<F>>,
  /// Ciphertext byte witnesses.
  pub outputs: Vec<Witness>,
}

impl<F: PrimeField> Aes128Encrypt<F> {
  /// Decode the plaintext vector, fixed-arity iv and key, and output vector.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(Aes128Encrypt {
      inputs: r.read_vec(FunctionInput::decode)?,
      iv: function_input::decode_fixed(r, 16)?,
      key: function_input::decode_fixed(r, 16)?,
      outputs: r.read_vec(Witness::decode)?,
    })
  }

  /// Re-encode in wire order.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    wire::put_u64(buf, self.inputs.len() as u64);
    function_input::encode_fixed(&self.inputs, buf);
    function_input::encode_fixed(&self.iv, buf);
    function_input::encode_fixed(&self.key, buf);
    wire::put_u64(buf, self.outputs.len() as u64);
    for w in &self.outputs {
      w.encode(buf);
    }
  }

  /// Emit the cipher gadget and wire its outputs.
  pub fn define<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
  ) -> Result<(), AcirError>
  where
    F: PrimeFieldBits,
  {
    let mut operands = marshal(cs, &self.iv, witnesses)?;
    operands.extend(marshal(cs, &self.key, witnesses)?);
    operands.extend(marshal(cs, &self.inputs, witnesses)?);
    let computed = cs.invoke_gadget(GadgetKind::Aes128Encrypt, &operands, self.outputs.len())?;
    assert_outputs(cs, &computed, &self.outputs, witnesses)
  }

  /// Insert operand and output witnesses.
  pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    for input in self.inputs.iter().chain(&self.iv).chain(&self.key) {
      input.fill_witness_tree(tree, base);
    }
    for w in &self.outputs {
      tree.insert(w.offset(base));
    }
  }
}

/// A hash with a length-prefixed input vector and 32 output byte witnesses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hash32<F: PrimeField> {
  /// Message bytes.
  pub inputs: Vec<FunctionInput<F>>,
  /// The 32 digest byte witnesses.
  pub outputs: Vec<Witness>,
}

impl<F: PrimeField> Hash32<F> {
  /// Decode the message vector and fixed 32-byte digest.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(Hash32 {
      inputs: r.read_vec(FunctionInput::decode)?,
      outputs: decode_witnesses(r, 32)?,
    })
  }

  /// Re-encode in wire order.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    wire::put_u64(buf, self.inputs.len() as u64);
    function_input::encode_fixed(&self.inputs, buf);
    for w in &self.outputs {
      w.encode(buf);
    }
  }

  /// Emit the hash gadget and wire its outputs.
  pub fn define<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    kind: GadgetKind,
    witnesses: &WitnessMap<F>,
  ) -> Result<(), AcirError>
  where
    F: PrimeFieldBits,
  {
    let operands = marshal(cs, &self.inputs, witnesses)?;
    let computed = cs.invoke_gadget(kind, &operands, self.outputs.len())?;
    assert_outputs(cs, &computed, &self.outputs, witnesses)
  }

  /// Insert operand and output witnesses.
  pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    for input in &self.inputs {
      input.fill_witness_tree(tree, base);
    }
    for w in &self.outputs {
      tree.insert(w.offset(base));
    }
  }
}

/// The Keccak-f[1600] permutation over length-prefixed state vectors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keccakf1600<F: PrimeField> {
  /// Input state lanes.
  pub inputs: Vec<FunctionInput<F>>,
  /// Permuted state lane witnesses.
  pub outputs: Vec<Witness>,
}

impl<F: PrimeField> Keccakf1600<F> {
  /// Decode both length-prefixed vectors.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(Keccakf1600 {
      inputs: r.read_vec(FunctionInput::decode)?,
      outputs: r.read_vec(Witness::decode)?,
    })
  }

  /// Re-encode in wire order.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    wire::put_u64(buf, self.inputs.len() as u64);
    function_input::encode_fixed(&self.inputs, buf);
    wire::put_u64(buf, self.outputs.len() as u64);
    for w in &self.outputs {
      w.encode(buf);
    }
  }

  /// Emit the permutation gadget and wire its outputs.
  pub fn define<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
  ) -> Result<(), AcirError>
  where
    F: PrimeFieldBits,
  {
    let operands = marshal(cs, &self.inputs, witnesses)?;
    let computed = cs.invoke_gadget(GadgetKind::Keccakf1600, &operands, self.outputs.len())?;
    assert_outputs(cs, &computed, &self.outputs, witnesses)
  }

  /// Insert operand and output witnesses.
  pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    for input in &self.inputs {
      input.fill_witness_tree(tree, base);
    }
    for w in &self.outputs {
      tree.insert(w.offset(base));
    }
  }
}

/// The 4-wide Poseidon2 permutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poseidon2Permutation<F: PrimeField> {
  /// Input state elements.
  pub inputs: Vec<FunctionInput<F>>,
  /// Permuted state witnesses.
  pub outputs: Vec<Witness>,
}

impl<F: PrimeField> Poseidon2Permutation<F> {
  /// Decode both length-prefixed vectors.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(Poseidon2Permutation {
      inputs: r.read_vec(FunctionInput::decode)?,
      outputs: r.read_vec(Witness::decode)?,
    })
  }

  /// Re-encode in wire order.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    wire::put_u64(buf, self.inputs.len() as u64);
    function_input::encode_fixed(&self.inputs, buf);
    wire::put_u64(buf, self.outputs.len() as u64);
    for w in &self.outputs {
      w.encode(buf);
    }
  }

  /// Emit the permutation and assert each permuted element against its
  /// output witness, one per input element.
  pub fn define<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
  ) -> Result<(), AcirError>
  where
    F: PrimeFieldBits,
  {
    let operands = marshal(cs, &self.inputs, witnesses)?;
    let computed =
      cs.invoke_gadget(GadgetKind::Poseidon2Permutation, &operands, operands.len())?;
    assert_outputs(cs, &computed, &self.outputs, witnesses)
  }

  /// Insert operand and output witnesses.
  pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    for input in &self.inputs {
      input.fill_witness_tree(tree, base);
    }
    for w in &self.outputs {
      tree.insert(w.offset(base));
    }
  }
}

/// The SHA-256 compression function: 16 message words folded into 8 state
/// words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sha256Compression<F: PrimeField> {
  /// The 16 message schedule words.
  pub inputs: Vec<FunctionInput<F>>,
  /// The 8 incoming state words.
  pub hash_values: Vec<FunctionInput<F>>,
  /// The 8 outgoing state word witnesses.
  pub outputs: Vec<Witness>,
}

impl<F: PrimeField> Sha256Compression<F> {
  /// Decode all three fixed-arity runs.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(Sha256Compression {
      inputs: function_input::decode_fixed(r, 16)?,
      hash_values: function_input::decode_fixed(r, 8)?,
      outputs: decode_witnesses(r, 8)?,
    })
  }

  /// Re-encode in wire order.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    function_input::encode_fixed(&self.inputs, buf);
    function_input::encode_fixed(&self.hash_values, buf);
    for w in &self.outputs {
      w.encode(buf);
    }
  }

  /// Emit the compression gadget and wire its outputs.
  pub fn define<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
  ) -> Result<(), AcirError>
  where
    F: PrimeFieldBits,
  {
    let mut operands = marshal(cs, &self.inputs, witnesses)?;
    operands.extend(marshal(cs, &self.hash_values, witnesses)?);
    let computed = cs.invoke_gadget(GadgetKind::Sha256Compression, &operands, 8)?;
    assert_outputs(cs, &computed, &self.outputs, witnesses)
  }

  /// Insert operand and output witnesses.
  pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    for input in self.inputs.iter().chain(&self.hash_values) {
      input.fill_witness_tree(tree, base);
    }
    for w in &self.outputs {
      tree.insert(w.offset(base));
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    builder::R1csBuilder, field::FieldElement, gadgets::alloc_constant, provider::bn254::Scalar,
  };

  #[test]
  fn test_hash32_decode_round_trip() {
    let hash = Hash32::<Scalar> {
      inputs: vec![
        FunctionInput::Witness(Witness(1)),
        FunctionInput::Constant(FieldElement::from(0xab)),
      ],
      outputs: (10..42).map(Witness).collect(),
    };
    let mut buf = Vec::new();
    hash.encode(&mut buf);
    let mut r = WireReader::new(buf.as_slice());
    assert_eq!(Hash32::<Scalar>::decode(&mut r).unwrap(), hash);
  }

  #[test]
  fn test_sha256_compression_round_trip() {
    let compression = Sha256Compression::<Scalar> {
      inputs: (0..16)
        .map(|i| FunctionInput::Witness(Witness(i)))
        .collect(),
      hash_values: (16..24)
        .map(|i| FunctionInput::Witness(Witness(i)))
        .collect(),
      outputs: (24..32).map(Witness).collect(),
    };
    let mut buf = Vec::new();
    compression.encode(&mut buf);
    let mut r = WireReader::new(buf.as_slice());
    assert_eq!(Sha256Compression::<Scalar>::decode(&mut r).unwrap(), compression);
  }

  #[test]
  fn test_poseidon2_defers_one_gadget_call() {
    let permutation = Poseidon2Permutation::<Scalar> {
      inputs: (1..5).map(|i| FunctionInput::Witness(Witness(i))).collect(),
      outputs: (5..9).map(Witness).collect(),
    };
    let mut cs = R1csBuilder::new();
    let witnesses: WitnessMap<Scalar> = (1..9)
      .map(|i| (Witness(i), alloc_constant(&mut cs, Scalar::from(i as u64)).unwrap()))
      .collect();
    permutation.define(&mut cs, &witnesses).unwrap();

    let calls = cs.gadget_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, GadgetKind::Poseidon2Permutation);
    assert_eq!(calls[0].1.len(), 4);
    assert_eq!(calls[0].2.len(), 4);
  }

  #[test]
  fn test_keccak_round_trip() {
    let keccak = Keccakf1600::<Scalar> {
      inputs: (0..25).map(|i| FunctionInput::Witness(Witness(i))).collect(),
      outputs: (25..50).map(Witness).collect(),
    };
    let mut buf = Vec::new();
    keccak.encode(&mut buf);
    let mut r = WireReader::new(buf.as_slice());
    assert_eq!(Keccakf1600::<Scalar>::decode(&mut r).unwrap(), keccak);
  }

  #[test]
  fn test_aes_round_trip_and_operand_order() {
    let cipher = Aes128Encrypt::<Scalar> {
      inputs: vec![FunctionInput::Witness(Witness(100))],
      iv: (0..16).map(|i| FunctionInput::Witness(Witness(i))).collect(),
      key: (16..32).map(|i| FunctionInput::Witness(Witness(i))).collect(),
      outputs: vec![Witness(101)],
    };
    let mut buf = Vec::new();
    cipher.encode(&mut buf);
    let mut r = WireReader::new(buf.as_slice());
    assert_eq!(Aes128Encrypt::<Scalar>::decode(&mut r).unwrap(), cipher);

    let mut cs = R1csBuilder::new();
    let witnesses: WitnessMap<Scalar> = (0..102)
      .map(|i| (Witness(i), alloc_constant(&mut cs, Scalar::from(i as u64)).unwrap()))
      .collect();
    cipher.define(&mut cs, &witnesses).unwrap();
    let calls = cs.gadget_calls();
    assert_eq!(calls.len(), 1);
    // 16 iv bytes + 16 key bytes + 1 message byte
    assert_eq!(calls[0].1.len(), 33);
  }
}
