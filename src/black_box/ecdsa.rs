// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! ECDSA signature verification black boxes.
//!
//! The wire format carries coordinates, signature halves and the hashed
//! message as big-endian bytes; the verifier gadget wants four 64-bit limbs
//! per element. The output witness holds the expected validity bit and the
//! assertion is gated by the predicate.
use super::{
  function_input::{self, FunctionInput},
  limbs::bytes_to_limbs,
};
use crate::{
  builder::{ConstraintBuilder, GadgetKind},
  errors::AcirError,
  gadgets::enforce_predicated_equal,
  wire::WireReader,
  witness::{bound_var, Witness, WitnessMap, WitnessTree},
};
use ff::{PrimeField, PrimeFieldBits};
use std::io::Read;

/// An ECDSA validity claim; the curve is chosen by the enclosing black box
/// kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcdsaVerify<F: PrimeField> {
  /// The 32 big-endian bytes of the public key x coordinate.
  pub public_key_x: Vec<FunctionInput<F>>,
  /// The 32 big-endian bytes of the public key y coordinate.
  pub public_key_y: Vec<FunctionInput<F>>,
  /// The 64 big-endian bytes of the signature, `r` then `s`.
  pub signature: Vec<FunctionInput<F>>,
  /// The 32 big-endian bytes of the hashed message.
  pub hashed_message: Vec<FunctionInput<F>>,
  /// Gates the validity assertion.
  pub predicate: FunctionInput<F>,
  /// The witness holding the expected validity bit.
  pub output: Witness,
}

impl<F: PrimeField> EcdsaVerify<F> {
  /// Decode the fixed-arity byte runs, predicate and output in wire order.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(EcdsaVerify {
      public_key_x: function_input::decode_fixed(r, 32)?,
      public_key_y: function_input::decode_fixed(r, 32)?,
      signature: function_input::decode_fixed(r, 64)?,
      hashed_message: function_input::decode_fixed(r, 32)?,
      predicate: FunctionInput::decode(r)?,
      output: Witness::decode(r)?,
    })
  }

  /// Re-encode in wire order.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    function_input::encode_fixed(&self.public_key_x, buf);
    function_input::encode_fixed(&self.public_key_y, buf);
    function_input::encode_fixed(&self.signature, buf);
    function_input::encode_fixed(&self.hashed_message, buf);
    self.predicate.encode(buf);
    self.output.encode(buf);
  }

  /// Insert operand and output witnesses.
  pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    for input in self
      .public_key_x
      .iter()
      .chain(&self.public_key_y)
      .chain(&self.hashed_message)
      .chain(&self.signature)
    {
      input.fill_witness_tree(tree, base);
    }
    self.predicate.fill_witness_tree(tree, base);
    tree.insert(self.output.offset(base));
  }
}

impl<F: PrimeFieldBits> EcdsaVerify<F> {
  /// Pack the operands into limbs, invoke the verifier gadget for `kind`,
  /// and assert `pred * (output - valid) = 0`.
  pub fn define<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    kind: GadgetKind,
    witnesses: &WitnessMap<F>,
  ) -> Result<(), AcirError> {
    let mut operands = bytes_to_limbs(cs, &self.public_key_x, witnesses)?;
    operands.extend(bytes_to_limbs(cs, &self.public_key_y, witnesses)?);
    operands.extend(bytes_to_limbs(cs, &self.signature[0..32], witnesses)?);
    operands.extend(bytes_to_limbs(cs, &self.signature[32..64], witnesses)?);
    operands.extend(bytes_to_limbs(cs, &self.hashed_message, witnesses)?);

    let valid = cs.invoke_gadget(kind, &operands, 1)?;
    let pred = self.predicate.to_variable(cs, witnesses)?;
    let output = bound_var(witnesses, &self.output)?;
    enforce_predicated_equal(&mut *cs, &pred, output, &valid[0]);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    builder::R1csBuilder, field::FieldElement, gadgets::alloc_constant, provider::bn254::Scalar,
  };

  fn sample() -> EcdsaVerify<Scalar> {
    EcdsaVerify {
      public_key_x: (0..32).map(|i| FunctionInput::Witness(Witness(i))).collect(),
      public_key_y: (32..64).map(|i| FunctionInput::Witness(Witness(i))).collect(),
      signature: (64..128).map(|i| FunctionInput::Witness(Witness(i))).collect(),
      hashed_message: (128..160).map(|i| FunctionInput::Witness(Witness(i))).collect(),
      predicate: FunctionInput::Constant(FieldElement::one()),
      output: Witness(160),
    }
  }

  #[test]
  fn test_decode_round_trip() {
    let claim = sample();
    let mut buf = Vec::new();
    claim.encode(&mut buf);
    let mut r = WireReader::new(buf.as_slice());
    let decoded = EcdsaVerify::<Scalar>::decode(&mut r).unwrap();
    assert_eq!(decoded, claim);

    let mut again = Vec::new();
    decoded.encode(&mut again);
    assert_eq!(again, buf);
  }

  #[test]
  fn test_define_packs_twenty_limbs() {
    let claim = sample();
    let mut cs = R1csBuilder::new();
    let witnesses: WitnessMap<Scalar> = (0..161)
      .map(|i| (Witness(i), alloc_constant(&mut cs, Scalar::from((i % 251) as u64)).unwrap()))
      .collect();
    claim
      .define(&mut cs, GadgetKind::EcdsaSecp256k1, &witnesses)
      .unwrap();

    let calls = cs.gadget_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, GadgetKind::EcdsaSecp256k1);
    // qx, qy, r, s, message: five elements of four limbs each
    assert_eq!(calls[0].1.len(), 20);
    assert_eq!(calls[0].2.len(), 1);
  }

  #[test]
  fn test_witness_collection_includes_output() {
    let mut tree = WitnessTree::new();
    sample().fill_witness_tree(&mut tree, 0);
    assert_eq!(tree.len(), 161);
    assert!(tree.contains(&Witness(160)));
  }
}
