// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Length-prefixed field element decoding for the ACIR wire format.
//!
//! Elements travel as a `u64` byte length followed by that many big-endian
//! bytes of a nonnegative bignum. The bignum is kept verbatim so that
//! re-encoding reproduces the input; reduction modulo the scalar field order
//! happens when the element is turned into a circuit value.
use crate::{
  errors::AcirError,
  wire::{self, WireReader},
};
use core::marker::PhantomData;
use ff::PrimeField;
use num_bigint::BigUint;
use num_traits::{Num, ToPrimitive};
use std::io::Read;

/// A field element decoded from the wire, parameterized by the scalar field
/// it reduces into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldElement<F: PrimeField> {
  value: BigUint,
  _p: PhantomData<F>,
}

/// Parse the modulus of `F` out of its `PrimeField::MODULUS` hex string.
pub(crate) fn modulus<F: PrimeField>() -> BigUint {
  let hex = F::MODULUS.trim_start_matches("0x");
  BigUint::from_str_radix(hex, 16).expect("PrimeField::MODULUS is valid hex")
}

impl<F: PrimeField> FieldElement<F> {
  /// The additive identity.
  pub fn zero() -> Self {
    Self::from_biguint(BigUint::from(0u64))
  }

  /// The multiplicative identity.
  pub fn one() -> Self {
    Self::from_biguint(BigUint::from(1u64))
  }

  /// Wrap an unreduced bignum.
  pub fn from_biguint(value: BigUint) -> Self {
    FieldElement {
      value,
      _p: PhantomData,
    }
  }

  /// Decode a `u64` length followed by that many big-endian bytes.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    let bytes = r.read_blob()?;
    Ok(Self::from_biguint(BigUint::from_bytes_be(&bytes)))
  }

  /// Re-encode as a length-prefixed big-endian byte run.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    wire::put_blob(buf, &self.value.to_bytes_be());
  }

  /// Reduce into the scalar field.
  pub fn to_scalar(&self) -> F {
    let reduced = &self.value % modulus::<F>();
    F::from_str_vartime(&reduced.to_string()).expect("reduced value is below the modulus")
  }

  /// The element as a `u64`, if it fits. Used for small selectors such as
  /// the memory operation kind.
  pub fn to_u64(&self) -> Option<u64> {
    (&self.value % modulus::<F>()).to_u64()
  }

  /// Whether the element reduces to zero.
  pub fn is_zero(&self) -> bool {
    (&self.value % modulus::<F>()) == BigUint::from(0u64)
  }
}

impl<F: PrimeField> From<u64> for FieldElement<F> {
  fn from(v: u64) -> Self {
    Self::from_biguint(BigUint::from(v))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::provider::bn254::Scalar;
  use ff::Field;

  #[test]
  fn test_decode_round_trip() {
    let element = FieldElement::<Scalar>::from(0x1234_5678_9abc_def0u64);
    let mut buf = Vec::new();
    element.encode(&mut buf);

    let mut r = WireReader::new(buf.as_slice());
    let decoded = FieldElement::<Scalar>::decode(&mut r).unwrap();
    assert_eq!(decoded, element);

    let mut again = Vec::new();
    decoded.encode(&mut again);
    assert_eq!(again, buf);
  }

  #[test]
  fn test_reduction_mod_scalar_order() {
    // modulus + 5 reduces to 5
    let m = modulus::<Scalar>();
    let element = FieldElement::<Scalar>::from_biguint(m + BigUint::from(5u64));
    assert_eq!(element.to_scalar(), Scalar::from(5u64));
    assert_eq!(element.to_u64(), Some(5));
  }

  #[test]
  fn test_constants() {
    assert!(FieldElement::<Scalar>::zero().is_zero());
    assert_eq!(FieldElement::<Scalar>::one().to_scalar(), Scalar::ONE);
  }

  #[test]
  fn test_truncated_element() {
    let mut buf = Vec::new();
    wire::put_u64(&mut buf, 16);
    buf.extend_from_slice(&[0xffu8; 4]);
    let mut r = WireReader::new(buf.as_slice());
    assert!(matches!(
      FieldElement::<Scalar>::decode(&mut r),
      Err(AcirError::TruncatedInput)
    ));
  }
}
