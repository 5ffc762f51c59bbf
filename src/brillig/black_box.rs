// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Black box operations reachable from unconstrained Brillig code. Decoded
//! and compared only; equality is structural over the decoded fields.
use super::{HeapArray, HeapVector, MemoryAddress};
use crate::{
  errors::AcirError,
  wire::{self, WireReader},
};
use std::io::Read;

/// A gadget invocation from Brillig, operating on heap blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum BlackBoxOp {
  Aes128Encrypt {
    inputs: HeapVector,
    iv: HeapArray,
    key: HeapArray,
    outputs: HeapVector,
  },
  Blake2s {
    message: HeapVector,
    output: HeapArray,
  },
  Blake3 {
    message: HeapVector,
    output: HeapArray,
  },
  Keccakf1600 {
    input: HeapArray,
    output: HeapArray,
  },
  EcdsaSecp256k1 {
    hashed_msg: HeapVector,
    public_key_x: HeapArray,
    public_key_y: HeapArray,
    signature: HeapArray,
    result: MemoryAddress,
  },
  EcdsaSecp256r1 {
    hashed_msg: HeapVector,
    public_key_x: HeapArray,
    public_key_y: HeapArray,
    signature: HeapArray,
    result: MemoryAddress,
  },
  MultiScalarMul {
    points: HeapVector,
    scalars: HeapVector,
    outputs: HeapArray,
  },
  EmbeddedCurveAdd {
    input1_x: MemoryAddress,
    input1_y: MemoryAddress,
    input1_infinite: MemoryAddress,
    input2_x: MemoryAddress,
    input2_y: MemoryAddress,
    input2_infinite: MemoryAddress,
    result: HeapArray,
  },
  Poseidon2Permutation {
    message: HeapVector,
    output: HeapArray,
    len: MemoryAddress,
  },
  Sha256Compression {
    input: HeapArray,
    hash_values: HeapArray,
    output: HeapArray,
  },
  ToRadix {
    input: MemoryAddress,
    radix: MemoryAddress,
    output_pointer: MemoryAddress,
    num_limbs: MemoryAddress,
    output_bits: MemoryAddress,
  },
}

impl BlackBoxOp {
  /// Decode a `u32` kind tag and the per-variant operands.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    let kind = r.read_u32()?;
    match kind {
      0 => Ok(BlackBoxOp::Aes128Encrypt {
        inputs: HeapVector::decode(r)?,
        iv: HeapArray::decode(r)?,
        key: HeapArray::decode(r)?,
        outputs: HeapVector::decode(r)?,
      }),
      1 => Ok(BlackBoxOp::Blake2s {
        message: HeapVector::decode(r)?,
        output: HeapArray::decode(r)?,
      }),
      2 => Ok(BlackBoxOp::Blake3 {
        message: HeapVector::decode(r)?,
        output: HeapArray::decode(r)?,
      }),
      3 => Ok(BlackBoxOp::Keccakf1600 {
        input: HeapArray::decode(r)?,
        output: HeapArray::decode(r)?,
      }),
      4 => Ok(BlackBoxOp::EcdsaSecp256k1 {
        hashed_msg: HeapVector::decode(r)?,
        public_key_x: HeapArray::decode(r)?,
        public_key_y: HeapArray::decode(r)?,
        signature: HeapArray::decode(r)?,
        result: MemoryAddress::decode(r)?,
      }),
      5 => Ok(BlackBoxOp::EcdsaSecp256r1 {
        hashed_msg: HeapVector::decode(r)?,
        public_key_x: HeapArray::decode(r)?,
        public_key_y: HeapArray::decode(r)?,
        signature: HeapArray::decode(r)?,
        result: MemoryAddress::decode(r)?,
      }),
      6 => Ok(BlackBoxOp::MultiScalarMul {
        points: HeapVector::decode(r)?,
        scalars: HeapVector::decode(r)?,
        outputs: HeapArray::decode(r)?,
      }),
      7 => Ok(BlackBoxOp::EmbeddedCurveAdd {
        input1_x: MemoryAddress::decode(r)?,
        input1_y: MemoryAddress::decode(r)?,
        input1_infinite: MemoryAddress::decode(r)?,
        input2_x: MemoryAddress::decode(r)?,
        input2_y: MemoryAddress::decode(r)?,
        input2_infinite: MemoryAddress::decode(r)?,
        result: HeapArray::decode(r)?,
      }),
      8 => Ok(BlackBoxOp::Poseidon2Permutation {
        message: HeapVector::decode(r)?,
        output: HeapArray::decode(r)?,
        len: MemoryAddress::decode(r)?,
      }),
      9 => Ok(BlackBoxOp::Sha256Compression {
        input: HeapArray::decode(r)?,
        hash_values: HeapArray::decode(r)?,
        output: HeapArray::decode(r)?,
      }),
      10 => Ok(BlackBoxOp::ToRadix {
        input: MemoryAddress::decode(r)?,
        radix: MemoryAddress::decode(r)?,
        output_pointer: MemoryAddress::decode(r)?,
        num_limbs: MemoryAddress::decode(r)?,
        output_bits: MemoryAddress::decode(r)?,
      }),
      other => Err(AcirError::UnknownBrilligOp(other)),
    }
  }

  /// Re-encode the kind tag and operands.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    match self {
      BlackBoxOp::Aes128Encrypt {
        inputs,
        iv,
        key,
        outputs,
      } => {
        wire::put_u32(buf, 0);
        inputs.encode(buf);
        iv.encode(buf);
        key.encode(buf);
        outputs.encode(buf);
      }
      BlackBoxOp::Blake2s { message, output } => {
        wire::put_u32(buf, 1);
        message.encode(buf);
        output.encode(buf);
      }
      BlackBoxOp::Blake3 { message, output } => {
        wire::put_u32(buf, 2);
        message.encode(buf);
        output.encode(buf);
      }
      BlackBoxOp::Keccakf1600 { input, output } => {
        wire::put_u32(buf, 3);
        input.encode(buf);
        output.encode(buf);
      }
      BlackBoxOp::EcdsaSecp256k1 {
        hashed_msg,
        public_key_x,
        public_key_y,
        signature,
        result,
      } => {
        wire::put_u32(buf, 4);
        hashed_msg.encode(buf);
        public_key_x.encode(buf);
        public_key_y.encode(buf);
        signature.encode(buf);
        result.encode(buf);
      }
      BlackBoxOp::EcdsaSecp256r1 {
        hashed_msg,
        public_key_x,
        public_key_y,
        signature,
        result,
      } => {
        wire::put_u32(buf, 5);
        hashed_msg.encode(buf);
        public_key_x.encode(buf);
        public_key_y.encode(buf);
        signature.encode(buf);
        result.encode(buf);
      }
      BlackBoxOp::MultiScalarMul {
        points,
        scalars,
        outputs,
      } => {
        wire::put_u32(buf, 6);
        points.encode(buf);
        scalars.encode(buf);
        outputs.encode(buf);
      }
      BlackBoxOp::EmbeddedCurveAdd {
        input1_x,
        input1_y,
        input1_infinite,
        input2_x,
        input2_y,
        input2_infinite,
        result,
      } => {
        wire::put_u32(buf, 7);
        input1_x.encode(buf);
        input1_y.encode(buf);
        input1_infinite.encode(buf);
        input2_x.encode(buf);
        input2_y.encode(buf);
        input2_infinite.encode(buf);
        result.encode(buf);
      }
      BlackBoxOp::Poseidon2Permutation {
        message,
        output,
        len,
      } => {
        wire::put_u32(buf, 8);
        message.encode(buf);
        output.encode(buf);
        len.encode(buf);
      }
      BlackBoxOp::Sha256Compression {
        input,
        hash_values,
        output,
      } => {
        wire::put_u32(buf, 9);
        input.encode(buf);
        hash_values.encode(buf);
        output.encode(buf);
      }
      BlackBoxOp::ToRadix {
        input,
        radix,
        output_pointer,
        num_limbs,
        output_bits,
      } => {
        wire::put_u32(buf, 10);
        input.encode(buf);
        radix.encode(buf);
        output_pointer.encode(buf);
        num_limbs.encode(buf);
        output_bits.encode(buf);
      }
    }
  }
}
