// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Brillig: the unconstrained bytecode ACIR embeds for hint computation.
//!
//! These opcodes are decoded, compared and re-encoded, but never emitted to
//! the constraint system; they exist so a witness solver can run them.

mod black_box;
mod call;

pub use black_box::BlackBoxOp;
pub use call::{BrilligCall, BrilligInputs, BrilligOutputs};

use crate::{
  errors::AcirError,
  field::FieldElement,
  wire::{self, WireReader},
};
use ff::PrimeField;
use std::io::Read;

/// A Brillig jump target.
pub type Label = u64;

/// A Brillig register reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryAddress {
  /// An absolute slot.
  Direct(u64),
  /// A slot relative to the frame pointer.
  Relative(u64),
}

impl MemoryAddress {
  /// Decode a `u32` tag and the slot.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    let kind = r.read_u32()?;
    match kind {
      0 => Ok(MemoryAddress::Direct(r.read_u64()?)),
      1 => Ok(MemoryAddress::Relative(r.read_u64()?)),
      other => Err(AcirError::UnknownBrilligOp(other)),
    }
  }

  /// Re-encode the tag and slot.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    match self {
      MemoryAddress::Direct(slot) => {
        wire::put_u32(buf, 0);
        wire::put_u64(buf, *slot);
      }
      MemoryAddress::Relative(slot) => {
        wire::put_u32(buf, 1);
        wire::put_u64(buf, *slot);
      }
    }
  }
}

/// A fixed-size block on the Brillig heap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeapArray {
  /// Where the block starts.
  pub pointer: MemoryAddress,
  /// The number of slots.
  pub size: u64,
}

impl HeapArray {
  fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(HeapArray {
      pointer: MemoryAddress::decode(r)?,
      size: r.read_u64()?,
    })
  }

  fn encode(&self, buf: &mut Vec<u8>) {
    self.pointer.encode(buf);
    wire::put_u64(buf, self.size);
  }
}

/// A dynamically-sized block on the Brillig heap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeapVector {
  /// Where the block starts.
  pub pointer: MemoryAddress,
  /// The register holding the block length.
  pub size: MemoryAddress,
}

impl HeapVector {
  fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(HeapVector {
      pointer: MemoryAddress::decode(r)?,
      size: MemoryAddress::decode(r)?,
    })
  }

  fn encode(&self, buf: &mut Vec<u8>) {
    self.pointer.encode(buf);
    self.size.encode(buf);
  }
}

/// A foreign-call operand: a register, a fixed block or a sized block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueOrArray {
  /// A single register.
  MemoryAddress(MemoryAddress),
  /// A fixed-size heap block.
  HeapArray(HeapArray),
  /// A dynamically-sized heap block.
  HeapVector(HeapVector),
}

impl ValueOrArray {
  fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    let kind = r.read_u32()?;
    match kind {
      0 => Ok(ValueOrArray::MemoryAddress(MemoryAddress::decode(r)?)),
      1 => Ok(ValueOrArray::HeapArray(HeapArray::decode(r)?)),
      2 => Ok(ValueOrArray::HeapVector(HeapVector::decode(r)?)),
      other => Err(AcirError::UnknownBrilligOp(other)),
    }
  }

  fn encode(&self, buf: &mut Vec<u8>) {
    match self {
      ValueOrArray::MemoryAddress(a) => {
        wire::put_u32(buf, 0);
        a.encode(buf);
      }
      ValueOrArray::HeapArray(a) => {
        wire::put_u32(buf, 1);
        a.encode(buf);
      }
      ValueOrArray::HeapVector(v) => {
        wire::put_u32(buf, 2);
        v.encode(buf);
      }
    }
  }
}

/// Width of a Brillig integer register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegerBitSize {
  /// One bit.
  U1,
  /// Eight bits.
  U8,
  /// Sixteen bits.
  U16,
  /// Thirty-two bits.
  U32,
  /// Sixty-four bits.
  U64,
  /// One hundred twenty-eight bits.
  U128,
}

impl IntegerBitSize {
  fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    let kind = r.read_u32()?;
    match kind {
      0 => Ok(IntegerBitSize::U1),
      1 => Ok(IntegerBitSize::U8),
      2 => Ok(IntegerBitSize::U16),
      3 => Ok(IntegerBitSize::U32),
      4 => Ok(IntegerBitSize::U64),
      5 => Ok(IntegerBitSize::U128),
      other => Err(AcirError::UnknownBrilligOp(other)),
    }
  }

  fn encode(&self, buf: &mut Vec<u8>) {
    let tag = match self {
      IntegerBitSize::U1 => 0,
      IntegerBitSize::U8 => 1,
      IntegerBitSize::U16 => 2,
      IntegerBitSize::U32 => 3,
      IntegerBitSize::U64 => 4,
      IntegerBitSize::U128 => 5,
    };
    wire::put_u32(buf, tag);
  }
}

/// Width of any Brillig register: a native field element or an integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitSize {
  /// A native field element.
  Field,
  /// An integer of the given width.
  Integer(IntegerBitSize),
}

impl BitSize {
  fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    let kind = r.read_u32()?;
    match kind {
      0 => Ok(BitSize::Field),
      1 => Ok(BitSize::Integer(IntegerBitSize::decode(r)?)),
      other => Err(AcirError::UnknownBrilligOp(other)),
    }
  }

  fn encode(&self, buf: &mut Vec<u8>) {
    match self {
      BitSize::Field => wire::put_u32(buf, 0),
      BitSize::Integer(size) => {
        wire::put_u32(buf, 1);
        size.encode(buf);
      }
    }
  }
}

/// Field-register binary operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum BinaryFieldOp {
  Add,
  Sub,
  Mul,
  Div,
  IntegerDiv,
  Equals,
  LessThan,
  LessThanEquals,
}

impl BinaryFieldOp {
  fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    use BinaryFieldOp::*;
    const OPS: [BinaryFieldOp; 8] = [
      Add,
      Sub,
      Mul,
      Div,
      IntegerDiv,
      Equals,
      LessThan,
      LessThanEquals,
    ];
    let kind = r.read_u32()?;
    OPS
      .get(kind as usize)
      .copied()
      .ok_or(AcirError::UnknownBrilligOp(kind))
  }

  fn encode(&self, buf: &mut Vec<u8>) {
    wire::put_u32(buf, *self as u32);
  }
}

/// Integer-register binary operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum BinaryIntOp {
  Add,
  Sub,
  Mul,
  Div,
  Equals,
  LessThan,
  LessThanEquals,
  And,
  Or,
  Xor,
  Shl,
  Shr,
}

impl BinaryIntOp {
  fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    use BinaryIntOp::*;
    const OPS: [BinaryIntOp; 12] = [
      Add,
      Sub,
      Mul,
      Div,
      Equals,
      LessThan,
      LessThanEquals,
      And,
      Or,
      Xor,
      Shl,
      Shr,
    ];
    let kind = r.read_u32()?;
    OPS
      .get(kind as usize)
      .copied()
      .ok_or(AcirError::UnknownBrilligOp(kind))
  }

  fn encode(&self, buf: &mut Vec<u8>) {
    wire::put_u32(buf, *self as u32);
  }
}

/// A single Brillig opcode, tagged 0 through 18 on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum BrilligOpcode<F: PrimeField> {
  BinaryFieldOp {
    destination: MemoryAddress,
    op: BinaryFieldOp,
    lhs: MemoryAddress,
    rhs: MemoryAddress,
  },
  BinaryIntOp {
    destination: MemoryAddress,
    op: BinaryIntOp,
    bit_size: IntegerBitSize,
    lhs: MemoryAddress,
    rhs: MemoryAddress,
  },
  Not {
    destination: MemoryAddress,
    source: MemoryAddress,
    bit_size: IntegerBitSize,
  },
  Cast {
    destination: MemoryAddress,
    source: MemoryAddress,
    bit_size: BitSize,
  },
  JumpIf {
    condition: MemoryAddress,
    location: Label,
  },
  Jump {
    location: Label,
  },
  CalldataCopy {
    destination_address: MemoryAddress,
    size_address: MemoryAddress,
    offset_address: MemoryAddress,
  },
  Call {
    location: Label,
  },
  Const {
    destination: MemoryAddress,
    bit_size: BitSize,
    value: FieldElement<F>,
  },
  IndirectConst {
    destination_pointer: MemoryAddress,
    bit_size: BitSize,
    value: FieldElement<F>,
  },
  Return,
  ForeignCall {
    function: String,
    destinations: Vec<ValueOrArray>,
    inputs: Vec<ValueOrArray>,
  },
  Mov {
    destination: MemoryAddress,
    source: MemoryAddress,
  },
  ConditionalMov {
    destination: MemoryAddress,
    source_a: MemoryAddress,
    source_b: MemoryAddress,
    condition: MemoryAddress,
  },
  Load {
    destination: MemoryAddress,
    source_pointer: MemoryAddress,
  },
  Store {
    destination_pointer: MemoryAddress,
    source: MemoryAddress,
  },
  BlackBox(BlackBoxOp),
  Trap {
    revert_data: HeapArray,
  },
  Stop {
    return_data: HeapVector,
  },
}

impl<F: PrimeField> BrilligOpcode<F> {
  /// Decode a `u32` kind tag and the per-variant payload.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    let kind = r.read_u32()?;
    match kind {
      0 => Ok(BrilligOpcode::BinaryFieldOp {
        destination: MemoryAddress::decode(r)?,
        op: BinaryFieldOp::decode(r)?,
        lhs: MemoryAddress::decode(r)?,
        rhs: MemoryAddress::decode(r)?,
      }),
      1 => Ok(BrilligOpcode::BinaryIntOp {
        destination: MemoryAddress::decode(r)?,
        op: BinaryIntOp::decode(r)?,
        bit_size: IntegerBitSize::decode(r)?,
        lhs: MemoryAddress::decode(r)?,
        rhs: MemoryAddress::decode(r)?,
      }),
      2 => Ok(BrilligOpcode::Not {
        destination: MemoryAddress::decode(r)?,
        source: MemoryAddress::decode(r)?,
        bit_size: IntegerBitSize::decode(r)?,
      }),
      3 => Ok(BrilligOpcode::Cast {
        destination: MemoryAddress::decode(r)?,
        source: MemoryAddress::decode(r)?,
        bit_size: BitSize::decode(r)?,
      }),
      4 => Ok(BrilligOpcode::JumpIf {
        condition: MemoryAddress::decode(r)?,
        location: r.read_u64()?,
      }),
      5 => Ok(BrilligOpcode::Jump {
        location: r.read_u64()?,
      }),
      6 => Ok(BrilligOpcode::CalldataCopy {
        destination_address: MemoryAddress::decode(r)?,
        size_address: MemoryAddress::decode(r)?,
        offset_address: MemoryAddress::decode(r)?,
      }),
      7 => Ok(BrilligOpcode::Call {
        location: r.read_u64()?,
      }),
      8 => Ok(BrilligOpcode::Const {
        destination: MemoryAddress::decode(r)?,
        bit_size: BitSize::decode(r)?,
        value: FieldElement::decode(r)?,
      }),
      9 => Ok(BrilligOpcode::IndirectConst {
        destination_pointer: MemoryAddress::decode(r)?,
        bit_size: BitSize::decode(r)?,
        value: FieldElement::decode(r)?,
      }),
      10 => Ok(BrilligOpcode::Return),
      11 => Ok(BrilligOpcode::ForeignCall {
        function: r.read_string()?,
        destinations: r.read_vec(ValueOrArray::decode)?,
        inputs: r.read_vec(ValueOrArray::decode)?,
      }),
      12 => Ok(BrilligOpcode::Mov {
        destination: MemoryAddress::decode(r)?,
        source: MemoryAddress::decode(r)?,
      }),
      13 => Ok(BrilligOpcode::ConditionalMov {
        destination: MemoryAddress::decode(r)?,
        source_a: MemoryAddress::decode(r)?,
        source_b: MemoryAddress::decode(r)?,
        condition: MemoryAddress::decode(r)?,
      }),
      14 => Ok(BrilligOpcode::Load {
        destination: MemoryAddress::decode(r)?,
        source_pointer: MemoryAddress::decode(r)?,
      }),
      15 => Ok(BrilligOpcode::Store {
        destination_pointer: MemoryAddress::decode(r)?,
        source: MemoryAddress::decode(r)?,
      }),
      16 => Ok(BrilligOpcode::BlackBox(BlackBoxOp::decode(r)?)),
      17 => Ok(BrilligOpcode::Trap {
        revert_data: HeapArray::decode(r)?,
      }),
      18 => Ok(BrilligOpcode::Stop {
        return_data: HeapVector::decode(r)?,
      }),
      other => Err(AcirError::UnknownBrilligOp(other)),
    }
  }

  /// Re-encode the kind tag and payload.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    match self {
      BrilligOpcode::BinaryFieldOp {
        destination,
        op,
        lhs,
        rhs,
      } => {
        wire::put_u32(buf, 0);
        destination.encode(buf);
        op.encode(buf);
        lhs.encode(buf);
        rhs.encode(buf);
      }
      BrilligOpcode::BinaryIntOp {
        destination,
        op,
        bit_size,
        lhs,
        rhs,
      } => {
        wire::put_u32(buf, 1);
        destination.encode(buf);
        op.encode(buf);
        bit_size.encode(buf);
        lhs.encode(buf);
        rhs.encode(buf);
      }
      BrilligOpcode::Not {
        destination,
        source,
        bit_size,
      } => {
        wire::put_u32(buf, 2);
        destination.encode(buf);
        source.encode(buf);
        bit_size.encode(buf);
      }
      BrilligOpcode::Cast {
        destination,
        source,
        bit_size,
      } => {
        wire::put_u32(buf, 3);
        destination.encode(buf);
        source.encode(buf);
        bit_size.encode(buf);
      }
      BrilligOpcode::JumpIf {
        condition,
        location,
      } => {
        wire::put_u32(buf, 4);
        condition.encode(buf);
        wire::put_u64(buf, *location);
      }
      BrilligOpcode::Jump { location } => {
        wire::put_u32(buf, 5);
        wire::put_u64(buf, *location);
      }
      BrilligOpcode::CalldataCopy {
        destination_address,
        size_address,
        offset_address,
      } => {
        wire::put_u32(buf, 6);
        destination_address.encode(buf);
        size_address.encode(buf);
        offset_address.encode(buf);
      }
      BrilligOpcode::Call { location } => {
        wire::put_u32(buf, 7);
        wire::put_u64(buf, *location);
      }
      BrilligOpcode::Const {
        destination,
        bit_size,
        value,
      } => {
        wire::put_u32(buf, 8);
        destination.encode(buf);
        bit_size.encode(buf);
        value.encode(buf);
      }
      BrilligOpcode::IndirectConst {
        destination_pointer,
        bit_size,
        value,
      } => {
        wire::put_u32(buf, 9);
        destination_pointer.encode(buf);
        bit_size.encode(buf);
        value.encode(buf);
      }
      BrilligOpcode::Return => wire::put_u32(buf, 10),
      BrilligOpcode::ForeignCall {
        function,
        destinations,
        inputs,
      } => {
        wire::put_u32(buf, 11);
        wire::put_string(buf, function);
        wire::put_u64(buf, destinations.len() as u64);
        for d in destinations {
          d.encode(buf);
        }
        wire::put_u64(buf, inputs.len() as u64);
        for i in inputs {
          i.encode(buf);
        }
      }
      BrilligOpcode::Mov {
        destination,
        source,
      } => {
        wire::put_u32(buf, 12);
        destination.encode(buf);
        source.encode(buf);
      }
      BrilligOpcode::ConditionalMov {
        destination,
        source_a,
        source_b,
        condition,
      } => {
        wire::put_u32(buf, 13);
        destination.encode(buf);
        source_a.encode(buf);
        source_b.encode(buf);
        condition.encode(buf);
      }
      BrilligOpcode::Load {
        destination,
        source_pointer,
      } => {
        wire::put_u32(buf, 14);
        destination.encode(buf);
        source_pointer.encode(buf);
      }
      BrilligOpcode::Store {
        destination_pointer,
        source,
      } => {
        wire::put_u32(buf, 15);
        destination_pointer.encode(buf);
        source.encode(buf);
      }
      BrilligOpcode::BlackBox(op) => {
        wire::put_u32(buf, 16);
        op.encode(buf);
      }
      BrilligOpcode::Trap { revert_data } => {
        wire::put_u32(buf, 17);
        revert_data.encode(buf);
      }
      BrilligOpcode::Stop { return_data } => {
        wire::put_u32(buf, 18);
        return_data.encode(buf);
      }
    }
  }
}

/// The body of an unconstrained function: a flat opcode vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrilligBytecode<F: PrimeField> {
  /// The opcodes, in execution order.
  pub bytecode: Vec<BrilligOpcode<F>>,
}

impl<F: PrimeField> BrilligBytecode<F> {
  /// Decode a `u64`-count-prefixed opcode vector.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(BrilligBytecode {
      bytecode: r.read_vec(BrilligOpcode::decode)?,
    })
  }

  /// Re-encode the opcode vector.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    wire::put_u64(buf, self.bytecode.len() as u64);
    for op in &self.bytecode {
      op.encode(buf);
    }
  }
}
