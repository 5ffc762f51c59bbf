// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! In-circuit RAM: block initialization and read/write operations over
//! lookup tables.
use crate::{
  black_box::FunctionInput,
  builder::{ConstraintBuilder, TableId},
  errors::AcirError,
  expression::Expression,
  gadgets::{enforce_equal, is_zero, select},
  wire::{self, WireReader},
  witness::{WitnessMap, WitnessTree},
};
use ff::{PrimeField, PrimeFieldBits};
use std::{collections::HashMap, io::Read};

/// Tables live per emission walk, keyed by block id.
pub type MemoryBlocks = HashMap<u32, TableId>;

/// Initializes a memory block from a vector of values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryInit<F: PrimeField> {
  /// The block being initialized.
  pub block_id: u32,
  /// Initial cell values, in slot order.
  pub init: Vec<FunctionInput<F>>,
}

impl<F: PrimeField> MemoryInit<F> {
  /// Decode the block id and the initializer vector.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(MemoryInit {
      block_id: r.read_u32()?,
      init: r.read_vec(FunctionInput::decode)?,
    })
  }

  /// Re-encode in wire order.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    wire::put_u32(buf, self.block_id);
    wire::put_u64(buf, self.init.len() as u64);
    for input in &self.init {
      input.encode(buf);
    }
  }

  /// Insert the witnesses referenced by the initializer.
  pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    for input in &self.init {
      input.fill_witness_tree(tree, base);
    }
  }
}

impl<F: PrimeFieldBits> MemoryInit<F> {
  /// Allocate a fresh table for the block and insert each resolved value in
  /// slot order.
  pub fn define<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
    memory: &mut MemoryBlocks,
  ) -> Result<(), AcirError> {
    let table = cs.table_new();
    for input in &self.init {
      let value = input.to_variable(cs, witnesses)?;
      cs.table_insert(table, &value);
    }
    memory.insert(self.block_id, table);
    Ok(())
  }
}

/// A read or write against an initialized memory block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryOp<F: PrimeField> {
  /// The block being accessed.
  pub block_id: u32,
  /// The operation selector: 0 reads, 1 writes. Must be a pure constant.
  pub operation: Expression<F>,
  /// The accessed slot.
  pub index: Expression<F>,
  /// The read result or the written value.
  pub value: Expression<F>,
}

impl<F: PrimeField> MemoryOp<F> {
  /// Decode the block id and the three expressions in wire order.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    Ok(MemoryOp {
      block_id: r.read_u32()?,
      operation: Expression::decode(r)?,
      index: Expression::decode(r)?,
      value: Expression::decode(r)?,
    })
  }

  /// Re-encode in wire order.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    wire::put_u32(buf, self.block_id);
    self.operation.encode(buf);
    self.index.encode(buf);
    self.value.encode(buf);
  }

  /// Insert the witnesses referenced by the three expressions.
  pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    self.operation.fill_witness_tree(tree, base);
    self.index.fill_witness_tree(tree, base);
    self.value.fill_witness_tree(tree, base);
  }
}

impl<F: PrimeFieldBits> MemoryOp<F> {
  /// Emit the access.
  ///
  /// A read asserts `table[index] == value`. A write rebuilds the block's
  /// table with slot `index` overwritten and replaces the map entry; the
  /// old table stays behind as dead entries.
  pub fn define<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
    memory: &mut MemoryBlocks,
  ) -> Result<(), AcirError> {
    let table = *memory
      .get(&self.block_id)
      .ok_or(AcirError::MemoryBlockNotFound(self.block_id))?;

    let selector = self.operation.constant.to_u64().unwrap_or(u64::MAX);
    if !self.operation.is_const() {
      return Err(AcirError::UnknownMemoryOp(selector));
    }

    match selector {
      0 => {
        let index = self.index.evaluate(cs, witnesses)?;
        let value = self.value.evaluate(cs, witnesses)?;
        let read = cs.table_lookup(table, &index)?;
        enforce_equal(&mut *cs, &read, &value);
        Ok(())
      }
      1 => {
        let index = self.index.evaluate(cs, witnesses)?;
        let value = self.value.evaluate(cs, witnesses)?;
        let length = cs.table_len(table);
        let rebuilt = cs.table_new();
        for slot in 0..length {
          let written = is_zero(&mut *cs, &index, F::from(slot as u64))?;
          let old = cs
            .table_slot(table, slot)
            .ok_or(AcirError::MemoryBlockNotFound(self.block_id))?;
          let updated = select(&mut *cs, &written, &value, &old)?;
          cs.table_insert(rebuilt, &updated);
        }
        memory.insert(self.block_id, rebuilt);
        Ok(())
      }
      other => Err(AcirError::UnknownMemoryOp(other)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    builder::R1csBuilder, field::FieldElement, gadgets::alloc_constant, provider::bn254::Scalar,
    witness::Witness,
  };

  fn constant_init(values: &[u64]) -> MemoryInit<Scalar> {
    MemoryInit {
      block_id: 0,
      init: values
        .iter()
        .map(|v| FunctionInput::Constant(FieldElement::from(*v)))
        .collect(),
    }
  }

  fn access(op: u64, index: u64, value: Expression<Scalar>) -> MemoryOp<Scalar> {
    MemoryOp {
      block_id: 0,
      operation: Expression::from_constant(FieldElement::from(op)),
      index: Expression::from_constant(FieldElement::from(index)),
      value,
    }
  }

  fn witness_value(w: u32) -> Expression<Scalar> {
    Expression {
      mul_terms: vec![],
      linear_combinations: vec![crate::expression::LinearTerm {
        coefficient: FieldElement::one(),
        witness: Witness(w),
      }],
      constant: FieldElement::zero(),
    }
  }

  #[test]
  fn test_decode_round_trip() {
    let init = constant_init(&[10, 20, 30]);
    let mut buf = Vec::new();
    init.encode(&mut buf);
    let mut r = WireReader::new(buf.as_slice());
    assert_eq!(MemoryInit::<Scalar>::decode(&mut r).unwrap(), init);

    let op = access(1, 2, witness_value(5));
    let mut buf = Vec::new();
    op.encode(&mut buf);
    let mut r = WireReader::new(buf.as_slice());
    assert_eq!(MemoryOp::<Scalar>::decode(&mut r).unwrap(), op);
  }

  #[test]
  fn test_read_after_init() {
    // Read slot 1 of [10, 20, 30] into witness 5: satisfied iff w5 = 20.
    for (w5, satisfied) in [(20u64, true), (21, false)] {
      let mut cs = R1csBuilder::new();
      let mut witnesses = WitnessMap::new();
      witnesses.insert(Witness(5), alloc_constant(&mut cs, Scalar::from(w5)).unwrap());
      let mut memory = MemoryBlocks::new();

      constant_init(&[10, 20, 30])
        .define(&mut cs, &witnesses, &mut memory)
        .unwrap();
      access(0, 1, witness_value(5))
        .define(&mut cs, &witnesses, &mut memory)
        .unwrap();
      assert_eq!(cs.is_sat().unwrap(), satisfied);
    }
  }

  #[test]
  fn test_write_then_read() {
    // Write 99 to slot 0, then read slot 0 into witness 7 and slot 1 into
    // witness 8: satisfied iff w7 = 99 and w8 = 20.
    for ((w7, w8), satisfied) in [((99u64, 20u64), true), ((10, 20), false), ((99, 30), false)] {
      let mut cs = R1csBuilder::new();
      let mut witnesses = WitnessMap::new();
      witnesses.insert(Witness(7), alloc_constant(&mut cs, Scalar::from(w7)).unwrap());
      witnesses.insert(Witness(8), alloc_constant(&mut cs, Scalar::from(w8)).unwrap());
      let mut memory = MemoryBlocks::new();

      constant_init(&[10, 20, 30])
        .define(&mut cs, &witnesses, &mut memory)
        .unwrap();
      access(1, 0, Expression::from_constant(FieldElement::from(99)))
        .define(&mut cs, &witnesses, &mut memory)
        .unwrap();
      access(0, 0, witness_value(7))
        .define(&mut cs, &witnesses, &mut memory)
        .unwrap();
      access(0, 1, witness_value(8))
        .define(&mut cs, &witnesses, &mut memory)
        .unwrap();
      assert_eq!(cs.is_sat().unwrap(), satisfied);
    }
  }

  #[test]
  fn test_unknown_operation() {
    let mut cs = R1csBuilder::new();
    let witnesses = WitnessMap::new();
    let mut memory = MemoryBlocks::new();
    constant_init(&[10])
      .define(&mut cs, &witnesses, &mut memory)
      .unwrap();
    let err = access(2, 0, witness_value(5))
      .define(&mut cs, &witnesses, &mut memory)
      .unwrap_err();
    assert!(matches!(err, AcirError::UnknownMemoryOp(2)));
  }

  #[test]
  fn test_uninitialized_block() {
    let mut cs = R1csBuilder::new();
    let err = access(0, 0, witness_value(5))
      .define(&mut cs, &WitnessMap::new(), &mut MemoryBlocks::new())
      .unwrap_err();
    assert!(matches!(err, AcirError::MemoryBlockNotFound(0)));
  }
}
