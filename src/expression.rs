// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Arithmetic expressions: a sum of multiplication terms, a linear
//! combination and a constant, asserted equal to zero when emitted as an
//! opcode.
use crate::{
  errors::AcirError,
  field::FieldElement,
  wire::{self, WireReader},
  witness::{bound_var, Witness, WitnessMap, WitnessTree},
};
use bellpepper_core::{num::AllocatedNum, ConstraintSystem, LinearCombination, SynthesisError};
use ff::PrimeField;
use std::io::Read;

/// A quadratic term `coefficient * w_lhs * w_rhs`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MulTerm<F: PrimeField> {
  /// The coefficient of the product.
  pub coefficient: FieldElement<F>,
  /// The left witness factor.
  pub lhs: Witness,
  /// The right witness factor.
  pub rhs: Witness,
}

/// A linear term `coefficient * w`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearTerm<F: PrimeField> {
  /// The coefficient of the witness.
  pub coefficient: FieldElement<F>,
  /// The witness.
  pub witness: Witness,
}

/// An affine-plus-quadratic polynomial over witnesses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expression<F: PrimeField> {
  /// Quadratic terms, in decode order.
  pub mul_terms: Vec<MulTerm<F>>,
  /// Linear terms, in decode order.
  pub linear_combinations: Vec<LinearTerm<F>>,
  /// The constant term.
  pub constant: FieldElement<F>,
}

impl<F: PrimeField> Expression<F> {
  /// An expression holding just a constant.
  pub fn from_constant(constant: FieldElement<F>) -> Self {
    Expression {
      mul_terms: vec![],
      linear_combinations: vec![],
      constant,
    }
  }

  /// Decode mul terms, then linear terms, then the constant.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    let mul_terms = r.read_vec(|r| {
      Ok(MulTerm {
        coefficient: FieldElement::decode(r)?,
        lhs: Witness::decode(r)?,
        rhs: Witness::decode(r)?,
      })
    })?;
    let linear_combinations = r.read_vec(|r| {
      Ok(LinearTerm {
        coefficient: FieldElement::decode(r)?,
        witness: Witness::decode(r)?,
      })
    })?;
    let constant = FieldElement::decode(r)?;
    Ok(Expression {
      mul_terms,
      linear_combinations,
      constant,
    })
  }

  /// Re-encode in decode order.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    wire::put_u64(buf, self.mul_terms.len() as u64);
    for term in &self.mul_terms {
      term.coefficient.encode(buf);
      term.lhs.encode(buf);
      term.rhs.encode(buf);
    }
    wire::put_u64(buf, self.linear_combinations.len() as u64);
    for term in &self.linear_combinations {
      term.coefficient.encode(buf);
      term.witness.encode(buf);
    }
    self.constant.encode(buf);
  }

  /// Whether the expression is a bare constant.
  pub fn is_const(&self) -> bool {
    self.mul_terms.is_empty() && self.linear_combinations.is_empty()
  }

  /// The concrete value under the bound witness values, when all of them are
  /// known.
  fn value(&self, witnesses: &WitnessMap<F>) -> Option<F> {
    let mut acc = self.constant.to_scalar();
    for term in &self.mul_terms {
      let a = witnesses.get(&term.lhs)?.get_value()?;
      let b = witnesses.get(&term.rhs)?.get_value()?;
      acc += term.coefficient.to_scalar() * a * b;
    }
    for term in &self.linear_combinations {
      let w = witnesses.get(&term.witness)?.get_value()?;
      acc += term.coefficient.to_scalar() * w;
    }
    Some(acc)
  }

  /// Build the linear combination realizing the expression, allocating one
  /// product variable per quadratic term.
  fn to_lc<CS: ConstraintSystem<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
  ) -> Result<LinearCombination<F>, AcirError> {
    let mut lc = LinearCombination::zero() + (self.constant.to_scalar(), CS::one());
    for term in &self.mul_terms {
      let a = bound_var(witnesses, &term.lhs)?;
      let b = bound_var(witnesses, &term.rhs)?;
      let product = a.mul(&mut *cs, b)?;
      lc = lc + (term.coefficient.to_scalar(), product.get_variable());
    }
    for term in &self.linear_combinations {
      let w = bound_var(witnesses, &term.witness)?;
      lc = lc + (term.coefficient.to_scalar(), w.get_variable());
    }
    Ok(lc)
  }

  /// Assert that the expression evaluates to zero.
  pub fn assert_zero<CS: ConstraintSystem<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
  ) -> Result<(), AcirError> {
    let lc = self.to_lc(cs, witnesses)?;
    cs.enforce(
      || "expression is zero",
      |_| lc,
      |lc| lc + CS::one(),
      |lc| lc,
    );
    Ok(())
  }

  /// Evaluate the expression into a fresh variable constrained to its value.
  pub fn evaluate<CS: ConstraintSystem<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
  ) -> Result<AllocatedNum<F>, AcirError> {
    let lc = self.to_lc(cs, witnesses)?;
    let value = self.value(witnesses);
    let result = AllocatedNum::alloc(&mut *cs, || {
      value.ok_or(SynthesisError::AssignmentMissing)
    })?;
    cs.enforce(
      || "expression value",
      |_| lc,
      |lc| lc + CS::one(),
      |lc| lc + result.get_variable(),
    );
    Ok(result)
  }

  /// Insert every referenced witness, re-based by the circuit offset.
  pub fn fill_witness_tree(&self, tree: &mut WitnessTree, base: u32) {
    for term in &self.mul_terms {
      tree.insert(term.lhs.offset(base));
      tree.insert(term.rhs.offset(base));
    }
    for term in &self.linear_combinations {
      tree.insert(term.witness.offset(base));
    }
  }
}
