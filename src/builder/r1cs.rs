// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! A rank-1 constraint system builder with value tracking.
//!
//! `R1csBuilder` plays the role of the proving backend's frontend: it
//! collects `A * B = C` rows, remembers concrete assignments when the caller
//! supplies them, lowers variable-index lookups to multiplexer constraints,
//! and queues cryptographic gadget invocations for a downstream gadget
//! library. `is_sat` evaluates the collected rows against the remembered
//! assignment.
use super::{ConstraintBuilder, GadgetKind, TableId};
use crate::gadgets;
use bellpepper_core::{
  num::AllocatedNum, ConstraintSystem, Index, LinearCombination, SynthesisError, Variable,
};
use ff::{PrimeField, PrimeFieldBits};
use serde::{Deserialize, Serialize};

type Row<F> = (
  LinearCombination<F>,
  LinearCombination<F>,
  LinearCombination<F>,
  String,
);

/// An R1CS builder that tracks values alongside shape.
pub struct R1csBuilder<F: PrimeField> {
  inputs: Vec<Option<F>>,
  aux: Vec<Option<F>>,
  constraints: Vec<Row<F>>,
  tables: Vec<Vec<AllocatedNum<F>>>,
  deferred: Vec<(GadgetKind, Vec<Variable>, Vec<Variable>)>,
}

/// A cryptographic gadget invocation queued for the backend, with variables
/// flattened into the `[inputs | aux]` column order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredGadget {
  /// Which capability to lower.
  pub kind: GadgetKind,
  /// Column indices of the gadget operands.
  pub inputs: Vec<usize>,
  /// Column indices of the unconstrained result variables.
  pub outputs: Vec<usize>,
}

/// The compiled output: sparse constraint rows plus the deferred gadget
/// queue, opaque to everything upstream of the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "F: Serialize", deserialize = "F: Deserialize<'de>"))]
pub struct CompiledR1cs<F: PrimeField> {
  /// Number of public columns, including the constant one.
  pub num_inputs: usize,
  /// Number of auxiliary columns.
  pub num_aux: usize,
  /// Sparse `A * B = C` rows over `[inputs | aux]` columns.
  pub constraints: Vec<(Vec<(usize, F)>, Vec<(usize, F)>, Vec<(usize, F)>)>,
  /// Gadget invocations the backend must lower.
  pub gadgets: Vec<DeferredGadget>,
}

impl<F: PrimeField> R1csBuilder<F> {
  /// Create an empty builder. Input column 0 is the constant one.
  pub fn new() -> Self {
    R1csBuilder {
      inputs: vec![Some(F::ONE)],
      aux: vec![],
      constraints: vec![],
      tables: vec![],
      deferred: vec![],
    }
  }

  /// Number of constraint rows collected so far.
  pub fn num_constraints(&self) -> usize {
    self.constraints.len()
  }

  /// Number of public columns, including the constant one.
  pub fn num_inputs(&self) -> usize {
    self.inputs.len()
  }

  /// Number of auxiliary columns.
  pub fn num_aux(&self) -> usize {
    self.aux.len()
  }

  /// The gadget invocations queued so far.
  pub fn gadget_calls(&self) -> &[(GadgetKind, Vec<Variable>, Vec<Variable>)] {
    &self.deferred
  }

  fn value_of(&self, var: Variable) -> Result<F, SynthesisError> {
    let slot = match var.get_unchecked() {
      Index::Input(i) => self.inputs.get(i),
      Index::Aux(i) => self.aux.get(i),
    };
    slot
      .copied()
      .flatten()
      .ok_or(SynthesisError::AssignmentMissing)
  }

  fn eval_lc(&self, lc: &LinearCombination<F>) -> Result<F, SynthesisError> {
    let mut acc = F::ZERO;
    for (var, coeff) in lc.iter() {
      acc += *coeff * self.value_of(var)?;
    }
    Ok(acc)
  }

  /// Evaluate every collected row against the remembered assignment.
  /// Fails if a row touches a variable with no value.
  pub fn is_sat(&self) -> Result<bool, SynthesisError> {
    for (a, b, c, _) in &self.constraints {
      let a = self.eval_lc(a)?;
      let b = self.eval_lc(b)?;
      let c = self.eval_lc(c)?;
      if a * b != c {
        return Ok(false);
      }
    }
    Ok(true)
  }

  fn flatten(&self, var: Variable) -> usize {
    match var.get_unchecked() {
      Index::Input(i) => i,
      Index::Aux(i) => self.inputs.len() + i,
    }
  }

  fn flatten_lc(&self, lc: &LinearCombination<F>) -> Vec<(usize, F)> {
    lc.iter().map(|(var, coeff)| (self.flatten(var), *coeff)).collect()
  }

  /// Freeze the builder into its compiled form.
  pub fn finalize(self) -> CompiledR1cs<F> {
    let constraints = self
      .constraints
      .iter()
      .map(|(a, b, c, _)| (self.flatten_lc(a), self.flatten_lc(b), self.flatten_lc(c)))
      .collect();
    let gadgets = self
      .deferred
      .iter()
      .map(|(kind, inputs, outputs)| DeferredGadget {
        kind: *kind,
        inputs: inputs.iter().map(|v| self.flatten(*v)).collect(),
        outputs: outputs.iter().map(|v| self.flatten(*v)).collect(),
      })
      .collect();
    CompiledR1cs {
      num_inputs: self.inputs.len(),
      num_aux: self.aux.len(),
      constraints,
      gadgets,
    }
  }
}

impl<F: PrimeField> Default for R1csBuilder<F> {
  fn default() -> Self {
    Self::new()
  }
}

impl<F: PrimeField> ConstraintSystem<F> for R1csBuilder<F> {
  type Root = Self;

  fn alloc<FN, A, AR>(&mut self, _annotation: A, f: FN) -> Result<Variable, SynthesisError>
  where
    FN: FnOnce() -> Result<F, SynthesisError>,
    A: FnOnce() -> AR,
    AR: Into<String>,
  {
    // A missing assignment is tolerated: shape is always built, values only
    // when the caller supplied them.
    self.aux.push(f().ok());
    Ok(Variable::new_unchecked(Index::Aux(self.aux.len() - 1)))
  }

  fn alloc_input<FN, A, AR>(&mut self, _annotation: A, f: FN) -> Result<Variable, SynthesisError>
  where
    FN: FnOnce() -> Result<F, SynthesisError>,
    A: FnOnce() -> AR,
    AR: Into<String>,
  {
    self.inputs.push(f().ok());
    Ok(Variable::new_unchecked(Index::Input(self.inputs.len() - 1)))
  }

  fn enforce<A, AR, LA, LB, LC>(&mut self, annotation: A, a: LA, b: LB, c: LC)
  where
    A: FnOnce() -> AR,
    AR: Into<String>,
    LA: FnOnce(LinearCombination<F>) -> LinearCombination<F>,
    LB: FnOnce(LinearCombination<F>) -> LinearCombination<F>,
    LC: FnOnce(LinearCombination<F>) -> LinearCombination<F>,
  {
    let a = a(LinearCombination::zero());
    let b = b(LinearCombination::zero());
    let c = c(LinearCombination::zero());
    self.constraints.push((a, b, c, annotation().into()));
  }

  fn push_namespace<NR, N>(&mut self, _name_fn: N)
  where
    NR: Into<String>,
    N: FnOnce() -> NR,
  {
  }

  fn pop_namespace(&mut self) {}

  fn get_root(&mut self) -> &mut Self::Root {
    self
  }
}

impl<F: PrimeFieldBits> ConstraintBuilder<F> for R1csBuilder<F> {
  fn table_new(&mut self) -> TableId {
    self.tables.push(vec![]);
    TableId(self.tables.len() - 1)
  }

  fn table_insert(&mut self, table: TableId, value: &AllocatedNum<F>) -> usize {
    let entries = &mut self.tables[table.0];
    entries.push(value.clone());
    entries.len() - 1
  }

  fn table_len(&self, table: TableId) -> usize {
    self.tables[table.0].len()
  }

  fn table_slot(&self, table: TableId, slot: usize) -> Option<AllocatedNum<F>> {
    self.tables[table.0].get(slot).cloned()
  }

  fn table_lookup(
    &mut self,
    table: TableId,
    index: &AllocatedNum<F>,
  ) -> Result<AllocatedNum<F>, SynthesisError> {
    let entries = self.tables[table.0].clone();

    // An out-of-range index resolves to zero; the one-hot row below still
    // rejects it, so the assignment stays evaluable without being
    // satisfiable.
    let result_value = index.get_value().and_then(|i| {
      match entries
        .iter()
        .enumerate()
        .find(|(slot, _)| F::from(*slot as u64) == i)
      {
        Some((_, entry)) => entry.get_value(),
        None => Some(F::ZERO),
      }
    });
    let result = AllocatedNum::alloc(&mut *self, || {
      result_value.ok_or(SynthesisError::AssignmentMissing)
    })?;

    // result = sum of one-hot selectors against the entries; the selector
    // sum is forced to one so an out-of-range index cannot be satisfied.
    let mut selected = LinearCombination::<F>::zero();
    let mut one_hot = LinearCombination::<F>::zero();
    for (slot, entry) in entries.iter().enumerate() {
      let sel = gadgets::is_zero(&mut *self, index, F::from(slot as u64))?;
      let term_value = match (sel.get_value(), entry.get_value()) {
        (Some(s), Some(e)) => Some(if s { e } else { F::ZERO }),
        _ => None,
      };
      let term =
        AllocatedNum::alloc(&mut *self, || term_value.ok_or(SynthesisError::AssignmentMissing))?;
      self.enforce(
        || format!("lookup term {slot}"),
        |lc| lc + entry.get_variable(),
        |lc| lc + sel.get_variable(),
        |lc| lc + term.get_variable(),
      );
      selected = selected + term.get_variable();
      one_hot = one_hot + sel.get_variable();
    }
    self.enforce(
      || "lookup result",
      |_| selected,
      |lc| lc + Self::one(),
      |lc| lc + result.get_variable(),
    );
    self.enforce(
      || "lookup index in range",
      |_| one_hot,
      |lc| lc + Self::one(),
      |lc| lc + Self::one(),
    );

    Ok(result)
  }

  fn invoke_gadget(
    &mut self,
    kind: GadgetKind,
    inputs: &[AllocatedNum<F>],
    n_outputs: usize,
  ) -> Result<Vec<AllocatedNum<F>>, SynthesisError> {
    let outputs = (0..n_outputs)
      .map(|_| AllocatedNum::alloc(&mut *self, || Err(SynthesisError::AssignmentMissing)))
      .collect::<Result<Vec<_>, _>>()?;
    self.deferred.push((
      kind,
      inputs.iter().map(|n| n.get_variable()).collect(),
      outputs.iter().map(|n| n.get_variable()).collect(),
    ));
    Ok(outputs)
  }
}
