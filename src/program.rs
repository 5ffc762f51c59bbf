// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! The top level of an ACIR artifact: constrained circuits plus the
//! unconstrained function bodies they may call into.
use crate::{
  brillig::BrilligBytecode,
  builder::ConstraintBuilder,
  circuit::Circuit,
  errors::AcirError,
  wire::{self, WireReader},
  witness::{WitnessMap, WitnessTree},
};
use ff::{PrimeField, PrimeFieldBits};
use std::io::Read;
use tracing::debug;

/// A decoded program. The outer circuit is always at index 0; calls
/// reference callees by index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program<F: PrimeField> {
  /// The constrained circuits.
  pub functions: Vec<Circuit<F>>,
  /// The unconstrained Brillig bodies.
  pub unconstrained_functions: Vec<BrilligBytecode<F>>,
}

impl<F: PrimeField> Program<F> {
  /// Decode the circuit vector and the unconstrained function vector.
  pub fn decode<R: Read>(r: &mut WireReader<R>) -> Result<Self, AcirError> {
    let functions = r.read_vec(Circuit::decode)?;
    let unconstrained_functions = r.read_vec(BrilligBytecode::decode)?;
    debug!(
      circuits = functions.len(),
      unconstrained = unconstrained_functions.len(),
      "decoded program"
    );
    Ok(Program {
      functions,
      unconstrained_functions,
    })
  }

  /// Re-encode both vectors.
  pub fn encode(&self, buf: &mut Vec<u8>) {
    wire::put_u64(buf, self.functions.len() as u64);
    for circuit in &self.functions {
      circuit.encode(buf);
    }
    wire::put_u64(buf, self.unconstrained_functions.len() as u64);
    for body in &self.unconstrained_functions {
      body.encode(buf);
    }
  }

  fn outer(&self) -> Result<&Circuit<F>, AcirError> {
    self.functions.first().ok_or(AcirError::MalformedEnvelope {
      reason: "program has no circuits".into(),
    })
  }

  /// Build the program's witness tree by the post-order walk, returning the
  /// tree and the outer circuit's base index.
  pub fn witness_tree(&self) -> Result<(WitnessTree, u32), AcirError> {
    let outer = self.outer()?;
    let mut tree = WitnessTree::new();
    let mut stack = vec![0u32];
    let (_, base) = outer.fill_witness_tree(&self.functions, &mut tree, 0, &mut stack)?;
    Ok((tree, base))
  }

  /// Emit the outer circuit (and, through it, every callee) against the
  /// declared witness variables.
  pub fn define<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    witnesses: &WitnessMap<F>,
  ) -> Result<(), AcirError>
  where
    F: PrimeFieldBits,
  {
    let outer = self.outer()?;
    let mut index = 0u32;
    let mut stack = vec![0u32];
    outer.define(cs, witnesses, &self.functions, &mut index, &mut stack)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    builder::R1csBuilder,
    expression::{Expression, LinearTerm, MulTerm},
    field::FieldElement,
    gadgets::alloc_constant,
    opcodes::{Call, Opcode},
    provider::bn254::Scalar,
    witness::Witness,
  };
  use std::collections::BTreeMap;

  fn circuit(
    name: &str,
    cwi: u32,
    opcodes: Vec<Opcode<Scalar>>,
    private: &[u32],
    ret: &[u32],
  ) -> Circuit<Scalar> {
    Circuit {
      name: name.into(),
      current_witness_index: cwi,
      opcodes,
      private_parameters: private.iter().map(|w| Witness(*w)).collect(),
      public_parameters: WitnessTree::new(),
      return_values: ret.iter().map(|w| Witness(*w)).collect(),
      assert_messages: BTreeMap::new(),
    }
  }

  /// The field encoding of `-n`.
  fn minus(n: u64) -> FieldElement<Scalar> {
    FieldElement::from_biguint(crate::field::modulus::<Scalar>() - num_bigint::BigUint::from(n))
  }

  fn call(id: u32, inputs: &[u32], outputs: &[u32]) -> Opcode<Scalar> {
    Opcode::Call(Call {
      id,
      inputs: inputs.iter().map(|w| Witness(*w)).collect(),
      outputs: outputs.iter().map(|w| Witness(*w)).collect(),
      predicate: Expression::from_constant(FieldElement::one()),
    })
  }

  /// Inner multiplies its two parameters; outer calls it.
  fn two_circuit_program() -> Program<Scalar> {
    // inner: w0 * w1 - w2 = 0
    let product = Expression {
      mul_terms: vec![MulTerm {
        coefficient: FieldElement::one(),
        lhs: Witness(0),
        rhs: Witness(1),
      }],
      linear_combinations: vec![LinearTerm {
        coefficient: minus(1),
        witness: Witness(2),
      }],
      constant: FieldElement::zero(),
    };
    let inner = circuit("inner", 2, vec![Opcode::Arithmetic(product)], &[0, 1], &[2]);
    let outer = circuit("outer", 3, vec![call(1, &[1, 2], &[3])], &[1, 2], &[3]);
    Program {
      functions: vec![outer, inner],
      unconstrained_functions: vec![],
    }
  }

  fn bind(cs: &mut R1csBuilder<Scalar>, tree: &WitnessTree, values: &[(u32, u64)]) -> WitnessMap<Scalar> {
    let values: BTreeMap<u32, u64> = values.iter().copied().collect();
    tree
      .iter()
      .map(|w| {
        let v = values.get(&w.0).copied().unwrap_or(0);
        (*w, alloc_constant(&mut *cs, Scalar::from(v)).unwrap())
      })
      .collect()
  }

  #[test]
  fn test_decode_round_trip() {
    let program = two_circuit_program();
    let mut buf = Vec::new();
    program.encode(&mut buf);
    let mut r = WireReader::new(buf.as_slice());
    let decoded = Program::<Scalar>::decode(&mut r).unwrap();
    assert_eq!(decoded, program);
  }

  #[test]
  fn test_postorder_witness_numbering() {
    let program = two_circuit_program();
    let (tree, base) = program.witness_tree().unwrap();
    // inner occupies 0..=2, outer starts at 3
    assert_eq!(base, 3);
    let indices: Vec<u32> = tree.iter().map(|w| w.0).collect();
    assert_eq!(indices, vec![0, 1, 2, 4, 5, 6]);
  }

  #[test]
  fn test_call_stitching() {
    // inner computes 6 * 7 = 42; outer witnesses mirror inner's.
    let program = two_circuit_program();
    let (tree, _) = program.witness_tree().unwrap();

    let mut cs = R1csBuilder::new();
    let witnesses = bind(
      &mut cs,
      &tree,
      &[(0, 6), (1, 7), (2, 42), (4, 6), (5, 7), (6, 42)],
    );
    program.define(&mut cs, &witnesses).unwrap();
    assert!(cs.is_sat().unwrap());

    // outer's output disagreeing with inner's return breaks the stitch
    let mut cs = R1csBuilder::new();
    let witnesses = bind(
      &mut cs,
      &tree,
      &[(0, 6), (1, 7), (2, 42), (4, 6), (5, 7), (6, 41)],
    );
    program.define(&mut cs, &witnesses).unwrap();
    assert!(!cs.is_sat().unwrap());

    // and so does a caller input disagreeing with the callee parameter
    let mut cs = R1csBuilder::new();
    let witnesses = bind(
      &mut cs,
      &tree,
      &[(0, 6), (1, 7), (2, 42), (4, 5), (5, 7), (6, 42)],
    );
    program.define(&mut cs, &witnesses).unwrap();
    assert!(!cs.is_sat().unwrap());
  }

  #[test]
  fn test_identity_assignment_satisfies_identity_friendly_expressions() {
    // w0 + w1 - 2 = 0 holds when every witness is one.
    let expr = Expression::<Scalar> {
      mul_terms: vec![],
      linear_combinations: vec![
        LinearTerm {
          coefficient: FieldElement::one(),
          witness: Witness(0),
        },
        LinearTerm {
          coefficient: FieldElement::one(),
          witness: Witness(1),
        },
      ],
      constant: minus(2),
    };
    let program = Program {
      functions: vec![circuit("main", 1, vec![Opcode::Arithmetic(expr)], &[0, 1], &[])],
      unconstrained_functions: vec![],
    };
    let (tree, _) = program.witness_tree().unwrap();
    let mut cs = R1csBuilder::new();
    let witnesses = bind(&mut cs, &tree, &[(0, 1), (1, 1)]);
    program.define(&mut cs, &witnesses).unwrap();
    assert!(cs.is_sat().unwrap());
  }

  #[test]
  fn test_subcircuit_not_found() {
    let program = Program {
      functions: vec![circuit("main", 0, vec![call(99, &[], &[])], &[0], &[])],
      unconstrained_functions: vec![],
    };
    assert!(matches!(
      program.witness_tree().unwrap_err(),
      AcirError::SubcircuitNotFound(99)
    ));
  }

  #[test]
  fn test_call_arity_mismatch() {
    // inner wants two parameters, outer supplies one
    let inner = circuit("inner", 1, vec![], &[0, 1], &[]);
    let outer = circuit("outer", 1, vec![call(1, &[1], &[])], &[1], &[]);
    let program = Program {
      functions: vec![outer, inner],
      unconstrained_functions: vec![],
    };
    let (tree, _) = program.witness_tree().unwrap();
    let mut cs = R1csBuilder::new();
    let witnesses = bind(&mut cs, &tree, &[]);
    assert!(matches!(
      program.define(&mut cs, &witnesses).unwrap_err(),
      AcirError::CallArityMismatch { id: 1 }
    ));
  }

  #[test]
  fn test_circular_call() {
    // 0 calls 1, 1 calls 0
    let a = circuit("a", 0, vec![call(1, &[], &[])], &[], &[]);
    let b = circuit("b", 0, vec![call(0, &[], &[])], &[], &[]);
    let program = Program {
      functions: vec![a, b],
      unconstrained_functions: vec![],
    };
    assert!(matches!(
      program.witness_tree().unwrap_err(),
      AcirError::CircularCall(0)
    ));
  }
}
