//! This library translates ACIR programs — the arithmetic-circuit artifacts
//! emitted by a zero-knowledge DSL compiler — into rank-1 constraint systems
//! over the BN254 scalar field, for proving by a Groth16-style backend.
#![deny(
  warnings,
  future_incompatible,
  nonstandard_style,
  rust_2018_idioms,
  missing_docs
)]
#![allow(clippy::type_complexity)]
#![forbid(unsafe_code)]

pub mod abi;
pub mod black_box;
pub mod brillig;
pub mod builder;
pub mod circuit;
pub mod errors;
pub mod expression;
pub mod field;
mod gadgets;
pub mod opcodes;
pub mod program;
pub mod provider;
pub mod wire;
pub mod witness;

use crate::{
  abi::{Abi, ExpressionWidth, Visibility},
  builder::ConstraintBuilder,
  errors::AcirError,
  program::Program,
  wire::WireReader,
  witness::{Witness, WitnessAssignments, WitnessMap},
};
use base64::Engine;
use ff::{PrimeField, PrimeFieldBits};
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// A parsed ACIR artifact: the decoded program plus the envelope metadata
/// that rides along with it.
#[derive(Clone, Debug, PartialEq)]
pub struct Acir<F: PrimeField> {
  /// The compiler version that produced the artifact.
  pub noir_version: String,
  /// The artifact hash.
  pub hash: u64,
  /// The parameter ABI; visibility drives variable declaration order.
  pub abi: Abi,
  /// The decoded program.
  pub program: Program<F>,
  /// Opaque debug symbol blob.
  pub debug_symbols: String,
  /// Opaque per-file metadata.
  pub file_map: HashMap<String, serde_json::Value>,
  /// The expression fan-in the bytecode was compiled for.
  pub expression_width: ExpressionWidth,
}

#[derive(Deserialize)]
struct RawEnvelope {
  noir_version: String,
  hash: String,
  abi: Abi,
  bytecode: String,
  debug_symbols: String,
  file_map: HashMap<String, serde_json::Value>,
  #[serde(default)]
  expression_width: ExpressionWidth,
}

impl<F: PrimeFieldBits> Acir<F> {
  /// Parse the outer JSON envelope and decode the bytecode it carries.
  pub fn from_json(data: &str) -> Result<Self, AcirError> {
    let raw: RawEnvelope =
      serde_json::from_str(data).map_err(|e| AcirError::MalformedEnvelope {
        reason: e.to_string(),
      })?;
    let hash = raw
      .hash
      .parse::<u64>()
      .map_err(|e| AcirError::MalformedEnvelope {
        reason: format!("invalid hash value: {e}"),
      })?;
    let program = Self::decode_bytecode(&raw.bytecode)?;
    Ok(Acir {
      noir_version: raw.noir_version,
      hash,
      abi: raw.abi,
      program,
      debug_symbols: raw.debug_symbols,
      file_map: raw.file_map,
      expression_width: raw.expression_width,
    })
  }

  /// Decode a base64(gzip(wire)) bytecode string, streaming the
  /// decompressor straight into the wire reader.
  pub fn decode_bytecode(bytecode: &str) -> Result<Program<F>, AcirError> {
    let compressed = base64::engine::general_purpose::STANDARD
      .decode(bytecode)
      .map_err(|e| AcirError::MalformedEnvelope {
        reason: format!("invalid bytecode encoding: {e}"),
      })?;
    let mut r = WireReader::new(GzDecoder::new(compressed.as_slice()));
    Program::decode(&mut r)
  }

  /// Compile the artifact into the supplied builder.
  ///
  /// Declaration order is mandatory: public variables go in first, one per
  /// public ABI parameter in ABI order, keyed by `parameter index + outer
  /// base`; the witness tree then ascends and declares everything else as
  /// secret. Emission follows with the global index at zero.
  ///
  /// `assignments` seeds concrete values for instrumentation; compilation
  /// itself never solves for witnesses. The returned map exposes the
  /// variable declared for each global witness index.
  pub fn compile<CS: ConstraintBuilder<F>>(
    &self,
    cs: &mut CS,
    assignments: Option<&WitnessAssignments<F>>,
  ) -> Result<WitnessMap<F>, AcirError> {
    let (tree, outer_base) = self.program.witness_tree()?;
    debug!(
      witnesses = tree.len(),
      outer_base, "declaring program variables"
    );

    let mut witness_map = WitnessMap::new();
    for (i, param) in self.abi.params.iter().enumerate() {
      if param.visibility == Visibility::Public {
        let w = Witness(i as u32 + outer_base);
        let value = assignments.and_then(|a| a.get(&w).copied());
        witness_map.insert(w, cs.public_var(&param.name, value)?);
      }
    }

    for w in &tree {
      if !witness_map.contains_key(w) {
        let value = assignments.and_then(|a| a.get(w).copied());
        witness_map.insert(*w, cs.secret_var(&format!("__witness_{}", w.0), value)?);
      }
    }

    self.program.define(cs, &witness_map)?;
    Ok(witness_map)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    builder::R1csBuilder,
    circuit::Circuit,
    expression::Expression,
    field::FieldElement,
    opcodes::Opcode,
    provider::bn254::Scalar,
    witness::WitnessTree,
  };
  use flate2::{write::GzEncoder, Compression};
  use std::collections::BTreeMap;
  use std::io::Write;

  fn envelope_json(program: &Program<Scalar>, params: serde_json::Value) -> String {
    let mut wire_bytes = Vec::new();
    program.encode(&mut wire_bytes);
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&wire_bytes).unwrap();
    let bytecode =
      base64::engine::general_purpose::STANDARD.encode(encoder.finish().unwrap());

    serde_json::json!({
      "noir_version": "1.0.0",
      "hash": "12345",
      "abi": { "params": params },
      "bytecode": bytecode,
      "debug_symbols": "",
      "file_map": {},
      "expression_width": { "Bounded": { "width": 4 } },
    })
    .to_string()
  }

  fn one_witness_program() -> Program<Scalar> {
    Program {
      functions: vec![Circuit {
        name: "main".into(),
        current_witness_index: 0,
        opcodes: vec![],
        private_parameters: [Witness(0)].into_iter().collect(),
        public_parameters: WitnessTree::new(),
        return_values: WitnessTree::new(),
        assert_messages: BTreeMap::new(),
      }],
      unconstrained_functions: vec![],
    }
  }

  #[test]
  fn test_envelope_round_trip() {
    let json = envelope_json(
      &one_witness_program(),
      serde_json::json!([{ "name": "x", "visibility": "Private" }]),
    );
    let acir = Acir::<Scalar>::from_json(&json).unwrap();
    assert_eq!(acir.noir_version, "1.0.0");
    assert_eq!(acir.hash, 12345);
    assert_eq!(acir.program, one_witness_program());
    assert_eq!(
      acir.expression_width,
      ExpressionWidth::Bounded { width: 4 }
    );
  }

  #[test]
  fn test_minimal_circuit_compiles_to_one_secret_and_no_constraints() {
    let json = envelope_json(
      &one_witness_program(),
      serde_json::json!([{ "name": "x", "visibility": "Private" }]),
    );
    let acir = Acir::<Scalar>::from_json(&json).unwrap();

    let mut cs = R1csBuilder::new();
    let witness_map = acir.compile(&mut cs, None).unwrap();
    assert_eq!(witness_map.len(), 1);
    assert_eq!(cs.num_aux(), 1);
    assert_eq!(cs.num_inputs(), 1); // just the constant one
    assert_eq!(cs.num_constraints(), 0);
  }

  #[test]
  fn test_public_parameters_declared_first() {
    // main(x: public, y: private): x * y - w2 = 0 with one public input.
    let product = Expression::<Scalar> {
      mul_terms: vec![crate::expression::MulTerm {
        coefficient: FieldElement::one(),
        lhs: Witness(0),
        rhs: Witness(1),
      }],
      linear_combinations: vec![crate::expression::LinearTerm {
        coefficient: FieldElement::from_biguint(
          crate::field::modulus::<Scalar>() - num_bigint::BigUint::from(1u64),
        ),
        witness: Witness(2),
      }],
      constant: FieldElement::zero(),
    };
    let program = Program {
      functions: vec![Circuit {
        name: "main".into(),
        current_witness_index: 2,
        opcodes: vec![Opcode::Arithmetic(product)],
        private_parameters: [Witness(1)].into_iter().collect(),
        public_parameters: [Witness(0)].into_iter().collect(),
        return_values: [Witness(2)].into_iter().collect(),
        assert_messages: BTreeMap::new(),
      }],
      unconstrained_functions: vec![],
    };
    let json = envelope_json(
      &program,
      serde_json::json!([
        { "name": "x", "visibility": "Public" },
        { "name": "y", "visibility": "Private" },
      ]),
    );
    let acir = Acir::<Scalar>::from_json(&json).unwrap();

    let assignments: WitnessAssignments<Scalar> =
      [(Witness(0), Scalar::from(3u64)), (Witness(1), Scalar::from(5u64)), (Witness(2), Scalar::from(15u64))]
        .into_iter()
        .collect();
    let mut cs = R1csBuilder::new();
    acir.compile(&mut cs, Some(&assignments)).unwrap();
    // the public parameter landed in the input column block
    assert_eq!(cs.num_inputs(), 2);
    assert!(cs.is_sat().unwrap());

    // a wrong public value breaks the expression
    let mut wrong = assignments.clone();
    wrong.insert(Witness(2), Scalar::from(16u64));
    let mut cs = R1csBuilder::new();
    acir.compile(&mut cs, Some(&wrong)).unwrap();
    assert!(!cs.is_sat().unwrap());
  }

  #[test]
  fn test_malformed_envelope() {
    // missing fields, a mistyped field, a non-numeric hash, and garbage
    // bytecode all fail the same way
    let mut bad_hash: serde_json::Value =
      serde_json::from_str(&envelope_json(&one_witness_program(), serde_json::json!([])))
        .unwrap();
    bad_hash["hash"] = serde_json::json!("not a number");
    let mut bad_bytecode: serde_json::Value =
      serde_json::from_str(&envelope_json(&one_witness_program(), serde_json::json!([])))
        .unwrap();
    bad_bytecode["bytecode"] = serde_json::json!("!!! not base64 !!!");

    for json in [
      "{}".to_string(),
      r#"{"noir_version": 7}"#.to_string(),
      bad_hash.to_string(),
      bad_bytecode.to_string(),
    ] {
      assert!(matches!(
        Acir::<Scalar>::from_json(&json),
        Err(AcirError::MalformedEnvelope { .. })
      ));
    }
  }

  #[test]
  fn test_truncated_bytecode() {
    let mut wire_bytes = Vec::new();
    one_witness_program().encode(&mut wire_bytes);
    wire_bytes.truncate(wire_bytes.len() / 2);
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&wire_bytes).unwrap();
    let bytecode =
      base64::engine::general_purpose::STANDARD.encode(encoder.finish().unwrap());
    assert!(matches!(
      Acir::<Scalar>::decode_bytecode(&bytecode),
      Err(AcirError::TruncatedInput)
    ));
  }
}
