// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Envelope metadata: the ABI parameter list and the expression-width hint.
//!
//! Only parameter visibility flows into compilation (public parameters are
//! declared ahead of all secret variables); everything else rides along as
//! metadata.
use serde::{Deserialize, Serialize};

/// The ABI block of an ACIR artifact.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abi {
  /// Circuit parameters in declaration order.
  #[serde(default)]
  pub params: Vec<AbiParameter>,
}

/// A single ABI parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParameter {
  /// The parameter name as written in the source program.
  pub name: String,
  /// Whether the parameter is part of the public statement.
  pub visibility: Visibility,
}

/// Visibility of an ABI parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
  /// The parameter is a public input of the statement.
  #[serde(alias = "public")]
  Public,
  /// The parameter is a private input known only to the prover.
  #[serde(alias = "private")]
  Private,
}

/// The maximum fan-in the expressions in the bytecode were compiled for.
///
/// Unbounded widths are the natural fit for an R1CS target; bounded widths
/// arrive from PLONK-oriented pipelines. The value is retained as a hint and
/// not consumed by emission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpressionWidth {
  /// No fan-in bound.
  #[default]
  Unbounded,
  /// Expressions were bounded to the given width.
  Bounded {
    /// The maximum number of terms per expression.
    width: u64,
  },
}
