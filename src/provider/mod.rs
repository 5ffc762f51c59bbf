// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Field providers for the supported proving curve.

/// Re-exports that give access to the standard aliases used in the code base,
/// for bn254 (also known as bn256 or alt_bn128). The ACIR artifacts this
/// library consumes are emitted over this curve's scalar field.
pub mod bn254 {
  pub use halo2curves::bn256::{Fq as Base, Fr as Scalar};
}
