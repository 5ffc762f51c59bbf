// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Field and bit gadgets shared by the constraint emitters.

mod bits;
mod num;

pub use bits::{bits_to_num, num_to_bits_le, range_check, uint_and, uint_xor};
pub use num::{
  alloc_constant, enforce_equal, enforce_predicated_equal, is_zero, select,
};
