// Copyright 2025 aster contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Aster Math
//!
//! Numerical foundations for real-time 3D: a generic root-finding framework
//! and a dual-precision quaternion algebra for representing and manipulating
//! rotations.
//!
//! The crate is organized into three independent layers:
//!
//! - [`numeric`] — process-wide, overridable tolerance thresholds used by
//!   every approximate comparison in the crate.
//! - [`analysis`] — iterative root finders (`f(x) = 0`) with well-defined
//!   convergence and divergence semantics.
//! - [`algebra`] — quaternions with their vector/matrix collaborators, in
//!   single ([`algebra::Quaternion`]) and double ([`algebra::DQuaternion`])
//!   precision.
//!
//! All angular quantities are in **radians**.

#![warn(missing_docs)]

pub mod algebra;
pub mod analysis;
mod error;
pub mod numeric;

pub use error::MathError;
