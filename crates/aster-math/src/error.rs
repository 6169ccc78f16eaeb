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

//! Error types shared by the mathematics modules.

use thiserror::Error;

/// Failure of a single mathematical operation.
///
/// The variants separate caller mistakes ([`MathError::InvalidArgument`])
/// from mathematics-domain failures that a caller may want to treat as
/// recoverable (e.g. skip one frame's rotation update instead of crashing).
/// Non-convergence of a root finder is deliberately *not* an error; it is
/// reported as a NaN sentinel in
/// [`RootResult`](crate::analysis::RootResult).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    /// A required argument was malformed (e.g. a zero-length direction
    /// vector where a direction is required).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The operation is undefined for the given value (e.g. inverting the
    /// zero quaternion, taking the logarithm of a non-unit quaternion).
    #[error("mathematics domain error: {0}")]
    Domain(&'static str),

    /// The operation would divide by zero (e.g. normalizing the zero
    /// quaternion). Kept distinct from [`MathError::Domain`] so callers can
    /// tell orientation-specific misuse apart from a plain zero divisor.
    #[error("division by zero: {0}")]
    DivideByZero(&'static str),
}
