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

//! Iterative root finding: solve `f(x) = 0` inside a bracket.
//!
//! Callers construct a solver from their scalar function (and, for
//! derivative-based strategies, its derivative) and call
//! [`RootFinder::find_root`] with the bracket bounds. Non-convergence is a
//! normal, expected outcome reported as a NaN root in [`RootResult`], never
//! as an error or a panic.

mod bisection;
mod newton_raphson;

pub use bisection::{Bisection, DBisection};
pub use newton_raphson::{DNewtonRaphson, NewtonRaphson};

/// Outcome of a single [`RootFinder::find_root`] call.
///
/// The iteration count lives here rather than on the solver, so a solver
/// instance carries no per-run mutable state and is safe to share between
/// concurrent solves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootResult<T> {
    /// The `x` with `f(x) = 0`, or NaN if no root was found.
    pub root: T,
    /// Number of solver iterations performed. Zero when a bracket bound was
    /// already a root.
    pub iterations: u32,
}

macro_rules! root_result_impl {
    ($t:ty) => {
        impl RootResult<$t> {
            pub(crate) fn found(root: $t, iterations: u32) -> Self {
                Self { root, iterations }
            }

            pub(crate) fn not_found(iterations: u32) -> Self {
                Self {
                    root: <$t>::NAN,
                    iterations,
                }
            }

            /// Returns `true` if a root was found (the root is not NaN).
            #[inline]
            pub fn is_found(&self) -> bool {
                !self.root.is_nan()
            }
        }
    };
}

root_result_impl!(f32);
root_result_impl!(f64);

/// Shared configuration of the root-finding strategies.
///
/// `epsilon_x` and `epsilon_y` default to the ambient epsilon of the
/// matching precision in [`crate::numeric`], read at solve time, so a
/// scoped tolerance override affects solvers configured with the defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions<T> {
    /// Maximum number of iterations before the solver gives up.
    pub max_iterations: u32,
    /// Convergence threshold on the step size `dx`; `None` reads the
    /// ambient epsilon at solve time.
    pub epsilon_x: Option<T>,
    /// Convergence threshold on the function value `f(x)`; `None` reads the
    /// ambient epsilon at solve time.
    pub epsilon_y: Option<T>,
}

impl<T> Default for SolverOptions<T> {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            epsilon_x: None,
            epsilon_y: None,
        }
    }
}

/// A bracketing root-finding strategy.
///
/// Implementations are synchronous and take `&self`: all per-run state is
/// local to the call, so one solver may serve several threads at once.
pub trait RootFinder<T> {
    /// Finds an `x` in the closed interval between `x0` and `x1` (the
    /// bounds need not be ordered) such that `f(x) = 0`.
    ///
    /// The function must be evaluable at both bounds. A bound whose
    /// function value is already within `epsilon_y` of zero is returned
    /// immediately without iterating.
    fn find_root(&self, x0: T, x1: T) -> RootResult<T>;
}
