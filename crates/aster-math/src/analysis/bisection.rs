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

//! Root finding with the bisection method.

use super::{RootFinder, RootResult, SolverOptions};

macro_rules! bisection_impl {
    ($name:ident, $t:ty, $num:ident, $type_doc:expr) => {
        #[doc = $type_doc]
        ///
        /// This strategy only needs the function `f(x)` itself, but it
        /// requires the bracket to actually straddle a sign change:
        /// when `f(x0)` and `f(x1)` have the same sign the solver reports
        /// "no root found" (NaN) without iterating. Each iteration halves
        /// the interval, keeping the half across which the sign changes,
        /// until `f(x)` is within `epsilon_y` of zero or the half-step is
        /// within `epsilon_x` of zero.
        pub struct $name {
            function: Box<dyn Fn($t) -> $t>,
            options: SolverOptions<$t>,
        }

        impl $name {
            /// Creates a solver for `function` with default
            /// [`SolverOptions`].
            pub fn new(function: Box<dyn Fn($t) -> $t>) -> Self {
                Self::with_options(function, SolverOptions::default())
            }

            /// Creates a solver with explicit [`SolverOptions`].
            pub fn with_options(
                function: Box<dyn Fn($t) -> $t>,
                options: SolverOptions<$t>,
            ) -> Self {
                Self { function, options }
            }
        }

        impl RootFinder<$t> for $name {
            fn find_root(&self, x0: $t, x1: $t) -> RootResult<$t> {
                let epsilon_x = self
                    .options
                    .epsilon_x
                    .unwrap_or_else(crate::numeric::$num::epsilon);
                let epsilon_y = self
                    .options
                    .epsilon_y
                    .unwrap_or_else(crate::numeric::$num::epsilon);

                let y_low = (self.function)(x0);
                let y_high = (self.function)(x1);

                // Is one of the bounds the solution?
                if crate::numeric::$num::is_zero_eps(y_low, epsilon_y) {
                    return RootResult::<$t>::found(x0, 0);
                }
                if crate::numeric::$num::is_zero_eps(y_high, epsilon_y) {
                    return RootResult::<$t>::found(x1, 0);
                }

                if y_low * y_high > 0.0 {
                    // No sign change across the bracket.
                    log::trace!(
                        "bisection: f({x0}) and f({x1}) have the same sign, \
                         no bracketed root"
                    );
                    return RootResult::<$t>::not_found(0);
                }

                // Orient the search so that x tracks the f < 0 side.
                let (mut x, mut dx) = if y_low < 0.0 {
                    (x0, x1 - x0)
                } else {
                    (x1, x0 - x1)
                };

                let mut iterations = 0;
                for _ in 0..self.options.max_iterations {
                    iterations += 1;

                    dx *= 0.5;
                    let x_mid = x + dx;
                    let y_mid = (self.function)(x_mid);
                    if y_mid <= 0.0 {
                        x = x_mid;
                    }

                    if crate::numeric::$num::is_zero_eps(y_mid, epsilon_y)
                        || crate::numeric::$num::is_zero_eps(dx, epsilon_x)
                    {
                        return RootResult::<$t>::found(x_mid, iterations);
                    }
                }

                log::trace!(
                    "bisection did not converge within {} iterations",
                    self.options.max_iterations
                );
                RootResult::<$t>::not_found(iterations)
            }
        }
    };
}

bisection_impl!(
    Bisection,
    f32,
    single,
    "Finds roots using the bisection method (single precision)."
);
bisection_impl!(
    DBisection,
    f64,
    double,
    "Finds roots using the bisection method (double precision)."
);
