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

//! Root finding with the Newton-Raphson method.

use super::{RootFinder, RootResult, SolverOptions};

macro_rules! newton_raphson_impl {
    ($name:ident, $t:ty, $num:ident, $type_doc:expr) => {
        #[doc = $type_doc]
        ///
        /// In addition to the function `f(x)` this strategy needs a second
        /// function computing the derivative `f'(x)`. Starting from the
        /// bracket midpoint, each iteration steps by `f(x) / f'(x)`. The
        /// run converges when `f(x)` is within `epsilon_y` of zero or the
        /// step is within `epsilon_x` of zero, and diverges (NaN result)
        /// when the estimate leaves the original bracket or the iteration
        /// budget runs out.
        ///
        /// A zero or non-finite derivative produces a non-finite step; the
        /// bracket-exit check treats the resulting estimate as having left
        /// the bracket, so such runs end in the NaN sentinel rather than an
        /// arithmetic fault.
        pub struct $name {
            function: Box<dyn Fn($t) -> $t>,
            derivative: Box<dyn Fn($t) -> $t>,
            options: SolverOptions<$t>,
        }

        impl $name {
            /// Creates a solver for `function` with derivative `derivative`
            /// and default [`SolverOptions`].
            pub fn new(
                function: Box<dyn Fn($t) -> $t>,
                derivative: Box<dyn Fn($t) -> $t>,
            ) -> Self {
                Self::with_options(function, derivative, SolverOptions::default())
            }

            /// Creates a solver with explicit [`SolverOptions`].
            pub fn with_options(
                function: Box<dyn Fn($t) -> $t>,
                derivative: Box<dyn Fn($t) -> $t>,
                options: SolverOptions<$t>,
            ) -> Self {
                Self {
                    function,
                    derivative,
                    options,
                }
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

                // Initial guess: the bracket midpoint.
                let mut x = (x0 + x1) / 2.0;
                let mut iterations = 0;

                for _ in 0..self.options.max_iterations {
                    iterations += 1;

                    let y = (self.function)(x);
                    let dy = (self.derivative)(x);
                    let dx = y / dy;

                    // Stop if x is the result or if the step size dx is
                    // negligible.
                    if crate::numeric::$num::is_zero_eps(y, epsilon_y)
                        || crate::numeric::$num::is_zero_eps(dx, epsilon_x)
                    {
                        return RootResult::<$t>::found(x, iterations);
                    }

                    x -= dx;
                    if (x0 - x) * (x - x1) < 0.0 {
                        // We have left the original bracket.
                        log::trace!(
                            "newton-raphson diverged after {iterations} iterations: \
                             x = {x} left the bracket [{x0}, {x1}]"
                        );
                        return RootResult::<$t>::not_found(iterations);
                    }
                }

                log::trace!(
                    "newton-raphson did not converge within {} iterations",
                    self.options.max_iterations
                );
                RootResult::<$t>::not_found(iterations)
            }
        }
    };
}

newton_raphson_impl!(
    NewtonRaphson,
    f32,
    single,
    "Finds roots using the Newton-Raphson method (single precision)."
);
newton_raphson_impl!(
    DNewtonRaphson,
    f64,
    double,
    "Finds roots using the Newton-Raphson method (double precision)."
);
