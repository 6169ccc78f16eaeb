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

//! Process-wide numeric tolerance configuration.
//!
//! Every approximate comparison and zero check in this crate reads an
//! ambient epsilon from this module: [`single`] holds the `f32` threshold,
//! [`double`] the `f64` one. The epsilon is global, mutable state — changing
//! it changes the outcome of comparisons everywhere in the process. Callers
//! that override it around a scoped computation must restore the previous
//! value themselves; [`single::ScopedEpsilon`]/[`double::ScopedEpsilon`]
//! do this on every exit path.

macro_rules! numeric_module {
    ($mod_name:ident, $t:ty, $atomic:ty, $default:expr, $doc:expr) => {
        #[doc = $doc]
        pub mod $mod_name {
            use std::sync::atomic::Ordering;

            static EPSILON_BITS: $atomic = <$atomic>::new(<$t>::to_bits($default));

            /// Returns the current ambient epsilon.
            #[inline]
            pub fn epsilon() -> $t {
                <$t>::from_bits(EPSILON_BITS.load(Ordering::Relaxed))
            }

            /// Replaces the ambient epsilon and returns the previous value.
            ///
            /// The change is visible to every comparison in the process.
            /// Prefer [`ScopedEpsilon`] when the override is temporary.
            #[inline]
            pub fn set_epsilon(epsilon: $t) -> $t {
                <$t>::from_bits(EPSILON_BITS.swap(epsilon.to_bits(), Ordering::Relaxed))
            }

            /// Determines whether `value` is zero within the ambient epsilon.
            #[inline]
            pub fn is_zero(value: $t) -> bool {
                is_zero_eps(value, epsilon())
            }

            /// Determines whether `value` is zero within `epsilon`.
            #[inline]
            pub fn is_zero_eps(value: $t, epsilon: $t) -> bool {
                -epsilon < value && value < epsilon
            }

            /// Determines whether `a` and `b` are equal within the ambient
            /// epsilon.
            ///
            /// The ambient epsilon is scaled by the magnitude of the
            /// operands, so the single threshold works across several
            /// orders of magnitude. NaN never compares equal to anything,
            /// including another NaN; equal infinities compare equal.
            #[inline]
            pub fn are_equal(a: $t, b: $t) -> bool {
                // Infinities (and exactly equal values) short-circuit here;
                // the scaled comparison below would produce inf - inf = NaN.
                if a == b {
                    return true;
                }
                let scaled = epsilon() * (a.abs() + b.abs() + 1.0);
                let delta = a - b;
                -scaled < delta && delta < scaled
            }

            /// Determines whether `a` and `b` differ by less than the
            /// absolute `epsilon`.
            ///
            /// Unlike [`are_equal`], the explicit epsilon is *not* scaled
            /// by the operand magnitudes. NaN never compares equal to
            /// anything, including another NaN; equal infinities compare
            /// equal.
            #[inline]
            pub fn are_equal_eps(a: $t, b: $t, epsilon: $t) -> bool {
                if a == b {
                    return true;
                }
                let delta = a - b;
                -epsilon < delta && delta < epsilon
            }

            /// RAII override of the ambient epsilon.
            ///
            /// Stores the previous epsilon on construction and restores it
            /// when dropped, on every exit path including panics.
            #[derive(Debug)]
            pub struct ScopedEpsilon {
                previous: $t,
            }

            impl ScopedEpsilon {
                /// Sets the ambient epsilon to `epsilon` until the guard is
                /// dropped.
                pub fn new(epsilon: $t) -> Self {
                    Self {
                        previous: set_epsilon(epsilon),
                    }
                }
            }

            impl Drop for ScopedEpsilon {
                fn drop(&mut self) {
                    set_epsilon(self.previous);
                }
            }
        }
    };
}

numeric_module!(
    single,
    f32,
    std::sync::atomic::AtomicU32,
    1.0e-5,
    "Tolerance thresholds for `f32` comparisons (default epsilon `1.0e-5`)."
);
numeric_module!(
    double,
    f64,
    std::sync::atomic::AtomicU64,
    1.0e-9,
    "Tolerance thresholds for `f64` comparisons (default epsilon `1.0e-9`)."
);
