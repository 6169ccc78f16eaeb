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

//! 3D and 4D vector types in single and double precision.
//!
//! These are the geometric collaborators of the quaternion algebra; they
//! cover exactly the operations the rotation math needs and use the
//! tolerance service in [`crate::numeric`] for their zero checks.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

macro_rules! vec3_impl {
    ($name:ident, $t:ty, $num:ident, $type_doc:expr) => {
        #[doc = $type_doc]
        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            bytemuck::Pod,
            bytemuck::Zeroable,
            Serialize,
            Deserialize,
        )]
        #[repr(C)]
        pub struct $name {
            /// The x component of the vector.
            pub x: $t,
            /// The y component of the vector.
            pub y: $t,
            /// The z component of the vector.
            pub z: $t,
        }

        impl $name {
            /// A vector with all components set to `0.0`.
            pub const ZERO: Self = Self {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            };
            /// A vector with all components set to `1.0`.
            pub const ONE: Self = Self {
                x: 1.0,
                y: 1.0,
                z: 1.0,
            };
            /// The unit vector pointing along the positive X-axis.
            pub const X: Self = Self {
                x: 1.0,
                y: 0.0,
                z: 0.0,
            };
            /// The unit vector pointing along the positive Y-axis.
            pub const Y: Self = Self {
                x: 0.0,
                y: 1.0,
                z: 0.0,
            };
            /// The unit vector pointing along the positive Z-axis.
            pub const Z: Self = Self {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            };

            /// Creates a new vector with the specified components.
            #[inline]
            pub const fn new(x: $t, y: $t, z: $t) -> Self {
                Self { x, y, z }
            }

            /// Calculates the squared length (magnitude) of the vector.
            #[inline]
            pub fn length_squared(&self) -> $t {
                self.dot(*self)
            }

            /// Calculates the length (magnitude) of the vector.
            #[inline]
            pub fn length(&self) -> $t {
                self.length_squared().sqrt()
            }

            /// Returns a normalized version of the vector with a length
            /// of 1, or [`Self::ZERO`] if the length is numerically zero.
            #[inline]
            pub fn normalize(&self) -> Self {
                let length = self.length();
                if crate::numeric::$num::is_zero(length) {
                    Self::ZERO
                } else {
                    *self * (1.0 / length)
                }
            }

            /// Calculates the dot product of this vector and another.
            #[inline]
            pub fn dot(&self, other: Self) -> $t {
                self.x * other.x + self.y * other.y + self.z * other.z
            }

            /// Computes the cross product of this vector and another.
            #[inline]
            pub fn cross(&self, other: Self) -> Self {
                Self {
                    x: self.y * other.z - self.z * other.y,
                    y: self.z * other.x - self.x * other.z,
                    z: self.x * other.y - self.y * other.x,
                }
            }

            /// Determines whether the length of the vector is zero within
            /// the ambient tolerance.
            #[inline]
            pub fn is_numerically_zero(&self) -> bool {
                crate::numeric::$num::is_zero(self.length())
            }

            /// Determines whether two vectors are equal within the ambient
            /// tolerance, component-wise.
            #[inline]
            pub fn are_numerically_equal(a: Self, b: Self) -> bool {
                crate::numeric::$num::are_equal(a.x, b.x)
                    && crate::numeric::$num::are_equal(a.y, b.y)
                    && crate::numeric::$num::are_equal(a.z, b.z)
            }

            /// Returns a deterministic unit vector perpendicular to this
            /// one.
            ///
            /// The component swap is chosen by the largest of `|x|` and
            /// `|z|`, so equal inputs always yield the same perpendicular.
            /// The input must not be the zero vector.
            #[inline]
            pub fn orthonormal(&self) -> Self {
                let v = if self.x.abs() > self.z.abs() {
                    Self::new(-self.y, self.x, 0.0)
                } else {
                    Self::new(0.0, -self.z, self.y)
                };
                v.normalize()
            }
        }

        impl Default for $name {
            /// Returns the zero vector.
            #[inline]
            fn default() -> Self {
                Self::ZERO
            }
        }

        impl Add for $name {
            type Output = Self;
            /// Adds two vectors component-wise.
            #[inline]
            fn add(self, rhs: Self) -> Self::Output {
                Self {
                    x: self.x + rhs.x,
                    y: self.y + rhs.y,
                    z: self.z + rhs.z,
                }
            }
        }

        impl Sub for $name {
            type Output = Self;
            /// Subtracts two vectors component-wise.
            #[inline]
            fn sub(self, rhs: Self) -> Self::Output {
                Self {
                    x: self.x - rhs.x,
                    y: self.y - rhs.y,
                    z: self.z - rhs.z,
                }
            }
        }

        impl Mul<$t> for $name {
            type Output = Self;
            /// Multiplies the vector by a scalar.
            #[inline]
            fn mul(self, rhs: $t) -> Self::Output {
                Self {
                    x: self.x * rhs,
                    y: self.y * rhs,
                    z: self.z * rhs,
                }
            }
        }

        impl Mul<$name> for $t {
            type Output = $name;
            /// Multiplies the vector by a scalar.
            #[inline]
            fn mul(self, rhs: $name) -> Self::Output {
                rhs * self
            }
        }

        impl Div<$t> for $name {
            type Output = Self;
            /// Divides the vector by a scalar.
            #[inline]
            fn div(self, rhs: $t) -> Self::Output {
                Self {
                    x: self.x / rhs,
                    y: self.y / rhs,
                    z: self.z / rhs,
                }
            }
        }

        impl Neg for $name {
            type Output = Self;
            /// Negates all components of the vector.
            #[inline]
            fn neg(self) -> Self::Output {
                Self {
                    x: -self.x,
                    y: -self.y,
                    z: -self.z,
                }
            }
        }
    };
}

vec3_impl!(Vec3, f32, single, "A 3-dimensional vector with `f32` components.");
vec3_impl!(DVec3, f64, double, "A 3-dimensional vector with `f64` components.");

impl From<DVec3> for Vec3 {
    /// Truncates each component to `f32`, with no rescaling.
    #[inline]
    fn from(v: DVec3) -> Self {
        Self::new(v.x as f32, v.y as f32, v.z as f32)
    }
}

impl From<Vec3> for DVec3 {
    /// Widens each component to `f64`, with no rescaling.
    #[inline]
    fn from(v: Vec3) -> Self {
        Self::new(v.x as f64, v.y as f64, v.z as f64)
    }
}

macro_rules! vec4_impl {
    ($name:ident, $t:ty, $vec3:ident, $type_doc:expr) => {
        #[doc = $type_doc]
        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            bytemuck::Pod,
            bytemuck::Zeroable,
            Serialize,
            Deserialize,
        )]
        #[repr(C)]
        pub struct $name {
            /// The x component of the vector.
            pub x: $t,
            /// The y component of the vector.
            pub y: $t,
            /// The z component of the vector.
            pub z: $t,
            /// The w component of the vector.
            pub w: $t,
        }

        impl $name {
            /// The unit vector pointing along the positive X-axis.
            pub const X: Self = Self::new(1.0, 0.0, 0.0, 0.0);
            /// The unit vector pointing along the positive Y-axis.
            pub const Y: Self = Self::new(0.0, 1.0, 0.0, 0.0);
            /// The unit vector pointing along the positive Z-axis.
            pub const Z: Self = Self::new(0.0, 0.0, 1.0, 0.0);
            /// The unit vector pointing along the positive W-axis.
            pub const W: Self = Self::new(0.0, 0.0, 0.0, 1.0);

            /// Creates a new vector with the specified components.
            #[inline]
            pub const fn new(x: $t, y: $t, z: $t, w: $t) -> Self {
                Self { x, y, z, w }
            }

            /// Creates a 4D vector from a 3D vector and a `w` component.
            #[inline]
            pub fn from_vec3(v: $vec3, w: $t) -> Self {
                Self::new(v.x, v.y, v.z, w)
            }

            /// Drops the `w` component.
            #[inline]
            pub fn truncate(&self) -> $vec3 {
                $vec3::new(self.x, self.y, self.z)
            }
        }

        impl Add for $name {
            type Output = Self;
            /// Adds two vectors component-wise.
            #[inline]
            fn add(self, rhs: Self) -> Self::Output {
                Self {
                    x: self.x + rhs.x,
                    y: self.y + rhs.y,
                    z: self.z + rhs.z,
                    w: self.w + rhs.w,
                }
            }
        }

        impl Mul<$t> for $name {
            type Output = Self;
            /// Multiplies the vector by a scalar.
            #[inline]
            fn mul(self, rhs: $t) -> Self::Output {
                Self {
                    x: self.x * rhs,
                    y: self.y * rhs,
                    z: self.z * rhs,
                    w: self.w * rhs,
                }
            }
        }
    };
}

vec4_impl!(Vec4, f32, Vec3, "A 4-dimensional vector with `f32` components.");
vec4_impl!(DVec4, f64, DVec3, "A 4-dimensional vector with `f64` components.");
