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

//! 3x3 and 4x4 rotation matrices in single and double precision.
//!
//! Column-major, like the rest of the algebra module. These types exist as
//! the conversion targets and consistency oracles of the quaternion
//! algebra; general matrix arithmetic is out of scope.

use super::vector::{DVec3, DVec4, Vec3, Vec4};
use std::ops::Mul;

macro_rules! mat3_impl {
    ($name:ident, $t:ty, $vec3:ident, $mat4:ident, $vec4:ident, $type_doc:expr) => {
        #[doc = $type_doc]
        ///
        /// `cols[0]` is the image of the X-axis, and so on.
        #[derive(Debug, Clone, Copy, PartialEq)]
        #[repr(C)]
        pub struct $name {
            /// The columns of the matrix.
            pub cols: [$vec3; 3],
        }

        impl $name {
            /// The 3x3 identity matrix.
            pub const IDENTITY: Self = Self {
                cols: [$vec3::X, $vec3::Y, $vec3::Z],
            };

            /// Creates a new matrix from three column vectors.
            #[inline]
            pub fn from_cols(c0: $vec3, c1: $vec3, c2: $vec3) -> Self {
                Self { cols: [c0, c1, c2] }
            }

            /// Creates a rotation matrix from a normalized axis and an
            /// angle in radians.
            ///
            /// # Arguments
            ///
            /// * `axis`: The axis of rotation. Must be a unit vector.
            /// * `angle_radians`: The angle of rotation in radians.
            #[inline]
            pub fn from_axis_angle(axis: $vec3, angle_radians: $t) -> Self {
                let (s, c) = angle_radians.sin_cos();
                let t = 1.0 - c;
                let x = axis.x;
                let y = axis.y;
                let z = axis.z;
                Self {
                    cols: [
                        $vec3::new(t * x * x + c, t * x * y + s * z, t * x * z - s * y),
                        $vec3::new(t * y * x - s * z, t * y * y + c, t * y * z + s * x),
                        $vec3::new(t * z * x + s * y, t * z * y - s * x, t * z * z + c),
                    ],
                }
            }

            /// Returns the transpose of the matrix, where rows and columns
            /// are swapped.
            #[inline]
            pub fn transpose(&self) -> Self {
                Self::from_cols(
                    $vec3::new(self.cols[0].x, self.cols[1].x, self.cols[2].x),
                    $vec3::new(self.cols[0].y, self.cols[1].y, self.cols[2].y),
                    $vec3::new(self.cols[0].z, self.cols[1].z, self.cols[2].z),
                )
            }

            /// Converts this matrix into a 4x4 matrix, preserving its
            /// values in the upper-left corner. The new fourth column and
            /// row are set to `(0, 0, 0, 1)`.
            #[inline]
            pub fn to_mat4(&self) -> $mat4 {
                $mat4::from_cols(
                    $vec4::from_vec3(self.cols[0], 0.0),
                    $vec4::from_vec3(self.cols[1], 0.0),
                    $vec4::from_vec3(self.cols[2], 0.0),
                    $vec4::W,
                )
            }
        }

        impl Default for $name {
            /// Returns the 3x3 identity matrix.
            #[inline]
            fn default() -> Self {
                Self::IDENTITY
            }
        }

        impl Mul<$vec3> for $name {
            type Output = $vec3;
            /// Transforms a vector by this matrix.
            #[inline]
            fn mul(self, rhs: $vec3) -> Self::Output {
                self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z
            }
        }

        impl Mul<$name> for $name {
            type Output = Self;
            /// Multiplies this matrix by another.
            #[inline]
            fn mul(self, rhs: $name) -> Self::Output {
                Self::from_cols(self * rhs.cols[0], self * rhs.cols[1], self * rhs.cols[2])
            }
        }
    };
}

mat3_impl!(
    Mat3,
    f32,
    Vec3,
    Mat4,
    Vec4,
    "A 3x3 column-major rotation matrix with `f32` components."
);
mat3_impl!(
    DMat3,
    f64,
    DVec3,
    DMat4,
    DVec4,
    "A 3x3 column-major rotation matrix with `f64` components."
);

macro_rules! mat4_impl {
    ($name:ident, $vec4:ident, $type_doc:expr) => {
        #[doc = $type_doc]
        #[derive(Debug, Clone, Copy, PartialEq)]
        #[repr(C)]
        pub struct $name {
            /// The columns of the matrix.
            pub cols: [$vec4; 4],
        }

        impl $name {
            /// The 4x4 identity matrix.
            pub const IDENTITY: Self = Self {
                cols: [$vec4::X, $vec4::Y, $vec4::Z, $vec4::W],
            };

            /// Creates a new matrix from four column vectors.
            #[inline]
            pub fn from_cols(c0: $vec4, c1: $vec4, c2: $vec4, c3: $vec4) -> Self {
                Self {
                    cols: [c0, c1, c2, c3],
                }
            }
        }

        impl Default for $name {
            /// Returns the 4x4 identity matrix.
            #[inline]
            fn default() -> Self {
                Self::IDENTITY
            }
        }

        impl Mul<$vec4> for $name {
            type Output = $vec4;
            /// Transforms a vector by this matrix.
            #[inline]
            fn mul(self, rhs: $vec4) -> Self::Output {
                self.cols[0] * rhs.x
                    + self.cols[1] * rhs.y
                    + self.cols[2] * rhs.z
                    + self.cols[3] * rhs.w
            }
        }
    };
}

mat4_impl!(Mat4, Vec4, "A 4x4 column-major matrix with `f32` components.");
mat4_impl!(DMat4, DVec4, "A 4x4 column-major matrix with `f64` components.");
