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

//! Quaternion types for representing 3D rotations, in single and double
//! precision.
//!
//! A quaternion is stored as `(w, x, y, z)` where `w` is the scalar part
//! and `(x, y, z)` the vector part. Rotation-semantic operations (`rotate`,
//! `to_rotation_matrix33`) assume a *unit* quaternion and silently produce
//! scaled results otherwise; only [`Quaternion::inverse`] and the
//! normalization family guard against the zero quaternion. A quaternion and
//! its negation encode the same spatial rotation ("double cover");
//! [`Quaternion::angle_between`] canonicalizes this.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::matrix::{DMat3, DMat4, Mat3, Mat4};
use super::vector::{DVec3, Vec3};
use crate::MathError;
use std::ops::{Add, Div, Index, IndexMut, Mul, MulAssign, Neg, Sub};

/// Failure to parse a quaternion from its string form.
///
/// The only accepted layout is `"(w; (x; y; z))"`, with arbitrary interior
/// whitespace. Kept separate from [`MathError`] so callers can distinguish
/// malformed input from mathematical misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid quaternion literal: expected \"(w; (x; y; z))\"")]
pub struct ParseQuaternionError;

macro_rules! quaternion_impl {
    ($name:ident, $t:ty, $vec3:ident, $mat3:ident, $mat4:ident, $num:ident,
     $pi:expr, $type_doc:expr) => {
        #[doc = $type_doc]
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            bytemuck::Pod,
            bytemuck::Zeroable,
            Serialize,
            Deserialize,
        )]
        #[repr(C)]
        pub struct $name {
            /// The scalar (real) part.
            pub w: $t,
            /// The x component of the vector part.
            pub x: $t,
            /// The y component of the vector part.
            pub y: $t,
            /// The z component of the vector part.
            pub z: $t,
        }

        impl $name {
            /// The zero quaternion. Not a valid rotation.
            pub const ZERO: Self = Self {
                w: 0.0,
                x: 0.0,
                y: 0.0,
                z: 0.0,
            };

            /// The identity quaternion, representing no rotation.
            pub const IDENTITY: Self = Self {
                w: 1.0,
                x: 0.0,
                y: 0.0,
                z: 0.0,
            };

            /// Creates a new quaternion from its raw components.
            ///
            /// This does not guarantee a unit quaternion. For creating
            /// rotations, prefer [`Self::from_axis_angle`] or another
            /// rotation-specific constructor.
            #[inline]
            pub const fn new(w: $t, x: $t, y: $t, z: $t) -> Self {
                Self { w, x, y, z }
            }

            /// Creates a quaternion from a scalar part and a vector part.
            #[inline]
            pub fn from_scalar_vector(w: $t, v: $vec3) -> Self {
                Self::new(w, v.x, v.y, v.z)
            }

            /// Creates a quaternion from an ordered `w, x, y, z` slice.
            ///
            /// # Panics
            ///
            /// Panics if the slice holds fewer than 4 elements.
            #[inline]
            pub fn from_slice(components: &[$t]) -> Self {
                Self::new(
                    components[0],
                    components[1],
                    components[2],
                    components[3],
                )
            }

            /// Builds the rotation quaternion for a *unit* axis.
            #[inline]
            fn from_unit_axis_angle(axis: $vec3, angle: $t) -> Self {
                let (s, c) = (angle * 0.5).sin_cos();
                Self::new(c, axis.x * s, axis.y * s, axis.z * s)
            }

            /// Creates a quaternion representing a rotation around `axis`
            /// by `angle` radians.
            ///
            /// The axis does not need to be normalized, but it must not be
            /// the zero vector ([`MathError::Domain`]).
            pub fn from_axis_angle(axis: $vec3, angle: $t) -> Result<Self, MathError> {
                if axis.is_numerically_zero() {
                    return Err(MathError::Domain(
                        "rotation axis must not be the zero vector",
                    ));
                }
                Ok(Self::from_unit_axis_angle(axis.normalize(), angle))
            }

            /// Creates a rotation around the X-axis by `angle` radians.
            #[inline]
            pub fn from_rotation_x(angle: $t) -> Self {
                let (s, c) = (angle * 0.5).sin_cos();
                Self::new(c, s, 0.0, 0.0)
            }

            /// Creates a rotation around the Y-axis by `angle` radians.
            #[inline]
            pub fn from_rotation_y(angle: $t) -> Self {
                let (s, c) = (angle * 0.5).sin_cos();
                Self::new(c, 0.0, s, 0.0)
            }

            /// Creates a rotation around the Z-axis by `angle` radians.
            #[inline]
            pub fn from_rotation_z(angle: $t) -> Self {
                let (s, c) = (angle * 0.5).sin_cos();
                Self::new(c, 0.0, 0.0, s)
            }

            /// Creates a quaternion from a 3x3 rotation matrix.
            ///
            /// Uses the trace-based extraction with the classical
            /// largest-diagonal-term fallback, so the division stays away
            /// from small numbers when the trace is near zero or negative.
            pub fn from_mat3(m: &$mat3) -> Self {
                let m00 = m.cols[0].x;
                let m10 = m.cols[0].y;
                let m20 = m.cols[0].z;
                let m01 = m.cols[1].x;
                let m11 = m.cols[1].y;
                let m21 = m.cols[1].z;
                let m02 = m.cols[2].x;
                let m12 = m.cols[2].y;
                let m22 = m.cols[2].z;

                let trace = m00 + m11 + m22;
                if trace > 0.0 {
                    let s = 2.0 * (trace + 1.0).sqrt();
                    Self::new(0.25 * s, (m21 - m12) / s, (m02 - m20) / s, (m10 - m01) / s)
                } else if m00 > m11 && m00 > m22 {
                    let s = 2.0 * (1.0 + m00 - m11 - m22).sqrt();
                    Self::new((m21 - m12) / s, 0.25 * s, (m01 + m10) / s, (m02 + m20) / s)
                } else if m11 > m22 {
                    let s = 2.0 * (1.0 + m11 - m00 - m22).sqrt();
                    Self::new((m02 - m20) / s, (m01 + m10) / s, 0.25 * s, (m12 + m21) / s)
                } else {
                    let s = 2.0 * (1.0 + m22 - m00 - m11).sqrt();
                    Self::new((m10 - m01) / s, (m02 + m20) / s, (m12 + m21) / s, 0.25 * s)
                }
            }

            /// Creates the rotation that takes the direction of `start` to
            /// the direction of `end`.
            ///
            /// Equal directions yield the identity; anti-parallel
            /// directions rotate by half a turn around a deterministic
            /// perpendicular axis. Either input being the zero vector is
            /// an [`MathError::InvalidArgument`].
            pub fn rotation_from_to(start: $vec3, end: $vec3) -> Result<Self, MathError> {
                if start.is_numerically_zero() || end.is_numerically_zero() {
                    return Err(MathError::InvalidArgument(
                        "rotation directions must not have zero length",
                    ));
                }

                let s = start.normalize();
                let e = end.normalize();
                let axis = s.cross(e);
                let cos_angle = s.dot(e).clamp(-1.0, 1.0);

                if axis.is_numerically_zero() {
                    if cos_angle > 0.0 {
                        Ok(Self::IDENTITY)
                    } else {
                        Ok(Self::from_unit_axis_angle(s.orthonormal(), $pi))
                    }
                } else {
                    Ok(Self::from_unit_axis_angle(axis.normalize(), cos_angle.acos()))
                }
            }

            /// Composes three single-axis rotations.
            ///
            /// With `use_global_axes == false` the factors compose as
            /// `R1 * R2 * R3` (each subsequent rotation is about the
            /// already-rotated, local axes); with `true` they compose as
            /// `R3 * R2 * R1` (all axes fixed in the global frame). The
            /// two orders generally produce different orientations.
            #[allow(clippy::too_many_arguments)]
            pub fn from_rotation_triple(
                angle1: $t,
                axis1: $vec3,
                angle2: $t,
                axis2: $vec3,
                angle3: $t,
                axis3: $vec3,
                use_global_axes: bool,
            ) -> Result<Self, MathError> {
                let q1 = Self::from_axis_angle(axis1, angle1)?;
                let q2 = Self::from_axis_angle(axis2, angle2)?;
                let q3 = Self::from_axis_angle(axis3, angle3)?;
                if use_global_axes {
                    Ok(q3 * q2 * q1)
                } else {
                    Ok(q1 * q2 * q3)
                }
            }

            /// Returns the vector part `(x, y, z)`.
            #[inline]
            pub fn v(&self) -> $vec3 {
                $vec3::new(self.x, self.y, self.z)
            }

            /// Replaces the vector part, leaving `w` untouched.
            #[inline]
            pub fn set_v(&mut self, v: $vec3) {
                self.x = v.x;
                self.y = v.y;
                self.z = v.z;
            }

            /// Returns the rotation angle in `[0, 2π]`.
            ///
            /// When the vector part has numerically collapsed to zero the
            /// angle is exactly `0`, never an indeterminate value derived
            /// from a tiny axis.
            pub fn angle(&self) -> $t {
                let sin_half = self.v().length();
                if crate::numeric::$num::is_zero(sin_half) {
                    0.0
                } else {
                    2.0 * sin_half.atan2(self.w)
                }
            }

            /// Sets the rotation angle, preserving the current axis.
            ///
            /// The quaternion is fully rebuilt from `(axis, angle)`; when
            /// the current axis is degenerate (identity-like quaternion)
            /// there is no axis to rotate about and the value is left
            /// unchanged.
            pub fn set_angle(&mut self, angle: $t) {
                let axis = self.axis();
                if axis != $vec3::ZERO {
                    *self = Self::from_unit_axis_angle(axis, angle);
                }
            }

            /// Returns the normalized rotation axis, or the zero vector
            /// when the vector part is numerically zero (e.g. identity).
            pub fn axis(&self) -> $vec3 {
                let v = self.v();
                if v.is_numerically_zero() {
                    $vec3::ZERO
                } else {
                    v.normalize()
                }
            }

            /// Sets the rotation axis, preserving the current angle.
            ///
            /// The quaternion is fully rebuilt from `(axis, angle)`.
            /// Setting the zero axis resets to [`Self::IDENTITY`].
            pub fn set_axis(&mut self, axis: $vec3) {
                if axis.is_numerically_zero() {
                    *self = Self::IDENTITY;
                } else {
                    *self = Self::from_unit_axis_angle(axis.normalize(), self.angle());
                }
            }

            /// Calculates the squared length (magnitude) of the quaternion.
            #[inline]
            pub fn magnitude_squared(&self) -> $t {
                self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
            }

            /// Calculates the length (magnitude) of the quaternion.
            #[inline]
            pub fn magnitude(&self) -> $t {
                self.magnitude_squared().sqrt()
            }

            /// Computes the dot product of two quaternions.
            #[inline]
            pub fn dot(&self, other: Self) -> $t {
                self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
            }

            /// Determines whether the magnitude is 1 within the ambient
            /// tolerance.
            #[inline]
            pub fn is_numerically_normalized(&self) -> bool {
                crate::numeric::$num::are_equal(self.magnitude(), 1.0)
            }

            /// Determines whether any component is NaN.
            #[inline]
            pub fn is_nan(&self) -> bool {
                self.w.is_nan() || self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
            }

            /// Computes the conjugate, which negates the vector part.
            ///
            /// For a unit quaternion the conjugate is the inverse rotation.
            #[inline]
            pub fn conjugate(&self) -> Self {
                Self::new(self.w, -self.x, -self.y, -self.z)
            }

            /// Conjugates this quaternion in place.
            #[inline]
            pub fn conjugate_mut(&mut self) {
                *self = self.conjugate();
            }

            /// Computes the multiplicative inverse.
            ///
            /// For a unit quaternion the inverse equals the conjugate; in
            /// general the conjugate is divided by the squared magnitude.
            /// The zero quaternion has no inverse ([`MathError::Domain`]).
            pub fn inverse(&self) -> Result<Self, MathError> {
                let norm_squared = self.magnitude_squared();
                if crate::numeric::$num::is_zero(norm_squared) {
                    return Err(MathError::Domain("the zero quaternion has no inverse"));
                }
                Ok(self.conjugate() / norm_squared)
            }

            /// Inverts this quaternion in place.
            pub fn inverse_mut(&mut self) -> Result<(), MathError> {
                *self = self.inverse()?;
                Ok(())
            }

            /// Returns this quaternion scaled to magnitude 1.
            ///
            /// The zero quaternion cannot be normalized
            /// ([`MathError::DivideByZero`]).
            pub fn normalized(&self) -> Result<Self, MathError> {
                let magnitude = self.magnitude();
                if crate::numeric::$num::is_zero(magnitude) {
                    return Err(MathError::DivideByZero(
                        "cannot normalize the zero quaternion",
                    ));
                }
                Ok(*self / magnitude)
            }

            /// Normalizes this quaternion in place.
            pub fn normalize_mut(&mut self) -> Result<(), MathError> {
                *self = self.normalized()?;
                Ok(())
            }

            /// Normalizes this quaternion in place, returning `false` and
            /// leaving the value unmodified when the magnitude is zero.
            pub fn try_normalize(&mut self) -> bool {
                match self.normalized() {
                    Ok(normalized) => {
                        *self = normalized;
                        true
                    }
                    Err(_) => false,
                }
            }

            /// Computes the quaternion exponential.
            ///
            /// For a pure-vector quaternion `(0, θ·v̂)` with unit `v̂` the
            /// result is the unit quaternion `(cos θ, sin θ·v̂)`. As
            /// `θ → 0` the result degenerates smoothly to the identity;
            /// no division by a vanishing `sin θ / θ` takes place.
            pub fn exp(&self) -> Self {
                let v = self.v();
                let theta = v.length();
                let (s, c) = theta.sin_cos();
                if crate::numeric::$num::is_zero(s) {
                    Self::from_scalar_vector(c, v)
                } else {
                    Self::from_scalar_vector(c, v * (s / theta))
                }
            }

            /// Computes the quaternion logarithm, the inverse of
            /// [`Self::exp`].
            ///
            /// Defined for unit quaternions: `(cos θ, sin θ·v̂)` maps to
            /// `(0, θ·v̂)`. A scalar part whose absolute value numerically
            /// exceeds 1 means the quaternion is not unit length and the
            /// angle extraction `acos(w)` is undefined
            /// ([`MathError::Domain`]).
            pub fn ln(&self) -> Result<Self, MathError> {
                let w_abs = self.w.abs();
                if w_abs > 1.0 && !crate::numeric::$num::are_equal(w_abs, 1.0) {
                    return Err(MathError::Domain(
                        "logarithm is undefined for quaternions with modulus greater than 1",
                    ));
                }

                let theta = self.w.clamp(-1.0, 1.0).acos();
                let sin_theta = theta.sin();
                if crate::numeric::$num::is_zero(sin_theta) {
                    Ok(Self::from_scalar_vector(0.0, self.v()))
                } else {
                    Ok(Self::from_scalar_vector(0.0, self.v() * (theta / sin_theta)))
                }
            }

            /// Raises this unit quaternion to the real exponent `t` via
            /// `exp(t · ln(q))`.
            ///
            /// Fractional exponents interpolate/extrapolate the rotation;
            /// integer exponents agree with repeated multiplication
            /// (`power(2) == q * q`, `power(-2) == q⁻¹ * q⁻¹`).
            pub fn power(&self, t: $t) -> Result<Self, MathError> {
                Ok((self.ln()? * t).exp())
            }

            /// Rotates a vector by this unit quaternion (sandwich product).
            pub fn rotate(&self, v: $vec3) -> $vec3 {
                let u = self.v();
                let w = self.w;
                2.0 * u.dot(v) * u + (w * w - u.dot(u)) * v + 2.0 * w * u.cross(v)
            }

            /// Converts this unit quaternion into a 3x3 rotation matrix.
            pub fn to_rotation_matrix33(&self) -> $mat3 {
                let x2 = self.x + self.x;
                let y2 = self.y + self.y;
                let z2 = self.z + self.z;
                let xx = self.x * x2;
                let xy = self.x * y2;
                let xz = self.x * z2;
                let yy = self.y * y2;
                let yz = self.y * z2;
                let zz = self.z * z2;
                let wx = self.w * x2;
                let wy = self.w * y2;
                let wz = self.w * z2;

                $mat3::from_cols(
                    $vec3::new(1.0 - (yy + zz), xy + wz, xz - wy),
                    $vec3::new(xy - wz, 1.0 - (xx + zz), yz + wx),
                    $vec3::new(xz + wy, yz - wx, 1.0 - (xx + yy)),
                )
            }

            /// Converts this unit quaternion into a 4x4 rotation matrix
            /// with no translation.
            #[inline]
            pub fn to_rotation_matrix44(&self) -> $mat4 {
                self.to_rotation_matrix33().to_mat4()
            }

            /// Returns the unsigned relative rotation angle between two
            /// orientations, in `[0, π]`.
            ///
            /// Canonicalized over the double cover: negating either
            /// argument, or offsetting either argument's own angle encoding
            /// by 2π, does not change the result.
            pub fn angle_between(q1: Self, q2: Self) -> $t {
                let alpha = q1.dot(q2).abs().min(1.0);
                // acos is ill-conditioned at 1: rounding in the dot product
                // (e.g. dot(q, -q) landing one ulp below -1) would read as a
                // spurious small angle.
                if crate::numeric::$num::are_equal(alpha, 1.0) {
                    return 0.0;
                }
                2.0 * alpha.acos()
            }

            /// Performs a spherical linear interpolation between two unit
            /// quaternions, following the shortest path.
            ///
            /// `t` is clamped to `[0, 1]`.
            pub fn slerp(start: Self, end: Self, t: $t) -> Self {
                let t = t.clamp(0.0, 1.0);
                let mut cos_theta = start.dot(end);
                let mut end_adjusted = end;

                // Negate one quaternion when the arc is longer than a
                // quarter turn in 4D, so interpolation takes the short way
                // around the double cover.
                if cos_theta < 0.0 {
                    cos_theta = -cos_theta;
                    end_adjusted = -end;
                }

                if cos_theta > 1.0 - crate::numeric::$num::epsilon() {
                    // Nearly identical orientations: fall back to a
                    // normalized linear interpolation.
                    let result = start * (1.0 - t) + end_adjusted * t;
                    result.normalized().unwrap_or(Self::IDENTITY)
                } else {
                    let angle = cos_theta.acos();
                    let sin_inv = 1.0 / angle.sin();
                    start * (((1.0 - t) * angle).sin() * sin_inv)
                        + end_adjusted * ((t * angle).sin() * sin_inv)
                }
            }

            /// Determines whether two quaternions are equal within the
            /// ambient tolerance, component-wise.
            #[inline]
            pub fn are_numerically_equal(q1: Self, q2: Self) -> bool {
                crate::numeric::$num::are_equal(q1.w, q2.w)
                    && crate::numeric::$num::are_equal(q1.x, q2.x)
                    && crate::numeric::$num::are_equal(q1.y, q2.y)
                    && crate::numeric::$num::are_equal(q1.z, q2.z)
            }

            /// Determines whether two quaternions are equal within the
            /// absolute `epsilon`, component-wise.
            #[inline]
            pub fn are_numerically_equal_eps(q1: Self, q2: Self, epsilon: $t) -> bool {
                crate::numeric::$num::are_equal_eps(q1.w, q2.w, epsilon)
                    && crate::numeric::$num::are_equal_eps(q1.x, q2.x, epsilon)
                    && crate::numeric::$num::are_equal_eps(q1.y, q2.y, epsilon)
                    && crate::numeric::$num::are_equal_eps(q1.z, q2.z, epsilon)
            }

            /// Returns the components as an ordered `[w, x, y, z]` array.
            #[inline]
            pub fn to_array(&self) -> [$t; 4] {
                [self.w, self.x, self.y, self.z]
            }
        }

        impl Default for $name {
            /// Returns the identity quaternion, representing no rotation.
            #[inline]
            fn default() -> Self {
                Self::IDENTITY
            }
        }

        impl std::hash::Hash for $name {
            /// Hashes the component bit patterns in `w, x, y, z` order.
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.w.to_bits().hash(state);
                self.x.to_bits().hash(state);
                self.y.to_bits().hash(state);
                self.z.to_bits().hash(state);
            }
        }

        impl Index<usize> for $name {
            type Output = $t;
            /// Accesses a component by index in `w, x, y, z` order.
            ///
            /// Panics if `index` is not 0, 1, 2, or 3.
            #[inline]
            fn index(&self, index: usize) -> &Self::Output {
                match index {
                    0 => &self.w,
                    1 => &self.x,
                    2 => &self.y,
                    3 => &self.z,
                    _ => panic!("index out of bounds for quaternion component: {index}"),
                }
            }
        }

        impl IndexMut<usize> for $name {
            /// Accesses a component by index in `w, x, y, z` order.
            ///
            /// Panics if `index` is not 0, 1, 2, or 3.
            #[inline]
            fn index_mut(&mut self, index: usize) -> &mut Self::Output {
                match index {
                    0 => &mut self.w,
                    1 => &mut self.x,
                    2 => &mut self.y,
                    3 => &mut self.z,
                    _ => panic!("index out of bounds for quaternion component: {index}"),
                }
            }
        }

        impl Mul for $name {
            type Output = Self;
            /// Combines two rotations using the Hamilton product.
            ///
            /// Not commutative; `q2 * q1` applies `q1` first, matching
            /// `m2 * m1` for the corresponding rotation matrices.
            #[inline]
            fn mul(self, rhs: Self) -> Self::Output {
                Self {
                    w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
                    x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
                    y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
                    z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
                }
            }
        }

        impl MulAssign for $name {
            /// Combines this rotation with another.
            #[inline]
            fn mul_assign(&mut self, rhs: Self) {
                *self = *self * rhs;
            }
        }

        impl Mul<$t> for $name {
            type Output = Self;
            /// Scales all components by a scalar.
            #[inline]
            fn mul(self, scalar: $t) -> Self::Output {
                Self::new(
                    self.w * scalar,
                    self.x * scalar,
                    self.y * scalar,
                    self.z * scalar,
                )
            }
        }

        impl Mul<$name> for $t {
            type Output = $name;
            /// Scales all components by a scalar.
            #[inline]
            fn mul(self, q: $name) -> Self::Output {
                q * self
            }
        }

        impl Div<$t> for $name {
            type Output = Self;
            /// Divides all components by a scalar.
            #[inline]
            fn div(self, scalar: $t) -> Self::Output {
                Self::new(
                    self.w / scalar,
                    self.x / scalar,
                    self.y / scalar,
                    self.z / scalar,
                )
            }
        }

        impl Div for $name {
            type Output = Self;
            /// Multiplies by the inverse of `rhs` (`q / r == q * r⁻¹`).
            ///
            /// This is the raw algebraic form: dividing by the zero
            /// quaternion yields non-finite components. Use
            /// [`Self::inverse`] for the guarded path.
            #[inline]
            fn div(self, rhs: Self) -> Self::Output {
                self * (rhs.conjugate() / rhs.magnitude_squared())
            }
        }

        impl Add for $name {
            type Output = Self;
            /// Adds two quaternions component-wise.
            ///
            /// Not a rotation operation; used by interpolation and the
            /// exponential-map arithmetic.
            #[inline]
            fn add(self, rhs: Self) -> Self::Output {
                Self::new(
                    self.w + rhs.w,
                    self.x + rhs.x,
                    self.y + rhs.y,
                    self.z + rhs.z,
                )
            }
        }

        impl Sub for $name {
            type Output = Self;
            /// Subtracts two quaternions component-wise.
            #[inline]
            fn sub(self, rhs: Self) -> Self::Output {
                Self::new(
                    self.w - rhs.w,
                    self.x - rhs.x,
                    self.y - rhs.y,
                    self.z - rhs.z,
                )
            }
        }

        impl Neg for $name {
            type Output = Self;
            /// Negates all components. The negation encodes the same
            /// spatial rotation as the original (double cover).
            #[inline]
            fn neg(self) -> Self::Output {
                Self::new(-self.w, -self.x, -self.y, -self.z)
            }
        }

        impl std::fmt::Display for $name {
            /// Formats as `"(w; (x; y; z))"`, the layout accepted by the
            /// [`FromStr`](std::str::FromStr) implementation.
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "({}; ({}; {}; {}))", self.w, self.x, self.y, self.z)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseQuaternionError;

            /// Parses the `"(w; (x; y; z))"` layout produced by
            /// [`Display`](std::fmt::Display). Arbitrary whitespace around
            /// tokens is accepted; any other bracket or separator layout
            /// is rejected.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let inner = s
                    .trim()
                    .strip_prefix('(')
                    .and_then(|rest| rest.strip_suffix(')'))
                    .ok_or(ParseQuaternionError)?;
                let (w, vector) = inner.split_once(';').ok_or(ParseQuaternionError)?;
                let w: $t = w.trim().parse().map_err(|_| ParseQuaternionError)?;

                let vector = vector
                    .trim()
                    .strip_prefix('(')
                    .and_then(|rest| rest.strip_suffix(')'))
                    .ok_or(ParseQuaternionError)?;
                let mut components = vector.split(';').map(str::trim);
                let x: $t = components
                    .next()
                    .ok_or(ParseQuaternionError)?
                    .parse()
                    .map_err(|_| ParseQuaternionError)?;
                let y: $t = components
                    .next()
                    .ok_or(ParseQuaternionError)?
                    .parse()
                    .map_err(|_| ParseQuaternionError)?;
                let z: $t = components
                    .next()
                    .ok_or(ParseQuaternionError)?
                    .parse()
                    .map_err(|_| ParseQuaternionError)?;
                if components.next().is_some() {
                    return Err(ParseQuaternionError);
                }

                Ok(Self::new(w, x, y, z))
            }
        }
    };
}

quaternion_impl!(
    Quaternion,
    f32,
    Vec3,
    Mat3,
    Mat4,
    single,
    std::f32::consts::PI,
    "A quaternion with `f32` components, representing a 3D rotation."
);
quaternion_impl!(
    DQuaternion,
    f64,
    DVec3,
    DMat3,
    DMat4,
    double,
    std::f64::consts::PI,
    "A quaternion with `f64` components, representing a 3D rotation."
);

impl From<DQuaternion> for Quaternion {
    /// Truncates each component to `f32`, with no rescaling.
    #[inline]
    fn from(q: DQuaternion) -> Self {
        Self::new(q.w as f32, q.x as f32, q.y as f32, q.z as f32)
    }
}

impl From<Quaternion> for DQuaternion {
    /// Widens each component to `f64`, with no rescaling.
    #[inline]
    fn from(q: Quaternion) -> Self {
        Self::new(q.w as f64, q.x as f64, q.y as f64, q.z as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::hash_map::DefaultHasher;
    use std::f64::consts::{FRAC_PI_4, PI, TAU};
    use std::hash::{Hash, Hasher};

    /// Equality up to the double cover: `q` matches `q2` or `-q2`.
    fn same_rotation(q1: DQuaternion, q2: DQuaternion) -> bool {
        DQuaternion::are_numerically_equal(q1, q2)
            || DQuaternion::are_numerically_equal(q1, -q2)
    }

    /// Splitmix-style generator for reproducible sampling in tests.
    fn next_unit_interval(seed: &mut u64) -> f64 {
        *seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (*seed >> 11) as f64 / (1u64 << 53) as f64
    }

    #[test]
    fn zero_and_identity_constants() {
        assert_eq!(DQuaternion::new(0.0, 0.0, 0.0, 0.0), DQuaternion::ZERO);
        assert_eq!(DQuaternion::new(1.0, 0.0, 0.0, 0.0), DQuaternion::IDENTITY);
        assert_eq!(DQuaternion::IDENTITY, DQuaternion::default());

        let v = DVec3::new(2.0, 2.0, 2.0);
        assert_eq!(v, DQuaternion::IDENTITY.to_rotation_matrix33() * v);
    }

    #[test]
    fn construction_variants_agree() {
        let q = DQuaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(q, DQuaternion::from_slice(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(
            q,
            DQuaternion::from_scalar_vector(1.0, DVec3::new(2.0, 3.0, 4.0))
        );
        assert_eq!(
            DQuaternion::IDENTITY,
            DQuaternion::from_mat3(&DMat3::IDENTITY)
        );
    }

    #[test]
    #[should_panic]
    fn from_slice_panics_on_short_input() {
        let _ = DQuaternion::from_slice(&[1.0, 2.0]);
    }

    #[test]
    fn vector_part_accessors() {
        let mut q = DQuaternion::new(0.123, 1.0, 2.0, 3.0);
        assert_eq!(DVec3::new(1.0, 2.0, 3.0), q.v());

        q.set_v(DVec3::new(-1.0, -2.0, -3.0));
        assert_eq!(DQuaternion::new(0.123, -1.0, -2.0, -3.0), q);
    }

    #[test]
    fn angle_round_trips_through_the_setter() {
        let axis = DVec3::new(1.0, 2.0, 3.0);
        let mut q = DQuaternion::from_axis_angle(axis, 0.4).unwrap();
        assert_relative_eq!(0.4, q.angle(), epsilon = 1.0e-12);

        q.set_angle(0.9);
        assert!(DQuaternion::are_numerically_equal(
            q,
            DQuaternion::from_axis_angle(axis, 0.9).unwrap()
        ));
    }

    #[test]
    fn collapsed_vector_part_reads_as_angle_zero() {
        assert_eq!(0.0, DQuaternion::new(1.00000001, 0.0, 0.0, 0.0).angle());
        assert_eq!(0.0, DQuaternion::IDENTITY.angle());
    }

    #[test]
    fn axis_round_trips_through_the_setter() {
        let axis = DVec3::new(1.0, 2.0, 3.0);
        let angle = 0.2;
        let mut q = DQuaternion::from_axis_angle(axis, angle).unwrap();
        assert_relative_eq!(angle, q.angle(), epsilon = 1.0e-12);
        assert!(DVec3::are_numerically_equal(axis.normalize(), q.axis()));

        let new_axis = DVec3::new(1.0, 1.0, 1.0);
        q.set_axis(new_axis);
        assert_relative_eq!(angle, q.angle(), epsilon = 1.0e-12);
        assert!(DVec3::are_numerically_equal(new_axis.normalize(), q.axis()));
        assert!(DVec3::are_numerically_equal(
            DMat3::from_axis_angle(new_axis.normalize(), angle) * DVec3::ONE,
            q.rotate(DVec3::ONE)
        ));

        assert_eq!(DVec3::ZERO, DQuaternion::IDENTITY.axis());
        q.set_axis(DVec3::ZERO);
        assert_eq!(DQuaternion::IDENTITY, q);
    }

    #[test]
    fn exact_equality_is_component_wise() {
        let q = DQuaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(q, DQuaternion::new(1.0, 2.0, 3.0, 4.0));
        assert_ne!(q, DQuaternion::new(-1.0, 2.0, 3.0, 4.0));
        assert_ne!(q, DQuaternion::new(1.0, -2.0, 3.0, 4.0));
        assert_ne!(q, DQuaternion::new(1.0, 2.0, -3.0, 4.0));
        assert_ne!(q, DQuaternion::new(1.0, 2.0, 3.0, -4.0));
    }

    #[test]
    fn numeric_equality_uses_an_explicit_epsilon() {
        let q1 = DQuaternion::new(1.0, 2.0, 3.0, 4.0);
        let q2 = DQuaternion::new(1.002, 2.002, 3.002, 4.002);
        let q3 = DQuaternion::new(1.0001, 2.0001, 3.0001, 4.0001);

        assert!(DQuaternion::are_numerically_equal_eps(q1, q1, 0.001));
        assert!(!DQuaternion::are_numerically_equal_eps(q1, q2, 0.001));
        assert!(DQuaternion::are_numerically_equal_eps(q1, q3, 0.001));
    }

    #[test]
    fn hash_distinguishes_different_quaternions() {
        let hash = |q: DQuaternion| {
            let mut hasher = DefaultHasher::new();
            q.hash(&mut hasher);
            hasher.finish()
        };
        assert_ne!(hash(DQuaternion::ZERO), hash(DQuaternion::new(1.0, 2.0, 3.0, 4.0)));
        assert_eq!(
            hash(DQuaternion::new(1.0, 2.0, 3.0, 4.0)),
            hash(DQuaternion::new(1.0, 2.0, 3.0, 4.0))
        );
    }

    #[test]
    fn magnitude_of_a_known_quaternion() {
        let q = DQuaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(30.0, q.magnitude_squared());
        assert_eq!(30.0f64.sqrt(), q.magnitude());
    }

    #[test]
    fn conjugate_negates_the_vector_part() {
        let q = DQuaternion::new(1.0, 2.0, 3.0, 4.0).conjugate();
        assert_eq!(DQuaternion::new(1.0, -2.0, -3.0, -4.0), q);

        let mut q = DQuaternion::new(1.0, 2.0, 3.0, 4.0);
        q.conjugate_mut();
        assert_eq!(DQuaternion::new(1.0, -2.0, -3.0, -4.0), q);

        let q = DQuaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(q, q.conjugate().conjugate());
    }

    #[test]
    fn inverse_of_a_rotation_flips_the_axis() {
        assert_eq!(
            DQuaternion::IDENTITY,
            DQuaternion::IDENTITY.inverse().unwrap()
        );

        let axis = DVec3::new(1.0, 1.0, 1.0).normalize();
        let q = DQuaternion::from_axis_angle(axis, 0.4).unwrap();
        let inverse = q.inverse().unwrap();
        assert!(DVec3::are_numerically_equal(-axis, inverse.axis()));

        let q = DQuaternion::new(1.0, 2.0, 3.0, 4.0);
        assert!(DQuaternion::are_numerically_equal(
            DQuaternion::IDENTITY,
            q.inverse().unwrap() * q
        ));

        let mut q = DQuaternion::new(1.0, 2.0, 3.0, 4.0);
        let original = q;
        q.inverse_mut().unwrap();
        assert!(DQuaternion::are_numerically_equal(
            DQuaternion::IDENTITY,
            q * original
        ));
    }

    #[test]
    fn inverse_round_trips() {
        let q = DQuaternion::new(1.0, 2.0, 3.0, 4.0);
        let round_tripped = q.inverse().unwrap().inverse().unwrap();
        assert!(DQuaternion::are_numerically_equal(q, round_tripped));
    }

    #[test]
    fn zero_quaternion_has_no_inverse() {
        assert_eq!(
            Err(MathError::Domain("the zero quaternion has no inverse")),
            DQuaternion::ZERO.inverse()
        );
    }

    #[test]
    fn normalization() {
        let mut q = DQuaternion::new(1.0, 2.0, 3.0, 4.0);
        assert!(!q.is_numerically_normalized());
        q.normalize_mut().unwrap();
        assert!(q.is_numerically_normalized());
        assert_relative_eq!(1.0, q.magnitude(), epsilon = 1.0e-12);

        let q = DQuaternion::new(1.0, 2.0, 3.0, 4.0);
        let normalized = q.normalized().unwrap();
        // The pure form leaves the original untouched.
        assert_eq!(DQuaternion::new(1.0, 2.0, 3.0, 4.0), q);
        assert!(normalized.is_numerically_normalized());
    }

    #[test]
    fn zero_quaternion_cannot_be_normalized() {
        assert_eq!(
            Err(MathError::DivideByZero("cannot normalize the zero quaternion")),
            DQuaternion::ZERO.normalized()
        );
    }

    #[test]
    fn try_normalize_leaves_the_zero_quaternion_unmodified() {
        let mut q = DQuaternion::ZERO;
        assert!(!q.try_normalize());
        assert_eq!(DQuaternion::ZERO, q);

        let mut q = DQuaternion::new(1.0, 2.0, 3.0, 4.0);
        assert!(q.try_normalize());
        assert_eq!(DQuaternion::new(1.0, 2.0, 3.0, 4.0).normalized().unwrap(), q);

        let mut q = DQuaternion::new(0.0, -1.0, 0.0, 0.0);
        assert!(q.try_normalize());
        assert_eq!(DQuaternion::new(0.0, -1.0, 0.0, 0.0), q);
    }

    #[test]
    fn indexing_reads_and_writes_in_wxyz_order() {
        let q = DQuaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(1.0, q[0]);
        assert_eq!(2.0, q[1]);
        assert_eq!(3.0, q[2]);
        assert_eq!(4.0, q[3]);

        let mut q = DQuaternion::ZERO;
        q[0] = 1.0;
        q[1] = 2.0;
        q[2] = 3.0;
        q[3] = 4.0;
        assert_eq!(DQuaternion::new(1.0, 2.0, 3.0, 4.0), q);
    }

    #[test]
    #[should_panic]
    fn index_out_of_range_panics() {
        let q = DQuaternion::new(1.0, 2.0, 3.0, 4.0);
        let _ = q[4];
    }

    #[test]
    fn to_array_preserves_component_order() {
        let q = DQuaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!([1.0, 2.0, 3.0, 4.0], q.to_array());
    }

    #[test]
    fn dot_product() {
        let q1 = DQuaternion::new(1.0, 2.0, 3.0, 4.0);
        let q2 = DQuaternion::new(5.0, 6.0, 7.0, 8.0);
        assert_eq!(70.0, q1.dot(q2));
    }

    #[test]
    fn scalar_multiplication_and_division() {
        let s = 123.456;
        let q = DQuaternion::new(1.0, 2.0, 3.0, 4.0);
        let expected = DQuaternion::new(s, 2.0 * s, 3.0 * s, 4.0 * s);
        assert_eq!(expected, q * s);
        assert_eq!(expected, s * q);

        let expected = DQuaternion::new(1.0 / s, 2.0 / s, 3.0 / s, 4.0 / s);
        assert!(DQuaternion::are_numerically_equal(expected, q / s));
    }

    #[test]
    fn addition_subtraction_negation() {
        let a = DQuaternion::new(1.0, 2.0, 3.0, 4.0);
        let b = DQuaternion::new(2.0, 3.0, 4.0, 5.0);
        assert_eq!(DQuaternion::new(3.0, 5.0, 7.0, 9.0), a + b);

        let b = DQuaternion::new(10.0, -10.0, 0.5, 2.5);
        assert_eq!(DQuaternion::new(-9.0, 12.0, 2.5, 1.5), a - b);

        assert_eq!(DQuaternion::new(-1.0, -2.0, -3.0, -4.0), -a);
    }

    #[test]
    fn multiplication_matches_matrix_composition() {
        let q1 = DQuaternion::from_axis_angle(DVec3::new(1.0, 2.0, 3.0), 0.4).unwrap();
        let m1 = DMat3::from_axis_angle(DVec3::new(1.0, 2.0, 3.0).normalize(), 0.4);
        let q2 = DQuaternion::from_axis_angle(DVec3::new(1.0, -2.0, -3.5), -1.6).unwrap();
        let m2 = DMat3::from_axis_angle(DVec3::new(1.0, -2.0, -3.5).normalize(), -1.6);

        let v = DVec3::new(0.3, -2.4, 5.6);
        assert!(DVec3::are_numerically_equal(
            (q2 * q1).rotate(v),
            (m2 * m1) * v
        ));
    }

    #[test]
    fn division_composes_with_the_inverse_rotation() {
        let q1 = DQuaternion::from_axis_angle(DVec3::new(1.0, 2.0, 3.0), 0.4).unwrap();
        let m1 = DMat3::from_axis_angle(DVec3::new(1.0, 2.0, 3.0).normalize(), 0.4);
        let q2 = DQuaternion::from_axis_angle(DVec3::new(1.0, -2.0, -3.5), -1.6).unwrap();
        let m2 = DMat3::from_axis_angle(DVec3::new(1.0, -2.0, -3.5).normalize(), -1.6);

        let v = DVec3::new(0.3, -2.4, 5.6);
        // The transpose of a rotation matrix is its inverse.
        assert!(DVec3::are_numerically_equal(
            (q2 / q1).rotate(v),
            (m2 * m1.transpose()) * v
        ));
    }

    #[test]
    fn rotate_matches_the_rotation_matrix() {
        let q = DQuaternion::from_axis_angle(DVec3::new(1.0, 2.0, 3.0), 0.4).unwrap();
        let v = DVec3::new(0.3, -2.4, 5.6);
        assert!(DVec3::are_numerically_equal(
            q.rotate(v),
            q.to_rotation_matrix33() * v
        ));

        let m = DMat3::from_axis_angle(DVec3::new(1.0, 2.0, 3.0).normalize(), 0.4);
        assert!(DVec3::are_numerically_equal(q.rotate(v), m * v));
    }

    #[test]
    fn rotation_matrix44_embeds_the_rotation() {
        let q = DQuaternion::from_axis_angle(DVec3::new(1.0, 2.0, -3.0), -1.6).unwrap();
        let m44 = q.to_rotation_matrix44();
        let v = DVec3::new(0.3, -2.4, 5.6);
        let rotated = (m44 * crate::algebra::DVec4::from_vec3(v, 1.0)).truncate();
        assert!(DVec3::are_numerically_equal(q.rotate(v), rotated));
    }

    #[test]
    fn axis_angle_composition_adds_angles() {
        let axis = DVec3::new(1.0, -2.0, 0.5);
        let q1 = DQuaternion::from_axis_angle(axis, 0.4).unwrap();
        let q2 = DQuaternion::from_axis_angle(axis, 1.1).unwrap();
        let combined = DQuaternion::from_axis_angle(axis, 1.5).unwrap();
        assert!(DQuaternion::are_numerically_equal(combined, q1 * q2));
    }

    #[test]
    fn single_axis_shorthands_match_the_general_constructor() {
        let angle = 0.3;
        assert_eq!(
            DQuaternion::from_axis_angle(DVec3::X, angle).unwrap(),
            DQuaternion::from_rotation_x(angle)
        );
        assert_eq!(
            DQuaternion::from_axis_angle(DVec3::Y, angle).unwrap(),
            DQuaternion::from_rotation_y(angle)
        );
        assert_eq!(
            DQuaternion::from_axis_angle(DVec3::Z, angle).unwrap(),
            DQuaternion::from_rotation_z(angle)
        );
    }

    #[test]
    fn zero_axis_is_a_domain_error() {
        assert!(matches!(
            DQuaternion::from_axis_angle(DVec3::ZERO, 0.5),
            Err(MathError::Domain(_))
        ));
    }

    #[test]
    fn matrix_extraction_matches_axis_angle_construction() {
        for (axis, angle) in [
            (DVec3::X, FRAC_PI_4),
            (DVec3::Y, FRAC_PI_4),
            (DVec3::Z, FRAC_PI_4),
            (DVec3::X, 0.3),
            (-DVec3::Y, -1.4),
            (-DVec3::Z, -0.1),
        ] {
            let m = DMat3::from_axis_angle(axis, angle);
            let q = DQuaternion::from_mat3(&m);
            let expected = DQuaternion::from_axis_angle(axis, angle).unwrap();
            assert!(same_rotation(expected, q));
            assert!(DVec3::are_numerically_equal(
                m * DVec3::ONE,
                q.rotate(DVec3::ONE)
            ));
        }
    }

    #[test]
    fn matrix_extraction_handles_negative_trace_branches() {
        // Reflection-free matrices exercising the three fallback branches.
        let matrices = [
            // Rotation by pi around Y: diag(-1, 1, -1).
            DMat3::from_cols(
                DVec3::new(-1.0, 0.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
                DVec3::new(0.0, 0.0, -1.0),
            ),
            // Rotation by pi around X: diag(1, -1, -1).
            DMat3::from_cols(
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(0.0, -1.0, 0.0),
                DVec3::new(0.0, 0.0, -1.0),
            ),
            // Rotation by pi around (0, 1, 1)/sqrt(2).
            DMat3::from_cols(
                DVec3::new(-1.0, 0.0, 0.0),
                DVec3::new(0.0, 0.0, 1.0),
                DVec3::new(0.0, 1.0, 0.0),
            ),
        ];
        for m in matrices {
            let q = DQuaternion::from_mat3(&m);
            assert!(q.is_numerically_normalized());
            assert!(DVec3::are_numerically_equal(
                m * DVec3::ONE,
                q.rotate(DVec3::ONE)
            ));
        }
    }

    #[test]
    fn zero_trace_extraction_uses_the_documented_branch_convention() {
        // The permutation matrix mapping X -> Y -> Z -> X.
        let m = DMat3::from_cols(
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        );
        let q = DQuaternion::from_mat3(&m);
        assert!(DQuaternion::are_numerically_equal(
            DQuaternion::new(-0.5, 0.5, 0.5, 0.5),
            q
        ));
    }

    #[test]
    fn rotation_from_to_maps_start_onto_end() {
        let cases = [
            (DVec3::X, DVec3::Y),
            (DVec3::Y, DVec3::Z),
            (DVec3::Z, DVec3::X),
            (DVec3::new(1.0, 1.0, 1.0), DVec3::new(1.0, 1.0, 1.0)),
            (DVec3::new(1.0, 1.0, 1.0), DVec3::new(-1.0, -1.0, -1.0)),
            (DVec3::new(-1.0, 2.0, 1.0), DVec3::new(-2.0, -1.0, -1.0)),
        ];
        for (start, end) in cases {
            let q = DQuaternion::rotation_from_to(start, end).unwrap();
            let rotated = q.to_rotation_matrix33() * start;
            // Rotations preserve length, so equal-length inputs map
            // exactly onto each other.
            let expected = end.normalize() * start.length();
            assert!(DVec3::are_numerically_equal(expected, rotated));
        }
    }

    #[test]
    fn rotation_from_to_identity_for_equal_directions() {
        let q = DQuaternion::rotation_from_to(
            DVec3::new(0.0, 2.0, 0.0),
            DVec3::new(0.0, 0.5, 0.0),
        )
        .unwrap();
        assert_eq!(DQuaternion::IDENTITY, q);
    }

    #[test]
    fn rotation_from_to_rejects_zero_vectors() {
        assert!(matches!(
            DQuaternion::rotation_from_to(DVec3::ZERO, DVec3::X),
            Err(MathError::InvalidArgument(_))
        ));
        assert!(matches!(
            DQuaternion::rotation_from_to(DVec3::Y, DVec3::ZERO),
            Err(MathError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rotation_triple_order_depends_on_the_axes_flag() {
        let angle = 45.0f64.to_radians();
        let rx = DQuaternion::from_axis_angle(DVec3::X, angle).unwrap();
        let ry = DQuaternion::from_axis_angle(DVec3::Y, angle).unwrap();
        let rz = DQuaternion::from_axis_angle(DVec3::Z, angle).unwrap();

        let local = DQuaternion::from_rotation_triple(
            angle, DVec3::Z, angle, DVec3::Y, angle, DVec3::X, false,
        )
        .unwrap();
        assert!(DQuaternion::are_numerically_equal(rz * ry * rx, local));

        let global = DQuaternion::from_rotation_triple(
            angle, DVec3::Z, angle, DVec3::Y, angle, DVec3::X, true,
        )
        .unwrap();
        assert!(DQuaternion::are_numerically_equal(rx * ry * rz, global));

        // The two composition orders differ for non-commuting factors.
        assert!(!same_rotation(local, global));
    }

    #[test]
    fn exp_of_a_scaled_axis() {
        let theta: f64 = -0.3;
        let v = DVec3::new(1.0, 2.0, 3.0).normalize();

        let exp = DQuaternion::from_scalar_vector(0.0, theta * v).exp();
        assert_relative_eq!(theta.cos(), exp.w, epsilon = 1.0e-12);
        assert!(DVec3::are_numerically_equal(theta.sin() * v, exp.v()));
    }

    #[test]
    fn exp_of_zero_angle_is_the_identity() {
        let v = DVec3::new(1.0, 2.0, 3.0).normalize();
        let exp = DQuaternion::from_scalar_vector(0.0, 0.0 * v).exp();
        assert_relative_eq!(1.0, exp.w, epsilon = 1.0e-12);
        assert!(DVec3::are_numerically_equal(DVec3::ZERO, exp.v()));
    }

    #[test]
    fn ln_recovers_the_scaled_axis() {
        let theta: f64 = 0.3;
        let v = DVec3::new(1.0, 2.0, 3.0).normalize();
        let q = DQuaternion::from_scalar_vector(theta.cos(), theta.sin() * v);

        let ln = q.ln().unwrap();
        assert_relative_eq!(0.0, ln.w, epsilon = 1.0e-12);
        assert!(DVec3::are_numerically_equal(theta * v, ln.v()));
    }

    #[test]
    fn ln_of_the_identity_is_zero() {
        let ln = DQuaternion::IDENTITY.ln().unwrap();
        assert_relative_eq!(0.0, ln.w, epsilon = 1.0e-12);
        assert!(DVec3::are_numerically_equal(DVec3::ZERO, ln.v()));
    }

    #[test]
    fn ln_and_exp_are_inverses_on_unit_quaternions() {
        let q = DQuaternion::from_axis_angle(DVec3::new(0.2, -1.0, 0.7), 1.3).unwrap();
        let round_tripped = q.ln().unwrap().exp();
        assert!(DQuaternion::are_numerically_equal(q, round_tripped));
    }

    #[test]
    fn ln_of_a_non_unit_quaternion_is_a_domain_error() {
        assert!(matches!(
            DQuaternion::new(1.5, 0.0, 0.0, 0.0).ln(),
            Err(MathError::Domain(_))
        ));
    }

    #[test]
    fn power_matches_the_closed_form() {
        let theta: f64 = 0.4;
        let t = -1.2;
        let v = DVec3::new(2.3, 1.0, -2.0).normalize();

        let q = DQuaternion::from_scalar_vector(theta.cos(), theta.sin() * v);
        let power = q.power(t).unwrap();
        let expected =
            DQuaternion::from_scalar_vector((t * theta).cos(), (t * theta).sin() * v);
        assert!(DQuaternion::are_numerically_equal(expected, power));
    }

    #[test]
    fn integer_powers_match_repeated_multiplication() {
        let theta: f64 = 0.4;
        let v = DVec3::new(2.3, 1.0, -2.0).normalize();
        let q = DQuaternion::from_scalar_vector(theta.cos(), theta.sin() * v);

        assert!(DQuaternion::are_numerically_equal(q * q, q.power(2.0).unwrap()));
        assert!(DQuaternion::are_numerically_equal(
            q * q * q,
            q.power(3.0).unwrap()
        ));

        let inverse = q.inverse().unwrap();
        assert!(DQuaternion::are_numerically_equal(
            inverse,
            q.power(-1.0).unwrap()
        ));
        assert!(DQuaternion::are_numerically_equal(
            inverse * inverse,
            q.power(-2.0).unwrap()
        ));
    }

    #[test]
    fn angle_between_canonicalizes_the_double_cover() {
        let q_identity = DQuaternion::IDENTITY;
        let q03 = DQuaternion::from_axis_angle(DVec3::X, 0.3).unwrap();
        let q03_plus_11 =
            DQuaternion::from_axis_angle(DVec3::new(1.0, 0.2, -3.0), 1.1).unwrap() * q03;
        let q0 = DQuaternion::from_axis_angle(DVec3::X, 0.0).unwrap();
        let q_pi = DQuaternion::from_axis_angle(DVec3::X, PI).unwrap();
        let q_two_pi = DQuaternion::from_axis_angle(DVec3::X, TAU).unwrap();

        let close = |a: f64, b: f64| (a - b).abs() < 1.0e-8;

        assert!(close(0.0, DQuaternion::angle_between(q_identity, q_identity)));
        assert!(close(0.3, DQuaternion::angle_between(q_identity, q03)));
        assert!(close(0.3, DQuaternion::angle_between(q_identity, -q03)));
        assert!(close(1.1, DQuaternion::angle_between(q03, q03_plus_11)));
        assert!(close(1.1, DQuaternion::angle_between(-q03, q03_plus_11)));
        assert!(close(1.1, DQuaternion::angle_between(q03, -q03_plus_11)));
        assert!(close(1.1, DQuaternion::angle_between(-q03, -q03_plus_11)));
        assert!(close(0.0, DQuaternion::angle_between(q_identity, q0)));
        assert!(close(0.0, DQuaternion::angle_between(q_identity, q_two_pi)));
        assert!(close(0.0, DQuaternion::angle_between(q0, q_two_pi)));
        assert!(close(0.3, DQuaternion::angle_between(q03, q0)));
        assert!(close(PI, DQuaternion::angle_between(q0, q_pi)));
        assert!(close(PI, DQuaternion::angle_between(q_two_pi, q_pi)));

        // q and -q are the same orientation; the dot product lands one ulp
        // shy of -1 and must not read as a spurious small angle.
        assert_eq!(0.0, DQuaternion::angle_between(q03, -q03));
        assert_eq!(0.0, DQuaternion::angle_between(q03_plus_11, -q03_plus_11));
    }

    #[test]
    fn matrix_round_trip_over_sampled_rotations() {
        let mut seed = 0x9E37_79B9_7F4A_7C15u64;
        let mut sample = || 2.0 * next_unit_interval(&mut seed) - 1.0;

        for _ in 0..64 {
            let axis = DVec3::new(sample(), sample(), sample());
            if axis.is_numerically_zero() {
                continue;
            }
            let angle = sample() * PI;
            let q = DQuaternion::from_axis_angle(axis, angle).unwrap();
            let extracted = DQuaternion::from_mat3(&q.to_rotation_matrix33());
            assert!(same_rotation(q, extracted));
        }
    }

    #[test]
    fn slerp_hits_the_endpoints_and_the_midpoint() {
        let start = DQuaternion::IDENTITY;
        let end = DQuaternion::from_axis_angle(DVec3::Z, std::f64::consts::FRAC_PI_2).unwrap();

        assert!(DQuaternion::are_numerically_equal(
            start,
            DQuaternion::slerp(start, end, 0.0)
        ));
        assert!(DQuaternion::are_numerically_equal(
            end,
            DQuaternion::slerp(start, end, 1.0)
        ));

        let midpoint =
            DQuaternion::from_axis_angle(DVec3::Z, std::f64::consts::FRAC_PI_4).unwrap();
        assert!(DQuaternion::are_numerically_equal(
            midpoint,
            DQuaternion::slerp(start, end, 0.5)
        ));

        // t is clamped.
        assert!(DQuaternion::are_numerically_equal(
            start,
            DQuaternion::slerp(start, end, -0.5)
        ));
    }

    #[test]
    fn slerp_takes_the_short_path() {
        let start = DQuaternion::from_axis_angle(DVec3::Y, (-30.0f64).to_radians()).unwrap();
        let end = DQuaternion::from_axis_angle(DVec3::Y, 170.0f64.to_radians()).unwrap();
        assert!(start.dot(end) < 0.0);

        let mid = DQuaternion::slerp(start, end, 0.5);
        let expected =
            DQuaternion::from_axis_angle(DVec3::Y, (-110.0f64).to_radians()).unwrap();
        assert!(same_rotation(expected, mid));
    }

    #[test]
    fn is_nan_detects_each_component() {
        assert!(!DQuaternion::IDENTITY.is_nan());
        for i in 0..4 {
            let mut q = DQuaternion::ZERO;
            q[i] = f64::NAN;
            assert!(q.is_nan());
        }
    }

    #[test]
    fn cross_precision_conversion_is_component_wise() {
        let q64 = DQuaternion::new(0.3, 23.4, -11.0, 0.0);
        let q32 = Quaternion::from(q64);
        assert_eq!(Quaternion::new(0.3, 23.4, -11.0, 0.0), q32);

        let widened = DQuaternion::from(q32);
        assert_eq!(DQuaternion::new(0.3f32 as f64, 23.4f32 as f64, -11.0, 0.0), widened);
    }

    #[test]
    fn single_precision_algebra_round_trips() {
        let q = Quaternion::from_axis_angle(Vec3::new(1.0, 2.0, 3.0), 0.4).unwrap();
        assert!(q.is_numerically_normalized());

        let v = Vec3::new(0.3, -2.4, 5.6);
        assert!(Vec3::are_numerically_equal(
            q.rotate(v),
            q.to_rotation_matrix33() * v
        ));
        assert!(Quaternion::are_numerically_equal(
            q,
            Quaternion::from_mat3(&q.to_rotation_matrix33())
        ));
    }

    #[test]
    fn display_and_parse_are_lossless_inverses() {
        let q = DQuaternion::new(0.0123, 9.876, 0.0, -2.3);
        let round_tripped: DQuaternion = q.to_string().parse().unwrap();
        assert_eq!(q, round_tripped);
    }

    #[test]
    fn parse_accepts_interior_whitespace() {
        let q: DQuaternion = "(0.0123; (9.876; 0.0; -2.3))".parse().unwrap();
        assert_eq!(DQuaternion::new(0.0123, 9.876, 0.0, -2.3), q);

        let q: DQuaternion = "(   0.0123   ;  ( 9;  0.1 ; -2.3 ) ) ".parse().unwrap();
        assert_eq!(DQuaternion::new(0.0123, 9.0, 0.1, -2.3), q);
    }

    #[test]
    fn parse_rejects_other_layouts() {
        for input in [
            "(0.0123; 9.876; 4.1; -9.0)",
            "0.0123; (9.876; 4.1; -9.0)",
            "(0.0123; (9.876; 4.1))",
            "(0.0123; (9.876; 4.1; -9.0; 1.0))",
            "(0.0123; (9.876; 4.1; oops))",
            "",
        ] {
            assert_eq!(
                Err(ParseQuaternionError),
                input.parse::<DQuaternion>(),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn serde_round_trip_preserves_components() {
        let q = DQuaternion::new(0.1, -0.2, 6.0, 40.0);
        let json = serde_json::to_string(&q).unwrap();
        let round_tripped: DQuaternion = serde_json::from_str(&json).unwrap();
        assert_eq!(q, round_tripped);
    }
}
