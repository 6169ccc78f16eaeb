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

//! Rotation algebra: quaternions and their vector and matrix collaborators.
//!
//! Every type comes in two structurally identical precisions, `f32`
//! (`Quaternion`, `Vec3`, ...) and `f64` (`DQuaternion`, `DVec3`, ...),
//! following the convention that the `D`-prefixed name is the double
//! precision variant. All angular quantities are in **radians**.
//!
//! Tolerance-sensitive operations (zero checks, numeric equality, the
//! degenerate-axis rules of the quaternion accessors) consult the ambient
//! epsilon of the matching precision in [`crate::numeric`].

pub mod matrix;
pub mod quaternion;
pub mod vector;

pub use self::matrix::{DMat3, DMat4, Mat3, Mat4};
pub use self::quaternion::{DQuaternion, ParseQuaternionError, Quaternion};
pub use self::vector::{DVec3, DVec4, Vec3, Vec4};
