// SPDX-FileCopyrightText: Copyright (c) 2025 the odata-svc authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Typed and set-level associations between resource types/sets.

/// Set-level associations.
pub mod set;

/// Type-level associations shared across every set of a type.
pub mod association_type;

use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Reexport `ResourceAssociationSet` to the level of the module.
pub use set::ResourceAssociationSet;
/// Reexport `ResourceAssociationSetEnd` to the level of the module.
pub use set::ResourceAssociationSetEnd;
/// Reexport `ResourceAssociationType` to the level of the module.
pub use association_type::ResourceAssociationType;
/// Reexport `ResourceAssociationTypeEnd` to the level of the module.
pub use association_type::ResourceAssociationTypeEnd;
/// Reexport `ResourceReferentialConstraint` to the level of the module.
pub use association_type::ResourceReferentialConstraint;

/// How many entities can appear at an association end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Multiplicity {
    Many,
    One,
    ZeroOrOne,
}

impl Display for Multiplicity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let v = match self {
            Self::Many => "*",
            Self::One => "1",
            Self::ZeroOrOne => "0..1",
        };
        v.fmt(f)
    }
}

/// What deleting the source entity does to the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnDeleteAction {
    None,
    Cascade,
}
