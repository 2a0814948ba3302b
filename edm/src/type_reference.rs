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

use odata_svc_metadata::resource::PrimitiveKind;
use odata_svc_metadata::QualifiedName;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Reference to an EDM type, as it appears on properties, parameters
/// and return types.
#[derive(Clone, Debug)]
pub enum EdmTypeReference {
    Primitive { kind: PrimitiveKind, nullable: bool },
    Complex { name: QualifiedName, nullable: bool },
    Entity { name: QualifiedName, nullable: bool },
    Collection(Box<EdmTypeReference>),
}

impl EdmTypeReference {
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Primitive { nullable, .. }
            | Self::Complex { nullable, .. }
            | Self::Entity { nullable, .. } => *nullable,
            Self::Collection(_) => false,
        }
    }

    /// The element reference of a collection, or the reference
    /// itself.
    #[must_use]
    pub fn element(&self) -> &Self {
        match self {
            Self::Collection(inner) => inner.element(),
            _ => self,
        }
    }
}

impl Display for EdmTypeReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Primitive { kind, .. } => kind.fmt(f),
            Self::Complex { name, .. } | Self::Entity { name, .. } => name.fmt(f),
            Self::Collection(inner) => write!(f, "Collection({inner})"),
        }
    }
}
