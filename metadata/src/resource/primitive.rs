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

//! Built-in `Edm` primitive types.
//!
//! Primitive resource types are born sealed and interned in a single
//! process-wide table, so identity equality holds for them the same
//! way it holds for provider-declared types: asking for `Edm.Int32`
//! twice yields the same instance.

use crate::resource::ResourceType;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;
use std::sync::OnceLock;

/// Built-in primitive type discriminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Binary,
    Boolean,
    Byte,
    DateTimeOffset,
    Decimal,
    Double,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    Stream,
    String,
}

impl PrimitiveKind {
    const ALL: [Self; 14] = [
        Self::Binary,
        Self::Boolean,
        Self::Byte,
        Self::DateTimeOffset,
        Self::Decimal,
        Self::Double,
        Self::Guid,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::SByte,
        Self::Single,
        Self::Stream,
        Self::String,
    ];

    /// Unqualified `Edm` name of the primitive.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Binary => "Binary",
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::Decimal => "Decimal",
            Self::Double => "Double",
            Self::Guid => "Guid",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::SByte => "SByte",
            Self::Single => "Single",
            Self::Stream => "Stream",
            Self::String => "String",
        }
    }

    /// Stream primitives are only usable as media/stream properties,
    /// never as collection items or operation parameters.
    #[must_use]
    pub fn is_stream(self) -> bool {
        self == Self::Stream
    }
}

impl Display for PrimitiveKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Edm.{}", self.name())
    }
}

/// Interned resource type for a built-in primitive.
#[must_use]
pub fn resource_type(kind: PrimitiveKind) -> Arc<ResourceType> {
    static TABLE: OnceLock<Vec<(PrimitiveKind, Arc<ResourceType>)>> = OnceLock::new();
    let table = TABLE.get_or_init(|| {
        PrimitiveKind::ALL
            .iter()
            .map(|k| (*k, ResourceType::primitive(*k)))
            .collect()
    });
    table
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, t)| t.clone())
        .expect("every primitive kind is interned")
}
