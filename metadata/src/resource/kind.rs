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

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::ops::BitOr;

/// Variant of a resource type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceTypeKind {
    /// Built-in scalar type.
    Primitive,
    /// Structured type without identity.
    ComplexType,
    /// Structured type with key properties, addressable in a set.
    EntityType,
    /// Multi-valued wrapper over a primitive or complex item.
    Collection,
    /// Multi-valued wrapper over an entity item.
    EntityCollection,
}

impl ResourceTypeKind {
    /// Structured types can declare properties and take part in
    /// inheritance; collection wrappers and primitives cannot.
    #[must_use]
    pub fn is_structured(self) -> bool {
        matches!(self, Self::ComplexType | Self::EntityType)
    }

    /// Collection wrappers always carry exactly one item type.
    #[must_use]
    pub fn is_collection(self) -> bool {
        matches!(self, Self::Collection | Self::EntityCollection)
    }
}

impl Display for ResourceTypeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let v = match self {
            Self::Primitive => "Primitive",
            Self::ComplexType => "ComplexType",
            Self::EntityType => "EntityType",
            Self::Collection => "Collection",
            Self::EntityCollection => "EntityCollection",
        };
        f.write_str(v)
    }
}

/// Flag set describing what a property is: exactly one value-shape
/// flag, optionally refined by `KEY`/`ETAG` for primitive properties.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourcePropertyKind(u32);

impl ResourcePropertyKind {
    pub const PRIMITIVE: Self = Self(0x01);
    pub const KEY: Self = Self(0x02);
    pub const COMPLEX_TYPE: Self = Self(0x04);
    pub const RESOURCE_REFERENCE: Self = Self(0x08);
    pub const RESOURCE_SET_REFERENCE: Self = Self(0x10);
    pub const ETAG: Self = Self(0x20);
    pub const COLLECTION: Self = Self(0x40);
    pub const STREAM: Self = Self(0x80);

    const SHAPES: [Self; 6] = [
        Self::PRIMITIVE,
        Self::COMPLEX_TYPE,
        Self::RESOURCE_REFERENCE,
        Self::RESOURCE_SET_REFERENCE,
        Self::COLLECTION,
        Self::STREAM,
    ];

    /// All flags of `other` set on `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// A property must have exactly one value-shape flag, and the
    /// `KEY`/`ETAG` refinements apply to primitive properties only.
    #[must_use]
    pub fn is_valid_combination(self) -> bool {
        let shapes = Self::SHAPES.iter().filter(|s| self.contains(**s)).count();
        if shapes != 1 {
            return false;
        }
        if (self.contains(Self::KEY) || self.contains(Self::ETAG))
            && !self.contains(Self::PRIMITIVE)
        {
            return false;
        }
        // A concurrency token cannot be part of the key.
        !(self.contains(Self::KEY) && self.contains(Self::ETAG))
    }

    /// Navigation properties are the single- and set-valued entity
    /// references.
    #[must_use]
    pub const fn is_navigation(self) -> bool {
        self.contains(Self::RESOURCE_REFERENCE) || self.contains(Self::RESOURCE_SET_REFERENCE)
    }
}

impl BitOr for ResourcePropertyKind {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl Debug for ResourcePropertyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let names = [
            (Self::PRIMITIVE, "Primitive"),
            (Self::KEY, "Key"),
            (Self::COMPLEX_TYPE, "ComplexType"),
            (Self::RESOURCE_REFERENCE, "ResourceReference"),
            (Self::RESOURCE_SET_REFERENCE, "ResourceSetReference"),
            (Self::ETAG, "ETag"),
            (Self::COLLECTION, "Collection"),
            (Self::STREAM, "Stream"),
        ];
        let mut first = true;
        for (flag, name) in names.iter() {
            if self.contains(*flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("None")?;
        }
        Ok(())
    }
}
