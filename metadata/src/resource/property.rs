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

//! Properties declared on resource types.

use crate::error::Error;
use crate::ident::QualifiedName;
use crate::ident::SimpleIdentifier;
use crate::resource::ResourcePropertyKind;
use crate::resource::ResourceType;
use crate::resource::ResourceTypeKind;
use std::any::Any;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;
use std::sync::OnceLock;

/// Value type of a property.
///
/// Primitive, stream and collection values own their (acyclic) type
/// directly. Complex and entity targets are named and resolved
/// through the model, because those links can close a cycle back to
/// the declaring type.
#[derive(Clone)]
pub enum PropertyTypeRef {
    /// Directly owned value type.
    Inline(Arc<ResourceType>),
    /// Arena reference resolved through the metadata model.
    Declared(QualifiedName),
}

impl Debug for PropertyTypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Inline(t) => write!(f, "{}", t.full_name()),
            Self::Declared(qn) => write!(f, "{qn}"),
        }
    }
}

impl PropertyTypeRef {
    /// Display name of the referenced type.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Self::Inline(t) => t.full_name(),
            Self::Declared(qn) => qn.to_string(),
        }
    }
}

/// A property owned by exactly one declaring resource type.
pub struct ResourceProperty {
    name: SimpleIdentifier,
    kind: ResourcePropertyKind,
    property_type: PropertyTypeRef,
    owner: OnceLock<String>,
    custom_state: OnceLock<Box<dyn Any + Send + Sync>>,
    sealed: OnceLock<()>,
}

impl ResourceProperty {
    /// Declare a property.
    ///
    /// # Errors
    ///
    /// Returns an error on an invalid name, an invalid kind flag
    /// combination, or when the kind and the shape of the value type
    /// disagree (a primitive kind with a named target, a collection
    /// kind with a non-collection type, and so on).
    pub fn new(
        name: &str,
        kind: ResourcePropertyKind,
        property_type: PropertyTypeRef,
    ) -> Result<Arc<Self>, Error> {
        let name: SimpleIdentifier = name.parse()?;
        if !kind.is_valid_combination() {
            return Err(Error::InvalidPropertyKind(name.inner().clone()));
        }
        let consistent = match (&property_type, kind) {
            (PropertyTypeRef::Inline(t), k) if k.contains(ResourcePropertyKind::PRIMITIVE) => {
                t.kind() == ResourceTypeKind::Primitive && !t.is_stream()
            }
            (PropertyTypeRef::Inline(t), k) if k.contains(ResourcePropertyKind::STREAM) => {
                t.is_stream()
            }
            (PropertyTypeRef::Inline(t), k) if k.contains(ResourcePropertyKind::COLLECTION) => {
                t.kind() == ResourceTypeKind::Collection
            }
            (PropertyTypeRef::Declared(_), k) => {
                k.contains(ResourcePropertyKind::COMPLEX_TYPE) || k.is_navigation()
            }
            _ => false,
        };
        if !consistent {
            return Err(Error::PropertyTypeMismatch(name.inner().clone()));
        }
        Ok(Arc::new(Self {
            name,
            kind,
            property_type,
            owner: OnceLock::new(),
            custom_state: OnceLock::new(),
            sealed: OnceLock::new(),
        }))
    }

    #[must_use]
    pub const fn name(&self) -> &SimpleIdentifier {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> ResourcePropertyKind {
        self.kind
    }

    #[must_use]
    pub const fn property_type(&self) -> &PropertyTypeRef {
        &self.property_type
    }

    /// Arena name of a complex/entity target, if any.
    #[must_use]
    pub fn declared_target(&self) -> Option<&QualifiedName> {
        match &self.property_type {
            PropertyTypeRef::Declared(qn) => Some(qn),
            PropertyTypeRef::Inline(_) => None,
        }
    }

    /// Directly owned value type, if any.
    #[must_use]
    pub fn inline_type(&self) -> Option<&Arc<ResourceType>> {
        match &self.property_type {
            PropertyTypeRef::Inline(t) => Some(t),
            PropertyTypeRef::Declared(_) => None,
        }
    }

    #[must_use]
    pub fn is_key(&self) -> bool {
        self.kind.contains(ResourcePropertyKind::KEY)
    }

    #[must_use]
    pub fn is_etag(&self) -> bool {
        self.kind.contains(ResourcePropertyKind::ETAG)
    }

    #[must_use]
    pub fn is_navigation(&self) -> bool {
        self.kind.is_navigation()
    }

    /// Bind this property to its declaring type. A property instance
    /// is never shared between types; derived types carry their own
    /// instances.
    pub(crate) fn claim_owner(&self, owner: String) -> Result<(), Error> {
        self.owner
            .set(owner)
            .map_err(|_| Error::PropertyAlreadyOwned(self.name.inner().clone()))
    }

    /// Full name of the declaring type, once added.
    #[must_use]
    pub fn owner(&self) -> Option<&String> {
        self.owner.get()
    }

    pub(crate) fn seal(&self) {
        let _ = self.sealed.set(());
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.sealed.get().is_some()
    }

    /// Attach opaque provider state. Write-once, and only before the
    /// declaring type is sealed.
    ///
    /// # Errors
    ///
    /// Returns an error after sealing or on a second write.
    pub fn set_custom_state(&self, state: Box<dyn Any + Send + Sync>) -> Result<(), Error> {
        if self.is_read_only() {
            return Err(Error::TypeSealed(self.name.inner().clone()));
        }
        self.custom_state
            .set(state)
            .map_err(|_| Error::CustomStateAlreadySet(self.name.inner().clone()))
    }

    #[must_use]
    pub fn custom_state(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.custom_state.get().map(|v| &**v)
    }
}

impl Debug for ResourceProperty {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {:?} ({:?})", self.name, self.kind, self.property_type)
    }
}
