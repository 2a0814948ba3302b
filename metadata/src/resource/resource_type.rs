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

//! Resource types and their two-state lifecycle.
//!
//! A resource type is mutable while the provider registers properties
//! and becomes permanently read-only when `set_read_only` publishes
//! the sealed snapshot. The snapshot is a single-assignment slot, so
//! sealing is idempotent and a reader can never observe a type half
//! way through the transition: either the slot is empty (still
//! building) or it holds the complete property/key/etag views.
//!
//! Cross-links that could form ownership cycles (property value types
//! of complex and entity shape) are not stored here; properties carry
//! a `QualifiedName` resolved through the owning model instead.

use crate::error::Error;
use crate::ident::Namespace;
use crate::ident::QualifiedName;
use crate::ident::SimpleIdentifier;
use crate::resource::primitive::PrimitiveKind;
use crate::resource::InstanceTypeDescriptor;
use crate::resource::IsAbstract;
use crate::resource::IsOpenType;
use crate::resource::ResourceProperty;
use crate::resource::ResourceTypeKind;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::OnceLock;

/// Property views computed once at seal time.
struct SealedType {
    declared_properties: Vec<Arc<ResourceProperty>>,
    all_properties: Vec<Arc<ResourceProperty>>,
    key_properties: Vec<Arc<ResourceProperty>>,
    etag_properties: Vec<Arc<ResourceProperty>>,
}

/// Provider-neutral description of an entity, complex, primitive or
/// collection type.
pub struct ResourceType {
    name: SimpleIdentifier,
    namespace: Namespace,
    kind: ResourceTypeKind,
    primitive_kind: Option<PrimitiveKind>,
    instance_type: InstanceTypeDescriptor,
    base_type: Option<Arc<ResourceType>>,
    item_type: Option<Arc<ResourceType>>,
    is_abstract: IsAbstract,
    is_open_type: IsOpenType,
    building: Mutex<Vec<Arc<ResourceProperty>>>,
    sealed: OnceLock<SealedType>,
}

impl ResourceType {
    /// Built-in primitive type. Primitives have no children and are
    /// sealed from birth; the interning table in `primitive` is the
    /// only caller.
    pub(crate) fn primitive(kind: PrimitiveKind) -> Arc<Self> {
        let this = Self {
            name: kind.name().parse().expect("primitive names are identifiers"),
            namespace: "Edm".parse().expect("Edm is a namespace"),
            kind: ResourceTypeKind::Primitive,
            primitive_kind: Some(kind),
            instance_type: InstanceTypeDescriptor::new(kind.to_string()),
            base_type: None,
            item_type: None,
            is_abstract: IsAbstract::new(false),
            is_open_type: IsOpenType::new(false),
            building: Mutex::new(Vec::new()),
            sealed: OnceLock::new(),
        };
        let _ = this.sealed.set(SealedType {
            declared_properties: Vec::new(),
            all_properties: Vec::new(),
            key_properties: Vec::new(),
            etag_properties: Vec::new(),
        });
        Arc::new(this)
    }

    /// Declare an entity type.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid identifiers or when the base type
    /// is not itself an entity type.
    pub fn entity(
        name: &str,
        namespace: &str,
        instance_type: InstanceTypeDescriptor,
        base_type: Option<Arc<Self>>,
        is_abstract: IsAbstract,
        is_open_type: IsOpenType,
    ) -> Result<Arc<Self>, Error> {
        Self::structured(
            name,
            namespace,
            ResourceTypeKind::EntityType,
            instance_type,
            base_type,
            is_abstract,
            is_open_type,
        )
    }

    /// Declare a complex type.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid identifiers or when the base type
    /// is not itself a complex type.
    pub fn complex(
        name: &str,
        namespace: &str,
        instance_type: InstanceTypeDescriptor,
        base_type: Option<Arc<Self>>,
    ) -> Result<Arc<Self>, Error> {
        Self::structured(
            name,
            namespace,
            ResourceTypeKind::ComplexType,
            instance_type,
            base_type,
            IsAbstract::new(false),
            IsOpenType::new(false),
        )
    }

    fn structured(
        name: &str,
        namespace: &str,
        kind: ResourceTypeKind,
        instance_type: InstanceTypeDescriptor,
        base_type: Option<Arc<Self>>,
        is_abstract: IsAbstract,
        is_open_type: IsOpenType,
    ) -> Result<Arc<Self>, Error> {
        let name: SimpleIdentifier = name.parse()?;
        let namespace: Namespace = namespace.parse()?;
        if let Some(base) = &base_type {
            if base.kind != kind {
                return Err(Error::BaseTypeKindMismatch(base.full_name()));
            }
        }
        Ok(Arc::new(Self {
            name,
            namespace,
            kind,
            primitive_kind: None,
            instance_type,
            base_type,
            item_type: None,
            is_abstract,
            is_open_type,
            building: Mutex::new(Vec::new()),
            sealed: OnceLock::new(),
        }))
    }

    /// Wrap a primitive or complex item into a multi-valued type.
    ///
    /// # Errors
    ///
    /// Returns an error when the item is an entity or collection
    /// type, or a stream primitive.
    pub fn collection(item_type: Arc<Self>) -> Result<Arc<Self>, Error> {
        match item_type.kind {
            ResourceTypeKind::Primitive if item_type.is_stream() => {
                return Err(Error::CollectionItemStream)
            }
            ResourceTypeKind::Primitive | ResourceTypeKind::ComplexType => {}
            _ => return Err(Error::CollectionItemKind(item_type.full_name())),
        }
        Ok(Self::wrapper(ResourceTypeKind::Collection, item_type))
    }

    /// Wrap an entity item into a multi-valued type.
    ///
    /// # Errors
    ///
    /// Returns an error when the item is not an entity type.
    pub fn entity_collection(item_type: Arc<Self>) -> Result<Arc<Self>, Error> {
        if item_type.kind != ResourceTypeKind::EntityType {
            return Err(Error::EntityCollectionItemKind(item_type.full_name()));
        }
        Ok(Self::wrapper(ResourceTypeKind::EntityCollection, item_type))
    }

    fn wrapper(kind: ResourceTypeKind, item_type: Arc<Self>) -> Arc<Self> {
        Arc::new(Self {
            name: item_type.name.clone(),
            namespace: item_type.namespace.clone(),
            kind,
            primitive_kind: None,
            instance_type: InstanceTypeDescriptor::new(format!(
                "Collection({})",
                item_type.instance_type.inner()
            )),
            base_type: None,
            item_type: Some(item_type),
            is_abstract: IsAbstract::new(false),
            is_open_type: IsOpenType::new(false),
            building: Mutex::new(Vec::new()),
            sealed: OnceLock::new(),
        })
    }

    #[must_use]
    pub const fn name(&self) -> &SimpleIdentifier {
        &self.name
    }

    #[must_use]
    pub const fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    #[must_use]
    pub const fn kind(&self) -> ResourceTypeKind {
        self.kind
    }

    #[must_use]
    pub const fn instance_type(&self) -> &InstanceTypeDescriptor {
        &self.instance_type
    }

    #[must_use]
    pub const fn base_type(&self) -> Option<&Arc<Self>> {
        self.base_type.as_ref()
    }

    #[must_use]
    pub const fn item_type(&self) -> Option<&Arc<Self>> {
        self.item_type.as_ref()
    }

    #[must_use]
    pub const fn is_abstract(&self) -> IsAbstract {
        self.is_abstract
    }

    #[must_use]
    pub const fn is_open_type(&self) -> IsOpenType {
        self.is_open_type
    }

    #[must_use]
    pub const fn primitive_kind(&self) -> Option<PrimitiveKind> {
        self.primitive_kind
    }

    /// A stream-valued primitive.
    #[must_use]
    pub fn is_stream(&self) -> bool {
        self.primitive_kind.map_or(false, PrimitiveKind::is_stream)
    }

    /// Display name. Collections render as `Collection(Item.FullName)`.
    ///
    /// # Panics
    ///
    /// Never panics for types built through the public constructors;
    /// collection variants always carry an item type.
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.kind.is_collection() {
            let item = self.item_type.as_ref().expect("collections carry an item");
            format!("Collection({})", item.full_name())
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Arena key of a declared (non-collection) type.
    #[must_use]
    pub fn qualified_name(&self) -> Option<QualifiedName> {
        if self.kind.is_collection() {
            None
        } else {
            Some(QualifiedName::new(self.namespace.clone(), self.name.clone()))
        }
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.sealed.get().is_some()
    }

    /// Register a property on a structured type that is still being
    /// built.
    ///
    /// # Errors
    ///
    /// Returns an error after sealing, on non-structured types, on
    /// duplicate names, when the property already belongs to another
    /// type, and when a key property lands anywhere but the root
    /// entity type.
    pub fn add_property(&self, property: Arc<ResourceProperty>) -> Result<(), Error> {
        if self.is_read_only() {
            return Err(Error::TypeSealed(self.full_name()));
        }
        if !self.kind.is_structured() {
            return Err(Error::PropertyOnUnstructuredType(self.full_name()));
        }
        if property.is_key() {
            if self.kind != ResourceTypeKind::EntityType {
                return Err(Error::KeyOnNonEntityType(property.name().inner().clone()));
            }
            if self.base_type.is_some() {
                return Err(Error::KeyOnDerivedType(property.name().inner().clone()));
            }
        }
        let mut building = self.building.lock().expect("not poisoned");
        if building.iter().any(|p| p.name() == property.name()) {
            return Err(Error::DuplicateProperty(property.name().inner().clone()));
        }
        property.claim_owner(self.full_name())?;
        building.push(property);
        Ok(())
    }

    /// Seal the type. Idempotent; the first call seals the base and
    /// item types, then the owned properties, then publishes the
    /// property views, in that order, so a sealed type never exposes
    /// an unsealed child.
    ///
    /// # Errors
    ///
    /// Returns an error when a root entity type ends up without key
    /// properties or a declared property shadows an inherited name.
    pub fn set_read_only(&self) -> Result<(), Error> {
        if self.is_read_only() {
            return Ok(());
        }
        if let Some(base) = &self.base_type {
            base.set_read_only()?;
        }
        if let Some(item) = &self.item_type {
            item.set_read_only()?;
        }
        let declared = self.building.lock().expect("not poisoned").clone();
        for property in &declared {
            property.seal();
        }
        let mut all: Vec<Arc<ResourceProperty>> = match &self.base_type {
            Some(base) => base.properties().to_vec(),
            None => Vec::new(),
        };
        for property in &declared {
            if all.iter().any(|p| p.name() == property.name()) {
                return Err(Error::Type(
                    self.full_name(),
                    Box::new(Error::DuplicateProperty(property.name().inner().clone())),
                ));
            }
        }
        all.extend(declared.iter().cloned());
        let key_properties: Vec<_> = all.iter().filter(|p| p.is_key()).cloned().collect();
        let etag_properties: Vec<_> = all.iter().filter(|p| p.is_etag()).cloned().collect();
        if self.kind == ResourceTypeKind::EntityType
            && self.base_type.is_none()
            && key_properties.is_empty()
        {
            return Err(Error::MissingKeyProperties(self.full_name()));
        }
        let _ = self.sealed.set(SealedType {
            declared_properties: declared,
            all_properties: all,
            key_properties,
            etag_properties,
        });
        Ok(())
    }

    fn sealed_state(&self) -> &SealedType {
        self.sealed
            .get()
            .expect("resource type read before sealing")
    }

    /// All properties, base-most first, in declaration order.
    ///
    /// # Panics
    ///
    /// Structural reads are only valid on sealed types; calling this
    /// before `set_read_only` is a defect in the caller.
    #[must_use]
    pub fn properties(&self) -> &[Arc<ResourceProperty>] {
        &self.sealed_state().all_properties
    }

    /// Properties declared on this type, excluding inherited ones.
    ///
    /// # Panics
    ///
    /// See [`Self::properties`].
    #[must_use]
    pub fn properties_declared(&self) -> &[Arc<ResourceProperty>] {
        &self.sealed_state().declared_properties
    }

    /// Key properties in declaration order.
    ///
    /// # Panics
    ///
    /// See [`Self::properties`].
    #[must_use]
    pub fn key_properties(&self) -> &[Arc<ResourceProperty>] {
        &self.sealed_state().key_properties
    }

    /// Concurrency-token properties.
    ///
    /// # Panics
    ///
    /// See [`Self::properties`].
    #[must_use]
    pub fn etag_properties(&self) -> &[Arc<ResourceProperty>] {
        &self.sealed_state().etag_properties
    }

    /// Whether `other` is this type or one of its descendants.
    #[must_use]
    pub fn is_assignable_from(self: &Arc<Self>, other: &Arc<Self>) -> bool {
        let mut current = Some(other.clone());
        while let Some(t) = current {
            if Arc::ptr_eq(self, &t) {
                return true;
            }
            current = t.base_type.clone();
        }
        false
    }

    /// This type followed by its ancestors, nearest first.
    #[must_use]
    pub fn base_types_and_self(self: &Arc<Self>) -> Vec<Arc<Self>> {
        let mut chain = vec![self.clone()];
        let mut current = self.base_type.clone();
        while let Some(t) = current {
            current = t.base_type.clone();
            chain.push(t);
        }
        chain
    }
}

impl Debug for ResourceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {}", self.kind, self.full_name())
    }
}
