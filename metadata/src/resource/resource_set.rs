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

//! Named, queryable sets of entities.

use crate::error::Error;
use crate::ident::SimpleIdentifier;
use crate::resource::ResourceProperty;
use crate::resource::ResourceType;
use crate::resource::ResourceTypeKind;
use crate::resource::UseMetadataKeyOrder;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::OnceLock;

/// Set options sealed together with the model.
struct SealedSetConfig {
    entity_container_name: SimpleIdentifier,
    use_metadata_key_order: UseMetadataKeyOrder,
}

/// A named collection of one entity type.
pub struct ResourceSet {
    name: SimpleIdentifier,
    resource_type: Arc<ResourceType>,
    entity_container_name: OnceLock<SimpleIdentifier>,
    key_order: Mutex<Option<UseMetadataKeyOrder>>,
    sealed: OnceLock<SealedSetConfig>,
}

impl ResourceSet {
    /// Declare a set of entities.
    ///
    /// # Errors
    ///
    /// Returns an error on an invalid name or a non-entity element
    /// type.
    pub fn new(name: &str, resource_type: Arc<ResourceType>) -> Result<Arc<Self>, Error> {
        let name: SimpleIdentifier = name.parse()?;
        if resource_type.kind() != ResourceTypeKind::EntityType {
            return Err(Error::SetTypeNotEntity(resource_type.full_name()));
        }
        Ok(Arc::new(Self {
            name,
            resource_type,
            entity_container_name: OnceLock::new(),
            key_order: Mutex::new(None),
            sealed: OnceLock::new(),
        }))
    }

    #[must_use]
    pub const fn name(&self) -> &SimpleIdentifier {
        &self.name
    }

    #[must_use]
    pub const fn resource_type(&self) -> &Arc<ResourceType> {
        &self.resource_type
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.sealed.get().is_some()
    }

    /// Place the set into a container. Write-once.
    ///
    /// # Errors
    ///
    /// Returns an error after sealing or on a second write.
    pub fn set_entity_container_name(&self, container: &str) -> Result<(), Error> {
        if self.is_read_only() {
            return Err(Error::SetSealed(self.name.inner().clone()));
        }
        let container: SimpleIdentifier = container.parse()?;
        self.entity_container_name
            .set(container)
            .map_err(|_| Error::ContainerNameAlreadySet(self.name.inner().clone()))
    }

    /// Request declaration-order keys for this set.
    ///
    /// # Errors
    ///
    /// Returns an error after sealing.
    pub fn set_use_metadata_key_order(&self, flag: UseMetadataKeyOrder) -> Result<(), Error> {
        if self.is_read_only() {
            return Err(Error::SetSealed(self.name.inner().clone()));
        }
        *self.key_order.lock().expect("not poisoned") = Some(flag);
        Ok(())
    }

    /// Seal the set together with its element type. Model defaults
    /// fill whatever the provider left unset.
    pub(crate) fn seal(
        &self,
        default_container: &SimpleIdentifier,
        default_key_order: UseMetadataKeyOrder,
    ) -> Result<(), Error> {
        if self.is_read_only() {
            return Ok(());
        }
        self.resource_type.set_read_only()?;
        let container = self
            .entity_container_name
            .get()
            .cloned()
            .unwrap_or_else(|| default_container.clone());
        let key_order = self
            .key_order
            .lock()
            .expect("not poisoned")
            .unwrap_or(default_key_order);
        let _ = self.sealed.set(SealedSetConfig {
            entity_container_name: container,
            use_metadata_key_order: key_order,
        });
        Ok(())
    }

    fn sealed_state(&self) -> &SealedSetConfig {
        self.sealed.get().expect("resource set read before sealing")
    }

    /// Container holding this set.
    ///
    /// # Panics
    ///
    /// Only valid on a sealed set.
    #[must_use]
    pub fn entity_container_name(&self) -> &SimpleIdentifier {
        &self.sealed_state().entity_container_name
    }

    /// Key ordering requested for this set.
    ///
    /// # Panics
    ///
    /// Only valid on a sealed set.
    #[must_use]
    pub fn use_metadata_key_order(&self) -> UseMetadataKeyOrder {
        self.sealed_state().use_metadata_key_order
    }
}

impl Debug for ResourceSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "ResourceSet {} of {}", self.name, self.resource_type.full_name())
    }
}

/// Service-validated view over a registered resource set. Wrapper
/// identity (not set identity) is what the operation and projection
/// caches key on, so the model hands out one wrapper per set.
pub struct ResourceSetWrapper {
    set: Arc<ResourceSet>,
}

impl ResourceSetWrapper {
    #[must_use]
    pub fn new(set: Arc<ResourceSet>) -> Arc<Self> {
        Arc::new(Self { set })
    }

    #[must_use]
    pub fn name(&self) -> &SimpleIdentifier {
        self.set.name()
    }

    #[must_use]
    pub const fn resource_set(&self) -> &Arc<ResourceSet> {
        &self.set
    }

    #[must_use]
    pub fn resource_type(&self) -> &Arc<ResourceType> {
        self.set.resource_type()
    }

    /// Key properties of the element type in the order this set
    /// serializes them: declaration order when metadata key order was
    /// requested, name order otherwise.
    ///
    /// # Panics
    ///
    /// Only valid once the set is sealed.
    #[must_use]
    pub fn key_properties(&self) -> Vec<Arc<ResourceProperty>> {
        let mut keys = self.set.resource_type().key_properties().to_vec();
        if !self.set.use_metadata_key_order().into_inner() {
            keys.sort_by(|a, b| a.name().cmp(b.name()));
        }
        keys
    }
}

impl Debug for ResourceSetWrapper {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.set.fmt(f)
    }
}
