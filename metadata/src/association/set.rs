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

//! Set-level associations.

use crate::association::ResourceAssociationType;
use crate::error::Error;
use crate::ident::SimpleIdentifier;
use crate::resource::ResourceProperty;
use crate::resource::ResourceSet;
use crate::resource::ResourceSetWrapper;
use crate::resource::ResourceType;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;
use std::sync::OnceLock;

/// One side of a set-level association: which set, which type within
/// that set's hierarchy, and optionally which navigation property
/// points across.
pub struct ResourceAssociationSetEnd {
    resource_set: Arc<ResourceSet>,
    resource_type: Arc<ResourceType>,
    resource_property: Option<Arc<ResourceProperty>>,
}

impl ResourceAssociationSetEnd {
    /// Build an association end.
    ///
    /// # Errors
    ///
    /// Returns an error when the end type is unrelated to the set's
    /// element type.
    pub fn new(
        resource_set: Arc<ResourceSet>,
        resource_type: Arc<ResourceType>,
        resource_property: Option<Arc<ResourceProperty>>,
    ) -> Result<Self, Error> {
        let set_type = resource_set.resource_type();
        if !set_type.is_assignable_from(&resource_type)
            && !resource_type.is_assignable_from(set_type)
        {
            return Err(Error::AssociationEndTypeMismatch(
                resource_set.name().inner().clone(),
            ));
        }
        Ok(Self {
            resource_set,
            resource_type,
            resource_property,
        })
    }

    #[must_use]
    pub const fn resource_set(&self) -> &Arc<ResourceSet> {
        &self.resource_set
    }

    #[must_use]
    pub const fn resource_type(&self) -> &Arc<ResourceType> {
        &self.resource_type
    }

    #[must_use]
    pub const fn resource_property(&self) -> Option<&Arc<ResourceProperty>> {
        self.resource_property.as_ref()
    }

    fn matches(
        &self,
        set: &Arc<ResourceSetWrapper>,
        resource_type: &Arc<ResourceType>,
        property: Option<&Arc<ResourceProperty>>,
    ) -> bool {
        if self.resource_set.name() != set.name() {
            return false;
        }
        if !self.resource_type.is_assignable_from(resource_type)
            && !resource_type.is_assignable_from(&self.resource_type)
        {
            return false;
        }
        match (&self.resource_property, property) {
            (None, None) => true,
            (Some(mine), Some(theirs)) => mine.name() == theirs.name(),
            _ => false,
        }
    }
}

impl Debug for ResourceAssociationSetEnd {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}/{}",
            self.resource_set.name(),
            self.resource_type.full_name()
        )?;
        if let Some(p) = &self.resource_property {
            write!(f, ".{}", p.name())?;
        }
        Ok(())
    }
}

/// A named pairing of two association ends.
pub struct ResourceAssociationSet {
    name: SimpleIdentifier,
    end1: ResourceAssociationSetEnd,
    end2: ResourceAssociationSetEnd,
    association_type: OnceLock<Arc<ResourceAssociationType>>,
}

impl ResourceAssociationSet {
    /// Pair two ends.
    ///
    /// # Errors
    ///
    /// Returns an error on an invalid name or when neither end
    /// carries a navigation property.
    pub fn new(
        name: &str,
        end1: ResourceAssociationSetEnd,
        end2: ResourceAssociationSetEnd,
    ) -> Result<Arc<Self>, Error> {
        let name: SimpleIdentifier = name.parse()?;
        if end1.resource_property.is_none() && end2.resource_property.is_none() {
            return Err(Error::AssociationEndPropertiesBothNull(
                name.inner().clone(),
            ));
        }
        Ok(Arc::new(Self {
            name,
            end1,
            end2,
            association_type: OnceLock::new(),
        }))
    }

    #[must_use]
    pub const fn name(&self) -> &SimpleIdentifier {
        &self.name
    }

    #[must_use]
    pub const fn end1(&self) -> &ResourceAssociationSetEnd {
        &self.end1
    }

    #[must_use]
    pub const fn end2(&self) -> &ResourceAssociationSetEnd {
        &self.end2
    }

    /// Attach the type-level association. Write-once.
    ///
    /// # Errors
    ///
    /// Returns an error on a second write.
    pub fn set_association_type(
        &self,
        association_type: Arc<ResourceAssociationType>,
    ) -> Result<(), Error> {
        self.association_type
            .set(association_type)
            .map_err(|_| Error::AssociationTypeAlreadySet(self.name.inner().clone()))
    }

    #[must_use]
    pub fn association_type(&self) -> Option<&Arc<ResourceAssociationType>> {
        self.association_type.get()
    }

    /// The end matching a (set, type, property) triple, if any.
    #[must_use]
    pub fn get_resource_association_set_end(
        &self,
        set: &Arc<ResourceSetWrapper>,
        resource_type: &Arc<ResourceType>,
        property: Option<&Arc<ResourceProperty>>,
    ) -> Option<&ResourceAssociationSetEnd> {
        if self.end1.matches(set, resource_type, property) {
            Some(&self.end1)
        } else if self.end2.matches(set, resource_type, property) {
            Some(&self.end2)
        } else {
            None
        }
    }

    /// The end across from the one matching the triple, if any.
    #[must_use]
    pub fn get_related_resource_association_set_end(
        &self,
        set: &Arc<ResourceSetWrapper>,
        resource_type: &Arc<ResourceType>,
        property: Option<&Arc<ResourceProperty>>,
    ) -> Option<&ResourceAssociationSetEnd> {
        if self.end1.matches(set, resource_type, property) {
            Some(&self.end2)
        } else if self.end2.matches(set, resource_type, property) {
            Some(&self.end1)
        } else {
            None
        }
    }
}

impl Debug for ResourceAssociationSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {:?} <-> {:?}", self.name, self.end1, self.end2)
    }
}
