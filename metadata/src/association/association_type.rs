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

//! Type-level associations.
//!
//! A type-level association is shared across every set of its end
//! types, so ends here match by type and property identity rather
//! than by set name. Role names are generated by the code that builds
//! associations; asking for a role that does not exist is a defect in
//! this crate, not in provider input, and fails hard.

use crate::association::Multiplicity;
use crate::association::OnDeleteAction;
use crate::error::Error;
use crate::ident::Namespace;
use crate::ident::SimpleIdentifier;
use crate::resource::ResourceProperty;
use crate::resource::ResourceType;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;

/// One role of a type-level association.
pub struct ResourceAssociationTypeEnd {
    role_name: SimpleIdentifier,
    resource_type: Arc<ResourceType>,
    resource_property: Option<Arc<ResourceProperty>>,
    multiplicity: Multiplicity,
    delete_action: OnDeleteAction,
}

impl ResourceAssociationTypeEnd {
    /// Build a type-level end.
    ///
    /// # Errors
    ///
    /// Returns an error on an invalid role name.
    pub fn new(
        role_name: &str,
        resource_type: Arc<ResourceType>,
        resource_property: Option<Arc<ResourceProperty>>,
        multiplicity: Multiplicity,
        delete_action: OnDeleteAction,
    ) -> Result<Self, Error> {
        Ok(Self {
            role_name: role_name.parse()?,
            resource_type,
            resource_property,
            multiplicity,
            delete_action,
        })
    }

    #[must_use]
    pub const fn role_name(&self) -> &SimpleIdentifier {
        &self.role_name
    }

    #[must_use]
    pub const fn resource_type(&self) -> &Arc<ResourceType> {
        &self.resource_type
    }

    #[must_use]
    pub const fn resource_property(&self) -> Option<&Arc<ResourceProperty>> {
        self.resource_property.as_ref()
    }

    #[must_use]
    pub const fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    #[must_use]
    pub const fn delete_action(&self) -> OnDeleteAction {
        self.delete_action
    }

    fn matches(
        &self,
        resource_type: &Arc<ResourceType>,
        property: Option<&Arc<ResourceProperty>>,
    ) -> bool {
        let type_matches = Arc::ptr_eq(&self.resource_type, resource_type)
            || self.resource_type.full_name() == resource_type.full_name();
        if !type_matches {
            return false;
        }
        match (&self.resource_property, property) {
            (None, None) => true,
            (Some(mine), Some(theirs)) => mine.name() == theirs.name(),
            _ => false,
        }
    }
}

impl Debug for ResourceAssociationTypeEnd {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} ({}, {})",
            self.role_name,
            self.resource_type.full_name(),
            self.multiplicity
        )
    }
}

/// Ordered dependent-property list tied to the principal role.
pub struct ResourceReferentialConstraint {
    principal_role: SimpleIdentifier,
    dependent_properties: Vec<Arc<ResourceProperty>>,
}

impl ResourceReferentialConstraint {
    /// Build a referential constraint. The dependent property count
    /// is checked against the principal's key count when the model is
    /// finalized, once key properties are known.
    ///
    /// # Errors
    ///
    /// Returns an error on an invalid role name.
    pub fn new(
        principal_role: &str,
        dependent_properties: Vec<Arc<ResourceProperty>>,
    ) -> Result<Self, Error> {
        Ok(Self {
            principal_role: principal_role.parse()?,
            dependent_properties,
        })
    }

    #[must_use]
    pub const fn principal_role(&self) -> &SimpleIdentifier {
        &self.principal_role
    }

    #[must_use]
    pub fn dependent_properties(&self) -> &[Arc<ResourceProperty>] {
        &self.dependent_properties
    }
}

/// The per-type analogue of an association set.
pub struct ResourceAssociationType {
    name: SimpleIdentifier,
    namespace: Namespace,
    end1: ResourceAssociationTypeEnd,
    end2: ResourceAssociationTypeEnd,
    referential_constraint: Option<ResourceReferentialConstraint>,
}

impl ResourceAssociationType {
    /// Build a type-level association.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid identifiers or when a referential
    /// constraint names a role neither end declares.
    pub fn new(
        name: &str,
        namespace: &str,
        end1: ResourceAssociationTypeEnd,
        end2: ResourceAssociationTypeEnd,
        referential_constraint: Option<ResourceReferentialConstraint>,
    ) -> Result<Arc<Self>, Error> {
        let name: SimpleIdentifier = name.parse()?;
        let namespace: Namespace = namespace.parse()?;
        if let Some(constraint) = &referential_constraint {
            let role = constraint.principal_role();
            if role != end1.role_name() && role != end2.role_name() {
                return Err(Error::ReferentialConstraintRole(role.inner().clone()));
            }
        }
        Ok(Arc::new(Self {
            name,
            namespace,
            end1,
            end2,
            referential_constraint,
        }))
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
    pub const fn end1(&self) -> &ResourceAssociationTypeEnd {
        &self.end1
    }

    #[must_use]
    pub const fn end2(&self) -> &ResourceAssociationTypeEnd {
        &self.end2
    }

    #[must_use]
    pub const fn referential_constraint(&self) -> Option<&ResourceReferentialConstraint> {
        self.referential_constraint.as_ref()
    }

    /// The end playing the given role.
    ///
    /// # Panics
    ///
    /// Role names are generated internally and always valid once the
    /// association is constructed; an unknown role is a defect here.
    #[must_use]
    pub fn get_end(&self, role_name: &str) -> &ResourceAssociationTypeEnd {
        if self.end1.role_name().inner() == role_name {
            &self.end1
        } else if self.end2.role_name().inner() == role_name {
            &self.end2
        } else {
            panic!("unknown association role: {role_name}")
        }
    }

    /// The end across from the given role.
    ///
    /// # Panics
    ///
    /// See [`Self::get_end`].
    #[must_use]
    pub fn get_related_end(&self, role_name: &str) -> &ResourceAssociationTypeEnd {
        if self.end1.role_name().inner() == role_name {
            &self.end2
        } else if self.end2.role_name().inner() == role_name {
            &self.end1
        } else {
            panic!("unknown association role: {role_name}")
        }
    }

    /// The end matching a (type, property) pair by identity.
    #[must_use]
    pub fn end_for(
        &self,
        resource_type: &Arc<ResourceType>,
        property: Option<&Arc<ResourceProperty>>,
    ) -> Option<&ResourceAssociationTypeEnd> {
        if self.end1.matches(resource_type, property) {
            Some(&self.end1)
        } else if self.end2.matches(resource_type, property) {
            Some(&self.end2)
        } else {
            None
        }
    }

    /// The end across from a (type, property) pair.
    #[must_use]
    pub fn related_end_for(
        &self,
        resource_type: &Arc<ResourceType>,
        property: Option<&Arc<ResourceProperty>>,
    ) -> Option<&ResourceAssociationTypeEnd> {
        if self.end1.matches(resource_type, property) {
            Some(&self.end2)
        } else if self.end2.matches(resource_type, property) {
            Some(&self.end1)
        } else {
            None
        }
    }

    /// The end the referential constraint pins, if one exists.
    #[must_use]
    pub fn principal_end(&self) -> Option<&ResourceAssociationTypeEnd> {
        self.referential_constraint
            .as_ref()
            .map(|c| self.get_end(c.principal_role().inner()))
    }
}

impl Debug for ResourceAssociationType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}.{}: {:?} <-> {:?}",
            self.namespace, self.name, self.end1, self.end2
        )
    }
}
