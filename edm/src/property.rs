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

//! Projected structural and navigation properties.
//!
//! Navigation properties are built in two phases: declaration first,
//! partner fix-up second. The partner is stored as a (declaring type,
//! property name) reference resolved through the model, never as a
//! back-pointer, so the projected graph stays acyclic in ownership
//! even though navigation is bidirectional.

use crate::type_reference::EdmTypeReference;
use odata_svc_metadata::association::Multiplicity;
use odata_svc_metadata::association::OnDeleteAction;
use odata_svc_metadata::resource::ResourceProperty;
use odata_svc_metadata::QualifiedName;
use odata_svc_metadata::SimpleIdentifier;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;
use std::sync::OnceLock;

/// (declaring type, property name) reference to another projected
/// property.
#[derive(Clone, Debug)]
pub struct EdmPropertyRef {
    pub declaring_type: QualifiedName,
    pub name: SimpleIdentifier,
}

/// Projected structural property, retaining the originating resource
/// property so downstream code can recover provider semantics from
/// the generic EDM shape.
pub struct EdmStructuralProperty {
    name: SimpleIdentifier,
    declaring_type: QualifiedName,
    type_reference: EdmTypeReference,
    source: Arc<ResourceProperty>,
}

impl EdmStructuralProperty {
    pub(crate) fn new(
        declaring_type: QualifiedName,
        type_reference: EdmTypeReference,
        source: Arc<ResourceProperty>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: source.name().clone(),
            declaring_type,
            type_reference,
            source,
        })
    }

    #[must_use]
    pub const fn name(&self) -> &SimpleIdentifier {
        &self.name
    }

    #[must_use]
    pub const fn declaring_type(&self) -> &QualifiedName {
        &self.declaring_type
    }

    #[must_use]
    pub const fn type_reference(&self) -> &EdmTypeReference {
        &self.type_reference
    }

    /// The resource property this projection mirrors.
    #[must_use]
    pub const fn source(&self) -> &Arc<ResourceProperty> {
        &self.source
    }
}

impl Debug for EdmStructuralProperty {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}: {}", self.declaring_type, self.name, self.type_reference)
    }
}

/// Projected navigation property.
pub struct EdmNavigationProperty {
    name: SimpleIdentifier,
    declaring_type: QualifiedName,
    target_type: QualifiedName,
    collection: bool,
    multiplicity: Multiplicity,
    on_delete: OnDeleteAction,
    source: Option<Arc<ResourceProperty>>,
    partner: OnceLock<EdmPropertyRef>,
    dependent_properties: OnceLock<Vec<SimpleIdentifier>>,
    silent: bool,
}

impl EdmNavigationProperty {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: SimpleIdentifier,
        declaring_type: QualifiedName,
        target_type: QualifiedName,
        collection: bool,
        multiplicity: Multiplicity,
        on_delete: OnDeleteAction,
        source: Option<Arc<ResourceProperty>>,
        silent: bool,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            declaring_type,
            target_type,
            collection,
            multiplicity,
            on_delete,
            source,
            partner: OnceLock::new(),
            dependent_properties: OnceLock::new(),
            silent,
        })
    }

    #[must_use]
    pub const fn name(&self) -> &SimpleIdentifier {
        &self.name
    }

    #[must_use]
    pub const fn declaring_type(&self) -> &QualifiedName {
        &self.declaring_type
    }

    #[must_use]
    pub const fn target_type(&self) -> &QualifiedName {
        &self.target_type
    }

    /// Set-valued navigation.
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        self.collection
    }

    /// Multiplicity of the far end.
    #[must_use]
    pub const fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    #[must_use]
    pub const fn on_delete(&self) -> OnDeleteAction {
        self.on_delete
    }

    /// The resource property this projection mirrors; silent partners
    /// have none.
    #[must_use]
    pub const fn source(&self) -> Option<&Arc<ResourceProperty>> {
        self.source.as_ref()
    }

    /// A partner synthesized for a one-directional association.
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        self.silent
    }

    pub(crate) fn set_partner(&self, partner: EdmPropertyRef) {
        let _ = self.partner.set(partner);
    }

    /// Reference to the reverse-direction property. Always present
    /// after fix-up.
    #[must_use]
    pub fn partner(&self) -> Option<&EdmPropertyRef> {
        self.partner.get()
    }

    pub(crate) fn set_dependent_properties(&self, properties: Vec<SimpleIdentifier>) {
        let _ = self.dependent_properties.set(properties);
    }

    /// Ordered dependent properties; present only on the principal
    /// end of a referential constraint.
    #[must_use]
    pub fn dependent_properties(&self) -> Option<&[SimpleIdentifier]> {
        self.dependent_properties.get().map(Vec::as_slice)
    }
}

impl Debug for EdmNavigationProperty {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}.{} -> {} ({})",
            self.declaring_type, self.name, self.target_type, self.multiplicity
        )
    }
}
