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

//! Projected entity and complex types.
//!
//! A structured type is created as an empty shell and cached before
//! its properties exist, which is what breaks construction cycles: a
//! complex type whose property type is itself (or a type still under
//! construction) finds the shell in the cache instead of recursing.
//! Properties land later in single-assignment slots.

use crate::property::EdmNavigationProperty;
use crate::property::EdmStructuralProperty;
use odata_svc_metadata::resource::ResourceType;
use odata_svc_metadata::resource::ResourceTypeKind;
use odata_svc_metadata::Namespace;
use odata_svc_metadata::QualifiedName;
use odata_svc_metadata::SimpleIdentifier;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;
use std::sync::OnceLock;

/// Projected kind of a structured type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdmTypeKind {
    Entity,
    Complex,
}

/// Projected entity or complex type with delay-loaded properties.
pub struct EdmStructuredType {
    kind: EdmTypeKind,
    name: SimpleIdentifier,
    namespace: Namespace,
    base_type: Option<QualifiedName>,
    is_abstract: bool,
    is_open: bool,
    source: Arc<ResourceType>,
    structural: OnceLock<Vec<Arc<EdmStructuralProperty>>>,
    navigation: OnceLock<Vec<Arc<EdmNavigationProperty>>>,
    key: OnceLock<Vec<SimpleIdentifier>>,
}

impl EdmStructuredType {
    /// Project the shell of a sealed entity or complex type. The
    /// model is the only caller and caches the result before loading
    /// properties.
    ///
    /// # Panics
    ///
    /// The source must be an entity or complex type; the model never
    /// projects collections or primitives through this path.
    pub(crate) fn shell(source: Arc<ResourceType>) -> Arc<Self> {
        let kind = match source.kind() {
            ResourceTypeKind::EntityType => EdmTypeKind::Entity,
            ResourceTypeKind::ComplexType => EdmTypeKind::Complex,
            other => panic!("cannot project {other} as a structured type"),
        };
        Arc::new(Self {
            kind,
            name: source.name().clone(),
            namespace: source.namespace().clone(),
            base_type: source.base_type().and_then(|b| b.qualified_name()),
            is_abstract: source.is_abstract().into_inner(),
            is_open: source.is_open_type().into_inner(),
            source,
            structural: OnceLock::new(),
            navigation: OnceLock::new(),
            key: OnceLock::new(),
        })
    }

    #[must_use]
    pub const fn kind(&self) -> EdmTypeKind {
        self.kind
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
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    #[must_use]
    pub const fn base_type(&self) -> Option<&QualifiedName> {
        self.base_type.as_ref()
    }

    #[must_use]
    pub const fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// The resource type this projection mirrors.
    #[must_use]
    pub const fn source(&self) -> &Arc<ResourceType> {
        &self.source
    }

    #[must_use]
    pub fn properties_loaded(&self) -> bool {
        self.structural.get().is_some()
    }

    pub(crate) fn load_properties(
        &self,
        structural: Vec<Arc<EdmStructuralProperty>>,
        navigation: Vec<Arc<EdmNavigationProperty>>,
        key: Vec<SimpleIdentifier>,
    ) {
        let _ = self.structural.set(structural);
        let _ = self.navigation.set(navigation);
        let _ = self.key.set(key);
    }

    /// Structural properties declared on this type, once loaded.
    #[must_use]
    pub fn structural_properties(&self) -> Option<&[Arc<EdmStructuralProperty>]> {
        self.structural.get().map(Vec::as_slice)
    }

    /// Navigation properties declared on this type, once loaded.
    #[must_use]
    pub fn navigation_properties(&self) -> Option<&[Arc<EdmNavigationProperty>]> {
        self.navigation.get().map(Vec::as_slice)
    }

    /// Key property names of an entity type, once loaded.
    #[must_use]
    pub fn key_names(&self) -> Option<&[SimpleIdentifier]> {
        self.key.get().map(Vec::as_slice)
    }
}

impl Debug for EdmStructuredType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:?} {}", self.kind, self.full_name())
    }
}
