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

//! Result-set path expressions.
//!
//! A path expression describes how to reach an operation's result set
//! by navigating from the binding parameter through navigation
//! properties, optionally refined by type-cast segments. The string
//! form moves through three states: created, bound to its parameter,
//! and compiled. Compilation happens once, after the type graph is
//! sealed, and folds every cast into the source type of the following
//! navigation segment, so the compiled form is a flat list of
//! (source type, property) hops.

use crate::error::Error;
use crate::operation::OperationParameter;
use crate::resolver::MetadataResolver;
use crate::resource::ResourceProperty;
use crate::resource::ResourceSetWrapper;
use crate::resource::ResourceType;
use crate::resource::ResourceTypeKind;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;
use std::sync::OnceLock;

/// One navigation hop of a compiled path.
pub struct PathSegment {
    source_type: Arc<ResourceType>,
    property: Arc<ResourceProperty>,
}

impl PathSegment {
    #[must_use]
    pub const fn source_type(&self) -> &Arc<ResourceType> {
        &self.source_type
    }

    #[must_use]
    pub const fn property(&self) -> &Arc<ResourceProperty> {
        &self.property
    }
}

impl Debug for PathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.source_type.full_name(), self.property.name())
    }
}

/// A `/`-separated navigation path rooted at a binding parameter.
pub struct ResourceSetPathExpression {
    path: String,
    binding_parameter: OnceLock<Arc<OperationParameter>>,
    segments: OnceLock<Vec<PathSegment>>,
}

impl ResourceSetPathExpression {
    /// Wrap a raw path string.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty path or empty interior segments.
    pub fn new(path: &str) -> Result<Self, Error> {
        if path.is_empty() || path.split('/').any(str::is_empty) {
            return Err(Error::PathEmptySegment(path.to_string()));
        }
        Ok(Self {
            path: path.to_string(),
            binding_parameter: OnceLock::new(),
            segments: OnceLock::new(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Bind the path to the operation's binding parameter. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error when the path does not start with the
    /// parameter's name.
    pub fn set_binding_parameter(&self, parameter: Arc<OperationParameter>) -> Result<(), Error> {
        let name = parameter.name().inner();
        let head = self.path.split('/').next().unwrap_or_default();
        if head != name.as_str() {
            return Err(Error::PathMustStartWithBindingParameter(
                self.path.clone(),
                name.clone(),
            ));
        }
        let _ = self.binding_parameter.set(parameter);
        Ok(())
    }

    #[must_use]
    pub fn binding_parameter(&self) -> Option<&Arc<OperationParameter>> {
        self.binding_parameter.get()
    }

    #[must_use]
    pub fn is_compiled(&self) -> bool {
        self.segments.get().is_some()
    }

    /// Number of compiled navigation segments.
    #[must_use]
    pub fn segment_count(&self) -> Option<usize> {
        self.segments.get().map(Vec::len)
    }

    /// Compile the path once against the sealed type graph. A no-op
    /// when already compiled.
    ///
    /// Each segment resolves first as a navigation property on the
    /// current source type, then as a type-cast identifier. Casts may
    /// not end the path, and every interior type must be an entity
    /// type.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first segment that resolves as
    /// neither, casts to an unrelated type, or navigates through a
    /// non-entity.
    ///
    /// # Panics
    ///
    /// The binding parameter must be set and entity-typed before
    /// compilation; operation construction guarantees both.
    pub fn initialize_path_segments(&self, resolver: &dyn MetadataResolver) -> Result<(), Error> {
        if self.is_compiled() {
            return Ok(());
        }
        let binding = self
            .binding_parameter
            .get()
            .expect("binding parameter set before compilation");
        let mut current = binding
            .binding_entity_type()
            .expect("binding parameter is entity-typed")
            .clone();
        let mut segments = Vec::new();
        let mut pending_cast = false;
        for segment in self.path.split('/').skip(1) {
            let property = current
                .properties()
                .iter()
                .find(|p| p.name().inner() == segment)
                .cloned();
            if let Some(property) = property {
                if !property.is_navigation() {
                    return Err(Error::PathInteriorNotEntity(segment.to_string()));
                }
                let target = property
                    .declared_target()
                    .and_then(|qn| resolver.resolve_declared_type(qn))
                    .ok_or_else(|| Error::PathUnresolvedSegment(segment.to_string()))?;
                if target.kind() != ResourceTypeKind::EntityType {
                    return Err(Error::PathInteriorNotEntity(segment.to_string()));
                }
                segments.push(PathSegment {
                    source_type: current.clone(),
                    property,
                });
                current = target;
                pending_cast = false;
            } else if let Some(cast) = resolver.resolve_type_identifier(segment, &current) {
                if cast.kind() != ResourceTypeKind::EntityType {
                    return Err(Error::PathInteriorNotEntity(segment.to_string()));
                }
                if !cast.is_assignable_from(&current) && !current.is_assignable_from(&cast) {
                    return Err(Error::PathUnresolvedSegment(segment.to_string()));
                }
                current = cast;
                pending_cast = true;
            } else {
                return Err(Error::PathUnresolvedSegment(segment.to_string()));
            }
        }
        if pending_cast {
            return Err(Error::PathCastMayNotBeLast(self.path.clone()));
        }
        let _ = self.segments.set(segments);
        Ok(())
    }

    /// Walk the compiled segments from a concrete binding set to the
    /// target set. Absence anywhere along the walk is ordinary: the
    /// association graph simply does not reach a set there.
    ///
    /// # Panics
    ///
    /// The path must be compiled first; the model compiles every path
    /// at finalization.
    #[must_use]
    pub fn get_target_set(
        &self,
        resolver: &dyn MetadataResolver,
        binding_set: &Arc<ResourceSetWrapper>,
    ) -> Option<Arc<ResourceSetWrapper>> {
        let segments = self.segments.get().expect("path compiled before evaluation");
        let mut current = binding_set.clone();
        for segment in segments {
            current = resolver.get_resource_set(&current, &segment.source_type, &segment.property)?;
        }
        Some(current)
    }
}

impl Debug for ResourceSetPathExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.path.fmt(f)
    }
}
