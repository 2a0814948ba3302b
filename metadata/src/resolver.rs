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

//! Resolution contract used by path-expression compilation and
//! evaluation. The metadata model implements it; tests may substitute
//! their own.

use crate::ident::QualifiedName;
use crate::resource::ResourceProperty;
use crate::resource::ResourceSetWrapper;
use crate::resource::ResourceType;
use std::sync::Arc;

/// Association/type resolution over a (possibly still incremental)
/// metadata graph. All lookups are not-found-tolerant: absence is an
/// `Option`, never an error.
pub trait MetadataResolver {
    /// Resolve a dotted type identifier, such as a type-cast segment
    /// of a path expression. `context` is the type the identifier was
    /// encountered on.
    fn resolve_type_identifier(
        &self,
        identifier: &str,
        context: &Arc<ResourceType>,
    ) -> Option<Arc<ResourceType>>;

    /// Resolve an arena reference to a declared type.
    fn resolve_declared_type(&self, name: &QualifiedName) -> Option<Arc<ResourceType>>;

    /// Resolve the set reached by following a navigation property
    /// from a source set, through the registered associations.
    fn get_resource_set(
        &self,
        source: &Arc<ResourceSetWrapper>,
        source_type: &Arc<ResourceType>,
        property: &Arc<ResourceProperty>,
    ) -> Option<Arc<ResourceSetWrapper>>;
}
