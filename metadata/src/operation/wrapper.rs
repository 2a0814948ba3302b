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

//! Registration-time wrapper over an operation.
//!
//! The wrapper pairs the operation with its service-resolved result
//! set wrapper (when the result set is fixed) and is the unit the
//! operation caches hand out: wrapper identity is stable from
//! registration on.

use crate::operation::Operation;
use crate::operation::OperationParameter;
use crate::resolver::MetadataResolver;
use crate::resource::ResourceSetWrapper;
use crate::resource::ResourceType;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;

/// A registered operation plus its resolved static result set.
pub struct OperationWrapper {
    operation: Arc<Operation>,
    result_set: Option<Arc<ResourceSetWrapper>>,
}

impl OperationWrapper {
    /// Wrap a registered operation. `result_set` is the wrapper of
    /// the operation's fixed result set, when it has one; operations
    /// with a path expression resolve their set per invocation.
    #[must_use]
    pub fn new(
        operation: Arc<Operation>,
        result_set: Option<Arc<ResourceSetWrapper>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            operation,
            result_set,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.operation.name().inner()
    }

    #[must_use]
    pub const fn operation(&self) -> &Arc<Operation> {
        &self.operation
    }

    #[must_use]
    pub fn binding_parameter(&self) -> Option<&Arc<OperationParameter>> {
        self.operation.binding_parameter()
    }

    /// The entity type a bound invocation binds to.
    #[must_use]
    pub fn binding_type(&self) -> Option<&Arc<ResourceType>> {
        self.binding_parameter()
            .and_then(|p| p.binding_entity_type())
    }

    /// The fixed result set, when the operation has one.
    #[must_use]
    pub const fn result_set(&self) -> Option<&Arc<ResourceSetWrapper>> {
        self.result_set.as_ref()
    }

    /// Resolve the operation's target set for a concrete binding set:
    /// the fixed set when one was registered, otherwise the path
    /// expression walked from `binding_set`.
    #[must_use]
    pub fn get_result_set(
        &self,
        resolver: &dyn MetadataResolver,
        binding_set: Option<&Arc<ResourceSetWrapper>>,
    ) -> Option<Arc<ResourceSetWrapper>> {
        if let Some(fixed) = &self.result_set {
            return Some(fixed.clone());
        }
        let path = self.operation.path_expression()?;
        path.get_target_set(resolver, binding_set?)
    }
}

impl Debug for OperationWrapper {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.operation.fmt(f)
    }
}
