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

//! Projected operations and operation imports.
//!
//! An operation projects as an action or a function; its import
//! carries the container-level entry point. Path-expression result
//! sets are re-emitted as raw path segments without name resolution:
//! resolving the target set stays with the path evaluator, not with
//! projection.

use crate::type_reference::EdmTypeReference;
use odata_svc_metadata::operation::OperationKind;
use odata_svc_metadata::operation::OperationWrapper;
use odata_svc_metadata::operation::ServiceOperationResultKind;
use odata_svc_metadata::Namespace;
use odata_svc_metadata::SimpleIdentifier;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;

/// Projected operation parameter.
#[derive(Debug)]
pub struct EdmOperationParameter {
    pub name: SimpleIdentifier,
    pub type_reference: EdmTypeReference,
}

/// Projected action or function.
pub struct EdmOperation {
    name: SimpleIdentifier,
    namespace: Namespace,
    is_function: bool,
    is_bound: bool,
    parameters: Vec<EdmOperationParameter>,
    return_type: Option<EdmTypeReference>,
    source: Arc<OperationWrapper>,
}

impl EdmOperation {
    pub(crate) fn new(
        namespace: Namespace,
        parameters: Vec<EdmOperationParameter>,
        return_type: Option<EdmTypeReference>,
        source: Arc<OperationWrapper>,
    ) -> Arc<Self> {
        let op = source.operation();
        // Functions are the composable callables: query-style with a
        // non-void, non-enumeration result. Everything else is an
        // action.
        let is_function = op.kind() == OperationKind::ServiceOperation
            && !matches!(
                op.result_kind(),
                ServiceOperationResultKind::Void | ServiceOperationResultKind::Enumeration
            );
        Arc::new(Self {
            name: op.name().clone(),
            namespace,
            is_function,
            is_bound: source.binding_type().is_some(),
            parameters,
            return_type,
            source,
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
    pub const fn is_function(&self) -> bool {
        self.is_function
    }

    #[must_use]
    pub const fn is_action(&self) -> bool {
        !self.is_function
    }

    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.is_bound
    }

    #[must_use]
    pub fn parameters(&self) -> &[EdmOperationParameter] {
        &self.parameters
    }

    #[must_use]
    pub const fn return_type(&self) -> Option<&EdmTypeReference> {
        self.return_type.as_ref()
    }

    /// The operation wrapper this projection mirrors.
    #[must_use]
    pub const fn source(&self) -> &Arc<OperationWrapper> {
        &self.source
    }
}

impl Debug for EdmOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let flavor = if self.is_function { "Function" } else { "Action" };
        write!(f, "{flavor} {}.{}", self.namespace, self.name)
    }
}

/// How an import resolves its entity-set-valued result.
#[derive(Clone, Debug)]
pub enum EdmEntitySetReference {
    /// No entity result.
    None,
    /// The already-projected entity set with this name.
    Named(SimpleIdentifier),
    /// Raw path segments, resolved later by a path evaluator.
    Path(Vec<String>),
}

/// Container-level entry point for an operation.
pub struct EdmOperationImport {
    name: SimpleIdentifier,
    container_name: SimpleIdentifier,
    entity_set: EdmEntitySetReference,
    operation: Arc<EdmOperation>,
}

impl EdmOperationImport {
    pub(crate) fn new(
        container_name: SimpleIdentifier,
        entity_set: EdmEntitySetReference,
        operation: Arc<EdmOperation>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: operation.name().clone(),
            container_name,
            entity_set,
            operation,
        })
    }

    #[must_use]
    pub const fn name(&self) -> &SimpleIdentifier {
        &self.name
    }

    #[must_use]
    pub const fn container_name(&self) -> &SimpleIdentifier {
        &self.container_name
    }

    #[must_use]
    pub const fn entity_set(&self) -> &EdmEntitySetReference {
        &self.entity_set
    }

    #[must_use]
    pub const fn operation(&self) -> &Arc<EdmOperation> {
        &self.operation
    }
}

impl Debug for EdmOperationImport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{} -> {:?}", self.container_name, self.name, self.entity_set)
    }
}
