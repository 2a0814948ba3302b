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

use crate::error::Error;
use crate::ident::SimpleIdentifier;
use crate::resource::ResourceType;
use crate::resource::ResourceTypeKind;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;
use std::sync::OnceLock;

/// A named, typed operation parameter.
pub struct OperationParameter {
    name: SimpleIdentifier,
    parameter_type: Arc<ResourceType>,
    sealed: OnceLock<()>,
}

impl OperationParameter {
    /// Declare a parameter.
    ///
    /// # Errors
    ///
    /// Returns an error on an invalid name or a stream-typed
    /// parameter.
    pub fn new(name: &str, parameter_type: Arc<ResourceType>) -> Result<Arc<Self>, Error> {
        let name: SimpleIdentifier = name.parse()?;
        if parameter_type.is_stream() {
            return Err(Error::StreamParameter(name.inner().clone()));
        }
        Ok(Arc::new(Self {
            name,
            parameter_type,
            sealed: OnceLock::new(),
        }))
    }

    /// Sealed together with its operation when the model finalizes.
    pub(crate) fn seal(&self) {
        let _ = self.sealed.set(());
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.sealed.get().is_some()
    }

    #[must_use]
    pub const fn name(&self) -> &SimpleIdentifier {
        &self.name
    }

    #[must_use]
    pub const fn parameter_type(&self) -> &Arc<ResourceType> {
        &self.parameter_type
    }

    /// The entity type this parameter binds an operation to: the type
    /// itself for entity parameters, the item type for entity
    /// collections, nothing otherwise.
    #[must_use]
    pub fn binding_entity_type(&self) -> Option<&Arc<ResourceType>> {
        match self.parameter_type.kind() {
            ResourceTypeKind::EntityType => Some(&self.parameter_type),
            ResourceTypeKind::EntityCollection => self.parameter_type.item_type(),
            _ => None,
        }
    }
}

impl Debug for OperationParameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {}", self.name, self.parameter_type.full_name())
    }
}
