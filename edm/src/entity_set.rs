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

use odata_svc_metadata::resource::ResourceSetWrapper;
use odata_svc_metadata::QualifiedName;
use odata_svc_metadata::SimpleIdentifier;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;

/// Projected entity set inside the default container.
pub struct EdmEntitySet {
    name: SimpleIdentifier,
    container_name: SimpleIdentifier,
    element_type: QualifiedName,
    source: Arc<ResourceSetWrapper>,
}

impl EdmEntitySet {
    pub(crate) fn new(
        container_name: SimpleIdentifier,
        element_type: QualifiedName,
        source: Arc<ResourceSetWrapper>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: source.name().clone(),
            container_name,
            element_type,
            source,
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
    pub const fn element_type(&self) -> &QualifiedName {
        &self.element_type
    }

    /// The set wrapper this projection mirrors.
    #[must_use]
    pub const fn source(&self) -> &Arc<ResourceSetWrapper> {
        &self.source
    }
}

impl Debug for EdmEntitySet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}: {}", self.container_name, self.name, self.element_type)
    }
}
