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

//! Provider-neutral resource-type metadata model.
//!
//! A provider registers resource types, properties, sets,
//! associations and operations, then finalizes the model once. The
//! sealed graph is immutable and freely shared across threads; the
//! `odata-svc-edm` crate projects it into an EDM-shaped mirror on
//! demand.

/// Identifier grammar.
pub mod ident;

/// Configuration-error diagnostics.
pub mod error;

/// Resource types, properties and sets.
pub mod resource;

/// Associations between types and sets.
pub mod association;

/// Callable operations.
pub mod operation;

/// Identity-keyed operation caches.
pub mod cache;

/// Resolution contract for path expressions.
pub mod resolver;

/// The model facade.
pub mod provider;

/// Container manifest.
pub mod manifest;

/// Reexport `Error` to the level of the crate.
pub type Error = error::Error;
/// Reexport `SimpleIdentifier` to the level of the crate.
pub type SimpleIdentifier = ident::SimpleIdentifier;
/// Reexport `Namespace` to the level of the crate.
pub type Namespace = ident::Namespace;
/// Reexport `QualifiedName` to the level of the crate.
pub type QualifiedName = ident::QualifiedName;
/// Reexport `MetadataModel` to the level of the crate.
pub type MetadataModel = provider::MetadataModel;
/// Reexport `MetadataProviderState` to the level of the crate.
pub type MetadataProviderState = provider::MetadataProviderState;

/// Reexport `MetadataResolver` to the level of the crate.
pub use resolver::MetadataResolver;
