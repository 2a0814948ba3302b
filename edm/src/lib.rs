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

//! EDM-shaped projection of a sealed resource metadata model.
//!
//! Downstream serialization and URI parsing consume only this mirror,
//! never the mutable construction state of the source model.

/// Projection error diagnostics.
pub mod error;

/// Name-keyed projection cache.
pub mod cache;

/// EDM type references.
pub mod type_reference;

/// Projected structural and navigation properties.
pub mod property;

/// Projected entity and complex types.
pub mod structured_type;

/// Projected entity sets.
pub mod entity_set;

/// Projected operations and imports.
pub mod operation;

/// The lazily projected model.
pub mod model;

/// Reexport `Error` to the level of the crate.
pub type Error = error::Error;
/// Reexport `ElementCache` to the level of the crate.
pub type ElementCache<T> = cache::ElementCache<T>;
/// Reexport `EdmModel` to the level of the crate.
pub type EdmModel = model::EdmModel;
/// Reexport `EdmModelMode` to the level of the crate.
pub type EdmModelMode = model::EdmModelMode;
/// Reexport `EdmTypeReference` to the level of the crate.
pub type EdmTypeReference = type_reference::EdmTypeReference;
/// Reexport `EdmStructuredType` to the level of the crate.
pub type EdmStructuredType = structured_type::EdmStructuredType;
/// Reexport `EdmTypeKind` to the level of the crate.
pub type EdmTypeKind = structured_type::EdmTypeKind;
/// Reexport `EdmEntitySet` to the level of the crate.
pub type EdmEntitySet = entity_set::EdmEntitySet;
/// Reexport `EdmOperation` to the level of the crate.
pub type EdmOperation = operation::EdmOperation;
/// Reexport `EdmOperationImport` to the level of the crate.
pub type EdmOperationImport = operation::EdmOperationImport;
/// Reexport `EdmEntitySetReference` to the level of the crate.
pub type EdmEntitySetReference = operation::EdmEntitySetReference;
/// Reexport `EdmStructuralProperty` to the level of the crate.
pub type EdmStructuralProperty = property::EdmStructuralProperty;
/// Reexport `EdmNavigationProperty` to the level of the crate.
pub type EdmNavigationProperty = property::EdmNavigationProperty;
/// Reexport `EdmPropertyRef` to the level of the crate.
pub type EdmPropertyRef = property::EdmPropertyRef;
