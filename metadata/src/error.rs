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

//! Configuration-error diagnostics.
//!
//! Every variant here means the provider supplied an inconsistent
//! model; nothing is retried and nothing is recoverable until the
//! registration code is fixed. Not-found conditions are `Option`s on
//! the lookup surface, never errors, and internal invariant violations
//! are assertions rather than variants.

use crate::ident;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Metadata configuration error kinds.
#[derive(Debug)]
pub enum Error {
    /// A name failed identifier validation.
    Identifier(ident::Error),
    /// Mutation attempted on a sealed resource type.
    TypeSealed(String),
    /// Mutation attempted on a sealed resource set.
    SetSealed(String),
    /// Registration attempted after the model was finalized.
    ModelSealed,
    /// Two declared types share a full name.
    DuplicateTypeName(String),
    /// Only entity and complex types can be registered by name.
    UnregistrableType(String),
    /// Two association sets claim the same (set, type, property) end.
    DuplicateAssociationEnd(String),
    /// Two resource sets share a name.
    DuplicateSetName(String),
    /// Two operations share a (name, binding type) cache key.
    DuplicateOperation(String),
    /// A type declares two properties with the same name.
    DuplicateProperty(String),
    /// A property was added to more than one declaring type.
    PropertyAlreadyOwned(String),
    /// Properties may only be declared on entity and complex types.
    PropertyOnUnstructuredType(String),
    /// Collection item must be a primitive or complex type.
    CollectionItemKind(String),
    /// Collection item may not be a stream primitive.
    CollectionItemStream,
    /// Entity-collection item must be an entity type.
    EntityCollectionItemKind(String),
    /// Base type kind does not match the derived type kind.
    BaseTypeKindMismatch(String),
    /// Key property declared on a non-entity type.
    KeyOnNonEntityType(String),
    /// Key property declared on a type whose ancestors already have keys.
    KeyOnDerivedType(String),
    /// Non-abstract entity type sealed without any key property.
    MissingKeyProperties(String),
    /// Property kind flags are not a valid combination.
    InvalidPropertyKind(String),
    /// Property kind and property value type disagree.
    PropertyTypeMismatch(String),
    /// Custom state can be attached to a property only once.
    CustomStateAlreadySet(String),
    /// Entity container name is write-once per resource set.
    ContainerNameAlreadySet(String),
    /// Declared property target is not a registered type.
    UnresolvedPropertyType(String, String),
    /// Navigation property target is not an entity type.
    NavigationTargetNotEntity(String, String),
    /// Resource set element type must be an entity type.
    SetTypeNotEntity(String),
    /// Resource set element type was never registered.
    SetTypeNotRegistered(String),
    /// Association set end types/sets were never registered.
    AssociationEndNotRegistered(String),
    /// Association set where both end properties are null.
    AssociationEndPropertiesBothNull(String),
    /// Association end type is not related to its set's element type.
    AssociationEndTypeMismatch(String),
    /// Association set registered without its type-level association.
    AssociationTypeMissing(String),
    /// Type-level association is write-once per association set.
    AssociationTypeAlreadySet(String),
    /// Referential constraint names a role neither end declares.
    ReferentialConstraintRole(String),
    /// Referential constraint dependent property count is wrong.
    ReferentialConstraintPropertyCount(String, usize, usize),
    /// Result kind and result type disagree (void xor typed).
    OperationResultMismatch(String),
    /// Operation result type supplied as a collection wrapper.
    OperationResultCollection(String),
    /// Operation parameter typed as a stream.
    StreamParameter(String),
    /// Service operation parameter is not a primitive type.
    ParameterNotPrimitive(String),
    /// Operation carries both a fixed result set and a path expression.
    OperationResultSetConflict(String),
    /// Entity-valued operation has neither result set nor path.
    OperationMissingResultSet(String),
    /// Result set supplied for a non-entity result.
    OperationUnexpectedResultSet(String),
    /// Path expression without an entity binding parameter.
    BindingParameterNotEntity(String),
    /// Path string does not start with the binding parameter name.
    PathMustStartWithBindingParameter(String, String),
    /// Path segment is neither a property nor a type identifier.
    PathUnresolvedSegment(String),
    /// Type-cast segment in the last position of a path.
    PathCastMayNotBeLast(String),
    /// Interior path segment resolves to a non-entity type.
    PathInteriorNotEntity(String),
    /// Empty segment in a path expression.
    PathEmptySegment(String),
    /// Error while validating a resource type.
    Type(String, Box<Error>),
    /// Error while validating a resource property.
    Property(String, Box<Error>),
    /// Error while validating a resource set.
    Set(String, Box<Error>),
    /// Error while validating an association set.
    AssociationSet(String, Box<Error>),
    /// Error while validating an operation.
    Operation(String, Box<Error>),
}

impl From<ident::Error> for Error {
    fn from(v: ident::Error) -> Self {
        Self::Identifier(v)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Identifier(err) => err.fmt(f),
            Self::TypeSealed(name) => write!(f, "resource type is read-only: {name}"),
            Self::SetSealed(name) => write!(f, "resource set is read-only: {name}"),
            Self::ModelSealed => write!(f, "metadata model is already finalized"),
            Self::DuplicateTypeName(name) => write!(f, "duplicate resource type name: {name}"),
            Self::UnregistrableType(name) => {
                write!(f, "only entity and complex types are registered by name: {name}")
            }
            Self::DuplicateAssociationEnd(key) => {
                write!(f, "association end registered twice: {key}")
            }
            Self::DuplicateSetName(name) => write!(f, "duplicate resource set name: {name}"),
            Self::DuplicateOperation(key) => write!(f, "duplicate operation registration: {key}"),
            Self::DuplicateProperty(name) => write!(f, "duplicate property name: {name}"),
            Self::PropertyAlreadyOwned(name) => {
                write!(f, "property already belongs to another type: {name}")
            }
            Self::PropertyOnUnstructuredType(name) => {
                write!(f, "properties cannot be declared on type: {name}")
            }
            Self::CollectionItemKind(name) => {
                write!(f, "collection item must be primitive or complex: {name}")
            }
            Self::CollectionItemStream => {
                write!(f, "collection item may not be a stream primitive")
            }
            Self::EntityCollectionItemKind(name) => {
                write!(f, "entity collection item must be an entity type: {name}")
            }
            Self::BaseTypeKindMismatch(name) => {
                write!(f, "base type kind does not match derived type: {name}")
            }
            Self::KeyOnNonEntityType(name) => {
                write!(f, "key property on non-entity type: {name}")
            }
            Self::KeyOnDerivedType(name) => {
                write!(f, "key property declared below the key-defining type: {name}")
            }
            Self::MissingKeyProperties(name) => {
                write!(f, "entity type sealed without key properties: {name}")
            }
            Self::InvalidPropertyKind(name) => {
                write!(f, "invalid property kind combination for: {name}")
            }
            Self::PropertyTypeMismatch(name) => {
                write!(f, "property kind and value type disagree for: {name}")
            }
            Self::CustomStateAlreadySet(name) => {
                write!(f, "custom state already attached to property: {name}")
            }
            Self::ContainerNameAlreadySet(name) => {
                write!(f, "entity container already assigned for set: {name}")
            }
            Self::UnresolvedPropertyType(prop, target) => {
                write!(f, "property {prop} references unknown type {target}")
            }
            Self::NavigationTargetNotEntity(prop, target) => {
                write!(f, "navigation property {prop} targets non-entity type {target}")
            }
            Self::SetTypeNotEntity(name) => {
                write!(f, "resource set element type is not an entity type: {name}")
            }
            Self::SetTypeNotRegistered(name) => {
                write!(f, "resource set element type is not registered: {name}")
            }
            Self::AssociationEndNotRegistered(name) => {
                write!(f, "association set end references unregistered metadata: {name}")
            }
            Self::AssociationEndPropertiesBothNull(name) => {
                write!(f, "association set has no property on either end: {name}")
            }
            Self::AssociationEndTypeMismatch(name) => {
                write!(f, "association end type unrelated to its set: {name}")
            }
            Self::AssociationTypeMissing(name) => {
                write!(f, "association set has no type-level association: {name}")
            }
            Self::AssociationTypeAlreadySet(name) => {
                write!(f, "type-level association already attached to: {name}")
            }
            Self::ReferentialConstraintRole(role) => {
                write!(f, "referential constraint names unknown role: {role}")
            }
            Self::ReferentialConstraintPropertyCount(name, expected, actual) => write!(
                f,
                "referential constraint of {name} needs {expected} dependent properties, got {actual}"
            ),
            Self::OperationResultMismatch(name) => {
                write!(f, "result kind and result type disagree for operation: {name}")
            }
            Self::OperationResultCollection(name) => write!(
                f,
                "operation {name} must supply the item type, not a collection wrapper"
            ),
            Self::StreamParameter(name) => {
                write!(f, "stream types are not allowed as parameters: {name}")
            }
            Self::ParameterNotPrimitive(name) => {
                write!(f, "service operation parameter must be primitive: {name}")
            }
            Self::OperationResultSetConflict(name) => write!(
                f,
                "operation {name} has both a result set and a path expression"
            ),
            Self::OperationMissingResultSet(name) => write!(
                f,
                "entity-valued operation {name} needs a result set or a path expression"
            ),
            Self::OperationUnexpectedResultSet(name) => {
                write!(f, "non-entity operation {name} cannot have a result set")
            }
            Self::BindingParameterNotEntity(name) => write!(
                f,
                "operation {name} path expression needs an entity binding parameter"
            ),
            Self::PathMustStartWithBindingParameter(path, param) => {
                write!(f, "path {path} must start with binding parameter name {param}")
            }
            Self::PathUnresolvedSegment(segment) => {
                write!(f, "path segment is neither property nor type: {segment}")
            }
            Self::PathCastMayNotBeLast(path) => {
                write!(f, "type-cast segment may not end the path: {path}")
            }
            Self::PathInteriorNotEntity(segment) => {
                write!(f, "interior path segment must be entity-typed: {segment}")
            }
            Self::PathEmptySegment(path) => write!(f, "empty segment in path: {path}"),
            Self::Type(name, err) => write!(f, "while validating resource type: {name}\n{err}"),
            Self::Property(name, err) => write!(f, "while validating property: {name}\n{err}"),
            Self::Set(name, err) => write!(f, "while validating resource set: {name}\n{err}"),
            Self::AssociationSet(name, err) => {
                write!(f, "while validating association set: {name}\n{err}")
            }
            Self::Operation(name, err) => write!(f, "while validating operation: {name}\n{err}"),
        }
    }
}

impl StdError for Error {}
