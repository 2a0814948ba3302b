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

//! The canonical, provider-neutral resource type graph.

/// Type and property kind discriminators.
pub mod kind;

/// Built-in primitive types.
pub mod primitive;

/// Resource types and their sealing lifecycle.
pub mod resource_type;

/// Properties declared on resource types.
pub mod property;

/// Named, queryable sets of entities.
pub mod resource_set;

use tagged_types::TaggedType;

/// Reexport `ResourceTypeKind` to the level of the module.
pub use kind::ResourceTypeKind;
/// Reexport `ResourcePropertyKind` to the level of the module.
pub use kind::ResourcePropertyKind;
/// Reexport `PrimitiveKind` to the level of the module.
pub use primitive::PrimitiveKind;
/// Reexport `ResourceType` to the level of the module.
pub use resource_type::ResourceType;
/// Reexport `ResourceProperty` to the level of the module.
pub use property::ResourceProperty;
/// Reexport `PropertyTypeRef` to the level of the module.
pub use property::PropertyTypeRef;
/// Reexport `ResourceSet` to the level of the module.
pub use resource_set::ResourceSet;
/// Reexport `ResourceSetWrapper` to the level of the module.
pub use resource_set::ResourceSetWrapper;

/// Identity of the host-language instance type backing a resource
/// type. The model never inspects it beyond equality.
pub type InstanceTypeDescriptor = TaggedType<String, InstanceTypeDescriptorTag>;
#[doc(hidden)]
#[derive(tagged_types::Tag)]
#[implement(Clone, Hash, PartialEq, Eq)]
#[transparent(Debug, Display)]
#[capability(inner_access)]
pub enum InstanceTypeDescriptorTag {}

/// Whether a structured type can be instantiated directly.
pub type IsAbstract = TaggedType<bool, IsAbstractTag>;
#[doc(hidden)]
#[derive(tagged_types::Tag)]
#[implement(Clone, Copy)]
#[transparent(Debug)]
#[capability(inner_access)]
pub enum IsAbstractTag {}

/// Whether a structured type accepts undeclared properties.
pub type IsOpenType = TaggedType<bool, IsOpenTypeTag>;
#[doc(hidden)]
#[derive(tagged_types::Tag)]
#[implement(Clone, Copy)]
#[transparent(Debug)]
#[capability(inner_access)]
pub enum IsOpenTypeTag {}

/// Whether a resource set orders its keys by declaration instead of
/// by name.
pub type UseMetadataKeyOrder = TaggedType<bool, UseMetadataKeyOrderTag>;
#[doc(hidden)]
#[derive(tagged_types::Tag)]
#[implement(Clone, Copy)]
#[transparent(Debug)]
#[capability(inner_access)]
pub enum UseMetadataKeyOrderTag {}
