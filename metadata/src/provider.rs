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

//! The metadata model facade.
//!
//! Providers register types, sets, associations and operations while
//! the model is incremental, then call `finalize` exactly once.
//! Finalization validates the whole graph, seals every object bottom
//! up, compiles path expressions, builds the derived-type index and
//! publishes the sealed state through a single-assignment slot, so a
//! reader on another thread either sees nothing or sees the complete
//! sealed graph.
//!
//! Incremental reads before finalization are supported for consumers
//! that must resolve names while the model is still loading; they go
//! through the registration maps under the registration lock.

use crate::association::ResourceAssociationSet;
use crate::cache::OperationCache;
use crate::error::Error;
use crate::ident::Namespace;
use crate::ident::QualifiedName;
use crate::ident::SimpleIdentifier;
use crate::operation::Operation;
use crate::operation::OperationWrapper;
use crate::resolver::MetadataResolver;
use crate::resource::ResourceProperty;
use crate::resource::ResourceSet;
use crate::resource::ResourceSetWrapper;
use crate::resource::ResourceType;
use crate::resource::ResourceTypeKind;
use crate::resource::UseMetadataKeyOrder;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::OnceLock;
use tracing::debug;

/// How much of the graph a consumer may assume is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetadataProviderState {
    /// Registration in progress; lookups see what exists so far.
    Incremental,
    /// Finalized; absence of a name is definitive.
    Full,
}

/// (set name, declaring type full name, property name).
type AssociationKey = (String, String, String);

#[derive(Default)]
struct Registrations {
    types: HashMap<String, Arc<ResourceType>>,
    type_order: Vec<String>,
    sets: HashMap<String, Arc<ResourceSetWrapper>>,
    set_order: Vec<String>,
    associations: Vec<Arc<ResourceAssociationSet>>,
    operations: Arc<OperationCache>,
}

struct SealedModel {
    types: HashMap<String, Arc<ResourceType>>,
    type_order: Vec<String>,
    sets: HashMap<String, Arc<ResourceSetWrapper>>,
    set_order: Vec<String>,
    associations: HashMap<AssociationKey, Arc<ResourceAssociationSet>>,
    associations_by_type: HashMap<(String, String), Arc<ResourceAssociationSet>>,
    derived: HashMap<String, Vec<Arc<ResourceType>>>,
    operations: Arc<OperationCache>,
}

/// Borrowed view over the graph maps, shared between finalization
/// (before the sealed state is published) and the sealed model.
struct GraphView<'a> {
    types: &'a HashMap<String, Arc<ResourceType>>,
    sets: &'a HashMap<String, Arc<ResourceSetWrapper>>,
    associations: &'a HashMap<AssociationKey, Arc<ResourceAssociationSet>>,
}

impl MetadataResolver for GraphView<'_> {
    fn resolve_type_identifier(
        &self,
        identifier: &str,
        context: &Arc<ResourceType>,
    ) -> Option<Arc<ResourceType>> {
        if identifier.contains('.') {
            self.types.get(identifier).cloned()
        } else {
            let qualified = format!("{}.{}", context.namespace(), identifier);
            self.types.get(&qualified).cloned()
        }
    }

    fn resolve_declared_type(&self, name: &QualifiedName) -> Option<Arc<ResourceType>> {
        self.types.get(&name.to_string()).cloned()
    }

    fn get_resource_set(
        &self,
        source: &Arc<ResourceSetWrapper>,
        source_type: &Arc<ResourceType>,
        property: &Arc<ResourceProperty>,
    ) -> Option<Arc<ResourceSetWrapper>> {
        for t in source_type.base_types_and_self() {
            let key = (
                source.name().inner().clone(),
                t.full_name(),
                property.name().inner().clone(),
            );
            if let Some(assoc) = self.associations.get(&key) {
                let related = assoc.get_related_resource_association_set_end(
                    source,
                    source_type,
                    Some(property),
                )?;
                return self.sets.get(related.resource_set().name().inner()).cloned();
            }
        }
        None
    }
}

/// The graph owner: registration surface, finalization, and the
/// sealed read surface.
pub struct MetadataModel {
    container_name: SimpleIdentifier,
    container_namespace: Namespace,
    building: Mutex<Registrations>,
    sealed: OnceLock<SealedModel>,
}

impl MetadataModel {
    /// Create an empty, incremental model.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid container identifiers.
    pub fn new(container_name: &str, container_namespace: &str) -> Result<Self, Error> {
        Ok(Self {
            container_name: container_name.parse()?,
            container_namespace: container_namespace.parse()?,
            building: Mutex::new(Registrations::default()),
            sealed: OnceLock::new(),
        })
    }

    #[must_use]
    pub const fn container_name(&self) -> &SimpleIdentifier {
        &self.container_name
    }

    #[must_use]
    pub const fn container_namespace(&self) -> &Namespace {
        &self.container_namespace
    }

    #[must_use]
    pub fn state(&self) -> MetadataProviderState {
        if self.sealed.get().is_some() {
            MetadataProviderState::Full
        } else {
            MetadataProviderState::Incremental
        }
    }

    fn guard_building(&self) -> Result<std::sync::MutexGuard<'_, Registrations>, Error> {
        if self.sealed.get().is_some() {
            return Err(Error::ModelSealed);
        }
        Ok(self.building.lock().expect("not poisoned"))
    }

    /// Register a declared entity or complex type.
    ///
    /// # Errors
    ///
    /// Returns an error after finalization, for collection/primitive
    /// types, and on duplicate full names.
    pub fn add_resource_type(&self, resource_type: Arc<ResourceType>) -> Result<(), Error> {
        let mut reg = self.guard_building()?;
        Self::insert_type(&mut reg, resource_type)
    }

    fn insert_type(reg: &mut Registrations, resource_type: Arc<ResourceType>) -> Result<(), Error> {
        if !resource_type.kind().is_structured() {
            return Err(Error::UnregistrableType(resource_type.full_name()));
        }
        let name = resource_type.full_name();
        if let Some(existing) = reg.types.get(&name) {
            if Arc::ptr_eq(existing, &resource_type) {
                return Ok(());
            }
            return Err(Error::DuplicateTypeName(name));
        }
        reg.types.insert(name.clone(), resource_type);
        reg.type_order.push(name);
        Ok(())
    }

    /// Register a resource set and hand out its service wrapper. The
    /// wrapper instance is the identity every downstream cache keys
    /// on for this set.
    ///
    /// # Errors
    ///
    /// Returns an error after finalization and on duplicate names.
    pub fn add_resource_set(&self, set: Arc<ResourceSet>) -> Result<Arc<ResourceSetWrapper>, Error> {
        let mut reg = self.guard_building()?;
        let name = set.name().inner().clone();
        if reg.sets.contains_key(&name) {
            return Err(Error::DuplicateSetName(name));
        }
        let wrapper = ResourceSetWrapper::new(set);
        reg.sets.insert(name.clone(), wrapper.clone());
        reg.set_order.push(name);
        Ok(wrapper)
    }

    /// Register an association set. Both end sets must already be
    /// registered; end indexing and constraint arity are validated at
    /// finalization, once key properties are known.
    ///
    /// # Errors
    ///
    /// Returns an error after finalization or when an end references
    /// an unregistered set.
    pub fn add_association_set(
        &self,
        association: Arc<ResourceAssociationSet>,
    ) -> Result<(), Error> {
        let mut reg = self.guard_building()?;
        for end in [association.end1(), association.end2()] {
            if !reg.sets.contains_key(end.resource_set().name().inner()) {
                return Err(Error::AssociationEndNotRegistered(
                    end.resource_set().name().inner().clone(),
                ));
            }
        }
        reg.associations.push(association);
        Ok(())
    }

    /// Register an operation. Duplicate (name, binding type) keys are
    /// rejected here, at registration time. Operations with a fixed
    /// entity result set must be registered after that set.
    ///
    /// # Errors
    ///
    /// Returns an error after finalization, on a duplicate key, or
    /// when the fixed result set is not registered yet.
    pub fn add_service_operation(
        &self,
        operation: Arc<Operation>,
    ) -> Result<Arc<OperationWrapper>, Error> {
        let reg = self.guard_building()?;
        let result_set = match operation.result_set() {
            Some(set) => Some(
                reg.sets
                    .get(set.name().inner())
                    .cloned()
                    .ok_or_else(|| Error::SetTypeNotRegistered(set.name().inner().clone()))?,
            ),
            None => None,
        };
        let wrapper = OperationWrapper::new(operation, result_set);
        reg.operations.add(wrapper.clone())?;
        Ok(wrapper)
    }

    /// Validate and seal the whole graph, exactly once. Idempotent
    /// after success. `known_types` registers types reachable only
    /// through casts or other out-of-band paths;
    /// `use_metadata_key_order` is the default for sets that did not
    /// choose an order themselves.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found, wrapped in the
    /// context of the offending type, set, association or operation.
    /// The model stays unsealed and unusable until the provider is
    /// fixed.
    pub fn finalize(
        &self,
        known_types: Vec<Arc<ResourceType>>,
        use_metadata_key_order: UseMetadataKeyOrder,
    ) -> Result<(), Error> {
        if self.sealed.get().is_some() {
            return Ok(());
        }
        let mut reg = {
            let mut guard = self.building.lock().expect("not poisoned");
            std::mem::take(&mut *guard)
        };
        for t in known_types {
            Self::insert_type(&mut reg, t)?;
        }

        // Seal types bottom-up, then validate declared property
        // targets now that property views exist.
        for name in &reg.type_order {
            let t = &reg.types[name];
            t.set_read_only()
                .map_err(|e| Error::Type(name.clone(), Box::new(e)))?;
        }
        for name in &reg.type_order {
            let t = &reg.types[name];
            for property in t.properties_declared() {
                Self::validate_property_target(&reg.types, property)
                    .map_err(|e| Error::Type(name.clone(), Box::new(e)))?;
            }
        }

        // Seal sets with model defaults.
        for name in &reg.set_order {
            let wrapper = &reg.sets[name];
            let set = wrapper.resource_set();
            let element = set.resource_type().full_name();
            if !reg.types.contains_key(&element) {
                return Err(Error::Set(
                    name.clone(),
                    Box::new(Error::SetTypeNotRegistered(element)),
                ));
            }
            set.seal(&self.container_name, use_metadata_key_order)
                .map_err(|e| Error::Set(name.clone(), Box::new(e)))?;
        }

        // Index association ends and validate constraints.
        let mut associations: HashMap<AssociationKey, Arc<ResourceAssociationSet>> =
            HashMap::new();
        let mut associations_by_type = HashMap::new();
        for assoc in &reg.associations {
            let assoc_name = assoc.name().inner().clone();
            let atype = assoc.association_type().ok_or_else(|| {
                Error::AssociationSet(
                    assoc_name.clone(),
                    Box::new(Error::AssociationTypeMissing(assoc_name.clone())),
                )
            })?;
            if let Some(constraint) = atype.referential_constraint() {
                let principal = atype
                    .principal_end()
                    .expect("principal role validated at construction");
                let expected = principal.resource_type().key_properties().len();
                let actual = constraint.dependent_properties().len();
                if expected != actual {
                    return Err(Error::AssociationSet(
                        assoc_name.clone(),
                        Box::new(Error::ReferentialConstraintPropertyCount(
                            assoc_name.clone(),
                            expected,
                            actual,
                        )),
                    ));
                }
            }
            for end in [assoc.end1(), assoc.end2()] {
                if let Some(property) = end.resource_property() {
                    let key = (
                        end.resource_set().name().inner().clone(),
                        end.resource_type().full_name(),
                        property.name().inner().clone(),
                    );
                    let pretty = format!("{}/{}/{}", key.0, key.1, key.2);
                    if associations.insert(key, assoc.clone()).is_some() {
                        return Err(Error::AssociationSet(
                            assoc_name.clone(),
                            Box::new(Error::DuplicateAssociationEnd(pretty)),
                        ));
                    }
                    associations_by_type.insert(
                        (end.resource_type().full_name(), property.name().inner().clone()),
                        assoc.clone(),
                    );
                }
            }
        }

        // Seal operations and compile path expressions against the
        // sealed graph.
        let view = GraphView {
            types: &reg.types,
            sets: &reg.sets,
            associations: &associations,
        };
        for wrapper in reg.operations.wrappers() {
            let op = wrapper.operation();
            let op_name = op.name().inner().clone();
            op.seal()
                .map_err(|e| Error::Operation(op_name.clone(), Box::new(e)))?;
            if let Some(path) = op.path_expression() {
                path.initialize_path_segments(&view)
                    .map_err(|e| Error::Operation(op_name.clone(), Box::new(e)))?;
            }
        }

        // Base type -> direct children index.
        let mut derived: HashMap<String, Vec<Arc<ResourceType>>> = HashMap::new();
        for name in &reg.type_order {
            let t = &reg.types[name];
            if let Some(base) = t.base_type() {
                derived
                    .entry(base.full_name())
                    .or_insert_with(Vec::new)
                    .push(t.clone());
            }
        }

        debug!(
            types = reg.type_order.len(),
            sets = reg.set_order.len(),
            associations = reg.associations.len(),
            "metadata model finalized"
        );
        let _ = self.sealed.set(SealedModel {
            types: reg.types,
            type_order: reg.type_order,
            sets: reg.sets,
            set_order: reg.set_order,
            associations,
            associations_by_type,
            derived,
            operations: reg.operations,
        });
        Ok(())
    }

    fn validate_property_target(
        types: &HashMap<String, Arc<ResourceType>>,
        property: &Arc<ResourceProperty>,
    ) -> Result<(), Error> {
        let target_name = match property.declared_target() {
            Some(qn) => qn.to_string(),
            None => return Ok(()),
        };
        let target = types.get(&target_name).ok_or_else(|| {
            Error::UnresolvedPropertyType(property.name().inner().clone(), target_name.clone())
        })?;
        if property.is_navigation() {
            if target.kind() != ResourceTypeKind::EntityType {
                return Err(Error::NavigationTargetNotEntity(
                    property.name().inner().clone(),
                    target_name,
                ));
            }
        } else if target.kind() != ResourceTypeKind::ComplexType {
            return Err(Error::PropertyTypeMismatch(property.name().inner().clone()));
        }
        Ok(())
    }

    fn qualify(&self, name: &str) -> String {
        if name.contains('.') {
            name.to_string()
        } else {
            format!("{}.{}", self.container_namespace, name)
        }
    }

    /// Resolve a declared type by full name, or by bare name within
    /// the container namespace. Absence is ordinary.
    #[must_use]
    pub fn try_resolve_resource_type(&self, name: &str) -> Option<Arc<ResourceType>> {
        let key = self.qualify(name);
        if let Some(sealed) = self.sealed.get() {
            return sealed.types.get(&key).cloned();
        }
        self.building
            .lock()
            .expect("not poisoned")
            .types
            .get(&key)
            .cloned()
    }

    /// Resolve a resource set by name. Absence is ordinary.
    #[must_use]
    pub fn try_resolve_resource_set(&self, name: &str) -> Option<Arc<ResourceSetWrapper>> {
        if let Some(sealed) = self.sealed.get() {
            return sealed.sets.get(name).cloned();
        }
        self.building
            .lock()
            .expect("not poisoned")
            .sets
            .get(name)
            .cloned()
    }

    /// Resolve an unbound operation by name. Absence is ordinary.
    #[must_use]
    pub fn try_resolve_service_operation(&self, name: &str) -> Option<Arc<OperationWrapper>> {
        self.operations().try_get_wrapper(name, None)
    }

    /// Resolve a bound operation by name and binding type.
    #[must_use]
    pub fn try_resolve_bound_operation(
        &self,
        name: &str,
        binding_type: &Arc<ResourceType>,
    ) -> Option<Arc<OperationWrapper>> {
        self.operations().try_get_wrapper(name, Some(binding_type))
    }

    fn operations(&self) -> Arc<OperationCache> {
        if let Some(sealed) = self.sealed.get() {
            return sealed.operations.clone();
        }
        self.building
            .lock()
            .expect("not poisoned")
            .operations
            .clone()
    }

    /// All transitive descendants of a type, depth first.
    #[must_use]
    pub fn get_derived_types(&self, resource_type: &Arc<ResourceType>) -> Vec<Arc<ResourceType>> {
        if let Some(sealed) = self.sealed.get() {
            let mut result = Vec::new();
            Self::collect_derived(&sealed.derived, &resource_type.full_name(), &mut result);
            return result;
        }
        // Incremental fallback: scan registrations.
        let reg = self.building.lock().expect("not poisoned");
        let mut result = Vec::new();
        for name in &reg.type_order {
            let t = &reg.types[name];
            if !Arc::ptr_eq(t, resource_type) && resource_type.is_assignable_from(t) {
                result.push(t.clone());
            }
        }
        result
    }

    fn collect_derived(
        derived: &HashMap<String, Vec<Arc<ResourceType>>>,
        name: &str,
        result: &mut Vec<Arc<ResourceType>>,
    ) {
        if let Some(children) = derived.get(name) {
            for child in children {
                result.push(child.clone());
                Self::collect_derived(derived, &child.full_name(), result);
            }
        }
    }

    #[must_use]
    pub fn has_derived_types(&self, resource_type: &Arc<ResourceType>) -> bool {
        if let Some(sealed) = self.sealed.get() {
            return sealed.derived.contains_key(&resource_type.full_name());
        }
        !self.get_derived_types(resource_type).is_empty()
    }

    /// The association set whose end matches (set, declaring type or
    /// ancestor, property). Absence is ordinary.
    #[must_use]
    pub fn get_resource_association_set(
        &self,
        set: &Arc<ResourceSetWrapper>,
        resource_type: &Arc<ResourceType>,
        property: &Arc<ResourceProperty>,
    ) -> Option<Arc<ResourceAssociationSet>> {
        let sealed = self.sealed.get()?;
        for t in resource_type.base_types_and_self() {
            let key = (
                set.name().inner().clone(),
                t.full_name(),
                property.name().inner().clone(),
            );
            if let Some(assoc) = sealed.associations.get(&key) {
                return Some(assoc.clone());
            }
        }
        None
    }

    /// The association set for a (type, property) pair regardless of
    /// set, used when fixing up type-level navigation.
    #[must_use]
    pub fn get_association_for_property(
        &self,
        resource_type: &Arc<ResourceType>,
        property: &Arc<ResourceProperty>,
    ) -> Option<Arc<ResourceAssociationSet>> {
        let sealed = self.sealed.get()?;
        for t in resource_type.base_types_and_self() {
            let key = (t.full_name(), property.name().inner().clone());
            if let Some(assoc) = sealed.associations_by_type.get(&key) {
                return Some(assoc.clone());
            }
        }
        None
    }

    /// Registered sets in registration order. Empty until finalized.
    #[must_use]
    pub fn resource_sets(&self) -> Vec<Arc<ResourceSetWrapper>> {
        match self.sealed.get() {
            Some(sealed) => sealed
                .set_order
                .iter()
                .map(|n| sealed.sets[n].clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Registered declared types in registration order. Empty until
    /// finalized.
    #[must_use]
    pub fn resource_types(&self) -> Vec<Arc<ResourceType>> {
        match self.sealed.get() {
            Some(sealed) => sealed
                .type_order
                .iter()
                .map(|n| sealed.types[n].clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Registered operation wrappers. Empty until finalized.
    #[must_use]
    pub fn operation_wrappers(&self) -> Vec<Arc<OperationWrapper>> {
        match self.sealed.get() {
            Some(sealed) => sealed.operations.wrappers(),
            None => Vec::new(),
        }
    }
}

impl MetadataResolver for MetadataModel {
    fn resolve_type_identifier(
        &self,
        identifier: &str,
        context: &Arc<ResourceType>,
    ) -> Option<Arc<ResourceType>> {
        let sealed = self.sealed.get()?;
        GraphView {
            types: &sealed.types,
            sets: &sealed.sets,
            associations: &sealed.associations,
        }
        .resolve_type_identifier(identifier, context)
    }

    fn resolve_declared_type(&self, name: &QualifiedName) -> Option<Arc<ResourceType>> {
        self.try_resolve_resource_type(&name.to_string())
    }

    fn get_resource_set(
        &self,
        source: &Arc<ResourceSetWrapper>,
        source_type: &Arc<ResourceType>,
        property: &Arc<ResourceProperty>,
    ) -> Option<Arc<ResourceSetWrapper>> {
        let sealed = self.sealed.get()?;
        GraphView {
            types: &sealed.types,
            sets: &sealed.sets,
            associations: &sealed.associations,
        }
        .get_resource_set(source, source_type, property)
    }
}
