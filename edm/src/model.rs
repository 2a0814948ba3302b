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

//! The lazily projected EDM model.
//!
//! Every public accessor takes the single model lock once and threads
//! the locked state through the internal constructors, so each
//! check-then-insert runs atomically and every projected element
//! materializes at most once: repeated requests return the identical
//! instance, which keeps identity equality transitive from the source
//! model into the projection.
//!
//! Structured types are cached as property-less shells first and get
//! their properties in a later single-assignment step, which breaks
//! construction cycles. Navigation properties get a second fix-up
//! phase that pairs each with its partner, synthesizing a silent
//! partner when the provider declared only one direction.

use crate::cache::ElementCache;
use crate::entity_set::EdmEntitySet;
use crate::error::Error;
use crate::operation::EdmEntitySetReference;
use crate::operation::EdmOperation;
use crate::operation::EdmOperationImport;
use crate::operation::EdmOperationParameter;
use crate::property::EdmNavigationProperty;
use crate::property::EdmPropertyRef;
use crate::property::EdmStructuralProperty;
use crate::structured_type::EdmStructuredType;
use crate::structured_type::EdmTypeKind;
use crate::type_reference::EdmTypeReference;
use odata_svc_metadata::association::Multiplicity;
use odata_svc_metadata::operation::OperationWrapper;
use odata_svc_metadata::provider::MetadataProviderState;
use odata_svc_metadata::resource::PropertyTypeRef;
use odata_svc_metadata::resource::ResourceProperty;
use odata_svc_metadata::resource::ResourcePropertyKind;
use odata_svc_metadata::resource::ResourceSetWrapper;
use odata_svc_metadata::resource::ResourceType;
use odata_svc_metadata::resource::ResourceTypeKind;
use odata_svc_metadata::Error as MetadataError;
use odata_svc_metadata::MetadataModel;
use odata_svc_metadata::MetadataResolver as _;
use odata_svc_metadata::QualifiedName;
use odata_svc_metadata::SimpleIdentifier;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use tracing::debug;
use tracing::trace;

/// What the projection is being used for. URI-path parsing must
/// resolve names before the source model finishes loading; the other
/// modes assume a finalized source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdmModelMode {
    Serialization,
    SelectAndExpandParsing,
    UriPathParsing,
}

#[derive(Default)]
struct ModelState {
    schema_types: ElementCache<Arc<EdmStructuredType>>,
    entity_sets: ElementCache<Arc<EdmEntitySet>>,
    operations: ElementCache<Arc<EdmOperation>>,
    operation_imports: ElementCache<Arc<EdmOperationImport>>,
    silent_partners: HashMap<(String, String), Arc<EdmNavigationProperty>>,
}

/// EDM-shaped mirror of a metadata model.
pub struct EdmModel {
    metadata: Arc<MetadataModel>,
    mode: EdmModelMode,
    state: Mutex<ModelState>,
}

impl EdmModel {
    #[must_use]
    pub fn new(metadata: Arc<MetadataModel>, mode: EdmModelMode) -> Self {
        Self {
            metadata,
            mode,
            state: Mutex::new(ModelState::default()),
        }
    }

    #[must_use]
    pub const fn metadata(&self) -> &Arc<MetadataModel> {
        &self.metadata
    }

    #[must_use]
    pub const fn mode(&self) -> EdmModelMode {
        self.mode
    }

    fn lock(&self) -> MutexGuard<'_, ModelState> {
        self.state.lock().expect("not poisoned")
    }

    /// Project (or fetch) the schema type mirroring a structured
    /// resource type.
    ///
    /// # Errors
    ///
    /// Propagates configuration errors from the source model.
    pub fn ensure_schema_type(
        &self,
        resource_type: &Arc<ResourceType>,
    ) -> Result<Arc<EdmStructuredType>, Error> {
        let mut state = self.lock();
        Ok(Self::shell(&mut state, resource_type))
    }

    /// Project a type reference for any resource type variant.
    ///
    /// # Errors
    ///
    /// Propagates configuration errors from the source model.
    pub fn ensure_type_reference(
        &self,
        resource_type: &Arc<ResourceType>,
        nullable: bool,
    ) -> Result<EdmTypeReference, Error> {
        let mut state = self.lock();
        self.type_reference(&mut state, resource_type, nullable)
    }

    /// Project (or fetch) the entity set mirroring a set wrapper.
    ///
    /// # Errors
    ///
    /// Propagates configuration errors from the source model.
    pub fn ensure_entity_set(
        &self,
        set: &Arc<ResourceSetWrapper>,
    ) -> Result<Arc<EdmEntitySet>, Error> {
        let mut state = self.lock();
        Ok(self.entity_set(&mut state, set))
    }

    /// Find a schema type by full name. `None` means the name is not
    /// known to exist; in URI-path-parsing mode over an incremental
    /// model that is weaker than "known not to exist".
    ///
    /// # Errors
    ///
    /// `ModelNotFinalized` in serialization mode over an incremental
    /// source model.
    pub fn find_schema_type(&self, name: &str) -> Result<Option<Arc<EdmStructuredType>>, Error> {
        let mut state = self.lock();
        if let Some(t) = state.schema_types.try_get_cached_item(name) {
            return Ok(Some(t.clone()));
        }
        if state.schema_types.is_completely_filled() {
            return Ok(None);
        }
        self.check_incremental_read()?;
        match self.metadata.try_resolve_resource_type(name) {
            Some(rt) => Ok(Some(Self::shell(&mut state, &rt))),
            None => Ok(None),
        }
    }

    /// Find an entity set by name. Same semantics as
    /// [`Self::find_schema_type`].
    ///
    /// # Errors
    ///
    /// `ModelNotFinalized` in serialization mode over an incremental
    /// source model.
    pub fn find_entity_set(&self, name: &str) -> Result<Option<Arc<EdmEntitySet>>, Error> {
        let mut state = self.lock();
        if let Some(s) = state.entity_sets.try_get_cached_item(name) {
            return Ok(Some(s.clone()));
        }
        if state.entity_sets.is_completely_filled() {
            return Ok(None);
        }
        self.check_incremental_read()?;
        match self.metadata.try_resolve_resource_set(name) {
            Some(w) => Ok(Some(self.entity_set(&mut state, &w))),
            None => Ok(None),
        }
    }

    fn check_incremental_read(&self) -> Result<(), Error> {
        if self.mode == EdmModelMode::Serialization
            && self.metadata.state() != MetadataProviderState::Full
        {
            return Err(Error::ModelNotFinalized);
        }
        Ok(())
    }

    /// Structural properties of a projected type, loading them on
    /// first access.
    ///
    /// # Errors
    ///
    /// Propagates navigation fix-up failures.
    pub fn structural_properties(
        &self,
        edm_type: &Arc<EdmStructuredType>,
    ) -> Result<Vec<Arc<EdmStructuralProperty>>, Error> {
        let mut state = self.lock();
        self.load_properties(&mut state, edm_type)?;
        Ok(edm_type
            .structural_properties()
            .expect("loaded above")
            .to_vec())
    }

    /// Navigation properties of a projected type, loading them on
    /// first access.
    ///
    /// # Errors
    ///
    /// Propagates navigation fix-up failures.
    pub fn navigation_properties(
        &self,
        edm_type: &Arc<EdmStructuredType>,
    ) -> Result<Vec<Arc<EdmNavigationProperty>>, Error> {
        let mut state = self.lock();
        self.load_properties(&mut state, edm_type)?;
        Ok(edm_type
            .navigation_properties()
            .expect("loaded above")
            .to_vec())
    }

    /// Resolve a navigation property's partner to the projected
    /// instance, whether declared or silent.
    ///
    /// # Errors
    ///
    /// Propagates navigation fix-up failures on the partner's type.
    pub fn navigation_partner(
        &self,
        navigation: &Arc<EdmNavigationProperty>,
    ) -> Result<Option<Arc<EdmNavigationProperty>>, Error> {
        let mut state = self.lock();
        let partner = match navigation.partner() {
            Some(p) => p.clone(),
            None => return Ok(None),
        };
        self.resolve_property_ref(&mut state, &partner)
    }

    /// Project (or fetch) the action/function for an operation.
    ///
    /// # Errors
    ///
    /// Propagates configuration errors from the source model.
    pub fn ensure_operation(
        &self,
        wrapper: &Arc<OperationWrapper>,
    ) -> Result<Arc<EdmOperation>, Error> {
        let mut state = self.lock();
        self.operation(&mut state, wrapper)
    }

    /// Project (or fetch) the container import for an operation.
    ///
    /// # Errors
    ///
    /// Propagates configuration errors from the source model.
    pub fn ensure_operation_import(
        &self,
        wrapper: &Arc<OperationWrapper>,
    ) -> Result<Arc<EdmOperationImport>, Error> {
        let mut state = self.lock();
        self.operation_import(&mut state, wrapper)
    }

    /// Find an unbound operation import by name.
    #[must_use]
    pub fn find_operation_import(&self, name: &str) -> Option<Arc<EdmOperationImport>> {
        let state = self.lock();
        state.operation_imports.try_get_cached_item(name).cloned()
    }

    /// Eagerly project the entire container: every set, every
    /// declared type with its properties, every operation and import.
    /// After this, misses in any cache are definitive. Serialization
    /// of `$metadata` starts here.
    ///
    /// # Errors
    ///
    /// `ModelNotFinalized` when the source model is still
    /// incremental; otherwise the first projection failure.
    pub fn load_full_container(&self) -> Result<(), Error> {
        if self.metadata.state() != MetadataProviderState::Full {
            return Err(Error::ModelNotFinalized);
        }
        let mut state = self.lock();
        for set in self.metadata.resource_sets() {
            let projected = self.entity_set(&mut state, &set);
            let element = Self::shell(&mut state, set.resource_type());
            self.load_properties(&mut state, &element)?;
            trace!(set = %projected.name(), "projected entity set");
        }
        for resource_type in self.metadata.resource_types() {
            let shell = Self::shell(&mut state, &resource_type);
            self.load_properties(&mut state, &shell)?;
        }
        for wrapper in self.metadata.operation_wrappers() {
            self.operation(&mut state, &wrapper)?;
            self.operation_import(&mut state, &wrapper)?;
        }
        state.schema_types.set_completely_filled();
        state.entity_sets.set_completely_filled();
        state.operations.set_completely_filled();
        state.operation_imports.set_completely_filled();
        debug!(
            types = state.schema_types.values().len(),
            sets = state.entity_sets.values().len(),
            operations = state.operations.values().len(),
            "edm container fully projected"
        );
        Ok(())
    }

    fn shell(state: &mut ModelState, resource_type: &Arc<ResourceType>) -> Arc<EdmStructuredType> {
        let key = resource_type.full_name();
        if let Some(existing) = state.schema_types.try_get_cached_item(&key) {
            return existing.clone();
        }
        // Cache the shell before anything touches its properties so
        // cyclic property types find it instead of recursing.
        if let Some(base) = resource_type.base_type() {
            Self::shell(state, base);
        }
        let shell = EdmStructuredType::shell(resource_type.clone());
        state.schema_types.add(key, shell.clone());
        shell
    }

    fn type_reference(
        &self,
        state: &mut ModelState,
        resource_type: &Arc<ResourceType>,
        nullable: bool,
    ) -> Result<EdmTypeReference, Error> {
        match resource_type.kind() {
            ResourceTypeKind::Primitive => Ok(EdmTypeReference::Primitive {
                kind: resource_type
                    .primitive_kind()
                    .expect("primitive types carry their kind"),
                nullable,
            }),
            ResourceTypeKind::ComplexType => {
                let shell = Self::shell(state, resource_type);
                Ok(EdmTypeReference::Complex {
                    name: shell
                        .source()
                        .qualified_name()
                        .expect("declared types are named"),
                    nullable,
                })
            }
            ResourceTypeKind::EntityType => {
                let shell = Self::shell(state, resource_type);
                Ok(EdmTypeReference::Entity {
                    name: shell
                        .source()
                        .qualified_name()
                        .expect("declared types are named"),
                    nullable,
                })
            }
            ResourceTypeKind::Collection | ResourceTypeKind::EntityCollection => {
                let item = resource_type
                    .item_type()
                    .expect("collections carry an item");
                let inner = self.type_reference(state, item, false)?;
                Ok(EdmTypeReference::Collection(Box::new(inner)))
            }
        }
    }

    fn entity_set(
        &self,
        state: &mut ModelState,
        set: &Arc<ResourceSetWrapper>,
    ) -> Arc<EdmEntitySet> {
        let key = set.name().inner().clone();
        if let Some(existing) = state.entity_sets.try_get_cached_item(&key) {
            return existing.clone();
        }
        let element = Self::shell(state, set.resource_type());
        let projected = EdmEntitySet::new(
            self.metadata.container_name().clone(),
            element
                .source()
                .qualified_name()
                .expect("entity types are named"),
            set.clone(),
        );
        state.entity_sets.add(key, projected.clone());
        projected
    }

    fn load_properties(
        &self,
        state: &mut ModelState,
        edm_type: &Arc<EdmStructuredType>,
    ) -> Result<(), Error> {
        if edm_type.properties_loaded() {
            return Ok(());
        }
        let source = edm_type.source().clone();
        let declaring = source.qualified_name().expect("declared types are named");
        let mut structural = Vec::new();
        let mut navigation = Vec::new();
        for property in source.properties_declared() {
            if property.kind().contains(ResourcePropertyKind::STREAM) {
                // Media streams surface through the stream layer, not
                // as structural EDM properties.
                continue;
            }
            if property.is_navigation() {
                navigation.push(self.project_navigation(
                    state,
                    &source,
                    &declaring,
                    property,
                )?);
                continue;
            }
            let type_reference = match property.property_type() {
                PropertyTypeRef::Inline(t) => {
                    self.type_reference(state, t, !property.is_key())?
                }
                PropertyTypeRef::Declared(qn) => {
                    let target = self
                        .metadata
                        .resolve_declared_type(qn)
                        .ok_or_else(|| {
                            MetadataError::UnresolvedPropertyType(
                                property.name().inner().clone(),
                                qn.to_string(),
                            )
                        })?;
                    self.type_reference(state, &target, true)?
                }
            };
            structural.push(EdmStructuralProperty::new(
                declaring.clone(),
                type_reference,
                property.clone(),
            ));
        }
        let key = if edm_type.kind() == EdmTypeKind::Entity {
            source
                .key_properties()
                .iter()
                .map(|p| p.name().clone())
                .collect()
        } else {
            Vec::new()
        };
        trace!(
            name = %edm_type.full_name(),
            structural = structural.len(),
            navigation = navigation.len(),
            "projected properties"
        );
        edm_type.load_properties(structural, navigation, key);
        Ok(())
    }

    fn project_navigation(
        &self,
        state: &mut ModelState,
        source: &Arc<ResourceType>,
        declaring: &QualifiedName,
        property: &Arc<ResourceProperty>,
    ) -> Result<Arc<EdmNavigationProperty>, Error> {
        let unpairable = || {
            Error::UnpairableNavigationProperty(
                source.full_name(),
                property.name().inner().clone(),
            )
        };
        let association = self
            .metadata
            .get_association_for_property(source, property)
            .ok_or_else(unpairable)?;
        let association_type = association.association_type().ok_or_else(unpairable)?;
        let this_end = association_type
            .end_for(source, Some(property))
            .ok_or_else(unpairable)?;
        let remote_end = association_type
            .related_end_for(source, Some(property))
            .ok_or_else(unpairable)?;
        let target = remote_end
            .resource_type()
            .qualified_name()
            .expect("association ends are entity-typed");
        let navigation = EdmNavigationProperty::new(
            property.name().clone(),
            declaring.clone(),
            target.clone(),
            property
                .kind()
                .contains(ResourcePropertyKind::RESOURCE_SET_REFERENCE),
            remote_end.multiplicity(),
            remote_end.delete_action(),
            Some(property.clone()),
            false,
        );
        let partner = match remote_end.resource_property() {
            Some(remote_property) => EdmPropertyRef {
                declaring_type: target.clone(),
                name: remote_property.name().clone(),
            },
            None => {
                // One-directional association: synthesize the silent
                // reverse property on the target type.
                let silent_name: SimpleIdentifier = format!("{}_Partner", association.name())
                    .parse()
                    .map_err(MetadataError::from)?;
                let silent = EdmNavigationProperty::new(
                    silent_name.clone(),
                    target.clone(),
                    declaring.clone(),
                    this_end.multiplicity() == Multiplicity::Many,
                    this_end.multiplicity(),
                    this_end.delete_action(),
                    None,
                    true,
                );
                silent.set_partner(EdmPropertyRef {
                    declaring_type: declaring.clone(),
                    name: property.name().clone(),
                });
                state.silent_partners.insert(
                    (target.to_string(), silent_name.inner().clone()),
                    silent,
                );
                EdmPropertyRef {
                    declaring_type: target,
                    name: silent_name,
                }
            }
        };
        navigation.set_partner(partner);
        if let Some(constraint) = association_type.referential_constraint() {
            if constraint.principal_role() == this_end.role_name() {
                navigation.set_dependent_properties(
                    constraint
                        .dependent_properties()
                        .iter()
                        .map(|p| p.name().clone())
                        .collect(),
                );
            }
        }
        Ok(navigation)
    }

    fn resolve_property_ref(
        &self,
        state: &mut ModelState,
        reference: &EdmPropertyRef,
    ) -> Result<Option<Arc<EdmNavigationProperty>>, Error> {
        let type_name = reference.declaring_type.to_string();
        if let Some(silent) = state
            .silent_partners
            .get(&(type_name.clone(), reference.name.inner().clone()))
        {
            return Ok(Some(silent.clone()));
        }
        let resource_type = match self.metadata.resolve_declared_type(&reference.declaring_type) {
            Some(t) => t,
            None => return Ok(None),
        };
        let shell = Self::shell(state, &resource_type);
        self.load_properties(state, &shell)?;
        Ok(shell
            .navigation_properties()
            .expect("loaded above")
            .iter()
            .find(|n| n.name() == &reference.name)
            .cloned())
    }

    fn operation_key(wrapper: &Arc<OperationWrapper>) -> String {
        match wrapper.binding_type() {
            Some(t) => format!("{}_{}", wrapper.name(), t.full_name()),
            None => wrapper.name().to_string(),
        }
    }

    fn operation(
        &self,
        state: &mut ModelState,
        wrapper: &Arc<OperationWrapper>,
    ) -> Result<Arc<EdmOperation>, Error> {
        let key = Self::operation_key(wrapper);
        if let Some(existing) = state.operations.try_get_cached_item(&key) {
            return Ok(existing.clone());
        }
        let op = wrapper.operation();
        let mut parameters = Vec::new();
        for parameter in op.parameters() {
            parameters.push(EdmOperationParameter {
                name: parameter.name().clone(),
                type_reference: self.type_reference(state, parameter.parameter_type(), true)?,
            });
        }
        let return_type = match op.return_type() {
            Some(t) => Some(self.type_reference(state, t, true)?),
            None => None,
        };
        let projected = EdmOperation::new(
            self.metadata.container_namespace().clone(),
            parameters,
            return_type,
            wrapper.clone(),
        );
        state.operations.add(key, projected.clone());
        Ok(projected)
    }

    fn operation_import(
        &self,
        state: &mut ModelState,
        wrapper: &Arc<OperationWrapper>,
    ) -> Result<Arc<EdmOperationImport>, Error> {
        let key = Self::operation_key(wrapper);
        if let Some(existing) = state.operation_imports.try_get_cached_item(&key) {
            return Ok(existing.clone());
        }
        let operation = self.operation(state, wrapper)?;
        let entity_set = if let Some(result_set) = wrapper.result_set() {
            let projected = self.entity_set(state, result_set);
            EdmEntitySetReference::Named(projected.name().clone())
        } else if let Some(path) = wrapper.operation().path_expression() {
            // Raw re-emission: the path evaluator resolves it later.
            EdmEntitySetReference::Path(
                path.path().split('/').map(str::to_string).collect(),
            )
        } else {
            EdmEntitySetReference::None
        };
        let projected = EdmOperationImport::new(
            self.metadata.container_name().clone(),
            entity_set,
            operation,
        );
        state.operation_imports.add(key, projected.clone());
        Ok(projected)
    }
}
