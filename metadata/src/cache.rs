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

//! Identity-keyed operation caches.
//!
//! Resource types are cached by instance identity, never by structure:
//! two structurally identical types are still two types. The check
//! then-insert sequence of every cache runs under that cache's own
//! lock, so each key materializes at most once even under concurrent
//! first access.

use crate::error::Error;
use crate::operation::OperationWrapper;
use crate::resource::ResourceType;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;

/// Pointer identity of a resource type instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeIdentity(usize);

impl TypeIdentity {
    #[must_use]
    pub fn of(resource_type: &Arc<ResourceType>) -> Self {
        Self(Arc::as_ptr(resource_type) as usize)
    }
}

fn wrapper_identity(wrapper: &Arc<OperationWrapper>) -> usize {
    Arc::as_ptr(wrapper) as usize
}

/// Operations keyed by name plus binding type.
///
/// Unbound operations key on their bare name; bound operations append
/// the binding type's full name, so overloads that differ only in
/// binding type coexist while a true duplicate fails at registration.
#[derive(Default)]
pub struct OperationCache {
    entries: Mutex<HashMap<String, Arc<OperationWrapper>>>,
}

impl OperationCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key(name: &str, binding_type: Option<&Arc<ResourceType>>) -> String {
        match binding_type {
            Some(t) => format!("{}_{}", name, t.full_name()),
            None => name.to_string(),
        }
    }

    /// Register a wrapper.
    ///
    /// # Errors
    ///
    /// Returns an error when an operation with the same (name,
    /// binding type) key is already registered; an ambiguous overload
    /// is a configuration error, not an overwrite.
    pub fn add(&self, wrapper: Arc<OperationWrapper>) -> Result<(), Error> {
        let key = Self::key(wrapper.name(), wrapper.binding_type());
        let mut entries = self.entries.lock().expect("not poisoned");
        if entries.contains_key(&key) {
            return Err(Error::DuplicateOperation(key));
        }
        entries.insert(key, wrapper);
        Ok(())
    }

    /// Look up by name and binding type.
    #[must_use]
    pub fn try_get_wrapper(
        &self,
        name: &str,
        binding_type: Option<&Arc<ResourceType>>,
    ) -> Option<Arc<OperationWrapper>> {
        self.entries
            .lock()
            .expect("not poisoned")
            .get(&Self::key(name, binding_type))
            .cloned()
    }

    /// Look up the registered wrapper sharing an operation's key.
    #[must_use]
    pub fn try_get_wrapper_for(
        &self,
        wrapper: &Arc<OperationWrapper>,
    ) -> Option<Arc<OperationWrapper>> {
        self.try_get_wrapper(wrapper.name(), wrapper.binding_type())
    }

    /// Snapshot of every registered wrapper.
    #[must_use]
    pub fn wrappers(&self) -> Vec<Arc<OperationWrapper>> {
        self.entries
            .lock()
            .expect("not poisoned")
            .values()
            .cloned()
            .collect()
    }
}

/// Request-scoped cache of the operations a URI selected, with a
/// memoized per-instance-type view.
///
/// Selecting an action at a base-type level must still yield the
/// right concrete action set for every polymorphic instance; the
/// derived map answers that without re-walking the base chain per
/// serialized instance.
#[derive(Default)]
pub struct SelectedOperationsCache {
    selected: Mutex<HashMap<TypeIdentity, Vec<Arc<OperationWrapper>>>>,
    per_instance: Mutex<HashMap<TypeIdentity, Arc<Vec<Arc<OperationWrapper>>>>>,
}

impl SelectedOperationsCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record operations selected for a URI-addressed type. Returns
    /// whether anything new was recorded.
    pub fn add_selected_operations(
        &self,
        resource_type: &Arc<ResourceType>,
        operations: &[Arc<OperationWrapper>],
    ) -> bool {
        if operations.is_empty() {
            return false;
        }
        let mut selected = self.selected.lock().expect("not poisoned");
        let entry = selected
            .entry(TypeIdentity::of(resource_type))
            .or_insert_with(Vec::new);
        let mut added = false;
        for op in operations {
            if !entry.iter().any(|e| wrapper_identity(e) == wrapper_identity(op)) {
                entry.push(op.clone());
                added = true;
            }
        }
        drop(selected);
        if added {
            // The derived view unions base types; new selections
            // invalidate every memoized instance list.
            self.per_instance.lock().expect("not poisoned").clear();
        }
        added
    }

    /// Operations selected for an instance type or any of its base
    /// types and still bindable to the instance type itself.
    /// Memoized per type identity: repeated calls return the same
    /// list instance.
    #[must_use]
    pub fn get_selected_operations(
        &self,
        instance_type: &Arc<ResourceType>,
    ) -> Arc<Vec<Arc<OperationWrapper>>> {
        let identity = TypeIdentity::of(instance_type);
        let mut per_instance = self.per_instance.lock().expect("not poisoned");
        if let Some(existing) = per_instance.get(&identity) {
            return existing.clone();
        }
        let selected = self.selected.lock().expect("not poisoned");
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for t in instance_type.base_types_and_self() {
            if let Some(ops) = selected.get(&TypeIdentity::of(&t)) {
                for op in ops {
                    let bindable = op
                        .binding_type()
                        .map_or(false, |b| b.is_assignable_from(instance_type));
                    if bindable && seen.insert(wrapper_identity(op)) {
                        result.push(op.clone());
                    }
                }
            }
        }
        drop(selected);
        let result = Arc::new(result);
        per_instance.insert(identity, result.clone());
        result
    }
}
