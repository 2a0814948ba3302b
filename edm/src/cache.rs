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

//! Name-keyed projection cache.
//!
//! Each kind of projected element lives in one `ElementCache`. The
//! map is allocated on first insert, and the completely-filled flag
//! lets a lookup distinguish "not materialized yet" from
//! "definitively absent" once the owner has enumerated every element
//! of that kind. The owning model serializes every check-then-insert
//! under its own lock, so each name materializes at most once.

use std::collections::HashMap;

/// Lazily allocated map from element name to projected element.
pub struct ElementCache<T> {
    items: Option<HashMap<String, T>>,
    completely_filled: bool,
}

impl<T> Default for ElementCache<T> {
    fn default() -> Self {
        Self {
            items: None,
            completely_filled: false,
        }
    }
}

impl<T> ElementCache<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached element, if this name was materialized.
    #[must_use]
    pub fn try_get_cached_item(&self, name: &str) -> Option<&T> {
        self.items.as_ref().and_then(|m| m.get(name))
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.items.as_ref().map_or(false, |m| m.contains_key(name))
    }

    /// Cache a freshly materialized element.
    ///
    /// # Panics
    ///
    /// A duplicate name is a defect in the owner: it means the same
    /// element materialized twice, which breaks identity stability.
    pub fn add(&mut self, name: String, item: T) {
        let items = self.items.get_or_insert_with(HashMap::new);
        assert!(
            !items.contains_key(&name),
            "metadata element cached twice: {name}"
        );
        items.insert(name, item);
    }

    /// Whether every element of this kind has been enumerated, making
    /// a miss a definitive absence.
    #[must_use]
    pub const fn is_completely_filled(&self) -> bool {
        self.completely_filled
    }

    pub fn set_completely_filled(&mut self) {
        self.completely_filled = true;
    }

    /// Snapshot of the cached elements, in no particular order.
    #[must_use]
    pub fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items
            .as_ref()
            .map_or_else(Vec::new, |m| m.values().cloned().collect())
    }
}
