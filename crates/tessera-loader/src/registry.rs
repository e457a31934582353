// Copyright 2026 tessera contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The static, read-only component registry.
//!
//! The registry maps component names to descriptors and preserves catalog
//! insertion order, which is the default eager-load order. It is built once
//! at startup, either from code or from a RON catalog, and is never mutated
//! afterwards; the orchestrator shares it via `Arc`.

use std::collections::HashMap;

use tessera_core::component::{ComponentDescriptor, PriorityTier};
use thiserror::Error;

/// An error building a registry from a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The RON text could not be parsed as a component catalog.
    #[error("failed to parse component catalog: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// Two catalog entries share a name.
    #[error("duplicate component name in catalog: '{0}'")]
    DuplicateName(String),
}

/// Read-only lookup from component name to descriptor.
#[derive(Debug)]
pub struct ComponentRegistry {
    descriptors: Vec<ComponentDescriptor>,
    index: HashMap<String, usize>,
}

impl ComponentRegistry {
    /// Builds a registry from an ordered catalog.
    ///
    /// The order of `catalog` is preserved and becomes the eager-load order.
    /// Duplicate names are rejected.
    pub fn new(catalog: Vec<ComponentDescriptor>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(catalog.len());
        for (position, descriptor) in catalog.iter().enumerate() {
            if index.insert(descriptor.name.clone(), position).is_some() {
                return Err(CatalogError::DuplicateName(descriptor.name.clone()));
            }
        }
        log::debug!("component registry built with {} entries", catalog.len());
        Ok(Self {
            descriptors: catalog,
            index,
        })
    }

    /// Parses a RON catalog, e.g.:
    ///
    /// ```text
    /// [
    ///     (name: "site-header", resource_locator: "components/site-header.js", priority_tier: High),
    ///     (name: "site-footer", resource_locator: "components/site-footer.js", priority_tier: Low),
    /// ]
    /// ```
    pub fn from_ron(text: &str) -> Result<Self, CatalogError> {
        let catalog: Vec<ComponentDescriptor> = ron::from_str(text)?;
        Self::new(catalog)
    }

    /// The catalog of the original site: eight components with the tiers the
    /// presentational layer was authored against.
    pub fn builtin() -> Self {
        let catalog = [
            ("site-header", PriorityTier::High),
            ("site-footer", PriorityTier::Low),
            ("article-header", PriorityTier::High),
            ("author-bio", PriorityTier::Medium),
            ("callout-box", PriorityTier::Medium),
            ("back-to-top", PriorityTier::Low),
            ("syntax-highlighter", PriorityTier::High),
            ("smooth-scroll", PriorityTier::High),
        ];

        let mut descriptors = Vec::with_capacity(catalog.len());
        let mut index = HashMap::with_capacity(catalog.len());
        for (position, (name, tier)) in catalog.into_iter().enumerate() {
            descriptors.push(ComponentDescriptor::new(
                name,
                format!("components/{name}.js"),
                tier,
            ));
            index.insert(name.to_string(), position);
        }

        Self { descriptors, index }
    }

    /// Looks up the descriptor for `name`, if registered.
    pub fn descriptor_for(&self, name: &str) -> Option<&ComponentDescriptor> {
        self.index
            .get(name)
            .map(|&position| &self.descriptors[position])
    }

    /// Iterates over all registered names in catalog insertion order.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        self.descriptors
            .iter()
            .map(|descriptor| descriptor.name.as_str())
    }

    /// All descriptors in catalog insertion order.
    pub fn descriptors(&self) -> &[ComponentDescriptor] {
        &self.descriptors
    }

    /// The number of registered components.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if no components are registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
