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

//! Primitive types describing a loadable page component.
//!
//! A *component* is a named, independently-loadable unit of page behavior.
//! Everything the orchestrator needs to know about one is captured by its
//! [`ComponentDescriptor`]; the presentational side of a component (its
//! markup and rendering) is an external collaborator the orchestrator never
//! inspects.

mod state;

pub use state::LoadState;

use serde::{Deserialize, Serialize};

/// Scheduling hint governing when a component's resource is acquired.
///
/// High-tier components acquire immediately on request; medium and low tiers
/// are deferred to idle time when the runtime offers an idle-scheduling
/// capability, and acquire immediately otherwise (no starvation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriorityTier {
    /// Critical for first paint; acquired immediately.
    High,
    /// Useful soon; deferrable to idle time.
    Medium,
    /// Below the fold or cosmetic; deferrable to idle time.
    Low,
}

/// Immutable description of one registered component.
///
/// Built once at startup from a static catalog and never mutated afterwards.
/// The `name` is the unique key under which the component is requested; the
/// `resource_locator` addresses the underlying asset that implements it. Two
/// distinct names may alias the same locator, in which case the locator is
/// fetched at most once in total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Unique component name (the page-side element identity).
    pub name: String,
    /// Address of the underlying asset implementing the component.
    pub resource_locator: String,
    /// Scheduling tier for acquisition.
    pub priority_tier: PriorityTier,
}

impl ComponentDescriptor {
    /// Creates a descriptor from its three parts.
    pub fn new(
        name: impl Into<String>,
        resource_locator: impl Into<String>,
        priority_tier: PriorityTier,
    ) -> Self {
        Self {
            name: name.into(),
            resource_locator: resource_locator.into(),
            priority_tier,
        }
    }
}
