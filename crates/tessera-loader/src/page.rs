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

//! The seams between the orchestrator and the page it runs in.
//!
//! The loader core never touches the page directly: fetching and inserting a
//! resource goes through [`ResourceFetcher`], and discovering which elements
//! belong to a component name goes through [`PageSurface`]. Both are injected
//! at construction, which keeps the whole orchestrator testable without a
//! real execution environment.

use std::error::Error;

use async_trait::async_trait;

/// Opaque identity of one page element.
///
/// The embedding layer assigns these; the orchestrator only compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// Fetches and inserts a component's underlying resource into the page.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Performs one acquisition attempt for `locator`: fetch the resource
    /// and attach it to the page's shared insertion point.
    ///
    /// Called at most once per acquisition cycle per locator; the loader
    /// core guarantees no two fetches of the same locator are ever in
    /// flight concurrently. There is no retry inside a cycle.
    async fn fetch(&self, locator: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Reports whether `locator` is already present in the page through an
    /// insertion made outside this subsystem. Consulted before fetching so
    /// an independently-inserted resource is never duplicated.
    fn is_present(&self, locator: &str) -> bool {
        let _ = locator;
        false
    }
}

/// Read-only view of the elements currently on the page.
///
/// Presentational collaborators only have to (a) exist as elements whose
/// identity matches a registered name and (b) tolerate being queried at any
/// time, including before any load completes.
pub trait PageSurface: Send + Sync {
    /// All elements on the page that are instances of the component `name`.
    fn elements_of(&self, name: &str) -> Vec<ElementId>;
}
