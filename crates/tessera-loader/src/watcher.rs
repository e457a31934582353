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

//! Viewport-driven lazy loading.
//!
//! Under selective delivery, every page element belonging to a
//! registered-but-not-loaded component is observed for viewport proximity;
//! the first intersection of an element requests its component's load and
//! unobserves that element. Triggering is one-shot per element: a second
//! intersection of the same element never issues a second request, and
//! sibling elements of an already-requested name cost nothing extra because
//! the loader core deduplicates by name.
//!
//! The watcher holds only element-to-name back-references; it never owns
//! load state.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::loader::ComponentLoader;
use crate::page::{ElementId, PageSurface};
use tessera_core::component::LoadState;

/// Lookahead margin the embedding layer should configure on its viewport
/// observation mechanism, so loads start slightly before visibility.
pub const LOOKAHEAD_MARGIN_PX: u32 = 200;

/// Visibility threshold for the viewport observation mechanism.
pub const VISIBILITY_THRESHOLD: f32 = 0.1;

/// A viewport-intersection report from the embedding layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionEvent {
    /// The element that intersected the (margin-expanded) viewport.
    pub element: ElementId,
}

/// Observes page elements and turns their first intersection into a load
/// request.
pub struct VisibilityWatcher {
    loader: ComponentLoader,
    /// Element-to-name back-references; an entry is removed once its element
    /// has triggered (or on disconnect).
    observed: Mutex<HashMap<ElementId, String>>,
}

impl VisibilityWatcher {
    /// Observes every element of every registered component that is not yet
    /// loaded.
    pub fn install(loader: ComponentLoader, page: &dyn PageSurface) -> Self {
        let mut observed = HashMap::new();
        for name in loader.registry().all_names() {
            if loader.state_of(name) == LoadState::Loaded {
                continue;
            }
            for element in page.elements_of(name) {
                observed.insert(element, name.to_string());
            }
        }
        log::debug!("visibility watcher observing {} element(s)", observed.len());

        Self {
            loader,
            observed: Mutex::new(observed),
        }
    }

    /// The number of elements currently under observation.
    pub fn observed_count(&self) -> usize {
        self.observed.lock().unwrap().len()
    }

    /// Handles one intersection report.
    ///
    /// The first report for an observed element requests its component's
    /// load (detached; failures are logged, never propagated here) and stops
    /// observing that element. Reports for unknown or already-triggered
    /// elements are ignored.
    pub fn handle_intersection(&self, element: ElementId) {
        let name = self.observed.lock().unwrap().remove(&element);
        let Some(name) = name else {
            return;
        };

        log::debug!("element {element:?} entered the viewport; requesting '{name}'");
        let loader = self.loader.clone();
        tokio::spawn(async move {
            if let Err(error) = loader.request_load(&name).await {
                log::warn!("viewport-triggered load failed: {error}");
            }
        });
    }

    /// Drains intersection events until the sending side disconnects.
    pub async fn run(&self, events: flume::Receiver<IntersectionEvent>) {
        while let Ok(event) = events.recv_async().await {
            self.handle_intersection(event.element);
        }
        log::debug!("intersection event channel closed");
    }

    /// Stops observing everything. Part of session teardown.
    pub fn disconnect(&self) {
        self.observed.lock().unwrap().clear();
    }
}
