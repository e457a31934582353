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

//! The per-session orchestrator and its bootstrap sequence.
//!
//! One [`Orchestrator`] is constructed per page session. Construction
//! classifies the environment exactly once; [`bootstrap`](Orchestrator::bootstrap)
//! then either requests every registered component (eager delivery) or
//! requests the high-priority ones and installs the visibility watcher for
//! the rest, with a grace-period fallback sweep behind it. Collaborators
//! receive the orchestrator by reference; there is no ambient global
//! instance.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tessera_core::component::{LoadState, PriorityTier};
use tessera_core::environment::{classify, DeliveryStrategy, EnvironmentSignals, RuntimeCapabilities};

use crate::loader::ComponentLoader;
use crate::page::{PageSurface, ResourceFetcher};
use crate::registry::ComponentRegistry;
use crate::watcher::VisibilityWatcher;

/// How long after a selective bootstrap the fallback sweep waits before
/// requesting components the watcher has not triggered.
pub const FALLBACK_SWEEP_GRACE: Duration = Duration::from_millis(100);

/// The per-session component-loading orchestrator.
pub struct Orchestrator {
    loader: ComponentLoader,
    page: Arc<dyn PageSurface>,
    capabilities: RuntimeCapabilities,
    strategy: DeliveryStrategy,
    sweep_grace: Duration,
    watcher: Mutex<Option<Arc<VisibilityWatcher>>>,
}

impl Orchestrator {
    /// Builds the orchestrator for one page session.
    ///
    /// `signals` and `capabilities` are read here, once; the chosen delivery
    /// strategy is never re-derived mid-session.
    pub fn new(
        registry: Arc<ComponentRegistry>,
        signals: &EnvironmentSignals,
        capabilities: RuntimeCapabilities,
        fetcher: Arc<dyn ResourceFetcher>,
        page: Arc<dyn PageSurface>,
    ) -> Self {
        let strategy = classify(signals, &capabilities);
        let loader = ComponentLoader::new(registry, capabilities, fetcher);

        Self {
            loader,
            page,
            capabilities,
            strategy,
            sweep_grace: FALLBACK_SWEEP_GRACE,
            watcher: Mutex::new(None),
        }
    }

    /// Overrides the fallback-sweep grace period (defaults to
    /// [`FALLBACK_SWEEP_GRACE`]).
    pub fn with_sweep_grace(mut self, grace: Duration) -> Self {
        self.sweep_grace = grace;
        self
    }

    /// Runs the page-ready sequence for the selected strategy.
    ///
    /// Per-component failures are logged and skipped; they never abort the
    /// sequence or affect unrelated components.
    pub async fn bootstrap(&self) {
        log::info!("bootstrapping with {:?} delivery", self.strategy);
        match self.strategy {
            DeliveryStrategy::Eager => self.request_all().await,
            DeliveryStrategy::Selective => self.bootstrap_selective().await,
        }
    }

    /// Requests every registered component in registry order.
    ///
    /// All requests are started before any is awaited, so acquisitions
    /// overlap; completion order across names is unspecified.
    async fn request_all(&self) {
        let names = self.loader.registry().all_names().map(str::to_string);
        self.request_batch(names.collect()).await;
    }

    /// Requests the high-priority components, then installs viewport-driven
    /// loading for the rest (or requests them directly when viewport
    /// observation is unavailable).
    async fn bootstrap_selective(&self) {
        let critical: Vec<String> = self
            .loader
            .registry()
            .descriptors()
            .iter()
            .filter(|descriptor| descriptor.priority_tier == PriorityTier::High)
            .map(|descriptor| descriptor.name.clone())
            .collect();
        self.request_batch(critical).await;

        if self.capabilities.intersection_observer {
            let watcher = Arc::new(VisibilityWatcher::install(
                self.loader.clone(),
                self.page.as_ref(),
            ));
            *self.watcher.lock().unwrap() = Some(Arc::clone(&watcher));
            self.schedule_fallback_sweep();
        } else {
            log::info!("viewport observation unavailable; loading remaining components directly");
            self.request_all().await;
        }
    }

    /// Starts a request for each name, then awaits them all, logging
    /// failures.
    async fn request_batch(&self, names: Vec<String>) {
        let handles: Vec<_> = names
            .into_iter()
            .map(|name| {
                let loader = self.loader.clone();
                tokio::spawn(async move {
                    let outcome = loader.request_load(&name).await;
                    (name, outcome)
                })
            })
            .collect();

        for handle in handles {
            if let Ok((name, Err(error))) = handle.await {
                log::warn!("bootstrap load of '{name}' failed: {error}");
            }
        }
    }

    /// After the grace period, requests every component that is still
    /// unrequested but present on the page — the safety net for elements the
    /// viewport observation never reports.
    fn schedule_fallback_sweep(&self) {
        let loader = self.loader.clone();
        let page = Arc::clone(&self.page);
        let grace = self.sweep_grace;

        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            let names: Vec<String> = loader.registry().all_names().map(str::to_string).collect();
            for name in names {
                if loader.state_of(&name) != LoadState::Unrequested {
                    continue;
                }
                if page.elements_of(&name).is_empty() {
                    continue;
                }
                log::debug!("grace-period sweep requesting '{name}'");
                if let Err(error) = loader.request_load(&name).await {
                    log::warn!("sweep load of '{name}' failed: {error}");
                }
            }
        });
    }

    /// Tears the session down by dropping all viewport observations.
    ///
    /// Acquisitions already in flight are not cancelled; they run to
    /// completion.
    pub fn teardown(&self) {
        if let Some(watcher) = self.watcher.lock().unwrap().take() {
            watcher.disconnect();
            log::debug!("visibility watcher disconnected");
        }
    }

    /// The loader core, for collaborators that request or subscribe.
    pub fn loader(&self) -> &ComponentLoader {
        &self.loader
    }

    /// The delivery strategy chosen at construction.
    pub fn strategy(&self) -> DeliveryStrategy {
        self.strategy
    }

    /// The installed visibility watcher, if selective bootstrap installed
    /// one. The embedding layer feeds it intersection events.
    pub fn watcher(&self) -> Option<Arc<VisibilityWatcher>> {
        self.watcher.lock().unwrap().clone()
    }
}
