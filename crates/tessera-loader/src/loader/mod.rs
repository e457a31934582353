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

//! The loader core: the single choke point for every acquisition request.
//!
//! [`ComponentLoader`] owns the per-name state machine and the per-locator
//! acquisition cache for the page session. Its one operation,
//! [`request_load`](ComponentLoader::request_load), upholds two deduplication
//! invariants:
//!
//! - **per name**: N concurrent requests for the same name join a single
//!   in-flight acquisition and all observe its outcome;
//! - **per locator**: two names aliasing the same resource locator trigger at
//!   most one underlying fetch in total, regardless of call order or
//!   concurrency.
//!
//! Acquisitions run as detached tokio tasks, so a caller dropping its future
//! never aborts work already begun (there is no cancellation). State
//! transitions happen at suspension-free points under one mutex that is
//! never held across an await.

mod status;

pub use status::LoadStatus;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tessera_core::component::{ComponentDescriptor, LoadState, PriorityTier};
use tessera_core::environment::RuntimeCapabilities;
use tessera_core::error::LoadError;
use tessera_core::event::{LoaderEvent, NotificationHub};
use tokio::sync::watch;

use crate::page::ResourceFetcher;
use crate::registry::ComponentRegistry;

/// Outcome channel value for one per-name acquisition cycle.
#[derive(Debug, Clone)]
enum Completion {
    Pending,
    Done(Result<(), LoadError>),
}

/// Outcome channel value for one per-locator fetch.
#[derive(Debug, Clone)]
enum FetchCompletion {
    Pending,
    Done(Result<(), String>),
}

/// Session-scoped record for one registered name.
///
/// Created lazily on the first request and never destroyed. `pending` is
/// `Some` iff `state` is `Loading`.
#[derive(Debug, Default)]
struct LoadRecord {
    state: LoadState,
    pending: Option<watch::Receiver<Completion>>,
    last_error: Option<LoadError>,
}

/// All mutable loader state, guarded by one mutex.
#[derive(Debug, Default)]
struct LoaderState {
    records: HashMap<String, LoadRecord>,
    /// Locators whose resource is already in the page.
    acquired_locators: HashSet<String>,
    /// Locators with a fetch in flight; later aliases join the channel.
    in_flight_locators: HashMap<String, watch::Receiver<FetchCompletion>>,
}

struct LoaderInner {
    registry: Arc<ComponentRegistry>,
    capabilities: RuntimeCapabilities,
    fetcher: Arc<dyn ResourceFetcher>,
    events: NotificationHub<LoaderEvent>,
    state: Mutex<LoaderState>,
}

/// The deduplicating loader core. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct ComponentLoader {
    inner: Arc<LoaderInner>,
}

/// What a request found when it reached the per-name record.
enum Entry {
    AlreadyLoaded,
    Join(watch::Receiver<Completion>),
    Begin(watch::Receiver<Completion>, watch::Sender<Completion>),
}

fn begin_cycle(record: &mut LoadRecord) -> Entry {
    let (sender, receiver) = watch::channel(Completion::Pending);
    record.state = LoadState::Loading;
    record.pending = Some(receiver.clone());
    record.last_error = None;
    Entry::Begin(receiver, sender)
}

impl ComponentLoader {
    /// Creates a loader over `registry`, fetching through `fetcher`.
    pub fn new(
        registry: Arc<ComponentRegistry>,
        capabilities: RuntimeCapabilities,
        fetcher: Arc<dyn ResourceFetcher>,
    ) -> Self {
        Self {
            inner: Arc::new(LoaderInner {
                registry,
                capabilities,
                fetcher,
                events: NotificationHub::new(),
                state: Mutex::new(LoaderState::default()),
            }),
        }
    }

    /// Requests that the component `name` be loaded.
    ///
    /// - Already `Loaded`: resolves immediately with success, no new work.
    /// - `Loading`: joins the in-flight acquisition and observes its
    ///   outcome.
    /// - `Unrequested` or `Failed`: begins a fresh acquisition cycle
    ///   (`Failed` records are re-opened by a new request; that is the
    ///   session's retry policy).
    /// - Not registered: fails with [`LoadError::UnknownComponent`] without
    ///   recording any state.
    ///
    /// All outcomes are delivered through the returned future; the call
    /// itself never panics on a caller error.
    pub async fn request_load(&self, name: &str) -> Result<(), LoadError> {
        let descriptor = match self.inner.registry.descriptor_for(name) {
            Some(descriptor) => descriptor.clone(),
            None => {
                log::warn!("request for unknown component '{name}'");
                return Err(LoadError::UnknownComponent {
                    name: name.to_string(),
                });
            }
        };

        let entry = {
            let mut state = self.inner.state.lock().unwrap();
            let record = state.records.entry(descriptor.name.clone()).or_default();
            match record.state {
                LoadState::Loaded => Entry::AlreadyLoaded,
                LoadState::Loading => match &record.pending {
                    Some(receiver) => Entry::Join(receiver.clone()),
                    // A Loading record always has a pending channel; if it
                    // ever does not, recover by starting a fresh cycle.
                    None => begin_cycle(record),
                },
                LoadState::Unrequested | LoadState::Failed => begin_cycle(record),
            }
        };

        match entry {
            Entry::AlreadyLoaded => Ok(()),
            Entry::Join(receiver) => Self::await_completion(receiver, &descriptor).await,
            Entry::Begin(receiver, sender) => {
                log::debug!("beginning acquisition cycle for '{}'", descriptor.name);
                let loader = self.clone();
                let task_descriptor = descriptor.clone();
                tokio::spawn(async move {
                    loader.run_acquisition(task_descriptor, sender).await;
                });
                Self::await_completion(receiver, &descriptor).await
            }
        }
    }

    /// Waits for the cycle behind `receiver` to settle and clones out its
    /// outcome.
    async fn await_completion(
        mut receiver: watch::Receiver<Completion>,
        descriptor: &ComponentDescriptor,
    ) -> Result<(), LoadError> {
        let interrupted = || LoadError::AcquisitionFailed {
            name: descriptor.name.clone(),
            resource_locator: descriptor.resource_locator.clone(),
            cause: "acquisition task ended without reporting an outcome".to_string(),
        };

        match receiver
            .wait_for(|completion| matches!(completion, Completion::Done(_)))
            .await
        {
            Ok(completion) => match &*completion {
                Completion::Done(result) => result.clone(),
                Completion::Pending => Err(interrupted()),
            },
            Err(_) => Err(interrupted()),
        }
    }

    /// Drives one acquisition cycle to a terminal state and resolves every
    /// caller joined to it. Runs as a detached task.
    async fn run_acquisition(
        &self,
        descriptor: ComponentDescriptor,
        sender: watch::Sender<Completion>,
    ) {
        let outcome = self.acquire_locator(&descriptor).await;
        let result = outcome.map_err(|cause| LoadError::AcquisitionFailed {
            name: descriptor.name.clone(),
            resource_locator: descriptor.resource_locator.clone(),
            cause,
        });

        {
            let mut state = self.inner.state.lock().unwrap();
            let record = state.records.entry(descriptor.name.clone()).or_default();
            record.pending = None;
            match &result {
                Ok(()) => {
                    record.state = LoadState::Loaded;
                    record.last_error = None;
                }
                Err(error) => {
                    record.state = LoadState::Failed;
                    record.last_error = Some(error.clone());
                }
            }
        }

        match &result {
            Ok(()) => {
                log::debug!("component loaded: {}", descriptor.name);
                self.inner.events.publish(LoaderEvent::ComponentLoaded {
                    name: descriptor.name.clone(),
                });
            }
            Err(error) => log::warn!("{error}"),
        }

        let _ = sender.send(Completion::Done(result));
    }

    /// Acquires the descriptor's locator at most once page-wide.
    ///
    /// The read-check-insert protocol: under the lock, the locator is either
    /// already acquired (no work), in flight (join that fetch's channel), or
    /// free (claim it and fetch). A claimed fetch first consults
    /// [`ResourceFetcher::is_present`] so an insertion made outside this
    /// subsystem is honored instead of duplicated.
    async fn acquire_locator(&self, descriptor: &ComponentDescriptor) -> Result<(), String> {
        enum LocatorEntry {
            Acquired,
            Join(watch::Receiver<FetchCompletion>),
            Fetch(watch::Sender<FetchCompletion>),
        }

        let locator = descriptor.resource_locator.as_str();
        let entry = {
            let mut state = self.inner.state.lock().unwrap();
            if state.acquired_locators.contains(locator) {
                LocatorEntry::Acquired
            } else if let Some(receiver) = state.in_flight_locators.get(locator) {
                LocatorEntry::Join(receiver.clone())
            } else {
                let (sender, receiver) = watch::channel(FetchCompletion::Pending);
                state.in_flight_locators.insert(locator.to_string(), receiver);
                LocatorEntry::Fetch(sender)
            }
        };

        match entry {
            LocatorEntry::Acquired => {
                log::trace!("locator already acquired: {locator}");
                Ok(())
            }
            LocatorEntry::Join(mut receiver) => {
                log::trace!("joining in-flight fetch of {locator}");
                let adopt = receiver
                    .wait_for(|completion| matches!(completion, FetchCompletion::Done(_)))
                    .await;
                match adopt {
                    Ok(completion) => match &*completion {
                        FetchCompletion::Done(result) => result.clone(),
                        FetchCompletion::Pending => {
                            Err("fetch ended without reporting an outcome".to_string())
                        }
                    },
                    Err(_) => Err("fetch ended without reporting an outcome".to_string()),
                }
            }
            LocatorEntry::Fetch(sender) => {
                let result = if self.inner.fetcher.is_present(locator) {
                    log::debug!("found prior insertion of {locator}; skipping fetch");
                    Ok(())
                } else {
                    // Idle-time deferral for non-critical tiers: hand the
                    // slot back to the scheduler once before fetching.
                    if descriptor.priority_tier != PriorityTier::High
                        && self.inner.capabilities.idle_scheduling
                    {
                        tokio::task::yield_now().await;
                    }
                    self.inner
                        .fetcher
                        .fetch(locator)
                        .await
                        .map_err(|error| error.to_string())
                };

                {
                    let mut state = self.inner.state.lock().unwrap();
                    state.in_flight_locators.remove(locator);
                    if result.is_ok() {
                        state.acquired_locators.insert(locator.to_string());
                    }
                }
                let _ = sender.send(FetchCompletion::Done(result.clone()));
                result
            }
        }
    }

    /// Derives aggregate counts from the current per-name states.
    pub fn status(&self) -> LoadStatus {
        let state = self.inner.state.lock().unwrap();
        let mut loaded = 0;
        let mut in_flight = 0;
        for record in state.records.values() {
            match record.state {
                LoadState::Loaded => loaded += 1,
                LoadState::Loading => in_flight += 1,
                LoadState::Unrequested | LoadState::Failed => {}
            }
        }
        LoadStatus::derive(self.inner.registry.len(), loaded, in_flight)
    }

    /// The current state of `name`. Names without a record (including
    /// unregistered ones) report `Unrequested`.
    pub fn state_of(&self, name: &str) -> LoadState {
        let state = self.inner.state.lock().unwrap();
        state
            .records
            .get(name)
            .map(|record| record.state)
            .unwrap_or_default()
    }

    /// The error recorded by the last failed cycle for `name`, if any.
    pub fn last_error(&self, name: &str) -> Option<LoadError> {
        let state = self.inner.state.lock().unwrap();
        state
            .records
            .get(name)
            .and_then(|record| record.last_error.clone())
    }

    /// Subscribes to [`LoaderEvent`] notifications.
    pub fn subscribe(&self) -> flume::Receiver<LoaderEvent> {
        self.inner.events.subscribe()
    }

    /// The registry this loader serves.
    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.inner.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    struct NoopFetcher;

    #[async_trait::async_trait]
    impl ResourceFetcher for NoopFetcher {
        async fn fetch(&self, _locator: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
            Ok(())
        }
    }

    fn empty_loader() -> ComponentLoader {
        let registry = Arc::new(ComponentRegistry::new(Vec::new()).unwrap());
        ComponentLoader::new(
            registry,
            RuntimeCapabilities::interactive(),
            Arc::new(NoopFetcher),
        )
    }

    #[test]
    fn empty_registry_status_is_all_zero() {
        let status = empty_loader().status();
        assert_eq!(
            status,
            LoadStatus {
                total: 0,
                loaded: 0,
                in_flight: 0,
                remaining: 0,
                percentage: 0
            }
        );
    }

    #[tokio::test]
    async fn unknown_name_fails_and_records_nothing() {
        let loader = empty_loader();
        let result = loader.request_load("ghost").await;
        assert_eq!(
            result,
            Err(LoadError::UnknownComponent {
                name: "ghost".to_string()
            })
        );
        assert_eq!(loader.state_of("ghost"), LoadState::Unrequested);
    }
}
