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

//! Deduplication and failure-isolation properties of the loader core.

use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tessera_core::component::{ComponentDescriptor, LoadState, PriorityTier};
use tessera_core::environment::RuntimeCapabilities;
use tessera_core::error::LoadError;
use tessera_core::event::LoaderEvent;
use tessera_loader::{ComponentLoader, ComponentRegistry, ResourceFetcher};
use tokio::sync::watch;

// --- Test setup: an instrumented fetcher ---

/// Counts fetches per locator; optionally holds every fetch behind a gate so
/// tests can pile up concurrent requests, and fails configured locators.
struct CountingFetcher {
    counts: Mutex<HashMap<String, usize>>,
    failing: HashSet<String>,
    present: HashSet<String>,
    gate: watch::Receiver<bool>,
}

impl CountingFetcher {
    fn new(open: bool) -> (Arc<Self>, watch::Sender<bool>) {
        let (sender, receiver) = watch::channel(open);
        let fetcher = Arc::new(Self {
            counts: Mutex::new(HashMap::new()),
            failing: HashSet::new(),
            present: HashSet::new(),
            gate: receiver,
        });
        (fetcher, sender)
    }

    fn failing(locators: &[&str]) -> (Arc<Self>, watch::Sender<bool>) {
        let (sender, receiver) = watch::channel(true);
        let fetcher = Arc::new(Self {
            counts: Mutex::new(HashMap::new()),
            failing: locators.iter().map(|l| l.to_string()).collect(),
            present: HashSet::new(),
            gate: receiver,
        });
        (fetcher, sender)
    }

    fn count(&self, locator: &str) -> usize {
        self.counts.lock().unwrap().get(locator).copied().unwrap_or(0)
    }

    fn total(&self) -> usize {
        self.counts.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl ResourceFetcher for CountingFetcher {
    async fn fetch(&self, locator: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut gate = self.gate.clone();
        let _ = gate.wait_for(|open| *open).await;

        *self
            .counts
            .lock()
            .unwrap()
            .entry(locator.to_string())
            .or_insert(0) += 1;

        if self.failing.contains(locator) {
            return Err(format!("simulated fetch failure for {locator}").into());
        }
        Ok(())
    }

    fn is_present(&self, locator: &str) -> bool {
        self.present.contains(locator)
    }
}

fn registry(entries: &[(&str, &str, PriorityTier)]) -> Arc<ComponentRegistry> {
    let catalog = entries
        .iter()
        .map(|(name, locator, tier)| ComponentDescriptor::new(*name, *locator, *tier))
        .collect();
    Arc::new(ComponentRegistry::new(catalog).unwrap())
}

fn loader_over(
    registry: Arc<ComponentRegistry>,
    fetcher: Arc<CountingFetcher>,
) -> ComponentLoader {
    ComponentLoader::new(registry, RuntimeCapabilities::interactive(), fetcher)
}

// --- Properties ---

#[tokio::test]
async fn concurrent_requests_share_one_acquisition() {
    let (fetcher, gate) = CountingFetcher::new(false);
    let loader = loader_over(
        registry(&[("site-header", "site-header.js", PriorityTier::High)]),
        Arc::clone(&fetcher),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let loader = loader.clone();
            tokio::spawn(async move { loader.request_load("site-header").await })
        })
        .collect();

    // Let every request reach the in-flight acquisition before releasing it.
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
    gate.send(true).unwrap();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), Ok(()));
    }
    assert_eq!(fetcher.count("site-header.js"), 1);
    assert_eq!(loader.state_of("site-header"), LoadState::Loaded);
}

#[tokio::test]
async fn loaded_component_is_never_refetched() {
    let (fetcher, _gate) = CountingFetcher::new(true);
    let loader = loader_over(
        registry(&[("site-header", "site-header.js", PriorityTier::High)]),
        Arc::clone(&fetcher),
    );

    loader.request_load("site-header").await.unwrap();
    assert_eq!(fetcher.count("site-header.js"), 1);

    loader.request_load("site-header").await.unwrap();
    loader.request_load("site-header").await.unwrap();
    assert_eq!(fetcher.count("site-header.js"), 1);
}

#[tokio::test]
async fn aliased_locator_is_fetched_once_in_total() {
    let (fetcher, gate) = CountingFetcher::new(false);
    let loader = loader_over(
        registry(&[
            ("smooth-scroll", "bundle.js", PriorityTier::High),
            ("back-to-top", "bundle.js", PriorityTier::High),
        ]),
        Arc::clone(&fetcher),
    );

    let first = {
        let loader = loader.clone();
        tokio::spawn(async move { loader.request_load("smooth-scroll").await })
    };
    let second = {
        let loader = loader.clone();
        tokio::spawn(async move { loader.request_load("back-to-top").await })
    };

    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
    gate.send(true).unwrap();

    assert_eq!(first.await.unwrap(), Ok(()));
    assert_eq!(second.await.unwrap(), Ok(()));

    assert_eq!(fetcher.count("bundle.js"), 1);
    assert_eq!(loader.state_of("smooth-scroll"), LoadState::Loaded);
    assert_eq!(loader.state_of("back-to-top"), LoadState::Loaded);
}

#[tokio::test]
async fn prior_page_insertion_skips_the_fetch() {
    let (sender, receiver) = watch::channel(true);
    let _keep = sender;
    let fetcher = Arc::new(CountingFetcher {
        counts: Mutex::new(HashMap::new()),
        failing: HashSet::new(),
        present: ["site-header.js".to_string()].into_iter().collect(),
        gate: receiver,
    });
    let loader = loader_over(
        registry(&[("site-header", "site-header.js", PriorityTier::High)]),
        Arc::clone(&fetcher),
    );

    loader.request_load("site-header").await.unwrap();

    assert_eq!(loader.state_of("site-header"), LoadState::Loaded);
    assert_eq!(fetcher.count("site-header.js"), 0);
}

#[tokio::test]
async fn one_failure_does_not_block_other_names() {
    let (fetcher, _gate) = CountingFetcher::failing(&["broken.js"]);
    let loader = loader_over(
        registry(&[
            ("callout-box", "broken.js", PriorityTier::Medium),
            ("author-bio", "author-bio.js", PriorityTier::Medium),
        ]),
        Arc::clone(&fetcher),
    );

    let failure = loader.request_load("callout-box").await;
    assert!(matches!(
        failure,
        Err(LoadError::AcquisitionFailed { ref name, .. }) if name == "callout-box"
    ));
    assert_eq!(loader.state_of("callout-box"), LoadState::Failed);
    assert!(loader.last_error("callout-box").is_some());

    loader.request_load("author-bio").await.unwrap();
    assert_eq!(loader.state_of("author-bio"), LoadState::Loaded);
}

#[tokio::test]
async fn failed_component_is_reopened_by_the_next_request() {
    let (fetcher, _gate) = CountingFetcher::failing(&["broken.js"]);
    let loader = loader_over(
        registry(&[("callout-box", "broken.js", PriorityTier::Medium)]),
        Arc::clone(&fetcher),
    );

    assert!(loader.request_load("callout-box").await.is_err());
    assert!(loader.request_load("callout-box").await.is_err());

    // Each explicit request after a failure runs a fresh acquisition cycle.
    assert_eq!(fetcher.count("broken.js"), 2);
}

#[tokio::test]
async fn unknown_name_leaves_status_unchanged() {
    let (fetcher, _gate) = CountingFetcher::new(true);
    let loader = loader_over(
        registry(&[("site-header", "site-header.js", PriorityTier::High)]),
        Arc::clone(&fetcher),
    );

    let before = loader.status();
    let result = loader.request_load("mystery-widget").await;

    assert_eq!(
        result,
        Err(LoadError::UnknownComponent {
            name: "mystery-widget".to_string()
        })
    );
    assert_eq!(loader.status(), before);
    assert_eq!(fetcher.total(), 0);
}

#[tokio::test]
async fn subscribers_hear_about_each_successful_load() {
    let (fetcher, _gate) = CountingFetcher::new(true);
    let loader = loader_over(
        registry(&[
            ("site-header", "site-header.js", PriorityTier::High),
            ("site-footer", "site-footer.js", PriorityTier::Low),
        ]),
        Arc::clone(&fetcher),
    );
    let events = loader.subscribe();

    loader.request_load("site-header").await.unwrap();
    loader.request_load("site-footer").await.unwrap();

    let received: Vec<_> = events.drain().collect();
    assert_eq!(
        received,
        vec![
            LoaderEvent::ComponentLoaded {
                name: "site-header".to_string()
            },
            LoaderEvent::ComponentLoaded {
                name: "site-footer".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn status_tracks_the_state_scan() {
    let (fetcher, gate) = CountingFetcher::new(false);
    let loader = loader_over(
        registry(&[
            ("site-header", "site-header.js", PriorityTier::High),
            ("author-bio", "author-bio.js", PriorityTier::Medium),
            ("back-to-top", "back-to-top.js", PriorityTier::Low),
        ]),
        Arc::clone(&fetcher),
    );

    let pending = {
        let loader = loader.clone();
        tokio::spawn(async move { loader.request_load("site-header").await })
    };
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }

    let mid = loader.status();
    assert_eq!(mid.total, 3);
    assert_eq!(mid.loaded, 0);
    assert_eq!(mid.in_flight, 1);
    assert_eq!(mid.remaining, 2);
    assert_eq!(mid.percentage, 0);

    gate.send(true).unwrap();
    pending.await.unwrap().unwrap();

    let done = loader.status();
    assert_eq!(done.loaded, 1);
    assert_eq!(done.in_flight, 0);
    assert_eq!(done.remaining, 2);
    assert_eq!(done.percentage, 33);
}
