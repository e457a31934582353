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

//! # Tessera Loader
//!
//! The adaptive component-loading orchestrator. One [`Orchestrator`] instance
//! is constructed per page session; it classifies the visiting environment
//! once and then drives either eager or selective delivery of every
//! registered component, with at-most-once acquisition per name and per
//! resource locator.
//!
//! ```no_run
//! use std::sync::Arc;
//! use tessera_core::{EnvironmentSignals, RuntimeCapabilities};
//! use tessera_loader::{ComponentRegistry, Orchestrator};
//! # use std::error::Error;
//! # struct Page;
//! # impl tessera_loader::PageSurface for Page {
//! #     fn elements_of(&self, _: &str) -> Vec<tessera_loader::ElementId> { Vec::new() }
//! # }
//! # struct Fetcher;
//! # #[async_trait::async_trait]
//! # impl tessera_loader::ResourceFetcher for Fetcher {
//! #     async fn fetch(&self, _: &str) -> Result<(), Box<dyn Error + Send + Sync>> { Ok(()) }
//! # }
//!
//! # async fn run() {
//! let registry = Arc::new(ComponentRegistry::builtin());
//! let signals = EnvironmentSignals::default();
//! let capabilities = RuntimeCapabilities::interactive();
//!
//! let orchestrator = Orchestrator::new(
//!     registry,
//!     &signals,
//!     capabilities,
//!     Arc::new(Fetcher),
//!     Arc::new(Page),
//! );
//! orchestrator.bootstrap().await;
//! # }
//! ```

#![warn(missing_docs)]

pub mod bootstrap;
pub mod loader;
pub mod page;
pub mod registry;
pub mod watcher;

pub use bootstrap::Orchestrator;
pub use loader::{ComponentLoader, LoadStatus};
pub use page::{ElementId, PageSurface, ResourceFetcher};
pub use registry::{CatalogError, ComponentRegistry};
pub use watcher::{IntersectionEvent, VisibilityWatcher};
