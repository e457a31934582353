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

//! # Tessera Core
//!
//! Foundational crate containing the types and contracts shared by the
//! tessera component-loading orchestrator: component descriptors and the
//! per-component load state machine, environment classification, the
//! notification hub, and the error hierarchy.

#![warn(missing_docs)]

pub mod component;
pub mod environment;
pub mod error;
pub mod event;

pub use component::{ComponentDescriptor, LoadState, PriorityTier};
pub use environment::{DeliveryStrategy, EnvironmentSignals, RuntimeCapabilities};
pub use error::LoadError;
