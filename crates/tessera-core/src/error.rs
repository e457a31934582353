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

//! Error types surfaced by the loader core.
//!
//! Failures are always local to one component name: a failed acquisition
//! never blocks unrelated names or the bootstrap sequence, and the page-side
//! effect of a failure is simply that the unit keeps its static fallback
//! markup.

use std::fmt;

/// An error delivered through a `request_load` outcome.
///
/// The error is `Clone` because every caller joined to the same in-flight
/// acquisition observes the same outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The requested name is not in the registry. Caller error; fails
    /// immediately and records no state.
    UnknownComponent {
        /// The name that was requested.
        name: String,
    },
    /// The acquisition cycle for a registered name failed.
    AcquisitionFailed {
        /// The component whose acquisition failed.
        name: String,
        /// The locator that was being acquired.
        resource_locator: String,
        /// Description of the underlying fetch or insertion failure.
        cause: String,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::UnknownComponent { name } => {
                write!(f, "Unknown component: '{name}'")
            }
            LoadError::AcquisitionFailed {
                name,
                resource_locator,
                cause,
            } => {
                write!(
                    f,
                    "Failed to acquire '{resource_locator}' for component '{name}': {cause}"
                )
            }
        }
    }
}

impl std::error::Error for LoadError {}
