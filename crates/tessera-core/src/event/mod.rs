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

//! Outbound notifications published by the loader core.

mod hub;

pub use hub::NotificationHub;

/// A notification published by the loader core to its subscribers.
///
/// Delivery is best-effort and fire-and-forget; ordering matches completion
/// order, which is unspecified across different names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderEvent {
    /// A component's resource was successfully acquired and inserted.
    ComponentLoaded {
        /// The registered name that finished loading.
        name: String,
    },
}
