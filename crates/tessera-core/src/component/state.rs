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

use serde::{Deserialize, Serialize};

/// The per-component load state machine.
///
/// Every registered name starts at `Unrequested` (established lazily on the
/// first request or observation) and moves forward monotonically:
///
/// ```text
/// Unrequested -> Loading -> Loaded              (terminal)
///                        -> Failed -> Loading   (re-opened by a later request)
/// ```
///
/// `Loaded` is terminal for the page session. `Failed` is terminal until the
/// next explicit request for the name, which re-opens the record and performs
/// a fresh acquisition cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoadState {
    /// No acquisition has been requested for this name yet.
    #[default]
    Unrequested,
    /// Exactly one acquisition is in flight; further requests join it.
    Loading,
    /// The component's resource is in the page. Terminal for the session.
    Loaded,
    /// The last acquisition cycle failed. Re-opened by the next request.
    Failed,
}

impl LoadState {
    /// Returns `true` for the states that settle an acquisition cycle.
    pub fn is_settled(self) -> bool {
        matches!(self, LoadState::Loaded | LoadState::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_unrequested() {
        assert_eq!(LoadState::default(), LoadState::Unrequested);
    }

    #[test]
    fn only_terminal_states_are_settled() {
        assert!(!LoadState::Unrequested.is_settled());
        assert!(!LoadState::Loading.is_settled());
        assert!(LoadState::Loaded.is_settled());
        assert!(LoadState::Failed.is_settled());
    }
}
