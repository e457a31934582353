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

/// Aggregate load progress derived from the per-name states.
///
/// Computed by a single scan over the loader's records; pure and
/// non-blocking. Used by progress-indicator collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStatus {
    /// Number of registered components.
    pub total: usize,
    /// Components in the `Loaded` state.
    pub loaded: usize,
    /// Components with an acquisition in flight.
    pub in_flight: usize,
    /// Components neither loaded nor in flight.
    pub remaining: usize,
    /// `round(100 * loaded / total)`; 0 when the registry is empty.
    pub percentage: u8,
}

impl LoadStatus {
    /// Derives the aggregate from the three scanned counts.
    pub(crate) fn derive(total: usize, loaded: usize, in_flight: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            ((loaded as f64 / total as f64) * 100.0).round() as u8
        };
        Self {
            total,
            loaded,
            in_flight,
            remaining: total.saturating_sub(loaded + in_flight),
            percentage,
        }
    }
}
