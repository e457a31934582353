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

//! Environment classification: deciding between eager and selective delivery.
//!
//! The classifier is a pure predicate over ambient signals captured once at
//! bootstrap. Non-interactive agents (crawlers, preview fetchers, headless
//! audits) will not wait for deferred work, so they must receive every
//! component immediately; the same applies to visits arriving through search
//! or social channels, where fully-assembled content matters most.
//!
//! The heuristic is deliberately biased toward eager delivery: a false
//! positive (a human classified as a bot) only costs extra bandwidth, while a
//! false negative costs discoverability.

/// Ambient signals read once at bootstrap and never polled again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSignals {
    /// The reported client identity string.
    pub user_agent: String,
    /// The referring page's address, empty when there is none.
    pub referrer: String,
    /// Explicit automation flag exposed by the runtime (e.g. webdriver).
    pub automation_flag: bool,
}

/// Runtime capabilities the interactive strategy depends on.
///
/// Supplied at construction as a plain value object so classification and
/// fallback logic stay pure and testable without a real execution
/// environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeCapabilities {
    /// Animation-frame scheduling is available.
    pub animation_frame: bool,
    /// Viewport-intersection observation is available.
    pub intersection_observer: bool,
    /// Idle-time scheduling is available.
    pub idle_scheduling: bool,
}

impl RuntimeCapabilities {
    /// Capabilities of a fully-featured interactive runtime.
    pub fn interactive() -> Self {
        Self {
            animation_frame: true,
            intersection_observer: true,
            idle_scheduling: true,
        }
    }

    /// Capabilities of a bare runtime offering none of the mechanisms.
    pub fn headless() -> Self {
        Self {
            animation_frame: false,
            intersection_observer: false,
            idle_scheduling: false,
        }
    }
}

/// The delivery strategy selected at bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStrategy {
    /// Request every registered component immediately, in registry order.
    Eager,
    /// Request critical components immediately and defer the rest to
    /// viewport proximity.
    Selective,
}

/// Client-identity substrings that mark known automated agents.
///
/// Matched case-insensitively. The generic tokens at the end intentionally
/// overmatch ("bot" also catches agents we have never heard of).
const AUTOMATED_AGENT_TOKENS: &[&str] = &[
    "googlebot",
    "bingbot",
    "slurp",
    "duckduckbot",
    "baiduspider",
    "yandexbot",
    "facebookexternalhit",
    "twitterbot",
    "linkedinbot",
    "whatsapp",
    "telegrambot",
    "applebot",
    "discordbot",
    "skypeuri",
    "crawler",
    "spider",
    "bot",
    "scraper",
    "archive",
    "lighthouse",
];

/// Referrer substrings marking search or social-sharing origins.
const REFERRAL_DOMAIN_TOKENS: &[&str] = &["google", "bing", "facebook", "twitter", "linkedin"];

/// Returns `true` when the client identity string matches a known automated
/// agent, a required interactive capability is missing, or the runtime's
/// automation flag is set.
pub fn is_automated_agent(signals: &EnvironmentSignals, capabilities: &RuntimeCapabilities) -> bool {
    let user_agent = signals.user_agent.to_lowercase();

    AUTOMATED_AGENT_TOKENS
        .iter()
        .any(|token| user_agent.contains(token))
        || !capabilities.animation_frame
        || !capabilities.intersection_observer
        || signals.automation_flag
}

/// Classifies the visit, choosing the delivery strategy for the session.
///
/// Evaluated exactly once at bootstrap; the result is never re-derived
/// mid-session.
pub fn classify(
    signals: &EnvironmentSignals,
    capabilities: &RuntimeCapabilities,
) -> DeliveryStrategy {
    if is_automated_agent(signals, capabilities) {
        log::info!("automated agent or degraded runtime detected; forcing eager delivery");
        return DeliveryStrategy::Eager;
    }

    let referrer = signals.referrer.to_lowercase();
    if REFERRAL_DOMAIN_TOKENS
        .iter()
        .any(|token| referrer.contains(token))
    {
        log::info!("search/social referral detected; forcing eager delivery");
        return DeliveryStrategy::Eager;
    }

    DeliveryStrategy::Selective
}

#[cfg(test)]
mod tests {
    use super::*;

    fn human() -> EnvironmentSignals {
        EnvironmentSignals {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/142.0".to_string(),
            referrer: String::new(),
            automation_flag: false,
        }
    }

    #[test]
    fn plain_browser_gets_selective_delivery() {
        assert_eq!(
            classify(&human(), &RuntimeCapabilities::interactive()),
            DeliveryStrategy::Selective
        );
    }

    #[test]
    fn crawler_user_agent_forces_eager() {
        let signals = EnvironmentSignals {
            user_agent: "Mozilla/5.0 (compatible; Googlebot/2.1)".to_string(),
            ..human()
        };
        assert_eq!(
            classify(&signals, &RuntimeCapabilities::interactive()),
            DeliveryStrategy::Eager
        );
    }

    #[test]
    fn generic_bot_token_matches_case_insensitively() {
        let signals = EnvironmentSignals {
            user_agent: "SomeNewThing-BOT/0.1".to_string(),
            ..human()
        };
        assert!(is_automated_agent(
            &signals,
            &RuntimeCapabilities::interactive()
        ));
    }

    #[test]
    fn missing_intersection_observer_forces_eager() {
        let capabilities = RuntimeCapabilities {
            intersection_observer: false,
            ..RuntimeCapabilities::interactive()
        };
        assert_eq!(classify(&human(), &capabilities), DeliveryStrategy::Eager);
    }

    #[test]
    fn missing_animation_frame_forces_eager() {
        let capabilities = RuntimeCapabilities {
            animation_frame: false,
            ..RuntimeCapabilities::interactive()
        };
        assert_eq!(classify(&human(), &capabilities), DeliveryStrategy::Eager);
    }

    #[test]
    fn automation_flag_forces_eager() {
        let signals = EnvironmentSignals {
            automation_flag: true,
            ..human()
        };
        assert_eq!(
            classify(&signals, &RuntimeCapabilities::interactive()),
            DeliveryStrategy::Eager
        );
    }

    #[test]
    fn search_referral_forces_eager() {
        let signals = EnvironmentSignals {
            referrer: "https://www.google.com/search?q=tessera".to_string(),
            ..human()
        };
        assert_eq!(
            classify(&signals, &RuntimeCapabilities::interactive()),
            DeliveryStrategy::Eager
        );
    }

    #[test]
    fn unrelated_referrer_stays_selective() {
        let signals = EnvironmentSignals {
            referrer: "https://example.com/blogroll".to_string(),
            ..human()
        };
        assert_eq!(
            classify(&signals, &RuntimeCapabilities::interactive()),
            DeliveryStrategy::Selective
        );
    }
}
