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

use std::sync::Mutex;

/// A fan-out notification hub with an explicit subscriber list.
///
/// The hub is generic over the event type `T` so this crate stays decoupled
/// from the concrete events defined alongside it. Each subscriber receives
/// its own unbounded flume channel; publishing clones the event into every
/// live channel and silently drops subscribers whose receiving end has been
/// disconnected. Publishing never blocks.
#[derive(Debug)]
pub struct NotificationHub<T: Clone + Send + 'static> {
    subscribers: Mutex<Vec<flume::Sender<T>>>,
}

impl<T: Clone + Send + 'static> NotificationHub<T> {
    /// Creates a hub with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Registers a new subscriber and returns its receiving end.
    ///
    /// Dropping the receiver unsubscribes: the hub prunes the dead sender on
    /// the next publish.
    pub fn subscribe(&self) -> flume::Receiver<T> {
        let (sender, receiver) = flume::unbounded();
        self.subscribers.lock().unwrap().push(sender);
        log::trace!("notification subscriber added");
        receiver
    }

    /// Publishes an event to every live subscriber, best effort.
    pub fn publish(&self, event: T) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());
    }

    /// Returns the number of subscribers seen at the last publish or
    /// subscribe. Disconnected subscribers linger until the next publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }
}

impl<T: Clone + Send + 'static> Default for NotificationHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flume::TryRecvError;

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        UnitReady { name: String },
    }

    fn ready(name: &str) -> TestEvent {
        TestEvent::UnitReady {
            name: name.to_string(),
        }
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let hub = NotificationHub::new();
        hub.publish(ready("site-header"));
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn every_subscriber_sees_every_event() {
        let hub = NotificationHub::new();
        let first = hub.subscribe();
        let second = hub.subscribe();

        hub.publish(ready("site-header"));
        hub.publish(ready("site-footer"));

        for receiver in [&first, &second] {
            assert_eq!(receiver.try_recv(), Ok(ready("site-header")));
            assert_eq!(receiver.try_recv(), Ok(ready("site-footer")));
            assert_eq!(receiver.try_recv(), Err(TryRecvError::Empty));
        }
    }

    #[test]
    fn dropped_subscriber_is_pruned_on_publish() {
        let hub = NotificationHub::new();
        let keeper = hub.subscribe();
        let goner = hub.subscribe();
        drop(goner);

        hub.publish(ready("author-bio"));

        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(keeper.try_recv(), Ok(ready("author-bio")));
    }
}
