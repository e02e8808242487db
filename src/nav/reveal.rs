//! # Section-Revealed Broadcast
//!
//! The only coupling between the navigator and decorative collaborators
//! (animations, video, counters). Each subscriber is told which section was
//! just revealed and decides for itself whether to start or stop.
//!
//! A panicking subscriber is logged and skipped. Collaborator failures never
//! reach navigation.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use serde::Serialize;

use crate::core::intent::Direction;

/// Payload of the `section-revealed` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionRevealed {
    pub index: usize,
    pub direction: Direction,
}

type Handler = Box<dyn Fn(&SectionRevealed) + Send + Sync>;

#[derive(Default)]
pub struct RevealBus {
    handlers: Mutex<Vec<Handler>>,
}

impl RevealBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&SectionRevealed) + Send + Sync + 'static,
    {
        self.lock().push(Box::new(handler));
    }

    pub fn broadcast(&self, event: SectionRevealed) {
        debug!(
            "section-revealed {}",
            serde_json::to_string(&event).unwrap_or_default()
        );
        for (i, handler) in self.lock().iter().enumerate() {
            if catch_unwind(AssertUnwindSafe(|| handler(&event))).is_err() {
                warn!("section-revealed subscriber {} panicked; ignoring", i);
            }
        }
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Handler>> {
        self.handlers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_payload_json_shape() {
        let event = SectionRevealed {
            index: 1,
            direction: Direction::Forward,
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"index":1,"direction":"forward"}"#
        );
    }

    #[test]
    fn test_all_subscribers_notified() {
        let bus = RevealBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for _ in 0..2 {
            let seen = seen.clone();
            bus.subscribe(move |e| seen.lock().unwrap().push(e.index));
        }
        bus.broadcast(SectionRevealed {
            index: 2,
            direction: Direction::Backward,
        });
        assert_eq!(*seen.lock().unwrap(), vec![2, 2]);
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn test_panicking_subscriber_does_not_stop_others() {
        let bus = RevealBus::new();
        let calls = Arc::new(AtomicUsize::new(0));
        bus.subscribe(|_| panic!("canvas missing"));
        let counter = calls.clone();
        bus.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        bus.broadcast(SectionRevealed {
            index: 0,
            direction: Direction::Forward,
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
