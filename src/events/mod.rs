//! # Events Module
//!
//! Progress reporting for the fingerprinting pipeline.
//!
//! The pipeline emits events through a channel so any front end (CLI
//! progress bar, GUI, plain logs) can subscribe without the pipeline
//! knowing who is listening. Reporting is observational only - dropping
//! the receiver silently discards events and never stalls a worker.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Hash(HashEvent::Progress(p)) = event {
//!             println!("[{}/{}] {}", p.completed, p.total, p.file);
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod types;

pub use types::*;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

/// Sends pipeline events.
///
/// A thin wrapper around a crossbeam sender; clone it freely across
/// threads.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event.
    ///
    /// If the receiver has been dropped the event is discarded, so
    /// progress reporting stays optional.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Receives pipeline events.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event, or `None` once all senders are gone.
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Receive without blocking.
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Iterate until every sender is dropped.
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Factory for event channel endpoints.
pub struct EventChannel;

impl EventChannel {
    /// An unbounded event channel. Events are small; this is the default.
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }

    /// A bounded event channel, for subscribers that want backpressure.
    pub fn bounded(capacity: usize) -> (EventSender, EventReceiver) {
        let (sender, receiver) = bounded(capacity);
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// An event sender with no subscriber, for tests and headless runs.
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn events_cross_threads() {
        let (sender, receiver) = EventChannel::new();

        let handle = thread::spawn(move || {
            sender.send(Event::Hash(HashEvent::Progress(HashProgress {
                completed: 3,
                total: 12,
                file: "photo.jpg".to_string(),
            })));
        });
        handle.join().unwrap();

        match receiver.recv().unwrap() {
            Event::Hash(HashEvent::Progress(p)) => {
                assert_eq!(p.completed, 3);
                assert_eq!(p.total, 12);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn null_sender_discards_without_panicking() {
        let sender = null_sender();
        sender.send(Event::Pipeline(PipelineEvent::Started));
    }

    #[test]
    fn bounded_channel_respects_capacity() {
        let (sender, receiver) = EventChannel::bounded(2);

        sender.send(Event::Pipeline(PipelineEvent::Started));
        sender.send(Event::Pipeline(PipelineEvent::Started));

        assert!(receiver.try_recv().is_some());
        assert!(receiver.try_recv().is_some());
        assert!(receiver.try_recv().is_none());
    }
}
