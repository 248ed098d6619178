//! Bounded scheduler-to-worker dispatch channel.
//!
//! Single producer, single consumer, FIFO. The producer blocks while the
//! buffer is full and the consumer blocks while it is empty and still open.
//! Dropping the sender closes the channel; the consumer then drains whatever
//! is buffered and sees end-of-input.

use crossbeam_channel::{Receiver, SendError, Sender};

use super::Event;

/// Creates a connected sender/receiver pair with the given buffer capacity.
pub fn bounded(capacity: usize) -> (EventSender, EventReceiver) {
    let (tx, rx) = crossbeam_channel::bounded(capacity);
    (EventSender { inner: tx }, EventReceiver { inner: rx })
}

/// Producer endpoint held by the scheduler.
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Enqueues one event, blocking while the buffer is full.
    ///
    /// Fails only when the receiving worker is gone, which cannot happen
    /// while a run is in progress.
    pub fn send(&self, event: Event) -> Result<(), SendError<Event>> {
        self.inner.send(event)
    }
}

/// Consumer endpoint owned by exactly one worker.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Blocking receive. Returns `None` once the channel is closed and every
    /// buffered event has been consumed.
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Number of events currently buffered.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn preserves_fifo_order() {
        let (tx, rx) = bounded(4);
        for id in 0..4 {
            tx.send(Event::external(id, id + 1, 0)).unwrap();
        }
        for id in 0..4 {
            assert_eq!(rx.recv().unwrap().id, id);
        }
    }

    #[test]
    fn drains_buffered_events_after_close() {
        let (tx, rx) = bounded(8);
        tx.send(Event::external(0, 1, 0)).unwrap();
        tx.send(Event::external(1, 2, 0)).unwrap();
        drop(tx);
        assert_eq!(rx.recv().unwrap().id, 0);
        assert_eq!(rx.recv().unwrap().id, 1);
        assert!(rx.recv().is_none());
    }

    #[test]
    fn full_buffer_blocks_until_consumed() {
        let (tx, rx) = bounded(1);
        tx.send(Event::external(0, 1, 0)).unwrap();
        let producer = thread::spawn(move || {
            // Blocks until the consumer below makes room.
            tx.send(Event::external(1, 2, 0)).unwrap();
        });
        assert_eq!(rx.recv().unwrap().id, 0);
        producer.join().unwrap();
        assert_eq!(rx.recv().unwrap().id, 1);
    }
}
