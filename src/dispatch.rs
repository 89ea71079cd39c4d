use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::model::AppEvent;

/// Single-consumer queue between background threads and the UI thread.
///
/// Producers get cloned [`Sender`]s; the UI thread drains on a fixed tick
/// and handles events strictly in arrival order.
pub struct Dispatcher {
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<AppEvent> {
        self.tx.clone()
    }

    pub fn post(&self, event: AppEvent) {
        // The receiver lives as long as self, so this cannot fail.
        let _ = self.tx.send(event);
    }

    /// Everything queued so far, oldest first. Never blocks.
    pub fn drain(&self) -> Vec<AppEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if !events.is_empty() {
            log::debug!("Dispatching {} event(s)", events.len());
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MenuAction;
    use std::thread;

    #[test]
    fn drain_preserves_order_and_empties_queue() {
        let dispatcher = Dispatcher::new();
        dispatcher.post(AppEvent::OpenInterface);
        dispatcher.post(AppEvent::MenuAction(MenuAction::Reload));
        dispatcher.post(AppEvent::SettingsFileChanged);

        assert_eq!(
            dispatcher.drain(),
            vec![
                AppEvent::OpenInterface,
                AppEvent::MenuAction(MenuAction::Reload),
                AppEvent::SettingsFileChanged,
            ]
        );
        assert!(dispatcher.drain().is_empty());
    }

    #[test]
    fn events_from_background_threads_are_serialized() {
        let dispatcher = Dispatcher::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let tx = dispatcher.sender();
                thread::spawn(move || {
                    for _ in 0..25 {
                        tx.send(AppEvent::OpenInterface).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let events = dispatcher.drain();
        assert_eq!(events.len(), 100);
        assert!(events.iter().all(|e| *e == AppEvent::OpenInterface));
    }
}
