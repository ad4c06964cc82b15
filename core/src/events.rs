use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::GameStatus;

/// Notification sent to subscribers after the engine state changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A fresh board replaced the previous game.
    Reset,
    StatusChanged { from: GameStatus, to: GameStatus },
    /// One or more cells were revealed or (un)flagged.
    CellsChanged,
    /// Elapsed whole seconds went up.
    Tick(u32),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&GameEvent)>;

/// Registry of change callbacks, invoked synchronously in subscription order.
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    observers: Vec<(SubscriptionId, Observer)>,
}

impl Observers {
    pub fn subscribe(&mut self, observer: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    pub fn notify(&mut self, event: &GameEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event);
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.observers.len())
            .finish()
    }
}
