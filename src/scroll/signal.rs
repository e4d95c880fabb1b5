use crate::foundation::core::Progress;

/// Handle returned by [`ProgressSignal::subscribe`], used to unregister.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(Progress)>;

/// Typed publish/subscribe cell holding the latest progress value.
///
/// Producers call [`ProgressSignal::set`]; every change is pushed synchronously to all listeners
/// in subscription order. Setting the current value again is not a change.
pub struct ProgressSignal {
    value: Progress,
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Default for ProgressSignal {
    fn default() -> Self {
        Self::new(Progress::START)
    }
}

impl std::fmt::Debug for ProgressSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressSignal")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ProgressSignal {
    pub fn new(initial: Progress) -> Self {
        Self {
            value: initial,
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Latest published value.
    pub fn get(&self) -> Progress {
        self.value
    }

    /// Register `listener`; it is not called with the current value.
    pub fn subscribe(&mut self, listener: impl FnMut(Progress) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Publish `p`. Returns `true` when listeners were notified.
    pub fn set(&mut self, p: Progress) -> bool {
        if p == self.value {
            return false;
        }
        self.value = p;
        for (_, listener) in &mut self.listeners {
            listener(p);
        }
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/signal.rs"]
mod tests;
