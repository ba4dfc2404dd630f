use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

/// Dispatch flags shared by every handler of a single notification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventData {
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
    default_prevented: bool,
}

impl EventData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops dispatch to the remaining handlers and tells the caller not to bubble further.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Stops dispatch to the remaining handlers and suppresses the grid's built-in handling.
    pub fn stop_immediate_propagation(&mut self) {
        self.immediate_propagation_stopped = true;
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    fn is_stopped(&self) -> bool {
        self.propagation_stopped || self.immediate_propagation_stopped
    }
}

/// Identifies one subscription. Unique for the lifetime of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        Self(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed))
    }
}

pub type Handler<A> = Box<dyn FnMut(&mut EventData, &A)>;

/// An ordered observer list.
///
/// Handlers run synchronously in subscription order. Dispatch stops as soon as a handler sets
/// either stop flag on the shared [`EventData`].
pub struct Event<A> {
    handlers: Vec<(SubscriptionId, Handler<A>)>,
}

impl<A> Event<A> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&mut EventData, &A) + 'static) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Removes a handler. Returns `false` when `id` was not subscribed to this event.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sid, _)| *sid != id);
        self.handlers.len() != before
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Notifies every handler with fresh dispatch flags and returns them.
    pub fn notify(&mut self, args: &A) -> EventData {
        let mut e = EventData::new();
        self.notify_with(&mut e, args);
        e
    }

    /// Notifies handlers with caller-owned dispatch flags.
    ///
    /// If `e` is already stopped, no handler runs.
    pub fn notify_with(&mut self, e: &mut EventData, args: &A) {
        for (_, handler) in self.handlers.iter_mut() {
            if e.is_stopped() {
                break;
            }
            handler(e, args);
        }
    }
}

impl<A> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> core::fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Event")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// A bag of subscriptions owned by one consumer, typically a plugin.
///
/// Pass it to [`crate::GridEvents::unsubscribe_all`] to drop every handler it recorded.
#[derive(Clone, Debug, Default)]
pub struct Subscriptions {
    ids: Vec<SubscriptionId>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: SubscriptionId) -> &mut Self {
        self.ids.push(id);
        self
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub(crate) fn take(&mut self) -> Vec<SubscriptionId> {
        core::mem::take(&mut self.ids)
    }
}
