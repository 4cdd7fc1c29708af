//! Typed publish/subscribe between visual subsystems that hold no references to each
//! other. Delivery is synchronous, same-thread, best-effort: no queueing and no replay
//! for late subscribers.

pub mod channels;

use std::{
    any::{Any, TypeId},
    cell::RefCell,
    collections::HashMap,
    fmt,
    marker::PhantomData,
    rc::{Rc, Weak},
};

/// A named channel carrying payloads of type `T`.
pub struct Channel<T> {
    name: &'static str,
    _payload: PhantomData<fn(&T)>,
}

impl<T> Channel<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _payload: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Channel<T> {}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Channel").field(&self.name).finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

type Handler = Rc<dyn Fn(&dyn Any)>;

struct Entry {
    id: SubscriptionId,
    handler: Handler,
}

struct ChannelSlot {
    payload: TypeId,
    entries: Vec<Entry>,
}

#[derive(Default)]
struct BusState {
    next_id: u64,
    channels: HashMap<&'static str, ChannelSlot>,
    owners: HashMap<SubscriptionId, &'static str>,
}

/// Single-threaded event bus. Share it as `Rc<EventBus>`.
#[derive(Default)]
pub struct EventBus {
    state: RefCell<BusState>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` on `channel`.
    ///
    /// Returns `None` when the channel name is already bound to a different payload type.
    pub fn subscribe<T: 'static>(
        &self,
        channel: Channel<T>,
        handler: impl Fn(&T) + 'static,
    ) -> Option<SubscriptionId> {
        let mut st = self.state.borrow_mut();
        let slot = st
            .channels
            .entry(channel.name)
            .or_insert_with(|| ChannelSlot {
                payload: TypeId::of::<T>(),
                entries: Vec::new(),
            });
        if slot.payload != TypeId::of::<T>() {
            tracing::warn!(
                channel = channel.name,
                "subscribe rejected: channel is bound to another payload type"
            );
            return None;
        }

        let erased: Handler = Rc::new(move |payload: &dyn Any| {
            if let Some(p) = payload.downcast_ref::<T>() {
                handler(p);
            }
        });

        st.next_id += 1;
        let id = SubscriptionId(st.next_id);
        if let Some(slot) = st.channels.get_mut(channel.name) {
            slot.entries.push(Entry {
                id,
                handler: erased,
            });
        }
        st.owners.insert(id, channel.name);
        Some(id)
    }

    /// Like [`EventBus::subscribe`] but unsubscribes when the returned guard drops.
    pub fn subscribe_guarded<T: 'static>(
        self: &Rc<Self>,
        channel: Channel<T>,
        handler: impl Fn(&T) + 'static,
    ) -> Option<Subscription> {
        let id = self.subscribe(channel, handler)?;
        Some(Subscription {
            bus: Rc::downgrade(self),
            id: Some(id),
        })
    }

    /// Remove a subscription. Unknown or already-removed ids are a no-op returning `false`.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut st = self.state.borrow_mut();
        let Some(name) = st.owners.remove(&id) else {
            return false;
        };
        if let Some(slot) = st.channels.get_mut(name) {
            slot.entries.retain(|e| e.id != id);
        }
        true
    }

    /// Deliver `payload` to every current subscriber; returns the number of handlers run.
    ///
    /// Handlers run against a snapshot, so they may subscribe or unsubscribe freely.
    pub fn publish<T: 'static>(&self, channel: Channel<T>, payload: &T) -> usize {
        let snapshot: Vec<(SubscriptionId, Handler)> = {
            let st = self.state.borrow();
            let Some(slot) = st.channels.get(channel.name) else {
                return 0;
            };
            if slot.payload != TypeId::of::<T>() {
                tracing::warn!(
                    channel = channel.name,
                    "publish dropped: channel is bound to another payload type"
                );
                return 0;
            }
            slot.entries
                .iter()
                .map(|e| (e.id, Rc::clone(&e.handler)))
                .collect()
        };

        let mut delivered = 0usize;
        for (id, handler) in snapshot {
            // Skip handlers removed by an earlier handler in this same delivery.
            if !self.state.borrow().owners.contains_key(&id) {
                continue;
            }
            handler(payload);
            delivered += 1;
        }
        delivered
    }

    pub fn subscriber_count<T>(&self, channel: Channel<T>) -> usize {
        self.state
            .borrow()
            .channels
            .get(channel.name)
            .map(|slot| slot.entries.len())
            .unwrap_or(0)
    }

    pub fn total_subscribers(&self) -> usize {
        self.state.borrow().owners.len()
    }
}

/// RAII subscription; unsubscribes on drop. `cancel` is idempotent.
pub struct Subscription {
    bus: Weak<EventBus>,
    id: Option<SubscriptionId>,
}

impl Subscription {
    pub fn id(&self) -> Option<SubscriptionId> {
        self.id
    }

    pub fn cancel(&mut self) {
        if let (Some(id), Some(bus)) = (self.id.take(), self.bus.upgrade()) {
            bus.unsubscribe(id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bus/bus.rs"]
mod tests;
