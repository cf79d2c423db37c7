//! Replay-latest publish/subscribe value holder.
//!
//! An [`Observable`] keeps one current value and a list of subscriber
//! handlers. `set` stores the value and then calls every handler
//! synchronously, in subscription order, before returning. New subscribers
//! receive the current value immediately.
//!
//! Handlers run without the state lock held, so a handler may call `set`
//! on the same holder. The nested `set` performs its own full notification
//! pass over the current subscriber list; the interrupted outer pass then
//! stops instead of delivering the value it has been superseded by.
//!
//! Notification passes of one holder never overlap across threads: a pass
//! holds a reentrant publish lock from the store until the last delivery,
//! so subscribers always end on the value `get` returns.

use parking_lot::{Mutex, ReentrantMutex};
use std::fmt;
use std::sync::{Arc, Weak};

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: T,
    /// Bumped on every `set`; a notification pass aborts once it goes stale
    version: u64,
    next_id: u64,
    subscribers: Vec<(u64, Handler<T>)>,
}

impl<T> Inner<T> {
    fn is_subscribed(&self, id: u64) -> bool {
        self.subscribers.iter().any(|(existing, _)| *existing == id)
    }
}

struct Shared<T> {
    state: Mutex<Inner<T>>,
    /// Held for a whole notification pass; reentrant for handlers on the same thread
    publish: ReentrantMutex<()>,
}

/// Value holder with synchronous, ordered change notification
pub struct Observable<T> {
    inner: Arc<Shared<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Shared {
                state: Mutex::new(Inner {
                    value: initial,
                    version: 0,
                    next_id: 0,
                    subscribers: Vec::new(),
                }),
                publish: ReentrantMutex::new(()),
            }),
        }
    }

    /// Returns a clone of the current value
    pub fn get(&self) -> T {
        self.inner.state.lock().value.clone()
    }

    /// Stores `value` and notifies every subscriber before returning.
    pub fn set(&self, value: T) {
        let _pass = self.inner.publish.lock();
        let (version, value, handlers) = {
            let mut inner = self.inner.state.lock();
            inner.value = value;
            inner.version = inner.version.wrapping_add(1);
            (inner.version, inner.value.clone(), inner.subscribers.clone())
        };

        for (id, handler) in handlers {
            {
                let inner = self.inner.state.lock();
                if inner.version != version {
                    // A handler re-entered `set`; its pass already delivered the newer value.
                    return;
                }
                if !inner.is_subscribed(id) {
                    continue;
                }
            }
            handler(&value);
        }
    }

    /// Registers `handler` and immediately replays the current value to it.
    ///
    /// The handler stays registered until [`Subscription::unsubscribe`] is
    /// called; dropping the returned value does not detach it.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let handler: Handler<T> = Arc::new(handler);
        let _pass = self.inner.publish.lock();
        let (id, current) = {
            let mut inner = self.inner.state.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Arc::clone(&handler)));
            (id, inner.value.clone())
        };

        handler(&current);

        let weak: Weak<Shared<T>> = Arc::downgrade(&self.inner);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    let _pass = inner.publish.lock();
                    inner
                        .state
                        .lock()
                        .subscribers
                        .retain(|(existing, _)| *existing != id);
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.state.lock().subscribers.len()
    }
}

impl<T> Default for Observable<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.state.lock();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

/// Handle returned by [`Observable::subscribe`]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Detaches the handler. No delivery reaches it after this returns,
    /// including from a notification pass already in progress.
    pub fn unsubscribe(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}
