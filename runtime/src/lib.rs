//! # Unistore Runtime
//!
//! Runtime implementation for the Unistore state container.
//!
//! This crate provides the Store that owns the application state, runs the
//! root reducer on every dispatched action and notifies subscribers.
//!
//! ## Core Components
//!
//! - **Store**: Holds the current state and coordinates dispatch and notification
//! - **Unsubscribe**: Handle returned by `subscribe`, removes exactly one subscriber
//! - **`StoreAccess`**: Narrow capability trait handed to consumers instead of an ambient store
//! - **`StoreConfig`**: Reentrancy policy and cascade limit
//!
//! ## Execution Model
//!
//! Everything is synchronous and single-threaded. `dispatch` reduces the action
//! and invokes every subscriber before it returns. The store is built on `Rc`
//! and is therefore `!Send`; hosts with several threads must funnel access
//! through one thread.
//!
//! ## Example
//!
//! ```
//! use unistore_core::{Action, reducer_fn};
//! use unistore_runtime::Store;
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Init,
//!     Increment,
//! }
//!
//! impl Action for CounterAction {
//!     fn init() -> Self {
//!         Self::Init
//!     }
//!
//!     fn kind(&self) -> &'static str {
//!         match self {
//!             Self::Init => "@@INIT",
//!             Self::Increment => "INCREMENT",
//!         }
//!     }
//! }
//!
//! let reducer = reducer_fn(0_i64, |count: &i64, action: &CounterAction| match action {
//!     CounterAction::Increment => count + 1,
//!     CounterAction::Init => *count,
//! });
//!
//! let store = Store::new(reducer);
//! let _unsubscribe = store.subscribe(|| println!("state changed"));
//!
//! store.dispatch(CounterAction::Increment)?;
//! assert_eq!(*store.state(), 1);
//! # Ok::<(), unistore_runtime::error::StoreError>(())
//! ```

use serde::{Deserialize, Serialize};

/// Metrics for store observability
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    ///
    /// Reducers never fail; these errors only come from the dispatch protocol.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// A subscriber dispatched while a dispatch was in progress and the
        /// store is configured with [`ReentrancyPolicy::Forbid`](crate::ReentrancyPolicy::Forbid).
        ///
        /// The rejected action is not applied.
        #[error("Reentrant dispatch of {action} rejected: a dispatch is already in progress")]
        ReentrantDispatch {
            /// Type tag of the rejected action
            action: &'static str,
        },

        /// Queued reentrant dispatches kept producing new actions past the
        /// configured cascade limit.
        ///
        /// Actions processed before the limit stay applied; the remaining
        /// queue is dropped.
        #[error("Cascade limit of {limit} queued actions exceeded, {dropped} actions dropped")]
        CascadeLimitExceeded {
            /// Configured limit
            limit: usize,
            /// Number of queued actions discarded
            dropped: usize,
        },
    }
}

pub use error::StoreError;

/// What the store does when `dispatch` is called during a dispatch
///
/// A dispatch is in progress from the moment the reducer runs until the last
/// subscriber of the notification pass returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReentrancyPolicy {
    /// Append the action to a FIFO queue processed after the current
    /// notification pass completes
    #[default]
    Queue,

    /// Reject the action with [`StoreError::ReentrantDispatch`]
    Forbid,
}

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use unistore_runtime::{ReentrancyPolicy, StoreConfig};
///
/// let config = StoreConfig::default()
///     .with_reentrancy(ReentrancyPolicy::Forbid)
///     .with_max_cascade(16);
///
/// assert_eq!(config.max_cascade, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Handling of dispatches issued by subscribers
    pub reentrancy: ReentrancyPolicy,
    /// Maximum number of queued actions one outermost dispatch processes
    pub max_cascade: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(reentrancy: ReentrancyPolicy, max_cascade: usize) -> Self {
        Self {
            reentrancy,
            max_cascade,
        }
    }

    /// Set the reentrancy policy
    #[must_use]
    pub const fn with_reentrancy(mut self, reentrancy: ReentrancyPolicy) -> Self {
        self.reentrancy = reentrancy;
        self
    }

    /// Set the cascade limit
    #[must_use]
    pub const fn with_max_cascade(mut self, max_cascade: usize) -> Self {
        self.max_cascade = max_cascade;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            reentrancy: ReentrancyPolicy::Queue,
            max_cascade: 1000,
        }
    }
}

/// Subscriber registry and the unsubscribe handle
pub mod subscription {
    use std::cell::{Cell, RefCell};
    use std::rc::{Rc, Weak};

    /// A registered subscriber callback
    pub(crate) type Listener = Rc<dyn Fn()>;

    /// Ordered set of subscribers, shared between a store and its handles
    #[derive(Default)]
    pub(crate) struct Listeners {
        entries: RefCell<Vec<(u64, Listener)>>,
        next_id: Cell<u64>,
    }

    impl Listeners {
        pub(crate) fn insert(&self, listener: Listener) -> u64 {
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            self.entries.borrow_mut().push((id, listener));
            id
        }

        fn remove(&self, id: u64) -> bool {
            let mut entries = self.entries.borrow_mut();
            let before = entries.len();
            entries.retain(|(entry_id, _)| *entry_id != id);
            entries.len() != before
        }

        /// Subscribers registered right now, in registration order
        pub(crate) fn snapshot(&self) -> Vec<Listener> {
            self.entries
                .borrow()
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect()
        }

        pub(crate) fn len(&self) -> usize {
            self.entries.borrow().len()
        }
    }

    /// Handle that removes one subscriber from its store
    ///
    /// Returned by [`Store::subscribe`](crate::Store::subscribe). Dropping the
    /// handle does NOT unsubscribe; call [`Unsubscribe::unsubscribe`].
    #[must_use = "dropping the handle leaves the subscriber registered"]
    pub struct Unsubscribe {
        id: u64,
        listeners: Weak<Listeners>,
        active: Cell<bool>,
    }

    impl Unsubscribe {
        pub(crate) fn new(id: u64, listeners: &Rc<Listeners>) -> Self {
            Self {
                id,
                listeners: Rc::downgrade(listeners),
                active: Cell::new(true),
            }
        }

        /// Remove the subscriber this handle was created for
        ///
        /// Idempotent: later calls, or calls after the store is gone, do nothing.
        pub fn unsubscribe(&self) {
            if !self.active.replace(false) {
                return;
            }
            if let Some(listeners) = self.listeners.upgrade() {
                let removed = listeners.remove(self.id);
                tracing::trace!(subscriber = self.id, removed, "Unsubscribed");
            }
        }

        /// Whether [`Unsubscribe::unsubscribe`] has not been called yet
        #[must_use]
        pub fn is_active(&self) -> bool {
            self.active.get()
        }
    }

    impl std::fmt::Debug for Unsubscribe {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Unsubscribe")
                .field("id", &self.id)
                .field("active", &self.active.get())
                .finish_non_exhaustive()
        }
    }
}

pub use subscription::Unsubscribe;

/// The Store module - state owner and dispatch coordinator
pub mod store {
    use super::metrics::StoreMetrics;
    use super::subscription::{Listeners, Unsubscribe};
    use super::{ReentrancyPolicy, StoreConfig, StoreError};
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::{Rc, Weak};
    use std::sync::Arc;
    use std::time::Instant;
    use unistore_core::{action::Action, reducer::Reducer};

    /// Narrow view of a store handed to consumers
    ///
    /// Action creators and view adapters take a `StoreAccess` at construction
    /// instead of reaching for a global store.
    pub trait StoreAccess {
        /// The state type
        type State;

        /// The action type
        type Action;

        /// Current state
        fn state(&self) -> Arc<Self::State>;

        /// Reduce an action and notify subscribers
        ///
        /// # Errors
        ///
        /// See [`Store::dispatch`].
        fn dispatch(&self, action: Self::Action) -> Result<(), StoreError>;

        /// Register a no-argument change callback
        fn subscribe(&self, listener: Box<dyn Fn()>) -> Unsubscribe;
    }

    struct Inner<R>
    where
        R: Reducer,
    {
        reducer: R,
        config: StoreConfig,
        state: RefCell<Arc<R::State>>,
        listeners: Rc<Listeners>,
        dispatching: Cell<bool>,
        pending: RefCell<VecDeque<R::Action>>,
    }

    /// Marks a dispatch as in progress for its lifetime.
    ///
    /// Resets the flag and clears the queue on drop, including when a
    /// subscriber panics.
    struct DispatchGuard<'a, A> {
        dispatching: &'a Cell<bool>,
        pending: &'a RefCell<VecDeque<A>>,
    }

    impl<'a, A> DispatchGuard<'a, A> {
        fn enter(dispatching: &'a Cell<bool>, pending: &'a RefCell<VecDeque<A>>) -> Self {
            dispatching.set(true);
            Self {
                dispatching,
                pending,
            }
        }
    }

    impl<A> Drop for DispatchGuard<'_, A> {
        fn drop(&mut self) {
            self.pending.borrow_mut().clear();
            self.dispatching.set(false);
        }
    }

    /// The Store - single owner of application state
    ///
    /// The Store manages:
    /// 1. State (an `Arc` replaced on every dispatch, never mutated)
    /// 2. The root reducer
    /// 3. Subscribers, notified synchronously in registration order
    ///
    /// Cloning a `Store` yields another handle to the same state.
    ///
    /// # Type Parameters
    ///
    /// - `R`: Root reducer; its action type must implement [`Action`]
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Store::new(todo_app());
    /// let unsubscribe = store.subscribe(|| println!("changed"));
    ///
    /// store.dispatch(TodoAction::ToggleTodo { id })?;
    /// unsubscribe.unsubscribe();
    /// ```
    pub struct Store<R>
    where
        R: Reducer,
    {
        inner: Rc<Inner<R>>,
    }

    impl<R> Store<R>
    where
        R: Reducer + 'static,
        R::State: 'static,
        R::Action: Action + 'static,
    {
        /// Create a store whose state is every reducer's default
        ///
        /// Dispatches the synthetic init action into an absent state.
        #[must_use]
        pub fn new(reducer: R) -> Self {
            Self::with_config(reducer, None, StoreConfig::default())
        }

        /// Create a store starting from a preloaded state
        ///
        /// The init action is still folded into `state`, so reducers see it.
        #[must_use]
        pub fn with_preloaded_state(reducer: R, state: R::State) -> Self {
            Self::with_config(reducer, Some(state), StoreConfig::default())
        }

        /// Create a store with custom configuration
        ///
        /// # Arguments
        ///
        /// - `reducer`: The root reducer
        /// - `preloaded`: Optional initial state; `None` uses the reducer defaults
        /// - `config`: Reentrancy policy and cascade limit
        #[must_use]
        pub fn with_config(reducer: R, preloaded: Option<R::State>, config: StoreConfig) -> Self {
            let init = R::Action::init();
            let state = reducer.reduce_or_init(preloaded.as_ref(), &init);
            tracing::debug!(
                preloaded = preloaded.is_some(),
                reentrancy = ?config.reentrancy,
                "Store created"
            );

            Self {
                inner: Rc::new(Inner {
                    reducer,
                    config,
                    state: RefCell::new(Arc::new(state)),
                    listeners: Rc::new(Listeners::default()),
                    dispatching: Cell::new(false),
                    pending: RefCell::new(VecDeque::new()),
                }),
            }
        }

        /// Current state
        ///
        /// Returns the shared state value; it is never mutated, so holding it
        /// across dispatches is safe.
        #[must_use]
        pub fn state(&self) -> Arc<R::State> {
            Arc::clone(&self.inner.state.borrow())
        }

        /// The store's configuration
        #[must_use]
        pub fn config(&self) -> &StoreConfig {
            &self.inner.config
        }

        /// Number of registered subscribers
        #[must_use]
        pub fn subscriber_count(&self) -> usize {
            self.inner.listeners.len()
        }

        /// Reduce an action into the state, then notify every subscriber
        ///
        /// Subscribers are invoked in registration order, from a snapshot
        /// taken when the notification pass starts: a subscriber added during
        /// the pass is first called on the next dispatch, and one removed
        /// during the pass still receives it.
        ///
        /// A dispatch issued by a subscriber is handled according to
        /// [`StoreConfig::reentrancy`]. With [`ReentrancyPolicy::Queue`] it
        /// returns `Ok(())` at once and the action is processed (reduce, then
        /// notify) by the outermost dispatch after the current pass.
        ///
        /// # Errors
        ///
        /// - [`StoreError::ReentrantDispatch`]: called during a dispatch under
        ///   [`ReentrancyPolicy::Forbid`]
        /// - [`StoreError::CascadeLimitExceeded`]: queued actions exceeded
        ///   [`StoreConfig::max_cascade`]
        #[tracing::instrument(skip(self, action), fields(action_kind = action.kind()), name = "store_dispatch")]
        pub fn dispatch(&self, action: R::Action) -> Result<(), StoreError> {
            let inner = &self.inner;

            if inner.dispatching.get() {
                return match inner.config.reentrancy {
                    ReentrancyPolicy::Queue => {
                        tracing::trace!("Dispatch in progress, queueing action");
                        StoreMetrics::record_queued();
                        inner.pending.borrow_mut().push_back(action);
                        Ok(())
                    },
                    ReentrancyPolicy::Forbid => {
                        tracing::warn!("Rejected reentrant dispatch");
                        StoreMetrics::record_rejected("reentrant");
                        Err(StoreError::ReentrantDispatch {
                            action: action.kind(),
                        })
                    },
                };
            }

            let _guard = DispatchGuard::enter(&inner.dispatching, &inner.pending);
            self.process(&action);

            let limit = inner.config.max_cascade;
            let mut processed = 0;
            loop {
                let next = inner.pending.borrow_mut().pop_front();
                let Some(next) = next else {
                    break;
                };

                if processed == limit {
                    let dropped = 1 + inner.pending.borrow_mut().drain(..).count();
                    tracing::warn!(limit, dropped, "Cascade limit exceeded, dropping queued actions");
                    StoreMetrics::record_rejected("cascade_limit");
                    return Err(StoreError::CascadeLimitExceeded { limit, dropped });
                }

                processed += 1;
                self.process(&next);
            }

            tracing::trace!(queued_processed = processed, "Dispatch completed");
            Ok(())
        }

        /// Run the reducer for one action and notify subscribers
        fn process(&self, action: &R::Action) {
            let kind = action.kind();
            let current = self.state();

            let start = Instant::now();
            let next = {
                let span = tracing::trace_span!("reducer_execution", action = kind);
                let _enter = span.enter();
                self.inner.reducer.reduce(&current, action)
            };
            StoreMetrics::record_reduce(kind, start.elapsed());

            *self.inner.state.borrow_mut() = Arc::new(next);
            tracing::debug!(action = kind, "Action reduced");

            let listeners = self.inner.listeners.snapshot();
            tracing::trace!(subscribers = listeners.len(), "Notifying subscribers");
            for listener in &listeners {
                listener();
            }
            StoreMetrics::record_notified(listeners.len());
        }

        /// Register a callback invoked after every dispatch
        ///
        /// # Returns
        ///
        /// A handle whose [`Unsubscribe::unsubscribe`] removes exactly this
        /// callback
        pub fn subscribe(&self, listener: impl Fn() + 'static) -> Unsubscribe {
            let id = self.inner.listeners.insert(Rc::new(listener));
            tracing::trace!(subscriber = id, "Subscribed");
            Unsubscribe::new(id, &self.inner.listeners)
        }

        /// Subscribe to a projection of the state
        ///
        /// `select` runs after every dispatch; `on_change` is called with its
        /// output only when the output differs from the previous one. Pass a
        /// memoized [`Selector`](unistore_core::Selector) inside `select` to
        /// also skip recomputing the projection when its inputs are unchanged.
        pub fn subscribe_selector<O, F, C>(&self, mut select: F, on_change: C) -> Unsubscribe
        where
            O: PartialEq + 'static,
            F: FnMut(&R::State) -> O + 'static,
            C: FnMut(&O) + 'static,
        {
            let last = RefCell::new(select(&*self.state()));
            let select = RefCell::new(select);
            let on_change = RefCell::new(on_change);
            let store = self.downgrade();

            self.subscribe(move || {
                let Some(store) = store.upgrade() else {
                    return;
                };
                let state = store.state();
                let next = (select.borrow_mut())(&*state);
                if *last.borrow() == next {
                    return;
                }
                *last.borrow_mut() = next;
                let current = last.borrow();
                (on_change.borrow_mut())(&*current);
            })
        }

        /// A handle that does not keep the store alive
        ///
        /// Subscribers that dispatch should capture a `WeakStore` so the store
        /// and its callbacks do not form a reference cycle.
        #[must_use]
        pub fn downgrade(&self) -> WeakStore<R> {
            WeakStore {
                inner: Rc::downgrade(&self.inner),
            }
        }
    }

    impl<R> StoreAccess for Store<R>
    where
        R: Reducer + 'static,
        R::State: 'static,
        R::Action: Action + 'static,
    {
        type State = R::State;
        type Action = R::Action;

        fn state(&self) -> Arc<R::State> {
            Self::state(self)
        }

        fn dispatch(&self, action: R::Action) -> Result<(), StoreError> {
            Self::dispatch(self, action)
        }

        fn subscribe(&self, listener: Box<dyn Fn()>) -> Unsubscribe {
            Self::subscribe(self, listener)
        }
    }

    impl<R> Clone for Store<R>
    where
        R: Reducer,
    {
        fn clone(&self) -> Self {
            Self {
                inner: Rc::clone(&self.inner),
            }
        }
    }

    impl<R> std::fmt::Debug for Store<R>
    where
        R: Reducer,
        R::State: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Store")
                .field("state", &self.inner.state.borrow())
                .field("subscribers", &self.inner.listeners.len())
                .field("dispatching", &self.inner.dispatching.get())
                .finish_non_exhaustive()
        }
    }

    /// Non-owning store handle.
    ///
    /// Created by [`Store::downgrade`].
    pub struct WeakStore<R>
    where
        R: Reducer,
    {
        inner: Weak<Inner<R>>,
    }

    impl<R> WeakStore<R>
    where
        R: Reducer,
    {
        /// The store, if it is still alive
        #[must_use]
        pub fn upgrade(&self) -> Option<Store<R>> {
            self.inner.upgrade().map(|inner| Store { inner })
        }
    }

    impl<R> Clone for WeakStore<R>
    where
        R: Reducer,
    {
        fn clone(&self) -> Self {
            Self {
                inner: Weak::clone(&self.inner),
            }
        }
    }
}

// Re-export for convenience
pub use store::{Store, StoreAccess, WeakStore};
