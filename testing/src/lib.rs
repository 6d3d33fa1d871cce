//! # Unistore Testing
//!
//! Testing utilities and helpers for Unistore reducers and stores.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`RecordingSubscriber`]: Subscriber callback that counts its invocations
//! - Assertion helpers for structural sharing
//! - Tracing setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use unistore_runtime::Store;
//! use unistore_testing::RecordingSubscriber;
//!
//! #[test]
//! fn test_notifies_once() {
//!     let store = Store::new(todo_app());
//!     let recorder = RecordingSubscriber::new();
//!     let unsubscribe = store.subscribe(recorder.callback());
//!
//!     store.dispatch(TodoAction::ToggleTodo { id: TodoId::new(0) })?;
//!     unsubscribe.unsubscribe();
//!
//!     assert_eq!(recorder.calls(), 1);
//! }
//! ```


pub use reducer_test::{assertions, ReducerTest};

/// Mock subscribers
pub mod mocks {
    use std::cell::Cell;
    use std::rc::Rc;

    /// Subscriber that counts how often it was notified
    ///
    /// Clones share the same counter.
    ///
    /// # Example
    ///
    /// ```
    /// use unistore_testing::RecordingSubscriber;
    ///
    /// let recorder = RecordingSubscriber::new();
    /// let callback = recorder.callback();
    ///
    /// callback();
    /// callback();
    /// assert_eq!(recorder.calls(), 2);
    /// ```
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSubscriber {
        calls: Rc<Cell<usize>>,
    }

    impl RecordingSubscriber {
        /// Create a recorder with a zero count
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// A callback that increments the shared count
        pub fn callback(&self) -> impl Fn() + use<> {
            let calls = Rc::clone(&self.calls);
            move || calls.set(calls.get() + 1)
        }

        /// Number of invocations so far
        #[must_use]
        pub fn calls(&self) -> usize {
            self.calls.get()
        }
    }
}

/// Tracing setup for tests
pub mod tracing_setup {
    use tracing_subscriber::EnvFilter;

    /// Install a test-friendly tracing subscriber
    ///
    /// Honors `RUST_LOG` (default `warn`) and writes through the test harness
    /// so output is captured per test. Safe to call from every test.
    pub fn init_test_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use mocks::RecordingSubscriber;
pub use tracing_setup::init_test_tracing;
