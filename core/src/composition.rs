//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers:
//! - **`slice`**: Focus a slice reducer on one named field of a root state
//! - **`combine_reducers`**: Assemble named slices into one root reducer
//!
//! # Examples
//!
//! ```
//! use unistore_core::composition::{combine_reducers, slice};
//! use unistore_core::reducer::{reducer_fn, Reducer};
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct AppState {
//!     count: i32,
//!     name: String,
//! }
//!
//! #[derive(Clone)]
//! enum AppAction {
//!     Increment,
//!     SetName(String),
//! }
//!
//! let count = reducer_fn(0, |state: &i32, action: &AppAction| match action {
//!     AppAction::Increment => state + 1,
//!     AppAction::SetName(_) => *state,
//! });
//! let name = reducer_fn(String::from("anonymous"), |state: &String, action: &AppAction| {
//!     match action {
//!         AppAction::SetName(name) => name.clone(),
//!         AppAction::Increment => state.clone(),
//!     }
//! });
//!
//! let app = combine_reducers(vec![
//!     slice("count", count, |s: &AppState| &s.count, |s, v| s.count = v),
//!     slice("name", name, |s: &AppState| &s.name, |s, v| s.name = v),
//! ]);
//!
//! let state = app.reduce_or_init(None, &AppAction::Increment);
//! assert_eq!(state, AppState { count: 1, name: "anonymous".to_string() });
//! assert_eq!(app.slice_names(), vec!["count", "name"]);
//! ```

use crate::reducer::Reducer;

/// One named slice of a combined reducer.
///
/// A slice owns exactly one part of the root state `S` and knows how to
/// produce that part from the prior root state and an action.
pub trait SliceReducer<S, A> {
    /// Key of the slice within the root state
    fn name(&self) -> &'static str;

    /// Write the slice's default state into `target`
    fn initialize(&self, target: &mut S);

    /// Reduce the slice of `prior` and write the result into `target`
    fn reduce_into(&self, prior: &S, action: &A, target: &mut S);
}

/// Focuses a slice reducer on one field of a root state.
///
/// `get` reads the slice out of the prior root state and `set` stores the
/// reducer's result in the root state being assembled.
///
/// # Examples
///
/// ```
/// use unistore_core::composition::{slice, SliceReducer};
/// use unistore_core::reducer::reducer_fn;
///
/// #[derive(Default)]
/// struct Parent {
///     value: i32,
/// }
///
/// let adder = slice(
///     "value",
///     reducer_fn(0, |state: &i32, n: &i32| state + n),
///     |parent: &Parent| &parent.value,
///     |parent, value| parent.value = value,
/// );
///
/// let prior = Parent { value: 5 };
/// let mut next = Parent::default();
/// adder.reduce_into(&prior, &3, &mut next);
/// assert_eq!(next.value, 8);
/// assert_eq!(prior.value, 5);
/// ```
pub fn slice<S, R>(
    name: &'static str,
    reducer: R,
    get: fn(&S) -> &R::State,
    set: fn(&mut S, R::State),
) -> Box<dyn SliceReducer<S, R::Action>>
where
    S: 'static,
    R: Reducer + 'static,
    R::State: 'static,
    R::Action: 'static,
{
    Box::new(ScopedSlice {
        name,
        reducer,
        get,
        set,
    })
}

/// A reducer scoped to one named field of a root state.
///
/// Created by [`slice`].
struct ScopedSlice<S, R>
where
    R: Reducer,
{
    name: &'static str,
    reducer: R,
    get: fn(&S) -> &R::State,
    set: fn(&mut S, R::State),
}

impl<S, R> SliceReducer<S, R::Action> for ScopedSlice<S, R>
where
    R: Reducer,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn initialize(&self, target: &mut S) {
        (self.set)(target, self.reducer.initial_state());
    }

    fn reduce_into(&self, prior: &S, action: &R::Action, target: &mut S) {
        let next = self.reducer.reduce((self.get)(prior), action);
        (self.set)(target, next);
    }
}

/// Combines named slice reducers into one reducer over the root state.
///
/// For every slice, in the order given, the combined reducer computes
/// `next.slice = reducer(prior.slice, action)` and assembles the results into
/// a fresh root state. Parts of the root state not owned by any slice are not
/// carried over: they take the value of `S::default()`.
///
/// # Type Parameters
///
/// - `S`: The root state type
/// - `A`: The action type shared by all slices
#[must_use]
pub fn combine_reducers<S, A>(slices: Vec<Box<dyn SliceReducer<S, A>>>) -> CombinedReducer<S, A> {
    debug_assert!(
        slices
            .iter()
            .enumerate()
            .all(|(i, s)| slices[..i].iter().all(|other| other.name() != s.name())),
        "slice names passed to combine_reducers must be unique"
    );

    CombinedReducer { slices }
}

/// A root reducer assembled from named slices.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A> {
    slices: Vec<Box<dyn SliceReducer<S, A>>>,
}

impl<S, A> CombinedReducer<S, A> {
    /// Slice names in the order they were given to [`combine_reducers`]
    #[must_use]
    pub fn slice_names(&self) -> Vec<&'static str> {
        self.slices.iter().map(|slice| slice.name()).collect()
    }
}

impl<S, A> std::fmt::Debug for CombinedReducer<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedReducer")
            .field("slices", &self.slice_names())
            .finish()
    }
}

impl<S, A> Reducer for CombinedReducer<S, A>
where
    S: Clone + Default,
{
    type State = S;
    type Action = A;

    fn initial_state(&self) -> S {
        let mut state = S::default();
        for slice in &self.slices {
            slice.initialize(&mut state);
        }
        state
    }

    fn reduce(&self, state: &S, action: &A) -> S {
        let mut next = S::default();
        for slice in &self.slices {
            slice.reduce_into(state, action, &mut next);
        }
        next
    }
}
