//! Memoized selectors
//!
//! A selector derives a view-ready value from the state in two steps: an
//! input function picks the parts of the state the derivation depends on, and
//! a compute function turns those parts into the output. The output is only
//! recomputed when the picked input changes.
//!
//! # Example
//!
//! ```
//! use unistore_core::selector::create_selector;
//!
//! struct State {
//!     numbers: Vec<i32>,
//!     label: &'static str,
//! }
//!
//! let mut evens = create_selector(
//!     |s: &State| s.numbers.clone(),
//!     |numbers: &Vec<i32>| numbers.iter().copied().filter(|n| n % 2 == 0).collect::<Vec<_>>(),
//! );
//!
//! let state = State { numbers: vec![1, 2, 3, 4], label: "a" };
//! assert_eq!(evens.select(&state), vec![2, 4]);
//!
//! let relabeled = State { label: "b", ..state };
//! assert_eq!(evens.select(&relabeled), vec![2, 4]);
//! assert_eq!(evens.recomputations(), 1);
//! ```

use std::sync::Arc;

/// Compares an `Arc` by address instead of by value
///
/// Use as (part of) a selector input when the state shares structure: an
/// unchanged slice keeps its allocation, so the comparison is O(1).
#[derive(Debug)]
pub struct ByAddress<T: ?Sized>(pub Arc<T>);

impl<T: ?Sized> Clone for ByAddress<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> PartialEq for ByAddress<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: ?Sized> Eq for ByAddress<T> {}

impl<T: ?Sized> std::ops::Deref for ByAddress<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

/// Type alias for the input step of a selector
type InputFn<S, I> = Box<dyn Fn(&S) -> I>;

/// Type alias for the compute step of a selector
type ComputeFn<I, O> = Box<dyn Fn(&I) -> O>;

/// A selector that caches its last input and output.
///
/// Created by [`create_selector`].
pub struct Selector<S, I, O> {
    input: InputFn<S, I>,
    compute: ComputeFn<I, O>,
    cache: Option<(I, O)>,
    recomputations: usize,
}

/// Create a memoized selector from an input function and a compute function
pub fn create_selector<S, I, O>(
    input: impl Fn(&S) -> I + 'static,
    compute: impl Fn(&I) -> O + 'static,
) -> Selector<S, I, O> {
    Selector {
        input: Box::new(input),
        compute: Box::new(compute),
        cache: None,
        recomputations: 0,
    }
}

impl<S, I, O> Selector<S, I, O>
where
    I: PartialEq,
    O: Clone,
{
    /// Derive the output for `state`
    ///
    /// Runs the compute step only if the input picked from `state` differs
    /// from the input of the previous call.
    pub fn select(&mut self, state: &S) -> O {
        let input = (self.input)(state);

        if let Some((cached_input, cached_output)) = &self.cache {
            if *cached_input == input {
                return cached_output.clone();
            }
        }

        let output = (self.compute)(&input);
        self.recomputations += 1;
        self.cache = Some((input, output.clone()));
        output
    }

    /// Number of times the compute step has run
    #[must_use]
    pub const fn recomputations(&self) -> usize {
        self.recomputations
    }

    /// Forget the cached input and output
    pub fn reset(&mut self) {
        self.cache = None;
    }
}

impl<S, I, O> std::fmt::Debug for Selector<S, I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selector")
            .field("cached", &self.cache.is_some())
            .field("recomputations", &self.recomputations)
            .finish_non_exhaustive()
    }
}
