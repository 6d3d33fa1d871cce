//! Selectors deriving view data from [`TodoState`].

use crate::types::{Todo, TodoList, TodoState, VisibilityFilter};
use std::sync::Arc;
use unistore_core::selector::{create_selector, ByAddress, Selector};

/// Input of the memoized visible-todos selector: the list by address plus the filter
pub type VisibleTodosInput = (ByAddress<Vec<Arc<Todo>>>, VisibilityFilter);

/// Memoized selector over [`TodoState`] yielding the visible todos
pub type VisibleTodosSelector = Selector<TodoState, VisibleTodosInput, TodoList>;

/// The todos a filter shows, in list order
///
/// `ShowAll` returns the list itself, so the result keeps its identity. The
/// other filters build a new list sharing the matching todos.
#[must_use]
pub fn get_visible_todos(todos: &TodoList, filter: VisibilityFilter) -> TodoList {
    match filter {
        VisibilityFilter::ShowAll => Arc::clone(todos),
        VisibilityFilter::ShowCompleted => Arc::new(
            todos
                .iter()
                .filter(|todo| todo.completed)
                .map(Arc::clone)
                .collect(),
        ),
        VisibilityFilter::ShowActive => Arc::new(
            todos
                .iter()
                .filter(|todo| !todo.completed)
                .map(Arc::clone)
                .collect(),
        ),
    }
}

/// The todos visible under the state's own filter
#[must_use]
pub fn visible_todos(state: &TodoState) -> TodoList {
    get_visible_todos(&state.todos, state.visibility_filter)
}

/// Whether `filter` is the active one (drives the footer links)
#[must_use]
pub fn is_filter_active(state: &TodoState, filter: VisibilityFilter) -> bool {
    state.visibility_filter == filter
}

/// A [`visible_todos`] that only recomputes when the todo list allocation or
/// the filter changes
///
/// # Example
///
/// ```
/// use todo::selectors::visible_todos_selector;
/// use todo::TodoState;
///
/// let mut selector = visible_todos_selector();
/// let state = TodoState::default();
///
/// selector.select(&state);
/// selector.select(&state.clone());
/// assert_eq!(selector.recomputations(), 1);
/// ```
#[must_use]
pub fn visible_todos_selector() -> VisibleTodosSelector {
    create_selector(
        |state: &TodoState| (ByAddress(Arc::clone(&state.todos)), state.visibility_filter),
        |(todos, filter): &VisibleTodosInput| get_visible_todos(&todos.0, *filter),
    )
}
