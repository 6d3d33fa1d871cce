//! Action creators bound to an injected store.

use crate::types::{TodoAction, TodoId, VisibilityFilter};
use std::cell::Cell;
use unistore_runtime::{StoreAccess, StoreError};

/// Builds todo actions and dispatches them to a store
///
/// Owns the id counter for new todos: ids start at 0 and grow by one per
/// [`TodoActions::add_todo`] call. Use one instance per store so ids stay unique.
///
/// # Example
///
/// ```
/// use todo::{create_store, TodoActions, TodoId};
///
/// let actions = TodoActions::new(create_store());
/// let id = actions.add_todo("Buy milk")?;
/// actions.toggle_todo(id)?;
///
/// assert_eq!(id, TodoId::new(0));
/// assert!(actions.store().state().todos[0].completed);
/// # Ok::<(), unistore_runtime::StoreError>(())
/// ```
#[derive(Debug)]
pub struct TodoActions<S> {
    store: S,
    next_id: Cell<u64>,
}

impl<S> TodoActions<S>
where
    S: StoreAccess<Action = TodoAction>,
{
    /// Bind action creators to `store`
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            next_id: Cell::new(0),
        }
    }

    /// The store actions are dispatched to
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Dispatch `ADD_TODO` with the next id
    ///
    /// # Errors
    ///
    /// Returns the store's error if it rejects the dispatch. The id is
    /// consumed either way.
    pub fn add_todo(&self, text: impl Into<String>) -> Result<TodoId, StoreError> {
        let id = TodoId::new(self.next_id.get());
        self.next_id.set(id.value() + 1);

        tracing::debug!(%id, "Adding todo");
        self.store.dispatch(TodoAction::AddTodo {
            id,
            text: text.into(),
        })?;
        Ok(id)
    }

    /// Dispatch `TOGGLE_TODO`
    ///
    /// # Errors
    ///
    /// Returns the store's error if it rejects the dispatch.
    pub fn toggle_todo(&self, id: TodoId) -> Result<(), StoreError> {
        self.store.dispatch(TodoAction::ToggleTodo { id })
    }

    /// Dispatch `SET_VISIBILITY_FILTER`
    ///
    /// # Errors
    ///
    /// Returns the store's error if it rejects the dispatch.
    pub fn set_visibility_filter(&self, filter: VisibilityFilter) -> Result<(), StoreError> {
        self.store.dispatch(TodoAction::SetVisibilityFilter { filter })
    }
}
