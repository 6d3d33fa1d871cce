//! Todo list application built on the Unistore state container.
//!
//! This crate shows a complete unidirectional data flow:
//!
//! - A tagged action enum with a JSON shape (`{"type": "ADD_TODO", ...}`)
//! - Slice reducers combined into one root reducer
//! - Structural sharing: untouched todos keep their `Arc` identity
//! - Selectors deriving the visible list, memoized by list identity
//! - Action creators bound to an injected store
//! - Testing with `ReducerTest`
//!
//! # Quick Start
//!
//! ```
//! use todo::{create_store, selectors, TodoActions, VisibilityFilter};
//!
//! let actions = TodoActions::new(create_store());
//!
//! let milk = actions.add_todo("Buy milk")?;
//! actions.add_todo("Write documentation")?;
//! actions.toggle_todo(milk)?;
//! actions.set_visibility_filter(VisibilityFilter::ShowActive)?;
//!
//! let state = actions.store().state();
//! let visible = selectors::visible_todos(&state);
//! assert_eq!(visible.len(), 1);
//! assert_eq!(visible[0].text, "Write documentation");
//! # Ok::<(), unistore_runtime::StoreError>(())
//! ```

pub mod actions;
pub mod error;
pub mod reducer;
pub mod selectors;
pub mod types;

pub use actions::TodoActions;
pub use error::TodoError;
pub use reducer::{todo_app, TodoReducer};
pub use types::{Todo, TodoAction, TodoId, TodoList, TodoState, VisibilityFilter};

/// Store holding a [`TodoState`]
pub type TodoStore = unistore_runtime::Store<TodoReducer>;

/// Create a store with the todo reducers and their default state
#[must_use]
pub fn create_store() -> TodoStore {
    TodoStore::new(todo_app())
}
