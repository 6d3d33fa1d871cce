//! Domain types for the todo list.
//!
//! A todo list is an ordered sequence of todos plus the filter that decides
//! which of them the view shows. Todos are shared behind `Arc` so a new list
//! reuses every todo it did not change.

use crate::error::TodoError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use unistore_core::action::{Action, INIT_ACTION_TYPE};

/// Identifier of a todo, assigned in increasing order by the action creators
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from its numeric value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// Text entered by the user
    pub text: String,
    /// Whether the todo is done
    pub completed: bool,
}

impl Todo {
    /// Creates an open todo
    #[must_use]
    pub const fn new(id: TodoId, text: String) -> Self {
        Self {
            id,
            text,
            completed: false,
        }
    }

    /// Returns a copy with `completed` negated
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

/// Todos in insertion order, shared structurally between states
pub type TodoList = Arc<Vec<Arc<Todo>>>;

/// Which todos the view shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisibilityFilter {
    /// Every todo
    #[default]
    ShowAll,
    /// Todos not yet completed
    ShowActive,
    /// Completed todos
    ShowCompleted,
}

impl VisibilityFilter {
    /// All filters, in the order a footer lists them
    pub const ALL: [Self; 3] = [Self::ShowAll, Self::ShowActive, Self::ShowCompleted];

    /// Wire name of the filter
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShowAll => "SHOW_ALL",
            Self::ShowActive => "SHOW_ACTIVE",
            Self::ShowCompleted => "SHOW_COMPLETED",
        }
    }

    /// Human readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ShowAll => "All",
            Self::ShowActive => "Active",
            Self::ShowCompleted => "Completed",
        }
    }
}

impl std::fmt::Display for VisibilityFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisibilityFilter {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s)
            .ok_or_else(|| TodoError::UnrecognizedFilter(s.to_string()))
    }
}

/// State of the todo application
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoState {
    /// All todos in insertion order
    pub todos: TodoList,
    /// Active filter
    pub visibility_filter: VisibilityFilter,
}

impl TodoState {
    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns the number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Arc<Todo>> {
        self.todos.iter().find(|t| t.id == id)
    }
}

/// Actions accepted by the todo store
///
/// Serialized with the `type` tag inline, e.g.
/// `{"type": "ADD_TODO", "id": 0, "text": "Buy milk"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoAction {
    /// Append a new open todo
    AddTodo {
        /// Identifier for the new todo
        id: TodoId,
        /// Text of the todo
        text: String,
    },

    /// Flip `completed` on the todo with this id
    ToggleTodo {
        /// Todo to toggle
        id: TodoId,
    },

    /// Change which todos are visible
    SetVisibilityFilter {
        /// New filter
        filter: VisibilityFilter,
    },

    /// Synthetic action dispatched when a store is created
    #[serde(rename = "@@INIT")]
    Init,

    /// Any `type` this application does not know
    #[serde(other)]
    Unknown,
}

impl TodoAction {
    /// Parses an action from its JSON shape
    ///
    /// Unknown `type` tags parse to [`TodoAction::Unknown`]; a known tag with
    /// a missing or ill-typed payload field is an error.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::MalformedAction`] if the JSON does not describe an action.
    pub fn from_json(json: &str) -> Result<Self, TodoError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Action for TodoAction {
    fn init() -> Self {
        Self::Init
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::AddTodo { .. } => "ADD_TODO",
            Self::ToggleTodo { .. } => "TOGGLE_TODO",
            Self::SetVisibilityFilter { .. } => "SET_VISIBILITY_FILTER",
            Self::Init => INIT_ACTION_TYPE,
            Self::Unknown => "UNKNOWN",
        }
    }
}
