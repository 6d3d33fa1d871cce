//! Reducers for the todo application.
//!
//! The root reducer is assembled from two slices:
//!
//! - `todos`: the ordered list of todos ([`TodosReducer`])
//! - `visibilityFilter`: the active filter ([`VisibilityFilterReducer`])
//!
//! Every reducer answers an action it does not handle with its prior state,
//! so an unrelated action keeps the identity of every `Arc` in the state.

use crate::types::{Todo, TodoAction, TodoList, TodoState, VisibilityFilter};
use std::sync::Arc;
use unistore_core::composition::{combine_reducers, slice, CombinedReducer};
use unistore_core::reducer::Reducer;

/// Root reducer of the todo application
pub type TodoReducer = CombinedReducer<TodoState, TodoAction>;

/// Reduce a single todo.
///
/// - `AddTodo` builds a new open todo (the prior is ignored)
/// - `ToggleTodo` for this todo's id returns a toggled copy
/// - anything else returns the prior todo itself
///
/// Returns `None` only when there is no prior todo and the action does not
/// create one.
#[must_use]
pub fn todo(prior: Option<&Arc<Todo>>, action: &TodoAction) -> Option<Arc<Todo>> {
    match action {
        TodoAction::AddTodo { id, text } => Some(Arc::new(Todo::new(*id, text.clone()))),
        TodoAction::ToggleTodo { id } => prior.map(|todo| {
            if todo.id == *id {
                Arc::new(todo.toggled())
            } else {
                Arc::clone(todo)
            }
        }),
        _ => prior.map(Arc::clone),
    }
}

/// Reducer for the `todos` slice
#[derive(Clone, Copy, Debug, Default)]
pub struct TodosReducer;

impl Reducer for TodosReducer {
    type State = TodoList;
    type Action = TodoAction;

    fn initial_state(&self) -> TodoList {
        Arc::new(Vec::new())
    }

    fn reduce(&self, todos: &TodoList, action: &TodoAction) -> TodoList {
        match action {
            TodoAction::AddTodo { .. } => {
                let mut next = Vec::with_capacity(todos.len() + 1);
                next.extend(todos.iter().map(Arc::clone));
                next.extend(todo(None, action));
                Arc::new(next)
            },
            // Always a new list, even when no id matches
            TodoAction::ToggleTodo { .. } => Arc::new(
                todos
                    .iter()
                    .filter_map(|item| todo(Some(item), action))
                    .collect(),
            ),
            _ => Arc::clone(todos),
        }
    }
}

/// Reducer for the `visibilityFilter` slice
#[derive(Clone, Copy, Debug, Default)]
pub struct VisibilityFilterReducer;

impl Reducer for VisibilityFilterReducer {
    type State = VisibilityFilter;
    type Action = TodoAction;

    fn initial_state(&self) -> VisibilityFilter {
        VisibilityFilter::ShowAll
    }

    fn reduce(&self, current: &VisibilityFilter, action: &TodoAction) -> VisibilityFilter {
        match action {
            TodoAction::SetVisibilityFilter { filter } => *filter,
            _ => *current,
        }
    }
}

/// Build the root reducer of the todo application
#[must_use]
pub fn todo_app() -> TodoReducer {
    combine_reducers(vec![
        slice(
            "todos",
            TodosReducer,
            |state: &TodoState| &state.todos,
            |state, todos| state.todos = todos,
        ),
        slice(
            "visibilityFilter",
            VisibilityFilterReducer,
            |state: &TodoState| &state.visibility_filter,
            |state, filter| state.visibility_filter = filter,
        ),
    ])
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Tests can unwrap

    use super::*;
    use crate::types::TodoId;
    use unistore_testing::{assertions, ReducerTest};

    fn todo_item(id: u64, text: &str, completed: bool) -> Arc<Todo> {
        Arc::new(Todo {
            id: TodoId::new(id),
            text: text.to_string(),
            completed,
        })
    }

    fn list(items: Vec<Arc<Todo>>) -> TodoList {
        Arc::new(items)
    }

    #[test]
    fn test_todo_add_ignores_prior() {
        let prior = todo_item(9, "old", true);
        let action = TodoAction::AddTodo {
            id: TodoId::new(1),
            text: "new".to_string(),
        };

        let next = todo(Some(&prior), &action).unwrap();

        assert_eq!(*next, Todo::new(TodoId::new(1), "new".to_string()));
    }

    #[test]
    fn test_todo_toggle_other_id_keeps_identity() {
        let prior = todo_item(1, "x", false);
        let action = TodoAction::ToggleTodo { id: TodoId::new(2) };

        let next = todo(Some(&prior), &action).unwrap();

        assertions::assert_same(&prior, &next);
    }

    #[test]
    fn test_todo_unhandled_action_without_prior() {
        assert!(todo(None, &TodoAction::Unknown).is_none());
        assert!(todo(None, &TodoAction::ToggleTodo { id: TodoId::new(0) }).is_none());
    }

    #[test]
    fn test_todo_unhandled_action_keeps_prior_identity() {
        let prior = todo_item(3, "x", false);

        for action in [
            TodoAction::Unknown,
            TodoAction::Init,
            TodoAction::SetVisibilityFilter {
                filter: VisibilityFilter::ShowCompleted,
            },
        ] {
            let next = todo(Some(&prior), &action).unwrap();
            assertions::assert_same(&prior, &next);
        }
    }

    #[test]
    fn test_todos_default_is_empty() {
        ReducerTest::new(TodosReducer)
            .when_action(TodoAction::Init)
            .then_state(|todos| assert!(todos.is_empty()))
            .run();
    }

    #[test]
    fn test_add_todo_appends() {
        ReducerTest::new(TodosReducer)
            .given_state(list(vec![todo_item(0, "Run the tests", false)]))
            .when_action(TodoAction::AddTodo {
                id: TodoId::new(1),
                text: "Use Redux".to_string(),
            })
            .then_state(|todos| {
                assert_eq!(todos.len(), 2);
                assert_eq!(todos[1].text, "Use Redux");
                assert_eq!(todos[1].id, TodoId::new(1));
                assert!(!todos[1].completed);
            })
            .then_transition(|prior, next| {
                let prior = prior.unwrap();
                assertions::assert_replaced(prior, next);
                assertions::assert_same(&prior[0], &next[0]);
            })
            .run();
    }

    #[test]
    fn test_add_todo_keeps_duplicate_ids() {
        ReducerTest::new(TodosReducer)
            .given_state(list(vec![todo_item(0, "a", false)]))
            .when_action(TodoAction::AddTodo {
                id: TodoId::new(0),
                text: "b".to_string(),
            })
            .then_state(|todos| assert_eq!(todos.len(), 2))
            .run();
    }

    #[test]
    fn test_toggle_todo_replaces_only_the_target() {
        ReducerTest::new(TodosReducer)
            .given_state(list(vec![todo_item(1, "a", false), todo_item(0, "b", false)]))
            .when_action(TodoAction::ToggleTodo { id: TodoId::new(1) })
            .then_state(|todos| {
                assert!(todos[0].completed);
                assert!(!todos[1].completed);
            })
            .then_transition(|prior, next| {
                let prior = prior.unwrap();
                assertions::assert_replaced(prior, next);
                assertions::assert_replaced(&prior[0], &next[0]);
                assertions::assert_same(&prior[1], &next[1]);
            })
            .run();
    }

    #[test]
    fn test_toggle_unknown_id_builds_equal_new_list() {
        ReducerTest::new(TodosReducer)
            .given_state(list(vec![todo_item(0, "a", false)]))
            .when_action(TodoAction::ToggleTodo { id: TodoId::new(7) })
            .then_transition(|prior, next| {
                let prior = prior.unwrap();
                assert_eq!(prior, next);
                assertions::assert_replaced(prior, next);
                assertions::assert_same(&prior[0], &next[0]);
            })
            .run();
    }

    #[test]
    fn test_todos_ignores_filter_action() {
        ReducerTest::new(TodosReducer)
            .given_state(list(vec![todo_item(0, "a", false)]))
            .when_action(TodoAction::SetVisibilityFilter {
                filter: VisibilityFilter::ShowCompleted,
            })
            .then_transition(assertions::assert_unchanged)
            .run();
    }

    #[test]
    fn test_visibility_filter_default_and_set() {
        ReducerTest::new(VisibilityFilterReducer)
            .when_action(TodoAction::Unknown)
            .then_state(|filter| assert_eq!(*filter, VisibilityFilter::ShowAll))
            .run();

        ReducerTest::new(VisibilityFilterReducer)
            .given_state(VisibilityFilter::ShowAll)
            .when_action(TodoAction::SetVisibilityFilter {
                filter: VisibilityFilter::ShowActive,
            })
            .then_state(|filter| assert_eq!(*filter, VisibilityFilter::ShowActive))
            .run();
    }

    #[test]
    fn test_todo_app_initial_state() {
        ReducerTest::new(todo_app())
            .when_action(TodoAction::Init)
            .then_state(|state| assert_eq!(*state, TodoState::default()))
            .run();
    }

    #[test]
    fn test_todo_app_filter_change_keeps_todos_identity() {
        let todos = list(vec![todo_item(0, "a", false)]);
        let prior = TodoState {
            todos: Arc::clone(&todos),
            visibility_filter: VisibilityFilter::ShowAll,
        };

        ReducerTest::new(todo_app())
            .given_state(prior)
            .when_action(TodoAction::SetVisibilityFilter {
                filter: VisibilityFilter::ShowCompleted,
            })
            .then_state(move |state| {
                assertions::assert_same(&todos, &state.todos);
                assert_eq!(state.visibility_filter, VisibilityFilter::ShowCompleted);
            })
            .run();
    }

    #[test]
    fn test_todo_app_slice_names() {
        assert_eq!(todo_app().slice_names(), vec!["todos", "visibilityFilter"]);
    }
}
