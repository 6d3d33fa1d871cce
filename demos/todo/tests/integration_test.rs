//! Integration tests for the todo application.
//!
//! Drives the reducers through a real store, the way a view layer would.

#![allow(clippy::unwrap_used)] // Tests can unwrap

use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use todo::reducer::{TodosReducer, VisibilityFilterReducer};
use todo::selectors::get_visible_todos;
use todo::{
    create_store, todo_app, Todo, TodoAction, TodoActions, TodoError, TodoId, TodoList, TodoState,
    VisibilityFilter,
};
use unistore_core::Reducer;
use unistore_runtime::{ReentrancyPolicy, Store, StoreConfig, StoreError};
use unistore_testing::{init_test_tracing, RecordingSubscriber};

fn add(id: u64, text: &str) -> TodoAction {
    TodoAction::AddTodo {
        id: TodoId::new(id),
        text: text.to_string(),
    }
}

fn toggle(id: u64) -> TodoAction {
    TodoAction::ToggleTodo { id: TodoId::new(id) }
}

#[test]
fn test_add_todo_to_empty_list() {
    let todos = TodosReducer.reduce_or_init(None, &add(1, "x"));

    assert_eq!(
        *todos,
        vec![Arc::new(Todo {
            id: TodoId::new(1),
            text: "x".to_string(),
            completed: false,
        })]
    );
}

#[test]
fn test_toggle_then_toggle_unknown_id() {
    let store = create_store();

    store.dispatch(add(1, "x")).unwrap();
    store.dispatch(toggle(1)).unwrap();
    let toggled = store.state();
    assert_eq!(toggled.count(), 1);
    assert!(toggled.todos[0].completed);

    store.dispatch(toggle(2)).unwrap();
    let after = store.state();

    assert_eq!(*after, *toggled);
    assert!(Arc::ptr_eq(&after.todos[0], &toggled.todos[0]));
}

#[test]
fn test_combined_initial_state() {
    let state = todo_app().reduce_or_init(None, &TodoAction::Init);

    assert!(state.todos.is_empty());
    assert_eq!(state.visibility_filter, VisibilityFilter::ShowAll);
    assert_eq!(*create_store().state(), state);
}

#[test]
fn test_visible_todos_per_filter() {
    let todos: TodoList = Arc::new(vec![
        Arc::new(Todo {
            id: TodoId::new(1),
            text: "one".to_string(),
            completed: false,
        }),
        Arc::new(Todo {
            id: TodoId::new(2),
            text: "two".to_string(),
            completed: true,
        }),
    ]);
    let ids = |filter| -> Vec<u64> {
        get_visible_todos(&todos, filter)
            .iter()
            .map(|todo| todo.id.value())
            .collect()
    };

    assert_eq!(ids(VisibilityFilter::ShowActive), vec![1]);
    assert_eq!(ids(VisibilityFilter::ShowCompleted), vec![2]);
    assert_eq!(ids(VisibilityFilter::ShowAll), vec![1, 2]);
}

#[test]
fn test_subscribe_dispatch_unsubscribe_dispatch() {
    let store = create_store();
    let recorder = RecordingSubscriber::new();

    let handle = store.subscribe(recorder.callback());
    store.dispatch(add(0, "a")).unwrap();
    handle.unsubscribe();
    store.dispatch(add(1, "b")).unwrap();

    assert_eq!(recorder.calls(), 1);
}

#[test]
fn test_double_unsubscribe_leaves_others_registered() {
    let store = create_store();
    let first = RecordingSubscriber::new();
    let second = RecordingSubscriber::new();

    let handle = store.subscribe(first.callback());
    let _other = store.subscribe(second.callback());
    handle.unsubscribe();
    handle.unsubscribe();
    store.dispatch(toggle(0)).unwrap();

    assert_eq!(first.calls(), 0);
    assert_eq!(second.calls(), 1);
}

#[test]
fn test_unknown_action_keeps_state_identity() {
    init_test_tracing();
    let store = create_store();
    store.dispatch(add(0, "a")).unwrap();
    let before = store.state();

    store
        .dispatch(TodoAction::from_json(r#"{"type": "ARCHIVE_TODO"}"#).unwrap())
        .unwrap();
    let after = store.state();

    assert_eq!(*after, *before);
    assert!(Arc::ptr_eq(&after.todos, &before.todos));
}

#[test]
fn test_subscriber_dispatch_is_queued_behind_current_pass() {
    let store = create_store();
    let observed = Rc::new(RefCell::new(Vec::new()));

    let weak = store.downgrade();
    let _auto_complete = store.subscribe(move || {
        let store = weak.upgrade().unwrap();
        let state = store.state();
        if let Some(todo) = state.todos.last().filter(|todo| !todo.completed) {
            store
                .dispatch(TodoAction::ToggleTodo { id: todo.id })
                .unwrap();
        }
    });
    let weak = store.downgrade();
    let sink = Rc::clone(&observed);
    let _observer = store.subscribe(move || {
        let store = weak.upgrade().unwrap();
        sink.borrow_mut().push(store.state().completed_count());
    });

    store.dispatch(add(0, "a")).unwrap();

    assert_eq!(*observed.borrow(), vec![0, 1]);
    assert_eq!(store.state().completed_count(), 1);
}

#[test]
fn test_subscriber_dispatch_rejected_when_forbidden() {
    let config = StoreConfig::default().with_reentrancy(ReentrancyPolicy::Forbid);
    let store = Store::with_config(todo_app(), None, config);
    let outcome = Rc::new(RefCell::new(None));

    let weak = store.downgrade();
    let sink = Rc::clone(&outcome);
    let _handle = store.subscribe(move || {
        let store = weak.upgrade().unwrap();
        *sink.borrow_mut() = Some(store.dispatch(toggle(0)));
    });

    store.dispatch(add(0, "a")).unwrap();

    assert_eq!(
        *outcome.borrow(),
        Some(Err(StoreError::ReentrantDispatch {
            action: "TOGGLE_TODO"
        }))
    );
    assert!(!store.state().todos[0].completed);
}

#[test]
fn test_store_error_converts_to_todo_error() {
    let error: TodoError = StoreError::ReentrantDispatch { action: "ADD_TODO" }.into();

    assert!(matches!(error, TodoError::Store(_)));
    assert_eq!(
        error.to_string(),
        "Reentrant dispatch of ADD_TODO rejected: a dispatch is already in progress"
    );
}

#[test]
fn test_selector_subscription_skips_unrelated_changes() {
    let store = create_store();
    let renders = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&renders);
    let mut selector = todo::selectors::visible_todos_selector();
    let _view = store.subscribe_selector(
        move |state: &TodoState| selector.select(state),
        move |visible: &TodoList| sink.borrow_mut().push(visible.len()),
    );

    let actions = TodoActions::new(store.clone());
    let id = actions.add_todo("a").unwrap();
    actions
        .set_visibility_filter(VisibilityFilter::ShowCompleted)
        .unwrap();
    store.dispatch(TodoAction::Unknown).unwrap();
    actions.toggle_todo(id).unwrap();

    assert_eq!(*renders.borrow(), vec![1, 0, 1]);
}

#[test]
fn test_action_creators_against_store() {
    let actions = TodoActions::new(create_store());

    let first = actions.add_todo("Run the tests").unwrap();
    let second = actions.add_todo("Use Redux").unwrap();
    actions.toggle_todo(second).unwrap();

    let state = actions.store().state();
    assert_eq!(first, TodoId::new(0));
    assert_eq!(second, TodoId::new(1));
    assert!(!state.get(first).unwrap().completed);
    assert!(state.get(second).unwrap().completed);
}

#[test]
fn test_preloaded_state_from_json() {
    let json = r#"{
        "todos": [{"id": 4, "text": "Imported", "completed": true}],
        "visibilityFilter": "SHOW_COMPLETED"
    }"#;
    let preloaded: TodoState = serde_json::from_str(json).unwrap();

    let store = Store::with_preloaded_state(todo_app(), preloaded.clone());

    assert_eq!(*store.state(), preloaded);
}

fn action_strategy() -> impl Strategy<Value = TodoAction> {
    prop_oneof![
        (0_u64..8, "[a-z]{1,8}").prop_map(|(id, text)| TodoAction::AddTodo {
            id: TodoId::new(id),
            text
        }),
        (0_u64..8).prop_map(|id| TodoAction::ToggleTodo { id: TodoId::new(id) }),
        prop::sample::select(VisibilityFilter::ALL.to_vec())
            .prop_map(|filter| TodoAction::SetVisibilityFilter { filter }),
    ]
}

fn state_from(actions: &[TodoAction]) -> TodoState {
    let reducer = todo_app();
    actions
        .iter()
        .fold(reducer.initial_state(), |state, action| reducer.reduce(&state, action))
}

proptest! {
    #[test]
    fn prop_unrecognized_actions_keep_identity(actions in prop::collection::vec(action_strategy(), 0..20)) {
        let state = state_from(&actions);

        let todos = TodosReducer.reduce(&state.todos, &TodoAction::Unknown);
        let filter = VisibilityFilterReducer.reduce(&state.visibility_filter, &TodoAction::Unknown);
        let next = todo_app().reduce(&state, &TodoAction::Unknown);

        prop_assert!(Arc::ptr_eq(&todos, &state.todos));
        prop_assert_eq!(filter, state.visibility_filter);
        prop_assert!(Arc::ptr_eq(&next.todos, &state.todos));
    }

    #[test]
    fn prop_toggle_twice_restores_state(
        actions in prop::collection::vec(action_strategy(), 0..20),
        id in 0_u64..8,
    ) {
        let reducer = todo_app();
        let state = state_from(&actions);

        let once = reducer.reduce(&state, &toggle(id));
        let twice = reducer.reduce(&once, &toggle(id));

        prop_assert_eq!(twice, state);
    }

    #[test]
    fn prop_visible_partitions_all(actions in prop::collection::vec(action_strategy(), 0..20)) {
        let state = state_from(&actions);

        let active = get_visible_todos(&state.todos, VisibilityFilter::ShowActive);
        let completed = get_visible_todos(&state.todos, VisibilityFilter::ShowCompleted);

        prop_assert_eq!(active.len() + completed.len(), state.count());
        prop_assert_eq!(completed.len(), state.completed_count());
    }
}
