//! Command-line demo for the todo application.
//!
//! Runs a scripted session against a store and prints the visible list every
//! time it changes. Set `RUST_LOG` to adjust logging, e.g.
//! `RUST_LOG=unistore_runtime=trace cargo run -p todo`.

use std::fmt::Write as _;
use todo::selectors::{is_filter_active, visible_todos_selector};
use todo::{create_store, TodoAction, TodoActions, TodoList, TodoState, VisibilityFilter};
use tracing::info;
use tracing_subscriber::EnvFilter;
use unistore_core::Action;

/// Actions replayed from their JSON shape at the end of the session
const SCRIPTED_ACTIONS: &[&str] = &[
    r#"{"type": "SET_VISIBILITY_FILTER", "filter": "SHOW_ALL"}"#,
    r#"{"type": "TOGGLE_TODO", "id": 1}"#,
    r#"{"type": "ARCHIVE_TODO", "id": 0}"#,
    r#"{"type": "SET_VISIBILITY_FILTER", "filter": "SHOW_SOME"}"#,
];

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("todo=info,unistore_runtime=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    unistore_runtime::metrics::register_metrics();

    println!("=== Todo Example ===\n");

    let store = create_store();

    let mut selector = visible_todos_selector();
    let weak = store.downgrade();
    let view = store.subscribe_selector(
        move |state: &TodoState| (selector.select(state), state.visibility_filter),
        move |(todos, _): &(TodoList, VisibilityFilter)| {
            if let Some(store) = weak.upgrade() {
                println!("{}", render(todos, &store.state()));
            }
        },
    );

    let actions = TodoActions::new(store.clone());

    println!("Creating todos...");
    let milk = actions.add_todo("Buy milk")?;
    let docs = actions.add_todo("Write documentation")?;
    actions.add_todo("Deploy to production")?;

    println!("Completing 'Buy milk'...");
    actions.toggle_todo(milk)?;

    println!("Showing active todos...");
    actions.set_visibility_filter(VisibilityFilter::ShowActive)?;

    println!("Showing completed todos...");
    actions.set_visibility_filter(VisibilityFilter::ShowCompleted)?;

    println!("Replaying actions from JSON...");
    for json in SCRIPTED_ACTIONS {
        match TodoAction::from_json(json) {
            Ok(action) => {
                info!(action = action.kind(), "Dispatching parsed action");
                store.dispatch(action)?;
            },
            Err(error) => println!("  skipped {json}: {error}"),
        }
    }

    view.unsubscribe();

    let state = store.state();
    println!(
        "\nCompleted: {}/{} (todo {docs} is {})",
        state.completed_count(),
        state.count(),
        if state.get(docs).is_some_and(|todo| todo.completed) {
            "done"
        } else {
            "open"
        }
    );
    println!("Final state: {}", serde_json::to_string_pretty(&*state)?);

    Ok(())
}

/// Render the visible todos and the filter footer
fn render(todos: &TodoList, state: &TodoState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n  Todos ({}):", state.visibility_filter.label());
    if todos.is_empty() {
        let _ = writeln!(out, "    (none)");
    }
    for todo in todos.iter() {
        let status = if todo.completed { "✓" } else { " " };
        let _ = writeln!(out, "    [{status}] #{} {}", todo.id, todo.text);
    }

    let footer: Vec<String> = VisibilityFilter::ALL
        .into_iter()
        .map(|candidate| {
            if is_filter_active(state, candidate) {
                format!("[{}]", candidate.label())
            } else {
                candidate.label().to_string()
            }
        })
        .collect();
    let _ = write!(out, "  Show: {}", footer.join(" | "));
    out
}
