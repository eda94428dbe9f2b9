mod common;

use chrono::Utc;
use common::{mount_at, StubApi};
use tfactory_core::model::note::PLACEHOLDER_NOTE_ID;
use tfactory_core::NoteDraft;

#[tokio::test]
async fn entering_notes_seeds_the_placeholder() {
    let (app, _) = mount_at("/notes", StubApi::ok(), None).await;

    assert!(!app.notes_backend().is_remote());
    assert_eq!(app.notes().items.len(), 1);
    assert_eq!(app.notes().items[0].id, PLACEHOLDER_NOTE_ID);
    assert_eq!(app.notes().items[0].title, "Mock Note");
}

#[tokio::test]
async fn groceries_scenario_prepends_new_note() {
    let (mut app, _) = mount_at("/notes", StubApi::ok(), None).await;
    let before = Utc::now();

    app.set_note_title("Groceries");
    app.set_note_body("Milk, eggs");
    assert!(app.submit_note().await);

    let notes = &app.notes().items;
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].title, "Groceries");
    assert_eq!(notes[0].body, "Milk, eggs");
    assert!(notes[0].created_at >= before);
    assert!(notes[0].id.starts_with("mock-"));
    assert_eq!(notes[1].title, "Mock Note");
    assert_eq!(app.notes().draft, NoteDraft::default());
    assert!(!app.notes().is_busy());
}

#[tokio::test]
async fn add_grows_sequence_by_exactly_one() {
    let (mut app, _) = mount_at("/notes", StubApi::ok(), None).await;
    let before = app.notes().items.len();

    assert!(app.add_note(NoteDraft::new("T", "B")).await);

    assert_eq!(app.notes().items.len(), before + 1);
    assert_eq!(app.notes().items[0].title, "T");
    assert_eq!(app.notes().items[0].body, "B");
}

#[tokio::test]
async fn delete_removes_only_matching_id_and_keeps_order() {
    let (mut app, _) = mount_at("/notes", StubApi::ok(), None).await;
    for title in ["one", "two", "three"] {
        app.add_note(NoteDraft::new(title, "")).await;
    }
    let target = app.notes().items[1].id.clone();

    assert!(app.delete_note(&target).await);

    let titles: Vec<_> = app.notes().items.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, ["three", "one", "Mock Note"]);
}

#[tokio::test]
async fn delete_of_unknown_id_leaves_list_untouched() {
    let (mut app, _) = mount_at("/notes", StubApi::ok(), None).await;
    app.add_note(NoteDraft::new("keep", "")).await;
    let before = app.notes().items.clone();

    assert!(app.delete_note("mock-unknown").await);
    assert_eq!(app.notes().items, before);
}

#[tokio::test]
async fn reentering_notes_reseeds_local_list() {
    let (mut app, _) = mount_at("/notes", StubApi::ok(), None).await;
    app.add_note(NoteDraft::new("transient", "")).await;
    assert_eq!(app.notes().items.len(), 2);

    app.go("/").await;
    app.go("/notes").await;
    assert_eq!(app.notes().items.len(), 1);
}

#[tokio::test]
async fn notes_are_not_loaded_outside_the_notes_route() {
    let (mut app, _) = mount_at("/", StubApi::ok(), None).await;
    assert!(app.notes().items.is_empty());
    app.go("/about").await;
    assert!(app.notes().items.is_empty());
}
