//! End-to-end tests: the HTTP client and its note cache against a live server
//!
//! Each test binds its own server on an ephemeral port with an in-memory
//! database, so tests are independent and need no fixtures.

use stickynotes_backend::auth::JwtHandler;
use stickynotes_backend::client::{ClientError, FetchStatus, NotesClient, NotesStore};
use stickynotes_backend::notes::models::{CreateNoteRequest, UpdateNoteRequest};
use stickynotes_backend::{build_router, AppState, Database};
use tokio::net::TcpListener;

const SECRET: &str = "integration-test-secret";

async fn spawn_server() -> String {
    let db = Database::in_memory().unwrap();
    let state = AppState::new(db, JwtHandler::new(SECRET), 4);
    let app = build_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

async fn logged_in_client(base_url: &str, name: &str, email: &str) -> NotesClient {
    let mut client = NotesClient::new(base_url).unwrap();
    client.signup(name, email, "correct horse").await.unwrap();
    client.login(email, "correct horse").await.unwrap();
    assert!(client.token().is_some());
    client
}

fn note(title: &str, content: &str) -> CreateNoteRequest {
    CreateNoteRequest {
        note_title: title.to_string(),
        note_content: content.to_string(),
        color: None,
    }
}

#[tokio::test]
async fn test_signup_login_and_current_user() {
    let base_url = spawn_server().await;
    let client = logged_in_client(&base_url, "Ada", "ada@example.com").await;

    let me = client.current_user().await.unwrap();
    assert_eq!(me.user_name, "Ada");
    assert_eq!(me.user_email, "ada@example.com");
}

#[tokio::test]
async fn test_duplicate_signup_is_rejected_with_server_message() {
    let base_url = spawn_server().await;
    let client = NotesClient::new(&base_url).unwrap();
    client.signup("Ada", "ada@example.com", "pw").await.unwrap();

    let err = client
        .signup("Other Ada", "ADA@example.com", "pw")
        .await
        .unwrap_err();
    match err {
        ClientError::Rejected(message) => assert_eq!(message, "Email already registered"),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let base_url = spawn_server().await;
    let mut client = NotesClient::new(&base_url).unwrap();
    client.signup("Ada", "ada@example.com", "right").await.unwrap();

    let err = client.login("ada@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    assert!(client.token().is_none());
}

#[tokio::test]
async fn test_store_fetch_create_update_delete_cycle() {
    let base_url = spawn_server().await;
    let client = logged_in_client(&base_url, "Ada", "ada@example.com").await;
    let mut store = NotesStore::new(client);

    assert_eq!(store.status(), FetchStatus::Idle);
    assert!(store.fetch_all().await.unwrap().is_empty());
    assert_eq!(store.status(), FetchStatus::Succeeded);

    // Create re-fetches, so the cache holds the new note
    let first = store.create(note("First", "one")).await.unwrap();
    assert_eq!(first.color, "#ffffff");
    let second = store
        .create(CreateNoteRequest {
            color: Some("#FFC107".to_string()),
            ..note("Second", "two")
        })
        .await
        .unwrap();
    let ids: Vec<_> = store.items().iter().map(|n| n.note_id.clone()).collect();
    assert_eq!(ids, vec![first.note_id.clone(), second.note_id.clone()]);

    // Search runs over the refreshed cache
    let found: Vec<_> = store.search("SECOND").iter().map(|n| n.note_id.clone()).collect();
    assert_eq!(found, vec![second.note_id.clone()]);
    assert_eq!(store.search("").len(), 2);

    // Partial update keeps untouched fields
    let updated = store
        .update(
            &first.note_id,
            UpdateNoteRequest {
                note_content: Some("one, revised".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.note_title, "First");
    assert_eq!(updated.note_content, "one, revised");
    assert!(updated.last_update > first.last_update);
    assert_eq!(store.items()[0].note_content, "one, revised");

    store.delete(&first.note_id).await.unwrap();
    assert_eq!(store.items().len(), 1);
    assert_eq!(store.items()[0].note_id, second.note_id);
    assert_eq!(store.status(), FetchStatus::Succeeded);
    assert!(store.error().is_none());

    // Deleting again is a not-found, and the cache is left alone
    let err = store.delete(&first.note_id).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound));
    assert_eq!(store.items().len(), 1);
    assert_eq!(store.error(), Some("That note could not be found"));
}

#[tokio::test]
async fn test_notes_are_private_to_their_owner() {
    let base_url = spawn_server().await;
    let ada = logged_in_client(&base_url, "Ada", "ada@example.com").await;
    let bob = logged_in_client(&base_url, "Bob", "bob@example.com").await;

    let secret = ada.create_note(&note("Ada's", "private")).await.unwrap();

    assert!(bob.list_notes().await.unwrap().is_empty());
    assert!(matches!(
        bob.get_note(&secret.note_id).await.unwrap_err(),
        ClientError::NotFound
    ));
    assert!(matches!(
        bob.delete_note(&secret.note_id).await.unwrap_err(),
        ClientError::NotFound
    ));

    // Still there for its owner
    let fetched = ada.get_note(&secret.note_id).await.unwrap();
    assert_eq!(fetched.note_content, "private");
}

#[tokio::test]
async fn test_missing_token_fails_fetch() {
    let base_url = spawn_server().await;
    let mut store = NotesStore::new(NotesClient::new(&base_url).unwrap());

    let err = store.fetch_all().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    assert_eq!(store.status(), FetchStatus::Failed);
    assert!(store.error().is_some());
}

#[tokio::test]
async fn test_validation_message_reaches_client() {
    let base_url = spawn_server().await;
    let client = logged_in_client(&base_url, "Ada", "ada@example.com").await;

    let err = client.create_note(&note("", "no title")).await.unwrap_err();
    match err {
        ClientError::Rejected(message) => assert_eq!(message, "Title and content are required"),
        other => panic!("expected Rejected, got {other:?}"),
    }
}
