mod common;

use registrar::api::entity::Entity;
use registrar::client::SESSION_EXPIRED_MESSAGE;
use registrar::console::Console;
use registrar::dispatch::UiState;
use registrar::feedback::Banners;
use registrar::session::storage::{FileStorage, MemoryStorage};
use registrar::session::{Session, SessionStore};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{console, logged_in_storage, mint_token, received_count};

type TestConsole = Console<MemoryStorage, Banners>;

fn students() -> serde_json::Value {
    json!([
        {"id": 5, "nome": "Ana", "cpf": "12345678901"},
        {"id": 6, "nome": "Bia", "cpf": "98765432100"},
    ])
}

#[tokio::test]
async fn login_opens_student_list() {
    let server = MockServer::start().await;
    let token = mint_token("ana", 3600);
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": token,
            "username": "ana",
            "userId": 7,
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/aluno"))
        .respond_with(ResponseTemplate::new(200).set_body_json(students()))
        .mount(&server)
        .await;

    let mut c = console(&server.uri(), MemoryStorage::new());
    assert_eq!(c.state(), UiState::LoggedOut);

    assert!(c.login("ana", "secret").await);
    assert_eq!(c.state(), UiState::LoggedIn);
    assert_eq!(c.entity(), Some(Entity::Student));
    assert_eq!(c.records().len(), 2);
    assert_eq!(c.find(6).unwrap()["nome"], "Bia");
    assert_eq!(c.feedback().success(), Some("login successful"));
    assert!(c.feedback().error().is_none());

    let session = c.dispatcher().session().current().unwrap();
    assert_eq!(session.username(), "ana");
    assert_eq!(session.user_id(), 7);
}

#[tokio::test]
async fn load_requires_session() {
    let server = MockServer::start().await;
    let mut c = console(&server.uri(), MemoryStorage::new());

    assert!(c.load(Entity::Professor).await.is_none());
    assert_eq!(
        c.feedback().error(),
        Some(TestConsole::LOGIN_REQUIRED_MESSAGE)
    );
    assert_eq!(received_count(&server).await, 0);
}

#[tokio::test]
async fn load_empty_body_is_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/disciplina"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let token = mint_token("ana", 3600);
    let mut c = console(&server.uri(), logged_in_storage(&token));
    assert_eq!(c.load(Entity::Subject).await.map(|r| r.len()), Some(0));
    assert_eq!(c.entity(), Some(Entity::Subject));
}

#[tokio::test]
async fn rejected_token_returns_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/aluno"))
        .respond_with(ResponseTemplate::new(200).set_body_json(students()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/aluno"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    // Still valid locally, but the server has revoked it.
    let token = mint_token("ana", 3600);
    let mut c = console(&server.uri(), logged_in_storage(&token));
    assert_eq!(c.state(), UiState::LoggedIn);
    assert!(c.load(Entity::Student).await.is_some());

    assert!(c.load(Entity::Student).await.is_none());
    assert_eq!(c.state(), UiState::LoggedOut);
    assert_eq!(c.entity(), None);
    assert!(c.records().is_empty());
    assert_eq!(c.feedback().error(), Some(SESSION_EXPIRED_MESSAGE));
}

#[tokio::test]
async fn delete_reloads_and_reports() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/aluno/5"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/aluno"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 6, "nome": "Bia"}])),
        )
        .mount(&server)
        .await;

    let token = mint_token("ana", 3600);
    let mut c = console(&server.uri(), logged_in_storage(&token));

    assert!(!c.delete(Entity::Student, 5, false).await);
    assert_eq!(received_count(&server).await, 0);

    assert!(c.delete(Entity::Student, 5, true).await);
    assert_eq!(c.records().len(), 1);
    assert!(c.find(5).is_none());
    assert!(c.feedback().error().is_none());
    assert_eq!(
        c.feedback().success(),
        Some("Student deleted successfully")
    );
}

#[tokio::test]
async fn create_and_update_report_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/professor"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/professor/3"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/professor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 3}])))
        .mount(&server)
        .await;

    let token = mint_token("ana", 3600);
    let mut c = console(&server.uri(), logged_in_storage(&token));

    let payload = json!({"nome": "Carla", "email": "carla@school.org"});
    let created = c.create(Entity::Professor, &payload).await.unwrap();
    assert_eq!(created["id"], 3);
    assert_eq!(
        c.feedback().success(),
        Some("Professor saved successfully")
    );

    assert!(c.update(Entity::Professor, 3, &payload).await);
    assert_eq!(
        c.feedback().success(),
        Some("Professor updated successfully")
    );
    assert_eq!(c.entity(), Some(Entity::Professor));
}

#[tokio::test]
async fn reload_expiry_wins_over_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/nota"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/nota"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let token = mint_token("ana", 3600);
    let mut c = console(&server.uri(), logged_in_storage(&token));

    assert!(c.create(Entity::Grade, &json!({"valor": 9.5})).await.is_some());
    assert_eq!(c.state(), UiState::LoggedOut);
    assert_eq!(c.feedback().error(), Some(SESSION_EXPIRED_MESSAGE));
    assert!(c.feedback().success().is_none());
}

#[tokio::test]
async fn reload_failure_is_not_reported_as_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/turma"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 4})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/turma"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    let token = mint_token("ana", 3600);
    let mut c = console(&server.uri(), logged_in_storage(&token));

    let created = c.create(Entity::Section, &json!({"ano": 2024})).await;
    assert_eq!(created, Some(json!({"id": 4})));
    assert_eq!(c.state(), UiState::LoggedIn);
    assert_eq!(
        c.feedback().error(),
        Some("failed to load data: HTTP 500: down")
    );
    assert!(c.feedback().success().is_none());
}

#[tokio::test]
async fn register_works_logged_in_or_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&server)
        .await;

    let mut c = console(&server.uri(), MemoryStorage::new());
    assert!(c.register("bia", "secret", "bia@school.org").await);
    assert_eq!(
        c.feedback().success(),
        Some(TestConsole::ACCOUNT_CREATED_MESSAGE)
    );

    let token = mint_token("ana", 3600);
    let mut c = console(&server.uri(), logged_in_storage(&token));
    assert!(c.register("cid", "secret", "cid@school.org").await);
    assert_eq!(c.state(), UiState::LoggedIn);

    for request in server.received_requests().await.unwrap() {
        assert!(!request.headers.contains_key("authorization"));
    }
}

#[tokio::test]
async fn file_session_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let token = mint_token("ana", 3600);

    let mut store = SessionStore::open(FileStorage::new(dir.path()).unwrap());
    store.save(Session::new(token.as_str(), "ana", 7)).unwrap();
    drop(store);

    let c = console("http://localhost:8080", FileStorage::new(dir.path()).unwrap());
    assert_eq!(c.state(), UiState::LoggedIn);
    let session = c.dispatcher().session().current().unwrap();
    assert_eq!(session.token, token);
    assert_eq!(session.username(), "ana");

    let mut c = c;
    assert!(c.logout(true));
    let store = SessionStore::open(FileStorage::new(dir.path()).unwrap());
    assert!(store.load().is_none());
}
