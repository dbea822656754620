//! Session persistence tests
//!
//! File-backed session record: on-disk shape, corrupt files, guard outcomes.

use std::sync::Arc;

use tempfile::TempDir;

use binj::api::TmdbClient;
use binj::pages::{HomeController, PageLoad, Redirect};
use binj::session::{
    Access, FileSessionStore, GatedPage, LoginFailure, SessionContext, SessionStore,
    SESSION_FILE,
};

fn context(dir: &TempDir) -> SessionContext {
    SessionContext::file(dir.path().join(SESSION_FILE))
}

#[test]
fn test_login_writes_camel_case_record() {
    let dir = TempDir::new().unwrap();
    let session = context(&dir);

    session.login("jane@example.com", "secret1").unwrap();
    session.subscribe("premium").unwrap();

    let raw = std::fs::read_to_string(dir.path().join(SESSION_FILE)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["email"], "jane@example.com");
    assert_eq!(json["loggedIn"], true);
    assert_eq!(json["subscription"], "premium");
    assert!(json["loginTime"].is_i64());
    assert!(json["subscriptionDate"].is_i64());
}

#[test]
fn test_record_survives_new_context() {
    let dir = TempDir::new().unwrap();
    context(&dir).login("jane@example.com", "secret1").unwrap();
    context(&dir).subscribe("basic").unwrap();

    match context(&dir).guard(GatedPage::Search) {
        Access::Granted(record) => {
            assert_eq!(record.email, "jane@example.com");
            assert_eq!(record.plan_label(), "Plan basic");
        }
        other => panic!("expected access, got {:?}", other),
    }
}

#[test]
fn test_reads_record_written_elsewhere() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(SESSION_FILE),
        r#"{"email":"a@b.fr","loggedIn":true,"loginTime":1700000000000,"subscription":"standard","subscriptionDate":1700000100000}"#,
    )
    .unwrap();

    let record = context(&dir).current().unwrap();
    assert!(record.logged_in);
    assert_eq!(record.login_time.timestamp_millis(), 1_700_000_000_000);
    assert_eq!(record.subscription.as_deref(), Some("standard"));
}

#[test]
fn test_corrupt_file_counts_as_no_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(SESSION_FILE);
    std::fs::write(&path, "{not json").unwrap();

    let store = FileSessionStore::new(&path);
    assert!(store.load().is_err());

    let session = context(&dir);
    assert!(session.current().is_none());
    assert_eq!(session.guard(GatedPage::Home), Access::RedirectToLogin);
}

#[test]
fn test_logout_without_file_is_ok() {
    let dir = TempDir::new().unwrap();
    let session = context(&dir);
    assert!(session.logout().is_ok());
    assert!(session.current().is_none());
}

#[test]
fn test_store_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b").join(SESSION_FILE);
    let session = SessionContext::file(&nested);

    session.login("jane@example.com", "secret1").unwrap();
    assert!(nested.exists());
}

#[test]
fn test_unwritable_record_fails_login() {
    let dir = TempDir::new().unwrap();
    // A plain file where the session directory should be
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let session = SessionContext::file(blocker.join(SESSION_FILE));

    let err = session.login("jane@example.com", "secret1").unwrap_err();
    assert!(matches!(err, LoginFailure::Storage(_)));
    assert_eq!(err.to_string(), "Erreur de connexion. Vérifiez vos identifiants.");
    assert!(session.current().is_none());
}

#[test]
fn test_logged_out_record_redirects_home() {
    let dir = TempDir::new().unwrap();
    let session = context(&dir);
    // A plan chosen before logging in leaves a record that is not logged in
    session.subscribe("standard").unwrap();

    let client = Arc::new(TmdbClient::with_base_url("k", "t", "http://127.0.0.1:9"));
    let home = HomeController::new(client, session);
    let outcome = tokio_test::block_on(home.load());
    assert_eq!(outcome, PageLoad::Redirect(Redirect::Login));
}
