//! End-to-end session flows across several contexts sharing one storage scope.

use std::rc::Rc;

use careline_session::net::scripted::ScriptedIdentityService;
use careline_session::net::types::AuthPayload;
use careline_session::storage::memory::MemoryScope;
use careline_session::{
    Credentials, IdentityError, Role, SessionConfig, SessionPhase, SessionRuntime, User, landing_path,
};
use futures::executor::block_on;

struct Context {
    service: Rc<ScriptedIdentityService>,
    runtime: SessionRuntime,
}

fn open(scope: &MemoryScope) -> Context {
    let config = SessionConfig::default();
    let storage = scope.context();
    let service = Rc::new(ScriptedIdentityService::new());
    let manager = careline_session::SessionManager::new(service.clone(), Rc::new(storage.clone()), &config);
    let runtime = SessionRuntime::new(manager, &storage, config.storage_keys);
    Context { service, runtime }
}

#[test]
fn bad_credentials_leave_context_anonymous_with_message() {
    let scope = MemoryScope::new();
    let ctx = open(&scope);
    ctx.service.push_login(Err(IdentityError::Rejected { status: 401, message: "Invalid credentials".to_owned() }));

    let result = block_on(ctx.runtime.manager().login(&Credentials::new("a@x.com", "wrong")));

    assert!(result.is_err());
    let session = ctx.runtime.manager().snapshot();
    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert_eq!(session.error.as_deref(), Some("Invalid credentials"));
    assert!(!session.is_loading);
}

#[test]
fn clinician_login_persists_and_routes_to_clinician_area() {
    let scope = MemoryScope::new();
    let ctx = open(&scope);
    ctx.service.push_login(Ok(AuthPayload { access_token: "tok123".to_owned(), user: User::new("u1", Role::Clinician) }));

    let user = block_on(ctx.runtime.manager().login(&Credentials::new("doc@x.com", "pw"))).unwrap();

    assert_eq!(ctx.runtime.manager().snapshot().phase(), SessionPhase::Authenticated);
    assert_eq!(scope.peek("careline_token").as_deref(), Some("tok123"));
    assert!(scope.peek("careline_user").is_some());
    assert_eq!(landing_path(&user.role), "/clinician");
}

#[test]
fn reload_restores_identical_session() {
    let scope = MemoryScope::new();
    let before = {
        let ctx = open(&scope);
        ctx.runtime.manager().set_auth_data("tok", User::new("u5", Role::Admin));
        ctx.runtime.manager().snapshot()
    };

    let reloaded = open(&scope);

    assert_eq!(reloaded.runtime.manager().snapshot().auth, before.auth);
}

#[test]
fn three_tabs_converge_after_logout() {
    let scope = MemoryScope::new();
    let tabs: Vec<Context> = (0..3).map(|_| open(&scope)).collect();
    tabs[0].runtime.manager().set_auth_data("tok", User::new("u1", Role::Patient));
    assert!(tabs.iter().all(|t| t.runtime.manager().is_authenticated()));

    tabs[2].runtime.manager().logout();

    assert!(tabs.iter().all(|t| !t.runtime.manager().is_authenticated()));
    assert!(scope.is_empty());
}
