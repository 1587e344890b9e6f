use futures::executor::block_on;

use super::*;
use crate::config::SessionConfig;

fn service() -> HttpIdentityService {
    HttpIdentityService::new(SessionConfig::default().endpoints)
}

#[test]
fn http_service_keeps_configured_endpoints() {
    assert_eq!(service().endpoints().login_url(), "/api/auth/login");
}

#[test]
fn not_json_message_names_url() {
    let msg = not_json_message("/api/auth/login", &"expected value at line 1");
    assert_eq!(msg, "unexpected response from /api/auth/login: expected value at line 1");
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn login_outside_browser_is_transport_failure() {
    let err = block_on(service().login(&Credentials::new("a@x.com", "pw"))).unwrap_err();
    assert_eq!(err.error_code(), "E_TRANSPORT");
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn verify_outside_browser_is_transport_failure() {
    let verification = Verification { email: "a@x.com".to_owned(), code: "ABC123".to_owned() };
    let err = block_on(service().verify(&verification)).unwrap_err();
    assert!(matches!(err, IdentityError::Transport(_)));
}
