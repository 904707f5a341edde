use crate::tests::jwt::{SECRET, create_test_token, valid_claims};
use crate::{AuthError, Authenticator, JwtValidator};

use std::sync::Arc;

use googletest::prelude::*;

fn enabled() -> Authenticator {
    Authenticator::new(Some(Arc::new(JwtValidator::with_hs256(SECRET))), "admin")
}

#[test]
fn given_auth_disabled_when_credentials_given_then_used_as_user() {
    let authenticator = Authenticator::disabled("admin");

    let user = authenticator.authenticate(Some("bob")).unwrap();

    assert_that!(user.user.as_str(), eq("bob"));
}

#[test]
fn given_auth_disabled_when_no_credentials_then_default_user() {
    let authenticator = Authenticator::disabled("admin");

    let user = authenticator.authenticate(None).unwrap();

    assert_that!(user.user.as_str(), eq("admin"));
    assert_that!(authenticator.is_enabled(), eq(false));
}

#[test]
fn given_auth_enabled_when_bearer_token_then_subject_is_user() {
    let token = create_test_token(&valid_claims(), SECRET);

    let user = enabled()
        .authenticate(Some(&format!("Bearer {}", token)))
        .unwrap();

    assert_that!(user.user.as_str(), eq("alice"));
    assert_that!(user.roles, elements_are![eq("admin")]);
}

#[test]
fn given_auth_enabled_when_bare_token_then_accepted() {
    let token = create_test_token(&valid_claims(), SECRET);

    let result = enabled().authenticate(Some(&token));

    assert_that!(result, ok(anything()));
}

#[test]
fn given_auth_enabled_when_no_credentials_then_missing_credentials() {
    let result = enabled().authenticate(Some("  "));

    assert!(matches!(result, Err(AuthError::MissingCredentials { .. })));
}

#[test]
fn given_auth_enabled_when_basic_scheme_then_invalid_scheme() {
    let result = enabled().authenticate(Some("Basic dXNlcjpwYXNz"));

    assert!(matches!(result, Err(AuthError::InvalidScheme { .. })));
}
