use crate::{SessionError, SessionRegistry};

use std::time::Duration;

use googletest::prelude::*;

#[test]
fn given_idle_sessions_when_reaped_then_only_kept_ones_survive() {
    // Given
    let registry = SessionRegistry::new();
    let holder = registry.register("alice");
    let stale = registry.register("bob");

    // When
    let removed = registry.reap_idle(Duration::ZERO, |id| id == holder.id);

    // Then
    assert_that!(removed, eq(1));
    assert_that!(registry.is_live(&holder.id), eq(true));
    assert!(matches!(
        registry.get(&stale.id),
        Err(SessionError::SessionNotFound { .. })
    ));
}

#[test]
fn given_recently_active_session_when_reaped_then_kept() {
    // Given
    let registry = SessionRegistry::new();
    let session = registry.register("alice");
    registry.get(&session.id).unwrap();

    // When
    let removed = registry.reap_idle(Duration::from_secs(60), |_| false);

    // Then
    assert_that!(removed, eq(0));
    assert_that!(registry.count(), eq(1));
}

#[test]
fn given_removed_session_when_looked_up_then_not_found() {
    // Given
    let registry = SessionRegistry::new();
    let session = registry.register("alice");

    // When
    let removed = registry.remove(&session.id);

    // Then
    assert_that!(removed.map(|s| s.user), some(eq("alice")));
    assert_that!(registry.is_live(&session.id), eq(false));
}
