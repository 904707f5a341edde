use crate::RequestContext;

use googletest::prelude::*;

#[test]
fn given_session_request_when_log_prefix_then_user_and_short_session_shown() {
    // Given
    let ctx = RequestContext::new("alice", "0123456789abcdef");

    // When
    let prefix = ctx.log_prefix();

    // Then
    assert_that!(prefix, contains_substring("user=alice"));
    assert_that!(prefix, contains_substring("session=01234567]"));
}

#[test]
fn given_connect_request_when_log_prefix_then_placeholders_shown() {
    // Given
    let ctx = RequestContext::new("", "");

    // When
    let prefix = ctx.log_prefix();

    // Then
    assert_that!(prefix, contains_substring("user=- session=-]"));
}

#[test]
fn given_two_requests_when_created_then_sequence_increases() {
    let first = RequestContext::new("alice", "s1");
    let second = RequestContext::new("alice", "s1");

    assert_that!(second.request_seq, gt(first.request_seq));
}
