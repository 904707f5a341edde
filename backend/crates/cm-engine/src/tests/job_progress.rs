use crate::job_progress::percent;
use crate::{JobKind, JobProgress, JobState};

use googletest::prelude::*;

#[test]
fn given_partial_work_when_percent_then_rounds_down() {
    assert_that!(percent(1, 3), eq(33));
    assert_that!(percent(3, 3), eq(100));
}

#[test]
fn given_no_work_when_percent_then_complete() {
    assert_that!(percent(0, 0), eq(100));
}

#[test]
fn given_report_above_hundred_when_snapshot_then_clamped() {
    // Given
    let progress = JobProgress::detached(JobKind::Export);

    // When
    progress.report(150, "processing Home");

    // Then
    let status = progress.snapshot();
    assert_that!(status.percent, eq(100));
    assert_that!(status.message, some(eq("processing Home")));
}

#[test]
fn given_cancelled_outcome_when_finished_then_percent_kept() {
    // Given
    let progress = JobProgress::detached(JobKind::Import);
    progress.report(40, "installing Home");

    // When
    progress.finish(JobState::Cancelled, serde_json::Value::Null);

    // Then
    let status = progress.snapshot();
    assert_that!(status.state, eq(JobState::Cancelled));
    assert_that!(status.percent, eq(40));
    assert_that!(status.finished_at.is_some(), eq(true));
}

#[test]
fn given_failure_when_failed_then_error_recorded() {
    // Given
    let progress = JobProgress::detached(JobKind::Validate);

    // When
    progress.fail("archive missing");

    // Then
    let status = progress.snapshot();
    assert_that!(status.state, eq(JobState::Failed));
    assert_that!(status.state.is_terminal(), eq(true));
    assert_that!(status.error, some(eq("archive missing")));
}
