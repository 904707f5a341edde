use crate::tests::create_test_info;
use crate::{ArchiveError, check_compatibility};

use googletest::prelude::*;

#[test]
fn given_same_build_when_checked_then_no_warnings() {
    let info = create_test_info("release");

    let warnings = check_compatibility(&info, "100", true).unwrap();

    assert_that!(warnings, is_empty());
}

#[test]
fn given_build_mismatch_and_warn_when_checked_then_warning() {
    let info = create_test_info("release");

    let warnings = check_compatibility(&info, "200", true).unwrap();

    assert_that!(warnings, len(eq(1)));
}

#[test]
fn given_build_mismatch_without_warn_when_checked_then_error() {
    let info = create_test_info("release");

    let result = check_compatibility(&info, "200", false);

    assert!(matches!(result, Err(ArchiveError::BuildMismatch { .. })));
}

#[test]
fn given_newer_format_version_when_checked_then_unsupported() {
    let mut info = create_test_info("release");
    info.format_version = cm_core::ARCHIVE_FORMAT_VERSION + 1;

    let result = check_compatibility(&info, "100", true);

    assert!(matches!(result, Err(ref e) if e.is_compatibility()));
}

#[test]
fn given_incomplete_archive_when_checked_then_warning() {
    let mut info = create_test_info("release");
    info.complete = false;

    let warnings = check_compatibility(&info, "100", true).unwrap();

    assert_that!(warnings, len(eq(1)));
}
