use crate::tests::{create_dependency, create_test_info};
use crate::{ArchiveWriter, archive_file_name, list_archives};

use cm_core::DependencyKey;

use googletest::prelude::*;
use tempfile::TempDir;

fn write_archive(dir: &std::path::Path, name: &str) {
    let root = DependencyKey::new("site", name);
    let mut writer = ArchiveWriter::create(dir, name).unwrap();
    writer.begin_package(&root, name);
    writer
        .add_object(&create_dependency("site", name), &root, Vec::new(), b"x")
        .unwrap();
    writer.finish(&create_test_info(name)).unwrap();
}

#[test]
fn given_archives_and_stray_files_when_listed_then_only_archives_sorted() {
    // Given
    let dir = TempDir::new().unwrap();
    write_archive(dir.path(), "beta");
    write_archive(dir.path(), "alpha");
    std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
    std::fs::write(dir.path().join(".gamma.zip.1234.partial"), "partial").unwrap();
    std::fs::write(dir.path().join("broken.zip"), "not a zip").unwrap();

    // When
    let summaries = list_archives(dir.path()).unwrap();

    // Then
    let names: Vec<&str> = summaries.iter().map(|s| s.archive_ref.as_str()).collect();
    assert_that!(names, elements_are![eq(&"alpha.zip"), eq(&"beta.zip")]);
    assert_that!(summaries[0].object_count, eq(1));
}

#[test]
fn given_missing_directory_when_listed_then_empty() {
    // Given
    let dir = TempDir::new().unwrap();

    // When
    let summaries = list_archives(&dir.path().join("absent")).unwrap();

    // Then
    assert_that!(summaries, is_empty());
}

#[test]
fn given_names_when_archive_file_name_then_zip_suffix_once() {
    assert_that!(archive_file_name("release").unwrap().as_str(), eq("release.zip"));
    assert_that!(archive_file_name("release.zip").unwrap().as_str(), eq("release.zip"));
    assert!(archive_file_name("a/b").is_err());
    assert!(archive_file_name("").is_err());
}
