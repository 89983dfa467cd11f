use std::path::Path;

use docdag::fs::mock::MockFileSystem;
use docdag::javadoc::{ELEMENT_LIST, PACKAGE_LIST, normalize_package_list};
use docdag_test_utils::init_tracing;

#[test]
fn test_element_list_copied_when_package_list_absent() {
    init_tracing();
    let fs = MockFileSystem::new();
    let dest = Path::new("/out/com.example/widget-1.0");
    fs.add_file(dest.join(ELEMENT_LIST), "com.example.widget\n");

    let copied = normalize_package_list(&fs, dest).unwrap();
    assert!(copied);
    assert_eq!(
        fs.contents(dest.join(PACKAGE_LIST)).as_deref(),
        Some("com.example.widget\n")
    );
}

#[test]
fn test_existing_package_list_left_untouched() {
    let fs = MockFileSystem::new();
    let dest = Path::new("/out/com.example/widget-1.0");
    fs.add_file(dest.join(PACKAGE_LIST), "original\n");
    fs.add_file(dest.join(ELEMENT_LIST), "newer\n");

    let copied = normalize_package_list(&fs, dest).unwrap();
    assert!(!copied);
    assert_eq!(
        fs.contents(dest.join(PACKAGE_LIST)).as_deref(),
        Some("original\n")
    );
}

#[test]
fn test_missing_destination_is_not_an_error() {
    let fs = MockFileSystem::new();
    let copied = normalize_package_list(&fs, Path::new("/out/never-unpacked")).unwrap();
    assert!(!copied);
}

#[test]
fn test_io_failure_propagates() {
    let fs = MockFileSystem::new();
    let dest = Path::new("/out/com.example/widget-1.0");
    fs.add_file(dest.join(ELEMENT_LIST), "com.example.widget\n");
    fs.poison(dest.join(PACKAGE_LIST));

    let err = normalize_package_list(&fs, dest).unwrap_err();
    assert!(format!("{err:#}").contains("normalizing package index"));
}
