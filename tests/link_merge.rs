use docdag::links::{LinkRecord, LinkSet};
use docdag::reactor::{ModulePath, ReverseScheduler};
use docdag_test_utils::builders::{fire_log, link, recording_action_with_links};
use docdag_test_utils::init_tracing;

#[test]
fn test_dedup_by_url_first_record_wins() {
    let mut set = LinkSet::new();
    assert!(set.insert(link("https://docs.example/api", "/first/location")));
    assert!(!set.insert(link("https://docs.example/api", "/second/location")));
    assert!(set.insert(link("https://docs.example/other", "/third/location")));

    let records: Vec<&LinkRecord> = set.iter().collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].location.to_str(), Some("/first/location"));
    assert_eq!(records[1].url, "https://docs.example/other");
}

#[test]
fn test_merge_keeps_first_seen_and_insertion_order() {
    let mut a = LinkSet::new();
    a.insert(link("https://one/", "/a/one"));
    a.insert(link("https://two/", "/a/two"));

    let mut b = LinkSet::new();
    b.insert(link("https://two/", "/b/two"));
    b.insert(link("https://three/", "/b/three"));

    a.merge(b);

    let records: Vec<&LinkRecord> = a.iter().collect();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].url, "https://one/");
    assert_eq!(records[1].url, "https://two/");
    assert_eq!(records[1].location.to_str(), Some("/a/two"));
    assert_eq!(records[2].url, "https://three/");
}

#[test]
fn test_parent_inherits_merged_child_links() {
    init_tracing();
    let log = fire_log();
    let mut scheduler = ReverseScheduler::new();

    let r = ModulePath::new("r").unwrap();
    let a = ModulePath::new("r/a").unwrap();
    let b = ModulePath::new("r/b").unwrap();

    scheduler
        .submit(
            &r,
            &["a".to_string(), "b".to_string()],
            recording_action_with_links(&log, "r", vec![link("https://r/", "/out/r")]),
        )
        .unwrap();
    scheduler
        .submit(
            &a,
            &[],
            recording_action_with_links(&log, "a", vec![link("https://a/", "/out/a")]),
        )
        .unwrap();
    scheduler
        .submit(
            &b,
            &[],
            recording_action_with_links(&log, "b", vec![link("https://b/", "/out/b")]),
        )
        .unwrap();

    let links = scheduler.finish().unwrap();
    let urls: Vec<&str> = links.iter().map(|r| r.url.as_str()).collect();
    // The parent's own record comes first, then the inherited child
    // records in completion order.
    assert_eq!(urls, vec!["https://r/", "https://a/", "https://b/"]);
}

#[test]
fn test_parent_record_wins_url_collision_with_child() {
    init_tracing();
    let log = fire_log();
    let mut scheduler = ReverseScheduler::new();

    scheduler
        .submit(
            &ModulePath::new("r").unwrap(),
            &["a".to_string()],
            recording_action_with_links(&log, "r", vec![link("https://shared/", "/out/r")]),
        )
        .unwrap();
    scheduler
        .submit(
            &ModulePath::new("r/a").unwrap(),
            &[],
            recording_action_with_links(&log, "a", vec![link("https://shared/", "/out/a")]),
        )
        .unwrap();

    let links = scheduler.finish().unwrap();
    let records: Vec<&LinkRecord> = links.iter().collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].location.to_str(), Some("/out/r"));
}

#[test]
fn test_grandchild_links_reach_the_root() {
    init_tracing();
    let log = fire_log();
    let mut scheduler = ReverseScheduler::new();

    scheduler
        .submit(
            &ModulePath::new("r").unwrap(),
            &["a".to_string()],
            recording_action_with_links(&log, "r", vec![]),
        )
        .unwrap();
    scheduler
        .submit(
            &ModulePath::new("r/a").unwrap(),
            &["b".to_string()],
            recording_action_with_links(&log, "a", vec![]),
        )
        .unwrap();
    scheduler
        .submit(
            &ModulePath::new("r/a/b").unwrap(),
            &[],
            recording_action_with_links(&log, "b", vec![link("https://deep/", "/out/deep")]),
        )
        .unwrap();

    let links = scheduler.finish().unwrap();
    assert!(links.contains_url("https://deep/"));
    assert_eq!(links.len(), 1);
}
