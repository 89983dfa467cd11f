use std::path::Path;
use std::sync::Arc;

use docdag::artifact::ArtifactId;
use docdag::config::UrlOverride;
use docdag::fs::mock::MockFileSystem;
use docdag::links::{ArtifactLinkCache, LinkRecord, LinkSet, UrlOverrideTable};
use docdag::resolve::{LinkResolver, ProjectMeta, ResolvedDependencies};
use docdag_test_utils::fakes::{FakeMetadata, FakeProbe};
use docdag_test_utils::init_tracing;

fn artifact(group: &str, name: &str, version: &str) -> ArtifactId {
    ArtifactId::new(group, name, version)
}

fn jar_meta(id: &ArtifactId, url: Option<&str>) -> ProjectMeta {
    ProjectMeta {
        id: id.clone(),
        packaging: "jar".to_string(),
        url: url.map(|u| u.to_string()),
        parent: None,
        modules: Vec::new(),
        dependencies: Vec::new(),
    }
}

fn resolver_with(
    metadata: &FakeMetadata,
    probe: &FakeProbe,
    overrides: Vec<UrlOverride>,
    offline: bool,
) -> LinkResolver {
    LinkResolver::new(
        Arc::new(MockFileSystem::new()),
        Box::new(metadata.clone()),
        Box::new(probe.clone()),
        UrlOverrideTable::new(overrides),
        offline,
    )
}

fn resolved(ids: &[ArtifactId]) -> ResolvedDependencies {
    ResolvedDependencies {
        resolved: ids.to_vec(),
        unresolved: Vec::new(),
    }
}

#[test]
fn test_cache_get_or_compute_memoizes() {
    init_tracing();
    let mut cache = ArtifactLinkCache::new();
    let id = artifact("com.example", "widget", "1.0");

    let mut computed = 0;
    let first = cache
        .get_or_compute(&id, || {
            computed += 1;
            let mut set = LinkSet::new();
            set.insert(LinkRecord::new("https://widget/", "/out/widget"));
            Ok(set)
        })
        .unwrap()
        .clone();

    // Second call must not invoke the closure, even though this one would
    // fail (the underlying source going away is irrelevant to a hit).
    let second = cache
        .get_or_compute(&id, || {
            computed += 1;
            Err(anyhow::anyhow!("source unavailable"))
        })
        .unwrap()
        .clone();

    assert_eq!(computed, 1);
    assert_eq!(first.len(), 1);
    assert_eq!(
        first.iter().map(|r| &r.url).collect::<Vec<_>>(),
        second.iter().map(|r| &r.url).collect::<Vec<_>>()
    );
}

#[test]
fn test_failed_computation_is_not_cached() {
    let mut cache = ArtifactLinkCache::new();
    let id = artifact("com.example", "widget", "1.0");

    let err = cache.get_or_compute(&id, || Err(anyhow::anyhow!("boom")));
    assert!(err.is_err());
    assert!(!cache.contains(&id));

    cache
        .get_or_compute(&id, || Ok(LinkSet::new()))
        .unwrap();
    assert!(cache.contains(&id));
}

#[test]
fn test_siblings_sharing_artifact_compute_links_once() {
    init_tracing();
    // Two sibling modules depend on the same external artifact; its links
    // must be computed once and both merged sets carry an identical record.
    let x = artifact("com.example", "shared", "2.0");
    let metadata = FakeMetadata::new();
    metadata.insert(jar_meta(&x, Some("https://shared.example/docs")));
    let probe = FakeProbe::new().everything_exists();
    let mut resolver = resolver_with(&metadata, &probe, Vec::new(), false);

    let first = resolver
        .links_for_module(Path::new("/proj/a/target/docdag"), &resolved(&[x.clone()]))
        .unwrap();
    let calls_after_first = metadata.calls();

    let second = resolver
        .links_for_module(Path::new("/proj/b/target/docdag"), &resolved(&[x.clone()]))
        .unwrap();

    assert_eq!(resolver.cache().len(), 1);
    assert_eq!(
        metadata.calls(),
        calls_after_first,
        "second lookup must be served from the cache"
    );

    let first_records: Vec<&LinkRecord> = first.iter().collect();
    let second_records: Vec<&LinkRecord> = second.iter().collect();
    assert_eq!(first_records, second_records);
    assert_eq!(first_records[0].url, "https://shared.example/docs/apidocs/");
}

#[test]
fn test_cached_links_survive_metadata_outage() {
    init_tracing();
    let x = artifact("com.example", "shared", "2.0");
    let metadata = FakeMetadata::new();
    metadata.insert(jar_meta(&x, Some("https://shared.example/docs")));
    let probe = FakeProbe::new().everything_exists();
    let mut resolver = resolver_with(&metadata, &probe, Vec::new(), false);

    let first = resolver
        .links_for_module(Path::new("/proj/a/out"), &resolved(&[x.clone()]))
        .unwrap();

    metadata.set_unavailable(true);
    let second = resolver
        .links_for_module(Path::new("/proj/b/out"), &resolved(&[x.clone()]))
        .unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(
        first.iter().map(|r| &r.url).collect::<Vec<_>>(),
        second.iter().map(|r| &r.url).collect::<Vec<_>>()
    );
}

#[test]
fn test_override_beats_metadata_and_substitutes_version() {
    init_tracing();
    let x = artifact("com.example", "widget", "3.1");
    let metadata = FakeMetadata::new();
    metadata.insert(jar_meta(&x, Some("https://ignored.example/")));
    let probe = FakeProbe::new().everything_exists();
    let overrides = vec![UrlOverride {
        dependency: "com.example:widget".to_string(),
        url: "https://docs.example/widget/@version/api/".to_string(),
    }];
    let mut resolver = resolver_with(&metadata, &probe, overrides, false);

    let links = resolver
        .links_for_module(Path::new("/out"), &resolved(&[x]))
        .unwrap();
    let urls: Vec<&str> = links.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["https://docs.example/widget/3.1/api/"]);
}

#[test]
fn test_first_matching_override_wins() {
    init_tracing();
    let x = artifact("com.example", "widget", "1.0");
    let metadata = FakeMetadata::new();
    let probe = FakeProbe::new().everything_exists();
    let overrides = vec![
        UrlOverride {
            dependency: "com.example:widget".to_string(),
            url: "https://first.example/".to_string(),
        },
        UrlOverride {
            dependency: "com.example:widget".to_string(),
            url: "https://second.example/".to_string(),
        },
    ];
    let mut resolver = resolver_with(&metadata, &probe, overrides, false);

    let links = resolver
        .links_for_module(Path::new("/out"), &resolved(&[x]))
        .unwrap();
    let urls: Vec<&str> = links.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["https://first.example/"]);
}

#[test]
fn test_unresolved_dependencies_contribute_nothing() {
    init_tracing();
    let metadata = FakeMetadata::new();
    let probe = FakeProbe::new().everything_exists();
    let mut resolver = resolver_with(&metadata, &probe, Vec::new(), false);

    let deps = ResolvedDependencies {
        resolved: Vec::new(),
        unresolved: vec![artifact("com.example", "missing", "1.0")],
    };
    let links = resolver.links_for_module(Path::new("/out"), &deps).unwrap();
    assert!(links.is_empty());
    assert!(resolver.cache().is_empty());
}

#[test]
fn test_javadoc_io_fallback_without_metadata() {
    init_tracing();
    // No metadata at all: the conventional javadoc.io url is used.
    let x = artifact("com.example", "lost", "1.0-SNAPSHOT");
    let metadata = FakeMetadata::new();
    let probe = FakeProbe::new().everything_exists();
    let mut resolver = resolver_with(&metadata, &probe, Vec::new(), false);

    let links = resolver
        .links_for_module(Path::new("/out"), &resolved(&[x]))
        .unwrap();
    let urls: Vec<&str> = links.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["https://www.javadoc.io/doc/com.example/lost/1.0"]);
}

#[test]
fn test_unreachable_documentation_is_skipped_not_fatal() {
    init_tracing();
    let x = artifact("com.example", "gone", "1.0");
    let metadata = FakeMetadata::new();
    metadata.insert(jar_meta(&x, Some("https://gone.example/docs")));
    let probe = FakeProbe::new(); // nothing exists
    let mut resolver = resolver_with(&metadata, &probe, Vec::new(), false);

    let links = resolver
        .links_for_module(Path::new("/out"), &resolved(&[x]))
        .unwrap();
    assert!(links.is_empty());
    assert_eq!(probe.probed().len(), 1);
}

#[test]
fn test_offline_mode_never_probes() {
    init_tracing();
    let x = artifact("com.example", "widget", "1.0");
    let metadata = FakeMetadata::new();
    metadata.insert(jar_meta(&x, Some("https://widget.example/docs")));
    let probe = FakeProbe::new(); // would report everything missing
    let mut resolver = resolver_with(&metadata, &probe, Vec::new(), true);

    let links = resolver
        .links_for_module(Path::new("/out"), &resolved(&[x]))
        .unwrap();
    assert_eq!(links.len(), 1);
    assert!(probe.probed().is_empty());
    assert!(probe.fetched().is_empty());
}

#[test]
fn test_aggregator_folds_sub_artifact_sets() {
    init_tracing();
    let agg = artifact("com.example", "parent-bundle", "1.0");
    let sub1 = artifact("com.example", "core", "1.0");
    let sub2 = artifact("com.example", "extras", "1.0");

    let metadata = FakeMetadata::new();
    metadata.insert(ProjectMeta {
        id: agg.clone(),
        packaging: "pom".to_string(),
        url: None,
        parent: None,
        modules: Vec::new(),
        dependencies: vec![
            docdag::resolve::DeclaredDep {
                group_id: sub1.group_id.clone(),
                artifact_id: sub1.artifact_id.clone(),
                version: Some(sub1.version.clone()),
            },
            docdag::resolve::DeclaredDep {
                group_id: sub2.group_id.clone(),
                artifact_id: sub2.artifact_id.clone(),
                version: Some(sub2.version.clone()),
            },
        ],
    });
    metadata.insert(jar_meta(&sub1, Some("https://core.example/")));
    metadata.insert(jar_meta(&sub2, Some("https://extras.example/")));

    let probe = FakeProbe::new().everything_exists();
    let mut resolver = resolver_with(&metadata, &probe, Vec::new(), false);

    let links = resolver
        .links_for_module(Path::new("/out"), &resolved(&[agg.clone()]))
        .unwrap();
    let urls: Vec<&str> = links.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://core.example/apidocs/",
            "https://extras.example/apidocs/"
        ]
    );
    // The aggregator and both sub-artifacts are now cached.
    assert_eq!(resolver.cache().len(), 3);
    assert!(resolver.cache().contains(&agg));
}

#[test]
fn test_snapshot_suffix_stripped_from_javadoc_io_url() {
    let id = artifact("org.acme", "thing", "2.3-SNAPSHOT");
    assert_eq!(
        id.javadoc_io_url(),
        "https://www.javadoc.io/doc/org.acme/thing/2.3"
    );
}
