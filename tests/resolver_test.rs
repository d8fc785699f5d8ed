mod common;

use cdf_file_uploader::models::ContainerId;
use cdf_file_uploader::services::resolver::{ContainerResolver, TargetErrorPolicy};
use common::InMemoryCdf;
use std::sync::Arc;
use std::sync::atomic::Ordering;

fn id(raw: &str) -> ContainerId {
    ContainerId::parse(raw).unwrap()
}

#[tokio::test]
async fn test_existing_target_is_used() {
    let cdf = Arc::new(InMemoryCdf::with_spaces(&["proj_space"]));
    let resolver = ContainerResolver::new(cdf.clone());

    let resolved = resolver
        .resolve(&id("proj_space"), &id("demo_space"))
        .await
        .unwrap();

    assert_eq!(resolved.as_str(), "proj_space");
    assert_eq!(cdf.retrieve_calls.load(Ordering::SeqCst), 1);
    assert_eq!(cdf.create_calls.load(Ordering::SeqCst), 0);
    assert!(!cdf.has_space("demo_space"));
}

#[tokio::test]
async fn test_missing_target_uses_existing_fallback() {
    let cdf = Arc::new(InMemoryCdf::with_spaces(&["demo_space"]));
    let resolver = ContainerResolver::new(cdf.clone());

    let resolved = resolver
        .resolve(&id("proj_space"), &id("demo_space"))
        .await
        .unwrap();

    assert_eq!(resolved.as_str(), "demo_space");
    assert_eq!(cdf.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_fallback_created_once_then_reused() {
    let cdf = Arc::new(InMemoryCdf::default());
    let resolver = ContainerResolver::new(cdf.clone());

    let first = resolver
        .resolve(&id("proj_space"), &id("demo_space"))
        .await
        .unwrap();
    assert_eq!(first.as_str(), "demo_space");
    assert!(cdf.has_space("demo_space"));
    assert_eq!(cdf.create_calls.load(Ordering::SeqCst), 1);

    let second = resolver
        .resolve(&id("proj_space"), &id("demo_space"))
        .await
        .unwrap();
    assert_eq!(second, first);
    assert_eq!(cdf.create_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_broken_target_falls_back_by_default() {
    let cdf = Arc::new(InMemoryCdf::with_spaces(&["proj_space"]));
    cdf.break_space("proj_space");
    let resolver = ContainerResolver::new(cdf.clone());

    let resolved = resolver
        .resolve(&id("proj_space"), &id("demo_space"))
        .await
        .unwrap();

    assert_eq!(resolved.as_str(), "demo_space");
    assert!(cdf.has_space("demo_space"));
}

#[tokio::test]
async fn test_broken_target_fails_with_strict_policy() {
    let cdf = Arc::new(InMemoryCdf::with_spaces(&["proj_space"]));
    cdf.break_space("proj_space");
    let resolver = ContainerResolver::new(cdf.clone()).with_policy(TargetErrorPolicy::Fail);

    let err = resolver
        .resolve(&id("proj_space"), &id("demo_space"))
        .await
        .err()
        .unwrap();

    assert_eq!(err.category(), "Cognite API");
    assert!(!cdf.has_space("demo_space"));
    assert_eq!(cdf.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_target_equal_to_fallback_is_created() {
    let cdf = Arc::new(InMemoryCdf::default());
    let resolver = ContainerResolver::new(cdf.clone());

    let resolved = resolver
        .resolve(&id("demo_space"), &id("demo_space"))
        .await
        .unwrap();

    assert_eq!(resolved.as_str(), "demo_space");
    // The fallback lookup is skipped when it names the same space.
    assert_eq!(cdf.retrieve_calls.load(Ordering::SeqCst), 1);
    assert_eq!(cdf.create_calls.load(Ordering::SeqCst), 1);
}
