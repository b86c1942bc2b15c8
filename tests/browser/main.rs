use std::sync::Arc;
use std::time::Duration;

use snapkeep::{InMemoryPersistence, Scope, ScopeRegistry, Snapshot, SnapshotBrowser};

fn registry() -> Arc<ScopeRegistry> {
    let _ = env_logger::builder().is_test(true).try_init();
    Arc::new(ScopeRegistry::new(Arc::new(InMemoryPersistence::new())))
}

/// Give the browser's listener task a moment to process pending change
/// events.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn activating_a_scope_shows_its_snapshots() {
    let registry = registry();
    let manager = registry.manager_for(&Scope::from("a")).unwrap();
    manager.add(Snapshot::new("v1", vec![])).unwrap();
    manager.add(Snapshot::new("v2", vec![])).unwrap();

    let browser = SnapshotBrowser::new(registry);
    browser.activate(&Scope::from("a")).unwrap();

    let titles: Vec<String> = browser
        .snapshots()
        .unwrap()
        .iter()
        .map(|s| s.title().to_string())
        .collect();
    assert_eq!(titles, vec!["v1", "v2"]);
    assert!(browser.has_snapshots().unwrap());
    assert_eq!(browser.active_scope().unwrap(), Some(Scope::from("a")));

    let active = browser.active_manager().unwrap().unwrap();
    assert_eq!(active.scope(), &Scope::from("a"));
}

#[tokio::test(flavor = "multi_thread")]
async fn change_events_refresh_the_visible_list() {
    let registry = registry();
    let browser = SnapshotBrowser::new(registry.clone());
    browser.activate(&Scope::from("a")).unwrap();
    assert!(browser.snapshots().unwrap().is_empty());

    let manager = registry.manager_for(&Scope::from("a")).unwrap();
    manager.add(Snapshot::new("v1", vec![])).unwrap();
    settle().await;

    assert_eq!(browser.snapshots().unwrap().len(), 1);

    manager.remove("v1").unwrap();
    settle().await;

    assert!(browser.snapshots().unwrap().is_empty());
    assert!(!browser.has_snapshots().unwrap());
}

#[tokio::test(flavor = "multi_thread")]
async fn filter_narrows_the_list_case_insensitively() {
    let registry = registry();
    let manager = registry.manager_for(&Scope::from("a")).unwrap();
    manager.add(Snapshot::new("Before refactor", vec![])).unwrap();
    manager.add(Snapshot::new("After refactor", vec![])).unwrap();
    manager.add(Snapshot::new("Release", vec![])).unwrap();

    let browser = SnapshotBrowser::new(registry);
    browser.activate(&Scope::from("a")).unwrap();

    browser.set_filter("REFACTOR").unwrap();
    let titles: Vec<String> = browser
        .snapshots()
        .unwrap()
        .iter()
        .map(|s| s.title().to_string())
        .collect();
    assert_eq!(titles, vec!["Before refactor", "After refactor"]);

    // Filter that matches nothing still reports the scope has snapshots
    browser.set_filter("nothing matches this").unwrap();
    assert!(browser.snapshots().unwrap().is_empty());
    assert!(browser.has_snapshots().unwrap());

    browser.set_filter("").unwrap();
    assert_eq!(browser.snapshots().unwrap().len(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn deactivation_clears_the_list_immediately() {
    let registry = registry();
    let manager = registry.manager_for(&Scope::from("a")).unwrap();
    manager.add(Snapshot::new("v1", vec![])).unwrap();

    let browser = SnapshotBrowser::new(registry);
    browser.activate(&Scope::from("a")).unwrap();
    assert_eq!(browser.snapshots().unwrap().len(), 1);

    browser.deactivate().unwrap();
    assert!(browser.snapshots().unwrap().is_empty());
    assert_eq!(browser.active_scope().unwrap(), None);

    // Changes in the old scope no longer reach the browser
    manager.add(Snapshot::new("v2", vec![])).unwrap();
    settle().await;
    assert!(browser.snapshots().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn switching_scope_unhooks_the_previous_scope() {
    let registry = registry();
    let manager_a = registry.manager_for(&Scope::from("a")).unwrap();
    let manager_b = registry.manager_for(&Scope::from("b")).unwrap();
    manager_a.add(Snapshot::new("a1", vec![])).unwrap();
    manager_b.add(Snapshot::new("b1", vec![])).unwrap();

    let browser = SnapshotBrowser::new(registry);
    browser.activate(&Scope::from("a")).unwrap();
    assert_eq!(browser.snapshots().unwrap()[0].title(), "a1");

    browser.activate(&Scope::from("b")).unwrap();
    assert_eq!(browser.snapshots().unwrap()[0].title(), "b1");

    // Mutating the old scope must not leak into the new scope's view
    manager_a.add(Snapshot::new("a2", vec![])).unwrap();
    settle().await;

    let titles: Vec<String> = browser
        .snapshots()
        .unwrap()
        .iter()
        .map(|s| s.title().to_string())
        .collect();
    assert_eq!(titles, vec!["b1"]);

    // And the new scope still refreshes
    manager_b.add(Snapshot::new("b2", vec![])).unwrap();
    settle().await;
    assert_eq!(browser.snapshots().unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn reactivating_the_same_scope_resubscribes() {
    let registry = registry();
    let manager = registry.manager_for(&Scope::from("a")).unwrap();

    let browser = SnapshotBrowser::new(registry);
    browser.activate(&Scope::from("a")).unwrap();
    browser.deactivate().unwrap();
    browser.activate(&Scope::from("a")).unwrap();

    manager.add(Snapshot::new("v1", vec![])).unwrap();
    settle().await;
    assert_eq!(browser.snapshots().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn rapid_scope_switches_settle_on_the_last_activation() {
    let registry = registry();
    for scope in ["a", "b", "c"] {
        let manager = registry.manager_for(&Scope::from(scope)).unwrap();
        manager
            .add(Snapshot::new(format!("{}-snap", scope), vec![]))
            .unwrap();
    }

    let browser = SnapshotBrowser::new(registry.clone());
    browser.activate(&Scope::from("a")).unwrap();
    browser.activate(&Scope::from("b")).unwrap();
    browser.activate(&Scope::from("c")).unwrap();
    settle().await;

    assert_eq!(browser.active_scope().unwrap(), Some(Scope::from("c")));
    let titles: Vec<String> = browser
        .snapshots()
        .unwrap()
        .iter()
        .map(|s| s.title().to_string())
        .collect();
    assert_eq!(titles, vec!["c-snap"]);

    // Stale scopes' changes stay invisible even after more churn
    registry
        .manager_for(&Scope::from("a"))
        .unwrap()
        .add(Snapshot::new("a-late", vec![]))
        .unwrap();
    settle().await;
    assert_eq!(browser.snapshots().unwrap().len(), 1);
}
