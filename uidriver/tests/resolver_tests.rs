mod common;

use common::{attach, attrs, FakeProvider, ROOT};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uidriver::{AutomationError, Selector};

#[test]
fn get_finds_direct_children_without_blocking() {
    let provider = Arc::new(FakeProvider::new(attrs("root", "Window")));
    provider.add(ROOT, 2, attrs("ok", "OK"));
    let fixture = attach(provider);

    let ok = fixture.session.locator("#ok").get(false).unwrap();
    assert_eq!(ok.name(), Some("OK"));
    let by_name = fixture.session.locator("name:OK").get(false).unwrap();
    assert_eq!(by_name, ok);
}

#[test]
fn get_prefers_the_shallower_of_two_matches() {
    let provider = Arc::new(FakeProvider::new(attrs("root", "Window")));
    // A deep match sits inside the first subtree; a shallow one comes later
    // among the direct children.
    provider.add(ROOT, 2, attrs("panel", "Panel"));
    provider.add(2, 3, attrs("deep", "Target"));
    provider.add(ROOT, 4, attrs("shallow", "Target"));
    let fixture = attach(provider);

    let found = fixture.session.locator("name:Target").get(true).unwrap();
    assert_eq!(found.id(), Some("shallow"));
}

#[test]
fn predicate_lookup_walks_in_the_same_order_as_selectors() {
    let provider = Arc::new(FakeProvider::new(attrs("root", "Window")));
    provider.add(ROOT, 2, attrs("panel", "Panel"));
    provider.add(2, 3, attrs("deep", "Target"));
    provider.add(ROOT, 4, attrs("shallow", "Target"));
    let fixture = attach(provider);

    let found = uidriver::resolver::find_where(&fixture.session.root(), true, |e| {
        e.name() == Some("Target")
    })
    .unwrap();
    assert_eq!(found.id(), Some("shallow"));
}

#[test]
fn first_match_in_document_order_wins_at_equal_depth() {
    let provider = Arc::new(FakeProvider::new(attrs("root", "Window")));
    provider.add(ROOT, 2, attrs("first", "Dup"));
    provider.add(ROOT, 3, attrs("second", "Dup"));
    let fixture = attach(provider);

    let found = fixture.session.locator("name:Dup").get(true).unwrap();
    assert_eq!(found.id(), Some("first"));

    let all = fixture.session.locator("name:Dup").all(true).unwrap();
    let ids: Vec<_> = all.iter().map(|e| e.id().unwrap().to_string()).collect();
    assert_eq!(ids, vec!["first", "second"]);
}

#[test]
fn non_recursive_get_ignores_grandchildren() {
    let provider = Arc::new(FakeProvider::new(attrs("root", "Window")));
    provider.add(ROOT, 2, attrs("panel", "Panel"));
    provider.add(2, 3, attrs("nested", "Nested"));
    let fixture = attach(provider);

    assert!(matches!(
        fixture.session.locator("#nested").get(false),
        Err(AutomationError::ElementNotFound(_))
    ));
    assert!(fixture.session.locator("#nested").get(true).is_ok());
}

#[test]
fn chain_selectors_resolve_link_by_link() {
    let provider = Arc::new(FakeProvider::new(attrs("root", "Window")));
    provider.add(ROOT, 2, attrs("dialog", "Dialog"));
    provider.add(2, 3, attrs("ok", "OK"));
    provider.add(ROOT, 4, attrs("ok2", "OK"));
    let fixture = attach(provider);

    let found = fixture
        .session
        .locator("#dialog >> name:OK")
        .get(true)
        .unwrap();
    assert_eq!(found.id(), Some("ok"));
}

#[test]
fn within_scope_is_rebound_after_a_refresh() {
    let provider = Arc::new(FakeProvider::new(attrs("root", "Window")));
    provider.add(ROOT, 2, attrs("panel", "Panel"));
    let fixture = attach(provider);

    let panel = fixture.session.locator("#panel").get(false).unwrap();
    fixture.provider.add(2, 3, attrs("late", "Late"));
    fixture.session.refresh().unwrap();

    // `panel` is stale, but its identity re-resolves in the fresh snapshot.
    let late = fixture
        .session
        .locator("#late")
        .within(panel)
        .get(true)
        .unwrap();
    assert_eq!(late.name(), Some("Late"));
}

#[test]
fn invalid_selectors_are_rejected_immediately() {
    let provider = Arc::new(FakeProvider::new(attrs("root", "Window")));
    let fixture = attach(provider);

    assert!(matches!(
        fixture.session.locator("role:button").get(true),
        Err(AutomationError::InvalidSelector(_))
    ));
}

#[test]
fn wait_for_sees_an_element_that_appears_later() {
    let provider = Arc::new(FakeProvider::new(attrs("root", "Window")));
    let fixture = attach(provider);
    let walks_before = fixture.provider.walk_starts();

    fixture
        .provider
        .add_after(ROOT, 2, attrs("toast", "Saved!"), Duration::from_millis(60));

    let found = fixture
        .session
        .locator("#toast")
        .wait_for(true, Some(Duration::from_secs(2)))
        .unwrap();
    assert_eq!(found.name(), Some("Saved!"));
    // Every miss re-synchronized the snapshot before sleeping.
    assert!(fixture.provider.walk_starts() > walks_before);
}

#[test]
fn wait_for_times_out_on_an_element_that_never_appears() {
    let provider = Arc::new(FakeProvider::new(attrs("root", "Window")));
    let fixture = attach(provider);

    let started = Instant::now();
    let result = fixture
        .session
        .locator("#ghost")
        .wait_for(true, Some(Duration::from_millis(100)));
    assert!(matches!(result, Err(AutomationError::Timeout(_))));
    assert!(started.elapsed() >= Duration::from_millis(100));
}

#[test]
fn wait_for_uses_the_resolver_default_timeout() {
    let provider = Arc::new(FakeProvider::new(attrs("root", "Window")));
    let fixture = attach(provider);

    let started = Instant::now();
    let result = fixture
        .session
        .locator("#ghost")
        .set_default_timeout(Duration::from_millis(80))
        .wait_for(true, None);
    assert!(matches!(result, Err(AutomationError::Timeout(_))));
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(80));
    assert!(elapsed < Duration::from_secs(2));
}

#[test]
fn wait_for_aborts_on_an_unrecoverable_refresh_failure() {
    let provider = Arc::new(FakeProvider::new(attrs("root", "Window")));
    let fixture = attach(provider);

    // Enough consecutive failures to exhaust refresh's single retry on
    // every poll; the first poll's refresh error must surface, not loop.
    fixture.provider.fail_next_property_reads(2);
    let started = Instant::now();
    let result = fixture
        .session
        .locator("#ghost")
        .wait_for(true, Some(Duration::from_secs(5)));
    assert!(matches!(
        result,
        Err(AutomationError::TransientUnavailable(_))
    ));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn selector_conversion_accepts_owned_and_borrowed_strings() {
    let provider = Arc::new(FakeProvider::new(attrs("root", "Window")));
    provider.add(ROOT, 2, attrs("ok", "OK"));
    let fixture = attach(provider);

    let from_owned = fixture.session.locator(String::from("#ok"));
    assert_eq!(from_owned.selector(), &Selector::Id("ok".into()));
}
