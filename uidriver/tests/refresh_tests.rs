mod common;

use common::{attach, attrs, FakeProvider, ROOT};
use std::sync::Arc;
use uidriver::AutomationError;

#[test]
fn refresh_replaces_the_snapshot_wholesale() {
    let provider = Arc::new(FakeProvider::new(attrs("root", "Window")));
    provider.add(ROOT, 2, attrs("ok", "OK"));
    let fixture = attach(provider);

    let before = fixture.session.tree();
    assert_eq!(before.len(), 2);

    fixture.provider.add(ROOT, 3, attrs("cancel", "Cancel"));
    let after = fixture.session.refresh().unwrap();

    // The retained snapshot is untouched; only the session's slot moved on.
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(before.len(), 2);
    assert_eq!(after.len(), 3);
    assert!(Arc::ptr_eq(&fixture.session.tree(), &after));
}

#[test]
fn stale_elements_stay_readable_against_their_old_snapshot() {
    let provider = Arc::new(FakeProvider::new(attrs("root", "Window")));
    provider.add(ROOT, 2, attrs("ok", "OK"));
    let fixture = attach(provider);

    let ok = fixture.session.locator("#ok").get(false).unwrap();
    fixture.provider.remove(2);
    fixture.session.refresh().unwrap();

    // Old handle still reads its captured attributes.
    assert_eq!(ok.name(), Some("OK"));
    // But the element is gone from the fresh snapshot.
    assert!(matches!(
        fixture.session.locator("#ok").get(false),
        Err(AutomationError::ElementNotFound(_))
    ));
}

#[test]
fn one_transient_failure_is_retried_and_recovered() {
    let provider = Arc::new(FakeProvider::new(attrs("root", "Window")));
    provider.add(ROOT, 2, attrs("ok", "OK"));
    let fixture = attach(provider);
    let walks_before = fixture.provider.walk_starts();

    fixture.provider.fail_next_property_reads(1);
    let tree = fixture.session.refresh().unwrap();
    assert_eq!(tree.len(), 2);
    // Failed walk plus the successful retry.
    assert_eq!(fixture.provider.walk_starts() - walks_before, 2);
}

#[test]
fn a_second_consecutive_failure_propagates() {
    let provider = Arc::new(FakeProvider::new(attrs("root", "Window")));
    let fixture = attach(provider);
    let walks_before = fixture.provider.walk_starts();

    fixture.provider.fail_next_property_reads(2);
    let result = fixture.session.refresh();
    assert!(matches!(
        result,
        Err(AutomationError::TransientUnavailable(_))
    ));
    // Exactly one retry, never a loop.
    assert_eq!(fixture.provider.walk_starts() - walks_before, 2);

    // The previously held snapshot survives the failed refresh.
    assert_eq!(fixture.session.tree().len(), 1);
}

#[test]
fn snapshot_preserves_document_order_and_parent_links() {
    let provider = Arc::new(FakeProvider::new(attrs("root", "Window")));
    provider.add(ROOT, 2, attrs("toolbar", "Toolbar"));
    provider.add(2, 3, attrs("save", "Save"));
    provider.add(2, 4, attrs("open", "Open"));
    provider.add(ROOT, 5, attrs("body", "Body"));
    let fixture = attach(provider);

    let root = fixture.session.root();
    let top: Vec<_> = root.children().iter().map(|c| c.id().unwrap().to_string()).collect();
    assert_eq!(top, vec!["toolbar", "body"]);

    let toolbar = root.children()[0].clone();
    let buttons: Vec<_> = toolbar
        .children()
        .iter()
        .map(|c| c.id().unwrap().to_string())
        .collect();
    assert_eq!(buttons, vec!["save", "open"]);

    let save = toolbar.children()[0].clone();
    assert_eq!(save.parent().unwrap().id(), Some("toolbar"));
    assert!(root.parent().is_none());
}
