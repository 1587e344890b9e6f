use std::cell::RefCell;
use std::rc::Rc;

use super::*;

fn recorder() -> (Rc<RefCell<Vec<StorageChange>>>, ChangeHandler) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let handler: ChangeHandler = Rc::new(move |change: &StorageChange| sink.borrow_mut().push(change.clone()));
    (seen, handler)
}

// =============================================================
// StorageArea
// =============================================================

#[test]
fn contexts_share_values() {
    let scope = MemoryScope::new();
    let a = scope.context();
    let b = scope.context();
    a.set_item("k", "v").unwrap();
    assert_eq!(b.get_item("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn remove_missing_key_succeeds() {
    let scope = MemoryScope::new();
    assert!(scope.context().remove_item("missing").is_ok());
}

#[test]
fn read_only_scope_rejects_writes() {
    let scope = MemoryScope::new();
    let ctx = scope.context();
    scope.set_read_only(true);
    assert!(matches!(ctx.set_item("k", "v"), Err(StorageError::Write { .. })));
    assert!(scope.is_empty());
}

// =============================================================
// change notification
// =============================================================

#[test]
fn writer_is_not_notified_of_its_own_change() {
    let scope = MemoryScope::new();
    let a = scope.context();
    let (seen, handler) = recorder();
    let _sub = a.subscribe(handler);
    a.set_item("k", "v").unwrap();
    assert!(seen.borrow().is_empty());
}

#[test]
fn sibling_context_is_notified_with_old_and_new_value() {
    let scope = MemoryScope::new();
    let a = scope.context();
    let b = scope.context();
    let (seen, handler) = recorder();
    let _sub = b.subscribe(handler);

    a.set_item("k", "v1").unwrap();
    a.set_item("k", "v2").unwrap();
    a.remove_item("k").unwrap();

    let seen = seen.borrow();
    assert_eq!(
        *seen,
        vec![
            StorageChange::keyed("k", None, Some("v1".to_owned())),
            StorageChange::keyed("k", Some("v1".to_owned()), Some("v2".to_owned())),
            StorageChange::keyed("k", Some("v2".to_owned()), None),
        ]
    );
}

#[test]
fn unchanged_write_does_not_notify() {
    let scope = MemoryScope::new();
    let a = scope.context();
    let b = scope.context();
    a.set_item("k", "v").unwrap();
    let (seen, handler) = recorder();
    let _sub = b.subscribe(handler);
    a.set_item("k", "v").unwrap();
    a.remove_item("other").unwrap();
    assert!(seen.borrow().is_empty());
}

#[test]
fn external_write_notifies_every_context() {
    let scope = MemoryScope::new();
    let a = scope.context();
    let b = scope.context();
    let (seen_a, handler_a) = recorder();
    let (seen_b, handler_b) = recorder();
    let _sa = a.subscribe(handler_a);
    let _sb = b.subscribe(handler_b);
    scope.external_set("k", "v").unwrap();
    assert_eq!(seen_a.borrow().len(), 1);
    assert_eq!(seen_b.borrow().len(), 1);
}

#[test]
fn clear_sends_keyless_change() {
    let scope = MemoryScope::new();
    let a = scope.context();
    let b = scope.context();
    a.set_item("k", "v").unwrap();
    let (seen, handler) = recorder();
    let _sub = b.subscribe(handler);
    a.clear().unwrap();
    assert_eq!(*seen.borrow(), vec![StorageChange::cleared()]);
}

#[test]
fn dropping_subscription_detaches_handler() {
    let scope = MemoryScope::new();
    let a = scope.context();
    let b = scope.context();
    let (seen, handler) = recorder();
    let sub = b.subscribe(handler);
    drop(sub);
    a.set_item("k", "v").unwrap();
    assert!(seen.borrow().is_empty());
}
