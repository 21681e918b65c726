//! Integration tests for the unit of work over recording doubles.

use tally_core::{Config, Entity, MapperOp, ObjectState, UnitOfWork, UowError};
use tally_testkit::{Doc, Harness, RecordingMapper, TxEvent, CHILD, PARENT};

#[test]
fn new_parent_is_inserted_once() {
    let harness = Harness::new();
    let mut uow = harness.transactional();

    let post = Doc::parent(1).with_body("hello");
    uow.register_new(post.clone()).unwrap();
    let summary = uow.commit().unwrap();

    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.total(), 1);
    assert_eq!(harness.log.ops(), vec![(MapperOp::Insert, post.key())]);
    assert_eq!(harness.log.calls()[0].body, "hello");
    assert_eq!(uow.pending(), 0);
    assert_eq!(uow.state_of(&post.key()), None);
}

#[test]
fn loaded_parent_gains_a_child() {
    let harness = Harness::new();
    let mut uow = harness.transactional();

    let post = Doc::parent(1);
    let comment = Doc::child(1);
    uow.register_clean(post.clone()).unwrap();
    uow.register_dirty(post.clone().with_body("edited")).unwrap();
    uow.register_new(comment.clone()).unwrap();

    let summary = uow.commit().unwrap();
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.inserted, 1);
    assert_eq!(
        harness.log.ops(),
        vec![
            (MapperOp::Update, post.key()),
            (MapperOp::Insert, comment.key()),
        ]
    );
}

#[test]
fn child_registered_first_is_dispatched_first() {
    let harness = Harness::new();
    let mut uow = harness.basic();

    uow.register_new(Doc::child(1)).unwrap();
    uow.register_dirty(Doc::parent(1)).unwrap();
    uow.commit().unwrap();

    assert_eq!(
        harness.log.ops(),
        vec![
            (MapperOp::Insert, Doc::child(1).key()),
            (MapperOp::Update, Doc::parent(1).key()),
        ]
    );
}

#[test]
fn removing_parent_and_children_deletes_each() {
    let harness = Harness::new();
    let mut uow = harness.transactional();

    uow.register_removed(Doc::parent(1)).unwrap();
    uow.register_removed(Doc::child(1)).unwrap();
    uow.register_removed(Doc::child(2)).unwrap();

    let summary = uow.commit().unwrap();
    assert_eq!(summary.deleted, 3);
    assert_eq!(harness.log.count(MapperOp::Delete), 3);
    assert_eq!(harness.log.count(MapperOp::Insert), 0);
    assert_eq!(harness.log.count(MapperOp::Update), 0);
}

#[test]
fn failing_insert_rolls_back_and_propagates() {
    let harness = Harness::new();
    let bad = Doc::child(2);
    harness.children.fail_on(MapperOp::Insert, bad.key());

    let mut uow = harness.transactional();
    uow.register_new(Doc::parent(1)).unwrap();
    uow.register_new(bad.clone()).unwrap();

    let err = uow.commit().unwrap_err();
    let expected = RecordingMapper::injected_error(MapperOp::Insert, bad.key());
    assert_eq!(err.to_string(), expected.to_string());
    assert!(matches!(err, UowError::Storage(_)));
    assert_eq!(
        harness.backend.events(),
        vec![TxEvent::Begin, TxEvent::Rollback]
    );

    // Nothing is forgotten, so the caller can retry.
    assert_eq!(uow.pending(), 2);
    assert_eq!(uow.state_of(&bad.key()), Some(ObjectState::New));
}

#[test]
fn retry_after_failure_dispatches_everything() {
    let harness = Harness::new();
    let mut uow = harness.transactional();
    uow.register_new(Doc::parent(1)).unwrap();
    uow.register_removed(Doc::child(3)).unwrap();
    harness
        .children
        .fail_on(MapperOp::Delete, Doc::child(3).key());
    assert!(uow.commit().is_err());

    harness.log.reset();
    harness.backend.reset();

    // Replace the failing child mapper.
    let children = std::sync::Arc::new(RecordingMapper::new(CHILD, harness.log.clone()));
    harness.registry.register(CHILD, children);

    let summary = uow.commit().unwrap();
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.deleted, 1);
    assert_eq!(harness.backend.events(), vec![TxEvent::Begin, TxEvent::Commit]);
    assert_eq!(uow.pending(), 0);
}

#[test]
fn clear_on_failure_forgets_changes() {
    let harness = Harness::new();
    harness
        .parents
        .fail_on(MapperOp::Update, Doc::parent(1).key());

    let mut uow = harness.transactional_with(Config::new().clear_on_failure(true));
    uow.register_dirty(Doc::parent(1)).unwrap();
    assert!(uow.commit().is_err());
    assert_eq!(uow.pending(), 0);
}

#[test]
fn missing_mapper_aborts_before_any_call() {
    let harness = Harness::new();
    harness.registry.unregister(CHILD).unwrap();

    let mut uow = harness.transactional();
    uow.register_new(Doc::parent(1)).unwrap();
    uow.register_new(Doc::child(1)).unwrap();

    assert!(matches!(
        uow.commit(),
        Err(UowError::MapperNotRegistered { kind }) if kind == CHILD
    ));
    assert!(harness.log.is_empty());
    assert_eq!(
        harness.backend.events(),
        vec![TxEvent::Begin, TxEvent::Rollback]
    );
}

#[test]
fn missing_mapper_for_clean_entity_still_fails() {
    let harness = Harness::new();
    harness.registry.unregister(PARENT).unwrap();

    let mut uow = harness.basic_with(Config::new().preflight_mappers(false));
    uow.register_clean(Doc::parent(1)).unwrap();

    assert!(matches!(
        uow.commit(),
        Err(UowError::MapperNotRegistered { .. })
    ));
}

#[test]
fn refused_begin_touches_nothing() {
    let harness = Harness::new();
    harness.backend.refuse_begin();

    let mut uow = harness.transactional();
    uow.register_new(Doc::parent(1)).unwrap();

    assert!(matches!(uow.commit(), Err(UowError::Storage(_))));
    assert!(harness.log.is_empty());
    assert!(harness.backend.events().is_empty());
    assert_eq!(uow.pending(), 1);
}

#[test]
fn refused_begin_honours_clear_on_failure() {
    let harness = Harness::new();
    harness.backend.refuse_begin();

    let mut uow = harness.transactional_with(Config::new().clear_on_failure(true));
    uow.register_new(Doc::parent(1)).unwrap();

    assert!(matches!(uow.commit(), Err(UowError::Storage(_))));
    assert!(harness.backend.events().is_empty());
    assert_eq!(uow.pending(), 0);
}

#[test]
fn refused_rollback_keeps_mapper_error() {
    let harness = Harness::new();
    let bad = Doc::parent(1);
    harness.parents.fail_on(MapperOp::Insert, bad.key());
    harness.backend.refuse_rollback();

    let mut uow = harness.transactional();
    uow.register_new(bad.clone()).unwrap();

    let err = uow.commit().unwrap_err();
    let expected = RecordingMapper::injected_error(MapperOp::Insert, bad.key());
    assert_eq!(err.to_string(), expected.to_string());
    assert_eq!(
        harness.backend.events(),
        vec![TxEvent::Begin, TxEvent::Rollback]
    );
    assert_eq!(uow.pending(), 1);
}

#[test]
fn refused_commit_rolls_back() {
    let harness = Harness::new();
    harness.backend.refuse_commit();

    let mut uow = harness.transactional();
    uow.register_new(Doc::parent(1)).unwrap();

    assert!(matches!(uow.commit(), Err(UowError::Storage(_))));
    assert_eq!(
        harness.backend.events(),
        vec![TxEvent::Begin, TxEvent::Commit, TxEvent::Rollback]
    );
    assert_eq!(uow.pending(), 1);
}

#[test]
fn registration_errors_leave_store_untouched() {
    let harness = Harness::new();
    let mut uow = harness.basic();
    let doc = Doc::parent(1);

    uow.register_removed(doc.clone()).unwrap();
    assert!(matches!(
        uow.register_new(doc.clone()),
        Err(UowError::AlreadyTracked { state: ObjectState::Removed, .. })
    ));
    assert!(matches!(
        uow.register_dirty(doc.clone()),
        Err(UowError::AlreadyRemoved { .. })
    ));
    assert_eq!(uow.state_of(&doc.key()), Some(ObjectState::Removed));
    assert_eq!(uow.pending(), 1);
}

#[test]
fn discard_skips_storage() {
    let harness = Harness::new();
    let mut uow = harness.transactional();
    uow.register_new(Doc::parent(1)).unwrap();
    uow.register_removed(Doc::child(1)).unwrap();

    uow.discard();
    let summary = uow.commit().unwrap();
    assert!(summary.is_empty());
    assert!(harness.log.is_empty());
}

#[test]
fn units_of_work_share_the_registry_only() {
    let harness = Harness::new();
    let mut first = harness.basic();
    let mut second = harness.basic();

    first.register_new(Doc::parent(1)).unwrap();
    second.register_removed(Doc::parent(1)).unwrap();

    assert_eq!(first.state_of(&Doc::parent(1).key()), Some(ObjectState::New));
    assert_eq!(
        second.state_of(&Doc::parent(1).key()),
        Some(ObjectState::Removed)
    );

    first.commit().unwrap();
    assert_eq!(second.pending(), 1);
}
