use tasktree_core::{
    EngineError, ErrorKind, ItemStatus, ManualClock, MemoryStore, Score, TodoService,
};

fn setup() -> (TodoService<MemoryStore, ManualClock>, ManualClock) {
    let clock = ManualClock::new(1_000);
    let service = TodoService::new(MemoryStore::new(), clock.clone());
    (service, clock)
}

#[test]
fn create_item_starts_with_defaults() {
    let (mut service, _) = setup();

    let id = service.create_item("Buy milk", None).unwrap();
    assert_eq!(id, 0);

    let view = service.get_item(id).unwrap();
    assert_eq!(view.description, "Buy milk");
    assert_eq!(view.status, ItemStatus::Todo);
    assert_eq!(view.score, Score::Na);
    assert_eq!(view.parent_id, None);
    assert!(view.tag_ids.is_empty());
    assert_eq!(service.state().items[0].last_modified_unit, 1_000);
}

#[test]
fn create_item_rejects_duplicate_description_under_same_parent() {
    let (mut service, _) = setup();
    service.create_item("Buy milk", None).unwrap();

    let err = service.create_item("Buy milk", None).unwrap_err();
    assert_eq!(err, EngineError::DuplicateDescription { parent_id: None });
    assert_eq!(err.kind(), ErrorKind::Validation);

    let parent = service.create_item("Shopping", None).unwrap();
    service.create_item("Buy milk", Some(parent)).unwrap();
    let err = service.create_item("Buy milk", Some(parent)).unwrap_err();
    assert_eq!(
        err,
        EngineError::DuplicateDescription {
            parent_id: Some(parent)
        }
    );
}

#[test]
fn create_item_validates_description_and_parent() {
    let (mut service, _) = setup();

    assert_eq!(
        service.create_item("", None).unwrap_err(),
        EngineError::EmptyDescription
    );
    let err = service.create_item("orphan", Some(42)).unwrap_err();
    assert_eq!(err, EngineError::ParentNotFound(42));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(service.state().items.is_empty());
}

#[test]
fn create_item_enforces_capacity() {
    let (mut service, _) = setup();
    for index in 0..50 {
        service.create_item(&format!("item {index}"), None).unwrap();
    }

    let err = service.create_item("one too many", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Capacity);
    assert_eq!(service.state().items.len(), 50);
}

#[test]
fn create_child_links_parent() {
    let (mut service, _) = setup();
    let parent = service.create_item("parent", None).unwrap();
    let first = service.create_item("first", Some(parent)).unwrap();
    let second = service.create_item("second", Some(parent)).unwrap();

    assert_eq!(service.state().items[0].children_ids, vec![first, second]);
    assert_eq!(service.get_item(first).unwrap().parent_id, Some(parent));
}

#[test]
fn get_item_reports_missing_id() {
    let (service, _) = setup();
    let err = service.get_item(3).unwrap_err();
    assert_eq!(err, EngineError::ItemNotFound(3));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn ids_are_never_reused_after_delete() {
    let (mut service, _) = setup();
    let first = service.create_item("a", None).unwrap();
    service.delete_item(first).unwrap();
    let second = service.create_item("a", None).unwrap();
    assert_eq!(second, first + 1);
}

#[test]
fn update_rejects_cycle_through_descendant() {
    let (mut service, _) = setup();
    let root = service.create_item("root", None).unwrap();
    let child = service.create_item("child", Some(root)).unwrap();

    let err = service
        .update_item(root, "root", &[], "TODO", Some(child), None)
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::CycleDetected {
            item_id: root,
            parent_id: child
        }
    );
    assert!(err.to_string().contains("parentId creates a cycle"));
    assert_eq!(service.get_item(root).unwrap().parent_id, None);
}

#[test]
fn update_rejects_deep_cycle_and_self_parenting() {
    let (mut service, _) = setup();
    let a = service.create_item("a", None).unwrap();
    let b = service.create_item("b", Some(a)).unwrap();
    let c = service.create_item("c", Some(b)).unwrap();

    let err = service
        .update_item(a, "a", &[], "TODO", Some(c), None)
        .unwrap_err();
    assert!(matches!(err, EngineError::CycleDetected { .. }));

    let err = service
        .update_item(b, "b", &[], "TODO", Some(b), None)
        .unwrap_err();
    assert_eq!(err, EngineError::SelfParent(b));
}

#[test]
fn update_validation_order_reports_first_failure() {
    let (mut service, _) = setup();
    let id = service.create_item("task", None).unwrap();
    service.create_item("taken", None).unwrap();

    assert_eq!(
        service
            .update_item(99, "", &[], "NOPE", None, Some(-1))
            .unwrap_err(),
        EngineError::ItemNotFound(99)
    );
    assert_eq!(
        service
            .update_item(id, "", &[7], "NOPE", Some(99), Some(-1))
            .unwrap_err(),
        EngineError::EmptyDescription
    );
    assert_eq!(
        service
            .update_item(id, "x", &[7], "NOPE", Some(99), Some(-1))
            .unwrap_err(),
        EngineError::ParentNotFound(99)
    );
    assert_eq!(
        service
            .update_item(id, "taken", &[7], "NOPE", None, Some(-1))
            .unwrap_err(),
        EngineError::DuplicateDescription { parent_id: None }
    );
    assert_eq!(
        service
            .update_item(id, "x", &[7], "NOPE", None, Some(-1))
            .unwrap_err(),
        EngineError::InvalidStatus("NOPE".to_string())
    );
    assert_eq!(
        service
            .update_item(id, "x", &[7], "DONE", None, Some(-1))
            .unwrap_err(),
        EngineError::UnknownTag(7)
    );
    assert_eq!(
        service
            .update_item(id, "x", &[], "DONE", None, Some(-1))
            .unwrap_err(),
        EngineError::InvalidDeadline(-1)
    );
    assert!(service.list_notifications().is_empty());
}

#[test]
fn update_keeps_own_description_without_duplicate_error() {
    let (mut service, _) = setup();
    let id = service.create_item("same", None).unwrap();
    let view = service
        .update_item(id, "same", &[], "INPROGRESS", None, None)
        .unwrap();
    assert_eq!(view.status, ItemStatus::InProgress);
}

#[test]
fn update_score_follows_deadline() {
    let (mut service, clock) = setup();
    let past = service.create_item("past", None).unwrap();
    let future = service.create_item("future", None).unwrap();
    let open = service.create_item("open", None).unwrap();
    let exact = service.create_item("exact", None).unwrap();
    clock.set(5_000);

    let view = service
        .update_item(past, "past", &[], "DONE", None, Some(4_999))
        .unwrap();
    assert_eq!(view.score, Score::Low);
    let view = service
        .update_item(future, "future", &[], "DONE", None, Some(9_999))
        .unwrap();
    assert_eq!(view.score, Score::High);
    let view = service
        .update_item(open, "open", &[], "DONE", None, None)
        .unwrap();
    assert_eq!(view.score, Score::High);
    let view = service
        .update_item(exact, "exact", &[], "DONE", None, Some(5_000))
        .unwrap();
    assert_eq!(view.score, Score::High);

    let view = service
        .update_item(past, "past", &[], "BLOCKED", None, Some(4_999))
        .unwrap();
    assert_eq!(view.score, Score::Na);
}

#[test]
fn update_moves_item_between_parents() {
    let (mut service, _) = setup();
    let left = service.create_item("left", None).unwrap();
    let right = service.create_item("right", None).unwrap();
    let leaf = service.create_item("leaf", Some(left)).unwrap();

    service
        .update_item(leaf, "leaf", &[], "TODO", Some(right), None)
        .unwrap();
    let state = service.state();
    assert!(state.items[0].children_ids.is_empty());
    assert_eq!(state.items[1].children_ids, vec![leaf]);

    service
        .update_item(leaf, "leaf", &[], "TODO", None, None)
        .unwrap();
    assert!(service.state().items[1].children_ids.is_empty());
    assert_eq!(service.get_item(leaf).unwrap().parent_id, None);

    service
        .update_item(leaf, "leaf", &[], "TODO", Some(left), None)
        .unwrap();
    assert_eq!(service.state().items[0].children_ids, vec![leaf]);
    assert!(service.check_integrity().is_empty());
}

#[test]
fn update_replaces_tag_set_and_drops_emptied_tags() {
    let (mut service, _) = setup();
    let item = service.create_item("item", None).unwrap();
    let other = service.create_item("other", None).unwrap();
    let work = service.create_tag("work").unwrap();
    let home = service.create_tag("home").unwrap();

    service
        .update_item(item, "item", &[work, home, work], "TODO", None, None)
        .unwrap();
    service
        .update_item(other, "other", &[home], "TODO", None, None)
        .unwrap();
    assert_eq!(service.get_item(item).unwrap().tag_ids, vec![work, home]);

    service
        .update_item(item, "item", &[], "TODO", None, None)
        .unwrap();
    assert_eq!(
        service.get_tag_name(work).unwrap_err(),
        EngineError::TagNotFound(work)
    );
    assert_eq!(service.get_tag_name(home).unwrap(), "home");
    assert_eq!(service.state().tags[0].item_ids, vec![other]);
    assert!(service.check_integrity().is_empty());
}

#[test]
fn update_refreshes_timestamp() {
    let (mut service, clock) = setup();
    let id = service.create_item("task", None).unwrap();
    clock.advance(30);
    service
        .update_item(id, "task", &[], "TODO", None, None)
        .unwrap();
    assert_eq!(service.state().items[0].last_modified_unit, 1_030);
}

#[test]
fn delete_removes_subtree_tags_and_notifications() {
    let (mut service, _) = setup();
    let root = service.create_item("root", None).unwrap();
    let child = service.create_item("child", Some(root)).unwrap();
    let grandchild = service.create_item("grandchild", Some(child)).unwrap();
    let sibling = service.create_item("sibling", None).unwrap();
    let only_child_tag = service.create_tag("deep").unwrap();
    let shared = service.create_tag("shared").unwrap();

    service
        .update_item(grandchild, "grandchild", &[only_child_tag, shared], "DONE", Some(child), None)
        .unwrap();
    service
        .update_item(sibling, "sibling", &[shared], "INPROGRESS", None, None)
        .unwrap();
    assert_eq!(service.list_notifications().len(), 2);

    let mut removed = service.delete_item(root).unwrap();
    removed.sort_unstable();
    assert_eq!(removed, vec![root, child, grandchild]);

    let state = service.state();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, sibling);
    assert_eq!(state.tags.len(), 1);
    assert_eq!(state.tags[0].id, shared);
    assert_eq!(state.tags[0].item_ids, vec![sibling]);
    let notifications = service.list_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].item_id, sibling);
    assert!(service.check_integrity().is_empty());
}

#[test]
fn delete_child_unlinks_from_parent() {
    let (mut service, _) = setup();
    let root = service.create_item("root", None).unwrap();
    let child = service.create_item("child", Some(root)).unwrap();

    assert_eq!(service.delete_item(child).unwrap(), vec![child]);
    assert!(service.state().items[0].children_ids.is_empty());
    assert_eq!(
        service.delete_item(child).unwrap_err(),
        EngineError::ItemNotFound(child)
    );
}

#[test]
fn list_items_filters_by_parent_tags_and_status() {
    let (mut service, _) = setup();
    let root = service.create_item("root", None).unwrap();
    let a = service.create_item("a", Some(root)).unwrap();
    let b = service.create_item("b", Some(root)).unwrap();
    let c = service.create_item("c", Some(root)).unwrap();
    let red = service.create_tag("red").unwrap();
    let blue = service.create_tag("blue").unwrap();
    service
        .update_item(a, "a", &[red, blue], "DONE", Some(root), None)
        .unwrap();
    service
        .update_item(b, "b", &[red], "DONE", Some(root), None)
        .unwrap();
    service
        .update_item(c, "c", &[red, blue], "TODO", Some(root), None)
        .unwrap();

    let roots = service.list_items(None, None, None).unwrap();
    assert_eq!(roots.iter().map(|v| v.id).collect::<Vec<_>>(), vec![root]);

    let children = service.list_items(Some(root), None, None).unwrap();
    assert_eq!(children.len(), 3);

    let both = service
        .list_items(Some(root), Some(&[red, blue]), None)
        .unwrap();
    assert_eq!(both.iter().map(|v| v.id).collect::<Vec<_>>(), vec![a, c]);

    let done_red = service
        .list_items(Some(root), Some(&[red]), Some("DONE"))
        .unwrap();
    assert_eq!(done_red.iter().map(|v| v.id).collect::<Vec<_>>(), vec![a, b]);
}

#[test]
fn list_items_rejects_bad_filters() {
    let (mut service, _) = setup();
    service.create_item("a", None).unwrap();

    assert_eq!(
        service.list_items(None, None, Some("done")).unwrap_err(),
        EngineError::InvalidStatus("done".to_string())
    );
    assert_eq!(
        service.list_items(None, Some(&[]), None).unwrap_err(),
        EngineError::EmptyTagFilter
    );
    assert_eq!(
        service.list_items(None, Some(&[4]), None).unwrap_err(),
        EngineError::UnknownTag(4)
    );
    let err = service.list_items(Some(9), None, None).unwrap_err();
    assert_eq!(err, EngineError::ParentNotFound(9));
    assert_eq!(err.kind(), ErrorKind::Validation);
}
