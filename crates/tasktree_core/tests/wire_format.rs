use serde_json::json;
use tasktree_core::{ItemStatus, ItemView, ManualClock, MemoryStore, Notification, TodoService};

#[test]
fn item_view_uses_camel_case_fields_and_upper_case_enums() {
    let mut service = TodoService::new(MemoryStore::new(), ManualClock::new(0));
    let parent = service.create_item("parent", None).unwrap();
    let child = service.create_item("child", Some(parent)).unwrap();
    let tag = service.create_tag("home").unwrap();
    service
        .update_item(child, "child", &[tag], "INPROGRESS", Some(parent), None)
        .unwrap();

    let value = serde_json::to_value(service.get_item(child).unwrap()).unwrap();
    assert_eq!(
        value,
        json!({
            "id": 1,
            "description": "child",
            "tagIds": [0],
            "status": "INPROGRESS",
            "parentId": 0,
            "score": "NA",
        })
    );

    let root = serde_json::to_value(service.get_item(parent).unwrap()).unwrap();
    assert_eq!(root["parentId"], serde_json::Value::Null);
}

#[test]
fn item_view_parses_back_from_wire_json() {
    let raw = r#"{"id":4,"description":"d","tagIds":[],"status":"DONE","parentId":null,"score":"HIGH"}"#;
    let view: ItemView = serde_json::from_str(raw).unwrap();
    assert_eq!(view.status, ItemStatus::Done);
    assert_eq!(view.parent_id, None);

    let lowercase = raw.replace("DONE", "done");
    assert!(serde_json::from_str::<ItemView>(&lowercase).is_err());
}

#[test]
fn notification_serializes_transition_fields() {
    let notification = Notification {
        item_id: 2,
        item_description: "write report".to_string(),
        status_before: ItemStatus::Blocked,
        status_after: ItemStatus::Todo,
        change_unit: 42,
    };

    assert_eq!(
        serde_json::to_value(&notification).unwrap(),
        json!({
            "itemId": 2,
            "itemDescription": "write report",
            "statusBefore": "BLOCKED",
            "statusAfter": "TODO",
            "changeUnit": 42,
        })
    );
}
