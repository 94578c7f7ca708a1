//! Task document wire-shape tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use taskdeck_core::{Task, TaskFields, TaskId, TaskPatch};

#[test]
fn fields_default_completed_to_false() {
    let f: TaskFields = serde_json::from_str(r#"{"task":"buy milk"}"#).unwrap();
    assert_eq!(f.task, "buy milk");
    assert!(!f.completed);
}

#[test]
fn fields_require_task() {
    let err = serde_json::from_str::<TaskFields>(r#"{"completed":true}"#);
    assert!(err.is_err());
}

#[test]
fn task_serializes_id_as_underscore_id() {
    let t = Task::from_fields(TaskFields { task: "write docs".into(), completed: true });
    let v = serde_json::to_value(&t).unwrap();
    assert_eq!(v["_id"], serde_json::Value::String(t.id.to_string()));
    assert_eq!(v["task"], "write docs");
    assert_eq!(v["completed"], true);
    assert!(v.get("id").is_none());

    let back: Task = serde_json::from_value(v).unwrap();
    assert_eq!(back, t);
}

#[test]
fn patch_only_touches_present_fields() {
    let mut t = Task::from_fields(TaskFields { task: "a".into(), completed: false });
    let id = t.id;

    let patch: TaskPatch = serde_json::from_str(r#"{"completed":true}"#).unwrap();
    assert!(!patch.is_empty());
    t.apply(patch);
    assert_eq!(t.task, "a");
    assert!(t.completed);
    assert_eq!(t.id, id);

    let empty: TaskPatch = serde_json::from_str("{}").unwrap();
    assert!(empty.is_empty());
}

#[test]
fn fresh_ids_are_distinct() {
    assert_ne!(TaskId::new(), TaskId::new());
}

#[test]
fn id_parse_rejects_garbage() {
    let err = TaskId::parse("not-an-id").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "INVALID_ID");

    let id = TaskId::new();
    let parsed: TaskId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);
}
