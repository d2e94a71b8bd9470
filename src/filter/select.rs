use super::evaluate::resolve_path;
use serde_json::{Map, Value};

/// Projects a record onto the selected field paths.
///
/// Dotted paths rebuild their nested structure in the output
/// (`deviceType.category` → `{"deviceType": {"category": ...}}`). Paths
/// missing from the record are left out. An empty selection returns the
/// record unchanged.
pub fn select_fields(record: &Value, fields: &[String]) -> Value {
    if fields.is_empty() {
        return record.clone();
    }

    let mut selected = Map::new();
    for path in fields {
        if let Some(value) = resolve_path(record, path) {
            insert_path(&mut selected, path, value.clone());
        }
    }
    Value::Object(selected)
}

fn insert_path(target: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            target.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(map) = child {
                insert_path(map, rest, value);
            }
        }
    }
}
