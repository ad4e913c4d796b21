use std::sync::Arc;

use objpath::{resolve_path, DynamicRecord, FieldHandle, PathError, Record, RecordType, Value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

#[derive(Debug)]
struct LineItem {
    sku: String,
    price: f64,
}

fn line_item_type() -> Arc<RecordType> {
    Arc::new(RecordType::new("LineItem").with_fields(["sku", "price", "secret"]))
}

/// A hand-written record: the type tells the resolver which fields exist,
/// `read` hands them out.
#[derive(Debug)]
struct TypedLineItem {
    ty: Arc<RecordType>,
    item: LineItem,
}

impl Record for TypedLineItem {
    fn record_type(&self) -> &Arc<RecordType> {
        &self.ty
    }

    fn read(&self, field: &FieldHandle<'_>) -> Option<Value> {
        match field.name() {
            "sku" => Some(Value::from(self.item.sku.as_str())),
            "price" => Some(Value::Double(self.item.price)),
            // `secret` is declared but never handed out
            _ => None,
        }
    }
}

fn order() -> Value {
    let entity = Arc::new(RecordType::new("Entity").with_field("id"));
    let order_ty = Arc::new(
        RecordType::new("Order")
            .with_fields(["items", "tags", "customer", "note"])
            .extends(entity),
    );
    let items = vec![
        Value::Object(Arc::new(TypedLineItem {
            ty: line_item_type(),
            item: LineItem {
                sku: "pen".into(),
                price: 1.5,
            },
        })),
        Value::Object(Arc::new(TypedLineItem {
            ty: line_item_type(),
            item: LineItem {
                sku: "ink".into(),
                price: 4.25,
            },
        })),
    ];
    let customer = Value::from(json!({"name": "Ada", "address": {"city": "Paris"}}));
    DynamicRecord::new(order_ty)
        .with("id", 42_i64)
        .and_then(|r| r.with("items", items))
        .and_then(|r| r.with("tags", vec![Value::from("rush")]))
        .and_then(|r| r.with("customer", customer))
        .map(Value::from)
        .unwrap()
}

#[test]
fn record_fields_and_inherited_fields() {
    let root = order();
    assert_eq!(resolve_path(&root, "id"), Ok(Value::Long(42)));
    assert_eq!(resolve_path(&root, "items[1].price"), Ok(Value::Double(4.25)));
    assert_eq!(resolve_path(&root, "customer.address.city"), Ok(Value::from("Paris")));
    assert_eq!(resolve_path(&root, "tags[0]"), Ok(Value::from("rush")));
}

#[test]
fn declared_but_unset_field_is_null() {
    assert_eq!(resolve_path(&order(), "note"), Ok(Value::Null));
    assert_eq!(
        resolve_path(&order(), "note.text"),
        Err(PathError::NullIntermediate {
            token: "note".into()
        })
    );
}

#[test]
fn unknown_record_field_fails() {
    assert_eq!(
        resolve_path(&order(), "items[0].colour"),
        Err(PathError::FieldNotFound {
            token: "colour".into(),
            type_name: "LineItem".into()
        })
    );
}

#[test]
fn refused_read_is_inaccessible() {
    assert!(matches!(
        resolve_path(&order(), "items[0].secret"),
        Err(PathError::Inaccessible { token, .. }) if token == "secret"
    ));
}

#[test]
fn records_are_not_indexable() {
    assert!(matches!(
        resolve_path(&order(), "items[0].[0]"),
        Err(PathError::NotNavigable { kind: "object", .. })
    ));
}

#[test]
fn spec_examples() {
    let root = Value::from(json!({"a": {"b": 5}, "list": [10, 20, 30]}));
    assert_eq!(resolve_path(&root, "a.b"), Ok(Value::Long(5)));
    assert_eq!(resolve_path(&root, "list[1]"), Ok(Value::Long(20)));
    assert!(matches!(
        resolve_path(&root, "list[5]"),
        Err(PathError::IndexOutOfRange { index: 5, len: 3, .. })
    ));
}

#[test]
fn resolution_is_idempotent() {
    let root = order();
    let first = resolve_path(&root, "items[0].sku");
    let second = resolve_path(&root, "items[0].sku");
    assert_eq!(first, second);
}

fn key() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

proptest! {
    #[test]
    fn field_paths_match_repeated_lookup(keys in prop::collection::vec(key(), 1..5), leaf in any::<i64>()) {
        let mut doc = json!(leaf);
        for k in keys.iter().rev() {
            doc = json!({ k.clone(): doc });
        }
        let root = Value::from(doc);
        let path = keys.join(".");
        prop_assert_eq!(resolve_path(&root, &path), Ok(Value::Long(leaf)));

        let missing = format!("{path}.zzzzzzz");
        // the leaf is a number, so one more step is a shape error
        let is_not_navigable = matches!(resolve_path(&root, &missing), Err(PathError::NotNavigable { .. }));
        prop_assert!(is_not_navigable);

        let mut prefix = keys.clone();
        prefix.pop();
        prefix.push("zzzzzzz".to_string());
        prop_assert_eq!(resolve_path(&root, &prefix.join(".")), Ok(Value::Null));
    }

    #[test]
    fn indices_resolve_only_in_range(items in prop::collection::vec(any::<i64>(), 0..8), index in 0usize..12) {
        let root = Value::from(json!({ "list": items.clone() }));
        let out = resolve_path(&root, &format!("list[{index}]"));
        if index < items.len() {
            prop_assert_eq!(out, Ok(Value::Long(items[index])));
        } else {
            let is_out_of_range = matches!(
                out,
                Err(PathError::IndexOutOfRange { len, .. }) if len == items.len()
            );
            prop_assert!(is_out_of_range);
        }
    }
}
