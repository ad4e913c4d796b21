//! Walks a value graph along a [`PathExpression`].
//!
//! Each step re-classifies the current value: maps are searched by key,
//! records by field, collections by index. Missing map keys resolve to
//! `Null`; everything structural (wrong shape, unknown field, bad index) is
//! an error.

use std::borrow::Cow;

use tracing::trace;

use crate::errors::PathError;
use crate::path::{PathExpression, Segment};
use crate::record::{find_field, read_field, Record};
use crate::value::Value;

pub fn resolve_path(root: &Value, path: &str) -> Result<Value, PathError> {
    let expr = PathExpression::parse(path)?;
    resolve_expr(root, &expr)
}

pub fn resolve_expr(root: &Value, expr: &PathExpression) -> Result<Value, PathError> {
    let segments = expr.segments();
    let mut current = Cow::Borrowed(root);
    for (i, segment) in segments.iter().enumerate() {
        if current.is_null() {
            let blame = if i == 0 { segment } else { &segments[i - 1] };
            return Err(PathError::NullIntermediate {
                token: blame.to_string(),
            });
        }
        current = step(current, segment)?;
        trace!(segment = %segment, kind = current.bucket().name(), "resolved segment");
    }
    Ok(current.into_owned())
}

fn step<'a>(current: Cow<'a, Value>, segment: &Segment) -> Result<Cow<'a, Value>, PathError> {
    match current {
        Cow::Borrowed(v) => step_ref(v, segment),
        Cow::Owned(v) => step_ref(&v, segment).map(|next| Cow::Owned(next.into_owned())),
    }
}

fn step_ref<'a>(current: &'a Value, segment: &Segment) -> Result<Cow<'a, Value>, PathError> {
    match segment {
        Segment::Field { name } => named_access(current, name, segment),
        Segment::Index { base, index } => {
            let container = match base {
                Some(name) => named_access(current, name, segment)?,
                None => Cow::Borrowed(current),
            };
            match container {
                Cow::Borrowed(c) => element(c, *index, segment).map(Cow::Borrowed),
                Cow::Owned(c) => element(&c, *index, segment).map(|e| Cow::Owned(e.clone())),
            }
        }
    }
}

fn named_access<'a>(
    current: &'a Value,
    name: &str,
    segment: &Segment,
) -> Result<Cow<'a, Value>, PathError> {
    match current {
        Value::Map(map) => Ok(map.get(name).map_or(Cow::Owned(Value::Null), Cow::Borrowed)),
        Value::Object(record) => field_value(record.as_ref(), name, segment).map(Cow::Owned),
        other => Err(PathError::NotNavigable {
            token: segment.to_string(),
            kind: other.bucket().name(),
        }),
    }
}

fn field_value(record: &dyn Record, name: &str, segment: &Segment) -> Result<Value, PathError> {
    let ty = record.record_type();
    let handle = find_field(ty, name).ok_or_else(|| PathError::FieldNotFound {
        token: segment.to_string(),
        type_name: ty.name().to_string(),
    })?;
    read_field(&handle, record).map_err(|source| PathError::Inaccessible {
        token: segment.to_string(),
        source,
    })
}

fn element<'a>(container: &'a Value, index: usize, segment: &Segment) -> Result<&'a Value, PathError> {
    match container {
        Value::Null => Err(PathError::NullIntermediate {
            token: segment.to_string(),
        }),
        Value::List(items) => items.get(index).ok_or_else(|| PathError::IndexOutOfRange {
            token: segment.to_string(),
            index,
            len: items.len(),
        }),
        other => Err(PathError::NotNavigable {
            token: segment.to_string(),
            kind: other.bucket().name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn root() -> Value {
        Value::from(json!({
            "a": {"b": 5},
            "list": [10, 20, 30],
            "nested": [[1, 2], [3]],
            "empty": null
        }))
    }

    #[test]
    fn nested_keys() {
        assert_eq!(resolve_path(&root(), "a.b"), Ok(Value::Long(5)));
    }

    #[test]
    fn indexed_access() {
        assert_eq!(resolve_path(&root(), "list[1]"), Ok(Value::Long(20)));
        assert_eq!(resolve_path(&root(), "nested[1].[0]"), Ok(Value::Long(3)));
        assert_eq!(
            resolve_path(&root(), "list[5]"),
            Err(PathError::IndexOutOfRange {
                token: "list[5]".into(),
                index: 5,
                len: 3
            })
        );
    }

    #[test]
    fn missing_key_is_soft_null_only_at_the_end() {
        assert_eq!(resolve_path(&root(), "a.missing"), Ok(Value::Null));
        assert_eq!(
            resolve_path(&root(), "missing.b"),
            Err(PathError::NullIntermediate {
                token: "missing".into()
            })
        );
        assert_eq!(
            resolve_path(&root(), "empty[0]"),
            Err(PathError::NullIntermediate {
                token: "empty[0]".into()
            })
        );
    }

    #[test]
    fn leaves_and_lists_are_not_navigable_by_name() {
        assert!(matches!(
            resolve_path(&root(), "a.b.c"),
            Err(PathError::NotNavigable { kind: "integer", .. })
        ));
        assert!(matches!(
            resolve_path(&root(), "list.size"),
            Err(PathError::NotNavigable { kind: "collection", .. })
        ));
        assert!(matches!(
            resolve_path(&root(), "a[0]"),
            Err(PathError::NotNavigable { kind: "map", .. })
        ));
    }

    #[test]
    fn null_root_blames_first_segment() {
        assert_eq!(
            resolve_path(&Value::Null, "x.y"),
            Err(PathError::NullIntermediate { token: "x".into() })
        );
    }
}
