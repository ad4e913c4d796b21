use serde_json::Value as Json;

use crate::errors::DecodeError;
use crate::record::DynamicRecord;
use crate::types::TypeDescriptor;
use crate::value::Value;

/// JSON encode/decode capability used for structured coercion targets.
pub trait JsonCodec: Send + Sync {
    fn decode(&self, text: &str, target: &TypeDescriptor) -> Result<Value, DecodeError>;
    fn encode(&self, value: &Value) -> String;
}

/// Default codec backed by `serde_json`.
///
/// Records are decoded field by field into a [`DynamicRecord`]; keys the
/// record type does not declare are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonCodec;

impl JsonCodec for SerdeJsonCodec {
    fn decode(&self, text: &str, target: &TypeDescriptor) -> Result<Value, DecodeError> {
        if !matches!(
            target,
            TypeDescriptor::List | TypeDescriptor::Map | TypeDescriptor::Record(_) | TypeDescriptor::Any
        ) {
            return Err(DecodeError::Unsupported(target.to_string()));
        }
        let json: Json = serde_json::from_str(text)?;
        match (target, json) {
            (TypeDescriptor::Any, json) => Ok(Value::from(json)),
            (TypeDescriptor::List, json @ Json::Array(_)) => Ok(Value::from(json)),
            (TypeDescriptor::Map, json @ Json::Object(_)) => Ok(Value::from(json)),
            (TypeDescriptor::Record(ty), Json::Object(fields)) => {
                let mut record = DynamicRecord::new(ty.clone());
                for (name, v) in fields {
                    record
                        .set(&name, Value::from(v))
                        .map_err(|_| DecodeError::UnknownField {
                            type_name: ty.name().to_string(),
                            field: name.clone(),
                        })?;
                }
                Ok(Value::from(record))
            }
            (TypeDescriptor::List, other) => Err(shape("array", &other)),
            (_, other) => Err(shape("object", &other)),
        }
    }

    fn encode(&self, value: &Value) -> String {
        value.to_json().to_string()
    }
}

fn shape(expected: &'static str, found: &Json) -> DecodeError {
    let found = match found {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    };
    DecodeError::Shape { expected, found }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{find_field, read_field, Record, RecordType};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn decodes_lists_and_maps() {
        let codec = SerdeJsonCodec;
        assert_eq!(
            codec.decode("[1, 2]", &TypeDescriptor::List).unwrap(),
            Value::List(vec![Value::Long(1), Value::Long(2)])
        );
        assert_eq!(
            codec.decode("[1]", &TypeDescriptor::Map),
            Err(DecodeError::Shape {
                expected: "object",
                found: "array"
            })
        );
        assert!(matches!(
            codec.decode("{", &TypeDescriptor::Any),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn decodes_records() {
        let ty = Arc::new(RecordType::new("Item").with_fields(["sku", "qty"]));
        let codec = SerdeJsonCodec;
        let value = codec
            .decode(r#"{"sku": "A-1", "qty": 3}"#, &TypeDescriptor::Record(ty.clone()))
            .unwrap();
        let Value::Object(record) = value else {
            panic!("expected a record");
        };
        let qty = find_field(&ty, "qty").unwrap();
        assert_eq!(read_field(&qty, record.as_ref()).unwrap(), Value::Long(3));
        assert_eq!(record.record_type().name(), "Item");

        let err = codec
            .decode(r#"{"color": "red"}"#, &TypeDescriptor::Record(ty))
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownField {
                type_name: "Item".into(),
                field: "color".into()
            }
        );
    }

    #[test]
    fn scalar_targets_are_not_decoded() {
        assert_eq!(
            SerdeJsonCodec.decode("1", &TypeDescriptor::Void),
            Err(DecodeError::Unsupported("void".into()))
        );
    }

    #[test]
    fn encode_produces_compact_json() {
        let v = Value::List(vec![Value::Int(1), Value::from("a")]);
        assert_eq!(SerdeJsonCodec.encode(&v), r#"[1,"a"]"#);
    }
}
