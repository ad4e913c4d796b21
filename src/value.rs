//! The closed set of runtime values an object graph is built from.

use std::sync::Arc;

use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use num_bigint::BigInt;
use serde::{Serialize, Serializer};
use serde_json::{Map as JsonMap, Number, Value as Json};

use crate::datetime::DateValue;
use crate::record::{DynamicRecord, Record};
use crate::types::{classify, EnumType, TypeBucket, TypeDescriptor};

/// A constant of a declared [`EnumType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    enum_type: Arc<EnumType>,
    ordinal: usize,
}

impl EnumConstant {
    /// `None` if `name` is not one of the type's constants.
    pub fn new(enum_type: Arc<EnumType>, name: &str) -> Option<Self> {
        let ordinal = enum_type.ordinal_of(name)?;
        Some(Self { enum_type, ordinal })
    }

    pub fn name(&self) -> &str {
        &self.enum_type.constants[self.ordinal]
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn enum_type(&self) -> &Arc<EnumType> {
        &self.enum_type
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    BigInteger(BigInt),
    Float(f32),
    Double(f64),
    BigDecimal(BigDecimal),
    Char(char),
    Str(String),
    Enum(EnumConstant),
    Date(DateValue),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Object(Arc<dyn Record>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runtime type of this value.
    pub fn descriptor(&self) -> TypeDescriptor {
        match self {
            Value::Null => TypeDescriptor::Void,
            Value::Bool(_) => TypeDescriptor::Bool,
            Value::Byte(_) => TypeDescriptor::Byte,
            Value::Short(_) => TypeDescriptor::Short,
            Value::Int(_) => TypeDescriptor::Int,
            Value::Long(_) => TypeDescriptor::Long,
            Value::BigInteger(_) => TypeDescriptor::BigInteger,
            Value::Float(_) => TypeDescriptor::Float,
            Value::Double(_) => TypeDescriptor::Double,
            Value::BigDecimal(_) => TypeDescriptor::BigDecimal,
            Value::Char(_) => TypeDescriptor::Char,
            Value::Str(_) => TypeDescriptor::String,
            Value::Enum(c) => TypeDescriptor::Enum(c.enum_type.clone()),
            Value::Date(d) => d.descriptor(),
            Value::List(_) => TypeDescriptor::List,
            Value::Map(_) => TypeDescriptor::Map,
            Value::Object(r) => TypeDescriptor::Record(r.record_type().clone()),
        }
    }

    pub fn bucket(&self) -> TypeBucket {
        classify(&self.descriptor())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// JSON form. Arbitrary precision numbers and dates become strings.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Byte(n) => Json::from(*n),
            Value::Short(n) => Json::from(*n),
            Value::Int(n) => Json::from(*n),
            Value::Long(n) => Json::from(*n),
            Value::BigInteger(n) => match i64::try_from(n) {
                Ok(small) => Json::from(small),
                Err(_) => Json::String(n.to_string()),
            },
            Value::Float(f) => Number::from_f64(f64::from(*f)).map_or(Json::Null, Json::Number),
            Value::Double(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Value::BigDecimal(d) => Json::String(d.to_string()),
            Value::Char(c) => Json::String(c.to_string()),
            Value::Str(s) => Json::String(s.clone()),
            Value::Enum(c) => Json::String(c.name().to_string()),
            Value::Date(d) => Json::String(d.to_string()),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<JsonMap<_, _>>(),
            ),
            Value::Object(record) => {
                let ty = record.record_type();
                let mut out = JsonMap::new();
                for field in ty.all_fields() {
                    if let Some(v) = record.read(&field) {
                        out.insert(field.name().to_string(), v.to_json());
                    }
                }
                Json::Object(out)
            }
        }
    }
}

fn records_equal(a: &Arc<dyn Record>, b: &Arc<dyn Record>) -> bool {
    if Arc::ptr_eq(a, b) {
        return true;
    }
    let ty = a.record_type();
    ty == b.record_type()
        && ty
            .all_fields()
            .iter()
            .all(|field| a.read(field) == b.read(field))
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Byte(a), Byte(b)) => a == b,
            (Short(a), Short(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Long(a), Long(b)) => a == b,
            (BigInteger(a), BigInteger(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Double(a), Double(b)) => a == b,
            (Value::BigDecimal(a), Value::BigDecimal(b)) => a == b,
            (Char(a), Char(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Enum(a), Enum(b)) => a == b,
            (Date(a), Date(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Object(a), Object(b)) => records_equal(a, b),
            _ => false,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Untyped JSON: integers become `Long` (or `BigInteger` above `i64::MAX`),
/// other numbers `Double`, objects `Map`.
impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Long(i)
                } else if let Some(u) = n.as_u64() {
                    Value::BigInteger(BigInt::from(u))
                } else {
                    Value::Double(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => Value::Str(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

macro_rules! impl_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    BigInt => BigInteger,
    f32 => Float,
    f64 => Double,
    BigDecimal => BigDecimal,
    char => Char,
    String => Str,
    EnumConstant => Enum,
    DateValue => Date,
    Vec<Value> => List,
    IndexMap<String, Value> => Map,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<DynamicRecord> for Value {
    fn from(v: DynamicRecord) -> Self {
        Value::Object(Arc::new(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn json_numbers_map_to_widest_integer() {
        assert_eq!(Value::from(json!(5)), Value::Long(5));
        assert_eq!(
            Value::from(json!(u64::MAX)),
            Value::BigInteger(BigInt::from(u64::MAX))
        );
        assert_eq!(Value::from(json!(2.5)), Value::Double(2.5));
    }

    #[test]
    fn json_round_trip_for_untyped_trees() {
        let doc = json!({"a": [1, "x", null, {"b": true}], "c": 1.5});
        assert_eq!(Value::from(doc.clone()).to_json(), doc);
    }

    #[test]
    fn records_compare_by_fields() {
        let ty = Arc::new(RecordType::new("Point").with_fields(["x", "y"]));
        let a = DynamicRecord::new(ty.clone()).with("x", 1).unwrap();
        let b = DynamicRecord::new(ty.clone()).with("x", 1).unwrap();
        let c = DynamicRecord::new(ty).with("x", 2).unwrap();
        assert_eq!(Value::from(a.clone()), Value::from(b));
        assert_ne!(Value::from(a), Value::from(c));
    }

    #[test]
    fn records_serialize_with_all_fields() {
        let base = Arc::new(RecordType::new("Base").with_field("id"));
        let ty = Arc::new(RecordType::new("User").with_field("name").extends(base));
        let user = DynamicRecord::new(ty).with("id", 3).unwrap().with("name", "ann").unwrap();
        assert_eq!(
            serde_json::to_value(Value::from(user)).unwrap(),
            json!({"name": "ann", "id": 3})
        );
    }

    #[test]
    fn descriptor_matches_bucket() {
        assert_eq!(Value::Null.bucket(), TypeBucket::Void);
        assert_eq!(Value::from(vec![Value::Null]).bucket(), TypeBucket::CollectionOrArray);
        assert_eq!(Value::from('c').bucket(), TypeBucket::StringOrCharacter);
    }
}
