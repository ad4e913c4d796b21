//! Runtime type descriptors and the classifier that buckets them.
//!
//! Every descriptor falls into exactly one [`TypeBucket`]. The "value" family
//! is the union of the scalar buckets, so callers always test the specific
//! buckets first and treat whatever is left as a complex object that can only
//! be navigated by field name.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::record::RecordType;

/// Target kind handed to the coercer, or the runtime kind of a [`Value`](crate::Value).
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Void,
    Bool,
    Byte,
    Short,
    Int,
    Long,
    BigInteger,
    Float,
    Double,
    BigDecimal,
    Char,
    String,
    Enum(Arc<EnumType>),
    LocalDate,
    LocalDateTime,
    ZonedDateTime,
    Instant,
    Timestamp,
    List,
    Map,
    Record(Arc<RecordType>),
    Any,
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Enum(e) => f.write_str(&e.name),
            TypeDescriptor::Record(r) => f.write_str(r.name()),
            other => f.write_str(other.builtin_name().unwrap_or("unknown")),
        }
    }
}

impl TypeDescriptor {
    /// Name under which a non-parameterised descriptor is known, e.g. `"int"`.
    pub fn builtin_name(&self) -> Option<&'static str> {
        Some(match self {
            TypeDescriptor::Void => "void",
            TypeDescriptor::Bool => "bool",
            TypeDescriptor::Byte => "byte",
            TypeDescriptor::Short => "short",
            TypeDescriptor::Int => "int",
            TypeDescriptor::Long => "long",
            TypeDescriptor::BigInteger => "big_integer",
            TypeDescriptor::Float => "float",
            TypeDescriptor::Double => "double",
            TypeDescriptor::BigDecimal => "big_decimal",
            TypeDescriptor::Char => "char",
            TypeDescriptor::String => "string",
            TypeDescriptor::LocalDate => "local_date",
            TypeDescriptor::LocalDateTime => "local_date_time",
            TypeDescriptor::ZonedDateTime => "zoned_date_time",
            TypeDescriptor::Instant => "instant",
            TypeDescriptor::Timestamp => "timestamp",
            TypeDescriptor::List => "list",
            TypeDescriptor::Map => "map",
            TypeDescriptor::Any => "any",
            TypeDescriptor::Enum(_) | TypeDescriptor::Record(_) => return None,
        })
    }

    pub fn bucket(&self) -> TypeBucket {
        classify(self)
    }
}

/// A user-declared enumeration: a name plus its constants in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub constants: Vec<String>,
}

impl EnumType {
    pub fn new<I, S>(name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn ordinal_of(&self, constant: &str) -> Option<usize> {
        self.constants.iter().position(|c| c == constant)
    }
}

/// Most specific classification of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeBucket {
    Void,
    Boolean,
    IntegerNumber,
    DecimalNumber,
    StringOrCharacter,
    Enum,
    DateTime,
    CollectionOrArray,
    Map,
    ComplexObject,
}

impl TypeBucket {
    pub fn name(self) -> &'static str {
        match self {
            TypeBucket::Void => "void",
            TypeBucket::Boolean => "boolean",
            TypeBucket::IntegerNumber => "integer",
            TypeBucket::DecimalNumber => "decimal",
            TypeBucket::StringOrCharacter => "string",
            TypeBucket::Enum => "enum",
            TypeBucket::DateTime => "date/time",
            TypeBucket::CollectionOrArray => "collection",
            TypeBucket::Map => "map",
            TypeBucket::ComplexObject => "object",
        }
    }
}

pub fn classify(ty: &TypeDescriptor) -> TypeBucket {
    use TypeDescriptor as T;
    match ty {
        T::Void => TypeBucket::Void,
        T::Bool => TypeBucket::Boolean,
        T::Byte | T::Short | T::Int | T::Long | T::BigInteger => TypeBucket::IntegerNumber,
        T::Float | T::Double | T::BigDecimal => TypeBucket::DecimalNumber,
        T::Char | T::String => TypeBucket::StringOrCharacter,
        T::Enum(_) => TypeBucket::Enum,
        T::LocalDate | T::LocalDateTime | T::ZonedDateTime | T::Instant | T::Timestamp => {
            TypeBucket::DateTime
        }
        T::List => TypeBucket::CollectionOrArray,
        T::Map => TypeBucket::Map,
        T::Record(_) | T::Any => TypeBucket::ComplexObject,
    }
}

pub fn is_void(ty: &TypeDescriptor) -> bool {
    classify(ty) == TypeBucket::Void
}

pub fn is_boolean(ty: &TypeDescriptor) -> bool {
    classify(ty) == TypeBucket::Boolean
}

pub fn is_integer_number(ty: &TypeDescriptor) -> bool {
    classify(ty) == TypeBucket::IntegerNumber
}

pub fn is_decimal_number(ty: &TypeDescriptor) -> bool {
    classify(ty) == TypeBucket::DecimalNumber
}

/// Arbitrary precision numbers.
pub fn is_big_number(ty: &TypeDescriptor) -> bool {
    matches!(ty, TypeDescriptor::BigInteger | TypeDescriptor::BigDecimal)
}

pub fn is_number(ty: &TypeDescriptor) -> bool {
    is_integer_number(ty) || is_decimal_number(ty) || is_big_number(ty)
}

pub fn is_string_or_character(ty: &TypeDescriptor) -> bool {
    classify(ty) == TypeBucket::StringOrCharacter
}

pub fn is_character(ty: &TypeDescriptor) -> bool {
    matches!(ty, TypeDescriptor::Char)
}

pub fn is_enum(ty: &TypeDescriptor) -> bool {
    classify(ty) == TypeBucket::Enum
}

pub fn is_date_time(ty: &TypeDescriptor) -> bool {
    classify(ty) == TypeBucket::DateTime
}

/// Leaf types: booleans, numbers, strings and characters, dates, enums and void.
pub fn is_value(ty: &TypeDescriptor) -> bool {
    is_boolean(ty)
        || is_number(ty)
        || is_string_or_character(ty)
        || is_date_time(ty)
        || is_enum(ty)
        || is_void(ty)
}

pub fn is_collection_or_array(ty: &TypeDescriptor) -> bool {
    classify(ty) == TypeBucket::CollectionOrArray
}

pub fn is_map(ty: &TypeDescriptor) -> bool {
    classify(ty) == TypeBucket::Map
}
