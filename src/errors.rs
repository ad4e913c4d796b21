use thiserror::Error;

use crate::types::TypeDescriptor;

/// Failures raised while parsing or walking a path expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("malformed path `{path}`: {reason}")]
    MalformedPath { path: String, reason: String },

    #[error("path '{token}' error: cannot descend through null")]
    NullIntermediate { token: String },

    #[error("path '{token}' error: {kind} value is not navigable this way")]
    NotNavigable { token: String, kind: &'static str },

    #[error("path '{token}' error: field not found on type {type_name}")]
    FieldNotFound { token: String, type_name: String },

    #[error("path '{token}' error: index {index} out of range for length {len}")]
    IndexOutOfRange { token: String, index: usize, len: usize },

    #[error("path '{token}' error: {source}")]
    Inaccessible {
        token: String,
        #[source]
        source: ReflectError,
    },
}

impl PathError {
    pub(crate) fn malformed(path: &str, reason: impl Into<String>) -> Self {
        PathError::MalformedPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failure of the field-lookup collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflectError {
    #[error("unable to access field {owner}.{field}")]
    Inaccessible { owner: String, field: String },

    #[error("type {type_name} declares no field `{field}`")]
    NoSuchField { type_name: String, field: String },
}

/// Failure reported by a [`JsonCodec`](crate::codec::JsonCodec).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid json: {0}")]
    Json(String),

    #[error("expected {expected}, found {found}")]
    Shape {
        expected: &'static str,
        found: &'static str,
    },

    #[error("unknown field `{field}` for type {type_name}")]
    UnknownField { type_name: String, field: String },

    #[error("codec cannot decode into {0}")]
    Unsupported(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::Json(e.to_string())
    }
}

/// Reason a text value could not be coerced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionErrorKind {
    #[error("unsupported target type")]
    UnsupportedTargetType,

    #[error("malformed number: {0}")]
    MalformedNumber(String),

    #[error("expected exactly one character, found {0}")]
    MalformedCharacter(usize),

    #[error("no constant with this name, expected one of: {0}")]
    MalformedEnumConstant(String),

    #[error("no supported date format matched")]
    MalformedDate,

    #[error("decode failed: {0}")]
    DownstreamDecodeFailure(DecodeError),
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot coerce `{text}` to {target}: {reason}")]
pub struct CoercionError {
    pub text: String,
    pub target: TypeDescriptor,
    pub reason: CoercionErrorKind,
}

impl CoercionError {
    pub(crate) fn new(text: &str, target: &TypeDescriptor, reason: CoercionErrorKind) -> Self {
        Self {
            text: text.to_string(),
            target: target.clone(),
            reason,
        }
    }
}

/// Crate-level error used by the [`Engine`](crate::Engine) facade and the CLI.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Coercion(#[from] CoercionError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("unknown type name `{0}`")]
    UnknownType(String),

    #[error("invalid zone `{0}`")]
    InvalidZone(String),
}

pub type Result<T> = std::result::Result<T, Error>;
