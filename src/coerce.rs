//! Text to typed value conversion.

use std::sync::Arc;

use itertools::Itertools;
use tracing::trace;

use crate::codec::{JsonCodec, SerdeJsonCodec};
use crate::context::{Context, Zone};
use crate::datetime::{parse_date, parse_date_with_pattern, DateKind};
use crate::errors::{CoercionError, CoercionErrorKind, DecodeError};
use crate::number::parse_number;
use crate::types::{self, TypeDescriptor};
use crate::value::{EnumConstant, Value};

/// Converts text into values of a requested [`TypeDescriptor`].
#[derive(Clone)]
pub struct Coercer {
    ctx: Context,
    codec: Arc<dyn JsonCodec>,
}

impl Default for Coercer {
    fn default() -> Self {
        Self::new(Context::default())
    }
}

impl Coercer {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            codec: Arc::new(SerdeJsonCodec),
        }
    }

    /// Zone-requiring dates without a zone of their own are read as UTC.
    pub fn utc() -> Self {
        Self::new(Context::utc())
    }

    /// Zone-requiring dates without a zone of their own are read in the
    /// system's local zone.
    pub fn system() -> Self {
        Self::new(Context::system())
    }

    pub fn with_codec(mut self, codec: Arc<dyn JsonCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn zone(&self) -> Zone {
        self.ctx.zone
    }

    pub fn codec(&self) -> &Arc<dyn JsonCodec> {
        &self.codec
    }

    /// `None` always yields `Value::Null`, whatever the target.
    pub fn coerce(&self, text: Option<&str>, target: &TypeDescriptor) -> Result<Value, CoercionError> {
        let Some(text) = text else {
            return Ok(Value::Null);
        };
        trace!(text, %target, "coercing");
        self.coerce_text(text, target)
            .map_err(|reason| CoercionError::new(text, target, reason))
    }

    /// Coerces into a date/time target with a caller-supplied chrono
    /// `pattern`. Use [`Coercer::utc`] or [`Coercer::system`] to pick the zone
    /// zone-less text is read in.
    pub fn coerce_with_pattern(
        &self,
        text: Option<&str>,
        pattern: &str,
        target: &TypeDescriptor,
    ) -> Result<Value, CoercionError> {
        let Some(text) = text else {
            return Ok(Value::Null);
        };
        trace!(text, pattern, %target, "coercing with pattern");
        let reason = match DateKind::of(target) {
            Some(kind) => match parse_date_with_pattern(text, pattern, kind, self.ctx.zone) {
                Some(date) => return Ok(Value::Date(date)),
                None => CoercionErrorKind::MalformedDate,
            },
            None => CoercionErrorKind::UnsupportedTargetType,
        };
        Err(CoercionError::new(text, target, reason))
    }

    fn coerce_text(&self, text: &str, target: &TypeDescriptor) -> Result<Value, CoercionErrorKind> {
        if types::is_number(target) {
            return parse_number(text, target);
        }
        if types::is_string_or_character(target) {
            return if types::is_character(target) {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(CoercionErrorKind::MalformedCharacter(text.chars().count())),
                }
            } else {
                Ok(Value::Str(text.to_string()))
            };
        }
        if types::is_boolean(target) {
            return Ok(Value::Bool(text == "true"));
        }
        if let TypeDescriptor::Enum(enum_type) = target {
            return EnumConstant::new(enum_type.clone(), text)
                .map(Value::Enum)
                .ok_or_else(|| {
                    CoercionErrorKind::MalformedEnumConstant(enum_type.constants.iter().join(", "))
                });
        }
        if let Some(kind) = DateKind::of(target) {
            return parse_date(text, kind, self.ctx.zone)
                .map(Value::Date)
                .ok_or(CoercionErrorKind::MalformedDate);
        }
        self.codec.decode(text, target).map_err(|e| match e {
            DecodeError::Unsupported(_) => CoercionErrorKind::UnsupportedTargetType,
            other => CoercionErrorKind::DownstreamDecodeFailure(other),
        })
    }
}

/// Coerces with the default (UTC) context and the `serde_json` codec.
pub fn coerce_value(text: Option<&str>, target: &TypeDescriptor) -> Result<Value, CoercionError> {
    Coercer::default().coerce(text, target)
}
